//! Shared data model
//!
//! Favorites, search documents and the location values passed between the
//! selection store, the device source and the resolver.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Two coordinates closer than this (in degrees) name the same place
pub const COORDINATE_EPSILON: f64 = 1e-7;

/// A geographic coordinate (latitude, longitude)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    /// Create new coordinates
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Validate that coordinates are within valid ranges
    ///
    /// Latitude: -90 to 90
    /// Longitude: -180 to 180
    pub fn validate(&self) -> crate::error::Result<()> {
        if !(-90.0..=90.0).contains(&self.latitude) {
            return Err(crate::error::Error::InvalidCoordinates(format!(
                "Latitude {} is out of range [-90, 90]",
                self.latitude
            )));
        }
        if !(-180.0..=180.0).contains(&self.longitude) {
            return Err(crate::error::Error::InvalidCoordinates(format!(
                "Longitude {} is out of range [-180, 180]",
                self.longitude
            )));
        }
        Ok(())
    }

    /// Whether both coordinates point at the same place
    pub fn same_place(&self, other: &Coordinates) -> bool {
        (self.latitude - other.latitude).abs() < COORDINATE_EPSILON
            && (self.longitude - other.longitude).abs() < COORDINATE_EPSILON
    }
}

/// A saved favorite location
///
/// Identity is `(device_id, latitude, longitude)`. For one device the
/// `sort_order` values form the permutation `0..N`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FavoriteLocation {
    pub device_id: String,
    pub latitude: f64,
    pub longitude: f64,
    pub address_name: String,
    #[serde(default)]
    pub region_1: String,
    #[serde(default)]
    pub region_2: String,
    #[serde(default)]
    pub region_3: String,
    #[serde(default)]
    pub sort_order: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl FavoriteLocation {
    pub fn coordinates(&self) -> Coordinates {
        Coordinates::new(self.latitude, self.longitude)
    }

    /// Identity comparison; address and order are ignored
    pub fn is_same(&self, other: &FavoriteLocation) -> bool {
        self.matches(&other.device_id, other.coordinates())
    }

    pub fn matches(&self, device_id: &str, coords: Coordinates) -> bool {
        self.device_id == device_id && self.coordinates().same_place(&coords)
    }

    /// Short region line, e.g. "서울특별시 중구 태평로1가"
    pub fn region_line(&self) -> String {
        join_regions(&self.region_1, &self.region_2, &self.region_3)
    }
}

impl PartialEq for FavoriteLocation {
    fn eq(&self, other: &Self) -> bool {
        self.is_same(other)
            && self.address_name == other.address_name
            && self.sort_order == other.sort_order
    }
}

/// Payload for creating a favorite
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FavoriteLocationRequest {
    pub device_id: String,
    pub latitude: f64,
    pub longitude: f64,
    pub address_name: String,
    #[serde(default)]
    pub region_1: String,
    #[serde(default)]
    pub region_2: String,
    #[serde(default)]
    pub region_3: String,
    #[serde(default)]
    pub sort_order: u32,
}

impl FavoriteLocationRequest {
    /// Build an add request from a confirmed search result
    ///
    /// The client always sends `sort_order = 0`; the server decides where the
    /// new item lands.
    pub fn from_result(device_id: impl Into<String>, result: &SearchResult) -> Self {
        Self {
            device_id: device_id.into(),
            latitude: result.latitude,
            longitude: result.longitude,
            address_name: result.address_name.clone(),
            region_1: result.region_1.clone(),
            region_2: result.region_2.clone(),
            region_3: result.region_3.clone(),
            sort_order: 0,
        }
    }

    pub fn coordinates(&self) -> Coordinates {
        Coordinates::new(self.latitude, self.longitude)
    }
}

/// Body of a sort order update
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SortOrderUpdate {
    pub device_id: String,
    pub latitude: f64,
    pub longitude: f64,
    pub sort_order: u32,
}

/// One address search hit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    pub address_name: String,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default)]
    pub region_1: String,
    #[serde(default)]
    pub region_2: String,
    #[serde(default)]
    pub region_3: String,
}

impl SearchResult {
    pub fn coordinates(&self) -> Coordinates {
        Coordinates::new(self.latitude, self.longitude)
    }
}

/// One page of address search results
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchPage {
    pub documents: Vec<SearchResult>,
    pub is_end: bool,
    pub total_count: u32,
}

/// One administrative region returned by reverse geocoding
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RegionInfo {
    pub region_1: String,
    pub region_2: String,
    pub region_3: String,
    pub address_name: String,
}

impl RegionInfo {
    /// Most specific non-empty region name: depth 3, then 2, then 1
    pub fn most_specific(&self) -> Option<&str> {
        [&self.region_3, &self.region_2, &self.region_1]
            .into_iter()
            .map(|s| s.trim())
            .find(|s| !s.is_empty())
    }
}

/// The place the user explicitly picked
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectedLocation {
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

impl SelectedLocation {
    pub fn new(latitude: f64, longitude: f64, address: Option<String>) -> Self {
        Self {
            latitude,
            longitude,
            address,
        }
    }
}

impl From<&FavoriteLocation> for SelectedLocation {
    fn from(favorite: &FavoriteLocation) -> Self {
        Self::new(
            favorite.latitude,
            favorite.longitude,
            Some(favorite.address_name.clone()),
        )
    }
}

/// A device fix with its human-readable address
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationInfo {
    pub latitude: f64,
    pub longitude: f64,
    pub address: String,
}

/// Where an effective location came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LocationSource {
    Selected,
    Device,
    Default,
}

impl std::fmt::Display for LocationSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Selected => write!(f, "selected"),
            Self::Device => write!(f, "device"),
            Self::Default => write!(f, "default"),
        }
    }
}

/// The location weather is fetched for; derived, never stored
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EffectiveLocation {
    pub latitude: f64,
    pub longitude: f64,
    pub address: String,
    pub source: LocationSource,
}

/// A row in any printed list of places
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Place {
    pub name: String,
    pub detail: String,
    pub latitude: f64,
    pub longitude: f64,
}

impl From<&SearchResult> for Place {
    fn from(result: &SearchResult) -> Self {
        Self {
            name: result.address_name.clone(),
            detail: join_regions(&result.region_1, &result.region_2, &result.region_3),
            latitude: result.latitude,
            longitude: result.longitude,
        }
    }
}

impl From<&FavoriteLocation> for Place {
    fn from(favorite: &FavoriteLocation) -> Self {
        Self {
            name: favorite.address_name.clone(),
            detail: format!("#{} {}", favorite.sort_order, favorite.region_line())
                .trim_end()
                .to_string(),
            latitude: favorite.latitude,
            longitude: favorite.longitude,
        }
    }
}

impl From<&EffectiveLocation> for Place {
    fn from(location: &EffectiveLocation) -> Self {
        Self {
            name: location.address.clone(),
            detail: location.source.to_string(),
            latitude: location.latitude,
            longitude: location.longitude,
        }
    }
}

fn join_regions(r1: &str, r2: &str, r3: &str) -> String {
    [r1, r2, r3]
        .into_iter()
        .filter(|s| !s.trim().is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}
