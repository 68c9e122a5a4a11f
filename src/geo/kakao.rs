//! Kakao Local geocoding backend
//!
//! Address search (`/v2/local/search/address.json`) and coordinate to region
//! lookup (`/v2/local/geo/coord2regioncode.json`). Both require a REST API
//! key sent as `Authorization: KakaoAK <key>`.

use crate::config::Config;
use crate::constants::api::{KAKAO_ADDRESS_SEARCH_PATH, KAKAO_COORD_TO_REGION_PATH};
use crate::error::{Error, Result};
use crate::geo::GeocodingClient;
use crate::http::{build_client, check_status};
use crate::model::{RegionInfo, SearchPage, SearchResult};
use serde::Deserialize;
use std::time::Duration;

/// Kakao geocoding backend
#[derive(Debug, Clone)]
pub struct KakaoGeocoder {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

#[derive(Debug, Deserialize)]
struct AddressSearchResponse {
    meta: SearchMeta,
    #[serde(default)]
    documents: Vec<AddressDocument>,
}

#[derive(Debug, Deserialize)]
struct SearchMeta {
    #[serde(default)]
    total_count: u32,
    #[serde(default)]
    is_end: bool,
}

#[derive(Debug, Deserialize)]
struct AddressDocument {
    address_name: String,
    x: String,
    y: String,
    #[serde(default)]
    address: Option<RegionNames>,
    #[serde(default)]
    road_address: Option<RegionNames>,
}

#[derive(Debug, Default, Deserialize)]
struct RegionNames {
    #[serde(default)]
    region_1depth_name: String,
    #[serde(default)]
    region_2depth_name: String,
    #[serde(default)]
    region_3depth_name: String,
}

#[derive(Debug, Deserialize)]
struct RegionResponse {
    #[serde(default)]
    documents: Vec<RegionDocument>,
}

#[derive(Debug, Deserialize)]
struct RegionDocument {
    #[serde(default)]
    address_name: String,
    #[serde(default)]
    region_1depth_name: String,
    #[serde(default)]
    region_2depth_name: String,
    #[serde(default)]
    region_3depth_name: String,
}

impl KakaoGeocoder {
    /// Create a backend for a base URL and API key
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>, timeout: Duration) -> Result<Self> {
        Ok(Self {
            client: build_client(timeout)?,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        })
    }

    /// Create a backend from the `[geocoding]` and `[http]` sections
    pub fn from_config(config: &Config) -> Result<Self> {
        if config.geocoding.api_key.trim().is_empty() {
            tracing::warn!("geocoding.api_key is not set; requests will be rejected");
        }
        Self::new(
            config.geocoding.base_url.clone(),
            config.geocoding.api_key.clone(),
            config.http_timeout(),
        )
    }

    fn authorization(&self) -> String {
        format!("KakaoAK {}", self.api_key)
    }

    /// Parse provider x/y strings to (latitude, longitude)
    fn parse_coords(x: &str, y: &str) -> Result<(f64, f64)> {
        let longitude: f64 = x
            .trim()
            .parse()
            .map_err(|_| Error::Parse(format!("Invalid longitude: {}", x)))?;
        let latitude: f64 = y
            .trim()
            .parse()
            .map_err(|_| Error::Parse(format!("Invalid latitude: {}", y)))?;
        Ok((latitude, longitude))
    }

    fn into_result(doc: AddressDocument) -> Option<SearchResult> {
        let (latitude, longitude) = match Self::parse_coords(&doc.x, &doc.y) {
            Ok(coords) => coords,
            Err(e) => {
                tracing::debug!("Skipping document {:?}: {}", doc.address_name, e);
                return None;
            }
        };
        let regions = doc.address.or(doc.road_address).unwrap_or_default();

        Some(SearchResult {
            address_name: doc.address_name,
            latitude,
            longitude,
            region_1: regions.region_1depth_name,
            region_2: regions.region_2depth_name,
            region_3: regions.region_3depth_name,
        })
    }
}

impl GeocodingClient for KakaoGeocoder {
    async fn search_by_address(&self, query: &str, page: u32, size: u32) -> Result<SearchPage> {
        let url = format!(
            "{}{}?query={}&page={}&size={}",
            self.base_url,
            KAKAO_ADDRESS_SEARCH_PATH,
            urlencoding::encode(query),
            page,
            size
        );
        tracing::debug!(query, page, size, "Searching addresses");

        let response = self
            .client
            .get(&url)
            .header(reqwest::header::AUTHORIZATION, self.authorization())
            .send()
            .await?;
        let body: AddressSearchResponse = check_status(response)
            .await?
            .json()
            .await
            .map_err(|e| Error::Parse(format!("Failed to parse address search response: {}", e)))?;

        let documents: Vec<SearchResult> = body
            .documents
            .into_iter()
            .filter_map(Self::into_result)
            .collect();

        Ok(SearchPage {
            documents,
            is_end: body.meta.is_end,
            total_count: body.meta.total_count,
        })
    }

    async fn reverse_geocode(&self, longitude: f64, latitude: f64) -> Result<Vec<RegionInfo>> {
        let url = format!(
            "{}{}?x={}&y={}",
            self.base_url, KAKAO_COORD_TO_REGION_PATH, longitude, latitude
        );

        let response = self
            .client
            .get(&url)
            .header(reqwest::header::AUTHORIZATION, self.authorization())
            .send()
            .await?;
        let body: RegionResponse = check_status(response)
            .await?
            .json()
            .await
            .map_err(|e| Error::Parse(format!("Failed to parse region response: {}", e)))?;

        Ok(body
            .documents
            .into_iter()
            .map(|doc| RegionInfo {
                region_1: doc.region_1depth_name,
                region_2: doc.region_2depth_name,
                region_3: doc.region_3depth_name,
                address_name: doc.address_name,
            })
            .collect())
    }
}
