//! Device location source
//!
//! Wraps a single position fix plus reverse geocoding into one
//! [`LocationInfo`]. This layer never fails: a missing permission, a fix
//! error or a timeout yields `None`, and a geocoding failure yields the
//! unknown-location label.

use crate::constants::location::UNKNOWN_LOCATION;
use crate::error::Result;
use crate::geo::GeocodingClient;
use crate::model::{LocationInfo, RegionInfo};
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

/// A raw position reading
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PositionFix {
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accuracy_meters: Option<f64>,
}

/// Source of single position fixes
pub trait PositionProvider: Send + Sync {
    /// Whether the user allowed location access
    fn has_permission(&self) -> bool;

    /// Request one high-accuracy fix (not a continuous stream)
    fn single_fix(&self) -> impl Future<Output = Result<PositionFix>> + Send;
}

/// Anything that can report where the device currently is
pub trait DeviceLocation: Send + Sync {
    fn get_current_location(&self) -> impl Future<Output = Option<LocationInfo>> + Send;
}

/// Position provider + reverse geocoder
#[derive(Debug)]
pub struct DeviceLocationSource<P, G> {
    provider: P,
    geocoder: Arc<G>,
    fix_timeout: Duration,
}

impl<P, G> DeviceLocationSource<P, G>
where
    P: PositionProvider,
    G: GeocodingClient,
{
    pub fn new(provider: P, geocoder: Arc<G>, fix_timeout: Duration) -> Self {
        Self {
            provider,
            geocoder,
            fix_timeout,
        }
    }

    /// Human-readable address for a coordinate, never failing
    pub async fn describe(&self, latitude: f64, longitude: f64) -> String {
        match self.geocoder.reverse_geocode(longitude, latitude).await {
            Ok(regions) => compose_address(&regions),
            Err(e) => {
                tracing::debug!("Reverse geocode failed: {}", e);
                UNKNOWN_LOCATION.to_string()
            }
        }
    }
}

impl<P, G> DeviceLocation for DeviceLocationSource<P, G>
where
    P: PositionProvider,
    G: GeocodingClient,
{
    async fn get_current_location(&self) -> Option<LocationInfo> {
        // Checked on every call, even if the caller already did
        if !self.provider.has_permission() {
            tracing::debug!("Location permission not granted");
            return None;
        }

        let fix = match tokio::time::timeout(self.fix_timeout, self.provider.single_fix()).await {
            Ok(Ok(fix)) => fix,
            Ok(Err(e)) => {
                tracing::warn!("Position fix failed: {}", e);
                return None;
            }
            Err(_) => {
                tracing::warn!("Position fix timed out after {:?}", self.fix_timeout);
                return None;
            }
        };

        let address = self.describe(fix.latitude, fix.longitude).await;
        tracing::info!("Device location resolved to {}", address);

        Some(LocationInfo {
            latitude: fix.latitude,
            longitude: fix.longitude,
            address,
        })
    }
}

/// Best-effort address from reverse geocoding output
///
/// Depth-3 > depth-2 > depth-1 region name of the first document, then its
/// full address, then the unknown-location label.
pub fn compose_address(regions: &[RegionInfo]) -> String {
    let Some(first) = regions.first() else {
        return UNKNOWN_LOCATION.to_string();
    };

    if let Some(name) = first.most_specific() {
        return name.to_string();
    }

    let full = first.address_name.trim();
    if full.is_empty() {
        UNKNOWN_LOCATION.to_string()
    } else {
        full.to_string()
    }
}
