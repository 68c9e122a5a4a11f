//! Geocoding module
//!
//! Address search, reverse geocoding and device position acquisition.

pub mod device;
pub mod ip_location;
pub mod kakao;

use crate::error::Result;
use crate::model::{RegionInfo, SearchPage};
use std::future::Future;

/// Trait for geocoding backends
pub trait GeocodingClient: Send + Sync {
    /// Search addresses matching free text
    ///
    /// `page` is 1-based; `size` is the number of documents per page.
    fn search_by_address(
        &self,
        query: &str,
        page: u32,
        size: u32,
    ) -> impl Future<Output = Result<SearchPage>> + Send;

    /// Administrative regions containing a coordinate
    ///
    /// Longitude comes first, matching the provider's x/y convention.
    fn reverse_geocode(
        &self,
        longitude: f64,
        latitude: f64,
    ) -> impl Future<Output = Result<Vec<RegionInfo>>> + Send;
}

/// Get the default geocoding backend
pub fn get_geocoder(config: &crate::config::Config) -> Result<kakao::KakaoGeocoder> {
    kakao::KakaoGeocoder::from_config(config)
}
