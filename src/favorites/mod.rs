//! Favorite locations
//!
//! The remote CRUD + reorder contract ([`FavoritesClient`]), its HTTP and
//! in-process implementations, the backing store used by the bundled server,
//! and the [`coordinator::FavoritesCoordinator`] that owns the UI's working
//! copy of the list.

pub mod coordinator;
pub mod http;
pub mod local;
pub mod store;

use crate::error::Result;
use crate::model::{FavoriteLocation, FavoriteLocationRequest};
use serde::{Deserialize, Serialize};
use std::future::Future;

/// Standard response envelope: `{ "message": ..., "data": ... }`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope<T> {
    #[serde(default)]
    pub message: String,
    pub data: T,
}

impl<T> Envelope<T> {
    pub fn new(message: impl Into<String>, data: T) -> Self {
        Self {
            message: message.into(),
            data,
        }
    }
}

/// Remote favorites API, keyed by (device, coordinates)
pub trait FavoritesClient: Send + Sync {
    /// All favorites of a device, in server order
    fn list(&self, device_id: &str) -> impl Future<Output = Result<Vec<FavoriteLocation>>> + Send;

    /// Create a favorite; the server decides dedup and position
    fn add(
        &self,
        request: &FavoriteLocationRequest,
    ) -> impl Future<Output = Result<Envelope<Option<FavoriteLocation>>>> + Send;

    /// Delete the favorite at a coordinate
    fn delete(
        &self,
        latitude: f64,
        longitude: f64,
        device_id: &str,
    ) -> impl Future<Output = Result<()>> + Send;

    /// Overwrite one favorite's sort order
    fn update_sort_order(
        &self,
        latitude: f64,
        longitude: f64,
        device_id: &str,
        sort_order: u32,
    ) -> impl Future<Output = Result<()>> + Send;
}
