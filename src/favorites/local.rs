//! In-process favorites client
//!
//! Serves the [`FavoritesClient`] contract straight from a shared
//! [`FavoriteStore`], saving after every mutation. Used by the CLI's
//! `--local` mode and shared with the bundled server.

use crate::constants::messages;
use crate::error::{Error, Result};
use crate::favorites::store::FavoriteStore;
use crate::favorites::{Envelope, FavoritesClient};
use crate::model::{Coordinates, FavoriteLocation, FavoriteLocationRequest};
use std::sync::Arc;
use tokio::sync::RwLock;

/// Store handle shared between the server and local clients
pub type SharedStore = Arc<RwLock<FavoriteStore>>;

/// Favorites client backed by a local store
#[derive(Debug, Clone)]
pub struct LocalFavoritesClient {
    store: SharedStore,
}

impl LocalFavoritesClient {
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }

    /// Wrap a store that nobody else holds
    pub fn from_store(store: FavoriteStore) -> Self {
        Self::new(Arc::new(RwLock::new(store)))
    }

    /// Access the underlying store
    pub fn store(&self) -> SharedStore {
        Arc::clone(&self.store)
    }
}

impl FavoritesClient for LocalFavoritesClient {
    async fn list(&self, device_id: &str) -> Result<Vec<FavoriteLocation>> {
        Ok(self.store.read().await.list(device_id))
    }

    async fn add(&self, request: &FavoriteLocationRequest) -> Result<Envelope<Option<FavoriteLocation>>> {
        let mut store = self.store.write().await;
        let snapshot = store.snapshot();
        let favorite = store.add(request)?;
        store.save_or_restore(snapshot)?;
        Ok(Envelope::new(messages::FAVORITE_ADDED, Some(favorite)))
    }

    async fn delete(&self, latitude: f64, longitude: f64, device_id: &str) -> Result<()> {
        let mut store = self.store.write().await;
        let snapshot = store.snapshot();
        store
            .remove(device_id, Coordinates::new(latitude, longitude))
            .ok_or_else(|| Error::from(crate::favorites::store::StoreError::NotFound))?;
        store.save_or_restore(snapshot)
    }

    async fn update_sort_order(
        &self,
        latitude: f64,
        longitude: f64,
        device_id: &str,
        sort_order: u32,
    ) -> Result<()> {
        let mut store = self.store.write().await;
        let snapshot = store.snapshot();
        store.set_sort_order(device_id, Coordinates::new(latitude, longitude), sort_order)?;
        store.save_or_restore(snapshot)
    }
}
