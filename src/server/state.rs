//! Server shared state
//!
//! Holds configuration and the favorites store shared by all handlers.

use crate::config::Config;
use crate::error::Result;
use crate::favorites::local::SharedStore;
use crate::favorites::store::FavoriteStore;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Shared state for the HTTP server
pub struct AppState {
    /// Configuration
    pub config: Config,

    /// Favorites of every device
    pub store: SharedStore,
}

impl AppState {
    /// Create application state around an existing store
    pub fn new(config: Config, store: FavoriteStore) -> Self {
        Self {
            config,
            store: Arc::new(RwLock::new(store)),
        }
    }

    /// Open the store named by the `[server]` section
    pub fn from_config(config: Config) -> Result<Self> {
        let max = config.server.max_favorites_per_device;
        let store = if config.server.store_path.trim().is_empty() {
            FavoriteStore::load(max)?
        } else {
            FavoriteStore::load_from(PathBuf::from(&config.server.store_path), max)?
        };
        tracing::info!(favorites = store.len(), "Favorites store opened");
        Ok(Self::new(config, store))
    }
}
