//! weather-places: address search, favorites and location resolution
//!
//! The location layer of a weather app, minus the UI:
//!
//! - Debounced, paginated, cancellable address search ([`search`])
//! - A device's ordered favorites with add, delete-after-confirm and
//!   drag-reorder persistence ([`favorites`])
//! - The effective location weather is fetched for: selection, then device
//!   position, then a fixed default ([`resolver`])
//! - A reference favorites server and a CLI
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use weather_places::geo::kakao::KakaoGeocoder;
//! use weather_places::notice::Notifier;
//! use weather_places::search::{SearchController, SearchSettings};
//!
//! # async fn demo() -> weather_places::Result<()> {
//! let geocoder = KakaoGeocoder::new(
//!     "https://dapi.kakao.com",
//!     "rest-api-key",
//!     std::time::Duration::from_secs(30),
//! )?;
//! let mut search = SearchController::new(
//!     Arc::new(geocoder),
//!     SearchSettings::default(),
//!     Notifier::default(),
//! );
//!
//! search.on_query_changed("서울");
//! search.settled().await;
//! println!("{} results", search.state().results.len());
//! # Ok(())
//! # }
//! ```

pub mod cli;
pub mod config;
pub mod constants;
pub mod error;
pub mod favorites;
pub mod format;
pub mod geo;
pub mod http;
pub mod model;
pub mod notice;
pub mod resolver;
pub mod search;
pub mod selection;
pub mod server;

#[cfg(test)]
mod testing;

// Re-export commonly used types
pub use config::Config;
pub use error::{Error, Result};
pub use favorites::coordinator::{FavoritesCoordinator, PersistReport};
pub use model::{EffectiveLocation, FavoriteLocation, LocationSource, SearchResult, SelectedLocation};
pub use resolver::EffectiveLocationResolver;
pub use search::{SearchController, SearchState};
pub use selection::SelectionStore;
