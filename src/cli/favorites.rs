//! Favorites command handler
//!
//! List, add, delete and reorder favorites through the same coordinator the
//! app uses, against the favorites server or the local store.

use crate::cli::{drain_notices, emit, load_config, OutputArgs};
use crate::config::Config;
use crate::error::{Error, Result};
use crate::favorites::coordinator::FavoritesCoordinator;
use crate::favorites::http::HttpFavoritesClient;
use crate::favorites::local::LocalFavoritesClient;
use crate::favorites::store::FavoriteStore;
use crate::favorites::FavoritesClient;
use crate::format::Listing;
use crate::geo::{get_geocoder, GeocodingClient};
use crate::model::{Place, SearchResult};
use crate::notice::{NoticeReceiver, Notifier};
use clap::{Args, Subcommand};
use std::sync::Arc;

/// Favorites command arguments
#[derive(Args)]
pub struct FavoritesArgs {
    /// Use the local store instead of the favorites server
    #[arg(long, global = true)]
    pub local: bool,

    #[command(subcommand)]
    pub action: Option<FavoritesAction>,
}

#[derive(Subcommand)]
pub enum FavoritesAction {
    /// List favorites in order
    List {
        #[command(flatten)]
        output: OutputArgs,
    },

    /// Add the first search hit for a query, or explicit coordinates
    Add {
        /// Address to search for
        #[arg(required_unless_present = "lat")]
        query: Vec<String>,

        /// Which search hit to add (1-based)
        #[arg(long, default_value_t = 1)]
        pick: usize,

        /// Latitude
        #[arg(long, requires_all = ["lon", "name"], conflicts_with = "query")]
        lat: Option<f64>,

        /// Longitude
        #[arg(long)]
        lon: Option<f64>,

        /// Display name for explicit coordinates
        #[arg(long)]
        name: Option<String>,
    },

    /// Delete the favorite at a position (1-based)
    Delete {
        position: usize,
    },

    /// Move a favorite from one position to another (1-based)
    Move {
        from: usize,
        to: usize,
    },
}

/// Run the favorites command
pub async fn run(args: FavoritesArgs) -> Result<()> {
    let (config, device_id) = load_config()?;
    let action = args.action.unwrap_or(FavoritesAction::List {
        output: OutputArgs::default(),
    });

    if args.local {
        let store = FavoriteStore::load(config.server.max_favorites_per_device)?;
        let client = LocalFavoritesClient::from_store(store);
        execute(client, &config, device_id, action).await
    } else {
        let client = HttpFavoritesClient::from_config(&config)?;
        execute(client, &config, device_id, action).await
    }
}

async fn execute<F: FavoritesClient>(
    client: F,
    config: &Config,
    device_id: String,
    action: FavoritesAction,
) -> Result<()> {
    let notifier = Notifier::default();
    let mut notices = notifier.subscribe();
    let coordinator = FavoritesCoordinator::new(Arc::new(client), device_id, notifier);

    if !coordinator.refresh().await {
        return finish(&mut notices, false);
    }

    match action {
        FavoritesAction::List { output } => {
            let places: Vec<Place> = coordinator.favorites().iter().map(Place::from).collect();
            emit(&Listing::new("즐겨찾기", places), &output, config)
        }

        FavoritesAction::Add {
            query,
            pick,
            lat,
            lon,
            name,
        } => {
            let candidate = match (lat, lon, name) {
                (Some(latitude), Some(longitude), Some(name)) => SearchResult {
                    address_name: name,
                    latitude,
                    longitude,
                    region_1: String::new(),
                    region_2: String::new(),
                    region_3: String::new(),
                },
                _ => find_candidate(config, &query.join(" "), pick).await?,
            };
            let ok = coordinator.add(&candidate).await;
            finish(&mut notices, ok)
        }

        FavoritesAction::Delete { position } => {
            let list = coordinator.favorites();
            let target = position
                .checked_sub(1)
                .and_then(|i| list.get(i))
                .ok_or_else(|| out_of_range(position, list.len()))?;
            let ok = coordinator.delete(target).await;
            finish(&mut notices, ok)
        }

        FavoritesAction::Move { from, to } => {
            let len = coordinator.favorites().len();
            for position in [from, to] {
                if position == 0 || position > len {
                    return Err(out_of_range(position, len));
                }
            }

            coordinator.toggle_edit_mode();
            coordinator.reorder(from - 1, to - 1);
            let report = coordinator.persist_order().await;
            coordinator.exit_edit_mode();

            eprintln!("Updated {} of {} positions", report.updated, len);
            finish(&mut notices, report.is_complete())
        }
    }
}

async fn find_candidate(config: &Config, query: &str, pick: usize) -> Result<SearchResult> {
    let geocoder = get_geocoder(config)?;
    let page = geocoder
        .search_by_address(query.trim(), 1, config.search.page_size)
        .await?;

    pick.checked_sub(1)
        .and_then(|i| page.documents.into_iter().nth(i))
        .ok_or_else(|| Error::Location(format!("No search result #{} for \"{}\"", pick, query)))
}

fn out_of_range(position: usize, len: usize) -> Error {
    Error::Config(format!("Position {} is out of range (1..={})", position, len))
}

fn finish(notices: &mut NoticeReceiver, ok: bool) -> Result<()> {
    let had_error = drain_notices(notices);
    if ok && !had_error {
        Ok(())
    } else {
        Err(Error::Favorites("request failed".to_string()))
    }
}
