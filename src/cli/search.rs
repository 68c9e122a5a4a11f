//! Search command handler
//!
//! Runs one debounced search session and prints the collected pages.

use crate::cli::{drain_notices, emit, load_config, OutputArgs};
use crate::error::{Error, Result};
use crate::format::Listing;
use crate::geo::get_geocoder;
use crate::model::Place;
use crate::notice::Notifier;
use crate::search::{SearchController, SearchSettings};
use clap::Args;
use std::sync::Arc;

/// Search command arguments
#[derive(Args)]
pub struct SearchArgs {
    /// Address or place name
    #[arg(required = true, num_args = 1..)]
    pub query: Vec<String>,

    /// Number of result pages to fetch
    #[arg(long, default_value_t = 1)]
    pub pages: u32,

    #[command(flatten)]
    pub output: OutputArgs,
}

/// Run the search command
pub async fn run(args: SearchArgs) -> Result<()> {
    let (config, _) = load_config()?;
    let query = args.query.join(" ");

    let notifier = Notifier::default();
    let mut notices = notifier.subscribe();
    let geocoder = Arc::new(get_geocoder(&config)?);
    let mut controller =
        SearchController::new(geocoder, SearchSettings::from_config(&config), notifier);

    controller.on_query_changed(&query);
    controller.settled().await;

    for _ in 1..args.pages.max(1) {
        if !controller.load_next_page() {
            break;
        }
        controller.settled().await;
    }

    if drain_notices(&mut notices) {
        return Err(Error::Network("search failed".to_string()));
    }

    let state = controller.state();
    if state.query.is_empty() {
        return Err(Error::Config(format!(
            "Query must be at least {} characters",
            config.search.min_query_chars
        )));
    }

    let places: Vec<Place> = state.results.iter().map(Place::from).collect();
    let title = if state.is_end {
        format!("\"{}\"", state.query)
    } else {
        format!("\"{}\" (more available)", state.query)
    };
    emit(&Listing::new(title, places), &args.output, &config)
}
