//! Resolve command handler
//!
//! Prints the effective location: an explicit selection if given, else the
//! device position, else the configured default.

use crate::cli::{emit, load_config, OutputArgs};
use crate::error::Result;
use crate::format::Listing;
use crate::geo::device::DeviceLocationSource;
use crate::geo::get_geocoder;
use crate::geo::ip_location::IpPositionProvider;
use crate::model::{Place, SelectedLocation};
use crate::resolver::{DefaultLocation, EffectiveLocationResolver};
use crate::selection::SelectionStore;
use clap::Args;
use std::sync::Arc;
use std::time::Duration;

/// Resolve command arguments
#[derive(Args)]
pub struct ResolveArgs {
    /// Selected latitude
    #[arg(long, requires = "lon", allow_negative_numbers = true)]
    pub lat: Option<f64>,

    /// Selected longitude
    #[arg(long, requires = "lat", allow_negative_numbers = true)]
    pub lon: Option<f64>,

    /// Address label of the selection
    #[arg(long, requires = "lat")]
    pub label: Option<String>,

    /// Do not use the device position
    #[arg(long)]
    pub no_device: bool,

    #[command(flatten)]
    pub output: OutputArgs,
}

/// Run the resolve command
pub async fn run(args: ResolveArgs) -> Result<()> {
    let (mut config, _) = load_config()?;
    if args.no_device {
        config.location.use_device_location = false;
    }

    let selection = SelectionStore::new();
    if let (Some(lat), Some(lon)) = (args.lat, args.lon) {
        selection.set(SelectedLocation::new(lat, lon, args.label));
    }

    let geocoder = Arc::new(get_geocoder(&config)?);
    let device = DeviceLocationSource::new(
        IpPositionProvider::from_config(&config)?,
        geocoder,
        Duration::from_secs(config.location.fix_timeout_secs),
    );
    let resolver =
        EffectiveLocationResolver::new(selection, device, DefaultLocation::from_config(&config));

    let location = resolver.resolve().await;
    let title = format!("Effective location ({})", location.source);
    emit(
        &Listing::new(title, vec![Place::from(&location)]),
        &args.output,
        &config,
    )
}
