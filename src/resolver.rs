//! Effective location resolution
//!
//! Picks the coordinate weather is fetched for. First available wins:
//!
//! 1. the user's explicit selection
//! 2. the device position
//! 3. the configured default
//!
//! Nothing is cached and nothing is retried here.

use crate::config::Config;
use crate::constants::location::SELECTED_LABEL;
use crate::geo::device::DeviceLocation;
use crate::model::{EffectiveLocation, LocationSource};
use crate::selection::SelectionStore;

/// Fallback used when neither a selection nor a device fix exists
#[derive(Debug, Clone, PartialEq)]
pub struct DefaultLocation {
    pub latitude: f64,
    pub longitude: f64,
    pub label: String,
}

impl DefaultLocation {
    pub fn from_config(config: &Config) -> Self {
        Self {
            latitude: config.location.default_latitude,
            longitude: config.location.default_longitude,
            label: config.location.default_label.clone(),
        }
    }
}

impl Default for DefaultLocation {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

/// Selection > device > default
#[derive(Debug)]
pub struct EffectiveLocationResolver<D> {
    selection: SelectionStore,
    device: D,
    fallback: DefaultLocation,
}

impl<D: DeviceLocation> EffectiveLocationResolver<D> {
    pub fn new(selection: SelectionStore, device: D, fallback: DefaultLocation) -> Self {
        Self {
            selection,
            device,
            fallback,
        }
    }

    /// Resolve the current effective location
    pub async fn resolve(&self) -> EffectiveLocation {
        if let Some(selected) = self.selection.selected_location() {
            let address = selected
                .address
                .filter(|a| !a.trim().is_empty())
                .unwrap_or_else(|| SELECTED_LABEL.to_string());
            return EffectiveLocation {
                latitude: selected.latitude,
                longitude: selected.longitude,
                address,
                source: LocationSource::Selected,
            };
        }

        if let Some(info) = self.device.get_current_location().await {
            return EffectiveLocation {
                latitude: info.latitude,
                longitude: info.longitude,
                address: info.address,
                source: LocationSource::Device,
            };
        }

        tracing::debug!("No selection or device fix; using default location");
        EffectiveLocation {
            latitude: self.fallback.latitude,
            longitude: self.fallback.longitude,
            address: self.fallback.label.clone(),
            source: LocationSource::Default,
        }
    }
}
