//! URL output formatter

use crate::config::Config;
use crate::error::Result;
use crate::format::{Listing, OutputFormatter};

/// URL formatter - one map link per place
#[derive(Debug, Default)]
pub struct UrlFormatter {
    /// Provider name; the configured default when unset
    pub provider: Option<String>,
}

impl UrlFormatter {
    pub fn with_provider(provider: impl Into<String>) -> Self {
        Self {
            provider: Some(provider.into()),
        }
    }
}

impl OutputFormatter for UrlFormatter {
    fn name(&self) -> &str {
        "url"
    }

    fn description(&self) -> &str {
        "Map URL per place"
    }

    fn format(&self, listing: &Listing, config: &Config) -> Result<String> {
        let mut output = String::new();
        for place in &listing.places {
            let url = config.format_url(self.provider.as_deref(), place.latitude, place.longitude)?;
            output.push_str(&url);
            output.push('\n');
        }
        Ok(output)
    }
}
