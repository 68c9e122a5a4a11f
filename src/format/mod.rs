//! Output formatters
//!
//! Provides trait-based output formatting for place listings (search
//! results, favorites, the resolved location).

pub mod gpx;
pub mod json;
pub mod text;
pub mod url;

use crate::config::Config;
use crate::error::Result;
use crate::model::Place;
use serde::{Deserialize, Serialize};

/// Information about an output format
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormatInfo {
    /// Format name
    pub name: String,
    /// Format description
    pub description: String,
}

/// A titled list of places to print
#[derive(Debug, Clone, Serialize)]
pub struct Listing {
    pub title: String,
    pub places: Vec<Place>,
}

impl Listing {
    pub fn new(title: impl Into<String>, places: Vec<Place>) -> Self {
        Self {
            title: title.into(),
            places,
        }
    }
}

/// Trait for output formatters
pub trait OutputFormatter: Send + Sync {
    /// Get the format name
    fn name(&self) -> &str;

    /// Get the format description
    fn description(&self) -> &str;

    /// Format a listing
    ///
    /// # Arguments
    /// * `listing` - The places to format
    /// * `config` - Application config (for url providers, etc.)
    fn format(&self, listing: &Listing, config: &Config) -> Result<String>;
}

/// Get a formatter by name
pub fn get_formatter(name: &str) -> Option<Box<dyn OutputFormatter>> {
    match name.to_lowercase().as_str() {
        "json" => Some(Box::new(json::JsonFormatter)),
        "text" => Some(Box::new(text::TextFormatter)),
        "gpx" => Some(Box::new(gpx::GpxFormatter)),
        "url" => Some(Box::new(url::UrlFormatter::default())),
        _ => None,
    }
}

/// List all available formatters
pub fn available_formats() -> Vec<FormatInfo> {
    [
        json::JsonFormatter.info(),
        text::TextFormatter.info(),
        gpx::GpxFormatter.info(),
        url::UrlFormatter::default().info(),
    ]
    .into()
}

trait Describe {
    fn info(&self) -> FormatInfo;
}

impl<T: OutputFormatter> Describe for T {
    fn info(&self) -> FormatInfo {
        FormatInfo {
            name: self.name().to_string(),
            description: self.description().to_string(),
        }
    }
}

#[cfg(test)]
pub(crate) fn sample_listing() -> Listing {
    Listing::new(
        "서울",
        vec![
            Place {
                name: "서울 중구 태평로1가".to_string(),
                detail: "서울 중구 태평로1가".to_string(),
                latitude: 37.5665,
                longitude: 126.978,
            },
            Place {
                name: "부산 & 해운대".to_string(),
                detail: "부산 해운대구".to_string(),
                latitude: 35.1631,
                longitude: 129.1636,
            },
        ],
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_formatter() {
        assert!(get_formatter("json").is_some());
        assert!(get_formatter("text").is_some());
        assert!(get_formatter("gpx").is_some());
        assert!(get_formatter("url").is_some());
        assert!(get_formatter("unknown").is_none());
    }

    #[test]
    fn test_url_formatter_by_name_uses_default_provider() {
        let formatter = get_formatter("url").unwrap();
        let output = formatter
            .format(&sample_listing(), &Config::default())
            .unwrap();
        assert_eq!(output.lines().count(), sample_listing().places.len());
    }

    #[test]
    fn test_get_formatter_case_insensitive() {
        assert!(get_formatter("JSON").is_some());
        assert!(get_formatter("Text").is_some());
        assert!(get_formatter("GPX").is_some());
    }

    #[test]
    fn test_available_formats() {
        let formats = available_formats();
        assert_eq!(formats.len(), 4);
        for name in ["json", "text", "gpx", "url"] {
            assert!(formats.iter().any(|f| f.name == name));
        }
    }
}
