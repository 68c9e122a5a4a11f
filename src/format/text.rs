//! Human-readable text output formatter

use crate::config::Config;
use crate::error::Result;
use crate::format::{Listing, OutputFormatter};

/// Text formatter - one numbered row per place
pub struct TextFormatter;

impl OutputFormatter for TextFormatter {
    fn name(&self) -> &str {
        "text"
    }

    fn description(&self) -> &str {
        "Human-readable text"
    }

    fn format(&self, listing: &Listing, _config: &Config) -> Result<String> {
        let mut output = String::new();

        output.push_str(&format!("{} ({})\n", listing.title, listing.places.len()));
        if listing.places.is_empty() {
            output.push_str("  (none)\n");
            return Ok(output);
        }

        let width = listing.places.len().to_string().len();
        for (i, place) in listing.places.iter().enumerate() {
            output.push_str(&format!(
                "  {:>width$}. {}  ({:.6}, {:.6})\n",
                i + 1,
                place.name,
                place.latitude,
                place.longitude,
                width = width
            ));
            if !place.detail.is_empty() && place.detail != place.name {
                output.push_str(&format!("  {:>width$}  {}\n", "", place.detail, width = width));
            }
        }

        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::sample_listing;

    #[test]
    fn test_text_format() {
        let output = TextFormatter
            .format(&sample_listing(), &Config::default())
            .unwrap();

        assert!(output.starts_with("서울 (2)"));
        assert!(output.contains("1. 서울 중구 태평로1가  (37.566500, 126.978000)"));
        assert!(output.contains("부산 해운대구"));
        // Detail equal to the name is not repeated
        assert_eq!(output.matches("태평로1가").count(), 1);
    }

    #[test]
    fn test_empty_listing() {
        let output = TextFormatter
            .format(&Listing::new("즐겨찾기", Vec::new()), &Config::default())
            .unwrap();
        assert!(output.contains("(none)"));
    }
}
