//! JSON output formatter

use crate::config::Config;
use crate::error::Result;
use crate::format::{Listing, OutputFormatter};

/// JSON formatter - outputs the listing as pretty-printed JSON
pub struct JsonFormatter;

impl OutputFormatter for JsonFormatter {
    fn name(&self) -> &str {
        "json"
    }

    fn description(&self) -> &str {
        "Listing as JSON"
    }

    fn format(&self, listing: &Listing, _config: &Config) -> Result<String> {
        Ok(serde_json::to_string_pretty(listing)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::sample_listing;

    #[test]
    fn test_json_format() {
        let output = JsonFormatter
            .format(&sample_listing(), &Config::default())
            .unwrap();

        let parsed: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(parsed["title"], "서울");
        assert_eq!(parsed["places"].as_array().unwrap().len(), 2);
        assert_eq!(parsed["places"][0]["latitude"], 37.5665);
    }
}
