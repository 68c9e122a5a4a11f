//! GPX output formatter

use crate::config::Config;
use crate::error::Result;
use crate::format::{Listing, OutputFormatter};

/// GPX formatter - one waypoint per place
pub struct GpxFormatter;

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

impl OutputFormatter for GpxFormatter {
    fn name(&self) -> &str {
        "gpx"
    }

    fn description(&self) -> &str {
        "GPX waypoint file"
    }

    fn format(&self, listing: &Listing, _config: &Config) -> Result<String> {
        let mut gpx = String::new();

        gpx.push_str(r#"<?xml version="1.0" encoding="UTF-8"?>"#);
        gpx.push('\n');
        gpx.push_str(r#"<gpx version="1.1" creator="weather-places">"#);
        gpx.push('\n');

        gpx.push_str("  <metadata>\n");
        gpx.push_str(&format!("    <name>{}</name>\n", escape(&listing.title)));
        gpx.push_str(&format!("    <time>{}</time>\n", chrono::Utc::now().to_rfc3339()));
        gpx.push_str("  </metadata>\n");

        for place in &listing.places {
            gpx.push_str(&format!(
                r#"  <wpt lat="{}" lon="{}">"#,
                place.latitude, place.longitude
            ));
            gpx.push('\n');
            gpx.push_str(&format!("    <name>{}</name>\n", escape(&place.name)));
            if !place.detail.is_empty() {
                gpx.push_str(&format!("    <desc>{}</desc>\n", escape(&place.detail)));
            }
            gpx.push_str("  </wpt>\n");
        }

        gpx.push_str("</gpx>\n");
        Ok(gpx)
    }
}
