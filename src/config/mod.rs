//! Configuration management
//!
//! Loads and saves configuration from XDG-compliant paths.
//! Config location: ~/.config/weather-places/config.toml

pub mod defaults;

use crate::error::{Error, Result};
use defaults::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use uuid::Uuid;

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Address search provider
    #[serde(default)]
    pub geocoding: GeocodingConfig,

    /// Favorites API
    #[serde(default)]
    pub favorites: FavoritesConfig,

    /// Search behavior
    #[serde(default)]
    pub search: SearchConfig,

    /// Location resolution
    #[serde(default)]
    pub location: LocationConfig,

    /// Outbound HTTP
    #[serde(default)]
    pub http: HttpConfig,

    /// Device identity
    #[serde(default)]
    pub device: DeviceConfig,

    /// Bundled favorites server
    #[serde(default)]
    pub server: ServerConfig,

    /// Map link settings
    #[serde(default)]
    pub url: UrlConfig,
}

/// Address search provider settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeocodingConfig {
    /// Provider base URL
    #[serde(default = "default_geocoding_url")]
    pub base_url: String,

    /// REST API key
    #[serde(default)]
    pub api_key: String,
}

/// Favorites API settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FavoritesConfig {
    /// Base URL of the favorites API
    #[serde(default = "default_favorites_url")]
    pub base_url: String,
}

/// Search behavior
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Quiet period before a query is sent
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,

    /// Results per page
    #[serde(default = "default_page_size")]
    pub page_size: u32,

    /// Shortest query that is sent
    #[serde(default = "default_min_query_chars")]
    pub min_query_chars: usize,

    /// Longest query that is sent; longer input is truncated
    #[serde(default = "default_max_query_chars")]
    pub max_query_chars: usize,

    /// Rows from the end that trigger the next page
    #[serde(default = "default_prefetch_threshold")]
    pub prefetch_threshold: usize,
}

/// Location resolution settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocationConfig {
    /// Fallback latitude
    #[serde(default = "default_latitude")]
    pub default_latitude: f64,

    /// Fallback longitude
    #[serde(default = "default_longitude")]
    pub default_longitude: f64,

    /// Fallback address label
    #[serde(default = "default_label")]
    pub default_label: String,

    /// Whether the device position may be used at all
    #[serde(default = "default_true")]
    pub use_device_location: bool,

    /// Upper bound for a single position fix
    #[serde(default = "default_fix_timeout")]
    pub fix_timeout_secs: u64,
}

/// Outbound HTTP settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Connect and read timeout in seconds
    #[serde(default = "default_http_timeout")]
    pub timeout_secs: u64,
}

/// Device identity
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DeviceConfig {
    /// Stable per-install identifier, generated on first use
    #[serde(default)]
    pub id: String,
}

/// Favorites server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Maximum favorites stored per device
    #[serde(default = "default_max_favorites")]
    pub max_favorites_per_device: usize,

    /// Store file; empty means the XDG data directory
    #[serde(default)]
    pub store_path: String,
}

/// Map link settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UrlConfig {
    /// Default URL provider
    #[serde(default = "default_url_provider")]
    pub default: String,

    /// URL provider templates
    #[serde(default = "default_url_providers")]
    pub providers: HashMap<String, String>,
}

// Default value functions for serde
fn default_geocoding_url() -> String {
    DEFAULT_GEOCODING_URL.to_string()
}
fn default_favorites_url() -> String {
    DEFAULT_FAVORITES_URL.to_string()
}
fn default_debounce_ms() -> u64 {
    DEFAULT_DEBOUNCE_MS
}
fn default_page_size() -> u32 {
    DEFAULT_PAGE_SIZE
}
fn default_min_query_chars() -> usize {
    DEFAULT_MIN_QUERY_CHARS
}
fn default_max_query_chars() -> usize {
    DEFAULT_MAX_QUERY_CHARS
}
fn default_prefetch_threshold() -> usize {
    DEFAULT_PREFETCH_THRESHOLD
}
fn default_latitude() -> f64 {
    DEFAULT_LATITUDE
}
fn default_longitude() -> f64 {
    DEFAULT_LONGITUDE
}
fn default_label() -> String {
    DEFAULT_LABEL.to_string()
}
fn default_true() -> bool {
    true
}
fn default_fix_timeout() -> u64 {
    DEFAULT_FIX_TIMEOUT_SECS
}
fn default_http_timeout() -> u64 {
    DEFAULT_HTTP_TIMEOUT_SECS
}
fn default_host() -> String {
    DEFAULT_HOST.to_string()
}
fn default_port() -> u16 {
    DEFAULT_PORT
}
fn default_max_favorites() -> usize {
    DEFAULT_MAX_FAVORITES
}
fn default_url_provider() -> String {
    DEFAULT_URL_PROVIDER.to_string()
}
fn default_url_providers() -> HashMap<String, String> {
    let mut providers = HashMap::new();
    providers.insert(
        "kakao".to_string(),
        "https://map.kakao.com/link/map/{lat},{lng}".to_string(),
    );
    providers.insert(
        "google".to_string(),
        "https://www.google.com/maps/@{lat},{lng},15z".to_string(),
    );
    providers.insert(
        "openstreetmap".to_string(),
        "https://www.openstreetmap.org/#map=18/{lat}/{lng}".to_string(),
    );
    providers
}

impl Default for GeocodingConfig {
    fn default() -> Self {
        Self {
            base_url: default_geocoding_url(),
            api_key: String::new(),
        }
    }
}

impl Default for FavoritesConfig {
    fn default() -> Self {
        Self {
            base_url: default_favorites_url(),
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            debounce_ms: default_debounce_ms(),
            page_size: default_page_size(),
            min_query_chars: default_min_query_chars(),
            max_query_chars: default_max_query_chars(),
            prefetch_threshold: default_prefetch_threshold(),
        }
    }
}

impl Default for LocationConfig {
    fn default() -> Self {
        Self {
            default_latitude: default_latitude(),
            default_longitude: default_longitude(),
            default_label: default_label(),
            use_device_location: true,
            fix_timeout_secs: default_fix_timeout(),
        }
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_http_timeout(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            max_favorites_per_device: default_max_favorites(),
            store_path: String::new(),
        }
    }
}

impl Default for UrlConfig {
    fn default() -> Self {
        Self {
            default: default_url_provider(),
            providers: default_url_providers(),
        }
    }
}

impl Config {
    /// Get the config directory path
    pub fn config_dir() -> Result<PathBuf> {
        dirs::config_dir()
            .map(|p| p.join(APP_DIR_NAME))
            .ok_or_else(|| Error::Config("Could not determine config directory".to_string()))
    }

    /// Get the config file path
    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join(CONFIG_FILE_NAME))
    }

    /// Load configuration from the default path
    ///
    /// Creates default config if file doesn't exist
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    /// Load configuration from a specific path, writing defaults if missing
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = fs::read_to_string(path).map_err(|e| {
                Error::Config(format!("Failed to read config file: {}", e))
            })?;

            toml::from_str(&content).map_err(|e| {
                Error::Config(format!("Failed to parse config file: {}", e))
            })
        } else {
            let config = Config::default();
            config.save_to(path)?;
            Ok(config)
        }
    }

    /// Save configuration to the default path
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    /// Save configuration to a specific path
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                Error::Config(format!("Failed to create config directory: {}", e))
            })?;
        }

        let content = toml::to_string_pretty(self).map_err(|e| {
            Error::Config(format!("Failed to serialize config: {}", e))
        })?;

        fs::write(path, content).map_err(|e| {
            Error::Config(format!("Failed to write config file: {}", e))
        })?;

        Ok(())
    }

    /// Return the per-install device id, generating one if unset
    ///
    /// Returns `true` in the second slot when a new id was generated and the
    /// config should be saved.
    pub fn ensure_device_id(&mut self) -> (String, bool) {
        if self.device.id.trim().is_empty() {
            self.device.id = Uuid::new_v4().to_string();
            (self.device.id.clone(), true)
        } else {
            (self.device.id.clone(), false)
        }
    }

    /// Timeout applied to every outbound request
    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http.timeout_secs)
    }

    /// Get a configuration value by key path
    ///
    /// Key format: "section.key"
    /// Returns the value as a string, or None if not found
    pub fn get(&self, key: &str) -> Option<String> {
        let parts: Vec<&str> = key.split('.').collect();

        match parts.as_slice() {
            ["geocoding", "base_url"] => Some(self.geocoding.base_url.clone()),
            ["geocoding", "api_key"] => Some(self.geocoding.api_key.clone()),

            ["favorites", "base_url"] => Some(self.favorites.base_url.clone()),

            ["search", "debounce_ms"] => Some(self.search.debounce_ms.to_string()),
            ["search", "page_size"] => Some(self.search.page_size.to_string()),
            ["search", "min_query_chars"] => Some(self.search.min_query_chars.to_string()),
            ["search", "max_query_chars"] => Some(self.search.max_query_chars.to_string()),
            ["search", "prefetch_threshold"] => Some(self.search.prefetch_threshold.to_string()),

            ["location", "default_latitude"] => Some(self.location.default_latitude.to_string()),
            ["location", "default_longitude"] => {
                Some(self.location.default_longitude.to_string())
            }
            ["location", "default_label"] => Some(self.location.default_label.clone()),
            ["location", "use_device_location"] => {
                Some(self.location.use_device_location.to_string())
            }
            ["location", "fix_timeout_secs"] => Some(self.location.fix_timeout_secs.to_string()),

            ["http", "timeout_secs"] => Some(self.http.timeout_secs.to_string()),

            ["device", "id"] => Some(self.device.id.clone()),

            ["server", "host"] => Some(self.server.host.clone()),
            ["server", "port"] => Some(self.server.port.to_string()),
            ["server", "max_favorites_per_device"] => {
                Some(self.server.max_favorites_per_device.to_string())
            }
            ["server", "store_path"] => Some(self.server.store_path.clone()),

            ["url", "default"] => Some(self.url.default.clone()),

            _ => None,
        }
    }

    /// Set a configuration value by key path
    ///
    /// Key format: "section.key"
    /// Returns error if key is invalid or value type is wrong
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let parts: Vec<&str> = key.split('.').collect();

        match parts.as_slice() {
            ["geocoding", "base_url"] => self.geocoding.base_url = value.to_string(),
            ["geocoding", "api_key"] => self.geocoding.api_key = value.to_string(),

            ["favorites", "base_url"] => self.favorites.base_url = value.to_string(),

            ["search", "debounce_ms"] => self.search.debounce_ms = parse_value(key, value)?,
            ["search", "page_size"] => self.search.page_size = parse_value(key, value)?,
            ["search", "min_query_chars"] => {
                self.search.min_query_chars = parse_value(key, value)?
            }
            ["search", "max_query_chars"] => {
                self.search.max_query_chars = parse_value(key, value)?
            }
            ["search", "prefetch_threshold"] => {
                self.search.prefetch_threshold = parse_value(key, value)?
            }

            ["location", "default_latitude"] => {
                self.location.default_latitude = parse_value(key, value)?
            }
            ["location", "default_longitude"] => {
                self.location.default_longitude = parse_value(key, value)?
            }
            ["location", "default_label"] => self.location.default_label = value.to_string(),
            ["location", "use_device_location"] => {
                self.location.use_device_location = parse_value(key, value)?
            }
            ["location", "fix_timeout_secs"] => {
                self.location.fix_timeout_secs = parse_value(key, value)?
            }

            ["http", "timeout_secs"] => self.http.timeout_secs = parse_value(key, value)?,

            ["device", "id"] => self.device.id = value.to_string(),

            ["server", "host"] => self.server.host = value.to_string(),
            ["server", "port"] => self.server.port = parse_value(key, value)?,
            ["server", "max_favorites_per_device"] => {
                self.server.max_favorites_per_device = parse_value(key, value)?
            }
            ["server", "store_path"] => self.server.store_path = value.to_string(),

            ["url", "default"] => self.url.default = value.to_string(),

            _ => {
                return Err(Error::Config(format!("Unknown config key: {}", key)));
            }
        }

        Ok(())
    }

    /// List all available config keys
    pub fn available_keys() -> Vec<&'static str> {
        vec![
            "geocoding.base_url",
            "geocoding.api_key",
            "favorites.base_url",
            "search.debounce_ms",
            "search.page_size",
            "search.min_query_chars",
            "search.max_query_chars",
            "search.prefetch_threshold",
            "location.default_latitude",
            "location.default_longitude",
            "location.default_label",
            "location.use_device_location",
            "location.fix_timeout_secs",
            "http.timeout_secs",
            "device.id",
            "server.host",
            "server.port",
            "server.max_favorites_per_device",
            "server.store_path",
            "url.default",
        ]
    }

    /// Format a URL using the specified provider
    ///
    /// Replaces {lat} and {lng} placeholders with actual values
    pub fn format_url(&self, provider: Option<&str>, lat: f64, lng: f64) -> Result<String> {
        let provider_name = provider.unwrap_or(&self.url.default);

        let template = self.url.providers.get(provider_name).ok_or_else(|| {
            Error::Config(format!("Unknown URL provider: {}", provider_name))
        })?;

        Ok(template
            .replace("{lat}", &lat.to_string())
            .replace("{lng}", &lng.to_string()))
    }

    /// Get server address as "host:port"
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

fn parse_value<T: std::str::FromStr>(key: &str, value: &str) -> Result<T> {
    value
        .parse()
        .map_err(|_| Error::Config(format!("Invalid value for {}: {}", key, value)))
}
