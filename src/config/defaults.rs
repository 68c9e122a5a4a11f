//! Default configuration values
//!
//! Named constants for all tunable parameters

use crate::constants;

/// Default geocoder base URL
pub const DEFAULT_GEOCODING_URL: &str = constants::api::KAKAO_LOCAL_URL;

/// Default favorites API base URL (the bundled server)
pub const DEFAULT_FAVORITES_URL: &str = "http://127.0.0.1:7979";

/// Default search debounce in milliseconds
pub const DEFAULT_DEBOUNCE_MS: u64 = constants::search::DEBOUNCE_MS;

/// Default page size
pub const DEFAULT_PAGE_SIZE: u32 = constants::search::PAGE_SIZE;

/// Default minimum query length
pub const DEFAULT_MIN_QUERY_CHARS: usize = constants::search::MIN_QUERY_CHARS;

/// Default maximum query length
pub const DEFAULT_MAX_QUERY_CHARS: usize = constants::search::MAX_QUERY_CHARS;

/// Default prefetch distance from the end of the result list
pub const DEFAULT_PREFETCH_THRESHOLD: usize = constants::search::PREFETCH_THRESHOLD;

/// Default fallback latitude
pub const DEFAULT_LATITUDE: f64 = constants::location::DEFAULT_LATITUDE;

/// Default fallback longitude
pub const DEFAULT_LONGITUDE: f64 = constants::location::DEFAULT_LONGITUDE;

/// Default fallback label
pub const DEFAULT_LABEL: &str = constants::location::DEFAULT_LABEL;

/// Default position fix timeout in seconds
pub const DEFAULT_FIX_TIMEOUT_SECS: u64 = constants::location::FIX_TIMEOUT_SECS;

/// Default HTTP timeout in seconds
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = constants::http::TIMEOUT_SECS;

/// Default server host
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// Default server port
pub const DEFAULT_PORT: u16 = 7979;

/// Default per-device favorites limit enforced by the server
pub const DEFAULT_MAX_FAVORITES: usize = 20;

/// Default URL provider
pub const DEFAULT_URL_PROVIDER: &str = "kakao";

/// Config file name
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Application directory name (for XDG paths)
pub const APP_DIR_NAME: &str = "weather-places";
