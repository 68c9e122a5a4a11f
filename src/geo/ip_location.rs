//! IP-based position provider
//!
//! Uses ip-api.com as a coarse position source with file-based caching. On a
//! desktop there is no GPS permission prompt, so "permission" is the
//! `location.use_device_location` config flag.

use crate::config::Config;
use crate::constants::api::IP_API_URL;
use crate::constants::cache::{IP_LOCATION_CACHE_FILE, IP_LOCATION_TTL_SECS};
use crate::constants::http::TIMEOUT_SECS;
use crate::error::{Error, Result};
use crate::geo::device::{PositionFix, PositionProvider};
use crate::http::{build_client, check_status};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::time::{Duration, SystemTime};

/// Position provider backed by IP geolocation
#[derive(Debug)]
pub struct IpPositionProvider {
    client: reqwest::Client,
    url: String,
    allowed: bool,
    cache_path: Option<PathBuf>,
}

/// ip-api.com response
#[derive(Debug, Deserialize)]
struct IpApiResponse {
    status: String,
    lat: Option<f64>,
    lon: Option<f64>,
}

/// Cached fix
#[derive(Debug, Clone, Serialize, Deserialize)]
struct CachedFix {
    fix: PositionFix,
    timestamp: u64,
}

impl IpPositionProvider {
    /// Create a provider with the default cache path
    pub fn new(allowed: bool) -> Result<Self> {
        let cache_path = dirs::cache_dir()
            .map(|p| p.join(crate::config::defaults::APP_DIR_NAME).join(IP_LOCATION_CACHE_FILE));

        Ok(Self {
            client: build_client(Duration::from_secs(TIMEOUT_SECS))?,
            url: IP_API_URL.to_string(),
            allowed,
            cache_path,
        })
    }

    /// Create a provider from the `[location]` section
    pub fn from_config(config: &Config) -> Result<Self> {
        let mut provider = Self::new(config.location.use_device_location)?;
        provider.client = build_client(config.http_timeout())?;
        Ok(provider)
    }

    /// Use a different lookup endpoint
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    /// Use a specific cache file
    pub fn with_cache_path(mut self, cache_path: PathBuf) -> Self {
        self.cache_path = Some(cache_path);
        self
    }

    /// Disable caching
    pub fn without_cache(mut self) -> Self {
        self.cache_path = None;
        self
    }

    /// Fetch a fix from the lookup service
    async fn fetch_fix(&self) -> Result<PositionFix> {
        let response = self.client.get(&self.url).send().await?;

        let data: IpApiResponse = check_status(response)
            .await?
            .json()
            .await
            .map_err(|e| Error::Parse(format!("Failed to parse IP location response: {}", e)))?;

        if data.status != "success" {
            return Err(Error::Location("IP location lookup failed".to_string()));
        }

        let latitude = data
            .lat
            .ok_or_else(|| Error::Parse("No latitude in response".to_string()))?;
        let longitude = data
            .lon
            .ok_or_else(|| Error::Parse("No longitude in response".to_string()))?;

        Ok(PositionFix {
            latitude,
            longitude,
            accuracy_meters: None,
        })
    }

    /// Load cached fix if still fresh
    fn load_cache(&self) -> Option<PositionFix> {
        let cache_path = self.cache_path.as_ref()?;

        let content = fs::read_to_string(cache_path).ok()?;
        let cached: CachedFix = serde_json::from_str(&content).ok()?;

        let now = SystemTime::now()
            .duration_since(SystemTime::UNIX_EPOCH)
            .ok()?
            .as_secs();

        if now.saturating_sub(cached.timestamp) < IP_LOCATION_TTL_SECS {
            Some(cached.fix)
        } else {
            None
        }
    }

    /// Save fix to cache
    fn save_cache(&self, fix: &PositionFix) {
        let Some(cache_path) = &self.cache_path else {
            return;
        };

        if let Some(parent) = cache_path.parent() {
            let _ = fs::create_dir_all(parent);
        }

        let timestamp = SystemTime::now()
            .duration_since(SystemTime::UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0);

        let cached = CachedFix { fix: *fix, timestamp };

        if let Ok(content) = serde_json::to_string_pretty(&cached) {
            let _ = fs::write(cache_path, content);
        }
    }

    /// Clear the cache
    pub fn clear_cache(&self) {
        if let Some(cache_path) = &self.cache_path {
            let _ = fs::remove_file(cache_path);
        }
    }

    /// Get cache duration
    pub fn cache_duration() -> Duration {
        Duration::from_secs(IP_LOCATION_TTL_SECS)
    }
}

impl PositionProvider for IpPositionProvider {
    fn has_permission(&self) -> bool {
        self.allowed
    }

    async fn single_fix(&self) -> Result<PositionFix> {
        if let Some(cached) = self.load_cache() {
            return Ok(cached);
        }

        let fix = self.fetch_fix().await?;
        self.save_cache(&fix);
        Ok(fix)
    }
}
