//! HTTP favorites client
//!
//! Talks to the favorites REST API:
//!
//! - `GET    /api/favorites?deviceId=..`
//! - `POST   /api/favorites`
//! - `DELETE /api/favorites?deviceId=..&latitude=..&longitude=..`
//! - `PATCH  /api/favorites/sort-order`

use crate::config::Config;
use crate::constants::api::{FAVORITES_PATH, FAVORITES_SORT_ORDER_PATH};
use crate::error::{Error, Result};
use crate::favorites::{Envelope, FavoritesClient};
use crate::http::{build_client, check_status};
use crate::model::{FavoriteLocation, FavoriteLocationRequest, SortOrderUpdate};
use serde::Deserialize;
use std::time::Duration;

/// Favorites API client
#[derive(Debug, Clone)]
pub struct HttpFavoritesClient {
    client: reqwest::Client,
    base_url: String,
}

/// The list endpoint answers either a bare array or an envelope
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ListBody {
    Bare(Vec<FavoriteLocation>),
    Wrapped { data: Vec<FavoriteLocation> },
}

impl HttpFavoritesClient {
    /// Create a client for an API base URL
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        Ok(Self {
            client: build_client(timeout)?,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// Create a client from the `[favorites]` and `[http]` sections
    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(config.favorites.base_url.clone(), config.http_timeout())
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

impl FavoritesClient for HttpFavoritesClient {
    async fn list(&self, device_id: &str) -> Result<Vec<FavoriteLocation>> {
        let url = format!(
            "{}?deviceId={}",
            self.url(FAVORITES_PATH),
            urlencoding::encode(device_id)
        );

        let response = self.client.get(&url).send().await?;
        let body: ListBody = check_status(response)
            .await?
            .json()
            .await
            .map_err(|e| Error::Parse(format!("Failed to parse favorites list: {}", e)))?;

        Ok(match body {
            ListBody::Bare(items) => items,
            ListBody::Wrapped { data } => data,
        })
    }

    async fn add(&self, request: &FavoriteLocationRequest) -> Result<Envelope<Option<FavoriteLocation>>> {
        let response = self
            .client
            .post(self.url(FAVORITES_PATH))
            .json(request)
            .send()
            .await?;
        let text = check_status(response).await?.text().await?;

        // Success is the status code; the body is informational
        Ok(serde_json::from_str(&text).unwrap_or_else(|e| {
            tracing::warn!("Add response body not an envelope: {}", e);
            Envelope::new("", None)
        }))
    }

    async fn delete(&self, latitude: f64, longitude: f64, device_id: &str) -> Result<()> {
        let url = format!(
            "{}?deviceId={}&latitude={}&longitude={}",
            self.url(FAVORITES_PATH),
            urlencoding::encode(device_id),
            latitude,
            longitude
        );

        let response = self.client.delete(&url).send().await?;
        check_status(response).await?;
        Ok(())
    }

    async fn update_sort_order(
        &self,
        latitude: f64,
        longitude: f64,
        device_id: &str,
        sort_order: u32,
    ) -> Result<()> {
        let body = SortOrderUpdate {
            device_id: device_id.to_string(),
            latitude,
            longitude,
            sort_order,
        };

        let response = self
            .client
            .patch(self.url(FAVORITES_SORT_ORDER_PATH))
            .json(&body)
            .send()
            .await?;
        check_status(response).await?;
        Ok(())
    }
}
