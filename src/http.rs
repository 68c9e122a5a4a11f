//! Shared HTTP plumbing
//!
//! One place to build `reqwest` clients and to turn failed responses into
//! [`Error::Api`] with whatever message the body carries.

use crate::constants::api::USER_AGENT;
use crate::error::{Error, Result};
use serde_json::Value;
use std::time::Duration;

/// Longest raw body kept as an error message
const MAX_RAW_MESSAGE_CHARS: usize = 200;

/// Build a client with the fixed connect/read timeout
pub fn build_client(timeout: Duration) -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .user_agent(USER_AGENT)
        .connect_timeout(timeout)
        .timeout(timeout)
        .build()
        .map_err(|e| Error::Config(format!("Failed to build HTTP client: {}", e)))
}

/// Pass successful responses through; convert anything else to `Error::Api`
pub async fn check_status(response: reqwest::Response) -> Result<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let message = extract_error_message(&body);
    tracing::debug!(status = status.as_u16(), ?message, "Request failed");
    Err(Error::api(status.as_u16(), message))
}

/// Pull a human-readable message out of an error body
///
/// Understands `{"message": ...}`, `{"error": {"message": ...}}` and
/// `{"error": "..."}`. Anything else falls back to the raw body text.
pub fn extract_error_message(body: &str) -> Option<String> {
    let body = body.trim();
    if body.is_empty() {
        return None;
    }

    if let Ok(json) = serde_json::from_str::<Value>(body) {
        let candidates = [
            json.get("message"),
            json.get("error").and_then(|e| e.get("message")),
            json.get("error"),
        ];
        if let Some(message) = candidates
            .into_iter()
            .flatten()
            .filter_map(Value::as_str)
            .map(str::trim)
            .find(|m| !m.is_empty())
        {
            return Some(message.to_string());
        }
        if json.is_object() || json.is_array() {
            return None;
        }
    }

    Some(body.chars().take(MAX_RAW_MESSAGE_CHARS).collect())
}
