//! Client for the gateway's `/api/analyze` route.
//!
//! Mirrors what the dashboard does with a lookup: post the query, turn a
//! failed status into a readable error, and check the payload has both
//! `summary` and `matches` before handing it on.

use std::time::Duration;

use reqwest::Client;
use serde_json::{json, Value};
use thiserror::Error;
use tracing::{debug, warn};
use url::Url;

use crate::models::PlayerData;

/// Broad category of a failed lookup, derived from the status code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    NotFound,
    BadFormat,
    RateLimited,
    Server,
    Other,
}

impl FailureKind {
    pub fn from_status(status: u16) -> Self {
        match status {
            404 => FailureKind::NotFound,
            400 => FailureKind::BadFormat,
            429 => FailureKind::RateLimited,
            500..=599 => FailureKind::Server,
            _ => FailureKind::Other,
        }
    }

    /// Message used when the gateway did not send one.
    pub fn fallback_message(&self) -> &'static str {
        match self {
            FailureKind::NotFound => "Summoner not found. Double-check the name and tag.",
            FailureKind::BadFormat => "Invalid summoner name or tag format.",
            FailureKind::RateLimited => "Too many requests. Please wait a moment and try again.",
            FailureKind::Server => "Server error. Please try again later.",
            FailureKind::Other => "Something went wrong while loading your recap.",
        }
    }
}

/// Errors surfaced to the dashboard.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("{message}")]
    Status {
        status: u16,
        kind: FailureKind,
        message: String,
    },

    #[error("Unable to connect to the server. Check your internet connection and try again.")]
    Network(String),

    #[error("Invalid data received from server: {0}")]
    InvalidPayload(String),

    #[error("Invalid gateway URL: {0}")]
    InvalidUrl(String),
}

/// HTTP client for a running gateway.
pub struct DashboardClient {
    client: Client,
    analyze_url: Url,
}

impl DashboardClient {
    /// `base_url` is the gateway root, e.g. `http://127.0.0.1:8080`.
    pub fn new(base_url: &Url, timeout: Duration) -> Result<Self, ClientError> {
        let analyze_url = base_url
            .join("/api/analyze")
            .map_err(|e| ClientError::InvalidUrl(e.to_string()))?;

        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ClientError::Network(e.to_string()))?;

        Ok(Self {
            client,
            analyze_url,
        })
    }

    /// Fetch the full analysis for `summoner_name#tag`.
    pub async fn fetch_player_data(
        &self,
        summoner_name: &str,
        tag: &str,
    ) -> Result<PlayerData, ClientError> {
        debug!("POST {} for {}#{}", self.analyze_url, summoner_name, tag);

        let response = self
            .client
            .post(self.analyze_url.as_str())
            .json(&json!({ "summonerName": summoner_name, "tag": tag }))
            .send()
            .await
            .map_err(|e| ClientError::Network(e.to_string()))?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| ClientError::Network(e.to_string()))?;

        if !status.is_success() {
            return Err(status_error(status.as_u16(), &body));
        }

        let value: Value = serde_json::from_slice(&body)
            .map_err(|e| ClientError::InvalidPayload(e.to_string()))?;

        if value.get("summary").is_none() || value.get("matches").is_none() {
            return Err(ClientError::InvalidPayload(
                "response is missing summary or matches".to_string(),
            ));
        }

        serde_json::from_value(value).map_err(|e| ClientError::InvalidPayload(e.to_string()))
    }
}

/// Prefer the gateway's own message; fall back to one keyed off the status.
fn status_error(status: u16, body: &[u8]) -> ClientError {
    let kind = FailureKind::from_status(status);
    let server_message = serde_json::from_slice::<Value>(body)
        .ok()
        .and_then(|v| v.get("error").and_then(Value::as_str).map(str::to_string))
        .filter(|m| !m.trim().is_empty());

    warn!("Gateway returned {}: {:?}", status, server_message);

    ClientError::Status {
        status,
        kind,
        message: server_message.unwrap_or_else(|| kind.fallback_message().to_string()),
    }
}
