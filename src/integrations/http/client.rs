// src/integrations/http/client.rs
//
// Plain GET-JSON over reqwest.
//
// CRITICAL RULES:
// - This is INFRASTRUCTURE: it returns documents, never records
// - Every failure becomes an UpstreamError; nothing panics
// - The per-client timeout is the only bound on a fetch

use std::time::Duration;

use log::debug;
use reqwest::{header, Client};

use crate::error::{AppError, AppResult, UpstreamError};

pub struct HttpJsonClient {
    http_client: Client,
    timeout: Duration,
}

impl HttpJsonClient {
    /// `timeout` of zero falls back to `default_timeout`.
    pub fn new(timeout: Duration, default_timeout: Duration) -> AppResult<Self> {
        let timeout = if timeout.is_zero() {
            default_timeout
        } else {
            timeout
        };

        let http_client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::Other(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            http_client,
            timeout,
        })
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// GET `url` with `query` appended and decode the body as JSON.
    pub async fn get_json(&self, url: &str, query: &[(&str, String)]) -> AppResult<serde_json::Value> {
        debug!("GET {} ({} query params)", url, query.len());

        let response = self
            .http_client
            .get(url)
            .header(header::ACCEPT, "application/json")
            .query(query)
            .send()
            .await
            .map_err(UpstreamError::from)?;

        let status = response.status();
        if !status.is_success() {
            return Err(UpstreamError::Status {
                status: status.as_u16(),
                message: format!("unexpected status code from {}", url),
            }
            .into());
        }

        let body = response
            .json::<serde_json::Value>()
            .await
            .map_err(|e| UpstreamError::Decode(e.to_string()))?;

        Ok(body)
    }
}

/// `api_key` is only sent when one is configured.
pub fn with_api_key(mut query: Vec<(&'static str, String)>, api_key: &str) -> Vec<(&'static str, String)> {
    if !api_key.is_empty() {
        query.push(("api_key", api_key.to_string()));
    }
    query
}
