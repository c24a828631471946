// src/integrations/iss/client.rs

use std::time::Duration;

use async_trait::async_trait;

use crate::config::EndpointConfig;
use crate::error::AppResult;
use crate::integrations::http::HttpJsonClient;
use crate::integrations::IssFeed;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(20);

/// Current ISS position from a single JSON endpoint
pub struct IssPositionFeed {
    client: HttpJsonClient,
    url: String,
}

impl IssPositionFeed {
    pub fn from_config(endpoints: &EndpointConfig) -> AppResult<Self> {
        Ok(Self {
            client: HttpJsonClient::new(
                Duration::from_secs(endpoints.iss_timeout_secs),
                DEFAULT_TIMEOUT,
            )?,
            url: endpoints.iss_url.clone(),
        })
    }
}

#[async_trait]
impl IssFeed for IssPositionFeed {
    async fn fetch_position(&self) -> AppResult<serde_json::Value> {
        self.client.get_json(&self.url, &[]).await
    }

    fn source_url(&self) -> String {
        self.url.clone()
    }
}
