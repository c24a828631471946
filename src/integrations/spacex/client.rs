// src/integrations/spacex/client.rs

use std::time::Duration;

use crate::config::EndpointConfig;
use crate::error::AppResult;
use crate::integrations::http::HttpJsonClient;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// SpaceX "next launch" endpoint
pub struct SpaceXFeed {
    client: HttpJsonClient,
    url: String,
}

impl SpaceXFeed {
    pub fn from_config(endpoints: &EndpointConfig) -> AppResult<Self> {
        Ok(Self {
            client: HttpJsonClient::new(
                Duration::from_secs(endpoints.spacex_timeout_secs),
                DEFAULT_TIMEOUT,
            )?,
            url: endpoints.spacex_url.clone(),
        })
    }

    pub async fn fetch_next_launch(&self) -> AppResult<serde_json::Value> {
        self.client.get_json(&self.url, &[]).await
    }
}
