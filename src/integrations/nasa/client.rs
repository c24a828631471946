// src/integrations/nasa/client.rs
//
// NASA feeds: OSDR catalogue, APOD, NEO feed, DONKI flares and CMEs.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{Duration as ChronoDuration, NaiveDate, Utc};

use crate::config::EndpointConfig;
use crate::error::AppResult;
use crate::integrations::http::{with_api_key, HttpJsonClient};
use crate::integrations::OsdrFeed;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Days of history requested from the NEO feed.
pub const NEO_WINDOW_DAYS: i64 = 2;

/// Days of history requested from DONKI.
pub const DONKI_WINDOW_DAYS: i64 = 5;

pub struct NasaFeeds {
    client: HttpJsonClient,
    api_key: String,
    osdr_url: String,
    apod_url: String,
    neo_feed_url: String,
    donki_flr_url: String,
    donki_cme_url: String,
}

impl NasaFeeds {
    pub fn from_config(endpoints: &EndpointConfig) -> AppResult<Self> {
        Ok(Self {
            client: HttpJsonClient::new(
                Duration::from_secs(endpoints.nasa_timeout_secs),
                DEFAULT_TIMEOUT,
            )?,
            api_key: endpoints.nasa_api_key.clone(),
            osdr_url: endpoints.osdr_url.clone(),
            apod_url: endpoints.apod_url.clone(),
            neo_feed_url: endpoints.neo_feed_url.clone(),
            donki_flr_url: endpoints.donki_flr_url.clone(),
            donki_cme_url: endpoints.donki_cme_url.clone(),
        })
    }

    pub fn osdr_url(&self) -> &str {
        &self.osdr_url
    }

    pub async fn fetch_apod(&self) -> AppResult<serde_json::Value> {
        let query = with_api_key(vec![("thumbs", "true".to_string())], &self.api_key);
        self.client.get_json(&self.apod_url, &query).await
    }

    pub async fn fetch_neo_feed(&self) -> AppResult<serde_json::Value> {
        let (from, to) = last_days(NEO_WINDOW_DAYS);
        let query = with_api_key(
            vec![("start_date", from), ("end_date", to)],
            &self.api_key,
        );
        self.client.get_json(&self.neo_feed_url, &query).await
    }

    pub async fn fetch_donki_flr(&self) -> AppResult<serde_json::Value> {
        self.fetch_donki(&self.donki_flr_url).await
    }

    pub async fn fetch_donki_cme(&self) -> AppResult<serde_json::Value> {
        self.fetch_donki(&self.donki_cme_url).await
    }

    async fn fetch_donki(&self, url: &str) -> AppResult<serde_json::Value> {
        let (from, to) = last_days(DONKI_WINDOW_DAYS);
        let query = with_api_key(vec![("startDate", from), ("endDate", to)], &self.api_key);
        self.client.get_json(url, &query).await
    }
}

#[async_trait]
impl OsdrFeed for NasaFeeds {
    async fn fetch_datasets(&self) -> AppResult<serde_json::Value> {
        self.client.get_json(&self.osdr_url, &[]).await
    }
}

/// `(today - days, today)` in UTC as `YYYY-MM-DD`.
pub fn last_days(days: i64) -> (String, String) {
    window_ending(Utc::now().date_naive(), days)
}

fn window_ending(to: NaiveDate, days: i64) -> (String, String) {
    let from = to - ChronoDuration::days(days);
    (
        from.format("%Y-%m-%d").to_string(),
        to.format("%Y-%m-%d").to_string(),
    )
}
