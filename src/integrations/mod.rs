// src/integrations/mod.rs
//
// External Integrations Module
//
// Services only see the feed traits below. Each returns the upstream
// document untouched; interpretation (if any) belongs to the caller.

pub mod http;
pub mod iss;
pub mod nasa;
pub mod spacex;

use async_trait::async_trait;

use crate::domain::space::SpaceSource;
use crate::error::AppResult;

pub use http::HttpJsonClient;
pub use iss::IssPositionFeed;
pub use nasa::NasaFeeds;
pub use spacex::SpaceXFeed;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait IssFeed: Send + Sync {
    async fn fetch_position(&self) -> AppResult<serde_json::Value>;

    /// Recorded next to every stored sample.
    fn source_url(&self) -> String;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait OsdrFeed: Send + Sync {
    async fn fetch_datasets(&self) -> AppResult<serde_json::Value>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SpaceFeed: Send + Sync {
    async fn fetch(&self, source: SpaceSource) -> AppResult<serde_json::Value>;
}

/// Routes each space source to the client that serves it.
pub struct SpaceFeeds {
    nasa: NasaFeeds,
    spacex: SpaceXFeed,
}

impl SpaceFeeds {
    pub fn new(nasa: NasaFeeds, spacex: SpaceXFeed) -> Self {
        Self { nasa, spacex }
    }
}

#[async_trait]
impl SpaceFeed for SpaceFeeds {
    async fn fetch(&self, source: SpaceSource) -> AppResult<serde_json::Value> {
        match source {
            SpaceSource::Apod => self.nasa.fetch_apod().await,
            SpaceSource::Neo => self.nasa.fetch_neo_feed().await,
            SpaceSource::Flr => self.nasa.fetch_donki_flr().await,
            SpaceSource::Cme => self.nasa.fetch_donki_cme().await,
            SpaceSource::Spacex => self.spacex.fetch_next_launch().await,
        }
    }
}
