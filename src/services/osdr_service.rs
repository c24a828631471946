// src/services/osdr_service.rs
use std::sync::Arc;

use log::info;

use crate::domain::osdr::{items_from_catalogue, OsdrItem};
use crate::error::{AppError, AppResult, UpstreamError};
use crate::integrations::OsdrFeed;
use crate::repositories::{OsdrItemRepository, Repository};
use crate::services::blocking;
use crate::specifications::RecentList;

pub const DEFAULT_LIST_LIMIT: i64 = 20;

pub struct OsdrService {
    repo: Arc<dyn OsdrItemRepository>,
    feed: Arc<dyn OsdrFeed>,
}

impl OsdrService {
    pub fn new(repo: Arc<dyn OsdrItemRepository>, feed: Arc<dyn OsdrFeed>) -> Self {
        Self { repo, feed }
    }

    /// Pull the catalogue and upsert every dataset in one batch.
    ///
    /// Returns the number of datasets written.
    pub async fn sync(&self) -> AppResult<usize> {
        let document = self.feed.fetch_datasets().await?;
        let items = items_from_catalogue(&document).ok_or_else(|| {
            UpstreamError::Generic("unexpected response format".to_string())
        })?;

        let written = items.len();
        if written == 0 {
            return Ok(0);
        }

        let repo = Arc::clone(&self.repo);
        blocking(move || repo.save_many(&items)).await?;

        info!("OSDR sync wrote {} dataset(s)", written);
        Ok(written)
    }

    /// Newest datasets first; `limit <= 0` means the default page size.
    pub async fn list(&self, limit: i64) -> AppResult<Vec<OsdrItem>> {
        let limit = if limit <= 0 { DEFAULT_LIST_LIMIT } else { limit };
        let spec = RecentList::new("inserted_at", limit as u64);

        let repo = Arc::clone(&self.repo);
        match blocking(move || repo.find(&spec)).await {
            Ok(items) => Ok(items),
            Err(AppError::NotFound) => Ok(Vec::new()),
            Err(e) => Err(e),
        }
    }
}
