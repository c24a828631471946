// src/services/space_service.rs
use std::sync::Arc;

use log::{info, warn};

use crate::domain::space::{SpaceCache, SpaceSource};
use crate::error::{AppError, AppResult};
use crate::integrations::SpaceFeed;
use crate::repositories::{Repository, SpaceCacheRepository};
use crate::services::blocking;
use crate::specifications::LastNByKey;

pub struct SpaceService {
    repo: Arc<dyn SpaceCacheRepository>,
    feed: Arc<dyn SpaceFeed>,
}

impl SpaceService {
    pub fn new(repo: Arc<dyn SpaceCacheRepository>, feed: Arc<dyn SpaceFeed>) -> Self {
        Self { repo, feed }
    }

    /// Fetch each source and cache every successful response in one batch.
    ///
    /// A failing source is logged and skipped. Fails only when every
    /// requested source failed, with the last fetch error.
    pub async fn refresh(&self, sources: &[SpaceSource]) -> AppResult<Vec<SpaceSource>> {
        let mut entries = Vec::with_capacity(sources.len());
        let mut last_error = None;

        for &source in sources {
            match self.feed.fetch(source).await {
                Ok(payload) => entries.push(SpaceCache::new(source, payload)),
                Err(e) => {
                    warn!("Error fetching {}: {}", source, e);
                    last_error = Some(e);
                }
            }
        }

        if entries.is_empty() {
            return match last_error {
                Some(e) => Err(e),
                None => Ok(Vec::new()),
            };
        }

        let refreshed: Vec<SpaceSource> = entries.iter().map(|entry| entry.source).collect();
        let repo = Arc::clone(&self.repo);
        blocking(move || repo.save_many(&entries)).await?;

        info!(
            "Refreshed {}",
            refreshed.iter().map(SpaceSource::as_str).collect::<Vec<_>>().join(", ")
        );
        Ok(refreshed)
    }

    /// Newest cached response for `source`; `NotFound` if never fetched.
    pub async fn latest(&self, source: SpaceSource) -> AppResult<SpaceCache> {
        let repo = Arc::clone(&self.repo);
        let rows = blocking(move || latest_cached(repo.as_ref(), source)).await?;
        rows.into_iter().next().ok_or(AppError::NotFound)
    }
}

pub(crate) fn latest_cached(repo: &dyn SpaceCacheRepository, source: SpaceSource) -> AppResult<Vec<SpaceCache>> {
    let spec = LastNByKey::new(repo.id_field_name(), "source", source.as_str().to_string(), 1);
    repo.find(&spec)
}
