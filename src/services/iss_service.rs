// src/services/iss_service.rs
use std::sync::Arc;

use log::debug;

use crate::domain::iss::{IssFetchLog, IssTrend};
use crate::error::{AppError, AppResult};
use crate::integrations::IssFeed;
use crate::repositories::{IssFetchLogRepository, Repository};
use crate::services::blocking;
use crate::specifications::LastNByIdDesc;

pub struct IssService {
    repo: Arc<dyn IssFetchLogRepository>,
    feed: Arc<dyn IssFeed>,
}

impl IssService {
    pub fn new(repo: Arc<dyn IssFetchLogRepository>, feed: Arc<dyn IssFeed>) -> Self {
        Self { repo, feed }
    }

    /// Fetch one position sample, store it and return the stored row.
    pub async fn fetch_and_store(&self) -> AppResult<IssFetchLog> {
        let payload = self.feed.fetch_position().await?;
        let record = IssFetchLog::new(self.feed.source_url(), payload);

        let repo = Arc::clone(&self.repo);
        let stored = blocking(move || {
            repo.save(&record)?;
            newest(repo.as_ref(), 1, &["*"])
        })
        .await?;

        let first = stored.into_iter().next().ok_or(AppError::NotFound)?;
        debug!("Stored ISS sample {:?}", first.id);
        Ok(first)
    }

    /// Most recent sample; `NotFound` before the first fetch.
    pub async fn last(&self) -> AppResult<IssFetchLog> {
        let repo = Arc::clone(&self.repo);
        let rows = blocking(move || newest(repo.as_ref(), 1, &["*"])).await?;
        rows.into_iter().next().ok_or(AppError::NotFound)
    }

    /// Movement between the two newest samples; empty with fewer than two.
    pub async fn trend(&self) -> AppResult<IssTrend> {
        let repo = Arc::clone(&self.repo);
        let rows = match blocking(move || newest(repo.as_ref(), 2, &["fetched_at", "payload"])).await {
            Ok(rows) => rows,
            Err(AppError::NotFound) => return Ok(IssTrend::default()),
            Err(e) => return Err(e),
        };

        if rows.len() < 2 {
            return Ok(IssTrend::default());
        }
        Ok(IssTrend::between(&rows[1], &rows[0]))
    }
}

fn newest(repo: &dyn IssFetchLogRepository, n: u64, fields: &[&str]) -> AppResult<Vec<IssFetchLog>> {
    let spec = LastNByIdDesc::new(repo.id_field_name(), n, fields.iter().copied());
    repo.find(&spec)
}
