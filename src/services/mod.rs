// src/services/mod.rs
//
// Services Module - Orchestration Layer
//
// Services pair a feed with a repository. Repository calls are synchronous,
// so they always run on the blocking pool and never stall the refresh tasks.

pub mod iss_service;
pub mod osdr_service;
pub mod space_service;
pub mod summary_service;

pub use iss_service::IssService;
pub use osdr_service::OsdrService;
pub use space_service::SpaceService;
pub use summary_service::{SpaceSummary, SummaryItem, SummaryService};

use crate::error::AppResult;

/// Run a repository closure on tokio's blocking pool.
pub(crate) async fn blocking<T, F>(work: F) -> AppResult<T>
where
    F: FnOnce() -> AppResult<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(work).await?
}
