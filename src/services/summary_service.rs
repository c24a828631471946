// src/services/summary_service.rs
//
// One-shot snapshot of everything cached: the newest item per space source,
// the newest ISS sample and the OSDR dataset count.
//
// Missing data is never an error here; a source that has nothing (or cannot
// be read) shows up as an empty item.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use log::{error, warn};
use serde::Serialize;

use crate::domain::space::SpaceSource;
use crate::error::{AppError, AppResult};
use crate::repositories::{IssFetchLogRepository, OsdrItemRepository, Repository, SpaceCacheRepository};
use crate::services::blocking;
use crate::services::space_service::latest_cached;
use crate::specifications::LastNByIdDesc;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SummaryItem {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payload: Option<serde_json::Value>,
}

impl SummaryItem {
    pub fn is_empty(&self) -> bool {
        self.at.is_none() && self.payload.is_none()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SpaceSummary {
    pub apod: SummaryItem,
    pub neo: SummaryItem,
    pub flr: SummaryItem,
    pub cme: SummaryItem,
    pub spacex: SummaryItem,
    pub iss: SummaryItem,
    pub osdr_count: i64,
}

impl SpaceSummary {
    fn slot_mut(&mut self, source: SpaceSource) -> &mut SummaryItem {
        match source {
            SpaceSource::Apod => &mut self.apod,
            SpaceSource::Neo => &mut self.neo,
            SpaceSource::Flr => &mut self.flr,
            SpaceSource::Cme => &mut self.cme,
            SpaceSource::Spacex => &mut self.spacex,
        }
    }
}

pub struct SummaryService {
    space_repo: Arc<dyn SpaceCacheRepository>,
    iss_repo: Arc<dyn IssFetchLogRepository>,
    osdr_repo: Arc<dyn OsdrItemRepository>,
}

impl SummaryService {
    pub fn new(
        space_repo: Arc<dyn SpaceCacheRepository>,
        iss_repo: Arc<dyn IssFetchLogRepository>,
        osdr_repo: Arc<dyn OsdrItemRepository>,
    ) -> Self {
        Self {
            space_repo,
            iss_repo,
            osdr_repo,
        }
    }

    pub async fn summary(&self) -> AppResult<SpaceSummary> {
        let space_repo = Arc::clone(&self.space_repo);
        let iss_repo = Arc::clone(&self.iss_repo);
        let osdr_repo = Arc::clone(&self.osdr_repo);

        blocking(move || {
            let mut summary = SpaceSummary::default();

            for source in SpaceSource::ALL {
                let item = match latest_cached(space_repo.as_ref(), source) {
                    Ok(rows) => rows
                        .into_iter()
                        .next()
                        .map(|row| SummaryItem {
                            at: Some(row.fetched_at),
                            payload: Some(row.payload),
                        })
                        .unwrap_or_default(),
                    Err(e) => empty_item(source.as_str(), e),
                };
                *summary.slot_mut(source) = item;
            }

            let spec = LastNByIdDesc::new(iss_repo.id_field_name(), 1, ["fetched_at", "payload"]);
            summary.iss = match iss_repo.find(&spec) {
                Ok(rows) => rows
                    .into_iter()
                    .next()
                    .map(|row| SummaryItem {
                        at: row.fetched_at,
                        payload: Some(row.payload),
                    })
                    .unwrap_or_default(),
                Err(e) => empty_item("iss", e),
            };

            summary.osdr_count = osdr_repo.count().unwrap_or_else(|e| {
                error!("Error counting OSDR items: {}", e);
                0
            });

            Ok(summary)
        })
        .await
    }
}

fn empty_item(name: &str, err: AppError) -> SummaryItem {
    if !err.is_not_found() {
        warn!("Summary could not read {}: {}", name, err);
    }
    SummaryItem::default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::create_test_pool;
    use crate::domain::iss::IssFetchLog;
    use crate::domain::osdr::OsdrItem;
    use crate::domain::space::SpaceCache;
    use crate::repositories::{
        PlaceholderStyle, SqliteIssFetchLogRepository, SqliteOsdrItemRepository,
        SqliteSpaceCacheRepository,
    };
    use serde_json::json;

    struct Fixture {
        _dir: tempfile::TempDir,
        space: Arc<SqliteSpaceCacheRepository>,
        iss: Arc<SqliteIssFetchLogRepository>,
        osdr: Arc<SqliteOsdrItemRepository>,
    }

    impl Fixture {
        fn new() -> Self {
            let (dir, pool) = create_test_pool();
            let style = PlaceholderStyle::Question;
            Self {
                space: Arc::new(SqliteSpaceCacheRepository::with_pool(Arc::clone(&pool), style)),
                iss: Arc::new(SqliteIssFetchLogRepository::with_pool(Arc::clone(&pool), style)),
                osdr: Arc::new(SqliteOsdrItemRepository::with_pool(pool, style)),
                _dir: dir,
            }
        }

        fn service(&self) -> SummaryService {
            SummaryService::new(self.space.clone(), self.iss.clone(), self.osdr.clone())
        }
    }

    #[tokio::test]
    async fn test_empty_store_gives_empty_summary() {
        let fixture = Fixture::new();

        let summary = fixture.service().summary().await.unwrap();

        assert_eq!(summary, SpaceSummary::default());
        assert!(summary.apod.is_empty());
        assert_eq!(serde_json::to_value(&summary.iss).unwrap(), json!({}));
    }

    #[tokio::test]
    async fn test_summary_picks_newest_per_source() {
        let fixture = Fixture::new();
        fixture
            .space
            .save_many(&[
                SpaceCache::new(SpaceSource::Apod, json!({"title": "old"})),
                SpaceCache::new(SpaceSource::Apod, json!({"title": "new"})),
                SpaceCache::new(SpaceSource::Neo, json!({"element_count": 7})),
            ])
            .unwrap();
        fixture
            .iss
            .save(&IssFetchLog::new("https://iss", json!({"latitude": 12.0})))
            .unwrap();
        fixture
            .osdr
            .save_many(&[
                OsdrItem::from_catalogue_entry("OSD-1", json!({})),
                OsdrItem::from_catalogue_entry("OSD-2", json!({})),
            ])
            .unwrap();

        let summary = fixture.service().summary().await.unwrap();

        assert_eq!(summary.apod.payload.as_ref().unwrap()["title"], "new");
        assert_eq!(summary.neo.payload.as_ref().unwrap()["element_count"], 7);
        assert!(summary.flr.is_empty());
        assert!(summary.spacex.is_empty());
        assert!(summary.iss.at.is_some());
        assert_eq!(summary.iss.payload.as_ref().unwrap()["latitude"], 12.0);
        assert_eq!(summary.osdr_count, 2);
    }
}
