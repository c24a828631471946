// src/app/jobs.rs
//
// Refresh job wiring
//
// One scheduler task per upstream feed. DONKI flares and CMEs share a task
// and are cached in a single batch.

use std::sync::Arc;

use crate::config::RefreshIntervals;
use crate::domain::space::SpaceSource;
use crate::error::AppResult;
use crate::scheduler::RefreshScheduler;
use crate::services::{IssService, OsdrService, SpaceService};

pub const APOD_SOURCES: &[SpaceSource] = &[SpaceSource::Apod];
pub const NEO_SOURCES: &[SpaceSource] = &[SpaceSource::Neo];
pub const DONKI_SOURCES: &[SpaceSource] = &[SpaceSource::Flr, SpaceSource::Cme];
pub const SPACEX_SOURCES: &[SpaceSource] = &[SpaceSource::Spacex];

/// Services the refresh jobs drive
pub struct RefreshServices {
    pub iss: Arc<IssService>,
    pub osdr: Arc<OsdrService>,
    pub space: Arc<SpaceService>,
}

pub fn register_refresh_jobs(
    scheduler: &mut RefreshScheduler,
    services: &RefreshServices,
    intervals: &RefreshIntervals,
) -> AppResult<()> {
    let osdr = Arc::clone(&services.osdr);
    scheduler.register("osdr", intervals.osdr(), move || {
        let osdr = Arc::clone(&osdr);
        async move { osdr.sync().await.map(|_| ()) }
    })?;

    let iss = Arc::clone(&services.iss);
    scheduler.register("iss", intervals.iss(), move || {
        let iss = Arc::clone(&iss);
        async move { iss.fetch_and_store().await.map(|_| ()) }
    })?;

    register_space_job(scheduler, "apod", intervals.apod(), &services.space, APOD_SOURCES)?;
    register_space_job(scheduler, "neo", intervals.neo(), &services.space, NEO_SOURCES)?;
    register_space_job(scheduler, "donki", intervals.donki(), &services.space, DONKI_SOURCES)?;
    register_space_job(scheduler, "spacex", intervals.spacex(), &services.space, SPACEX_SOURCES)?;

    Ok(())
}

fn register_space_job(
    scheduler: &mut RefreshScheduler,
    name: &str,
    every: std::time::Duration,
    space: &Arc<SpaceService>,
    sources: &'static [SpaceSource],
) -> AppResult<()> {
    let space = Arc::clone(space);
    scheduler.register(name, every, move || {
        let space = Arc::clone(&space);
        async move { space.refresh(sources).await.map(|_| ()) }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::create_test_pool;
    use crate::integrations::{MockIssFeed, MockOsdrFeed, MockSpaceFeed};
    use crate::repositories::{
        PlaceholderStyle, SqliteIssFetchLogRepository, SqliteOsdrItemRepository,
        SqliteSpaceCacheRepository,
    };
    use crate::scheduler::OutcomeLog;
    use serde_json::json;
    use std::time::Duration;
    use tokio_util::sync::CancellationToken;

    fn services(space_feed: MockSpaceFeed) -> (tempfile::TempDir, RefreshServices) {
        let (dir, pool) = create_test_pool();
        let style = PlaceholderStyle::Question;

        let mut iss_feed = MockIssFeed::new();
        iss_feed.expect_source_url().return_const("https://iss".to_string());
        iss_feed
            .expect_fetch_position()
            .returning(|| Ok(json!({"latitude": 1.0, "longitude": 2.0})));
        let mut osdr_feed = MockOsdrFeed::new();
        osdr_feed
            .expect_fetch_datasets()
            .returning(|| Ok(json!({"OSD-1": {"v": 1}})));

        let services = RefreshServices {
            iss: Arc::new(IssService::new(
                Arc::new(SqliteIssFetchLogRepository::with_pool(Arc::clone(&pool), style)),
                Arc::new(iss_feed),
            )),
            osdr: Arc::new(OsdrService::new(
                Arc::new(SqliteOsdrItemRepository::with_pool(Arc::clone(&pool), style)),
                Arc::new(osdr_feed),
            )),
            space: Arc::new(SpaceService::new(
                Arc::new(SqliteSpaceCacheRepository::with_pool(pool, style)),
                Arc::new(space_feed),
            )),
        };
        (dir, services)
    }

    #[test]
    fn test_registers_one_task_per_feed() {
        let (_dir, services) = services(MockSpaceFeed::new());
        let mut scheduler = RefreshScheduler::default();

        register_refresh_jobs(&mut scheduler, &services, &RefreshIntervals::default()).unwrap();

        assert_eq!(
            scheduler.task_names(),
            vec!["osdr", "iss", "apod", "neo", "donki", "spacex"]
        );
    }

    #[test]
    fn test_zero_interval_is_rejected() {
        let (_dir, services) = services(MockSpaceFeed::new());
        let mut scheduler = RefreshScheduler::default();
        let intervals = RefreshIntervals {
            neo_secs: 0,
            ..RefreshIntervals::default()
        };

        assert!(register_refresh_jobs(&mut scheduler, &services, &intervals).is_err());
    }

    #[tokio::test]
    async fn test_first_round_fills_every_table() {
        let mut space_feed = MockSpaceFeed::new();
        space_feed
            .expect_fetch()
            .returning(|source| Ok(json!({"source": source.as_str()})));
        let (_dir, services) = services(space_feed);

        let log = Arc::new(OutcomeLog::new());
        let mut scheduler = RefreshScheduler::new(log.clone());
        register_refresh_jobs(&mut scheduler, &services, &RefreshIntervals::default()).unwrap();

        let cancel = CancellationToken::new();
        let handle = tokio::spawn(scheduler.run(cancel.clone()));
        tokio::time::sleep(Duration::from_millis(300)).await;
        cancel.cancel();
        handle.await.unwrap();

        for task in ["osdr", "iss", "apod", "neo", "donki", "spacex"] {
            assert_eq!(log.successes(task), 1, "task {}", task);
        }
        assert!(services.iss.last().await.is_ok());
        assert_eq!(services.osdr.list(10).await.unwrap().len(), 1);
        for source in SpaceSource::ALL {
            assert!(services.space.latest(source).await.is_ok(), "source {}", source);
        }
    }
}
