// src/main.rs
//
// skyfeed daemon: keeps the local cache of space feeds fresh until Ctrl+C.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use log::{error, info};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use skyfeed::app::{register_refresh_jobs, RefreshServices};
use skyfeed::config::AppConfig;
use skyfeed::db::{create_connection_pool, get_connection, get_database_stats, initialize_database};
use skyfeed::integrations::{IssPositionFeed, NasaFeeds, SpaceFeeds, SpaceXFeed};
use skyfeed::repositories::*;
use skyfeed::scheduler::RefreshScheduler;
use skyfeed::services::{IssService, OsdrService, SpaceService, SummaryService};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // 1. CONFIGURATION
    let config_path = std::env::args()
        .nth(1)
        .or_else(|| std::env::var("SKYFEED_CONFIG").ok())
        .map(PathBuf::from);
    let config = AppConfig::load(config_path.as_deref()).context("Failed to load configuration")?;
    let style = config.database.placeholder_style;

    // 2. INFRASTRUCTURE
    let pool = Arc::new(create_connection_pool(&config.database).context("Failed to open database")?);
    {
        let conn = get_connection(&pool)?;
        initialize_database(&conn).context("Failed to migrate database")?;
        let stats = get_database_stats(&conn)?;
        info!(
            "Database ready: {} ISS samples, {} OSDR items, {} cached space items ({} bytes)",
            stats.iss_fetch_count, stats.osdr_item_count, stats.space_cache_count, stats.size_bytes
        );
    }

    // 3. REPOSITORIES
    let iss_repo: Arc<dyn IssFetchLogRepository> =
        Arc::new(SqliteIssFetchLogRepository::with_pool(pool.clone(), style));
    let osdr_repo: Arc<dyn OsdrItemRepository> =
        Arc::new(SqliteOsdrItemRepository::with_pool(pool.clone(), style));
    let space_repo: Arc<dyn SpaceCacheRepository> =
        Arc::new(SqliteSpaceCacheRepository::with_pool(pool.clone(), style));

    // 4. FEEDS
    let endpoints = &config.endpoints;
    let iss_feed = Arc::new(IssPositionFeed::from_config(endpoints)?);
    let nasa_feed = Arc::new(NasaFeeds::from_config(endpoints)?);
    let space_feed = Arc::new(SpaceFeeds::new(
        NasaFeeds::from_config(endpoints)?,
        SpaceXFeed::from_config(endpoints)?,
    ));

    // 5. SERVICES
    let services = RefreshServices {
        iss: Arc::new(IssService::new(iss_repo.clone(), iss_feed)),
        osdr: Arc::new(OsdrService::new(osdr_repo.clone(), nasa_feed)),
        space: Arc::new(SpaceService::new(space_repo.clone(), space_feed)),
    };
    let summary = SummaryService::new(space_repo, iss_repo, osdr_repo);
    match summary.summary().await {
        Ok(snapshot) => info!(
            "Cached on startup: {} OSDR datasets, ISS sample {}",
            snapshot.osdr_count,
            if snapshot.iss.is_empty() { "missing" } else { "present" }
        ),
        Err(e) => error!("Could not read startup summary: {}", e),
    }

    // 6. SCHEDULER
    let mut scheduler = RefreshScheduler::default();
    register_refresh_jobs(&mut scheduler, &services, &config.intervals)?;

    let cancel = CancellationToken::new();
    let shutdown = cancel.clone();
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => info!("Received Ctrl+C, stopping refresh tasks"),
            Err(e) => error!("Failed to listen for Ctrl+C: {}", e),
        }
        shutdown.cancel();
    });

    info!("skyfeed running {} refresh task(s)", scheduler.task_names().len());
    scheduler.run(cancel).await;

    info!("skyfeed stopped");
    Ok(())
}
