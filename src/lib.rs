// src/lib.rs
// skyfeed - periodic cache of ISS, NASA and SpaceX feeds
//
// Architecture:
// - Repositories: one generic, schema-aware SQLite repository per record type
// - Specifications: declarative query shaping, no SQL in services
// - Scheduler: one supervised loop per source; failures stay local
// - Services: fetch-and-store plus read-side views over the cache

// ============================================================================
// FOUNDATION
// ============================================================================

pub mod config;
pub mod db;
pub mod domain;
pub mod error;
pub mod repositories;
pub mod specifications;

// ============================================================================
// RUNTIME
// ============================================================================

pub mod app;
pub mod integrations;
pub mod scheduler;
pub mod services;

// ============================================================================
// PUBLIC API - Domain
// ============================================================================

pub use domain::{DomainError, IssFetchLog, IssTrend, OsdrItem, SpaceCache, SpaceSource};

// ============================================================================
// PUBLIC API - Errors & Configuration
// ============================================================================

pub use config::AppConfig;
pub use error::{AppError, AppResult, UpstreamError};

// ============================================================================
// PUBLIC API - Database & Repositories
// ============================================================================

pub use db::{create_connection_pool, initialize_database, ConnectionPool};

pub use repositories::{
    IssFetchLogRepository, OsdrItemRepository, PlaceholderStyle, Repository,
    SpaceCacheRepository, SqliteIssFetchLogRepository, SqliteOsdrItemRepository,
    SqliteRepository, SqliteSpaceCacheRepository,
};

pub use specifications::{FindSpecification, LastNByIdDesc, LastNByKey, RecentList};

// ============================================================================
// PUBLIC API - Scheduler & Services
// ============================================================================

pub use scheduler::{OutcomeLog, OutcomeSink, RefreshScheduler, TaskOutcome, TaskState};

pub use services::{IssService, OsdrService, SpaceService, SpaceSummary, SummaryService};
