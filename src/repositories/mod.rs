// src/repositories/mod.rs
//
// Repository layer
//
// CRITICAL RULES:
// - Repositories are DUMB data mappers
// - NO payload interpretation
// - NO retries
// - NO cross-repository calls
// - One generic implementation; record types only contribute metadata

pub mod columns;
pub mod query;
pub mod record;
pub mod sqlite_repository;

pub mod iss_fetch_log_repository;
pub mod osdr_item_repository;
pub mod space_cache_repository;

pub use columns::Columns;
pub use query::{Direction, Filter, InsertQuery, InsertValue, PlaceholderStyle, SelectQuery};
pub use record::{Insertable, Record};
pub use sqlite_repository::{Repository, SqliteRepository};

pub use iss_fetch_log_repository::{IssFetchLogRepository, SqliteIssFetchLogRepository};
pub use osdr_item_repository::{OsdrItemRepository, SqliteOsdrItemRepository};
pub use space_cache_repository::{SpaceCacheRepository, SqliteSpaceCacheRepository};
