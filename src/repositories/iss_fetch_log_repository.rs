// src/repositories/iss_fetch_log_repository.rs
//
// ISS fetch log persistence: column metadata and row mapping only.

use std::sync::Arc;

use rusqlite::types::Value;
use rusqlite::Row;

use crate::db::ConnectionPool;
use crate::domain::iss::IssFetchLog;
use crate::error::AppResult;
use crate::repositories::columns::Columns;
use crate::repositories::query::PlaceholderStyle;
use crate::repositories::record::{column_or_default, json_column, json_value, timestamp_column, Insertable, Record};
use crate::repositories::sqlite_repository::{Repository, SqliteRepository};

pub const ISS_FETCH_LOG_TABLE: &str = "iss_fetch_log";

/// `fetched_at` is filled by the store on insert, so it is read-only here.
pub const ISS_FETCH_LOG_COLUMNS: Columns = Columns::new(
    &["id", "fetched_at", "source_url", "payload"],
    &["source_url", "payload"],
    "ifl",
    "id",
);

pub trait IssFetchLogRepository: Repository<IssFetchLog> {}

impl<T: Repository<IssFetchLog>> IssFetchLogRepository for T {}

pub type SqliteIssFetchLogRepository = SqliteRepository<IssFetchLog>;

impl SqliteIssFetchLogRepository {
    pub fn with_pool(pool: Arc<ConnectionPool>, placeholders: PlaceholderStyle) -> Self {
        SqliteRepository::new(pool, ISS_FETCH_LOG_COLUMNS, ISS_FETCH_LOG_TABLE, placeholders)
    }
}

impl Record for IssFetchLog {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(IssFetchLog {
            id: column_or_default(row, "id")?,
            fetched_at: timestamp_column(row, "fetched_at")?,
            source_url: column_or_default(row, "source_url")?,
            payload: json_column(row, "payload")?,
        })
    }
}

impl Insertable for IssFetchLog {
    type Id = i64;

    fn id(&self) -> Option<&i64> {
        self.id.as_ref()
    }

    fn values(&self) -> AppResult<Vec<Value>> {
        Ok(vec![
            Value::Text(self.source_url.clone()),
            json_value(&self.payload)?,
        ])
    }
}
