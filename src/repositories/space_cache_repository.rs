// src/repositories/space_cache_repository.rs
//
// Space feed cache persistence. Append-only in practice: every refresh adds
// a row and readers take the newest one per source.

use std::sync::Arc;

use rusqlite::types::Value;
use rusqlite::Row;

use crate::db::ConnectionPool;
use crate::domain::space::{SpaceCache, SpaceSource};
use crate::error::AppResult;
use crate::repositories::columns::Columns;
use crate::repositories::query::PlaceholderStyle;
use crate::repositories::record::{
    column_or_default, format_timestamp, json_column, json_value, parse_timestamp, Insertable,
    Record,
};
use crate::repositories::sqlite_repository::{Repository, SqliteRepository};

pub const SPACE_CACHE_TABLE: &str = "space_cache";

pub const SPACE_CACHE_COLUMNS: Columns = Columns::new(
    &["id", "source", "fetched_at", "payload"],
    &["source", "fetched_at", "payload"],
    "sc",
    "id",
);

pub trait SpaceCacheRepository: Repository<SpaceCache> {}

impl<T: Repository<SpaceCache>> SpaceCacheRepository for T {}

pub type SqliteSpaceCacheRepository = SqliteRepository<SpaceCache>;

impl SqliteSpaceCacheRepository {
    pub fn with_pool(pool: Arc<ConnectionPool>, placeholders: PlaceholderStyle) -> Self {
        SqliteRepository::new(pool, SPACE_CACHE_COLUMNS, SPACE_CACHE_TABLE, placeholders)
    }
}

impl Record for SpaceCache {
    /// `source` and `fetched_at` have no sensible default, so projections must include them.
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        let source_str: String = row.get("source")?;
        let source = source_str
            .parse::<SpaceSource>()
            .map_err(|e| rusqlite::Error::ToSqlConversionFailure(Box::new(e)))?;

        let fetched_at_str: String = row.get("fetched_at")?;

        Ok(SpaceCache {
            id: column_or_default(row, "id")?,
            source,
            fetched_at: parse_timestamp(&fetched_at_str)?,
            payload: json_column(row, "payload")?,
        })
    }
}

impl Insertable for SpaceCache {
    type Id = i64;

    fn id(&self) -> Option<&i64> {
        self.id.as_ref()
    }

    fn values(&self) -> AppResult<Vec<Value>> {
        Ok(vec![
            Value::Text(self.source.as_str().to_string()),
            Value::Text(format_timestamp(&self.fetched_at)),
            json_value(&self.payload)?,
        ])
    }
}
