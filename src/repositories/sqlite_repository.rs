// src/repositories/sqlite_repository.rs
//
// The one persistence implementation shared by every record type.
//
// RULES:
// - Knows nothing about any concrete table beyond its `Columns`
// - Read shaping comes from a `FindSpecification`
// - Every batch is one statement: it lands whole or not at all
// - NotFound only ever means "a read matched zero rows"

use std::marker::PhantomData;
use std::sync::Arc;

use log::debug;
use rusqlite::params_from_iter;
use rusqlite::types::Value;

use crate::db::ConnectionPool;
use crate::error::{AppError, AppResult};
use crate::repositories::columns::Columns;
use crate::repositories::query::{InsertQuery, InsertValue, PlaceholderStyle, SelectQuery};
use crate::repositories::record::{Insertable, Record};
use crate::specifications::FindSpecification;

/// Read model `R`, write model `W` (usually the same type).
pub trait Repository<R, W = R>: Send + Sync {
    /// Rows shaped by `spec`; `AppError::NotFound` when nothing matches.
    fn find(&self, spec: &dyn FindSpecification) -> AppResult<Vec<R>>;

    fn save(&self, record: &W) -> AppResult<()> {
        self.save_many(std::slice::from_ref(record))
    }

    /// Upsert all `records` in a single statement. Empty input is a no-op.
    fn save_many(&self, records: &[W]) -> AppResult<()>;

    fn count(&self) -> AppResult<i64>;

    fn id_field_name(&self) -> &str;
}

pub struct SqliteRepository<R, W = R> {
    pool: Arc<ConnectionPool>,
    columns: Columns,
    table: &'static str,
    placeholders: PlaceholderStyle,
    _records: PhantomData<fn() -> (R, W)>,
}

impl<R, W> SqliteRepository<R, W>
where
    R: Record,
    W: Insertable,
{
    pub fn new(
        pool: Arc<ConnectionPool>,
        columns: Columns,
        table: &'static str,
        placeholders: PlaceholderStyle,
    ) -> Self {
        Self {
            pool,
            columns,
            table,
            placeholders,
            _records: PhantomData,
        }
    }

    pub fn columns(&self) -> &Columns {
        &self.columns
    }

    pub fn table_name(&self) -> &'static str {
        self.table
    }

    /// Projected and shaped select for `spec`, before placeholder rendering.
    pub fn select_for(&self, spec: &dyn FindSpecification) -> SelectQuery {
        let fields = self.columns.for_select(&spec.fields());
        let base = SelectQuery::new(self.table)
            .alias(self.columns.alias())
            .columns(fields);
        spec.apply(base)
    }

    /// `(identity-or-marker, writable values...)` for one record.
    fn row_values(&self, record: &W) -> AppResult<Vec<InsertValue>> {
        let values = record.values()?;
        let expected = self.columns.for_insert().len();
        if values.len() != expected {
            return Err(AppError::QueryBuild(format!(
                "record for '{}' supplied {} values, expected {}",
                self.table,
                values.len(),
                expected
            )));
        }

        let identity = match record.id() {
            Some(id) => InsertValue::Bound(to_value(id)?),
            None => InsertValue::GenerateIdentity,
        };

        let mut row = Vec::with_capacity(values.len() + 1);
        row.push(identity);
        row.extend(values.into_iter().map(InsertValue::Bound));
        Ok(row)
    }

    /// Multi-row upsert covering the whole batch.
    pub fn upsert_for(&self, records: &[W]) -> AppResult<InsertQuery> {
        let mut columns = vec![self.columns.id_field()];
        columns.extend(self.columns.for_insert());

        let mut query = InsertQuery::new(self.table).columns(columns);
        for record in records {
            query = query.row(self.row_values(record)?);
        }

        // Natural key first; the identity clause still catches explicit-id updates.
        if let Some(natural_key) = self.columns.natural_key() {
            query = query.suffix(self.columns.on_conflict_for(natural_key));
        }
        Ok(query.suffix(self.columns.on_conflict()))
    }
}

fn to_value<T: rusqlite::ToSql + ?Sized>(id: &T) -> AppResult<Value> {
    let output = id.to_sql()?;
    Ok(match output {
        rusqlite::types::ToSqlOutput::Borrowed(value) => value.into(),
        rusqlite::types::ToSqlOutput::Owned(value) => value,
        _ => {
            return Err(AppError::QueryBuild(
                "unsupported identity representation".to_string(),
            ))
        }
    })
}

impl<R, W> Repository<R, W> for SqliteRepository<R, W>
where
    R: Record,
    W: Insertable,
{
    fn find(&self, spec: &dyn FindSpecification) -> AppResult<Vec<R>> {
        let (sql, args) = self.select_for(spec).to_sql(self.placeholders)?;
        debug!("find on {}: {}", self.table, sql);

        let conn = self.pool.get()?;
        let mut stmt = conn.prepare(&sql)?;
        let records = stmt
            .query_map(params_from_iter(args.iter()), R::from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        if records.is_empty() {
            return Err(AppError::NotFound);
        }
        Ok(records)
    }

    fn save_many(&self, records: &[W]) -> AppResult<()> {
        if records.is_empty() {
            return Ok(());
        }

        let (sql, args) = self.upsert_for(records)?.to_sql(self.placeholders)?;
        debug!("save {} row(s) into {}", records.len(), self.table);

        let conn = self.pool.get()?;
        conn.execute(&sql, params_from_iter(args.iter()))?;
        Ok(())
    }

    fn count(&self) -> AppResult<i64> {
        let conn = self.pool.get()?;
        let count = conn.query_row(&format!("SELECT COUNT(*) FROM {}", self.table), [], |row| {
            row.get(0)
        })?;
        Ok(count)
    }

    fn id_field_name(&self) -> &str {
        self.columns.id_field()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::create_pool_at;
    use crate::repositories::record::{column_or_default, text_value};
    use crate::specifications::{LastNByIdDesc, LastNByKey};
    use tempfile::TempDir;

    // Test-only record with a NOT NULL column we can violate on purpose.
    #[derive(Debug, Clone, PartialEq)]
    struct Note {
        id: Option<i64>,
        label: Option<String>,
        body: String,
    }

    impl Note {
        fn new(label: &str, body: &str) -> Self {
            Self {
                id: None,
                label: Some(label.to_string()),
                body: body.to_string(),
            }
        }
    }

    impl Record for Note {
        fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
            Ok(Self {
                id: column_or_default(row, "id")?,
                label: column_or_default(row, "label")?,
                body: column_or_default(row, "body")?,
            })
        }
    }

    impl Insertable for Note {
        type Id = i64;

        fn id(&self) -> Option<&i64> {
            self.id.as_ref()
        }

        fn values(&self) -> AppResult<Vec<Value>> {
            Ok(vec![text_value(self.label.as_deref()), Value::Text(self.body.clone())])
        }
    }

    const NOTE_COLUMNS: Columns = Columns::new(&["id", "label", "body"], &["label", "body"], "n", "id");
    const KEYED_COLUMNS: Columns =
        Columns::new(&["id", "label", "body"], &["label", "body"], "n", "id").with_natural_key("label");

    fn setup(columns: Columns, unique_label: bool) -> (TempDir, SqliteRepository<Note>) {
        let dir = TempDir::new().unwrap();
        let pool = Arc::new(create_pool_at(&dir.path().join("notes.db"), 4).unwrap());
        let unique = if unique_label { " UNIQUE" } else { "" };
        pool.get()
            .unwrap()
            .execute_batch(&format!(
                "CREATE TABLE notes (
                    id INTEGER PRIMARY KEY AUTOINCREMENT,
                    label TEXT NOT NULL{},
                    body TEXT NOT NULL
                )",
                unique
            ))
            .unwrap();
        let repo = SqliteRepository::new(pool, columns, "notes", PlaceholderStyle::Numbered);
        (dir, repo)
    }

    fn latest(repo: &SqliteRepository<Note>, n: u64) -> AppResult<Vec<Note>> {
        repo.find(&LastNByIdDesc::new(repo.id_field_name(), n, ["*"]))
    }

    #[test]
    fn test_empty_table_is_not_found() {
        let (_dir, repo) = setup(NOTE_COLUMNS, false);

        let err = latest(&repo, 5).unwrap_err();
        assert!(err.is_not_found());
        assert!(!err.is_storage());
    }

    #[test]
    fn test_unset_identity_gets_fresh_id() {
        let (_dir, repo) = setup(NOTE_COLUMNS, false);

        repo.save(&Note::new("a", "first")).unwrap();
        repo.save(&Note::new("b", "second")).unwrap();

        let newest = latest(&repo, 1).unwrap();
        assert_eq!(newest.len(), 1);
        assert_eq!(newest[0].id, Some(2));
        assert_eq!(newest[0].body, "second");
    }

    #[test]
    fn test_explicit_identity_updates_in_place() {
        let (_dir, repo) = setup(NOTE_COLUMNS, false);
        repo.save(&Note::new("a", "draft")).unwrap();

        let mut stored = latest(&repo, 1).unwrap().remove(0);
        stored.body = "final".to_string();
        repo.save(&stored).unwrap();

        assert_eq!(repo.count().unwrap(), 1);
        assert_eq!(latest(&repo, 1).unwrap()[0].body, "final");
    }

    #[test]
    fn test_last_n_is_strictly_descending() {
        let (_dir, repo) = setup(NOTE_COLUMNS, false);
        let batch: Vec<Note> = (0..5).map(|i| Note::new("x", &format!("n{}", i))).collect();
        repo.save_many(&batch).unwrap();

        let ids: Vec<i64> = latest(&repo, 3).unwrap().iter().filter_map(|n| n.id).collect();
        assert_eq!(ids, vec![5, 4, 3]);
    }

    #[test]
    fn test_natural_key_collapses_rows() {
        let (_dir, repo) = setup(KEYED_COLUMNS, true);
        repo.save(&Note::new("k", "v1")).unwrap();
        let before = repo.count().unwrap();

        repo.save(&Note::new("k", "v2")).unwrap();

        assert_eq!(repo.count().unwrap(), before);
        let rows = repo
            .find(&LastNByKey::new("id", "label", "k".to_string(), 10))
            .unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].body, "v2");
        assert_eq!(rows[0].id, Some(1));
    }

    #[test]
    fn test_failed_batch_leaves_nothing_behind() {
        let (_dir, repo) = setup(NOTE_COLUMNS, false);
        let broken = Note {
            id: None,
            label: None,
            body: "violates NOT NULL".to_string(),
        };
        let batch = vec![Note::new("a", "1"), Note::new("b", "2"), broken];

        let err = repo.save_many(&batch).unwrap_err();

        assert!(err.is_storage());
        assert_eq!(repo.count().unwrap(), 0);
        assert!(latest(&repo, 10).unwrap_err().is_not_found());
    }

    #[test]
    fn test_missing_table_is_storage_error() {
        let dir = TempDir::new().unwrap();
        let pool = Arc::new(create_pool_at(&dir.path().join("empty.db"), 1).unwrap());
        let repo: SqliteRepository<Note> =
            SqliteRepository::new(pool, NOTE_COLUMNS, "notes", PlaceholderStyle::Question);

        assert!(repo.save(&Note::new("a", "b")).unwrap_err().is_storage());
        assert!(latest(&repo, 1).unwrap_err().is_storage());
        assert!(repo.count().unwrap_err().is_storage());
    }

    #[test]
    fn test_empty_batch_is_noop() {
        let (_dir, repo) = setup(NOTE_COLUMNS, false);
        repo.save_many(&[]).unwrap();
        assert_eq!(repo.count().unwrap(), 0);
    }

    #[test]
    fn test_partial_projection_decodes() {
        let (_dir, repo) = setup(NOTE_COLUMNS, false);
        repo.save(&Note::new("a", "body")).unwrap();

        let rows = repo
            .find(&LastNByIdDesc::new("id", 1, ["body"]))
            .unwrap();
        assert_eq!(rows[0].id, None);
        assert_eq!(rows[0].label, None);
        assert_eq!(rows[0].body, "body");
    }

    #[test]
    fn test_upsert_statement_shape() {
        let (_dir, repo) = setup(KEYED_COLUMNS, true);
        let (sql, args) = repo
            .upsert_for(&[Note::new("k", "v")])
            .unwrap()
            .to_sql(PlaceholderStyle::Numbered)
            .unwrap();

        assert_eq!(
            sql,
            "INSERT INTO notes (id, label, body) VALUES (NULL, ?1, ?2) \
             ON CONFLICT (label) DO UPDATE SET label = excluded.label, body = excluded.body \
             ON CONFLICT (id) DO UPDATE SET label = excluded.label, body = excluded.body"
        );
        assert_eq!(args.len(), 2);
    }
}
