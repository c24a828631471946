// src/repositories/osdr_item_repository.rs
//
// OSDR dataset persistence. Datasets collapse to one row per `dataset_id`;
// overwriting one resets `updated_at` to the store clock.

use std::sync::Arc;

use rusqlite::types::Value;
use rusqlite::Row;

use crate::db::ConnectionPool;
use crate::domain::osdr::OsdrItem;
use crate::error::AppResult;
use crate::repositories::columns::Columns;
use crate::repositories::query::PlaceholderStyle;
use crate::repositories::record::{
    column_or_default, json_column, json_value, text_value, timestamp_column, timestamp_value,
    Insertable, Record,
};
use crate::repositories::sqlite_repository::{Repository, SqliteRepository};

pub const OSDR_ITEMS_TABLE: &str = "osdr_items";

pub const OSDR_ITEM_COLUMNS: Columns = Columns::new(
    &["id", "dataset_id", "title", "status", "updated_at", "inserted_at", "raw"],
    &["dataset_id", "title", "status", "updated_at", "raw"],
    "oi",
    "id",
)
.with_natural_key("dataset_id")
.with_last_modified("updated_at");

pub trait OsdrItemRepository: Repository<OsdrItem> {}

impl<T: Repository<OsdrItem>> OsdrItemRepository for T {}

pub type SqliteOsdrItemRepository = SqliteRepository<OsdrItem>;

impl SqliteOsdrItemRepository {
    pub fn with_pool(pool: Arc<ConnectionPool>, placeholders: PlaceholderStyle) -> Self {
        SqliteRepository::new(pool, OSDR_ITEM_COLUMNS, OSDR_ITEMS_TABLE, placeholders)
    }
}

impl Record for OsdrItem {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(OsdrItem {
            id: column_or_default(row, "id")?,
            dataset_id: column_or_default(row, "dataset_id")?,
            title: column_or_default(row, "title")?,
            status: column_or_default(row, "status")?,
            updated_at: timestamp_column(row, "updated_at")?,
            inserted_at: timestamp_column(row, "inserted_at")?,
            raw: json_column(row, "raw")?,
        })
    }
}

impl Insertable for OsdrItem {
    type Id = i64;

    fn id(&self) -> Option<&i64> {
        self.id.as_ref()
    }

    fn values(&self) -> AppResult<Vec<Value>> {
        Ok(vec![
            text_value(self.dataset_id.as_deref()),
            text_value(self.title.as_deref()),
            text_value(self.status.as_deref()),
            timestamp_value(self.updated_at.as_ref()),
            json_value(&self.raw)?,
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::create_test_pool;
    use crate::specifications::{LastNByKey, RecentList};
    use serde_json::json;

    fn by_dataset(repo: &SqliteOsdrItemRepository, key: &str) -> Vec<OsdrItem> {
        repo.find(&LastNByKey::new("id", "dataset_id", key.to_string(), 10))
            .unwrap()
    }

    #[test]
    fn test_same_dataset_collapses_and_touches_updated_at() {
        let (_dir, pool) = create_test_pool();
        let repo = SqliteOsdrItemRepository::with_pool(pool, PlaceholderStyle::Question);

        repo.save(&OsdrItem::from_catalogue_entry("OSD-1", json!({"v": 1})))
            .unwrap();
        let first = by_dataset(&repo, "OSD-1").remove(0);
        assert_eq!(first.updated_at, None);
        assert!(first.inserted_at.is_some());

        let mut again = OsdrItem::from_catalogue_entry("OSD-1", json!({"v": 2}));
        again.status = Some("public".to_string());
        repo.save(&again).unwrap();

        let rows = by_dataset(&repo, "OSD-1");
        assert_eq!(repo.count().unwrap(), 1);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].id, first.id);
        assert_eq!(rows[0].raw["v"], 2);
        assert_eq!(rows[0].status.as_deref(), Some("public"));
        assert!(rows[0].updated_at.is_some());
        assert_eq!(rows[0].inserted_at, first.inserted_at);
    }

    #[test]
    fn test_client_updated_at_ignored_on_conflict() {
        let (_dir, pool) = create_test_pool();
        let repo = SqliteOsdrItemRepository::with_pool(pool, PlaceholderStyle::Numbered);
        repo.save(&OsdrItem::from_catalogue_entry("OSD-9", json!({})))
            .unwrap();

        let stale = chrono::DateTime::parse_from_rfc3339("2001-01-01T00:00:00Z")
            .unwrap()
            .with_timezone(&chrono::Utc);
        let mut update = OsdrItem::from_catalogue_entry("OSD-9", json!({}));
        update.updated_at = Some(stale);
        repo.save(&update).unwrap();

        let stored = by_dataset(&repo, "OSD-9").remove(0);
        assert!(stored.updated_at.unwrap() > stale);
    }

    #[test]
    fn test_batch_with_repeated_key_in_later_call() {
        let (_dir, pool) = create_test_pool();
        let repo = SqliteOsdrItemRepository::with_pool(pool, PlaceholderStyle::Dollar);

        repo.save_many(&[
            OsdrItem::from_catalogue_entry("A", json!({})),
            OsdrItem::from_catalogue_entry("B", json!({})),
        ])
        .unwrap();
        repo.save_many(&[
            OsdrItem::from_catalogue_entry("B", json!({"second": true})),
            OsdrItem::from_catalogue_entry("C", json!({})),
        ])
        .unwrap();

        assert_eq!(repo.count().unwrap(), 3);
        assert_eq!(by_dataset(&repo, "B")[0].raw["second"], true);
    }

    #[test]
    fn test_recent_list_is_newest_first() {
        let (_dir, pool) = create_test_pool();
        let repo = SqliteOsdrItemRepository::with_pool(pool, PlaceholderStyle::Question);
        for key in ["A", "B", "C"] {
            repo.save(&OsdrItem::from_catalogue_entry(key, json!({})))
                .unwrap();
            std::thread::sleep(std::time::Duration::from_millis(5));
        }

        let titles: Vec<String> = repo
            .find(&RecentList::new("inserted_at", 2))
            .unwrap()
            .into_iter()
            .filter_map(|item| item.title)
            .collect();
        assert_eq!(titles, vec!["C", "B"]);
    }

    #[test]
    fn test_null_dataset_ids_do_not_collide() {
        let (_dir, pool) = create_test_pool();
        let repo = SqliteOsdrItemRepository::with_pool(pool, PlaceholderStyle::Question);
        let mut anonymous = OsdrItem::from_catalogue_entry("x", json!({}));
        anonymous.dataset_id = None;

        repo.save_many(&[anonymous.clone(), anonymous]).unwrap();
        assert_eq!(repo.count().unwrap(), 2);
    }
}
