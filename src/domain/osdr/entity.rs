use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One dataset entry from the NASA OSDR catalogue
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OsdrItem {
    /// Store-assigned identity, `None` until saved
    pub id: Option<i64>,

    /// Catalogue key; one row per dataset
    pub dataset_id: Option<String>,

    pub title: Option<String>,

    pub status: Option<String>,

    /// Reset by the store whenever an existing dataset is overwritten
    pub updated_at: Option<DateTime<Utc>>,

    /// Assigned by the store on first insert
    pub inserted_at: Option<DateTime<Utc>>,

    /// Catalogue entry, stored as-is
    pub raw: serde_json::Value,
}

impl OsdrItem {
    /// Entry keyed by its catalogue id, titled with the same key.
    pub fn from_catalogue_entry(key: impl Into<String>, raw: serde_json::Value) -> Self {
        let key = key.into();
        Self {
            id: None,
            dataset_id: Some(key.clone()),
            title: Some(key),
            status: None,
            updated_at: None,
            inserted_at: None,
            raw,
        }
    }
}

/// Split a catalogue document into items: one per key whose value is an object.
///
/// Returns `None` when the document itself is not an object.
pub fn items_from_catalogue(document: &serde_json::Value) -> Option<Vec<OsdrItem>> {
    let entries = document.as_object()?;
    Some(
        entries
            .iter()
            .filter(|(_, value)| value.is_object())
            .map(|(key, value)| OsdrItem::from_catalogue_entry(key.as_str(), value.clone()))
            .collect(),
    )
}
