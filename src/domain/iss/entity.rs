use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One raw response from the ISS position feed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IssFetchLog {
    /// Store-assigned identity, `None` until saved
    pub id: Option<i64>,

    /// Capture time, assigned by the store on insert
    pub fetched_at: Option<DateTime<Utc>>,

    /// Endpoint the payload came from
    pub source_url: String,

    /// Upstream document, stored as-is
    pub payload: serde_json::Value,
}

impl IssFetchLog {
    pub fn new(source_url: impl Into<String>, payload: serde_json::Value) -> Self {
        Self {
            id: None,
            fetched_at: None,
            source_url: source_url.into(),
            payload,
        }
    }

    /// Numeric field of the payload; numeric strings are accepted too.
    pub fn payload_number(&self, key: &str) -> Option<f64> {
        match self.payload.get(key)? {
            serde_json::Value::Number(n) => n.as_f64(),
            serde_json::Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }
}
