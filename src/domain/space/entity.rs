use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::DomainError;

/// Feeds cached in `space_cache`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpaceSource {
    /// NASA Astronomy Picture of the Day
    Apod,
    /// NASA near-earth object feed
    Neo,
    /// DONKI solar flares
    Flr,
    /// DONKI coronal mass ejections
    Cme,
    /// SpaceX next launch
    Spacex,
}

impl SpaceSource {
    pub const ALL: [SpaceSource; 5] = [
        SpaceSource::Apod,
        SpaceSource::Neo,
        SpaceSource::Flr,
        SpaceSource::Cme,
        SpaceSource::Spacex,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SpaceSource::Apod => "apod",
            SpaceSource::Neo => "neo",
            SpaceSource::Flr => "flr",
            SpaceSource::Cme => "cme",
            SpaceSource::Spacex => "spacex",
        }
    }
}

impl fmt::Display for SpaceSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SpaceSource {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "apod" => Ok(SpaceSource::Apod),
            "neo" => Ok(SpaceSource::Neo),
            "flr" => Ok(SpaceSource::Flr),
            "cme" => Ok(SpaceSource::Cme),
            "spacex" => Ok(SpaceSource::Spacex),
            other => Err(DomainError::UnknownSource(other.to_string())),
        }
    }
}

/// One cached response from a space feed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpaceCache {
    /// Store-assigned identity, `None` until saved
    pub id: Option<i64>,

    pub source: SpaceSource,

    /// Client-side capture time
    pub fetched_at: DateTime<Utc>,

    /// Upstream document, stored as-is
    pub payload: serde_json::Value,
}

impl SpaceCache {
    pub fn new(source: SpaceSource, payload: serde_json::Value) -> Self {
        Self {
            id: None,
            source,
            fetched_at: Utc::now(),
            payload,
        }
    }
}
