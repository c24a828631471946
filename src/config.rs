// src/config.rs
//
// Application configuration
//
// Layering, lowest to highest precedence:
// 1. built-in defaults
// 2. optional TOML file
// 3. environment variables
//
// Unparseable numeric environment values keep the lower layer's value.

use std::path::{Path, PathBuf};
use std::time::Duration;

use log::warn;
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::repositories::query::PlaceholderStyle;

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub database: DatabaseConfig,
    pub intervals: RefreshIntervals,
    pub endpoints: EndpointConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// `None` means `<data_dir>/skyfeed/skyfeed.db`.
    pub path: Option<PathBuf>,
    pub max_connections: u32,
    pub placeholder_style: PlaceholderStyle,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: None,
            max_connections: 15,
            placeholder_style: PlaceholderStyle::Question,
        }
    }
}

/// Seconds between refreshes, per source.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RefreshIntervals {
    pub osdr_secs: u64,
    pub iss_secs: u64,
    pub apod_secs: u64,
    pub neo_secs: u64,
    pub donki_secs: u64,
    pub spacex_secs: u64,
}

impl Default for RefreshIntervals {
    fn default() -> Self {
        Self {
            osdr_secs: 600,
            iss_secs: 120,
            apod_secs: 43_200, // 12h
            neo_secs: 7_200,   // 2h
            donki_secs: 3_600,
            spacex_secs: 3_600,
        }
    }
}

impl RefreshIntervals {
    pub fn osdr(&self) -> Duration {
        Duration::from_secs(self.osdr_secs)
    }

    pub fn iss(&self) -> Duration {
        Duration::from_secs(self.iss_secs)
    }

    pub fn apod(&self) -> Duration {
        Duration::from_secs(self.apod_secs)
    }

    pub fn neo(&self) -> Duration {
        Duration::from_secs(self.neo_secs)
    }

    pub fn donki(&self) -> Duration {
        Duration::from_secs(self.donki_secs)
    }

    pub fn spacex(&self) -> Duration {
        Duration::from_secs(self.spacex_secs)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct EndpointConfig {
    pub iss_url: String,
    pub iss_timeout_secs: u64,
    pub nasa_api_key: String,
    pub nasa_timeout_secs: u64,
    pub osdr_url: String,
    pub apod_url: String,
    pub neo_feed_url: String,
    pub donki_flr_url: String,
    pub donki_cme_url: String,
    pub spacex_url: String,
    pub spacex_timeout_secs: u64,
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self {
            iss_url: "https://api.wheretheiss.at/v1/satellites/25544".to_string(),
            iss_timeout_secs: 20,
            nasa_api_key: String::new(),
            nasa_timeout_secs: 30,
            osdr_url: "https://visualization.osdr.nasa.gov/biodata/api/v2/datasets/?format=json"
                .to_string(),
            apod_url: "https://api.nasa.gov/planetary/apod".to_string(),
            neo_feed_url: "https://api.nasa.gov/neo/rest/v1/feed".to_string(),
            donki_flr_url: "https://api.nasa.gov/DONKI/FLR".to_string(),
            donki_cme_url: "https://api.nasa.gov/DONKI/CME".to_string(),
            spacex_url: "https://api.spacexdata.com/v4/launches/next".to_string(),
            spacex_timeout_secs: 30,
        }
    }
}

impl AppConfig {
    /// Defaults, then `path` (if given), then the process environment.
    pub fn load(path: Option<&Path>) -> AppResult<Self> {
        let mut config = match path {
            Some(path) => Self::from_toml_file(path)?,
            None => Self::default(),
        };
        config.apply_env(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    pub fn from_toml_file(path: &Path) -> AppResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    pub fn from_toml_str(text: &str) -> AppResult<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Overlay values from `lookup` (normally `std::env::var`).
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(path) = lookup("DATABASE_PATH").filter(|p| !p.is_empty()) {
            self.database.path = Some(PathBuf::from(path));
        }
        override_number(&lookup, "DATABASE_MAX_CONNECTIONS", &mut self.database.max_connections);

        let intervals = &mut self.intervals;
        override_number(&lookup, "FETCH_EVERY_SECONDS", &mut intervals.osdr_secs);
        override_number(&lookup, "ISS_EVERY_SECONDS", &mut intervals.iss_secs);
        override_number(&lookup, "APOD_EVERY_SECONDS", &mut intervals.apod_secs);
        override_number(&lookup, "NEO_EVERY_SECONDS", &mut intervals.neo_secs);
        override_number(&lookup, "DONKI_EVERY_SECONDS", &mut intervals.donki_secs);
        override_number(&lookup, "SPACEX_EVERY_SECONDS", &mut intervals.spacex_secs);

        let endpoints = &mut self.endpoints;
        override_string(&lookup, "WHERE_ISS_URL", &mut endpoints.iss_url);
        override_number(&lookup, "ISS_CLIENT_TIMEOUT_SECONDS", &mut endpoints.iss_timeout_secs);
        override_string(&lookup, "NASA_API_KEY", &mut endpoints.nasa_api_key);
        override_number(&lookup, "NASA_CLIENT_TIMEOUT_SECONDS", &mut endpoints.nasa_timeout_secs);
        override_string(&lookup, "NASA_OSDR_URL", &mut endpoints.osdr_url);
        override_string(&lookup, "NASA_APOD_URL", &mut endpoints.apod_url);
        override_string(&lookup, "NASA_NEO_FEED_URL", &mut endpoints.neo_feed_url);
        override_string(&lookup, "NASA_DONKI_FLR_URL", &mut endpoints.donki_flr_url);
        override_string(&lookup, "NASA_DONKI_CME_URL", &mut endpoints.donki_cme_url);
        override_string(&lookup, "SPACEX_API_URL", &mut endpoints.spacex_url);
        override_number(&lookup, "SPACEX_CLIENT_TIMEOUT_SECONDS", &mut endpoints.spacex_timeout_secs);
    }

    /// Zero intervals would make a refresh loop spin; zero pool size cannot serve anything.
    pub fn validate(&self) -> AppResult<()> {
        if self.database.max_connections == 0 {
            return Err(AppError::Config("database.max_connections must be > 0".into()));
        }

        let intervals = [
            ("osdr_secs", self.intervals.osdr_secs),
            ("iss_secs", self.intervals.iss_secs),
            ("apod_secs", self.intervals.apod_secs),
            ("neo_secs", self.intervals.neo_secs),
            ("donki_secs", self.intervals.donki_secs),
            ("spacex_secs", self.intervals.spacex_secs),
        ];
        if let Some((name, _)) = intervals.iter().find(|(_, secs)| *secs == 0) {
            return Err(AppError::Config(format!("intervals.{} must be > 0", name)));
        }
        Ok(())
    }
}

fn override_string<F>(lookup: &F, key: &str, target: &mut String)
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(value) = lookup(key) {
        if !value.is_empty() {
            *target = value;
        }
    }
}

fn override_number<F, T>(lookup: &F, key: &str, target: &mut T)
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    let Some(raw) = lookup(key) else {
        return;
    };
    match raw.trim().parse::<T>() {
        Ok(value) => *target = value,
        Err(_) => warn!("Ignoring {}={:?}: not a valid number", key, raw),
    }
}
