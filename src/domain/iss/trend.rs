use chrono::{DateTime, Utc};
use serde::Serialize;

use super::entity::IssFetchLog;

const EARTH_RADIUS_KM: f64 = 6371.0;

/// Below this the station is considered stationary between two samples.
const MOVEMENT_THRESHOLD_KM: f64 = 0.1;

/// Movement of the station between the two most recent samples
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct IssTrend {
    pub movement: bool,
    pub delta_km: f64,
    pub dt_sec: f64,
    pub velocity_kmh: Option<f64>,
    pub from_time: Option<DateTime<Utc>>,
    pub to_time: Option<DateTime<Utc>>,
    pub from_lat: Option<f64>,
    pub from_lon: Option<f64>,
    pub to_lat: Option<f64>,
    pub to_lon: Option<f64>,
}

impl IssTrend {
    /// Compare an older sample with a newer one.
    pub fn between(from: &IssFetchLog, to: &IssFetchLog) -> Self {
        let from_lat = from.payload_number("latitude");
        let from_lon = from.payload_number("longitude");
        let to_lat = to.payload_number("latitude");
        let to_lon = to.payload_number("longitude");

        let delta_km = match (from_lat, from_lon, to_lat, to_lon) {
            (Some(lat1), Some(lon1), Some(lat2), Some(lon2)) => haversine_km(lat1, lon1, lat2, lon2),
            _ => 0.0,
        };

        let dt_sec = match (from.fetched_at, to.fetched_at) {
            (Some(start), Some(end)) => (end - start).num_milliseconds() as f64 / 1000.0,
            _ => 0.0,
        };

        Self {
            movement: delta_km > MOVEMENT_THRESHOLD_KM,
            delta_km,
            dt_sec,
            velocity_kmh: to.payload_number("velocity"),
            from_time: from.fetched_at,
            to_time: to.fetched_at,
            from_lat,
            from_lon,
            to_lat,
            to_lon,
        }
    }
}

/// Great-circle distance in kilometres.
pub fn haversine_km(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let rlat1 = lat1.to_radians();
    let rlat2 = lat2.to_radians();
    let dlat = (lat2 - lat1).to_radians();
    let dlon = (lon2 - lon1).to_radians();

    let a = (dlat / 2.0).sin().powi(2) + rlat1.cos() * rlat2.cos() * (dlon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_KM * c
}
