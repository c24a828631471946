pub mod entity;
pub mod trend;

pub use entity::IssFetchLog;
pub use trend::{haversine_km, IssTrend};
