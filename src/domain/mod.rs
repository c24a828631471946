// src/domain/mod.rs
//
// Domain Root - record types persisted by the refresh tasks
//
// Payloads are opaque: nothing here validates or normalises upstream data
// beyond reading a coordinate out of an ISS sample.

// ============================================================================
// MODULE DECLARATIONS
// ============================================================================

pub mod iss;
pub mod osdr;
pub mod space;

// ============================================================================
// PUBLIC API RE-EXPORTS
// ============================================================================

pub use iss::{haversine_km, IssFetchLog, IssTrend};
pub use osdr::{items_from_catalogue, OsdrItem};
pub use space::{SpaceCache, SpaceSource};

// ============================================================================
// DOMAIN ERROR TYPES
// ============================================================================

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Unknown space source: {0}")]
    UnknownSource(String),
}
