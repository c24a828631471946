// src/error/mod.rs

pub mod types;
pub mod upstream;

pub use types::{AppError, AppResult};
pub use upstream::UpstreamError;
