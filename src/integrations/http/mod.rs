pub mod client;

pub use client::{with_api_key, HttpJsonClient};
