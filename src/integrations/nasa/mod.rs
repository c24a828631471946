pub mod client;

pub use client::{last_days, NasaFeeds, DONKI_WINDOW_DAYS, NEO_WINDOW_DAYS};
