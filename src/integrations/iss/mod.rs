pub mod client;

pub use client::IssPositionFeed;
