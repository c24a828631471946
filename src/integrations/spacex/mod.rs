pub mod client;

pub use client::SpaceXFeed;
