pub mod entity;

pub use entity::{SpaceCache, SpaceSource};
