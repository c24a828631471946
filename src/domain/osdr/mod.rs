pub mod entity;

pub use entity::{items_from_catalogue, OsdrItem};
