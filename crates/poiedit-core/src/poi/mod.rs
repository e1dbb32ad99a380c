//! POI domain module.
//!
//! - `model`: the draft entity and its value types
//! - `catalog`: the Catalog Store collaborator

mod catalog;
mod model;

pub use catalog::CatalogStore;
pub use model::{BoundingBox, House, Link, Location, Poi};
