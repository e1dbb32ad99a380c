//! Catalog Store trait.

use super::model::{House, Location, Poi};
use crate::error::Result;
use crate::identity::Actor;
use async_trait::async_trait;

/// Persistent catalog of POIs.
///
/// The editor only reads through this trait while a session runs; every
/// write happens on a terminal command (save, delete, restore). Failures
/// are reported as `PoiError::Storage`.
#[async_trait]
pub trait CatalogStore: Send + Sync {
    /// Finds a POI by its catalog id.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(Poi))`: POI found
    /// - `Ok(None)`: no POI with this id
    async fn get_by_id(&self, id: i64) -> Result<Option<Poi>>;

    /// Lists POIs within `radius` meters of `location`, optionally limited
    /// to one floor.
    async fn get_around(
        &self,
        location: &Location,
        radius: f64,
        floor: Option<&str>,
    ) -> Result<Vec<Poi>>;

    /// Lists every known house.
    async fn get_houses(&self) -> Result<Vec<House>>;

    /// Lists floors observed on POIs referencing the house. `None` entries
    /// stand for POIs without a floor.
    async fn get_floors_by_house(&self, house: &str) -> Result<Vec<Option<String>>>;

    /// Stores the draft (insert or overwrite) and returns its id.
    async fn insert(&self, actor: &Actor, poi: &Poi) -> Result<i64>;

    /// Queues the draft, with an optional note, for moderator review.
    async fn enqueue_for_review(&self, actor: &Actor, poi: &Poi, note: Option<&str>)
    -> Result<()>;

    /// Marks the POI deleted with the given reason.
    async fn soft_delete(&self, actor: &Actor, poi: &Poi, reason: &str) -> Result<()>;

    /// Clears a soft delete.
    async fn restore(&self, actor: &Actor, poi: &Poi) -> Result<()>;

    /// Removes the POI permanently.
    async fn hard_delete(&self, actor: &Actor, poi: &Poi) -> Result<()>;
}
