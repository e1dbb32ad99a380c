//! TOML-file Catalog Store.
//!
//! The whole catalog is one document:
//!
//! ```toml
//! next_id = 3
//!
//! [[houses]]
//! key = "h1"
//! name = "Tower"
//! location = { lat = 53.9, lon = 27.6 }
//!
//! [[pois]]
//! id = 1
//! name = "Bakery"
//! ...
//!
//! [[review]]
//! user_id = "42"
//! ...
//! ```
//!
//! Every write goes through `AtomicTomlFile::update`, so concurrent
//! processes serialize on the lock file.

use crate::storage::{AtomicTomlError, AtomicTomlFile};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use poiedit_core::error::Result;
use poiedit_core::identity::Actor;
use poiedit_core::poi::{CatalogStore, House, Location, Poi};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::{debug, info};

/// A draft or note waiting for a moderator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewEntry {
    pub user_id: String,
    pub queued_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    pub poi: Poi,
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
struct CatalogDocument {
    next_id: i64,
    houses: Vec<House>,
    pois: Vec<Poi>,
    review: Vec<ReviewEntry>,
}

impl CatalogDocument {
    fn allocate_id(&mut self) -> i64 {
        let max_id = self.pois.iter().filter_map(|p| p.id).max().unwrap_or(0);
        self.next_id = self.next_id.max(max_id) + 1;
        self.next_id
    }

    fn find_mut(&mut self, id: i64) -> Option<&mut Poi> {
        self.pois.iter_mut().find(|p| p.id == Some(id))
    }
}

fn saved_id(poi: &Poi) -> std::result::Result<i64, AtomicTomlError> {
    poi.id
        .ok_or_else(|| AtomicTomlError::Rejected("POI was never saved".to_string()))
}

fn missing(id: i64) -> AtomicTomlError {
    AtomicTomlError::Rejected(format!("POI {} is not in the catalog", id))
}

pub struct TomlCatalogStore {
    file: AtomicTomlFile<CatalogDocument>,
}

impl TomlCatalogStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            file: AtomicTomlFile::new(path.into()),
        }
    }

    fn load(&self) -> Result<CatalogDocument> {
        Ok(self.file.load()?.unwrap_or_default())
    }

    fn update<R>(
        &self,
        f: impl FnOnce(&mut CatalogDocument) -> std::result::Result<R, AtomicTomlError>,
    ) -> Result<R> {
        Ok(self.file.update(CatalogDocument::default(), f)?)
    }

    /// Adds a house, replacing one with the same key.
    pub fn put_house(&self, house: House) -> Result<()> {
        self.update(|doc| {
            doc.houses.retain(|h| h.key != house.key);
            doc.houses.push(house);
            Ok(())
        })
    }

    /// Entries waiting for review, oldest first.
    pub fn review_queue(&self) -> Result<Vec<ReviewEntry>> {
        Ok(self.load()?.review)
    }

    pub fn all(&self) -> Result<Vec<Poi>> {
        Ok(self.load()?.pois)
    }
}

#[async_trait]
impl CatalogStore for TomlCatalogStore {
    async fn get_by_id(&self, id: i64) -> Result<Option<Poi>> {
        Ok(self.load()?.pois.into_iter().find(|p| p.id == Some(id)))
    }

    async fn get_around(
        &self,
        location: &Location,
        radius: f64,
        floor: Option<&str>,
    ) -> Result<Vec<Poi>> {
        let pois = self
            .load()?
            .pois
            .into_iter()
            .filter(|p| !p.is_deleted())
            .filter(|p| location.distance(&p.location) <= radius)
            .filter(|p| floor.is_none() || p.floor.as_deref() == floor)
            .collect::<Vec<_>>();
        debug!("{} POIs within {}m of {:?}", pois.len(), radius, location);
        Ok(pois)
    }

    async fn get_houses(&self) -> Result<Vec<House>> {
        Ok(self.load()?.houses)
    }

    async fn get_floors_by_house(&self, house: &str) -> Result<Vec<Option<String>>> {
        let mut floors: Vec<Option<String>> = Vec::new();
        for poi in self.load()?.pois {
            if poi.house.as_deref() == Some(house) && !floors.contains(&poi.floor) {
                floors.push(poi.floor);
            }
        }
        // Named floors in order, the floorless entry last
        floors.sort_by(|a, b| match (a, b) {
            (Some(a), Some(b)) => a.cmp(b),
            (Some(_), None) => std::cmp::Ordering::Less,
            (None, Some(_)) => std::cmp::Ordering::Greater,
            (None, None) => std::cmp::Ordering::Equal,
        });
        Ok(floors)
    }

    async fn insert(&self, actor: &Actor, poi: &Poi) -> Result<i64> {
        let id = self.update(|doc| {
            let mut stored = poi.clone();
            let id = match poi.id {
                Some(id) => {
                    doc.pois.retain(|p| p.id != Some(id));
                    id
                }
                None => doc.allocate_id(),
            };
            stored.id = Some(id);
            doc.pois.push(stored);
            Ok(id)
        })?;
        info!("POI {} stored by {}", id, actor.id);
        Ok(id)
    }

    async fn enqueue_for_review(&self, actor: &Actor, poi: &Poi, note: Option<&str>) -> Result<()> {
        self.update(|doc| {
            doc.review.push(ReviewEntry {
                user_id: actor.id.clone(),
                queued_at: Utc::now(),
                note: note.map(String::from),
                poi: poi.clone(),
            });
            Ok(())
        })?;
        info!("POI {:?} queued for review by {}", poi.id, actor.id);
        Ok(())
    }

    async fn soft_delete(&self, actor: &Actor, poi: &Poi, reason: &str) -> Result<()> {
        self.update(|doc| {
            let id = saved_id(poi)?;
            let stored = doc.find_mut(id).ok_or_else(|| missing(id))?;
            stored.delete_reason = Some(reason.to_string());
            Ok(())
        })?;
        info!("POI {:?} deleted by {}: {}", poi.id, actor.id, reason);
        Ok(())
    }

    async fn restore(&self, actor: &Actor, poi: &Poi) -> Result<()> {
        self.update(|doc| {
            let id = saved_id(poi)?;
            let stored = doc.find_mut(id).ok_or_else(|| missing(id))?;
            stored.delete_reason = None;
            Ok(())
        })?;
        info!("POI {:?} restored by {}", poi.id, actor.id);
        Ok(())
    }

    async fn hard_delete(&self, actor: &Actor, poi: &Poi) -> Result<()> {
        self.update(|doc| {
            let id = saved_id(poi)?;
            let before = doc.pois.len();
            doc.pois.retain(|p| p.id != Some(id));
            if doc.pois.len() == before {
                return Err(missing(id));
            }
            Ok(())
        })?;
        info!("POI {:?} removed by {}", poi.id, actor.id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn store() -> (TempDir, TomlCatalogStore) {
        let temp_dir = TempDir::new().unwrap();
        let store = TomlCatalogStore::new(temp_dir.path().join("catalog.toml"));
        (temp_dir, store)
    }

    fn poi(name: &str, lat: f64) -> Poi {
        Poi::new(name, Location::new(lat, 27.6), vec!["test".into()])
    }

    #[tokio::test]
    async fn test_insert_assigns_increasing_ids() {
        let (_dir, store) = store();
        let actor = Actor::moderator("1");
        let a = store.insert(&actor, &poi("Alpha", 53.9)).await.unwrap();
        let b = store.insert(&actor, &poi("Beta", 53.9)).await.unwrap();
        assert_eq!((a, b), (1, 2));

        let mut changed = store.get_by_id(a).await.unwrap().unwrap();
        changed.name = "Alpha two".into();
        assert_eq!(store.insert(&actor, &changed).await.unwrap(), a);
        assert_eq!(store.all().unwrap().len(), 2);
        assert_eq!(store.get_by_id(a).await.unwrap().unwrap().name, "Alpha two");
    }

    #[tokio::test]
    async fn test_soft_delete_needs_saved_poi() {
        let (_dir, store) = store();
        let actor = Actor::moderator("1");
        let err = store
            .soft_delete(&actor, &poi("Draft", 53.9), "gone")
            .await
            .unwrap_err();
        assert!(err.is_storage());

        let id = store.insert(&actor, &poi("Kiosk", 53.9)).await.unwrap();
        let saved = store.get_by_id(id).await.unwrap().unwrap();
        store.soft_delete(&actor, &saved, "gone").await.unwrap();
        assert!(store.get_by_id(id).await.unwrap().unwrap().is_deleted());

        store.restore(&actor, &saved).await.unwrap();
        assert!(!store.get_by_id(id).await.unwrap().unwrap().is_deleted());
    }

    #[tokio::test]
    async fn test_floors_by_house() {
        let (_dir, store) = store();
        let actor = Actor::moderator("1");
        for floor in [Some("2"), None, Some("1"), Some("2")] {
            let mut p = poi("Shop", 53.9);
            p.house = Some("h1".into());
            p.floor = floor.map(String::from);
            store.insert(&actor, &p).await.unwrap();
        }
        assert_eq!(
            store.get_floors_by_house("h1").await.unwrap(),
            vec![Some("1".to_string()), Some("2".to_string()), None]
        );
        assert!(store.get_floors_by_house("h2").await.unwrap().is_empty());
    }
}
