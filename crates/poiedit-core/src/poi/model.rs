//! POI domain model.
//!
//! `Poi` is the draft entity a session edits. It is owned by exactly one
//! session and only reaches the catalog on an explicit save.

use crate::hours::OpeningHours;
use serde::{Deserialize, Serialize};

/// Mean Earth radius used for distance estimates, in meters.
const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// A WGS84 coordinate pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub lat: f64,
    pub lon: f64,
}

impl Location {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Great-circle distance to another location, in meters.
    pub fn distance(&self, other: &Location) -> f64 {
        let (lat1, lat2) = (self.lat.to_radians(), other.lat.to_radians());
        let dlat = lat2 - lat1;
        let dlon = (other.lon - self.lon).to_radians();
        let a = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
        2.0 * EARTH_RADIUS_M * a.sqrt().asin()
    }
}

/// Area that accepted locations must fall into.
///
/// Serialized as `[min_lon, min_lat, max_lon, max_lat]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 4]", into = "[f64; 4]")]
pub struct BoundingBox {
    pub min_lon: f64,
    pub min_lat: f64,
    pub max_lon: f64,
    pub max_lat: f64,
}

impl BoundingBox {
    pub fn contains(&self, location: &Location) -> bool {
        self.min_lon <= location.lon
            && location.lon <= self.max_lon
            && self.min_lat <= location.lat
            && location.lat <= self.max_lat
    }

    pub fn center(&self) -> Location {
        Location::new(
            (self.min_lat + self.max_lat) / 2.0,
            (self.min_lon + self.max_lon) / 2.0,
        )
    }
}

impl From<[f64; 4]> for BoundingBox {
    fn from(v: [f64; 4]) -> Self {
        Self {
            min_lon: v[0],
            min_lat: v[1],
            max_lon: v[2],
            max_lat: v[3],
        }
    }
}

impl From<BoundingBox> for [f64; 4] {
    fn from(b: BoundingBox) -> Self {
        [b.min_lon, b.min_lat, b.max_lon, b.max_lat]
    }
}

/// A labelled hyperlink attached to a POI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    pub label: String,
    pub url: String,
}

impl Link {
    pub fn new(label: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            url: url.into(),
        }
    }
}

/// A building other POIs can reference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct House {
    /// Stable reference stored on POIs
    pub key: String,
    pub name: String,
    pub location: Location,
}

/// Draft point of interest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Poi {
    /// Catalog id; `None` until the POI is first saved
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Moderator note
    #[serde(default)]
    pub comment: Option<String>,
    /// `key=value` classification
    #[serde(default)]
    pub tag: Option<String>,
    /// Unique tokens in insertion order
    #[serde(default)]
    pub keywords: Vec<String>,
    pub location: Location,
    /// Key of the referenced house
    #[serde(default)]
    pub house: Option<String>,
    #[serde(default)]
    pub house_name: Option<String>,
    #[serde(default)]
    pub floor: Option<String>,
    #[serde(default)]
    pub address_part: Option<String>,
    /// Canonical rule text, always set together with `hours`
    #[serde(default)]
    pub hours_src: Option<String>,
    #[serde(default)]
    pub hours: Option<OpeningHours>,
    #[serde(default)]
    pub phones: Vec<String>,
    #[serde(default)]
    pub links: Vec<Link>,
    /// `None` means unknown, which is not the same as `Some(false)`
    #[serde(default)]
    pub has_wifi: Option<bool>,
    #[serde(default)]
    pub accepts_cards: Option<bool>,
    #[serde(default)]
    pub photo_out: Option<String>,
    #[serde(default)]
    pub photo_in: Option<String>,
    /// Present when the POI is soft-deleted
    #[serde(default)]
    pub delete_reason: Option<String>,
    #[serde(default)]
    pub needs_check: bool,
}

impl Poi {
    /// Creates the draft produced by the creation path.
    pub fn new(name: impl Into<String>, location: Location, keywords: Vec<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
            description: None,
            comment: None,
            tag: None,
            keywords,
            location,
            house: None,
            house_name: None,
            floor: None,
            address_part: None,
            hours_src: None,
            hours: None,
            phones: Vec::new(),
            links: Vec::new(),
            has_wifi: None,
            accepts_cards: None,
            photo_out: None,
            photo_in: None,
            delete_reason: None,
            needs_check: false,
        }
    }

    pub fn is_persisted(&self) -> bool {
        self.id.is_some()
    }

    pub fn is_deleted(&self) -> bool {
        self.delete_reason.is_some()
    }

    /// Keywords joined with single spaces.
    pub fn keywords_text(&self) -> String {
        self.keywords.join(" ")
    }

    /// Phones joined the way they are shown to users.
    pub fn phones_text(&self) -> String {
        self.phones.join("; ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bbox_contains() {
        let bbox = BoundingBox::from([27.4, 53.8, 27.8, 54.0]);
        assert!(bbox.contains(&Location::new(53.9, 27.6)));
        assert!(!bbox.contains(&Location::new(55.75, 37.61)));
        // Edges are inclusive
        assert!(bbox.contains(&Location::new(53.8, 27.4)));
    }

    #[test]
    fn test_distance() {
        let a = Location::new(53.9, 27.6);
        assert_eq!(a.distance(&a), 0.0);
        // 0.001 degrees of latitude is roughly 111 meters
        let b = Location::new(53.901, 27.6);
        let d = a.distance(&b);
        assert!((d - 111.2).abs() < 1.0, "distance was {}", d);
    }

    #[test]
    fn test_new_poi_is_blank() {
        let poi = Poi::new("Cafe", Location::new(1.0, 2.0), vec!["coffee".into()]);
        assert!(!poi.is_persisted());
        assert!(!poi.is_deleted());
        assert_eq!(poi.has_wifi, None);
        assert_eq!(poi.keywords_text(), "coffee");
    }
}
