//! Domain types and collaborator traits of the POI editor.
//!
//! The editing session lives in `poiedit-application`; this crate holds
//! what it talks about (`Poi`, attributes, opening hours) and who it talks
//! to (catalog, identity, messaging, photos, notifications, texts).

pub mod config;
pub mod error;
pub mod fields;
pub mod gateway;
pub mod hours;
pub mod identity;
pub mod notifier;
pub mod photo;
pub mod poi;
pub mod text;
pub mod view;

pub use error::{FieldError, PoiError, Result};
