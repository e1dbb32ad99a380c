//! File storage primitives shared by the TOML-backed stores.

pub mod atomic_toml;

pub use atomic_toml::{AtomicTomlError, AtomicTomlFile};
