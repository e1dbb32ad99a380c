//! Photo Store trait.
//!
//! Photos are addressed by name only; the store decides where the bytes
//! live.

use crate::error::Result;
use async_trait::async_trait;

#[async_trait]
pub trait PhotoStore: Send + Sync {
    /// Whether a photo with this name is present.
    async fn exists(&self, name: &str) -> bool;

    /// Writes the photo bytes under `name`.
    async fn save(&self, name: &str, bytes: &[u8]) -> Result<()>;

    /// Removes the photo. Removing a missing photo is not an error.
    async fn remove(&self, name: &str) -> Result<()>;

    /// Returns the name a previous upload was stored under.
    async fn find_by_upload(&self, upload_id: &str) -> Result<Option<String>>;

    /// Remembers which name an upload was stored under.
    async fn remember_upload(&self, name: &str, upload_id: &str) -> Result<()>;
}
