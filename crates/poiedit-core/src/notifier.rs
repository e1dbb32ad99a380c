//! Notifier trait.

use crate::error::Result;
use async_trait::async_trait;

/// Fans a text out to every subscribed user.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Broadcasts `text`, skipping `exclude` when given.
    async fn broadcast(&self, text: &str, exclude: Option<&str>) -> Result<()>;
}
