//! Notifier that writes broadcasts to the log.
//!
//! Used by the console front-end, where there are no other users to reach.

use async_trait::async_trait;
use poiedit_core::error::Result;
use poiedit_core::notifier::Notifier;

#[derive(Debug, Clone, Default)]
pub struct TracingNotifier;

#[async_trait]
impl Notifier for TracingNotifier {
    async fn broadcast(&self, text: &str, exclude: Option<&str>) -> Result<()> {
        tracing::info!(target: "poiedit::broadcast", exclude = ?exclude, "{}", text);
        Ok(())
    }
}
