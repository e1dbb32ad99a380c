use poiedit_core::config::EditorConfig;
use poiedit_core::error::Result;
use poiedit_core::gateway::{MessageHandle, MessagingGateway, OutgoingMessage};
use poiedit_core::hours::HoursGrammar;
use poiedit_core::notifier::Notifier;
use poiedit_core::photo::PhotoStore;
use poiedit_core::poi::CatalogStore;
use poiedit_core::text::TextResolver;
use std::sync::Arc;

/// Collaborators and configuration shared by every session.
pub struct EditorContext {
    pub catalog: Arc<dyn CatalogStore>,
    pub gateway: Arc<dyn MessagingGateway>,
    pub texts: Arc<dyn TextResolver>,
    pub notifier: Arc<dyn Notifier>,
    pub photos: Arc<dyn PhotoStore>,
    pub config: Arc<EditorConfig>,
    grammar: HoursGrammar,
}

impl EditorContext {
    pub fn new(
        catalog: Arc<dyn CatalogStore>,
        gateway: Arc<dyn MessagingGateway>,
        texts: Arc<dyn TextResolver>,
        notifier: Arc<dyn Notifier>,
        photos: Arc<dyn PhotoStore>,
        config: Arc<EditorConfig>,
    ) -> Self {
        let grammar = config.hours.grammar();
        Self {
            catalog,
            gateway,
            texts,
            notifier,
            photos,
            config,
            grammar,
        }
    }

    pub fn grammar(&self) -> &HoursGrammar {
        &self.grammar
    }

    pub fn text(&self, key: &str) -> String {
        self.texts.text(key)
    }

    pub fn format(&self, key: &str, params: &[(&str, &str)]) -> String {
        self.texts.format(key, params)
    }

    pub async fn send(&self, user: &str, message: OutgoingMessage) -> Result<MessageHandle> {
        self.gateway.send(user, message).await
    }

    /// Broadcasts a text; a failing notifier only logs.
    pub async fn announce(&self, text: &str, exclude: Option<&str>) {
        if let Err(e) = self.notifier.broadcast(text, exclude).await {
            tracing::warn!("Failed to broadcast notification: {}", e);
        }
    }
}
