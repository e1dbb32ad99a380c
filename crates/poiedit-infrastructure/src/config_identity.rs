//! Identity Provider driven by the moderator and reviewer lists in
//! `config.toml`.

use async_trait::async_trait;
use poiedit_core::config::EditorConfig;
use poiedit_core::error::Result;
use poiedit_core::identity::{Actor, IdentityProvider};
use std::collections::HashSet;

#[derive(Debug, Clone, Default)]
pub struct ConfigIdentityProvider {
    moderators: HashSet<String>,
    reviewers: HashSet<String>,
}

impl ConfigIdentityProvider {
    pub fn new(config: &EditorConfig) -> Self {
        Self {
            moderators: config.moderators.iter().cloned().collect(),
            reviewers: config.reviewers.iter().cloned().collect(),
        }
    }
}

#[async_trait]
impl IdentityProvider for ConfigIdentityProvider {
    async fn resolve(&self, user_id: &str) -> Result<Actor> {
        let mut actor = Actor::new(user_id);
        actor.moderator = self.moderators.contains(user_id);
        // Only moderators review the queue
        actor.wants_review_prompt = actor.moderator && self.reviewers.contains(user_id);
        Ok(actor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_roles_from_config() {
        let config = EditorConfig {
            moderators: vec!["1".into(), "2".into()],
            reviewers: vec!["2".into(), "3".into()],
            ..EditorConfig::default()
        };
        let identity = ConfigIdentityProvider::new(&config);

        let plain = identity.resolve("9").await.unwrap();
        assert!(!plain.is_moderator());

        let moderator = identity.resolve("1").await.unwrap();
        assert!(moderator.is_moderator());
        assert!(!moderator.wants_review_prompt);

        assert!(identity.resolve("2").await.unwrap().wants_review_prompt);
        assert!(!identity.resolve("3").await.unwrap().wants_review_prompt);
    }
}
