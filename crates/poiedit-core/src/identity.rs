//! Identity Provider trait and the resolved actor.

use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// A user as seen by the editor after identity resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    pub id: String,
    pub moderator: bool,
    /// Terminal messages offer to continue the review queue
    pub wants_review_prompt: bool,
}

impl Actor {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            moderator: false,
            wants_review_prompt: false,
        }
    }

    pub fn moderator(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            moderator: true,
            wants_review_prompt: false,
        }
    }

    pub fn is_moderator(&self) -> bool {
        self.moderator
    }
}

/// Resolves raw transport user ids into actors.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn resolve(&self, user_id: &str) -> Result<Actor>;
}
