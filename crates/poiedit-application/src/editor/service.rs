//! Per-user session registry.

use super::context::EditorContext;
use super::prompts;
use super::state::{EditSession, EditState, Flow};
use super::summary::SummaryRenderer;
use poiedit_core::error::Result;
use poiedit_core::gateway::{Button, Callback, ChoiceSet, Inbound, OutgoingMessage};
use poiedit_core::identity::{Actor, IdentityProvider};
use poiedit_core::poi::Poi;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};

type SessionSlot = Arc<Mutex<Option<EditSession>>>;

/// Entry point for inbound events.
///
/// Each user owns one slot guarded by its own mutex, so events of one user
/// are handled strictly one after another while different users proceed in
/// parallel.
pub struct EditorService {
    ctx: Arc<EditorContext>,
    identity: Arc<dyn IdentityProvider>,
    sessions: RwLock<HashMap<String, SessionSlot>>,
}

impl EditorService {
    pub fn new(ctx: Arc<EditorContext>, identity: Arc<dyn IdentityProvider>) -> Self {
        Self {
            ctx,
            identity,
            sessions: RwLock::new(HashMap::new()),
        }
    }

    pub fn context(&self) -> &EditorContext {
        &self.ctx
    }

    async fn slot(&self, user_id: &str) -> SessionSlot {
        if let Some(slot) = self.sessions.read().await.get(user_id) {
            return slot.clone();
        }
        let mut sessions = self.sessions.write().await;
        sessions
            .entry(user_id.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(None)))
            .clone()
    }

    /// Drops the slot of a user without a session once no other event holds it.
    async fn release(&self, user_id: &str, slot: SessionSlot) {
        let mut sessions = self.sessions.write().await;
        // One reference in the map and ours.
        if Arc::strong_count(&slot) > 2 {
            return;
        }
        let idle = matches!(slot.try_lock(), Ok(current) if current.is_none());
        if idle {
            sessions.remove(user_id);
        }
    }

    /// Handles one event from `user_id`.
    ///
    /// An error from the session drops it; the draft was never durable.
    pub async fn handle(&self, user_id: &str, event: Inbound) -> Result<()> {
        let actor = self.identity.resolve(user_id).await?;
        let slot = self.slot(user_id).await;
        let result = {
            let mut current = slot.lock().await;
            self.dispatch(user_id, &actor, &mut current, event).await
        };
        self.release(user_id, slot).await;
        result
    }

    async fn dispatch(
        &self,
        user_id: &str,
        actor: &Actor,
        current: &mut Option<EditSession>,
        event: Inbound,
    ) -> Result<()> {
        let ctx = &*self.ctx;

        if let Inbound::Choice { callback, origin } = &event {
            match callback {
                Callback::New | Callback::Edit { .. } if ctx.config.maintenance => {
                    tracing::info!("Refusing to start an edit for {} during maintenance", user_id);
                    ctx.send(user_id, OutgoingMessage::text(ctx.text("maintenance")))
                        .await?;
                    return Ok(());
                }
                Callback::New => {
                    if let Some(mut old) = current.take() {
                        old.retract(ctx, user_id, *origin).await;
                    }
                    *current = Some(EditSession::start_new(ctx, actor).await?);
                    return Ok(());
                }
                Callback::Edit { poi_id } => {
                    let Some(poi) = ctx.catalog.get_by_id(*poi_id).await? else {
                        self.not_found(user_id, *poi_id).await?;
                        return Ok(());
                    };
                    if let Some(mut old) = current.take() {
                        old.retract(ctx, user_id, *origin).await;
                    }
                    *current = Some(EditSession::start_edit(ctx, actor, poi).await?);
                    return Ok(());
                }
                Callback::Look { poi_id } if current.is_none() => {
                    return self.look(user_id, *poi_id).await;
                }
                _ => {}
            }
        }

        let Some(session) = current.as_mut() else {
            tracing::debug!("No session for {}, ignoring {:?}", user_id, event);
            self.idle(user_id, actor).await?;
            return Ok(());
        };
        match session.handle(ctx, actor, event).await {
            Ok(Flow::Continue) => Ok(()),
            Ok(Flow::Finished) => {
                tracing::debug!("Session of {} finished", user_id);
                *current = None;
                Ok(())
            }
            Err(e) => {
                tracing::error!("Session of {} aborted: {}", user_id, e);
                *current = None;
                Err(e)
            }
        }
    }

    /// Observable state of the user's session, if one is open.
    pub async fn state(&self, user_id: &str) -> Option<EditState> {
        let slot = self.sessions.read().await.get(user_id).cloned()?;
        let current = slot.lock().await;
        current.as_ref().map(EditSession::state)
    }

    /// A copy of the user's draft, if the session has one.
    pub async fn draft(&self, user_id: &str) -> Option<Poi> {
        let slot = self.sessions.read().await.get(user_id).cloned()?;
        let current = slot.lock().await;
        current.as_ref().and_then(|s| s.draft().cloned())
    }

    /// Number of users with an open session or an event in flight.
    pub async fn open_sessions(&self) -> usize {
        self.sessions.read().await.len()
    }

    async fn not_found(&self, user_id: &str, poi_id: i64) -> Result<()> {
        let ctx = &*self.ctx;
        let id = poi_id.to_string();
        let text = ctx.format("editor.not_found", &[("id", id.as_str())]);
        ctx.send(user_id, OutgoingMessage::text(text)).await?;
        Ok(())
    }

    /// Shows a catalog POI with an option to edit it.
    async fn look(&self, user_id: &str, poi_id: i64) -> Result<()> {
        let ctx = &*self.ctx;
        let Some(poi) = ctx.catalog.get_by_id(poi_id).await? else {
            return self.not_found(user_id, poi_id).await;
        };
        let view = SummaryRenderer::new(&*ctx.texts, &ctx.config).render(&poi, Some(""));
        let choices = ChoiceSet::new().row(vec![Button::action(
            format!("✏️ {}", ctx.text("editor.edit")),
            Callback::Edit { poi_id },
        )]);
        ctx.send(user_id, OutgoingMessage::summary(view).with_choices(choices))
            .await?;
        Ok(())
    }

    async fn idle(&self, user_id: &str, actor: &Actor) -> Result<()> {
        let ctx = &*self.ctx;
        let message = OutgoingMessage::text(ctx.text("menu.idle"))
            .with_choices(prompts::terminal(&*ctx.texts, actor));
        ctx.send(user_id, message).await?;
        Ok(())
    }
}
