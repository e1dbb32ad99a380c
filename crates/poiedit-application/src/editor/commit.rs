//! Terminal commands: the only places where the catalog is written.
//!
//! A storage failure never ends the session. The user is told, the draft
//! stays as it was and the summary options are offered again. Catalog reads
//! made while editing (houses, floors, neighbours) recover the same way.

use super::context::EditorContext;
use super::prompts;
use super::state::{EditSession, Flow, Mode};
use poiedit_core::error::{PoiError, Result};
use poiedit_core::fields::Attribute;
use poiedit_core::gateway::{
    Button, Callback, ChoiceSet, Inbound, MessageHandle, OutgoingMessage,
};
use poiedit_core::identity::Actor;
use tracing::{debug, error, info};

impl EditSession {
    /// Commits the draft.
    ///
    /// Moderators and new POIs go straight into the catalog; a non-moderator
    /// edit of a catalog POI is queued for review instead.
    pub(crate) async fn save(
        &mut self,
        ctx: &EditorContext,
        actor: &Actor,
        origin: Option<MessageHandle>,
    ) -> Result<Flow> {
        let user = actor.id.as_str();
        let Some(mut poi) = self.draft().cloned() else {
            return Ok(Flow::Continue);
        };
        if !actor.is_moderator() && poi.id.is_none() {
            poi.needs_check = true;
        }

        let (poi_id, saved_key) = if actor.is_moderator() || poi.id.is_none() {
            match ctx.catalog.insert(actor, &poi).await {
                Ok(id) => {
                    info!("User {} saved POI {} ({})", user, id, poi.name);
                    if !actor.is_moderator() {
                        let id = id.to_string();
                        let text = ctx.format(
                            "editor.just_added",
                            &[("id", id.as_str()), ("name", poi.name.as_str())],
                        );
                        ctx.announce(&text, Some(user)).await;
                    }
                    (id, "editor.saved")
                }
                Err(err) => return self.storage_failure(ctx, user, err).await,
            }
        } else {
            match ctx.catalog.enqueue_for_review(actor, &poi, None).await {
                Ok(()) => {
                    info!("User {} sent POI {:?} for review", user, poi.id);
                    ctx.announce(&ctx.text("queue.added"), None).await;
                    (poi.id.unwrap_or_default(), "editor.sent")
                }
                Err(err) => return self.storage_failure(ctx, user, err).await,
            }
        };

        let mut buttons = vec![
            Button::action(
                format!("👀 {}", ctx.text("editor.saved_look")),
                Callback::Look { poi_id },
            ),
            Button::action(
                format!("➕ {}", ctx.text("editor.saved_add")),
                Callback::New,
            ),
        ];
        if actor.wants_review_prompt {
            buttons.push(prompts::review_button(&*ctx.texts));
        }
        let choices = ChoiceSet::new().row(buttons);
        self.finish_with(ctx, actor, origin, ctx.text(saved_key), choices)
            .await
    }

    /// `/delete`: asks for a reason, or removes an already deleted POI for
    /// good when a moderator asks.
    pub(crate) async fn delete_prompt(
        &mut self,
        ctx: &EditorContext,
        actor: &Actor,
    ) -> Result<Flow> {
        let user = actor.id.as_str();
        let Some(poi) = self.draft().cloned() else {
            return Ok(Flow::Continue);
        };
        if !poi.is_deleted() {
            return self.open_attr(ctx, user, Attribute::Delete).await;
        }
        if !actor.is_moderator() {
            debug!("User {} may not delete POI {:?} twice", user, poi.id);
            ctx.send(user, OutgoingMessage::text(ctx.text("editor.delete_twice")))
                .await?;
            return Ok(Flow::Continue);
        }
        match ctx.catalog.hard_delete(actor, &poi).await {
            Ok(()) => {
                info!("User {} removed POI {:?} for good", user, poi.id);
                self.finish(ctx, actor, None, ctx.text("editor.deleted2"))
                    .await
            }
            Err(err) => self.storage_failure(ctx, user, err).await,
        }
    }

    /// Soft-deletes the draft with the reason given in `Attr(delete)`.
    pub(crate) async fn soft_delete(
        &mut self,
        ctx: &EditorContext,
        actor: &Actor,
        reason: String,
        origin: Option<MessageHandle>,
    ) -> Result<Flow> {
        let user = actor.id.as_str();
        let Some(mut poi) = self.draft().cloned() else {
            return Ok(Flow::Continue);
        };
        poi.delete_reason = Some(reason.clone());
        if let Err(err) = ctx.catalog.soft_delete(actor, &poi, &reason).await {
            self.retract(ctx, user, origin).await;
            self.set_mode(Mode::Confirm);
            return self.storage_failure(ctx, user, err).await;
        }

        info!("User {} deleted POI {:?}: {}", user, poi.id, reason);
        if let Some(draft) = self.draft_mut() {
            draft.delete_reason = Some(reason.clone());
        }
        let flow = self
            .finish(ctx, actor, origin, ctx.text("editor.deleted"))
            .await?;
        let id = poi.id.map(|id| id.to_string()).unwrap_or_default();
        let text = ctx.format(
            "editor.just_deleted",
            &[("id", id.as_str()), ("reason", reason.as_str())],
        );
        ctx.announce(&text, Some(user)).await;
        Ok(flow)
    }

    /// `/undelete`, moderators only.
    pub(crate) async fn undelete(&mut self, ctx: &EditorContext, actor: &Actor) -> Result<Flow> {
        let user = actor.id.as_str();
        if !actor.is_moderator() {
            ctx.send(user, OutgoingMessage::text(ctx.text("editor.cant_restore")))
                .await?;
            return Ok(Flow::Continue);
        }
        let Some(poi) = self.draft().cloned() else {
            return Ok(Flow::Continue);
        };
        match ctx.catalog.restore(actor, &poi).await {
            Ok(()) => {
                info!("User {} restored POI {:?}", user, poi.id);
                if let Some(draft) = self.draft_mut() {
                    draft.delete_reason = None;
                }
                self.finish(ctx, actor, None, ctx.text("editor.restored"))
                    .await
            }
            Err(err) => self.storage_failure(ctx, user, err).await,
        }
    }

    /// `/msg`: non-moderators may leave a note for moderators.
    pub(crate) async fn message_intro(
        &mut self,
        ctx: &EditorContext,
        actor: &Actor,
    ) -> Result<Flow> {
        let user = actor.id.as_str();
        if actor.is_moderator() {
            ctx.send(user, OutgoingMessage::text(ctx.text("editor.cant_message")))
                .await?;
            return Ok(Flow::Continue);
        }
        self.retract(ctx, user, None).await;
        let message = OutgoingMessage::text(ctx.text("editor.message"))
            .with_choices(prompts::cancel_attr(&*ctx.texts));
        self.reply(ctx, user, message).await?;
        self.set_mode(Mode::Message);
        Ok(Flow::Continue)
    }

    /// Delivers the note typed in `Message`.
    ///
    /// A note about a catalog POI joins the review queue; a note about a
    /// never saved draft is broadcast.
    pub(crate) async fn on_message(
        &mut self,
        ctx: &EditorContext,
        actor: &Actor,
        event: &Inbound,
    ) -> Result<Flow> {
        let user = actor.id.as_str();
        let Some(text) = event.raw_text().filter(|t| !t.trim().is_empty()) else {
            let message = OutgoingMessage::text(ctx.text("editor.message"))
                .with_choices(prompts::cancel_attr(&*ctx.texts));
            self.reply(ctx, user, message).await?;
            return Ok(Flow::Continue);
        };
        let Some(poi) = self.draft().cloned() else {
            return Ok(Flow::Continue);
        };

        if poi.id.is_none() {
            ctx.announce(&text, None).await;
        } else if let Err(err) = ctx.catalog.enqueue_for_review(actor, &poi, Some(&text)).await {
            self.retract(ctx, user, None).await;
            self.set_mode(Mode::Confirm);
            return self.storage_failure(ctx, user, err).await;
        }
        info!("User {} left a message about POI {:?}", user, poi.id);

        self.retract(ctx, user, None).await;
        ctx.send(user, OutgoingMessage::text(ctx.text("editor.msg_sent")))
            .await?;
        Ok(Flow::Finished)
    }

    /// Reports a failed commit and stays in `Confirm`.
    async fn storage_failure(
        &mut self,
        ctx: &EditorContext,
        user: &str,
        err: PoiError,
    ) -> Result<Flow> {
        error!("Failed to commit POI for user {}: {}", user, err);
        self.recover(ctx, user, "editor.error_save", err).await
    }

    /// Reports a failed catalog lookup and stays in `Confirm`.
    pub(crate) async fn catalog_unavailable(
        &mut self,
        ctx: &EditorContext,
        user: &str,
        err: PoiError,
    ) -> Result<Flow> {
        error!("Catalog lookup failed for user {}: {}", user, err);
        self.recover(ctx, user, "editor.error_read", err).await
    }

    async fn recover(
        &mut self,
        ctx: &EditorContext,
        user: &str,
        key: &str,
        err: PoiError,
    ) -> Result<Flow> {
        let reason = err.to_string();
        let message = OutgoingMessage::text(ctx.format(key, &[("error", reason.as_str())]))
            .with_choices(prompts::save(&*ctx.texts));
        self.reply(ctx, user, message).await?;
        self.set_mode(Mode::Confirm);
        Ok(Flow::Continue)
    }
}
