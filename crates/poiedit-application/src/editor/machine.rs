//! Transition logic of the editing session.
//!
//! `EditSession::handle` takes one inbound event, performs the transition
//! for the current state and reports whether the session goes on. Every
//! transition out of a prompt retracts the prompt messages recorded in
//! `replies` together with the message whose choice triggered it.

use super::context::EditorContext;
use super::prompts;
use super::state::{ActiveAttr, EditSession, EditState, Flow, Mode, Stage};
use super::summary::SummaryRenderer;
use poiedit_core::error::{FieldError, PoiError, Result};
use poiedit_core::fields::{
    check_bounds, parse_keywords, parse_lat_lon, parse_name, Attribute, FieldContext, FieldInput,
    FieldUpdate,
};
use poiedit_core::gateway::{Callback, ChoiceSet, Inbound, MessageHandle, OutgoingMessage};
use poiedit_core::identity::Actor;
use poiedit_core::poi::{Location, Poi};
use tracing::{debug, warn};

impl EditSession {
    /// Starts the creation path by asking for a name.
    pub async fn start_new(ctx: &EditorContext, actor: &Actor) -> Result<Self> {
        debug!("Starting a new POI for user {}", actor.id);
        let message = OutgoingMessage::text(ctx.text("new_poi.name"))
            .with_choices(prompts::cancel(&*ctx.texts));
        ctx.send(&actor.id, message).await?;
        Ok(Self::with_stage(Stage::Name))
    }

    /// Opens an existing POI straight in the summary.
    pub async fn start_edit(ctx: &EditorContext, actor: &Actor, poi: Poi) -> Result<Self> {
        debug!("Editing POI {:?} for user {}", poi.id, actor.id);
        let mut session = Self::with_stage(Stage::Editing {
            draft: poi,
            mode: Mode::Confirm,
        });
        session.show_summary(ctx, &actor.id, None).await?;
        Ok(session)
    }

    /// Handles one event addressed to this session.
    pub async fn handle(
        &mut self,
        ctx: &EditorContext,
        actor: &Actor,
        event: Inbound,
    ) -> Result<Flow> {
        let user = actor.id.as_str();
        if let Inbound::Choice { callback, origin } = &event {
            match callback {
                Callback::Cancel => return self.cancel(ctx, actor, *origin).await,
                Callback::CancelAttr if self.draft().is_some() => {
                    debug!("User {} left the attribute prompt", user);
                    self.retract(ctx, user, *origin).await;
                    self.set_mode(Mode::Confirm);
                    self.show_summary(ctx, user, None).await?;
                    return Ok(Flow::Continue);
                }
                _ => {}
            }
        }

        match self.state() {
            EditState::Name => self.on_name(ctx, user, &event).await,
            EditState::Location => self.on_location(ctx, user, &event).await,
            EditState::Keywords => self.on_keywords(ctx, user, &event).await,
            EditState::Confirm => self.on_confirm(ctx, actor, event).await,
            EditState::Attr(attr) => self.on_attr(ctx, actor, attr, event).await,
            EditState::Message => self.on_message(ctx, actor, &event).await,
        }
    }

    async fn cancel(
        &mut self,
        ctx: &EditorContext,
        actor: &Actor,
        origin: Option<MessageHandle>,
    ) -> Result<Flow> {
        debug!("User {} cancelled the session in {:?}", actor.id, self.state());
        self.finish(ctx, actor, origin, ctx.text("new_poi.cancel")).await
    }

    async fn on_name(&mut self, ctx: &EditorContext, user: &str, event: &Inbound) -> Result<Flow> {
        let parsed = event
            .raw_text()
            .ok_or(FieldError::UnexpectedInput)
            .and_then(|text| parse_name(&text));
        match parsed {
            Ok(name) => {
                debug!("New POI name accepted: {}", name);
                self.stage = Stage::Location { name };
                let message = OutgoingMessage::text(ctx.text("new_poi.location"))
                    .with_choices(self.creation_location_choices(ctx));
                ctx.send(user, message).await?;
            }
            Err(FieldError::UnexpectedInput) => {
                let message = OutgoingMessage::text(ctx.text("new_poi.name"))
                    .with_choices(prompts::cancel(&*ctx.texts));
                ctx.send(user, message).await?;
            }
            Err(err) => {
                ctx.send(user, OutgoingMessage::text(field_error_text(ctx, None, &err)))
                    .await?;
            }
        }
        Ok(Flow::Continue)
    }

    async fn on_location(
        &mut self,
        ctx: &EditorContext,
        user: &str,
        event: &Inbound,
    ) -> Result<Flow> {
        let parsed = match event {
            Inbound::Location { location } => Ok(*location),
            _ => event
                .raw_text()
                .ok_or(FieldError::MalformedCoordinate)
                .and_then(|text| parse_lat_lon(&text)),
        }
        .and_then(|location| check_bounds(location, ctx.config.bbox.as_ref()));

        let location = match parsed {
            Ok(location) => location,
            Err(err) => {
                let message = OutgoingMessage::text(field_error_text(ctx, None, &err))
                    .with_choices(self.creation_location_choices(ctx));
                ctx.send(user, message).await?;
                return Ok(Flow::Continue);
            }
        };

        let Stage::Location { name } = &self.stage else {
            return Err(PoiError::internal("location received outside of the location stage"));
        };
        debug!("New POI location accepted: {}, {}", location.lat, location.lon);
        self.stage = Stage::Keywords {
            name: name.clone(),
            location,
        };
        let message = OutgoingMessage::text(ctx.text("new_poi.keywords"))
            .with_choices(prompts::cancel(&*ctx.texts));
        ctx.send(user, message).await?;
        Ok(Flow::Continue)
    }

    async fn on_keywords(
        &mut self,
        ctx: &EditorContext,
        user: &str,
        event: &Inbound,
    ) -> Result<Flow> {
        let parsed = event
            .raw_text()
            .ok_or(FieldError::Empty)
            .and_then(|text| parse_keywords(&text));
        let keywords = match parsed {
            Ok(keywords) => keywords,
            Err(err) => {
                let text = field_error_text(ctx, Some(Attribute::Keywords), &err);
                ctx.send(user, OutgoingMessage::text(text)).await?;
                return Ok(Flow::Continue);
            }
        };

        let Stage::Keywords { name, location } = &self.stage else {
            return Err(PoiError::internal("keywords received outside of the keywords stage"));
        };
        let draft = Poi::new(name.clone(), *location, keywords);
        debug!("Draft created: {}", draft.name);
        self.stage = Stage::Editing {
            draft,
            mode: Mode::Confirm,
        };
        let comment = ctx.text("new_poi.confirm");
        self.show_summary(ctx, user, Some(&comment)).await?;
        Ok(Flow::Continue)
    }

    async fn on_confirm(
        &mut self,
        ctx: &EditorContext,
        actor: &Actor,
        event: Inbound,
    ) -> Result<Flow> {
        let user = actor.id.as_str();
        match event {
            Inbound::Command { name, .. } => self.on_command(ctx, actor, &name).await,
            Inbound::Choice {
                callback: Callback::Save,
                origin,
            } => self.save(ctx, actor, origin).await,
            Inbound::Choice {
                callback: Callback::Photo { name, action },
                origin,
            } => self.apply_photo(ctx, user, &name, action, origin).await,
            Inbound::Photo { upload_id } => self.upload_photo(ctx, user, &upload_id).await,
            Inbound::Choice { callback, .. } => {
                self.protocol(
                    ctx,
                    user,
                    PoiError::protocol(format!("{:?} outside of an attribute prompt", callback)),
                )
                .await
            }
            Inbound::Text { .. } | Inbound::Location { .. } => {
                ctx.send(user, OutgoingMessage::text(ctx.text("editor.other_msg")))
                    .await?;
                Ok(Flow::Continue)
            }
        }
    }

    async fn on_command(&mut self, ctx: &EditorContext, actor: &Actor, name: &str) -> Result<Flow> {
        let user = actor.id.as_str();
        if let Some(attr) = Attribute::from_command(name) {
            return match attr {
                Attribute::Delete => self.delete_prompt(ctx, actor).await,
                _ => self.open_attr(ctx, user, attr).await,
            };
        }
        match name {
            "undelete" => self.undelete(ctx, actor).await,
            "msg" => self.message_intro(ctx, actor).await,
            "ephoto" => self.show_photos(ctx, user).await,
            "eout" => self.suggest_photos(ctx, user).await,
            _ => {
                ctx.send(user, OutgoingMessage::text(ctx.text("editor.other_msg")))
                    .await?;
                Ok(Flow::Continue)
            }
        }
    }

    /// Enters `Attr` for the given attribute.
    ///
    /// The current value, when there is one, goes out as a separate message
    /// before the prompt; both are retracted on the next transition.
    pub(crate) async fn open_attr(
        &mut self,
        ctx: &EditorContext,
        user: &str,
        attr: Attribute,
    ) -> Result<Flow> {
        let Some(draft) = self.draft().cloned() else {
            return Ok(Flow::Continue);
        };

        let mut active = ActiveAttr::new(attr);
        match attr {
            Attribute::Floor => {
                if let Some(house) = &draft.house {
                    match ctx.catalog.get_floors_by_house(house).await {
                        Ok(floors) => active.floors = floors.into_iter().flatten().collect(),
                        Err(err) => return self.catalog_unavailable(ctx, user, err).await,
                    }
                }
            }
            Attribute::House => {
                let mut houses = match ctx.catalog.get_houses().await {
                    Ok(houses) => houses,
                    Err(err) => return self.catalog_unavailable(ctx, user, err).await,
                };
                houses.sort_by(|a, b| {
                    let da = draft.location.distance(&a.location);
                    let db = draft.location.distance(&b.location);
                    da.total_cmp(&db)
                });
                houses.truncate(ctx.config.house_suggestions);
                active.houses = houses;
            }
            _ => {}
        }

        self.retract(ctx, user, None).await;
        if let Some(value) = current_value(attr, &draft) {
            self.reply(ctx, user, OutgoingMessage::text(value)).await?;
        }
        let message = OutgoingMessage::text(prompt_text(ctx, attr, &draft))
            .with_choices(prompt_choices(ctx, &draft, &active));
        self.reply(ctx, user, message).await?;

        debug!("User {} edits {}", user, attr);
        self.set_mode(Mode::Attr(active));
        Ok(Flow::Continue)
    }

    async fn on_attr(
        &mut self,
        ctx: &EditorContext,
        actor: &Actor,
        attr: Attribute,
        event: Inbound,
    ) -> Result<Flow> {
        let user = actor.id.as_str();
        let origin = match &event {
            Inbound::Choice { origin, .. } => *origin,
            _ => None,
        };

        if let Inbound::Choice {
            callback: Callback::TagPage { page },
            ..
        } = &event
        {
            return self.turn_tag_page(ctx, user, attr, *page, origin).await;
        }

        let raw = event.raw_text();
        let input = match field_input(&event, raw.as_deref(), attr) {
            Ok(input) => input,
            Err(PoiError::Validation(err)) => return self.reject(ctx, user, attr, err).await,
            Err(err) => return self.protocol(ctx, user, err).await,
        };

        let parsed = {
            let Stage::Editing {
                draft,
                mode: Mode::Attr(active),
            } = &self.stage
            else {
                return Err(PoiError::internal("attribute input outside of a prompt"));
            };
            let field_ctx = FieldContext {
                bbox: ctx.config.bbox.as_ref(),
                links: &ctx.config.links,
                hours: ctx.grammar(),
                floors: &active.floors,
                houses: &active.houses,
            };
            attr.parse(input, draft, &field_ctx)
        };

        match parsed {
            Ok(FieldUpdate::DeleteReason(reason)) => {
                self.soft_delete(ctx, actor, reason, origin).await
            }
            Ok(update) => {
                debug!("User {} updated {}: {:?}", user, attr, update);
                if let Some(draft) = self.draft_mut() {
                    update.apply(draft);
                }
                self.retract(ctx, user, origin).await;
                self.set_mode(Mode::Confirm);
                self.show_summary(ctx, user, None).await?;
                Ok(Flow::Continue)
            }
            Err(err) => self.reject(ctx, user, attr, err).await,
        }
    }

    /// Re-prompts for the same attribute after a rejected value.
    async fn reject(
        &mut self,
        ctx: &EditorContext,
        user: &str,
        attr: Attribute,
        err: FieldError,
    ) -> Result<Flow> {
        debug!("User {} sent an invalid {}: {}", user, attr, err);
        let choices = match (self.draft(), self.active()) {
            (Some(draft), Some(active)) => prompt_choices(ctx, draft, active),
            _ => prompts::cancel_attr(&*ctx.texts),
        };
        let message =
            OutgoingMessage::text(field_error_text(ctx, Some(attr), &err)).with_choices(choices);
        self.reply(ctx, user, message).await?;
        Ok(Flow::Continue)
    }

    async fn turn_tag_page(
        &mut self,
        ctx: &EditorContext,
        user: &str,
        attr: Attribute,
        page: usize,
        origin: Option<MessageHandle>,
    ) -> Result<Flow> {
        if attr != Attribute::Tag {
            return self
                .protocol(ctx, user, PoiError::protocol(format!("tag page while editing {}", attr)))
                .await;
        }
        let (choices, shown) = prompts::tags(&*ctx.texts, &ctx.config.tags, page);
        if let Stage::Editing {
            mode: Mode::Attr(active),
            ..
        } = &mut self.stage
        {
            active.tag_page = shown;
        }
        match origin {
            Some(handle) => ctx.gateway.edit_choices(user, handle, choices).await?,
            None => {
                let message = OutgoingMessage::text(ctx.text("editor.tag")).with_choices(choices);
                self.reply(ctx, user, message).await?;
            }
        }
        Ok(Flow::Continue)
    }

    // ============================================================================
    // Helpers shared by the transition handlers
    // ============================================================================

    /// Sends a message and records it for retraction.
    pub(crate) async fn reply(
        &mut self,
        ctx: &EditorContext,
        user: &str,
        message: OutgoingMessage,
    ) -> Result<MessageHandle> {
        let handle = ctx.send(user, message).await?;
        self.replies.push(handle);
        Ok(handle)
    }

    /// Retracts recorded replies and the message a choice came from.
    ///
    /// Failures are logged and never abort the transition.
    pub(crate) async fn retract(
        &mut self,
        ctx: &EditorContext,
        user: &str,
        origin: Option<MessageHandle>,
    ) {
        let mut handles = std::mem::take(&mut self.replies);
        if let Some(origin) = origin {
            if !handles.contains(&origin) {
                handles.push(origin);
            }
        }
        if handles.is_empty() {
            return;
        }
        if let Err(e) = ctx.gateway.retract(user, &handles).await {
            warn!("Failed to retract {} messages for user {}: {}", handles.len(), user, e);
        }
    }

    /// Renders the draft with the save options.
    pub(crate) async fn show_summary(
        &mut self,
        ctx: &EditorContext,
        user: &str,
        comment: Option<&str>,
    ) -> Result<()> {
        let Some(draft) = self.draft() else {
            return Ok(());
        };
        let view = SummaryRenderer::new(&*ctx.texts, &ctx.config).render(draft, comment);
        let message = OutgoingMessage::summary(view).with_choices(prompts::save(&*ctx.texts));
        self.reply(ctx, user, message).await?;
        Ok(())
    }

    /// Logs an event that does not fit the state and tells the user.
    pub(crate) async fn protocol(
        &mut self,
        ctx: &EditorContext,
        user: &str,
        err: PoiError,
    ) -> Result<Flow> {
        warn!("Unexpected event for user {} in {:?}: {}", user, self.state(), err);
        ctx.send(user, OutgoingMessage::text(ctx.text("editor.wrong_attr")))
            .await?;
        Ok(Flow::Continue)
    }

    /// Ends the session with a final message.
    pub(crate) async fn finish(
        &mut self,
        ctx: &EditorContext,
        actor: &Actor,
        origin: Option<MessageHandle>,
        text: String,
    ) -> Result<Flow> {
        self.finish_with(ctx, actor, origin, text, prompts::terminal(&*ctx.texts, actor))
            .await
    }

    pub(crate) async fn finish_with(
        &mut self,
        ctx: &EditorContext,
        actor: &Actor,
        origin: Option<MessageHandle>,
        text: String,
        choices: ChoiceSet,
    ) -> Result<Flow> {
        self.retract(ctx, &actor.id, origin).await;
        ctx.send(&actor.id, OutgoingMessage::text(text).with_choices(choices))
            .await?;
        Ok(Flow::Finished)
    }

    fn creation_location_choices(&self, ctx: &EditorContext) -> ChoiceSet {
        let center = ctx
            .config
            .bbox
            .map(|bbox| bbox.center())
            .unwrap_or(Location::new(0.0, 0.0));
        prompts::location(
            &*ctx.texts,
            ctx.config.map_url_for(center.lat, center.lon),
            Callback::Cancel,
        )
    }
}

/// Maps an event to the input kind the attribute parsers take.
fn field_input<'e>(
    event: &'e Inbound,
    raw: Option<&'e str>,
    attr: Attribute,
) -> Result<FieldInput<'e>> {
    let mismatch = |callback: &Callback| {
        PoiError::protocol(format!("{:?} while editing {}", callback, attr))
    };
    Ok(match event {
        Inbound::Text { .. } | Inbound::Command { .. } => FieldInput::Text(raw.unwrap_or_default()),
        Inbound::Location { location } => FieldInput::Location(*location),
        Inbound::Photo { .. } => return Err(FieldError::UnexpectedInput.into()),
        Inbound::Choice { callback, .. } => match (callback, attr) {
            (Callback::Flag { attr: target, value }, _) if *target == attr => {
                FieldInput::Flag(*value)
            }
            (Callback::House { key }, Attribute::House) => FieldInput::Choice(key),
            (Callback::Tag { tag }, Attribute::Tag) => FieldInput::Choice(tag),
            (Callback::Floor { floor }, Attribute::Floor) => FieldInput::Choice(floor),
            (other, _) => return Err(mismatch(other)),
        },
    })
}

/// Text shown when entering `Attr`.
fn prompt_text(ctx: &EditorContext, attr: Attribute, draft: &Poi) -> String {
    if attr == Attribute::Links {
        let mut content = if draft.links.is_empty() {
            ctx.text("editor.no_links")
        } else {
            let listed: Vec<String> = draft
                .links
                .iter()
                .map(|l| format!("🔗 {}: {}", l.label, l.url))
                .collect();
            format!("{}\n\n{}", ctx.text("editor.links_have"), listed.join("\n"))
        };
        content.push_str("\n\n");
        content.push_str(&ctx.text("editor.links"));
        return content;
    }
    let prompt = ctx.text(&format!("editor.{}", attr.key()));
    if attr.is_clearable() {
        format!("{} {}", prompt, ctx.text("editor.dash"))
    } else {
        prompt
    }
}

/// Options attached to the prompt of `active`.
fn prompt_choices(ctx: &EditorContext, draft: &Poi, active: &ActiveAttr) -> ChoiceSet {
    let texts = &*ctx.texts;
    match active.attr {
        Attribute::Tag => prompts::tags(texts, &ctx.config.tags, active.tag_page).0,
        Attribute::Location => prompts::location(
            texts,
            ctx.config.map_url_for(draft.location.lat, draft.location.lon),
            Callback::CancelAttr,
        ),
        Attribute::Floor if !active.floors.is_empty() => prompts::floors(texts, &active.floors),
        Attribute::House => prompts::houses(texts, &active.houses, draft.house.as_deref()),
        Attribute::Wifi | Attribute::Cards => prompts::flag(texts, active.attr),
        _ => prompts::cancel_attr(texts),
    }
}

/// Current value shown above the prompt, when non-empty.
fn current_value(attr: Attribute, draft: &Poi) -> Option<String> {
    let value = match attr {
        Attribute::Name => Some(draft.name.clone()),
        Attribute::Desc => draft.description.clone(),
        Attribute::Tag => draft.tag.clone(),
        Attribute::Comment => draft.comment.clone(),
        Attribute::Keywords => Some(draft.keywords_text()),
        Attribute::Address => draft.address_part.clone(),
        Attribute::Phones => Some(draft.phones_text()),
        Attribute::Hours => draft.hours_src.clone(),
        _ => None,
    };
    value.filter(|v| !v.is_empty())
}

/// User-facing message for a rejected value.
pub(crate) fn field_error_text(
    ctx: &EditorContext,
    attr: Option<Attribute>,
    err: &FieldError,
) -> String {
    match err {
        FieldError::TooShort { .. } => ctx.text("new_poi.name_too_short"),
        FieldError::MalformedCoordinate => ctx.text("new_poi.no_location"),
        FieldError::OutOfBounds => ctx.text("new_poi.location_out"),
        FieldError::MalformedTag(value) => {
            ctx.format("editor.tag_format", &[("value", value.as_str())])
        }
        FieldError::MalformedHours(clause) => {
            ctx.format("editor.hours_format", &[("clause", clause.as_str())])
        }
        FieldError::Empty if attr == Some(Attribute::Keywords) => ctx.text("new_poi.no_keywords"),
        FieldError::Empty => ctx.text("editor.empty_value"),
        FieldError::UnknownFloor(floor) => {
            ctx.format("editor.unknown_floor", &[("floor", floor.as_str())])
        }
        FieldError::UnexpectedInput => ctx.text("editor.choose_option"),
    }
}
