//! Photo operations on the draft.
//!
//! Photos are referenced by name. Uploads are stored under a fresh name
//! unless the same upload was stored before; nearby POIs lend their outside
//! photos as suggestions.

use super::context::EditorContext;
use super::prompts;
use super::state::{EditSession, Flow};
use chrono::{DateTime, Local};
use poiedit_core::error::Result;
use poiedit_core::gateway::{
    Button, Callback, ChoiceSet, MessageHandle, OutgoingMessage, PhotoAction,
};
use poiedit_core::poi::{Location, Poi};
use poiedit_core::text::TextResolver;
use rand::seq::SliceRandom;
use std::collections::HashMap;
use tracing::{debug, warn};

/// Width of the distance buckets used for ranking, in meters.
const DISTANCE_BUCKET_M: f64 = 10.0;

/// Ranks the outside photos of `around` for a POI at `origin`.
///
/// Photos closer to `origin` come first (in 10 m buckets); within a bucket
/// the photo used by more POIs wins. Each name appears once.
pub fn rank_photos(origin: &Location, around: &[Poi]) -> Vec<String> {
    let mut order: Vec<&str> = Vec::new();
    let mut stats: HashMap<&str, (f64, usize)> = HashMap::new();
    for poi in around {
        let Some(name) = poi.photo_out.as_deref() else {
            continue;
        };
        let distance = origin.distance(&poi.location);
        match stats.get_mut(name) {
            Some((closest, count)) => {
                *closest = closest.min(distance);
                *count += 1;
            }
            None => {
                order.push(name);
                stats.insert(name, (distance, 1));
            }
        }
    }
    order.sort_by_key(|name| {
        let (closest, count) = stats[name];
        ((closest / DISTANCE_BUCKET_M) as i64, std::cmp::Reverse(count))
    });
    order.into_iter().map(String::from).collect()
}

/// A fresh photo name: four random lowercase letters and a timestamp.
pub fn new_photo_name() -> String {
    photo_name_at(Local::now())
}

fn photo_name_at(now: DateTime<Local>) -> String {
    let letters: Vec<u8> = (b'a'..=b'z').collect();
    let prefix: String = letters
        .choose_multiple(&mut rand::thread_rng(), 4)
        .map(|&b| b as char)
        .collect();
    format!("{}{}", prefix, now.format("%y%m%d%H%M%S"))
}

/// Choices offered for a just uploaded photo.
pub fn upload_choices(texts: &dyn TextResolver, name: &str, downloaded: bool) -> ChoiceSet {
    let pick = |label: String, action: PhotoAction| {
        Button::action(
            label,
            Callback::Photo {
                name: name.to_string(),
                action,
            },
        )
    };
    let discard = if downloaded {
        PhotoAction::Del
    } else {
        PhotoAction::Skip
    };
    ChoiceSet::new().row(vec![
        pick(texts.text("editor.photo_out"), PhotoAction::Out),
        pick(texts.text("editor.photo_in"), PhotoAction::In),
        pick(format!("🗑️ {}", texts.text("editor.photo_del")), discard),
    ])
}

fn unlink_choices(texts: &dyn TextResolver, name: &str) -> ChoiceSet {
    ChoiceSet::new().row(vec![
        Button::action(
            format!("🗑️ {}", texts.text("editor.photo_del")),
            Callback::Photo {
                name: name.to_string(),
                action: PhotoAction::Unlink,
            },
        ),
        prompts::cancel_attr_button(texts),
    ])
}

fn suggestion_choices(texts: &dyn TextResolver, names: &[String]) -> ChoiceSet {
    let mut choices = ChoiceSet::with_row_width(5);
    for (i, name) in names.iter().enumerate() {
        choices.insert(Button::action(
            (i + 1).to_string(),
            Callback::Photo {
                name: name.clone(),
                action: PhotoAction::Out,
            },
        ));
    }
    choices.insert(prompts::cancel_attr_button(texts));
    choices
}

impl EditSession {
    /// Shows the draft's photos, each with an unlink option.
    pub(crate) async fn show_photos(&mut self, ctx: &EditorContext, user: &str) -> Result<Flow> {
        let Some(draft) = self.draft().cloned() else {
            return Ok(Flow::Continue);
        };
        let mut shown = 0;
        for (photo, caption) in [
            (&draft.photo_out, "editor.photo_out"),
            (&draft.photo_in, "editor.photo_in"),
        ] {
            let Some(name) = photo else { continue };
            if !ctx.photos.exists(name).await {
                warn!("Photo {} of the draft is missing", name);
                continue;
            }
            let message = OutgoingMessage::photo(name.clone(), ctx.text(caption))
                .with_choices(unlink_choices(&*ctx.texts, name));
            self.reply(ctx, user, message).await?;
            shown += 1;
        }
        if shown == 0 {
            ctx.send(user, OutgoingMessage::text(ctx.text("editor.no_photos")))
                .await?;
        }
        Ok(Flow::Continue)
    }

    /// Suggests outside photos of POIs around the draft.
    pub(crate) async fn suggest_photos(&mut self, ctx: &EditorContext, user: &str) -> Result<Flow> {
        let Some(draft) = self.draft().cloned() else {
            return Ok(Flow::Continue);
        };
        let around = match ctx
            .catalog
            .get_around(&draft.location, ctx.config.photo_radius_m, draft.floor.as_deref())
            .await
        {
            Ok(around) => around,
            Err(err) => return self.catalog_unavailable(ctx, user, err).await,
        };

        let mut names = Vec::new();
        for name in rank_photos(&draft.location, &around) {
            if names.len() == ctx.config.photo_suggestions {
                break;
            }
            if ctx.photos.exists(&name).await {
                names.push(name);
            } else {
                warn!("Skipping missing photo {}", name);
            }
        }
        if names.is_empty() {
            ctx.send(user, OutgoingMessage::text(ctx.text("editor.no_photos_around")))
                .await?;
            return Ok(Flow::Continue);
        }

        self.retract(ctx, user, None).await;
        let album = ctx.gateway.send_album(user, &names).await?;
        self.replies.extend(album);
        let message = OutgoingMessage::text(ctx.text("editor.choose_photo"))
            .with_choices(suggestion_choices(&*ctx.texts, &names));
        self.reply(ctx, user, message).await?;
        Ok(Flow::Continue)
    }

    /// Stores an uploaded photo and asks what it shows.
    pub(crate) async fn upload_photo(
        &mut self,
        ctx: &EditorContext,
        user: &str,
        upload_id: &str,
    ) -> Result<Flow> {
        let (name, downloaded) = match ctx.photos.find_by_upload(upload_id).await? {
            Some(name) => (name, false),
            None => match self.download(ctx, upload_id).await {
                Ok(name) => (name, true),
                Err(e) => {
                    warn!("Photo upload {} failed: {}", upload_id, e);
                    ctx.send(user, OutgoingMessage::text(ctx.text("editor.upload_fail")))
                        .await?;
                    return Ok(Flow::Continue);
                }
            },
        };
        debug!("Upload {} stored as photo {}", upload_id, name);

        self.retract(ctx, user, None).await;
        let message = OutgoingMessage::text(ctx.text("editor.photo"))
            .with_choices(upload_choices(&*ctx.texts, &name, downloaded));
        self.reply(ctx, user, message).await?;
        Ok(Flow::Continue)
    }

    async fn download(&self, ctx: &EditorContext, upload_id: &str) -> Result<String> {
        let bytes = ctx.gateway.fetch_upload(upload_id).await?;
        let name = new_photo_name();
        ctx.photos.save(&name, &bytes).await?;
        ctx.photos.remember_upload(&name, upload_id).await?;
        Ok(name)
    }

    /// Applies a photo choice. A missing file changes nothing.
    pub(crate) async fn apply_photo(
        &mut self,
        ctx: &EditorContext,
        user: &str,
        name: &str,
        action: PhotoAction,
        origin: Option<MessageHandle>,
    ) -> Result<Flow> {
        if !ctx.photos.exists(name).await {
            warn!("Photo {} chosen but missing", name);
            ctx.gateway.notice(user, &ctx.text("editor.photo_lost")).await?;
            return Ok(Flow::Continue);
        }

        let Some(draft) = self.draft_mut() else {
            return Ok(Flow::Continue);
        };
        match action {
            PhotoAction::Out => draft.photo_out = Some(name.to_string()),
            PhotoAction::In => draft.photo_in = Some(name.to_string()),
            PhotoAction::Unlink => {
                if draft.photo_out.as_deref() == Some(name) {
                    draft.photo_out = None;
                } else if draft.photo_in.as_deref() == Some(name) {
                    draft.photo_in = None;
                }
            }
            PhotoAction::Del => {
                ctx.photos.remove(name).await?;
                ctx.gateway
                    .notice(user, &ctx.text("editor.photo_deleted"))
                    .await?;
            }
            PhotoAction::Skip => {
                ctx.gateway
                    .notice(user, &ctx.text("editor.photo_forgot"))
                    .await?;
            }
        }
        debug!("Photo {} applied as {:?}", name, action);

        self.retract(ctx, user, origin).await;
        self.show_summary(ctx, user, None).await?;
        Ok(Flow::Continue)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn poi_at(lat: f64, photo: Option<&str>) -> Poi {
        let mut poi = Poi::new("Shop", Location::new(lat, 27.0), vec![]);
        poi.photo_out = photo.map(String::from);
        poi
    }

    #[test]
    fn test_rank_by_bucket_then_count() {
        let origin = Location::new(53.0, 27.0);
        // 0.00005 degrees of latitude is about 5.6 m, 0.00015 about 16.7 m
        let around = vec![
            poi_at(53.00015, Some("far")),
            poi_at(53.00005, Some("near")),
            poi_at(53.00005, Some("popular")),
            poi_at(53.00006, Some("popular")),
            poi_at(53.0, None),
        ];
        assert_eq!(rank_photos(&origin, &around), vec!["popular", "near", "far"]);
    }

    #[test]
    fn test_rank_uses_closest_poi_per_photo() {
        let origin = Location::new(53.0, 27.0);
        let around = vec![
            poi_at(53.0005, Some("shared")),
            poi_at(53.00015, Some("other")),
            poi_at(53.0, Some("shared")),
        ];
        assert_eq!(rank_photos(&origin, &around), vec!["shared", "other"]);
    }

    #[test]
    fn test_photo_name_shape() {
        let at = Local.with_ymd_and_hms(2024, 3, 9, 14, 5, 7).unwrap();
        let name = photo_name_at(at);
        assert_eq!(name.len(), 16);
        assert!(name[..4].chars().all(|c| c.is_ascii_lowercase()));
        assert_eq!(&name[4..], "240309140507");

        let letters: std::collections::HashSet<char> = name[..4].chars().collect();
        assert_eq!(letters.len(), 4);
    }

    #[test]
    fn test_upload_choices_discard_kind() {
        struct KeyTexts;
        impl TextResolver for KeyTexts {
            fn lookup(&self, _key: &str) -> Option<String> {
                None
            }
        }
        let fresh = upload_choices(&KeyTexts, "abcd", true);
        assert_eq!(
            fresh.pick(3),
            Some(&Callback::Photo {
                name: "abcd".into(),
                action: PhotoAction::Del
            })
        );
        let known = upload_choices(&KeyTexts, "abcd", false);
        assert_eq!(
            known.pick(3),
            Some(&Callback::Photo {
                name: "abcd".into(),
                action: PhotoAction::Skip
            })
        );
    }
}
