//! Summary renderer.
//!
//! Turns a draft into a `SummaryView`. Rendering is pure: the same draft
//! always yields the same view.

use poiedit_core::config::EditorConfig;
use poiedit_core::fields::Attribute;
use poiedit_core::poi::Poi;
use poiedit_core::text::TextResolver;
use poiedit_core::view::{FlagMarker, SummaryRow, SummaryValue, SummaryView};

pub struct SummaryRenderer<'a> {
    texts: &'a dyn TextResolver,
    config: &'a EditorConfig,
}

impl<'a> SummaryRenderer<'a> {
    pub fn new(texts: &'a dyn TextResolver, config: &'a EditorConfig) -> Self {
        Self { texts, config }
    }

    /// Renders the draft.
    ///
    /// `comment` is the trailing hint; `None` selects the default
    /// "confirm" hint and an empty string suppresses it.
    pub fn render(&self, poi: &Poi, comment: Option<&str>) -> SummaryView {
        let none = self.panel("none");
        let unknown = self.texts.text("editor.unknown");

        let mut rows = vec![
            self.row(Attribute::Desc, "desc", text_or(poi.description.as_deref(), &none)),
            self.row(
                Attribute::Keywords,
                "keywords",
                text_or(Some(poi.keywords_text().as_str()), &unknown),
            ),
            self.row(Attribute::Tag, "tag", text_or(poi.tag.as_deref(), &unknown)),
            self.row(
                Attribute::House,
                "house",
                text_or(poi.house_name.as_deref(), &unknown),
            ),
            self.row(Attribute::Floor, "floor", text_or(poi.floor.as_deref(), &unknown)),
            self.row(
                Attribute::Address,
                "addr",
                text_or(poi.address_part.as_deref(), &unknown),
            ),
            self.row(
                Attribute::Hours,
                "hours",
                text_or(poi.hours_src.as_deref(), &unknown),
            ),
            self.row(
                Attribute::Location,
                "loc",
                SummaryValue::Location {
                    lat: poi.location.lat,
                    lon: poi.location.lon,
                    url: self.config.map_url_for(poi.location.lat, poi.location.lon),
                    text: self.panel("loc_browse"),
                },
            ),
            self.row(
                Attribute::Phones,
                "phone",
                text_or(Some(poi.phones_text().as_str()), &unknown),
            ),
            self.row(Attribute::Wifi, "wifi", self.flag(poi.has_wifi, &unknown)),
            self.row(Attribute::Cards, "card", self.flag(poi.accepts_cards, &unknown)),
            self.row(
                Attribute::Links,
                "links",
                if poi.links.is_empty() {
                    SummaryValue::Unknown {
                        placeholder: none.clone(),
                    }
                } else {
                    SummaryValue::Links {
                        links: poi.links.clone(),
                    }
                },
            ),
            self.row(Attribute::Comment, "comment", text_or(poi.comment.as_deref(), &none)),
            SummaryRow {
                command: None,
                label: self.panel("photo"),
                value: SummaryValue::Text {
                    text: format!("{} ({})", self.photos(poi), self.panel("photo_comment")),
                },
            },
        ];

        if poi.is_persisted() {
            rows.push(match &poi.delete_reason {
                Some(reason) => SummaryRow {
                    command: Some("undelete".to_string()),
                    label: self.panel("deleted"),
                    value: SummaryValue::Text {
                        text: format!("{}. {}", reason, self.panel("restore")),
                    },
                },
                None => action_row("delete", self.panel("delete")),
            });
            rows.push(action_row("msg", self.panel("msg")));
        }

        let comment = match comment {
            None => Some(self.texts.text("new_poi.confirm2")),
            Some("") => None,
            Some(text) => Some(text.to_string()),
        };

        SummaryView {
            title: poi.name.clone(),
            rows,
            comment,
        }
    }

    fn panel(&self, key: &str) -> String {
        self.texts.text(&format!("editor.panel.{}", key))
    }

    fn row(&self, attr: Attribute, label_key: &str, value: SummaryValue) -> SummaryRow {
        SummaryRow {
            command: Some(attr.command().to_string()),
            label: self.panel(label_key),
            value,
        }
    }

    fn flag(&self, value: Option<bool>, unknown: &str) -> SummaryValue {
        let text = match value {
            Some(true) => self.texts.text("editor.bool_yes"),
            Some(false) => self.texts.text("editor.bool_no"),
            None => unknown.to_string(),
        };
        SummaryValue::Flag {
            marker: FlagMarker::from(value),
            text,
        }
    }

    fn photos(&self, poi: &Poi) -> String {
        let key = match (&poi.photo_out, &poi.photo_in) {
            (Some(_), Some(_)) => "photo_both",
            (Some(_), None) => "photo_out",
            (None, Some(_)) => "photo_in",
            (None, None) => "none",
        };
        self.panel(key)
    }
}

fn text_or(value: Option<&str>, placeholder: &str) -> SummaryValue {
    match value {
        Some(text) if !text.is_empty() => SummaryValue::Text {
            text: text.to_string(),
        },
        _ => SummaryValue::Unknown {
            placeholder: placeholder.to_string(),
        },
    }
}

fn action_row(command: &str, label: String) -> SummaryRow {
    SummaryRow {
        command: Some(command.to_string()),
        label,
        value: SummaryValue::Text {
            text: String::new(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use poiedit_core::poi::{Link, Location};

    struct KeyTexts;

    impl TextResolver for KeyTexts {
        fn lookup(&self, _key: &str) -> Option<String> {
            None
        }
    }

    fn render(poi: &Poi, comment: Option<&str>) -> SummaryView {
        let config = EditorConfig::default();
        SummaryRenderer::new(&KeyTexts, &config).render(poi, comment)
    }

    fn draft() -> Poi {
        Poi::new("Cafe", Location::new(53.9, 27.6), vec!["coffee".into()])
    }

    #[test]
    fn test_row_order_for_new_poi() {
        let view = render(&draft(), None);
        assert_eq!(view.title, "Cafe");
        let commands: Vec<Option<&str>> =
            view.rows.iter().map(|r| r.command.as_deref()).collect();
        assert_eq!(
            commands,
            vec![
                Some("edesc"),
                Some("ekey"),
                Some("etag"),
                Some("ehouse"),
                Some("efloor"),
                Some("eaddr"),
                Some("ehour"),
                Some("eloc"),
                Some("ephone"),
                Some("ewifi"),
                Some("ecard"),
                Some("elink"),
                Some("ecom"),
                None,
            ]
        );
        assert_eq!(view.comment.as_deref(), Some("new_poi.confirm2"));
    }

    #[test]
    fn test_placeholders_and_flags() {
        let mut poi = draft();
        poi.has_wifi = Some(false);
        let view = render(&poi, Some(""));
        assert_eq!(
            view.row_by_command("edesc").unwrap().value,
            SummaryValue::Unknown {
                placeholder: "editor.panel.none".into()
            }
        );
        assert_eq!(
            view.row_by_command("etag").unwrap().value,
            SummaryValue::Unknown {
                placeholder: "editor.unknown".into()
            }
        );
        assert_eq!(
            view.row_by_command("ewifi").unwrap().value,
            SummaryValue::Flag {
                marker: FlagMarker::No,
                text: "editor.bool_no".into()
            }
        );
        assert_eq!(
            view.row_by_command("ecard").unwrap().value,
            SummaryValue::Flag {
                marker: FlagMarker::Unset,
                text: "editor.unknown".into()
            }
        );
        assert_eq!(view.comment, None);
    }

    #[test]
    fn test_location_and_links_carry_targets() {
        let mut poi = draft();
        poi.links.push(Link::new("website", "https://a.com"));
        let view = render(&poi, Some("hi"));
        match &view.row_by_command("eloc").unwrap().value {
            SummaryValue::Location { url, .. } => {
                assert_eq!(url, "https://zverik.github.io/latlon/#18/53.9/27.6")
            }
            other => panic!("unexpected {:?}", other),
        }
        assert_eq!(
            view.row_by_command("elink").unwrap().value.plain(),
            "website"
        );
        assert_eq!(view.comment.as_deref(), Some("hi"));
    }

    #[test]
    fn test_persisted_rows() {
        let mut poi = draft();
        poi.id = Some(5);
        let view = render(&poi, None);
        assert!(view.row_by_command("delete").is_some());
        assert!(view.row_by_command("msg").is_some());

        poi.delete_reason = Some("closed".into());
        let view = render(&poi, None);
        assert!(view.row_by_command("delete").is_none());
        assert_eq!(
            view.row_by_command("undelete").unwrap().value.plain(),
            "closed. editor.panel.restore"
        );
    }

    #[test]
    fn test_photos_row() {
        let mut poi = draft();
        poi.photo_in = Some("abcd".into());
        let view = render(&poi, None);
        assert_eq!(
            view.row("editor.panel.photo").unwrap().value.plain(),
            "editor.panel.photo_in (editor.panel.photo_comment)"
        );
    }

    #[test]
    fn test_render_is_stable() {
        let mut poi = draft();
        poi.tag = Some("amenity=cafe".into());
        assert_eq!(render(&poi, None), render(&poi, None));
    }
}
