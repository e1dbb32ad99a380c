//! Choice sets attached to editor messages.

use poiedit_core::config::TagConfig;
use poiedit_core::fields::Attribute;
use poiedit_core::gateway::{Button, Callback, ChoiceSet};
use poiedit_core::identity::Actor;
use poiedit_core::poi::House;
use poiedit_core::text::TextResolver;

/// Tag choices per row.
const TAG_COLUMNS: usize = 3;
/// Rows of tag choices per page.
const TAG_ROWS: usize = 5;

pub fn cancel(texts: &dyn TextResolver) -> ChoiceSet {
    ChoiceSet::new().row(vec![cancel_button(texts)])
}

pub fn cancel_attr(texts: &dyn TextResolver) -> ChoiceSet {
    ChoiceSet::new().row(vec![cancel_attr_button(texts)])
}

/// Save and cancel, attached to the summary.
pub fn save(texts: &dyn TextResolver) -> ChoiceSet {
    ChoiceSet::new().row(vec![
        Button::action(format!("💾 {}", texts.text("save")), Callback::Save),
        cancel_button(texts),
    ])
}

/// A link to a coordinate picker next to a cancel option.
pub fn location(texts: &dyn TextResolver, picker_url: String, cancel: Callback) -> ChoiceSet {
    let cancel = match cancel {
        Callback::CancelAttr => cancel_attr_button(texts),
        _ => cancel_button(texts),
    };
    ChoiceSet::new().row(vec![Button::url(texts.text("editor.latlon"), picker_url), cancel])
}

pub fn flag(texts: &dyn TextResolver, attr: Attribute) -> ChoiceSet {
    let option = |key: &str, value: Option<bool>| {
        Button::action(texts.text(key), Callback::Flag { attr, value })
    };
    ChoiceSet::new().row(vec![
        option("editor.bool_true", Some(true)),
        option("editor.bool_false", Some(false)),
        option("editor.bool_none", None),
        cancel_attr_button(texts),
    ])
}

/// One page of suggested tags.
///
/// Pages are 1-based; a page past the end wraps to the first one. Returns
/// the choices and the page actually shown.
pub fn tags(texts: &dyn TextResolver, config: &TagConfig, page: usize) -> (ChoiceSet, usize) {
    let per_page = TAG_COLUMNS * TAG_ROWS;
    let page = if page == 0 || (page - 1) * per_page >= config.suggest.len() {
        1
    } else {
        page
    };

    let mut choices = ChoiceSet::with_row_width(TAG_COLUMNS);
    for tag in config.suggest.iter().skip((page - 1) * per_page).take(per_page) {
        choices.insert(Button::action(
            config.label(tag),
            Callback::Tag { tag: tag.clone() },
        ));
    }
    let choices = choices.row(vec![
        cancel_attr_button(texts),
        Button::action(
            format!("{} ⏭️", texts.text("editor.next_page")),
            Callback::TagPage { page: page + 1 },
        ),
    ]);
    (choices, page)
}

/// Houses in the given order, the current one marked.
pub fn houses(texts: &dyn TextResolver, houses: &[House], current: Option<&str>) -> ChoiceSet {
    let mut choices = ChoiceSet::with_row_width(1);
    for (i, house) in houses.iter().enumerate() {
        let marker = if current == Some(house.key.as_str()) { "✅ " } else { "" };
        choices.insert(Button::action(
            format!("{}{} {}", marker, i + 1, house.name),
            Callback::House {
                key: house.key.clone(),
            },
        ));
    }
    choices.insert(cancel_attr_button(texts));
    choices
}

pub fn floors(texts: &dyn TextResolver, floors: &[String]) -> ChoiceSet {
    let mut choices = ChoiceSet::with_row_width(3);
    for floor in floors {
        choices.insert(Button::action(
            floor.clone(),
            Callback::Floor {
                floor: floor.clone(),
            },
        ));
    }
    choices.insert(cancel_attr_button(texts));
    choices
}

/// Offered after a session ends.
pub fn terminal(texts: &dyn TextResolver, actor: &Actor) -> ChoiceSet {
    if actor.wants_review_prompt {
        ChoiceSet::new().row(vec![review_button(texts)])
    } else {
        main_menu(texts)
    }
}

pub fn main_menu(texts: &dyn TextResolver) -> ChoiceSet {
    ChoiceSet::new().row(vec![Button::action(
        format!("➕ {}", texts.text("menu.new")),
        Callback::New,
    )])
}

pub fn review_button(texts: &dyn TextResolver) -> Button {
    Button::action(
        format!("🗒️ {}", texts.text("review.continue")),
        Callback::ContinueReview,
    )
}

pub fn cancel_button(texts: &dyn TextResolver) -> Button {
    Button::action(format!("❌ {}", texts.text("cancel")), Callback::Cancel)
}

pub fn cancel_attr_button(texts: &dyn TextResolver) -> Button {
    Button::action(texts.text("editor.cancel"), Callback::CancelAttr)
}

#[cfg(test)]
mod tests {
    use super::*;
    use poiedit_core::poi::Location;

    struct KeyTexts;

    impl TextResolver for KeyTexts {
        fn lookup(&self, _key: &str) -> Option<String> {
            None
        }
    }

    fn tag_config(n: usize) -> TagConfig {
        TagConfig {
            suggest: (0..n).map(|i| format!("shop=t{}", i)).collect(),
            labels: [("shop=t0".to_string(), "First".to_string())].into(),
        }
    }

    #[test]
    fn test_tag_pages_hold_fifteen() {
        let config = tag_config(20);
        let (choices, page) = tags(&KeyTexts, &config, 1);
        assert_eq!(page, 1);
        // 5 rows of tags plus the navigation row
        assert_eq!(choices.rows.len(), 6);
        assert_eq!(choices.buttons().next().map(Button::label), Some("First"));
        assert_eq!(choices.pick(17), Some(&Callback::TagPage { page: 2 }));

        let (choices, page) = tags(&KeyTexts, &config, 2);
        assert_eq!(page, 2);
        assert_eq!(choices.pick(1), Some(&Callback::Tag { tag: "shop=t15".into() }));
    }

    #[test]
    fn test_tag_pages_wrap() {
        let config = tag_config(20);
        let (_, page) = tags(&KeyTexts, &config, 3);
        assert_eq!(page, 1);
        let (_, page) = tags(&KeyTexts, &config, 0);
        assert_eq!(page, 1);
    }

    #[test]
    fn test_current_house_is_marked() {
        let list = vec![
            House {
                key: "a".into(),
                name: "Alpha".into(),
                location: Location::new(0.0, 0.0),
            },
            House {
                key: "b".into(),
                name: "Beta".into(),
                location: Location::new(0.0, 0.0),
            },
        ];
        let choices = houses(&KeyTexts, &list, Some("b"));
        let labels: Vec<&str> = choices.buttons().map(Button::label).collect();
        assert_eq!(labels, vec!["1 Alpha", "✅ 2 Beta", "editor.cancel"]);
    }

    #[test]
    fn test_terminal_offers_review() {
        let mut actor = Actor::new("7");
        assert_eq!(terminal(&KeyTexts, &actor).pick(1), Some(&Callback::New));
        actor.wants_review_prompt = true;
        assert_eq!(
            terminal(&KeyTexts, &actor).pick(1),
            Some(&Callback::ContinueReview)
        );
    }
}
