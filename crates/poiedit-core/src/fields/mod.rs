//! Editable POI attributes and their parsers.
//!
//! Every attribute maps to a parser that turns one piece of user input into
//! a `FieldUpdate`. Parsers are pure: they see the draft and a
//! `FieldContext`, and never touch the draft themselves. The session applies
//! the update only when parsing succeeded.

mod floor;
mod keywords;
mod links;
mod location;
mod phones;
mod tag;
mod text;

pub use floor::parse_floor;
pub use keywords::{merge_keywords, parse_keywords, split_keywords};
pub use links::apply_link;
pub use location::{check_bounds, parse_lat_lon};
pub use phones::parse_phones;
pub use tag::parse_tag;
pub use text::{parse_name, parse_optional_text, parse_reason, CLEAR, MIN_NAME_LEN};

use crate::config::LinkConfig;
use crate::error::FieldError;
use crate::hours::{parse_hours, HoursGrammar, OpeningHours};
use crate::poi::{BoundingBox, House, Link, Location, Poi};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoEnumIterator, IntoStaticStr};

/// An attribute the editor can prompt for.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    IntoStaticStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Attribute {
    Name,
    Desc,
    Keywords,
    Tag,
    House,
    Floor,
    Address,
    Hours,
    Location,
    Phones,
    Wifi,
    Cards,
    Links,
    Comment,
    Delete,
}

impl Attribute {
    /// Summary command that opens this attribute, without the leading `/`.
    pub fn command(self) -> &'static str {
        match self {
            Self::Name => "ename",
            Self::Desc => "edesc",
            Self::Keywords => "ekey",
            Self::Tag => "etag",
            Self::House => "ehouse",
            Self::Floor => "efloor",
            Self::Address => "eaddr",
            Self::Hours => "ehour",
            Self::Location => "eloc",
            Self::Phones => "ephone",
            Self::Wifi => "ewifi",
            Self::Cards => "ecard",
            Self::Links => "elink",
            Self::Comment => "ecom",
            Self::Delete => "delete",
        }
    }

    pub fn from_command(command: &str) -> Option<Self> {
        let command = command.trim_start_matches('/');
        Self::iter().find(|attr| attr.command() == command)
    }

    /// Snake-case name, used to build message keys.
    pub fn key(self) -> &'static str {
        self.into()
    }

    /// Attributes that only accept a picked option.
    pub fn is_choice_only(self) -> bool {
        matches!(self, Self::House | Self::Wifi | Self::Cards)
    }

    /// Whether `-` clears the attribute.
    pub fn is_clearable(self) -> bool {
        matches!(
            self,
            Self::Desc
                | Self::Tag
                | Self::Floor
                | Self::Address
                | Self::Hours
                | Self::Phones
                | Self::Comment
        )
    }

    pub fn parser(self) -> FieldParser {
        match self {
            Self::Name => name_field,
            Self::Desc => desc_field,
            Self::Keywords => keywords_field,
            Self::Tag => tag_field,
            Self::House => house_field,
            Self::Floor => floor_field,
            Self::Address => address_field,
            Self::Hours => hours_field,
            Self::Location => location_field,
            Self::Phones => phones_field,
            Self::Wifi => wifi_field,
            Self::Cards => cards_field,
            Self::Links => links_field,
            Self::Comment => comment_field,
            Self::Delete => delete_field,
        }
    }

    pub fn parse(
        self,
        input: FieldInput<'_>,
        poi: &Poi,
        ctx: &FieldContext<'_>,
    ) -> FieldResult {
        (self.parser())(input, poi, ctx)
    }
}

/// One piece of user input aimed at an attribute.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldInput<'a> {
    Text(&'a str),
    Location(Location),
    /// Value of a picked option (tag, floor, house key)
    Choice(&'a str),
    Flag(Option<bool>),
}

impl<'a> FieldInput<'a> {
    fn text(self) -> Result<&'a str, FieldError> {
        match self {
            Self::Text(text) => Ok(text),
            _ => Err(FieldError::UnexpectedInput),
        }
    }

    fn text_or_choice(self) -> Result<&'a str, FieldError> {
        match self {
            Self::Text(value) | Self::Choice(value) => Ok(value),
            _ => Err(FieldError::UnexpectedInput),
        }
    }
}

/// Read-only data parsers may consult.
#[derive(Debug, Clone, Copy)]
pub struct FieldContext<'a> {
    pub bbox: Option<&'a BoundingBox>,
    pub links: &'a LinkConfig,
    pub hours: &'a HoursGrammar,
    /// Floors observed in the draft's house
    pub floors: &'a [String],
    /// Houses offered for the house prompt
    pub houses: &'a [House],
}

pub type FieldResult = Result<FieldUpdate, FieldError>;

pub type FieldParser = fn(FieldInput<'_>, &Poi, &FieldContext<'_>) -> FieldResult;

/// A validated change to one attribute of the draft.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldUpdate {
    Name(String),
    Description(Option<String>),
    Comment(Option<String>),
    Address(Option<String>),
    Floor(Option<String>),
    Tag(Option<String>),
    /// Complete new keyword list
    Keywords(Vec<String>),
    Location(Location),
    Hours(Option<OpeningHours>),
    Phones(Vec<String>),
    Links(Vec<Link>),
    Wifi(Option<bool>),
    Cards(Option<bool>),
    House { key: String, name: String },
    DeleteReason(String),
}

impl FieldUpdate {
    pub fn apply(self, poi: &mut Poi) {
        match self {
            Self::Name(name) => poi.name = name,
            Self::Description(v) => poi.description = v,
            Self::Comment(v) => poi.comment = v,
            Self::Address(v) => poi.address_part = v,
            Self::Floor(v) => poi.floor = v,
            Self::Tag(v) => poi.tag = v,
            Self::Keywords(v) => poi.keywords = v,
            Self::Location(v) => poi.location = v,
            Self::Hours(hours) => {
                poi.hours_src = hours.as_ref().map(OpeningHours::canonical);
                poi.hours = hours;
            }
            Self::Phones(v) => poi.phones = v,
            Self::Links(v) => poi.links = v,
            Self::Wifi(v) => poi.has_wifi = v,
            Self::Cards(v) => poi.accepts_cards = v,
            Self::House { key, name } => {
                if poi.house.as_deref() != Some(key.as_str()) {
                    poi.floor = None;
                }
                poi.house = Some(key);
                poi.house_name = Some(name);
            }
            Self::DeleteReason(reason) => poi.delete_reason = Some(reason),
        }
    }
}

fn name_field(input: FieldInput<'_>, _: &Poi, _: &FieldContext<'_>) -> FieldResult {
    parse_name(input.text()?).map(FieldUpdate::Name)
}

fn desc_field(input: FieldInput<'_>, _: &Poi, _: &FieldContext<'_>) -> FieldResult {
    parse_optional_text(input.text()?).map(FieldUpdate::Description)
}

fn comment_field(input: FieldInput<'_>, _: &Poi, _: &FieldContext<'_>) -> FieldResult {
    parse_optional_text(input.text()?).map(FieldUpdate::Comment)
}

fn address_field(input: FieldInput<'_>, _: &Poi, _: &FieldContext<'_>) -> FieldResult {
    parse_optional_text(input.text()?).map(FieldUpdate::Address)
}

fn keywords_field(input: FieldInput<'_>, poi: &Poi, _: &FieldContext<'_>) -> FieldResult {
    merge_keywords(&poi.keywords, input.text()?).map(FieldUpdate::Keywords)
}

fn tag_field(input: FieldInput<'_>, _: &Poi, _: &FieldContext<'_>) -> FieldResult {
    match input {
        // Suggested tags come from config and are applied as written.
        FieldInput::Choice(tag) => Ok(FieldUpdate::Tag(Some(tag.to_string()))),
        other => parse_tag(other.text()?).map(FieldUpdate::Tag),
    }
}

fn floor_field(input: FieldInput<'_>, _: &Poi, ctx: &FieldContext<'_>) -> FieldResult {
    parse_floor(input.text_or_choice()?, ctx.floors).map(FieldUpdate::Floor)
}

fn house_field(input: FieldInput<'_>, _: &Poi, ctx: &FieldContext<'_>) -> FieldResult {
    let FieldInput::Choice(key) = input else {
        return Err(FieldError::UnexpectedInput);
    };
    ctx.houses
        .iter()
        .find(|h| h.key == key)
        .map(|h| FieldUpdate::House {
            key: h.key.clone(),
            name: h.name.clone(),
        })
        .ok_or(FieldError::UnexpectedInput)
}

fn hours_field(input: FieldInput<'_>, _: &Poi, ctx: &FieldContext<'_>) -> FieldResult {
    match input.text()?.trim() {
        "" => Err(FieldError::Empty),
        CLEAR => Ok(FieldUpdate::Hours(None)),
        value => parse_hours(value, ctx.hours).map(|h| FieldUpdate::Hours(Some(h))),
    }
}

fn location_field(input: FieldInput<'_>, _: &Poi, ctx: &FieldContext<'_>) -> FieldResult {
    let location = match input {
        FieldInput::Location(location) => location,
        FieldInput::Text(text) => parse_lat_lon(text)?,
        _ => return Err(FieldError::UnexpectedInput),
    };
    check_bounds(location, ctx.bbox).map(FieldUpdate::Location)
}

fn phones_field(input: FieldInput<'_>, _: &Poi, _: &FieldContext<'_>) -> FieldResult {
    Ok(FieldUpdate::Phones(parse_phones(input.text()?)))
}

fn wifi_field(input: FieldInput<'_>, _: &Poi, _: &FieldContext<'_>) -> FieldResult {
    match input {
        FieldInput::Flag(value) => Ok(FieldUpdate::Wifi(value)),
        _ => Err(FieldError::UnexpectedInput),
    }
}

fn cards_field(input: FieldInput<'_>, _: &Poi, _: &FieldContext<'_>) -> FieldResult {
    match input {
        FieldInput::Flag(value) => Ok(FieldUpdate::Cards(value)),
        _ => Err(FieldError::UnexpectedInput),
    }
}

fn links_field(input: FieldInput<'_>, poi: &Poi, ctx: &FieldContext<'_>) -> FieldResult {
    let links =
        apply_link(&poi.links, input.text()?, ctx.links).unwrap_or_else(|| poi.links.clone());
    Ok(FieldUpdate::Links(links))
}

fn delete_field(input: FieldInput<'_>, _: &Poi, _: &FieldContext<'_>) -> FieldResult {
    parse_reason(input.text()?).map(FieldUpdate::DeleteReason)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixture {
        links: LinkConfig,
        hours: HoursGrammar,
        bbox: BoundingBox,
        floors: Vec<String>,
        houses: Vec<House>,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                links: LinkConfig::default(),
                hours: HoursGrammar::default(),
                bbox: BoundingBox::from([27.4, 53.8, 27.8, 54.0]),
                floors: vec!["1".to_string(), "2".to_string()],
                houses: vec![House {
                    key: "h1".to_string(),
                    name: "Tower".to_string(),
                    location: Location::new(53.9, 27.6),
                }],
            }
        }

        fn ctx(&self) -> FieldContext<'_> {
            FieldContext {
                bbox: Some(&self.bbox),
                links: &self.links,
                hours: &self.hours,
                floors: &self.floors,
                houses: &self.houses,
            }
        }
    }

    fn draft() -> Poi {
        Poi::new("Cafe", Location::new(53.9, 27.6), vec!["coffee".to_string()])
    }

    #[test]
    fn test_commands_roundtrip() {
        for attr in Attribute::iter() {
            assert_eq!(Attribute::from_command(attr.command()), Some(attr));
        }
        assert_eq!(Attribute::from_command("/ehour"), Some(Attribute::Hours));
        assert_eq!(Attribute::from_command("save"), None);
    }

    #[test]
    fn test_key_is_snake_case() {
        assert_eq!(Attribute::Desc.key(), "desc");
        assert_eq!(Attribute::Keywords.to_string(), "keywords");
        assert_eq!("wifi".parse::<Attribute>().unwrap(), Attribute::Wifi);
    }

    #[test]
    fn test_tag_then_apply() {
        let fx = Fixture::new();
        let mut poi = draft();
        let update = Attribute::Tag
            .parse(FieldInput::Text("cuisine pizza"), &poi, &fx.ctx())
            .unwrap();
        update.apply(&mut poi);
        assert_eq!(poi.tag.as_deref(), Some("cuisine=pizza"));

        Attribute::Tag
            .parse(FieldInput::Text("-"), &poi, &fx.ctx())
            .unwrap()
            .apply(&mut poi);
        assert_eq!(poi.tag, None);
    }

    #[test]
    fn test_picked_tag_is_kept_verbatim() {
        let fx = Fixture::new();
        let mut poi = draft();
        Attribute::Tag
            .parse(FieldInput::Choice("shop=e-cigarette"), &poi, &fx.ctx())
            .unwrap()
            .apply(&mut poi);
        assert_eq!(poi.tag.as_deref(), Some("shop=e-cigarette"));

        Attribute::Tag
            .parse(FieldInput::Text("shop e-cigarette"), &poi, &fx.ctx())
            .unwrap()
            .apply(&mut poi);
        assert_eq!(poi.tag.as_deref(), Some("shop=e_cigarette"));
    }

    #[test]
    fn test_hours_set_both_fields() {
        let fx = Fixture::new();
        let mut poi = draft();
        Attribute::Hours
            .parse(FieldInput::Text("пн-пт 9-18"), &poi, &fx.ctx())
            .unwrap()
            .apply(&mut poi);
        assert_eq!(poi.hours_src.as_deref(), Some("Mo-Fr 09:00-18:00"));
        assert!(poi.hours.is_some());

        Attribute::Hours
            .parse(FieldInput::Text("-"), &poi, &fx.ctx())
            .unwrap()
            .apply(&mut poi);
        assert_eq!(poi.hours_src, None);
        assert_eq!(poi.hours, None);
    }

    #[test]
    fn test_location_checks_bounds_on_both_paths() {
        let fx = Fixture::new();
        let poi = draft();
        let outside = Location::new(55.75, 37.61);
        assert_eq!(
            Attribute::Location.parse(FieldInput::Location(outside), &poi, &fx.ctx()),
            Err(FieldError::OutOfBounds)
        );
        assert_eq!(
            Attribute::Location.parse(FieldInput::Text("55.75, 37.61"), &poi, &fx.ctx()),
            Err(FieldError::OutOfBounds)
        );
        assert_eq!(
            Attribute::Location.parse(FieldInput::Text("53.91, 27.55"), &poi, &fx.ctx()),
            Ok(FieldUpdate::Location(Location::new(53.91, 27.55)))
        );
    }

    #[test]
    fn test_flags_only_take_choices() {
        let fx = Fixture::new();
        let mut poi = draft();
        assert_eq!(
            Attribute::Wifi.parse(FieldInput::Text("yes"), &poi, &fx.ctx()),
            Err(FieldError::UnexpectedInput)
        );
        Attribute::Wifi
            .parse(FieldInput::Flag(Some(false)), &poi, &fx.ctx())
            .unwrap()
            .apply(&mut poi);
        assert_eq!(poi.has_wifi, Some(false));
        Attribute::Wifi
            .parse(FieldInput::Flag(None), &poi, &fx.ctx())
            .unwrap()
            .apply(&mut poi);
        assert_eq!(poi.has_wifi, None);
    }

    #[test]
    fn test_house_choice_resets_floor() {
        let fx = Fixture::new();
        let mut poi = draft();
        poi.floor = Some("3".to_string());
        Attribute::House
            .parse(FieldInput::Choice("h1"), &poi, &fx.ctx())
            .unwrap()
            .apply(&mut poi);
        assert_eq!(poi.house.as_deref(), Some("h1"));
        assert_eq!(poi.house_name.as_deref(), Some("Tower"));
        assert_eq!(poi.floor, None);

        assert_eq!(
            Attribute::House.parse(FieldInput::Choice("nope"), &poi, &fx.ctx()),
            Err(FieldError::UnexpectedInput)
        );
    }

    #[test]
    fn test_keywords_union() {
        let fx = Fixture::new();
        let poi = draft();
        assert_eq!(
            Attribute::Keywords.parse(FieldInput::Text("Tea, coffee"), &poi, &fx.ctx()),
            Ok(FieldUpdate::Keywords(vec!["coffee".into(), "tea".into()]))
        );
    }

    #[test]
    fn test_empty_link_keeps_links() {
        let fx = Fixture::new();
        let mut poi = draft();
        poi.links = vec![Link::new("website", "https://a.com")];
        assert_eq!(
            Attribute::Links.parse(FieldInput::Text(" "), &poi, &fx.ctx()),
            Ok(FieldUpdate::Links(poi.links.clone()))
        );
    }

    #[test]
    fn test_floor_choice_and_text() {
        let fx = Fixture::new();
        let poi = draft();
        assert_eq!(
            Attribute::Floor.parse(FieldInput::Choice("2"), &poi, &fx.ctx()),
            Ok(FieldUpdate::Floor(Some("2".into())))
        );
        assert_eq!(
            Attribute::Floor.parse(FieldInput::Text("9"), &poi, &fx.ctx()),
            Err(FieldError::UnknownFloor("9".into()))
        );
    }

    #[test]
    fn test_failed_parse_leaves_draft_alone() {
        let fx = Fixture::new();
        let poi = draft();
        let before = poi.clone();
        assert!(Attribute::Name.parse(FieldInput::Text("ab"), &poi, &fx.ctx()).is_err());
        assert!(Attribute::Hours.parse(FieldInput::Text("xx"), &poi, &fx.ctx()).is_err());
        assert_eq!(poi, before);
    }
}
