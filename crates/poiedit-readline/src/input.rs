//! Console line -> `Inbound` translation.
//!
//! | line              | event                               |
//! |-------------------|-------------------------------------|
//! | `/new`            | choice `New`                        |
//! | `/edit 12`        | choice `Edit { poi_id: 12 }`        |
//! | `/look 12`        | choice `Look { poi_id: 12 }`        |
//! | `#2`              | second option of the last message   |
//! | `@53.9,27.6`      | native location payload             |
//! | `!photo a.jpg`    | photo upload, the path is the id    |
//! | anything else     | command or text                     |

use poiedit_core::gateway::{Callback, ChoiceSet, Inbound, MessageHandle};
use poiedit_core::poi::Location;

/// Options of the most recent message that carried any.
#[derive(Debug, Clone, Default)]
pub struct LastChoices {
    pub handle: Option<MessageHandle>,
    pub choices: ChoiceSet,
}

#[derive(Debug, Clone, PartialEq)]
pub enum InputError {
    NoSuchOption(usize),
    BadNumber(String),
    BadLocation(String),
    MissingArgument(&'static str),
}

impl std::fmt::Display for InputError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InputError::NoSuchOption(n) => write!(f, "There is no option #{}", n),
            InputError::BadNumber(s) => write!(f, "Not a number: {}", s),
            InputError::BadLocation(s) => write!(f, "Expected @lat,lon, got {}", s),
            InputError::MissingArgument(what) => write!(f, "Missing {}", what),
        }
    }
}

impl std::error::Error for InputError {}

pub fn translate(line: &str, last: &LastChoices) -> Result<Inbound, InputError> {
    let line = line.trim();

    if let Some(n) = line.strip_prefix('#') {
        let n: usize = n
            .trim()
            .parse()
            .map_err(|_| InputError::BadNumber(n.to_string()))?;
        let callback = last.choices.pick(n).ok_or(InputError::NoSuchOption(n))?;
        return Ok(Inbound::Choice {
            callback: callback.clone(),
            origin: last.handle,
        });
    }

    if let Some(coords) = line.strip_prefix('@') {
        return parse_location(coords).map(|location| Inbound::Location { location });
    }

    if let Some(path) = line.strip_prefix("!photo") {
        let path = path.trim();
        if path.is_empty() {
            return Err(InputError::MissingArgument("photo path"));
        }
        return Ok(Inbound::Photo {
            upload_id: path.to_string(),
        });
    }

    match Inbound::from_text(line) {
        Inbound::Command { name, .. } if name == "new" => Ok(Inbound::choice(Callback::New)),
        Inbound::Command { name, args } if name == "edit" || name == "look" => {
            if args.is_empty() {
                return Err(InputError::MissingArgument("POI id"));
            }
            let poi_id: i64 = args.parse().map_err(|_| InputError::BadNumber(args.clone()))?;
            let callback = if name == "edit" {
                Callback::Edit { poi_id }
            } else {
                Callback::Look { poi_id }
            };
            Ok(Inbound::choice(callback))
        }
        other => Ok(other),
    }
}

fn parse_location(coords: &str) -> Result<Location, InputError> {
    let bad = || InputError::BadLocation(coords.to_string());
    let (lat, lon) = coords.split_once(',').ok_or_else(bad)?;
    let lat: f64 = lat.trim().parse().map_err(|_| bad())?;
    let lon: f64 = lon.trim().parse().map_err(|_| bad())?;
    Ok(Location::new(lat, lon))
}

#[cfg(test)]
mod tests {
    use super::*;
    use poiedit_core::gateway::Button;

    fn last() -> LastChoices {
        LastChoices {
            handle: Some(MessageHandle(7)),
            choices: ChoiceSet::new()
                .row(vec![Button::action("Save", Callback::Save)])
                .row(vec![Button::action("Cancel", Callback::Cancel)]),
        }
    }

    #[test]
    fn test_entry_commands() {
        assert_eq!(
            translate("/new", &last()).unwrap(),
            Inbound::choice(Callback::New)
        );
        assert_eq!(
            translate("/edit 12", &last()).unwrap(),
            Inbound::choice(Callback::Edit { poi_id: 12 })
        );
        assert_eq!(
            translate("/edit", &last()),
            Err(InputError::MissingArgument("POI id"))
        );
        assert_eq!(
            translate("/edit x", &last()),
            Err(InputError::BadNumber("x".into()))
        );
    }

    #[test]
    fn test_pick_carries_origin() {
        assert_eq!(
            translate("#2", &last()).unwrap(),
            Inbound::Choice {
                callback: Callback::Cancel,
                origin: Some(MessageHandle(7)),
            }
        );
        assert_eq!(translate("#3", &last()), Err(InputError::NoSuchOption(3)));
    }

    #[test]
    fn test_location_and_photo() {
        assert_eq!(
            translate("@53.9, 27.6", &last()).unwrap(),
            Inbound::Location {
                location: Location::new(53.9, 27.6)
            }
        );
        assert!(translate("@north", &last()).is_err());
        assert_eq!(
            translate("!photo ./door.jpg", &last()).unwrap(),
            Inbound::Photo {
                upload_id: "./door.jpg".into()
            }
        );
    }

    #[test]
    fn test_everything_else_passes_through() {
        assert_eq!(
            translate("/ehour", &last()).unwrap(),
            Inbound::Command {
                name: "ehour".into(),
                args: String::new()
            }
        );
        assert_eq!(
            translate("53.9, 27.6", &last()).unwrap(),
            Inbound::Text {
                text: "53.9, 27.6".into()
            }
        );
    }
}
