//! Opening hours.
//!
//! Users type a compact shorthand (`пн-пт 9-18 обед 13-14`, `mo-fr 9-18`,
//! `24/7`); `parse_hours` turns it into `OpeningHours`, whose canonical text
//! follows the OSM `opening_hours` syntax and can be parsed back and queried
//! with `is_open_at`.

mod lexer;
mod model;
mod shorthand;

pub use lexer::{tokenize, Token};
pub use model::{
    weekday_code, weekday_from_code, HoursRule, OpeningHours, TimeOfDay, TimeSpan, WeekdayRange,
};
pub use shorthand::{normalize_time, parse_hours, HoursGrammar};
