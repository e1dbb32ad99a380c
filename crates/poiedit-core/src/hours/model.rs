//! Canonical opening-hours rules.
//!
//! The canonical text is a subset of the OpenStreetMap `opening_hours`
//! syntax: `24/7`, or `;`-separated rules of the form
//! `Mo-Fr 09:00-13:00,14:00-18:00`.

use crate::error::FieldError;
use chrono::{Datelike, NaiveDateTime, Timelike, Weekday};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

const MINUTES_PER_DAY: u16 = 24 * 60;

/// Canonical two-letter weekday name.
pub fn weekday_code(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Mo",
        Weekday::Tue => "Tu",
        Weekday::Wed => "We",
        Weekday::Thu => "Th",
        Weekday::Fri => "Fr",
        Weekday::Sat => "Sa",
        Weekday::Sun => "Su",
    }
}

/// Parses a two-letter weekday name, case-insensitively.
pub fn weekday_from_code(code: &str) -> Option<Weekday> {
    match code.to_ascii_lowercase().as_str() {
        "mo" => Some(Weekday::Mon),
        "tu" => Some(Weekday::Tue),
        "we" => Some(Weekday::Wed),
        "th" => Some(Weekday::Thu),
        "fr" => Some(Weekday::Fri),
        "sa" => Some(Weekday::Sat),
        "su" => Some(Weekday::Sun),
        _ => None,
    }
}

/// Minutes since midnight, `24:00` included.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct TimeOfDay(u16);

impl TimeOfDay {
    pub fn new(hour: u16, minute: u16) -> Option<Self> {
        if minute >= 60 || hour > 24 || (hour == 24 && minute > 0) {
            return None;
        }
        Some(Self(hour * 60 + minute))
    }

    /// Parses `HH:MM`.
    pub fn parse(text: &str) -> Option<Self> {
        let (h, m) = text.split_once(':')?;
        if h.len() != 2 || m.len() != 2 {
            return None;
        }
        if !h.bytes().chain(m.bytes()).all(|b| b.is_ascii_digit()) {
            return None;
        }
        Self::new(h.parse().ok()?, m.parse().ok()?)
    }

    pub fn minutes(&self) -> u16 {
        self.0
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.0 / 60, self.0 % 60)
    }
}

/// An open interval; `close < open` wraps past midnight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeSpan {
    pub open: TimeOfDay,
    pub close: TimeOfDay,
}

impl TimeSpan {
    pub fn new(open: TimeOfDay, close: TimeOfDay) -> Self {
        Self { open, close }
    }

    pub fn wraps(&self) -> bool {
        self.close < self.open
    }

    /// Length in minutes.
    pub fn duration(&self) -> u16 {
        if self.wraps() {
            MINUTES_PER_DAY - self.open.0 + self.close.0
        } else {
            self.close.0 - self.open.0
        }
    }

    fn parse(text: &str) -> Option<Self> {
        let (open, close) = text.split_once('-')?;
        Some(Self::new(
            TimeOfDay::parse(open.trim())?,
            TimeOfDay::parse(close.trim())?,
        ))
    }
}

impl fmt::Display for TimeSpan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.open, self.close)
    }
}

/// A weekday or a weekday range; ranges may wrap (`Fr-Mo`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeekdayRange {
    pub start: Weekday,
    pub end: Option<Weekday>,
}

impl WeekdayRange {
    pub fn every_day() -> Self {
        Self {
            start: Weekday::Mon,
            end: Some(Weekday::Sun),
        }
    }

    pub fn single(day: Weekday) -> Self {
        Self {
            start: day,
            end: None,
        }
    }

    pub fn range(start: Weekday, end: Weekday) -> Self {
        Self {
            start,
            end: Some(end),
        }
    }

    pub fn contains(&self, day: Weekday) -> bool {
        let d = day.num_days_from_monday();
        let s = self.start.num_days_from_monday();
        match self.end.map(|e| e.num_days_from_monday()) {
            None => d == s,
            Some(e) if s <= e => s <= d && d <= e,
            Some(e) => d >= s || d <= e,
        }
    }

    fn parse(text: &str) -> Option<Self> {
        match text.split_once('-') {
            Some((s, e)) => Some(Self::range(weekday_from_code(s)?, weekday_from_code(e)?)),
            None => Some(Self::single(weekday_from_code(text)?)),
        }
    }
}

impl fmt::Display for WeekdayRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(weekday_code(self.start))?;
        if let Some(end) = self.end {
            write!(f, "-{}", weekday_code(end))?;
        }
        Ok(())
    }
}

/// Open spans applying to a set of weekdays.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HoursRule {
    pub days: WeekdayRange,
    pub spans: Vec<TimeSpan>,
}

impl fmt::Display for HoursRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ", self.days)?;
        for (i, span) in self.spans.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{}", span)?;
        }
        Ok(())
    }
}

/// Parsed opening hours.
///
/// Later rules override earlier ones for the weekdays they name, as in the
/// OSM syntax.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum OpeningHours {
    AlwaysOpen,
    Rules(Vec<HoursRule>),
}

impl OpeningHours {
    /// Canonical rule text.
    pub fn canonical(&self) -> String {
        self.to_string()
    }

    /// The rule in effect on `day`, if any.
    pub fn rule_for(&self, day: Weekday) -> Option<&HoursRule> {
        match self {
            Self::AlwaysOpen => None,
            Self::Rules(rules) => rules.iter().rev().find(|r| r.days.contains(day)),
        }
    }

    /// Whether the place is open at the given local time.
    pub fn is_open_at(&self, at: NaiveDateTime) -> bool {
        if matches!(self, Self::AlwaysOpen) {
            return true;
        }
        let day = at.weekday();
        let minute = (at.hour() * 60 + at.minute()) as u16;

        let open_today = self.rule_for(day).is_some_and(|rule| {
            rule.spans.iter().any(|s| {
                if s.wraps() {
                    minute >= s.open.0
                } else {
                    s.open.0 <= minute && minute < s.close.0
                }
            })
        });
        let spill_from_yesterday = self.rule_for(day.pred()).is_some_and(|rule| {
            rule.spans
                .iter()
                .any(|s| s.wraps() && minute < s.close.0)
        });
        open_today || spill_from_yesterday
    }
}

impl fmt::Display for OpeningHours {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AlwaysOpen => f.write_str("24/7"),
            Self::Rules(rules) => {
                for (i, rule) in rules.iter().enumerate() {
                    if i > 0 {
                        f.write_str("; ")?;
                    }
                    write!(f, "{}", rule)?;
                }
                Ok(())
            }
        }
    }
}

impl FromStr for OpeningHours {
    type Err = FieldError;

    /// Parses canonical rule text, as produced by `Display`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s == "24/7" {
            return Ok(Self::AlwaysOpen);
        }
        let mut rules = Vec::new();
        for part in s.split(';') {
            let part = part.trim();
            let fail = || FieldError::MalformedHours(part.to_string());
            let (days, spans) = match part.split_once(' ') {
                Some((days, spans)) => (WeekdayRange::parse(days).ok_or_else(fail)?, spans),
                None => (WeekdayRange::every_day(), part),
            };
            let spans = spans
                .split(',')
                .map(|span| TimeSpan::parse(span).ok_or_else(fail))
                .collect::<Result<Vec<_>, _>>()?;
            rules.push(HoursRule { days, spans });
        }
        Ok(Self::Rules(rules))
    }
}

impl TryFrom<String> for OpeningHours {
    type Error = FieldError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<OpeningHours> for String {
    fn from(value: OpeningHours) -> Self {
        value.canonical()
    }
}
