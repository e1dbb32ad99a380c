//! Parser for the shorthand hours notation users type.
//!
//! ```text
//! input   := "24" | "24/7" | clause ("," clause)*
//! clause  := [day [["-"] day]] time "-" time [break time "-" time]
//! day     := two-letter weekday, English or localized
//! time    := H | HH | H[:.]MM | HH[:.]MM
//! break   := a break word or its abbreviation ("обед", "об", "lunch", ...)
//! ```

use super::lexer::{tokenize, Token};
use super::model::{HoursRule, OpeningHours, TimeOfDay, TimeSpan, WeekdayRange};
use crate::error::FieldError;
use chrono::Weekday;

const WEEK: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

const ENGLISH_ABBR: [&str; 7] = ["mo", "tu", "we", "th", "fr", "sa", "su"];

/// Weekday names and break words accepted by the shorthand parser.
#[derive(Debug, Clone)]
pub struct HoursGrammar {
    weekdays: Vec<(String, Weekday)>,
    break_words: Vec<String>,
}

impl HoursGrammar {
    /// English abbreviations are always accepted next to `localized`.
    pub fn new(localized: &[String; 7], break_words: &[String]) -> Self {
        let mut weekdays: Vec<(String, Weekday)> = ENGLISH_ABBR
            .iter()
            .zip(WEEK)
            .map(|(abbr, day)| (abbr.to_string(), day))
            .collect();
        weekdays.extend(
            localized
                .iter()
                .zip(WEEK)
                .map(|(abbr, day)| (abbr.to_lowercase(), day)),
        );
        Self {
            weekdays,
            break_words: break_words.iter().map(|w| w.to_lowercase()).collect(),
        }
    }

    fn weekday(&self, word: &str) -> Option<Weekday> {
        self.weekdays
            .iter()
            .find(|(abbr, _)| abbr == word)
            .map(|(_, day)| *day)
    }

    fn is_break_word(&self, word: &str) -> bool {
        self.break_words.iter().any(|full| abbreviates(word, full))
    }
}

impl Default for HoursGrammar {
    fn default() -> Self {
        crate::config::HoursConfig::default().grammar()
    }
}

/// True when `word` keeps the first letter of `full` and the rest of its
/// letters appear in `full` in order ("об", "обд" and "од" abbreviate
/// "обед").
fn abbreviates(word: &str, full: &str) -> bool {
    let mut word_chars = word.chars();
    let mut full_chars = full.chars();
    match (word_chars.next(), full_chars.next()) {
        (Some(a), Some(b)) if a == b => {}
        _ => return false,
    }
    word_chars.all(|c| full_chars.any(|f| f == c))
}

/// Normalizes a time token to `HH:MM`.
///
/// Returns `None` when the token is not one or two digits, optionally
/// followed by `:` or `.` and exactly two digits.
pub fn normalize_time(raw: &str) -> Option<String> {
    let (hour, minute) = match raw.find([':', '.']) {
        Some(i) => (&raw[..i], Some(&raw[i + 1..])),
        None => (raw, None),
    };
    let digits = |s: &str| s.bytes().all(|b| b.is_ascii_digit());
    if hour.is_empty() || hour.len() > 2 || !digits(hour) {
        return None;
    }
    if let Some(minute) = minute {
        if minute.len() != 2 || !digits(minute) {
            return None;
        }
    }

    let mut text = raw.to_string();
    if text.len() < 4 {
        text.push_str(":00");
    }
    Some(format!("{:0>5}", text.replace('.', ":")))
}

/// Parses shorthand hours into canonical rules.
///
/// Fails with `FieldError::MalformedHours` carrying the first clause that
/// does not match the grammar.
pub fn parse_hours(input: &str, grammar: &HoursGrammar) -> Result<OpeningHours, FieldError> {
    let input = input.trim();
    if input == "24" || input == "24/7" {
        return Ok(OpeningHours::AlwaysOpen);
    }
    input
        .split(',')
        .map(|clause| {
            let clause = clause.trim();
            ClauseParser::new(clause, grammar)
                .parse()
                .ok_or_else(|| FieldError::MalformedHours(clause.to_string()))
        })
        .collect::<Result<Vec<_>, _>>()
        .map(OpeningHours::Rules)
}

struct ClauseParser<'a> {
    tokens: Vec<Token>,
    pos: usize,
    grammar: &'a HoursGrammar,
}

impl<'a> ClauseParser<'a> {
    fn new(clause: &str, grammar: &'a HoursGrammar) -> Self {
        Self {
            tokens: tokenize(clause),
            pos: 0,
            grammar,
        }
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn next(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).cloned();
        self.pos += 1;
        token
    }

    fn parse(mut self) -> Option<HoursRule> {
        let days = self.days()?;
        let (open, close) = self.span()?;

        let spans = if self.peek().is_some() {
            match self.next()? {
                Token::Word(w) if self.grammar.is_break_word(&w) => {}
                _ => return None,
            }
            let (break_start, break_end) = self.span()?;
            if !(open < break_start && break_start < break_end && break_end < close) {
                return None;
            }
            vec![
                TimeSpan::new(open, break_start),
                TimeSpan::new(break_end, close),
            ]
        } else {
            vec![TimeSpan::new(open, close)]
        };

        if self.peek().is_some() {
            return None;
        }
        Some(HoursRule { days, spans })
    }

    fn days(&mut self) -> Option<WeekdayRange> {
        let start = match self.peek() {
            Some(Token::Word(w)) => self.grammar.weekday(w)?,
            _ => return Some(WeekdayRange::every_day()),
        };
        self.pos += 1;

        let dash = matches!(self.peek(), Some(Token::Dash));
        if dash {
            self.pos += 1;
        }
        match self.peek() {
            Some(Token::Word(w)) => {
                let end = self.grammar.weekday(w)?;
                self.pos += 1;
                Some(WeekdayRange::range(start, end))
            }
            _ if dash => None,
            _ => Some(WeekdayRange::single(start)),
        }
    }

    /// Closing times need a two-digit hour: `9-06` is overnight, `9-6` is
    /// rejected.
    fn span(&mut self) -> Option<(TimeOfDay, TimeOfDay)> {
        let open = self.time(1)?;
        if self.next()? != Token::Dash {
            return None;
        }
        let close = self.time(2)?;
        Some((open, close))
    }

    fn time(&mut self, hour_digits: usize) -> Option<TimeOfDay> {
        match self.next()? {
            Token::Number(raw) if raw.find([':', '.']).unwrap_or(raw.len()) >= hour_digits => {
                TimeOfDay::parse(&normalize_time(&raw)?)
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(input: &str) -> Result<String, FieldError> {
        parse_hours(input, &HoursGrammar::default()).map(|h| h.canonical())
    }

    #[test]
    fn test_normalize_time() {
        assert_eq!(normalize_time("9").as_deref(), Some("09:00"));
        assert_eq!(normalize_time("18").as_deref(), Some("18:00"));
        assert_eq!(normalize_time("9.30").as_deref(), Some("09:30"));
        assert_eq!(normalize_time("9:30").as_deref(), Some("09:30"));
        assert_eq!(normalize_time("09:00").as_deref(), Some("09:00"));
    }

    #[test]
    fn test_normalize_time_is_idempotent() {
        for raw in ["7", "07", "7.15", "23:59", "10.05"] {
            let once = normalize_time(raw).unwrap();
            assert_eq!(normalize_time(&once).unwrap(), once);
        }
    }

    #[test]
    fn test_normalize_time_rejects_malformed() {
        assert_eq!(normalize_time("9:00:00"), None);
        assert_eq!(normalize_time("930"), None);
        assert_eq!(normalize_time("9:3"), None);
        assert_eq!(normalize_time(":30"), None);
        assert_eq!(normalize_time("9a"), None);
    }

    #[test]
    fn test_weekday_range() {
        assert_eq!(parse("mo-fr 9-18").unwrap(), "Mo-Fr 09:00-18:00");
        assert_eq!(parse("Mo - Fr 9-18").unwrap(), "Mo-Fr 09:00-18:00");
        assert_eq!(parse("mo fr 9-18").unwrap(), "Mo-Fr 09:00-18:00");
        assert_eq!(parse("sa 10-14").unwrap(), "Sa 10:00-14:00");
    }

    #[test]
    fn test_hours_only_means_every_day() {
        assert_eq!(parse("9-18").unwrap(), "Mo-Su 09:00-18:00");
    }

    #[test]
    fn test_break_splits_span() {
        let hours = parse_hours("9-18 lunch 13-14", &HoursGrammar::default()).unwrap();
        assert_eq!(hours.canonical(), "Mo-Su 09:00-13:00,14:00-18:00");
        let OpeningHours::Rules(rules) = hours else {
            panic!("expected rules");
        };
        let total: u16 = rules[0].spans.iter().map(|s| s.duration()).sum();
        assert_eq!(total, 9 * 60 - 60);
    }

    #[test]
    fn test_localized_weekdays_and_break_abbreviations() {
        assert_eq!(
            parse("пн-пт 9.30-18 об 13-14").unwrap(),
            "Mo-Fr 09:30-13:00,14:00-18:00"
        );
        assert_eq!(
            parse("сб 10-15 обед 12-13").unwrap(),
            "Sa 10:00-12:00,13:00-15:00"
        );
    }

    #[test]
    fn test_mixed_alphabets_across_clauses() {
        assert_eq!(
            parse("пн-пт 9-18, sa 10-14").unwrap(),
            "Mo-Fr 09:00-18:00; Sa 10:00-14:00"
        );
    }

    #[test]
    fn test_always_open() {
        assert_eq!(parse("24").unwrap(), "24/7");
        assert_eq!(parse("24/7").unwrap(), "24/7");
    }

    #[test]
    fn test_failure_names_the_clause() {
        assert_eq!(
            parse("mo-fr 9-18, xx 10-14"),
            Err(FieldError::MalformedHours("xx 10-14".to_string()))
        );
        assert_eq!(
            parse("mo-fr 9:00:00-18"),
            Err(FieldError::MalformedHours("mo-fr 9:00:00-18".to_string()))
        );
    }

    #[test]
    fn test_break_must_fall_inside_the_span() {
        assert_eq!(
            parse("9-13 lunch 13-14"),
            Err(FieldError::MalformedHours("9-13 lunch 13-14".to_string()))
        );
        assert_eq!(
            parse("9-18 lunch 13-14").unwrap(),
            "Mo-Su 09:00-13:00,14:00-18:00"
        );
    }

    #[test]
    fn test_close_hour_has_two_digits() {
        assert_eq!(
            parse("9-6"),
            Err(FieldError::MalformedHours("9-6".to_string()))
        );
        assert_eq!(parse("22-06").unwrap(), "Mo-Su 22:00-06:00");
        assert!(parse("9-18 lunch 13-2").is_err());
    }

    #[test]
    fn test_rejects_malformed_clauses() {
        for input in [
            "",
            "mo-fr",
            "mo- 9-18",
            "9",
            "9-",
            "9-25",
            "9-18:75",
            "9-18 13-14",
            "9-18 dinner 13-14",
            "9-18 lunch 17-19",
            "9-18 extra",
            "9+18",
        ] {
            assert!(parse(input).is_err(), "{:?} should fail", input);
        }
    }
}
