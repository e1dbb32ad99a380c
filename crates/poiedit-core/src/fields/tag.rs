//! `key=value` classification tag.

use super::text::CLEAR;
use crate::error::FieldError;
use once_cell::sync::Lazy;
use regex::Regex;

static SEPARATORS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[ =]+").unwrap());
static KEY: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[a-z][a-z_]*$").unwrap());

/// Parses `key value` or `key=value`; `-` clears the tag.
///
/// Input is lower-cased and dashes become underscores before splitting, so
/// `CUISINE-TYPE pizza` yields `cuisine_type=pizza`. Only the key is checked
/// against `[a-z][a-z_]*`; the value is kept as typed.
pub fn parse_tag(input: &str) -> Result<Option<String>, FieldError> {
    let value = input.trim();
    if value == CLEAR {
        return Ok(None);
    }
    let normalized = value.to_lowercase().replace('-', "_");
    let parts: Vec<&str> = SEPARATORS
        .split(&normalized)
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .collect();
    match parts.as_slice() {
        [key, val] if KEY.is_match(key) => Ok(Some(format!("{}={}", key, val))),
        _ => Err(FieldError::MalformedTag(value.to_string())),
    }
}
