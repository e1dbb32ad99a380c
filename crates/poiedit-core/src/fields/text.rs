//! Free-text attributes.

use crate::error::FieldError;

/// Shortest accepted POI name, in characters.
pub const MIN_NAME_LEN: usize = 3;

/// The value that clears an optional attribute.
pub const CLEAR: &str = "-";

/// Trims a name and checks its length.
pub fn parse_name(input: &str) -> Result<String, FieldError> {
    let name = input.trim();
    if name.chars().count() < MIN_NAME_LEN {
        return Err(FieldError::TooShort { min: MIN_NAME_LEN });
    }
    Ok(name.to_string())
}

/// Optional free text: `-` clears, anything else non-empty is kept.
pub fn parse_optional_text(input: &str) -> Result<Option<String>, FieldError> {
    match input.trim() {
        "" => Err(FieldError::Empty),
        CLEAR => Ok(None),
        value => Ok(Some(value.to_string())),
    }
}

/// Reason given for a delete.
pub fn parse_reason(input: &str) -> Result<String, FieldError> {
    match input.trim() {
        "" => Err(FieldError::Empty),
        reason => Ok(reason.to_string()),
    }
}
