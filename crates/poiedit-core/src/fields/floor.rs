use super::text::CLEAR;
use crate::error::FieldError;

/// Parses a floor. When the house has known floors the value must be one
/// of them; `-` clears.
pub fn parse_floor(input: &str, known: &[String]) -> Result<Option<String>, FieldError> {
    let value = input.trim();
    match value {
        "" => Err(FieldError::Empty),
        CLEAR => Ok(None),
        _ if known.is_empty() || known.iter().any(|f| f == value) => Ok(Some(value.to_string())),
        _ => Err(FieldError::UnknownFloor(value.to_string())),
    }
}
