//! Search keywords.

use crate::error::FieldError;

/// Splits text into lower-cased, unique keyword tokens in first-seen order.
pub fn split_keywords(input: &str) -> Vec<String> {
    let mut tokens: Vec<String> = Vec::new();
    for word in input
        .to_lowercase()
        .split(|c: char| c.is_whitespace() || (c.is_ascii_punctuation() && c != '-'))
        .map(|w| w.trim_matches('-'))
        .filter(|w| !w.is_empty())
    {
        if !tokens.iter().any(|t| t == word) {
            tokens.push(word.to_string());
        }
    }
    tokens
}

/// Keywords for a new POI. At least one token is required.
pub fn parse_keywords(input: &str) -> Result<Vec<String>, FieldError> {
    let tokens = split_keywords(input);
    if tokens.is_empty() {
        return Err(FieldError::Empty);
    }
    Ok(tokens)
}

/// Adds the tokens of `input` to `current`. Existing keywords are kept.
pub fn merge_keywords(current: &[String], input: &str) -> Result<Vec<String>, FieldError> {
    let added = parse_keywords(input)?;
    let mut merged = current.to_vec();
    for token in added {
        if !merged.contains(&token) {
            merged.push(token);
        }
    }
    Ok(merged)
}
