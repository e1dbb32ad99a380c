use super::text::CLEAR;

/// Splits a phone list on `;` and `,`. `-` or empty input clears it.
pub fn parse_phones(input: &str) -> Vec<String> {
    let value = input.trim();
    if value == CLEAR {
        return Vec::new();
    }
    value
        .split([';', ','])
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(String::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_and_trim() {
        assert_eq!(
            parse_phones("+375 29 111-11-11; 8017 222 ,, 333"),
            vec!["+375 29 111-11-11", "8017 222", "333"]
        );
    }

    #[test]
    fn test_clear() {
        assert!(parse_phones("-").is_empty());
        assert!(parse_phones("").is_empty());
    }
}
