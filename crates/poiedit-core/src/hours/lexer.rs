//! Tokenizer for the shorthand hours notation.

/// A lexical unit of one hours clause.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// Run of letters (any alphabet), lower-cased
    Word(String),
    /// Run of digits, `:` and `.` starting with a digit; shape is checked
    /// by the parser
    Number(String),
    Dash,
    Other(char),
}

fn is_dash(c: char) -> bool {
    matches!(c, '-' | '–' | '—')
}

/// Splits a clause into tokens, dropping whitespace.
pub fn tokenize(input: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut chars = input.chars().peekable();

    while let Some(&c) = chars.peek() {
        if c.is_whitespace() {
            chars.next();
        } else if c.is_alphabetic() {
            let mut word = String::new();
            while let Some(&c) = chars.peek().filter(|c| c.is_alphabetic()) {
                word.extend(c.to_lowercase());
                chars.next();
            }
            tokens.push(Token::Word(word));
        } else if c.is_ascii_digit() {
            let mut number = String::new();
            while let Some(&c) = chars
                .peek()
                .filter(|c| c.is_ascii_digit() || **c == ':' || **c == '.')
            {
                number.push(c);
                chars.next();
            }
            tokens.push(Token::Number(number));
        } else if is_dash(c) {
            chars.next();
            tokens.push(Token::Dash);
        } else {
            chars.next();
            tokens.push(Token::Other(c));
        }
    }

    tokens
}
