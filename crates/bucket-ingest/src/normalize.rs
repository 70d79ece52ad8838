//! Token normalization for typed input.
//!
//! Typed input never loses elements: every token becomes exactly one integer.
//! Contrast with file import, which drops lines it cannot read.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

/// Optional minus sign followed by ASCII digits, nothing else.
static INTEGER_TOKEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^-?[0-9]+$").unwrap_or_else(|e| panic!("invalid integer pattern: {e}"))
});

/// A classified input token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token {
    /// Empty token, kept while the user is still typing.
    Empty,
    /// A lone `-`, kept while the user is still typing.
    Sign,
    /// A resolved integer.
    Value(i64),
}

impl Token {
    /// Final integer value at submit time. Unfinished tokens become 0.
    pub fn resolve(self) -> i64 {
        match self {
            Self::Empty | Self::Sign => 0,
            Self::Value(value) => value,
        }
    }

    pub fn is_pending(self) -> bool {
        matches!(self, Self::Empty | Self::Sign)
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => Ok(()),
            Self::Sign => f.write_str("-"),
            Self::Value(value) => write!(f, "{value}"),
        }
    }
}

/// Classify one raw token.
///
/// Anything that is not a plain signed integer (letters, floats, repeated
/// signs, values outside `i64`) collapses to `Value(0)`.
pub fn classify_token(token: &str) -> Token {
    match token {
        "" => Token::Empty,
        "-" => Token::Sign,
        _ if INTEGER_TOKEN.is_match(token) => Token::Value(token.parse().unwrap_or(0)),
        _ => Token::Value(0),
    }
}

/// Split a raw line into tokens.
///
/// Every whitespace character separates two tokens, so repeated whitespace
/// yields empty tokens. An empty line has no tokens at all.
pub fn tokenize(raw: &str) -> Vec<&str> {
    if raw.is_empty() {
        return Vec::new();
    }
    raw.split(char::is_whitespace).collect()
}

/// Convert raw tokens into integers, one output per input.
pub fn normalize<S: AsRef<str>>(tokens: &[S]) -> Vec<i64> {
    tokens
        .iter()
        .map(|token| classify_token(token.as_ref()).resolve())
        .collect()
}

/// Render classified tokens back to an editable line.
pub fn render_tokens(tokens: &[Token]) -> String {
    tokens
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" ")
}

/// The shapes a candidate sequence can take before submission.
///
/// Resolved exactly once, at submit time, into plain integers.
#[derive(Debug, Clone, Copy)]
pub enum RawSequence<'a> {
    /// Unclassified strings, one per entry.
    Raw(&'a [String]),
    /// Tokens classified eagerly while editing.
    Tokens(&'a [Token]),
    /// Already-integer data.
    Values(&'a [i64]),
}

impl RawSequence<'_> {
    pub fn len(&self) -> usize {
        match self {
            Self::Raw(raw) => raw.len(),
            Self::Tokens(tokens) => tokens.len(),
            Self::Values(values) => values.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn resolve(self) -> Vec<i64> {
        match self {
            Self::Raw(raw) => normalize(raw),
            Self::Tokens(tokens) => tokens.iter().map(|token| token.resolve()).collect(),
            Self::Values(values) => values.to_vec(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_integers() {
        assert_eq!(classify_token("42"), Token::Value(42));
        assert_eq!(classify_token("-17"), Token::Value(-17));
        assert_eq!(classify_token("007"), Token::Value(7));
    }

    #[test]
    fn test_classify_pending() {
        assert_eq!(classify_token(""), Token::Empty);
        assert_eq!(classify_token("-"), Token::Sign);
        assert!(classify_token("-").is_pending());
    }

    #[test]
    fn test_classify_garbage_is_zero() {
        for token in ["abc", "1.5", "--3", "+4", "3-", "1e5", "٣"] {
            assert_eq!(classify_token(token), Token::Value(0), "token {token:?}");
        }
    }

    #[test]
    fn test_classify_out_of_range_is_zero() {
        assert_eq!(classify_token("99999999999999999999"), Token::Value(0));
    }

    #[test]
    fn test_tokenize_keeps_empty_tokens() {
        assert_eq!(tokenize("1  2"), vec!["1", "", "2"]);
        assert_eq!(tokenize("1 -"), vec!["1", "-"]);
        assert!(tokenize("").is_empty());
    }

    #[test]
    fn test_normalize_resolves_pending_to_zero() {
        assert_eq!(normalize(&["5", "", "-", "x", "-8"]), vec![5, 0, 0, 0, -8]);
    }

    #[test]
    fn test_render_round_trips_pending_tokens() {
        let tokens: Vec<Token> = tokenize("3 - x ").into_iter().map(classify_token).collect();
        assert_eq!(render_tokens(&tokens), "3 - 0 ");
    }

    #[test]
    fn test_raw_sequence_shapes_agree() {
        let raw = vec!["4".to_string(), "-".to_string()];
        let tokens = [Token::Value(4), Token::Sign];
        let values = [4, 0];
        assert_eq!(RawSequence::Raw(&raw).resolve(), vec![4, 0]);
        assert_eq!(RawSequence::Tokens(&tokens).resolve(), vec![4, 0]);
        assert_eq!(RawSequence::Values(&values).resolve(), vec![4, 0]);
    }
}
