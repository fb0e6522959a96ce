//! Parse error type for the expression language.

use thiserror::Error;

/// Result type for expression parsing
pub type ParseResult<T> = Result<T, ParseError>;

/// A syntax error in a filter expression.
///
/// Carries the offending substring so callers can render it inline.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid expression near {fragment:?}: {message}")]
pub struct ParseError {
    /// What went wrong
    pub message: String,
    /// The substring of the input the parser choked on
    pub fragment: String,
}

impl ParseError {
    /// Creates a parse error for the given fragment
    pub fn new(message: impl Into<String>, fragment: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            fragment: fragment.into(),
        }
    }
}
