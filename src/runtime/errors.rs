//! Runtime evaluation errors.
//!
//! An evaluation error is scoped to a single entry: the entry is treated
//! as not matching and the query continues. Nothing here aborts a render.

use thiserror::Error;

/// Result type for runtime evaluation
pub type EvalResult<T> = Result<T, EvalError>;

/// Errors raised while interpreting an expression against one entry
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EvalError {
    /// A call expression resolved to something that is not a function
    #[error("value of type {0} is not callable")]
    NotCallable(&'static str),

    /// `date()` received a string it could not parse
    #[error("invalid date string: {0}")]
    InvalidDate(String),
}
