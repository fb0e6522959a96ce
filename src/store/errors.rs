//! Store error types.
//!
//! A store failure propagates to the caller of the whole query; partial
//! results would be misleading, so there is no per-entry recovery here.

use thiserror::Error;

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors surfaced by a [`super::ContentStore`] implementation
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    /// The backing store could not be reached
    #[error("content store unavailable: {0}")]
    Unavailable(String),

    /// The store rejected the compiled predicate
    #[error("content store rejected predicate: {0}")]
    RejectedPredicate(String),
}
