//! Query-level errors.
//!
//! These abort the whole query. Evaluation failures on individual entries
//! never surface here; the runtime drops the offending entry instead.

use thiserror::Error;

use crate::expr::ParseError;
use crate::store::StoreError;

#[derive(Debug, Error)]
pub enum QueryError {
    #[error("malformed query definition: {0}")]
    Definition(#[from] serde_yaml::Error),

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

pub type QueryResult<T> = Result<T, QueryError>;
