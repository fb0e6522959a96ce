//! Query documents
//!
//! The public face of the engine: the serde model for query definitions,
//! the execution context, the output payloads and the orchestrator that
//! ties parsing, compilation and view execution together.

mod context;
mod definition;
mod errors;
mod orchestrator;
mod payload;

pub use context::QueryContext;
pub use definition::{
    FilterGroup, FilterValue, ImageFit, QueryDefinition, RowHeight, SortItem, View, ViewType,
};
pub use errors::{QueryError, QueryResult};
pub use orchestrator::QueryOrchestrator;
pub use payload::{QueryOutput, RowPayload, SummaryPayload, ViewPayload};
