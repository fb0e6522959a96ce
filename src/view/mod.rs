//! View execution
//!
//! Turns one view of a query definition into its final entry set:
//!
//! 1. Compile the combined filters and fetch from the store ([`ViewExecutor`])
//! 2. Finish metadata sorting in memory ([`sort_entries`])
//! 3. Aggregate summary columns ([`summary::calculate`])

mod executor;
mod sorter;
pub mod summary;

pub use executor::ViewExecutor;
pub use sorter::{sort_entries, SortKey};
