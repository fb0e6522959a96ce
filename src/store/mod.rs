//! Content store seam
//!
//! The query engine never talks to a concrete database; it hands a
//! declarative [`StorePredicate`] to a [`ContentStore`] implementation and
//! gets candidate entries back. The predicate grammar is deliberately
//! small: field equality/ordering, metadata-path comparisons, path-prefix
//! match, metadata-path-exists, and boolean composition.
//!
//! # Invariants
//!
//! - Entries are read-only inputs; the engine never mutates the store
//! - Predicate evaluation is deterministic for a given entry set
//! - [`StorePredicate::matches`] is the reference semantics every store
//!   implementation must agree with

mod entry;
mod errors;
mod memory;
mod predicate;

pub use entry::Entry;
pub use errors::{StoreError, StoreResult};
pub use memory::MemoryStore;
pub use predicate::{CompareOp, ScalarField, SortDirection, StoreOrdering, StorePredicate};

/// Read-only access to a site's content entries.
///
/// Implementations must execute predicates with exactly the semantics of
/// [`StorePredicate::matches`]; the engine relies on that agreement when it
/// splits a filter between the store and the in-memory residual.
pub trait ContentStore {
    /// Lists entries for a site matching the predicate, optionally ordered
    /// by scalar fields at the store level.
    fn list_entries(
        &self,
        site_id: &str,
        predicate: &StorePredicate,
        order: &[StoreOrdering],
    ) -> StoreResult<Vec<Entry>>;

    /// Lists every entry path for a site (used by the rendering layer to
    /// resolve cross-references).
    fn list_paths(&self, site_id: &str) -> StoreResult<Vec<String>>;
}
