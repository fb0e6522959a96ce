//! Per-view execution.
//!
//! Runs one view's pipeline: combine the global and view filters, compile
//! the result into a store predicate plus residual, fetch, apply the
//! residual, then finish any metadata sorting in memory. Sort keys on the
//! file name ride along to the store; everything else sorts here.

use tracing::debug;

use crate::compiler::compile_filter;
use crate::query::{FilterValue, QueryContext, QueryResult, View};
use crate::store::{ContentStore, Entry, ScalarField, SortDirection, StoreOrdering};

use super::sorter::{sort_entries, SortKey};

/// Executes views against a content store
pub struct ViewExecutor<'a, S: ContentStore> {
    store: &'a S,
}

impl<'a, S: ContentStore> ViewExecutor<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Resolves the entry set for one view.
    pub fn execute(
        &self,
        global_filter: Option<&FilterValue>,
        view: Option<&View>,
        ctx: &QueryContext,
    ) -> QueryResult<Vec<Entry>> {
        let combined = FilterValue::combined(global_filter, view.and_then(|v| v.filters.as_ref()));

        let compiled = match &combined {
            Some(filter) => compile_filter(filter, ctx.root_dir.as_deref())?,
            None => crate::compiler::CompiledFilter::match_all(),
        };

        let (store_order, memory_keys) = split_sort(view);

        debug!(
            site = %ctx.site_id,
            store_predicate = ?compiled.store,
            residual = compiled.has_residual(),
            memory_sort_keys = memory_keys.len(),
            "executing view"
        );

        let mut entries = self
            .store
            .list_entries(&ctx.site_id, &compiled.store, &store_order)?;

        if let Some(residual) = &compiled.residual {
            entries.retain(|entry| residual(entry));
        }

        sort_entries(&mut entries, &memory_keys);
        Ok(entries)
    }
}

/// Splits a view's sort specification between the store and memory.
///
/// `file.name` orders by stored path; metadata properties cannot be
/// ordered by the store and become in-memory keys. A view without an
/// explicit `sort` falls back to its column order, ascending.
fn split_sort(view: Option<&View>) -> (Vec<StoreOrdering>, Vec<SortKey>) {
    let mut store_order = Vec::new();
    let mut memory_keys = Vec::new();

    let Some(view) = view else {
        return (store_order, memory_keys);
    };

    if !view.sort.is_empty() {
        for item in &view.sort {
            if item.property == "file.name" {
                store_order.push(StoreOrdering {
                    field: ScalarField::Path,
                    direction: item.direction,
                });
            } else {
                memory_keys.push(SortKey {
                    property: item.property.clone(),
                    direction: item.direction,
                });
            }
        }
    } else {
        for column in &view.order {
            if column == "file.name" {
                store_order.push(StoreOrdering::asc(ScalarField::Path));
            } else {
                memory_keys.push(SortKey {
                    property: column.clone(),
                    direction: SortDirection::Asc,
                });
            }
        }
    }

    (store_order, memory_keys)
}
