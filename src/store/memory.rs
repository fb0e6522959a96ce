//! In-memory content store.
//!
//! Reference [`ContentStore`] implementation built directly on
//! [`StorePredicate::matches`]. Used by the test suites and as the
//! executable specification a production store adapter must agree with.

use std::collections::HashMap;

use super::entry::Entry;
use super::errors::StoreResult;
use super::predicate::{ScalarField, StoreOrdering, StorePredicate};
use super::ContentStore;

/// Content entries held in memory, grouped by site
#[derive(Debug, Default)]
pub struct MemoryStore {
    sites: HashMap<String, Vec<Entry>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an entry to a site
    pub fn insert(&mut self, site_id: impl Into<String>, entry: Entry) {
        self.sites.entry(site_id.into()).or_default().push(entry);
    }

    /// Number of entries for a site
    pub fn len(&self, site_id: &str) -> usize {
        self.sites.get(site_id).map_or(0, Vec::len)
    }

    pub fn is_empty(&self, site_id: &str) -> bool {
        self.len(site_id) == 0
    }
}

impl ContentStore for MemoryStore {
    fn list_entries(
        &self,
        site_id: &str,
        predicate: &StorePredicate,
        order: &[StoreOrdering],
    ) -> StoreResult<Vec<Entry>> {
        let mut entries: Vec<Entry> = self
            .sites
            .get(site_id)
            .map(|entries| {
                entries
                    .iter()
                    .filter(|entry| predicate.matches(entry))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();

        // Stable multi-key sort: later keys break ties of earlier ones
        if !order.is_empty() {
            entries.sort_by(|a, b| {
                for spec in order {
                    let cmp = match spec.field {
                        ScalarField::Path => a.path.cmp(&b.path),
                        ScalarField::Extension => a.extension.cmp(&b.extension),
                    };
                    let cmp = spec.direction.apply(cmp);
                    if cmp != std::cmp::Ordering::Equal {
                        return cmp;
                    }
                }
                std::cmp::Ordering::Equal
            });
        }

        Ok(entries)
    }

    fn list_paths(&self, site_id: &str) -> StoreResult<Vec<String>> {
        Ok(self
            .sites
            .get(site_id)
            .map(|entries| entries.iter().map(|e| e.path.clone()).collect())
            .unwrap_or_default())
    }
}
