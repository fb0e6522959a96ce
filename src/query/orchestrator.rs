//! Query orchestration.
//!
//! The top-level entry point: parse a YAML query document, execute every
//! view through the [`ViewExecutor`], attach summaries and build the
//! output payload. A definition without views gets the implicit table
//! view; an empty document lists everything.

use std::collections::BTreeMap;

use tracing::debug;

use crate::store::ContentStore;
use crate::view::{summary, ViewExecutor};

use super::context::QueryContext;
use super::definition::{QueryDefinition, View};
use super::errors::QueryResult;
use super::payload::{QueryOutput, RowPayload, SummaryPayload, ViewPayload};

/// Resolves query documents against a content store
pub struct QueryOrchestrator<'a, S: ContentStore> {
    store: &'a S,
}

impl<'a, S: ContentStore> QueryOrchestrator<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Parses and executes a full query document.
    ///
    /// Fails on malformed YAML, expression syntax errors and store
    /// failures; entries whose evaluation fails are silently excluded.
    pub fn resolve(&self, text: &str, ctx: &QueryContext) -> QueryResult<QueryOutput> {
        let definition: QueryDefinition = if text.trim().is_empty() {
            QueryDefinition::default()
        } else {
            serde_yaml::from_str(text)?
        };

        let views = if definition.views.is_empty() {
            vec![View::default_table()]
        } else {
            definition.views.clone()
        };

        let executor = ViewExecutor::new(self.store);
        let mut payloads = Vec::with_capacity(views.len());

        for view in views {
            let entries = executor.execute(definition.filters.as_ref(), Some(&view), ctx)?;

            let summaries = if view.summaries.is_empty() {
                None
            } else {
                let mut computed = BTreeMap::new();
                for (column, function) in &view.summaries {
                    computed.insert(
                        column.clone(),
                        SummaryPayload {
                            value: summary::calculate(&entries, column, function),
                            function: function.clone(),
                        },
                    );
                }
                Some(computed)
            };

            debug!(
                site = %ctx.site_id,
                view = %view.name,
                rows = entries.len(),
                "resolved view"
            );

            let rows = entries
                .into_iter()
                .map(|entry| RowPayload {
                    path: entry.path,
                    app_path: entry.app_path,
                    metadata: entry.metadata,
                })
                .collect();

            payloads.push(ViewPayload {
                columns: view.columns(),
                view,
                rows,
                summaries,
            });
        }

        let all_site_paths = self.store.list_paths(&ctx.site_id)?;

        Ok(QueryOutput {
            views: payloads,
            all_site_paths,
        })
    }
}
