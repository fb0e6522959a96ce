//! Recursive combination of filter groups.
//!
//! Merges nested `and`/`or`/`not` groups into one [`CompiledFilter`],
//! keeping the store/residual split sound:
//!
//! - AND pushes every child's store predicate down, even partially
//! - OR degrades to match-everything as soon as any branch carries a
//!   residual (a store match on one branch must not be required of all)
//! - NOT always evaluates in memory; negation cannot be split across the
//!   store and residual halves independently

use std::fmt;

use crate::expr::{parse_expression, ParseResult};
use crate::query::FilterValue;
use crate::runtime::entry_matches;
use crate::store::{Entry, StorePredicate};

use super::pushdown::{compile_expression, CompileResult};

/// The in-memory half of a compiled filter
pub type Residual = Box<dyn Fn(&Entry) -> bool>;

/// A filter split between the store and the in-memory interpreter.
///
/// The store predicate is always present (possibly match-everything); the
/// residual, when present, must additionally hold for an entry to match.
pub struct CompiledFilter {
    pub store: StorePredicate,
    pub residual: Option<Residual>,
}

impl CompiledFilter {
    /// A filter matching every entry
    pub fn match_all() -> Self {
        Self {
            store: StorePredicate::All,
            residual: None,
        }
    }

    pub fn has_residual(&self) -> bool {
        self.residual.is_some()
    }

    /// Full in-memory evaluation: store predicate and residual together
    pub fn matches(&self, entry: &Entry) -> bool {
        self.store.matches(entry) && self.residual.as_ref().is_none_or(|r| r(entry))
    }
}

impl fmt::Debug for CompiledFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompiledFilter")
            .field("store", &self.store)
            .field("residual", &self.residual.is_some())
            .finish()
    }
}

/// Compiles a filter value into a store/residual pair.
///
/// Fails only on malformed expression syntax; everything the push-down
/// compiler cannot represent lands in the residual instead.
pub fn compile_filter(filter: &FilterValue, root_dir: Option<&str>) -> ParseResult<CompiledFilter> {
    match filter {
        FilterValue::Expression(src) => {
            let ast = parse_expression(src)?;
            match compile_expression(&ast, root_dir) {
                CompileResult::Pushed(store) => Ok(CompiledFilter {
                    store,
                    residual: None,
                }),
                CompileResult::NotRepresentable => {
                    let root = root_dir.map(str::to_string);
                    Ok(CompiledFilter {
                        store: StorePredicate::All,
                        residual: Some(Box::new(move |entry| {
                            entry_matches(&ast, entry, root.as_deref())
                        })),
                    })
                }
            }
        }

        FilterValue::Group(group) => {
            // a node may carry several connectives at once; the groups
            // combine with implicit AND
            let mut parts = Vec::new();
            if !group.and.is_empty() {
                let children = compile_children(&group.and, root_dir)?;
                parts.push(combine_and(children));
            }
            if !group.or.is_empty() {
                let children = compile_children(&group.or, root_dir)?;
                parts.push(combine_or(children));
            }
            if !group.not.is_empty() {
                let children = compile_children(&group.not, root_dir)?;
                parts.push(combine_not(children));
            }
            Ok(combine_and(parts))
        }
    }
}

fn compile_children(
    children: &[FilterValue],
    root_dir: Option<&str>,
) -> ParseResult<Vec<CompiledFilter>> {
    children
        .iter()
        .map(|child| compile_filter(child, root_dir))
        .collect()
}

/// All children must hold: store predicates conjoin, residuals conjoin.
fn combine_and(parts: Vec<CompiledFilter>) -> CompiledFilter {
    let mut stores = Vec::with_capacity(parts.len());
    let mut residuals: Vec<Residual> = Vec::new();
    for part in parts {
        stores.push(part.store);
        if let Some(residual) = part.residual {
            residuals.push(residual);
        }
    }

    let residual: Option<Residual> = if residuals.is_empty() {
        None
    } else {
        Some(Box::new(move |entry| residuals.iter().all(|r| r(entry))))
    };

    CompiledFilter {
        store: StorePredicate::and(stores),
        residual,
    }
}

/// At least one child must hold. Pure-store children combine into a
/// store-level OR; one residual child forces the whole group in memory.
fn combine_or(parts: Vec<CompiledFilter>) -> CompiledFilter {
    if parts.iter().all(|p| p.residual.is_none()) {
        let stores = parts.into_iter().map(|p| p.store).collect();
        return CompiledFilter {
            store: StorePredicate::or(stores),
            residual: None,
        };
    }

    CompiledFilter {
        store: StorePredicate::All,
        residual: Some(Box::new(move |entry| {
            parts.iter().any(|part| part.matches(entry))
        })),
    }
}

/// No child may hold; each child's full predicate is negated in memory.
fn combine_not(parts: Vec<CompiledFilter>) -> CompiledFilter {
    CompiledFilter {
        store: StorePredicate::All,
        residual: Some(Box::new(move |entry| {
            parts.iter().all(|part| !part.matches(entry))
        })),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{CompareOp, ScalarField};
    use serde_json::json;

    fn expr(src: &str) -> FilterValue {
        FilterValue::expr(src)
    }

    fn entries() -> Vec<Entry> {
        vec![
            Entry::new("notes/test.md", json!({"price": 20, "status": "done"})),
            Entry::new("notes/other.md", json!({"price": 5})),
            Entry::new("drafts/test.md", json!({"price": 15})),
            Entry::new("report.pdf", json!({})),
        ]
    }

    /// Interprets the original filter with the runtime only, no push-down.
    fn interpret_directly(filter: &FilterValue, entry: &Entry, root: Option<&str>) -> bool {
        match filter {
            FilterValue::Expression(src) => {
                entry_matches(&parse_expression(src).unwrap(), entry, root)
            }
            FilterValue::Group(group) => {
                let and_ok = group.and.is_empty()
                    || group.and.iter().all(|c| interpret_directly(c, entry, root));
                let or_ok = group.or.is_empty()
                    || group.or.iter().any(|c| interpret_directly(c, entry, root));
                let not_ok = group.not.is_empty()
                    || group.not.iter().all(|c| !interpret_directly(c, entry, root));
                and_ok && or_ok && not_ok
            }
        }
    }

    /// The store-then-residual split must equal direct interpretation.
    fn assert_equivalent(filter: &FilterValue, root_dir: Option<&str>) {
        let compiled = compile_filter(filter, root_dir).unwrap();
        for entry in entries() {
            let split = compiled.store.matches(&entry)
                && compiled.residual.as_ref().is_none_or(|r| r(&entry));
            let direct = interpret_directly(filter, &entry, root_dir);
            assert_eq!(split, direct, "split diverged for {}", entry.path);
        }
    }

    #[test]
    fn test_leaf_pushes_down_without_residual() {
        let compiled = compile_filter(&expr("file.ext == \"md\""), None).unwrap();
        assert_eq!(
            compiled.store,
            StorePredicate::Scalar {
                field: ScalarField::Extension,
                op: CompareOp::Eq,
                value: json!("md"),
            }
        );
        assert!(!compiled.has_residual());
    }

    #[test]
    fn test_computed_leaf_is_full_residual() {
        let compiled = compile_filter(&expr("file.name == \"test.md\""), None).unwrap();
        assert!(compiled.store.is_all());
        assert!(compiled.has_residual());

        let residual = compiled.residual.as_ref().unwrap();
        assert!(residual(&Entry::new("notes/test.md", json!({}))));
        assert!(!residual(&Entry::new("notes/other.md", json!({}))));
    }

    #[test]
    fn test_and_group_pushes_partially() {
        let filter = FilterValue::and(vec![
            expr("file.ext == \"md\""),
            expr("file.name == \"test.md\""),
        ]);
        let compiled = compile_filter(&filter, None).unwrap();

        // store constrains on extension only, residual still required
        assert_eq!(
            compiled.store,
            StorePredicate::Scalar {
                field: ScalarField::Extension,
                op: CompareOp::Eq,
                value: json!("md"),
            }
        );
        assert!(compiled.has_residual());

        assert!(compiled.matches(&Entry::new("notes/test.md", json!({}))));
        assert!(!compiled.matches(&Entry::new("notes/other.md", json!({}))));
    }

    #[test]
    fn test_or_group_of_pure_store_children() {
        let filter = FilterValue::or(vec![expr("file.ext == \"md\""), expr("price > 10")]);
        let compiled = compile_filter(&filter, None).unwrap();
        assert!(!compiled.has_residual());
        assert!(matches!(compiled.store, StorePredicate::Or(_)));
    }

    #[test]
    fn test_or_group_with_residual_child_degrades() {
        let filter = FilterValue::or(vec![
            expr("file.ext == \"pdf\""),
            expr("file.name == \"test.md\""),
        ]);
        let compiled = compile_filter(&filter, None).unwrap();
        assert!(compiled.store.is_all());
        assert!(compiled.has_residual());

        assert!(compiled.matches(&Entry::new("report.pdf", json!({}))));
        assert!(compiled.matches(&Entry::new("notes/test.md", json!({}))));
        assert!(!compiled.matches(&Entry::new("notes/other.md", json!({}))));
    }

    #[test]
    fn test_not_group_negates_full_predicate() {
        let filter = FilterValue::not(vec![expr("file.ext == \"pdf\"")]);
        let compiled = compile_filter(&filter, None).unwrap();
        assert!(compiled.store.is_all());
        assert!(compiled.has_residual());

        assert!(!compiled.matches(&Entry::new("report.pdf", json!({}))));
        assert!(compiled.matches(&Entry::new("notes/test.md", json!({}))));
    }

    #[test]
    fn test_simultaneous_connectives_combine_with_and() {
        let filter = FilterValue::Group(crate::query::FilterGroup {
            and: vec![expr("file.ext == \"md\"")],
            or: vec![],
            not: vec![expr("price > 10")],
        });
        let compiled = compile_filter(&filter, None).unwrap();

        assert!(compiled.matches(&Entry::new("notes/other.md", json!({"price": 5}))));
        assert!(!compiled.matches(&Entry::new("notes/test.md", json!({"price": 20}))));
        assert!(!compiled.matches(&Entry::new("report.pdf", json!({"price": 5}))));
    }

    #[test]
    fn test_nested_groups() {
        let filter = FilterValue::and(vec![
            expr("file.ext == \"md\""),
            FilterValue::or(vec![expr("price > 10"), expr("status == \"done\"")]),
        ]);
        let compiled = compile_filter(&filter, None).unwrap();

        assert!(compiled.matches(&Entry::new("a.md", json!({"price": 20}))));
        assert!(compiled.matches(&Entry::new("b.md", json!({"status": "done"}))));
        assert!(!compiled.matches(&Entry::new("c.md", json!({"price": 5}))));
    }

    #[test]
    fn test_parse_error_propagates() {
        assert!(compile_filter(&expr("price >"), None).is_err());
    }

    #[test]
    fn test_split_equivalence_invariant() {
        let filters = [
            expr("file.ext == \"md\""),
            expr("file.name == \"test.md\""),
            expr("price > 10"),
            FilterValue::and(vec![expr("file.ext == \"md\""), expr("price > 10")]),
            FilterValue::or(vec![
                expr("file.ext == \"pdf\""),
                expr("file.name == \"test.md\""),
            ]),
            FilterValue::not(vec![expr("status == \"done\"")]),
            FilterValue::and(vec![
                expr("file.inFolder(\"notes\")"),
                FilterValue::not(vec![expr("price > 10")]),
            ]),
        ];
        for filter in &filters {
            assert_equivalent(filter, None);
            assert_equivalent(filter, Some("Public"));
        }
    }
}
