//! Declarative store predicates
//!
//! The push-down compiler produces these; store implementations execute
//! them. [`StorePredicate::matches`] is the reference in-memory semantics,
//! also used directly when an OR/NOT group forces a residual check.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::entry::Entry;

/// Scalar entry fields the store can filter and order by directly
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScalarField {
    Path,
    Extension,
}

impl ScalarField {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScalarField::Path => "path",
            ScalarField::Extension => "extension",
        }
    }

    fn value_of<'a>(&self, entry: &'a Entry) -> &'a str {
        match self {
            ScalarField::Path => &entry.path,
            ScalarField::Extension => &entry.extension,
        }
    }
}

/// Comparison operators supported at the store level
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    Eq,
    Ne,
    Gt,
    Lt,
    Gte,
    Lte,
}

impl CompareOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            CompareOp::Eq => "eq",
            CompareOp::Ne => "ne",
            CompareOp::Gt => "gt",
            CompareOp::Lt => "lt",
            CompareOp::Gte => "gte",
            CompareOp::Lte => "lte",
        }
    }
}

/// Sort direction
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    #[serde(alias = "ASC", alias = "Asc")]
    Asc,
    #[serde(alias = "DESC", alias = "Desc")]
    Desc,
}

impl SortDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        }
    }

    /// Applies the direction to an ascending ordering
    pub fn apply(&self, ordering: Ordering) -> Ordering {
        match self {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    }
}

/// Store-level ordering on a scalar field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreOrdering {
    pub field: ScalarField,
    pub direction: SortDirection,
}

impl StoreOrdering {
    pub fn asc(field: ScalarField) -> Self {
        Self {
            field,
            direction: SortDirection::Asc,
        }
    }

    pub fn desc(field: ScalarField) -> Self {
        Self {
            field,
            direction: SortDirection::Desc,
        }
    }
}

/// A predicate the backing store can execute directly
#[derive(Debug, Clone, PartialEq)]
pub enum StorePredicate {
    /// Matches every entry
    All,
    /// Compare a scalar field against a literal
    Scalar {
        field: ScalarField,
        op: CompareOp,
        value: Value,
    },
    /// Compare a metadata path against a literal
    Metadata {
        path: Vec<String>,
        op: CompareOp,
        value: Value,
    },
    /// Path starts with the given prefix
    PathPrefix(String),
    /// Metadata path is present and not null
    MetadataExists(Vec<String>),
    And(Vec<StorePredicate>),
    Or(Vec<StorePredicate>),
    Not(Box<StorePredicate>),
}

impl StorePredicate {
    /// Returns true if this predicate matches every entry
    pub fn is_all(&self) -> bool {
        matches!(self, StorePredicate::All)
    }

    /// Conjunction that drops match-all parts and unwraps singletons
    pub fn and(predicates: Vec<StorePredicate>) -> StorePredicate {
        let mut parts: Vec<StorePredicate> =
            predicates.into_iter().filter(|p| !p.is_all()).collect();
        match parts.len() {
            0 => StorePredicate::All,
            1 => parts.remove(0),
            _ => StorePredicate::And(parts),
        }
    }

    /// Disjunction; a match-all branch absorbs the whole group
    pub fn or(predicates: Vec<StorePredicate>) -> StorePredicate {
        if predicates.is_empty() || predicates.iter().any(StorePredicate::is_all) {
            return StorePredicate::All;
        }
        let mut parts = predicates;
        match parts.len() {
            1 => parts.remove(0),
            _ => StorePredicate::Or(parts),
        }
    }

    /// Reference evaluation of this predicate against one entry.
    ///
    /// Store implementations must agree with these semantics exactly.
    pub fn matches(&self, entry: &Entry) -> bool {
        match self {
            StorePredicate::All => true,
            StorePredicate::Scalar { field, op, value } => {
                let actual = Value::String(field.value_of(entry).to_string());
                compare_json(&actual, *op, value)
            }
            StorePredicate::Metadata { path, op, value } => {
                match lookup_path(&entry.metadata, path) {
                    Some(actual) if !actual.is_null() => compare_json(actual, *op, value),
                    _ => false,
                }
            }
            StorePredicate::PathPrefix(prefix) => entry.path.starts_with(prefix.as_str()),
            StorePredicate::MetadataExists(path) => {
                matches!(lookup_path(&entry.metadata, path), Some(v) if !v.is_null())
            }
            StorePredicate::And(parts) => parts.iter().all(|p| p.matches(entry)),
            StorePredicate::Or(parts) => parts.iter().any(|p| p.matches(entry)),
            StorePredicate::Not(inner) => !inner.matches(entry),
        }
    }
}

fn lookup_path<'a>(metadata: &'a Value, path: &[String]) -> Option<&'a Value> {
    let mut current = metadata;
    for key in path {
        current = current.get(key)?;
    }
    Some(current)
}

fn compare_json(actual: &Value, op: CompareOp, expected: &Value) -> bool {
    match op {
        CompareOp::Eq => json_eq(actual, expected),
        CompareOp::Ne => !json_eq(actual, expected),
        CompareOp::Gt => json_cmp(actual, expected) == Some(Ordering::Greater),
        CompareOp::Lt => json_cmp(actual, expected) == Some(Ordering::Less),
        CompareOp::Gte => matches!(
            json_cmp(actual, expected),
            Some(Ordering::Greater | Ordering::Equal)
        ),
        CompareOp::Lte => matches!(
            json_cmp(actual, expected),
            Some(Ordering::Less | Ordering::Equal)
        ),
    }
}

/// Equality with numeric widening (integer 5 equals literal 5.0)
fn json_eq(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => match (x.as_f64(), y.as_f64()) {
            (Some(xf), Some(yf)) => xf == yf,
            _ => x == y,
        },
        _ => a == b,
    }
}

/// Ordering over numbers and strings; other types are not ordered
fn json_cmp(a: &Value, b: &Value) -> Option<Ordering> {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => x.as_f64()?.partial_cmp(&y.as_f64()?),
        (Value::String(x), Value::String(y)) => Some(x.cmp(y)),
        _ => None,
    }
}
