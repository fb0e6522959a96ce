//! In-memory metadata sorting.
//!
//! Store-level ordering only covers scalar entry fields; every sort key
//! naming a metadata property is applied here instead, after filtering.
//! The sort is stable, so store-ordered input keeps its relative order
//! between equal keys.

use std::cmp::Ordering;

use serde_json::Value;

use crate::store::{Entry, SortDirection};

/// One in-memory sort key over a top-level metadata property
#[derive(Debug, Clone)]
pub struct SortKey {
    pub property: String,
    pub direction: SortDirection,
}

/// Sorts entries by the given metadata keys, in order of significance.
///
/// Missing and null values sort after present ones ascending and before
/// them descending. When both values coerce to numbers the comparison is
/// numeric, otherwise lexicographic over their rendered strings.
pub fn sort_entries(entries: &mut [Entry], keys: &[SortKey]) {
    if keys.is_empty() {
        return;
    }
    entries.sort_by(|a, b| {
        for key in keys {
            let a_value = a.metadata.get(&key.property);
            let b_value = b.metadata.get(&key.property);

            let a_value = a_value.filter(|v| !v.is_null());
            let b_value = b_value.filter(|v| !v.is_null());
            let (a_value, b_value) = match (a_value, b_value) {
                (None, None) => continue,
                (None, Some(_)) => return key.direction.apply(Ordering::Greater),
                (Some(_), None) => return key.direction.apply(Ordering::Less),
                (Some(a), Some(b)) => (a, b),
            };

            let ordering = compare_values(a_value, b_value);
            if ordering != Ordering::Equal {
                return key.direction.apply(ordering);
            }
        }
        Ordering::Equal
    });
}

fn compare_values(a: &Value, b: &Value) -> Ordering {
    if let (Some(x), Some(y)) = (as_number(a), as_number(b)) {
        return x.partial_cmp(&y).unwrap_or(Ordering::Equal);
    }
    render(a).cmp(&render(b))
}

/// Numeric coercion used by sorting and summaries (strings parse, booleans
/// count as 0/1, everything else does not coerce)
pub(crate) fn as_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                Some(0.0)
            } else {
                trimmed.parse().ok()
            }
        }
        _ => None,
    }
}

fn render(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
