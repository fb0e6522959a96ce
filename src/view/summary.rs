//! Column summaries.
//!
//! Aggregates one metadata column of the final row set. Summary names are
//! matched case-insensitively; an unknown name or an empty column yields
//! null rather than an error, so a typo in a definition degrades to a
//! blank cell.

use chrono::NaiveDateTime;
use serde_json::{json, Value};

use crate::store::Entry;

use super::sorter::as_number;

/// Supported summary functions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SummaryFn {
    Average,
    Min,
    Max,
    Sum,
    Range,
    Median,
    Stddev,
    Earliest,
    Latest,
    Checked,
    Unchecked,
    Empty,
    Filled,
    Unique,
}

impl SummaryFn {
    /// Case-insensitive lookup; `None` for unrecognized names
    pub fn parse(name: &str) -> Option<Self> {
        Some(match name.to_ascii_lowercase().as_str() {
            "average" => SummaryFn::Average,
            "min" => SummaryFn::Min,
            "max" => SummaryFn::Max,
            "sum" => SummaryFn::Sum,
            "range" => SummaryFn::Range,
            "median" => SummaryFn::Median,
            "stddev" => SummaryFn::Stddev,
            "earliest" => SummaryFn::Earliest,
            "latest" => SummaryFn::Latest,
            "checked" => SummaryFn::Checked,
            "unchecked" => SummaryFn::Unchecked,
            "empty" => SummaryFn::Empty,
            "filled" => SummaryFn::Filled,
            "unique" => SummaryFn::Unique,
            _ => return None,
        })
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SummaryFn::Average => "average",
            SummaryFn::Min => "min",
            SummaryFn::Max => "max",
            SummaryFn::Sum => "sum",
            SummaryFn::Range => "range",
            SummaryFn::Median => "median",
            SummaryFn::Stddev => "stddev",
            SummaryFn::Earliest => "earliest",
            SummaryFn::Latest => "latest",
            SummaryFn::Checked => "checked",
            SummaryFn::Unchecked => "unchecked",
            SummaryFn::Empty => "empty",
            SummaryFn::Filled => "filled",
            SummaryFn::Unique => "unique",
        }
    }
}

/// Computes one summary over a column of the given rows.
///
/// The column is a top-level metadata key; `file.name` carries no
/// metadata and always summarizes to null.
pub fn calculate(entries: &[Entry], column: &str, function: &str) -> Value {
    let values: Vec<&Value> = if column == "file.name" {
        Vec::new()
    } else {
        entries
            .iter()
            .filter_map(|entry| entry.metadata.get(column))
            .filter(|v| !v.is_null())
            .collect()
    };

    let Some(function) = SummaryFn::parse(function) else {
        return Value::Null;
    };

    // no valid input means null, even for the counting summaries
    if values.is_empty() {
        return Value::Null;
    }

    let numbers: Vec<f64> = values.iter().filter_map(|v| as_number(v)).collect();

    match function {
        SummaryFn::Average => numeric(&numbers, |ns| mean(ns)),
        SummaryFn::Min => numeric(&numbers, |ns| ns.iter().copied().fold(f64::INFINITY, f64::min)),
        SummaryFn::Max => numeric(&numbers, |ns| {
            ns.iter().copied().fold(f64::NEG_INFINITY, f64::max)
        }),
        SummaryFn::Sum => numeric(&numbers, |ns| ns.iter().sum()),
        SummaryFn::Range => numeric(&numbers, |ns| {
            let min = ns.iter().copied().fold(f64::INFINITY, f64::min);
            let max = ns.iter().copied().fold(f64::NEG_INFINITY, f64::max);
            max - min
        }),
        SummaryFn::Median => numeric(&numbers, |ns| {
            let mut sorted = ns.to_vec();
            sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
            let mid = sorted.len() / 2;
            if sorted.len() % 2 == 0 {
                (sorted[mid - 1] + sorted[mid]) / 2.0
            } else {
                sorted[mid]
            }
        }),
        SummaryFn::Stddev => numeric(&numbers, |ns| {
            let mean = mean(ns);
            let variance = ns.iter().map(|n| (n - mean).powi(2)).sum::<f64>() / ns.len() as f64;
            variance.sqrt()
        }),

        SummaryFn::Earliest => date_extreme(&values, true),
        SummaryFn::Latest => date_extreme(&values, false),

        SummaryFn::Checked => json!(values.iter().filter(|v| is_checked(v, true)).count()),
        SummaryFn::Unchecked => json!(values.iter().filter(|v| is_checked(v, false)).count()),

        SummaryFn::Empty => json!(entries.len() - values.len()),
        SummaryFn::Filled => json!(values.len()),

        SummaryFn::Unique => {
            let mut seen: Vec<&Value> = Vec::new();
            for value in &values {
                if !seen.contains(value) {
                    seen.push(*value);
                }
            }
            json!(seen.len())
        }
    }
}

fn numeric(numbers: &[f64], f: impl FnOnce(&[f64]) -> f64) -> Value {
    if numbers.is_empty() {
        Value::Null
    } else {
        json!(f(numbers))
    }
}

fn mean(numbers: &[f64]) -> f64 {
    numbers.iter().sum::<f64>() / numbers.len() as f64
}

fn is_checked(value: &Value, expected: bool) -> bool {
    match value {
        Value::Bool(b) => *b == expected,
        Value::String(s) => s == if expected { "true" } else { "false" },
        _ => false,
    }
}

fn date_extreme(values: &[&Value], earliest: bool) -> Value {
    let mut dates: Vec<NaiveDateTime> = values.iter().filter_map(|v| parse_date(v)).collect();
    if dates.is_empty() {
        return Value::Null;
    }
    dates.sort();
    let picked = if earliest {
        dates[0]
    } else {
        dates[dates.len() - 1]
    };
    json!(picked.format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string())
}

fn parse_date(value: &Value) -> Option<NaiveDateTime> {
    let Value::String(s) = value else { return None };
    let s = s.trim();
    chrono::DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.naive_utc())
        .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S"))
        .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S"))
        .or_else(|_| {
            chrono::NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .map(|d| d.and_hms_opt(0, 0, 0).unwrap_or_default())
        })
        .ok()
}
