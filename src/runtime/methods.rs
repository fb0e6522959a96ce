//! Built-in member dispatch
//!
//! Type-directed method tables for dates, strings, numbers, lists and
//! plain objects, plus the `isTruthy`/`toString` fallback every value
//! carries. Properties like `.length` resolve to values; methods resolve
//! to [`Callable`]s bound to a clone of the receiver.

use chrono::{Datelike, Duration, Local, NaiveDateTime, Timelike};

use super::errors::EvalResult;
use super::value::{Callable, Value};

/// Resolves a member access on any runtime value.
///
/// Unknown members resolve to `Null`, never an error; only calling a
/// non-callable fails, and that failure is scoped to one entry.
pub fn member(value: &Value, property: &str) -> Value {
    let typed = match value {
        Value::Date(d) => date_member(*d, property),
        Value::Str(s) => str_member(s, property),
        Value::Num(n) => num_member(*n, property),
        Value::List(items) => list_member(items, property),
        Value::Object(map) => object_member(map, property),
        _ => None,
    };
    if let Some(resolved) = typed {
        return resolved;
    }
    if let Some(resolved) = generic_member(value, property) {
        return resolved;
    }
    if let Value::Object(map) = value {
        return map.get(property).cloned().unwrap_or(Value::Null);
    }
    Value::Null
}

fn callable(
    name: &'static str,
    func: impl Fn(&[Value]) -> EvalResult<Value> + 'static,
) -> Option<Value> {
    Some(Value::Callable(Callable::new(name, func)))
}

/// Positional argument, `Null` when absent
pub(super) fn arg(args: &[Value], index: usize) -> Value {
    args.get(index).cloned().unwrap_or(Value::Null)
}

pub(super) fn arg_str(args: &[Value], index: usize) -> String {
    arg(args, index).render_string()
}

pub(super) fn arg_num(args: &[Value], index: usize) -> f64 {
    arg(args, index).number_or_nan()
}

// ---------------------------------------------------------------- dates

fn date_member(d: NaiveDateTime, property: &str) -> Option<Value> {
    match property {
        "year" => Some(Value::Num(f64::from(d.year()))),
        // months are 1-based, unlike some runtime-internal representations
        "month" => Some(Value::Num(f64::from(d.month()))),
        "day" => Some(Value::Num(f64::from(d.day()))),
        "hour" => Some(Value::Num(f64::from(d.hour()))),
        "minute" => Some(Value::Num(f64::from(d.minute()))),
        "second" => Some(Value::Num(f64::from(d.second()))),
        "millisecond" => Some(Value::Num(f64::from(d.nanosecond() / 1_000_000))),
        "date" => callable("date", move |_| {
            Ok(Value::Date(d.date().and_hms_opt(0, 0, 0).unwrap_or(d)))
        }),
        "format" => callable("format", move |args| {
            Ok(Value::Str(format_date(d, &arg_str(args, 0))))
        }),
        "time" => callable("time", move |_| {
            Ok(Value::Str(d.format("%H:%M:%S").to_string()))
        }),
        "relative" => callable("relative", move |_| {
            Ok(Value::Str(relative_from_now(d)))
        }),
        // dates are never empty
        "isEmpty" => callable("isEmpty", |_| Ok(Value::Bool(false))),
        _ => None,
    }
}

/// Moment-style pattern tokens: YYYY YY MM M DD D HH H mm m ss s SSS.
///
/// Tokens are replaced longest-first within each letter family so `M`
/// does not clobber the output of `MM`.
fn format_date(d: NaiveDateTime, pattern: &str) -> String {
    pattern
        .replace("YYYY", &d.year().to_string())
        .replace("YY", &format!("{:02}", d.year().rem_euclid(100)))
        .replace("MM", &format!("{:02}", d.month()))
        .replace('M', &d.month().to_string())
        .replace("DD", &format!("{:02}", d.day()))
        .replace('D', &d.day().to_string())
        .replace("HH", &format!("{:02}", d.hour()))
        .replace('H', &d.hour().to_string())
        .replace("mm", &format!("{:02}", d.minute()))
        .replace('m', &d.minute().to_string())
        .replace("ss", &format!("{:02}", d.second()))
        .replace('s', &d.second().to_string())
        .replace("SSS", &format!("{:03}", d.nanosecond() / 1_000_000))
}

fn relative_from_now(d: NaiveDateTime) -> String {
    relative_to(d, Local::now().naive_local())
}

/// Human relative-time string: "3 days ago", "2 hours from now"
fn relative_to(d: NaiveDateTime, now: NaiveDateTime) -> String {
    let diff = now - d;
    let is_past = diff > Duration::zero();
    let suffix = if is_past { " ago" } else { " from now" };

    let seconds = diff.num_seconds().abs();
    let minutes = seconds / 60;
    let hours = minutes / 60;
    let days = hours / 24;
    let weeks = days / 7;
    let months = days / 30;
    let years = days / 365;

    let unit = |n: i64, word: &str| {
        format!("{n} {word}{}{suffix}", if n > 1 { "s" } else { "" })
    };

    if years > 0 {
        unit(years, "year")
    } else if months > 0 {
        unit(months, "month")
    } else if weeks > 0 {
        unit(weeks, "week")
    } else if days > 0 {
        unit(days, "day")
    } else if hours > 0 {
        unit(hours, "hour")
    } else if minutes > 0 {
        unit(minutes, "minute")
    } else {
        "just now".to_string()
    }
}

// -------------------------------------------------------------- strings

fn str_member(s: &str, property: &str) -> Option<Value> {
    let owner = s.to_string();
    match property {
        "length" => Some(Value::Num(s.chars().count() as f64)),
        "contains" => callable("contains", move |args| {
            Ok(Value::Bool(owner.contains(&arg_str(args, 0))))
        }),
        "containsAll" => callable("containsAll", move |args| {
            Ok(Value::Bool(
                args.iter().all(|v| owner.contains(&v.render_string())),
            ))
        }),
        "containsAny" => callable("containsAny", move |args| {
            Ok(Value::Bool(
                args.iter().any(|v| owner.contains(&v.render_string())),
            ))
        }),
        "endsWith" => callable("endsWith", move |args| {
            Ok(Value::Bool(owner.ends_with(&arg_str(args, 0))))
        }),
        "startsWith" => callable("startsWith", move |args| {
            Ok(Value::Bool(owner.starts_with(&arg_str(args, 0))))
        }),
        "isEmpty" => callable("isEmpty", move |_| Ok(Value::Bool(owner.is_empty()))),
        "lower" => callable("lower", move |_| Ok(Value::Str(owner.to_lowercase()))),
        // literal pattern, replaces every occurrence
        "replace" => callable("replace", move |args| {
            let pattern = arg_str(args, 0);
            let replacement = arg_str(args, 1);
            Ok(Value::Str(owner.replace(&pattern, &replacement)))
        }),
        "repeat" => callable("repeat", move |args| {
            let count = arg_num(args, 0);
            let count = if count.is_finite() && count > 0.0 {
                count as usize
            } else {
                0
            };
            Ok(Value::Str(owner.repeat(count)))
        }),
        "reverse" => callable("reverse", move |_| {
            Ok(Value::Str(owner.chars().rev().collect()))
        }),
        "slice" => callable("slice", move |args| {
            let chars: Vec<char> = owner.chars().collect();
            let (start, end) = slice_bounds(chars.len(), args);
            Ok(Value::Str(chars[start..end].iter().collect()))
        }),
        "split" => callable("split", move |args| {
            let separator = arg_str(args, 0);
            let parts: Vec<Value> = if separator.is_empty() {
                owner.chars().map(|c| Value::Str(c.to_string())).collect()
            } else {
                owner
                    .split(separator.as_str())
                    .map(|part| Value::Str(part.to_string()))
                    .collect()
            };
            let parts = match args.get(1).and_then(Value::as_number) {
                Some(n) if n >= 0.0 => parts.into_iter().take(n as usize).collect(),
                _ => parts,
            };
            Ok(Value::List(parts))
        }),
        "title" => callable("title", move |_| {
            let titled = owner
                .split(' ')
                .map(|word| {
                    let mut chars = word.chars();
                    match chars.next() {
                        Some(first) => {
                            first.to_uppercase().collect::<String>()
                                + &chars.as_str().to_lowercase()
                        }
                        None => String::new(),
                    }
                })
                .collect::<Vec<_>>()
                .join(" ");
            Ok(Value::Str(titled))
        }),
        "trim" => callable("trim", move |_| Ok(Value::Str(owner.trim().to_string()))),
        _ => None,
    }
}

// -------------------------------------------------------------- numbers

fn num_member(n: f64, property: &str) -> Option<Value> {
    match property {
        "abs" => callable("abs", move |_| Ok(Value::Num(n.abs()))),
        "ceil" => callable("ceil", move |_| Ok(Value::Num(n.ceil()))),
        "floor" => callable("floor", move |_| Ok(Value::Num(n.floor()))),
        "round" => callable("round", move |args| {
            match args.first().and_then(Value::as_number) {
                Some(digits) => {
                    let multiplier = 10f64.powi(digits as i32);
                    Ok(Value::Num((n * multiplier).round() / multiplier))
                }
                None => Ok(Value::Num(n.round())),
            }
        }),
        "toFixed" => callable("toFixed", move |args| {
            let precision = arg_num(args, 0);
            let precision = if precision.is_finite() && precision > 0.0 {
                precision as usize
            } else {
                0
            };
            Ok(Value::Str(format!("{n:.precision$}")))
        }),
        // numbers are never empty, zero included
        "isEmpty" => callable("isEmpty", |_| Ok(Value::Bool(false))),
        _ => None,
    }
}

// ---------------------------------------------------------------- lists

fn list_member(items: &[Value], property: &str) -> Option<Value> {
    let owner = items.to_vec();
    match property {
        "length" => Some(Value::Num(items.len() as f64)),
        "contains" => callable("contains", move |args| {
            Ok(Value::Bool(owner.contains(&arg(args, 0))))
        }),
        "containsAll" => callable("containsAll", move |args| {
            Ok(Value::Bool(args.iter().all(|v| owner.contains(v))))
        }),
        "containsAny" => callable("containsAny", move |args| {
            Ok(Value::Bool(args.iter().any(|v| owner.contains(v))))
        }),
        // filter/map/reduce only accept an already-evaluated callable;
        // expression-bodied callbacks are not evaluated specially
        "filter" => callable("filter", move |args| match arg(args, 0) {
            Value::Callable(f) => {
                let mut kept = Vec::new();
                for (i, item) in owner.iter().enumerate() {
                    if f.call(&[item.clone(), Value::Num(i as f64)])?.is_truthy() {
                        kept.push(item.clone());
                    }
                }
                Ok(Value::List(kept))
            }
            constant => {
                if constant.is_truthy() {
                    Ok(Value::List(owner.clone()))
                } else {
                    Ok(Value::List(Vec::new()))
                }
            }
        }),
        "map" => callable("map", move |args| match arg(args, 0) {
            Value::Callable(f) => {
                let mut mapped = Vec::with_capacity(owner.len());
                for (i, item) in owner.iter().enumerate() {
                    mapped.push(f.call(&[item.clone(), Value::Num(i as f64)])?);
                }
                Ok(Value::List(mapped))
            }
            constant => Ok(Value::List(vec![constant; owner.len()])),
        }),
        "reduce" => callable("reduce", move |args| match arg(args, 0) {
            Value::Callable(f) => {
                let mut acc = arg(args, 1);
                for (i, item) in owner.iter().enumerate() {
                    acc = f.call(&[acc, item.clone(), Value::Num(i as f64)])?;
                }
                Ok(acc)
            }
            _ => Ok(arg(args, 1)),
        }),
        "flat" => callable("flat", move |_| {
            let mut flattened = Vec::new();
            for item in &owner {
                match item {
                    Value::List(inner) => flattened.extend(inner.iter().cloned()),
                    other => flattened.push(other.clone()),
                }
            }
            Ok(Value::List(flattened))
        }),
        "isEmpty" => callable("isEmpty", move |_| Ok(Value::Bool(owner.is_empty()))),
        "join" => callable("join", move |args| {
            let separator = args
                .first()
                .map_or_else(|| ",".to_string(), Value::render_string);
            let joined = owner
                .iter()
                .map(Value::render_string)
                .collect::<Vec<_>>()
                .join(&separator);
            Ok(Value::Str(joined))
        }),
        // non-mutating
        "reverse" => callable("reverse", move |_| {
            Ok(Value::List(owner.iter().rev().cloned().collect()))
        }),
        "slice" => callable("slice", move |args| {
            let (start, end) = slice_bounds(owner.len(), args);
            Ok(Value::List(owner[start..end].to_vec()))
        }),
        // numeric ascending when both operands are numbers, else lexicographic
        "sort" => callable("sort", move |_| {
            let mut sorted = owner.clone();
            sorted.sort_by(|a, b| match (a, b) {
                (Value::Num(x), Value::Num(y)) => {
                    x.partial_cmp(y).unwrap_or(std::cmp::Ordering::Equal)
                }
                _ => a.render_string().cmp(&b.render_string()),
            });
            Ok(Value::List(sorted))
        }),
        "unique" => callable("unique", move |_| {
            let mut seen: Vec<Value> = Vec::new();
            for item in &owner {
                if !seen.contains(item) {
                    seen.push(item.clone());
                }
            }
            Ok(Value::List(seen))
        }),
        _ => None,
    }
}

// -------------------------------------------------------------- objects

fn object_member(
    map: &std::collections::BTreeMap<String, Value>,
    property: &str,
) -> Option<Value> {
    match property {
        "isEmpty" => {
            let empty = map.is_empty();
            callable("isEmpty", move |_| Ok(Value::Bool(empty)))
        }
        "keys" => {
            let keys: Vec<Value> = map.keys().cloned().map(Value::Str).collect();
            callable("keys", move |_| Ok(Value::List(keys.clone())))
        }
        "values" => {
            let values: Vec<Value> = map.values().cloned().collect();
            callable("values", move |_| Ok(Value::List(values.clone())))
        }
        _ => None,
    }
}

// ------------------------------------------------------------- fallback

fn generic_member(value: &Value, property: &str) -> Option<Value> {
    match property {
        "isTruthy" => {
            let truthy = value.is_truthy();
            callable("isTruthy", move |_| Ok(Value::Bool(truthy)))
        }
        "toString" => {
            let rendered = value.render_string();
            callable("toString", move |_| Ok(Value::Str(rendered.clone())))
        }
        _ => None,
    }
}

/// JS-style slice bounds: negative indices count from the end, out of
/// range clamps, inverted ranges are empty.
fn slice_bounds(len: usize, args: &[Value]) -> (usize, usize) {
    let normalize = |idx: f64| -> usize {
        if idx.is_nan() {
            0
        } else if idx < 0.0 {
            (len as f64 + idx).max(0.0) as usize
        } else {
            (idx as usize).min(len)
        }
    };
    let start = normalize(args.first().and_then(Value::as_number).unwrap_or(0.0));
    let end = args
        .get(1)
        .and_then(Value::as_number)
        .map_or(len, normalize);
    (start, end.max(start))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn call(value: &Value, property: &str, args: &[Value]) -> Value {
        match member(value, property) {
            Value::Callable(f) => f.call(args).unwrap(),
            other => panic!("{property} did not resolve to a callable: {other:?}"),
        }
    }

    fn date(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, s)
            .unwrap()
    }

    #[test]
    fn test_date_fields_month_is_one_based() {
        let v = Value::Date(date(2024, 3, 9, 14, 5, 7));
        assert_eq!(member(&v, "year"), Value::Num(2024.0));
        assert_eq!(member(&v, "month"), Value::Num(3.0));
        assert_eq!(member(&v, "day"), Value::Num(9.0));
        assert_eq!(member(&v, "minute"), Value::Num(5.0));
    }

    #[test]
    fn test_date_format_tokens() {
        let v = Value::Date(date(2024, 3, 9, 14, 5, 7));
        assert_eq!(
            call(&v, "format", &[Value::Str("YYYY-MM-DD HH:mm:ss".into())]),
            Value::Str("2024-03-09 14:05:07".into())
        );
        assert_eq!(
            call(&v, "format", &[Value::Str("D/M/YY".into())]),
            Value::Str("9/3/24".into())
        );
    }

    #[test]
    fn test_date_time_and_is_empty() {
        let v = Value::Date(date(2024, 3, 9, 14, 5, 7));
        assert_eq!(call(&v, "time", &[]), Value::Str("14:05:07".into()));
        assert_eq!(call(&v, "isEmpty", &[]), Value::Bool(false));
    }

    #[test]
    fn test_date_relative_wording() {
        let now = date(2024, 3, 10, 12, 0, 0);
        assert_eq!(relative_to(date(2024, 3, 7, 12, 0, 0), now), "3 days ago");
        assert_eq!(
            relative_to(date(2024, 3, 13, 12, 0, 0), now),
            "3 days from now"
        );
        assert_eq!(relative_to(date(2024, 3, 10, 11, 0, 0), now), "1 hour ago");
        assert_eq!(relative_to(date(2023, 1, 10, 12, 0, 0), now), "1 year ago");
        assert_eq!(relative_to(now, now), "just now");
    }

    #[test]
    fn test_string_methods() {
        let v = Value::Str("Hello World".into());
        assert_eq!(member(&v, "length"), Value::Num(11.0));
        assert_eq!(
            call(&v, "contains", &[Value::Str("World".into())]),
            Value::Bool(true)
        );
        assert_eq!(call(&v, "lower", &[]), Value::Str("hello world".into()));
        assert_eq!(
            call(&v, "startsWith", &[Value::Str("Hell".into())]),
            Value::Bool(true)
        );
        assert_eq!(call(&v, "isEmpty", &[]), Value::Bool(false));
    }

    #[test]
    fn test_string_replace_replaces_all() {
        let v = Value::Str("a-b-c".into());
        assert_eq!(
            call(
                &v,
                "replace",
                &[Value::Str("-".into()), Value::Str("_".into())]
            ),
            Value::Str("a_b_c".into())
        );
    }

    #[test]
    fn test_string_title_and_reverse() {
        let v = Value::Str("hello wORLD".into());
        assert_eq!(call(&v, "title", &[]), Value::Str("Hello World".into()));
        let v = Value::Str("abc".into());
        assert_eq!(call(&v, "reverse", &[]), Value::Str("cba".into()));
    }

    #[test]
    fn test_string_slice_negative_indices() {
        let v = Value::Str("abcdef".into());
        assert_eq!(
            call(&v, "slice", &[Value::Num(-2.0)]),
            Value::Str("ef".into())
        );
        assert_eq!(
            call(&v, "slice", &[Value::Num(1.0), Value::Num(3.0)]),
            Value::Str("bc".into())
        );
    }

    #[test]
    fn test_string_split_with_limit() {
        let v = Value::Str("a,b,c".into());
        let parts = call(&v, "split", &[Value::Str(",".into()), Value::Num(2.0)]);
        assert_eq!(
            parts,
            Value::List(vec![Value::Str("a".into()), Value::Str("b".into())])
        );
    }

    #[test]
    fn test_number_methods() {
        let v = Value::Num(-2.567);
        assert_eq!(call(&v, "abs", &[]), Value::Num(2.567));
        assert_eq!(call(&v, "ceil", &[]), Value::Num(-2.0));
        assert_eq!(call(&v, "floor", &[]), Value::Num(-3.0));
        assert_eq!(
            call(&Value::Num(2.567), "round", &[Value::Num(2.0)]),
            Value::Num(2.57)
        );
        assert_eq!(
            call(&Value::Num(2.5), "toFixed", &[Value::Num(2.0)]),
            Value::Str("2.50".into())
        );
        // zero is not empty
        assert_eq!(call(&Value::Num(0.0), "isEmpty", &[]), Value::Bool(false));
    }

    #[test]
    fn test_list_methods() {
        let v = Value::List(vec![
            Value::Num(3.0),
            Value::Num(1.0),
            Value::Num(2.0),
            Value::Num(1.0),
        ]);
        assert_eq!(member(&v, "length"), Value::Num(4.0));
        assert_eq!(
            call(&v, "contains", &[Value::Num(2.0)]),
            Value::Bool(true)
        );
        assert_eq!(
            call(&v, "unique", &[]),
            Value::List(vec![Value::Num(3.0), Value::Num(1.0), Value::Num(2.0)])
        );
        assert_eq!(
            call(&v, "sort", &[]),
            Value::List(vec![
                Value::Num(1.0),
                Value::Num(1.0),
                Value::Num(2.0),
                Value::Num(3.0)
            ])
        );
        assert_eq!(call(&v, "join", &[Value::Str("-".into())]), {
            Value::Str("3-1-2-1".into())
        });
    }

    #[test]
    fn test_list_sort_is_numeric_for_numbers() {
        let v = Value::List(vec![Value::Num(10.0), Value::Num(2.0)]);
        assert_eq!(
            call(&v, "sort", &[]),
            Value::List(vec![Value::Num(2.0), Value::Num(10.0)])
        );
    }

    #[test]
    fn test_list_reverse_is_non_mutating() {
        let original = vec![Value::Num(1.0), Value::Num(2.0)];
        let v = Value::List(original.clone());
        assert_eq!(
            call(&v, "reverse", &[]),
            Value::List(vec![Value::Num(2.0), Value::Num(1.0)])
        );
        assert_eq!(v, Value::List(original));
    }

    #[test]
    fn test_list_flat() {
        let v = Value::List(vec![
            Value::Num(1.0),
            Value::List(vec![Value::Num(2.0), Value::Num(3.0)]),
        ]);
        assert_eq!(
            call(&v, "flat", &[]),
            Value::List(vec![Value::Num(1.0), Value::Num(2.0), Value::Num(3.0)])
        );
    }

    #[test]
    fn test_list_filter_map_with_callable() {
        let v = Value::List(vec![Value::Num(1.0), Value::Num(2.0), Value::Num(3.0)]);
        let over_one = Value::Callable(Callable::new("gt1", |args| {
            Ok(Value::Bool(arg_num(args, 0) > 1.0))
        }));
        match member(&v, "filter") {
            Value::Callable(f) => {
                assert_eq!(
                    f.call(&[over_one]).unwrap(),
                    Value::List(vec![Value::Num(2.0), Value::Num(3.0)])
                );
            }
            other => panic!("expected callable, got {other:?}"),
        }

        // non-callable argument keeps or drops the whole list
        assert_eq!(
            call(&v, "filter", &[Value::Bool(false)]),
            Value::List(vec![])
        );
    }

    #[test]
    fn test_list_reduce() {
        let v = Value::List(vec![Value::Num(1.0), Value::Num(2.0), Value::Num(3.0)]);
        let add = Value::Callable(Callable::new("add", |args| {
            Ok(Value::Num(arg_num(args, 0) + arg_num(args, 1)))
        }));
        assert_eq!(call(&v, "reduce", &[add, Value::Num(0.0)]), Value::Num(6.0));
    }

    #[test]
    fn test_object_methods_and_field_lookup() {
        let mut map = std::collections::BTreeMap::new();
        map.insert("a".to_string(), Value::Num(1.0));
        map.insert("b".to_string(), Value::Num(2.0));
        let v = Value::Object(map);

        assert_eq!(call(&v, "isEmpty", &[]), Value::Bool(false));
        assert_eq!(
            call(&v, "keys", &[]),
            Value::List(vec![Value::Str("a".into()), Value::Str("b".into())])
        );
        assert_eq!(member(&v, "a"), Value::Num(1.0));
        assert_eq!(member(&v, "missing"), Value::Null);
    }

    #[test]
    fn test_generic_fallback() {
        assert_eq!(call(&Value::Num(0.0), "isTruthy", &[]), Value::Bool(false));
        assert_eq!(
            call(&Value::Num(10.0), "toString", &[]),
            Value::Str("10".into())
        );
        // unknown member on a scalar is null, not an error
        assert_eq!(member(&Value::Num(1.0), "bogus"), Value::Null);
    }
}
