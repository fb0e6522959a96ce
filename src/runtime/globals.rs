//! Global function registry
//!
//! A fixed library of functions available to every expression. Each entry
//! resolves by name to a [`Callable`] with the uniform native signature;
//! there is no user extension point.

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime};

use super::errors::{EvalError, EvalResult};
use super::methods::{arg, arg_str};
use super::value::{Callable, Value};

/// Looks up a global function by name.
pub fn lookup(name: &str) -> Option<Value> {
    let callable = match name {
        "today" => Callable::new("today", |_| {
            let midnight = Local::now()
                .date_naive()
                .and_hms_opt(0, 0, 0)
                .unwrap_or_else(|| Local::now().naive_local());
            Ok(Value::Date(midnight))
        }),
        "now" => Callable::new("now", |_| Ok(Value::Date(Local::now().naive_local()))),
        "date" => Callable::new("date", |args| {
            let text = arg_str(args, 0);
            parse_date_string(&text)
                .map(Value::Date)
                .ok_or(EvalError::InvalidDate(text))
        }),
        "number" => Callable::new("number", |args| {
            Ok(Value::Num(arg(args, 0).number_or_nan()))
        }),
        "min" => Callable::new("min", |args| Ok(fold_numeric(args, f64::min))),
        "max" => Callable::new("max", |args| Ok(fold_numeric(args, f64::max))),
        "list" => Callable::new("list", |args| match arg(args, 0) {
            // already a list: unmodified
            list @ Value::List(_) => Ok(list),
            single => Ok(Value::List(vec![single])),
        }),
        "if" => Callable::new("if", |args| {
            if arg(args, 0).is_truthy() {
                Ok(arg(args, 1))
            } else {
                Ok(args.get(2).cloned().unwrap_or(Value::Null))
            }
        }),
        "icon" => Callable::new("icon", |args| Ok(Value::Icon(arg_str(args, 0)))),
        "image" => Callable::new("image", |args| {
            // accepts a path string or a file object with a `path` field
            let path = match arg(args, 0) {
                Value::Object(map) => match map.get("path") {
                    Some(Value::Str(path)) => path.clone(),
                    _ => Value::Object(map).render_string(),
                },
                other => other.render_string(),
            };
            Ok(Value::Image(path))
        }),
        "html" => Callable::new("html", |args| Ok(Value::Html(arg_str(args, 0)))),
        "escapeHTML" => Callable::new("escapeHTML", |args| {
            Ok(Value::Str(escape_html(&arg_str(args, 0))))
        }),
        _ => return None,
    };
    Some(Value::Callable(callable))
}

/// Accepts `YYYY-MM-DD HH:mm:ss`, `YYYY-MM-DD` and RFC 3339
fn parse_date_string(text: &str) -> Option<NaiveDateTime> {
    if let Ok(parsed) = NaiveDateTime::parse_from_str(text, "%Y-%m-%d %H:%M:%S") {
        return Some(parsed);
    }
    if let Ok(date) = NaiveDate::parse_from_str(text, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0);
    }
    if let Ok(parsed) = DateTime::parse_from_rfc3339(text) {
        return Some(parsed.naive_local());
    }
    None
}

fn fold_numeric(args: &[Value], pick: fn(f64, f64) -> f64) -> Value {
    let mut result: Option<f64> = None;
    for value in args {
        if let Some(n) = value.as_number() {
            result = Some(result.map_or(n, |acc| pick(acc, n)));
        }
    }
    result.map_or(Value::Null, Value::Num)
}

fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#039;")
}
