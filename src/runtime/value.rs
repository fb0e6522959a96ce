//! Runtime value model
//!
//! A closed tagged type covering every value the evaluator can produce.
//! Member dispatch matches exhaustively over these variants, so a missing
//! method table is a compile error rather than a silent `undefined`.

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

use chrono::NaiveDateTime;
use serde_json::Value as Json;

use super::errors::EvalResult;

/// Signature shared by every built-in method and global function
pub type NativeFn = Rc<dyn Fn(&[Value]) -> EvalResult<Value>>;

/// A named native function bound into the evaluator
#[derive(Clone)]
pub struct Callable {
    name: &'static str,
    func: NativeFn,
}

impl Callable {
    pub fn new(name: &'static str, func: impl Fn(&[Value]) -> EvalResult<Value> + 'static) -> Self {
        Self {
            name,
            func: Rc::new(func),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn call(&self, args: &[Value]) -> EvalResult<Value> {
        (self.func)(args)
    }
}

impl fmt::Debug for Callable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Callable({})", self.name)
    }
}

/// One runtime value
#[derive(Debug, Clone)]
pub enum Value {
    Null,
    Bool(bool),
    Num(f64),
    Str(String),
    Date(NaiveDateTime),
    List(Vec<Value>),
    Object(BTreeMap<String, Value>),
    /// Raw HTML marker produced by `html()`
    Html(String),
    /// Icon marker produced by `icon()`
    Icon(String),
    /// Image marker produced by `image()`
    Image(String),
    Callable(Callable),
}

impl Value {
    /// Variant name for error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "boolean",
            Value::Num(_) => "number",
            Value::Str(_) => "string",
            Value::Date(_) => "date",
            Value::List(_) => "list",
            Value::Object(_) => "object",
            Value::Html(_) => "html",
            Value::Icon(_) => "icon",
            Value::Image(_) => "image",
            Value::Callable(_) => "function",
        }
    }

    /// Converts entry metadata into runtime values
    pub fn from_json(json: &Json) -> Value {
        match json {
            Json::Null => Value::Null,
            Json::Bool(b) => Value::Bool(*b),
            Json::Number(n) => Value::Num(n.as_f64().unwrap_or(f64::NAN)),
            Json::String(s) => Value::Str(s.clone()),
            Json::Array(items) => Value::List(items.iter().map(Value::from_json).collect()),
            Json::Object(map) => Value::Object(
                map.iter()
                    .map(|(k, v)| (k.clone(), Value::from_json(v)))
                    .collect(),
            ),
        }
    }

    /// Converts back into JSON for payloads and summaries
    pub fn to_json(&self) -> Json {
        match self {
            Value::Null | Value::Callable(_) => Json::Null,
            Value::Bool(b) => Json::Bool(*b),
            // integral values serialize as JSON integers so metadata
            // round-trips without picking up a fractional part
            Value::Num(n) => {
                if n.fract() == 0.0 && n.is_finite() && n.abs() < 1e15 {
                    Json::Number((*n as i64).into())
                } else {
                    serde_json::Number::from_f64(*n).map_or(Json::Null, Json::Number)
                }
            }
            Value::Str(s) | Value::Html(s) | Value::Icon(s) | Value::Image(s) => {
                Json::String(s.clone())
            }
            Value::Date(d) => Json::String(d.format("%Y-%m-%dT%H:%M:%S").to_string()),
            Value::List(items) => Json::Array(items.iter().map(Value::to_json).collect()),
            Value::Object(map) => Json::Object(
                map.iter()
                    .map(|(k, v)| (k.clone(), v.to_json()))
                    .collect(),
            ),
        }
    }

    /// Loose truthiness: null, false, 0, NaN and "" are falsy
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Null => false,
            Value::Bool(b) => *b,
            Value::Num(n) => *n != 0.0 && !n.is_nan(),
            Value::Str(s) => !s.is_empty(),
            _ => true,
        }
    }

    /// Numeric coercion: booleans widen, strings parse, null is zero.
    ///
    /// Returns `None` for values with no numeric interpretation.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Num(n) => Some(*n),
            Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
            Value::Null => Some(0.0),
            Value::Str(s) => {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    Some(0.0)
                } else {
                    trimmed.parse::<f64>().ok()
                }
            }
            _ => None,
        }
    }

    /// Numeric coercion for arithmetic; non-numeric values become NaN
    pub fn number_or_nan(&self) -> f64 {
        self.as_number().unwrap_or(f64::NAN)
    }

    /// String rendering used by `.toString()`, concatenation and `join`
    pub fn render_string(&self) -> String {
        match self {
            Value::Null => "null".to_string(),
            Value::Bool(b) => b.to_string(),
            Value::Num(n) => {
                if n.fract() == 0.0 && n.is_finite() && n.abs() < 1e15 {
                    (*n as i64).to_string()
                } else {
                    n.to_string()
                }
            }
            Value::Str(s) | Value::Html(s) | Value::Icon(s) | Value::Image(s) => s.clone(),
            Value::Date(d) => d.format("%Y-%m-%d %H:%M:%S").to_string(),
            Value::List(items) => items
                .iter()
                .map(Value::render_string)
                .collect::<Vec<_>>()
                .join(","),
            Value::Object(_) => self.to_json().to_string(),
            Value::Callable(c) => c.name().to_string(),
        }
    }

    /// Loosely-typed equality: numbers, booleans and numeric strings
    /// compare by value; null equals only null.
    pub fn loose_eq(&self, other: &Value) -> bool {
        use Value::*;
        match (self, other) {
            (Null, Null) => true,
            (Null, _) | (_, Null) => false,
            (Num(a), Num(b)) => a == b,
            (Str(a), Str(b)) => a == b,
            (Bool(a), Bool(b)) => a == b,
            (Date(a), Date(b)) => a == b,
            (Bool(_), _) | (_, Bool(_)) | (Num(_), Str(_)) | (Str(_), Num(_)) => {
                match (self.as_number(), other.as_number()) {
                    (Some(a), Some(b)) => a == b,
                    _ => false,
                }
            }
            (List(a), List(b)) => a == b,
            (Object(a), Object(b)) => a == b,
            (Html(a), Html(b)) | (Icon(a), Icon(b)) | (Image(a), Image(b)) => a == b,
            _ => false,
        }
    }

    /// Loosely-typed ordering: string pairs compare lexicographically,
    /// date pairs chronologically, everything else numerically when both
    /// sides coerce. Null never orders against anything, so a missing
    /// property fails every range comparison.
    pub fn loose_cmp(&self, other: &Value) -> Option<Ordering> {
        match (self, other) {
            (Value::Null, _) | (_, Value::Null) => None,
            (Value::Str(a), Value::Str(b)) => Some(a.cmp(b)),
            (Value::Date(a), Value::Date(b)) => Some(a.cmp(b)),
            _ => {
                let a = self.as_number()?;
                let b = other.as_number()?;
                a.partial_cmp(&b)
            }
        }
    }
}

/// Structural equality; callables never compare equal
impl PartialEq for Value {
    fn eq(&self, other: &Value) -> bool {
        use Value::*;
        match (self, other) {
            (Null, Null) => true,
            (Bool(a), Bool(b)) => a == b,
            (Num(a), Num(b)) => a == b,
            (Str(a), Str(b)) => a == b,
            (Date(a), Date(b)) => a == b,
            (List(a), List(b)) => a == b,
            (Object(a), Object(b)) => a == b,
            (Html(a), Html(b)) | (Icon(a), Icon(b)) | (Image(a), Image(b)) => a == b,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_truthiness() {
        assert!(!Value::Null.is_truthy());
        assert!(!Value::Bool(false).is_truthy());
        assert!(!Value::Num(0.0).is_truthy());
        assert!(!Value::Num(f64::NAN).is_truthy());
        assert!(!Value::Str(String::new()).is_truthy());
        assert!(Value::Str("x".into()).is_truthy());
        assert!(Value::List(vec![]).is_truthy());
        assert!(Value::Object(Default::default()).is_truthy());
    }

    #[test]
    fn test_loose_equality() {
        assert!(Value::Num(5.0).loose_eq(&Value::Str("5".into())));
        assert!(Value::Bool(true).loose_eq(&Value::Num(1.0)));
        assert!(Value::Null.loose_eq(&Value::Null));
        assert!(!Value::Null.loose_eq(&Value::Num(0.0)));
        assert!(!Value::Num(5.0).loose_eq(&Value::Str("abc".into())));
    }

    #[test]
    fn test_loose_ordering() {
        use std::cmp::Ordering;
        assert_eq!(
            Value::Str("a".into()).loose_cmp(&Value::Str("b".into())),
            Some(Ordering::Less)
        );
        assert_eq!(
            Value::Str("10".into()).loose_cmp(&Value::Num(2.0)),
            Some(Ordering::Greater)
        );
        assert_eq!(Value::Str("abc".into()).loose_cmp(&Value::Num(2.0)), None);
    }

    #[test]
    fn test_null_never_orders() {
        assert_eq!(Value::Null.loose_cmp(&Value::Num(5.0)), None);
        assert_eq!(Value::Num(5.0).loose_cmp(&Value::Null), None);
        assert_eq!(Value::Null.loose_cmp(&Value::Null), None);
        // equality still sees null as equal to itself only
        assert!(Value::Null.loose_eq(&Value::Null));
    }

    #[test]
    fn test_json_roundtrip() {
        let json = json!({"a": [1, "x", null], "b": {"c": true}});
        let value = Value::from_json(&json);
        assert_eq!(value.to_json(), json);
    }

    #[test]
    fn test_to_json_number_width() {
        assert_eq!(Value::Num(1.0).to_json(), json!(1));
        assert_eq!(Value::Num(1.5).to_json(), json!(1.5));
        assert_eq!(Value::Num(f64::NAN).to_json(), json!(null));
    }

    #[test]
    fn test_render_string() {
        assert_eq!(Value::Num(10.0).render_string(), "10");
        assert_eq!(Value::Num(1.5).render_string(), "1.5");
        assert_eq!(Value::Null.render_string(), "null");
        assert_eq!(
            Value::List(vec![Value::Num(1.0), Value::Num(2.0)]).render_string(),
            "1,2"
        );
    }
}
