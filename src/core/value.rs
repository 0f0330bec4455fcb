//! Dynamic value type flowing through evaluation
//!
//! Every parser function returns a [`Value`], and every host function accepts
//! and returns them. The serde representation is untagged, so values
//! round-trip through plain JSON shapes (`42`, `"text"`, `[1, 2]`,
//! `{"a": 1}`).

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Keyed mapping of string to [`Value`], the object representation
pub type ValueMap = HashMap<String, Value>;

/// The dynamic result type: number, string, boolean, array, or object.
///
/// Numbers are double precision; there is no distinct integer type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// Boolean value
    Bool(bool),
    /// Double precision number
    Number(f64),
    /// String value
    Text(String),
    /// Ordered sequence of values
    Array(Vec<Value>),
    /// Keyed mapping of string to value
    Object(ValueMap),
}

impl Value {
    /// Create a number value
    pub fn number(n: f64) -> Self {
        Value::Number(n)
    }

    /// Create a string value
    pub fn text(s: impl Into<String>) -> Self {
        Value::Text(s.into())
    }

    /// Create a boolean value
    pub fn boolean(b: bool) -> Self {
        Value::Bool(b)
    }

    /// Create an array value
    pub fn array(items: impl Into<Vec<Value>>) -> Self {
        Value::Array(items.into())
    }

    /// Create an empty object value
    pub fn object_empty() -> Self {
        Value::Object(ValueMap::new())
    }

    /// Get the number if this is a number value
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Get the string slice if this is a string value
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Get the boolean if this is a boolean value
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Get the elements if this is an array value
    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(items) => Some(items.as_slice()),
            _ => None,
        }
    }

    /// Get the entries if this is an object value
    pub fn as_object(&self) -> Option<&ValueMap> {
        match self {
            Value::Object(map) => Some(map),
            _ => None,
        }
    }

    /// Name of this value's kind, used in error messages
    pub fn kind_name(&self) -> &'static str {
        match self {
            Value::Bool(_) => "boolean",
            Value::Number(_) => "number",
            Value::Text(_) => "string",
            Value::Array(_) => "array",
            Value::Object(_) => "object",
        }
    }

    /// Truthiness: `false`, `0`, `NaN`, and the empty string are falsy;
    /// arrays and objects are always truthy
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Bool(b) => *b,
            Value::Number(n) => *n != 0.0 && !n.is_nan(),
            Value::Text(s) => !s.is_empty(),
            Value::Array(_) | Value::Object(_) => true,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Bool(b) => write!(f, "{b}"),
            Value::Number(n) => {
                // Whole numbers print without a trailing ".0"
                if n.fract() == 0.0 && n.is_finite() && n.abs() < 1e15 {
                    write!(f, "{}", *n as i64)
                } else {
                    write!(f, "{n}")
                }
            }
            Value::Text(s) => f.write_str(s),
            Value::Array(_) | Value::Object(_) => fmt_json(self, f),
        }
    }
}

/// JSON-shaped rendering for containers. Numbers go through the same
/// whole-number rule as scalar display, and object keys are sorted so the
/// output is deterministic.
fn fmt_json(value: &Value, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match value {
        Value::Text(s) => {
            let quoted = serde_json::to_string(s).map_err(|_| fmt::Error)?;
            f.write_str(&quoted)
        }
        Value::Array(items) => {
            f.write_str("[")?;
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    f.write_str(",")?;
                }
                fmt_json(item, f)?;
            }
            f.write_str("]")
        }
        Value::Object(map) => {
            let mut entries: Vec<(&String, &Value)> = map.iter().collect();
            entries.sort_by_key(|(key, _)| key.as_str());
            f.write_str("{")?;
            for (i, (key, item)) in entries.into_iter().enumerate() {
                if i > 0 {
                    f.write_str(",")?;
                }
                let quoted = serde_json::to_string(key).map_err(|_| fmt::Error)?;
                f.write_str(&quoted)?;
                f.write_str(":")?;
                fmt_json(item, f)?;
            }
            f.write_str("}")
        }
        scalar => write!(f, "{scalar}"),
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::Array(items)
    }
}

impl From<ValueMap> for Value {
    fn from(map: ValueMap) -> Self {
        Value::Object(map)
    }
}
