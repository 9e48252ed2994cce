//! Loose comparison helpers over `serde_json::Value`.
//!
//! JSON does not distinguish `1` from `1.0`, and neither do expectations
//! written against it: numbers compare by numeric value regardless of how
//! they were encoded.

use std::cmp::Ordering;

use serde_json::{Number, Value};

/// A JSON number split into its integral and floating representations.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum Num {
    Int(i64),
    Float(f64),
}

impl Num {
    pub(crate) fn from_value(value: &Value) -> Option<Num> {
        let Value::Number(number) = value else {
            return None;
        };
        match number.as_i64() {
            Some(int) => Some(Num::Int(int)),
            None => number.as_f64().map(Num::Float),
        }
    }

    pub(crate) fn as_f64(self) -> f64 {
        match self {
            Num::Int(int) => int as f64,
            Num::Float(float) => float,
        }
    }

    /// `NaN` and infinities have no JSON encoding and become `null`.
    pub(crate) fn into_value(self) -> Value {
        match self {
            Num::Int(int) => Value::from(int),
            Num::Float(float) => Number::from_f64(float).map_or(Value::Null, Value::Number),
        }
    }
}

pub(crate) fn as_f64(value: &Value) -> Option<f64> {
    Num::from_value(value).map(Num::as_f64)
}

/// Structural equality with numeric normalization.
pub fn loose_eq(left: &Value, right: &Value) -> bool {
    match (left, right) {
        (Value::Number(_), Value::Number(_)) => match (Num::from_value(left), Num::from_value(right)) {
            (Some(Num::Int(a)), Some(Num::Int(b))) => a == b,
            (Some(a), Some(b)) => a.as_f64() == b.as_f64(),
            _ => false,
        },
        (Value::Array(a), Value::Array(b)) => {
            a.len() == b.len() && a.iter().zip(b).all(|(x, y)| loose_eq(x, y))
        }
        (Value::Object(a), Value::Object(b)) => {
            a.len() == b.len()
                && a.iter().all(|(key, x)| b.get(key).is_some_and(|y| loose_eq(x, y)))
        }
        _ => left == right,
    }
}

/// Ordering between two numbers or two strings; `None` for anything else.
pub(crate) fn loose_cmp(left: &Value, right: &Value) -> Option<Ordering> {
    match (left, right) {
        (Value::String(a), Value::String(b)) => Some(a.cmp(b)),
        _ => as_f64(left)?.partial_cmp(&as_f64(right)?),
    }
}

/// Groovy truth: null, false, zero and empty containers are false.
pub(crate) fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(_) => as_f64(value).is_some_and(|n| n != 0.0),
        Value::String(text) => !text.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(members) => !members.is_empty(),
    }
}

pub(crate) fn kind_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(number) if number.is_i64() || number.is_u64() => "integer",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn integers_equal_floats_with_same_value() {
        assert!(loose_eq(&json!(1), &json!(1.0)));
        assert!(loose_eq(&json!([1, 2.5]), &json!([1.0, 2.5])));
        assert!(!loose_eq(&json!(1), &json!("1")));
    }

    #[test]
    fn objects_compare_structurally() {
        assert!(loose_eq(&json!({"a": 1, "b": [2]}), &json!({"b": [2.0], "a": 1})));
        assert!(!loose_eq(&json!({"a": 1}), &json!({"a": 1, "b": null})));
    }

    #[test]
    fn mixed_types_have_no_order() {
        assert_eq!(loose_cmp(&json!(2), &json!(10.5)), Some(Ordering::Less));
        assert_eq!(loose_cmp(&json!("b"), &json!("a")), Some(Ordering::Greater));
        assert_eq!(loose_cmp(&json!("1"), &json!(1)), None);
        assert_eq!(loose_cmp(&json!(null), &json!(1)), None);
    }

    #[test]
    fn truthiness_follows_groovy() {
        assert!(!truthy(&json!(null)));
        assert!(!truthy(&json!(0)));
        assert!(!truthy(&json!("")));
        assert!(!truthy(&json!([])));
        assert!(truthy(&json!(0.5)));
        assert!(truthy(&json!({"k": 1})));
    }
}
