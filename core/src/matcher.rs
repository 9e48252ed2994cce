//! Declarative value matchers.
//!
//! A closed set of Hamcrest-style predicates over JSON values. Each matcher
//! can describe itself, which is what failure reports print as "expected".

use std::fmt;
use std::ops::Not;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::value::{as_f64, loose_eq};

/// JSON value kinds for [`Matcher::IsA`]. `Number` accepts integers too.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JsonKind {
    Null,
    Boolean,
    Integer,
    Number,
    String,
    Array,
    Object,
}

impl JsonKind {
    fn accepts(self, value: &Value) -> bool {
        match self {
            JsonKind::Null => value.is_null(),
            JsonKind::Boolean => value.is_boolean(),
            JsonKind::Integer => value.is_i64() || value.is_u64(),
            JsonKind::Number => value.is_number(),
            JsonKind::String => value.is_string(),
            JsonKind::Array => value.is_array(),
            JsonKind::Object => value.is_object(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "matcher", content = "value", rename_all = "snake_case")]
pub enum Matcher {
    /// Equal after numeric normalization (`1 == 1.0`).
    Equals(Value),
    /// A string containing the substring.
    Contains(String),
    StartsWith(String),
    EndsWith(String),
    /// Array length, string length in characters, or object member count.
    HasSize(usize),
    /// An array with at least one equal element.
    HasItem(Value),
    /// An array containing every value, in any order.
    HasItems(Vec<Value>),
    /// An array equal to the values, in order.
    ContainsExactly(Vec<Value>),
    IsA(JsonKind),
    AllOf(Vec<Matcher>),
    AnyOf(Vec<Matcher>),
    Not(Box<Matcher>),
    GreaterThan(f64),
    LessThan(f64),
    CloseTo { value: f64, tolerance: f64 },
    IsNull,
    IsNotNull,
}

impl Matcher {
    pub fn equals(value: impl Into<Value>) -> Self {
        Matcher::Equals(value.into())
    }

    pub fn contains(substring: impl Into<String>) -> Self {
        Matcher::Contains(substring.into())
    }

    pub fn starts_with(prefix: impl Into<String>) -> Self {
        Matcher::StartsWith(prefix.into())
    }

    pub fn ends_with(suffix: impl Into<String>) -> Self {
        Matcher::EndsWith(suffix.into())
    }

    pub fn has_size(size: usize) -> Self {
        Matcher::HasSize(size)
    }

    pub fn has_item(value: impl Into<Value>) -> Self {
        Matcher::HasItem(value.into())
    }

    pub fn has_items<I, V>(values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        Matcher::HasItems(values.into_iter().map(Into::into).collect())
    }

    pub fn contains_exactly<I, V>(values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        Matcher::ContainsExactly(values.into_iter().map(Into::into).collect())
    }

    pub fn is_a(kind: JsonKind) -> Self {
        Matcher::IsA(kind)
    }

    pub fn all_of(matchers: impl IntoIterator<Item = Matcher>) -> Self {
        Matcher::AllOf(matchers.into_iter().collect())
    }

    pub fn any_of(matchers: impl IntoIterator<Item = Matcher>) -> Self {
        Matcher::AnyOf(matchers.into_iter().collect())
    }

    pub fn negate(matcher: Matcher) -> Self {
        Matcher::Not(Box::new(matcher))
    }

    pub fn greater_than(bound: impl Into<f64>) -> Self {
        Matcher::GreaterThan(bound.into())
    }

    pub fn less_than(bound: impl Into<f64>) -> Self {
        Matcher::LessThan(bound.into())
    }

    pub fn close_to(value: impl Into<f64>, tolerance: impl Into<f64>) -> Self {
        Matcher::CloseTo {
            value: value.into(),
            tolerance: tolerance.into(),
        }
    }

    pub fn is_null() -> Self {
        Matcher::IsNull
    }

    pub fn is_not_null() -> Self {
        Matcher::IsNotNull
    }

    /// Whether `actual` satisfies this matcher. Type mismatches never
    /// match (a number is never "a string containing ...").
    pub fn matches(&self, actual: &Value) -> bool {
        match self {
            Matcher::Equals(expected) => loose_eq(actual, expected),
            Matcher::Contains(needle) => actual.as_str().is_some_and(|text| text.contains(needle.as_str())),
            Matcher::StartsWith(prefix) => actual.as_str().is_some_and(|text| text.starts_with(prefix.as_str())),
            Matcher::EndsWith(suffix) => actual.as_str().is_some_and(|text| text.ends_with(suffix.as_str())),
            Matcher::HasSize(size) => match actual {
                Value::Array(items) => items.len() == *size,
                Value::String(text) => text.chars().count() == *size,
                Value::Object(members) => members.len() == *size,
                _ => false,
            },
            Matcher::HasItem(expected) => has_item(actual, expected),
            Matcher::HasItems(expected) => expected.iter().all(|item| has_item(actual, item)),
            Matcher::ContainsExactly(expected) => match actual {
                Value::Array(items) => {
                    items.len() == expected.len() && items.iter().zip(expected).all(|(a, e)| loose_eq(a, e))
                }
                _ => false,
            },
            Matcher::IsA(kind) => kind.accepts(actual),
            Matcher::AllOf(matchers) => matchers.iter().all(|m| m.matches(actual)),
            Matcher::AnyOf(matchers) => matchers.iter().any(|m| m.matches(actual)),
            Matcher::Not(inner) => !inner.matches(actual),
            Matcher::GreaterThan(bound) => as_f64(actual).is_some_and(|n| n > *bound),
            Matcher::LessThan(bound) => as_f64(actual).is_some_and(|n| n < *bound),
            Matcher::CloseTo { value, tolerance } => {
                as_f64(actual).is_some_and(|n| (n - value).abs() <= *tolerance)
            }
            Matcher::IsNull => actual.is_null(),
            Matcher::IsNotNull => !actual.is_null(),
        }
    }
}

fn has_item(actual: &Value, expected: &Value) -> bool {
    match actual {
        Value::Array(items) => items.iter().any(|item| loose_eq(item, expected)),
        _ => false,
    }
}

impl Not for Matcher {
    type Output = Matcher;

    fn not(self) -> Matcher {
        Matcher::negate(self)
    }
}

impl fmt::Display for Matcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Matcher::Equals(value) => write!(f, "is {value}"),
            Matcher::Contains(needle) => write!(f, "a string containing {needle:?}"),
            Matcher::StartsWith(prefix) => write!(f, "a string starting with {prefix:?}"),
            Matcher::EndsWith(suffix) => write!(f, "a string ending with {suffix:?}"),
            Matcher::HasSize(size) => write!(f, "a collection with size {size}"),
            Matcher::HasItem(value) => write!(f, "a collection containing {value}"),
            Matcher::HasItems(values) => write!(f, "a collection containing all of {}", Value::Array(values.clone())),
            Matcher::ContainsExactly(values) => write!(f, "a collection equal to {}", Value::Array(values.clone())),
            Matcher::IsA(kind) => write!(f, "a value of kind {}", kind_label(*kind)),
            Matcher::AllOf(matchers) => write_joined(f, matchers, " and "),
            Matcher::AnyOf(matchers) => write_joined(f, matchers, " or "),
            Matcher::Not(inner) => write!(f, "not {inner}"),
            Matcher::GreaterThan(bound) => write!(f, "a value greater than {bound}"),
            Matcher::LessThan(bound) => write!(f, "a value less than {bound}"),
            Matcher::CloseTo { value, tolerance } => {
                write!(f, "a numeric value within {tolerance} of {value}")
            }
            Matcher::IsNull => f.write_str("null"),
            Matcher::IsNotNull => f.write_str("not null"),
        }
    }
}

fn write_joined(f: &mut fmt::Formatter<'_>, matchers: &[Matcher], separator: &str) -> fmt::Result {
    let parts: Vec<String> = matchers.iter().map(ToString::to_string).collect();
    write!(f, "({})", parts.join(separator))
}

fn kind_label(kind: JsonKind) -> &'static str {
    match kind {
        JsonKind::Null => "null",
        JsonKind::Boolean => "boolean",
        JsonKind::Integer => "integer",
        JsonKind::Number => "number",
        JsonKind::String => "string",
        JsonKind::Array => "array",
        JsonKind::Object => "object",
    }
}
