use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use rust_decimal::{Decimal, prelude::FromPrimitive};

use crate::temporal;

/// A typed value produced by a property lookup, a literal or a function.
///
/// `Null` is the null marker: a real, comparable value written `null` in a
/// filter. A property that does not exist is not a `Value` at all; lookups
/// return `Option<Value>` and use `None` for absence.
///
/// # Examples
///
/// ```
/// use arbor_query::Value;
///
/// let title = Value::from("English");
/// let count = Value::Integer(42);
/// let tags = Value::Array(vec![Value::from("news"), Value::from("blog")]);
///
/// assert_eq!(count.as_string(), "42");
/// assert_eq!(tags.to_strings(), Some(vec!["news".to_string(), "blog".to_string()]));
/// assert!(Value::Null.is_null());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// The null marker
    Null,

    /// Boolean
    Boolean(bool),

    /// Integer number (kept apart from decimals)
    Integer(i64),

    /// Fixed 96-bit decimal
    Decimal(Decimal),

    /// Number too large or too precise for `Decimal`
    BigDecimal(BigDecimal),

    /// UTF-8 string
    String(String),

    /// Point in time
    Instant(DateTime<Utc>),

    /// Multi-valued property
    Array(Vec<Value>),
}

/// A value reduced to something with a total order.
///
/// Numbers are held at arbitrary precision so magnitudes compare exactly
/// whatever their size.
#[derive(Debug, Clone, PartialEq)]
pub enum Ordinal {
    Number(BigDecimal),
    Instant(DateTime<Utc>),
}

impl Ordinal {
    fn millis(instant: &DateTime<Utc>) -> BigDecimal {
        BigDecimal::from(instant.timestamp_millis())
    }

    /// Orders two ordinals. A number compared with an instant is read as
    /// milliseconds since the epoch.
    pub fn compare(&self, other: &Ordinal) -> Ordering {
        match (self, other) {
            (Ordinal::Number(a), Ordinal::Number(b)) => a.cmp(b),
            (Ordinal::Instant(a), Ordinal::Instant(b)) => a.cmp(b),
            (Ordinal::Number(a), Ordinal::Instant(b)) => a.cmp(&Self::millis(b)),
            (Ordinal::Instant(a), Ordinal::Number(b)) => Self::millis(a).cmp(b),
        }
    }
}

/// Parses numeric text: integer first, then decimal (plain or scientific).
///
/// Text that overflows `Decimal` is kept as a `BigDecimal`.
pub fn parse_number(text: &str) -> Option<Value> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    if let Ok(n) = text.parse::<i64>() {
        return Some(Value::Integer(n));
    }
    if let Ok(d) = Decimal::from_str(text).or_else(|_| Decimal::from_scientific(text)) {
        return Some(Value::Decimal(d));
    }
    BigDecimal::from_str(text).ok().map(Value::BigDecimal)
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Canonical text form.
    pub fn as_string(&self) -> String {
        match self {
            Value::Null => "null".to_string(),
            Value::Boolean(b) => b.to_string(),
            Value::Integer(n) => n.to_string(),
            Value::Decimal(d) => d.to_string(),
            Value::BigDecimal(d) => d.to_string(),
            Value::String(s) => s.clone(),
            Value::Instant(t) => temporal::format_instant(t),
            Value::Array(items) => items
                .iter()
                .map(Value::as_string)
                .collect::<Vec<_>>()
                .join(","),
        }
    }

    /// Opportunistic ordinal view.
    ///
    /// Strings are tried as an integer, then a decimal, then an ISO-8601
    /// timestamp; the first success wins. Booleans count as 1 and 0. A
    /// single-element array stands for its element.
    pub fn to_ordinal(&self) -> Option<Ordinal> {
        match self {
            Value::Null => None,
            Value::Boolean(b) => Some(Ordinal::Number(BigDecimal::from(i64::from(*b)))),
            Value::Integer(n) => Some(Ordinal::Number(BigDecimal::from(*n))),
            Value::Decimal(d) => BigDecimal::from_str(&d.to_string()).ok().map(Ordinal::Number),
            Value::BigDecimal(d) => Some(Ordinal::Number(d.clone())),
            Value::Instant(t) => Some(Ordinal::Instant(*t)),
            Value::String(s) => match parse_number(s) {
                Some(number) => number.to_ordinal(),
                None => temporal::parse_timestamp(s).map(Ordinal::Instant),
            },
            Value::Array(items) if items.len() == 1 => items[0].to_ordinal(),
            Value::Array(_) => None,
        }
    }

    /// Sequence-of-strings view used by the multi-valued operators.
    ///
    /// A scalar becomes a one-element sequence; the null marker has none.
    pub fn to_strings(&self) -> Option<Vec<String>> {
        match self {
            Value::Null => None,
            Value::Array(items) => Some(
                items
                    .iter()
                    .filter(|item| !item.is_null())
                    .map(Value::as_string)
                    .collect(),
            ),
            scalar => Some(vec![scalar.as_string()]),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_string())
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Integer(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Integer(n.into())
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Boolean(b)
    }
}

impl From<Decimal> for Value {
    fn from(d: Decimal) -> Self {
        Value::Decimal(d)
    }
}

impl From<BigDecimal> for Value {
    fn from(d: BigDecimal) -> Self {
        Value::BigDecimal(d)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(t: DateTime<Utc>) -> Self {
        Value::Instant(t)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::Array(items)
    }
}

/// JSON members map onto values directly. Numbers that do not fit an `i64`
/// become decimals; nested objects have no value form and are kept as text.
impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Boolean(b),
            serde_json::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    return Value::Integer(i);
                }
                match parse_number(&n.to_string()) {
                    Some(value) => value,
                    None => n
                        .as_f64()
                        .and_then(Decimal::from_f64)
                        .map(Value::Decimal)
                        .unwrap_or_else(|| Value::String(n.to_string())),
                }
            }
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(items) => {
                Value::Array(items.into_iter().map(Value::from).collect())
            }
            object @ serde_json::Value::Object(_) => Value::String(object.to_string()),
        }
    }
}
