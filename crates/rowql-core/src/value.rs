//! Scalar cell values and the coercion rules shared by the whole engine.
//!
//! Datasets are loosely typed: a column may hold numbers in one row and
//! strings in the next, and a missing cell reads as [`Value::Null`]. Every
//! place the engine compares cells (WHERE, ORDER BY, MIN/MAX) funnels
//! through the two rules defined here: numeric comparison when both sides
//! coerce to a number, string comparison otherwise, with null below
//! everything.

use std::cmp::Ordering;
use std::fmt;

/// A single cell value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Absent or explicitly empty cell.
    Null,
    /// Numeric cell, stored as a double.
    Number(f64),
    /// Textual cell.
    Text(String),
}

impl Value {
    /// Build a [`Value::Text`].
    pub fn text(text: impl Into<String>) -> Self {
        Value::Text(text.into())
    }

    /// Build a [`Value::Number`].
    pub fn number(number: f64) -> Self {
        Value::Number(number)
    }

    /// True for [`Value::Null`].
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Numeric view of the value, when one exists.
    ///
    /// Text coerces through [`parse_float_prefix`], so `"10"` and
    /// `"10kg"` both read as 10 while `"abc"` reads as none. Null has no
    /// numeric view.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Null => None,
            Value::Number(number) => Some(*number),
            Value::Text(text) => parse_float_prefix(text),
        }
    }

    /// Loose equality: null equals only null; otherwise numeric equality
    /// when both sides coerce to numbers, and string equality on the
    /// rendered forms when they do not.
    pub fn loosely_equals(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Null, _) | (_, Value::Null) => false,
            _ => match (self.as_number(), other.as_number()) {
                (Some(left), Some(right)) => left == right,
                _ => self.to_string() == other.to_string(),
            },
        }
    }

    /// Relational comparison used by WHERE, ORDER BY, and MIN/MAX.
    ///
    /// Null sorts below any non-null value and two nulls compare equal.
    /// Non-null values compare numerically when both coerce to numbers,
    /// otherwise by their rendered strings.
    pub fn compare(&self, other: &Value) -> Ordering {
        match (self, other) {
            (Value::Null, Value::Null) => Ordering::Equal,
            (Value::Null, _) => Ordering::Less,
            (_, Value::Null) => Ordering::Greater,
            _ => match (self.as_number(), other.as_number()) {
                (Some(left), Some(right)) => left.partial_cmp(&right).unwrap_or(Ordering::Equal),
                _ => self.to_string().cmp(&other.to_string()),
            },
        }
    }
}

impl fmt::Display for Value {
    /// Renders the way a table cell displays: null is empty, integral
    /// numbers print without a decimal point.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => Ok(()),
            Value::Number(number) => write!(f, "{}", number),
            Value::Text(text) => write!(f, "{}", text),
        }
    }
}

impl From<&str> for Value {
    fn from(text: &str) -> Self {
        Value::Text(text.to_string())
    }
}

impl From<String> for Value {
    fn from(text: String) -> Self {
        Value::Text(text)
    }
}

impl From<f64> for Value {
    fn from(number: f64) -> Self {
        Value::Number(number)
    }
}

impl From<i64> for Value {
    fn from(number: i64) -> Self {
        Value::Number(number as f64)
    }
}

impl From<i32> for Value {
    fn from(number: i32) -> Self {
        Value::Number(number as f64)
    }
}

/// Parse the longest leading numeric prefix of a string.
///
/// Accepts an optional sign, digits with at most one decimal point, and an
/// optional exponent; leading whitespace is skipped. Returns `None` when no
/// digit is found. `"1.2.3"` parses as 1.2 and `"10kg"` as 10.
pub fn parse_float_prefix(text: &str) -> Option<f64> {
    let trimmed = text.trim_start();
    let bytes = trimmed.as_bytes();
    let mut end = 0;
    let mut seen_digit = false;

    if matches!(bytes.first(), Some(b'+') | Some(b'-')) {
        end = 1;
    }
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
        seen_digit = true;
    }
    if end < bytes.len() && bytes[end] == b'.' {
        end += 1;
        while end < bytes.len() && bytes[end].is_ascii_digit() {
            end += 1;
            seen_digit = true;
        }
    }
    if !seen_digit {
        return None;
    }
    if end < bytes.len() && (bytes[end] == b'e' || bytes[end] == b'E') {
        let mut exponent_end = end + 1;
        if exponent_end < bytes.len() && matches!(bytes[exponent_end], b'+' | b'-') {
            exponent_end += 1;
        }
        if exponent_end < bytes.len() && bytes[exponent_end].is_ascii_digit() {
            while exponent_end < bytes.len() && bytes[exponent_end].is_ascii_digit() {
                exponent_end += 1;
            }
            end = exponent_end;
        }
    }

    trimmed[..end].parse().ok()
}
