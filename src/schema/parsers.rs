//! Field type parsers.
//!
//! Each parser takes a raw JSON value of unknown shape and either returns the
//! normalized typed value or a [`ParseError`]. They read no global state, so
//! identical input always yields identical output. Timestamps are treated as
//! plain integers: no locale or timezone handling happens here.
//!
//! Numeric text is read as the number it spells, and from then on numbers
//! and text follow one rule: a value is an integer when it has no fractional
//! part, so `3`, `3.0`, `"3"` and `"3.0"` all parse as `3`.

use crate::schema::types::ParseError;
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value as JsonValue;

static INTEGER: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\s*[+-]?\d+\s*$").expect("valid regex"));
static DECIMAL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*[+-]?(\d+\.?\d*|\.\d+)([eE][+-]?\d+)?\s*$").expect("valid regex")
});

/// Renders a raw value for inclusion in an error message.
fn describe(value: &JsonValue) -> String {
    match value {
        JsonValue::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Accepts `true`/`false`, `"true"`/`"false"` and the integers `1`/`0` in
/// any form [`parse_int`] accepts.
pub fn parse_boolean(value: &JsonValue) -> Result<bool, ParseError> {
    match value {
        JsonValue::Bool(b) => Ok(*b),
        JsonValue::String(s) if s == "true" => Ok(true),
        JsonValue::String(s) if s == "false" => Ok(false),
        other => match integer_from(other) {
            Some(1) => Ok(true),
            Some(0) => Ok(false),
            _ => Err(ParseError::Boolean(describe(other))),
        },
    }
}

/// Integral value of a number, accepting floats with no fractional part.
fn integral(n: &serde_json::Number) -> Option<i64> {
    if let Some(i) = n.as_i64() {
        return Some(i);
    }
    n.as_f64().and_then(integral_float)
}

fn integral_float(f: f64) -> Option<i64> {
    (f.fract() == 0.0 && f.abs() < i64::MAX as f64).then_some(f as i64)
}

fn integer_from(value: &JsonValue) -> Option<i64> {
    match value {
        JsonValue::Number(n) => integral(n),
        JsonValue::String(s) if INTEGER.is_match(s) => s.trim().parse::<i64>().ok(),
        JsonValue::String(s) if DECIMAL.is_match(s) => {
            s.trim().parse::<f64>().ok().and_then(integral_float)
        }
        _ => None,
    }
}

/// Accepts any integral number or integer string, negative values included.
pub fn parse_int(value: &JsonValue) -> Result<i64, ParseError> {
    integer_from(value).ok_or_else(|| ParseError::Int(describe(value)))
}

/// Accepts a non-negative integral number or integer string.
pub fn parse_non_neg_int(value: &JsonValue) -> Result<i64, ParseError> {
    integer_from(value)
        .filter(|i| *i >= 0)
        .ok_or_else(|| ParseError::NonNegInt(describe(value)))
}

/// Accepts a non-negative number or numeric string.
pub fn parse_non_neg_float(value: &JsonValue) -> Result<f64, ParseError> {
    let parsed = match value {
        JsonValue::Number(n) => n.as_f64(),
        JsonValue::String(s) if DECIMAL.is_match(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    parsed
        .filter(|f| f.is_finite() && *f >= 0.0)
        .ok_or_else(|| ParseError::NonNegFloat(describe(value)))
}

/// Identity for strings. Other scalars are rendered as text; arrays, objects
/// and null are rejected.
pub fn parse_string(value: &JsonValue) -> Result<String, ParseError> {
    match value {
        JsonValue::String(s) => Ok(s.clone()),
        JsonValue::Number(n) => Ok(n.to_string()),
        JsonValue::Bool(b) => Ok(b.to_string()),
        other => Err(ParseError::String(describe(other))),
    }
}
