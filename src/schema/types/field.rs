use serde_json::Value as JsonValue;

use crate::schema::parsers::{
    parse_boolean, parse_int, parse_non_neg_float, parse_non_neg_int, parse_string,
};
use crate::schema::types::{ParseError, Schema};
use crate::schema::Record;

/// The type a field's raw input is coerced to.
#[derive(Debug, Clone, Copy)]
pub enum FieldKind {
    Boolean,
    NonNegInt,
    /// Signed integer. Sign constraints, if any, are business rules checked
    /// by the owning record's `is_valid`.
    Int,
    NonNegFloat,
    String,
    /// Nested parameter object with its own schema.
    Params(&'static Schema),
}

impl FieldKind {
    pub fn is_params(&self) -> bool {
        matches!(self, FieldKind::Params(_))
    }

    pub fn is_number(&self) -> bool {
        matches!(
            self,
            FieldKind::NonNegInt | FieldKind::Int | FieldKind::NonNegFloat
        )
    }
}

/// Default applied when a field is absent from input.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldDefault {
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(&'static str),
    /// The nested schema's own default instance.
    Params,
    /// Optional field: nothing is stored unless input supplies a value.
    Absent,
}

/// Declarative description of a single field.
#[derive(Debug, Clone, Copy)]
pub struct FieldDescriptor {
    pub name: &'static str,
    pub kind: FieldKind,
    pub default: FieldDefault,
    /// Fixed fields ignore input and always hold their default.
    pub fixed: bool,
}

impl FieldDescriptor {
    const fn with(name: &'static str, kind: FieldKind, default: FieldDefault) -> Self {
        Self {
            name,
            kind,
            default,
            fixed: false,
        }
    }

    pub const fn boolean(name: &'static str, default: bool) -> Self {
        Self::with(name, FieldKind::Boolean, FieldDefault::Bool(default))
    }

    pub const fn non_neg_int(name: &'static str, default: i64) -> Self {
        Self::with(name, FieldKind::NonNegInt, FieldDefault::Int(default))
    }

    pub const fn int(name: &'static str, default: i64) -> Self {
        Self::with(name, FieldKind::Int, FieldDefault::Int(default))
    }

    pub const fn non_neg_float(name: &'static str, default: f64) -> Self {
        Self::with(name, FieldKind::NonNegFloat, FieldDefault::Float(default))
    }

    pub const fn string(name: &'static str, default: &'static str) -> Self {
        Self::with(name, FieldKind::String, FieldDefault::Str(default))
    }

    pub const fn params(name: &'static str, schema: &'static Schema) -> Self {
        Self::with(name, FieldKind::Params(schema), FieldDefault::Params)
    }

    /// Marks the field optional: absent input leaves it unset.
    pub const fn optional(self) -> Self {
        Self {
            default: FieldDefault::Absent,
            ..self
        }
    }

    /// Marks the field fixed: input is ignored.
    pub const fn fixed(self) -> Self {
        Self {
            fixed: true,
            ..self
        }
    }

    /// Coerces a raw scalar value to this field's kind. Parameter objects go
    /// through [`Record`] construction instead.
    pub(crate) fn parse_scalar(&self, raw: &JsonValue) -> Result<FieldValue, ParseError> {
        match self.kind {
            FieldKind::Boolean => parse_boolean(raw).map(FieldValue::Bool),
            FieldKind::NonNegInt => parse_non_neg_int(raw).map(FieldValue::Int),
            FieldKind::Int => parse_int(raw).map(FieldValue::Int),
            FieldKind::NonNegFloat => parse_non_neg_float(raw).map(FieldValue::Float),
            FieldKind::String => parse_string(raw).map(FieldValue::Str),
            FieldKind::Params(_) => Err(ParseError::Params(raw.to_string())),
        }
    }

    /// The value stored when input omits this field, or `None` for optional
    /// fields.
    pub(crate) fn default_value(&self) -> Option<FieldValue> {
        match (self.default, self.kind) {
            (FieldDefault::Absent, _) => None,
            (FieldDefault::Bool(b), _) => Some(FieldValue::Bool(b)),
            (FieldDefault::Int(i), _) => Some(FieldValue::Int(i)),
            (FieldDefault::Float(f), _) => Some(FieldValue::Float(f)),
            (FieldDefault::Str(s), _) => Some(FieldValue::Str(s.to_string())),
            (FieldDefault::Params, FieldKind::Params(schema)) => {
                Some(FieldValue::Params(Record::with_defaults(schema)))
            }
            (FieldDefault::Params, _) => None,
        }
    }
}

/// A parsed, typed field value.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    Params(Record),
}

impl FieldValue {
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            FieldValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            FieldValue::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            FieldValue::Float(f) => Some(*f),
            FieldValue::Int(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_params(&self) -> Option<&Record> {
        match self {
            FieldValue::Params(r) => Some(r),
            _ => None,
        }
    }

    pub fn to_json(&self) -> JsonValue {
        match self {
            FieldValue::Bool(b) => JsonValue::Bool(*b),
            FieldValue::Int(i) => JsonValue::from(*i),
            FieldValue::Float(f) => serde_json::Number::from_f64(*f)
                .map(JsonValue::Number)
                .unwrap_or(JsonValue::Null),
            FieldValue::Str(s) => JsonValue::String(s.clone()),
            FieldValue::Params(r) => r.to_object(),
        }
    }
}
