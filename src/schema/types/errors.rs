use thiserror::Error;

/// Type-level failure raised when a raw value cannot be coerced to the
/// declared kind of a field.
///
/// Each variant carries the offending raw value rendered as text so callers
/// can surface it without holding on to the original input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("the value '{0}' is not a boolean")]
    Boolean(String),
    #[error("the value '{0}' is not a non-negative integer")]
    NonNegInt(String),
    #[error("the value '{0}' is not an integer")]
    Int(String),
    #[error("the value '{0}' is not a non-negative number")]
    NonNegFloat(String),
    #[error("the value '{0}' is not a string")]
    String(String),
    #[error("the value '{0}' is not a parameter object")]
    Params(String),
}

impl ParseError {
    /// Name of the field kind that rejected the value.
    pub fn kind_name(&self) -> &'static str {
        match self {
            ParseError::Boolean(_) => "boolean",
            ParseError::NonNegInt(_) => "non_neg_int",
            ParseError::Int(_) => "int",
            ParseError::NonNegFloat(_) => "non_neg_float",
            ParseError::String(_) => "string",
            ParseError::Params(_) => "params",
        }
    }
}

/// A [`ParseError`] attributed to a field of a record.
///
/// `field` is a dotted path so failures inside nested parameter objects read
/// as `set_params.quiz_duration`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{record}.{field}: {source}")]
pub struct FieldError {
    pub record: &'static str,
    pub field: String,
    #[source]
    pub source: ParseError,
}

impl FieldError {
    pub fn new(record: &'static str, field: impl Into<String>, source: ParseError) -> Self {
        Self {
            record,
            field: field.into(),
            source,
        }
    }

    /// The underlying parse failure.
    pub fn kind(&self) -> &ParseError {
        &self.source
    }

    /// Re-attributes an error raised inside a nested parameter object to the
    /// owning record.
    pub(crate) fn nested_in(self, record: &'static str, parent_field: &str) -> Self {
        let field = if self.field.is_empty() {
            parent_field.to_string()
        } else {
            format!("{}.{}", parent_field, self.field)
        };
        Self {
            record,
            field,
            source: self.source,
        }
    }
}
