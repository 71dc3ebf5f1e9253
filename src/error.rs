use thiserror::Error;

use crate::fixtures::FixtureError;
use crate::merge::MergeError;
use crate::schema::types::{FieldError, ParseError};
use crate::store::StoreError;

/// Unified error type for the crate.
///
/// Parse failures surface as [`RecordError::Field`]; business-rule
/// violations are never errors and are only reported by `is_valid()`.
#[derive(Debug, Error)]
pub enum RecordError {
    /// A field failed to parse while building or updating a record
    #[error(transparent)]
    Field(#[from] FieldError),

    /// The `set_type` tag does not name a problem-set variant
    #[error("unknown set type '{0}'")]
    UnknownSetType(String),

    /// The problem kind is not one of `Set`, `Library` or `User`
    #[error("unknown problem kind '{0}'")]
    UnknownProblemKind(String),

    /// The course role is not recognised
    #[error("unknown user role '{0}'")]
    UnknownRole(String),

    /// An operation was refused because its input record is invalid
    #[error("{0}")]
    Invalid(String),

    #[error(transparent)]
    Merge(#[from] MergeError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Fixture(#[from] FixtureError),
}

impl RecordError {
    /// The underlying parse error, if this error came from a field.
    pub fn parse_error(&self) -> Option<&ParseError> {
        match self {
            RecordError::Field(err) => Some(err.kind()),
            RecordError::Merge(MergeError::Field(err)) => Some(err.kind()),
            RecordError::Fixture(FixtureError::Field(err)) => Some(err.kind()),
            _ => None,
        }
    }
}

/// Result type alias for crate operations
pub type RecordResult<T> = Result<T, RecordError>;
