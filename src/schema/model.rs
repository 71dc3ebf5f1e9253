use serde_json::Value as JsonValue;

use crate::schema::types::{FieldError, Schema};
use crate::schema::Record;

/// Common interface for every typed record variant.
///
/// Implementors only provide access to their [`Record`] and their schema
/// (see [`record_model!`](crate::record_model)); construction, mutation,
/// serialization and introspection are shared. Variants with cross-field
/// business rules override [`Model::is_valid`].
pub trait Model: Sized + Clone {
    fn schema() -> &'static Schema;

    fn from_record(record: Record) -> Self;

    fn record(&self) -> &Record;

    fn record_mut(&mut self) -> &mut Record;

    /// Parses loosely typed input. All-or-nothing.
    fn new(input: &JsonValue) -> Result<Self, FieldError> {
        Record::from_input(Self::schema(), input).map(Self::from_record)
    }

    /// The instance holding every schema default.
    fn with_defaults() -> Self {
        Self::from_record(Record::with_defaults(Self::schema()))
    }

    fn set(&mut self, partial: &JsonValue) -> Result<(), FieldError> {
        self.record_mut().set(partial)
    }

    fn to_object(&self) -> JsonValue {
        self.record().to_object()
    }

    fn to_object_fields(&self, fields: &[&str]) -> JsonValue {
        self.record().to_object_fields(fields)
    }

    /// Whether the record satisfies its business rules. Never fails and has
    /// no side effects.
    fn is_valid(&self) -> bool {
        true
    }

    fn all_field_names() -> Vec<&'static str> {
        Self::schema().all_field_names()
    }

    fn param_fields() -> Vec<&'static str> {
        Self::schema().param_fields()
    }
}

/// Declares a newtype model over [`Record`] bound to a static schema.
///
/// An optional `valid = path` names a `fn(&Self) -> bool` used as the
/// model's [`Model::is_valid`].
///
/// ```ignore
/// record_model!(
///     /// A quiz.
///     Quiz => QUIZ, valid = problem_set_is_valid
/// );
/// ```
#[macro_export]
macro_rules! record_model {
    ($(#[$meta:meta])* $name:ident => $schema:path $(, valid = $validator:path)?) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq)]
        pub struct $name {
            inner: $crate::schema::Record,
        }

        impl $crate::schema::model::Model for $name {
            fn schema() -> &'static $crate::schema::types::Schema {
                &$schema
            }

            fn from_record(record: $crate::schema::Record) -> Self {
                Self { inner: record }
            }

            fn record(&self) -> &$crate::schema::Record {
                &self.inner
            }

            fn record_mut(&mut self) -> &mut $crate::schema::Record {
                &mut self.inner
            }

            $(
                fn is_valid(&self) -> bool {
                    $validator(self)
                }
            )?
        }

        impl Default for $name {
            fn default() -> Self {
                <Self as $crate::schema::model::Model>::with_defaults()
            }
        }
    };
}

/// Generates read accessors over a model's record.
///
/// Non-optional fields always hold a value, so the fallbacks only apply to
/// optional fields.
#[macro_export]
macro_rules! record_accessors {
    ($name:ident { $($field:ident : $kind:ident),* $(,)? }) => {
        impl $name {
            $( $crate::record_accessors!(@one $field : $kind); )*
        }
    };
    (@one $field:ident : int) => {
        pub fn $field(&self) -> i64 {
            self.inner.get_int(stringify!($field)).unwrap_or_default()
        }
    };
    (@one $field:ident : float) => {
        pub fn $field(&self) -> f64 {
            self.inner.get_float(stringify!($field)).unwrap_or_default()
        }
    };
    (@one $field:ident : bool) => {
        pub fn $field(&self) -> bool {
            self.inner.get_bool(stringify!($field)).unwrap_or_default()
        }
    };
    (@one $field:ident : str) => {
        pub fn $field(&self) -> &str {
            self.inner.get_str(stringify!($field)).unwrap_or_default()
        }
    };
    (@one $field:ident : opt_int) => {
        pub fn $field(&self) -> Option<i64> {
            self.inner.get_int(stringify!($field))
        }
    };
    (@one $field:ident : opt_float) => {
        pub fn $field(&self) -> Option<f64> {
            self.inner.get_float(stringify!($field))
        }
    };
    (@one $field:ident : opt_bool) => {
        pub fn $field(&self) -> Option<bool> {
            self.inner.get_bool(stringify!($field))
        }
    };
    (@one $field:ident : opt_str) => {
        pub fn $field(&self) -> Option<&str> {
            self.inner.get_str(stringify!($field))
        }
    };
}
