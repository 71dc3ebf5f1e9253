//! Declarative field typing: parsers, static schemas and the generic record
//! every model is built from.

pub mod model;
pub mod parsers;
pub mod record;
pub mod types;

pub use model::Model;
pub use parsers::{parse_boolean, parse_int, parse_non_neg_float, parse_non_neg_int, parse_string};
pub use record::Record;
pub use types::{
    FieldDefault, FieldDescriptor, FieldError, FieldKind, FieldValue, ParseError, Schema,
};
