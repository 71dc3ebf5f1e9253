pub mod errors;
pub mod field;
pub mod schema;

pub use errors::{FieldError, ParseError};
pub use field::{FieldDefault, FieldDescriptor, FieldKind, FieldValue};
pub use schema::Schema;
