//! # Course Models Library
//!
//! Typed records for a course-management system: problem sets, problems,
//! users and their per-user overrides, each built from a declarative static
//! schema and validated on every construction and update.
//!
//! ## Core Components
//!
//! * `schema` - Field parsers, static schemas and the generic `Record`
//! * `models` - Problem sets, problems, user sets and users
//! * `merge` - Template + override merging with field provenance
//! * `store` - Record collections changed by applying intents
//! * `fixtures` - Flat fixture rows to nested record input
//! * `error` - Error types and handling
//! * `logging` - Per-feature log targets
//!
//! ## Errors
//!
//! Input that does not parse is an error (`FieldError`) and leaves nothing
//! behind. Input that parses but breaks a business rule, such as quiz dates
//! out of order, is accepted and reported by `is_valid()`.

pub mod constants;
pub mod error;
pub mod fixtures;
pub mod logging;
pub mod merge;
pub mod models;
pub mod schema;
pub mod store;
pub mod testing;

// Re-export main types for convenience
pub use error::{RecordError, RecordResult};
pub use fixtures::{convert_rows, FixtureConfig, FixtureError};
pub use merge::{
    begin_enrollment, finish_enrollment, merge_user_problem, merge_user_set, resume_enrollment,
    EnrollmentStep, FieldSource, MergeError, Merged,
};
pub use models::{
    parse_problem, CourseUser, DbUserProblem, DbUserSet, HomeworkSet, LibraryProblem,
    MergedUser, Problem, ProblemKind, ProblemSet, Quiz, RenderParams, ReviewSet, SetProblem,
    SetType, User, UserCourse, UserProblem, UserRole, UserSet,
};
pub use schema::{FieldError, Model, ParseError, Record, Schema};
pub use store::{Reducer, SetProblemIntent, SetProblemState, StoreError, UserIntent, UserState};
