// Re-export types needed for testing
pub use crate::fixtures::{convert_rows, FixtureConfig};
pub use crate::merge::{
    begin_enrollment, finish_enrollment, merge_user_problem, merge_user_set, resume_enrollment,
    EnrollmentStep, FieldSource, Merged,
};
pub use crate::models::{
    CourseUser, DbUserProblem, DbUserQuiz, DbUserSet, HomeworkSet, LibraryProblem, MergedUser,
    ProblemSet, ProblemSetModel, Quiz, RenderParams, ReviewSet, SetProblem, SetType, User,
    UserCourse, UserProblem, UserQuiz, UserSet, UserSetModel,
};
pub use crate::schema::{FieldError, Model, ParseError, Record};
pub use crate::store::{Reducer, SetProblemIntent, SetProblemState, UserIntent, UserState};

use std::collections::BTreeMap;

/// A flat fixture row from `(column, cell)` pairs.
pub fn fixture_row(cells: &[(&str, &str)]) -> BTreeMap<String, String> {
    cells
        .iter()
        .map(|(column, cell)| (column.to_string(), cell.to_string()))
        .collect()
}

/// Fixture columns of the problem-set tables.
pub fn problem_set_fixture_config() -> FixtureConfig {
    FixtureConfig {
        params: vec!["set_params".to_string(), "set_dates".to_string()],
        boolean_fields: vec!["set_visible".to_string()],
        param_boolean_fields: vec![
            "timed".to_string(),
            "enable_reduced_scoring".to_string(),
            "can_retake".to_string(),
        ],
        param_non_neg_int_fields: vec!["quiz_duration".to_string()],
        ..FixtureConfig::default()
    }
}

/// Fixture columns of the set-problem table.
pub fn set_problem_fixture_config() -> FixtureConfig {
    FixtureConfig {
        params: vec!["problem_params".to_string()],
        non_neg_int_fields: vec!["problem_number".to_string()],
        param_non_neg_float_fields: vec!["weight".to_string()],
        param_non_neg_int_fields: vec!["library_id".to_string(), "problem_pool_id".to_string()],
        ..FixtureConfig::default()
    }
}
