//! Typed course records built on [`crate::schema::Record`].

/// Declares an enum over the three set-type variants of a record family,
/// dispatching construction on `set_type`.
///
/// `ints: [..]` lists identifier fields read straight from the record.
macro_rules! set_type_enum {
    (
        $(#[$meta:meta])* $enum_name:ident { $hw:ident, $quiz:ident, $review:ident }
        ints: [$($int:ident),* $(,)?]
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq)]
        pub enum $enum_name {
            Homework($hw),
            Quiz($quiz),
            Review($review),
        }

        impl $enum_name {
            /// Builds the variant named by the input's `set_type`.
            pub fn parse(input: &::serde_json::Value) -> $crate::error::RecordResult<Self> {
                let tag = input
                    .get("set_type")
                    .and_then(::serde_json::Value::as_str)
                    .ok_or_else(|| $crate::error::RecordError::UnknownSetType(String::new()))?;
                Self::parse_as(tag.parse()?, input)
            }

            /// Builds the given variant, ignoring any `set_type` in the input.
            pub fn parse_as(
                set_type: $crate::models::SetType,
                input: &::serde_json::Value,
            ) -> $crate::error::RecordResult<Self> {
                use $crate::models::SetType;
                use $crate::schema::Model;
                Ok(match set_type {
                    SetType::Homework => $enum_name::Homework($hw::new(input)?),
                    SetType::Quiz => $enum_name::Quiz($quiz::new(input)?),
                    SetType::Review => $enum_name::Review($review::new(input)?),
                })
            }

            pub fn set_type(&self) -> $crate::models::SetType {
                match self {
                    $enum_name::Homework(_) => $crate::models::SetType::Homework,
                    $enum_name::Quiz(_) => $crate::models::SetType::Quiz,
                    $enum_name::Review(_) => $crate::models::SetType::Review,
                }
            }

            pub fn record(&self) -> &$crate::schema::Record {
                use $crate::schema::Model;
                match self {
                    $enum_name::Homework(s) => s.record(),
                    $enum_name::Quiz(s) => s.record(),
                    $enum_name::Review(s) => s.record(),
                }
            }

            $(
                pub fn $int(&self) -> i64 {
                    self.record().get_int(stringify!($int)).unwrap_or_default()
                }
            )*

            pub fn to_object(&self) -> ::serde_json::Value {
                self.record().to_object()
            }

            pub fn is_valid(&self) -> bool {
                use $crate::schema::Model;
                match self {
                    $enum_name::Homework(s) => s.is_valid(),
                    $enum_name::Quiz(s) => s.is_valid(),
                    $enum_name::Review(s) => s.is_valid(),
                }
            }
        }

        impl From<$hw> for $enum_name {
            fn from(set: $hw) -> Self {
                $enum_name::Homework(set)
            }
        }

        impl From<$quiz> for $enum_name {
            fn from(set: $quiz) -> Self {
                $enum_name::Quiz(set)
            }
        }

        impl From<$review> for $enum_name {
            fn from(set: $review) -> Self {
                $enum_name::Review(set)
            }
        }
    };
}

pub mod problem_sets;
pub mod problems;
pub mod renderer;
pub mod user_sets;
pub mod users;

pub use problem_sets::{HomeworkSet, ProblemSet, ProblemSetModel, Quiz, ReviewSet, SetType};
pub use problems::{
    parse_problem, DbUserProblem, LibraryProblem, Problem, ProblemKind, SetProblem, UserProblem,
};
pub use renderer::RenderParams;
pub use user_sets::{
    DbUserHomeworkSet, DbUserQuiz, DbUserReviewSet, DbUserSet, UserHomeworkSet, UserQuiz,
    UserReviewSet, UserSet, UserSetModel,
};
pub use users::{CourseUser, MergedUser, User, UserCourse, UserRole};
