//! User sets: a problem set as assigned to one enrolled user.
//!
//! `DbUser*` records are the stored per-user overrides. Their `set_params` and
//! `set_dates` declare every key optional, so an override only carries what
//! was explicitly changed for the user. `User*` records are the merged view
//! and hold complete parameter objects.

use crate::constants::INITIAL_VERSION;
use crate::models::problem_sets::{
    dates_are_ordered, SetType, HOMEWORK_SET_DATES, HOMEWORK_SET_PARAMS, QUIZ_DATES, QUIZ_PARAMS,
    REVIEW_SET_DATES, REVIEW_SET_PARAMS,
};
use crate::record_model;
use crate::schema::{FieldDescriptor, Model, Record, Schema};

static DB_USER_SET_FIELDS: [FieldDescriptor; 5] = [
    FieldDescriptor::non_neg_int("user_set_id", 0),
    FieldDescriptor::non_neg_int("set_id", 0),
    FieldDescriptor::non_neg_int("course_user_id", 0),
    FieldDescriptor::non_neg_int("set_version", INITIAL_VERSION),
    FieldDescriptor::boolean("set_visible", false).optional(),
];
pub static DB_USER_SET: Schema = Schema::new("DBUserSet", &DB_USER_SET_FIELDS);

static USER_SET_FIELDS: [FieldDescriptor; 7] = [
    FieldDescriptor::non_neg_int("user_set_id", 0),
    FieldDescriptor::non_neg_int("set_id", 0),
    FieldDescriptor::non_neg_int("course_user_id", 0),
    FieldDescriptor::non_neg_int("user_id", 0),
    FieldDescriptor::non_neg_int("set_version", INITIAL_VERSION),
    FieldDescriptor::boolean("set_visible", false),
    FieldDescriptor::string("set_name", ""),
];
pub static USER_SET: Schema = Schema::new("UserSet", &USER_SET_FIELDS);

// Override parameter objects

static DB_HOMEWORK_PARAMS_FIELDS: [FieldDescriptor; 1] =
    [FieldDescriptor::boolean("enable_reduced_scoring", false).optional()];
static DB_HOMEWORK_PARAMS: Schema = Schema::new("DBUserHomeworkSetParams", &DB_HOMEWORK_PARAMS_FIELDS);

static DB_HOMEWORK_DATES_FIELDS: [FieldDescriptor; 4] = [
    FieldDescriptor::non_neg_int("open", 0).optional(),
    FieldDescriptor::non_neg_int("reduced_scoring", 0).optional(),
    FieldDescriptor::non_neg_int("due", 0).optional(),
    FieldDescriptor::non_neg_int("answer", 0).optional(),
];
static DB_HOMEWORK_DATES: Schema = Schema::new("DBUserHomeworkSetDates", &DB_HOMEWORK_DATES_FIELDS);

static DB_QUIZ_PARAMS_FIELDS: [FieldDescriptor; 2] = [
    FieldDescriptor::boolean("timed", false).optional(),
    FieldDescriptor::non_neg_int("quiz_duration", 0).optional(),
];
static DB_QUIZ_PARAMS: Schema = Schema::new("DBUserQuizParams", &DB_QUIZ_PARAMS_FIELDS);

static DB_QUIZ_DATES_FIELDS: [FieldDescriptor; 3] = [
    FieldDescriptor::non_neg_int("open", 0).optional(),
    FieldDescriptor::non_neg_int("due", 0).optional(),
    FieldDescriptor::non_neg_int("answer", 0).optional(),
];
static DB_QUIZ_DATES: Schema = Schema::new("DBUserQuizDates", &DB_QUIZ_DATES_FIELDS);

static DB_REVIEW_PARAMS_FIELDS: [FieldDescriptor; 1] =
    [FieldDescriptor::boolean("can_retake", false).optional()];
static DB_REVIEW_PARAMS: Schema = Schema::new("DBUserReviewSetParams", &DB_REVIEW_PARAMS_FIELDS);

static DB_REVIEW_DATES_FIELDS: [FieldDescriptor; 2] = [
    FieldDescriptor::non_neg_int("open", 0).optional(),
    FieldDescriptor::non_neg_int("closed", 0).optional(),
];
static DB_REVIEW_DATES: Schema = Schema::new("DBUserReviewSetDates", &DB_REVIEW_DATES_FIELDS);

static DB_USER_HOMEWORK_SET_FIELDS: [FieldDescriptor; 3] = [
    FieldDescriptor::string("set_type", "HW").fixed(),
    FieldDescriptor::params("set_params", &DB_HOMEWORK_PARAMS),
    FieldDescriptor::params("set_dates", &DB_HOMEWORK_DATES),
];
pub static DB_USER_HOMEWORK_SET: Schema =
    Schema::extends("DBUserHomeworkSet", &DB_USER_SET, &DB_USER_HOMEWORK_SET_FIELDS);

static DB_USER_QUIZ_FIELDS: [FieldDescriptor; 3] = [
    FieldDescriptor::string("set_type", "QUIZ").fixed(),
    FieldDescriptor::params("set_params", &DB_QUIZ_PARAMS),
    FieldDescriptor::params("set_dates", &DB_QUIZ_DATES),
];
pub static DB_USER_QUIZ: Schema = Schema::extends("DBUserQuiz", &DB_USER_SET, &DB_USER_QUIZ_FIELDS);

static DB_USER_REVIEW_SET_FIELDS: [FieldDescriptor; 3] = [
    FieldDescriptor::string("set_type", "REVIEW").fixed(),
    FieldDescriptor::params("set_params", &DB_REVIEW_PARAMS),
    FieldDescriptor::params("set_dates", &DB_REVIEW_DATES),
];
pub static DB_USER_REVIEW_SET: Schema =
    Schema::extends("DBUserReviewSet", &DB_USER_SET, &DB_USER_REVIEW_SET_FIELDS);

static USER_HOMEWORK_SET_FIELDS: [FieldDescriptor; 3] = [
    FieldDescriptor::string("set_type", "HW").fixed(),
    FieldDescriptor::params("set_params", &HOMEWORK_SET_PARAMS),
    FieldDescriptor::params("set_dates", &HOMEWORK_SET_DATES),
];
pub static USER_HOMEWORK_SET: Schema =
    Schema::extends("UserHomeworkSet", &USER_SET, &USER_HOMEWORK_SET_FIELDS);

static USER_QUIZ_FIELDS: [FieldDescriptor; 3] = [
    FieldDescriptor::string("set_type", "QUIZ").fixed(),
    FieldDescriptor::params("set_params", &QUIZ_PARAMS),
    FieldDescriptor::params("set_dates", &QUIZ_DATES),
];
pub static USER_QUIZ: Schema = Schema::extends("UserQuiz", &USER_SET, &USER_QUIZ_FIELDS);

static USER_REVIEW_SET_FIELDS: [FieldDescriptor; 3] = [
    FieldDescriptor::string("set_type", "REVIEW").fixed(),
    FieldDescriptor::params("set_params", &REVIEW_SET_PARAMS),
    FieldDescriptor::params("set_dates", &REVIEW_SET_DATES),
];
pub static USER_REVIEW_SET: Schema =
    Schema::extends("UserReviewSet", &USER_SET, &USER_REVIEW_SET_FIELDS);

/// Accessors common to the user-set records, stored and merged alike.
pub trait UserSetModel: Model {
    const SET_TYPE: SetType;

    fn set_type(&self) -> SetType {
        Self::SET_TYPE
    }

    fn user_set_id(&self) -> i64 {
        self.record().get_int("user_set_id").unwrap_or_default()
    }

    fn set_id(&self) -> i64 {
        self.record().get_int("set_id").unwrap_or_default()
    }

    fn course_user_id(&self) -> i64 {
        self.record().get_int("course_user_id").unwrap_or_default()
    }

    fn set_version(&self) -> i64 {
        self.record().get_int("set_version").unwrap_or_default()
    }

    /// `None` on a stored override that leaves visibility to the set.
    fn set_visible(&self) -> Option<bool> {
        self.record().get_bool("set_visible")
    }

    fn set_params(&self) -> Option<&Record> {
        self.record().params("set_params")
    }

    fn set_dates(&self) -> Option<&Record> {
        self.record().params("set_dates")
    }
}

fn user_set_is_valid<T: UserSetModel>(set: &T) -> bool {
    match (set.set_params(), set.set_dates()) {
        (Some(params), Some(dates)) => dates_are_ordered(T::SET_TYPE, params, dates),
        _ => false,
    }
}

macro_rules! user_set_variant {
    ($(#[$meta:meta])* $name:ident => $schema:path, $set_type:expr $(, valid = $validator:path)?) => {
        record_model!($(#[$meta])* $name => $schema $(, valid = $validator)?);

        impl UserSetModel for $name {
            const SET_TYPE: SetType = $set_type;
        }
    };
}

user_set_variant!(DbUserHomeworkSet => DB_USER_HOMEWORK_SET, SetType::Homework);
user_set_variant!(DbUserQuiz => DB_USER_QUIZ, SetType::Quiz);
user_set_variant!(DbUserReviewSet => DB_USER_REVIEW_SET, SetType::Review);

user_set_variant!(
    /// A homework set merged with one user's overrides.
    UserHomeworkSet => USER_HOMEWORK_SET, SetType::Homework, valid = user_set_is_valid
);
user_set_variant!(
    /// A quiz merged with one user's overrides, e.g. extended dates.
    UserQuiz => USER_QUIZ, SetType::Quiz, valid = user_set_is_valid
);
user_set_variant!(
    UserReviewSet => USER_REVIEW_SET, SetType::Review, valid = user_set_is_valid
);

set_type_enum!(
    /// A stored per-user set override of any set type.
    DbUserSet { DbUserHomeworkSet, DbUserQuiz, DbUserReviewSet }
    ints: [user_set_id, set_id, course_user_id]
);
set_type_enum!(
    /// A merged user set of any set type.
    UserSet { UserHomeworkSet, UserQuiz, UserReviewSet }
    ints: [user_set_id, set_id, course_user_id, user_id]
);

impl UserSet {
    pub fn set_name(&self) -> &str {
        self.record().get_str("set_name").unwrap_or_default()
    }
}
