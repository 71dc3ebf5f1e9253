//! Problem sets: homework sets, quizzes and review sets.
//!
//! All three share the `ProblemSet` base fields and differ in their
//! `set_params` / `set_dates` parameter objects and in the ordering rule their
//! dates must satisfy. The `set_type` discriminant is fixed per variant and
//! never taken from input.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::RecordError;
use crate::schema::{FieldDescriptor, Model, Record, Schema};
use crate::record_model;

/// Discriminant of the problem-set family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SetType {
    #[serde(rename = "HW")]
    Homework,
    #[serde(rename = "QUIZ")]
    Quiz,
    #[serde(rename = "REVIEW")]
    Review,
}

impl SetType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SetType::Homework => "HW",
            SetType::Quiz => "QUIZ",
            SetType::Review => "REVIEW",
        }
    }
}

impl fmt::Display for SetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SetType {
    type Err = RecordError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "HW" => Ok(SetType::Homework),
            "QUIZ" => Ok(SetType::Quiz),
            "REVIEW" => Ok(SetType::Review),
            other => Err(RecordError::UnknownSetType(other.to_string())),
        }
    }
}

static PROBLEM_SET_FIELDS: [FieldDescriptor; 4] = [
    FieldDescriptor::non_neg_int("set_id", 0),
    FieldDescriptor::string("set_name", ""),
    FieldDescriptor::non_neg_int("course_id", 0),
    FieldDescriptor::boolean("set_visible", false),
];
/// Fields shared by every problem set.
pub static PROBLEM_SET: Schema = Schema::new("ProblemSet", &PROBLEM_SET_FIELDS);

static HOMEWORK_SET_PARAMS_FIELDS: [FieldDescriptor; 1] =
    [FieldDescriptor::boolean("enable_reduced_scoring", false)];
pub static HOMEWORK_SET_PARAMS: Schema =
    Schema::new("HomeworkSetParams", &HOMEWORK_SET_PARAMS_FIELDS);

static HOMEWORK_SET_DATES_FIELDS: [FieldDescriptor; 4] = [
    FieldDescriptor::non_neg_int("open", 0),
    FieldDescriptor::non_neg_int("reduced_scoring", 0),
    FieldDescriptor::non_neg_int("due", 0),
    FieldDescriptor::non_neg_int("answer", 0),
];
pub static HOMEWORK_SET_DATES: Schema = Schema::new("HomeworkSetDates", &HOMEWORK_SET_DATES_FIELDS);

static HOMEWORK_SET_FIELDS: [FieldDescriptor; 3] = [
    FieldDescriptor::string("set_type", "HW").fixed(),
    FieldDescriptor::params("set_params", &HOMEWORK_SET_PARAMS),
    FieldDescriptor::params("set_dates", &HOMEWORK_SET_DATES),
];
pub static HOMEWORK_SET: Schema = Schema::extends("HomeworkSet", &PROBLEM_SET, &HOMEWORK_SET_FIELDS);

static QUIZ_PARAMS_FIELDS: [FieldDescriptor; 2] = [
    FieldDescriptor::boolean("timed", false),
    FieldDescriptor::non_neg_int("quiz_duration", 0),
];
pub static QUIZ_PARAMS: Schema = Schema::new("QuizParams", &QUIZ_PARAMS_FIELDS);

static QUIZ_DATES_FIELDS: [FieldDescriptor; 3] = [
    FieldDescriptor::non_neg_int("open", 0),
    FieldDescriptor::non_neg_int("due", 0),
    FieldDescriptor::non_neg_int("answer", 0),
];
pub static QUIZ_DATES: Schema = Schema::new("QuizDates", &QUIZ_DATES_FIELDS);

static QUIZ_FIELDS: [FieldDescriptor; 3] = [
    FieldDescriptor::string("set_type", "QUIZ").fixed(),
    FieldDescriptor::params("set_params", &QUIZ_PARAMS),
    FieldDescriptor::params("set_dates", &QUIZ_DATES),
];
pub static QUIZ: Schema = Schema::extends("Quiz", &PROBLEM_SET, &QUIZ_FIELDS);

static REVIEW_SET_PARAMS_FIELDS: [FieldDescriptor; 1] =
    [FieldDescriptor::boolean("can_retake", false)];
pub static REVIEW_SET_PARAMS: Schema = Schema::new("ReviewSetParams", &REVIEW_SET_PARAMS_FIELDS);

static REVIEW_SET_DATES_FIELDS: [FieldDescriptor; 2] = [
    FieldDescriptor::non_neg_int("open", 0),
    FieldDescriptor::non_neg_int("closed", 0),
];
pub static REVIEW_SET_DATES: Schema = Schema::new("ReviewSetDates", &REVIEW_SET_DATES_FIELDS);

static REVIEW_SET_FIELDS: [FieldDescriptor; 3] = [
    FieldDescriptor::string("set_type", "REVIEW").fixed(),
    FieldDescriptor::params("set_params", &REVIEW_SET_PARAMS),
    FieldDescriptor::params("set_dates", &REVIEW_SET_DATES),
];
pub static REVIEW_SET: Schema = Schema::extends("ReviewSet", &PROBLEM_SET, &REVIEW_SET_FIELDS);

/// Date ordering rules shared by problem sets and user sets.
pub(crate) fn dates_are_ordered(set_type: SetType, params: &Record, dates: &Record) -> bool {
    let date = |name: &str| dates.get_int(name).unwrap_or_default();
    match set_type {
        SetType::Homework => {
            let chain = date("open") <= date("due") && date("due") <= date("answer");
            let reduced = !params.get_bool("enable_reduced_scoring").unwrap_or(false)
                || (date("open") <= date("reduced_scoring")
                    && date("reduced_scoring") <= date("due"));
            chain && reduced
        }
        SetType::Quiz => date("open") <= date("due") && date("due") <= date("answer"),
        SetType::Review => date("open") <= date("closed"),
    }
}

/// Accessors common to the problem-set variants.
pub trait ProblemSetModel: Model {
    const SET_TYPE: SetType;

    fn set_type(&self) -> SetType {
        Self::SET_TYPE
    }

    fn set_id(&self) -> i64 {
        self.record().get_int("set_id").unwrap_or_default()
    }

    fn set_name(&self) -> &str {
        self.record().get_str("set_name").unwrap_or_default()
    }

    fn course_id(&self) -> i64 {
        self.record().get_int("course_id").unwrap_or_default()
    }

    fn set_visible(&self) -> bool {
        self.record().get_bool("set_visible").unwrap_or_default()
    }

    fn set_params(&self) -> Option<&Record> {
        self.record().params("set_params")
    }

    fn set_dates(&self) -> Option<&Record> {
        self.record().params("set_dates")
    }

    /// Mutable nested access; updates still validate through `Record::set`.
    fn set_params_mut(&mut self) -> Option<&mut Record> {
        self.record_mut().params_mut("set_params")
    }

    fn set_dates_mut(&mut self) -> Option<&mut Record> {
        self.record_mut().params_mut("set_dates")
    }

    /// Whether `set_dates` satisfy this set type's ordering rule.
    fn has_valid_dates(&self) -> bool {
        match (self.set_params(), self.set_dates()) {
            (Some(params), Some(dates)) => dates_are_ordered(Self::SET_TYPE, params, dates),
            _ => false,
        }
    }
}

fn problem_set_is_valid<T: ProblemSetModel>(set: &T) -> bool {
    set.has_valid_dates()
}

macro_rules! problem_set_variant {
    ($(#[$meta:meta])* $name:ident => $schema:path, $set_type:expr) => {
        record_model!($(#[$meta])* $name => $schema, valid = problem_set_is_valid);

        impl ProblemSetModel for $name {
            const SET_TYPE: SetType = $set_type;
        }
    };
}

problem_set_variant!(
    /// Homework set, optionally with a reduced-scoring window before the due
    /// date.
    HomeworkSet => HOMEWORK_SET, SetType::Homework
);
problem_set_variant!(
    /// Quiz. Dates must be ordered `open <= due <= answer`.
    Quiz => QUIZ, SetType::Quiz
);
problem_set_variant!(ReviewSet => REVIEW_SET, SetType::Review);

impl Quiz {
    pub fn timed(&self) -> bool {
        self.set_params()
            .and_then(|p| p.get_bool("timed"))
            .unwrap_or_default()
    }

    pub fn quiz_duration(&self) -> i64 {
        self.set_params()
            .and_then(|p| p.get_int("quiz_duration"))
            .unwrap_or_default()
    }
}

impl HomeworkSet {
    pub fn enable_reduced_scoring(&self) -> bool {
        self.set_params()
            .and_then(|p| p.get_bool("enable_reduced_scoring"))
            .unwrap_or_default()
    }
}

impl ReviewSet {
    pub fn can_retake(&self) -> bool {
        self.set_params()
            .and_then(|p| p.get_bool("can_retake"))
            .unwrap_or_default()
    }
}

set_type_enum!(
    /// Any problem set, discriminated by its `set_type`.
    ProblemSet { HomeworkSet, Quiz, ReviewSet }
    ints: [set_id, course_id]
);

impl ProblemSet {
    pub fn set_name(&self) -> &str {
        self.record().get_str("set_name").unwrap_or_default()
    }

    pub fn has_valid_dates(&self) -> bool {
        match self {
            ProblemSet::Homework(s) => s.has_valid_dates(),
            ProblemSet::Quiz(s) => s.has_valid_dates(),
            ProblemSet::Review(s) => s.has_valid_dates(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn set_type_round_trips_through_text() {
        for set_type in [SetType::Homework, SetType::Quiz, SetType::Review] {
            assert_eq!(set_type.as_str().parse::<SetType>().unwrap(), set_type);
        }
        assert!(matches!(
            "EXAM".parse::<SetType>(),
            Err(RecordError::UnknownSetType(tag)) if tag == "EXAM"
        ));
        assert_eq!(serde_json::to_value(SetType::Quiz).unwrap(), json!("QUIZ"));
    }

    #[test]
    fn homework_reduced_scoring_window() {
        let mut hw = HomeworkSet::new(&json!({
            "set_dates": { "open": 0, "reduced_scoring": 50, "due": 40, "answer": 60 }
        }))
        .unwrap();
        // reduced_scoring is ignored until enabled
        assert!(hw.has_valid_dates());
        hw.set(&json!({ "set_params": { "enable_reduced_scoring": true } }))
            .unwrap();
        assert!(hw.enable_reduced_scoring());
        assert!(!hw.has_valid_dates());
        hw.set(&json!({ "set_dates": { "reduced_scoring": 30 } })).unwrap();
        assert!(hw.has_valid_dates());
    }

    #[test]
    fn review_set_dates() {
        let review = ReviewSet::new(&json!({ "set_dates": { "open": 10, "closed": 5 } })).unwrap();
        assert!(!review.has_valid_dates());
        assert!(!review.can_retake());
        assert_eq!(review.set_type(), SetType::Review);
    }

    #[test]
    fn parse_dispatches_on_set_type() {
        let set = ProblemSet::parse(&json!({ "set_type": "REVIEW", "set_name": "Final" })).unwrap();
        assert_eq!(set.set_type(), SetType::Review);
        assert_eq!(set.set_name(), "Final");
        assert!(ProblemSet::parse(&json!({ "set_name": "untyped" })).is_err());
    }
}
