//! Problems: library candidates, set-level definitions and per-user state.

use std::fmt;
use std::str::FromStr;

use serde_json::{json, Value as JsonValue};

use crate::constants::{assigned_id, DEFAULT_PROBLEM_WEIGHT, INITIAL_VERSION};
use crate::error::{RecordError, RecordResult};
use crate::schema::{FieldDescriptor, Model, Record, Schema};
use crate::{record_accessors, record_model};

static SET_PROBLEM_PARAMS_FIELDS: [FieldDescriptor; 4] = [
    FieldDescriptor::non_neg_float("weight", DEFAULT_PROBLEM_WEIGHT),
    FieldDescriptor::string("file_path", "").optional(),
    FieldDescriptor::non_neg_int("library_id", 0).optional(),
    FieldDescriptor::non_neg_int("problem_pool_id", 0).optional(),
];
/// Problem parameters of a set problem or merged user problem.
pub static SET_PROBLEM_PARAMS: Schema = Schema::new("SetProblemParams", &SET_PROBLEM_PARAMS_FIELDS);

static LOCATION_PARAMS_FIELDS: [FieldDescriptor; 3] = [
    FieldDescriptor::string("file_path", "").optional(),
    FieldDescriptor::non_neg_int("library_id", 0).optional(),
    FieldDescriptor::non_neg_int("problem_pool_id", 0).optional(),
];
/// Where a library problem's source lives.
pub static LOCATION_PARAMS: Schema = Schema::new("LibraryParams", &LOCATION_PARAMS_FIELDS);

static USER_PROBLEM_PARAMS_FIELDS: [FieldDescriptor; 4] = [
    FieldDescriptor::non_neg_float("weight", DEFAULT_PROBLEM_WEIGHT).optional(),
    FieldDescriptor::string("file_path", "").optional(),
    FieldDescriptor::non_neg_int("library_id", 0).optional(),
    FieldDescriptor::non_neg_int("problem_pool_id", 0).optional(),
];
/// Per-user overrides of problem parameters. Every key is optional so an
/// override only masks what it actually supplies.
pub static USER_PROBLEM_PARAMS: Schema =
    Schema::new("UserProblemParams", &USER_PROBLEM_PARAMS_FIELDS);

static SET_PROBLEM_FIELDS: [FieldDescriptor; 4] = [
    FieldDescriptor::non_neg_int("set_problem_id", 0),
    FieldDescriptor::non_neg_int("set_id", 0),
    FieldDescriptor::int("problem_number", 0),
    FieldDescriptor::params("problem_params", &SET_PROBLEM_PARAMS),
];
pub static SET_PROBLEM: Schema = Schema::new("SetProblem", &SET_PROBLEM_FIELDS);

static LIBRARY_PROBLEM_FIELDS: [FieldDescriptor; 1] =
    [FieldDescriptor::params("location_params", &LOCATION_PARAMS)];
pub static LIBRARY_PROBLEM: Schema = Schema::new("LibraryProblem", &LIBRARY_PROBLEM_FIELDS);

static DB_USER_PROBLEM_FIELDS: [FieldDescriptor; 7] = [
    FieldDescriptor::non_neg_int("user_problem_id", 0),
    FieldDescriptor::non_neg_int("set_problem_id", 0),
    FieldDescriptor::non_neg_int("user_set_id", 0),
    FieldDescriptor::non_neg_int("seed", 0),
    FieldDescriptor::non_neg_float("status", 0.0),
    FieldDescriptor::non_neg_int("problem_version", INITIAL_VERSION),
    FieldDescriptor::params("problem_params", &USER_PROBLEM_PARAMS),
];
/// The stored per-user problem state, before merging with its set problem.
pub static DB_USER_PROBLEM: Schema = Schema::new("DBUserProblem", &DB_USER_PROBLEM_FIELDS);

static USER_PROBLEM_FIELDS: [FieldDescriptor; 7] = [
    FieldDescriptor::non_neg_int("user_problem_id", 0),
    FieldDescriptor::non_neg_int("user_set_id", 0),
    FieldDescriptor::non_neg_int("user_id", 0),
    FieldDescriptor::string("set_name", ""),
    FieldDescriptor::non_neg_int("seed", 0),
    FieldDescriptor::non_neg_float("status", 0.0),
    FieldDescriptor::non_neg_int("problem_version", INITIAL_VERSION),
];
/// A set problem as seen by one user: the set problem's fields plus the
/// user's state.
pub static USER_PROBLEM: Schema = Schema::extends("UserProblem", &SET_PROBLEM, &USER_PROBLEM_FIELDS);

fn has_valid_problem_number<T: Model>(problem: &T) -> bool {
    problem
        .record()
        .get_int("problem_number")
        .is_some_and(|n| n >= 0)
}

const LOCATION_IDS: [&str; 2] = ["library_id", "problem_pool_id"];

fn has_location(problem: &LibraryProblem) -> bool {
    problem.location_params().is_some_and(|location| {
        location.get_str("file_path").is_some_and(|p| !p.is_empty())
            || LOCATION_IDS
                .iter()
                .any(|id| location.get_int(id).and_then(assigned_id).is_some())
    })
}

record_model!(
    /// A problem attached to a problem set.
    SetProblem => SET_PROBLEM, valid = has_valid_problem_number
);
record_model!(
    /// A candidate problem from the library, not yet attached to a set. Valid
    /// only with a resolvable source location.
    LibraryProblem => LIBRARY_PROBLEM, valid = has_location
);
record_model!(DbUserProblem => DB_USER_PROBLEM);
record_model!(
    /// Merged per-user view of a set problem.
    UserProblem => USER_PROBLEM, valid = has_valid_problem_number
);

record_accessors!(SetProblem {
    set_problem_id: int,
    set_id: int,
    problem_number: int,
});

record_accessors!(DbUserProblem {
    user_problem_id: int,
    set_problem_id: int,
    user_set_id: int,
    seed: int,
    status: float,
    problem_version: int,
});

record_accessors!(UserProblem {
    user_problem_id: int,
    set_problem_id: int,
    user_set_id: int,
    user_id: int,
    set_id: int,
    set_name: str,
    problem_number: int,
    seed: int,
    status: float,
    problem_version: int,
});

impl SetProblem {
    /// Attaches a library problem to a set as problem number
    /// `problem_number`. Unassigned location ids are not copied.
    pub fn from_library(
        library_problem: &LibraryProblem,
        set_id: i64,
        problem_number: i64,
    ) -> RecordResult<Self> {
        if !library_problem.is_valid() {
            return Err(RecordError::Invalid("The added problem is invalid".to_string()));
        }
        let mut location = library_problem
            .location_params()
            .map(Record::to_object)
            .unwrap_or(JsonValue::Null);
        if let JsonValue::Object(map) = &mut location {
            map.retain(|key, value| {
                !LOCATION_IDS.contains(&key.as_str())
                    || value.as_i64().and_then(assigned_id).is_some()
            });
        }
        let problem = SetProblem::new(&json!({
            "set_id": set_id,
            "problem_number": problem_number,
            "problem_params": location,
        }))?;
        Ok(problem)
    }

    pub fn problem_params(&self) -> Option<&Record> {
        self.inner.params("problem_params")
    }

    pub fn problem_params_mut(&mut self) -> Option<&mut Record> {
        self.inner.params_mut("problem_params")
    }

    pub fn weight(&self) -> f64 {
        self.problem_params()
            .and_then(|p| p.get_float("weight"))
            .unwrap_or(DEFAULT_PROBLEM_WEIGHT)
    }
}

impl LibraryProblem {
    pub fn location_params(&self) -> Option<&Record> {
        self.inner.params("location_params")
    }
}

impl DbUserProblem {
    pub fn problem_params(&self) -> Option<&Record> {
        self.inner.params("problem_params")
    }
}

impl UserProblem {
    pub fn problem_params(&self) -> Option<&Record> {
        self.inner.params("problem_params")
    }

    pub fn problem_params_mut(&mut self) -> Option<&mut Record> {
        self.inner.params_mut("problem_params")
    }
}

/// Which problem model raw input describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProblemKind {
    Set,
    Library,
    User,
}

impl FromStr for ProblemKind {
    type Err = RecordError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Set" => Ok(ProblemKind::Set),
            "Library" => Ok(ProblemKind::Library),
            "User" => Ok(ProblemKind::User),
            other => Err(RecordError::UnknownProblemKind(other.to_string())),
        }
    }
}

impl fmt::Display for ProblemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ProblemKind::Set => "Set",
            ProblemKind::Library => "Library",
            ProblemKind::User => "User",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Problem {
    Set(SetProblem),
    Library(LibraryProblem),
    User(UserProblem),
}

impl Problem {
    pub fn kind(&self) -> ProblemKind {
        match self {
            Problem::Set(_) => ProblemKind::Set,
            Problem::Library(_) => ProblemKind::Library,
            Problem::User(_) => ProblemKind::User,
        }
    }

    pub fn to_object(&self) -> JsonValue {
        match self {
            Problem::Set(p) => p.to_object(),
            Problem::Library(p) => p.to_object(),
            Problem::User(p) => p.to_object(),
        }
    }

    pub fn is_valid(&self) -> bool {
        match self {
            Problem::Set(p) => p.is_valid(),
            Problem::Library(p) => p.is_valid(),
            Problem::User(p) => p.is_valid(),
        }
    }
}

/// Parses raw input as the given kind of problem.
pub fn parse_problem(input: &JsonValue, kind: ProblemKind) -> RecordResult<Problem> {
    Ok(match kind {
        ProblemKind::Set => Problem::Set(SetProblem::new(input)?),
        ProblemKind::Library => Problem::Library(LibraryProblem::new(input)?),
        ProblemKind::User => Problem::User(UserProblem::new(input)?),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_problem_defaults() {
        let problem = SetProblem::default();
        assert_eq!(
            problem.to_object(),
            json!({
                "set_problem_id": 0,
                "set_id": 0,
                "problem_number": 0,
                "problem_params": { "weight": 1.0 }
            })
        );
        assert!(problem.is_valid());
    }

    #[test]
    fn library_problem_needs_a_location() {
        assert!(!LibraryProblem::default().is_valid());
        assert!(!LibraryProblem::new(&json!({ "location_params": { "file_path": "" } }))
            .unwrap()
            .is_valid());
        assert!(LibraryProblem::new(&json!({ "location_params": { "library_id": 12 } }))
            .unwrap()
            .is_valid());
        assert!(LibraryProblem::new(&json!({ "location_params": { "problem_pool_id": "3" } }))
            .unwrap()
            .is_valid());
    }

    #[test]
    fn unassigned_location_ids_are_no_location() {
        let library = LibraryProblem::new(&json!({
            "location_params": { "library_id": 0, "problem_pool_id": 0 }
        }))
        .unwrap();
        assert!(!library.is_valid());
        assert!(SetProblem::from_library(&library, 4, 1).is_err());

        let library = LibraryProblem::new(&json!({
            "location_params": { "file_path": "a.pg", "library_id": 0 }
        }))
        .unwrap();
        let problem = SetProblem::from_library(&library, 4, 1).unwrap();
        assert_eq!(
            problem.to_object()["problem_params"],
            json!({ "weight": 1.0, "file_path": "a.pg" })
        );
    }

    #[test]
    fn from_library_copies_the_location() {
        let library = LibraryProblem::new(&json!({
            "location_params": { "file_path": "path/to/the/problem.pg" }
        }))
        .unwrap();
        let problem = SetProblem::from_library(&library, 4, 7).unwrap();
        assert_eq!(problem.set_id(), 4);
        assert_eq!(problem.problem_number(), 7);
        assert_eq!(problem.weight(), 1.0);
        assert_eq!(
            problem.problem_params().and_then(|p| p.get_str("file_path")),
            Some("path/to/the/problem.pg")
        );
    }

    #[test]
    fn from_library_rejects_invalid_problems() {
        let err = SetProblem::from_library(&LibraryProblem::default(), 4, 7).unwrap_err();
        assert_eq!(err.to_string(), "The added problem is invalid");
    }

    #[test]
    fn user_problem_fields_include_the_set_problem() {
        let names = UserProblem::all_field_names();
        for field in SetProblem::all_field_names() {
            assert!(names.contains(&field), "missing {}", field);
        }
        assert_eq!(UserProblem::param_fields(), vec!["problem_params"]);
        assert_eq!(UserProblem::default().problem_version(), 1);
    }

    #[test]
    fn parse_problem_by_kind() {
        let problem = parse_problem(&json!({ "problem_number": 2 }), "Set".parse().unwrap()).unwrap();
        assert_eq!(problem.kind(), ProblemKind::Set);
        assert!("Other".parse::<ProblemKind>().is_err());
    }
}
