//! Template + override merging.
//!
//! A merge starts from a *template* record (set-level definition), overlays
//! the per-user *override* and finally fills gaps from a *context* record.
//! Nested parameter objects are merged key by key, so an override that only
//! supplies `file_path` keeps the template's `weight`. Identifier fields left
//! at [`UNASSIGNED_ID`](crate::constants::UNASSIGNED_ID) never mask a value.
//!
//! Every result carries the source of each dotted field path. A parameter
//! object's own path names the last layer that wrote any of its keys.

pub mod users;

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::{Map, Value as JsonValue};
use thiserror::Error;

use crate::constants::assigned_id;
use crate::logging::{self, LogFeature};
use crate::models::problem_sets::{ProblemSet, SetType};
use crate::models::problems::{DbUserProblem, SetProblem, UserProblem};
use crate::models::user_sets::{DbUserSet, UserHomeworkSet, UserQuiz, UserReviewSet, UserSet};
use crate::models::users::CourseUser;
use crate::schema::{FieldError, Model};
use crate::{log_merge_debug, log_merge_warn};

pub use users::{begin_enrollment, finish_enrollment, resume_enrollment, EnrollmentStep};

#[derive(Debug, Error)]
pub enum MergeError {
    /// Template and override disagree on a field both must share
    #[error("cannot merge: {field} is {template} in the template but {found} in the override")]
    Mismatch {
        field: &'static str,
        template: String,
        found: String,
    },

    /// A step needed an identifier the server has not assigned yet
    #[error("{0} has not been assigned")]
    Unassigned(&'static str),

    /// The merged values do not parse as the target record
    #[error(transparent)]
    Field(#[from] FieldError),
}

/// Where a merged field's value came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldSource {
    Template,
    Override,
    Context,
}

/// A merged record and the provenance of each of its fields.
#[derive(Debug, Clone, PartialEq)]
pub struct Merged<T> {
    pub value: T,
    provenance: BTreeMap<String, FieldSource>,
}

impl<T> Merged<T> {
    /// Source of a field, by dotted path (`problem_params.weight`).
    pub fn source(&self, path: &str) -> Option<FieldSource> {
        self.provenance.get(path).copied()
    }

    pub fn provenance(&self) -> &BTreeMap<String, FieldSource> {
        &self.provenance
    }

    pub fn into_inner(self) -> T {
        self.value
    }
}

/// Accumulates layered JSON objects with per-field provenance.
#[derive(Debug, Default)]
pub(crate) struct Overlay {
    object: Map<String, JsonValue>,
    provenance: BTreeMap<String, FieldSource>,
}

impl Overlay {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Writes the listed fields of `layer` over what is already present.
    /// Objects merge key by key.
    pub(crate) fn apply(&mut self, source: FieldSource, layer: &JsonValue, fields: &[&str]) {
        for (key, value) in selected(layer, fields) {
            match (self.object.get_mut(&key), &value) {
                (Some(JsonValue::Object(existing)), JsonValue::Object(update)) => {
                    for (sub, sub_value) in update {
                        existing.insert(sub.clone(), sub_value.clone());
                        self.provenance.insert(format!("{}.{}", key, sub), source);
                    }
                    if !update.is_empty() {
                        self.provenance.insert(key, source);
                    }
                }
                _ => self.insert(source, key, value),
            }
        }
    }

    /// Writes the listed fields of `layer` only where nothing is present yet.
    pub(crate) fn fill(&mut self, source: FieldSource, layer: &JsonValue, fields: &[&str]) {
        for (key, value) in selected(layer, fields) {
            if !self.object.contains_key(&key) {
                self.insert(source, key, value);
            }
        }
    }

    fn insert(&mut self, source: FieldSource, key: String, value: JsonValue) {
        if let JsonValue::Object(nested) = &value {
            for sub in nested.keys() {
                self.provenance.insert(format!("{}.{}", key, sub), source);
            }
        }
        self.provenance.insert(key.clone(), source);
        self.object.insert(key, value);
    }

    pub(crate) fn get(&self, key: &str) -> Option<&JsonValue> {
        self.object.get(key)
    }

    pub(crate) fn build<T>(
        self,
        build: impl FnOnce(&JsonValue) -> Result<T, MergeError>,
    ) -> Result<Merged<T>, MergeError> {
        let input = JsonValue::Object(self.object);
        let value = build(&input)?;
        if logging::enabled(LogFeature::Merge, log::Level::Debug) {
            let sources: Vec<String> = self
                .provenance
                .iter()
                .map(|(path, source)| format!("{}={:?}", path, source))
                .collect();
            log_merge_debug!("merged fields: {}", sources.join(", "));
        }
        Ok(Merged {
            value,
            provenance: self.provenance,
        })
    }
}

/// The listed fields of an object layer, skipping unassigned identifiers.
/// An empty `fields` list selects every key.
fn selected(layer: &JsonValue, fields: &[&str]) -> Vec<(String, JsonValue)> {
    let Some(map) = layer.as_object() else {
        return Vec::new();
    };
    map.iter()
        .filter(|(key, _)| fields.is_empty() || fields.contains(&key.as_str()))
        .filter(|(key, value)| !(key.ends_with("_id") && is_unassigned(value)))
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect()
}

fn is_unassigned(value: &JsonValue) -> bool {
    value.as_i64().is_some_and(|id| assigned_id(id).is_none())
}

/// Fails when two assigned identifiers differ.
fn ensure_same_id(field: &'static str, template: i64, found: i64) -> Result<(), MergeError> {
    match (assigned_id(template), assigned_id(found)) {
        (Some(t), Some(f)) if t != f => {
            log_merge_warn!("{} mismatch: template {} vs override {}", field, t, f);
            Err(MergeError::Mismatch {
                field,
                template: t.to_string(),
                found: f.to_string(),
            })
        }
        _ => Ok(()),
    }
}

const SET_PROBLEM_TEMPLATE_FIELDS: &[&str] =
    &["set_problem_id", "set_id", "problem_number", "problem_params"];
const USER_PROBLEM_OVERRIDE_FIELDS: &[&str] = &[
    "user_problem_id",
    "set_problem_id",
    "user_set_id",
    "seed",
    "status",
    "problem_version",
    "problem_params",
];
const USER_PROBLEM_CONTEXT_FIELDS: &[&str] = &["user_set_id", "user_id", "set_id", "set_name"];

/// Builds a user's view of a set problem.
///
/// The override wins wherever both define a field and its `problem_params`
/// overlay the template's key by key. `context` supplies `user_id`,
/// `set_name` and any identifier still unassigned after the override.
pub fn merge_user_problem(
    template: &SetProblem,
    user_problem: &DbUserProblem,
    context: Option<&UserSet>,
) -> Result<Merged<UserProblem>, MergeError> {
    ensure_same_id(
        "set_problem_id",
        template.set_problem_id(),
        user_problem.set_problem_id(),
    )?;
    if let Some(user_set) = context {
        ensure_same_id("set_id", template.set_id(), user_set.set_id())?;
    }

    let mut overlay = Overlay::new();
    overlay.apply(
        FieldSource::Template,
        &template.to_object(),
        SET_PROBLEM_TEMPLATE_FIELDS,
    );
    overlay.apply(
        FieldSource::Override,
        &user_problem.to_object(),
        USER_PROBLEM_OVERRIDE_FIELDS,
    );
    if let Some(user_set) = context {
        overlay.fill(
            FieldSource::Context,
            &user_set.to_object(),
            USER_PROBLEM_CONTEXT_FIELDS,
        );
    }
    overlay.build(|input| Ok(UserProblem::new(input)?))
}

const PROBLEM_SET_TEMPLATE_FIELDS: &[&str] =
    &["set_id", "set_name", "set_visible", "set_params", "set_dates"];
const USER_SET_OVERRIDE_FIELDS: &[&str] = &[
    "user_set_id",
    "set_id",
    "course_user_id",
    "set_version",
    "set_visible",
    "set_params",
    "set_dates",
];
const USER_SET_CONTEXT_FIELDS: &[&str] = &["course_user_id", "user_id"];

/// Builds a user's view of a problem set from the set, the stored per-user
/// override and the enrolled user.
///
/// Set type, `set_id` and `course_user_id` must agree across the three.
pub fn merge_user_set(
    set: &ProblemSet,
    user_set: &DbUserSet,
    user: &CourseUser,
) -> Result<Merged<UserSet>, MergeError> {
    if set.set_type() != user_set.set_type() {
        log_merge_warn!(
            "set type mismatch: {} vs {}",
            set.set_type(),
            user_set.set_type()
        );
        return Err(MergeError::Mismatch {
            field: "set_type",
            template: set.set_type().to_string(),
            found: user_set.set_type().to_string(),
        });
    }
    ensure_same_id("set_id", set.set_id(), user_set.set_id())?;
    ensure_same_id(
        "course_user_id",
        user.course_user_id(),
        user_set.course_user_id(),
    )?;

    let mut overlay = Overlay::new();
    overlay.apply(
        FieldSource::Template,
        &set.to_object(),
        PROBLEM_SET_TEMPLATE_FIELDS,
    );
    overlay.apply(
        FieldSource::Override,
        &user_set.to_object(),
        USER_SET_OVERRIDE_FIELDS,
    );
    overlay.fill(
        FieldSource::Context,
        &user.to_object(),
        USER_SET_CONTEXT_FIELDS,
    );
    overlay.build(|input| {
        Ok(match set.set_type() {
            SetType::Homework => UserHomeworkSet::new(input)?.into(),
            SetType::Quiz => UserQuiz::new(input)?.into(),
            SetType::Review => UserReviewSet::new(input)?.into(),
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn overlay_merges_objects_key_by_key() {
        let mut overlay = Overlay::new();
        overlay.apply(
            FieldSource::Template,
            &json!({ "a": 1, "p": { "x": 1, "y": 2 } }),
            &[],
        );
        overlay.apply(FieldSource::Override, &json!({ "p": { "y": 3 } }), &[]);
        overlay.fill(FieldSource::Context, &json!({ "a": 9, "b": 2 }), &[]);
        assert_eq!(overlay.get("p"), Some(&json!({ "x": 1, "y": 3 })));
        assert_eq!(overlay.get("a"), Some(&json!(1)));
        let merged = overlay.build(|input| Ok(input.clone())).unwrap();
        assert_eq!(merged.source("p.x"), Some(FieldSource::Template));
        assert_eq!(merged.source("p.y"), Some(FieldSource::Override));
        assert_eq!(merged.source("p"), Some(FieldSource::Override));
        assert_eq!(merged.source("b"), Some(FieldSource::Context));
        assert_eq!(merged.source("missing"), None);
    }

    #[test]
    fn empty_override_objects_keep_the_template_source() {
        let mut overlay = Overlay::new();
        overlay.apply(FieldSource::Template, &json!({ "p": { "x": 1 } }), &[]);
        overlay.apply(FieldSource::Override, &json!({ "p": {} }), &[]);
        overlay.fill(FieldSource::Context, &json!({ "q": { "z": 2 } }), &[]);
        let merged = overlay.build(|input| Ok(input.clone())).unwrap();
        assert_eq!(merged.source("p"), Some(FieldSource::Template));
        assert_eq!(merged.source("q.z"), Some(FieldSource::Context));
    }

    #[test]
    fn unassigned_ids_never_mask() {
        let mut overlay = Overlay::new();
        overlay.apply(FieldSource::Template, &json!({ "set_id": 4 }), &[]);
        overlay.apply(FieldSource::Override, &json!({ "set_id": 0 }), &[]);
        assert_eq!(overlay.get("set_id"), Some(&json!(4)));
    }

    #[test]
    fn ensure_same_id_ignores_unassigned() {
        assert!(ensure_same_id("set_id", 0, 5).is_ok());
        assert!(ensure_same_id("set_id", 5, 5).is_ok());
        let err = ensure_same_id("set_id", 4, 5).unwrap_err();
        assert_eq!(
            err.to_string(),
            "cannot merge: set_id is 4 in the template but 5 in the override"
        );
    }
}
