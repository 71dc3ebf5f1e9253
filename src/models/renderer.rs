//! Options passed to the problem renderer.
//!
//! Field names keep the renderer's camelCase keys so `to_object()` can be
//! handed over as is.

use crate::record_model;
use crate::schema::{FieldDescriptor, Schema};

/// Seed used when a render request does not carry a user's seed.
pub const DEFAULT_PROBLEM_SEED: i64 = 1234;

static RENDER_PARAMS_FIELDS: [FieldDescriptor; 10] = [
    FieldDescriptor::non_neg_int("problemSeed", DEFAULT_PROBLEM_SEED),
    FieldDescriptor::non_neg_int("permission_level", 0),
    FieldDescriptor::string("outputFormat", "ww3"),
    FieldDescriptor::string("answerPrefix", ""),
    FieldDescriptor::string("sourceFilePath", ""),
    FieldDescriptor::boolean("showHints", false),
    FieldDescriptor::boolean("showSolutions", false),
    FieldDescriptor::boolean("showPreviewButton", false),
    FieldDescriptor::boolean("showCheckAnswersButton", false),
    FieldDescriptor::boolean("showCorrectAnswersButton", false),
];
pub static RENDER_PARAMS: Schema = Schema::new("RenderParams", &RENDER_PARAMS_FIELDS);

record_model!(
    /// Rendering options for a single problem.
    RenderParams => RENDER_PARAMS
);

impl RenderParams {
    pub fn problem_seed(&self) -> i64 {
        self.inner
            .get_int("problemSeed")
            .unwrap_or(DEFAULT_PROBLEM_SEED)
    }

    pub fn permission_level(&self) -> i64 {
        self.inner.get_int("permission_level").unwrap_or_default()
    }

    pub fn output_format(&self) -> &str {
        self.inner.get_str("outputFormat").unwrap_or_default()
    }

    pub fn answer_prefix(&self) -> &str {
        self.inner.get_str("answerPrefix").unwrap_or_default()
    }

    pub fn source_file_path(&self) -> &str {
        self.inner.get_str("sourceFilePath").unwrap_or_default()
    }

    pub fn show_hints(&self) -> bool {
        self.inner.get_bool("showHints").unwrap_or_default()
    }

    pub fn show_solutions(&self) -> bool {
        self.inner.get_bool("showSolutions").unwrap_or_default()
    }

    pub fn show_preview_button(&self) -> bool {
        self.inner.get_bool("showPreviewButton").unwrap_or_default()
    }

    pub fn show_check_answers_button(&self) -> bool {
        self.inner
            .get_bool("showCheckAnswersButton")
            .unwrap_or_default()
    }

    pub fn show_correct_answers_button(&self) -> bool {
        self.inner
            .get_bool("showCorrectAnswersButton")
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{Model, ParseError};
    use serde_json::json;

    #[test]
    fn defaults() {
        let params = RenderParams::default();
        assert_eq!(
            params.to_object(),
            json!({
                "problemSeed": 1234,
                "permission_level": 0,
                "outputFormat": "ww3",
                "answerPrefix": "",
                "sourceFilePath": "",
                "showHints": false,
                "showSolutions": false,
                "showPreviewButton": false,
                "showCheckAnswersButton": false,
                "showCorrectAnswersButton": false
            })
        );
        assert!(params.is_valid());
        assert_eq!(RenderParams::schema().boolean_fields().len(), 5);
    }

    #[test]
    fn loose_input_is_coerced() {
        let params = RenderParams::new(&json!({
            "problemSeed": "4321",
            "showHints": "1",
            "sourceFilePath": "Library/a.pg"
        }))
        .unwrap();
        assert_eq!(params.problem_seed(), 4321);
        assert!(params.show_hints());
        assert!(!params.show_solutions());
        assert_eq!(params.source_file_path(), "Library/a.pg");
        assert_eq!(params.output_format(), "ww3");
    }

    #[test]
    fn bad_values_are_rejected() {
        let err = RenderParams::new(&json!({ "problemSeed": -1 })).unwrap_err();
        assert_eq!(err.field, "problemSeed");
        assert!(matches!(err.kind(), ParseError::NonNegInt(_)));

        let mut params = RenderParams::default();
        let err = params
            .set(&json!({ "showHints": "yes", "permission_level": 10 }))
            .unwrap_err();
        assert!(matches!(err.kind(), ParseError::Boolean(_)));
        assert_eq!(params, RenderParams::default());
    }
}
