//! Generic schema-driven record.
//!
//! A [`Record`] is the storage every model is built on. It only ever holds
//! values that have passed their field's parser, and only fields its schema
//! declares. Construction and [`Record::set`] stage every parsed value before
//! touching the record, so a failure leaves nothing half-applied.

use std::collections::BTreeMap;

use serde_json::{Map, Value as JsonValue};

use crate::schema::types::{FieldDescriptor, FieldError, FieldKind, FieldValue, ParseError, Schema};
use crate::{log_record_debug, log_record_trace};

#[derive(Debug, Clone)]
pub struct Record {
    schema: &'static Schema,
    values: BTreeMap<&'static str, FieldValue>,
}

impl PartialEq for Record {
    fn eq(&self, other: &Self) -> bool {
        self.values == other.values
    }
}

/// Treats `null` as an absent value.
fn present(raw: Option<&JsonValue>) -> Option<&JsonValue> {
    raw.filter(|v| !v.is_null())
}

fn as_object<'a>(
    schema: &'static Schema,
    input: &'a JsonValue,
) -> Result<Option<&'a Map<String, JsonValue>>, FieldError> {
    match input {
        JsonValue::Object(map) => Ok(Some(map)),
        JsonValue::Null => Ok(None),
        other => Err(FieldError::new(
            schema.name,
            "",
            ParseError::Params(other.to_string()),
        )),
    }
}

impl Record {
    /// A record holding every field's default.
    pub fn with_defaults(schema: &'static Schema) -> Self {
        let values = schema
            .descriptors()
            .into_iter()
            .filter_map(|d| d.default_value().map(|v| (d.name, v)))
            .collect();
        Self { schema, values }
    }

    /// Builds a record from loosely typed input.
    ///
    /// Absent and `null` fields take their default; unknown keys are ignored.
    /// Returns the first field that fails to parse.
    pub fn from_input(schema: &'static Schema, input: &JsonValue) -> Result<Self, FieldError> {
        let map = as_object(schema, input)?;
        let mut values = BTreeMap::new();
        for descriptor in schema.descriptors() {
            let raw = if descriptor.fixed {
                None
            } else {
                present(map.and_then(|m| m.get(descriptor.name)))
            };
            let value = match raw {
                Some(raw) => Some(Self::parse_field(schema, &descriptor, raw, None)?),
                None => descriptor.default_value(),
            };
            if let Some(value) = value {
                values.insert(descriptor.name, value);
            }
        }
        if let Some(map) = map {
            for key in map.keys().filter(|k| !schema.has_field(k)) {
                log_record_trace!("{}: ignoring unknown input key '{}'", schema.name, key);
            }
        }
        Ok(Self { schema, values })
    }

    fn parse_field(
        schema: &'static Schema,
        descriptor: &FieldDescriptor,
        raw: &JsonValue,
        current: Option<&Record>,
    ) -> Result<FieldValue, FieldError> {
        let parsed = match descriptor.kind {
            FieldKind::Params(nested) => {
                let record = match current {
                    Some(existing) => {
                        let mut updated = existing.clone();
                        updated.set(raw).map(|_| updated)
                    }
                    None => Record::from_input(nested, raw),
                };
                record
                    .map(FieldValue::Params)
                    .map_err(|e| e.nested_in(schema.name, descriptor.name))
            }
            _ => descriptor
                .parse_scalar(raw)
                .map_err(|e| FieldError::new(schema.name, descriptor.name, e)),
        };
        if let Err(e) = &parsed {
            log_record_debug!("rejected input: {}", e);
        }
        parsed
    }

    /// Re-validates and applies only the supplied keys.
    ///
    /// Nested parameter objects are updated key by key. A `null` value resets
    /// the field to its default (clearing optional fields). Fixed and unknown
    /// keys are ignored. Nothing is applied if any key fails to parse.
    pub fn set(&mut self, partial: &JsonValue) -> Result<(), FieldError> {
        let Some(map) = as_object(self.schema, partial)? else {
            return Ok(());
        };
        let mut staged: Vec<(&'static str, Option<FieldValue>)> = Vec::with_capacity(map.len());
        for (key, raw) in map {
            let Some(descriptor) = self.schema.descriptor(key) else {
                log_record_trace!("{}: ignoring unknown key '{}'", self.schema.name, key);
                continue;
            };
            if descriptor.fixed {
                continue;
            }
            let value = match present(Some(raw)) {
                Some(raw) => {
                    let current = self.params(descriptor.name);
                    Some(Self::parse_field(self.schema, &descriptor, raw, current)?)
                }
                None => descriptor.default_value(),
            };
            staged.push((descriptor.name, value));
        }
        for (name, value) in staged {
            match value {
                Some(value) => {
                    self.values.insert(name, value);
                }
                None => {
                    self.values.remove(name);
                }
            }
        }
        Ok(())
    }

    pub fn schema(&self) -> &'static Schema {
        self.schema
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.values.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn get_bool(&self, name: &str) -> Option<bool> {
        self.get(name).and_then(FieldValue::as_bool)
    }

    pub fn get_int(&self, name: &str) -> Option<i64> {
        self.get(name).and_then(FieldValue::as_int)
    }

    pub fn get_float(&self, name: &str) -> Option<f64> {
        self.get(name).and_then(FieldValue::as_float)
    }

    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(FieldValue::as_str)
    }

    pub fn params(&self, name: &str) -> Option<&Record> {
        self.get(name).and_then(FieldValue::as_params)
    }

    /// Mutable access to a nested parameter object. Changes still go through
    /// the nested record's own [`Record::set`].
    pub fn params_mut(&mut self, name: &str) -> Option<&mut Record> {
        match self.values.get_mut(name) {
            Some(FieldValue::Params(record)) => Some(record),
            _ => None,
        }
    }

    /// Names of the fields currently holding a value.
    pub fn field_names(&self) -> Vec<&'static str> {
        self.values.keys().copied().collect()
    }

    pub fn all_field_names(&self) -> Vec<&'static str> {
        self.schema.all_field_names()
    }

    pub fn param_fields(&self) -> Vec<&'static str> {
        self.schema.param_fields()
    }

    /// Plain JSON object of every stored field, nested params expanded.
    pub fn to_object(&self) -> JsonValue {
        JsonValue::Object(
            self.values
                .iter()
                .map(|(name, value)| (name.to_string(), value.to_json()))
                .collect(),
        )
    }

    /// Like [`Record::to_object`], restricted to the requested fields.
    /// Requested names the record does not hold are skipped.
    pub fn to_object_fields(&self, fields: &[&str]) -> JsonValue {
        JsonValue::Object(
            fields
                .iter()
                .filter_map(|name| {
                    self.values
                        .get(name)
                        .map(|value| (name.to_string(), value.to_json()))
                })
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    static OPTIONS_FIELDS: [FieldDescriptor; 3] = [
        FieldDescriptor::boolean("enabled", false),
        FieldDescriptor::non_neg_int("limit", 10),
        FieldDescriptor::string("label", "").optional(),
    ];
    static OPTIONS: Schema = Schema::new("Options", &OPTIONS_FIELDS);

    static WIDGET_FIELDS: [FieldDescriptor; 4] = [
        FieldDescriptor::non_neg_int("widget_id", 0),
        FieldDescriptor::string("kind", "WIDGET").fixed(),
        FieldDescriptor::non_neg_float("score", 1.0),
        FieldDescriptor::params("options", &OPTIONS),
    ];
    static WIDGET: Schema = Schema::new("Widget", &WIDGET_FIELDS);

    #[test]
    fn defaults_fill_every_declared_field() {
        let record = Record::from_input(&WIDGET, &json!({})).unwrap();
        assert_eq!(
            record.to_object(),
            json!({
                "widget_id": 0,
                "kind": "WIDGET",
                "score": 1.0,
                "options": { "enabled": false, "limit": 10 }
            })
        );
        assert_eq!(record, Record::with_defaults(&WIDGET));
        assert_eq!(record, Record::from_input(&WIDGET, &JsonValue::Null).unwrap());
    }

    #[test]
    fn fixed_and_unknown_keys_are_not_stored() {
        let record =
            Record::from_input(&WIDGET, &json!({ "kind": "GADGET", "colour": "red" })).unwrap();
        assert_eq!(record.get_str("kind"), Some("WIDGET"));
        assert!(!record.contains("colour"));
    }

    #[test]
    fn construction_reports_nested_field_path() {
        let err = Record::from_input(&WIDGET, &json!({ "options": { "limit": "-4" } }))
            .unwrap_err();
        assert_eq!(err.record, "Widget");
        assert_eq!(err.field, "options.limit");
        assert_eq!(err.source, ParseError::NonNegInt("-4".to_string()));
    }

    #[test]
    fn non_object_input_is_rejected() {
        let err = Record::from_input(&WIDGET, &json!([1, 2])).unwrap_err();
        assert_eq!(err.kind().kind_name(), "params");
        let err = Record::from_input(&WIDGET, &json!({ "options": 5 })).unwrap_err();
        assert_eq!(err.field, "options");
    }

    #[test]
    fn set_is_all_or_nothing() {
        let mut record = Record::with_defaults(&WIDGET);
        let before = record.clone();
        let err = record
            .set(&json!({ "widget_id": 4, "score": "lots" }))
            .unwrap_err();
        assert_eq!(err.field, "score");
        assert_eq!(record, before);
    }

    #[test]
    fn set_merges_nested_params_key_by_key() {
        let mut record =
            Record::from_input(&WIDGET, &json!({ "options": { "limit": 3, "label": "a" } }))
                .unwrap();
        record.set(&json!({ "options": { "enabled": "1" } })).unwrap();
        let options = record.params("options").unwrap();
        assert_eq!(options.get_bool("enabled"), Some(true));
        assert_eq!(options.get_int("limit"), Some(3));
        assert_eq!(options.get_str("label"), Some("a"));
    }

    #[test]
    fn null_resets_to_default() {
        let mut record =
            Record::from_input(&WIDGET, &json!({ "widget_id": 9, "options": { "label": "x" } }))
                .unwrap();
        record
            .set(&json!({ "widget_id": null, "options": { "label": null } }))
            .unwrap();
        assert_eq!(record.get_int("widget_id"), Some(0));
        assert!(!record.params("options").unwrap().contains("label"));
    }

    #[test]
    fn clones_are_independent() {
        let original = Record::with_defaults(&WIDGET);
        let mut copy = original.clone();
        copy.params_mut("options")
            .unwrap()
            .set(&json!({ "limit": 99 }))
            .unwrap();
        assert_eq!(original.params("options").unwrap().get_int("limit"), Some(10));
        assert_ne!(original, copy);
    }

    #[test]
    fn to_object_fields_selects_and_round_trips() {
        let record =
            Record::from_input(&WIDGET, &json!({ "widget_id": "12", "score": "0.5" })).unwrap();
        assert_eq!(
            record.to_object_fields(&["widget_id", "missing"]),
            json!({ "widget_id": 12 })
        );
        let again = Record::from_input(&WIDGET, &record.to_object()).unwrap();
        assert_eq!(again, record);
    }
}
