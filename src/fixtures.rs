//! Conversion of flat fixture rows into nested record input.
//!
//! Fixture tables are flat: every cell is text and parameter objects are
//! spread over columns named `PARAM:field`, e.g. `SET_DATES:open`. A
//! [`FixtureConfig`] says which columns are typed and which prefixes form
//! nested objects. Date cells are read as UTC and converted to unix seconds
//! as-is.

use std::collections::BTreeMap;
use std::path::Path;

use chrono::{DateTime, NaiveDateTime};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use serde_json::{Map, Value as JsonValue};
use thiserror::Error;

use crate::log_fixture_debug;
use crate::schema::{
    parse_boolean, parse_non_neg_float, parse_non_neg_int, FieldError, ParseError,
};

static PARAM_COLUMN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([A-Z0-9_]+):(\w+)$").expect("valid regex"));

const NAIVE_DATE_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];

#[derive(Debug, Error)]
pub enum FixtureError {
    /// A typed cell failed to parse
    #[error(transparent)]
    Field(#[from] FieldError),

    /// A `DATES:` cell is not a recognised timestamp
    #[error("column {column}: '{value}' is not a date")]
    Date { column: String, value: String },

    #[error("failed to read fixture config: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid fixture config: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Which columns of a fixture table are typed or nested.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct FixtureConfig {
    /// Lower-case names of the nested parameter objects, e.g. `set_dates`.
    pub params: Vec<String>,
    pub boolean_fields: Vec<String>,
    pub non_neg_int_fields: Vec<String>,
    pub non_neg_float_fields: Vec<String>,
    pub param_boolean_fields: Vec<String>,
    pub param_non_neg_int_fields: Vec<String>,
    pub param_non_neg_float_fields: Vec<String>,
}

impl FixtureConfig {
    pub fn from_toml_str(text: &str) -> Result<Self, FixtureError> {
        Ok(toml::from_str(text)?)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, FixtureError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    fn param_for(&self, prefix: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|p| p.to_uppercase() == prefix)
            .map(String::as_str)
    }
}

fn contains(fields: &[String], name: &str) -> bool {
    fields.iter().any(|f| f == name)
}

fn cell_error(column: &str, err: ParseError) -> FixtureError {
    FixtureError::Field(FieldError::new("FixtureRow", column, err))
}

/// Parses a fixture timestamp as unix seconds, UTC.
pub fn parse_date(column: &str, value: &str) -> Result<i64, FixtureError> {
    let value = value.trim();
    if let Ok(seconds) = value.parse::<i64>() {
        return Ok(seconds);
    }
    if let Ok(date) = DateTime::parse_from_rfc3339(value) {
        return Ok(date.timestamp());
    }
    NAIVE_DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
        .map(|naive| naive.and_utc().timestamp())
        .ok_or_else(|| FixtureError::Date {
            column: column.to_string(),
            value: value.to_string(),
        })
}

fn typed_cell(
    column: &str,
    value: &str,
    booleans: &[String],
    ints: &[String],
    floats: &[String],
    name: &str,
) -> Result<JsonValue, FixtureError> {
    let raw = JsonValue::String(value.to_string());
    let parsed = if contains(booleans, name) {
        parse_boolean(&raw).map(JsonValue::from)
    } else if contains(ints, name) {
        parse_non_neg_int(&raw).map(JsonValue::from)
    } else if contains(floats, name) {
        parse_non_neg_float(&raw).map(JsonValue::from)
    } else {
        Ok(raw)
    };
    parsed.map_err(|err| cell_error(column, err))
}

/// Converts one flat row.
pub fn convert_row(
    row: &BTreeMap<String, String>,
    config: &FixtureConfig,
) -> Result<JsonValue, FixtureError> {
    let mut object = Map::new();
    for param in &config.params {
        object.insert(param.clone(), JsonValue::Object(Map::new()));
    }
    for (column, value) in row {
        let nested = PARAM_COLUMN
            .captures(column)
            .and_then(|caps| {
                let prefix = caps.get(1)?.as_str();
                let field = caps.get(2)?.as_str();
                config.param_for(prefix).map(|param| (param, prefix, field))
            });
        match nested {
            Some((param, prefix, field)) => {
                // blank cells leave optional parameters unset
                if value.trim().is_empty() {
                    continue;
                }
                let parsed = if prefix.ends_with("DATES") {
                    JsonValue::from(parse_date(column, value)?)
                } else {
                    typed_cell(
                        column,
                        value,
                        &config.param_boolean_fields,
                        &config.param_non_neg_int_fields,
                        &config.param_non_neg_float_fields,
                        field,
                    )?
                };
                if let Some(JsonValue::Object(params)) = object.get_mut(param) {
                    params.insert(field.to_string(), parsed);
                }
            }
            None => {
                let parsed = typed_cell(
                    column,
                    value,
                    &config.boolean_fields,
                    &config.non_neg_int_fields,
                    &config.non_neg_float_fields,
                    column,
                )?;
                object.insert(column.clone(), parsed);
            }
        }
    }
    Ok(JsonValue::Object(object))
}

/// Converts every row, failing on the first cell that does not parse.
pub fn convert_rows(
    rows: &[BTreeMap<String, String>],
    config: &FixtureConfig,
) -> Result<Vec<JsonValue>, FixtureError> {
    let converted = rows
        .iter()
        .map(|row| convert_row(row, config))
        .collect::<Result<Vec<_>, _>>()?;
    log_fixture_debug!("converted {} fixture rows", converted.len());
    Ok(converted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn row(cells: &[(&str, &str)]) -> BTreeMap<String, String> {
        cells
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn quiz_config() -> FixtureConfig {
        FixtureConfig {
            params: vec!["set_params".into(), "set_dates".into()],
            boolean_fields: vec!["set_visible".into()],
            param_boolean_fields: vec!["timed".into()],
            param_non_neg_int_fields: vec!["quiz_duration".into()],
            ..Default::default()
        }
    }

    #[test]
    fn dates_are_utc_without_shift() {
        assert_eq!(parse_date("d", "1970-01-02 00:00:00").unwrap(), 86_400);
        assert_eq!(parse_date("d", "1970-01-01T01:00:00Z").unwrap(), 3_600);
        assert_eq!(parse_date("d", "1970-01-01T01:00:00+01:00").unwrap(), 0);
        assert_eq!(parse_date("d", "1234").unwrap(), 1234);
        assert!(matches!(
            parse_date("SET_DATES:open", "next tuesday"),
            Err(FixtureError::Date { .. })
        ));
    }

    #[test]
    fn param_columns_are_nested_and_typed() {
        let converted = convert_row(
            &row(&[
                ("set_name", "Quiz #1"),
                ("set_visible", "1"),
                ("SET_PARAMS:timed", "true"),
                ("SET_PARAMS:quiz_duration", "30"),
                ("SET_DATES:open", "2022-01-01 00:00:00"),
                ("SET_DATES:answer", ""),
            ]),
            &quiz_config(),
        )
        .unwrap();
        assert_eq!(
            converted,
            json!({
                "set_name": "Quiz #1",
                "set_visible": true,
                "set_params": { "timed": true, "quiz_duration": 30 },
                "set_dates": { "open": 1_640_995_200 }
            })
        );
    }

    #[test]
    fn bad_cells_name_their_column() {
        let err = convert_row(&row(&[("SET_PARAMS:timed", "T")]), &quiz_config()).unwrap_err();
        assert!(err.to_string().contains("SET_PARAMS:timed"));
    }

    #[test]
    fn config_loads_from_toml() {
        let config = FixtureConfig::from_toml_str(
            r#"
            params = ["problem_params"]
            non_neg_int_fields = ["problem_number"]
            param_non_neg_float_fields = ["weight"]
            "#,
        )
        .unwrap();
        assert_eq!(config.params, vec!["problem_params"]);
        assert!(config.boolean_fields.is_empty());
    }
}
