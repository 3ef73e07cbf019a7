//! Analysis document model.
//!
//! Parsing is strict about shape (the top level must be a JSON object) and
//! lenient about content: missing settings fall back to placeholder strings
//! and unknown attributes ride along untouched.

use serde_json::{Map, Value};

use crate::error::IngestError;

const NO_NAME: &str = "No name set";
const NO_HELP: &str = "No help set";
const NO_SUMMARY: &str = "No summary set";

/// A parsed analysis document.
#[derive(Debug, Clone)]
pub struct AnalysisDoc {
    fields: Map<String, Value>,
}

/// The `settings` section, with placeholders filled in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocSettings {
    pub name: String,
    pub help: String,
    pub summary: String,
}

/// A non-settings top-level field. `metadata` is the field object verbatim,
/// attached to the data entry created from it.
#[derive(Debug, Clone)]
pub struct DataField {
    pub name: String,
    pub path: Option<String>,
    pub data_type: Option<String>,
    pub metadata: Value,
}

impl AnalysisDoc {
    /// Parse document text. Failure names the parse error and is terminal —
    /// nothing downstream runs on a malformed document.
    pub fn parse(text: &str) -> Result<Self, IngestError> {
        let value: Value =
            serde_json::from_str(text).map_err(|e| IngestError::Malformed(e.to_string()))?;
        match value {
            Value::Object(fields) => Ok(Self { fields }),
            other => Err(IngestError::Malformed(format!(
                "top level must be an object, got {}",
                json_type_name(&other)
            ))),
        }
    }

    /// Extract the settings section. Absent keys are placeholders, never an
    /// error; help text has its leading indentation stripped.
    #[must_use]
    pub fn settings(&self) -> DocSettings {
        let settings = self.fields.get("settings").and_then(Value::as_object);
        let get = |key: &str, fallback: &str| {
            settings
                .and_then(|s| s.get(key))
                .and_then(Value::as_str)
                .unwrap_or(fallback)
                .to_string()
        };
        DocSettings {
            name: get("name", NO_NAME),
            help: dedent(&get("help", NO_HELP)),
            summary: get("summary", NO_SUMMARY),
        }
    }

    /// Every top-level object field other than `settings`, in name order.
    #[must_use]
    pub fn data_fields(&self) -> Vec<DataField> {
        self.fields
            .iter()
            .filter(|(key, _)| key.as_str() != "settings")
            .filter_map(|(key, value)| {
                let object = value.as_object()?;
                Some(DataField {
                    name: key.clone(),
                    path: object.get("path").and_then(Value::as_str).map(String::from),
                    data_type: object
                        .get("data_type")
                        .and_then(Value::as_str)
                        .map(String::from),
                    metadata: value.clone(),
                })
            })
            .collect()
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Strip the space/tab margin common to all non-blank lines.
fn dedent(text: &str) -> String {
    let indent = |line: &str| {
        line.bytes()
            .take_while(|b| *b == b' ' || *b == b'\t')
            .count()
    };
    let margin = text
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(indent)
        .min()
        .unwrap_or(0);
    let lines: Vec<&str> = text
        .lines()
        .map(|line| {
            if line.trim().is_empty() {
                ""
            } else {
                &line[margin..]
            }
        })
        .collect();
    lines.join("\n")
}
