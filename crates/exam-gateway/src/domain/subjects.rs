//! Published subject list and normalization of the submitted `subjects` field.
//!
//! Submitted subjects are not checked against [`SUBJECTS`].

use super::error::FieldError;
use super::messages;

/// Subjects offered for the exam, in display order.
pub const SUBJECTS: [&str; 4] = ["คณิตศาสตร์", "ฟิสิกส์", "เคมี", "ชีววิทยา"];

/// Raw `subjects` value as it arrived in the form.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SubjectsInput {
    #[default]
    Missing,
    /// Sent once.
    Text(String),
    /// Sent more than once (repeated field or `subjects[]`).
    Array(Vec<String>),
}

impl SubjectsInput {
    /// Accumulate one occurrence of the field.
    pub fn push(&mut self, value: String) {
        *self = match std::mem::take(self) {
            SubjectsInput::Missing => SubjectsInput::Text(value),
            SubjectsInput::Text(first) => SubjectsInput::Array(vec![first, value]),
            SubjectsInput::Array(mut values) => {
                values.push(value);
                SubjectsInput::Array(values)
            }
        };
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            SubjectsInput::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl From<Vec<String>> for SubjectsInput {
    fn from(values: Vec<String>) -> Self {
        SubjectsInput::Array(values)
    }
}

impl From<&str> for SubjectsInput {
    fn from(value: &str) -> Self {
        SubjectsInput::Text(value.to_string())
    }
}

/// Which of the accepted shapes a raw value took.
#[derive(Debug, Clone, PartialEq, Eq)]
enum SubjectsShape {
    Array(Vec<String>),
    JsonString(Vec<String>),
    Delimited(Vec<String>),
    /// Missing, or valid JSON that is not an array.
    Unusable,
}

fn classify(input: &SubjectsInput) -> SubjectsShape {
    match input {
        SubjectsInput::Missing => SubjectsShape::Unusable,
        SubjectsInput::Array(values) => SubjectsShape::Array(values.clone()),
        SubjectsInput::Text(text) => match serde_json::from_str::<serde_json::Value>(text) {
            Ok(serde_json::Value::Array(items)) => {
                SubjectsShape::JsonString(items.into_iter().filter_map(json_scalar).collect())
            }
            Ok(_) => SubjectsShape::Unusable,
            Err(_) => SubjectsShape::Delimited(text.split(',').map(str::to_string).collect()),
        },
    }
}

fn json_scalar(value: serde_json::Value) -> Option<String> {
    match value {
        serde_json::Value::String(s) => Some(s),
        serde_json::Value::Number(n) => Some(n.to_string()),
        serde_json::Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Normalize the submitted subjects into trimmed, non-empty names in order.
///
/// An empty result is a validation failure on `subjects`.
pub fn normalize_subjects(input: &SubjectsInput) -> Result<Vec<String>, FieldError> {
    let entries = match classify(input) {
        SubjectsShape::Array(v) | SubjectsShape::JsonString(v) | SubjectsShape::Delimited(v) => v,
        SubjectsShape::Unusable => Vec::new(),
    };

    let subjects: Vec<String> = entries
        .iter()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect();

    if subjects.is_empty() {
        return Err(FieldError::body(
            "subjects",
            messages::SUBJECTS_REQUIRED,
            input.as_text(),
        ));
    }
    Ok(subjects)
}
