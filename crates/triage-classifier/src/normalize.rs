//! Provider output parsing and taxonomy normalization

use serde::{Deserialize, Serialize};
use serde_json::Value;
use triage_core::types::unset;
use triage_core::{Category, Choice, Priority};

/// Normalized suggestion. Each field is a taxonomy member or unset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Classification {
    #[serde(rename = "suggested_category", with = "unset", default)]
    pub category: Option<Category>,

    #[serde(rename = "suggested_priority", with = "unset", default)]
    pub priority: Option<Priority>,
}

impl Classification {
    /// Both fields unset
    pub fn unset() -> Self {
        Self::default()
    }

    pub fn new(category: Option<Category>, priority: Option<Priority>) -> Self {
        Self { category, priority }
    }
}

/// Parse raw provider output into a classification.
///
/// The trimmed text must be a JSON object whose `category` and `priority`
/// keys, when present, hold strings; otherwise the reason is returned.
/// Values are normalized independently.
pub fn parse_suggestion(raw: &str) -> Result<Classification, String> {
    let value: Value = serde_json::from_str(raw.trim()).map_err(|e| e.to_string())?;

    let Value::Object(fields) = value else {
        return Err(format!("expected a JSON object, got {}", json_kind(&value)));
    };

    Ok(Classification {
        category: normalize_field("category", fields.get("category"))?,
        priority: normalize_field("priority", fields.get("priority"))?,
    })
}

/// Lower-case a string field and look it up. Absent is `""`; a value that is
/// not a string is an error.
fn normalize_field<T: Choice>(key: &str, value: Option<&Value>) -> Result<Option<T>, String> {
    let raw = match value {
        None => "",
        Some(Value::String(s)) => s.as_str(),
        Some(other) => {
            return Err(format!("`{}` is {}, expected a string", key, json_kind(other)));
        }
    };
    Ok(T::parse(&raw.to_lowercase()))
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
