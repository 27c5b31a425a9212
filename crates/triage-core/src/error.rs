//! Error types for the triage backend

use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// Result type alias using the triage Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for triage operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Caller input failed validation
    #[error("validation error: {0}")]
    Validation(ValidationErrors),

    /// No ticket with the given id
    #[error("ticket {0} not found")]
    NotFound(u64),

    /// The backing ticket store could not be reached
    #[error("ticket store unavailable: {0}")]
    StoreUnavailable(String),

    /// Generic internal errors
    #[error("internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Create a validation error for a single field
    pub fn validation(field: impl Into<String>, msg: impl Into<String>) -> Self {
        let mut errors = ValidationErrors::new();
        errors.add(field, msg);
        Self::Validation(errors)
    }

    /// Create a new store-unavailable error
    pub fn store_unavailable(msg: impl Into<String>) -> Self {
        Self::StoreUnavailable(msg.into())
    }

    /// Create a new internal error
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }
}

/// Field-level validation messages, keyed by field name.
///
/// Serializes as `{"field": ["message", ...]}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors {
    fields: BTreeMap<String, Vec<String>>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a message against a field
    pub fn add(&mut self, field: impl Into<String>, msg: impl Into<String>) {
        self.fields.entry(field.into()).or_default().push(msg.into());
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Messages recorded for a field
    pub fn field(&self, field: &str) -> Option<&[String]> {
        self.fields.get(field).map(Vec::as_slice)
    }

    /// Ok if nothing was recorded, otherwise a `Validation` error
    pub fn into_result(self) -> Result<()> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(Error::Validation(self))
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, messages) in &self.fields {
            for msg in messages {
                if !first {
                    f.write_str("; ")?;
                }
                write!(f, "{}: {}", field, msg)?;
                first = false;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_errors_collect_per_field() {
        let mut errors = ValidationErrors::new();
        errors.add("title", "This field is required.");
        errors.add("title", "Ensure this field has no more than 200 characters.");
        errors.add("status", "\"later\" is not a valid choice.");

        assert_eq!(errors.field("title").map(|m| m.len()), Some(2));
        assert_eq!(
            errors.to_string(),
            "status: \"later\" is not a valid choice.; title: This field is required.; \
             title: Ensure this field has no more than 200 characters."
        );

        let json = serde_json::to_value(&errors).unwrap();
        assert_eq!(json["status"][0], "\"later\" is not a valid choice.");
    }

    #[test]
    fn test_empty_errors_are_ok() {
        assert!(ValidationErrors::new().into_result().is_ok());
        assert!(matches!(
            Error::validation("description", "This field is required."),
            Error::Validation(_)
        ));
    }
}
