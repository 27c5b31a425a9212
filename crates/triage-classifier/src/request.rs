//! Classification request payload

use serde::Deserialize;
use triage_core::{Error, Result};

/// Body of a classify call
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ClassificationRequest {
    #[serde(default)]
    pub description: Option<String>,
}

impl ClassificationRequest {
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: Some(description.into()),
        }
    }

    /// Return the description, or a field error if missing or blank
    pub fn into_description(self) -> Result<String> {
        match self.description {
            None => Err(Error::validation("description", "This field is required.")),
            Some(d) if d.trim().is_empty() => {
                Err(Error::validation("description", "This field may not be blank."))
            }
            Some(d) => Ok(d),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_description_required() {
        let err = ClassificationRequest::default().into_description().unwrap_err();
        let Error::Validation(errors) = err else {
            panic!("Expected validation error");
        };
        assert_eq!(
            errors.field("description"),
            Some(&["This field is required.".to_string()][..])
        );
    }

    #[test]
    fn test_blank_description_rejected() {
        assert!(ClassificationRequest::new(" \t").into_description().is_err());
    }

    #[test]
    fn test_description_kept_verbatim() {
        let description = ClassificationRequest::new("  refund please ")
            .into_description()
            .unwrap();
        assert_eq!(description, "  refund please ");
    }
}
