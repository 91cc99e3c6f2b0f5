//! Draft validation.
//!
//! Validation never blocks typing; it is advisory, recomputed on every
//! change, and gates review approval. Saving has its own narrower checks:
//! an empty origin list blocks approval but not a save, because the payload
//! builder seeds a provisional origin at save time.

use thiserror::Error;

use crate::draft::VerseDraft;
use crate::work::WorkDetail;

/// One field-level problem found in a draft.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field}: {message}")]
pub struct ValidationError {
    pub field: String,
    pub message: String,
}

impl ValidationError {
    fn new(field: &str, message: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

/// Check a draft against its work. Returns every problem found, in field
/// order, so callers can render the full list at once.
pub fn validate_draft(draft: &VerseDraft, work: Option<&WorkDetail>) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    if work.is_none() {
        errors.push(ValidationError::new("work", "no work selected"));
    }

    if draft.manual_number.trim().is_empty() {
        errors.push(ValidationError::new(
            "number_manual",
            "manual number is required",
        ));
    }

    if let Some(work) = work {
        let canonical = work.canonical_lang.as_str();
        if draft.text(canonical).trim().is_empty() {
            errors.push(ValidationError::new(
                "texts",
                format!("canonical text ({canonical}) is required"),
            ));
        }
    }

    if draft.origin.is_empty() {
        errors.push(ValidationError::new(
            "origin",
            "at least one origin entry is required",
        ));
    }
    for (index, entry) in draft.origin.iter().enumerate() {
        if entry.edition.trim().is_empty() {
            errors.push(ValidationError::new(
                "origin",
                format!("origin entry {} has no edition", index + 1),
            ));
        }
    }

    errors
}
