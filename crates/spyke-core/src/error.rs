//! # Error Types
//!
//! Domain-specific error types for spyke-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  spyke-core errors (this file)                                         │
//! │  ├── CoreError        - Wizard / commission rule violations            │
//! │  ├── ValidationError  - A single field failed a rule                   │
//! │  └── FieldErrors      - field name → message map shown inline          │
//! │                                                                         │
//! │  spyke-store errors (separate crate)                                   │
//! │  └── StoreError       - Storage, HTTP and in-flight save failures      │
//! │                                                                         │
//! │  Flow: ValidationError → FieldErrors → CoreError → StoreError → UI     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (field, step, status)
//! 3. Nothing in this crate is fatal: every error is recoverable in the UI

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use ts_rs::TS;

use crate::commission::CommissionStatus;
use crate::draft::DraftField;
use crate::wizard::WizardStep;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A wizard step cannot be left because some of its fields are invalid.
    ///
    /// ## When This Occurs
    /// ```text
    /// Seller clicks "Next" on step 1 with an empty title
    ///      │
    ///      ▼
    /// validate_step(Basics) → { title: "title is required" }
    ///      │
    ///      ▼
    /// StepIncomplete { step: Basics, errors } → inline messages
    /// ```
    #[error("Step {} ({step}) has {} invalid field(s)", .step.number(), .errors.len())]
    StepIncomplete {
        step: WizardStep,
        errors: FieldErrors,
    },

    /// Submit was attempted before the wizard reached the review screen.
    #[error("Product can only be submitted from the review step (currently on {current})")]
    NotInReview { current: WizardStep },

    /// The seller has not accepted a commission offer yet.
    #[error("Commission offer must be accepted before listing products (status: {status})")]
    CommissionNotAccepted { status: CommissionStatus },

    /// The commission offer cannot perform the requested transition.
    #[error("Cannot {action} a commission offer that is {status}")]
    InvalidCommissionTransition {
        action: &'static str,
        status: CommissionStatus,
    },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors for a single field.
///
/// The `Display` output is the message shown next to the field.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too short.
    #[error("{field} must be at least {min} characters")]
    TooShort { field: String, min: usize },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Invalid format (e.g. invalid email or URL).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Duplicate value inside a list field.
    #[error("{field} '{value}' already exists")]
    Duplicate { field: String, value: String },

    /// A list field has fewer entries than required.
    #[error("{field} needs at least {min} item(s)")]
    TooFew { field: String, min: usize },

    /// A list field has more entries than allowed.
    #[error("{field} allows at most {max} item(s)")]
    TooMany { field: String, max: usize },
}

// =============================================================================
// Field Errors
// =============================================================================

/// Per-field validation messages for one wizard step.
///
/// Serializes as a plain JSON object (`{"title": "title is required"}`),
/// which is what the form renders inline.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct FieldErrors(BTreeMap<DraftField, String>);

impl FieldErrors {
    /// Creates an empty error map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the error for `field`. The first error per field wins.
    pub fn insert(&mut self, field: DraftField, error: &ValidationError) {
        self.0.entry(field).or_insert_with(|| error.to_string());
    }

    /// Records the error of a validation result, if any.
    pub fn check(&mut self, field: DraftField, result: Result<(), ValidationError>) {
        if let Err(e) = result {
            self.insert(field, &e);
        }
    }

    /// Removes the error for `field`, returning its message.
    pub fn clear(&mut self, field: DraftField) -> Option<String> {
        self.0.remove(&field)
    }

    /// Returns the message for `field`, if it has one.
    pub fn get(&self, field: DraftField) -> Option<&str> {
        self.0.get(&field).map(String::as_str)
    }

    /// Returns true if `field` has an error.
    pub fn contains(&self, field: DraftField) -> bool {
        self.0.contains_key(&field)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Iterates over `(field, message)` pairs in field order.
    pub fn iter(&self) -> impl Iterator<Item = (DraftField, &str)> {
        self.0.iter().map(|(field, msg)| (*field, msg.as_str()))
    }
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::Required {
            field: "title".to_string(),
        };
        assert_eq!(err.to_string(), "title is required");

        let err = ValidationError::TooFew {
            field: "images".to_string(),
            min: 1,
        };
        assert_eq!(err.to_string(), "images needs at least 1 item(s)");
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::Required {
            field: "title".to_string(),
        };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }

    #[test]
    fn test_field_errors_first_error_wins() {
        let mut errors = FieldErrors::new();
        errors.insert(
            DraftField::Title,
            &ValidationError::Required {
                field: "title".into(),
            },
        );
        errors.insert(
            DraftField::Title,
            &ValidationError::TooShort {
                field: "title".into(),
                min: 3,
            },
        );

        assert_eq!(errors.len(), 1);
        assert_eq!(errors.get(DraftField::Title), Some("title is required"));
        assert_eq!(errors.clear(DraftField::Title).as_deref(), Some("title is required"));
        assert!(errors.is_empty());
    }

    #[test]
    fn test_field_errors_serialize_as_object() {
        let mut errors = FieldErrors::new();
        errors.check(
            DraftField::ShortDescription,
            Err(ValidationError::Required {
                field: "shortDescription".into(),
            }),
        );
        errors.check(DraftField::Title, Ok(()));

        let json = serde_json::to_string(&errors).unwrap();
        assert_eq!(json, r#"{"shortDescription":"shortDescription is required"}"#);
    }

    #[test]
    fn test_step_incomplete_message() {
        let mut errors = FieldErrors::new();
        errors.insert(
            DraftField::Images,
            &ValidationError::TooFew {
                field: "images".into(),
                min: 1,
            },
        );
        let err = CoreError::StepIncomplete {
            step: WizardStep::Media,
            errors,
        };
        assert_eq!(err.to_string(), "Step 3 (media) has 1 invalid field(s)");
    }
}
