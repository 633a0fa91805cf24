//! # Validation Module
//!
//! Precondition checks run before a document is assembled or sent.
//!
//! ```rust
//! use odx_core::validation::{validate_record_id, validate_required};
//!
//! assert!(validate_record_id("session_id", 12).is_ok());
//! assert!(validate_record_id("session_id", 0).is_err());
//! assert!(validate_required("name", "  ").is_err());
//! ```

use crate::error::ValidationError;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Remote ids are positive once assigned.
pub fn validate_record_id(field: &str, id: i64) -> ValidationResult<()> {
    if id <= 0 {
        return Err(ValidationError::MustBePositive {
            field: field.to_string(),
        });
    }
    Ok(())
}

/// Rejects empty or whitespace-only text.
pub fn validate_required(field: &str, value: &str) -> ValidationResult<()> {
    if value.trim().is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }
    Ok(())
}
