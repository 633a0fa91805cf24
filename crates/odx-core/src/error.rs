//! # Error Types
//!
//! Domain-specific error types for odx-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  odx-core errors (this file)                                           │
//! │  ├── CoreError        - Precondition failures of the checkout flow     │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  odx-service errors (separate crate)                                   │
//! │  └── ServiceError     - Remote, transport and config failures          │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → ServiceError → presentation       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Record mapping never produces an error; see [`crate::record`].

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Business rule violations detected before any remote call is made.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    /// An order was requested for a cart with no entries.
    #[error("Cart is empty")]
    EmptyCart,

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// An amount does not fit the cent range.
    #[error("{field} is out of range")]
    OutOfRange { field: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;
