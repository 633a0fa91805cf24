//! # Service Error Types
//!
//! Error types for the orchestration layer.
//!
//! ## Error Categories
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Service Error Categories                           │
//! │                                                                         │
//! │  ┌─────────────────┐  ┌─────────────────┐  ┌─────────────────────────┐ │
//! │  │  Configuration  │  │   Remote        │  │     Precondition        │ │
//! │  │                 │  │                 │  │                         │ │
//! │  │  InvalidConfig  │  │  Remote         │  │  NoActiveConfig         │ │
//! │  │  ConfigLoad...  │  │  Transport      │  │  NoOpenSession          │ │
//! │  │  ClientInit     │  │  Unexpected...  │  │  Core(EmptyCart, ...)   │ │
//! │  └─────────────────┘  └─────────────────┘  └─────────────────────────┘ │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Propagation
//! Remote failures are converted exactly once, in
//! [`ServerResponse::into_result`](crate::protocol::ServerResponse::into_result).
//! Everything above that point passes errors through with `?`, so the
//! facade rejects with the remote message itself, not a wrapper around it.

use odx_core::CoreError;
use thiserror::Error;

/// Result type alias for service operations.
pub type ServiceResult<T> = Result<T, ServiceError>;

/// Every failure a facade operation can reject with.
#[derive(Debug, Error)]
pub enum ServiceError {
    // =========================================================================
    // Configuration Errors
    // =========================================================================
    /// Invalid connection configuration.
    #[error("Invalid connection configuration: {0}")]
    InvalidConfig(String),

    /// Failed to read or parse the config file.
    #[error("Failed to load config: {0}")]
    ConfigLoadFailed(String),

    /// The record client could not be constructed.
    #[error("Failed to initialize record client: {0}")]
    ClientInit(String),

    // =========================================================================
    // Remote Errors
    // =========================================================================
    /// The transport failed before a response envelope was produced.
    #[error("Transport error: {0}")]
    Transport(String),

    /// The ERP reported an error in the response envelope.
    #[error("{message}")]
    Remote { code: Option<i64>, message: String },

    /// The response envelope was well-formed but its content was not.
    #[error("Unexpected response: {0}")]
    UnexpectedResponse(String),

    // =========================================================================
    // Precondition Errors
    // =========================================================================
    /// No active point-of-sale configuration exists.
    #[error("No active POS config")]
    NoActiveConfig,

    /// The operation needs an open till session and none was found.
    #[error("No open POS session")]
    NoOpenSession,

    /// Domain precondition (empty cart, invalid id).
    #[error(transparent)]
    Core(#[from] CoreError),
}

// =============================================================================
// Error Conversions
// =============================================================================

impl From<serde_json::Error> for ServiceError {
    fn from(err: serde_json::Error) -> Self {
        ServiceError::UnexpectedResponse(err.to_string())
    }
}

impl From<std::io::Error> for ServiceError {
    fn from(err: std::io::Error) -> Self {
        ServiceError::ConfigLoadFailed(err.to_string())
    }
}

impl From<toml::de::Error> for ServiceError {
    fn from(err: toml::de::Error) -> Self {
        ServiceError::ConfigLoadFailed(err.to_string())
    }
}

impl From<url::ParseError> for ServiceError {
    fn from(err: url::ParseError) -> Self {
        ServiceError::InvalidConfig(format!("base_url: {}", err))
    }
}

// =============================================================================
// Error Categorization
// =============================================================================

impl ServiceError {
    /// A checkout precondition failed, as distinct from a remote error.
    pub fn is_precondition(&self) -> bool {
        matches!(
            self,
            ServiceError::NoActiveConfig | ServiceError::NoOpenSession | ServiceError::Core(_)
        )
    }

    /// Reported by the ERP or the transport.
    pub fn is_remote(&self) -> bool {
        matches!(
            self,
            ServiceError::Remote { .. }
                | ServiceError::Transport(_)
                | ServiceError::UnexpectedResponse(_)
        )
    }

    /// Raised while building the facade.
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            ServiceError::InvalidConfig(_)
                | ServiceError::ConfigLoadFailed(_)
                | ServiceError::ClientInit(_)
        )
    }
}
