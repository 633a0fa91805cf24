//! # Remote Record Client
//!
//! The seam between the service layer and the RPC proxy transport.
//!
//! ## Responsibilities
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │   SessionManager ─┐                                                     │
//! │   OrderSubmitter ─┼──► RecordClient ──► (transport, out of this crate)  │
//! │   ServiceFacade ──┘        │                                            │
//! │                            ├── search_read(model, domain, keywords)     │
//! │                            ├── create(model, [values], keywords)        │
//! │                            ├── write(model, ids, values, keywords)      │
//! │                            └── call_method(model, method, args, kw)     │
//! │                                                                         │
//! │   Err(_)              → transport failed, no envelope                   │
//! │   Ok(envelope.error)  → the ERP rejected the call                       │
//! │   Ok(envelope.result) → success                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Retries, timeouts and cancellation belong to the implementation.

use async_trait::async_trait;
use odx_core::Record;
use serde_json::{Map, Value};

use crate::config::ConnectionSettings;
use crate::error::ServiceResult;
use crate::protocol::{Domain, KeywordRequest, ServerResponse};

/// The four primitive remote operations.
#[async_trait]
pub trait RecordClient: Send + Sync {
    /// Searches `model` with `domain` and reads the requested fields.
    async fn search_read(
        &self,
        model: &str,
        domain: &Domain,
        keywords: &KeywordRequest,
    ) -> ServiceResult<ServerResponse<Vec<Record>>>;

    /// Creates one record per entry of `values`. The result is either the
    /// new id or a list wrapping it.
    async fn create(
        &self,
        model: &str,
        values: Vec<Map<String, Value>>,
        keywords: &KeywordRequest,
    ) -> ServiceResult<ServerResponse<Value>>;

    /// Applies `values` to every record in `ids`.
    async fn write(
        &self,
        model: &str,
        ids: &[i64],
        values: Map<String, Value>,
        keywords: &KeywordRequest,
    ) -> ServiceResult<ServerResponse<bool>>;

    /// Calls a public model method with positional `args`.
    async fn call_method(
        &self,
        model: &str,
        method: &str,
        args: Vec<Value>,
        keywords: &KeywordRequest,
    ) -> ServiceResult<ServerResponse<Value>>;
}

/// Construction of a concrete client from connection settings.
///
/// Implementations should return
/// [`ServiceError::ClientInit`](crate::error::ServiceError::ClientInit) when
/// the settings are rejected.
pub trait Connect: RecordClient + Sized {
    fn connect(settings: &ConnectionSettings) -> ServiceResult<Self>;
}
