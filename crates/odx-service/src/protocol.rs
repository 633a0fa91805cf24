//! # Remote Protocol Types
//!
//! Request and response shapes exchanged with the RPC proxy.
//!
//! ## Wire Format (JSON)
//! ```json
//! {
//!   "model": "pos.session",
//!   "domain": [[["config_id", "=", 1], ["state", "in", ["opened", "opening_control"]]]],
//!   "keyword": {
//!     "fields": ["id", "state"], "order": "id desc", "limit": 1, "offset": 0,
//!     "context": { "allowed_company_ids": [1], "uid": 1, "tz": "Asia/Jakarta", "lang": "en_US" }
//!   }
//! }
//! ```
//!
//! Responses arrive as `{ "result": ..., "error": ... }`. A non-null `error`
//! always wins over whatever `result` holds.

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use crate::error::{ServiceError, ServiceResult};

// =============================================================================
// Remote Names
// =============================================================================

pub const MODEL_PARTNER: &str = "res.partner";
pub const MODEL_PRODUCT: &str = "product.product";
pub const MODEL_POS_CONFIG: &str = "pos.config";
pub const MODEL_POS_SESSION: &str = "pos.session";
pub const MODEL_POS_ORDER: &str = "pos.order";

/// Advances a session from `opening_control` to `opened`.
pub const METHOD_SESSION_OPEN: &str = "action_pos_session_open";
/// Runs the closing-control step of a session.
pub const METHOD_SESSION_CLOSING_CONTROL: &str = "action_pos_session_closing_control";

// =============================================================================
// Request Context
// =============================================================================

/// Opaque parameters threaded through every remote call.
///
/// Built once per facade operation and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestContext {
    pub allowed_company_ids: Vec<i64>,
    pub uid: i64,
    pub tz: String,
    pub lang: String,
}

impl Default for RequestContext {
    /// The fixed operational defaults: company 1, user 1, Jakarta, en_US.
    fn default() -> Self {
        RequestContext {
            allowed_company_ids: vec![1],
            uid: 1,
            tz: "Asia/Jakarta".to_string(),
            lang: "en_US".to_string(),
        }
    }
}

// =============================================================================
// Keyword Request
// =============================================================================

/// Keyword arguments of a remote call.
///
/// ## Usage
/// ```rust
/// use odx_service::protocol::{KeywordRequest, RequestContext};
///
/// let keywords = KeywordRequest::new(RequestContext::default())
///     .fields(&["id", "state"])
///     .order("id desc")
///     .limit(1);
/// assert_eq!(keywords.limit, Some(1));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeywordRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fields: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offset: Option<u32>,
    pub context: RequestContext,
}

impl KeywordRequest {
    /// A request carrying only the context.
    pub fn new(context: RequestContext) -> Self {
        KeywordRequest {
            fields: None,
            order: None,
            limit: None,
            offset: None,
            context,
        }
    }

    pub fn fields(mut self, fields: &[&str]) -> Self {
        self.fields = Some(fields.iter().map(|f| f.to_string()).collect());
        self
    }

    pub fn order(mut self, order: impl Into<String>) -> Self {
        self.order = Some(order.into());
        self
    }

    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn offset(mut self, offset: u32) -> Self {
        self.offset = Some(offset);
        self
    }
}

// =============================================================================
// Domain Filter
// =============================================================================

/// One `[field, operator, value]` triple.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Condition(pub String, pub String, pub Value);

impl Condition {
    pub fn new(field: &str, operator: &str, value: impl Into<Value>) -> Self {
        Condition(field.to_string(), operator.to_string(), value.into())
    }

    /// `field = value`
    pub fn eq(field: &str, value: impl Into<Value>) -> Self {
        Condition::new(field, "=", value)
    }

    /// `field in [values]`
    pub fn is_in<V: Into<Value>>(field: &str, values: impl IntoIterator<Item = V>) -> Self {
        let values: Vec<Value> = values.into_iter().map(Into::into).collect();
        Condition::new(field, "in", Value::Array(values))
    }

    pub fn field(&self) -> &str {
        &self.0
    }

    pub fn operator(&self) -> &str {
        &self.1
    }

    pub fn value(&self) -> &Value {
        &self.2
    }
}

/// A search filter: a list of groups, each a conjunction of conditions.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Domain(Vec<Vec<Condition>>);

impl Domain {
    /// Matches every record.
    pub fn empty() -> Self {
        Domain(Vec::new())
    }

    /// A single group requiring every condition.
    pub fn all_of(conditions: Vec<Condition>) -> Self {
        Domain(vec![conditions])
    }

    pub fn groups(&self) -> &[Vec<Condition>] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.iter().all(Vec::is_empty)
    }
}

// =============================================================================
// Response Envelope
// =============================================================================

/// Error body reported by the ERP.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemoteError {
    #[serde(default)]
    pub code: Option<i64>,
    pub message: String,
    #[serde(default)]
    pub data: Option<Value>,
}

impl RemoteError {
    pub fn new(message: impl Into<String>) -> Self {
        RemoteError {
            code: None,
            message: message.into(),
            data: None,
        }
    }
}

impl From<RemoteError> for ServiceError {
    fn from(err: RemoteError) -> Self {
        ServiceError::Remote {
            code: err.code,
            message: err.message,
        }
    }
}

/// `{ result, error }` envelope returned by every remote operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerResponse<T> {
    #[serde(default)]
    pub result: Option<T>,
    #[serde(default)]
    pub error: Option<RemoteError>,
}

impl<T> ServerResponse<T> {
    pub fn ok(result: T) -> Self {
        ServerResponse {
            result: Some(result),
            error: None,
        }
    }

    pub fn err(error: RemoteError) -> Self {
        ServerResponse {
            result: None,
            error: Some(error),
        }
    }

    /// Unwraps the envelope. A present error always takes precedence.
    pub fn into_result(self) -> ServiceResult<Option<T>> {
        match self.error {
            Some(error) => Err(error.into()),
            None => Ok(self.result),
        }
    }

    /// Like [`into_result`](Self::into_result) but a missing result is an error.
    pub fn into_required(self, what: &str) -> ServiceResult<T> {
        self.into_result()?
            .ok_or_else(|| ServiceError::UnexpectedResponse(format!("{} returned no result", what)))
    }
}

// =============================================================================
// Created-Id Extraction
// =============================================================================

/// Normalizes the result of a `create` call into the new record id.
///
/// The proxy returns either a bare id (`42`) or a one-element list (`[42]`)
/// depending on the backend version; both produce the same integer. Ids sent
/// as numeric strings are accepted too.
///
/// ```rust
/// use odx_service::protocol::extract_created_id;
/// use serde_json::json;
///
/// assert_eq!(extract_created_id(&json!(42)).unwrap(), 42);
/// assert_eq!(extract_created_id(&json!([42])).unwrap(), 42);
/// assert!(extract_created_id(&json!([1, 2])).is_err());
/// ```
pub fn extract_created_id(result: &Value) -> ServiceResult<i64> {
    let scalar = match result {
        Value::Array(items) => match items.as_slice() {
            [only] => only,
            _ => {
                return Err(ServiceError::UnexpectedResponse(format!(
                    "expected one created id, got {}",
                    result
                )))
            }
        },
        other => other,
    };

    let id = match scalar {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    };

    match id {
        Some(id) if id > 0 => Ok(id),
        _ => Err(ServiceError::UnexpectedResponse(format!(
            "not a record id: {}",
            result
        ))),
    }
}

/// Wraps values into a one-to-many "create" command: `[0, 0, {values}]`.
pub fn x2many_create(values: Map<String, Value>) -> Value {
    json!([0, 0, Value::Object(values)])
}
