//! # odx-service: Orchestration Layer for the ODX POS Front-End
//!
//! Session lifecycle, order submission and the facade the presentation
//! layer calls. All ERP access goes through the [`RecordClient`] trait; the
//! RPC transport itself lives outside this crate.
//!
//! ## Architecture Overview
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Service Architecture                             │
//! │                                                                         │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │                 ServiceFacade (composition root)                 │  │
//! │  │                                                                  │  │
//! │  │  list_partners  list_products  open_store  close_store          │  │
//! │  │  get_open_session_id  session_status  submit_order              │  │
//! │  └────────────────────────────┬─────────────────────────────────────┘  │
//! │                               │                                         │
//! │         ┌─────────────────────┼─────────────────────┐                  │
//! │         ▼                     ▼                     ▼                   │
//! │  ┌────────────────┐  ┌────────────────┐  ┌────────────────────────┐    │
//! │  │ SessionManager │  │ OrderSubmitter │  │  RecordMapper (core)   │    │
//! │  │                │  │                │  │                        │    │
//! │  │ config lookup  │  │ cart → order   │  │ records → Partner /    │    │
//! │  │ open / close   │  │ single create  │  │ Product                │    │
//! │  └───────┬────────┘  └───────┬────────┘  └────────────────────────┘    │
//! │          └─────────┬─────────┘                                          │
//! │                    ▼                                                    │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │  RecordClient: search_read / create / write / call_method        │  │
//! │  └──────────────────────────────────────────────────────────────────┘  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust,ignore
//! use odx_service::{ConnectionConfig, ServiceFacade};
//!
//! odx_service::telemetry::init_tracing();
//! let config = ConnectionConfig::load(None)?;
//! let facade = ServiceFacade::<ProxyClient>::connect(config)?;
//!
//! let session_id = facade.open_store().await?;
//! let products = facade.list_products().await?;
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod facade;
pub mod order;
pub mod protocol;
pub mod session;
pub mod telemetry;

#[cfg(test)]
pub(crate) mod testing;

// =============================================================================
// Re-exports
// =============================================================================

pub use client::{Connect, RecordClient};
pub use config::{ConnectionConfig, ConnectionSettings, PosSettings, QuerySettings};
pub use error::{ServiceError, ServiceResult};
pub use facade::{Page, ServiceFacade};
pub use order::{encode_order, OrderSubmitter};
pub use protocol::{
    extract_created_id, Condition, Domain, KeywordRequest, RemoteError, RequestContext,
    ServerResponse,
};
pub use session::SessionManager;
