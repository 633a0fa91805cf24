//! # odx-core: Pure Domain Logic for the ODX POS Front-End
//!
//! This crate holds everything about the ERP-facing domain that can be
//! expressed without I/O: strict entities, record mapping, money, the cart
//! and order assembly.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     ODX POS Architecture                                │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │              Presentation (external GUI)                        │   │
//! │  │    Partner list ── Product list ── Cart ── Open/Close store     │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │              odx-service (ServiceFacade)                        │   │
//! │  │    SessionManager, OrderSubmitter, RecordClient trait           │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ odx-core (THIS CRATE) ★                         │   │
//! │  │                                                                 │   │
//! │  │   ┌──────────┐ ┌──────────┐ ┌──────────┐ ┌──────────┐          │   │
//! │  │   │  types   │ │  record  │ │   cart   │ │  order   │          │   │
//! │  │   │ Partner  │ │ FieldVal │ │   Cart   │ │OrderDraft│          │   │
//! │  │   │ Product  │ │  Mapper  │ │          │ │          │          │   │
//! │  │   └──────────┘ └──────────┘ └──────────┘ └──────────┘          │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO NETWORK • PURE FUNCTIONS                         │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Partner, Product, SessionState
//! - [`record`] - Untyped record model and [`RecordMapper`]
//! - [`money`] - Integer-cent money
//! - [`cart`] - The checkout cart
//! - [`order`] - Order document assembly
//! - [`error`] - Domain error types
//! - [`validation`] - Precondition checks

// =============================================================================
// Module Declarations
// =============================================================================

pub mod cart;
pub mod error;
pub mod money;
pub mod order;
pub mod record;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use cart::Cart;
pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use order::{OrderDraft, OrderLine, OrderState, PaymentLine};
pub use record::{FieldValue, Record, RecordMapper};
pub use types::*;
