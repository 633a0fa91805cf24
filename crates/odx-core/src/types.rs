//! # Domain Types
//!
//! Strict domain entities produced from loosely-typed ERP records.
//!
//! ## Type Overview
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Partner      │   │    Product      │   │  SessionState   │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (remote)    │   │  id (remote)    │   │  Closed         │       │
//! │  │  name, email    │   │  name           │   │  OpeningControl │       │
//! │  │  address        │   │  price (Money)  │   │  Opened         │       │
//! │  │  is_customer    │   │  default_code   │   │  ClosingControl │       │
//! │  │  is_supplier    │   │  qty_available  │   └─────────────────┘       │
//! │  └─────────────────┘   └─────────────────┘                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Identity
//! Every entity id is assigned by the ERP. Ids are positive once present;
//! `0` only appears when a record arrived without an id at all.

use serde::{Deserialize, Serialize};
use std::fmt;
use ts_rs::TS;

use crate::money::Money;

// =============================================================================
// Partner
// =============================================================================

/// A business partner (customer, supplier, or both).
///
/// Immutable once mapped. Re-created on every fetch; there is no local cache.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Partner {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub phone: String,
    /// Tax identification number.
    pub vat: String,
    pub street: String,
    pub street2: String,
    pub city: String,
    /// Display label of the country reference.
    pub country: String,
    /// `customer_rank > 0` on the remote side.
    pub is_customer: bool,
    /// `supplier_rank > 0` on the remote side.
    pub is_supplier: bool,
}

impl Partner {
    /// Single-line address for list renderers, skipping empty parts.
    pub fn address_line(&self) -> String {
        [
            self.street.as_str(),
            self.street2.as_str(),
            self.city.as_str(),
            self.country.as_str(),
        ]
        .iter()
        .filter(|part| !part.is_empty())
        .copied()
        .collect::<Vec<_>>()
        .join(", ")
    }
}

impl fmt::Display for Partner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

// =============================================================================
// Product
// =============================================================================

/// A sellable product variant, snapshotted at fetch time.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: i64,
    pub name: String,
    /// Unit sale price. Never negative.
    pub price: Money,
    /// Internal reference (SKU-like code).
    pub default_code: String,
    /// On-hand quantity, display only. May be fractional.
    pub qty_available: f64,
}

impl fmt::Display for Product {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (Ref: {}) - {}", self.name, self.default_code, self.price)
    }
}

// =============================================================================
// Session State
// =============================================================================

/// Lifecycle state of a till session.
///
/// ## State Machine
/// ```text
/// ┌────────┐  open_store()   ┌────────────────┐  action_pos_session_open  ┌────────┐
/// │ Closed │ ──────────────► │ OpeningControl │ ────────────────────────► │ Opened │
/// └────────┘   (create)      └────────────────┘                           └───┬────┘
///      ▲                                                                      │
///      │                         close_store()                                │
///      │                ┌────────────────┐ ◄──────────────────────────────────┘
///      └─────────────── │ ClosingControl │   (write state + closing action)
///     (no longer found) └────────────────┘
/// ```
///
/// `Closed` means "no matching session record was found"; the other states
/// mirror the remote `state` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    #[default]
    Closed,
    OpeningControl,
    Opened,
    ClosingControl,
}

impl SessionState {
    /// States in which a session counts as "open" for discovery.
    pub const DISCOVERABLE: [SessionState; 2] =
        [SessionState::Opened, SessionState::OpeningControl];

    /// Parses the remote `state` selection value.
    ///
    /// Unknown values return `None`; `"closed"` maps to [`SessionState::Closed`].
    pub fn from_remote(value: &str) -> Option<Self> {
        match value {
            "opening_control" => Some(SessionState::OpeningControl),
            "opened" => Some(SessionState::Opened),
            "closing_control" => Some(SessionState::ClosingControl),
            "closed" => Some(SessionState::Closed),
            _ => None,
        }
    }

    /// Returns the remote `state` selection value.
    pub const fn as_remote(&self) -> &'static str {
        match self {
            SessionState::Closed => "closed",
            SessionState::OpeningControl => "opening_control",
            SessionState::Opened => "opened",
            SessionState::ClosingControl => "closing_control",
        }
    }

    /// True when orders can be recorded against the session.
    pub const fn is_operational(&self) -> bool {
        matches!(self, SessionState::Opened)
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_remote())
    }
}

/// A session id together with the state it was observed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct SessionStatus {
    /// `None` when the state is [`SessionState::Closed`].
    pub session_id: Option<i64>,
    pub state: SessionState,
}

impl SessionStatus {
    pub const fn closed() -> Self {
        SessionStatus {
            session_id: None,
            state: SessionState::Closed,
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
