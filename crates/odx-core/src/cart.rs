//! # Cart
//!
//! The checkout cart held by the presentation layer between product fetch
//! and order submission.
//!
//! ## Cart Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Frontend Action          Cart Method            Cart State Change      │
//! │  ───────────────          ───────────            ─────────────────      │
//! │                                                                         │
//! │  Double-click Product ───► add() ───────────────► items.push(product)   │
//! │                                                                         │
//! │  Remove Line ────────────► remove_at(i) ────────► items.remove(i)       │
//! │                                                                         │
//! │  Order Submitted ────────► clear() ─────────────► items.clear()         │
//! │                                                                         │
//! │  Total Label ────────────► total() ─────────────► (read only)           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Invariants
//! - Every entry is exactly one unit; adding the same product twice yields
//!   two entries, never a quantity of two.
//! - Entry order is preserved and becomes the order line order.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;
use crate::types::Product;

/// An ordered list of product snapshots, one unit each.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Cart {
    items: Vec<Product>,

    /// When the cart was created/last cleared.
    #[ts(as = "String")]
    created_at: DateTime<Utc>,
}

impl Cart {
    /// Creates a new empty cart.
    pub fn new() -> Self {
        Cart {
            items: Vec::new(),
            created_at: Utc::now(),
        }
    }

    /// Appends one unit of `product`.
    ///
    /// The product is a snapshot: later price changes on the ERP side do not
    /// affect an entry already in the cart.
    pub fn add(&mut self, product: Product) {
        self.items.push(product);
    }

    /// Removes the entry at `index`, returning it.
    pub fn remove_at(&mut self, index: usize) -> Option<Product> {
        if index < self.items.len() {
            Some(self.items.remove(index))
        } else {
            None
        }
    }

    /// Clears all entries.
    pub fn clear(&mut self) {
        self.items.clear();
        self.created_at = Utc::now();
    }

    pub fn items(&self) -> &[Product] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Sum of all entry prices; `None` if it overflows the cent range.
    pub fn total(&self) -> Option<Money> {
        Money::checked_sum(self.items.iter().map(|p| p.price))
    }
}

impl Default for Cart {
    fn default() -> Self {
        Self::new()
    }
}

impl FromIterator<Product> for Cart {
    fn from_iter<I: IntoIterator<Item = Product>>(iter: I) -> Self {
        Cart {
            items: iter.into_iter().collect(),
            created_at: Utc::now(),
        }
    }
}
