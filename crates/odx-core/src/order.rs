//! # Order Assembly
//!
//! Builds the write-once order document submitted for a cart.
//!
//! ## Document Shape
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  OrderDraft (header)                                                    │
//! │  ├── session_id, name, state = paid                                     │
//! │  ├── amount_total = amount_paid = Σ line.price_subtotal                 │
//! │  ├── amount_tax = amount_return = 0                                     │
//! │  │                                                                      │
//! │  ├── lines[]     one per cart entry, qty = 1                            │
//! │  │               price_subtotal = price_subtotal_incl = price × qty     │
//! │  │                                                                      │
//! │  └── payments[]  exactly one, amount = amount_total                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! No tax is computed and there is no draft/validate stage: the document is
//! created directly in the `paid` state.

use serde::{Deserialize, Serialize};

use crate::cart::Cart;
use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::Money;
use crate::validation::{validate_record_id, validate_required};

/// Quantity of every line: one cart entry is one unit.
pub const LINE_QUANTITY: i64 = 1;

/// Lifecycle state an order is created in. Orders skip the draft stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderState {
    Paid,
}

impl OrderState {
    pub const fn as_remote(&self) -> &'static str {
        match self {
            OrderState::Paid => "paid",
        }
    }
}

/// One order line.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderLine {
    /// Line description (the product name).
    pub name: String,
    pub product_id: i64,
    pub price_unit: Money,
    pub qty: i64,
    pub price_subtotal: Money,
    /// Tax-inclusive subtotal; equal to `price_subtotal` since no tax applies.
    pub price_subtotal_incl: Money,
}

/// One payment entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaymentLine {
    pub amount: Money,
    pub payment_method_id: i64,
}

/// A complete order document ready for submission.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderDraft {
    pub session_id: i64,
    pub name: String,
    pub amount_tax: Money,
    pub amount_total: Money,
    pub amount_paid: Money,
    pub amount_return: Money,
    pub state: OrderState,
    pub lines: Vec<OrderLine>,
    pub payments: Vec<PaymentLine>,
}

impl OrderDraft {
    /// Assembles the order for `cart`, paid in full with `payment_method_id`.
    ///
    /// ## Errors
    /// - [`CoreError::EmptyCart`] when the cart has no entries
    /// - [`CoreError::Validation`] for a non-positive session or payment
    ///   method id, an empty order name, or a total outside the cent range
    ///
    /// ## Example
    /// ```rust
    /// use odx_core::{Cart, Money, OrderDraft, Product};
    ///
    /// let cart: Cart = [
    ///     Product { id: 1, price: Money::from_cents(1000), ..Product::default() },
    ///     Product { id: 2, price: Money::from_cents(550), ..Product::default() },
    /// ].into_iter().collect();
    ///
    /// let order = OrderDraft::from_cart(3, &cart, "POS Order", 1).unwrap();
    /// assert_eq!(order.lines.len(), 2);
    /// assert_eq!(order.amount_total, Money::from_cents(1550));
    /// assert_eq!(order.payments[0].amount, order.amount_total);
    /// ```
    pub fn from_cart(
        session_id: i64,
        cart: &Cart,
        name: &str,
        payment_method_id: i64,
    ) -> CoreResult<Self> {
        if cart.is_empty() {
            return Err(CoreError::EmptyCart);
        }
        validate_record_id("session_id", session_id)?;
        validate_record_id("payment_method_id", payment_method_id)?;
        validate_required("name", name)?;

        let lines = cart
            .items()
            .iter()
            .map(|product| -> CoreResult<OrderLine> {
                let subtotal = product
                    .price
                    .checked_multiply_quantity(LINE_QUANTITY)
                    .ok_or_else(|| out_of_range("price_subtotal"))?;
                Ok(OrderLine {
                    name: product.name.clone(),
                    product_id: product.id,
                    price_unit: product.price,
                    qty: LINE_QUANTITY,
                    price_subtotal: subtotal,
                    price_subtotal_incl: subtotal,
                })
            })
            .collect::<CoreResult<Vec<OrderLine>>>()?;

        let total = Money::checked_sum(lines.iter().map(|line| line.price_subtotal))
            .ok_or_else(|| out_of_range("amount_total"))?;

        Ok(OrderDraft {
            session_id,
            name: name.to_string(),
            amount_tax: Money::zero(),
            amount_total: total,
            amount_paid: total,
            amount_return: Money::zero(),
            state: OrderState::Paid,
            lines,
            payments: vec![PaymentLine {
                amount: total,
                payment_method_id,
            }],
        })
    }
}

fn out_of_range(field: &str) -> CoreError {
    ValidationError::OutOfRange {
        field: field.to_string(),
    }
    .into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{Record, RecordMapper};
    use crate::types::Product;
    use serde_json::json;

    fn product(id: i64, cents: i64) -> Product {
        Product {
            id,
            name: format!("Item {}", id),
            price: Money::from_cents(cents),
            ..Product::default()
        }
    }

    #[test]
    fn test_two_item_cart() {
        let cart: Cart = [product(1, 1000), product(2, 550)].into_iter().collect();
        let order = OrderDraft::from_cart(9, &cart, "POS Order", 1).unwrap();

        assert_eq!(order.session_id, 9);
        assert_eq!(order.lines.len(), 2);
        assert_eq!(order.amount_total.cents(), 1550);
        assert_eq!(order.amount_paid, order.amount_total);
        assert_eq!(order.amount_tax, Money::zero());
        assert_eq!(order.amount_return, Money::zero());
        assert_eq!(order.state, OrderState::Paid);
        assert_eq!(order.payments.len(), 1);
        assert_eq!(order.payments[0].amount.cents(), 1550);
        assert_eq!(order.payments[0].payment_method_id, 1);
    }

    #[test]
    fn test_duplicates_become_separate_lines() {
        let cart: Cart = [product(4, 250), product(4, 250), product(4, 250)]
            .into_iter()
            .collect();
        let order = OrderDraft::from_cart(1, &cart, "POS Order", 1).unwrap();

        assert_eq!(order.lines.len(), 3);
        assert!(order.lines.iter().all(|l| l.product_id == 4 && l.qty == 1));
        assert_eq!(order.amount_total.cents(), 750);
    }

    #[test]
    fn test_line_invariants_hold() {
        let cart: Cart = [product(1, 1), product(2, 99_999), product(3, 0)]
            .into_iter()
            .collect();
        let order = OrderDraft::from_cart(1, &cart, "POS Order", 1).unwrap();

        for line in &order.lines {
            assert_eq!(
                Some(line.price_subtotal),
                line.price_unit.checked_multiply_quantity(line.qty)
            );
            assert_eq!(line.price_subtotal_incl, line.price_subtotal);
        }
        let sum = Money::checked_sum(order.lines.iter().map(|l| l.price_subtotal)).unwrap();
        assert_eq!(order.amount_total, sum);
        assert_eq!(order.payments[0].amount, sum);
    }

    #[test]
    fn test_total_has_no_drift_over_many_lines() {
        // 0.10 added 1000 times is exactly 100.00 in cents.
        let cart: Cart = (1..=1000).map(|id| product(id, 10)).collect();
        let order = OrderDraft::from_cart(1, &cart, "POS Order", 1).unwrap();
        assert_eq!(order.amount_total.cents(), 10_000);
        assert_eq!(order.amount_total.as_decimal(), 100.0);
    }

    #[test]
    fn test_empty_cart_rejected() {
        let err = OrderDraft::from_cart(1, &Cart::new(), "POS Order", 1).unwrap_err();
        assert_eq!(err, CoreError::EmptyCart);
    }

    #[test]
    fn test_invalid_session_rejected() {
        let cart: Cart = [product(1, 100)].into_iter().collect();
        let err = OrderDraft::from_cart(0, &cart, "POS Order", 1).unwrap_err();
        assert_eq!(
            err,
            CoreError::Validation(ValidationError::MustBePositive {
                field: "session_id".into()
            })
        );
    }

    #[test]
    fn test_oversized_remote_price_degrades_to_zero() {
        let record = Record::try_from(json!({"id": 1, "name": "Huge", "list_price": 1e17})).unwrap();
        let product = RecordMapper.map_product(&record);
        assert_eq!(product.price, Money::zero());

        let cart: Cart = [product.clone(), product].into_iter().collect();
        let order = OrderDraft::from_cart(1, &cart, "POS Order", 1).unwrap();
        assert_eq!(order.amount_total, Money::zero());
    }

    #[test]
    fn test_total_overflow_rejected() {
        let price = i64::MAX / 2 + 1;
        let cart: Cart = [product(1, price), product(2, price)].into_iter().collect();

        let err = OrderDraft::from_cart(1, &cart, "POS Order", 1).unwrap_err();
        assert_eq!(
            err,
            CoreError::Validation(ValidationError::OutOfRange {
                field: "amount_total".into()
            })
        );
    }
}
