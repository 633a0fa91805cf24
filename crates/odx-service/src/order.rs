//! # Order Submission
//!
//! Turns a cart into a paid `pos.order` with one create call.
//!
//! ## Wire Shape
//! ```json
//! {
//!   "session_id": 7, "name": "POS Order", "state": "paid",
//!   "amount_tax": 0.0, "amount_total": 15.5, "amount_paid": 15.5, "amount_return": 0.0,
//!   "lines": [[0, 0, {"name": "...", "product_id": 1, "price_unit": 10.0, "qty": 1.0,
//!                     "price_subtotal": 10.0, "price_subtotal_incl": 10.0}], ...],
//!   "payment_ids": [[0, 0, {"amount": 15.5, "payment_method_id": 1}]]
//! }
//! ```
//!
//! Amounts are computed in cents and converted once, so the payment amount
//! is always bit-identical to `amount_total`.

use std::sync::Arc;

use odx_core::{Cart, OrderDraft, OrderLine, PaymentLine};
use serde_json::{json, Map, Value};
use tracing::{debug, info};

use crate::client::RecordClient;
use crate::error::ServiceResult;
use crate::protocol::{extract_created_id, x2many_create, KeywordRequest, RequestContext, MODEL_POS_ORDER};

/// Encodes an order draft into create values.
pub fn encode_order(draft: &OrderDraft) -> Map<String, Value> {
    let mut values = Map::new();
    values.insert("session_id".into(), json!(draft.session_id));
    values.insert("name".into(), json!(draft.name));
    values.insert("amount_tax".into(), json!(draft.amount_tax.as_decimal()));
    values.insert("amount_total".into(), json!(draft.amount_total.as_decimal()));
    values.insert("amount_paid".into(), json!(draft.amount_paid.as_decimal()));
    values.insert("amount_return".into(), json!(draft.amount_return.as_decimal()));
    values.insert("state".into(), json!(draft.state.as_remote()));
    values.insert(
        "lines".into(),
        Value::Array(draft.lines.iter().map(encode_line).collect()),
    );
    values.insert(
        "payment_ids".into(),
        Value::Array(draft.payments.iter().map(encode_payment).collect()),
    );
    values
}

fn encode_line(line: &OrderLine) -> Value {
    let mut values = Map::new();
    values.insert("name".into(), json!(line.name));
    values.insert("product_id".into(), json!(line.product_id));
    values.insert("price_unit".into(), json!(line.price_unit.as_decimal()));
    values.insert("qty".into(), json!(line.qty as f64));
    values.insert("price_subtotal".into(), json!(line.price_subtotal.as_decimal()));
    values.insert(
        "price_subtotal_incl".into(),
        json!(line.price_subtotal_incl.as_decimal()),
    );
    x2many_create(values)
}

fn encode_payment(payment: &PaymentLine) -> Value {
    let mut values = Map::new();
    values.insert("amount".into(), json!(payment.amount.as_decimal()));
    values.insert("payment_method_id".into(), json!(payment.payment_method_id));
    x2many_create(values)
}

/// Submits carts as paid orders.
pub struct OrderSubmitter<C> {
    client: Arc<C>,
    order_name: String,
    payment_method_id: i64,
}

impl<C: RecordClient> OrderSubmitter<C> {
    pub fn new(client: Arc<C>, order_name: impl Into<String>, payment_method_id: i64) -> Self {
        OrderSubmitter {
            client,
            order_name: order_name.into(),
            payment_method_id,
        }
    }

    /// Creates the order and returns its id.
    ///
    /// An empty cart is rejected before anything is sent.
    pub async fn submit_order(
        &self,
        session_id: i64,
        cart: &Cart,
        ctx: &RequestContext,
    ) -> ServiceResult<i64> {
        let draft = OrderDraft::from_cart(session_id, cart, &self.order_name, self.payment_method_id)?;
        debug!(
            session_id,
            lines = draft.lines.len(),
            total = %draft.amount_total,
            "Submitting order"
        );

        let keywords = KeywordRequest::new(ctx.clone());
        let result = self
            .client
            .create(MODEL_POS_ORDER, vec![encode_order(&draft)], &keywords)
            .await?
            .into_required("pos.order create")?;
        let order_id = extract_created_id(&result)?;

        info!(order_id, session_id, total = %draft.amount_total, "Order submitted");
        Ok(order_id)
    }
}
