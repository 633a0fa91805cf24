//! # Record Mapping
//!
//! Turns loosely-typed ERP records into strict domain entities.
//!
//! ## The Problem
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  One field, many shapes                                                 │
//! │                                                                         │
//! │  "email":      "a@b.co"          → Scalar("a@b.co")                     │
//! │  "email":      false             → Missing   (ERP's "no value")         │
//! │  "list_price": 10.5              → Scalar("10.5")                       │
//! │  "country_id": [100, "Indonesia"]→ Pair(100, "Indonesia")               │
//! │  "country_id": false             → Missing                              │
//! │  (field absent)                  → Missing                              │
//! │                                                                         │
//! │  Each shape is classified ONCE into FieldValue, then read through a     │
//! │  total extractor: text() / integer() / decimal() / money() / label()    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Safe-Get Policy
//! Mapping never fails. A missing or mis-shaped field becomes the type's
//! default: `""`, `0`, `0.0`, `false`.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::money::Money;
use crate::types::{Partner, Product};

/// Fields requested when listing partners.
pub const PARTNER_FIELDS: &[&str] = &[
    "id",
    "name",
    "email",
    "street",
    "street2",
    "city",
    "country_id",
    "phone",
    "customer_rank",
    "supplier_rank",
    "vat",
];

/// Fields requested when listing products.
pub const PRODUCT_FIELDS: &[&str] = &["id", "name", "list_price", "default_code", "qty_available"];

// =============================================================================
// Field Value
// =============================================================================

/// One field of a remote record, classified by shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    /// Absent, `null`, `false`, or a shape we do not read.
    Missing,
    /// A primitive rendered as text (strings verbatim, numbers in JSON form).
    Scalar(String),
    /// A relational reference `[id, label]`.
    Pair(i64, String),
}

impl FieldValue {
    /// Classifies a raw JSON value.
    pub fn from_json(value: Option<&Value>) -> Self {
        match value {
            None | Some(Value::Null) | Some(Value::Bool(false)) => FieldValue::Missing,
            Some(Value::Bool(true)) => FieldValue::Scalar("true".to_string()),
            Some(Value::String(s)) => FieldValue::Scalar(s.clone()),
            Some(Value::Number(n)) => FieldValue::Scalar(n.to_string()),
            Some(Value::Array(items)) => match items.as_slice() {
                [Value::Number(id), Value::String(label)] => match id.as_i64() {
                    Some(id) => FieldValue::Pair(id, label.clone()),
                    None => FieldValue::Missing,
                },
                _ => FieldValue::Missing,
            },
            Some(Value::Object(_)) => FieldValue::Missing,
        }
    }

    /// Scalar text, or `""`.
    pub fn text(&self) -> String {
        match self {
            FieldValue::Scalar(s) => s.clone(),
            _ => String::new(),
        }
    }

    /// Lenient integer: integer text, or a decimal truncated toward zero, or `0`.
    pub fn integer(&self) -> i64 {
        match self {
            FieldValue::Scalar(s) => {
                let s = s.trim();
                s.parse::<i64>().unwrap_or_else(|_| match s.parse::<f64>() {
                    Ok(v) if v.is_finite() => v.trunc() as i64,
                    _ => 0,
                })
            }
            _ => 0,
        }
    }

    /// Lenient decimal: unparsable text yields `0.0`.
    pub fn decimal(&self) -> f64 {
        match self {
            FieldValue::Scalar(s) => match s.trim().parse::<f64>() {
                Ok(v) if v.is_finite() => v,
                _ => 0.0,
            },
            _ => 0.0,
        }
    }

    /// Lenient money: unparsable text yields zero.
    pub fn money(&self) -> Money {
        match self {
            FieldValue::Scalar(s) => Money::parse_lenient(s),
            _ => Money::zero(),
        }
    }

    /// Label of a reference pair, or `""`.
    pub fn label(&self) -> String {
        match self {
            FieldValue::Pair(_, label) => label.clone(),
            _ => String::new(),
        }
    }
}

// =============================================================================
// Record
// =============================================================================

/// An untyped record as returned by `search_read`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record(Map<String, Value>);

impl Record {
    pub fn new(fields: Map<String, Value>) -> Self {
        Record(fields)
    }

    /// Classified view of one field.
    pub fn field(&self, name: &str) -> FieldValue {
        FieldValue::from_json(self.0.get(name))
    }

    /// Record id, `0` when absent or malformed.
    pub fn id(&self) -> i64 {
        self.field("id").integer()
    }
}

impl From<Map<String, Value>> for Record {
    fn from(fields: Map<String, Value>) -> Self {
        Record(fields)
    }
}

impl TryFrom<Value> for Record {
    type Error = Value;

    /// Only JSON objects are records; the rejected value is handed back.
    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Object(fields) => Ok(Record(fields)),
            other => Err(other),
        }
    }
}

// =============================================================================
// Record Mapper
// =============================================================================

/// Maps untyped records into [`Partner`] and [`Product`].
///
/// Stateless; exposed as a unit struct so the service layer can hold it
/// alongside its other components.
#[derive(Debug, Clone, Copy, Default)]
pub struct RecordMapper;

impl RecordMapper {
    /// Maps a `res.partner` record.
    ///
    /// ## Example
    /// ```rust
    /// use odx_core::record::{Record, RecordMapper};
    /// use serde_json::json;
    ///
    /// let record = Record::try_from(json!({
    ///     "id": 7,
    ///     "name": "Azure Interior",
    ///     "country_id": [100, "Indonesia"],
    ///     "customer_rank": 1,
    /// })).unwrap();
    ///
    /// let partner = RecordMapper.map_partner(&record);
    /// assert_eq!(partner.country, "Indonesia");
    /// assert!(partner.is_customer);
    /// assert!(!partner.is_supplier);
    /// assert_eq!(partner.email, "");
    /// ```
    pub fn map_partner(&self, record: &Record) -> Partner {
        Partner {
            id: record.id(),
            name: record.field("name").text(),
            email: record.field("email").text(),
            phone: record.field("phone").text(),
            vat: record.field("vat").text(),
            street: record.field("street").text(),
            street2: record.field("street2").text(),
            city: record.field("city").text(),
            country: record.field("country_id").label(),
            is_customer: record.field("customer_rank").integer() > 0,
            is_supplier: record.field("supplier_rank").integer() > 0,
        }
    }

    /// Maps a `product.product` record.
    ///
    /// Negative prices are clamped to zero.
    pub fn map_product(&self, record: &Record) -> Product {
        let price = record.field("list_price").money();

        Product {
            id: record.id(),
            name: record.field("name").text(),
            price: if price.is_negative() { Money::zero() } else { price },
            default_code: record.field("default_code").text(),
            qty_available: record.field("qty_available").decimal(),
        }
    }

    pub fn map_partners(&self, records: &[Record]) -> Vec<Partner> {
        records.iter().map(|r| self.map_partner(r)).collect()
    }

    pub fn map_products(&self, records: &[Record]) -> Vec<Product> {
        records.iter().map(|r| self.map_product(r)).collect()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(value: Value) -> Record {
        Record::try_from(value).unwrap()
    }

    #[test]
    fn test_field_value_classification() {
        assert_eq!(FieldValue::from_json(None), FieldValue::Missing);
        assert_eq!(FieldValue::from_json(Some(&json!(null))), FieldValue::Missing);
        assert_eq!(FieldValue::from_json(Some(&json!(false))), FieldValue::Missing);
        assert_eq!(
            FieldValue::from_json(Some(&json!(true))),
            FieldValue::Scalar("true".into())
        );
        assert_eq!(
            FieldValue::from_json(Some(&json!(12))),
            FieldValue::Scalar("12".into())
        );
        assert_eq!(
            FieldValue::from_json(Some(&json!([5, "Belgium"]))),
            FieldValue::Pair(5, "Belgium".into())
        );
        assert_eq!(
            FieldValue::from_json(Some(&json!([5, "Belgium", 3]))),
            FieldValue::Missing
        );
        assert_eq!(
            FieldValue::from_json(Some(&json!({"id": 5}))),
            FieldValue::Missing
        );
    }

    #[test]
    fn test_lenient_numbers() {
        assert_eq!(FieldValue::Scalar("42".into()).integer(), 42);
        assert_eq!(FieldValue::Scalar("3.9".into()).integer(), 3);
        assert_eq!(FieldValue::Scalar("abc".into()).integer(), 0);
        assert_eq!(FieldValue::Scalar("2.5".into()).decimal(), 2.5);
        assert_eq!(FieldValue::Scalar("lots".into()).decimal(), 0.0);
        assert_eq!(FieldValue::Pair(1, "x".into()).decimal(), 0.0);
        assert_eq!(FieldValue::Missing.integer(), 0);
    }

    #[test]
    fn test_label_only_from_pairs() {
        assert_eq!(FieldValue::Pair(1, "Indonesia".into()).label(), "Indonesia");
        assert_eq!(FieldValue::Scalar("Indonesia".into()).label(), "");
        assert_eq!(FieldValue::Missing.label(), "");
    }

    #[test]
    fn test_map_partner_full_record() {
        let partner = RecordMapper.map_partner(&record(json!({
            "id": 14,
            "name": "Deco Addict",
            "email": "deco.addict82@example.com",
            "street": "77 Santa Barbara Rd",
            "street2": false,
            "city": "Pleasant Hill",
            "country_id": [233, "United States"],
            "phone": "(603)-996-3829",
            "customer_rank": 3,
            "supplier_rank": 0,
            "vat": "US12345677",
        })));

        assert_eq!(partner.id, 14);
        assert_eq!(partner.name, "Deco Addict");
        assert_eq!(partner.street2, "");
        assert_eq!(partner.country, "United States");
        assert_eq!(partner.vat, "US12345677");
        assert!(partner.is_customer);
        assert!(!partner.is_supplier);
    }

    #[test]
    fn test_map_partner_empty_record_uses_defaults() {
        let partner = RecordMapper.map_partner(&Record::default());
        assert_eq!(partner, Partner::default());
    }

    #[test]
    fn test_map_partner_tolerates_wrong_shapes() {
        let partner = RecordMapper.map_partner(&record(json!({
            "id": "9",
            "name": ["not", "text"],
            "country_id": "Indonesia",
            "customer_rank": "many",
            "supplier_rank": 2.0,
        })));

        assert_eq!(partner.id, 9);
        assert_eq!(partner.name, "");
        assert_eq!(partner.country, "");
        assert!(!partner.is_customer);
        assert!(partner.is_supplier);
    }

    #[test]
    fn test_rank_flags_are_strictly_positive() {
        for (rank, expected) in [(-3, false), (-1, false), (0, false), (1, true), (40, true)] {
            let partner = RecordMapper.map_partner(&record(json!({
                "customer_rank": rank,
                "supplier_rank": rank,
            })));
            assert_eq!(partner.is_customer, expected, "customer_rank {}", rank);
            assert_eq!(partner.is_supplier, expected, "supplier_rank {}", rank);
        }
    }

    #[test]
    fn test_map_product() {
        let product = RecordMapper.map_product(&record(json!({
            "id": 31,
            "name": "Office Chair",
            "list_price": 70.5,
            "default_code": "FURN_7777",
            "qty_available": 12.5,
        })));

        assert_eq!(product.id, 31);
        assert_eq!(product.price, Money::from_cents(7050));
        assert_eq!(product.default_code, "FURN_7777");
        assert_eq!(product.qty_available, 12.5);
    }

    #[test]
    fn test_map_product_lenient_and_defaults() {
        let product = RecordMapper.map_product(&record(json!({
            "list_price": "not a price",
            "qty_available": "?",
            "default_code": false,
        })));

        assert_eq!(product.id, 0);
        assert_eq!(product.name, "");
        assert_eq!(product.price, Money::zero());
        assert_eq!(product.default_code, "");
        assert_eq!(product.qty_available, 0.0);
    }

    #[test]
    fn test_map_product_clamps_negative_price() {
        let product = RecordMapper.map_product(&record(json!({ "list_price": -4 })));
        assert_eq!(product.price, Money::zero());
    }

    #[test]
    fn test_record_try_from_rejects_non_objects() {
        assert!(Record::try_from(json!([1, 2])).is_err());
        assert!(Record::try_from(json!("x")).is_err());
    }
}
