//! # Money Module
//!
//! Provides the `Money` type for monetary values exchanged with the ERP.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  The ERP sends prices as JSON numbers (floats):                         │
//! │    10.00 + 5.50 + 0.10 + 0.20 accumulates binary error                  │
//! │                                                                         │
//! │  OUR SOLUTION: Integer Cents                                            │
//! │    Parse once into cents, add in cents, emit once as a decimal          │
//! │    amount_total and the payment amount come from the SAME cents value   │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use odx_core::money::Money;
//!
//! let price = Money::parse_lenient("10.00");
//! let total = Money::checked_sum([price, Money::from_cents(550)]).unwrap();
//! assert_eq!(total.cents(), 1550);
//! assert_eq!(total.as_decimal(), 15.5);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use ts_rs::TS;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in the smallest currency unit (cents).
///
/// ## Where Money is Used
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  product.list_price ──► Product.price ──► OrderLine.price_unit          │
/// │                                                │                        │
/// │                                                ▼                        │
/// │                       OrderLine.price_subtotal (× qty)                  │
/// │                                                │                        │
/// │                                                ▼ Σ                      │
/// │                 OrderDraft.amount_total ══ PaymentLine.amount           │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from cents.
    ///
    /// ```rust
    /// use odx_core::money::Money;
    ///
    /// let price = Money::from_cents(1099);
    /// assert_eq!(price.cents(), 1099);
    /// ```
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Returns the value in cents.
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the major unit portion.
    #[inline]
    pub const fn major(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the minor unit portion (always 0-99).
    #[inline]
    pub const fn minor(&self) -> i64 {
        (self.0 % 100).abs()
    }

    /// Zero.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Multiplies money by a quantity; `None` on overflow.
    ///
    /// ```rust
    /// use odx_core::money::Money;
    ///
    /// let unit_price = Money::from_cents(299);
    /// assert_eq!(unit_price.checked_multiply_quantity(3), Some(Money::from_cents(897)));
    /// assert_eq!(Money::from_cents(i64::MAX).checked_multiply_quantity(2), None);
    /// ```
    #[inline]
    pub const fn checked_multiply_quantity(&self, qty: i64) -> Option<Self> {
        match self.0.checked_mul(qty) {
            Some(cents) => Some(Money(cents)),
            None => None,
        }
    }

    #[inline]
    pub const fn checked_add(&self, other: Money) -> Option<Self> {
        match self.0.checked_add(other.0) {
            Some(cents) => Some(Money(cents)),
            None => None,
        }
    }

    /// Sums amounts; `None` if the total leaves the `i64` cent range.
    pub fn checked_sum<I: IntoIterator<Item = Money>>(amounts: I) -> Option<Money> {
        amounts
            .into_iter()
            .try_fold(Money::zero(), |total, amount| total.checked_add(amount))
    }

    /// Parses decimal text exactly, rounding half away from zero at the cent.
    ///
    /// Accepts an optional sign, an integer part and an optional fraction
    /// (`"10"`, `"-5.5"`, `".25"`, `"12.345"`). Returns `None` for anything
    /// else, including exponent notation.
    ///
    /// ```rust
    /// use odx_core::money::Money;
    ///
    /// assert_eq!(Money::parse_decimal("12.345"), Some(Money::from_cents(1235)));
    /// assert_eq!(Money::parse_decimal("abc"), None);
    /// ```
    pub fn parse_decimal(text: &str) -> Option<Money> {
        let text = text.trim();
        let (negative, unsigned) = match text.as_bytes().first()? {
            b'-' => (true, &text[1..]),
            b'+' => (false, &text[1..]),
            _ => (false, text),
        };

        let (int_part, frac_part) = match unsigned.split_once('.') {
            Some((i, f)) => (i, f),
            None => (unsigned, ""),
        };

        if int_part.is_empty() && frac_part.is_empty() {
            return None;
        }
        if !int_part.bytes().all(|b| b.is_ascii_digit())
            || !frac_part.bytes().all(|b| b.is_ascii_digit())
        {
            return None;
        }

        let major: i64 = if int_part.is_empty() {
            0
        } else {
            int_part.parse().ok()?
        };

        let mut digits = frac_part.bytes().map(|b| i64::from(b - b'0'));
        let tenths = digits.next().unwrap_or(0);
        let hundredths = digits.next().unwrap_or(0);
        let round_up = digits.next().is_some_and(|d| d >= 5);

        let mut cents = major
            .checked_mul(100)?
            .checked_add(tenths * 10 + hundredths)?;
        if round_up {
            cents = cents.checked_add(1)?;
        }

        Some(Money(if negative { -cents } else { cents }))
    }

    /// Parses anything that looks like a number; never fails.
    ///
    /// Exact decimal parsing is tried first; exponent forms fall back to a
    /// float parse rounded to the nearest cent. Unparsable text and values
    /// outside the `i64` cent range are zero.
    ///
    /// ```rust
    /// use odx_core::money::Money;
    ///
    /// assert_eq!(Money::parse_lenient("1e2").cents(), 10000);
    /// assert_eq!(Money::parse_lenient("n/a"), Money::zero());
    /// assert_eq!(Money::parse_lenient("1e17"), Money::zero());
    /// ```
    pub fn parse_lenient(text: &str) -> Money {
        if let Some(money) = Money::parse_decimal(text) {
            return money;
        }

        // i64::MAX as f64 rounds up to 2^63, so the bound is exclusive.
        let limit = i64::MAX as f64;
        match text.trim().parse::<f64>() {
            Ok(value) if value.is_finite() => {
                let cents = (value * 100.0).round();
                if cents > -limit && cents < limit {
                    Money(cents as i64)
                } else {
                    Money::zero()
                }
            }
            _ => Money::zero(),
        }
    }

    /// Returns the value as a decimal number for the wire.
    ///
    /// ## Note
    /// Only used when encoding outgoing documents. Two equal `Money` values
    /// always produce the identical `f64`.
    #[inline]
    pub fn as_decimal(&self) -> f64 {
        self.0 as f64 / 100.0
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Debug-oriented display, e.g. `15.50`.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}{}.{:02}", sign, self.major().abs(), self.minor())
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
