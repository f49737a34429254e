//! # Money Module
//!
//! Provides the `Money` type for prices, line totals and cart totals.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  Summing listing prices as floats:                                      │
//! │    19.99 × 3 = 59.970000000000006                                       │
//! │                                                                         │
//! │  OUR SOLUTION: Integer Cents                                            │
//! │    1999 cents × 3 = 5997 cents → "$59.97"                               │
//! │                                                                         │
//! │  Floats only exist at the JSON edge (the web client stores prices as    │
//! │  major units). They are converted exactly once, on the way in.         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use spyke_core::money::Money;
//!
//! let price = Money::from_cents(1999); // $19.99
//! let line_total = price.multiply_quantity(3);
//! assert_eq!(line_total.to_string(), "$59.97");
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Sub, SubAssign};
use ts_rs::TS;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in the smallest currency unit (cents).
///
/// ## Design Decisions
/// - **i64 (signed)**: savings and differences can go negative
/// - **Single field tuple struct**: zero-cost wrapper over i64
/// - **Serialized as cents**: use [`major_units`] for the web-client format
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from cents.
    ///
    /// ## Example
    /// ```rust
    /// use spyke_core::money::Money;
    ///
    /// let price = Money::from_cents(1099);
    /// assert_eq!(price.cents(), 1099);
    /// ```
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Converts a major-unit amount (e.g. `10.99`) into cents, rounding to
    /// the nearest cent.
    ///
    /// This is the single place where floating point enters the system.
    /// Non-finite input maps to zero.
    ///
    /// ## Example
    /// ```rust
    /// use spyke_core::money::Money;
    ///
    /// assert_eq!(Money::from_major_units(10.99).cents(), 1099);
    /// assert_eq!(Money::from_major_units(0.1 + 0.2).cents(), 30);
    /// ```
    pub fn from_major_units(amount: f64) -> Self {
        if !amount.is_finite() {
            return Money::zero();
        }
        Money((amount * 100.0).round() as i64)
    }

    /// Returns the value in major units, for display and the JSON edge only.
    pub fn to_major_units(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// Returns the value in cents.
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the major unit (dollars) portion.
    #[inline]
    pub const fn dollars(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the minor unit portion (always 0-99).
    #[inline]
    pub const fn cents_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Checks if the value is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checks if the value is greater than zero.
    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    /// Checks if the value is less than zero.
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Multiplies a unit price by a quantity.
    ///
    /// ## User Workflow
    /// ```text
    /// Listing: "Invoice Bot" $19.99
    /// Quantity: 3
    ///      │
    ///      ▼
    /// multiply_quantity(3) ← THIS FUNCTION
    ///      │
    ///      ▼
    /// Line Total: $59.97
    /// ```
    ///
    /// Saturates at the `i64` bounds.
    #[inline]
    pub const fn multiply_quantity(&self, qty: u32) -> Self {
        Money(self.0.saturating_mul(qty as i64))
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Shows money as `$12.34`, always with two decimals.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(
            f,
            "{}${}.{:02}",
            sign,
            self.dollars().abs(),
            self.cents_part()
        )
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0.saturating_add(other.0))
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 = self.0.saturating_add(other.0);
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0.saturating_sub(other.0))
    }
}

impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 = self.0.saturating_sub(other.0);
    }
}

impl Mul<u32> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: u32) -> Self {
        self.multiply_quantity(qty)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), Add::add)
    }
}

// =============================================================================
// Major-Unit Serialization
// =============================================================================

/// Serde adapter that writes `Money` as a JSON number in major units.
///
/// The web client keeps prices as plain numbers (`"price": 10.99`), so any
/// struct that is persisted in its format annotates its money fields with
/// `#[serde(with = "crate::money::major_units")]`.
pub mod major_units {
    use super::Money;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Money, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(value.to_major_units())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Money, D::Error> {
        let amount = f64::deserialize(deserializer)?;
        Ok(Money::from_major_units(amount))
    }

    /// Same adapter for `Option<Money>`; `null` and a missing field are `None`.
    pub mod option {
        use super::Money;
        use serde::{Deserialize, Deserializer, Serializer};

        pub fn serialize<S: Serializer>(
            value: &Option<Money>,
            serializer: S,
        ) -> Result<S::Ok, S::Error> {
            match value {
                Some(money) => serializer.serialize_some(&money.to_major_units()),
                None => serializer.serialize_none(),
            }
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(
            deserializer: D,
        ) -> Result<Option<Money>, D::Error> {
            let amount = Option::<f64>::deserialize(deserializer)?;
            Ok(amount.map(Money::from_major_units))
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_cents() {
        let money = Money::from_cents(1099);
        assert_eq!(money.cents(), 1099);
        assert_eq!(money.dollars(), 10);
        assert_eq!(money.cents_part(), 99);
    }

    #[test]
    fn test_from_major_units_rounds_to_cent() {
        assert_eq!(Money::from_major_units(10.0).cents(), 1000);
        assert_eq!(Money::from_major_units(19.99).cents(), 1999);
        assert_eq!(Money::from_major_units(0.005).cents(), 1);
        assert_eq!(Money::from_major_units(f64::NAN).cents(), 0);
        assert_eq!(Money::from_major_units(f64::INFINITY).cents(), 0);
    }

    #[test]
    fn test_display() {
        assert_eq!(Money::from_cents(1099).to_string(), "$10.99");
        assert_eq!(Money::from_cents(2000).to_string(), "$20.00");
        assert_eq!(Money::from_cents(-550).to_string(), "-$5.50");
        assert_eq!(Money::zero().to_string(), "$0.00");
    }

    #[test]
    fn test_arithmetic() {
        let a = Money::from_cents(1000);
        let b = Money::from_cents(500);

        assert_eq!((a + b).cents(), 1500);
        assert_eq!((a - b).cents(), 500);
        assert_eq!((a * 3).cents(), 3000);

        let total: Money = [a, b, b].into_iter().sum();
        assert_eq!(total.cents(), 2000);
    }

    #[test]
    fn test_arithmetic_saturates() {
        let huge = Money::from_major_units(1e17);
        assert_eq!(huge.cents(), i64::MAX);

        assert_eq!(huge.multiply_quantity(2).cents(), i64::MAX);
        assert_eq!((huge + Money::from_cents(1)).cents(), i64::MAX);
        assert_eq!((Money::from_cents(i64::MIN) - Money::from_cents(1)).cents(), i64::MIN);

        let total: Money = [huge, huge, Money::from_cents(5)].into_iter().sum();
        assert_eq!(total.cents(), i64::MAX);
    }

    /// 0.1 + 0.2 style drift must not show up in cart totals.
    #[test]
    fn test_no_float_drift_in_sums() {
        let unit = Money::from_major_units(19.99);
        assert_eq!(unit.multiply_quantity(3).cents(), 5997);
        assert_eq!(unit.multiply_quantity(3).to_string(), "$59.97");
    }

    #[test]
    fn test_major_units_serde() {
        #[derive(Serialize, Deserialize, PartialEq, Debug)]
        struct Priced {
            #[serde(with = "major_units")]
            price: Money,
            #[serde(with = "major_units::option", default)]
            original: Option<Money>,
        }

        let json = serde_json::to_string(&Priced {
            price: Money::from_cents(1099),
            original: None,
        })
        .unwrap();
        assert_eq!(json, r#"{"price":10.99,"original":null}"#);

        let parsed: Priced = serde_json::from_str(r#"{"price":12.5}"#).unwrap();
        assert_eq!(parsed.price.cents(), 1250);
        assert_eq!(parsed.original, None);
    }
}
