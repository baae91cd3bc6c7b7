//! Money type representing a decimal amount with a currency.
//!
//! A [`Money`] value pairs a [`Decimal`] with a [`CurrencyCode`]. Arithmetic is
//! only meaningful between values of the same currency: the operator impls
//! assert this in debug builds, and the `checked_*` methods enforce it in all
//! builds.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Neg, Sub, SubAssign};
use thiserror::Error;

use crate::code::CurrencyCode;

/// Arithmetic was attempted between two different currencies.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("currency mismatch: expected {expected}, found {found}")]
pub struct CurrencyMismatch {
    /// The currency of the left-hand value.
    pub expected: CurrencyCode,
    /// The currency that did not match.
    pub found: CurrencyCode,
}

/// An amount of money in a single currency.
///
/// # Examples
///
/// ```
/// use tally_core::Money;
/// use rust_decimal_macros::dec;
///
/// let price = Money::new(dec!(1500.00), "TZS");
/// let fee = Money::new(dec!(250.00), "TZS");
///
/// let total = &price + &fee;
/// assert_eq!(total.amount, dec!(1750.00));
/// assert_eq!(total.currency, "TZS");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Money {
    /// The decimal amount.
    pub amount: Decimal,
    /// The currency code (e.g., "TZS", "USD").
    #[serde(rename = "currency_code")]
    pub currency: CurrencyCode,
}

impl Money {
    /// Create a new money value.
    #[must_use]
    pub fn new(amount: Decimal, currency: impl Into<CurrencyCode>) -> Self {
        Self {
            amount,
            currency: currency.into(),
        }
    }

    /// Create a zero value in the given currency.
    #[must_use]
    pub fn zero(currency: impl Into<CurrencyCode>) -> Self {
        Self::new(Decimal::ZERO, currency)
    }

    /// Check if the amount is zero.
    #[must_use]
    pub const fn is_zero(&self) -> bool {
        self.amount.is_zero()
    }

    /// Check if the amount is strictly positive.
    #[must_use]
    pub const fn is_positive(&self) -> bool {
        self.amount.is_sign_positive() && !self.amount.is_zero()
    }

    /// Check if the amount is strictly negative.
    #[must_use]
    pub const fn is_negative(&self) -> bool {
        self.amount.is_sign_negative() && !self.amount.is_zero()
    }

    /// Absolute value, same currency.
    #[must_use]
    pub fn abs(&self) -> Self {
        Self::new(self.amount.abs(), self.currency.clone())
    }

    /// Replace the amount, keeping the currency.
    #[must_use]
    pub fn with_amount(&self, amount: Decimal) -> Self {
        Self::new(amount, self.currency.clone())
    }

    /// Whether `other` is in the same currency.
    #[must_use]
    pub fn same_currency(&self, other: &Self) -> bool {
        self.currency == other.currency
    }

    /// Add, failing if the currencies differ.
    pub fn checked_add(&self, other: &Self) -> Result<Self, CurrencyMismatch> {
        self.ensure_currency(other)?;
        Ok(self.with_amount(self.amount + other.amount))
    }

    /// Subtract, failing if the currencies differ.
    pub fn checked_sub(&self, other: &Self) -> Result<Self, CurrencyMismatch> {
        self.ensure_currency(other)?;
        Ok(self.with_amount(self.amount - other.amount))
    }

    /// Sum values in `currency`. An empty iterator sums to zero.
    ///
    /// ```
    /// use tally_core::Money;
    /// use rust_decimal_macros::dec;
    ///
    /// let lines = [Money::new(dec!(10), "USD"), Money::new(dec!(2.50), "USD")];
    /// let total = Money::sum("USD", lines.iter()).unwrap();
    /// assert_eq!(total.amount, dec!(12.50));
    ///
    /// assert!(Money::sum("EUR", lines.iter()).is_err());
    /// ```
    pub fn sum<'a>(
        currency: impl Into<CurrencyCode>,
        values: impl IntoIterator<Item = &'a Self>,
    ) -> Result<Self, CurrencyMismatch> {
        let mut total = Self::zero(currency);
        for value in values {
            total = total.checked_add(value)?;
        }
        Ok(total)
    }

    /// Round to the given number of decimal places.
    ///
    /// Only display code should call this; calculations keep full precision.
    #[must_use]
    pub fn round_dp(&self, dp: u32) -> Self {
        self.with_amount(self.amount.round_dp(dp))
    }

    fn ensure_currency(&self, other: &Self) -> Result<(), CurrencyMismatch> {
        if self.same_currency(other) {
            Ok(())
        } else {
            Err(CurrencyMismatch {
                expected: self.currency.clone(),
                found: other.currency.clone(),
            })
        }
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.amount, self.currency)
    }
}

impl Add for &Money {
    type Output = Money;

    fn add(self, other: &Money) -> Money {
        debug_assert_eq!(
            self.currency, other.currency,
            "Cannot add money in different currencies"
        );
        self.with_amount(self.amount + other.amount)
    }
}

impl Sub for &Money {
    type Output = Money;

    fn sub(self, other: &Money) -> Money {
        debug_assert_eq!(
            self.currency, other.currency,
            "Cannot subtract money in different currencies"
        );
        self.with_amount(self.amount - other.amount)
    }
}

impl Neg for &Money {
    type Output = Money;

    fn neg(self) -> Money {
        self.with_amount(-self.amount)
    }
}

impl Add for Money {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        &self + &other
    }
}

impl Sub for Money {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        &self - &other
    }
}

impl Neg for Money {
    type Output = Self;

    fn neg(self) -> Self {
        -&self
    }
}

impl AddAssign<&Self> for Money {
    fn add_assign(&mut self, other: &Self) {
        debug_assert_eq!(
            self.currency, other.currency,
            "Cannot add money in different currencies"
        );
        self.amount += other.amount;
    }
}

impl SubAssign<&Self> for Money {
    fn sub_assign(&mut self, other: &Self) {
        debug_assert_eq!(
            self.currency, other.currency,
            "Cannot subtract money in different currencies"
        );
        self.amount -= other.amount;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_new_and_zero() {
        let m = Money::new(dec!(100.00), "TZS");
        assert_eq!(m.amount, dec!(100.00));
        assert_eq!(m.currency, "TZS");

        let z = Money::zero("USD");
        assert!(z.is_zero());
        assert!(!z.is_positive());
        assert!(!z.is_negative());
    }

    #[test]
    fn test_sign_checks() {
        assert!(Money::new(dec!(1), "USD").is_positive());
        assert!(Money::new(dec!(-1), "USD").is_negative());
        assert_eq!(Money::new(dec!(-7.5), "USD").abs().amount, dec!(7.5));
    }

    #[test]
    fn test_operators() {
        let a = Money::new(dec!(100.00), "USD");
        let b = Money::new(dec!(30.00), "USD");
        assert_eq!((&a + &b).amount, dec!(130.00));
        assert_eq!((&a - &b).amount, dec!(70.00));
        assert_eq!((-&a).amount, dec!(-100.00));

        let mut c = a.clone();
        c += &b;
        c -= &b;
        assert_eq!(c, a);
    }

    #[test]
    fn test_checked_add_mismatch() {
        let a = Money::new(dec!(1), "USD");
        let b = Money::new(dec!(1), "TZS");
        let err = a.checked_add(&b).unwrap_err();
        assert_eq!(err.expected, "USD");
        assert_eq!(err.found, "TZS");
        assert_eq!(err.to_string(), "currency mismatch: expected USD, found TZS");
        assert!(a.checked_sub(&b).is_err());
    }

    #[test]
    fn test_sum_empty_is_zero() {
        let total = Money::sum("TZS", std::iter::empty()).unwrap();
        assert_eq!(total, Money::zero("TZS"));
    }

    #[test]
    fn test_round_dp_only_on_request() {
        let m = Money::new(dec!(10.005), "USD");
        assert_eq!(m.amount, dec!(10.005));
        assert_eq!(m.round_dp(2).amount, dec!(10.00));
    }

    #[test]
    fn test_display() {
        let m = Money::new(dec!(1234.56), "TZS");
        assert_eq!(m.to_string(), "1234.56 TZS");
    }

    #[test]
    fn test_serde_field_names() {
        let m = Money::new(dec!(5), "USD");
        let json = serde_json::to_value(&m).unwrap();
        assert_eq!(json["currency_code"], "USD");
    }
}
