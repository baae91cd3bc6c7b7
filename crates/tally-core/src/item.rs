//! Priced line items and named adjustments.
//!
//! These are the inputs to every receipt, purchase order, GRN and invoice
//! preview. Line items carry only numbers; currency belongs to the document.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::code::CurrencyCode;
use crate::unit::Unit;

/// A priced unit of a transaction.
///
/// ```
/// use tally_core::LineItem;
/// use rust_decimal_macros::dec;
///
/// let item = LineItem::new(dec!(10), dec!(5)).with_tax_rate(dec!(18));
/// assert_eq!(item.amount(), dec!(50));
/// assert!(!item.tax_exempt);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    /// Free-text description shown on the document.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Quantity; negative only for reversal entries.
    pub quantity: Decimal,
    /// Price per unit.
    pub rate: Decimal,
    /// Tax rate as a percentage (0-100).
    #[serde(default)]
    pub tax_rate: Decimal,
    /// Excluded from tax regardless of `tax_rate`.
    #[serde(default)]
    pub tax_exempt: bool,
    /// Unit of measure.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<Unit>,
}

impl LineItem {
    /// Create an untaxed item.
    #[must_use]
    pub const fn new(quantity: Decimal, rate: Decimal) -> Self {
        Self {
            description: None,
            quantity,
            rate,
            tax_rate: Decimal::ZERO,
            tax_exempt: false,
            unit: None,
        }
    }

    /// Set the tax rate percentage.
    #[must_use]
    pub fn with_tax_rate(mut self, tax_rate: Decimal) -> Self {
        self.tax_rate = tax_rate;
        self
    }

    /// Mark the item as tax exempt.
    #[must_use]
    pub fn exempt(mut self) -> Self {
        self.tax_exempt = true;
        self
    }

    /// Set the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set the unit.
    #[must_use]
    pub fn with_unit(mut self, unit: Unit) -> Self {
        self.unit = Some(unit);
        self
    }

    /// `quantity * rate`.
    #[must_use]
    pub fn amount(&self) -> Decimal {
        self.quantity * self.rate
    }

    /// Whether this is a reversal entry (negative quantity or rate).
    #[must_use]
    pub const fn is_reversal(&self) -> bool {
        (self.quantity.is_sign_negative() && !self.quantity.is_zero())
            || (self.rate.is_sign_negative() && !self.rate.is_zero())
    }
}

/// Direction of an adjustment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AdjustmentKind {
    /// Increases the total.
    #[serde(alias = "add")]
    Addition,
    /// Decreases the total.
    #[serde(alias = "less")]
    Deduction,
}

impl AdjustmentKind {
    /// `1` for additions, `-1` for deductions.
    #[must_use]
    pub const fn sign(self) -> Decimal {
        match self {
            Self::Addition => Decimal::ONE,
            Self::Deduction => Decimal::NEGATIVE_ONE,
        }
    }

    /// Label printed next to the adjustment on documents.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Addition => "Add",
            Self::Deduction => "Less",
        }
    }
}

impl FromStr for AdjustmentKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "addition" | "add" | "+" => Ok(Self::Addition),
            "deduction" | "less" | "-" => Ok(Self::Deduction),
            _ => Err(format!("unknown adjustment kind: {s}")),
        }
    }
}

impl fmt::Display for AdjustmentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Addition => write!(f, "addition"),
            Self::Deduction => write!(f, "deduction"),
        }
    }
}

/// A named addition or deduction, such as a debit note or contract variation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Adjustment {
    /// What the adjustment is for.
    #[serde(default)]
    pub description: String,
    /// Addition or deduction.
    pub kind: AdjustmentKind,
    /// Unsigned magnitude.
    pub amount: Decimal,
    /// Currency stated on the source note, when the payload carries one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<CurrencyCode>,
}

impl Adjustment {
    /// Create an adjustment.
    #[must_use]
    pub fn new(description: impl Into<String>, kind: AdjustmentKind, amount: Decimal) -> Self {
        Self {
            description: description.into(),
            kind,
            amount,
            currency: None,
        }
    }

    /// Record the currency stated on the source note.
    #[must_use]
    pub fn with_currency(mut self, currency: impl Into<CurrencyCode>) -> Self {
        self.currency = Some(currency.into());
        self
    }

    /// Shorthand for an addition.
    #[must_use]
    pub fn addition(description: impl Into<String>, amount: Decimal) -> Self {
        Self::new(description, AdjustmentKind::Addition, amount)
    }

    /// Shorthand for a deduction.
    #[must_use]
    pub fn deduction(description: impl Into<String>, amount: Decimal) -> Self {
        Self::new(description, AdjustmentKind::Deduction, amount)
    }

    /// The amount with the kind's sign applied.
    #[must_use]
    pub fn signed_amount(&self) -> Decimal {
        self.kind.sign() * self.amount
    }
}
