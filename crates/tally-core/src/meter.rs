//! Pump meter readings and tank stock adjustments for fuel-shift reports.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::code::Code;

/// Opening and closing meter values for one pump on one tank.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MeterReading {
    /// Product dispensed.
    pub product_id: Code,
    /// Tank the pump draws from.
    pub tank_id: Code,
    /// Pump or nozzle, when the payload identifies it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pump_id: Option<Code>,
    /// Meter value at shift start.
    pub opening: Decimal,
    /// Meter value at shift end.
    pub closing: Decimal,
}

impl MeterReading {
    /// Create a reading.
    #[must_use]
    pub fn new(
        product_id: impl Into<Code>,
        tank_id: impl Into<Code>,
        opening: Decimal,
        closing: Decimal,
    ) -> Self {
        Self {
            product_id: product_id.into(),
            tank_id: tank_id.into(),
            pump_id: None,
            opening,
            closing,
        }
    }

    /// Set the pump id.
    #[must_use]
    pub fn with_pump(mut self, pump_id: impl Into<Code>) -> Self {
        self.pump_id = Some(pump_id.into());
        self
    }

    /// Quantity dispensed: `closing - opening`.
    #[must_use]
    pub fn difference(&self) -> Decimal {
        self.closing - self.opening
    }
}

/// Operator recorded on a stock adjustment.
///
/// The stored operator describes the correction from the dip-stick's point of
/// view, so it is applied inverted: `+` lowers the computed quantity and `-`
/// raises it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StockOperator {
    /// Recorded as `+`.
    #[serde(rename = "+")]
    Plus,
    /// Recorded as `-`.
    #[serde(rename = "-")]
    Minus,
}

impl StockOperator {
    /// Signed change to the metered quantity for an adjustment of `quantity`.
    ///
    /// ```
    /// use tally_core::StockOperator;
    /// use rust_decimal_macros::dec;
    ///
    /// assert_eq!(StockOperator::Plus.delta(dec!(5)), dec!(-5));
    /// assert_eq!(StockOperator::Minus.delta(dec!(5)), dec!(5));
    /// ```
    #[must_use]
    pub fn delta(self, quantity: Decimal) -> Decimal {
        match self {
            Self::Plus => -quantity,
            Self::Minus => quantity,
        }
    }

    /// The operator symbol.
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::Plus => "+",
            Self::Minus => "-",
        }
    }
}

impl FromStr for StockOperator {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "+" => Ok(Self::Plus),
            "-" => Ok(Self::Minus),
            _ => Err(format!("unknown stock operator: {s}")),
        }
    }
}

impl fmt::Display for StockOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// A manual correction to a product's metered quantity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockAdjustment {
    /// Product being corrected.
    pub product_id: Code,
    /// Tank the correction was measured on.
    pub tank_id: Code,
    /// Recorded operator.
    pub operator: StockOperator,
    /// Unsigned quantity.
    pub quantity: Decimal,
    /// Reason for the correction.
    #[serde(default)]
    pub description: String,
}

impl StockAdjustment {
    /// Create a stock adjustment.
    #[must_use]
    pub fn new(
        product_id: impl Into<Code>,
        tank_id: impl Into<Code>,
        operator: StockOperator,
        quantity: Decimal,
    ) -> Self {
        Self {
            product_id: product_id.into(),
            tank_id: tank_id.into(),
            operator,
            quantity,
            description: String::new(),
        }
    }

    /// Set the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// The signed change this adjustment makes.
    #[must_use]
    pub fn delta(&self) -> Decimal {
        self.operator.delta(self.quantity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_difference() {
        let reading = MeterReading::new("DSL", "T1", dec!(100), dec!(150)).with_pump("P1");
        assert_eq!(reading.difference(), dec!(50));
        assert_eq!(reading.pump_id.as_deref(), Some("P1"));
    }

    #[test]
    fn test_difference_may_be_negative() {
        let reading = MeterReading::new("DSL", "T1", dec!(150), dec!(100));
        assert_eq!(reading.difference(), dec!(-50));
    }

    #[test]
    fn test_inverted_sign_convention() {
        let plus = StockAdjustment::new("DSL", "T1", StockOperator::Plus, dec!(5));
        let minus = StockAdjustment::new("DSL", "T1", StockOperator::Minus, dec!(5));
        assert_eq!(plus.delta(), dec!(-5));
        assert_eq!(minus.delta(), dec!(5));
    }

    #[test]
    fn test_operator_serde() {
        let adj: StockAdjustment = serde_json::from_str(
            r#"{"product_id": "PMS", "tank_id": "T2", "operator": "+", "quantity": "2.5", "description": "Dip"}"#,
        )
        .unwrap();
        assert_eq!(adj.operator, StockOperator::Plus);
        assert_eq!(adj.description, "Dip");
        assert!(serde_json::from_str::<StockOperator>("\"*\"").is_err());
        assert_eq!(" - ".parse::<StockOperator>(), Ok(StockOperator::Minus));
    }
}
