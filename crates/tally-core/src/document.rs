//! A preview document: everything one totals screen needs, in one payload.
//!
//! Documents carry their own display and adjustment options. Every section is
//! optional, so receipts, claim certificates and shift reports share one shape.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::claim::Claim;
use crate::code::{CodeInterner, CurrencyCode};
use crate::format::FormatConfig;
use crate::item::{Adjustment, LineItem};
use crate::master::MasterData;
use crate::meter::{MeterReading, StockAdjustment};

/// Which figure adjustments are layered onto.
///
/// Claim and certificate previews treat adjustments as post-tax corrections;
/// sales-note adjustments apply to the pre-tax subtotal. The grand total is the
/// same either way; only the reported base and adjusted base differ.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdjustmentBase {
    /// Adjust the subtotal before tax.
    PreTax,
    /// Adjust subtotal plus tax.
    #[default]
    PostTax,
}

impl FromStr for AdjustmentBase {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "pre_tax" | "pretax" => Ok(Self::PreTax),
            "post_tax" | "posttax" => Ok(Self::PostTax),
            _ => Err(format!("unknown adjustment base: {s}")),
        }
    }
}

impl fmt::Display for AdjustmentBase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PreTax => write!(f, "pre-tax"),
            Self::PostTax => write!(f, "post-tax"),
        }
    }
}

const fn default_precision() -> u32 {
    2
}

const fn default_true() -> bool {
    true
}

/// Per-document options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Options {
    /// Base for adjustments (default: post-tax).
    #[serde(default)]
    pub adjustment_base: AdjustmentBase,
    /// Decimal places used when displaying values (default: 2).
    #[serde(default = "default_precision")]
    pub display_precision: u32,
    /// Group thousands when displaying values (default: true).
    #[serde(default = "default_true")]
    pub thousands_separator: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            adjustment_base: AdjustmentBase::default(),
            display_precision: default_precision(),
            thousands_separator: true,
        }
    }
}

impl Options {
    /// Display settings derived from these options.
    #[must_use]
    pub fn format_config(&self) -> FormatConfig {
        FormatConfig {
            precision: self.display_precision,
            thousands_separator: self.thousands_separator,
            ..FormatConfig::default()
        }
    }
}

/// Pump readings and tank corrections for one shift.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MeterSheet {
    /// Meter readings.
    #[serde(default)]
    pub readings: Vec<MeterReading>,
    /// Stock adjustments.
    #[serde(default)]
    pub adjustments: Vec<StockAdjustment>,
}

impl MeterSheet {
    /// Whether the sheet has nothing in it.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.readings.is_empty() && self.adjustments.is_empty()
    }
}

/// One preview payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    /// Currency for every money value in the document.
    pub currency: CurrencyCode,
    /// Document options.
    #[serde(default)]
    pub options: Options,
    /// Priced line items.
    #[serde(default)]
    pub items: Vec<LineItem>,
    /// Additions and deductions.
    #[serde(default)]
    pub adjustments: Vec<Adjustment>,
    /// Claim certificates, oldest first by convention.
    #[serde(default)]
    pub claims: Vec<Claim>,
    /// Fuel-shift readings.
    #[serde(default)]
    pub meters: MeterSheet,
    /// Product and tank reference data.
    #[serde(default)]
    pub master_data: MasterData,
}

impl Document {
    /// Create an empty document in `currency`.
    #[must_use]
    pub fn new(currency: impl Into<CurrencyCode>) -> Self {
        Self {
            currency: currency.into(),
            options: Options::default(),
            items: Vec::new(),
            adjustments: Vec::new(),
            claims: Vec::new(),
            meters: MeterSheet::default(),
            master_data: MasterData::default(),
        }
    }

    /// The most recent claim by (date, number).
    #[must_use]
    pub fn latest_claim(&self) -> Option<&Claim> {
        self.claims.iter().max_by_key(|c| (c.date, c.number))
    }

    /// Re-intern every code so repeated identifiers share storage.
    pub fn intern_codes(&mut self, interner: &mut CodeInterner) {
        self.currency = interner.reintern(&self.currency);
        for adjustment in &mut self.adjustments {
            if let Some(currency) = &adjustment.currency {
                adjustment.currency = Some(interner.reintern(currency));
            }
        }
        for claim in &mut self.claims {
            for item in &mut claim.items {
                item.task = interner.reintern(&item.task);
            }
        }
        for reading in &mut self.meters.readings {
            reading.product_id = interner.reintern(&reading.product_id);
            reading.tank_id = interner.reintern(&reading.tank_id);
        }
        for adjustment in &mut self.meters.adjustments {
            adjustment.product_id = interner.reintern(&adjustment.product_id);
            adjustment.tank_id = interner.reintern(&adjustment.tank_id);
        }
        for product in &mut self.master_data.products {
            product.id = interner.reintern(&product.id);
            if let Some(currency) = &product.currency {
                product.currency = Some(interner.reintern(currency));
            }
        }
        for tank in &mut self.master_data.tanks {
            tank.id = interner.reintern(&tank.id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::claim::ClaimItem;
    use crate::NaiveDate;
    use rust_decimal_macros::dec;

    #[test]
    fn test_minimal_document() {
        let doc: Document = serde_json::from_str(r#"{"currency": "TZS"}"#).unwrap();
        assert_eq!(doc.currency, "TZS");
        assert_eq!(doc.options, Options::default());
        assert!(doc.items.is_empty());
        assert!(doc.meters.is_empty());
    }

    #[test]
    fn test_options_parse() {
        let doc: Document = serde_json::from_str(
            r#"{"currency": "USD", "options": {"adjustment_base": "pre_tax", "display_precision": 3}}"#,
        )
        .unwrap();
        assert_eq!(doc.options.adjustment_base, AdjustmentBase::PreTax);
        assert_eq!(doc.options.display_precision, 3);
        assert!(doc.options.thousands_separator);
        assert_eq!(doc.options.format_config().precision, 3);
    }

    #[test]
    fn test_unknown_option_rejected() {
        let result: Result<Document, _> =
            serde_json::from_str(r#"{"currency": "USD", "options": {"rounding": "up"}}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_base_parsing() {
        assert_eq!("pre-tax".parse::<AdjustmentBase>(), Ok(AdjustmentBase::PreTax));
        assert_eq!("POST_TAX".parse::<AdjustmentBase>(), Ok(AdjustmentBase::PostTax));
        assert!("gross".parse::<AdjustmentBase>().is_err());
        assert_eq!(AdjustmentBase::PreTax.to_string(), "pre-tax");
    }

    #[test]
    fn test_latest_claim() {
        let mut doc = Document::new("TZS");
        let jan = NaiveDate::from_ymd_opt(2024, 1, 31).unwrap();
        let feb = NaiveDate::from_ymd_opt(2024, 2, 29).unwrap();
        doc.claims.push(Claim::new(2, feb));
        doc.claims.push(Claim::new(1, jan));
        assert_eq!(doc.latest_claim().map(|c| c.number), Some(2));
    }

    #[test]
    fn test_intern_codes_shares_storage() {
        let mut doc = Document::new("TZS");
        doc.claims.push(
            Claim::new(1, NaiveDate::from_ymd_opt(2024, 1, 31).unwrap())
                .with_item(ClaimItem::new("A", dec!(0), dec!(1), dec!(1))),
        );
        doc.claims.push(
            Claim::new(2, NaiveDate::from_ymd_opt(2024, 2, 29).unwrap())
                .with_item(ClaimItem::new("A", dec!(1), dec!(1), dec!(1))),
        );

        let mut interner = CodeInterner::new();
        doc.intern_codes(&mut interner);

        let first = &doc.claims[0].items[0].task;
        let second = &doc.claims[1].items[0].task;
        assert!(first.ptr_eq(second));
        assert_eq!(interner.len(), 2);
    }
}
