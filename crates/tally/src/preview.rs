//! Everything a totals screen shows, computed from one document.

use rust_decimal::Decimal;
use serde::Serialize;
use tally_calc::{
    aggregate, carry_forward, check_claims, check_line_items, check_meters, reconcile,
    reconcile_meters, tax_breakdown, tank_totals, valuate, ClaimReconciliation,
    MeterReconciliation, MoneyTotals, Overflow, TankTotal, TaxBand, Totals, Valuation,
};
use tally_core::{
    Adjustment, AdjustmentBase, ClaimItem, Code, CurrencyCode, Document, LineItem, NaiveDate,
};

/// A line item with its computed figures.
#[derive(Debug, Clone, Serialize)]
pub struct PreviewLine {
    /// The input item.
    pub item: LineItem,
    /// Amount, tax and total.
    #[serde(flatten)]
    pub valuation: Valuation,
}

/// The latest claim certificate, reconciled.
#[derive(Debug, Clone, Serialize)]
pub struct ClaimPreview {
    /// Certificate number.
    pub number: u32,
    /// Certificate date.
    pub date: NaiveDate,
    /// Derived lines and totals.
    #[serde(flatten)]
    pub reconciliation: ClaimReconciliation,
    /// Opening lines for the next certificate.
    pub next: Vec<ClaimItem>,
}

/// Meter reconciliation with names and values resolved.
#[derive(Debug, Clone, Serialize)]
pub struct MeterPreview {
    /// Per-product figures.
    #[serde(flatten)]
    pub reconciliation: MeterReconciliation,
    /// Per-tank dispensed quantities.
    pub tanks: Vec<TankTotal>,
    /// Σ value over priced products.
    pub value_total: Decimal,
    /// Products with no price.
    pub unpriced: Vec<Code>,
}

/// A computed preview.
#[derive(Debug, Clone, Serialize)]
pub struct Preview {
    /// Document currency.
    pub currency: CurrencyCode,
    /// Valued line items, in input order.
    pub lines: Vec<PreviewLine>,
    /// VAT summary by rate.
    pub tax_breakdown: Vec<TaxBand>,
    /// Adjustments, in input order.
    pub adjustments: Vec<Adjustment>,
    /// Document totals.
    pub totals: Totals,
    /// Totals tagged with the document currency.
    pub money: MoneyTotals,
    /// Reconciled latest claim, if the document has claims.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub claim: Option<ClaimPreview>,
    /// Meter figures, if the document has a meter sheet.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meters: Option<MeterPreview>,
}

impl Preview {
    /// Compute a preview using `base` for adjustments.
    ///
    /// Fails without computing anything when a figure would exceed the
    /// decimal range.
    pub fn try_build(document: &Document, base: AdjustmentBase) -> Result<Self, Overflow> {
        check_line_items(&document.items, &document.adjustments)?;
        if let Some(claim) = document.latest_claim() {
            check_claims(std::slice::from_ref(claim))?;
        }
        check_meters(
            &document.meters.readings,
            &document.meters.adjustments,
            &document.master_data,
        )?;

        let lines = document
            .items
            .iter()
            .map(|item| PreviewLine {
                item: item.clone(),
                valuation: valuate(item),
            })
            .collect();

        let totals = aggregate(&document.items, &document.adjustments, base);

        let claim = document.latest_claim().map(|claim| {
            let reconciliation = reconcile(&claim.items);
            ClaimPreview {
                number: claim.number,
                date: claim.date,
                next: carry_forward(&reconciliation.lines),
                reconciliation,
            }
        });

        let meters = (!document.meters.is_empty()).then(|| {
            let sheet = &document.meters;
            let reconciliation = reconcile_meters(&sheet.readings, &sheet.adjustments);
            let (value_total, unpriced) = reconciliation.value_total(&document.master_data);
            MeterPreview {
                tanks: tank_totals(&sheet.readings),
                reconciliation,
                value_total,
                unpriced,
            }
        });

        Ok(Self {
            currency: document.currency.clone(),
            lines,
            tax_breakdown: tax_breakdown(&document.items),
            adjustments: document.adjustments.clone(),
            money: totals.to_money(document.currency.clone()),
            totals,
            claim,
            meters,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use tally_core::{Claim, MasterData, MeterReading, StockAdjustment, StockOperator};

    fn document() -> Document {
        let mut doc = Document::new("TZS");
        doc.items
            .push(LineItem::new(dec!(10), dec!(5)).with_tax_rate(dec!(18)));
        doc.items.push(LineItem::new(dec!(2), dec!(10)).exempt());
        doc.adjustments
            .push(Adjustment::deduction("Credit note", dec!(30)));
        doc.adjustments.push(Adjustment::addition("Freight", dec!(100)));
        doc
    }

    #[test]
    fn test_invoice_preview() {
        let preview = Preview::try_build(&document(), AdjustmentBase::PostTax).unwrap();
        assert_eq!(preview.lines.len(), 2);
        assert_eq!(preview.lines[0].valuation.total, dec!(59));
        assert_eq!(preview.totals.subtotal, dec!(70));
        assert_eq!(preview.totals.tax_total, dec!(9));
        assert_eq!(preview.totals.adjustment_total, dec!(70));
        assert_eq!(preview.totals.grand_total, dec!(149));
        assert_eq!(preview.money.grand_total.currency, "TZS");
        assert_eq!(preview.tax_breakdown.len(), 2);
        assert!(preview.claim.is_none());
        assert!(preview.meters.is_none());
    }

    #[test]
    fn test_latest_claim_is_reconciled() {
        let mut doc = document();
        doc.claims.push(
            Claim::new(1, NaiveDate::from_ymd_opt(2024, 1, 31).unwrap())
                .with_item(ClaimItem::new("A", dec!(0), dec!(40), dec!(2))),
        );
        doc.claims.push(
            Claim::new(2, NaiveDate::from_ymd_opt(2024, 2, 29).unwrap())
                .with_item(ClaimItem::new("A", dec!(40), dec!(10), dec!(2))),
        );

        let claim = Preview::try_build(&doc, AdjustmentBase::PostTax)
            .unwrap()
            .claim
            .unwrap();
        assert_eq!(claim.number, 2);
        assert_eq!(claim.reconciliation.totals.cumulative_amount, dec!(100));
        assert_eq!(claim.next[0].previous_quantity, dec!(50));
    }

    #[test]
    fn test_meter_preview_values() {
        let mut doc = Document::new("TZS");
        doc.master_data = MasterData::new().with_product("P", "Diesel", Some(dec!(3000)));
        doc.meters
            .readings
            .push(MeterReading::new("P", "T1", dec!(100), dec!(150)));
        doc.meters
            .readings
            .push(MeterReading::new("P", "T2", dec!(0), dec!(20)));
        doc.meters
            .adjustments
            .push(StockAdjustment::new("P", "T1", StockOperator::Minus, dec!(5)));

        let meters = Preview::try_build(&doc, AdjustmentBase::PostTax)
            .unwrap()
            .meters
            .unwrap();
        assert_eq!(meters.reconciliation.products[0].final_quantity, dec!(75));
        assert_eq!(meters.value_total, dec!(225000));
        assert!(meters.unpriced.is_empty());
        assert_eq!(meters.tanks.len(), 2);
    }

    #[test]
    fn test_json_shape() {
        let preview = Preview::try_build(&document(), AdjustmentBase::PreTax).unwrap();
        let value = serde_json::to_value(&preview).unwrap();
        assert_eq!(value["totals"]["grand_total"], "149");
        assert_eq!(value["totals"]["adjustment_base"], "pre_tax");
        assert_eq!(value["lines"][0]["tax"], "9");
        assert!(value.get("claim").is_none());
    }

    #[test]
    fn test_overflow_is_an_error() {
        let mut doc = Document::new("TZS");
        doc.items.push(LineItem::new(Decimal::MAX, dec!(2)));
        let err = Preview::try_build(&doc, AdjustmentBase::PostTax).unwrap_err();
        assert_eq!(err.location, "items[0]");
    }
}
