//! Overflow checks for the preview calculations.
//!
//! `Decimal` arithmetic panics once a result leaves its 96-bit range. The
//! calculations in this crate stay total over in-range inputs, so callers
//! handling untrusted documents run these checks first. Each check repeats
//! the corresponding calculation step for step with checked operations.

use rust_decimal::Decimal;
use std::collections::BTreeMap;
use tally_core::{Adjustment, Claim, Code, LineItem, MeterReading, PriceList, StockAdjustment};
use thiserror::Error;

/// A figure that does not fit in a `Decimal`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{figure} at {location} is too large to compute")]
pub struct Overflow {
    /// Which figure overflowed, e.g. "line amount".
    pub figure: &'static str,
    /// Where in the document, e.g. `items[3]`.
    pub location: String,
}

impl Overflow {
    fn at(figure: &'static str, location: impl Into<String>) -> Self {
        Self {
            figure,
            location: location.into(),
        }
    }
}

fn add(a: Decimal, b: Decimal, figure: &'static str, location: &str) -> Result<Decimal, Overflow> {
    a.checked_add(b).ok_or_else(|| Overflow::at(figure, location))
}

fn mul(a: Decimal, b: Decimal, figure: &'static str, location: &str) -> Result<Decimal, Overflow> {
    a.checked_mul(b).ok_or_else(|| Overflow::at(figure, location))
}

/// Check that valuation, tax bands and totals fit for both adjustment bases.
pub fn check_line_items(items: &[LineItem], adjustments: &[Adjustment]) -> Result<(), Overflow> {
    let mut subtotal = Decimal::ZERO;
    let mut tax_total = Decimal::ZERO;
    // rate (None = exempt) -> (taxable, tax)
    let mut bands: BTreeMap<Option<Decimal>, (Decimal, Decimal)> = BTreeMap::new();

    for (i, item) in items.iter().enumerate() {
        let location = format!("items[{i}]");
        let amount = mul(item.quantity, item.rate, "line amount", &location)?;
        let tax = if item.tax_exempt {
            Decimal::ZERO
        } else {
            mul(amount, item.tax_rate, "line tax", &location)?
                .checked_div(Decimal::ONE_HUNDRED)
                .ok_or_else(|| Overflow::at("line tax", location.as_str()))?
        };
        add(amount, tax, "line total", &location)?;

        subtotal = add(subtotal, amount, "subtotal", &location)?;
        tax_total = add(tax_total, tax, "tax total", &location)?;

        let key = (!item.tax_exempt).then(|| item.tax_rate.normalize());
        let band = bands.entry(key).or_insert((Decimal::ZERO, Decimal::ZERO));
        band.0 = add(band.0, amount, "tax band", &location)?;
        band.1 = add(band.1, tax, "tax band", &location)?;
    }

    let mut adjustment_total = Decimal::ZERO;
    for (i, adjustment) in adjustments.iter().enumerate() {
        let location = format!("adjustments[{i}]");
        let signed = mul(adjustment.kind.sign(), adjustment.amount, "adjustment", &location)?;
        adjustment_total = add(adjustment_total, signed, "adjustment total", &location)?;
    }

    let post_tax = add(subtotal, tax_total, "grand total", "totals")?;
    add(post_tax, adjustment_total, "grand total", "totals")?;
    add(subtotal, adjustment_total, "adjusted base", "totals")?;
    Ok(())
}

/// Check every claim's cumulative quantities and stage amounts.
pub fn check_claims(claims: &[Claim]) -> Result<(), Overflow> {
    for claim in claims {
        let location = format!("claims[#{}]", claim.number);
        let mut totals = [Decimal::ZERO; 3];
        for item in &claim.items {
            let cumulative = add(
                item.previous_quantity,
                item.present_quantity,
                "cumulative quantity",
                &location,
            )?;
            let amounts = [
                mul(item.previous_quantity, item.rate, "claim amount", &location)?,
                mul(item.present_quantity, item.rate, "claim amount", &location)?,
                mul(cumulative, item.rate, "claim amount", &location)?,
            ];
            for (total, amount) in totals.iter_mut().zip(amounts) {
                *total = add(*total, amount, "claim total", &location)?;
            }
        }
    }
    Ok(())
}

/// Check meter differences, merged quantities, tank sums and values.
pub fn check_meters(
    readings: &[MeterReading],
    adjustments: &[StockAdjustment],
    prices: &impl PriceList,
) -> Result<(), Overflow> {
    // product -> (merged difference, adjustment delta), first-seen order
    let mut products: Vec<(&Code, Decimal, Decimal)> = Vec::new();
    let mut tanks: Vec<(&Code, Decimal)> = Vec::new();

    for (i, reading) in readings.iter().enumerate() {
        let location = format!("meters.readings[{i}]");
        let difference = reading
            .closing
            .checked_sub(reading.opening)
            .ok_or_else(|| Overflow::at("meter difference", location.as_str()))?;

        match products.iter_mut().find(|p| *p.0 == reading.product_id) {
            Some(p) => p.1 = add(p.1, difference, "merged difference", &location)?,
            None => products.push((&reading.product_id, difference, Decimal::ZERO)),
        }
        match tanks.iter_mut().find(|t| *t.0 == reading.tank_id) {
            Some(t) => t.1 = add(t.1, difference, "tank difference", &location)?,
            None => tanks.push((&reading.tank_id, difference)),
        }
    }

    for (i, adjustment) in adjustments.iter().enumerate() {
        let location = format!("meters.adjustments[{i}]");
        if let Some(p) = products.iter_mut().find(|p| *p.0 == adjustment.product_id) {
            p.2 = add(p.2, adjustment.delta(), "stock adjustment", &location)?;
        }
    }

    let mut value_total = Decimal::ZERO;
    for (product_id, merged, delta) in products {
        let location = format!("meters[{product_id}]");
        let final_quantity = add(merged, delta, "final quantity", &location)?;
        if let Some(price) = prices.price_for(product_id) {
            let value = mul(final_quantity, price, "meter value", &location)?;
            value_total = add(value_total, value, "meter value total", &location)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use tally_core::{ClaimItem, MasterData, NaiveDate, StockOperator};

    #[test]
    fn test_ordinary_items_pass() {
        let items = [LineItem::new(dec!(10), dec!(5)).with_tax_rate(dec!(18))];
        let adjustments = [Adjustment::deduction("Credit note", dec!(30))];
        assert_eq!(check_line_items(&items, &adjustments), Ok(()));
    }

    #[test]
    fn test_line_amount_overflow() {
        let items = [
            LineItem::new(dec!(1), dec!(1)),
            LineItem::new(Decimal::MAX, dec!(2)),
        ];
        let err = check_line_items(&items, &[]).unwrap_err();
        assert_eq!(err.figure, "line amount");
        assert_eq!(err.location, "items[1]");
        assert_eq!(err.to_string(), "line amount at items[1] is too large to compute");
    }

    #[test]
    fn test_subtotal_overflow() {
        let items = [
            LineItem::new(Decimal::MAX, dec!(1)),
            LineItem::new(Decimal::MAX, dec!(1)),
        ];
        let err = check_line_items(&items, &[]).unwrap_err();
        assert_eq!(err.figure, "subtotal");
    }

    #[test]
    fn test_grand_total_overflow_from_adjustment() {
        let items = [LineItem::new(Decimal::MAX, dec!(1))];
        let adjustments = [Adjustment::addition("Freight", dec!(1))];
        let err = check_line_items(&items, &adjustments).unwrap_err();
        assert_eq!(err.location, "totals");
    }

    #[test]
    fn test_claim_overflow() {
        let claims = [Claim::new(4, NaiveDate::from_ymd_opt(2024, 1, 31).unwrap())
            .with_item(ClaimItem::new("A", Decimal::MAX, dec!(1), dec!(1)))];
        let err = check_claims(&claims).unwrap_err();
        assert_eq!(err.figure, "cumulative quantity");
        assert_eq!(err.location, "claims[#4]");
    }

    #[test]
    fn test_meter_value_overflow() {
        let readings = [MeterReading::new("P", "T1", dec!(0), Decimal::MAX)];
        let prices = MasterData::new().with_product("P", "Diesel", Some(dec!(2)));
        let err = check_meters(&readings, &[], &prices).unwrap_err();
        assert_eq!(err.figure, "meter value");
        assert_eq!(err.location, "meters[P]");

        assert_eq!(check_meters(&readings, &[], &MasterData::new()), Ok(()));
    }

    #[test]
    fn test_meter_difference_overflow() {
        let readings = [MeterReading::new("P", "T1", Decimal::MIN, Decimal::MAX)];
        let adjustments = [StockAdjustment::new("P", "T1", StockOperator::Minus, dec!(1))];
        let err = check_meters(&readings, &adjustments, &MasterData::new()).unwrap_err();
        assert_eq!(err.figure, "meter difference");
    }
}
