//! Per-item valuation and the VAT summary.

use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::BTreeMap;
use tally_core::LineItem;

const HUNDRED: Decimal = Decimal::ONE_HUNDRED;

/// Amount, tax and total for one line item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Valuation {
    /// `quantity * rate`.
    pub amount: Decimal,
    /// `amount * tax_rate / 100`, or zero when exempt.
    pub tax: Decimal,
    /// `amount + tax`.
    pub total: Decimal,
}

/// Value a single line item.
///
/// Exempt items and zero-rated items both carry zero tax. Negative
/// quantities or rates flow through unchanged.
///
/// ```
/// use tally_calc::valuate;
/// use tally_core::LineItem;
/// use rust_decimal_macros::dec;
///
/// let item = LineItem::new(dec!(10), dec!(5)).with_tax_rate(dec!(18));
/// let v = valuate(&item);
/// assert_eq!((v.amount, v.tax, v.total), (dec!(50), dec!(9), dec!(59)));
///
/// let v = valuate(&item.exempt());
/// assert_eq!((v.amount, v.tax, v.total), (dec!(50), dec!(0), dec!(50)));
/// ```
pub fn valuate(item: &LineItem) -> Valuation {
    let amount = item.amount();
    let tax = if item.tax_exempt {
        Decimal::ZERO
    } else {
        amount * item.tax_rate / HUNDRED
    };
    Valuation {
        amount,
        tax,
        total: amount + tax,
    }
}

/// Value every item, preserving order.
pub fn valuate_all(items: &[LineItem]) -> Vec<Valuation> {
    items.iter().map(valuate).collect()
}

/// One row of the VAT summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TaxBand {
    /// Tax rate percentage, or `None` for exempt items.
    pub rate: Option<Decimal>,
    /// Sum of pre-tax amounts in this band.
    pub taxable_amount: Decimal,
    /// Sum of tax in this band.
    pub tax: Decimal,
    /// Number of items in this band.
    pub item_count: usize,
}

/// Group items by tax rate.
///
/// Bands are ordered by rate ascending; the exempt band, if any, comes last.
/// Rates are compared by value, so `18` and `18.00` share a band.
pub fn tax_breakdown(items: &[LineItem]) -> Vec<TaxBand> {
    let mut by_rate: BTreeMap<Decimal, TaxBand> = BTreeMap::new();
    let mut exempt: Option<TaxBand> = None;

    for item in items {
        let v = valuate(item);
        let band = if item.tax_exempt {
            exempt.get_or_insert(TaxBand {
                rate: None,
                taxable_amount: Decimal::ZERO,
                tax: Decimal::ZERO,
                item_count: 0,
            })
        } else {
            let key = item.tax_rate.normalize();
            by_rate.entry(key).or_insert(TaxBand {
                rate: Some(key),
                taxable_amount: Decimal::ZERO,
                tax: Decimal::ZERO,
                item_count: 0,
            })
        };
        band.taxable_amount += v.amount;
        band.tax += v.tax;
        band.item_count += 1;
    }

    by_rate.into_values().chain(exempt).collect()
}
