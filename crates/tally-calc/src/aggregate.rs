//! Document totals: subtotal, tax, adjustments and grand total.

use rust_decimal::Decimal;
use serde::Serialize;
use tally_core::{Adjustment, AdjustmentBase, CurrencyCode, LineItem, Money};

use crate::adjust::adjustment_total;
use crate::valuation::valuate;

/// Aggregated figures for a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Totals {
    /// Σ item amounts.
    pub subtotal: Decimal,
    /// Σ item tax.
    pub tax_total: Decimal,
    /// Σ signed adjustments.
    pub adjustment_total: Decimal,
    /// `subtotal + tax_total + adjustment_total`.
    pub grand_total: Decimal,
    /// The base adjustments were evaluated against.
    pub adjustment_base: AdjustmentBase,
    /// `subtotal` for pre-tax, `subtotal + tax_total` for post-tax.
    pub base: Decimal,
    /// `base + adjustment_total`.
    pub adjusted_base: Decimal,
}

impl Totals {
    /// All-zero totals.
    #[must_use]
    pub const fn zero(adjustment_base: AdjustmentBase) -> Self {
        Self {
            subtotal: Decimal::ZERO,
            tax_total: Decimal::ZERO,
            adjustment_total: Decimal::ZERO,
            grand_total: Decimal::ZERO,
            adjustment_base,
            base: Decimal::ZERO,
            adjusted_base: Decimal::ZERO,
        }
    }

    /// Attach a currency for display.
    #[must_use]
    pub fn to_money(&self, currency: impl Into<CurrencyCode>) -> MoneyTotals {
        let currency = currency.into();
        MoneyTotals {
            subtotal: Money::new(self.subtotal, currency.clone()),
            tax_total: Money::new(self.tax_total, currency.clone()),
            adjustment_total: Money::new(self.adjustment_total, currency.clone()),
            grand_total: Money::new(self.grand_total, currency),
        }
    }
}

/// [`Totals`] expressed as money.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MoneyTotals {
    /// Σ item amounts.
    pub subtotal: Money,
    /// Σ item tax.
    pub tax_total: Money,
    /// Σ signed adjustments.
    pub adjustment_total: Money,
    /// Grand total.
    pub grand_total: Money,
}

/// Aggregate items and adjustments into document totals.
///
/// An empty item list is not an error: it yields zero subtotal and tax, which
/// is what an editor shows before the first line is entered.
///
/// ```
/// use tally_calc::{aggregate, AdjustmentBase};
/// use tally_core::{Adjustment, LineItem};
/// use rust_decimal_macros::dec;
///
/// let items = [LineItem::new(dec!(10), dec!(5)).with_tax_rate(dec!(18))];
/// let adjustments = [Adjustment::deduction("Discount", dec!(4))];
///
/// let totals = aggregate(&items, &adjustments, AdjustmentBase::PostTax);
/// assert_eq!(totals.subtotal, dec!(50));
/// assert_eq!(totals.tax_total, dec!(9));
/// assert_eq!(totals.adjustment_total, dec!(-4));
/// assert_eq!(totals.grand_total, dec!(55));
/// assert_eq!(totals.adjusted_base, dec!(55));
/// ```
pub fn aggregate(
    items: &[LineItem],
    adjustments: &[Adjustment],
    adjustment_base: AdjustmentBase,
) -> Totals {
    let (subtotal, tax_total) = items.iter().map(valuate).fold(
        (Decimal::ZERO, Decimal::ZERO),
        |(amount, tax), v| (amount + v.amount, tax + v.tax),
    );
    let adjustment_total = adjustment_total(adjustments);

    let base = match adjustment_base {
        AdjustmentBase::PreTax => subtotal,
        AdjustmentBase::PostTax => subtotal + tax_total,
    };

    Totals {
        subtotal,
        tax_total,
        adjustment_total,
        grand_total: subtotal + tax_total + adjustment_total,
        adjustment_base,
        base,
        adjusted_base: base + adjustment_total,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_empty_is_all_zero() {
        let totals = aggregate(&[], &[], AdjustmentBase::PostTax);
        assert_eq!(totals, Totals::zero(AdjustmentBase::PostTax));
    }

    #[test]
    fn test_adjustments_without_items() {
        let totals = aggregate(
            &[],
            &[Adjustment::addition("Transport", dec!(20))],
            AdjustmentBase::PreTax,
        );
        assert_eq!(totals.subtotal, dec!(0));
        assert_eq!(totals.grand_total, dec!(20));
    }

    #[test]
    fn test_base_choice_changes_only_base_figures() {
        let items = [
            LineItem::new(dec!(10), dec!(5)).with_tax_rate(dec!(18)),
            LineItem::new(dec!(1), dec!(20)).exempt(),
        ];
        let adjustments = [
            Adjustment::addition("Debit note", dec!(100)),
            Adjustment::deduction("Credit note", dec!(30)),
        ];

        let pre = aggregate(&items, &adjustments, AdjustmentBase::PreTax);
        let post = aggregate(&items, &adjustments, AdjustmentBase::PostTax);

        assert_eq!(pre.subtotal, dec!(70));
        assert_eq!(pre.tax_total, dec!(9));
        assert_eq!(pre.adjustment_total, dec!(70));
        assert_eq!(pre.grand_total, dec!(149));
        assert_eq!(pre.grand_total, post.grand_total);

        assert_eq!(pre.base, dec!(70));
        assert_eq!(pre.adjusted_base, dec!(140));
        assert_eq!(post.base, dec!(79));
        assert_eq!(post.adjusted_base, dec!(149));
    }

    #[test]
    fn test_to_money() {
        let totals = aggregate(
            &[LineItem::new(dec!(2), dec!(7.5))],
            &[],
            AdjustmentBase::default(),
        );
        let money = totals.to_money("USD");
        assert_eq!(money.grand_total, Money::new(dec!(15), "USD"));
        assert_eq!(money.tax_total.currency, "USD");
    }
}
