//! Layering signed additions and deductions onto a base figure.

use rust_decimal::Decimal;
use tally_core::{Adjustment, Money};

/// Sum of the signed amounts of `adjustments`.
pub fn adjustment_total(adjustments: &[Adjustment]) -> Decimal {
    adjustments.iter().map(Adjustment::signed_amount).sum()
}

/// Apply adjustments to `base`.
///
/// The result is `base + Σ signed_amount`, in the base's currency. Order does
/// not matter.
///
/// ```
/// use tally_calc::apply_adjustments;
/// use tally_core::{Adjustment, Money};
/// use rust_decimal_macros::dec;
///
/// let base = Money::new(dec!(1000), "TZS");
/// let adjusted = apply_adjustments(
///     &base,
///     &[
///         Adjustment::addition("Variation", dec!(100)),
///         Adjustment::deduction("Retention", dec!(30)),
///     ],
/// );
/// assert_eq!(adjusted, Money::new(dec!(1070), "TZS"));
/// ```
pub fn apply_adjustments(base: &Money, adjustments: &[Adjustment]) -> Money {
    base.with_amount(base.amount + adjustment_total(adjustments))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_empty_adjustments_leave_base() {
        let base = Money::new(dec!(59), "USD");
        assert_eq!(apply_adjustments(&base, &[]), base);
        assert_eq!(adjustment_total(&[]), Decimal::ZERO);
    }

    #[test]
    fn test_order_does_not_matter() {
        let base = Money::new(dec!(500), "USD");
        let forward = [
            Adjustment::addition("Debit note", dec!(100)),
            Adjustment::deduction("Credit note", dec!(30)),
        ];
        let mut reversed = forward.clone();
        reversed.reverse();

        let a = apply_adjustments(&base, &forward);
        let b = apply_adjustments(&base, &reversed);
        assert_eq!(a, b);
        assert_eq!(a.amount, dec!(570));
    }

    #[test]
    fn test_net_deduction_can_go_negative() {
        let base = Money::new(dec!(10), "TZS");
        let adjusted = apply_adjustments(&base, &[Adjustment::deduction("Write-off", dec!(25))]);
        assert_eq!(adjusted.amount, dec!(-15));
        assert_eq!(adjusted.currency, "TZS");
    }
}
