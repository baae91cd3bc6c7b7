//! Totals and reconciliation arithmetic for ERP previews.
//!
//! This crate provides the calculations shared by receipts, purchase orders,
//! GRNs, invoice adjustments, progress claims and fuel-shift reports:
//!
//! - [`valuate`] - amount, tax and total for one line item
//! - [`apply_adjustments`] - layer signed additions/deductions onto a base
//! - [`aggregate`] - subtotal, tax, adjustments and grand total for a document
//! - [`reconcile`] - cumulative quantities and amounts for claim lines
//! - [`reconcile_meters`] - pump differences merged by product, with stock adjustments
//!
//! Every function is pure: inputs are borrowed, results are new values, and
//! nothing is rounded. Round at display time with [`tally_core::format`].
//! Inputs near the `Decimal` limits make the arithmetic panic; run
//! [`check_line_items`], [`check_claims`] and [`check_meters`] first when the
//! document comes from outside.
//!
//! # Example
//!
//! ```
//! use tally_calc::{aggregate, AdjustmentBase};
//! use tally_core::{Adjustment, LineItem};
//! use rust_decimal_macros::dec;
//!
//! let items = [
//!     LineItem::new(dec!(10), dec!(5)).with_tax_rate(dec!(18)),
//!     LineItem::new(dec!(1), dec!(20)).exempt(),
//! ];
//! let adjustments = [
//!     Adjustment::addition("Debit note", dec!(100)),
//!     Adjustment::deduction("Credit note", dec!(30)),
//! ];
//!
//! let totals = aggregate(&items, &adjustments, AdjustmentBase::PostTax);
//! assert_eq!(totals.grand_total, dec!(149));
//! assert_eq!(
//!     totals.grand_total,
//!     totals.subtotal + totals.tax_total + totals.adjustment_total
//! );
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod adjust;
mod aggregate;
mod bounds;
mod ledger;
mod meters;
mod valuation;

pub use adjust::{adjustment_total, apply_adjustments};
pub use aggregate::{aggregate, MoneyTotals, Totals};
pub use bounds::{check_claims, check_line_items, check_meters, Overflow};
pub use ledger::{
    carry_forward, check_claim_sequence, reconcile, ClaimLine, ClaimReconciliation,
    ClaimSequenceIssue, ClaimTotals,
};
pub use meters::{reconcile_meters, tank_totals, MeterReconciliation, ProductTotal, TankTotal};
pub use valuation::{tax_breakdown, valuate, valuate_all, TaxBand, Valuation};
pub use tally_core::AdjustmentBase;
