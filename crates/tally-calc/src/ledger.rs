//! Cumulative quantity ledger for progress claims.
//!
//! A claim line records what was certified before this period and what is
//! claimed now. Reconciling derives the cumulative quantity and the value of
//! each stage; sequence checking compares consecutive certificates.

use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::HashMap;
use tally_core::{Claim, ClaimItem, Code};
use thiserror::Error;

/// A claim line with its derived figures.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClaimLine {
    /// The input line.
    #[serde(flatten)]
    pub item: ClaimItem,
    /// `previous_quantity + present_quantity`.
    pub cumulative_quantity: Decimal,
    /// `previous_quantity * rate`.
    pub previous_amount: Decimal,
    /// `present_quantity * rate`.
    pub present_amount: Decimal,
    /// `cumulative_quantity * rate`.
    pub cumulative_amount: Decimal,
}

impl ClaimLine {
    /// Derive the figures for one claim item.
    #[must_use]
    pub fn from_item(item: &ClaimItem) -> Self {
        let cumulative_quantity = item.cumulative_quantity();
        Self {
            previous_amount: item.previous_quantity * item.rate,
            present_amount: item.present_quantity * item.rate,
            cumulative_amount: cumulative_quantity * item.rate,
            cumulative_quantity,
            item: item.clone(),
        }
    }
}

/// Sums of the stage amounts across all lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct ClaimTotals {
    /// Σ previous amounts.
    pub previous_amount: Decimal,
    /// Σ present amounts.
    pub present_amount: Decimal,
    /// Σ cumulative amounts.
    pub cumulative_amount: Decimal,
}

impl ClaimTotals {
    fn add(mut self, line: &ClaimLine) -> Self {
        self.previous_amount += line.previous_amount;
        self.present_amount += line.present_amount;
        self.cumulative_amount += line.cumulative_amount;
        self
    }
}

/// Reconciled claim: derived lines plus totals.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct ClaimReconciliation {
    /// One line per input entry, in input order.
    pub lines: Vec<ClaimLine>,
    /// Field-wise sums over `lines`.
    pub totals: ClaimTotals,
}

impl ClaimReconciliation {
    /// Find the line for a task.
    #[must_use]
    pub fn line(&self, task: &str) -> Option<&ClaimLine> {
        self.lines.iter().find(|l| l.item.task == task)
    }
}

/// Derive cumulative quantities and stage amounts for each entry.
///
/// Totals are a plain sum, so they do not depend on entry order. A zero rate
/// gives zero amounts for that entry.
///
/// ```
/// use tally_calc::reconcile;
/// use tally_core::ClaimItem;
/// use rust_decimal_macros::dec;
///
/// let result = reconcile(&[ClaimItem::new("EXC", dec!(40), dec!(10), dec!(2))]);
/// let line = &result.lines[0];
/// assert_eq!(line.cumulative_quantity, dec!(50));
/// assert_eq!(line.previous_amount, dec!(80));
/// assert_eq!(line.present_amount, dec!(20));
/// assert_eq!(line.cumulative_amount, dec!(100));
/// ```
pub fn reconcile(entries: &[ClaimItem]) -> ClaimReconciliation {
    let lines: Vec<ClaimLine> = entries.iter().map(ClaimLine::from_item).collect();
    let totals = lines.iter().fold(ClaimTotals::default(), ClaimTotals::add);
    ClaimReconciliation { lines, totals }
}

/// Starting lines for the next certificate.
///
/// Each task's cumulative quantity becomes its previous quantity, and the
/// present quantity resets to zero.
pub fn carry_forward(lines: &[ClaimLine]) -> Vec<ClaimItem> {
    lines
        .iter()
        .map(|line| ClaimItem {
            previous_quantity: line.cumulative_quantity,
            present_quantity: Decimal::ZERO,
            ..line.item.clone()
        })
        .collect()
}

/// A problem found between consecutive claims for one task.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClaimSequenceIssue {
    /// Cumulative quantity went down.
    #[error(
        "task {task}: cumulative quantity fell from {before} (claim {previous_claim}) to {after} (claim {claim})"
    )]
    Regression {
        /// Task identifier.
        task: Code,
        /// Claim where the drop was observed.
        claim: u32,
        /// Prior claim for this task.
        previous_claim: u32,
        /// Cumulative quantity in the prior claim.
        before: Decimal,
        /// Cumulative quantity in this claim.
        after: Decimal,
    },

    /// Previous quantity does not match the prior claim's cumulative.
    #[error(
        "task {task}: claim {claim} carries previous quantity {found}, but claim {previous_claim} certified {expected}"
    )]
    PreviousMismatch {
        /// Task identifier.
        task: Code,
        /// Claim with the inconsistent figure.
        claim: u32,
        /// Prior claim for this task.
        previous_claim: u32,
        /// Cumulative quantity of the prior claim.
        expected: Decimal,
        /// Previous quantity recorded on this claim.
        found: Decimal,
    },
}

impl ClaimSequenceIssue {
    /// The claim the issue belongs to.
    #[must_use]
    pub const fn claim(&self) -> u32 {
        match self {
            Self::Regression { claim, .. } | Self::PreviousMismatch { claim, .. } => *claim,
        }
    }

    /// The task the issue belongs to.
    #[must_use]
    pub const fn task(&self) -> &Code {
        match self {
            Self::Regression { task, .. } | Self::PreviousMismatch { task, .. } => task,
        }
    }
}

/// Check that cumulative quantities never decrease across a claim sequence.
///
/// Claims are taken in (date, number) order regardless of input order. A task
/// that skips a claim keeps its last cumulative quantity.
pub fn check_claim_sequence(claims: &[Claim]) -> Vec<ClaimSequenceIssue> {
    let mut ordered: Vec<&Claim> = claims.iter().collect();
    ordered.sort_by_key(|c| (c.date, c.number));

    // task -> (claim number, cumulative quantity)
    let mut last_seen: HashMap<Code, (u32, Decimal)> = HashMap::new();
    let mut issues = Vec::new();

    for claim in ordered {
        for item in &claim.items {
            let cumulative = item.cumulative_quantity();
            if let Some(&(previous_claim, before)) = last_seen.get(&item.task) {
                if item.previous_quantity != before {
                    issues.push(ClaimSequenceIssue::PreviousMismatch {
                        task: item.task.clone(),
                        claim: claim.number,
                        previous_claim,
                        expected: before,
                        found: item.previous_quantity,
                    });
                }
                if cumulative < before {
                    issues.push(ClaimSequenceIssue::Regression {
                        task: item.task.clone(),
                        claim: claim.number,
                        previous_claim,
                        before,
                        after: cumulative,
                    });
                }
            }
            last_seen.insert(item.task.clone(), (claim.number, cumulative));
        }
    }

    issues
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use tally_core::NaiveDate;

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    #[test]
    fn test_reconcile_two_entries() {
        let entries = [
            ClaimItem::new("A", dec!(40), dec!(10), dec!(2)),
            ClaimItem::new("B", dec!(40), dec!(10), dec!(2)),
        ];
        let result = reconcile(&entries);
        assert_eq!(result.totals.previous_amount, dec!(160));
        assert_eq!(result.totals.present_amount, dec!(40));
        assert_eq!(result.totals.cumulative_amount, dec!(200));
        assert_eq!(result.line("B").unwrap().cumulative_quantity, dec!(50));
    }

    #[test]
    fn test_zero_rate() {
        let result = reconcile(&[ClaimItem::new("TBD", dec!(3), dec!(4), dec!(0))]);
        let line = &result.lines[0];
        assert_eq!(line.cumulative_quantity, dec!(7));
        assert!(line.previous_amount.is_zero());
        assert!(line.present_amount.is_zero());
        assert!(line.cumulative_amount.is_zero());
    }

    #[test]
    fn test_reconcile_empty() {
        let result = reconcile(&[]);
        assert!(result.lines.is_empty());
        assert_eq!(result.totals, ClaimTotals::default());
    }

    #[test]
    fn test_carry_forward() {
        let result = reconcile(&[
            ClaimItem::new("A", dec!(40), dec!(10), dec!(2)).with_description("Excavation")
        ]);
        let next = carry_forward(&result.lines);
        assert_eq!(next.len(), 1);
        assert_eq!(next[0].previous_quantity, dec!(50));
        assert_eq!(next[0].present_quantity, dec!(0));
        assert_eq!(next[0].rate, dec!(2));
        assert_eq!(next[0].description.as_deref(), Some("Excavation"));
    }

    #[test]
    fn test_consistent_sequence_has_no_issues() {
        let claims = [
            Claim::new(1, date(2024, 1, 31))
                .with_item(ClaimItem::new("A", dec!(0), dec!(10), dec!(5))),
            Claim::new(2, date(2024, 2, 29))
                .with_item(ClaimItem::new("A", dec!(10), dec!(5), dec!(5))),
        ];
        assert!(check_claim_sequence(&claims).is_empty());
    }

    #[test]
    fn test_regression_detected() {
        let claims = [
            Claim::new(1, date(2024, 1, 31))
                .with_item(ClaimItem::new("A", dec!(0), dec!(10), dec!(5))),
            Claim::new(2, date(2024, 2, 29))
                .with_item(ClaimItem::new("A", dec!(10), dec!(-4), dec!(5))),
        ];
        let issues = check_claim_sequence(&claims);
        assert_eq!(
            issues,
            vec![ClaimSequenceIssue::Regression {
                task: Code::new("A"),
                claim: 2,
                previous_claim: 1,
                before: dec!(10),
                after: dec!(6),
            }]
        );
        assert_eq!(issues[0].claim(), 2);
        assert_eq!(issues[0].task(), "A");
    }

    #[test]
    fn test_previous_mismatch_and_input_order() {
        // Second certificate listed first; ordering is by date.
        let claims = [
            Claim::new(2, date(2024, 2, 29))
                .with_item(ClaimItem::new("A", dec!(8), dec!(5), dec!(5))),
            Claim::new(1, date(2024, 1, 31))
                .with_item(ClaimItem::new("A", dec!(0), dec!(10), dec!(5))),
        ];
        let issues = check_claim_sequence(&claims);
        assert_eq!(issues.len(), 1);
        assert!(matches!(
            &issues[0],
            ClaimSequenceIssue::PreviousMismatch { expected, found, .. }
                if *expected == dec!(10) && *found == dec!(8)
        ));
        assert!(issues[0].to_string().contains("claim 1 certified 10"));
    }

    #[test]
    fn test_skipped_task_keeps_last_cumulative() {
        let claims = [
            Claim::new(1, date(2024, 1, 31))
                .with_item(ClaimItem::new("A", dec!(0), dec!(10), dec!(5))),
            Claim::new(2, date(2024, 2, 29))
                .with_item(ClaimItem::new("B", dec!(0), dec!(1), dec!(5))),
            Claim::new(3, date(2024, 3, 31))
                .with_item(ClaimItem::new("A", dec!(10), dec!(0), dec!(5))),
        ];
        assert!(check_claim_sequence(&claims).is_empty());
    }
}
