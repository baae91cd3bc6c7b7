//! Progress claims and subcontract certificates.
//!
//! Each certificate lists, per task, what was certified before this period
//! and what is claimed now. Cumulative figures are derived, never stored.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::code::Code;
use crate::unit::Unit;

/// One task's line on a claim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimItem {
    /// Task or deliverable identifier.
    pub task: Code,
    /// Task description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Unit of measure.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<Unit>,
    /// Quantity certified in earlier periods.
    #[serde(default)]
    pub previous_quantity: Decimal,
    /// Quantity claimed in this period.
    #[serde(default)]
    pub present_quantity: Decimal,
    /// Contract rate; zero when the task is not yet priced.
    #[serde(default)]
    pub rate: Decimal,
}

impl ClaimItem {
    /// Create a claim line.
    #[must_use]
    pub fn new(
        task: impl Into<Code>,
        previous_quantity: Decimal,
        present_quantity: Decimal,
        rate: Decimal,
    ) -> Self {
        Self {
            task: task.into(),
            description: None,
            unit: None,
            previous_quantity,
            present_quantity,
            rate,
        }
    }

    /// Set the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// `previous_quantity + present_quantity`.
    #[must_use]
    pub fn cumulative_quantity(&self) -> Decimal {
        self.previous_quantity + self.present_quantity
    }
}

/// One certificate in a sequence of claims.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claim {
    /// Certificate number.
    pub number: u32,
    /// Certificate date.
    pub date: NaiveDate,
    /// Per-task lines.
    #[serde(default)]
    pub items: Vec<ClaimItem>,
}

impl Claim {
    /// Create an empty claim.
    #[must_use]
    pub const fn new(number: u32, date: NaiveDate) -> Self {
        Self {
            number,
            date,
            items: Vec::new(),
        }
    }

    /// Add a line.
    #[must_use]
    pub fn with_item(mut self, item: ClaimItem) -> Self {
        self.items.push(item);
        self
    }

    /// Find the line for a task.
    #[must_use]
    pub fn item(&self, task: &str) -> Option<&ClaimItem> {
        self.items.iter().find(|i| i.task == task)
    }
}
