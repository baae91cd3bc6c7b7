//! Preview document validation.
//!
//! The calculations in `tally-calc` accept any in-range input and never fail.
//! This crate looks at a whole [`Document`] and reports what a reviewer should
//! see before trusting the totals, including figures too large to compute.
//!
//! # Error Codes
//!
//! | Code | Description |
//! |------|-------------|
//! | T1001 | Currency differs from the document currency |
//! | T1002 | Tax rate outside 0-100 |
//! | T1003 | Reversal entry (negative quantity or rate) |
//! | T1004 | Document currency is blank |
//! | T1005 | A computed figure exceeds the decimal range |
//! | T2001 | Cumulative claimed quantity decreased |
//! | T2002 | Previous quantity differs from prior cumulative |
//! | T2003 | Duplicate claim number |
//! | T3001 | Reading references unknown product |
//! | T3002 | Reading references unknown tank |
//! | T3003 | Stock adjustment has no matching readings |
//! | T3004 | Closing reading below opening |
//! | T3005 | No price for a metered product |

#![forbid(unsafe_code)]
#![warn(missing_docs)]

use rust_decimal::Decimal;
use std::collections::HashSet;
use tally_calc::{
    check_claim_sequence, check_claims, check_line_items, check_meters, reconcile_meters,
    ClaimSequenceIssue, Overflow,
};
use tally_core::{Document, MasterData, MeterReading, PriceList};
use thiserror::Error;

/// Validation error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // === Document Errors (T1xxx) ===
    /// T1001: Currency differs from the document currency.
    CurrencyMismatch,
    /// T1002: Tax rate outside 0-100.
    TaxRateOutOfRange,
    /// T1003: Negative quantity or rate on a line item.
    ReversalEntry,
    /// T1004: Document currency is blank.
    MissingCurrency,
    /// T1005: A computed figure exceeds the decimal range.
    ValueOverflow,

    // === Claim Errors (T2xxx) ===
    /// T2001: Cumulative quantity decreased between claims.
    CumulativeRegression,
    /// T2002: Previous quantity differs from prior cumulative.
    PreviousQuantityMismatch,
    /// T2003: Two claims share a number.
    DuplicateClaimNumber,

    // === Meter Errors (T3xxx) ===
    /// T3001: Reading references a product missing from master data.
    UnknownProduct,
    /// T3002: Reading references a tank missing from master data.
    UnknownTank,
    /// T3003: Stock adjustment has no readings for its product.
    UnmatchedStockAdjustment,
    /// T3004: Closing reading is below opening.
    NegativeDifference,
    /// T3005: Metered product has no price.
    MissingPrice,
}

impl ErrorCode {
    /// Get the error code string (e.g., "T1001").
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::CurrencyMismatch => "T1001",
            Self::TaxRateOutOfRange => "T1002",
            Self::ReversalEntry => "T1003",
            Self::MissingCurrency => "T1004",
            Self::ValueOverflow => "T1005",
            Self::CumulativeRegression => "T2001",
            Self::PreviousQuantityMismatch => "T2002",
            Self::DuplicateClaimNumber => "T2003",
            Self::UnknownProduct => "T3001",
            Self::UnknownTank => "T3002",
            Self::UnmatchedStockAdjustment => "T3003",
            Self::NegativeDifference => "T3004",
            Self::MissingPrice => "T3005",
        }
    }

    /// Check if this is a warning (not an error).
    #[must_use]
    pub const fn is_warning(&self) -> bool {
        !matches!(
            self,
            Self::CurrencyMismatch
                | Self::MissingCurrency
                | Self::ValueOverflow
                | Self::CumulativeRegression
        ) && !self.is_info()
    }

    /// Check if this is just informational.
    #[must_use]
    pub const fn is_info(&self) -> bool {
        matches!(self, Self::ReversalEntry)
    }

    /// Get the severity level.
    #[must_use]
    pub const fn severity(&self) -> Severity {
        if self.is_info() {
            Severity::Info
        } else if self.is_warning() {
            Severity::Warning
        } else {
            Severity::Error
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Severity level for validation messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Severity {
    /// Totals cannot be trusted.
    Error,
    /// Suspicious but computable.
    Warning,
    /// Informational only.
    Info,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Error => write!(f, "error"),
            Self::Warning => write!(f, "warning"),
            Self::Info => write!(f, "info"),
        }
    }
}

/// A validation error.
#[derive(Debug, Clone, Error)]
#[error("[{code}] {message}")]
pub struct ValidationError {
    /// Error code.
    pub code: ErrorCode,
    /// Error message.
    pub message: String,
    /// Where in the document, e.g. `items[2]` or `claims[#3]`.
    pub location: Option<String>,
}

impl ValidationError {
    /// Create a new validation error.
    #[must_use]
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            location: None,
        }
    }

    /// Attach a location.
    #[must_use]
    pub fn at(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    /// Severity of this error's code.
    #[must_use]
    pub const fn severity(&self) -> Severity {
        self.code.severity()
    }
}

/// Validate a preview document.
///
/// Returns errors, warnings and info messages in document order: items,
/// adjustments, claims, then meters. A section with a T1005 overflow skips
/// the checks that would have to compute its figures.
pub fn validate(document: &Document) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    validate_currency(document, &mut errors);
    validate_items(document, &mut errors);
    validate_claims(document, &mut errors);
    validate_meters(document, &mut errors);

    errors
}

fn overflow_error(overflow: &Overflow) -> ValidationError {
    ValidationError::new(
        ErrorCode::ValueOverflow,
        format!("{} is too large to compute", overflow.figure),
    )
    .at(overflow.location.clone())
}

/// Count errors and warnings (info messages are not counted).
pub fn count_by_severity(errors: &[ValidationError]) -> (usize, usize) {
    let error_count = errors
        .iter()
        .filter(|e| e.severity() == Severity::Error)
        .count();
    let warning_count = errors
        .iter()
        .filter(|e| e.severity() == Severity::Warning)
        .count();
    (error_count, warning_count)
}

fn validate_currency(document: &Document, errors: &mut Vec<ValidationError>) {
    if document.currency.is_empty() {
        errors.push(
            ValidationError::new(ErrorCode::MissingCurrency, "Document currency is blank")
                .at("currency"),
        );
        return;
    }

    for (i, adjustment) in document.adjustments.iter().enumerate() {
        if let Some(currency) = &adjustment.currency {
            if *currency != document.currency {
                errors.push(
                    ValidationError::new(
                        ErrorCode::CurrencyMismatch,
                        format!(
                            "Adjustment \"{}\" is in {currency}, document is in {}",
                            adjustment.description, document.currency
                        ),
                    )
                    .at(format!("adjustments[{i}]")),
                );
            }
        }
    }

    for product in &document.master_data.products {
        if let Some(currency) = &product.currency {
            if *currency != document.currency {
                errors.push(
                    ValidationError::new(
                        ErrorCode::CurrencyMismatch,
                        format!(
                            "Price for product {} is in {currency}, document is in {}",
                            product.id, document.currency
                        ),
                    )
                    .at(format!("master_data.products[{}]", product.id)),
                );
            }
        }
    }
}

fn validate_items(document: &Document, errors: &mut Vec<ValidationError>) {
    if let Err(overflow) = check_line_items(&document.items, &document.adjustments) {
        errors.push(overflow_error(&overflow));
    }

    for (i, item) in document.items.iter().enumerate() {
        if item.tax_rate < Decimal::ZERO || item.tax_rate > Decimal::ONE_HUNDRED {
            errors.push(
                ValidationError::new(
                    ErrorCode::TaxRateOutOfRange,
                    format!("Tax rate {} is outside 0-100", item.tax_rate),
                )
                .at(format!("items[{i}]")),
            );
        }
        if item.is_reversal() {
            errors.push(
                ValidationError::new(
                    ErrorCode::ReversalEntry,
                    format!(
                        "Reversal entry: quantity {} at rate {}",
                        item.quantity, item.rate
                    ),
                )
                .at(format!("items[{i}]")),
            );
        }
    }
}

fn validate_claims(document: &Document, errors: &mut Vec<ValidationError>) {
    let mut seen = HashSet::new();
    for claim in &document.claims {
        if !seen.insert(claim.number) {
            errors.push(
                ValidationError::new(
                    ErrorCode::DuplicateClaimNumber,
                    format!("Claim number {} appears more than once", claim.number),
                )
                .at(format!("claims[#{}]", claim.number)),
            );
        }
    }

    if let Err(overflow) = check_claims(&document.claims) {
        errors.push(overflow_error(&overflow));
        return;
    }

    for issue in check_claim_sequence(&document.claims) {
        let code = match issue {
            ClaimSequenceIssue::Regression { .. } => ErrorCode::CumulativeRegression,
            ClaimSequenceIssue::PreviousMismatch { .. } => ErrorCode::PreviousQuantityMismatch,
        };
        let location = format!("claims[#{}].{}", issue.claim(), issue.task());
        errors.push(ValidationError::new(code, issue.to_string()).at(location));
    }
}

fn validate_meters(document: &Document, errors: &mut Vec<ValidationError>) {
    let sheet = &document.meters;
    let master = &document.master_data;

    for (i, reading) in sheet.readings.iter().enumerate() {
        check_reference_data(reading, master, i, errors);
        if reading.closing < reading.opening {
            errors.push(
                ValidationError::new(
                    ErrorCode::NegativeDifference,
                    format!(
                        "Closing reading {} is below opening {}",
                        reading.closing, reading.opening
                    ),
                )
                .at(format!("meters.readings[{i}]")),
            );
        }
    }

    if let Err(overflow) = check_meters(&sheet.readings, &sheet.adjustments, master) {
        errors.push(overflow_error(&overflow));
        return;
    }

    let reconciliation = reconcile_meters(&sheet.readings, &sheet.adjustments);
    for adjustment in &reconciliation.unmatched_adjustments {
        errors.push(
            ValidationError::new(
                ErrorCode::UnmatchedStockAdjustment,
                format!(
                    "Stock adjustment {}{} for product {} has no readings and was not applied",
                    adjustment.operator, adjustment.quantity, adjustment.product_id
                ),
            )
            .at("meters.adjustments"),
        );
    }

    if !master.products.is_empty() {
        for product in &reconciliation.products {
            if master.price_for(&product.product_id).is_none() {
                errors.push(
                    ValidationError::new(
                        ErrorCode::MissingPrice,
                        format!(
                            "No price for product {} ({})",
                            product.product_id,
                            master.product_label(&product.product_id)
                        ),
                    )
                    .at("master_data.products"),
                );
            }
        }
    }
}

fn check_reference_data(
    reading: &MeterReading,
    master: &MasterData,
    index: usize,
    errors: &mut Vec<ValidationError>,
) {
    if !master.products.is_empty() && master.product(&reading.product_id).is_none() {
        errors.push(
            ValidationError::new(
                ErrorCode::UnknownProduct,
                format!("Unknown product {}", reading.product_id),
            )
            .at(format!("meters.readings[{index}]")),
        );
    }
    if !master.tanks.is_empty() && master.tank(&reading.tank_id).is_none() {
        errors.push(
            ValidationError::new(
                ErrorCode::UnknownTank,
                format!("Unknown tank {}", reading.tank_id),
            )
            .at(format!("meters.readings[{index}]")),
        );
    }
}
