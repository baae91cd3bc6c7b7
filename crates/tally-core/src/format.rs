//! Display formatting for money and quantities.
//!
//! This is the only place values are rounded. Calculations keep full decimal
//! precision and hand their results here for printing.

use rust_decimal::{Decimal, RoundingStrategy};
use std::fmt::Write;

use crate::Money;

/// Formatter configuration.
#[derive(Debug, Clone)]
pub struct FormatConfig {
    /// Decimal places shown (default: 2).
    pub precision: u32,
    /// Group the integer part in thousands (default: true).
    pub thousands_separator: bool,
    /// Column to right-align amounts to in report rows (default: 60).
    pub amount_column: usize,
    /// Indentation for report rows.
    pub indent: String,
}

impl Default for FormatConfig {
    fn default() -> Self {
        Self {
            precision: 2,
            thousands_separator: true,
            amount_column: 60,
            indent: "  ".to_string(),
        }
    }
}

impl FormatConfig {
    /// Create a config with the given precision.
    #[must_use]
    pub fn with_precision(precision: u32) -> Self {
        Self {
            precision,
            ..Default::default()
        }
    }

    /// Create a config with the given amount column.
    #[must_use]
    pub fn with_column(column: usize) -> Self {
        Self {
            amount_column: column,
            ..Default::default()
        }
    }

    /// Disable thousands grouping.
    #[must_use]
    pub fn without_grouping(mut self) -> Self {
        self.thousands_separator = false;
        self
    }
}

/// Round half away from zero to the configured precision and render.
///
/// ```
/// use tally_core::format::{format_decimal, FormatConfig};
/// use rust_decimal_macros::dec;
///
/// let config = FormatConfig::default();
/// assert_eq!(format_decimal(dec!(1234567.005), &config), "1,234,567.01");
/// assert_eq!(format_decimal(dec!(-70), &config), "-70.00");
/// ```
pub fn format_decimal(value: Decimal, config: &FormatConfig) -> String {
    let mut rounded =
        value.round_dp_with_strategy(config.precision, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(config.precision);
    let text = rounded.to_string();

    if !config.thousands_separator {
        return text;
    }

    let (sign, unsigned) = match text.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", text.as_str()),
    };
    let (int_part, frac_part) = match unsigned.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (unsigned, None),
    };

    let mut out = String::with_capacity(text.len() + int_part.len() / 3);
    out.push_str(sign);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    if let Some(frac) = frac_part {
        out.push('.');
        out.push_str(frac);
    }
    out
}

/// Render money as `"<amount> <currency>"`.
pub fn format_money(money: &Money, config: &FormatConfig) -> String {
    format!("{} {}", format_decimal(money.amount, config), money.currency)
}

/// Render a label and value on one line with the value right-aligned to
/// `amount_column`.
pub fn format_row(label: &str, value: &str, config: &FormatConfig) -> String {
    let mut line = String::new();
    line.push_str(&config.indent);
    line.push_str(label);

    let target_col = config.amount_column.saturating_sub(value.chars().count());
    let current = line.chars().count();
    if current < target_col {
        for _ in 0..target_col - current {
            line.push(' ');
        }
    } else {
        line.push_str("  ");
    }
    line.push_str(value);
    line
}

/// Render a titled block of rows followed by a blank line.
///
/// ```
/// use tally_core::{format_block, FormatConfig};
///
/// let rows = vec![("Subtotal".to_string(), "70.00".to_string())];
/// let block = format_block("Totals", &rows, &FormatConfig::default());
/// assert!(block.starts_with("Totals\n  Subtotal"));
/// assert!(block.ends_with("70.00\n\n"));
/// ```
pub fn format_block(title: &str, rows: &[(String, String)], config: &FormatConfig) -> String {
    let mut out = String::new();
    writeln!(out, "{title}").unwrap();
    for (label, value) in rows {
        writeln!(out, "{}", format_row(label, value, config)).unwrap();
    }
    out.push('\n');
    out
}
