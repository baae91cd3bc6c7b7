//! Text rendering for previews and diagnostics.

use crate::preview::Preview;
use std::fmt::Write as _;
use std::io::Write;
use tally_core::{format_block, format_decimal, format_money, Decimal, FormatConfig, MasterData};
use tally_validate::ValidationError;

/// Render a preview as aligned text blocks.
pub fn render_preview(preview: &Preview, master: &MasterData, config: &FormatConfig) -> String {
    let mut out = String::new();
    let currency = &preview.currency;
    let amount = |value: Decimal| format!("{} {currency}", format_decimal(value, config));

    if !preview.lines.is_empty() {
        let rows: Vec<(String, String)> = preview
            .lines
            .iter()
            .enumerate()
            .map(|(i, line)| {
                let item = &line.item;
                let description = item.description.as_deref().unwrap_or("Item");
                let unit = item
                    .unit
                    .as_ref()
                    .map(|u| format!(" {u}"))
                    .unwrap_or_default();
                let tax = if item.tax_exempt {
                    "exempt".to_string()
                } else {
                    format!("VAT {}%", item.tax_rate.normalize())
                };
                let label = format!(
                    "{}. {description} ({}{unit} @ {}, {tax})",
                    i + 1,
                    format_decimal(item.quantity, config),
                    format_decimal(item.rate, config),
                );
                (label, amount(line.valuation.total))
            })
            .collect();
        out.push_str(&format_block("Items", &rows, config));

        let rows: Vec<(String, String)> = preview
            .tax_breakdown
            .iter()
            .map(|band| {
                let label = match band.rate {
                    Some(rate) => format!(
                        "{}% on {}",
                        rate,
                        format_decimal(band.taxable_amount, config)
                    ),
                    None => format!("Exempt on {}", format_decimal(band.taxable_amount, config)),
                };
                (label, amount(band.tax))
            })
            .collect();
        out.push_str(&format_block("Tax", &rows, config));
    }

    if !preview.adjustments.is_empty() {
        let rows: Vec<(String, String)> = preview
            .adjustments
            .iter()
            .map(|adj| {
                (
                    format!("{}: {}", adj.kind.label(), adj.description),
                    amount(adj.signed_amount()),
                )
            })
            .collect();
        out.push_str(&format_block("Adjustments", &rows, config));
    }

    let totals = &preview.totals;
    let money = &preview.money;
    let rows = vec![
        ("Subtotal".to_string(), format_money(&money.subtotal, config)),
        ("Tax".to_string(), format_money(&money.tax_total, config)),
        (
            "Adjustments".to_string(),
            format_money(&money.adjustment_total, config),
        ),
        (
            format!("Adjusted {} base", totals.adjustment_base),
            amount(totals.adjusted_base),
        ),
        (
            "Grand total".to_string(),
            format_money(&money.grand_total, config),
        ),
    ];
    out.push_str(&format_block("Totals", &rows, config));

    if let Some(claim) = &preview.claim {
        let mut rows: Vec<(String, String)> = claim
            .reconciliation
            .lines
            .iter()
            .map(|line| {
                let label = format!(
                    "{} {} + {} = {}",
                    line.item.task,
                    format_decimal(line.item.previous_quantity, config),
                    format_decimal(line.item.present_quantity, config),
                    format_decimal(line.cumulative_quantity, config),
                );
                (label, amount(line.cumulative_amount))
            })
            .collect();
        let totals = &claim.reconciliation.totals;
        rows.push(("Previous".to_string(), amount(totals.previous_amount)));
        rows.push(("This claim".to_string(), amount(totals.present_amount)));
        rows.push(("Cumulative".to_string(), amount(totals.cumulative_amount)));
        let title = format!("Claim #{} ({})", claim.number, claim.date);
        out.push_str(&format_block(&title, &rows, config));
    }

    if let Some(meters) = &preview.meters {
        let mut rows: Vec<(String, String)> = Vec::new();
        for product in &meters.reconciliation.products {
            let tanks: Vec<&str> = product
                .tank_ids
                .iter()
                .map(|id| master.tank_label(id))
                .collect();
            let label = format!(
                "{} [{}]",
                master.product_label(&product.product_id),
                tanks.join(", ")
            );
            let mut value = format_decimal(product.final_quantity, config);
            if let Some(v) = product.value(master) {
                write!(value, " = {}", amount(v)).unwrap();
            }
            rows.push((label, value));
        }
        for adjustment in &meters.reconciliation.unmatched_adjustments {
            rows.push((
                format!("Not applied: {} {}", adjustment.product_id, adjustment.operator),
                format_decimal(adjustment.quantity, config),
            ));
        }
        rows.push(("Value".to_string(), amount(meters.value_total)));
        out.push_str(&format_block("Meters", &rows, config));

        let rows: Vec<(String, String)> = meters
            .tanks
            .iter()
            .map(|tank| {
                let label = master.tank_label(&tank.tank_id);
                (
                    format!("{label} ({} readings)", tank.reading_count),
                    format_decimal(tank.difference, config),
                )
            })
            .collect();
        out.push_str(&format_block("Tanks", &rows, config));
    }

    out
}

/// Report validation errors to the given writer.
pub fn report_validation_errors<W: Write>(
    errors: &[ValidationError],
    writer: &mut W,
) -> std::io::Result<()> {
    for error in errors {
        writeln!(
            writer,
            "{}[{}]: {}",
            error.severity(),
            error.code,
            error.message
        )?;
        if let Some(location) = &error.location {
            writeln!(writer, "  at: {location}")?;
        }
        writeln!(writer)?;
    }
    Ok(())
}

/// Print a one-line count of errors and warnings.
pub fn print_summary<W: Write>(
    errors: usize,
    warnings: usize,
    writer: &mut W,
) -> std::io::Result<()> {
    let mut parts = Vec::new();
    if errors > 0 {
        parts.push(count(errors, "error"));
    }
    if warnings > 0 {
        parts.push(count(warnings, "warning"));
    }
    if parts.is_empty() {
        writeln!(writer, "No errors found")
    } else {
        writeln!(writer, "{}", parts.join(", "))
    }
}

fn count(n: usize, noun: &str) -> String {
    if n == 1 {
        format!("1 {noun}")
    } else {
        format!("{n} {noun}s")
    }
}
