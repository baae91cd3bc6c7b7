//! Implementation for the tally-preview command.

use crate::cmd::{init_logging, OutputFormat};
use crate::load::load_document;
use crate::preview::Preview;
use crate::report;
use anyhow::{Context, Result};
use clap::Parser;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use tally_core::AdjustmentBase;
use tally_validate::{validate, Severity};
use tracing::{debug, warn};

/// Compute line values, totals, claim and meter figures for a document.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// The JSON document to preview
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Output format (text or json)
    #[arg(long, short = 'f', value_enum, default_value = "text")]
    pub format: OutputFormat,

    /// Figure adjustments are applied to (overrides the document option)
    #[arg(long, value_name = "BASE")]
    pub adjustment_base: Option<AdjustmentBase>,

    /// Decimal places for display (overrides the document option)
    #[arg(long, short = 'p', value_name = "N")]
    pub precision: Option<u32>,

    /// Show debug logging on stderr
    #[arg(short, long)]
    pub verbose: bool,
}

fn run(args: &Args) -> Result<ExitCode> {
    let mut stdout = io::stdout().lock();
    let document = load_document(&args.file)?;

    let base = args
        .adjustment_base
        .unwrap_or(document.options.adjustment_base);
    let mut config = document.options.format_config();
    if let Some(precision) = args.precision {
        config.precision = precision;
    }
    debug!(%base, precision = config.precision, "computing preview");

    for error in validate(&document) {
        if error.severity() == Severity::Error {
            warn!(code = %error.code, "{}", error.message);
        } else {
            debug!(code = %error.code, "{}", error.message);
        }
    }

    let preview = Preview::try_build(&document, base)
        .with_context(|| format!("cannot preview {}", args.file.display()))?;

    match args.format {
        OutputFormat::Json => {
            writeln!(stdout, "{}", serde_json::to_string_pretty(&preview)?)?;
        }
        OutputFormat::Text => {
            write!(
                stdout,
                "{}",
                report::render_preview(&preview, &document.master_data, &config)
            )?;
        }
    }

    Ok(ExitCode::SUCCESS)
}

/// Main entry point for the preview command.
pub fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.verbose);

    match run(&args) {
        Ok(exit_code) => exit_code,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::from(2)
        }
    }
}
