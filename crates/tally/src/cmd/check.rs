//! Implementation for the tally-check command.

use crate::cmd::{init_logging, OutputFormat};
use crate::load::load_document;
use crate::report;
use anyhow::Result;
use clap::Parser;
use serde::Serialize;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use tally_validate::{count_by_severity, validate};
use tracing::debug;

/// A diagnostic message in JSON format.
#[derive(Debug, Serialize)]
pub struct JsonDiagnostic {
    /// Severity: "error", "warning" or "info"
    pub severity: String,
    /// Error code (e.g., "T1001")
    pub code: String,
    /// Error message
    pub message: String,
    /// Where in the document the problem is
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

/// JSON output structure for all diagnostics.
#[derive(Debug, Serialize)]
pub struct JsonOutput {
    /// Checked file
    pub file: String,
    /// List of diagnostics
    pub diagnostics: Vec<JsonDiagnostic>,
    /// Total error count
    pub error_count: usize,
    /// Total warning count
    pub warning_count: usize,
}

/// Validate a preview document and report problems.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// The JSON document to check
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Output format (text or json)
    #[arg(long, short = 'f', value_enum, default_value = "text")]
    pub format: OutputFormat,

    /// Suppress all output (just use exit code)
    #[arg(short, long)]
    pub quiet: bool,

    /// Show verbose output including timing information
    #[arg(short, long)]
    pub verbose: bool,
}

fn run(args: &Args) -> Result<ExitCode> {
    let mut stdout = io::stdout().lock();
    let start = std::time::Instant::now();

    let document = load_document(&args.file)?;
    let errors = validate(&document);
    let (error_count, warning_count) = count_by_severity(&errors);
    debug!(
        diagnostics = errors.len(),
        error_count, warning_count, "validated document"
    );

    match args.format {
        OutputFormat::Json => {
            let output = JsonOutput {
                file: args.file.display().to_string(),
                diagnostics: errors
                    .iter()
                    .map(|e| JsonDiagnostic {
                        severity: e.severity().to_string(),
                        code: e.code.code().to_string(),
                        message: e.message.clone(),
                        location: e.location.clone(),
                    })
                    .collect(),
                error_count,
                warning_count,
            };
            writeln!(stdout, "{}", serde_json::to_string_pretty(&output)?)?;
        }
        OutputFormat::Text if !args.quiet => {
            report::report_validation_errors(&errors, &mut stdout)?;
            if args.verbose {
                writeln!(
                    stdout,
                    "Checked in {:.2}ms",
                    start.elapsed().as_secs_f64() * 1000.0
                )?;
            }
            report::print_summary(error_count, warning_count, &mut stdout)?;
        }
        OutputFormat::Text => {}
    }

    if error_count > 0 {
        Ok(ExitCode::from(1))
    } else {
        Ok(ExitCode::SUCCESS)
    }
}

/// Main entry point for the check command.
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
