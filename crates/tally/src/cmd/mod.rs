//! Command implementations for CLI tools.
//!
//! Each module contains the full implementation for a command,
//! which can be invoked by thin wrapper binaries.

pub mod check;
pub mod preview;

use clap::ValueEnum;
use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Output format for command results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output (default)
    #[default]
    Text,
    /// JSON output for tooling integration
    Json,
}

/// Install the tracing subscriber.
///
/// `--verbose` forces DEBUG; otherwise `RUST_LOG` is honored when set.
pub fn init_logging(verbose: bool) {
    let builder = tracing_subscriber::fmt().with_writer(std::io::stderr);
    if verbose {
        builder.with_max_level(Level::DEBUG).init();
    } else if std::env::var_os("RUST_LOG").is_some() {
        builder.with_env_filter(EnvFilter::from_default_env()).init();
    }
}
