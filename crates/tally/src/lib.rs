//! Tally CLI tools.
//!
//! This crate provides command-line tools for working with preview documents:
//!
//! - `tally-preview`: Compute and print line values, totals, claim and meter figures
//! - `tally-check`: Validate a document and print coded diagnostics
//!
//! # Example Usage
//!
//! ```bash
//! tally-preview invoice.json
//! tally-preview --adjustment-base pre-tax --precision 3 invoice.json
//! tally-check --format json shift.json
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod cmd;
pub mod load;
pub mod preview;
pub mod report;
