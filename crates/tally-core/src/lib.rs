//! Core types for tally
//!
//! This crate provides the value types that every totals and reconciliation
//! screen is built from:
//!
//! - [`Money`] - A decimal amount with a currency
//! - [`LineItem`] - A priced, optionally taxed unit of a transaction
//! - [`Adjustment`] - A named addition or deduction
//! - [`ClaimItem`] / [`Claim`] - Progress-claim lines and certificates
//! - [`MeterReading`] / [`StockAdjustment`] - Fuel pump readings and tank corrections
//! - [`MasterData`] - Product and tank reference data with placeholder labels
//!
//! # Example
//!
//! ```
//! use tally_core::{Adjustment, LineItem, Money};
//! use rust_decimal_macros::dec;
//!
//! let item = LineItem::new(dec!(10), dec!(5)).with_tax_rate(dec!(18));
//! assert_eq!(item.amount(), dec!(50));
//!
//! let credit = Adjustment::deduction("Credit note", dec!(30));
//! assert_eq!(credit.signed_amount(), dec!(-30));
//!
//! let total = Money::new(dec!(59), "TZS");
//! assert_eq!(total.to_string(), "59 TZS");
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod claim;
pub mod code;
pub mod document;
pub mod format;
pub mod item;
pub mod master;
pub mod meter;
pub mod money;
pub mod unit;

pub use claim::{Claim, ClaimItem};
pub use code::{Code, CodeInterner, CurrencyCode};
pub use document::{AdjustmentBase, Document, MeterSheet, Options};
pub use format::{format_block, format_decimal, format_money, format_row, FormatConfig};
pub use item::{Adjustment, AdjustmentKind, LineItem};
pub use master::{MasterData, PriceList, Product, Tank, UNKNOWN_PRODUCT, UNKNOWN_TANK};
pub use meter::{MeterReading, StockAdjustment, StockOperator};
pub use money::{CurrencyMismatch, Money};
pub use unit::Unit;

// Re-export commonly used external types
pub use chrono::NaiveDate;
pub use rust_decimal::Decimal;
