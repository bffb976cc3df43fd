//! Core business logic for the OHADA ledger.
//!
//! This crate contains pure business logic with ZERO web or database dependencies.
//! All domain types, validation rules, and calculations live here.
//!
//! # Modules
//!
//! - `accounts` - SYSCOHADA chart of accounts and balance projections
//! - `fiscal` - Fiscal period lifecycle
//! - `ledger` - Double-entry bookkeeping logic
//! - `reports` - Financial statements and the audit file export

pub mod accounts;
pub mod fiscal;
pub mod ledger;
pub mod reports;

pub use ledger::{LedgerError, LedgerService};
pub use reports::{ReportError, ReportService};
