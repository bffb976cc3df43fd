//! Financial report generation.
//!
//! This module provides read-side projections over the validated entry log:
//! - Account ledger with opening and running balances
//! - Trial balance with class subtotals
//! - Income statement and balance sheet
//! - VAT declaration
//! - Journal listing
//! - Regulatory audit file export

pub mod error;
pub mod export;
pub mod service;
pub mod types;

#[cfg(test)]
mod tests;

pub use error::ReportError;
pub use export::{AUDIT_COLUMNS, AUDIT_SEPARATOR, AuditFile, AuditRow, audit_text, format_audit_date};
pub use service::{ReportService, report_range};
pub use types::*;
