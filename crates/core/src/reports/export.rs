//! Regulatory audit file (FEC) export.
//!
//! The column order, the `YYYYMMDD` dates and the comma-decimal amounts are
//! an external contract. Columns are listed once in [`AUDIT_COLUMNS`] and
//! [`AuditRow::fields`] renders them in that exact order.

use chrono::NaiveDate;
use ohada_shared::types::Currency;
use ohada_shared::types::money::format_comma_decimal;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::ledger::{EntryLine, JournalEntry};

/// Column headers of the audit file, in contract order.
pub const AUDIT_COLUMNS: [&str; 15] = [
    "JournalCode",
    "JournalLib",
    "EcritureNum",
    "EcritureDate",
    "CompteNum",
    "CompteLib",
    "PieceRef",
    "EcritureLib",
    "Debit",
    "Credit",
    "EcritureLet",
    "DateLet",
    "ValidDate",
    "Montantdevise",
    "Idevise",
];

/// Field separator of the rendered file.
pub const AUDIT_SEPARATOR: &str = "\t";

/// Formats a date as `YYYYMMDD`.
#[must_use]
pub fn format_audit_date(date: NaiveDate) -> String {
    date.format("%Y%m%d").to_string()
}

/// Replaces separators and line breaks inside a text column with spaces.
#[must_use]
pub fn audit_text(text: &str) -> String {
    text.replace(['\t', '\r', '\n'], " ")
}

/// One exported line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditRow {
    /// Journal code (`VT`, `AC`, ...).
    pub journal_code: String,
    /// Journal label.
    pub journal_label: String,
    /// Entry number.
    pub entry_number: String,
    /// Entry date.
    pub entry_date: NaiveDate,
    /// Account code.
    pub account_code: String,
    /// Account label at posting time.
    pub account_label: String,
    /// Supporting document reference.
    pub piece_ref: String,
    /// Line label.
    pub line_label: String,
    /// Debit amount.
    pub debit: Decimal,
    /// Credit amount.
    pub credit: Decimal,
    /// Lettering code.
    pub lettering_code: Option<String>,
    /// Lettering date.
    pub lettering_date: Option<NaiveDate>,
    /// Validation date.
    pub validation_date: NaiveDate,
    /// Amount in a foreign currency. The books keep a single currency, so
    /// this is always empty.
    pub foreign_amount: Option<Decimal>,
    /// Foreign currency code.
    pub foreign_currency: Option<Currency>,
}

impl AuditRow {
    /// Builds the row of one line of a validated entry.
    #[must_use]
    pub fn from_line(entry: &JournalEntry, line: &EntryLine) -> Self {
        let entry_number = entry.number().unwrap_or_default();
        Self {
            journal_code: entry.journal.code().to_string(),
            journal_label: entry.journal.label().to_string(),
            piece_ref: entry.reference.clone().unwrap_or_else(|| entry_number.clone()),
            entry_number,
            entry_date: entry.date,
            account_code: line.account_code.clone(),
            account_label: line.account_label.clone(),
            line_label: line.label.clone(),
            debit: line.debit,
            credit: line.credit,
            lettering_code: line.lettering.as_ref().map(|l| l.code.clone()),
            lettering_date: line.lettering.as_ref().map(|l| l.date),
            validation_date: entry.validated_at.map_or(entry.date, |at| at.date_naive()),
            foreign_amount: None,
            foreign_currency: None,
        }
    }

    /// Rendered fields, in [`AUDIT_COLUMNS`] order.
    ///
    /// Text columns go through [`audit_text`] so a row always has exactly
    /// fifteen fields.
    #[must_use]
    pub fn fields(&self) -> [String; 15] {
        [
            audit_text(&self.journal_code),
            audit_text(&self.journal_label),
            audit_text(&self.entry_number),
            format_audit_date(self.entry_date),
            audit_text(&self.account_code),
            audit_text(&self.account_label),
            audit_text(&self.piece_ref),
            audit_text(&self.line_label),
            format_comma_decimal(self.debit),
            format_comma_decimal(self.credit),
            self.lettering_code.as_deref().map(audit_text).unwrap_or_default(),
            self.lettering_date.map(format_audit_date).unwrap_or_default(),
            format_audit_date(self.validation_date),
            self.foreign_amount.map(format_comma_decimal).unwrap_or_default(),
            self.foreign_currency.map(|c| c.to_string()).unwrap_or_default(),
        ]
    }
}

/// The audit file of one fiscal period.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditFile {
    /// Period code.
    pub period_code: String,
    /// Closing date of the period.
    pub closing_date: NaiveDate,
    /// One row per line of every validated entry of the period.
    pub rows: Vec<AuditRow>,
}

impl AuditFile {
    /// Regulatory file name: `<company id>FEC<closing date>.txt`.
    #[must_use]
    pub fn file_name(&self, company_id: &str) -> String {
        format!("{company_id}FEC{}.txt", format_audit_date(self.closing_date))
    }

    /// Renders the header line and every row, separated by tabs.
    #[must_use]
    pub fn render(&self) -> String {
        let mut out = AUDIT_COLUMNS.join(AUDIT_SEPARATOR);
        out.push('\n');
        for row in &self.rows {
            out.push_str(&row.fields().join(AUDIT_SEPARATOR));
            out.push('\n');
        }
        out
    }
}
