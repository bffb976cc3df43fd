//! Journal entry aggregate and its lines.

use chrono::{DateTime, NaiveDate, Utc};
use ohada_shared::types::{AccountId, ActorId, EntryId, EntryLineId, FiscalPeriodId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::types::{EntryStatus, EntryTotals, JournalCode, SourceDocument};
use crate::accounts::Account;

/// Lettering stamp shared by every line of one reconciliation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lettering {
    /// Reconciliation code, unique per account.
    pub code: String,
    /// When the lines were matched.
    pub date: NaiveDate,
}

/// A single debit or credit line.
///
/// Exactly one of `debit` and `credit` is positive. The account code and label
/// are snapshots taken at posting time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryLine {
    /// Unique identifier for this line.
    pub id: EntryLineId,
    /// The account affected.
    pub account_id: AccountId,
    /// Account code at posting time.
    pub account_code: String,
    /// Account label at posting time.
    pub account_label: String,
    /// Line label.
    pub label: String,
    /// Debit amount.
    pub debit: Decimal,
    /// Credit amount.
    pub credit: Decimal,
    /// Set once the line is reconciled.
    pub lettering: Option<Lettering>,
}

impl EntryLine {
    /// Creates a debit line.
    #[must_use]
    pub fn debit(account: &Account, label: impl Into<String>, amount: Decimal) -> Self {
        Self::new(account, label.into(), amount, Decimal::ZERO)
    }

    /// Creates a credit line.
    #[must_use]
    pub fn credit(account: &Account, label: impl Into<String>, amount: Decimal) -> Self {
        Self::new(account, label.into(), Decimal::ZERO, amount)
    }

    /// Creates a line with explicit amounts.
    #[must_use]
    pub fn new(account: &Account, label: String, debit: Decimal, credit: Decimal) -> Self {
        Self {
            id: EntryLineId::new(),
            account_id: account.id,
            account_code: account.code.clone(),
            account_label: account.label.clone(),
            label,
            debit,
            credit,
            lettering: None,
        }
    }

    /// The same line with debit and credit exchanged, under a fresh id.
    #[must_use]
    pub fn swapped(&self, label: String) -> Self {
        Self {
            id: EntryLineId::new(),
            account_id: self.account_id,
            account_code: self.account_code.clone(),
            account_label: self.account_label.clone(),
            label,
            debit: self.credit,
            credit: self.debit,
            lettering: None,
        }
    }

    /// Returns the signed amount (positive for debit, negative for credit).
    #[must_use]
    pub fn signed_amount(&self) -> Decimal {
        self.debit - self.credit
    }

    /// Returns true if the line carries a reconciliation code.
    #[must_use]
    pub fn is_reconciled(&self) -> bool {
        self.lettering.is_some()
    }
}

/// A journal entry: a balanced set of lines in one journal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalEntry {
    /// Unique identifier.
    pub id: EntryId,
    /// Journal the entry belongs to.
    pub journal: JournalCode,
    /// Per-journal sequence, assigned at validation.
    pub sequence: Option<u64>,
    /// Posting date.
    pub date: NaiveDate,
    /// Entry label.
    pub label: String,
    /// Free-text reference (document number).
    pub reference: Option<String>,
    /// Fiscal period the entry is booked in.
    pub period_id: FiscalPeriodId,
    /// Ordered lines.
    pub lines: Vec<EntryLine>,
    /// Current status.
    pub status: EntryStatus,
    /// Cached sum of debits.
    pub total_debit: Decimal,
    /// Cached sum of credits.
    pub total_credit: Decimal,
    /// Originating business document.
    pub source: SourceDocument,
    /// True for entries cancelling another entry.
    pub is_reversal: bool,
    /// The entry this one reverses.
    pub origin_entry: Option<EntryId>,
    /// Who created the entry.
    pub created_by: ActorId,
    /// When the entry was created.
    pub created_at: DateTime<Utc>,
    /// Who validated the entry.
    pub validated_by: Option<ActorId>,
    /// When the entry was validated.
    pub validated_at: Option<DateTime<Utc>>,
    /// Set when a draft is deleted.
    pub deleted_at: Option<DateTime<Utc>>,
}

impl JournalEntry {
    /// Creates a draft entry and caches its totals.
    #[must_use]
    #[allow(clippy::too_many_arguments)]
    pub fn draft(
        journal: JournalCode,
        date: NaiveDate,
        label: String,
        reference: Option<String>,
        period_id: FiscalPeriodId,
        lines: Vec<EntryLine>,
        source: SourceDocument,
        created_by: ActorId,
    ) -> Self {
        let totals = EntryTotals::from_amounts(lines.iter().map(|l| (l.debit, l.credit)));
        Self {
            id: EntryId::new(),
            journal,
            sequence: None,
            date,
            label,
            reference,
            period_id,
            lines,
            status: EntryStatus::Draft,
            total_debit: totals.debit,
            total_credit: totals.credit,
            source,
            is_reversal: false,
            origin_entry: None,
            created_by,
            created_at: Utc::now(),
            validated_by: None,
            validated_at: None,
            deleted_at: None,
        }
    }

    /// Replaces the lines and refreshes the cached totals.
    pub fn set_lines(&mut self, lines: Vec<EntryLine>) {
        let totals = EntryTotals::from_amounts(lines.iter().map(|l| (l.debit, l.credit)));
        self.lines = lines;
        self.total_debit = totals.debit;
        self.total_credit = totals.credit;
    }

    /// Totals recomputed from the lines.
    #[must_use]
    pub fn totals(&self) -> EntryTotals {
        EntryTotals::from_amounts(self.lines.iter().map(|l| (l.debit, l.credit)))
    }

    /// Returns true for validated entries.
    #[must_use]
    pub fn is_validated(&self) -> bool {
        self.status == EntryStatus::Validated
    }

    /// Returns true while the entry can be edited.
    #[must_use]
    pub fn is_draft(&self) -> bool {
        self.status == EntryStatus::Draft && self.deleted_at.is_none()
    }

    /// Journal-prefixed entry number, e.g. `VT000001`.
    #[must_use]
    pub fn number(&self) -> Option<String> {
        self.sequence.map(|seq| self.journal.entry_number(seq))
    }

    /// Stamps the validation fields.
    pub(crate) fn mark_validated(&mut self, sequence: u64, actor: ActorId, at: DateTime<Utc>) {
        self.status = EntryStatus::Validated;
        self.sequence = Some(sequence);
        self.validated_by = Some(actor);
        self.validated_at = Some(at);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::accounts::{AccountClass, NormalSide};
    use rust_decimal_macros::dec;

    fn account(code: &str) -> Account {
        Account {
            id: AccountId::new(),
            code: code.to_string(),
            label: format!("Account {code}"),
            class: AccountClass::from_code(code).unwrap(),
            normal_side: NormalSide::default_for_code(code),
            parent_id: None,
            is_postable: true,
            is_system: false,
            is_active: true,
        }
    }

    #[test]
    fn test_draft_caches_totals() {
        let client = account("411");
        let sales = account("701");
        let entry = JournalEntry::draft(
            JournalCode::Sales,
            NaiveDate::from_ymd_opt(2026, 1, 10).unwrap(),
            "Facture".to_string(),
            None,
            FiscalPeriodId::new(),
            vec![
                EntryLine::debit(&client, "Facture", dec!(500)),
                EntryLine::credit(&sales, "Facture", dec!(500)),
            ],
            SourceDocument::Manual,
            ActorId::new(),
        );
        assert_eq!(entry.total_debit, dec!(500));
        assert_eq!(entry.total_credit, dec!(500));
        assert!(entry.is_draft());
        assert!(entry.number().is_none());
    }

    #[test]
    fn test_swapped_line() {
        let client = account("411");
        let line = EntryLine::debit(&client, "Facture", dec!(118000));
        let swapped = line.swapped("Extourne Facture".to_string());
        assert_eq!(swapped.debit, Decimal::ZERO);
        assert_eq!(swapped.credit, dec!(118000));
        assert_eq!(swapped.account_id, line.account_id);
        assert_ne!(swapped.id, line.id);
        assert_eq!(swapped.signed_amount(), -line.signed_amount());
    }
}
