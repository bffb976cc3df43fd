//! Report data types.

use chrono::NaiveDate;
use ohada_shared::types::{AccountId, Currency, DateRange, EntryId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::accounts::AccountClass;
use crate::ledger::{JournalCode, JournalEntry};

/// One posting in an account ledger.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerLine {
    /// Entry ID.
    pub entry_id: EntryId,
    /// Entry number (journal code + sequence).
    pub entry_number: String,
    /// Journal.
    pub journal: JournalCode,
    /// Entry date.
    pub date: NaiveDate,
    /// Account the line was posted to (a descendant for roll-ups).
    pub account_code: String,
    /// Line label.
    pub label: String,
    /// Document reference.
    pub reference: Option<String>,
    /// Debit amount.
    pub debit: Decimal,
    /// Credit amount.
    pub credit: Decimal,
    /// Balance after this line (debit - credit), opening included.
    pub running_balance: Decimal,
    /// Lettering code, if reconciled.
    pub lettering: Option<String>,
}

/// Postings of one account over a range.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountLedger {
    /// Account code.
    pub account_code: String,
    /// Account label.
    pub account_label: String,
    /// Reporting range.
    pub range: DateRange,
    /// Balance carried from before the range (debit - credit).
    pub opening_balance: Decimal,
    /// Chronological postings.
    pub lines: Vec<LedgerLine>,
    /// Total debit over the range.
    pub total_debit: Decimal,
    /// Total credit over the range.
    pub total_credit: Decimal,
    /// Opening balance plus movements.
    pub closing_balance: Decimal,
}

/// Trial balance row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrialBalanceRow {
    /// Account ID.
    pub account_id: AccountId,
    /// Account code.
    pub code: String,
    /// Account label.
    pub label: String,
    /// Account class.
    pub class: AccountClass,
    /// Total debit.
    pub total_debit: Decimal,
    /// Total credit.
    pub total_credit: Decimal,
    /// Net balance when debit exceeds credit, else zero.
    pub debtor_balance: Decimal,
    /// Net balance when credit exceeds debit, else zero.
    pub creditor_balance: Decimal,
}

impl TrialBalanceRow {
    /// Splits the net position onto one side.
    #[must_use]
    pub fn one_sided(debit: Decimal, credit: Decimal) -> (Decimal, Decimal) {
        let net = debit - credit;
        if net > Decimal::ZERO {
            (net, Decimal::ZERO)
        } else {
            (Decimal::ZERO, -net)
        }
    }
}

/// Debit, credit and one-sided balance sums.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrialBalanceTotals {
    /// Total debit.
    pub total_debit: Decimal,
    /// Total credit.
    pub total_credit: Decimal,
    /// Sum of debtor balances.
    pub total_debtor: Decimal,
    /// Sum of creditor balances.
    pub total_creditor: Decimal,
}

impl TrialBalanceTotals {
    /// Adds a row to the totals.
    pub fn add(&mut self, row: &TrialBalanceRow) {
        self.total_debit += row.total_debit;
        self.total_credit += row.total_credit;
        self.total_debtor += row.debtor_balance;
        self.total_creditor += row.creditor_balance;
    }

    /// Debit equals credit and debtor balances equal creditor balances.
    #[must_use]
    pub fn is_balanced(&self) -> bool {
        self.total_debit == self.total_credit && self.total_debtor == self.total_creditor
    }
}

/// Subtotal of one account class.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassSubtotal {
    /// Account class.
    pub class: AccountClass,
    /// Class totals.
    pub totals: TrialBalanceTotals,
}

/// Trial balance report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrialBalanceReport {
    /// Reporting range.
    pub range: DateRange,
    /// Currency of the books.
    pub currency: Currency,
    /// One row per account with postings, ordered by code.
    pub rows: Vec<TrialBalanceRow>,
    /// Subtotals per class.
    pub classes: Vec<ClassSubtotal>,
    /// Grand totals.
    pub totals: TrialBalanceTotals,
    /// Whether both identities of the totals hold.
    pub is_balanced: bool,
}

/// One account's contribution to a statement.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatementLine {
    /// Account code.
    pub code: String,
    /// Account label.
    pub label: String,
    /// Amount, positive in the section's direction.
    pub amount: Decimal,
}

/// Statement section.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StatementSection {
    /// Section total.
    pub total: Decimal,
    /// Accounts in this section.
    pub accounts: Vec<StatementLine>,
}

impl StatementSection {
    /// Adds an account line when its amount is not zero.
    pub fn push(&mut self, code: &str, label: &str, amount: Decimal) {
        if amount.is_zero() {
            return;
        }
        self.total += amount;
        self.accounts.push(StatementLine {
            code: code.to_string(),
            label: label.to_string(),
            amount,
        });
    }
}

/// Income statement (compte de résultat).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IncomeStatementReport {
    /// Reporting range.
    pub range: DateRange,
    /// Currency of the books.
    pub currency: Currency,
    /// Revenue accounts (class 7, even class 8).
    pub revenue: StatementSection,
    /// Expense accounts (class 6, odd class 8).
    pub expenses: StatementSection,
    /// Revenue minus expenses.
    pub net_result: Decimal,
}

/// Balance sheet (bilan).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BalanceSheetReport {
    /// Reporting range.
    pub range: DateRange,
    /// Currency of the books.
    pub currency: Currency,
    /// Class 2, net of depreciation.
    pub fixed_assets: StatementSection,
    /// Class 3, net of provisions.
    pub inventory: StatementSection,
    /// Class 4 accounts with a debtor balance.
    pub receivables: StatementSection,
    /// Class 5 accounts with a debtor balance.
    pub cash: StatementSection,
    /// Class 1 net credit.
    pub equity: StatementSection,
    /// Net result of the range, part of equity.
    pub net_result: Decimal,
    /// Class 4 accounts with a creditor balance.
    pub payables: StatementSection,
    /// Class 5 accounts with a creditor balance.
    pub overdraft: StatementSection,
    /// Total assets.
    pub total_assets: Decimal,
    /// Equity, net result and liabilities.
    pub total_liabilities_and_equity: Decimal,
    /// Whether assets equal liabilities plus equity.
    pub is_balanced: bool,
}

/// VAT declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VatDeclaration {
    /// Reporting range.
    pub range: DateRange,
    /// VAT collected (net credit of 443 accounts).
    pub output_vat: Decimal,
    /// Deductible VAT (net debit of 445 accounts).
    pub input_vat: Decimal,
    /// Output minus input VAT.
    pub net_vat: Decimal,
    /// VAT payable, zero when in credit.
    pub vat_due: Decimal,
    /// Credit carried forward when input exceeds output.
    pub credit_carried_forward: Decimal,
}

/// Validated entries of one journal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JournalReport {
    /// Journal.
    pub journal: JournalCode,
    /// Reporting range.
    pub range: DateRange,
    /// Entries by date and number.
    pub entries: Vec<JournalEntry>,
    /// Total debit.
    pub total_debit: Decimal,
    /// Total credit.
    pub total_credit: Decimal,
}
