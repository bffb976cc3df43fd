//! Report generation service.
//!
//! Every report reads the validated entry log only; drafts and deleted
//! drafts never contribute.

use std::collections::{BTreeMap, HashSet};

use chrono::NaiveDate;
use ohada_shared::types::{AccountId, DateRange, FiscalPeriodId};
use rust_decimal::Decimal;
use tracing::info;

use super::error::ReportError;
use super::export::{AuditFile, AuditRow};
use super::types::{
    AccountLedger, BalanceSheetReport, ClassSubtotal, IncomeStatementReport, JournalReport,
    LedgerLine, StatementSection, TrialBalanceReport, TrialBalanceRow, TrialBalanceTotals,
    VatDeclaration,
};
use crate::accounts::{AccountClass, IncomeNature, RunningBalance};
use crate::ledger::{JournalCode, JournalEntry, LedgerService};

/// Collected VAT accounts (443x).
const OUTPUT_VAT_PREFIX: &str = "443";
/// Deductible VAT accounts (445x).
const INPUT_VAT_PREFIX: &str = "445";

/// Builds a report range.
///
/// # Errors
///
/// Returns `InvalidDateRange` when `start` is after `end`.
pub fn report_range(start: NaiveDate, end: NaiveDate) -> Result<DateRange, ReportError> {
    DateRange::new(start, end).ok_or(ReportError::InvalidDateRange { start, end })
}

/// Per-account movement over a range.
#[derive(Debug, Clone)]
struct AccountMovement {
    account_id: AccountId,
    code: String,
    label: String,
    class: AccountClass,
    debit: Decimal,
    credit: Decimal,
}

impl AccountMovement {
    fn net_debit(&self) -> Decimal {
        self.debit - self.credit
    }
}

/// Read-side projections over a [`LedgerService`].
pub struct ReportService<'a> {
    ledger: &'a LedgerService,
}

impl<'a> ReportService<'a> {
    /// Creates a report service reading from `ledger`.
    #[must_use]
    pub fn new(ledger: &'a LedgerService) -> Self {
        Self { ledger }
    }

    /// Validated entries dated inside the range.
    fn entries_in(&self, range: DateRange) -> Vec<JournalEntry> {
        self.ledger
            .validated_entries()
            .into_iter()
            .filter(|e| range.contains(e.date))
            .collect()
    }

    /// Debit and credit per account over the range, ordered by code.
    fn movements(&self, range: DateRange) -> Vec<AccountMovement> {
        let mut by_code: BTreeMap<String, AccountMovement> = BTreeMap::new();
        for entry in self.entries_in(range) {
            for line in entry.lines {
                let Some(class) = AccountClass::from_code(&line.account_code) else {
                    continue;
                };
                let movement = by_code
                    .entry(line.account_code.clone())
                    .or_insert_with(|| AccountMovement {
                        account_id: line.account_id,
                        code: line.account_code.clone(),
                        label: line.account_label.clone(),
                        class,
                        debit: Decimal::ZERO,
                        credit: Decimal::ZERO,
                    });
                movement.debit += line.debit;
                movement.credit += line.credit;
            }
        }
        by_code.into_values().collect()
    }

    /// Postings of an account (and its sub-accounts) with a running balance.
    ///
    /// Lines dated before the range form the opening balance.
    ///
    /// # Errors
    ///
    /// Returns `AccountNotFound` for an unknown code.
    pub fn ledger(&self, account_code: &str, range: DateRange) -> Result<AccountLedger, ReportError> {
        let account = self
            .ledger
            .chart()
            .get(account_code)
            .ok_or_else(|| ReportError::AccountNotFound(account_code.to_string()))?;
        let ids: HashSet<AccountId> = self.ledger.chart().subtree(account_code).into_iter().collect();

        let ids = &ids;
        let entries = self.ledger.validated_entries();
        let (before, within): (Vec<_>, Vec<_>) = entries
            .iter()
            .take_while(|e| e.date <= range.end)
            .flat_map(|e| {
                e.lines
                    .iter()
                    .filter(move |l| ids.contains(&l.account_id))
                    .map(move |l| (e, l))
            })
            .partition(|(e, _)| e.date < range.start);

        let opening_balance: Decimal = before.iter().map(|(_, l)| l.signed_amount()).sum();
        let mut running = RunningBalance::opening(opening_balance);
        let mut total_debit = Decimal::ZERO;
        let mut total_credit = Decimal::ZERO;
        let mut lines = Vec::with_capacity(within.len());

        for (entry, line) in within {
            running = RunningBalance::next_entry(&running, line.signed_amount());
            total_debit += line.debit;
            total_credit += line.credit;
            lines.push(LedgerLine {
                entry_id: entry.id,
                entry_number: entry.number().unwrap_or_default(),
                journal: entry.journal,
                date: entry.date,
                account_code: line.account_code.clone(),
                label: line.label.clone(),
                reference: entry.reference.clone(),
                debit: line.debit,
                credit: line.credit,
                running_balance: running.current_balance,
                lettering: line.lettering.as_ref().map(|l| l.code.clone()),
            });
        }

        Ok(AccountLedger {
            account_code: account.code,
            account_label: account.label,
            range,
            closing_balance: running.current_balance,
            opening_balance,
            lines,
            total_debit,
            total_credit,
        })
    }

    /// Per-account totals with one-sided balances and class subtotals.
    #[must_use]
    pub fn trial_balance(&self, range: DateRange) -> TrialBalanceReport {
        let rows: Vec<TrialBalanceRow> = self
            .movements(range)
            .into_iter()
            .map(|m| {
                let (debtor_balance, creditor_balance) = TrialBalanceRow::one_sided(m.debit, m.credit);
                TrialBalanceRow {
                    account_id: m.account_id,
                    code: m.code,
                    label: m.label,
                    class: m.class,
                    total_debit: m.debit,
                    total_credit: m.credit,
                    debtor_balance,
                    creditor_balance,
                }
            })
            .collect();

        let mut totals = TrialBalanceTotals::default();
        let mut classes: BTreeMap<AccountClass, TrialBalanceTotals> = BTreeMap::new();
        for row in &rows {
            totals.add(row);
            classes.entry(row.class).or_default().add(row);
        }

        TrialBalanceReport {
            range,
            currency: self.ledger.config().currency,
            rows,
            classes: classes
                .into_iter()
                .map(|(class, totals)| ClassSubtotal { class, totals })
                .collect(),
            is_balanced: totals.is_balanced(),
            totals,
        }
    }

    /// Revenue and expense accounts and the net result.
    #[must_use]
    pub fn income_statement(&self, range: DateRange) -> IncomeStatementReport {
        let mut revenue = StatementSection::default();
        let mut expenses = StatementSection::default();

        for m in self.movements(range) {
            match income_nature(&m) {
                Some(IncomeNature::Revenue) => revenue.push(&m.code, &m.label, -m.net_debit()),
                Some(IncomeNature::Expense) => expenses.push(&m.code, &m.label, m.net_debit()),
                None => {}
            }
        }

        IncomeStatementReport {
            range,
            currency: self.ledger.config().currency,
            net_result: revenue.total - expenses.total,
            revenue,
            expenses,
        }
    }

    /// Balance sheet of classes 1 to 5 plus the net result.
    #[must_use]
    pub fn balance_sheet(&self, range: DateRange) -> BalanceSheetReport {
        let mut fixed_assets = StatementSection::default();
        let mut inventory = StatementSection::default();
        let mut receivables = StatementSection::default();
        let mut cash = StatementSection::default();
        let mut equity = StatementSection::default();
        let mut payables = StatementSection::default();
        let mut overdraft = StatementSection::default();
        let mut revenue = Decimal::ZERO;
        let mut expenses = Decimal::ZERO;

        for m in self.movements(range) {
            let net = m.net_debit();
            match m.class {
                AccountClass::Resources => equity.push(&m.code, &m.label, -net),
                AccountClass::FixedAssets => fixed_assets.push(&m.code, &m.label, net),
                AccountClass::Inventory => inventory.push(&m.code, &m.label, net),
                AccountClass::ThirdParties if net > Decimal::ZERO => receivables.push(&m.code, &m.label, net),
                AccountClass::ThirdParties => payables.push(&m.code, &m.label, -net),
                AccountClass::Treasury if net > Decimal::ZERO => cash.push(&m.code, &m.label, net),
                AccountClass::Treasury => overdraft.push(&m.code, &m.label, -net),
                AccountClass::Expenses | AccountClass::Revenue | AccountClass::OtherItems => {
                    match income_nature(&m) {
                        Some(IncomeNature::Revenue) => revenue -= net,
                        Some(IncomeNature::Expense) | None => expenses += net,
                    }
                }
            }
        }

        let net_result = revenue - expenses;
        let total_assets = fixed_assets.total + inventory.total + receivables.total + cash.total;
        let total_liabilities_and_equity = equity.total + net_result + payables.total + overdraft.total;

        BalanceSheetReport {
            range,
            currency: self.ledger.config().currency,
            fixed_assets,
            inventory,
            receivables,
            cash,
            equity,
            net_result,
            payables,
            overdraft,
            total_assets,
            total_liabilities_and_equity,
            is_balanced: total_assets == total_liabilities_and_equity,
        }
    }

    /// Output VAT minus input VAT over the range.
    #[must_use]
    pub fn vat_declaration(&self, range: DateRange) -> VatDeclaration {
        let mut output_vat = Decimal::ZERO;
        let mut input_vat = Decimal::ZERO;
        for m in self.movements(range) {
            if m.code.starts_with(OUTPUT_VAT_PREFIX) {
                output_vat -= m.net_debit();
            } else if m.code.starts_with(INPUT_VAT_PREFIX) {
                input_vat += m.net_debit();
            }
        }

        let net_vat = output_vat - input_vat;
        VatDeclaration {
            range,
            output_vat,
            input_vat,
            net_vat,
            vat_due: net_vat.max(Decimal::ZERO),
            credit_carried_forward: (-net_vat).max(Decimal::ZERO),
        }
    }

    /// Validated entries of one journal.
    #[must_use]
    pub fn journal(&self, journal: JournalCode, range: DateRange) -> JournalReport {
        let entries: Vec<JournalEntry> = self
            .entries_in(range)
            .into_iter()
            .filter(|e| e.journal == journal)
            .collect();
        JournalReport {
            journal,
            range,
            total_debit: entries.iter().map(|e| e.total_debit).sum(),
            total_credit: entries.iter().map(|e| e.total_credit).sum(),
            entries,
        }
    }

    /// One audit row per line of every validated entry booked in the period.
    ///
    /// # Errors
    ///
    /// Returns `PeriodNotFound` for an unknown period.
    pub fn export_audit_file(&self, period_id: FiscalPeriodId) -> Result<AuditFile, ReportError> {
        let period = self
            .ledger
            .calendar()
            .get(period_id)
            .ok_or(ReportError::PeriodNotFound(period_id))?;

        let rows: Vec<AuditRow> = self
            .ledger
            .validated_entries()
            .iter()
            .filter(|e| e.period_id == period_id)
            .flat_map(|e| e.lines.iter().map(move |l| AuditRow::from_line(e, l)))
            .collect();

        info!(period = %period.code, rows = rows.len(), "Audit file exported");
        Ok(AuditFile {
            period_code: period.code,
            closing_date: period.end_date,
            rows,
        })
    }
}

/// Income statement side of a movement; class 8 roots count as expenses.
fn income_nature(m: &AccountMovement) -> Option<IncomeNature> {
    IncomeNature::from_code(&m.code)
        .or_else(|| (m.class == AccountClass::OtherItems).then_some(IncomeNature::Expense))
}
