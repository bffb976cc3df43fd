//! Tests for the reports module.

use chrono::NaiveDate;
use ohada_shared::LedgerConfig;
use ohada_shared::types::{ActorId, DateRange, DocumentId};
use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::error::ReportError;
use super::service::{ReportService, report_range};
use crate::ledger::{
    InvoiceDoc, JournalCode, LedgerService, ManualEntryInput, ManualLineInput, PaymentDoc,
    PaymentMethod,
};

/// Postable accounts of the seeded chart spread over every class.
const ACCOUNTS: [&str; 16] = [
    "101", "213", "284", "31", "401", "411", "4431", "4452", "521", "571", "601", "622", "701",
    "706", "81", "82",
];

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

fn year() -> DateRange {
    report_range(d(2026, 1, 1), d(2026, 12, 31)).unwrap()
}

fn service() -> LedgerService {
    let service = LedgerService::with_syscohada_chart(LedgerConfig::default()).unwrap();
    service
        .open_period("FY2026", "Exercice 2026", d(2026, 1, 1), d(2026, 12, 31))
        .unwrap();
    service
}

/// Posts and validates a two-line manual entry.
fn post(service: &LedgerService, date: NaiveDate, debit: &str, credit: &str, amount: Decimal) {
    let line = |code: &str, debit: Decimal, credit: Decimal| ManualLineInput {
        account_code: code.to_string(),
        label: None,
        debit,
        credit,
    };
    let actor = ActorId::new();
    let draft = service
        .post_manual_entry(
            &ManualEntryInput {
                journal: JournalCode::Miscellaneous,
                date,
                label: format!("{debit} / {credit}"),
                reference: None,
                lines: vec![line(debit, amount, Decimal::ZERO), line(credit, Decimal::ZERO, amount)],
            },
            actor,
        )
        .unwrap();
    service.validate(draft.id, actor).unwrap();
}

fn sale(service: &LedgerService, excl: Decimal, tax: Decimal) {
    service
        .post_sale_invoice(
            &InvoiceDoc {
                id: DocumentId::new(),
                number: "FA-1".to_string(),
                date: d(2026, 3, 10),
                counterpart: "SIN".to_string(),
                amount_excl_tax: excl,
                tax_amount: tax,
                amount_incl_tax: excl + tax,
                is_credit_note: false,
            },
            ActorId::new(),
        )
        .unwrap();
}

fn purchase(service: &LedgerService, excl: Decimal, tax: Decimal) {
    service
        .post_purchase_invoice(
            &InvoiceDoc {
                id: DocumentId::new(),
                number: "FF-1".to_string(),
                date: d(2026, 3, 12),
                counterpart: "Fournisseur".to_string(),
                amount_excl_tax: excl,
                tax_amount: tax,
                amount_incl_tax: excl + tax,
                is_credit_note: false,
            },
            ActorId::new(),
        )
        .unwrap();
}

/// Strategy for one two-line movement: (debit account, credit account, amount).
fn movement() -> impl Strategy<Value = (usize, usize, Decimal)> {
    (0..ACCOUNTS.len(), 0..ACCOUNTS.len(), 1i64..10_000_000i64)
        .prop_filter("distinct accounts", |(a, b, _)| a != b)
        .prop_map(|(a, b, cents)| (a, b, Decimal::new(cents, 2)))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(30))]

    /// Property 7.1: Trial balance identities.
    ///
    /// *For any* set of validated entries, total debit SHALL equal total
    /// credit and total debtor balances SHALL equal total creditor balances,
    /// globally and summed over the class subtotals.
    #[test]
    fn prop_trial_balance_identities(
        moves in prop::collection::vec(movement(), 1..25),
        day in 1u32..28,
    ) {
        let service = service();
        for (debit, credit, amount) in &moves {
            post(&service, d(2026, 6, day), ACCOUNTS[*debit], ACCOUNTS[*credit], *amount);
        }

        let report = ReportService::new(&service).trial_balance(year());
        prop_assert!(report.is_balanced);
        prop_assert_eq!(report.totals.total_debit, report.totals.total_credit);
        prop_assert_eq!(report.totals.total_debtor, report.totals.total_creditor);

        let class_debit: Decimal = report.classes.iter().map(|c| c.totals.total_debit).sum();
        prop_assert_eq!(class_debit, report.totals.total_debit);
        for row in &report.rows {
            prop_assert!(row.debtor_balance.is_zero() || row.creditor_balance.is_zero());
        }
    }

    /// Property 7.2: The balance sheet always balances.
    ///
    /// *For any* set of validated entries, total assets SHALL equal equity,
    /// net result and liabilities, and the net result SHALL match the income
    /// statement.
    #[test]
    fn prop_balance_sheet_balances(moves in prop::collection::vec(movement(), 1..25)) {
        let service = service();
        for (debit, credit, amount) in &moves {
            post(&service, d(2026, 9, 1), ACCOUNTS[*debit], ACCOUNTS[*credit], *amount);
        }

        let reports = ReportService::new(&service);
        let sheet = reports.balance_sheet(year());
        let income = reports.income_statement(year());
        prop_assert!(sheet.is_balanced, "assets {} vs {}", sheet.total_assets, sheet.total_liabilities_and_equity);
        prop_assert_eq!(sheet.net_result, income.net_result);
    }

    /// Property 7.3: A ledger's closing balance matches the account balance.
    #[test]
    fn prop_ledger_closing_matches_projection(
        moves in prop::collection::vec(movement(), 1..20),
        account in 0..ACCOUNTS.len(),
    ) {
        let service = service();
        for (i, (debit, credit, amount)) in moves.iter().enumerate() {
            let month = u32::try_from(i % 12).unwrap() + 1;
            post(&service, d(2026, month, 15), ACCOUNTS[*debit], ACCOUNTS[*credit], *amount);
        }

        let code = ACCOUNTS[account];
        let ledger = ReportService::new(&service)
            .ledger(code, report_range(d(2026, 4, 1), d(2026, 12, 31)).unwrap())
            .unwrap();
        prop_assert_eq!(ledger.closing_balance, service.account_balance(code).unwrap().net());
        if let Some(last) = ledger.lines.last() {
            prop_assert_eq!(last.running_balance, ledger.closing_balance);
        }
    }
}

#[test]
fn test_report_range_rejects_inverted_dates() {
    assert!(matches!(
        report_range(d(2026, 2, 1), d(2026, 1, 1)),
        Err(ReportError::InvalidDateRange { .. })
    ));
}

#[test]
fn test_ledger_unknown_account() {
    let service = service();
    assert!(matches!(
        ReportService::new(&service).ledger("999", year()),
        Err(ReportError::AccountNotFound(_))
    ));
}

#[test]
fn test_ledger_opening_balance_and_running_balance() {
    let service = service();
    post(&service, d(2026, 1, 10), "521", "101", dec!(1000000));
    post(&service, d(2026, 2, 10), "622", "521", dec!(150000));
    post(&service, d(2026, 3, 10), "622", "521", dec!(50000));

    let ledger = ReportService::new(&service)
        .ledger("521", report_range(d(2026, 2, 1), d(2026, 12, 31)).unwrap())
        .unwrap();
    assert_eq!(ledger.opening_balance, dec!(1000000));
    assert_eq!(ledger.lines.len(), 2);
    assert_eq!(ledger.lines[0].running_balance, dec!(850000));
    assert_eq!(ledger.lines[1].running_balance, dec!(800000));
    assert_eq!(ledger.total_credit, dec!(200000));
    assert_eq!(ledger.closing_balance, dec!(800000));
}

#[test]
fn test_ledger_rolls_up_sub_accounts() {
    let service = service();
    post(&service, d(2026, 1, 10), "521", "101", dec!(1000));
    post(&service, d(2026, 1, 11), "571", "101", dec!(500));

    let ledger = ReportService::new(&service).ledger("5", year()).unwrap();
    assert_eq!(ledger.lines.len(), 2);
    assert_eq!(ledger.closing_balance, dec!(1500));
}

#[test]
fn test_drafts_are_invisible_to_reports() {
    let service = service();
    service
        .post_manual_entry(
            &ManualEntryInput {
                journal: JournalCode::Miscellaneous,
                date: d(2026, 5, 1),
                label: "Brouillon".to_string(),
                reference: None,
                lines: vec![
                    ManualLineInput {
                        account_code: "622".to_string(),
                        label: None,
                        debit: dec!(100),
                        credit: Decimal::ZERO,
                    },
                    ManualLineInput {
                        account_code: "521".to_string(),
                        label: None,
                        debit: Decimal::ZERO,
                        credit: dec!(100),
                    },
                ],
            },
            ActorId::new(),
        )
        .unwrap();

    let report = ReportService::new(&service).trial_balance(year());
    assert!(report.rows.is_empty());
    assert_eq!(report.totals.total_debit, Decimal::ZERO);
}

#[test]
fn test_income_statement_classifies_class_8() {
    let service = service();
    sale(&service, dec!(100000), dec!(18000));
    post(&service, d(2026, 4, 1), "622", "521", dec!(30000));
    post(&service, d(2026, 4, 2), "81", "213", dec!(5000));
    post(&service, d(2026, 4, 3), "521", "82", dec!(8000));

    let income = ReportService::new(&service).income_statement(year());
    assert_eq!(income.revenue.total, dec!(108000));
    assert_eq!(income.expenses.total, dec!(35000));
    assert_eq!(income.net_result, dec!(73000));
}

#[test]
fn test_balance_sheet_splits_third_parties_by_sign() {
    let service = service();
    post(&service, d(2026, 1, 2), "521", "101", dec!(500000));
    sale(&service, dec!(100000), dec!(18000));
    purchase(&service, dec!(40000), dec!(7200));

    let sheet = ReportService::new(&service).balance_sheet(year());
    // 411 and 4452 are debtor, 401 and 4431 creditor.
    assert_eq!(sheet.receivables.total, dec!(125200));
    assert_eq!(sheet.payables.total, dec!(65200));
    assert_eq!(sheet.cash.total, dec!(500000));
    assert_eq!(sheet.equity.total, dec!(500000));
    assert_eq!(sheet.net_result, dec!(60000));
    assert!(sheet.is_balanced);
}

#[test]
fn test_balance_sheet_overdraft() {
    let service = service();
    post(&service, d(2026, 1, 2), "622", "521", dec!(20000));
    let sheet = ReportService::new(&service).balance_sheet(year());
    assert_eq!(sheet.overdraft.total, dec!(20000));
    assert!(sheet.cash.accounts.is_empty());
    assert_eq!(sheet.net_result, dec!(-20000));
    assert!(sheet.is_balanced);
}

#[test]
fn test_vat_declaration_due() {
    let service = service();
    sale(&service, dec!(100000), dec!(18000));
    purchase(&service, dec!(40000), dec!(7200));

    let vat = ReportService::new(&service).vat_declaration(year());
    assert_eq!(vat.output_vat, dec!(18000));
    assert_eq!(vat.input_vat, dec!(7200));
    assert_eq!(vat.vat_due, dec!(10800));
    assert_eq!(vat.credit_carried_forward, Decimal::ZERO);
}

#[test]
fn test_vat_declaration_credit_carried_forward() {
    let service = service();
    sale(&service, dec!(10000), dec!(1800));
    purchase(&service, dec!(40000), dec!(7200));

    let vat = ReportService::new(&service).vat_declaration(year());
    assert_eq!(vat.net_vat, dec!(-5400));
    assert_eq!(vat.vat_due, Decimal::ZERO);
    assert_eq!(vat.credit_carried_forward, dec!(5400));
}

#[test]
fn test_journal_listing_filters_by_journal() {
    let service = service();
    sale(&service, dec!(100000), dec!(18000));
    service
        .post_client_payment(
            &PaymentDoc {
                id: DocumentId::new(),
                number: "RG-1".to_string(),
                date: d(2026, 3, 20),
                counterpart: "SIN".to_string(),
                amount: dec!(118000),
                method: PaymentMethod::Cash,
            },
            ActorId::new(),
        )
        .unwrap();

    let reports = ReportService::new(&service);
    let sales = reports.journal(JournalCode::Sales, year());
    assert_eq!(sales.entries.len(), 1);
    assert_eq!(sales.total_debit, dec!(118000));
    let cash = reports.journal(JournalCode::Cash, year());
    assert_eq!(cash.entries.len(), 1);
    assert_eq!(cash.entries[0].number().as_deref(), Some("CA000001"));
    assert!(reports.journal(JournalCode::Bank, year()).entries.is_empty());
}

#[test]
fn test_audit_file_covers_every_line_of_the_period() {
    let service = service();
    sale(&service, dec!(100000), dec!(18000));
    post(&service, d(2026, 4, 1), "622", "521", dec!(30000));

    let period = service.calendar().get_by_code("FY2026").unwrap();
    let file = ReportService::new(&service).export_audit_file(period.id).unwrap();
    assert_eq!(file.rows.len(), 5);
    assert_eq!(file.rows[0].fields()[0], "VT");
    assert_eq!(file.rows[0].fields()[8], "118000,00");
    assert_eq!(file.file_name("123456789"), "123456789FEC20261231.txt");
}

#[test]
fn test_audit_file_unknown_period() {
    let service = service();
    assert!(matches!(
        ReportService::new(&service).export_audit_file(ohada_shared::types::FiscalPeriodId::new()),
        Err(ReportError::PeriodNotFound(_))
    ));
}
