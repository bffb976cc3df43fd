//! Concurrent access tests for ledger state transitions.
//!
//! These tests verify that:
//! - Racing validations of one draft produce exactly one winner
//! - Sequence numbers stay gap-free and unique under concurrent validation
//! - Racing reversals of one entry produce exactly one reversal
//! - Racing reconciliations of the same lines stamp them once

use std::collections::HashSet;
use std::sync::{Arc, Barrier};
use std::thread;

use chrono::NaiveDate;
use ohada_core::ledger::{
    InvoiceDoc, JournalCode, ManualEntryInput, ManualLineInput, PaymentDoc, PaymentMethod,
};
use ohada_core::{LedgerError, LedgerService};
use ohada_shared::LedgerConfig;
use ohada_shared::types::{ActorId, DocumentId};
use rstest::{fixture, rstest};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

const THREADS: usize = 8;

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

#[fixture]
fn ledger() -> Arc<LedgerService> {
    let ledger = LedgerService::with_syscohada_chart(LedgerConfig::default()).unwrap();
    ledger
        .open_period("FY2026", "Exercice 2026", d(2026, 1, 1), d(2026, 12, 31))
        .unwrap();
    Arc::new(ledger)
}

fn draft(ledger: &LedgerService, amount: Decimal) -> ohada_shared::types::EntryId {
    let line = |code: &str, debit: Decimal, credit: Decimal| ManualLineInput {
        account_code: code.to_string(),
        label: None,
        debit,
        credit,
    };
    ledger
        .post_manual_entry(
            &ManualEntryInput {
                journal: JournalCode::Miscellaneous,
                date: d(2026, 2, 1),
                label: "Frais bancaires".to_string(),
                reference: None,
                lines: vec![line("631", amount, Decimal::ZERO), line("521", Decimal::ZERO, amount)],
            },
            ActorId::new(),
        )
        .unwrap()
        .id
}

/// Runs `f` on `THREADS` threads released together, collecting the results.
fn race<T, F>(f: F) -> Vec<T>
where
    T: Send,
    F: Fn(usize) -> T + Sync,
{
    let barrier = Barrier::new(THREADS);
    thread::scope(|scope| {
        let handles: Vec<_> = (0..THREADS)
            .map(|i| {
                let barrier = &barrier;
                let f = &f;
                scope.spawn(move || {
                    barrier.wait();
                    f(i)
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    })
}

#[rstest]
fn concurrent_validate_has_single_winner(ledger: Arc<LedgerService>) {
    let id = draft(&ledger, dec!(1000));

    let results = race(|_| ledger.validate(id, ActorId::new()));

    let winners = results.iter().filter(|r| r.is_ok()).count();
    assert_eq!(winners, 1);
    assert!(results
        .iter()
        .filter_map(|r| r.as_ref().err())
        .all(|e| matches!(e, LedgerError::AlreadyValidated(_))));
    // Balances were applied exactly once.
    assert_eq!(ledger.account_balance("631").unwrap().debit_total, dec!(1000));
}

#[rstest]
fn concurrent_validations_get_unique_sequences(ledger: Arc<LedgerService>) {
    let drafts: Vec<_> = (0..THREADS).map(|_| draft(&ledger, dec!(10))).collect();

    let results = race(|i| ledger.validate(drafts[i], ActorId::new()).unwrap());

    let sequences: HashSet<u64> = results.iter().filter_map(|e| e.sequence).collect();
    let expected: HashSet<u64> = (1..=THREADS as u64).collect();
    assert_eq!(sequences, expected);
    assert_eq!(ledger.account_balance("521").unwrap().credit_total, dec!(80));
}

#[rstest]
fn concurrent_reverse_has_single_winner(ledger: Arc<LedgerService>) {
    let id = draft(&ledger, dec!(500));
    ledger.validate(id, ActorId::new()).unwrap();

    let results = race(|_| ledger.reverse(id, d(2026, 2, 2), ActorId::new()));

    assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
    assert!(results
        .iter()
        .filter_map(|r| r.as_ref().err())
        .all(|e| matches!(e, LedgerError::AlreadyReversed(_))));
    assert_eq!(ledger.account_balance("631").unwrap().net(), Decimal::ZERO);
    assert_eq!(ledger.validated_entries().len(), 2);
}

#[rstest]
fn concurrent_reconcile_stamps_once(ledger: Arc<LedgerService>) {
    let actor = ActorId::new();
    let invoice = ledger
        .post_sale_invoice(
            &InvoiceDoc {
                id: DocumentId::new(),
                number: "FA-9".to_string(),
                date: d(2026, 3, 1),
                counterpart: "SIN".to_string(),
                amount_excl_tax: dec!(50000),
                tax_amount: Decimal::ZERO,
                amount_incl_tax: dec!(50000),
                is_credit_note: false,
            },
            actor,
        )
        .unwrap();
    let payment = ledger
        .post_client_payment(
            &PaymentDoc {
                id: DocumentId::new(),
                number: "RG-9".to_string(),
                date: d(2026, 3, 2),
                counterpart: "SIN".to_string(),
                amount: dec!(50000),
                method: PaymentMethod::Transfer,
            },
            actor,
        )
        .unwrap();
    let receivable = |lines: &[ohada_core::ledger::EntryLine]| {
        lines.iter().find(|l| l.account_code == "411").unwrap().id
    };
    let lines = [receivable(&invoice.lines), receivable(&payment.lines)];

    let results = race(|_| ledger.reconcile("411", &lines, actor));

    assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
    assert!(results
        .iter()
        .filter_map(|r| r.as_ref().err())
        .all(|e| matches!(e, LedgerError::AlreadyReconciled(_))));
}
