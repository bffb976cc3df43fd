//! Property-based tests for LedgerService.
//!
//! Feature: ledger-core
//! - Property 4: Posted Entry Balance Integrity
//! - Property 5: Reversal Neutrality
//! - Property 6: Reconciliation Atomicity

use chrono::NaiveDate;
use ohada_shared::LedgerConfig;
use ohada_shared::types::{ActorId, DocumentId};
use proptest::prelude::*;
use rust_decimal::Decimal;

use super::error::LedgerError;
use super::service::LedgerService;
use super::types::{InvoiceDoc, PaymentDoc, PaymentMethod};

/// Strategy to generate positive amounts (1.00 to 1,000,000.00).
fn positive_amount() -> impl Strategy<Value = Decimal> {
    (100i64..100_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

/// Strategy to generate tax amounts, zero included.
fn tax_amount() -> impl Strategy<Value = Decimal> {
    (0i64..20_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

fn payment_method() -> impl Strategy<Value = PaymentMethod> {
    prop_oneof![
        Just(PaymentMethod::Cash),
        Just(PaymentMethod::Cheque),
        Just(PaymentMethod::Transfer),
        Just(PaymentMethod::Card),
        Just(PaymentMethod::MobileMoney),
    ]
}

fn date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 5, 15).unwrap()
}

/// Engine with the standard chart and an open 2026 period.
fn service() -> LedgerService {
    let service = LedgerService::with_syscohada_chart(LedgerConfig::default()).unwrap();
    service
        .open_period(
            "FY2026",
            "Exercice 2026",
            NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2026, 12, 31).unwrap(),
        )
        .unwrap();
    service
}

fn invoice(excl: Decimal, tax: Decimal, is_credit_note: bool) -> InvoiceDoc {
    InvoiceDoc {
        id: DocumentId::new(),
        number: "FA-PROP".to_string(),
        date: date(),
        counterpart: "Client".to_string(),
        amount_excl_tax: excl,
        tax_amount: tax,
        amount_incl_tax: excl + tax,
        is_credit_note,
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(50))]

    /// Property 4.1: Automatic postings are balanced.
    ///
    /// *For any* valid invoice, the posted entry SHALL have equal debit and
    /// credit totals matching the amount including tax.
    #[test]
    fn prop_invoice_postings_balanced(
        excl in positive_amount(),
        tax in tax_amount(),
        credit_note in any::<bool>(),
        purchase in any::<bool>(),
    ) {
        let service = service();
        let doc = invoice(excl, tax, credit_note);
        let entry = if purchase {
            service.post_purchase_invoice(&doc, ActorId::new()).unwrap()
        } else {
            service.post_sale_invoice(&doc, ActorId::new()).unwrap()
        };

        prop_assert_eq!(entry.total_debit, entry.total_credit);
        prop_assert_eq!(entry.total_debit, excl + tax);
        let expected_lines = if tax == Decimal::ZERO { 2 } else { 3 };
        prop_assert_eq!(entry.lines.len(), expected_lines);
    }

    /// Property 4.2: Payments always hit the counterpart and one settlement account.
    #[test]
    fn prop_payment_postings_balanced(amount in positive_amount(), method in payment_method()) {
        let service = service();
        let doc = PaymentDoc {
            id: DocumentId::new(),
            number: "RG-PROP".to_string(),
            date: date(),
            counterpart: "Client".to_string(),
            amount,
            method,
        };
        let entry = service.post_client_payment(&doc, ActorId::new()).unwrap();
        prop_assert_eq!(entry.lines.len(), 2);
        prop_assert_eq!(entry.total_debit, amount);
        prop_assert_eq!(service.account_balance("411").unwrap().net(), -amount);
    }

    /// Property 5.1: A reversal cancels the original on every account.
    ///
    /// *For any* posted invoice, after reversal every touched account SHALL
    /// return to a zero net balance, and each reversal line SHALL mirror the
    /// matching original line.
    #[test]
    fn prop_reversal_neutralizes_balances(excl in positive_amount(), tax in tax_amount()) {
        let service = service();
        let original = service.post_sale_invoice(&invoice(excl, tax, false), ActorId::new()).unwrap();
        let reversal = service.reverse(original.id, date(), ActorId::new()).unwrap();

        prop_assert!(reversal.is_reversal);
        prop_assert_eq!(reversal.origin_entry, Some(original.id));
        for (orig, rev) in original.lines.iter().zip(&reversal.lines) {
            prop_assert_eq!(orig.account_id, rev.account_id);
            prop_assert_eq!(orig.debit, rev.credit);
            prop_assert_eq!(orig.credit, rev.debit);
        }
        for line in &original.lines {
            prop_assert_eq!(service.account_balance(&line.account_code).unwrap().net(), Decimal::ZERO);
        }
    }

    /// Property 6.1: A rejected reconciliation stamps nothing.
    ///
    /// *For any* invoice and a payment of a different amount, lettering SHALL
    /// fail with `UnbalancedMatch` and leave both lines without a code.
    #[test]
    fn prop_unbalanced_reconcile_leaves_lines_untouched(
        amount in positive_amount(),
        delta in 1i64..10_000i64,
    ) {
        let service = service();
        let actor = ActorId::new();
        let sale = service
            .post_sale_invoice(&invoice(amount, Decimal::ZERO, false), actor)
            .unwrap();
        let payment = service
            .post_client_payment(
                &PaymentDoc {
                    id: DocumentId::new(),
                    number: "RG-PROP".to_string(),
                    date: date(),
                    counterpart: "Client".to_string(),
                    amount: amount + Decimal::new(delta, 2),
                    method: PaymentMethod::Transfer,
                },
                actor,
            )
            .unwrap();

        let receivable = |entry: &super::entry::JournalEntry| {
            entry.lines.iter().find(|l| l.account_code == "411").map(|l| l.id).unwrap()
        };
        let lines = [receivable(&sale), receivable(&payment)];

        let result = service.reconcile("411", &lines, actor);
        prop_assert!(matches!(result, Err(LedgerError::UnbalancedMatch { .. })), "unexpected {:?}", result);
        for entry in [sale.id, payment.id] {
            let stored = service.entry(entry).unwrap();
            prop_assert!(stored.lines.iter().all(|l| !l.is_reconciled()));
        }
    }
}
