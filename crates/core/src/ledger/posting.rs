//! Posting rules: how each business document turns into entry lines.
//!
//! Builders work on account codes only. The service resolves every code of a
//! plan in one go before anything is stored.

use chrono::NaiveDate;
use ohada_shared::AccountMapping;
use rust_decimal::Decimal;

use super::error::LedgerError;
use super::types::{InvoiceDoc, JournalCode, PaymentDoc, PaymentMethod, SourceDocument};

/// A line still expressed by account code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedLine {
    /// Target account code.
    pub account_code: String,
    /// Line label.
    pub label: String,
    /// Debit amount.
    pub debit: Decimal,
    /// Credit amount.
    pub credit: Decimal,
}

impl PlannedLine {
    fn debit(account_code: &str, label: &str, amount: Decimal) -> Self {
        Self {
            account_code: account_code.to_string(),
            label: label.to_string(),
            debit: amount,
            credit: Decimal::ZERO,
        }
    }

    fn credit(account_code: &str, label: &str, amount: Decimal) -> Self {
        Self {
            account_code: account_code.to_string(),
            label: label.to_string(),
            debit: Decimal::ZERO,
            credit: amount,
        }
    }

    fn swap(self) -> Self {
        Self {
            debit: self.credit,
            credit: self.debit,
            ..self
        }
    }
}

/// Everything needed to build an entry except resolved accounts and period.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostingPlan {
    /// Target journal.
    pub journal: JournalCode,
    /// Posting date.
    pub date: NaiveDate,
    /// Entry label.
    pub label: String,
    /// Entry reference.
    pub reference: Option<String>,
    /// Originating document.
    pub source: SourceDocument,
    /// Lines in posting order.
    pub lines: Vec<PlannedLine>,
}

impl PostingPlan {
    /// `(debit, credit)` pairs of the lines.
    #[must_use]
    pub fn amounts(&self) -> Vec<(Decimal, Decimal)> {
        self.lines.iter().map(|l| (l.debit, l.credit)).collect()
    }

    /// Account code of every line, in line order.
    #[must_use]
    pub fn account_codes(&self) -> Vec<&str> {
        self.lines.iter().map(|l| l.account_code.as_str()).collect()
    }
}

/// Journal and account a payment method settles through.
///
/// Cash goes to the cash journal and account; cheque, transfer and card to the
/// bank; mobile money to the bank journal on the mobile money account.
#[must_use]
pub fn settlement_for(method: PaymentMethod, accounts: &AccountMapping) -> (JournalCode, &str) {
    match method {
        PaymentMethod::Cash => (JournalCode::Cash, &accounts.cash),
        PaymentMethod::Cheque | PaymentMethod::Transfer | PaymentMethod::Card => {
            (JournalCode::Bank, &accounts.bank)
        }
        PaymentMethod::MobileMoney => (JournalCode::Bank, &accounts.mobile_money),
    }
}

/// Sale invoice: debit receivable (incl.), credit revenue (excl.), credit VAT
/// collected (tax, omitted when zero). Credit notes swap every side.
///
/// # Errors
///
/// Returns `ValidationFailed` for inconsistent amounts.
pub fn sale_invoice(doc: &InvoiceDoc, accounts: &AccountMapping) -> Result<PostingPlan, LedgerError> {
    doc.check()?;
    let (label, source) = if doc.is_credit_note {
        (
            format!("Avoir {} - {}", doc.number, doc.counterpart),
            SourceDocument::SaleCreditNote {
                id: doc.id,
                number: doc.number.clone(),
            },
        )
    } else {
        (
            format!("Facture {} - {}", doc.number, doc.counterpart),
            SourceDocument::SaleInvoice {
                id: doc.id,
                number: doc.number.clone(),
            },
        )
    };

    let mut lines = vec![PlannedLine::debit(&accounts.receivable, &label, doc.amount_incl_tax)];
    if !doc.amount_excl_tax.is_zero() {
        lines.push(PlannedLine::credit(&accounts.revenue, &label, doc.amount_excl_tax));
    }
    if !doc.tax_amount.is_zero() {
        lines.push(PlannedLine::credit(&accounts.vat_collected, &label, doc.tax_amount));
    }
    if doc.is_credit_note {
        lines = lines.into_iter().map(PlannedLine::swap).collect();
    }

    Ok(PostingPlan {
        journal: JournalCode::Sales,
        date: doc.date,
        label,
        reference: Some(doc.number.clone()),
        source,
        lines,
    })
}

/// Purchase invoice: debit purchases (excl.), debit VAT deductible (tax,
/// omitted when zero), credit supplier payable (incl.). Credit notes swap.
///
/// # Errors
///
/// Returns `ValidationFailed` for inconsistent amounts.
pub fn purchase_invoice(
    doc: &InvoiceDoc,
    accounts: &AccountMapping,
) -> Result<PostingPlan, LedgerError> {
    doc.check()?;
    let (label, source) = if doc.is_credit_note {
        (
            format!("Avoir fournisseur {} - {}", doc.number, doc.counterpart),
            SourceDocument::PurchaseCreditNote {
                id: doc.id,
                number: doc.number.clone(),
            },
        )
    } else {
        (
            format!("Facture fournisseur {} - {}", doc.number, doc.counterpart),
            SourceDocument::PurchaseInvoice {
                id: doc.id,
                number: doc.number.clone(),
            },
        )
    };

    let mut lines = Vec::with_capacity(3);
    if !doc.amount_excl_tax.is_zero() {
        lines.push(PlannedLine::debit(&accounts.purchases, &label, doc.amount_excl_tax));
    }
    if !doc.tax_amount.is_zero() {
        lines.push(PlannedLine::debit(&accounts.vat_deductible, &label, doc.tax_amount));
    }
    lines.push(PlannedLine::credit(&accounts.payable, &label, doc.amount_incl_tax));
    if doc.is_credit_note {
        lines = lines.into_iter().map(PlannedLine::swap).collect();
    }

    Ok(PostingPlan {
        journal: JournalCode::Purchases,
        date: doc.date,
        label,
        reference: Some(doc.number.clone()),
        source,
        lines,
    })
}

/// Client payment: debit settlement account, credit receivable.
///
/// # Errors
///
/// Returns `ValidationFailed` for a non-positive amount.
pub fn client_payment(doc: &PaymentDoc, accounts: &AccountMapping) -> Result<PostingPlan, LedgerError> {
    doc.check()?;
    let (journal, settlement) = settlement_for(doc.method, accounts);
    let label = format!("Règlement {} - {}", doc.number, doc.counterpart);

    Ok(PostingPlan {
        journal,
        date: doc.date,
        lines: vec![
            PlannedLine::debit(settlement, &label, doc.amount),
            PlannedLine::credit(&accounts.receivable, &label, doc.amount),
        ],
        label,
        reference: Some(doc.number.clone()),
        source: SourceDocument::ClientPayment {
            id: doc.id,
            number: doc.number.clone(),
        },
    })
}

/// Supplier payment: debit payable, credit settlement account.
///
/// # Errors
///
/// Returns `ValidationFailed` for a non-positive amount.
pub fn supplier_payment(
    doc: &PaymentDoc,
    accounts: &AccountMapping,
) -> Result<PostingPlan, LedgerError> {
    doc.check()?;
    let (journal, settlement) = settlement_for(doc.method, accounts);
    let label = format!("Paiement fournisseur {} - {}", doc.number, doc.counterpart);

    Ok(PostingPlan {
        journal,
        date: doc.date,
        lines: vec![
            PlannedLine::debit(&accounts.payable, &label, doc.amount),
            PlannedLine::credit(settlement, &label, doc.amount),
        ],
        label,
        reference: Some(doc.number.clone()),
        source: SourceDocument::SupplierPayment {
            id: doc.id,
            number: doc.number.clone(),
        },
    })
}
