//! Ledger domain types: journals, statuses, source documents and the
//! payloads business events carry into the ledger.

use chrono::NaiveDate;
use ohada_shared::types::DocumentId;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::error::LedgerError;

/// Sub-ledger an entry is recorded in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JournalCode {
    /// Sales journal (VT).
    Sales,
    /// Purchases journal (AC).
    Purchases,
    /// Bank journal (BQ).
    Bank,
    /// Cash journal (CA).
    Cash,
    /// Miscellaneous operations (OD).
    Miscellaneous,
}

impl JournalCode {
    /// Every journal, in display order.
    pub const ALL: [Self; 5] = [
        Self::Sales,
        Self::Purchases,
        Self::Bank,
        Self::Cash,
        Self::Miscellaneous,
    ];

    /// Two-letter journal code.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::Sales => "VT",
            Self::Purchases => "AC",
            Self::Bank => "BQ",
            Self::Cash => "CA",
            Self::Miscellaneous => "OD",
        }
    }

    /// Journal label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Sales => "Journal des ventes",
            Self::Purchases => "Journal des achats",
            Self::Bank => "Journal de banque",
            Self::Cash => "Journal de caisse",
            Self::Miscellaneous => "Opérations diverses",
        }
    }

    /// Entry number for a sequence in this journal, e.g. `VT000042`.
    #[must_use]
    pub fn entry_number(self, sequence: u64) -> String {
        format!("{}{:06}", self.code(), sequence)
    }
}

impl fmt::Display for JournalCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Entry status. Validated is terminal for mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryStatus {
    /// Editable, invisible to reports.
    Draft,
    /// Immutable, part of the books.
    Validated,
}

/// The business document an entry originates from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SourceDocument {
    /// Customer invoice.
    SaleInvoice {
        /// Document id in the surrounding system.
        id: DocumentId,
        /// Document number, used as the entry reference.
        number: String,
    },
    /// Customer credit note.
    SaleCreditNote {
        /// Document id.
        id: DocumentId,
        /// Document number.
        number: String,
    },
    /// Supplier invoice.
    PurchaseInvoice {
        /// Document id.
        id: DocumentId,
        /// Document number.
        number: String,
    },
    /// Supplier credit note.
    PurchaseCreditNote {
        /// Document id.
        id: DocumentId,
        /// Document number.
        number: String,
    },
    /// Payment received from a customer.
    ClientPayment {
        /// Document id.
        id: DocumentId,
        /// Document number.
        number: String,
    },
    /// Payment made to a supplier.
    SupplierPayment {
        /// Document id.
        id: DocumentId,
        /// Document number.
        number: String,
    },
    /// Entry keyed in by an accountant.
    Manual,
}

impl SourceDocument {
    /// Document id, `None` for manual entries.
    #[must_use]
    pub fn document_id(&self) -> Option<DocumentId> {
        match self {
            Self::SaleInvoice { id, .. }
            | Self::SaleCreditNote { id, .. }
            | Self::PurchaseInvoice { id, .. }
            | Self::PurchaseCreditNote { id, .. }
            | Self::ClientPayment { id, .. }
            | Self::SupplierPayment { id, .. } => Some(*id),
            Self::Manual => None,
        }
    }

    /// Document number, `None` for manual entries.
    #[must_use]
    pub fn number(&self) -> Option<&str> {
        match self {
            Self::SaleInvoice { number, .. }
            | Self::SaleCreditNote { number, .. }
            | Self::PurchaseInvoice { number, .. }
            | Self::PurchaseCreditNote { number, .. }
            | Self::ClientPayment { number, .. }
            | Self::SupplierPayment { number, .. } => Some(number),
            Self::Manual => None,
        }
    }

    /// Short tag of the document kind.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::SaleInvoice { .. } => "sale_invoice",
            Self::SaleCreditNote { .. } => "sale_credit_note",
            Self::PurchaseInvoice { .. } => "purchase_invoice",
            Self::PurchaseCreditNote { .. } => "purchase_credit_note",
            Self::ClientPayment { .. } => "client_payment",
            Self::SupplierPayment { .. } => "supplier_payment",
            Self::Manual => "manual",
        }
    }
}

/// How a payment was settled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    /// Cash.
    Cash,
    /// Cheque.
    Cheque,
    /// Bank transfer.
    Transfer,
    /// Card payment.
    Card,
    /// Mobile money wallet.
    MobileMoney,
}

/// A sale or purchase invoice (or credit note) to post.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvoiceDoc {
    /// Document id in the surrounding system.
    pub id: DocumentId,
    /// Document number.
    pub number: String,
    /// Invoice date.
    pub date: NaiveDate,
    /// Customer or supplier display name.
    pub counterpart: String,
    /// Tax-exclusive total.
    pub amount_excl_tax: Decimal,
    /// VAT amount.
    pub tax_amount: Decimal,
    /// Tax-inclusive total.
    pub amount_incl_tax: Decimal,
    /// Credit notes reverse the sides of the invoice posting.
    #[serde(default)]
    pub is_credit_note: bool,
}

impl InvoiceDoc {
    /// Checks amounts: non-negative, `incl == excl + tax`, total above zero.
    ///
    /// # Errors
    ///
    /// Returns `ValidationFailed` describing the first problem found.
    pub fn check(&self) -> Result<(), LedgerError> {
        if self.amount_excl_tax < Decimal::ZERO
            || self.tax_amount < Decimal::ZERO
            || self.amount_incl_tax < Decimal::ZERO
        {
            return Err(LedgerError::ValidationFailed(format!(
                "invoice {} has a negative amount",
                self.number
            )));
        }
        if self.amount_incl_tax.is_zero() {
            return Err(LedgerError::ValidationFailed(format!(
                "invoice {} has a zero total",
                self.number
            )));
        }
        if self.amount_excl_tax + self.tax_amount != self.amount_incl_tax {
            return Err(LedgerError::ValidationFailed(format!(
                "invoice {}: {} + {} != {}",
                self.number, self.amount_excl_tax, self.tax_amount, self.amount_incl_tax
            )));
        }
        Ok(())
    }
}

/// A settled payment to post.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentDoc {
    /// Document id in the surrounding system.
    pub id: DocumentId,
    /// Payment number.
    pub number: String,
    /// Settlement date.
    pub date: NaiveDate,
    /// Customer or supplier display name.
    pub counterpart: String,
    /// Settled amount.
    pub amount: Decimal,
    /// Payment method.
    pub method: PaymentMethod,
}

impl PaymentDoc {
    /// Checks that the amount is strictly positive.
    ///
    /// # Errors
    ///
    /// Returns `ValidationFailed` otherwise.
    pub fn check(&self) -> Result<(), LedgerError> {
        if self.amount <= Decimal::ZERO {
            return Err(LedgerError::ValidationFailed(format!(
                "payment {} must have a positive amount",
                self.number
            )));
        }
        Ok(())
    }
}

/// One caller-supplied line of a manual entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManualLineInput {
    /// Postable account code.
    pub account_code: String,
    /// Line label, defaults to the entry label.
    #[serde(default)]
    pub label: Option<String>,
    /// Debit amount.
    #[serde(default)]
    pub debit: Decimal,
    /// Credit amount.
    #[serde(default)]
    pub credit: Decimal,
}

/// A manual entry, stored as a draft until validated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManualEntryInput {
    /// Target journal.
    pub journal: JournalCode,
    /// Posting date.
    pub date: NaiveDate,
    /// Entry label.
    pub label: String,
    /// Free-text reference.
    #[serde(default)]
    pub reference: Option<String>,
    /// The lines (at least 2).
    pub lines: Vec<ManualLineInput>,
}

/// Debit and credit sums of an entry or a selection of lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntryTotals {
    /// Total debit amount.
    pub debit: Decimal,
    /// Total credit amount.
    pub credit: Decimal,
}

impl EntryTotals {
    /// Sums `(debit, credit)` pairs.
    pub fn from_amounts<I>(amounts: I) -> Self
    where
        I: IntoIterator<Item = (Decimal, Decimal)>,
    {
        amounts.into_iter().fold(
            Self {
                debit: Decimal::ZERO,
                credit: Decimal::ZERO,
            },
            |acc, (debit, credit)| Self {
                debit: acc.debit + debit,
                credit: acc.credit + credit,
            },
        )
    }

    /// Returns true if debits equal credits.
    #[must_use]
    pub fn is_balanced(&self) -> bool {
        self.debit == self.credit
    }

    /// Returns the difference between debits and credits.
    #[must_use]
    pub fn difference(&self) -> Decimal {
        self.debit - self.credit
    }
}
