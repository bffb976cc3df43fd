//! Business events emitted by the surrounding system.

use serde::{Deserialize, Serialize};

use super::types::{InvoiceDoc, PaymentDoc};

/// A finalized business document that must be posted.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum BusinessEvent {
    /// A customer invoice or credit note was validated.
    SaleInvoiceValidated(InvoiceDoc),
    /// A supplier invoice or credit note was validated.
    PurchaseInvoiceValidated(InvoiceDoc),
    /// A customer payment was recorded.
    ClientPaymentValidated(PaymentDoc),
    /// A supplier payment was recorded.
    SupplierPaymentValidated(PaymentDoc),
}

impl BusinessEvent {
    /// Event name, as serialized.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::SaleInvoiceValidated(_) => "sale_invoice_validated",
            Self::PurchaseInvoiceValidated(_) => "purchase_invoice_validated",
            Self::ClientPaymentValidated(_) => "client_payment_validated",
            Self::SupplierPaymentValidated(_) => "supplier_payment_validated",
        }
    }

    /// Number of the document carried by the event.
    #[must_use]
    pub fn document_number(&self) -> &str {
        match self {
            Self::SaleInvoiceValidated(doc) | Self::PurchaseInvoiceValidated(doc) => &doc.number,
            Self::ClientPaymentValidated(doc) | Self::SupplierPaymentValidated(doc) => &doc.number,
        }
    }
}
