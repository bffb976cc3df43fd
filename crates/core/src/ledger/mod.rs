//! Double-entry bookkeeping logic.
//!
//! This module implements the core ledger functionality:
//! - Journal entries and their lines
//! - Line and balance validation rules
//! - Automatic posting rules for business documents
//! - Reversal and reconciliation (lettering)
//! - The in-memory entry log
//! - Error types for ledger operations
//! - Ledger service tying chart, calendar and log together

pub mod entry;
pub mod error;
pub mod events;
pub mod posting;
pub mod reconciliation;
pub mod reversal;
pub mod service;
pub mod store;
pub mod types;
pub mod validation;

#[cfg(test)]
mod service_props;
#[cfg(test)]
mod validation_props;

pub use entry::{EntryLine, JournalEntry, Lettering};
pub use error::LedgerError;
pub use events::BusinessEvent;
pub use posting::{PlannedLine, PostingPlan};
pub use reconciliation::{Reconciliation, lettering_code};
pub use reversal::{REVERSAL_PREFIX, ReversalService};
pub use service::LedgerService;
pub use store::JournalStore;
pub use types::{
    EntryStatus, EntryTotals, InvoiceDoc, JournalCode, ManualEntryInput, ManualLineInput,
    PaymentDoc, PaymentMethod, SourceDocument,
};
pub use validation::{validate_balanced, validate_entry_lines, validate_line_shapes};
