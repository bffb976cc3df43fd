//! Ledger error types for validation and state errors.
//!
//! This module defines all errors that can occur during ledger operations:
//! malformed input, unknown references, non-postable targets, unbalanced
//! postings, illegal repeated transitions and fiscal period errors. All of
//! them are deterministic and surfaced directly to the caller.

use chrono::NaiveDate;
use ohada_shared::AppError;
use ohada_shared::types::{EntryId, EntryLineId, FiscalPeriodId};
use rust_decimal::Decimal;
use thiserror::Error;

/// Errors that can occur during ledger operations.
#[derive(Debug, Error)]
pub enum LedgerError {
    // ========== Validation Errors ==========
    /// Malformed input that does not fit a more specific variant.
    #[error("Validation failed: {0}")]
    ValidationFailed(String),

    /// Entry must have at least 2 lines.
    #[error("Entry must have at least 2 lines")]
    InsufficientLines,

    /// Line amounts cannot be negative.
    #[error("Line {0} has a negative amount")]
    NegativeAmount(usize),

    /// Line carries both a debit and a credit.
    #[error("Line {0} must carry either a debit or a credit, not both")]
    LineBothSides(usize),

    /// Line carries neither a debit nor a credit.
    #[error("Line {0} must carry a debit or a credit amount")]
    LineNoAmount(usize),

    // ========== Account Errors ==========
    /// Account not found.
    #[error("Account not found: {0}")]
    AccountNotFound(String),

    /// Account is collective (aggregation only) and cannot receive postings.
    #[error("Account {0} is not postable")]
    NotPostable(String),

    /// Account is inactive and cannot be used.
    #[error("Account {0} is inactive")]
    AccountInactive(String),

    /// Account code is not a digit string of a class 1-8.
    #[error("Invalid account code: {0:?}")]
    InvalidAccountCode(String),

    /// Account code already exists in the chart.
    #[error("Account code {0} already exists")]
    DuplicateAccountCode(String),

    /// Parent assignment would create a cycle in the hierarchy.
    #[error("Setting {parent} as parent of {account} would create a cycle")]
    AccountHierarchyCycle {
        /// The account being re-parented.
        account: String,
        /// The rejected parent.
        parent: String,
    },

    /// Parent and child must belong to the same class.
    #[error("Account {account} and parent {parent} belong to different classes")]
    ParentClassMismatch {
        /// The child account.
        account: String,
        /// The parent account.
        parent: String,
    },

    /// System accounts cannot be deleted.
    #[error("Account {0} is a system account and cannot be deleted")]
    SystemAccountProtected(String),

    /// Accounts referenced by children or postings cannot be deleted.
    #[error("Account {0} is still in use")]
    AccountInUse(String),

    // ========== Fiscal Period Errors ==========
    /// Fiscal period not found.
    #[error("Fiscal period not found: {0}")]
    PeriodNotFound(FiscalPeriodId),

    /// No fiscal period covers the date and no current period exists.
    #[error("No open fiscal period for date {0}")]
    NoOpenPeriod(NaiveDate),

    /// Fiscal period is closed, no posting allowed.
    #[error("Fiscal period {0} is closed, no posting allowed")]
    PeriodClosed(String),

    /// Fiscal period was already closed.
    #[error("Fiscal period {0} is already closed")]
    AlreadyClosed(String),

    /// Fiscal periods cannot overlap.
    #[error("Fiscal period {code} overlaps existing period {existing}")]
    PeriodOverlap {
        /// The rejected period code.
        code: String,
        /// The period it overlaps.
        existing: String,
    },

    // ========== Entry Errors ==========
    /// Entry not found.
    #[error("Entry not found: {0}")]
    EntryNotFound(EntryId),

    /// Entry line not found.
    #[error("Entry line not found: {0}")]
    LineNotFound(EntryLineId),

    /// Entry is not balanced (debits != credits).
    #[error("Entry is not balanced. Debit: {debit}, Credit: {credit}")]
    Unbalanced {
        /// Total debit amount.
        debit: Decimal,
        /// Total credit amount.
        credit: Decimal,
    },

    /// Entry is no longer a draft.
    #[error("Entry {0} is already validated")]
    AlreadyValidated(EntryId),

    /// Only validated entries can be reversed.
    #[error("Only validated entries can be reversed: {0}")]
    OnlyValidatedCanBeReversed(EntryId),

    /// Entry already has a reversal.
    #[error("Entry {0} has already been reversed")]
    AlreadyReversed(EntryId),

    /// The originating document was already posted.
    #[error("Source document {0} is already posted")]
    DuplicateSourceDocument(String),

    // ========== Reconciliation Errors ==========
    /// Selected lines do not balance.
    #[error("Reconciliation selection is not balanced. Debit: {debit}, Credit: {credit}")]
    UnbalancedMatch {
        /// Total debit of the selection.
        debit: Decimal,
        /// Total credit of the selection.
        credit: Decimal,
    },

    /// Line already carries a reconciliation code.
    #[error("Line {0} is already reconciled")]
    AlreadyReconciled(EntryLineId),

    /// No lines carry the reconciliation code on this account.
    #[error("Reconciliation {code} not found on account {account}")]
    ReconciliationNotFound {
        /// Account code.
        account: String,
        /// Reconciliation code.
        code: String,
    },
}

impl LedgerError {
    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::ValidationFailed(_) => "VALIDATION_FAILED",
            Self::InsufficientLines => "INSUFFICIENT_LINES",
            Self::NegativeAmount(_) => "NEGATIVE_AMOUNT",
            Self::LineBothSides(_) => "LINE_BOTH_SIDES",
            Self::LineNoAmount(_) => "LINE_NO_AMOUNT",
            Self::AccountNotFound(_) => "ACCOUNT_NOT_FOUND",
            Self::NotPostable(_) => "NOT_POSTABLE",
            Self::AccountInactive(_) => "ACCOUNT_INACTIVE",
            Self::InvalidAccountCode(_) => "INVALID_ACCOUNT_CODE",
            Self::DuplicateAccountCode(_) => "DUPLICATE_ACCOUNT_CODE",
            Self::AccountHierarchyCycle { .. } => "ACCOUNT_HIERARCHY_CYCLE",
            Self::ParentClassMismatch { .. } => "PARENT_CLASS_MISMATCH",
            Self::SystemAccountProtected(_) => "SYSTEM_ACCOUNT_PROTECTED",
            Self::AccountInUse(_) => "ACCOUNT_IN_USE",
            Self::PeriodNotFound(_) => "PERIOD_NOT_FOUND",
            Self::NoOpenPeriod(_) => "NO_OPEN_PERIOD",
            Self::PeriodClosed(_) => "PERIOD_CLOSED",
            Self::AlreadyClosed(_) => "ALREADY_CLOSED",
            Self::PeriodOverlap { .. } => "PERIOD_OVERLAP",
            Self::EntryNotFound(_) => "ENTRY_NOT_FOUND",
            Self::LineNotFound(_) => "LINE_NOT_FOUND",
            Self::Unbalanced { .. } => "UNBALANCED",
            Self::AlreadyValidated(_) => "ALREADY_VALIDATED",
            Self::OnlyValidatedCanBeReversed(_) => "ONLY_VALIDATED_CAN_BE_REVERSED",
            Self::AlreadyReversed(_) => "ALREADY_REVERSED",
            Self::DuplicateSourceDocument(_) => "DUPLICATE_SOURCE_DOCUMENT",
            Self::UnbalancedMatch { .. } => "UNBALANCED_MATCH",
            Self::AlreadyReconciled(_) => "ALREADY_RECONCILED",
            Self::ReconciliationNotFound { .. } => "RECONCILIATION_NOT_FOUND",
        }
    }

    /// Returns true for malformed-input errors.
    #[must_use]
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::ValidationFailed(_)
                | Self::InsufficientLines
                | Self::NegativeAmount(_)
                | Self::LineBothSides(_)
                | Self::LineNoAmount(_)
                | Self::InvalidAccountCode(_)
                | Self::DuplicateAccountCode(_)
                | Self::AccountHierarchyCycle { .. }
                | Self::ParentClassMismatch { .. }
                | Self::PeriodOverlap { .. }
        )
    }
}

impl From<LedgerError> for AppError {
    fn from(err: LedgerError) -> Self {
        let message = err.to_string();
        match err {
            LedgerError::AccountNotFound(_)
            | LedgerError::PeriodNotFound(_)
            | LedgerError::EntryNotFound(_)
            | LedgerError::LineNotFound(_)
            | LedgerError::ReconciliationNotFound { .. } => Self::NotFound(message),

            LedgerError::AlreadyValidated(_)
            | LedgerError::AlreadyReconciled(_)
            | LedgerError::AlreadyClosed(_)
            | LedgerError::AlreadyReversed(_)
            | LedgerError::DuplicateSourceDocument(_) => Self::Conflict(message),

            ref other if other.is_validation() => Self::Validation(message),

            _ => Self::BusinessRule(message),
        }
    }
}
