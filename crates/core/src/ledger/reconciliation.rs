//! Lettering (reconciliation) codes and selection checks.

use chrono::NaiveDate;
use ohada_shared::types::EntryLineId;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::entry::EntryLine;
use super::error::LedgerError;
use super::types::EntryTotals;

/// Outcome of a successful lettering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reconciliation {
    /// Account the lines belong to.
    pub account_code: String,
    /// Code stamped on every line.
    pub code: String,
    /// Lettering date.
    pub date: NaiveDate,
    /// Lines that received the code.
    pub line_ids: Vec<EntryLineId>,
}

/// Alphabetic code for the `index`-th lettering of an account.
///
/// 0 → `A`, 25 → `Z`, 26 → `AA`, 27 → `AB`, ...
#[must_use]
pub fn lettering_code(index: u64) -> String {
    let mut n = index + 1;
    let mut letters = Vec::new();
    while n > 0 {
        n -= 1;
        // n % 26 < 26 so the cast cannot truncate.
        #[allow(clippy::cast_possible_truncation)]
        letters.push(char::from(b'A' + (n % 26) as u8));
        n /= 26;
    }
    letters.iter().rev().collect()
}

/// Checks that a selection of lines can be lettered together.
///
/// # Errors
///
/// Returns `ValidationFailed` for fewer than two lines, `AlreadyReconciled`
/// if any line already carries a code and `UnbalancedMatch` if debits and
/// credits differ.
pub fn check_selection(lines: &[&EntryLine]) -> Result<EntryTotals, LedgerError> {
    if lines.len() < 2 {
        return Err(LedgerError::ValidationFailed(
            "reconciliation needs at least two lines on the account".to_string(),
        ));
    }
    if let Some(line) = lines.iter().find(|l| l.is_reconciled()) {
        return Err(LedgerError::AlreadyReconciled(line.id));
    }

    let totals = EntryTotals::from_amounts(lines.iter().map(|l| (l.debit, l.credit)));
    if totals.debit != totals.credit || totals.debit == Decimal::ZERO {
        return Err(LedgerError::UnbalancedMatch {
            debit: totals.debit,
            credit: totals.credit,
        });
    }
    Ok(totals)
}
