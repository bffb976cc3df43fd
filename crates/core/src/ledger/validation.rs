//! Business rule validation for entries.
//!
//! Line shape is checked whenever lines are created or replaced; balance is
//! only checked when an entry is validated, so drafts may be saved unbalanced.

use rust_decimal::Decimal;

use super::error::LedgerError;
use super::types::EntryTotals;

/// Checks the shape of a set of `(debit, credit)` line amounts.
///
/// - at least two lines
/// - no negative amount
/// - exactly one of debit and credit is positive on each line
///
/// # Errors
///
/// Returns the first violated rule, with the zero-based line index.
pub fn validate_line_shapes(amounts: &[(Decimal, Decimal)]) -> Result<(), LedgerError> {
    if amounts.len() < 2 {
        return Err(LedgerError::InsufficientLines);
    }

    for (index, (debit, credit)) in amounts.iter().enumerate() {
        if *debit < Decimal::ZERO || *credit < Decimal::ZERO {
            return Err(LedgerError::NegativeAmount(index));
        }
        match (debit.is_zero(), credit.is_zero()) {
            (false, false) => return Err(LedgerError::LineBothSides(index)),
            (true, true) => return Err(LedgerError::LineNoAmount(index)),
            _ => {}
        }
    }

    Ok(())
}

/// Checks that debits equal credits.
///
/// # Errors
///
/// Returns `Unbalanced` with both totals otherwise.
pub fn validate_balanced(totals: EntryTotals) -> Result<(), LedgerError> {
    if totals.is_balanced() {
        Ok(())
    } else {
        Err(LedgerError::Unbalanced {
            debit: totals.debit,
            credit: totals.credit,
        })
    }
}

/// Full check applied to entries that must be valid right away.
///
/// # Errors
///
/// Returns the shape or balance error.
pub fn validate_entry_lines(amounts: &[(Decimal, Decimal)]) -> Result<EntryTotals, LedgerError> {
    validate_line_shapes(amounts)?;
    let totals = EntryTotals::from_amounts(amounts.iter().copied());
    validate_balanced(totals)?;
    Ok(totals)
}
