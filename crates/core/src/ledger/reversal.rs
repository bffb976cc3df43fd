//! Reversal (contrepassation) of validated entries.

use chrono::NaiveDate;
use ohada_shared::types::{ActorId, FiscalPeriodId};

use super::entry::JournalEntry;

/// Prefix marking reversal labels.
pub const REVERSAL_PREFIX: &str = "Extourne";

/// Stateless builder for reversing entries.
pub struct ReversalService;

impl ReversalService {
    /// Builds the draft that cancels `original`.
    ///
    /// Same journal and source document, every line's debit and credit
    /// swapped, labels prefixed with [`REVERSAL_PREFIX`], linked back through
    /// `origin_entry`. The period is the one resolved for the reversal date.
    #[must_use]
    pub fn build(
        original: &JournalEntry,
        date: NaiveDate,
        period_id: FiscalPeriodId,
        actor: ActorId,
    ) -> JournalEntry {
        let lines = original
            .lines
            .iter()
            .map(|line| line.swapped(format!("{REVERSAL_PREFIX} {}", line.label)))
            .collect();

        let label = match original.number() {
            Some(number) => format!("{REVERSAL_PREFIX} {number} {}", original.label),
            None => format!("{REVERSAL_PREFIX} {}", original.label),
        };

        let mut reversal = JournalEntry::draft(
            original.journal,
            date,
            label,
            original.reference.clone(),
            period_id,
            lines,
            original.source.clone(),
            actor,
        );
        reversal.is_reversal = true;
        reversal.origin_entry = Some(original.id);
        reversal
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::accounts::{Account, AccountClass, NormalSide};
    use crate::ledger::entry::EntryLine;
    use crate::ledger::types::{JournalCode, SourceDocument};
    use chrono::Utc;
    use ohada_shared::types::AccountId;
    use rust_decimal_macros::dec;

    fn account(code: &str) -> Account {
        Account {
            id: AccountId::new(),
            code: code.to_string(),
            label: code.to_string(),
            class: AccountClass::from_code(code).unwrap(),
            normal_side: NormalSide::default_for_code(code),
            parent_id: None,
            is_postable: true,
            is_system: false,
            is_active: true,
        }
    }

    fn validated_entry() -> JournalEntry {
        let mut entry = JournalEntry::draft(
            JournalCode::Sales,
            NaiveDate::from_ymd_opt(2026, 1, 5).unwrap(),
            "Facture FA-1".to_string(),
            Some("FA-1".to_string()),
            FiscalPeriodId::new(),
            vec![
                EntryLine::debit(&account("411"), "Facture FA-1", dec!(118000)),
                EntryLine::credit(&account("701"), "Facture FA-1", dec!(100000)),
                EntryLine::credit(&account("4431"), "Facture FA-1", dec!(18000)),
            ],
            SourceDocument::Manual,
            ActorId::new(),
        );
        entry.mark_validated(1, ActorId::new(), Utc::now());
        entry
    }

    #[test]
    fn test_reversal_swaps_every_line() {
        let original = validated_entry();
        let date = NaiveDate::from_ymd_opt(2026, 2, 1).unwrap();
        let period = FiscalPeriodId::new();
        let reversal = ReversalService::build(&original, date, period, ActorId::new());

        assert!(reversal.is_reversal);
        assert_eq!(reversal.origin_entry, Some(original.id));
        assert_eq!(reversal.journal, original.journal);
        assert_eq!(reversal.date, date);
        assert_eq!(reversal.period_id, period);
        assert_eq!(reversal.label, "Extourne VT000001 Facture FA-1");
        assert_eq!(reversal.total_debit, original.total_credit);

        for (rev, orig) in reversal.lines.iter().zip(&original.lines) {
            assert_eq!(rev.debit, orig.credit);
            assert_eq!(rev.credit, orig.debit);
            assert_eq!(rev.account_id, orig.account_id);
            assert!(rev.label.starts_with(REVERSAL_PREFIX));
        }
    }
}
