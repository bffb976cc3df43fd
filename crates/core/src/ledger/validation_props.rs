//! Property-based tests for entry line rules.

use proptest::prelude::*;
use rust_decimal::Decimal;

use super::error::LedgerError;
use super::validation::{validate_entry_lines, validate_line_shapes};

/// Strategy to generate a valid positive amount (0.01 to 1,000,000.00).
fn positive_amount() -> impl Strategy<Value = Decimal> {
    (1i64..100_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

/// Strategy to generate one well-formed line.
fn line_strategy() -> impl Strategy<Value = (Decimal, Decimal)> {
    (positive_amount(), any::<bool>()).prop_map(|(amount, is_debit)| {
        if is_debit {
            (amount, Decimal::ZERO)
        } else {
            (Decimal::ZERO, amount)
        }
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Property 3.1: Balanced well-formed lines are accepted.
    ///
    /// *For any* set of well-formed lines closed by a balancing line,
    /// validation SHALL succeed and report equal totals.
    #[test]
    fn prop_balanced_lines_accepted(lines in prop::collection::vec(line_strategy(), 1..10)) {
        let net: Decimal = lines.iter().map(|(d, c)| d - c).sum();
        let mut lines = lines;
        if net > Decimal::ZERO {
            lines.push((Decimal::ZERO, net));
        } else if net < Decimal::ZERO {
            lines.push((-net, Decimal::ZERO));
        } else {
            // Already balanced; add a matching pair so there are 2+ lines.
            lines.push((Decimal::ONE, Decimal::ZERO));
            lines.push((Decimal::ZERO, Decimal::ONE));
        }

        let totals = validate_entry_lines(&lines).unwrap();
        prop_assert_eq!(totals.debit, totals.credit);
    }

    /// Property 3.2: Unbalanced lines are rejected with both totals.
    #[test]
    fn prop_unbalanced_lines_rejected(
        debit in positive_amount(),
        credit in positive_amount(),
    ) {
        prop_assume!(debit != credit);
        let result = validate_entry_lines(&[(debit, Decimal::ZERO), (Decimal::ZERO, credit)]);
        match result {
            Err(LedgerError::Unbalanced { debit: d, credit: c }) => {
                prop_assert_eq!(d, debit);
                prop_assert_eq!(c, credit);
            }
            other => prop_assert!(false, "expected Unbalanced, got {:?}", other),
        }
    }

    /// Property 3.3: A line carrying both sides is always rejected.
    #[test]
    fn prop_two_sided_line_rejected(
        a in positive_amount(),
        b in positive_amount(),
        other in line_strategy(),
    ) {
        let result = validate_line_shapes(&[other, (a, b)]);
        prop_assert!(matches!(result, Err(LedgerError::LineBothSides(1))));
    }
}
