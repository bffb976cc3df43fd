//! Property tests for the account hierarchy.

use proptest::prelude::*;

use super::account::NewAccount;
use super::chart::ChartOfAccounts;

const CODES: [&str; 6] = ["6", "60", "601", "604", "61", "618"];

fn build_chart() -> ChartOfAccounts {
    let chart = ChartOfAccounts::new();
    for code in CODES {
        chart
            .create(NewAccount {
                code: code.to_string(),
                label: format!("Account {code}"),
                is_postable: true,
                ..NewAccount::default()
            })
            .unwrap();
    }
    chart
}

/// Follows parent links from `code`, returning false if a code repeats.
fn chain_terminates(chart: &ChartOfAccounts, code: &str) -> bool {
    let mut seen = Vec::new();
    let mut cursor = chart.get(code);
    while let Some(account) = cursor {
        if seen.contains(&account.id) {
            return false;
        }
        seen.push(account.id);
        cursor = account.parent_id.and_then(|id| chart.get_by_id(id));
    }
    true
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// **Property 2.1: Re-parenting never creates a cycle**
    ///
    /// *For any* sequence of parent assignments, accepted or rejected, every
    /// parent chain in the chart still terminates at a root.
    #[test]
    fn prop_hierarchy_stays_acyclic(
        moves in prop::collection::vec((0..CODES.len(), prop::option::of(0..CODES.len())), 1..30),
    ) {
        let chart = build_chart();
        for (child, parent) in moves {
            let _ = chart.set_parent(CODES[child], parent.map(|p| CODES[p]));
        }
        for code in CODES {
            prop_assert!(chain_terminates(&chart, code));
        }
    }

    /// **Property 2.2: Self-parenting is always rejected**
    #[test]
    fn prop_self_parent_rejected(index in 0..CODES.len()) {
        let chart = build_chart();
        prop_assert!(chart.set_parent(CODES[index], Some(CODES[index])).is_err());
    }
}
