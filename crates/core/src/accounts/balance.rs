//! Account balance projections.
//!
//! Balances are a materialized cache over the validated entry log. They are
//! only ever incremented by appended entries and can be rebuilt from scratch
//! at any time; nothing reads them as the system of record.

use dashmap::DashMap;
use ohada_shared::types::AccountId;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Cumulative debit and credit totals of one account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountBalance {
    /// The account ID.
    pub account_id: AccountId,
    /// Total debit amount.
    pub debit_total: Decimal,
    /// Total credit amount.
    pub credit_total: Decimal,
}

impl AccountBalance {
    /// Creates an empty balance.
    #[must_use]
    pub fn new(account_id: AccountId) -> Self {
        Self {
            account_id,
            debit_total: Decimal::ZERO,
            credit_total: Decimal::ZERO,
        }
    }

    /// Adds a debit amount.
    pub fn add_debit(&mut self, amount: Decimal) {
        self.debit_total += amount;
    }

    /// Adds a credit amount.
    pub fn add_credit(&mut self, amount: Decimal) {
        self.credit_total += amount;
    }

    /// Net balance, debit minus credit.
    #[must_use]
    pub fn net(&self) -> Decimal {
        self.debit_total - self.credit_total
    }
}

/// Per-account balance cache, safe to update from concurrent validations.
#[derive(Debug, Default)]
pub struct BalanceProjection {
    balances: DashMap<AccountId, AccountBalance>,
}

impl BalanceProjection {
    /// Creates an empty projection.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records one posted line.
    pub fn record(&self, account_id: AccountId, debit: Decimal, credit: Decimal) {
        let mut balance = self
            .balances
            .entry(account_id)
            .or_insert_with(|| AccountBalance::new(account_id));
        balance.add_debit(debit);
        balance.add_credit(credit);
    }

    /// Replaces every cached total with the sums of the given postings.
    ///
    /// Meant for a quiescent ledger: postings recorded while the rebuild runs
    /// may be lost.
    pub fn rebuild<I>(&self, postings: I)
    where
        I: IntoIterator<Item = (AccountId, Decimal, Decimal)>,
    {
        let fresh = Self::new();
        for (account_id, debit, credit) in postings {
            fresh.record(account_id, debit, credit);
        }
        self.balances.clear();
        for (account_id, balance) in fresh.balances {
            self.balances.insert(account_id, balance);
        }
    }

    /// Current totals of an account (zero if never posted to).
    #[must_use]
    pub fn get(&self, account_id: AccountId) -> AccountBalance {
        self.balances
            .get(&account_id)
            .map_or_else(|| AccountBalance::new(account_id), |b| b.clone())
    }

    /// Copy of every non-empty balance.
    #[must_use]
    pub fn snapshot(&self) -> Vec<AccountBalance> {
        self.balances.iter().map(|b| b.value().clone()).collect()
    }
}

/// Running balance information for a ledger line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunningBalance {
    /// Position of the line on the account (monotonically increasing).
    pub account_version: i64,
    /// Balance before this line.
    pub previous_balance: Decimal,
    /// Balance after this line.
    pub current_balance: Decimal,
}

impl RunningBalance {
    /// Starting point carrying an opening balance.
    #[must_use]
    pub fn opening(balance: Decimal) -> Self {
        Self {
            account_version: 0,
            previous_balance: balance,
            current_balance: balance,
        }
    }

    /// Creates a new running balance based on the previous line.
    ///
    /// - `current_balance[N] = previous_balance[N] + balance_change`
    /// - `previous_balance[N] = current_balance[N-1]`
    #[must_use]
    pub fn next_entry(previous: &Self, balance_change: Decimal) -> Self {
        Self {
            account_version: previous.account_version + 1,
            previous_balance: previous.current_balance,
            current_balance: previous.current_balance + balance_change,
        }
    }
}
