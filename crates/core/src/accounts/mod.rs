//! Chart of accounts and balance projections.

pub mod account;
pub mod balance;
pub mod chart;
pub mod seed;

#[cfg(test)]
mod chart_props;

pub use account::{Account, AccountClass, IncomeNature, NewAccount, NormalSide, validate_code};
pub use balance::{AccountBalance, BalanceProjection, RunningBalance};
pub use chart::ChartOfAccounts;
pub use seed::{SYSCOHADA_CHART, seed_syscohada};
