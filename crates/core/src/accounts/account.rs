//! Account domain types.
//!
//! SYSCOHADA numbers accounts by class: the first digit of the code is the
//! class (1-8), every further digit narrows the account down.

use ohada_shared::types::AccountId;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::ledger::error::LedgerError;

/// Account class, given by the first digit of the account code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountClass {
    /// Class 1: equity and long-term resources.
    Resources,
    /// Class 2: fixed assets.
    FixedAssets,
    /// Class 3: inventory.
    Inventory,
    /// Class 4: third parties (clients, suppliers, state, staff).
    ThirdParties,
    /// Class 5: treasury.
    Treasury,
    /// Class 6: expenses of ordinary activities.
    Expenses,
    /// Class 7: revenue of ordinary activities.
    Revenue,
    /// Class 8: other income and expenses (HAO, income tax).
    OtherItems,
}

impl AccountClass {
    /// Parses the class from an account code.
    #[must_use]
    pub fn from_code(code: &str) -> Option<Self> {
        match code.chars().next()? {
            '1' => Some(Self::Resources),
            '2' => Some(Self::FixedAssets),
            '3' => Some(Self::Inventory),
            '4' => Some(Self::ThirdParties),
            '5' => Some(Self::Treasury),
            '6' => Some(Self::Expenses),
            '7' => Some(Self::Revenue),
            '8' => Some(Self::OtherItems),
            _ => None,
        }
    }

    /// Returns the class digit.
    #[must_use]
    pub const fn digit(self) -> u8 {
        match self {
            Self::Resources => 1,
            Self::FixedAssets => 2,
            Self::Inventory => 3,
            Self::ThirdParties => 4,
            Self::Treasury => 5,
            Self::Expenses => 6,
            Self::Revenue => 7,
            Self::OtherItems => 8,
        }
    }

    /// Returns true for classes reported on the balance sheet (1-5).
    #[must_use]
    pub const fn is_balance_sheet(self) -> bool {
        self.digit() <= 5
    }
}

/// Whether an account's code places it on the expense or revenue side of
/// the income statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IncomeNature {
    /// Expense (class 6, class 8 with an odd second digit).
    Expense,
    /// Revenue (class 7, class 8 with an even second digit).
    Revenue,
}

impl IncomeNature {
    /// Classifies an account code, `None` for balance-sheet accounts.
    ///
    /// In class 8, odd sub-classes (81, 83, 85, 87, 89) are charges and even
    /// ones (82, 84, 86, 88) are products.
    #[must_use]
    pub fn from_code(code: &str) -> Option<Self> {
        match AccountClass::from_code(code)? {
            AccountClass::Expenses => Some(Self::Expense),
            AccountClass::Revenue => Some(Self::Revenue),
            AccountClass::OtherItems => {
                let sub = code.chars().nth(1)?.to_digit(10)?;
                Some(if sub % 2 == 0 { Self::Revenue } else { Self::Expense })
            }
            _ => None,
        }
    }
}

/// Side on which an account's balance normally sits.
///
/// - Debit-normal: balance = debit - credit (assets, expenses)
/// - Credit-normal: balance = credit - debit (resources, liabilities, revenue)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NormalSide {
    /// Debit-normal account.
    Debit,
    /// Credit-normal account.
    Credit,
}

impl NormalSide {
    /// Default normal side for an account code.
    ///
    /// Contra accounts (28, 29, 39, 49, 59 depreciation and provisions) are
    /// credit-normal; receivables (41), supplier advances (409) and
    /// deductible VAT (445) are debit-normal within class 4.
    #[must_use]
    pub fn default_for_code(code: &str) -> Self {
        const CREDIT_CONTRA: [&str; 5] = ["28", "29", "39", "49", "59"];
        const DEBIT_THIRD_PARTY: [&str; 3] = ["41", "409", "445"];

        if CREDIT_CONTRA.iter().any(|p| code.starts_with(p)) {
            return Self::Credit;
        }
        match AccountClass::from_code(code) {
            Some(AccountClass::ThirdParties) => {
                if DEBIT_THIRD_PARTY.iter().any(|p| code.starts_with(p)) {
                    Self::Debit
                } else {
                    Self::Credit
                }
            }
            Some(AccountClass::Resources | AccountClass::Revenue) => Self::Credit,
            Some(AccountClass::OtherItems) => match IncomeNature::from_code(code) {
                Some(IncomeNature::Revenue) => Self::Credit,
                _ => Self::Debit,
            },
            _ => Self::Debit,
        }
    }

    /// Balance expressed on this side.
    #[must_use]
    pub fn balance(self, debit: Decimal, credit: Decimal) -> Decimal {
        match self {
            Self::Debit => debit - credit,
            Self::Credit => credit - debit,
        }
    }
}

/// An account of the chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    /// Unique identifier.
    pub id: AccountId,
    /// Digit-only account code, unique in the chart.
    pub code: String,
    /// Account label.
    pub label: String,
    /// Class derived from the first digit.
    pub class: AccountClass,
    /// Side on which the balance normally sits.
    pub normal_side: NormalSide,
    /// Parent account used for roll-ups.
    pub parent_id: Option<AccountId>,
    /// Only postable (imputable) accounts accept entry lines.
    pub is_postable: bool,
    /// System accounts cannot be deleted.
    pub is_system: bool,
    /// Inactive accounts reject new postings.
    pub is_active: bool,
}

/// Input for creating an account.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewAccount {
    /// Account code.
    pub code: String,
    /// Account label.
    pub label: String,
    /// Normal side, defaulted from the code when absent.
    pub normal_side: Option<NormalSide>,
    /// Code of the parent account.
    pub parent_code: Option<String>,
    /// Whether the account accepts postings.
    pub is_postable: bool,
    /// Whether the account is protected from deletion.
    pub is_system: bool,
}

/// Checks that a code is a non-empty digit string of a known class.
///
/// # Errors
///
/// Returns `InvalidAccountCode` otherwise.
pub fn validate_code(code: &str) -> Result<AccountClass, LedgerError> {
    if code.is_empty() || !code.chars().all(|c| c.is_ascii_digit()) {
        return Err(LedgerError::InvalidAccountCode(code.to_string()));
    }
    AccountClass::from_code(code).ok_or_else(|| LedgerError::InvalidAccountCode(code.to_string()))
}
