//! Chart of accounts: the account directory and its hierarchy.
//!
//! Accounts live in a flat table keyed by id with a code index; the parent
//! link is an id reference used only for reporting roll-ups.

use std::collections::{BTreeMap, HashMap, HashSet};

use ohada_shared::types::AccountId;
use parking_lot::RwLock;

use super::account::{Account, NewAccount, NormalSide, validate_code};
use crate::ledger::error::LedgerError;

#[derive(Debug, Default)]
struct ChartInner {
    accounts: HashMap<AccountId, Account>,
    by_code: BTreeMap<String, AccountId>,
}

impl ChartInner {
    fn find(&self, code: &str) -> Result<&Account, LedgerError> {
        self.by_code
            .get(code)
            .and_then(|id| self.accounts.get(id))
            .ok_or_else(|| LedgerError::AccountNotFound(code.to_string()))
    }

    fn resolve(&self, code: &str) -> Result<&Account, LedgerError> {
        let account = self.find(code)?;
        if !account.is_postable {
            return Err(LedgerError::NotPostable(code.to_string()));
        }
        if !account.is_active {
            return Err(LedgerError::AccountInactive(code.to_string()));
        }
        Ok(account)
    }

    /// Returns true if `ancestor` is `id` itself or one of its ancestors.
    fn is_ancestor_or_self(&self, ancestor: AccountId, id: AccountId) -> bool {
        let mut seen = HashSet::new();
        let mut cursor = Some(id);
        while let Some(current) = cursor {
            if current == ancestor {
                return true;
            }
            if !seen.insert(current) {
                // Unreachable while the cycle guard holds; stop rather than loop.
                return false;
            }
            cursor = self.accounts.get(&current).and_then(|a| a.parent_id);
        }
        false
    }

    /// An account with children only aggregates; it stops receiving postings.
    fn make_collective(&mut self, id: AccountId) {
        if let Some(parent) = self.accounts.get_mut(&id) {
            parent.is_postable = false;
        }
    }
}

/// The numbered catalogue of accounts.
#[derive(Debug, Default)]
pub struct ChartOfAccounts {
    inner: RwLock<ChartInner>,
}

impl ChartOfAccounts {
    /// Creates an empty chart.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a new account.
    ///
    /// # Errors
    ///
    /// Returns an error if the code is invalid or taken, or the parent is
    /// unknown or belongs to another class.
    ///
    /// A postable parent becomes collective.
    pub fn create(&self, input: NewAccount) -> Result<Account, LedgerError> {
        let class = validate_code(&input.code)?;
        if input.label.trim().is_empty() {
            return Err(LedgerError::ValidationFailed(format!(
                "account {} needs a label",
                input.code
            )));
        }

        let mut inner = self.inner.write();
        if inner.by_code.contains_key(&input.code) {
            return Err(LedgerError::DuplicateAccountCode(input.code));
        }

        let parent_id = match input.parent_code.as_deref() {
            Some(parent_code) => {
                let parent = inner.find(parent_code)?;
                if parent.class != class {
                    return Err(LedgerError::ParentClassMismatch {
                        account: input.code,
                        parent: parent_code.to_string(),
                    });
                }
                Some(parent.id)
            }
            None => None,
        };

        let account = Account {
            id: AccountId::new(),
            normal_side: input
                .normal_side
                .unwrap_or_else(|| NormalSide::default_for_code(&input.code)),
            code: input.code,
            label: input.label,
            class,
            parent_id,
            is_postable: input.is_postable,
            is_system: input.is_system,
            is_active: true,
        };

        if let Some(parent_id) = parent_id {
            inner.make_collective(parent_id);
        }
        inner.by_code.insert(account.code.clone(), account.id);
        inner.accounts.insert(account.id, account.clone());
        Ok(account)
    }

    /// Looks up an account by code, postable or not.
    #[must_use]
    pub fn get(&self, code: &str) -> Option<Account> {
        self.inner.read().find(code).ok().cloned()
    }

    /// Looks up an account by id.
    #[must_use]
    pub fn get_by_id(&self, id: AccountId) -> Option<Account> {
        self.inner.read().accounts.get(&id).cloned()
    }

    /// Resolves a postable, active account by code.
    ///
    /// # Errors
    ///
    /// Returns `AccountNotFound`, `NotPostable` or `AccountInactive`.
    pub fn resolve(&self, code: &str) -> Result<Account, LedgerError> {
        self.inner.read().resolve(code).cloned()
    }

    /// Resolves several accounts under a single read guard.
    ///
    /// Either every code resolves or the first failure is returned, so a
    /// posting never sees a partially resolved set.
    ///
    /// # Errors
    ///
    /// Returns the first resolution error.
    pub fn resolve_all(&self, codes: &[&str]) -> Result<Vec<Account>, LedgerError> {
        let inner = self.inner.read();
        codes.iter().map(|code| inner.resolve(code).cloned()).collect()
    }

    /// Changes (or clears) an account's parent.
    ///
    /// # Errors
    ///
    /// Returns `AccountHierarchyCycle` if the new parent is the account itself
    /// or one of its descendants.
    ///
    /// A postable parent becomes collective.
    pub fn set_parent(&self, code: &str, parent_code: Option<&str>) -> Result<(), LedgerError> {
        let mut inner = self.inner.write();
        let account = inner.find(code)?.clone();

        let parent_id = match parent_code {
            Some(parent_code) => {
                let parent = inner.find(parent_code)?;
                if parent.class != account.class {
                    return Err(LedgerError::ParentClassMismatch {
                        account: code.to_string(),
                        parent: parent_code.to_string(),
                    });
                }
                if inner.is_ancestor_or_self(account.id, parent.id) {
                    return Err(LedgerError::AccountHierarchyCycle {
                        account: code.to_string(),
                        parent: parent_code.to_string(),
                    });
                }
                Some(parent.id)
            }
            None => None,
        };

        if let Some(stored) = inner.accounts.get_mut(&account.id) {
            stored.parent_id = parent_id;
        }
        if let Some(parent_id) = parent_id {
            inner.make_collective(parent_id);
        }
        Ok(())
    }

    /// Marks an account active or inactive.
    ///
    /// # Errors
    ///
    /// Returns `AccountNotFound` for unknown codes.
    pub fn set_active(&self, code: &str, active: bool) -> Result<(), LedgerError> {
        let mut inner = self.inner.write();
        let id = inner.find(code)?.id;
        if let Some(stored) = inner.accounts.get_mut(&id) {
            stored.is_active = active;
        }
        Ok(())
    }

    /// Deletes an account that is neither a system account nor a parent.
    ///
    /// Checking for existing postings is the caller's job since the chart
    /// does not see the entry log.
    ///
    /// # Errors
    ///
    /// Returns `SystemAccountProtected` or `AccountInUse`.
    pub fn delete(&self, code: &str) -> Result<Account, LedgerError> {
        let mut inner = self.inner.write();
        let account = inner.find(code)?.clone();
        if account.is_system {
            return Err(LedgerError::SystemAccountProtected(code.to_string()));
        }
        if inner
            .accounts
            .values()
            .any(|a| a.parent_id == Some(account.id))
        {
            return Err(LedgerError::AccountInUse(code.to_string()));
        }
        inner.by_code.remove(code);
        inner.accounts.remove(&account.id);
        Ok(account)
    }

    /// Direct children of an account, ordered by code.
    #[must_use]
    pub fn children(&self, code: &str) -> Vec<Account> {
        let inner = self.inner.read();
        let Ok(parent) = inner.find(code) else {
            return Vec::new();
        };
        inner
            .by_code
            .values()
            .filter_map(|id| inner.accounts.get(id))
            .filter(|a| a.parent_id == Some(parent.id))
            .cloned()
            .collect()
    }

    /// Ids of the account and every descendant, for roll-ups.
    #[must_use]
    pub fn subtree(&self, code: &str) -> Vec<AccountId> {
        let inner = self.inner.read();
        let Ok(root) = inner.find(code) else {
            return Vec::new();
        };
        inner
            .accounts
            .values()
            .filter(|a| inner.is_ancestor_or_self(root.id, a.id))
            .map(|a| a.id)
            .collect()
    }

    /// All accounts ordered by code.
    #[must_use]
    pub fn accounts(&self) -> Vec<Account> {
        let inner = self.inner.read();
        inner
            .by_code
            .values()
            .filter_map(|id| inner.accounts.get(id))
            .cloned()
            .collect()
    }

    /// Number of accounts.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.read().accounts.len()
    }

    /// Returns true if the chart has no accounts.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
