//! In-memory reference store.
//!
//! Backs the engine's tests and the sandbox binary. This is not a cache: it
//! is a complete [`LedgerStore`] whose conditional commits are genuinely
//! atomic, the in-memory analogue of a row-locked relational schema. All
//! state lives behind one `RwLock`; the lock is never held across an
//! `.await` point.

use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use tresor_shared::types::{AccountId, RecurringTransactionId, TransactionId};

use crate::ledger::{Account, Transaction, TransactionStatus};
use crate::recurrence::{RecurringTransaction, RuleStatus};

use super::{LedgerStore, RuleAdvance, StoreError, TransactionFilter};

#[derive(Debug, Default)]
struct State {
    accounts: HashMap<AccountId, Account>,
    transactions: HashMap<TransactionId, Transaction>,
    rules: HashMap<RecurringTransactionId, RecurringTransaction>,
}

/// In-memory [`LedgerStore`] implementation.
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: RwLock<State>,
}

impl MemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, State>, StoreError> {
        self.state
            .read()
            .map_err(|_| StoreError::Unavailable("store lock poisoned".to_string()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, State>, StoreError> {
        self.state
            .write()
            .map_err(|_| StoreError::Unavailable("store lock poisoned".to_string()))
    }
}

#[async_trait]
impl LedgerStore for MemoryStore {
    async fn account(&self, id: AccountId) -> Result<Account, StoreError> {
        self.read()?
            .accounts
            .get(&id)
            .cloned()
            .ok_or(StoreError::AccountNotFound(id))
    }

    async fn account_by_number(&self, number: &str) -> Result<Account, StoreError> {
        self.read()?
            .accounts
            .values()
            .find(|a| a.account_number == number)
            .cloned()
            .ok_or_else(|| StoreError::AccountNumberNotFound(number.to_string()))
    }

    async fn insert_account(&self, account: Account) -> Result<(), StoreError> {
        let mut state = self.write()?;
        if state
            .accounts
            .values()
            .any(|a| a.account_number == account.account_number)
        {
            return Err(StoreError::DuplicateAccountNumber(account.account_number));
        }
        state.accounts.insert(account.id, account);
        Ok(())
    }

    async fn transaction(&self, id: TransactionId) -> Result<Transaction, StoreError> {
        self.read()?
            .transactions
            .get(&id)
            .cloned()
            .ok_or(StoreError::TransactionNotFound(id))
    }

    async fn account_transactions(
        &self,
        account_id: AccountId,
        filter: TransactionFilter,
    ) -> Result<Vec<Transaction>, StoreError> {
        let state = self.read()?;
        let mut rows: Vec<Transaction> = state
            .transactions
            .values()
            .filter(|t| t.account_id == account_id)
            .filter(|t| filter.status.is_none_or(|s| t.status == s))
            .filter(|t| filter.from.is_none_or(|from| t.created_at.date_naive() >= from))
            .filter(|t| filter.to.is_none_or(|to| t.created_at.date_naive() <= to))
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.0.cmp(&a.id.0)));
        Ok(rows)
    }

    async fn commit_posting(
        &self,
        expected_version: i64,
        account_after: Account,
        transaction: Transaction,
    ) -> Result<(), StoreError> {
        let mut state = self.write()?;
        let stored = state
            .accounts
            .get(&account_after.id)
            .ok_or(StoreError::AccountNotFound(account_after.id))?;
        if stored.version != expected_version {
            return Err(StoreError::VersionConflict {
                account_id: account_after.id,
                expected: expected_version,
                actual: stored.version,
            });
        }
        state.transactions.insert(transaction.id, transaction);
        state.accounts.insert(account_after.id, account_after);
        Ok(())
    }

    async fn commit_materialization(
        &self,
        expected_version: i64,
        account_after: Account,
        transaction: Transaction,
        advance: RuleAdvance,
    ) -> Result<(), StoreError> {
        let mut state = self.write()?;

        // All checks before any mutation: the commit is all-or-nothing.
        let stored = state
            .accounts
            .get(&account_after.id)
            .ok_or(StoreError::AccountNotFound(account_after.id))?;
        if stored.version != expected_version {
            return Err(StoreError::VersionConflict {
                account_id: account_after.id,
                expected: expected_version,
                actual: stored.version,
            });
        }
        let rule = state
            .rules
            .get(&advance.rule_id)
            .ok_or(StoreError::RuleNotFound(advance.rule_id))?;
        if rule.next_due != advance.expected_next_due {
            return Err(StoreError::RuleConflict(advance.rule_id));
        }

        if let Some(rule) = state.rules.get_mut(&advance.rule_id) {
            rule.next_due = advance.next_due;
            rule.last_processed = Some(advance.last_processed);
            rule.updated_at = advance.last_processed;
        }
        state.transactions.insert(transaction.id, transaction);
        state.accounts.insert(account_after.id, account_after);
        Ok(())
    }

    async fn update_transaction_status(
        &self,
        id: TransactionId,
        status: TransactionStatus,
    ) -> Result<(), StoreError> {
        let mut state = self.write()?;
        let transaction = state
            .transactions
            .get_mut(&id)
            .ok_or(StoreError::TransactionNotFound(id))?;
        transaction.status = status;
        Ok(())
    }

    async fn update_transaction_metadata(
        &self,
        id: TransactionId,
        category: Option<String>,
        description: Option<String>,
    ) -> Result<(), StoreError> {
        let mut state = self.write()?;
        let transaction = state
            .transactions
            .get_mut(&id)
            .ok_or(StoreError::TransactionNotFound(id))?;
        if let Some(category) = category {
            transaction.category = Some(category);
        }
        if let Some(description) = description {
            transaction.description = description;
        }
        Ok(())
    }

    async fn insert_rule(&self, rule: RecurringTransaction) -> Result<(), StoreError> {
        let mut state = self.write()?;
        state.rules.insert(rule.id, rule);
        Ok(())
    }

    async fn rule(&self, id: RecurringTransactionId) -> Result<RecurringTransaction, StoreError> {
        self.read()?
            .rules
            .get(&id)
            .cloned()
            .ok_or(StoreError::RuleNotFound(id))
    }

    async fn due_rules(&self, on: NaiveDate) -> Result<Vec<RecurringTransaction>, StoreError> {
        let state = self.read()?;
        let mut due: Vec<RecurringTransaction> = state
            .rules
            .values()
            .filter(|r| r.is_due(on))
            .cloned()
            .collect();
        due.sort_by(|a, b| a.next_due.cmp(&b.next_due).then(a.id.0.cmp(&b.id.0)));
        Ok(due)
    }

    async fn expired_rules(&self, on: NaiveDate) -> Result<Vec<RecurringTransaction>, StoreError> {
        let state = self.read()?;
        Ok(state
            .rules
            .values()
            .filter(|r| r.status == RuleStatus::Active && r.has_ended(on))
            .cloned()
            .collect())
    }

    async fn update_rule_status(
        &self,
        id: RecurringTransactionId,
        status: RuleStatus,
    ) -> Result<(), StoreError> {
        let mut state = self.write()?;
        let rule = state.rules.get_mut(&id).ok_or(StoreError::RuleNotFound(id))?;
        rule.status = status;
        rule.updated_at = Utc::now();
        Ok(())
    }

    async fn cancel_rule(
        &self,
        id: RecurringTransactionId,
        effective: NaiveDate,
    ) -> Result<(), StoreError> {
        let mut state = self.write()?;
        let rule = state.rules.get_mut(&id).ok_or(StoreError::RuleNotFound(id))?;
        rule.end_date = Some(effective);
        rule.status = RuleStatus::Cancelled;
        rule.updated_at = Utc::now();
        Ok(())
    }
}
