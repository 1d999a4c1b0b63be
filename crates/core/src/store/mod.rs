//! Storage capability for the engine.
//!
//! The engine performs no I/O of its own: hosts inject a [`LedgerStore`]
//! implementation (relational, document, whatever), and the bundled
//! [`MemoryStore`] backs tests and the sandbox binary. The trait is the
//! contract that makes the engine's invariants enforceable: conditional
//! commits are atomic (all-or-nothing) and reads always reflect the latest
//! committed state.

pub mod error;
pub mod memory;

pub use error::StoreError;
pub use memory::MemoryStore;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use tresor_shared::types::{AccountId, RecurringTransactionId, TransactionId};

use crate::ledger::{Account, Transaction, TransactionStatus};
use crate::recurrence::{RecurringTransaction, RuleStatus};

/// Schedule advance committed together with a materialized posting.
///
/// `expected_next_due` is the occurrence being claimed: the commit fails with
/// [`StoreError::RuleConflict`] if the stored rule has already moved past it,
/// which is what makes an occurrence materialize at most once across
/// overlapping due cycles.
#[derive(Debug, Clone)]
pub struct RuleAdvance {
    /// The rule being advanced.
    pub rule_id: RecurringTransactionId,
    /// The due date this commit claims; must equal the stored `next_due`.
    pub expected_next_due: NaiveDate,
    /// The successor due date to store.
    pub next_due: NaiveDate,
    /// The cycle timestamp recorded as `last_processed`.
    pub last_processed: DateTime<Utc>,
}

/// Filter for account transaction history queries.
#[derive(Debug, Clone, Copy, Default)]
pub struct TransactionFilter {
    /// Filter by status.
    pub status: Option<TransactionStatus>,
    /// Filter by creation date range start.
    pub from: Option<NaiveDate>,
    /// Filter by creation date range end.
    pub to: Option<NaiveDate>,
}

/// Storage abstraction for the ledger engine.
///
/// Implementations must guarantee that the `commit_*` operations are atomic
/// units: either every mutation in the call is applied or none is. Reads must
/// return the latest committed state; no caching of balances is permitted.
#[async_trait]
pub trait LedgerStore: Send + Sync {
    /// Fetches an account by ID.
    async fn account(&self, id: AccountId) -> Result<Account, StoreError>;

    /// Fetches an account by its external account number.
    async fn account_by_number(&self, number: &str) -> Result<Account, StoreError>;

    /// Inserts a new account; the account number must be unique.
    async fn insert_account(&self, account: Account) -> Result<(), StoreError>;

    /// Fetches a transaction by ID.
    async fn transaction(&self, id: TransactionId) -> Result<Transaction, StoreError>;

    /// Lists an account's transactions, newest first.
    async fn account_transactions(
        &self,
        account_id: AccountId,
        filter: TransactionFilter,
    ) -> Result<Vec<Transaction>, StoreError>;

    /// Commits a posting: persists the transaction row AND replaces the
    /// account (new balance, bumped version) as one atomic unit.
    ///
    /// Fails with [`StoreError::VersionConflict`] — and applies nothing — if
    /// the stored account version differs from `expected_version`.
    async fn commit_posting(
        &self,
        expected_version: i64,
        account_after: Account,
        transaction: Transaction,
    ) -> Result<(), StoreError>;

    /// Commits a posting together with its rule advance as one atomic unit.
    ///
    /// In addition to the version check of [`Self::commit_posting`], fails
    /// with [`StoreError::RuleConflict`] — applying nothing — if the stored
    /// rule's `next_due` differs from `advance.expected_next_due`.
    async fn commit_materialization(
        &self,
        expected_version: i64,
        account_after: Account,
        transaction: Transaction,
        advance: RuleAdvance,
    ) -> Result<(), StoreError>;

    /// Updates a transaction's status. Never touches balances.
    async fn update_transaction_status(
        &self,
        id: TransactionId,
        status: TransactionStatus,
    ) -> Result<(), StoreError>;

    /// Updates a transaction's category and/or description. Never touches
    /// balances; `None` leaves a field unchanged.
    async fn update_transaction_metadata(
        &self,
        id: TransactionId,
        category: Option<String>,
        description: Option<String>,
    ) -> Result<(), StoreError>;

    /// Inserts a new recurring transaction rule.
    async fn insert_rule(&self, rule: RecurringTransaction) -> Result<(), StoreError>;

    /// Fetches a rule by ID.
    async fn rule(&self, id: RecurringTransactionId) -> Result<RecurringTransaction, StoreError>;

    /// Lists rules due on the given date: active, `next_due <= on`, and not
    /// past their end date.
    async fn due_rules(&self, on: NaiveDate) -> Result<Vec<RecurringTransaction>, StoreError>;

    /// Lists active rules whose end date has passed.
    async fn expired_rules(&self, on: NaiveDate) -> Result<Vec<RecurringTransaction>, StoreError>;

    /// Updates a rule's status.
    async fn update_rule_status(
        &self,
        id: RecurringTransactionId,
        status: RuleStatus,
    ) -> Result<(), StoreError>;

    /// Cancels a rule: sets its end date and moves it to `Cancelled`.
    async fn cancel_rule(
        &self,
        id: RecurringTransactionId,
        effective: NaiveDate,
    ) -> Result<(), StoreError>;
}
