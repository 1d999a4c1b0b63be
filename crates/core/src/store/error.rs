//! Store error types.

use thiserror::Error;
use tresor_shared::types::{AccountId, RecurringTransactionId, TransactionId};

/// Errors surfaced by a [`super::LedgerStore`] implementation.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Account not found.
    #[error("Account not found: {0}")]
    AccountNotFound(AccountId),

    /// No account carries this account number.
    #[error("No account with number {0}")]
    AccountNumberNotFound(String),

    /// An account with this account number already exists.
    #[error("Account number {0} already exists")]
    DuplicateAccountNumber(String),

    /// Transaction not found.
    #[error("Transaction not found: {0}")]
    TransactionNotFound(TransactionId),

    /// Recurring rule not found.
    #[error("Recurring rule not found: {0}")]
    RuleNotFound(RecurringTransactionId),

    /// The account was modified since it was read; the commit applied nothing.
    #[error(
        "Version conflict on account {account_id}: expected {expected}, found {actual}"
    )]
    VersionConflict {
        /// The account whose version moved.
        account_id: AccountId,
        /// The version the caller read.
        expected: i64,
        /// The version actually stored.
        actual: i64,
    },

    /// The rule's `next_due` moved since it was read; the occurrence was
    /// claimed by a concurrent cycle and the commit applied nothing.
    #[error("Rule {0} was advanced concurrently")]
    RuleConflict(RecurringTransactionId),

    /// The store failed or timed out.
    #[error("Store unavailable: {0}")]
    Unavailable(String),
}
