//! Ledger error types for validation, account, and concurrency errors.
//!
//! This module defines all errors that can occur during posting operations,
//! including amount validation errors, account errors, transaction state
//! errors, and concurrency errors.

use rust_decimal::Decimal;
use thiserror::Error;
use tresor_shared::types::{AccountId, Currency, RecurringTransactionId, TransactionId};

use crate::store::StoreError;

/// Errors that can occur during ledger operations.
#[derive(Debug, Error)]
pub enum LedgerError {
    // ========== Amount Validation Errors ==========
    /// Posting amount cannot be zero.
    #[error("Posting amount cannot be zero")]
    ZeroAmount,

    /// Posting amount cannot be negative.
    #[error("Posting amount cannot be negative")]
    NegativeAmount,

    /// Posting amount has more fractional digits than the currency allows.
    #[error("Amount {amount} exceeds the minor-unit scale of {currency}")]
    InvalidScale {
        /// The currency whose scale was exceeded.
        currency: Currency,
        /// The offending amount.
        amount: Decimal,
    },

    /// Posting currency does not match the account currency.
    #[error("Currency mismatch: account holds {expected}, posting is {actual}")]
    CurrencyMismatch {
        /// The account's currency.
        expected: Currency,
        /// The posting's currency.
        actual: Currency,
    },

    // ========== Account Errors ==========
    /// Account not found.
    #[error("Account not found: {0}")]
    AccountNotFound(AccountId),

    /// Account is frozen and rejects all postings.
    #[error("Account {0} is frozen")]
    AccountFrozen(AccountId),

    /// Debit would drive the balance below zero.
    #[error(
        "Insufficient funds on account {account_id}: balance {balance}, requested {requested}"
    )]
    InsufficientFunds {
        /// The account that rejected the debit.
        account_id: AccountId,
        /// The balance at the time of the attempt.
        balance: Decimal,
        /// The debit amount that was requested.
        requested: Decimal,
    },

    // ========== Transaction State Errors ==========
    /// Transaction not found.
    #[error("Transaction not found: {0}")]
    TransactionNotFound(TransactionId),

    /// Only completed transactions can be reversed.
    #[error("Transaction {0} is not completed and cannot be reversed")]
    NotReversible(TransactionId),

    /// The transaction has already been reversed.
    #[error("Transaction {0} has already been reversed")]
    AlreadyReversed(TransactionId),

    // ========== Concurrency Errors ==========
    /// The posting kept losing the optimistic concurrency race.
    #[error("Concurrent postings on account {0}, please retry")]
    ConcurrencyConflict(AccountId),

    /// The rule occurrence was claimed by a concurrent due cycle.
    #[error("Occurrence of rule {0} was already materialized by a concurrent cycle")]
    RuleConflict(RecurringTransactionId),

    // ========== Store Errors ==========
    /// The backing store failed or timed out.
    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),
}

impl LedgerError {
    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::ZeroAmount => "ZERO_AMOUNT",
            Self::NegativeAmount => "NEGATIVE_AMOUNT",
            Self::InvalidScale { .. } => "INVALID_SCALE",
            Self::CurrencyMismatch { .. } => "CURRENCY_MISMATCH",
            Self::AccountNotFound(_) => "ACCOUNT_NOT_FOUND",
            Self::AccountFrozen(_) => "ACCOUNT_FROZEN",
            Self::InsufficientFunds { .. } => "INSUFFICIENT_FUNDS",
            Self::TransactionNotFound(_) => "TRANSACTION_NOT_FOUND",
            Self::NotReversible(_) => "NOT_REVERSIBLE",
            Self::AlreadyReversed(_) => "ALREADY_REVERSED",
            Self::ConcurrencyConflict(_) => "CONCURRENCY_CONFLICT",
            Self::RuleConflict(_) => "RULE_CONFLICT",
            Self::StoreUnavailable(_) => "STORE_UNAVAILABLE",
        }
    }

    /// Returns true if retrying the same call may succeed.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::ConcurrencyConflict(_) | Self::StoreUnavailable(_)
        )
    }

    /// Returns true if this error carries a deterministic, user-facing
    /// message. Everything else is reported generically to users with detail
    /// retained for operators.
    #[must_use]
    pub fn is_user_facing(&self) -> bool {
        matches!(self, Self::InsufficientFunds { .. } | Self::AccountFrozen(_))
    }
}

impl From<StoreError> for LedgerError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::AccountNotFound(id) => Self::AccountNotFound(id),
            StoreError::TransactionNotFound(id) => Self::TransactionNotFound(id),
            StoreError::VersionConflict { account_id, .. } => Self::ConcurrencyConflict(account_id),
            StoreError::RuleConflict(id) => Self::RuleConflict(id),
            // Store responses with no ledger-level meaning degrade to a
            // store-level failure.
            other => Self::StoreUnavailable(other.to_string()),
        }
    }
}
