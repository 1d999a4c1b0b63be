//! Transaction records.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tresor_shared::types::{AccountId, Money, RecurringTransactionId, TransactionId, UserId};

/// Direction of a posting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    /// Credit: increases the account balance.
    Credit,
    /// Debit: decreases the account balance.
    Debit,
}

impl TransactionType {
    /// The signed balance effect of posting `amount` in this direction.
    #[must_use]
    pub fn signed_delta(self, amount: Decimal) -> Decimal {
        match self {
            Self::Credit => amount,
            Self::Debit => -amount,
        }
    }

    /// The opposite direction, used when reversing a posting.
    #[must_use]
    pub const fn inverse(self) -> Self {
        match self {
            Self::Credit => Self::Debit,
            Self::Debit => Self::Credit,
        }
    }
}

/// Transaction status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionStatus {
    /// Transaction is awaiting settlement; no balance effect yet.
    Pending,
    /// Transaction settled; its balance effect has been applied exactly once.
    Completed,
    /// Transaction failed; no balance effect.
    Failed,
    /// Transaction was cancelled or reversed; its balance effect has been
    /// undone by a reversing posting.
    Cancelled,
}

impl TransactionStatus {
    /// Returns true if this status carries a live balance effect.
    #[must_use]
    pub fn affects_balance(self) -> bool {
        self == Self::Completed
    }

    /// Returns true if no further state transitions are expected.
    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Failed | Self::Cancelled)
    }
}

/// A single ledger transaction against one account.
///
/// Created in the same atomic unit as the balance update it represents.
/// Immutable after completion except for category/description metadata edits,
/// which never affect the balance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    /// Unique identifier.
    pub id: TransactionId,
    /// The account this transaction belongs to.
    pub account_id: AccountId,
    /// The user who owns the account.
    pub owner_id: UserId,
    /// Credit or debit.
    pub transaction_type: TransactionType,
    /// Positive amount in the account's currency.
    pub amount: Money,
    /// Human-readable description.
    pub description: String,
    /// Optional category for reporting.
    pub category: Option<String>,
    /// Optional external reference (invoice number, payment reference).
    pub reference: Option<String>,
    /// Current status.
    pub status: TransactionStatus,
    /// The recurring rule that generated this transaction, if any.
    pub recurring_transaction_id: Option<RecurringTransactionId>,
    /// The transaction this posting reverses, if any.
    pub reverses: Option<TransactionId>,
    /// When the transaction was created.
    pub created_at: DateTime<Utc>,
}

impl Transaction {
    /// Returns true if this transaction is a reversal of another.
    #[must_use]
    pub fn is_reversal(&self) -> bool {
        self.reverses.is_some()
    }
}
