//! Account record and status.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tresor_shared::types::{AccountId, Money, UserId};

/// Account status controlling whether postings are accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountStatus {
    /// Account accepts postings.
    Active,
    /// Account is frozen; all postings are rejected.
    Frozen,
}

/// A customer account: the balance and the metadata the ledger needs.
///
/// The balance is mutated exclusively through the posting path in
/// [`super::service::LedgerService`]; `version` is the optimistic concurrency
/// token bumped by every committed posting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    /// Unique identifier.
    pub id: AccountId,
    /// The user who owns this account.
    pub owner_id: UserId,
    /// External-facing account number, unique per store.
    pub account_number: String,
    /// Current balance. Equals the opening balance plus the sum of all
    /// completed postings; never negative.
    pub balance: Money,
    /// Current status.
    pub status: AccountStatus,
    /// Optimistic concurrency version, bumped on every committed posting.
    pub version: i64,
    /// When the account was opened.
    pub created_at: DateTime<Utc>,
    /// When the account was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Account {
    /// Opens a new active account with the given opening balance.
    #[must_use]
    pub fn new(owner_id: UserId, account_number: String, opening_balance: Money) -> Self {
        let now = Utc::now();
        Self {
            id: AccountId::new(),
            owner_id,
            account_number,
            balance: opening_balance,
            status: AccountStatus::Active,
            version: 0,
            created_at: now,
            updated_at: now,
        }
    }

    /// Returns true if the account is frozen.
    #[must_use]
    pub fn is_frozen(&self) -> bool {
        self.status == AccountStatus::Frozen
    }
}
