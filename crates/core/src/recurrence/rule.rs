//! Recurring transaction rules.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tresor_shared::types::{AccountId, Money, RecurringTransactionId, UserId};

use crate::ledger::TransactionType;

/// How often a rule recurs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Frequency {
    /// Every day.
    Daily,
    /// Every seven days.
    Weekly,
    /// Same day next month, clamped to the month's last day.
    Monthly,
    /// Same day next year (Feb 29 clamps to Feb 28 off leap years).
    Yearly,
}

impl std::fmt::Display for Frequency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Daily => write!(f, "daily"),
            Self::Weekly => write!(f, "weekly"),
            Self::Monthly => write!(f, "monthly"),
            Self::Yearly => write!(f, "yearly"),
        }
    }
}

/// Rule status.
///
/// Valid transitions: `Active ↔ Paused`, `Active → Cancelled` (end date
/// reached or explicit cancel). `Cancelled` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuleStatus {
    /// Rule is live and eligible for materialization.
    Active,
    /// Rule is paused by the user; skipped by due cycles.
    Paused,
    /// Rule is cancelled; never processed again. Terminal.
    Cancelled,
}

impl RuleStatus {
    /// Returns true if no further transitions are allowed.
    #[must_use]
    pub fn is_terminal(self) -> bool {
        self == Self::Cancelled
    }

    /// Returns true if moving from this status to `next` is a valid
    /// transition.
    #[must_use]
    pub fn can_transition_to(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Active, Self::Paused)
                | (Self::Paused, Self::Active)
                | (Self::Active, Self::Cancelled)
        )
    }
}

impl std::fmt::Display for RuleStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Active => write!(f, "active"),
            Self::Paused => write!(f, "paused"),
            Self::Cancelled => write!(f, "cancelled"),
        }
    }
}

/// A recurring transaction rule (subscription, standing order).
///
/// `next_due` is the smallest occurrence on or after `start_date` that has
/// not yet been materialized. The scheduler is the only writer of `next_due`
/// and `last_processed`, and only as part of a successful materialization
/// commit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecurringTransaction {
    /// Unique identifier.
    pub id: RecurringTransactionId,
    /// The account postings are made against.
    pub account_id: AccountId,
    /// The user who owns the rule.
    pub owner_id: UserId,
    /// Direction of the generated postings.
    pub transaction_type: TransactionType,
    /// Positive amount of each occurrence.
    pub amount: Money,
    /// Description carried onto each generated transaction.
    pub description: String,
    /// Optional category carried onto each generated transaction.
    pub category: Option<String>,
    /// Recurrence frequency.
    pub frequency: Frequency,
    /// First scheduled occurrence.
    pub start_date: NaiveDate,
    /// Last date the rule may run; occurrences on or after it never
    /// materialize.
    pub end_date: Option<NaiveDate>,
    /// The next occurrence to materialize.
    pub next_due: NaiveDate,
    /// When the rule last materialized an occurrence.
    pub last_processed: Option<DateTime<Utc>>,
    /// Current status.
    pub status: RuleStatus,
    /// When the rule was created.
    pub created_at: DateTime<Utc>,
    /// When the rule was last updated.
    pub updated_at: DateTime<Utc>,
}

impl RecurringTransaction {
    /// Creates a new active rule whose first occurrence is `start_date`.
    #[must_use]
    pub fn new(
        account_id: AccountId,
        owner_id: UserId,
        transaction_type: TransactionType,
        amount: Money,
        description: String,
        frequency: Frequency,
        start_date: NaiveDate,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: RecurringTransactionId::new(),
            account_id,
            owner_id,
            transaction_type,
            amount,
            description,
            category: None,
            frequency,
            start_date,
            end_date: None,
            next_due: start_date,
            last_processed: None,
            status: RuleStatus::Active,
            created_at: now,
            updated_at: now,
        }
    }

    /// Returns true if the rule should materialize on the given date:
    /// active, due, and not past its end date.
    #[must_use]
    pub fn is_due(&self, on: NaiveDate) -> bool {
        self.status == RuleStatus::Active
            && self.next_due <= on
            && self.end_date.is_none_or(|end| end > on)
    }

    /// Returns true if the rule's end date has passed.
    #[must_use]
    pub fn has_ended(&self, on: NaiveDate) -> bool {
        self.end_date.is_some_and(|end| end <= on)
    }
}
