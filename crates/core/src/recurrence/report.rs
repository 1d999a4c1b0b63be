//! Cycle reports for observability.

use serde::Serialize;
use tresor_shared::types::RecurringTransactionId;

/// One rule that failed to materialize during a cycle.
///
/// The rule was left due and will be retried on the next cycle.
#[derive(Debug, Clone, Serialize)]
pub struct RuleFailure {
    /// The rule that failed.
    pub rule_id: RecurringTransactionId,
    /// Stable error code of the failure.
    pub code: &'static str,
    /// Human-readable failure detail.
    pub reason: String,
}

/// Outcome of one due cycle, for alerting by the trigger.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CycleReport {
    /// Number of due rules the cycle attempted.
    pub attempted: usize,
    /// Rules that materialized a transaction.
    pub succeeded: usize,
    /// Rules whose occurrence was claimed by a concurrent cycle.
    pub skipped: usize,
    /// Active rules cancelled because their end date had passed.
    pub expired: usize,
    /// Rules that failed and were left due for the next cycle.
    pub failed: Vec<RuleFailure>,
}

impl CycleReport {
    /// Returns true if every attempted rule either materialized or was
    /// legitimately claimed elsewhere.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }
}
