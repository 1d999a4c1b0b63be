//! Recurrence error types.

use thiserror::Error;
use tresor_shared::types::RecurringTransactionId;

use super::rule::RuleStatus;
use crate::store::StoreError;

/// Errors from rule management operations (pause/resume/cancel).
#[derive(Debug, Error)]
pub enum RuleError {
    /// Rule not found.
    #[error("Recurring rule not found: {0}")]
    NotFound(RecurringTransactionId),

    /// The requested status change is not a valid transition.
    #[error("Invalid rule transition: {from} -> {to}")]
    InvalidTransition {
        /// Current status.
        from: RuleStatus,
        /// Requested status.
        to: RuleStatus,
    },

    /// The backing store failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Error aborting a whole due cycle.
///
/// Individual rule failures never produce this: they are recorded in the
/// cycle report. Only a failure of the due-rule query itself aborts the
/// cycle, to be retried wholesale on the next trigger.
#[derive(Debug, Error)]
pub enum CycleError {
    /// The due-rule query could not execute.
    #[error("Due-rule query failed: {0}")]
    Store(#[from] StoreError),
}
