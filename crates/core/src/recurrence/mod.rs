//! Recurring transactions and the due-cycle scheduler.
//!
//! This module implements the recurrence half of the engine:
//! - Recurring transaction rules and their status lifecycle
//! - Pure schedule arithmetic (calendar-aware next occurrence)
//! - The scheduler that materializes due rules into ledger postings
//! - Cycle reports for observability
//! - Error types for rule management and cycle execution

pub mod error;
pub mod report;
pub mod rule;
pub mod schedule;
pub mod scheduler;

#[cfg(test)]
mod schedule_props;

pub use error::{CycleError, RuleError};
pub use report::{CycleReport, RuleFailure};
pub use rule::{Frequency, RecurringTransaction, RuleStatus};
pub use schedule::next_occurrence;
pub use scheduler::Scheduler;
