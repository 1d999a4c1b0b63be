//! The due-cycle scheduler.
//!
//! Converts due recurrence rules into ledger postings. Each rule advances
//! exactly once per due occurrence: the schedule advance commits in the same
//! atomic unit as the posting and is conditional on the stored `next_due`,
//! so overlapping cycles cannot double-materialize an occurrence, and a
//! failed posting leaves the rule due for the next cycle.
//!
//! The scheduler is cadence-agnostic: an external trigger decides when to
//! call [`Scheduler::run_due_cycle`] and passes the reference timestamp in.

use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};
use tracing::{debug, info, warn};
use tresor_shared::EngineConfig;
use tresor_shared::types::RecurringTransactionId;

use super::error::{CycleError, RuleError};
use super::report::{CycleReport, RuleFailure};
use super::rule::{RecurringTransaction, RuleStatus};
use super::schedule::next_occurrence;
use crate::ledger::{LedgerError, LedgerService, PostingInput, Transaction};
use crate::store::{LedgerStore, RuleAdvance, StoreError};

/// The recurrence scheduler.
///
/// Owns `next_due`/`last_processed` mutation; all balance changes go through
/// the ledger posting service.
#[derive(Debug)]
pub struct Scheduler<S> {
    store: Arc<S>,
    ledger: LedgerService<S>,
}

impl<S: LedgerStore> Scheduler<S> {
    /// Creates a scheduler over the given store.
    #[must_use]
    pub fn new(store: Arc<S>, config: &EngineConfig) -> Self {
        let ledger = LedgerService::new(Arc::clone(&store), config.posting.clone());
        Self { store, ledger }
    }

    /// Runs one due cycle as of `now`.
    ///
    /// Sweeps expired rules to `Cancelled`, then materializes every due rule
    /// independently: one rule's failure never prevents the others from
    /// being attempted, and a failed rule is left due so the next cycle
    /// retries it.
    ///
    /// # Errors
    ///
    /// Returns `CycleError::Store` only if the due-rule query itself cannot
    /// execute; the whole cycle is then retried on the next trigger.
    pub async fn run_due_cycle(&self, now: DateTime<Utc>) -> Result<CycleReport, CycleError> {
        let today = now.date_naive();
        let mut report = CycleReport::default();

        self.sweep_expired(today, &mut report).await;

        let due = self.store.due_rules(today).await?;
        info!(due = due.len(), %today, "Starting due cycle");

        for rule in due {
            report.attempted += 1;
            match self.materialize(&rule, now).await {
                Ok(transaction) => {
                    report.succeeded += 1;
                    info!(
                        rule_id = %rule.id,
                        transaction_id = %transaction.id,
                        "Materialized recurring transaction"
                    );
                }
                Err(LedgerError::RuleConflict(_)) => {
                    report.skipped += 1;
                    debug!(
                        rule_id = %rule.id,
                        "Occurrence already claimed by a concurrent cycle"
                    );
                }
                Err(err) => {
                    warn!(
                        rule_id = %rule.id,
                        error = %err,
                        "Recurring transaction failed, rule left due"
                    );
                    report.failed.push(RuleFailure {
                        rule_id: rule.id,
                        code: err.error_code(),
                        reason: err.to_string(),
                    });
                }
            }
        }

        info!(
            attempted = report.attempted,
            succeeded = report.succeeded,
            skipped = report.skipped,
            expired = report.expired,
            failed = report.failed.len(),
            "Due cycle complete"
        );
        Ok(report)
    }

    /// Cancels active rules whose end date has passed. Failures degrade to
    /// report entries; the cycle continues.
    async fn sweep_expired(&self, today: NaiveDate, report: &mut CycleReport) {
        let expired = match self.store.expired_rules(today).await {
            Ok(expired) => expired,
            Err(err) => {
                warn!(error = %err, "Expired-rule sweep query failed");
                return;
            }
        };

        for rule in expired {
            match self
                .store
                .update_rule_status(rule.id, RuleStatus::Cancelled)
                .await
            {
                Ok(()) => {
                    report.expired += 1;
                    info!(rule_id = %rule.id, "Rule reached its end date, cancelled");
                }
                Err(err) => {
                    warn!(rule_id = %rule.id, error = %err, "Failed to cancel expired rule");
                    report.failed.push(RuleFailure {
                        rule_id: rule.id,
                        code: "STORE_UNAVAILABLE",
                        reason: err.to_string(),
                    });
                }
            }
        }
    }

    /// Materializes one due occurrence of a rule.
    ///
    /// The posting carries a [`RuleAdvance`] claiming the occurrence: the
    /// schedule advances from the scheduled date (never from `now`, which
    /// would drift the calendar alignment) in the same atomic commit as the
    /// posting.
    async fn materialize(
        &self,
        rule: &RecurringTransaction,
        now: DateTime<Utc>,
    ) -> Result<Transaction, LedgerError> {
        let advance = RuleAdvance {
            rule_id: rule.id,
            expected_next_due: rule.next_due,
            next_due: next_occurrence(rule.frequency, rule.next_due),
            last_processed: now,
        };
        self.ledger
            .post_transaction(PostingInput {
                account_id: rule.account_id,
                transaction_type: rule.transaction_type,
                amount: rule.amount,
                description: rule.description.clone(),
                category: rule.category.clone(),
                reference: None,
                recurring_transaction_id: Some(rule.id),
                reverses: None,
                advance: Some(advance),
            })
            .await
    }

    /// Pauses an active rule.
    ///
    /// # Errors
    ///
    /// `NotFound`, `InvalidTransition`, or `Store`.
    pub async fn pause_rule(&self, id: RecurringTransactionId) -> Result<(), RuleError> {
        self.transition(id, RuleStatus::Paused).await
    }

    /// Resumes a paused rule.
    ///
    /// # Errors
    ///
    /// `NotFound`, `InvalidTransition`, or `Store`.
    pub async fn resume_rule(&self, id: RecurringTransactionId) -> Result<(), RuleError> {
        self.transition(id, RuleStatus::Active).await
    }

    /// Cancels an active rule: sets its end date and moves it to
    /// `Cancelled`. History is kept; the rule is simply never processed
    /// again.
    ///
    /// # Errors
    ///
    /// `NotFound`, `InvalidTransition`, or `Store`.
    pub async fn cancel_rule(
        &self,
        id: RecurringTransactionId,
        effective: NaiveDate,
    ) -> Result<(), RuleError> {
        let rule = self.store.rule(id).await.map_err(rule_error)?;
        if !rule.status.can_transition_to(RuleStatus::Cancelled) {
            return Err(RuleError::InvalidTransition {
                from: rule.status,
                to: RuleStatus::Cancelled,
            });
        }
        self.store
            .cancel_rule(id, effective)
            .await
            .map_err(rule_error)?;
        info!(rule_id = %id, %effective, "Cancelled recurring rule");
        Ok(())
    }

    async fn transition(
        &self,
        id: RecurringTransactionId,
        to: RuleStatus,
    ) -> Result<(), RuleError> {
        let rule = self.store.rule(id).await.map_err(rule_error)?;
        if !rule.status.can_transition_to(to) {
            return Err(RuleError::InvalidTransition {
                from: rule.status,
                to,
            });
        }
        self.store
            .update_rule_status(id, to)
            .await
            .map_err(rule_error)?;
        info!(rule_id = %id, status = %to, "Updated recurring rule status");
        Ok(())
    }
}

fn rule_error(err: StoreError) -> RuleError {
    match err {
        StoreError::RuleNotFound(id) => RuleError::NotFound(id),
        other => RuleError::Store(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::{Account, TransactionType};
    use crate::recurrence::rule::Frequency;
    use crate::store::MemoryStore;
    use rust_decimal_macros::dec;
    use tresor_shared::types::{Currency, Money, UserId};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn at(day: NaiveDate) -> DateTime<Utc> {
        day.and_hms_opt(6, 0, 0).unwrap().and_utc()
    }

    async fn seed(
        store: &Arc<MemoryStore>,
        balance: rust_decimal::Decimal,
    ) -> Account {
        let account = Account::new(
            UserId::new(),
            format!("GB-{}", UserId::new()),
            Money::new(balance, Currency::Gbp),
        );
        store.insert_account(account.clone()).await.unwrap();
        account
    }

    fn monthly_debit(account: &Account, amount: rust_decimal::Decimal, start: NaiveDate) -> RecurringTransaction {
        RecurringTransaction::new(
            account.id,
            account.owner_id,
            TransactionType::Debit,
            Money::new(amount, Currency::Gbp),
            "Standing order".to_string(),
            Frequency::Monthly,
            start,
        )
    }

    #[tokio::test]
    async fn test_paused_rule_is_not_processed() {
        let store = Arc::new(MemoryStore::new());
        let account = seed(&store, dec!(100.00)).await;
        let mut rule = monthly_debit(&account, dec!(10.00), date(2024, 1, 15));
        rule.status = RuleStatus::Paused;
        store.insert_rule(rule).await.unwrap();

        let scheduler = Scheduler::new(Arc::clone(&store), &EngineConfig::default());
        let report = scheduler.run_due_cycle(at(date(2024, 1, 20))).await.unwrap();

        assert_eq!(report.attempted, 0);
        assert_eq!(
            store.account(account.id).await.unwrap().balance.amount,
            dec!(100.00)
        );
    }

    #[tokio::test]
    async fn test_expired_rule_is_cancelled_not_materialized() {
        let store = Arc::new(MemoryStore::new());
        let account = seed(&store, dec!(100.00)).await;
        let mut rule = monthly_debit(&account, dec!(10.00), date(2024, 1, 15));
        rule.end_date = Some(date(2024, 1, 18));
        let rule_id = rule.id;
        store.insert_rule(rule).await.unwrap();

        let scheduler = Scheduler::new(Arc::clone(&store), &EngineConfig::default());
        let report = scheduler.run_due_cycle(at(date(2024, 1, 20))).await.unwrap();

        assert_eq!(report.expired, 1);
        assert_eq!(report.attempted, 0);
        assert_eq!(
            store.rule(rule_id).await.unwrap().status,
            RuleStatus::Cancelled
        );
        assert_eq!(
            store.account(account.id).await.unwrap().balance.amount,
            dec!(100.00)
        );
    }

    #[tokio::test]
    async fn test_pause_resume_cancel_transitions() {
        let store = Arc::new(MemoryStore::new());
        let account = seed(&store, dec!(100.00)).await;
        let rule = monthly_debit(&account, dec!(10.00), date(2024, 1, 15));
        let rule_id = rule.id;
        store.insert_rule(rule).await.unwrap();

        let scheduler = Scheduler::new(Arc::clone(&store), &EngineConfig::default());

        scheduler.pause_rule(rule_id).await.unwrap();
        assert_eq!(store.rule(rule_id).await.unwrap().status, RuleStatus::Paused);

        // A paused rule cannot be cancelled directly.
        let result = scheduler.cancel_rule(rule_id, date(2024, 2, 1)).await;
        assert!(matches!(
            result,
            Err(RuleError::InvalidTransition {
                from: RuleStatus::Paused,
                to: RuleStatus::Cancelled,
            })
        ));

        scheduler.resume_rule(rule_id).await.unwrap();
        scheduler.cancel_rule(rule_id, date(2024, 2, 1)).await.unwrap();

        let cancelled = store.rule(rule_id).await.unwrap();
        assert_eq!(cancelled.status, RuleStatus::Cancelled);
        assert_eq!(cancelled.end_date, Some(date(2024, 2, 1)));

        // Cancelled is terminal.
        assert!(scheduler.resume_rule(rule_id).await.is_err());
        assert!(scheduler.pause_rule(rule_id).await.is_err());
    }

    #[tokio::test]
    async fn test_unknown_rule_is_not_found() {
        let store = Arc::new(MemoryStore::new());
        let scheduler = Scheduler::new(Arc::clone(&store), &EngineConfig::default());
        let result = scheduler.pause_rule(RecurringTransactionId::new()).await;
        assert!(matches!(result, Err(RuleError::NotFound(_))));
    }
}
