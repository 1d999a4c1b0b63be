//! The posting service: the single choke point for balance change.
//!
//! Every balance mutation in the system goes through
//! [`LedgerService::post_transaction`]. The service validates the posting,
//! reads the account fresh from the store, computes the new balance, and
//! commits the transaction row and the balance update as one atomic,
//! version-checked unit. Losing the optimistic concurrency race is expected
//! under load and retried a bounded number of times before surfacing.

use std::sync::Arc;

use chrono::Utc;
use rust_decimal::Decimal;
use tracing::{debug, info, warn};
use tresor_shared::PostingConfig;
use tresor_shared::types::{AccountId, Money, RecurringTransactionId, TransactionId};

use super::error::LedgerError;
use super::transaction::{Transaction, TransactionStatus, TransactionType};
use super::validation;
use crate::store::{LedgerStore, RuleAdvance, StoreError};

/// Input for a single posting.
///
/// Interactive collaborators (transfers, bill pay, card transactions) fill
/// the first six fields and leave the rest `None`. The scheduler sets
/// `recurring_transaction_id` and `advance` when materializing a rule;
/// `reverses` is set by [`LedgerService::reverse_transaction`].
#[derive(Debug, Clone)]
pub struct PostingInput {
    /// The account to post against.
    pub account_id: AccountId,
    /// Credit or debit.
    pub transaction_type: TransactionType,
    /// Positive amount in the account's currency.
    pub amount: Money,
    /// Human-readable description.
    pub description: String,
    /// Optional category for reporting.
    pub category: Option<String>,
    /// Optional external reference.
    pub reference: Option<String>,
    /// The rule this posting materializes, if any.
    pub recurring_transaction_id: Option<RecurringTransactionId>,
    /// The transaction this posting reverses, if any.
    pub reverses: Option<TransactionId>,
    /// Rule advance to commit atomically with the posting, if any.
    pub advance: Option<RuleAdvance>,
}

/// The ledger posting service.
///
/// Holds the injected store and the posting configuration. Cheap to clone
/// per call site; safe to share across tasks.
#[derive(Debug)]
pub struct LedgerService<S> {
    store: Arc<S>,
    config: PostingConfig,
}

impl<S: LedgerStore> LedgerService<S> {
    /// Creates a new posting service over the given store.
    #[must_use]
    pub fn new(store: Arc<S>, config: PostingConfig) -> Self {
        Self { store, config }
    }

    /// Posts a transaction: validates, computes the new balance, and commits
    /// the transaction row together with the balance update as one atomic
    /// unit.
    ///
    /// The operation is deliberately NOT idempotent: two identical calls
    /// produce two distinct postings. Idempotency, where required, is the
    /// caller's responsibility (the scheduler achieves it through the rule
    /// advance committed alongside the posting).
    ///
    /// # Errors
    ///
    /// Validation errors (`ZeroAmount`, `NegativeAmount`, `InvalidScale`,
    /// `CurrencyMismatch`), `AccountNotFound`, `AccountFrozen`,
    /// `InsufficientFunds` on a debit that would go negative,
    /// `ConcurrencyConflict` after the bounded retries are exhausted,
    /// `RuleConflict` when the attached rule advance lost its claim, and
    /// `StoreUnavailable` on store failure. None of these leave any mutation
    /// behind.
    pub async fn post_transaction(&self, input: PostingInput) -> Result<Transaction, LedgerError> {
        validation::validate_amount(&input.amount)?;

        let max_attempts = self.config.max_attempts.max(1);
        for attempt in 1..=max_attempts {
            // Always a fresh read: no balance survives across calls.
            let account = self.store.account(input.account_id).await?;
            validation::validate_account(&account, &input.amount)?;

            let delta = input.transaction_type.signed_delta(input.amount.amount);
            let new_balance = account.balance.amount + delta;
            if new_balance < Decimal::ZERO {
                return Err(LedgerError::InsufficientFunds {
                    account_id: account.id,
                    balance: account.balance.amount,
                    requested: input.amount.amount,
                });
            }

            let now = Utc::now();
            let transaction = Transaction {
                id: TransactionId::new(),
                account_id: account.id,
                owner_id: account.owner_id,
                transaction_type: input.transaction_type,
                amount: input.amount,
                description: input.description.clone(),
                category: input.category.clone(),
                reference: input.reference.clone(),
                status: TransactionStatus::Completed,
                recurring_transaction_id: input.recurring_transaction_id,
                reverses: input.reverses,
                created_at: now,
            };

            let mut account_after = account.clone();
            account_after.balance = Money::new(new_balance, account.balance.currency);
            account_after.version += 1;
            account_after.updated_at = now;

            let committed = match input.advance.clone() {
                Some(advance) => {
                    self.store
                        .commit_materialization(
                            account.version,
                            account_after,
                            transaction.clone(),
                            advance,
                        )
                        .await
                }
                None => {
                    self.store
                        .commit_posting(account.version, account_after, transaction.clone())
                        .await
                }
            };

            match committed {
                Ok(()) => {
                    info!(
                        account_id = %transaction.account_id,
                        transaction_id = %transaction.id,
                        amount = %transaction.amount,
                        transaction_type = ?transaction.transaction_type,
                        "Posted transaction"
                    );
                    return Ok(transaction);
                }
                Err(StoreError::VersionConflict { .. }) => {
                    debug!(
                        account_id = %input.account_id,
                        attempt,
                        "Posting lost the version race"
                    );
                }
                Err(err) => return Err(err.into()),
            }
        }

        warn!(
            account_id = %input.account_id,
            attempts = max_attempts,
            "Posting exhausted its optimistic retries"
        );
        Err(LedgerError::ConcurrencyConflict(input.account_id))
    }

    /// Reverses a completed transaction by posting its inverse through the
    /// same atomic path, then marking the original `Cancelled`.
    ///
    /// The original row's amount and type are never edited.
    ///
    /// # Errors
    ///
    /// `TransactionNotFound`, `AlreadyReversed` for a cancelled original,
    /// `NotReversible` for pending/failed originals, plus any posting error
    /// from the inverse posting (reversing a credit can legitimately fail
    /// with `InsufficientFunds` if the funds were already spent).
    pub async fn reverse_transaction(
        &self,
        transaction_id: TransactionId,
    ) -> Result<Transaction, LedgerError> {
        let original = self.store.transaction(transaction_id).await?;
        match original.status {
            TransactionStatus::Completed => {}
            TransactionStatus::Cancelled => {
                return Err(LedgerError::AlreadyReversed(transaction_id));
            }
            TransactionStatus::Pending | TransactionStatus::Failed => {
                return Err(LedgerError::NotReversible(transaction_id));
            }
        }

        let reversal = self
            .post_transaction(PostingInput {
                account_id: original.account_id,
                transaction_type: original.transaction_type.inverse(),
                amount: original.amount,
                description: format!("Reversal: {}", original.description),
                category: original.category.clone(),
                reference: original.reference.clone(),
                recurring_transaction_id: None,
                reverses: Some(original.id),
                advance: None,
            })
            .await?;

        self.store
            .update_transaction_status(original.id, TransactionStatus::Cancelled)
            .await?;

        info!(
            original_id = %original.id,
            reversal_id = %reversal.id,
            "Reversed transaction"
        );
        Ok(reversal)
    }

    /// Edits a transaction's category and/or description.
    ///
    /// Metadata edits never affect balances; `None` leaves a field unchanged.
    ///
    /// # Errors
    ///
    /// `TransactionNotFound` or `StoreUnavailable`.
    pub async fn update_transaction_metadata(
        &self,
        transaction_id: TransactionId,
        category: Option<String>,
        description: Option<String>,
    ) -> Result<(), LedgerError> {
        self.store
            .update_transaction_metadata(transaction_id, category, description)
            .await?;
        Ok(())
    }
}
