//! Property-based tests for the posting service.
//!
//! - Balance integrity: the balance always equals the opening balance plus
//!   the signed sum of completed postings.
//! - Non-negativity: no posting sequence drives a balance below zero.

use std::sync::Arc;

use proptest::prelude::*;
use rust_decimal::Decimal;
use tresor_shared::PostingConfig;
use tresor_shared::types::{Currency, Money, UserId};

use super::account::Account;
use super::error::LedgerError;
use super::service::{LedgerService, PostingInput};
use super::transaction::TransactionType;
use crate::store::{LedgerStore, MemoryStore, TransactionFilter};

/// Strategy for posting directions.
fn type_strategy() -> impl Strategy<Value = TransactionType> {
    prop_oneof![
        Just(TransactionType::Credit),
        Just(TransactionType::Debit)
    ]
}

/// Strategy for amounts in pence (0.01 to 500.00).
fn amount_strategy() -> impl Strategy<Value = Decimal> {
    (1i64..50_000i64).prop_map(|pence| Decimal::new(pence, 2))
}

/// Strategy for a sequence of postings.
fn postings_strategy(max_len: usize) -> impl Strategy<Value = Vec<(TransactionType, Decimal)>> {
    prop::collection::vec((type_strategy(), amount_strategy()), 1..=max_len)
}

fn posting(
    account_id: tresor_shared::types::AccountId,
    transaction_type: TransactionType,
    amount: Decimal,
) -> PostingInput {
    PostingInput {
        account_id,
        transaction_type,
        amount: Money::new(amount, Currency::Gbp),
        description: "Generated posting".to_string(),
        category: None,
        reference: None,
        recurring_transaction_id: None,
        reverses: None,
        advance: None,
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// For any sequence of postings, the final balance equals the opening
    /// balance plus the signed sum of the postings that succeeded, the
    /// balance never dips below zero, and every success left exactly one
    /// transaction row.
    #[test]
    fn prop_balance_is_sum_of_completed_postings(
        opening_pence in 0i64..100_000i64,
        postings in postings_strategy(25),
    ) {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async move {
            let store = Arc::new(MemoryStore::new());
            let opening = Decimal::new(opening_pence, 2);
            let account = Account::new(
                UserId::new(),
                "GB-PROP".to_string(),
                Money::new(opening, Currency::Gbp),
            );
            let account_id = account.id;
            store.insert_account(account).await.unwrap();
            let service = LedgerService::new(Arc::clone(&store), PostingConfig::default());

            let mut expected = opening;
            let mut completed = 0usize;
            for (transaction_type, amount) in postings {
                match service
                    .post_transaction(posting(account_id, transaction_type, amount))
                    .await
                {
                    Ok(_) => {
                        expected += transaction_type.signed_delta(amount);
                        completed += 1;
                    }
                    Err(LedgerError::InsufficientFunds { .. }) => {
                        // Rejected debit: balance must be untouched.
                    }
                    Err(other) => panic!("unexpected posting error: {other}"),
                }

                let balance = store.account(account_id).await.unwrap().balance.amount;
                assert!(balance >= Decimal::ZERO, "balance went negative: {balance}");
                assert_eq!(balance, expected);
            }

            let rows = store
                .account_transactions(account_id, TransactionFilter::default())
                .await
                .unwrap();
            assert_eq!(rows.len(), completed);
        });
    }
}
