//! In-memory sandbox for the Tresor engine.
//!
//! Seeds demo accounts and recurring rules into the in-memory store, posts a
//! transfer, runs two due cycles, and walks the failure paths, logging every
//! step. Useful for eyeballing engine behavior without a host application.
//!
//! Usage: cargo run --bin sandbox

use std::sync::Arc;

use chrono::{Months, Utc};
use rust_decimal::Decimal;
use tracing::{info, warn};

use tresor_core::ledger::{Account, LedgerService, PostingInput, TransactionType};
use tresor_core::recurrence::{Frequency, RecurringTransaction, Scheduler};
use tresor_core::store::{LedgerStore, MemoryStore, TransactionFilter};
use tresor_shared::EngineConfig;
use tresor_shared::types::{Currency, Money, UserId};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = EngineConfig::load().unwrap_or_else(|e| {
        warn!(error = %e, "Failed to load configuration, using defaults");
        EngineConfig::default()
    });

    let store = Arc::new(MemoryStore::new());
    let ledger = LedgerService::new(Arc::clone(&store), config.posting.clone());
    let scheduler = Scheduler::new(Arc::clone(&store), &config);

    info!("Seeding demo accounts...");
    let owner = UserId::new();
    let checking = Account::new(
        owner,
        "GB29-0001".to_string(),
        Money::new(Decimal::new(1_000_00, 2), Currency::Gbp),
    );
    let savings = Account::new(
        owner,
        "GB29-0002".to_string(),
        Money::new(Decimal::new(250_00, 2), Currency::Gbp),
    );
    store
        .insert_account(checking.clone())
        .await
        .expect("failed to seed checking account");
    store
        .insert_account(savings.clone())
        .await
        .expect("failed to seed savings account");

    info!("Seeding recurring rules...");
    let today = Utc::now().date_naive();
    let rent = RecurringTransaction::new(
        checking.id,
        owner,
        TransactionType::Debit,
        Money::new(Decimal::new(400_00, 2), Currency::Gbp),
        "Rent".to_string(),
        Frequency::Monthly,
        today,
    );
    let salary = RecurringTransaction::new(
        checking.id,
        owner,
        TransactionType::Credit,
        Money::new(Decimal::new(2_100_00, 2), Currency::Gbp),
        "Salary".to_string(),
        Frequency::Monthly,
        today,
    );
    store.insert_rule(rent).await.expect("failed to seed rule");
    store.insert_rule(salary).await.expect("failed to seed rule");

    info!("Posting a transfer: checking -> savings, 150.00 GBP");
    let amount = Money::new(Decimal::new(150_00, 2), Currency::Gbp);
    let debit = ledger
        .post_transaction(transfer_leg(
            &checking,
            TransactionType::Debit,
            amount,
            "Transfer to savings",
        ))
        .await
        .expect("transfer debit failed");
    ledger
        .post_transaction(transfer_leg(
            &savings,
            TransactionType::Credit,
            amount,
            "Transfer from checking",
        ))
        .await
        .expect("transfer credit failed");
    info!(transaction_id = %debit.id, "Transfer posted");

    info!("Running a due cycle...");
    let now = Utc::now();
    let report = scheduler.run_due_cycle(now).await.expect("cycle failed");
    info!(
        attempted = report.attempted,
        succeeded = report.succeeded,
        failed = report.failed.len(),
        "First cycle done"
    );

    info!("Running the same cycle again (nothing should be due)...");
    let report = scheduler.run_due_cycle(now).await.expect("cycle failed");
    info!(attempted = report.attempted, "Second cycle done");

    info!("Running a cycle one month out...");
    let next_month = now
        .checked_add_months(Months::new(1))
        .expect("date overflow");
    let report = scheduler
        .run_due_cycle(next_month)
        .await
        .expect("cycle failed");
    info!(
        attempted = report.attempted,
        succeeded = report.succeeded,
        "Next month's cycle done"
    );

    info!("Demonstrating a rejected overdraft...");
    let overdraft = ledger
        .post_transaction(transfer_leg(
            &savings,
            TransactionType::Debit,
            Money::new(Decimal::new(1_000_000_00, 2), Currency::Gbp),
            "Doomed withdrawal",
        ))
        .await;
    match overdraft {
        Err(err) => info!(code = err.error_code(), "Overdraft rejected: {err}"),
        Ok(_) => warn!("Overdraft unexpectedly succeeded"),
    }

    for account in [&checking, &savings] {
        let current = store
            .account(account.id)
            .await
            .expect("account disappeared");
        let rows = store
            .account_transactions(account.id, TransactionFilter::default())
            .await
            .expect("history query failed");
        info!(
            account = %current.account_number,
            balance = %current.balance,
            transactions = rows.len(),
            "Final state"
        );
    }
}

fn transfer_leg(
    account: &Account,
    transaction_type: TransactionType,
    amount: Money,
    description: &str,
) -> PostingInput {
    PostingInput {
        account_id: account.id,
        transaction_type,
        amount,
        description: description.to_string(),
        category: None,
        reference: None,
        recurring_transaction_id: None,
        reverses: None,
        advance: None,
    }
}
