//! Account ledger: the single choke point for balance-affecting change.
//!
//! This module implements the core ledger functionality:
//! - Account records with optimistic concurrency versions
//! - Transaction records (credits and debits)
//! - Posting validation rules
//! - Error types for ledger operations
//! - The posting service that mutates balances atomically

pub mod account;
pub mod error;
pub mod service;
pub mod transaction;
pub mod validation;

#[cfg(test)]
mod service_props;

pub use account::{Account, AccountStatus};
pub use error::LedgerError;
pub use service::{LedgerService, PostingInput};
pub use transaction::{Transaction, TransactionStatus, TransactionType};
