//! Core engine for Tresor.
//!
//! This crate contains pure business logic with ZERO web or database dependencies.
//! The engine is the ledger-consistent transaction and recurrence subsystem of a
//! banking application: everything that touches an account balance goes through
//! here, and nothing else is allowed to.
//!
//! # Modules
//!
//! - `ledger` - Atomic transaction posting and balance enforcement
//! - `recurrence` - Recurring transaction rules and the due-cycle scheduler
//! - `store` - Storage capability trait and the in-memory reference store

pub mod ledger;
pub mod recurrence;
pub mod store;
