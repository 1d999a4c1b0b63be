//! Shared types and configuration for Tresor.
//!
//! This crate provides common types used across all other crates:
//! - Money types with decimal precision
//! - Typed IDs for type-safe entity references
//! - Engine configuration management

pub mod config;
pub mod types;

pub use config::{EngineConfig, PostingConfig};
