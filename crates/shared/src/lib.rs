//! Shared types, errors, and configuration for the OHADA ledger.
//!
//! This crate provides common types used across all other crates:
//! - Typed IDs for type-safe entity references
//! - Currency codes and decimal amount formatting
//! - Inclusive date ranges for reporting queries
//! - Application-wide error types
//! - Configuration management

pub mod config;
pub mod error;
pub mod types;

pub use config::{AccountMapping, AppConfig, LedgerConfig, LoggingConfig, PostingPolicy};
pub use error::{AppError, AppResult};
