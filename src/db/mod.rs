//! Database module for SQLite operations.
//!
//! This module provides:
//! - Database initialization and schema setup
//! - Read-only access for inspection tools
//! - SQLite pragma configuration
//! - Repository layer for record operations
//! - The `StoreError` failure taxonomy

pub mod error;
pub mod migrations;
pub mod repo;

pub use error::StoreError;
pub use migrations::{init_db, init_db_with_pool_size, open_read_only};
pub use repo::{Repository, StoredRecord};
