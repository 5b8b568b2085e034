//! PostgreSQL record store
//!
//! This module provides the pooled client, the SQL rendering and the
//! [`RecordStore`](crate::adapters::database::RecordStore) implementation
//! for PostgreSQL.

pub mod adapter;
pub mod client;
pub mod sql;

pub use adapter::PostgreSQLStore;
pub use client::{redact_connection_string, PostgreSQLClient};
