//! Record store implementations for Hattori.
//!
//! - [`database`] - The [`RecordStore`](database::RecordStore) trait and the store factory
//! - [`postgresql`] - PostgreSQL store on a `deadpool-postgres` pool
//! - [`memory`] - In-memory store for tests and local experiments
//!
//! # Example
//!
//! ```rust
//! use hattori::adapters::database::RecordStore;
//! use hattori::adapters::memory::MemoryStore;
//! use hattori::domain::{FieldMeta, ModelRef, RecordQuery};
//!
//! # async fn example() -> hattori::domain::Result<()> {
//! let store = MemoryStore::new();
//! store.create_table("auth_user", [FieldMeta::unbounded("id"), FieldMeta::bounded("email", 254)]);
//! store.insert("auth_user", "1", [("email", Some("ada@example.com"))])?;
//!
//! let query = RecordQuery::all(ModelRef::new("auth_user")?);
//! assert_eq!(store.count(&query).await?, 1);
//! # Ok(())
//! # }
//! ```

pub mod database;
pub mod memory;
pub mod postgresql;
