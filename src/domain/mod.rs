//! Domain models and types for Hattori.
//!
//! # Overview
//!
//! The domain layer provides:
//! - **Model handles and metadata** ([`ModelRef`], [`ModelMeta`], [`FieldMeta`])
//! - **Records** ([`Record`]) mutated in place by the anonymization runner
//! - **Queries** ([`RecordQuery`], [`FieldFilter`]) describing which records to walk
//! - **Error types** ([`HattoriError`]) and the [`Result`] alias
//!
//! # Error Handling
//!
//! All fallible operations return [`Result<T, HattoriError>`]:
//!
//! ```rust
//! use hattori::domain::{ModelRef, Result};
//!
//! fn example() -> Result<()> {
//!     let model = ModelRef::with_primary_key("auth_user", "id")?;
//!     assert_eq!(model.table(), "auth_user");
//!     Ok(())
//! }
//! # example().unwrap();
//! ```

pub mod errors;
pub mod model;
pub mod query;
pub mod record;
pub mod result;

// Re-export commonly used types for convenience
pub use errors::HattoriError;
pub use model::{FieldMeta, ModelMeta, ModelRef, DEFAULT_PRIMARY_KEY};
pub use query::{FieldFilter, FilterOp, RecordQuery};
pub use record::Record;
pub use result::Result;
