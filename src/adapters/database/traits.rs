//! Record store abstraction
//!
//! This module defines the trait that storage adapters must implement to be
//! walked and rewritten by the anonymization runner.

use crate::domain::{ModelMeta, ModelRef, Record, RecordQuery, Result};
use async_trait::async_trait;
use std::sync::Arc;

/// Source and sink of records
///
/// A store is both the record source (count and page through a query) and
/// the persistence layer (bulk update of named fields).
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Short name for logs
    fn name(&self) -> &str;

    /// Describes the fields of a model
    ///
    /// # Errors
    ///
    /// Returns an error if the model does not exist or cannot be inspected.
    async fn describe(&self, model: &ModelRef) -> Result<ModelMeta>;

    /// Counts the records selected by `query`
    async fn count(&self, query: &RecordQuery) -> Result<usize>;

    /// Loads one page of records ordered by primary key
    ///
    /// Only the primary key and `fields` are loaded. Pages are cut by key,
    /// not by position, so rewriting a record never shifts the records that
    /// follow it.
    ///
    /// # Arguments
    ///
    /// * `query` - Records to select
    /// * `meta` - Shared metadata attached to every returned record
    /// * `fields` - Fields to load
    /// * `after` - Only keys strictly greater than this one; `None` starts at the first record
    /// * `limit` - Maximum records to return
    async fn fetch_page(
        &self,
        query: &RecordQuery,
        meta: &Arc<ModelMeta>,
        fields: &[String],
        after: Option<&str>,
        limit: usize,
    ) -> Result<Vec<Record>>;

    /// Writes exactly `fields` of every record
    ///
    /// Records are written in chunks of `chunk_size`; each chunk is atomic.
    ///
    /// # Returns
    ///
    /// Returns the number of records written.
    async fn bulk_update(
        &self,
        meta: &ModelMeta,
        records: &[Record],
        fields: &[String],
        chunk_size: usize,
    ) -> Result<usize>;
}
