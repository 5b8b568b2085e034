//! Batched field-replacement runner
//!
//! This module provides the [`Anonymizer`] trait, which walks a target's
//! records page by page, overwrites the configured fields and bulk-persists
//! each page before loading the next.
//!
//! # Pipeline
//!
//! For every page, strictly in order:
//! 1. Load the page from the [`RecordStore`], starting after the last primary
//!    key of the previous page
//! 2. Apply every `(field, replacer)` pair to every record ([`process_page`])
//! 3. Persist the page with one bulk update scoped to the configured fields
//! 4. Advance the progress sink by one
//!
//! Any error aborts the run. Pages persisted before the error stay
//! persisted; later pages are untouched.
//!
//! # Examples
//!
//! ```no_run
//! use hattori::adapters::memory::MemoryStore;
//! use hattori::anonymization::{Anonymizer, Replacer, TableAnonymizer, TargetDefinition};
//! use hattori::domain::ModelRef;
//! use hattori::progress::NoProgress;
//! use std::sync::Arc;
//!
//! # async fn example() -> hattori::domain::Result<()> {
//! let store = Arc::new(MemoryStore::new());
//! let target = TargetDefinition::builder()
//!     .model(ModelRef::new("auth_user")?)
//!     .attribute("email", Replacer::literal("scrubbed@example.com"))
//!     .build()?;
//!
//! let anonymizer = TableAnonymizer::new(target, store);
//! let result = anonymizer.run(500, &mut NoProgress).await?;
//! println!("{} records scrubbed", result.total_records);
//! # Ok(())
//! # }
//! ```

use super::paginator::Paginator;
use super::replacer::Replacer;
use super::report::{RunResult, TargetReport};
use super::target::TargetDefinition;
use crate::adapters::database::RecordStore;
use crate::domain::{FieldFilter, HattoriError, Record, RecordQuery, Result};
use crate::progress::ProgressSink;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Instant;

/// Options for a single target run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunOptions {
    /// Records per page and per bulk-update chunk
    pub batch_size: usize,

    /// Substitute in memory but skip persistence
    pub dry_run: bool,
}

impl RunOptions {
    /// Options for a normal run
    pub fn new(batch_size: usize) -> Self {
        Self {
            batch_size,
            dry_run: false,
        }
    }

    /// Enables or disables dry-run mode
    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }
}

/// A page after substitution
#[derive(Debug)]
pub struct ProcessedPage {
    /// The same records, in the same order, mutated in place
    pub records: Vec<Record>,

    /// Records processed
    pub records_processed: usize,

    /// Field assignments performed
    pub fields_processed: usize,
}

/// Runner for one target
///
/// Implementors provide the target and store; [`retrieve_targets`] is the
/// override point for narrowing the collection. Everything else is shared.
///
/// [`retrieve_targets`]: Anonymizer::retrieve_targets
#[async_trait]
pub trait Anonymizer: Send + Sync {
    /// Target definition
    fn target(&self) -> &TargetDefinition;

    /// Store to read from and write to
    fn store(&self) -> &Arc<dyn RecordStore>;

    /// Records to anonymize; defaults to every record of the model
    async fn retrieve_targets(&self) -> Result<RecordQuery> {
        Ok(RecordQuery::all(self.target().model().clone()))
    }

    /// Runs with default options and returns the aggregate counts
    ///
    /// # Errors
    ///
    /// Returns an error if `batch_size` is zero, a replacer has an
    /// unsupported type, a field is unknown, or the store fails. No partial
    /// result is returned.
    async fn run(&self, batch_size: usize, progress: &mut dyn ProgressSink) -> Result<RunResult> {
        let report = self.run_with(RunOptions::new(batch_size), progress).await?;
        Ok(report.result)
    }

    /// Runs with explicit options and returns a per-target report
    async fn run_with(
        &self,
        options: RunOptions,
        progress: &mut dyn ProgressSink,
    ) -> Result<TargetReport> {
        let start = Instant::now();
        let target = self.target();
        let store = self.store();

        let query = self.retrieve_targets().await?;
        let count = store.count(&query).await?;
        let paginator = Paginator::new(count, options.batch_size)?;
        let meta = Arc::new(store.describe(query.model()).await?);
        let fields = target.field_names();

        tracing::info!(
            anonymizer = %target.name(),
            model = %query.model(),
            store = store.name(),
            records = count,
            pages = paginator.num_pages(),
            batch_size = options.batch_size,
            filtered = !query.is_unfiltered(),
            dry_run = options.dry_run,
            "Starting anonymization"
        );

        let mut result = RunResult::new(target.field_count());
        let mut last_pk: Option<String> = None;
        progress.start(paginator.num_pages() as u64);

        for page in paginator.pages() {
            let records = store
                .fetch_page(&query, &meta, &fields, last_pk.as_deref(), page.len)
                .await?;

            let processed = process_page(target, records)?;
            if let Some(record) = processed.records.last() {
                last_pk = Some(record.pk().to_string());
            }

            if options.dry_run {
                tracing::info!(
                    page = page.number,
                    count = processed.records_processed,
                    "DRY RUN: Would update {} records",
                    processed.records_processed
                );
            } else {
                store
                    .bulk_update(&meta, &processed.records, &fields, options.batch_size)
                    .await?;
            }

            result.add_page(processed.records_processed, processed.fields_processed);
            progress.advance(1);

            crate::log_batch_processing!(page.number, paginator.num_pages());
        }

        progress.finish();
        debug_assert!(result.is_consistent());

        let elapsed = start.elapsed();
        crate::log_target_complete!(target.name(), result.total_records, elapsed);

        Ok(TargetReport {
            name: target.name().to_string(),
            model: query.model().table().to_string(),
            result,
            pages: paginator.num_pages(),
            dry_run: options.dry_run,
            elapsed_ms: elapsed.as_millis() as u64,
        })
    }
}

/// Applies every replacer of `target` to every record, in order
///
/// Generated values are truncated to the field's max length; literals are
/// assigned verbatim. An unsupported replacer fails on first use, after
/// earlier fields of the same record have already been assigned.
pub fn process_page(target: &TargetDefinition, mut records: Vec<Record>) -> Result<ProcessedPage> {
    let mut records_processed = 0;
    let mut fields_processed = 0;

    for record in records.iter_mut() {
        for attribute in target.attributes() {
            let value = match &attribute.replacer {
                Replacer::Generator(generator) => {
                    let generated = generator.generate();
                    truncate_chars(generated, record.max_length(&attribute.field)?)
                }
                Replacer::Literal(value) => value.clone(),
                Replacer::Unsupported(found) => {
                    return Err(HattoriError::replacer_type(
                        attribute.field.as_str(),
                        found.as_str(),
                    ))
                }
            };
            record.set(&attribute.field, value);
            fields_processed += 1;
        }
        records_processed += 1;
    }

    Ok(ProcessedPage {
        records,
        records_processed,
        fields_processed,
    })
}

/// Keeps the first `max_length` characters of `value`
///
/// Cuts on character boundaries, never inside a multi-byte sequence.
pub fn truncate_chars(mut value: String, max_length: Option<usize>) -> String {
    if let Some(max) = max_length {
        if let Some((byte_index, _)) = value.char_indices().nth(max) {
            value.truncate(byte_index);
        }
    }
    value
}

/// Anonymizes every record of a model
pub struct TableAnonymizer {
    target: TargetDefinition,
    store: Arc<dyn RecordStore>,
}

impl TableAnonymizer {
    /// Creates a runner for `target` backed by `store`
    pub fn new(target: TargetDefinition, store: Arc<dyn RecordStore>) -> Self {
        Self { target, store }
    }
}

#[async_trait]
impl Anonymizer for TableAnonymizer {
    fn target(&self) -> &TargetDefinition {
        &self.target
    }

    fn store(&self) -> &Arc<dyn RecordStore> {
        &self.store
    }
}

/// Anonymizes only the records matching a set of filters
pub struct FilteredAnonymizer {
    target: TargetDefinition,
    store: Arc<dyn RecordStore>,
    filters: Vec<FieldFilter>,
}

impl FilteredAnonymizer {
    /// Creates a runner restricted by `filters`
    ///
    /// # Errors
    ///
    /// Returns a configuration error if a filter is malformed.
    pub fn new(
        target: TargetDefinition,
        store: Arc<dyn RecordStore>,
        filters: Vec<FieldFilter>,
    ) -> Result<Self> {
        for filter in &filters {
            filter.validate()?;
        }
        Ok(Self {
            target,
            store,
            filters,
        })
    }
}

#[async_trait]
impl Anonymizer for FilteredAnonymizer {
    fn target(&self) -> &TargetDefinition {
        &self.target
    }

    fn store(&self) -> &Arc<dyn RecordStore> {
        &self.store
    }

    async fn retrieve_targets(&self) -> Result<RecordQuery> {
        Ok(self
            .filters
            .iter()
            .cloned()
            .fold(RecordQuery::all(self.target.model().clone()), RecordQuery::filter))
    }
}

/// Picks the runner for a target: filtered when filters are configured
pub fn anonymizer_for(
    target: TargetDefinition,
    store: Arc<dyn RecordStore>,
    filters: Vec<FieldFilter>,
) -> Result<Box<dyn Anonymizer>> {
    if filters.is_empty() {
        Ok(Box::new(TableAnonymizer::new(target, store)))
    } else {
        Ok(Box::new(FilteredAnonymizer::new(target, store, filters)?))
    }
}
