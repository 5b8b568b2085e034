//! Anonymization module for Hattori
//!
//! This module overwrites configured fields of stored records with fake or
//! fixed values, one page at a time.
//!
//! # Architecture
//!
//! - **Targets**: a model plus ordered `(field, replacer)` pairs ([`TargetDefinition`])
//! - **Replacers**: generators or literals ([`Replacer`]), with fakers from [`ValueFactory`]
//! - **Runner**: the [`Anonymizer`] trait paging through a [`crate::adapters::database::RecordStore`]
//! - **Coordinator**: runs every configured target in order ([`RunCoordinator`])
//! - **Reports**: per-target counts and run summaries ([`RunResult`], [`RunReport`])
//!
//! # Usage
//!
//! ```rust,ignore
//! use hattori::anonymization::{RunCoordinator, RunOptions};
//!
//! let coordinator = RunCoordinator::from_config(&config, &[])?;
//! let report = coordinator.execute(store, RunOptions::new(500), true).await?;
//! println!("{}", report.format_console());
//! ```

pub mod config;
pub mod coordinator;
pub mod faker;
pub mod paginator;
pub mod replacer;
pub mod report;
pub mod runner;
pub mod target;

// Re-export main types
pub use config::{AnonymizationConfig, AttributeConfig, TargetConfig};
pub use coordinator::{PlannedTarget, RunCoordinator};
pub use faker::{FakeKind, Locale, ValueFactory};
pub use paginator::{Page, Paginator};
pub use replacer::{Replacer, ValueGenerator};
pub use report::{RunReport, RunResult, TargetReport};
pub use runner::{
    anonymizer_for, process_page, Anonymizer, FilteredAnonymizer, RunOptions, TableAnonymizer,
};
pub use target::{Attribute, TargetDefinition};
