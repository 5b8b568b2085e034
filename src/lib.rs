// Hattori - Batch anonymizer for relational tables
// Copyright (c) 2025 Hattori Contributors
// Licensed under the MIT License

//! # Hattori - batch field anonymization
//!
//! Hattori overwrites sensitive columns of relational tables with fake or
//! fixed values so production data can be used outside production. Records
//! are walked page by page, substituted in memory and written back with one
//! bulk update per page.
//!
//! ## Architecture
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`anonymization`] - Targets, replacers, the paging runner and reports
//! - [`adapters`] - Record stores (PostgreSQL, in-memory)
//! - [`domain`] - Records, model metadata, queries and errors
//! - [`config`] - Configuration management
//! - [`logging`] - Structured logging
//! - [`progress`] - Progress reporting
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use hattori::adapters::database::create_record_store;
//! use hattori::anonymization::{RunCoordinator, RunOptions};
//! use hattori::config::load_config;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = load_config("hattori.toml")?;
//!     let coordinator = RunCoordinator::from_config(&config, &[])?;
//!     let store = create_record_store(&config).await?;
//!
//!     let options = RunOptions::new(config.anonymization.batch_size);
//!     let report = coordinator.execute(store, options, true).await?;
//!
//!     println!("Scrubbed {} records", report.total_records());
//!     Ok(())
//! }
//! ```
//!
//! ## Custom targets
//!
//! Targets can also be built in code. Generators are called once per record
//! and cut to the column's maximum length; literals are written as-is.
//!
//! ```rust
//! use hattori::anonymization::{Replacer, TargetDefinition};
//! use hattori::domain::ModelRef;
//!
//! # fn example() -> hattori::domain::Result<()> {
//! let target = TargetDefinition::builder()
//!     .model(ModelRef::new("auth_user")?)
//!     .attribute("username", Replacer::generator(|| "anonymous".to_string()))
//!     .attribute("email", Replacer::literal("scrubbed@example.com"))
//!     .build()?;
//! assert_eq!(target.field_count(), 2);
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```
//!
//! ## Error Handling
//!
//! The library uses [`domain::HattoriError`] for all errors. Configuration
//! problems surface as [`domain::HattoriError::Configuration`] before any
//! record is touched.

pub mod adapters;
pub mod anonymization;
pub mod cli;
pub mod config;
pub mod domain;
pub mod logging;
pub mod progress;
