//! Run command implementation
//!
//! This module implements the `run` command, which anonymizes every
//! configured target against the configured database.

use crate::adapters::database::create_record_store;
use crate::anonymization::{RunCoordinator, RunOptions};
use crate::config::{load_config, HattoriConfig};
use clap::Args;
use std::io::{self, Write};
use std::num::NonZeroUsize;

/// Arguments for the run command
#[derive(Args, Debug)]
pub struct RunArgs {
    /// Skip confirmation prompt
    #[arg(short, long)]
    pub yes: bool,

    /// Dry run mode - substitute values without writing them back
    #[arg(long)]
    pub dry_run: bool,

    /// Override the records per page and per bulk update
    #[arg(long)]
    pub batch_size: Option<NonZeroUsize>,

    /// Only run the named target (repeatable)
    #[arg(long, value_name = "NAME")]
    pub target: Vec<String>,

    /// Disable the progress bar
    #[arg(long)]
    pub no_progress: bool,

    /// Print the final report as JSON
    #[arg(long)]
    pub json: bool,
}

impl RunArgs {
    /// Execute the run command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!("Starting run command");

        let mut config = match load_config(config_path) {
            Ok(c) => c,
            Err(e) => {
                tracing::error!(error = %e, "Failed to load configuration");
                eprintln!("{e}");
                return Ok(2); // Configuration error exit code
            }
        };
        self.apply_overrides(&mut config);

        let coordinator = match RunCoordinator::from_config(&config, &self.target) {
            Ok(c) => c,
            Err(e) => {
                tracing::error!(error = %e, "Invalid target configuration");
                eprintln!("{e}");
                return Ok(2);
            }
        };

        let dry_run = config.application.dry_run;
        if dry_run {
            tracing::info!("Dry run mode enabled - no data will be written");
            eprintln!("🔍 DRY RUN MODE - No data will be written to the database");
        }

        // Confirmation prompt (unless --yes or dry-run)
        if !self.yes && !dry_run {
            eprintln!("Anonymization plan:");
            for planned in coordinator.targets() {
                eprintln!(
                    "  {} ({}): {}",
                    planned.definition.name(),
                    planned.definition.model(),
                    planned.definition.field_names().join(", ")
                );
            }
            eprintln!("  Batch size: {}", config.anonymization.batch_size);
            eprintln!();
            eprint!("Overwrite these fields? This cannot be undone. [y/N]: ");
            io::stderr().flush()?;

            let mut input = String::new();
            io::stdin().read_line(&mut input)?;

            if !input.trim().eq_ignore_ascii_case("y") {
                eprintln!("Run cancelled.");
                return Ok(0);
            }
        }

        let store = match create_record_store(&config).await {
            Ok(s) => s,
            Err(e) if e.is_configuration() => {
                tracing::error!(error = %e, "Invalid database configuration");
                eprintln!("{e}");
                return Ok(2);
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to connect to the database");
                eprintln!("Failed to connect to the database: {e}");
                return Ok(4); // Connection error exit code
            }
        };

        let options = RunOptions::new(config.anonymization.batch_size).dry_run(dry_run);
        let show_progress = config.anonymization.progress && !self.no_progress;

        let report = match coordinator.execute(store, options, show_progress).await {
            Ok(r) => r,
            Err(e) => {
                tracing::error!(error = %e, "Anonymization failed");
                eprintln!("Anonymization failed: {e}");
                return Ok(5); // Fatal error exit code
            }
        };

        if self.json {
            println!("{}", report.format_json()?);
        } else {
            println!("{}", report.format_console());
            println!("✅ Anonymization completed successfully!");
        }

        Ok(0)
    }

    /// Applies command-line overrides on top of the loaded configuration
    fn apply_overrides(&self, config: &mut HattoriConfig) {
        if let Some(batch_size) = self.batch_size {
            tracing::info!(batch_size = batch_size.get(), "Overriding batch size from CLI");
            config.anonymization.batch_size = batch_size.get();
        }
        if self.dry_run {
            tracing::info!("Enabling dry-run mode from CLI");
            config.application.dry_run = true;
        }
        if self.no_progress {
            config.anonymization.progress = false;
        }
    }
}
