//! CLI interface and argument parsing
//!
//! This module provides the command-line interface for Hattori using clap.

pub mod commands;

use clap::{Parser, Subcommand};

/// Hattori - batch anonymizer for relational tables
#[derive(Parser, Debug)]
#[command(name = "hattori")]
#[command(version, about, long_about = None)]
#[command(author = "Hattori Contributors")]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "hattori.toml", env = "HATTORI_CONFIG")]
    pub config: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "HATTORI_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Anonymize the configured targets
    Run(commands::run::RunArgs),

    /// Validate configuration file
    ValidateConfig(commands::validate::ValidateArgs),

    /// Initialize a new configuration file
    Init(commands::init::InitArgs),

    /// List supported faker kinds and locales
    ListFakers(commands::list_fakers::ListFakersArgs),
}
