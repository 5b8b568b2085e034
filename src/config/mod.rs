//! Configuration management for Hattori.
//!
//! This module provides TOML-based configuration loading, parsing, and
//! validation.
//!
//! # Overview
//!
//! Hattori uses TOML configuration files with support for:
//! - Environment variable substitution (`${VAR_NAME}`)
//! - `HATTORI_<SECTION>_<KEY>` environment overrides
//! - Default values for optional settings
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use hattori::config::load_config;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("hattori.toml")?;
//!
//! for target in &config.targets {
//!     println!("{}: {} attributes", target.display_name(), target.attributes.len());
//! }
//! println!("Batch size: {}", config.anonymization.batch_size);
//! # Ok(())
//! # }
//! ```
//!
//! # Configuration Structure
//!
//! - [`ApplicationConfig`] - Log level and dry-run flag
//! - [`DatabaseConfig`] - PostgreSQL connection and pool settings
//! - [`AnonymizationConfig`] - Locale, batch size, seed, progress bar
//! - [`TargetConfig`] - One model, its filters and attribute replacers
//! - [`LoggingConfig`] - Local file logging
//!
//! # Example Configuration
//!
//! ```toml
//! [database]
//! connection_string = "${HATTORI_DATABASE_URL}"
//!
//! [anonymization]
//! locale = "en"
//! batch_size = 1000
//!
//! [[targets]]
//! model = "auth_user"
//! attributes = [
//!   { field = "first_name", faker = "first_name" },
//!   { field = "email", value = "scrubbed@example.com" },
//! ]
//! ```

pub mod loader;
pub mod schema;
pub mod secret;

pub use crate::anonymization::config::{AnonymizationConfig, AttributeConfig, TargetConfig};
pub use loader::{load_config, load_config_str};
pub use schema::{ApplicationConfig, DatabaseConfig, HattoriConfig, LoggingConfig};
pub use secret::{secret_string, SecretString, SecretValue};
