//! Anonymization configuration
//!
//! The `[anonymization]` section holds run-wide settings; each `[[targets]]`
//! entry describes one model and its field replacers.

use crate::domain::{FieldFilter, DEFAULT_PRIMARY_KEY};
use serde::{Deserialize, Serialize};

/// Run-wide anonymization settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnonymizationConfig {
    /// Data locale for generated values (falls back to `en`)
    #[serde(default)]
    pub locale: Option<String>,

    /// Records per page and per bulk-update chunk
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,

    /// Seed for reproducible generated values
    #[serde(default)]
    pub seed: Option<u64>,

    /// Show a progress bar while running
    #[serde(default = "default_progress")]
    pub progress: bool,
}

fn default_batch_size() -> usize {
    1000
}

fn default_progress() -> bool {
    true
}

impl Default for AnonymizationConfig {
    fn default() -> Self {
        Self {
            locale: None,
            batch_size: default_batch_size(),
            seed: None,
            progress: default_progress(),
        }
    }
}

impl AnonymizationConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.batch_size == 0 {
            return Err("anonymization.batch_size must be > 0".to_string());
        }
        Ok(())
    }
}

/// One model to anonymize
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TargetConfig {
    /// Display name, defaults to the model
    #[serde(default)]
    pub name: Option<String>,

    /// Table name, optionally schema-qualified
    #[serde(default)]
    pub model: Option<String>,

    /// Primary key column
    #[serde(default = "default_primary_key")]
    pub primary_key: String,

    /// Filters narrowing the records to anonymize
    #[serde(default)]
    pub filters: Vec<FieldFilter>,

    /// Ordered field replacers
    #[serde(default)]
    pub attributes: Vec<AttributeConfig>,
}

fn default_primary_key() -> String {
    DEFAULT_PRIMARY_KEY.to_string()
}

impl TargetConfig {
    /// Name used in logs and reports
    pub fn display_name(&self) -> &str {
        self.name
            .as_deref()
            .or(self.model.as_deref())
            .unwrap_or("<unnamed>")
    }
}

/// One field replacer
///
/// Exactly one of `faker` or `value` must be set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttributeConfig {
    /// Field to overwrite
    pub field: String,

    /// Generator kind, e.g. `first_name`
    #[serde(default)]
    pub faker: Option<String>,

    /// Literal value
    #[serde(default)]
    pub value: Option<toml::Value>,
}
