//! Target definitions
//!
//! A [`TargetDefinition`] pairs a model with its ordered field replacers.
//! It is built once per run and never changes afterwards. Construction fails
//! with a configuration error when the model or the replacer list is missing,
//! so no run can start half-configured.

use super::config::TargetConfig;
use super::faker::ValueFactory;
use super::replacer::Replacer;
use crate::domain::{HattoriError, ModelRef, Result};
use std::collections::HashSet;

/// One `(field, replacer)` pair
#[derive(Debug, Clone)]
pub struct Attribute {
    /// Field to overwrite
    pub field: String,

    /// What to write
    pub replacer: Replacer,
}

/// A model and the replacers applied to it
#[derive(Debug, Clone)]
pub struct TargetDefinition {
    name: String,
    model: ModelRef,
    attributes: Vec<Attribute>,
}

impl TargetDefinition {
    /// Creates a new builder
    pub fn builder() -> TargetDefinitionBuilder {
        TargetDefinitionBuilder::default()
    }

    /// Builds a definition from a `[[targets]]` entry
    ///
    /// Faker names are resolved through `factory`; literal values are kept
    /// as-is, including values of the wrong type, which fail at run time.
    pub fn from_config(config: &TargetConfig, factory: &ValueFactory) -> Result<Self> {
        let mut builder = Self::builder().name(config.display_name());

        if let Some(table) = config.model.as_deref().filter(|t| !t.trim().is_empty()) {
            builder = builder.model(ModelRef::with_primary_key(
                table,
                config.primary_key.as_str(),
            )?);
        }

        for attribute in &config.attributes {
            let replacer = match (&attribute.faker, &attribute.value) {
                (Some(faker), None) => factory.replacer(faker)?,
                (None, Some(value)) => Replacer::from_toml(value),
                (Some(_), Some(_)) => {
                    return Err(HattoriError::Configuration(format!(
                        "attribute '{}' of '{}' sets both faker and value",
                        attribute.field,
                        config.display_name()
                    )))
                }
                (None, None) => {
                    return Err(HattoriError::Configuration(format!(
                        "attribute '{}' of '{}' needs a faker or a value",
                        attribute.field,
                        config.display_name()
                    )))
                }
            };
            builder = builder.attribute(attribute.field.as_str(), replacer);
        }

        builder.build()
    }

    /// Name used in logs and reports
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Model handle
    pub fn model(&self) -> &ModelRef {
        &self.model
    }

    /// Ordered attributes
    pub fn attributes(&self) -> &[Attribute] {
        &self.attributes
    }

    /// Configured field names, in order
    pub fn field_names(&self) -> Vec<String> {
        self.attributes.iter().map(|a| a.field.clone()).collect()
    }

    /// Number of configured fields
    pub fn field_count(&self) -> usize {
        self.attributes.len()
    }
}

/// Builder for [`TargetDefinition`]
#[derive(Debug, Default)]
pub struct TargetDefinitionBuilder {
    name: Option<String>,
    model: Option<ModelRef>,
    attributes: Vec<Attribute>,
}

impl TargetDefinitionBuilder {
    /// Sets the display name
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Sets the model
    pub fn model(mut self, model: ModelRef) -> Self {
        self.model = Some(model);
        self
    }

    /// Appends a field replacer
    pub fn attribute(mut self, field: impl Into<String>, replacer: Replacer) -> Self {
        self.attributes.push(Attribute {
            field: field.into(),
            replacer,
        });
        self
    }

    /// Builds the definition
    ///
    /// # Errors
    ///
    /// Returns [`HattoriError::Configuration`] if the model or attributes are
    /// missing, a field name is empty, or a field is listed twice.
    pub fn build(self) -> Result<TargetDefinition> {
        let name = self.name.or_else(|| self.model.as_ref().map(|m| m.table().to_string()));
        let label = name.clone().unwrap_or_else(|| "<unnamed>".to_string());

        let model = match self.model {
            Some(model) if !self.attributes.is_empty() => model,
            _ => {
                return Err(HattoriError::Configuration(format!(
                    "anonymizer '{label}' is missing the model or attributes definition"
                )))
            }
        };

        let mut seen = HashSet::new();
        for attribute in &self.attributes {
            if attribute.field.trim().is_empty() {
                return Err(HattoriError::Configuration(format!(
                    "anonymizer '{label}' has an attribute with an empty field name"
                )));
            }
            if !seen.insert(attribute.field.as_str()) {
                return Err(HattoriError::Configuration(format!(
                    "anonymizer '{label}' lists field '{}' more than once",
                    attribute.field
                )));
            }
        }

        Ok(TargetDefinition {
            name: label,
            model,
            attributes: self.attributes,
        })
    }
}
