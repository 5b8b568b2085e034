//! Mutable records loaded from a store
//!
//! Records carry their primary key, the text values of the fields that were
//! loaded, and a shared handle to the model metadata used for max-length
//! lookups.

use super::model::ModelMeta;
use super::Result;
use std::collections::BTreeMap;
use std::sync::Arc;

/// A single row of a model
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pk: String,
    values: BTreeMap<String, Option<String>>,
    meta: Arc<ModelMeta>,
}

impl Record {
    /// Creates an empty record with the given primary key
    pub fn new(pk: impl Into<String>, meta: Arc<ModelMeta>) -> Self {
        Self {
            pk: pk.into(),
            values: BTreeMap::new(),
            meta,
        }
    }

    /// Adds a value, builder style
    pub fn with_value(mut self, field: impl Into<String>, value: Option<String>) -> Self {
        self.values.insert(field.into(), value);
        self
    }

    /// Primary key as text
    pub fn pk(&self) -> &str {
        &self.pk
    }

    /// Model metadata
    pub fn meta(&self) -> &Arc<ModelMeta> {
        &self.meta
    }

    /// Current value of a field; `None` if unset or NULL
    pub fn get(&self, field: &str) -> Option<&str> {
        self.values.get(field).and_then(|v| v.as_deref())
    }

    /// Overwrites a field
    pub fn set(&mut self, field: &str, value: impl Into<String>) {
        self.values.insert(field.to_string(), Some(value.into()));
    }

    /// Declared max length of a field on this record's model
    pub fn max_length(&self, field: &str) -> Result<Option<usize>> {
        self.meta.max_length(field)
    }

    /// All loaded values
    pub fn values(&self) -> &BTreeMap<String, Option<String>> {
        &self.values
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{FieldMeta, ModelRef};

    fn meta() -> Arc<ModelMeta> {
        Arc::new(ModelMeta::new(
            ModelRef::new("customers").unwrap(),
            [FieldMeta::unbounded("id"), FieldMeta::bounded("name", 10)],
        ))
    }

    #[test]
    fn test_set_and_get() {
        let mut record = Record::new("1", meta()).with_value("name", None);
        assert_eq!(record.get("name"), None);

        record.set("name", "Ada");
        assert_eq!(record.get("name"), Some("Ada"));
        assert_eq!(record.pk(), "1");
    }

    #[test]
    fn test_max_length_from_meta() {
        let record = Record::new("1", meta());
        assert_eq!(record.max_length("name").unwrap(), Some(10));
        assert!(record.max_length("email").is_err());
    }
}
