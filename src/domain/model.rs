//! Model handles and field metadata
//!
//! A [`ModelRef`] names a record collection (a table and its primary key).
//! [`ModelMeta`] describes the columns a store knows about for that model,
//! in particular the maximum string length of each field.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use super::{HattoriError, Result};

/// Default primary key column
pub const DEFAULT_PRIMARY_KEY: &str = "id";

/// Handle to a record collection
///
/// # Examples
///
/// ```
/// use hattori::domain::ModelRef;
///
/// let model = ModelRef::new("auth_user").unwrap();
/// assert_eq!(model.table(), "auth_user");
/// assert_eq!(model.primary_key(), "id");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ModelRef {
    table: String,
    primary_key: String,
}

impl ModelRef {
    /// Creates a handle for `table` keyed by the default `id` column
    pub fn new(table: impl Into<String>) -> Result<Self> {
        Self::with_primary_key(table, DEFAULT_PRIMARY_KEY)
    }

    /// Creates a handle with an explicit primary key column
    pub fn with_primary_key(
        table: impl Into<String>,
        primary_key: impl Into<String>,
    ) -> Result<Self> {
        let table = table.into();
        let primary_key = primary_key.into();
        if table.trim().is_empty() {
            return Err(HattoriError::Configuration(
                "model table name cannot be empty".to_string(),
            ));
        }
        if primary_key.trim().is_empty() {
            return Err(HattoriError::Configuration(format!(
                "primary key of model '{table}' cannot be empty"
            )));
        }
        Ok(Self { table, primary_key })
    }

    /// Table name, possibly schema-qualified
    pub fn table(&self) -> &str {
        &self.table
    }

    /// Primary key column
    pub fn primary_key(&self) -> &str {
        &self.primary_key
    }
}

impl fmt::Display for ModelRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.table)
    }
}

/// Metadata about a single field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldMeta {
    /// Column name
    pub name: String,

    /// Declared maximum length in characters, if any
    pub max_length: Option<usize>,

    /// Store-specific type expression values are cast to when written
    #[serde(default)]
    pub sql_type: Option<String>,
}

impl FieldMeta {
    /// Field without a length limit
    pub fn unbounded(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            max_length: None,
            sql_type: None,
        }
    }

    /// Field limited to `max_length` characters
    pub fn bounded(name: impl Into<String>, max_length: usize) -> Self {
        Self {
            name: name.into(),
            max_length: Some(max_length),
            sql_type: None,
        }
    }

    /// Attaches the declared column type
    pub fn with_sql_type(mut self, sql_type: impl Into<String>) -> Self {
        self.sql_type = Some(sql_type.into());
        self
    }
}

/// Field metadata for a model
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelMeta {
    model: ModelRef,
    fields: BTreeMap<String, FieldMeta>,
}

impl ModelMeta {
    /// Builds metadata from a list of fields
    pub fn new(model: ModelRef, fields: impl IntoIterator<Item = FieldMeta>) -> Self {
        let fields = fields
            .into_iter()
            .map(|field| (field.name.clone(), field))
            .collect();
        Self { model, fields }
    }

    /// The model this metadata describes
    pub fn model(&self) -> &ModelRef {
        &self.model
    }

    /// Looks up a field
    pub fn field(&self, name: &str) -> Result<&FieldMeta> {
        self.fields
            .get(name)
            .ok_or_else(|| HattoriError::UnknownField {
                model: self.model.table().to_string(),
                field: name.to_string(),
            })
    }

    /// Whether the model has a field with this name
    pub fn has_field(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    /// Declared max length of a field
    ///
    /// A declared length of zero is treated as no limit.
    pub fn max_length(&self, name: &str) -> Result<Option<usize>> {
        Ok(self.field(name)?.max_length.filter(|len| *len > 0))
    }

    /// Declared type of a field, if the store reported one
    pub fn sql_type(&self, name: &str) -> Result<Option<&str>> {
        Ok(self.field(name)?.sql_type.as_deref())
    }

    /// Iterates over field names in sorted order
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user_meta() -> ModelMeta {
        ModelMeta::new(
            ModelRef::new("auth_user").unwrap(),
            [
                FieldMeta::unbounded("id"),
                FieldMeta::bounded("first_name", 30),
                FieldMeta::bounded("legacy", 0),
                FieldMeta::unbounded("bio"),
            ],
        )
    }

    #[test]
    fn test_model_ref_defaults_primary_key() {
        let model = ModelRef::new("auth_user").unwrap();
        assert_eq!(model.primary_key(), DEFAULT_PRIMARY_KEY);
        assert_eq!(model.to_string(), "auth_user");
    }

    #[test]
    fn test_model_ref_rejects_empty() {
        assert!(ModelRef::new("  ").unwrap_err().is_configuration());
        assert!(ModelRef::with_primary_key("users", "")
            .unwrap_err()
            .is_configuration());
    }

    #[test]
    fn test_max_length_lookup() {
        let meta = user_meta();
        assert_eq!(meta.max_length("first_name").unwrap(), Some(30));
        assert_eq!(meta.max_length("bio").unwrap(), None);
    }

    #[test]
    fn test_zero_max_length_means_unbounded() {
        let meta = user_meta();
        assert_eq!(meta.max_length("legacy").unwrap(), None);
    }

    #[test]
    fn test_unknown_field() {
        let meta = user_meta();
        let err = meta.max_length("nickname").unwrap_err();
        assert!(matches!(err, HattoriError::UnknownField { .. }));
        assert!(!meta.has_field("nickname"));
    }

    #[test]
    fn test_sql_type_lookup() {
        let meta = ModelMeta::new(
            ModelRef::new("auth_user").unwrap(),
            [
                FieldMeta::unbounded("id").with_sql_type("\"pg_catalog\".\"int4\""),
                FieldMeta::unbounded("bio"),
            ],
        );
        assert_eq!(meta.sql_type("id").unwrap(), Some("\"pg_catalog\".\"int4\""));
        assert_eq!(meta.sql_type("bio").unwrap(), None);
        assert!(meta.sql_type("nickname").is_err());
    }

    #[test]
    fn test_field_names_sorted() {
        let meta = user_meta();
        let names: Vec<&str> = meta.field_names().collect();
        assert_eq!(names, vec!["bio", "first_name", "id", "legacy"]);
    }
}
