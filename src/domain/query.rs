//! Record queries
//!
//! A [`RecordQuery`] is what an anonymizer hands to a store to describe the
//! collection it wants to walk: a model plus zero or more field filters.
//! Stores always order results by primary key.

use super::model::ModelRef;
use super::{HattoriError, Result};
use serde::{Deserialize, Serialize};

/// Comparison applied by a [`FieldFilter`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterOp {
    /// Field equals value (compared as text)
    Eq,
    /// Field differs from value, NULLs excluded
    Ne,
    /// Field is NULL
    IsNull,
    /// Field is not NULL
    IsNotNull,
}

impl FilterOp {
    /// Whether this operator compares against a value
    pub fn takes_value(self) -> bool {
        matches!(self, Self::Eq | Self::Ne)
    }
}

/// A single predicate on a field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldFilter {
    /// Field name
    pub field: String,

    /// Operator
    pub op: FilterOp,

    /// Value for `eq`/`ne`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

impl FieldFilter {
    /// `field = value`
    pub fn eq(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            op: FilterOp::Eq,
            value: Some(value.into()),
        }
    }

    /// `field <> value`
    pub fn ne(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            op: FilterOp::Ne,
            value: Some(value.into()),
        }
    }

    /// `field IS NULL`
    pub fn is_null(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            op: FilterOp::IsNull,
            value: None,
        }
    }

    /// `field IS NOT NULL`
    pub fn is_not_null(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            op: FilterOp::IsNotNull,
            value: None,
        }
    }

    /// Checks operator/value consistency
    pub fn validate(&self) -> Result<()> {
        if self.field.trim().is_empty() {
            return Err(HattoriError::Configuration(
                "filter field cannot be empty".to_string(),
            ));
        }
        match (self.op.takes_value(), self.value.is_some()) {
            (true, false) => Err(HattoriError::Configuration(format!(
                "filter on '{}' with op {:?} requires a value",
                self.field, self.op
            ))),
            (false, true) => Err(HattoriError::Configuration(format!(
                "filter on '{}' with op {:?} does not take a value",
                self.field, self.op
            ))),
            _ => Ok(()),
        }
    }

    /// Evaluates the filter against a field value, SQL style
    pub fn matches(&self, actual: Option<&str>) -> bool {
        match self.op {
            FilterOp::Eq => actual.is_some() && actual == self.value.as_deref(),
            FilterOp::Ne => actual.is_some() && actual != self.value.as_deref(),
            FilterOp::IsNull => actual.is_none(),
            FilterOp::IsNotNull => actual.is_some(),
        }
    }
}

/// A queryable set of records of one model
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordQuery {
    model: ModelRef,
    filters: Vec<FieldFilter>,
}

impl RecordQuery {
    /// Every record of the model
    pub fn all(model: ModelRef) -> Self {
        Self {
            model,
            filters: Vec::new(),
        }
    }

    /// Narrows the query with one more filter
    pub fn filter(mut self, filter: FieldFilter) -> Self {
        self.filters.push(filter);
        self
    }

    /// The queried model
    pub fn model(&self) -> &ModelRef {
        &self.model
    }

    /// Active filters, all of which must match
    pub fn filters(&self) -> &[FieldFilter] {
        &self.filters
    }

    /// Whether this query selects the whole model
    pub fn is_unfiltered(&self) -> bool {
        self.filters.is_empty()
    }
}
