//! Filter types for document queries.

use serde::{Deserialize, Serialize};

/// Filter comparison operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterOp {
    /// Exact equality.
    Eq,
    /// Not equal.
    Ne,
    /// Membership in a list of values.
    In,
    /// Field is absent or null.
    IsNull,
    /// Field is present and not null.
    IsNotNull,
}

/// A filter value compared against a document field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FilterValue {
    /// A string value.
    String(String),
    /// An integer value.
    Integer(i64),
    /// A boolean value.
    Boolean(bool),
    /// A list of string values (for the `In` operator).
    StringList(Vec<String>),
    /// No value (for `IsNull`, `IsNotNull`).
    Null,
}

impl FilterValue {
    /// Convert to the JSON value a document field would hold.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Self::String(s) => serde_json::Value::String(s.clone()),
            Self::Integer(i) => serde_json::Value::from(*i),
            Self::Boolean(b) => serde_json::Value::Bool(*b),
            Self::StringList(list) => serde_json::Value::from(list.clone()),
            Self::Null => serde_json::Value::Null,
        }
    }
}

/// A single filter condition on a named field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterField {
    /// The document field name to filter on.
    pub field: String,
    /// The comparison operator.
    pub op: FilterOp,
    /// The value to compare against.
    pub value: FilterValue,
}

impl FilterField {
    /// Create a new filter field.
    pub fn new(field: impl Into<String>, op: FilterOp, value: FilterValue) -> Self {
        Self {
            field: field.into(),
            op,
            value,
        }
    }

    /// Shorthand for a string equality filter.
    pub fn eq(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(field, FilterOp::Eq, FilterValue::String(value.into()))
    }

    /// Shorthand for a boolean equality filter.
    pub fn eq_bool(field: impl Into<String>, value: bool) -> Self {
        Self::new(field, FilterOp::Eq, FilterValue::Boolean(value))
    }

    /// Shorthand for an `In` filter.
    pub fn one_of(field: impl Into<String>, values: Vec<String>) -> Self {
        Self::new(field, FilterOp::In, FilterValue::StringList(values))
    }

    /// Evaluate this condition against a document's fields.
    pub fn matches(&self, doc: &serde_json::Map<String, serde_json::Value>) -> bool {
        let actual = doc.get(&self.field).unwrap_or(&serde_json::Value::Null);
        match self.op {
            FilterOp::Eq => *actual == self.value.to_json(),
            FilterOp::Ne => *actual != self.value.to_json(),
            FilterOp::In => match &self.value {
                FilterValue::StringList(list) => actual
                    .as_str()
                    .map(|s| list.iter().any(|v| v == s))
                    .unwrap_or(false),
                other => *actual == other.to_json(),
            },
            FilterOp::IsNull => actual.is_null(),
            FilterOp::IsNotNull => !actual.is_null(),
        }
    }
}
