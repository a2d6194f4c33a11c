//! Conversions between typed entities and stored documents.
//!
//! Stored fields never contain `id` or `version`; those come from the
//! document envelope and are spliced back in when decoding.

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use resq_core::error::{AppError, ErrorKind};
use resq_core::result::AppResult;
use resq_core::traits::{Document, Fields};

/// Serialize an entity into document fields.
pub fn to_fields<T: Serialize>(value: &T) -> AppResult<Fields> {
    match serde_json::to_value(value)? {
        Value::Object(mut fields) => {
            fields.remove("id");
            fields.remove("version");
            Ok(fields)
        }
        other => Err(AppError::internal(format!(
            "Expected an object to store, got {other}"
        ))),
    }
}

/// Deserialize a stored document into an entity.
pub fn decode<T: DeserializeOwned>(doc: Document) -> AppResult<T> {
    let Document {
        id,
        version,
        mut fields,
    } = doc;
    fields.insert("id".to_string(), Value::String(id.to_string()));
    fields.insert("version".to_string(), Value::from(version));
    serde_json::from_value(Value::Object(fields)).map_err(|e| {
        AppError::with_source(
            ErrorKind::Serialization,
            format!("Malformed document {id}: {e}"),
            e,
        )
    })
}

/// Deserialize many documents, failing on the first malformed one.
pub fn decode_all<T: DeserializeOwned>(docs: Vec<Document>) -> AppResult<Vec<T>> {
    docs.into_iter().map(decode).collect()
}

/// Encode a timestamp the way entities store it.
pub fn timestamp(at: DateTime<Utc>) -> Value {
    Value::from(at.timestamp_micros())
}

/// Builder for partial updates.
#[derive(Debug, Clone, Default)]
pub struct Patch(Fields);

impl Patch {
    /// Start an empty patch.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a field.
    pub fn set(mut self, field: &str, value: impl Into<Value>) -> Self {
        self.0.insert(field.to_string(), value.into());
        self
    }

    /// Set a field to a serializable value.
    pub fn set_serialized<V: Serialize>(self, field: &str, value: &V) -> AppResult<Self> {
        Ok(self.set(field, serde_json::to_value(value)?))
    }

    /// Set a timestamp field.
    pub fn set_time(self, field: &str, at: DateTime<Utc>) -> Self {
        self.set(field, timestamp(at))
    }

    /// Whether the patch has no fields.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The fields to merge.
    pub fn into_fields(self) -> Fields {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use uuid::Uuid;

    #[derive(Debug, Serialize, Deserialize, PartialEq)]
    struct Probe {
        id: Uuid,
        version: u64,
        name: String,
    }

    #[test]
    fn test_envelope_fields_not_stored() {
        let probe = Probe {
            id: Uuid::new_v4(),
            version: 4,
            name: "x".into(),
        };
        let fields = to_fields(&probe).unwrap();
        assert!(!fields.contains_key("id"));
        assert!(!fields.contains_key("version"));
    }

    #[test]
    fn test_decode_uses_envelope() {
        let id = Uuid::new_v4();
        let mut fields = Fields::new();
        fields.insert("name".into(), Value::String("shelter".into()));
        let probe: Probe = decode(Document {
            id,
            version: 9,
            fields,
        })
        .unwrap();
        assert_eq!(probe.id, id);
        assert_eq!(probe.version, 9);
    }
}
