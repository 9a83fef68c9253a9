//! Record types.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ValidationError;

/// Field values of a record, keyed by field name.
///
/// Values are schema-agnostic JSON; the provider is authoritative on what
/// each field accepts. Insertion order is preserved.
pub type Fields = serde_json::Map<String, Value>;

/// A row in a table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    /// Provider-assigned record id, unique within its table.
    pub record_id: String,

    /// Field values keyed by field name.
    #[serde(default)]
    pub fields: Fields,
}

/// One element of a batch update: the record to change and the fields to set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordUpdate {
    /// The record to update.
    pub record_id: String,
    /// Fields to overwrite; fields not named here are left untouched.
    pub fields: Fields,
}

impl RecordUpdate {
    /// Create a new update.
    pub fn new(record_id: impl Into<String>, fields: Fields) -> Self {
        Self {
            record_id: record_id.into(),
            fields,
        }
    }

    /// Build an update from an untyped mapping.
    ///
    /// The mapping must contain a string `record_id` and an object `fields`.
    /// `index` is the element's position in the batch and is reported back
    /// in the error.
    pub fn from_value(index: usize, value: &Value) -> Result<Self, ValidationError> {
        let incomplete = || ValidationError::IncompleteRecordUpdate { index };

        let record_id = value
            .get("record_id")
            .and_then(Value::as_str)
            .ok_or_else(incomplete)?;
        let fields = value
            .get("fields")
            .and_then(Value::as_object)
            .ok_or_else(incomplete)?;

        Ok(Self::new(record_id, fields.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn record_deserializes_without_fields() {
        let record: Record = serde_json::from_value(json!({"record_id": "rec1"})).unwrap();
        assert_eq!(record.record_id, "rec1");
        assert!(record.fields.is_empty());
    }

    #[test]
    fn fields_keep_insertion_order() {
        let record: Record = serde_json::from_str(
            r#"{"record_id": "rec1", "fields": {"z": 1, "a": "two", "m": [3]}}"#,
        )
        .unwrap();
        let keys: Vec<_> = record.fields.keys().cloned().collect();
        assert_eq!(keys, vec!["z", "a", "m"]);
    }

    #[test]
    fn update_from_complete_value() {
        let update =
            RecordUpdate::from_value(0, &json!({"record_id": "rec1", "fields": {"Title": "x"}}))
                .unwrap();
        assert_eq!(update.record_id, "rec1");
        assert_eq!(update.fields["Title"], "x");
    }

    #[test]
    fn update_missing_record_id_fails() {
        let err = RecordUpdate::from_value(3, &json!({"fields": {}})).unwrap_err();
        assert!(matches!(
            err,
            ValidationError::IncompleteRecordUpdate { index: 3 }
        ));
    }

    #[test]
    fn update_missing_fields_fails() {
        assert!(RecordUpdate::from_value(0, &json!({"record_id": "rec1"})).is_err());
        assert!(RecordUpdate::from_value(0, &json!("rec1")).is_err());
    }
}
