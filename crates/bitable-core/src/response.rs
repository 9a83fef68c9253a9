//! Provider response envelope and payload types.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ApiError;
use crate::types::Record;

/// A structured provider response.
///
/// Every provider endpoint answers with `{code, msg, data}`; `code == 0`
/// means success. The request log id travels in a response header and is
/// captured alongside the raw body for diagnostics.
#[derive(Debug, Clone)]
pub struct ApiResponse<T> {
    pub code: i64,
    pub msg: String,
    pub log_id: Option<String>,
    pub data: Option<T>,
    pub raw: Value,
}

impl<T> ApiResponse<T> {
    /// A successful response carrying `data`.
    pub fn ok(data: T) -> Self {
        Self {
            code: 0,
            msg: "success".to_string(),
            log_id: None,
            data: Some(data),
            raw: Value::Null,
        }
    }

    /// A failed response with the given code and message.
    pub fn failure(code: i64, msg: impl Into<String>, log_id: Option<String>) -> Self {
        let msg = msg.into();
        Self {
            raw: serde_json::json!({"code": code, "msg": msg}),
            code,
            msg,
            log_id,
            data: None,
        }
    }

    /// Whether the provider reported success.
    pub fn success(&self) -> bool {
        self.code == 0
    }

    /// Build the error describing this response's failure.
    pub fn to_error(&self, operation: &'static str) -> ApiError {
        ApiError {
            operation,
            code: self.code,
            message: self.msg.clone(),
            log_id: self.log_id.clone(),
            body: self.raw.clone(),
        }
    }
}

/// Payload of single-record endpoints (get, create, update).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RecordData {
    #[serde(default)]
    pub record: Option<Record>,
}

/// Payload of batch create and batch update.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RecordsData {
    #[serde(default)]
    pub records: Option<Vec<Record>>,
}

/// Payload of a single-record delete, also one element of a batch delete.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DeletedRecord {
    #[serde(default)]
    pub deleted: bool,
    #[serde(default)]
    pub record_id: String,
}

/// Payload of a batch delete.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DeletedRecords {
    #[serde(default)]
    pub records: Option<Vec<DeletedRecord>>,
}
