//! Table and field metadata.

use serde::{Deserialize, Serialize};

/// Table metadata. Read-only from the client's perspective.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Table {
    pub table_id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub revision: i64,
}

/// Column (field) metadata. Read-only from the client's perspective.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Field {
    pub field_id: String,
    pub field_name: String,

    /// Provider field type code (1 = text, 2 = number, 17 = attachment, ...).
    #[serde(rename = "type")]
    pub field_type: i64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_primary: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ui_type: Option<String>,
}
