//! Open API endpoint definitions and request/response types.

use serde::{Deserialize, Serialize};

use bitable_core::{Fields, RecordUpdate};

// ============================================================================
// Endpoint Paths (relative to /open-apis/)
// ============================================================================

/// auth/v3 tenant_access_token/internal
pub const TENANT_ACCESS_TOKEN: &str = "auth/v3/tenant_access_token/internal";

/// Tables of a base.
pub fn tables(app_token: &str) -> String {
    format!("bitable/v1/apps/{}/tables", app_token)
}

/// Fields of a table.
pub fn fields(app_token: &str, table_id: &str) -> String {
    format!("bitable/v1/apps/{}/tables/{}/fields", app_token, table_id)
}

/// Records collection of a table.
pub fn records(app_token: &str, table_id: &str) -> String {
    format!("bitable/v1/apps/{}/tables/{}/records", app_token, table_id)
}

/// A single record.
pub fn record(app_token: &str, table_id: &str, record_id: &str) -> String {
    format!("{}/{}", records(app_token, table_id), record_id)
}

/// A records sub-resource (`search`, `batch_create`, ...).
pub fn records_action(app_token: &str, table_id: &str, action: &str) -> String {
    format!("{}/{}", records(app_token, table_id), action)
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// Request body for the tenant token endpoint.
#[derive(Debug, Serialize)]
pub struct TenantAccessTokenRequest<'a> {
    pub app_id: &'a str,
    pub app_secret: &'a str,
}

/// Response from the tenant token endpoint.
///
/// Unlike the Bitable endpoints, this one puts its payload at the top level.
#[derive(Debug, Deserialize)]
pub struct TenantAccessTokenResponse {
    pub code: i64,
    #[serde(default)]
    pub msg: String,
    #[serde(default)]
    pub tenant_access_token: String,
    /// Lifetime in seconds.
    #[serde(default)]
    pub expire: u64,
}

/// Query parameters carrying only the user id type.
#[derive(Debug, Serialize)]
pub struct UserIdTypeQuery<'a> {
    pub user_id_type: &'a str,
}

/// Query parameters for paged listings.
#[derive(Debug, Serialize)]
pub struct PageQuery<'a> {
    pub page_size: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_token: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub view_id: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id_type: Option<&'a str>,
}

/// Request body for create and update.
#[derive(Debug, Serialize)]
pub struct FieldsBody<'a> {
    pub fields: &'a Fields,
}

/// Request body for batch create.
#[derive(Debug, Serialize)]
pub struct BatchCreateBody<'a> {
    pub records: Vec<FieldsBody<'a>>,
}

/// Request body for batch update.
#[derive(Debug, Serialize)]
pub struct BatchUpdateBody<'a> {
    pub records: &'a [RecordUpdate],
}

/// Request body for batch delete.
#[derive(Debug, Serialize)]
pub struct BatchDeleteBody<'a> {
    pub records: &'a [String],
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn record_paths() {
        assert_eq!(
            record("bascnX", "tblY", "recZ"),
            "bitable/v1/apps/bascnX/tables/tblY/records/recZ"
        );
        assert_eq!(
            records_action("bascnX", "tblY", "batch_delete"),
            "bitable/v1/apps/bascnX/tables/tblY/records/batch_delete"
        );
    }

    #[test]
    fn batch_create_wraps_fields() {
        let mut fields = Fields::new();
        fields.insert("Title".to_string(), json!("a"));
        let body = BatchCreateBody {
            records: vec![FieldsBody { fields: &fields }],
        };
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            json!({"records": [{"fields": {"Title": "a"}}]})
        );
    }
}
