//! Remote Bitable API trait.

use async_trait::async_trait;

use crate::Result;
use crate::response::{ApiResponse, DeletedRecord, DeletedRecords, RecordData, RecordsData};
use crate::types::{Field, Fields, Page, Record, RecordUpdate, SearchRecordsQuery, Table};

/// The provider's record, table and field operations.
///
/// Implementations translate each call into one provider request and hand
/// back the provider's envelope untouched: a response with `code != 0` is
/// returned as `Ok`, so the caller decides how to surface it. `Err` is
/// reserved for transport and decoding failures.
#[async_trait]
pub trait BitableApi: Send + Sync {
    /// Search records, one page at a time.
    async fn search_records(
        &self,
        app_token: &str,
        table_id: &str,
        query: &SearchRecordsQuery,
    ) -> Result<ApiResponse<Page<Record>>>;

    /// Get a single record.
    async fn get_record(
        &self,
        app_token: &str,
        table_id: &str,
        record_id: &str,
    ) -> Result<ApiResponse<RecordData>>;

    /// Create a record.
    async fn create_record(
        &self,
        app_token: &str,
        table_id: &str,
        fields: &Fields,
    ) -> Result<ApiResponse<RecordData>>;

    /// Update the given fields of a record.
    async fn update_record(
        &self,
        app_token: &str,
        table_id: &str,
        record_id: &str,
        fields: &Fields,
    ) -> Result<ApiResponse<RecordData>>;

    /// Delete a record.
    async fn delete_record(
        &self,
        app_token: &str,
        table_id: &str,
        record_id: &str,
    ) -> Result<ApiResponse<DeletedRecord>>;

    /// Create several records in one request.
    async fn batch_create_records(
        &self,
        app_token: &str,
        table_id: &str,
        records: &[Fields],
    ) -> Result<ApiResponse<RecordsData>>;

    /// Update several records in one request.
    async fn batch_update_records(
        &self,
        app_token: &str,
        table_id: &str,
        records: &[RecordUpdate],
    ) -> Result<ApiResponse<RecordsData>>;

    /// Delete several records in one request.
    async fn batch_delete_records(
        &self,
        app_token: &str,
        table_id: &str,
        record_ids: &[String],
    ) -> Result<ApiResponse<DeletedRecords>>;

    /// List the tables of a base, one page at a time.
    async fn list_tables(
        &self,
        app_token: &str,
        page_size: u32,
        page_token: Option<&str>,
    ) -> Result<ApiResponse<Page<Table>>>;

    /// List the fields of a table, one page at a time.
    async fn list_fields(
        &self,
        app_token: &str,
        table_id: &str,
        view_id: Option<&str>,
        page_size: u32,
        page_token: Option<&str>,
    ) -> Result<ApiResponse<Page<Field>>>;
}
