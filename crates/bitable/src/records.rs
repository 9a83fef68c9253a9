//! Record CRUD and batch operations.

use serde_json::Value;
use tracing::{debug, instrument};

use bitable_core::{BitableApi, Fields, Record, RecordUpdate, Result};

use crate::client::{TableClient, missing_payload};

impl<A: BitableApi> TableClient<A> {
    /// Fetch a single record.
    #[instrument(parent = &self.inner.span, skip(self))]
    pub async fn get_record(
        &self,
        app_token: &str,
        table_id: &str,
        record_id: &str,
    ) -> Result<Record> {
        debug!("Getting record");
        let response = self
            .inner
            .api
            .get_record(app_token, table_id, record_id)
            .await?;
        let data = self.expect_success(response, "get record")?;
        data.record
            .ok_or_else(|| missing_payload("get record", "record").into())
    }

    /// Create a record and return it as stored.
    #[instrument(parent = &self.inner.span, skip(self, fields))]
    pub async fn create_record(
        &self,
        app_token: &str,
        table_id: &str,
        fields: &Fields,
    ) -> Result<Record> {
        debug!(field_count = fields.len(), "Creating record");
        let response = self
            .inner
            .api
            .create_record(app_token, table_id, fields)
            .await?;
        let data = self.expect_success(response, "create record")?;
        data.record
            .ok_or_else(|| missing_payload("create record", "record").into())
    }

    /// Update a record.
    ///
    /// Only the named fields change; the returned record reflects the
    /// provider's state after the update.
    #[instrument(parent = &self.inner.span, skip(self, fields))]
    pub async fn update_record(
        &self,
        app_token: &str,
        table_id: &str,
        record_id: &str,
        fields: &Fields,
    ) -> Result<Record> {
        debug!(field_count = fields.len(), "Updating record");
        let response = self
            .inner
            .api
            .update_record(app_token, table_id, record_id, fields)
            .await?;
        let data = self.expect_success(response, "update record")?;
        data.record
            .ok_or_else(|| missing_payload("update record", "record").into())
    }

    /// Delete a record.
    ///
    /// Returns the provider's `deleted` flag. Failures are errors, never
    /// `false`.
    #[instrument(parent = &self.inner.span, skip(self))]
    pub async fn delete_record(
        &self,
        app_token: &str,
        table_id: &str,
        record_id: &str,
    ) -> Result<bool> {
        debug!("Deleting record");
        let response = self
            .inner
            .api
            .delete_record(app_token, table_id, record_id)
            .await?;
        self.ensure_success(&response, "delete record")?;
        Ok(response.data.is_none_or(|d| d.deleted))
    }

    /// Create several records in one call.
    #[instrument(parent = &self.inner.span, skip(self, records), fields(count = records.len()))]
    pub async fn batch_create_records(
        &self,
        app_token: &str,
        table_id: &str,
        records: &[Fields],
    ) -> Result<Vec<Record>> {
        debug!("Batch creating records");
        let response = self
            .inner
            .api
            .batch_create_records(app_token, table_id, records)
            .await?;
        let data = self.expect_success(response, "batch create records")?;
        Ok(data.records.unwrap_or_default())
    }

    /// Update several records in one call.
    ///
    /// Every element must be a mapping with a string `record_id` and a
    /// mapping `fields`. The whole batch is checked before anything is sent.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`](bitable_core::Error::Validation) naming
    /// the first malformed element; the provider is not contacted.
    #[instrument(parent = &self.inner.span, skip(self, records), fields(count = records.len()))]
    pub async fn batch_update_records(
        &self,
        app_token: &str,
        table_id: &str,
        records: &[Value],
    ) -> Result<Vec<Record>> {
        let updates = records
            .iter()
            .enumerate()
            .map(|(index, value)| RecordUpdate::from_value(index, value))
            .collect::<std::result::Result<Vec<_>, _>>()?;

        self.batch_update(app_token, table_id, &updates).await
    }

    /// Update several records in one call from typed updates.
    #[instrument(parent = &self.inner.span, skip(self, updates), fields(count = updates.len()))]
    pub async fn batch_update(
        &self,
        app_token: &str,
        table_id: &str,
        updates: &[RecordUpdate],
    ) -> Result<Vec<Record>> {
        debug!("Batch updating records");
        let response = self
            .inner
            .api
            .batch_update_records(app_token, table_id, updates)
            .await?;
        let data = self.expect_success(response, "batch update records")?;
        Ok(data.records.unwrap_or_default())
    }

    /// Delete several records in one call.
    ///
    /// Returns `true` unless the provider reports a record as not deleted.
    #[instrument(parent = &self.inner.span, skip(self, record_ids), fields(count = record_ids.len()))]
    pub async fn batch_delete_records(
        &self,
        app_token: &str,
        table_id: &str,
        record_ids: &[String],
    ) -> Result<bool> {
        debug!("Batch deleting records");
        let response = self
            .inner
            .api
            .batch_delete_records(app_token, table_id, record_ids)
            .await?;
        self.ensure_success(&response, "batch delete records")?;

        let deleted = response
            .data
            .and_then(|d| d.records)
            .is_none_or(|records| records.iter().all(|r| r.deleted));
        Ok(deleted)
    }
}
