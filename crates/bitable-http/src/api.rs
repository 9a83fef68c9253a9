//! HTTP-backed implementation of the Bitable API.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Method;
use tracing::{debug, instrument};

use bitable_core::response::{DeletedRecord, DeletedRecords, RecordData, RecordsData};
use bitable_core::traits::BitableApi;
use bitable_core::{
    AccessToken, ApiResponse, BaseUrl, Credentials, Field, Fields, Page, Record, RecordUpdate,
    Result, SearchRecordsQuery, Table,
};

use crate::auth::TokenCache;
use crate::client::HttpClient;
use crate::endpoints::{self, *};

/// Default `user_id_type` for person fields.
pub const DEFAULT_USER_ID_TYPE: &str = "open_id";

/// A network-backed Bitable API using the provider's REST endpoints.
///
/// Manages its own tenant token: the token is fetched on first use and
/// reused until shortly before it expires. Cheap to clone.
#[derive(Debug, Clone)]
pub struct HttpBitableApi {
    inner: Arc<ApiInner>,
}

#[derive(Debug)]
struct ApiInner {
    client: HttpClient,
    credentials: Credentials,
    user_id_type: String,
    tokens: TokenCache,
}

impl HttpBitableApi {
    /// Create a new API client over the given HTTP client.
    pub fn new(client: HttpClient, credentials: Credentials) -> Self {
        Self::with_user_id_type(client, credentials, DEFAULT_USER_ID_TYPE)
    }

    /// Create a new API client reporting person fields with `user_id_type`
    /// (`open_id`, `union_id` or `user_id`).
    pub fn with_user_id_type(
        client: HttpClient,
        credentials: Credentials,
        user_id_type: impl Into<String>,
    ) -> Self {
        Self {
            inner: Arc::new(ApiInner {
                client,
                credentials,
                user_id_type: user_id_type.into(),
                tokens: TokenCache::default(),
            }),
        }
    }

    /// Returns the provider base URL.
    pub fn base(&self) -> &BaseUrl {
        self.inner.client.base()
    }

    /// Returns the underlying HTTP client.
    pub fn client(&self) -> &HttpClient {
        &self.inner.client
    }

    async fn token(&self) -> Result<AccessToken> {
        self.inner
            .tokens
            .get(
                self.inner.client.inner(),
                self.inner.client.base(),
                &self.inner.credentials,
            )
            .await
    }

    fn user_id_type(&self) -> UserIdTypeQuery<'_> {
        UserIdTypeQuery {
            user_id_type: &self.inner.user_id_type,
        }
    }
}

#[async_trait]
impl BitableApi for HttpBitableApi {
    #[instrument(skip(self, query), fields(page_token = ?query.page_token))]
    async fn search_records(
        &self,
        app_token: &str,
        table_id: &str,
        query: &SearchRecordsQuery,
    ) -> Result<ApiResponse<Page<Record>>> {
        debug!(page_size = query.page_size, "Searching records via HTTP");
        let token = self.token().await?;

        let params = PageQuery {
            page_size: query.page_size,
            page_token: query.page_token.as_deref(),
            view_id: None,
            user_id_type: Some(&self.inner.user_id_type),
        };

        self.inner
            .client
            .procedure(
                Method::POST,
                &records_action(app_token, table_id, "search"),
                &params,
                query,
                &token,
            )
            .await
    }

    #[instrument(skip(self))]
    async fn get_record(
        &self,
        app_token: &str,
        table_id: &str,
        record_id: &str,
    ) -> Result<ApiResponse<RecordData>> {
        debug!("Getting record via HTTP");
        let token = self.token().await?;

        self.inner
            .client
            .query(
                Method::GET,
                &record(app_token, table_id, record_id),
                &self.user_id_type(),
                &token,
            )
            .await
    }

    #[instrument(skip(self, fields))]
    async fn create_record(
        &self,
        app_token: &str,
        table_id: &str,
        fields: &Fields,
    ) -> Result<ApiResponse<RecordData>> {
        debug!(field_count = fields.len(), "Creating record via HTTP");
        let token = self.token().await?;

        self.inner
            .client
            .procedure(
                Method::POST,
                &records(app_token, table_id),
                &self.user_id_type(),
                &FieldsBody { fields },
                &token,
            )
            .await
    }

    #[instrument(skip(self, fields))]
    async fn update_record(
        &self,
        app_token: &str,
        table_id: &str,
        record_id: &str,
        fields: &Fields,
    ) -> Result<ApiResponse<RecordData>> {
        debug!(field_count = fields.len(), "Updating record via HTTP");
        let token = self.token().await?;

        self.inner
            .client
            .procedure(
                Method::PUT,
                &record(app_token, table_id, record_id),
                &self.user_id_type(),
                &FieldsBody { fields },
                &token,
            )
            .await
    }

    #[instrument(skip(self))]
    async fn delete_record(
        &self,
        app_token: &str,
        table_id: &str,
        record_id: &str,
    ) -> Result<ApiResponse<DeletedRecord>> {
        debug!("Deleting record via HTTP");
        let token = self.token().await?;

        self.inner
            .client
            .query(
                Method::DELETE,
                &record(app_token, table_id, record_id),
                &(),
                &token,
            )
            .await
    }

    #[instrument(skip(self, records), fields(count = records.len()))]
    async fn batch_create_records(
        &self,
        app_token: &str,
        table_id: &str,
        records: &[Fields],
    ) -> Result<ApiResponse<RecordsData>> {
        debug!("Batch creating records via HTTP");
        let token = self.token().await?;

        let body = BatchCreateBody {
            records: records.iter().map(|fields| FieldsBody { fields }).collect(),
        };

        self.inner
            .client
            .procedure(
                Method::POST,
                &records_action(app_token, table_id, "batch_create"),
                &self.user_id_type(),
                &body,
                &token,
            )
            .await
    }

    #[instrument(skip(self, records), fields(count = records.len()))]
    async fn batch_update_records(
        &self,
        app_token: &str,
        table_id: &str,
        records: &[RecordUpdate],
    ) -> Result<ApiResponse<RecordsData>> {
        debug!("Batch updating records via HTTP");
        let token = self.token().await?;

        self.inner
            .client
            .procedure(
                Method::POST,
                &records_action(app_token, table_id, "batch_update"),
                &self.user_id_type(),
                &BatchUpdateBody { records },
                &token,
            )
            .await
    }

    #[instrument(skip(self, record_ids), fields(count = record_ids.len()))]
    async fn batch_delete_records(
        &self,
        app_token: &str,
        table_id: &str,
        record_ids: &[String],
    ) -> Result<ApiResponse<DeletedRecords>> {
        debug!("Batch deleting records via HTTP");
        let token = self.token().await?;

        self.inner
            .client
            .procedure(
                Method::POST,
                &records_action(app_token, table_id, "batch_delete"),
                &(),
                &BatchDeleteBody {
                    records: record_ids,
                },
                &token,
            )
            .await
    }

    #[instrument(skip(self))]
    async fn list_tables(
        &self,
        app_token: &str,
        page_size: u32,
        page_token: Option<&str>,
    ) -> Result<ApiResponse<Page<Table>>> {
        debug!("Listing tables via HTTP");
        let token = self.token().await?;

        let params = PageQuery {
            page_size,
            page_token,
            view_id: None,
            user_id_type: None,
        };

        self.inner
            .client
            .query(Method::GET, &endpoints::tables(app_token), &params, &token)
            .await
    }

    #[instrument(skip(self))]
    async fn list_fields(
        &self,
        app_token: &str,
        table_id: &str,
        view_id: Option<&str>,
        page_size: u32,
        page_token: Option<&str>,
    ) -> Result<ApiResponse<Page<Field>>> {
        debug!("Listing fields via HTTP");
        let token = self.token().await?;

        let params = PageQuery {
            page_size,
            page_token,
            view_id,
            user_id_type: None,
        };

        self.inner
            .client
            .query(
                Method::GET,
                &endpoints::fields(app_token, table_id),
                &params,
                &token,
            )
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_creation() {
        let base = BaseUrl::new("https://open.feishu.cn").unwrap();
        let client = HttpClient::new(base, "bitable-test", None).unwrap();
        let api = HttpBitableApi::new(client, Credentials::new("cli_x", "s3cret"));
        assert_eq!(api.base().host(), Some("open.feishu.cn"));

        let debug = format!("{:?}", api);
        assert!(debug.contains("cli_x"));
        assert!(!debug.contains("s3cret"));
    }
}
