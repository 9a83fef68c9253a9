//! bitable - Client for Feishu/Lark Bitable tables
//!
//! This library wraps the provider's Bitable Open API: record CRUD and
//! batch operations, table and field metadata, transparent pagination and
//! attachment downloads. All operations flow through a [`TableClient`].
//!
//! # Example
//!
//! ```no_run
//! use bitable::{Credentials, SearchRecordsQuery, TableClient};
//! use serde_json::json;
//!
//! # async fn example() -> Result<(), bitable::Error> {
//! let client = TableClient::new(Credentials::new("cli_a1b2c3", "app-secret"))?;
//!
//! let query = SearchRecordsQuery::new()
//!     .view_id("vewTpR1urY")
//!     .filter(json!({"conjunction": "and", "conditions": [
//!         {"field_name": "Status", "operator": "is", "value": ["Done"]}
//!     ]}));
//! let records = client.get_all_records("bascnAppToken", "tblTableId", &query).await?;
//!
//! for record in &records {
//!     let files = client
//!         .download_attachments(record.fields.get("Files"), "downloads", Some(record.record_id.as_str()))
//!         .await;
//!     println!("{}: {} files", record.record_id, files.len());
//! }
//! # Ok(())
//! # }
//! ```

mod attachments;
mod client;
mod config;
mod pagination;
mod records;

pub mod logging;

pub use attachments::DownloadOutcome;
pub use client::{ApiSource, CustomApi, DefaultApi, TableClient, TableClientBuilder};
pub use config::{ClientConfig, DEFAULT_AGGREGATE_PAGE_SIZE, DEFAULT_MAX_PAGES};
pub use pagination::RecordStream;

// Re-export the data model and the remote API seam
pub use bitable_core::error;
pub use bitable_core::response;
pub use bitable_core::traits::BitableApi;
pub use bitable_core::types::{FEISHU_BASE_URL, LARK_BASE_URL};
pub use bitable_core::{
    AccessToken, ApiResponse, AttachmentRef, BaseUrl, Credentials, Error, Field, Fields, Page,
    Record, RecordUpdate, Result, SearchRecordsQuery, Table,
};
pub use bitable_http::HttpBitableApi;
