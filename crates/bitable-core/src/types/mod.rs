//! Core Bitable types.
//!
//! Record field values stay dynamically typed; everything around them
//! (identifiers, pages, metadata) gets an explicit struct.

mod attachment;
mod base_url;
mod page;
mod query;
mod record;
mod schema;

pub use attachment::AttachmentRef;
pub use base_url::{BaseUrl, FEISHU_BASE_URL, LARK_BASE_URL};
pub use page::Page;
pub use query::{DEFAULT_SEARCH_PAGE_SIZE, SearchRecordsQuery};
pub use record::{Fields, Record, RecordUpdate};
pub use schema::{Field, Table};
