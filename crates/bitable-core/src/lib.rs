//! bitable-core - Core Bitable types and traits.

pub mod credentials;
pub mod error;
pub mod response;
pub mod tokens;
pub mod traits;
pub mod types;

pub use credentials::Credentials;
pub use error::Error;
pub use response::ApiResponse;
pub use tokens::AccessToken;
pub use traits::BitableApi;
pub use types::{
    AttachmentRef, BaseUrl, Field, Fields, Page, Record, RecordUpdate, SearchRecordsQuery, Table,
};

/// Result type alias using the crate's Error type.
pub type Result<T> = std::result::Result<T, Error>;
