//! bitable-http - HTTP-backed Bitable API implementation.

mod api;
mod auth;
mod client;

pub mod endpoints;

pub use api::{DEFAULT_USER_ID_TYPE, HttpBitableApi};
pub use auth::{TenantToken, fetch_tenant_access_token};
pub use client::{BODY_EXCERPT_LEN, HttpClient, LOG_ID_HEADER, body_excerpt};
