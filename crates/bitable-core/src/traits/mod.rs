//! Core traits for remote API behavior.

mod api;

pub use api::BitableApi;
