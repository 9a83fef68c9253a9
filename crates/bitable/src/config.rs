//! Client configuration options.

use std::time::Duration;

use bitable_core::BaseUrl;
use bitable_http::DEFAULT_USER_ID_TYPE;

/// Page size used by the `get_all_*` aggregations.
pub const DEFAULT_AGGREGATE_PAGE_SIZE: u32 = 100;

/// Default cap on pages fetched by a single aggregation.
pub const DEFAULT_MAX_PAGES: u32 = 10_000;

/// Configuration for a [`TableClient`](crate::TableClient).
///
/// # Example
///
/// ```
/// use bitable::ClientConfig;
/// use std::time::Duration;
///
/// let config = ClientConfig::default()
///     .with_timeout(Duration::from_secs(60))
///     .with_user_agent("my-app/1.0")
///     .with_max_pages(None);
/// assert_eq!(config.record_page_size, 100);
/// ```
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Provider base URL
    pub base_url: BaseUrl,
    /// User-Agent header value
    pub user_agent: String,
    /// Request timeout; `None` waits indefinitely
    pub timeout: Option<Duration>,
    /// How person fields identify users (`open_id`, `union_id`, `user_id`)
    pub user_id_type: String,
    /// Page size for `get_all_records` and record streams
    pub record_page_size: u32,
    /// Page size for `get_all_tables` and `get_all_fields`
    pub list_page_size: u32,
    /// Aggregations fail after this many pages; `None` disables the cap
    pub max_pages: Option<u32>,
    /// Pause after each successful attachment download
    pub download_pause: Duration,
    /// Downloads smaller than this are treated as failed
    pub min_attachment_bytes: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: BaseUrl::default(),
            user_agent: format!("bitable-rs/{}", env!("CARGO_PKG_VERSION")),
            timeout: None,
            user_id_type: DEFAULT_USER_ID_TYPE.to_string(),
            record_page_size: DEFAULT_AGGREGATE_PAGE_SIZE,
            list_page_size: DEFAULT_AGGREGATE_PAGE_SIZE,
            max_pages: Some(DEFAULT_MAX_PAGES),
            download_pause: Duration::from_millis(500),
            min_attachment_bytes: 100,
        }
    }
}

impl ClientConfig {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the provider base URL (e.g. [`LARK_BASE_URL`](bitable_core::types::LARK_BASE_URL)).
    pub fn with_base_url(mut self, base_url: BaseUrl) -> Self {
        self.base_url = base_url;
        self
    }

    /// Set the User-Agent header.
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Set the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Set the user id type reported in person fields.
    pub fn with_user_id_type(mut self, user_id_type: impl Into<String>) -> Self {
        self.user_id_type = user_id_type.into();
        self
    }

    /// Set the page size used when aggregating records.
    pub fn with_record_page_size(mut self, page_size: u32) -> Self {
        self.record_page_size = page_size;
        self
    }

    /// Set the page size used when aggregating tables and fields.
    pub fn with_list_page_size(mut self, page_size: u32) -> Self {
        self.list_page_size = page_size;
        self
    }

    /// Set the aggregation page cap.
    pub fn with_max_pages(mut self, max_pages: Option<u32>) -> Self {
        self.max_pages = max_pages;
        self
    }

    /// Set the pause after each successful attachment download.
    pub fn with_download_pause(mut self, pause: Duration) -> Self {
        self.download_pause = pause;
        self
    }

    /// Set the minimum plausible attachment size.
    pub fn with_min_attachment_bytes(mut self, bytes: u64) -> Self {
        self.min_attachment_bytes = bytes;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = ClientConfig::default();
        assert_eq!(config.base_url.host(), Some("open.feishu.cn"));
        assert_eq!(config.timeout, None);
        assert_eq!(config.user_id_type, "open_id");
        assert_eq!(config.max_pages, Some(10_000));
        assert_eq!(config.download_pause, Duration::from_millis(500));
        assert_eq!(config.min_attachment_bytes, 100);
    }

    #[test]
    fn builder_overrides() {
        let config = ClientConfig::new()
            .with_user_id_type("union_id")
            .with_record_page_size(500)
            .with_download_pause(Duration::ZERO);
        assert_eq!(config.user_id_type, "union_id");
        assert_eq!(config.record_page_size, 500);
        assert_eq!(config.download_pause, Duration::ZERO);
    }
}
