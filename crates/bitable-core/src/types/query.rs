//! Listing query parameters.

use serde::Serialize;
use serde_json::Value;

/// Default page size of a single `search_records` call.
pub const DEFAULT_SEARCH_PAGE_SIZE: u32 = 20;

/// Parameters of a record search.
///
/// `filter` and `sort` are provider-defined expressions and are forwarded
/// unmodified; this crate never parses or validates them.
///
/// # Example
///
/// ```
/// use bitable_core::SearchRecordsQuery;
/// use serde_json::json;
///
/// let query = SearchRecordsQuery::new()
///     .view_id("vewTpR1urY")
///     .field_names(["Title", "Files"])
///     .filter(json!({"conjunction": "and", "conditions": []}));
/// assert_eq!(query.page_size, 20);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchRecordsQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub view_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field_names: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort: Option<Value>,
    #[serde(skip)]
    pub page_size: u32,
    #[serde(skip)]
    pub page_token: Option<String>,
}

impl Default for SearchRecordsQuery {
    fn default() -> Self {
        Self {
            view_id: None,
            field_names: None,
            filter: None,
            sort: None,
            page_size: DEFAULT_SEARCH_PAGE_SIZE,
            page_token: None,
        }
    }
}

impl SearchRecordsQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn view_id(mut self, view_id: impl Into<String>) -> Self {
        self.view_id = Some(view_id.into());
        self
    }

    pub fn field_names<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.field_names = Some(names.into_iter().map(Into::into).collect());
        self
    }

    pub fn filter(mut self, filter: impl Into<Value>) -> Self {
        self.filter = Some(filter.into());
        self
    }

    pub fn sort(mut self, sort: impl Into<Value>) -> Self {
        self.sort = Some(sort.into());
        self
    }

    pub fn page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size;
        self
    }

    pub fn page_token(mut self, page_token: impl Into<String>) -> Self {
        self.page_token = Some(page_token.into());
        self
    }
}
