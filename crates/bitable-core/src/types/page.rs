//! Cursor-paginated listing results.

use serde::{Deserialize, Deserializer, Serialize};

/// One page of a cursor-paginated listing.
///
/// `page_token` is opaque and only meaningful while `has_more` is true; it
/// must be forwarded verbatim to request the following page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct Page<T> {
    #[serde(default = "Vec::new", deserialize_with = "null_as_empty")]
    pub items: Vec<T>,
    #[serde(default)]
    pub has_more: bool,
    #[serde(default)]
    pub page_token: Option<String>,
    #[serde(default)]
    pub total: Option<u64>,
}

impl<T> Page<T> {
    /// The token to request the next page with, if there is a next page.
    ///
    /// Empty tokens are treated as absent.
    pub fn next_page_token(&self) -> Option<&str> {
        if self.has_more {
            self.page_token.as_deref().filter(|t| !t.is_empty())
        } else {
            None
        }
    }

    /// Transform the items of this page, keeping the pagination metadata.
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            has_more: self.has_more,
            page_token: self.page_token,
            total: self.total,
        }
    }
}

// The provider sends `"items": null` for empty pages.
fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

impl<T> Default for Page<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            has_more: false,
            page_token: None,
            total: None,
        }
    }
}
