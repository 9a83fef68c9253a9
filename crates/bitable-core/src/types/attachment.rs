//! Attachment references found in record field values.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A downloadable attachment, as listed in an attachment field of a record.
///
/// The `url` is pre-signed by the provider and only valid when taken fresh
/// from a record read. It must be used verbatim: it embeds per-record,
/// per-field parameters that cannot be rebuilt from the file token.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AttachmentRef {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub file_token: Option<String>,
    #[serde(default)]
    pub size: Option<u64>,
    #[serde(default, rename = "type")]
    pub mime_type: Option<String>,
}

impl AttachmentRef {
    /// Create a reference from a URL and file name.
    pub fn new(url: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            url: Some(url.into()),
            name: Some(name.into()),
            ..Self::default()
        }
    }

    /// Extract a reference from one item of an attachment field.
    ///
    /// Returns `None` if the item is not a mapping. Members with unexpected
    /// types are treated as absent rather than rejected.
    pub fn from_value(value: &Value) -> Option<Self> {
        let obj = value.as_object()?;
        let string = |key: &str| {
            obj.get(key)
                .and_then(Value::as_str)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
        };

        Some(Self {
            url: string("url"),
            name: string("name"),
            file_token: string("file_token"),
            size: obj.get("size").and_then(Value::as_u64),
            mime_type: string("type"),
        })
    }

    /// Returns the URL and name if both are present.
    pub fn download_target(&self) -> Option<(&str, &str)> {
        Some((self.url.as_deref()?, self.name.as_deref()?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn from_provider_item() {
        let item = json!({
            "file_token": "boxcnabc",
            "name": "report.pdf",
            "size": 20480,
            "tmp_url": "https://open.feishu.cn/open-apis/drive/v1/medias/batch_get_tmp_download_url?file_tokens=boxcnabc",
            "type": "application/pdf",
            "url": "https://open.feishu.cn/open-apis/drive/v1/medias/boxcnabc/download?extra=xyz"
        });

        let att = AttachmentRef::from_value(&item).unwrap();
        assert_eq!(att.name.as_deref(), Some("report.pdf"));
        assert_eq!(att.size, Some(20480));
        assert_eq!(att.mime_type.as_deref(), Some("application/pdf"));
        assert!(att.url.as_deref().unwrap().ends_with("extra=xyz"));
        assert!(att.download_target().is_some());
    }

    #[test]
    fn non_mapping_is_none() {
        assert!(AttachmentRef::from_value(&json!("https://x/1")).is_none());
        assert!(AttachmentRef::from_value(&json!(null)).is_none());
    }

    #[test]
    fn missing_url_has_no_target() {
        let att = AttachmentRef::from_value(&json!({"name": "a.png", "url": 5})).unwrap();
        assert_eq!(att.url, None);
        assert!(att.download_target().is_none());
    }
}
