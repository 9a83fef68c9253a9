//! Attachment downloads.
//!
//! Attachment URLs are served by the provider's media endpoint, which wants
//! a tenant bearer token. A fresh token is requested for every download and
//! the URL from the record is used verbatim.
//!
//! Downloads are best effort: nothing here returns an error. Every failure
//! is logged and reported through [`DownloadOutcome`].

use std::path::{Path, PathBuf};

use futures_util::StreamExt;
use reqwest::StatusCode;
use reqwest::header::AUTHORIZATION;
use serde_json::Value;
use tokio::fs::File;
use tokio::io::{AsyncWriteExt, BufWriter};
use tracing::{debug, error, info, instrument, warn};

use bitable_core::{AccessToken, AttachmentRef, BitableApi, Result};
use bitable_http::{body_excerpt, fetch_tenant_access_token};

use crate::client::TableClient;

/// Write buffer between the response body and the destination file.
const WRITE_BUFFER_SIZE: usize = 8 * 1024;

/// Result of a single attachment download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DownloadOutcome {
    /// The file was written and passed the size check.
    Success { path: PathBuf, size: u64 },
    /// The attachment lacks a URL or a name. Nothing was requested.
    InvalidInput,
    /// No access token could be obtained.
    AuthFailed,
    /// The media endpoint answered with a non-200 status.
    HttpError { status: u16 },
    /// The file was written but is too small to be the real content. It is
    /// left on disk for inspection.
    IntegrityFailed { size: u64 },
    /// Transport or filesystem failure.
    Failed { message: String },
}

impl DownloadOutcome {
    /// Whether the download succeeded.
    pub fn is_success(&self) -> bool {
        matches!(self, DownloadOutcome::Success { .. })
    }

    /// The written file, on success.
    pub fn path(&self) -> Option<&Path> {
        match self {
            DownloadOutcome::Success { path, .. } => Some(path),
            _ => None,
        }
    }
}

impl<A: BitableApi> TableClient<A> {
    /// Request a fresh tenant access token.
    ///
    /// Returns `None` (after logging why) unless the provider answered
    /// HTTP 200 with code 0 and a non-empty token. The token is not cached.
    #[instrument(parent = &self.inner.span, skip(self))]
    pub async fn fetch_access_token(&self) -> Option<AccessToken> {
        match fetch_tenant_access_token(
            self.inner.http.inner(),
            self.inner.http.base(),
            &self.inner.credentials,
        )
        .await
        {
            Ok(token) => Some(token.token),
            Err(e) => {
                error!(error = %e, "Failed to obtain tenant access token");
                None
            }
        }
    }

    /// Download one attachment to `dest`, creating parent directories.
    #[instrument(
        parent = &self.inner.span,
        skip(self, attachment, dest),
        fields(name = attachment.name.as_deref(), path = %dest.as_ref().display())
    )]
    pub async fn download_attachment(
        &self,
        attachment: &AttachmentRef,
        dest: impl AsRef<Path>,
    ) -> DownloadOutcome {
        let dest = dest.as_ref();

        let Some((url, name)) = attachment.download_target() else {
            error!(?attachment, "Attachment has no url or name, not downloading");
            return DownloadOutcome::InvalidInput;
        };

        let Some(token) = self.fetch_access_token().await else {
            error!(url, "No access token, download abandoned");
            return DownloadOutcome::AuthFailed;
        };

        info!(name, "Downloading attachment");
        debug!(url, "Download URL");

        match self.write_attachment(url, &token, dest).await {
            Ok(outcome) => outcome,
            Err(e) => {
                error!(error = %e, "Attachment download failed");
                DownloadOutcome::Failed {
                    message: e.to_string(),
                }
            }
        }
    }

    /// Download every attachment listed in an attachment field value.
    ///
    /// Files are named `{prefix}_{index}_{name}` inside `directory`, with a
    /// 1-based index over the field's items and `attachment` as the prefix
    /// when none is given. Items that are not mappings are skipped. After
    /// each success the task sleeps for
    /// [`ClientConfig::download_pause`](crate::ClientConfig).
    ///
    /// Returns the paths of the successful downloads, in order.
    #[instrument(
        parent = &self.inner.span,
        skip(self, field_value, directory),
        fields(directory = %directory.as_ref().display())
    )]
    pub async fn download_attachments(
        &self,
        field_value: Option<&Value>,
        directory: impl AsRef<Path>,
        prefix: Option<&str>,
    ) -> Vec<PathBuf> {
        let mut downloaded = Vec::new();

        let Some(items) = field_value.and_then(Value::as_array) else {
            warn!(
                kind = json_kind(field_value),
                "Attachment field is absent or not a list"
            );
            return downloaded;
        };

        info!(count = items.len(), "Processing attachment field");

        let directory = directory.as_ref();
        let prefix = prefix.filter(|p| !p.is_empty()).unwrap_or("attachment");

        for (i, item) in items.iter().enumerate() {
            let Some(attachment) = AttachmentRef::from_value(item) else {
                continue;
            };

            let index = i + 1;
            let name = attachment
                .name
                .as_deref()
                .map(file_name_safe)
                .unwrap_or_else(|| format!("file_{}", index));
            let path = directory.join(format!("{}_{}_{}", prefix, index, name));

            if let DownloadOutcome::Success { path, .. } =
                self.download_attachment(&attachment, &path).await
            {
                downloaded.push(path);
                tokio::time::sleep(self.inner.config.download_pause).await;
            }
        }

        downloaded
    }

    async fn write_attachment(
        &self,
        url: &str,
        token: &AccessToken,
        dest: &Path,
    ) -> Result<DownloadOutcome> {
        let response = self
            .inner
            .http
            .inner()
            .get(url)
            .header(AUTHORIZATION, token.bearer())
            .send()
            .await?;

        let status = response.status();
        if status != StatusCode::OK {
            let body = body_excerpt(response).await;
            error!(status = status.as_u16(), body = %body, "Attachment request failed");
            return Ok(DownloadOutcome::HttpError {
                status: status.as_u16(),
            });
        }

        if let Some(parent) = dest.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }

        let file = File::create(dest).await?;
        let mut writer = BufWriter::with_capacity(WRITE_BUFFER_SIZE, file);
        let mut body = response.bytes_stream();
        while let Some(chunk) = body.next().await {
            writer.write_all(&chunk?).await?;
        }
        writer.flush().await?;

        let size = tokio::fs::metadata(dest).await?.len();
        if size < self.inner.config.min_attachment_bytes {
            warn!(size, "Downloaded file is too small, download probably failed");
            return Ok(DownloadOutcome::IntegrityFailed { size });
        }

        info!(size, path = %dest.display(), "Attachment downloaded");
        Ok(DownloadOutcome::Success {
            path: dest.to_path_buf(),
            size,
        })
    }
}

/// Keep a provider file name from escaping the target directory.
fn file_name_safe(name: &str) -> String {
    name.replace(['/', '\\'], "_")
}

fn json_kind(value: Option<&Value>) -> &'static str {
    match value {
        None => "absent",
        Some(Value::Null) => "null",
        Some(Value::Bool(_)) => "bool",
        Some(Value::Number(_)) => "number",
        Some(Value::String(_)) => "string",
        Some(Value::Array(_)) => "list",
        Some(Value::Object(_)) => "mapping",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn separators_are_replaced() {
        assert_eq!(file_name_safe("../etc/passwd"), ".._etc_passwd");
        assert_eq!(file_name_safe("a\\b.png"), "a_b.png");
        assert_eq!(file_name_safe("plain.pdf"), "plain.pdf");
    }

    #[test]
    fn outcome_accessors() {
        let ok = DownloadOutcome::Success {
            path: PathBuf::from("/tmp/a.png"),
            size: 512,
        };
        assert!(ok.is_success());
        assert_eq!(ok.path(), Some(Path::new("/tmp/a.png")));

        let failed = DownloadOutcome::IntegrityFailed { size: 12 };
        assert!(!failed.is_success());
        assert_eq!(failed.path(), None);
    }

    #[test]
    fn kinds() {
        assert_eq!(json_kind(None), "absent");
        assert_eq!(json_kind(Some(&json!({"url": "x"}))), "mapping");
        assert_eq!(json_kind(Some(&json!("x"))), "string");
    }
}
