//! Provider base URL type.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use url::Url;

use crate::error::{Error, ValidationError};

/// Default provider endpoint (Feishu, mainland China).
pub const FEISHU_BASE_URL: &str = "https://open.feishu.cn";

/// Provider endpoint for the international Lark tenant.
pub const LARK_BASE_URL: &str = "https://open.larksuite.com";

/// A validated provider base URL.
///
/// The URL must be absolute and use HTTPS (HTTP is allowed only for
/// localhost, which is what the test servers bind to).
///
/// # Example
///
/// ```
/// use bitable_core::BaseUrl;
///
/// let base = BaseUrl::new("https://open.feishu.cn").unwrap();
/// assert_eq!(base.api_url("bitable/v1/apps/app1/tables"),
///            "https://open.feishu.cn/open-apis/bitable/v1/apps/app1/tables");
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct BaseUrl(Url);

impl BaseUrl {
    /// Create a new base URL from a string, validating the format.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is not valid or doesn't meet requirements.
    pub fn new(s: impl AsRef<str>) -> Result<Self, Error> {
        let s = s.as_ref();
        let url = Url::parse(s).map_err(|e| ValidationError::BaseUrl {
            value: s.to_string(),
            reason: e.to_string(),
        })?;

        Self::validate(&url, s)?;

        Ok(Self(url))
    }

    /// Returns the Open API URL for a path relative to `/open-apis/`.
    pub fn api_url(&self, path: &str) -> String {
        let base = self.0.as_str().trim_end_matches('/');
        format!("{}/open-apis/{}", base, path.trim_start_matches('/'))
    }

    /// Returns the base URL as a string.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Returns the host string.
    pub fn host(&self) -> Option<&str> {
        self.0.host_str()
    }

    fn validate(url: &Url, original: &str) -> Result<(), Error> {
        if url.cannot_be_a_base() {
            return Err(ValidationError::BaseUrl {
                value: original.to_string(),
                reason: "must be an absolute URL".to_string(),
            }
            .into());
        }

        let scheme = url.scheme();
        let is_localhost = url
            .host_str()
            .is_some_and(|h| h == "localhost" || h == "127.0.0.1" || h == "[::1]");

        if scheme != "https" && !(scheme == "http" && is_localhost) {
            return Err(ValidationError::BaseUrl {
                value: original.to_string(),
                reason: "must use HTTPS (HTTP allowed only for localhost)".to_string(),
            }
            .into());
        }

        if url.host_str().is_none() {
            return Err(ValidationError::BaseUrl {
                value: original.to_string(),
                reason: "must have a host".to_string(),
            }
            .into());
        }

        Ok(())
    }
}

impl Default for BaseUrl {
    fn default() -> Self {
        Self(Url::parse(FEISHU_BASE_URL).expect("default base URL is valid"))
    }
}

impl fmt::Display for BaseUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for BaseUrl {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl Serialize for BaseUrl {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.0.as_str())
    }
}

impl<'de> Deserialize<'de> for BaseUrl {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        BaseUrl::new(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_https_url() {
        let base = BaseUrl::new(LARK_BASE_URL).unwrap();
        assert_eq!(base.host(), Some("open.larksuite.com"));
    }

    #[test]
    fn valid_localhost_http() {
        let base = BaseUrl::new("http://127.0.0.1:8080").unwrap();
        assert_eq!(base.host(), Some("127.0.0.1"));
    }

    #[test]
    fn default_is_feishu() {
        assert_eq!(BaseUrl::default().host(), Some("open.feishu.cn"));
    }

    #[test]
    fn api_url_handles_slashes() {
        let base = BaseUrl::new("https://open.feishu.cn/").unwrap();
        assert_eq!(
            base.api_url("/auth/v3/tenant_access_token/internal"),
            "https://open.feishu.cn/open-apis/auth/v3/tenant_access_token/internal"
        );
    }

    #[test]
    fn invalid_http_non_localhost() {
        assert!(BaseUrl::new("http://open.feishu.cn").is_err());
    }

    #[test]
    fn invalid_relative_url() {
        assert!(BaseUrl::new("/open-apis").is_err());
    }
}
