//! Open API HTTP client implementation.

use std::time::Duration;

use reqwest::header::AUTHORIZATION;
use reqwest::{Method, RequestBuilder};
use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;
use tracing::{debug, instrument, trace};

use bitable_core::error::ProtocolError;
use bitable_core::{AccessToken, ApiResponse, BaseUrl, Result};

/// Response header carrying the provider's request log id.
pub const LOG_ID_HEADER: &str = "x-tt-logid";

/// Longest body excerpt, in characters, quoted in errors and logs.
pub const BODY_EXCERPT_LEN: usize = 256;

/// HTTP client for Open API requests.
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: reqwest::Client,
    base: BaseUrl,
}

impl HttpClient {
    /// Create a new client for the given provider base URL.
    pub fn new(base: BaseUrl, user_agent: &str, timeout: Option<Duration>) -> Result<Self> {
        let mut builder = reqwest::Client::builder().user_agent(user_agent);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
            base,
        })
    }

    /// Wrap an existing `reqwest` client.
    pub fn from_client(client: reqwest::Client, base: BaseUrl) -> Self {
        Self { client, base }
    }

    /// Returns the provider base URL this client is configured for.
    pub fn base(&self) -> &BaseUrl {
        &self.base
    }

    /// Returns the underlying `reqwest` client.
    pub fn inner(&self) -> &reqwest::Client {
        &self.client
    }

    /// Make an authenticated request without a body.
    #[instrument(skip(self, params, token), fields(base = %self.base))]
    pub async fn query<Q, R>(
        &self,
        method: Method,
        path: &str,
        params: &Q,
        token: &AccessToken,
    ) -> Result<ApiResponse<R>>
    where
        Q: Serialize + std::fmt::Debug,
        R: DeserializeOwned,
    {
        let url = self.base.api_url(path);
        debug!(%method, path, "Open API query");
        trace!(?params, "query parameters");

        let request = self.client.request(method, &url).query(params);
        self.send(request, token).await
    }

    /// Make an authenticated request with a JSON body.
    #[instrument(skip(self, params, body, token), fields(base = %self.base))]
    pub async fn procedure<Q, B, R>(
        &self,
        method: Method,
        path: &str,
        params: &Q,
        body: &B,
        token: &AccessToken,
    ) -> Result<ApiResponse<R>>
    where
        Q: Serialize + std::fmt::Debug,
        B: Serialize,
        R: DeserializeOwned,
    {
        let url = self.base.api_url(path);
        debug!(%method, path, "Open API procedure");
        trace!(?params, "query parameters");

        let request = self.client.request(method, &url).query(params).json(body);
        self.send(request, token).await
    }

    async fn send<R: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        token: &AccessToken,
    ) -> Result<ApiResponse<R>> {
        let response = request.header(AUTHORIZATION, token.bearer()).send().await?;
        handle_response(response).await
    }
}

/// Turn an HTTP response into the provider envelope.
///
/// Provider failures are reported with HTTP 4xx as well as 200, always with
/// a JSON `{code, msg}` body, so the status alone decides nothing. Only a
/// body that is not an envelope is an error here.
pub(crate) async fn handle_response<R: DeserializeOwned>(
    response: reqwest::Response,
) -> Result<ApiResponse<R>> {
    let status = response.status().as_u16();
    let header_log_id = response
        .headers()
        .get(LOG_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    trace!(status, log_id = ?header_log_id, "Open API response");

    let text = response.text().await?;
    let raw: Value = serde_json::from_str(&text).map_err(|_| {
        ProtocolError::new(
            Some(status),
            format!("response is not JSON: {}", excerpt(&text)),
        )
    })?;

    let code = raw.get("code").and_then(Value::as_i64).ok_or_else(|| {
        ProtocolError::new(
            Some(status),
            format!("response has no code: {}", excerpt(&text)),
        )
    })?;

    let msg = raw
        .get("msg")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();

    let log_id = header_log_id.or_else(|| {
        raw.pointer("/error/log_id")
            .and_then(Value::as_str)
            .map(str::to_string)
    });

    let data = match raw.get("data") {
        Some(data) if code == 0 && !data.is_null() => Some(R::deserialize(data).map_err(|e| {
            ProtocolError::new(Some(status), format!("undecodable data: {}", e))
        })?),
        _ => None,
    };

    Ok(ApiResponse {
        code,
        msg,
        log_id,
        data,
        raw,
    })
}

/// Read the start of `response`'s body as text, at most
/// [`BODY_EXCERPT_LEN`] characters.
///
/// Only the chunks needed for the excerpt are pulled off the wire.
pub async fn body_excerpt(mut response: reqwest::Response) -> String {
    let limit = BODY_EXCERPT_LEN * 4;
    let mut body = Vec::new();
    while body.len() < limit {
        match response.chunk().await {
            Ok(Some(chunk)) => body.extend_from_slice(&chunk),
            _ => break,
        }
    }
    body.truncate(limit);

    let text = String::from_utf8_lossy(&body);
    excerpt(&text).to_string()
}

fn excerpt(text: &str) -> &str {
    match text.char_indices().nth(BODY_EXCERPT_LEN) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_creation() {
        let base = BaseUrl::new("https://open.feishu.cn").unwrap();
        let client = HttpClient::new(base.clone(), "bitable-test", None).unwrap();
        assert_eq!(client.base().as_str(), base.as_str());
    }

    #[test]
    fn excerpt_truncates_on_char_boundary() {
        let long = "记".repeat(BODY_EXCERPT_LEN + 10);
        assert_eq!(excerpt(&long).chars().count(), BODY_EXCERPT_LEN);
        assert_eq!(excerpt("short"), "short");
    }
}
