//! The table client and its builder.

use std::sync::Arc;

use tracing::{Span, error};

use bitable_core::error::ProtocolError;
use bitable_core::{ApiResponse, BitableApi, Credentials, Result};
use bitable_http::{HttpBitableApi, HttpClient};

use crate::config::ClientConfig;

/// Client for records, schema metadata and attachments of Bitable tables.
///
/// All remote calls go through a [`BitableApi`]; by default that is the
/// REST-backed [`HttpBitableApi`]. Attachment downloads and token fetches
/// use the HTTP transport directly.
///
/// Cheap to clone (internal `Arc`) and safe to share across tasks. Calls
/// are independent of each other; none keeps state between invocations.
///
/// # Example
///
/// ```no_run
/// use bitable::{Credentials, TableClient};
///
/// # async fn example() -> bitable::Result<()> {
/// let client = TableClient::new(Credentials::new("cli_a1b2c3", "app-secret"))?;
/// let records = client
///     .get_all_records("bascnAppToken", "tblTableId", &Default::default())
///     .await?;
/// println!("{} records", records.len());
/// # Ok(())
/// # }
/// ```
pub struct TableClient<A = HttpBitableApi> {
    pub(crate) inner: Arc<ClientInner<A>>,
}

pub(crate) struct ClientInner<A> {
    pub(crate) api: A,
    pub(crate) http: HttpClient,
    pub(crate) credentials: Credentials,
    pub(crate) config: ClientConfig,
    pub(crate) span: Span,
}

impl<A> Clone for TableClient<A> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<A> std::fmt::Debug for TableClient<A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TableClient")
            .field("base", &self.inner.http.base().as_str())
            .field("credentials", &self.inner.credentials)
            .finish_non_exhaustive()
    }
}

impl TableClient {
    /// Create a client with default configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP transport cannot be initialized.
    pub fn new(credentials: Credentials) -> Result<Self> {
        Self::builder(credentials).build()
    }

    /// Start building a client.
    pub fn builder(credentials: Credentials) -> TableClientBuilder {
        TableClientBuilder {
            credentials,
            config: ClientConfig::default(),
            span: None,
            source: DefaultApi,
        }
    }
}

impl<A> TableClient<A> {
    /// Returns the client configuration.
    pub fn config(&self) -> &ClientConfig {
        &self.inner.config
    }

    /// Returns the remote API collaborator.
    pub fn api(&self) -> &A {
        &self.inner.api
    }

    /// Returns the span that parents every operation span of this client.
    pub fn span(&self) -> &Span {
        &self.inner.span
    }

    /// Unwrap a provider response, turning `code != 0` into [`Error::Api`](bitable_core::Error::Api).
    ///
    /// The raw body of a failed response is logged pretty-printed before
    /// the error is returned.
    pub(crate) fn expect_success<T>(
        &self,
        response: ApiResponse<T>,
        operation: &'static str,
    ) -> Result<T> {
        self.ensure_success(&response, operation)?;
        response
            .data
            .ok_or_else(|| missing_payload(operation, "data").into())
    }

    /// Like [`expect_success`](Self::expect_success) for operations whose
    /// payload is optional.
    pub(crate) fn ensure_success<T>(
        &self,
        response: &ApiResponse<T>,
        operation: &'static str,
    ) -> Result<()> {
        if response.success() {
            return Ok(());
        }

        let err = response.to_error(operation);
        let body = serde_json::to_string_pretty(&response.raw)
            .unwrap_or_else(|_| response.raw.to_string());
        error!(
            code = err.code,
            log_id = err.log_id.as_deref().unwrap_or("-"),
            "{}",
            err
        );
        error!("{}", body);
        Err(err.into())
    }
}

pub(crate) fn missing_payload(operation: &str, member: &str) -> ProtocolError {
    ProtocolError::new(None, format!("{} response carried no {}", operation, member))
}

/// Where a [`TableClientBuilder`] gets its remote API from.
///
/// Implemented by [`DefaultApi`] and [`CustomApi`]; not meant to be
/// implemented elsewhere.
pub trait ApiSource {
    type Api: BitableApi;

    fn into_api(self, http: &HttpClient, credentials: &Credentials, config: &ClientConfig)
    -> Self::Api;
}

/// Builds the REST-backed [`HttpBitableApi`] from the client configuration.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultApi;

impl ApiSource for DefaultApi {
    type Api = HttpBitableApi;

    fn into_api(
        self,
        http: &HttpClient,
        credentials: &Credentials,
        config: &ClientConfig,
    ) -> HttpBitableApi {
        HttpBitableApi::with_user_id_type(
            http.clone(),
            credentials.clone(),
            config.user_id_type.clone(),
        )
    }
}

/// A caller-supplied remote API.
#[derive(Debug, Clone)]
pub struct CustomApi<A>(A);

impl<A: BitableApi> ApiSource for CustomApi<A> {
    type Api = A;

    fn into_api(self, _: &HttpClient, _: &Credentials, _: &ClientConfig) -> A {
        self.0
    }
}

/// Builder for [`TableClient`].
///
/// # Example
///
/// ```no_run
/// use bitable::{ClientConfig, Credentials, TableClient};
///
/// # fn example() -> bitable::Result<()> {
/// let client = TableClient::builder(Credentials::new("cli_a1b2c3", "app-secret"))
///     .config(ClientConfig::default().with_user_id_type("union_id"))
///     .span(tracing::info_span!("sync_job", job = "nightly"))
///     .build()?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct TableClientBuilder<S = DefaultApi> {
    credentials: Credentials,
    config: ClientConfig,
    span: Option<Span>,
    source: S,
}

impl<S: ApiSource> TableClientBuilder<S> {
    /// Set the client configuration.
    pub fn config(mut self, config: ClientConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the span every operation span is parented to.
    ///
    /// Defaults to the span current when [`build`](Self::build) is called.
    pub fn span(mut self, span: Span) -> Self {
        self.span = Some(span);
        self
    }

    /// Use the given remote API instead of the REST-backed default.
    pub fn api<B: BitableApi>(self, api: B) -> TableClientBuilder<CustomApi<B>> {
        TableClientBuilder {
            credentials: self.credentials,
            config: self.config,
            span: self.span,
            source: CustomApi(api),
        }
    }

    /// Build the client.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP transport cannot be initialized.
    pub fn build(self) -> Result<TableClient<S::Api>> {
        let http = HttpClient::new(
            self.config.base_url.clone(),
            &self.config.user_agent,
            self.config.timeout,
        )?;
        let api = self.source.into_api(&http, &self.credentials, &self.config);

        Ok(TableClient {
            inner: Arc::new(ClientInner {
                api,
                http,
                credentials: self.credentials,
                config: self.config,
                span: self.span.unwrap_or_else(Span::current),
            }),
        })
    }
}
