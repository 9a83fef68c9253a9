//! Single-page listings, fetch-until-exhausted aggregation and record streams.
//!
//! Every listing endpoint is cursor-paginated: a page says whether more
//! follow and carries an opaque token for the next one. Aggregations start
//! without a token and forward each returned token verbatim, exactly once,
//! until the provider reports `has_more == false`.

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use futures_util::Stream;
use tracing::{debug, instrument, warn};

use bitable_core::error::ProtocolError;
use bitable_core::{BitableApi, Error, Field, Page, Record, Result, SearchRecordsQuery, Table};

use crate::client::TableClient;

impl<A: BitableApi> TableClient<A> {
    /// Fetch one page of records matching `query`.
    ///
    /// `filter` and `sort` are forwarded to the provider unmodified.
    #[instrument(parent = &self.inner.span, skip(self, query), fields(page_token = ?query.page_token))]
    pub async fn search_records(
        &self,
        app_token: &str,
        table_id: &str,
        query: &SearchRecordsQuery,
    ) -> Result<Page<Record>> {
        debug!(page_size = query.page_size, "Searching records");
        let response = self
            .inner
            .api
            .search_records(app_token, table_id, query)
            .await?;
        self.expect_success(response, "search records")
    }

    /// Fetch every record matching `query`, in provider order.
    ///
    /// The query's own `page_size` and `page_token` are ignored: pages of
    /// [`ClientConfig::record_page_size`](crate::ClientConfig) are requested
    /// starting from the first.
    ///
    /// # Errors
    ///
    /// Fails on the first failing page, or with
    /// [`Error::PaginationLimit`] once `max_pages` pages have been read
    /// while the provider still reports more.
    #[instrument(parent = &self.inner.span, skip(self, query))]
    pub async fn get_all_records(
        &self,
        app_token: &str,
        table_id: &str,
        query: &SearchRecordsQuery,
    ) -> Result<Vec<Record>> {
        let page_size = self.inner.config.record_page_size;
        let records = collect_all(self.inner.config.max_pages, |page_token| {
            let query = page_query(query, page_size, page_token.as_deref());
            async move { self.search_records(app_token, table_id, &query).await }
        })
        .await?;

        debug!(count = records.len(), "Fetched all records");
        Ok(records)
    }

    /// Stream every record matching `query`, one page at a time.
    ///
    /// Pages are only requested as the stream is polled. The stream ends
    /// after the first error.
    pub fn record_stream(
        &self,
        app_token: impl Into<String>,
        table_id: impl Into<String>,
        query: SearchRecordsQuery,
    ) -> RecordStream
    where
        A: 'static,
    {
        let client = self.clone();
        let app_token = app_token.into();
        let table_id = table_id.into();
        debug!(parent: &self.inner.span, %app_token, %table_id, "Opening record stream");

        let stream = async_stream::stream! {
            let page_size = client.inner.config.record_page_size;
            let max_pages = client.inner.config.max_pages;
            let mut page_token: Option<String> = None;
            let mut pages = 0u32;

            loop {
                if let Some(max_pages) = max_pages.filter(|max| pages >= *max) {
                    warn!(max_pages, "Record stream reached page cap");
                    yield Err(Error::PaginationLimit { max_pages });
                    break;
                }

                let paged = page_query(&query, page_size, page_token.as_deref());
                let page = match client.search_records(&app_token, &table_id, &paged).await {
                    Ok(page) => page,
                    Err(e) => {
                        yield Err(e);
                        break;
                    }
                };
                pages += 1;

                let next = match next_token(&page) {
                    Ok(next) => next,
                    Err(e) => {
                        yield Err(e);
                        break;
                    }
                };

                for record in page.items {
                    yield Ok(record);
                }

                match next {
                    Some(token) => page_token = Some(token),
                    None => break,
                }
            }
        };

        RecordStream::new(stream)
    }

    /// Fetch one page of the tables in a base.
    #[instrument(parent = &self.inner.span, skip(self))]
    pub async fn list_tables(
        &self,
        app_token: &str,
        page_size: u32,
        page_token: Option<&str>,
    ) -> Result<Page<Table>> {
        debug!("Listing tables");
        let response = self
            .inner
            .api
            .list_tables(app_token, page_size, page_token)
            .await?;
        self.expect_success(response, "list tables")
    }

    /// Fetch every table in a base.
    #[instrument(parent = &self.inner.span, skip(self))]
    pub async fn get_all_tables(&self, app_token: &str) -> Result<Vec<Table>> {
        let page_size = self.inner.config.list_page_size;
        collect_all(self.inner.config.max_pages, |page_token| async move {
            self.list_tables(app_token, page_size, page_token.as_deref())
                .await
        })
        .await
    }

    /// Fetch one page of the fields of a table, optionally restricted to a view.
    #[instrument(parent = &self.inner.span, skip(self))]
    pub async fn list_fields(
        &self,
        app_token: &str,
        table_id: &str,
        view_id: Option<&str>,
        page_size: u32,
        page_token: Option<&str>,
    ) -> Result<Page<Field>> {
        debug!("Listing fields");
        let response = self
            .inner
            .api
            .list_fields(app_token, table_id, view_id, page_size, page_token)
            .await?;
        self.expect_success(response, "list fields")
    }

    /// Fetch every field of a table, optionally restricted to a view.
    #[instrument(parent = &self.inner.span, skip(self))]
    pub async fn get_all_fields(
        &self,
        app_token: &str,
        table_id: &str,
        view_id: Option<&str>,
    ) -> Result<Vec<Field>> {
        let page_size = self.inner.config.list_page_size;
        collect_all(self.inner.config.max_pages, |page_token| async move {
            self.list_fields(app_token, table_id, view_id, page_size, page_token.as_deref())
                .await
        })
        .await
    }
}

/// Request pages with `fetch` until the provider reports no more, and
/// concatenate their items in order.
async fn collect_all<T, F, Fut>(max_pages: Option<u32>, mut fetch: F) -> Result<Vec<T>>
where
    F: FnMut(Option<String>) -> Fut,
    Fut: Future<Output = Result<Page<T>>>,
{
    let mut items = Vec::new();
    let mut page_token: Option<String> = None;
    let mut pages = 0u32;

    loop {
        if let Some(max_pages) = max_pages.filter(|max| pages >= *max) {
            warn!(max_pages, fetched = items.len(), "Pagination reached page cap");
            return Err(Error::PaginationLimit { max_pages });
        }

        let page = fetch(page_token.take()).await?;
        pages += 1;

        let next = next_token(&page)?;
        items.extend(page.items);

        match next {
            Some(token) => page_token = Some(token),
            None => return Ok(items),
        }
    }
}

/// The token to continue with, or `None` on the last page.
fn next_token<T>(page: &Page<T>) -> Result<Option<String>> {
    if !page.has_more {
        return Ok(None);
    }

    page.next_page_token()
        .map(|token| Some(token.to_string()))
        .ok_or_else(|| {
            ProtocolError::new(None, "page reports has_more but carries no page_token").into()
        })
}

fn page_query(
    query: &SearchRecordsQuery,
    page_size: u32,
    page_token: Option<&str>,
) -> SearchRecordsQuery {
    SearchRecordsQuery {
        page_size,
        page_token: page_token.map(str::to_string),
        ..query.clone()
    }
}

/// A lazily paginated stream of records.
///
/// Returned by [`TableClient::record_stream`].
pub struct RecordStream {
    inner: Pin<Box<dyn Stream<Item = Result<Record>> + Send>>,
}

impl RecordStream {
    fn new<S>(stream: S) -> Self
    where
        S: Stream<Item = Result<Record>> + Send + 'static,
    {
        Self {
            inner: Box::pin(stream),
        }
    }
}

impl Stream for RecordStream {
    type Item = Result<Record>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.inner.as_mut().poll_next(cx)
    }
}

impl std::fmt::Debug for RecordStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecordStream").finish_non_exhaustive()
    }
}
