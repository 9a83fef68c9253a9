#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::json;

use bitable::response::{DeletedRecord, DeletedRecords, RecordData, RecordsData};
use bitable::{
    ApiResponse, BitableApi, ClientConfig, Credentials, Field, Fields, Page, Record, RecordUpdate,
    Result, SearchRecordsQuery, Table, TableClient,
};

pub const APP: &str = "bascnTestApp";
pub const TABLE: &str = "tblTest";

/// An in-memory remote API.
///
/// Listing calls pop scripted pages in order (an empty last page once the
/// script runs out). When a pool is set instead, records and tables are
/// served from it in slices of the requested page size, with the offset of
/// the next slice as page token. Single-record calls answer with `record_reply`, or a
/// success echoing the request when none is set. Every call is counted and
/// its arguments recorded.
#[derive(Default)]
pub struct FakeApi {
    pub calls: AtomicUsize,

    pub search_pages: Mutex<VecDeque<ApiResponse<Page<Record>>>>,
    pub record_pool: Option<Vec<Record>>,
    pub search_queries: Mutex<Vec<SearchRecordsQuery>>,

    pub table_pages: Mutex<VecDeque<ApiResponse<Page<Table>>>>,
    pub table_pool: Option<Vec<Table>>,
    pub table_requests: Mutex<Vec<(u32, Option<String>)>>,

    pub field_pages: Mutex<VecDeque<ApiResponse<Page<Field>>>>,
    pub field_requests: Mutex<Vec<(Option<String>, u32, Option<String>)>>,

    pub record_reply: Mutex<Option<ApiResponse<RecordData>>>,
    pub batch_updates: Mutex<Vec<Vec<RecordUpdate>>>,
    pub batch_deletes: Mutex<Vec<Vec<String>>>,
}

impl FakeApi {
    pub fn with_search_pages(pages: Vec<ApiResponse<Page<Record>>>) -> Self {
        Self {
            search_pages: Mutex::new(pages.into()),
            ..Self::default()
        }
    }

    pub fn with_record_pool(records: Vec<Record>) -> Self {
        Self {
            record_pool: Some(records),
            ..Self::default()
        }
    }

    pub fn with_table_pool(tables: Vec<Table>) -> Self {
        Self {
            table_pool: Some(tables),
            ..Self::default()
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn page_tokens(&self) -> Vec<Option<String>> {
        self.search_queries
            .lock()
            .unwrap()
            .iter()
            .map(|q| q.page_token.clone())
            .collect()
    }

    fn count(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }

    fn record_reply(&self, record_id: &str, fields: &Fields) -> ApiResponse<RecordData> {
        self.record_reply.lock().unwrap().clone().unwrap_or_else(|| {
            ApiResponse::ok(RecordData {
                record: Some(Record {
                    record_id: record_id.to_string(),
                    fields: fields.clone(),
                }),
            })
        })
    }
}

#[async_trait]
impl BitableApi for FakeApi {
    async fn search_records(
        &self,
        _app_token: &str,
        _table_id: &str,
        query: &SearchRecordsQuery,
    ) -> Result<ApiResponse<Page<Record>>> {
        self.count();
        self.search_queries.lock().unwrap().push(query.clone());
        if let Some(pool) = &self.record_pool {
            return Ok(slice(pool, query.page_size, query.page_token.as_deref()));
        }
        let page = self.search_pages.lock().unwrap().pop_front();
        Ok(page.unwrap_or_else(|| ApiResponse::ok(Page::default())))
    }

    async fn get_record(
        &self,
        _app_token: &str,
        _table_id: &str,
        record_id: &str,
    ) -> Result<ApiResponse<RecordData>> {
        self.count();
        Ok(self.record_reply(record_id, &Fields::new()))
    }

    async fn create_record(
        &self,
        _app_token: &str,
        _table_id: &str,
        fields: &Fields,
    ) -> Result<ApiResponse<RecordData>> {
        self.count();
        Ok(self.record_reply("recCreated", fields))
    }

    async fn update_record(
        &self,
        _app_token: &str,
        _table_id: &str,
        record_id: &str,
        fields: &Fields,
    ) -> Result<ApiResponse<RecordData>> {
        self.count();
        Ok(self.record_reply(record_id, fields))
    }

    async fn delete_record(
        &self,
        _app_token: &str,
        _table_id: &str,
        record_id: &str,
    ) -> Result<ApiResponse<DeletedRecord>> {
        self.count();
        Ok(ApiResponse::ok(DeletedRecord {
            deleted: true,
            record_id: record_id.to_string(),
        }))
    }

    async fn batch_create_records(
        &self,
        _app_token: &str,
        _table_id: &str,
        records: &[Fields],
    ) -> Result<ApiResponse<RecordsData>> {
        self.count();
        let records = records
            .iter()
            .enumerate()
            .map(|(i, fields)| Record {
                record_id: format!("recNew{}", i + 1),
                fields: fields.clone(),
            })
            .collect();
        Ok(ApiResponse::ok(RecordsData {
            records: Some(records),
        }))
    }

    async fn batch_update_records(
        &self,
        _app_token: &str,
        _table_id: &str,
        records: &[RecordUpdate],
    ) -> Result<ApiResponse<RecordsData>> {
        self.count();
        self.batch_updates.lock().unwrap().push(records.to_vec());
        let records = records
            .iter()
            .map(|u| Record {
                record_id: u.record_id.clone(),
                fields: u.fields.clone(),
            })
            .collect();
        Ok(ApiResponse::ok(RecordsData {
            records: Some(records),
        }))
    }

    async fn batch_delete_records(
        &self,
        _app_token: &str,
        _table_id: &str,
        record_ids: &[String],
    ) -> Result<ApiResponse<DeletedRecords>> {
        self.count();
        self.batch_deletes.lock().unwrap().push(record_ids.to_vec());
        let records = record_ids
            .iter()
            .map(|id| DeletedRecord {
                deleted: true,
                record_id: id.clone(),
            })
            .collect();
        Ok(ApiResponse::ok(DeletedRecords {
            records: Some(records),
        }))
    }

    async fn list_tables(
        &self,
        _app_token: &str,
        page_size: u32,
        page_token: Option<&str>,
    ) -> Result<ApiResponse<Page<Table>>> {
        self.count();
        self.table_requests
            .lock()
            .unwrap()
            .push((page_size, page_token.map(str::to_string)));
        if let Some(pool) = &self.table_pool {
            return Ok(slice(pool, page_size, page_token));
        }
        let page = self.table_pages.lock().unwrap().pop_front();
        Ok(page.unwrap_or_else(|| ApiResponse::ok(Page::default())))
    }

    async fn list_fields(
        &self,
        _app_token: &str,
        _table_id: &str,
        view_id: Option<&str>,
        page_size: u32,
        page_token: Option<&str>,
    ) -> Result<ApiResponse<Page<Field>>> {
        self.count();
        self.field_requests.lock().unwrap().push((
            view_id.map(str::to_string),
            page_size,
            page_token.map(str::to_string),
        ));
        let page = self.field_pages.lock().unwrap().pop_front();
        Ok(page.unwrap_or_else(|| ApiResponse::ok(Page::default())))
    }
}

/// The page of `pool` starting at the offset in `page_token`.
fn slice<T: Clone>(pool: &[T], page_size: u32, page_token: Option<&str>) -> ApiResponse<Page<T>> {
    let start = page_token
        .and_then(|t| t.parse::<usize>().ok())
        .unwrap_or(0)
        .min(pool.len());
    let end = (start + page_size as usize).min(pool.len());
    let has_more = end < pool.len();

    ApiResponse::ok(Page {
        items: pool[start..end].to_vec(),
        has_more,
        page_token: has_more.then(|| end.to_string()),
        total: Some(pool.len() as u64),
    })
}

/// A client over `api` that never pauses between downloads.
pub fn client(api: FakeApi) -> TableClient<FakeApi> {
    client_with_config(api, ClientConfig::default().with_download_pause(Duration::ZERO))
}

pub fn client_with_config(api: FakeApi, config: ClientConfig) -> TableClient<FakeApi> {
    TableClient::builder(Credentials::new("cli_test", "secret"))
        .config(config)
        .api(api)
        .build()
        .unwrap()
}

pub fn record(id: &str, title: &str) -> Record {
    let mut fields = Fields::new();
    fields.insert("Title".to_string(), json!(title));
    Record {
        record_id: id.to_string(),
        fields,
    }
}

pub fn page<T>(items: Vec<T>, has_more: bool, page_token: Option<&str>) -> ApiResponse<Page<T>> {
    ApiResponse::ok(Page {
        items,
        has_more,
        page_token: page_token.map(str::to_string),
        total: None,
    })
}
