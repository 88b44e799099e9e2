//! HTTP page store.
//!
//! Talks to a small document service:
//! - `GET  {base}/pages/{n}`          page document, 404 when the page does not exist
//! - `GET  {base}/meta`               `{ "pageCount": n }`
//! - `POST {base}/pages:batchWrite`   `{ "pages": [...] }` (importer only)

use std::time::Duration;

use async_trait::async_trait;
use log::{debug, info, warn};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;

use crate::core::model::Page;
use crate::store::document::{BatchWrite, MetaDocument, PageDocument};
use crate::store::{PageSink, PageStore, StoreError};

pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

pub struct HttpPageStore {
    base_url: String,
    api_key: Option<String>,
    client: reqwest::Client,
}

impl HttpPageStore {
    pub fn new(
        base_url: String,
        api_key: Option<String>,
        timeout: Duration,
    ) -> Result<Self, StoreError> {
        let base_url = base_url.trim_end_matches('/').to_string();
        if base_url.is_empty() {
            return Err(StoreError::Config("base URL is empty".to_string()));
        }
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| StoreError::Config(e.to_string()))?;

        Ok(Self {
            base_url,
            api_key,
            client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn get(&self, url: String) -> reqwest::RequestBuilder {
        let request = self.client.get(url);
        match &self.api_key {
            Some(key) => request.bearer_auth(key),
            None => request,
        }
    }

    /// Sends a GET and decodes the body. `Ok(None)` on 404.
    async fn get_json<T: DeserializeOwned>(&self, url: String) -> Result<Option<T>, StoreError> {
        debug!("GET {}", url);
        let response = self
            .get(url)
            .send()
            .await
            .map_err(|e| StoreError::Network(e.to_string()))?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            warn!("Page store error: {} - {}", status, message);
            return Err(StoreError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| StoreError::Network(e.to_string()))?;
        serde_json::from_str(&body)
            .map(Some)
            .map_err(|e| StoreError::Parse(e.to_string()))
    }
}

#[async_trait]
impl PageStore for HttpPageStore {
    fn name(&self) -> &str {
        "remote"
    }

    async fn fetch_page(&self, page_number: u32) -> Result<Option<Page>, StoreError> {
        let url = format!("{}/pages/{}", self.base_url, page_number);
        match self.get_json::<PageDocument>(url).await? {
            Some(doc) => {
                if doc.page_number != page_number {
                    warn!(
                        "Requested page {} but store returned page {}",
                        page_number, doc.page_number
                    );
                    return Err(StoreError::Parse(format!(
                        "requested page {} but got page {}",
                        page_number, doc.page_number
                    )));
                }
                let page = doc.into_page()?;
                debug!("Fetched page {} ({} ayat)", page_number, page.ayah_count());
                Ok(Some(page))
            }
            None => {
                info!("Page {} not found in store", page_number);
                Ok(None)
            }
        }
    }

    async fn fetch_page_count(&self) -> Result<u32, StoreError> {
        let url = format!("{}/meta", self.base_url);
        match self.get_json::<MetaDocument>(url).await? {
            Some(meta) if meta.page_count > 0 => Ok(meta.page_count),
            Some(_) => Err(StoreError::Parse("page count must be positive".to_string())),
            None => Err(StoreError::Api {
                status: 404,
                message: "no meta document".to_string(),
            }),
        }
    }
}

#[async_trait]
impl PageSink for HttpPageStore {
    async fn write_batch(&self, pages: &[PageDocument]) -> Result<(), StoreError> {
        let url = format!("{}/pages:batchWrite", self.base_url);
        info!("Writing batch of {} pages to {}", pages.len(), url);

        let mut request = self.client.post(url).json(&BatchWrite { pages });
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }
        let response = request
            .send()
            .await
            .map_err(|e| StoreError::Network(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            warn!("Batch write failed: {} - {}", status, message);
            return Err(StoreError::Api { status, message });
        }
        Ok(())
    }
}
