use std::fmt;

use async_trait::async_trait;

use crate::core::model::Page;
use crate::store::document::PageDocument;

/// Errors that can occur while talking to a page store.
/// `fetch_page` reports a missing page as `Ok(None)`, never as an error.
#[derive(Debug, Clone, PartialEq)]
pub enum StoreError {
    /// Store misconfigured (missing base URL, bad client settings). Not retryable.
    Config(String),
    /// Network-level failure (timeout, DNS, connection refused). Retryable.
    Network(String),
    /// Store returned an error response. Retryable if status >= 500 or 429.
    Api { status: u16, message: String },
    /// The store answered with a document we cannot use. Not retryable.
    Parse(String),
}

impl StoreError {
    pub fn is_retryable(&self) -> bool {
        match self {
            StoreError::Network(_) => true,
            StoreError::Api { status, .. } => *status >= 500 || *status == 429,
            StoreError::Config(_) | StoreError::Parse(_) => false,
        }
    }
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::Config(msg) => write!(f, "config error: {msg}"),
            StoreError::Network(msg) => write!(f, "network error: {msg}"),
            StoreError::Api { status, message } => {
                write!(f, "store error (HTTP {status}): {message}")
            }
            StoreError::Parse(msg) => write!(f, "parse error: {msg}"),
        }
    }
}

impl std::error::Error for StoreError {}

/// Read side of the remote page source.
#[async_trait]
pub trait PageStore: Send + Sync {
    /// Returns the name of the store.
    fn name(&self) -> &str;

    /// Loads one page by its 1-based number. `Ok(None)` means the page does not exist.
    async fn fetch_page(&self, page_number: u32) -> Result<Option<Page>, StoreError>;

    /// Total number of pages the store serves.
    async fn fetch_page_count(&self) -> Result<u32, StoreError>;

    /// Ayah counts for every page, in page order, when the store holds the whole corpus.
    async fn ayah_counts(&self) -> Result<Option<Vec<usize>>, StoreError> {
        Ok(None)
    }
}

/// Write side of the store, used by the bulk importer.
#[async_trait]
pub trait PageSink: Send + Sync {
    /// Writes one batch of pages. A batch either lands entirely or fails.
    async fn write_batch(&self, pages: &[PageDocument]) -> Result<(), StoreError>;
}
