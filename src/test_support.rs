//! Test utilities shared across the crate.
//!
//! This module is only compiled during tests (`#[cfg(test)]`).

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::core::model::{Ayah, Page};
use crate::core::navigation::{NavOptions, NavigationState};
use crate::core::persist::{MemoryStore, SessionPersistence};
use crate::store::{PageStore, StoreError};

/// A page numbered `number` holding `ayat` generated verses.
pub fn page(number: u32, ayat: usize) -> Page {
    Page {
        page_number: number,
        surah_number: Some(1),
        surah_name: "Test".to_string(),
        juz: Some(1),
        ayat: (0..ayat)
            .map(|i| Ayah {
                ayah_number: i as u32 + 1,
                arabic: format!("arabic {number}:{i}"),
                english: format!("english {number}:{i}"),
                transliteration: format!("translit {number}:{i}"),
                audio_url: String::new(),
                tags: Vec::new(),
            })
            .collect(),
    }
}

/// An in-memory store whose failures can be scripted per page.
pub struct ScriptedStore {
    pages: Vec<Page>,
    page_count: Option<u32>,
    failing: Mutex<HashSet<u32>>,
    fetches: Mutex<Vec<u32>>,
}

impl ScriptedStore {
    /// `page_count: None` makes `fetch_page_count` fail with a network error.
    pub fn new(pages: Vec<Page>, page_count: Option<u32>) -> Self {
        Self {
            pages,
            page_count,
            failing: Mutex::new(HashSet::new()),
            fetches: Mutex::new(Vec::new()),
        }
    }

    /// Two pages with two ayat each.
    pub fn two_pages() -> Self {
        Self::new(vec![page(1, 2), page(2, 2)], Some(2))
    }

    pub fn fail_page(&self, page_number: u32, fail: bool) {
        let mut failing = self.failing.lock().unwrap();
        if fail {
            failing.insert(page_number);
        } else {
            failing.remove(&page_number);
        }
    }

    /// Page numbers requested so far, in order.
    pub fn fetches(&self) -> Vec<u32> {
        self.fetches.lock().unwrap().clone()
    }
}

#[async_trait]
impl PageStore for ScriptedStore {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn fetch_page(&self, page_number: u32) -> Result<Option<Page>, StoreError> {
        self.fetches.lock().unwrap().push(page_number);
        if self.failing.lock().unwrap().contains(&page_number) {
            return Err(StoreError::Network("connection refused".to_string()));
        }
        Ok(self
            .pages
            .iter()
            .find(|p| p.page_number == page_number)
            .cloned())
    }

    async fn fetch_page_count(&self) -> Result<u32, StoreError> {
        self.page_count
            .ok_or_else(|| StoreError::Network("connection refused".to_string()))
    }
}

/// Opens a navigation state over `store`, persisting into `memory`.
pub async fn open_nav(store: Arc<ScriptedStore>, memory: &MemoryStore) -> NavigationState {
    open_nav_with(store, memory, NavOptions::default()).await
}

pub async fn open_nav_with(
    store: Arc<dyn PageStore>,
    memory: &MemoryStore,
    options: NavOptions,
) -> NavigationState {
    let persistence = SessionPersistence::new(Box::new(memory.clone()));
    NavigationState::open(store, persistence, options)
        .await
        .expect("navigation state opens")
}
