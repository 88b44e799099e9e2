//! Wire types for remote page documents.
//!
//! The store keys each document by its stringified 1-based page number.
//! Optional fields are tolerated here and filled in by `into_page`.

use serde::{Deserialize, Serialize};

use crate::core::model::{Ayah, Page};
use crate::store::provider::StoreError;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AyahDocument {
    #[serde(default)]
    pub ayah_number: Option<u32>,
    #[serde(default)]
    pub arabic: String,
    #[serde(default)]
    pub english: String,
    #[serde(default)]
    pub transliteration: String,
    #[serde(default)]
    pub audio_url: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PageDocument {
    pub page_number: u32,
    #[serde(default)]
    pub juz: Option<u32>,
    #[serde(default)]
    pub surah_number: Option<u32>,
    #[serde(default)]
    pub surah_name: String,
    #[serde(default)]
    pub ayat: Vec<AyahDocument>,
}

/// `GET /meta` response body.
#[derive(Serialize, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct MetaDocument {
    pub page_count: u32,
}

/// `POST /pages:batchWrite` request body.
#[derive(Serialize, Debug)]
pub struct BatchWrite<'a> {
    pub pages: &'a [PageDocument],
}

impl PageDocument {
    /// Converts the wire document into a `Page`, rejecting pages with no ayat.
    pub fn into_page(self) -> Result<Page, StoreError> {
        if self.ayat.is_empty() {
            return Err(StoreError::Parse(format!(
                "page {} has no ayat",
                self.page_number
            )));
        }
        let ayat = self
            .ayat
            .into_iter()
            .enumerate()
            .map(|(i, a)| Ayah {
                ayah_number: a.ayah_number.unwrap_or(i as u32 + 1),
                arabic: a.arabic,
                english: a.english,
                transliteration: a.transliteration,
                audio_url: a.audio_url,
                tags: a.tags,
            })
            .collect();
        Ok(Page {
            page_number: self.page_number,
            surah_number: self.surah_number,
            surah_name: self.surah_name,
            juz: self.juz,
            ayat,
        })
    }
}

impl From<&Page> for PageDocument {
    fn from(page: &Page) -> Self {
        PageDocument {
            page_number: page.page_number,
            juz: page.juz,
            surah_number: page.surah_number,
            surah_name: page.surah_name.clone(),
            ayat: page
                .ayat
                .iter()
                .map(|a| AyahDocument {
                    ayah_number: Some(a.ayah_number),
                    arabic: a.arabic.clone(),
                    english: a.english.clone(),
                    transliteration: a.transliteration.clone(),
                    audio_url: a.audio_url.clone(),
                    tags: a.tags.clone(),
                })
                .collect(),
        }
    }
}
