//! # Bulk Import
//!
//! Loads page documents from JSON files and writes them to a [`PageSink`]
//! in batches.
//!
//! ```text
//! file.json ──► load_pages ──► normalize_page ──► seed_pages ──► PageSink
//!  (object or     (Vec<Value>)   (skip invalid)     (400 per batch)
//!   array)
//! ```
//!
//! Normalization is deliberately forgiving: a page only needs a positive
//! `pageNumber` and an `ayat` array. Everything else is defaulted.

use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use log::{info, warn};
use serde_json::Value;

use crate::store::{AyahDocument, PageDocument, PageSink, StoreError};

/// Pages per `write_batch` call.
pub const BATCH_SIZE: usize = 400;

#[derive(Debug)]
pub enum ImportError {
    Read { path: PathBuf, source: io::Error },
    Json { path: PathBuf, source: serde_json::Error },
    Store(StoreError),
}

impl fmt::Display for ImportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImportError::Read { path, source } => {
                write!(f, "failed to read {}: {}", path.display(), source)
            }
            ImportError::Json { path, source } => {
                write!(f, "invalid JSON in {}: {}", path.display(), source)
            }
            ImportError::Store(e) => write!(f, "batch write failed: {e}"),
        }
    }
}

impl std::error::Error for ImportError {}

impl From<StoreError> for ImportError {
    fn from(e: StoreError) -> Self {
        ImportError::Store(e)
    }
}

/// Counts for one `seed_pages` run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SeedStats {
    /// Pages found in the input, valid or not.
    pub processed: usize,
    pub written: usize,
    pub skipped: usize,
    pub batches: usize,
}

impl SeedStats {
    fn add(&mut self, other: SeedStats) {
        self.processed += other.processed;
        self.written += other.written;
        self.skipped += other.skipped;
        self.batches += other.batches;
    }
}

// ============================================================================
// Loading & Normalization
// ============================================================================

/// Reads a file holding either one page object or an array of them.
pub fn load_pages(path: &Path) -> Result<Vec<Value>, ImportError> {
    let raw = fs::read_to_string(path).map_err(|source| ImportError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let value: Value = serde_json::from_str(&raw).map_err(|source| ImportError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(match value {
        Value::Array(pages) => pages,
        single => vec![single],
    })
}

fn string_field(value: &Value, key: &str) -> String {
    value
        .get(key)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

fn number_field(value: &Value, key: &str) -> Option<u32> {
    value
        .get(key)
        .and_then(Value::as_u64)
        .and_then(|n| u32::try_from(n).ok())
}

fn normalize_ayah(index: usize, value: &Value) -> AyahDocument {
    let tags = match value.get("tags") {
        Some(Value::Array(tags)) => tags
            .iter()
            .filter_map(Value::as_str)
            .map(str::to_string)
            .collect(),
        _ => Vec::new(),
    };
    AyahDocument {
        ayah_number: Some(number_field(value, "ayahNumber").unwrap_or(index as u32 + 1)),
        arabic: string_field(value, "arabic"),
        english: string_field(value, "english"),
        transliteration: string_field(value, "transliteration"),
        audio_url: string_field(value, "audioUrl"),
        tags,
    }
}

/// Returns `None` when the page has no positive `pageNumber` or no `ayat` array.
pub fn normalize_page(value: &Value) -> Option<PageDocument> {
    let page_number = number_field(value, "pageNumber").filter(|n| *n > 0)?;
    let ayat = value.get("ayat")?.as_array()?;
    Some(PageDocument {
        page_number,
        juz: number_field(value, "juz"),
        surah_number: number_field(value, "surahNumber"),
        surah_name: string_field(value, "surahName"),
        ayat: ayat
            .iter()
            .enumerate()
            .map(|(i, a)| normalize_ayah(i, a))
            .collect(),
    })
}

// ============================================================================
// Seeding
// ============================================================================

/// Normalizes `pages` and writes the valid ones in batches of [`BATCH_SIZE`].
pub async fn seed_pages(sink: &dyn PageSink, pages: &[Value]) -> Result<SeedStats, ImportError> {
    let mut stats = SeedStats {
        processed: pages.len(),
        ..Default::default()
    };
    let mut batch = Vec::with_capacity(BATCH_SIZE);

    for value in pages {
        let Some(doc) = normalize_page(value) else {
            warn!(
                "Skipping invalid page: {}",
                value.get("pageNumber").unwrap_or(&Value::Null)
            );
            stats.skipped += 1;
            continue;
        };
        batch.push(doc);
        if batch.len() == BATCH_SIZE {
            sink.write_batch(&batch).await?;
            stats.written += batch.len();
            stats.batches += 1;
            info!("Committed {} pages so far", stats.written);
            batch.clear();
        }
    }

    if !batch.is_empty() {
        sink.write_batch(&batch).await?;
        stats.written += batch.len();
        stats.batches += 1;
        info!("Committed final batch, {} pages written", stats.written);
    }
    Ok(stats)
}

/// Imports every file in order, stopping at the first failure.
pub async fn seed_files(sink: &dyn PageSink, paths: &[PathBuf]) -> Result<SeedStats, ImportError> {
    let mut total = SeedStats::default();
    for path in paths {
        info!("Loading file: {}", path.display());
        let pages = load_pages(path)?;
        let stats = seed_pages(sink, &pages).await?;
        info!(
            "{}: {} pages, {} written, {} skipped",
            path.display(),
            stats.processed,
            stats.written,
            stats.skipped
        );
        total.add(stats);
    }
    info!(
        "Seeding complete: {} pages processed, {} written, {} skipped",
        total.processed, total.written, total.skipped
    );
    Ok(total)
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingSink {
        batches: Mutex<Vec<Vec<PageDocument>>>,
        fail: bool,
    }

    #[async_trait]
    impl PageSink for RecordingSink {
        async fn write_batch(&self, pages: &[PageDocument]) -> Result<(), StoreError> {
            if self.fail {
                return Err(StoreError::Api {
                    status: 503,
                    message: "unavailable".to_string(),
                });
            }
            self.batches.lock().unwrap().push(pages.to_vec());
            Ok(())
        }
    }

    fn minimal_page(n: u64) -> Value {
        json!({"pageNumber": n, "ayat": [{"english": "x"}]})
    }

    fn temp_file(name: &str, contents: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("mushaf-import-test-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join(name);
        fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_normalize_fills_defaults() {
        let value = json!({
            "pageNumber": 3,
            "ayat": [
                {"arabic": "ا", "tags": "not-a-list"},
                {"ayahNumber": 10, "english": "e", "audioUrl": "u", "tags": ["a", 1, "b"]}
            ]
        });
        let doc = normalize_page(&value).unwrap();
        assert_eq!(doc.page_number, 3);
        assert_eq!(doc.juz, None);
        assert_eq!(doc.surah_number, None);
        assert_eq!(doc.surah_name, "");

        assert_eq!(doc.ayat[0].ayah_number, Some(1));
        assert_eq!(doc.ayat[0].arabic, "ا");
        assert_eq!(doc.ayat[0].english, "");
        assert!(doc.ayat[0].tags.is_empty());

        assert_eq!(doc.ayat[1].ayah_number, Some(10));
        assert_eq!(doc.ayat[1].audio_url, "u");
        assert_eq!(doc.ayat[1].tags, vec!["a", "b"]);
    }

    #[test]
    fn test_normalize_rejects_invalid_pages() {
        assert!(normalize_page(&json!({"ayat": []})).is_none());
        assert!(normalize_page(&json!({"pageNumber": 0, "ayat": []})).is_none());
        assert!(normalize_page(&json!({"pageNumber": -2, "ayat": []})).is_none());
        assert!(normalize_page(&json!({"pageNumber": 4, "ayat": "none"})).is_none());
        assert!(normalize_page(&json!({"pageNumber": 4})).is_none());
        assert!(normalize_page(&json!([1, 2])).is_none());
    }

    #[tokio::test]
    async fn test_seed_batches_of_four_hundred() {
        let sink = RecordingSink::default();
        let pages: Vec<Value> = (1..=850).map(minimal_page).collect();
        let stats = seed_pages(&sink, &pages).await.unwrap();

        assert_eq!(stats.written, 850);
        assert_eq!(stats.batches, 3);
        let sizes: Vec<usize> = sink.batches.lock().unwrap().iter().map(Vec::len).collect();
        assert_eq!(sizes, vec![400, 400, 50]);
    }

    #[tokio::test]
    async fn test_seed_exact_batch_has_no_empty_tail() {
        let sink = RecordingSink::default();
        let pages: Vec<Value> = (1..=400).map(minimal_page).collect();
        let stats = seed_pages(&sink, &pages).await.unwrap();
        assert_eq!(stats.batches, 1);
        assert_eq!(sink.batches.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_seed_skips_invalid_pages() {
        let sink = RecordingSink::default();
        let pages = vec![minimal_page(1), json!({"pageNumber": null}), minimal_page(2)];
        let stats = seed_pages(&sink, &pages).await.unwrap();
        assert_eq!(
            stats,
            SeedStats {
                processed: 3,
                written: 2,
                skipped: 1,
                batches: 1
            }
        );
    }

    #[tokio::test]
    async fn test_seed_surfaces_write_failure() {
        let sink = RecordingSink {
            fail: true,
            ..Default::default()
        };
        let result = seed_pages(&sink, &[minimal_page(1)]).await;
        assert!(matches!(result, Err(ImportError::Store(StoreError::Api { status: 503, .. }))));
    }

    #[tokio::test]
    async fn test_seed_files_accepts_object_and_array() {
        let single = temp_file("single.json", &minimal_page(1).to_string());
        let many = temp_file(
            "many.json",
            &json!([minimal_page(2), minimal_page(3), {"pageNumber": 4}]).to_string(),
        );
        let sink = RecordingSink::default();
        let stats = seed_files(&sink, &[single, many]).await.unwrap();
        assert_eq!(stats.processed, 4);
        assert_eq!(stats.written, 3);
        assert_eq!(stats.skipped, 1);
        assert_eq!(sink.batches.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_seed_files_reports_bad_input() {
        let sink = RecordingSink::default();
        let missing = std::env::temp_dir().join("mushaf-import-does-not-exist.json");
        assert!(matches!(
            seed_files(&sink, &[missing]).await,
            Err(ImportError::Read { .. })
        ));

        let garbage = temp_file("garbage.json", "{ nope");
        assert!(matches!(
            seed_files(&sink, &[garbage]).await,
            Err(ImportError::Json { .. })
        ));
    }
}
