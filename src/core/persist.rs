//! # Session Persistence
//!
//! Save/load the reading snapshot under a single well-known key.
//!
//! The record lives in `~/.mushaf/quran-learning-session.json`. Writes use
//! atomic rename (write `.tmp`, then `rename()`) for crash safety.
//!
//! Loading never fails past this boundary: unreadable or malformed records
//! are treated as absent, and partially valid ones are default-filled field
//! by field.

use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use log::{debug, info, warn};
use serde_json::Value;

use crate::core::model::{Position, Session, Settings, Snapshot, Theme};

/// Storage key for the reading snapshot.
pub const SESSION_KEY: &str = "quran-learning-session";

#[derive(Debug)]
pub enum PersistError {
    Io(io::Error),
    Encode(serde_json::Error),
}

impl fmt::Display for PersistError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PersistError::Io(e) => write!(f, "session I/O error: {e}"),
            PersistError::Encode(e) => write!(f, "session encode error: {e}"),
        }
    }
}

impl std::error::Error for PersistError {}

/// Raw string storage keyed by name. Synchronous and local.
pub trait KeyValueStore: Send {
    fn get(&self, key: &str) -> io::Result<Option<String>>;
    fn set(&self, key: &str, value: &str) -> io::Result<()>;
    fn remove(&self, key: &str) -> io::Result<()>;
}

// ============================================================================
// File Store
// ============================================================================

/// One `<key>.json` file per key inside a directory.
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    /// Returns `~/.mushaf/`.
    pub fn default_dir() -> io::Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "no home directory"))?;
        Ok(home.join(".mushaf"))
    }

    fn path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }
}

/// Atomically write `contents` to `path` (via `.tmp` + rename).
fn atomic_write(path: &Path, contents: &str) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let tmp_path = path.with_extension("tmp");
    fs::write(&tmp_path, contents)?;
    fs::rename(&tmp_path, path)?;
    Ok(())
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> io::Result<Option<String>> {
        match fs::read_to_string(self.path(key)) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }

    fn set(&self, key: &str, value: &str) -> io::Result<()> {
        atomic_write(&self.path(key), value)
    }

    fn remove(&self, key: &str) -> io::Result<()> {
        match fs::remove_file(self.path(key)) {
            Err(e) if e.kind() != io::ErrorKind::NotFound => Err(e),
            _ => Ok(()),
        }
    }
}

// ============================================================================
// Memory Store
// ============================================================================

/// In-memory store. Clones share the same entries, so a test can keep a
/// handle and inspect what was written.
#[derive(Clone, Default)]
pub struct MemoryStore {
    entries: Arc<Mutex<HashMap<String, String>>>,
    fail_writes: Arc<AtomicBool>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable write error simulation for testing error handling.
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Raw stored value, bypassing decoding.
    pub fn raw(&self, key: &str) -> Option<String> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    /// Stores a raw value, bypassing encoding.
    pub fn put_raw(&self, key: &str, value: &str) {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_string(), value.to_string());
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> io::Result<Option<String>> {
        Ok(self.raw(key))
    }

    fn set(&self, key: &str, value: &str) -> io::Result<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(io::Error::other("simulated write error"));
        }
        self.put_raw(key, value);
        Ok(())
    }

    fn remove(&self, key: &str) -> io::Result<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(io::Error::other("simulated write error"));
        }
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(key);
        Ok(())
    }
}

// ============================================================================
// Snapshot Codec
// ============================================================================

/// Reads and writes the reading snapshot through a `KeyValueStore`.
pub struct SessionPersistence {
    store: Box<dyn KeyValueStore>,
    key: String,
}

impl SessionPersistence {
    pub fn new(store: Box<dyn KeyValueStore>) -> Self {
        Self {
            store,
            key: SESSION_KEY.to_string(),
        }
    }

    /// Returns the stored snapshot, or `None` when absent, unreadable or malformed.
    pub fn load(&self) -> Option<Snapshot> {
        let raw = match self.store.get(&self.key) {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                debug!("No saved session under {}", self.key);
                return None;
            }
            Err(e) => {
                warn!("Failed to read saved session: {}", e);
                return None;
            }
        };
        let snapshot = decode_snapshot(&raw);
        if snapshot.is_none() {
            info!("Saved session is malformed, starting fresh");
        }
        snapshot
    }

    pub fn save(&self, snapshot: &Snapshot) -> Result<(), PersistError> {
        let json = serde_json::to_string(snapshot).map_err(PersistError::Encode)?;
        self.store.set(&self.key, &json).map_err(PersistError::Io)?;
        debug!(
            "Session saved at {} ({} bookmarks)",
            snapshot.session.position(),
            snapshot.session.bookmarks.len()
        );
        Ok(())
    }

    pub fn clear(&self) -> Result<(), PersistError> {
        self.store.remove(&self.key).map_err(PersistError::Io)
    }
}

/// Decodes a stored record leniently. Only a record that is not a JSON
/// object counts as absent; individual bad fields fall back to defaults.
pub fn decode_snapshot(raw: &str) -> Option<Snapshot> {
    let value: Value = serde_json::from_str(raw).ok()?;
    if !value.is_object() {
        return None;
    }
    Some(Snapshot {
        settings: value.get("settings").map(decode_settings).unwrap_or_default(),
        session: value.get("session").map(decode_session).unwrap_or_default(),
    })
}

fn decode_settings(value: &Value) -> Settings {
    let defaults = Settings::default();
    let flag = |name: &str, default: bool| {
        value.get(name).and_then(Value::as_bool).unwrap_or(default)
    };
    Settings {
        show_arabic: flag("showArabic", defaults.show_arabic),
        show_transliteration: flag("showTransliteration", defaults.show_transliteration),
        theme: value
            .get("theme")
            .and_then(|t| serde_json::from_value::<Theme>(t.clone()).ok())
            .unwrap_or(defaults.theme),
    }
}

fn decode_index(value: Option<&Value>) -> usize {
    value
        .and_then(Value::as_u64)
        .and_then(|n| usize::try_from(n).ok())
        .unwrap_or(0)
}

fn decode_session(value: &Value) -> Session {
    let bookmarks = value
        .get("bookmarks")
        .and_then(Value::as_array)
        .map(|keys| {
            keys.iter()
                .filter_map(Value::as_str)
                .filter_map(|key| key.parse::<Position>().ok())
                .collect()
        })
        .unwrap_or_default();
    Session {
        page_index: decode_index(value.get("pageIndex")),
        ayah_index: decode_index(value.get("ayahIndex")),
        bookmarks,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn memory_persistence() -> (MemoryStore, SessionPersistence) {
        let store = MemoryStore::new();
        let persistence = SessionPersistence::new(Box::new(store.clone()));
        (store, persistence)
    }

    fn sample_snapshot() -> Snapshot {
        let mut snapshot = Snapshot::default();
        snapshot.settings.theme = Theme::Day;
        snapshot.settings.show_transliteration = true;
        snapshot.session.set_position(Position::new(4, 2));
        snapshot.session.bookmarks.insert(Position::new(0, 1));
        snapshot.session.bookmarks.insert(Position::new(4, 2));
        snapshot
    }

    #[test]
    fn test_save_then_load_round_trip() {
        let (_, persistence) = memory_persistence();
        let snapshot = sample_snapshot();
        persistence.save(&snapshot).unwrap();
        assert_eq!(persistence.load(), Some(snapshot));
    }

    #[test]
    fn test_load_absent_is_none() {
        let (_, persistence) = memory_persistence();
        assert_eq!(persistence.load(), None);
    }

    #[test]
    fn test_corrupt_record_is_absent() {
        let (store, persistence) = memory_persistence();
        store.put_raw(SESSION_KEY, "{not json");
        assert_eq!(persistence.load(), None);
        store.put_raw(SESSION_KEY, "[1, 2, 3]");
        assert_eq!(persistence.load(), None);
    }

    #[test]
    fn test_partial_record_is_default_filled() {
        let (store, persistence) = memory_persistence();
        store.put_raw(
            SESSION_KEY,
            r#"{"settings": {"theme": "day"}, "session": {"pageIndex": 3}}"#,
        );
        let snapshot = persistence.load().unwrap();
        assert_eq!(snapshot.settings.theme, Theme::Day);
        assert!(snapshot.settings.show_arabic);
        assert_eq!(snapshot.session.page_index, 3);
        assert_eq!(snapshot.session.ayah_index, 0);
        assert!(snapshot.session.bookmarks.is_empty());
    }

    #[test]
    fn test_invalid_fields_fall_back() {
        let (store, persistence) = memory_persistence();
        store.put_raw(
            SESSION_KEY,
            r#"{
                "settings": {"showArabic": "yes", "theme": "sepia"},
                "session": {"pageIndex": -4, "ayahIndex": 1.5, "bookmarks": ["1:2", "bogus", 7, "3:x"]}
            }"#,
        );
        let snapshot = persistence.load().unwrap();
        assert_eq!(snapshot.settings, Settings::default());
        assert_eq!(snapshot.session.position(), Position::START);
        assert_eq!(
            snapshot.session.bookmarks.into_iter().collect::<Vec<_>>(),
            vec![Position::new(1, 2)]
        );
    }

    #[test]
    fn test_clear_removes_record() {
        let (store, persistence) = memory_persistence();
        persistence.save(&sample_snapshot()).unwrap();
        persistence.clear().unwrap();
        assert_eq!(store.raw(SESSION_KEY), None);
        assert_eq!(persistence.load(), None);
    }

    #[test]
    fn test_failed_write_is_reported() {
        let (store, persistence) = memory_persistence();
        store.set_fail_writes(true);
        let result = persistence.save(&sample_snapshot());
        assert!(matches!(result, Err(PersistError::Io(_))));
    }

    #[test]
    fn test_file_store_round_trip() {
        let dir = std::env::temp_dir().join(format!(
            "mushaf-persist-test-{}",
            std::process::id()
        ));
        let store = FileStore::new(dir.clone());
        assert_eq!(store.get("k").unwrap(), None);
        store.set("k", "v1").unwrap();
        store.set("k", "v2").unwrap();
        assert_eq!(store.get("k").unwrap().as_deref(), Some("v2"));
        assert!(!dir.join("k.tmp").exists());
        store.remove("k").unwrap();
        store.remove("k").unwrap();
        assert_eq!(store.get("k").unwrap(), None);
        let _ = fs::remove_dir_all(dir);
    }
}
