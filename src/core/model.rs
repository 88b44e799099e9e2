//! # Reading Model
//!
//! Value types shared by the store, the navigation core and the UI.
//!
//! ```text
//! Page ── ayat: Vec<Ayah>          (read-only once fetched)
//! Snapshot
//! ├── settings: Settings            (display preferences)
//! └── session: Session              (position + bookmarks)
//! ```

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize, Serializer};

/// A single verse.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ayah {
    pub ayah_number: u32,
    pub arabic: String,
    pub english: String,
    pub transliteration: String,
    pub audio_url: String,
    pub tags: Vec<String>,
}

/// A page of ayat. `ayat` is never empty; the store rejects empty pages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    pub page_number: u32,
    pub surah_number: Option<u32>,
    pub surah_name: String,
    pub juz: Option<u32>,
    pub ayat: Vec<Ayah>,
}

impl Page {
    pub fn ayah_count(&self) -> usize {
        self.ayat.len()
    }

    pub fn last_ayah_index(&self) -> usize {
        self.ayat.len().saturating_sub(1)
    }

    /// "Surah 1 • Al-Fatihah", tolerating a missing surah number.
    pub fn surah_label(&self) -> String {
        match self.surah_number {
            Some(n) => format!("Surah {} • {}", n, self.surah_name),
            None => format!("Surah • {}", self.surah_name),
        }
    }

    /// "Juz 1 • Page 2".
    pub fn juz_label(&self) -> String {
        match self.juz {
            Some(j) => format!("Juz {} • Page {}", j, self.page_number),
            None => format!("Page {}", self.page_number),
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Day,
    #[default]
    Night,
}

impl Theme {
    /// Cycles to the next theme (wraps around)
    pub fn next(self) -> Theme {
        match self {
            Theme::Day => Theme::Night,
            Theme::Night => Theme::Day,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Theme::Day => "Day",
            Theme::Night => "Night",
        }
    }
}

#[derive(Serialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    pub show_arabic: bool,
    pub show_transliteration: bool,
    pub theme: Theme,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            show_arabic: true,
            show_transliteration: false,
            theme: Theme::default(),
        }
    }
}

/// The display settings a user can toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingName {
    Arabic,
    Transliteration,
    Theme,
}

impl Settings {
    pub fn toggle(&mut self, name: SettingName) {
        match name {
            SettingName::Arabic => self.show_arabic = !self.show_arabic,
            SettingName::Transliteration => {
                self.show_transliteration = !self.show_transliteration
            }
            SettingName::Theme => self.theme = self.theme.next(),
        }
    }
}

/// A (page, ayah) index pair. Doubles as the bookmark key.
///
/// Its external form is `"pageIndex:ayahIndex"`, used only when persisting.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Position {
    pub page_index: usize,
    pub ayah_index: usize,
}

impl Position {
    pub const START: Position = Position {
        page_index: 0,
        ayah_index: 0,
    };

    pub fn new(page_index: usize, ayah_index: usize) -> Self {
        Self {
            page_index,
            ayah_index,
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.page_index, self.ayah_index)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsePositionError(String);

impl fmt::Display for ParsePositionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid bookmark key: {:?}", self.0)
    }
}

impl std::error::Error for ParsePositionError {}

impl FromStr for Position {
    type Err = ParsePositionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParsePositionError(s.to_string());
        let (page, ayah) = s.split_once(':').ok_or_else(err)?;
        Ok(Position {
            page_index: page.trim().parse().map_err(|_| err())?,
            ayah_index: ayah.trim().parse().map_err(|_| err())?,
        })
    }
}

impl Serialize for Position {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[derive(Serialize, Clone, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub page_index: usize,
    pub ayah_index: usize,
    pub bookmarks: BTreeSet<Position>,
}

impl Session {
    pub fn position(&self) -> Position {
        Position::new(self.page_index, self.ayah_index)
    }

    /// Moves both indices together so a snapshot never sees half a move.
    pub fn set_position(&mut self, position: Position) {
        self.page_index = position.page_index;
        self.ayah_index = position.ayah_index;
    }
}

/// Everything that survives a restart.
#[derive(Serialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct Snapshot {
    pub settings: Settings,
    pub session: Session,
}
