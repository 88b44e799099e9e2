//! Built-in offline page store.
//!
//! Holds the whole corpus in memory, so it can also report per-page ayah
//! counts for corpus-wide progress.

use async_trait::async_trait;

use crate::core::model::{Ayah, Page};
use crate::store::{PageStore, StoreError};

pub struct DemoPageStore {
    pages: Vec<Page>,
}

fn ayah(number: u32, arabic: &str, english: &str, transliteration: &str) -> Ayah {
    Ayah {
        ayah_number: number,
        arabic: arabic.to_string(),
        english: english.to_string(),
        transliteration: transliteration.to_string(),
        audio_url: String::new(),
        tags: Vec::new(),
    }
}

impl Default for DemoPageStore {
    fn default() -> Self {
        Self::new()
    }
}

impl DemoPageStore {
    /// The two opening pages of Al-Fatihah.
    pub fn new() -> Self {
        let pages = vec![
            Page {
                page_number: 1,
                surah_number: Some(1),
                surah_name: "Al-Fatihah".to_string(),
                juz: Some(1),
                ayat: vec![
                    ayah(
                        1,
                        "بِسْمِ اللَّهِ الرَّحْمَٰنِ الرَّحِيمِ",
                        "In the name of Allah, the Most Compassionate, Most Merciful.",
                        "Bismi Allāhi ar-Raḥmāni ar-Raḥīm",
                    ),
                    ayah(
                        2,
                        "الْحَمْدُ لِلَّهِ رَبِّ الْعَالَمِينَ",
                        "All praise is for Allah, Lord of all worlds,",
                        "Al-ḥamdu lillāhi rabbi l-ʿālamīn",
                    ),
                ],
            },
            Page {
                page_number: 2,
                surah_number: Some(1),
                surah_name: "Al-Fatihah".to_string(),
                juz: Some(1),
                ayat: vec![
                    ayah(
                        3,
                        "الرَّحْمَٰنِ الرَّحِيمِ",
                        "the Most Compassionate, Most Merciful,",
                        "Ar-Raḥmāni ar-Raḥīm",
                    ),
                    ayah(
                        4,
                        "مَالِكِ يَوْمِ الدِّينِ",
                        "Master of the Day of Judgment.",
                        "Māliki yawmi d-dīn",
                    ),
                ],
            },
        ];
        Self { pages }
    }

    /// A store over caller-supplied pages, numbered by their `page_number`.
    pub fn from_pages(pages: Vec<Page>) -> Self {
        Self { pages }
    }
}

#[async_trait]
impl PageStore for DemoPageStore {
    fn name(&self) -> &str {
        "demo"
    }

    async fn fetch_page(&self, page_number: u32) -> Result<Option<Page>, StoreError> {
        Ok(self
            .pages
            .iter()
            .find(|p| p.page_number == page_number)
            .cloned())
    }

    async fn fetch_page_count(&self) -> Result<u32, StoreError> {
        Ok(self.pages.len() as u32)
    }

    async fn ayah_counts(&self) -> Result<Option<Vec<usize>>, StoreError> {
        Ok(Some(self.pages.iter().map(Page::ayah_count).collect()))
    }
}
