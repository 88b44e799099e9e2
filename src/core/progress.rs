//! # Reading Progress
//!
//! Two named formulas. Both are 0.0 at the first ayah of the tracked range
//! and 1.0 at the last; a range holding a single ayah is 1.0.
//!
//! - [`within_page`]: remote-paged mode, only the current page is known.
//! - [`across_corpus`]: preloaded mode, every page's ayah count is known.

use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ProgressMode {
    /// Fraction of the current page read.
    #[default]
    Page,
    /// Fraction of the whole corpus read. Needs per-page ayah counts.
    Corpus,
}

impl ProgressMode {
    pub fn label(self) -> &'static str {
        match self {
            ProgressMode::Page => "page",
            ProgressMode::Corpus => "corpus",
        }
    }
}

fn fraction(read: usize, total: usize) -> f64 {
    if total <= 1 {
        return 1.0;
    }
    (read.min(total - 1) as f64) / ((total - 1) as f64)
}

/// `ayah_index / (ayah_count - 1)`.
pub fn within_page(ayah_index: usize, ayah_count: usize) -> f64 {
    fraction(ayah_index, ayah_count)
}

/// Global ayah position over the global ayah count.
pub fn across_corpus(page_index: usize, ayah_index: usize, ayah_counts: &[usize]) -> f64 {
    let total: usize = ayah_counts.iter().sum();
    let read: usize = ayah_counts.iter().take(page_index).sum::<usize>() + ayah_index;
    fraction(read, total)
}

/// "42%"
pub fn format_percent(value: f64) -> String {
    format!("{}%", (value * 100.0).round() as i64)
}
