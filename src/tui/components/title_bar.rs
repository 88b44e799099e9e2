//! # TitleBar Component
//!
//! Single-line header: where the reader is, and any status message.
//!
//! ```text
//! Mushaf | Surah 1 • Al-Fatihah | Juz 1 • Page 1 of 604 | Loading page 2…
//! ```
//!
//! Purely presentational. All data arrives as props, so tests can render it
//! straight into a `TestBackend`.

use crate::tui::component::Component;
use crate::tui::palette::Palette;
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::text::{Line, Span};

pub struct TitleBar {
    /// e.g. "Surah 1 • Al-Fatihah"
    pub surah: String,
    /// e.g. "Juz 1 • Page 1 of 604"
    pub location: String,
    /// Transient status, empty when there is nothing to say
    pub status_message: String,
    pub palette: Palette,
}

impl TitleBar {
    pub fn new(surah: String, location: String, status_message: String, palette: Palette) -> Self {
        Self {
            surah,
            location,
            status_message,
            palette,
        }
    }

    fn text(&self) -> String {
        if self.status_message.is_empty() {
            format!("Mushaf | {} | {}", self.surah, self.location)
        } else {
            format!(
                "Mushaf | {} | {} | {}",
                self.surah, self.location, self.status_message
            )
        }
    }
}

impl Component for TitleBar {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let line = Line::from(Span::styled(self.text(), self.palette.accent()))
            .style(self.palette.base());
        frame.render_widget(line, area);
    }
}
