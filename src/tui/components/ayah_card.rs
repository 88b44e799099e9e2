//! # AyahCard Component
//!
//! The current ayah: reference, Arabic, English, transliteration and tags,
//! inside a bordered card. Long ayat scroll inside a `ScrollView`.
//!
//! Scroll position lives in `AyahCardState`, which outlives the per-frame
//! `AyahCard` and is reset whenever the position changes.

use ratatui::Frame;
use ratatui::layout::{Alignment, Position as Offset, Rect, Size};
use ratatui::style::Modifier;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Wrap};
use tui_scrollview::{ScrollView, ScrollViewState, ScrollbarVisibility};

use crate::clipboard::ayah_reference;
use crate::core::model::{Page, Position, Settings};
use crate::tui::component::{Component, EventHandler};
use crate::tui::event::TuiEvent;
use crate::tui::palette::Palette;

#[derive(Default)]
pub struct AyahCardState {
    pub scroll_state: ScrollViewState,
    /// Position the scroll offset belongs to
    shown: Option<Position>,
    content_height: u16,
    viewport_height: u16,
}

impl AyahCardState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Scrolls back to the top when the card starts showing another ayah.
    pub fn follow(&mut self, position: Position) {
        if self.shown != Some(position) {
            self.shown = Some(position);
            self.scroll_state.scroll_to_top();
        }
    }

    fn clamp_scroll(&mut self) {
        let max_y = self.content_height.saturating_sub(self.viewport_height);
        let current = self.scroll_state.offset();
        if current.y > max_y {
            self.scroll_state.set_offset(Offset { x: current.x, y: max_y });
        }
    }
}

impl EventHandler for AyahCardState {
    type Event = ();

    fn handle_event(&mut self, event: &TuiEvent) -> Option<Self::Event> {
        match event {
            TuiEvent::ScrollUp => self.scroll_state.scroll_up(),
            TuiEvent::ScrollDown => self.scroll_state.scroll_down(),
            TuiEvent::ScrollPageUp => self.scroll_state.scroll_page_up(),
            TuiEvent::ScrollPageDown => self.scroll_state.scroll_page_down(),
            _ => return None,
        }
        self.clamp_scroll();
        None
    }
}

pub struct AyahCard<'a> {
    pub page: &'a Page,
    pub ayah_index: usize,
    pub settings: &'a Settings,
    pub bookmarked: bool,
    pub palette: Palette,
    pub state: &'a mut AyahCardState,
}

impl<'a> AyahCard<'a> {
    fn lines(&self) -> Vec<Line<'a>> {
        let page: &'a Page = self.page;
        let ayah = &page.ayat[self.ayah_index];
        let palette = self.palette;
        let mut lines = Vec::new();

        if self.settings.show_arabic && !ayah.arabic.is_empty() {
            lines.push(
                Line::from(Span::styled(ayah.arabic.as_str(), palette.accent()))
                    .alignment(Alignment::Right),
            );
            lines.push(Line::default());
        }

        lines.push(Line::from(Span::styled(ayah.english.as_str(), palette.base())));

        if self.settings.show_transliteration && !ayah.transliteration.is_empty() {
            lines.push(Line::default());
            lines.push(Line::from(Span::styled(
                ayah.transliteration.as_str(),
                palette.dim().add_modifier(Modifier::ITALIC),
            )));
        }

        if !ayah.tags.is_empty() {
            let tags = ayah
                .tags
                .iter()
                .map(|t| format!("#{t}"))
                .collect::<Vec<_>>()
                .join(" ");
            lines.push(Line::default());
            lines.push(Line::from(Span::styled(tags, palette.dim())));
        }
        lines
    }

    fn title(&self) -> String {
        let reference = ayah_reference(self.page, &self.page.ayat[self.ayah_index]);
        if self.bookmarked {
            format!(" ★ {} ", reference)
        } else {
            format!(" {} ", reference)
        }
    }
}

impl Component for AyahCard<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let block = Block::bordered()
            .title(Span::styled(self.title(), self.palette.accent()))
            .border_style(self.palette.dim())
            .style(self.palette.base());
        let inner = block.inner(area);
        frame.render_widget(block, area);

        // -1 for the scrollbar
        let content_width = inner.width.saturating_sub(1);
        let paragraph = Paragraph::new(self.lines())
            .style(self.palette.base())
            .wrap(Wrap { trim: false });
        let content_height = (paragraph.line_count(content_width) as u16).max(1);

        self.state.content_height = content_height;
        self.state.viewport_height = inner.height;
        self.state.clamp_scroll();

        let mut scroll_view = ScrollView::new(Size::new(content_width, content_height))
            .vertical_scrollbar_visibility(ScrollbarVisibility::Automatic)
            .horizontal_scrollbar_visibility(ScrollbarVisibility::Never);
        scroll_view.render_widget(paragraph, Rect::new(0, 0, content_width, content_height));
        frame.render_stateful_widget(scroll_view, inner, &mut self.state.scroll_state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::model::Theme;
    use crate::test_support::page;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn render(card_settings: &Settings, bookmarked: bool, height: u16) -> (String, AyahCardState) {
        let page = page(1, 3);
        let mut state = AyahCardState::new();
        let backend = TestBackend::new(60, height);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal
            .draw(|f| {
                let mut card = AyahCard {
                    page: &page,
                    ayah_index: 1,
                    settings: card_settings,
                    bookmarked,
                    palette: Palette::for_theme(Theme::Night),
                    state: &mut state,
                };
                card.render(f, f.area());
            })
            .unwrap();
        let text = terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect::<String>();
        (text, state)
    }

    #[test]
    fn test_card_shows_enabled_texts() {
        let (text, _) = render(&Settings::default(), false, 12);
        assert!(text.contains("Surah 1 • Test — Ayah 2"));
        assert!(text.contains("english 1:1"));
        assert!(text.contains("arabic 1:1"));
        assert!(!text.contains("translit 1:1"));
        assert!(!text.contains('★'));
    }

    #[test]
    fn test_card_follows_settings_and_bookmark() {
        let settings = Settings {
            show_arabic: false,
            show_transliteration: true,
            ..Default::default()
        };
        let (text, _) = render(&settings, true, 12);
        assert!(!text.contains("arabic 1:1"));
        assert!(text.contains("translit 1:1"));
        assert!(text.contains('★'));
    }

    #[test]
    fn test_scroll_is_clamped_to_content() {
        let (_, mut state) = render(&Settings::default(), false, 12);
        for _ in 0..20 {
            state.handle_event(&TuiEvent::ScrollDown);
        }
        // three short lines fit in the viewport, so there is nothing to scroll
        assert_eq!(state.scroll_state.offset().y, 0);
    }

    #[test]
    fn test_follow_resets_scroll_on_new_position() {
        let mut state = AyahCardState::new();
        state.content_height = 50;
        state.viewport_height = 10;
        state.follow(Position::new(0, 0));
        for _ in 0..3 {
            state.handle_event(&TuiEvent::ScrollDown);
        }
        assert!(state.scroll_state.offset().y > 0);

        state.follow(Position::new(0, 0));
        assert!(state.scroll_state.offset().y > 0);
        state.follow(Position::new(0, 1));
        assert_eq!(state.scroll_state.offset().y, 0);
    }
}
