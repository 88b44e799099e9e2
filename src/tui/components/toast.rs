//! # Toast Component
//!
//! The current notification, drawn as a small box above the bottom edge of
//! the area it is given.

use ratatui::Frame;
use ratatui::layout::{Alignment, Rect};
use ratatui::widgets::{Block, Clear, Paragraph};
use unicode_width::UnicodeWidthStr;

use crate::core::notice::Notification;
use crate::tui::component::Component;
use crate::tui::palette::Palette;

pub struct Toast<'a> {
    pub notification: &'a Notification,
    pub palette: Palette,
}

/// Centred box of `width × 3`, one row above the bottom of `area`.
fn toast_area(area: Rect, message: &str) -> Rect {
    let width = (message.width() as u16 + 4).min(area.width);
    let height = area.height.min(3);
    let x = area.x + (area.width - width) / 2;
    let y = (area.y + area.height).saturating_sub(height + 1).max(area.y);
    Rect::new(x, y, width, height)
}

impl Component for Toast<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let message = self.notification.message.as_str();
        let rect = toast_area(area, message);
        let style = self.palette.tone(self.notification.tone);

        frame.render_widget(Clear, rect);
        let paragraph = Paragraph::new(message)
            .alignment(Alignment::Center)
            .style(style)
            .block(Block::bordered().border_style(style));
        frame.render_widget(paragraph, rect);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::model::Theme;
    use crate::core::notice::Tone;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;
    use std::time::Instant;

    #[test]
    fn test_toast_area_is_centred_and_clipped() {
        let area = Rect::new(0, 0, 40, 10);
        assert_eq!(toast_area(area, "Bookmarked"), Rect::new(13, 6, 14, 3));

        let narrow = Rect::new(0, 0, 8, 2);
        let rect = toast_area(narrow, "a rather long message");
        assert_eq!(rect.width, 8);
        assert_eq!(rect.height, 2);
        assert_eq!(rect.y, 0);
    }

    #[test]
    fn test_toast_renders_message() {
        let backend = TestBackend::new(40, 10);
        let mut terminal = Terminal::new(backend).unwrap();
        let notification = Notification {
            message: "Copied ayah to clipboard".to_string(),
            tone: Tone::Info,
            expires_at: Instant::now(),
        };
        terminal
            .draw(|f| {
                let mut toast = Toast {
                    notification: &notification,
                    palette: Palette::for_theme(Theme::Night),
                };
                toast.render(f, f.area());
            })
            .unwrap();
        let text = terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect::<String>();
        assert!(text.contains("Copied ayah to clipboard"));
    }
}
