//! # ControlBar Component
//!
//! Two lines under the card: a progress gauge, then the key hints.

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::LineGauge;

use crate::core::progress::{ProgressMode, format_percent};
use crate::tui::component::Component;
use crate::tui::palette::Palette;

const HINTS: &str =
    "←/h prev  →/l next  g jump  b bookmark  a arabic  t translit  d theme  c copy  s share  R reset  q quit";

pub struct ControlBar {
    /// 1-based ayah position within the page
    pub ayah_position: usize,
    pub ayah_count: usize,
    pub progress: f64,
    pub mode: ProgressMode,
    pub palette: Palette,
}

impl ControlBar {
    fn label(&self) -> String {
        format!(
            "Ayah {} of {} · {} {}",
            self.ayah_position,
            self.ayah_count,
            format_percent(self.progress),
            self.mode.label()
        )
    }
}

impl Component for ControlBar {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let [gauge_area, hints_area] =
            Layout::vertical([Constraint::Length(1), Constraint::Length(1)]).areas(area);

        let gauge = LineGauge::default()
            .ratio(self.progress.clamp(0.0, 1.0))
            .label(Span::styled(self.label(), self.palette.base()))
            .filled_style(self.palette.accent())
            .unfilled_style(self.palette.dim())
            .style(self.palette.base());
        frame.render_widget(gauge, gauge_area);

        let hints = Line::from(Span::styled(HINTS, self.palette.dim())).style(self.palette.base());
        frame.render_widget(hints, hints_area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::model::Theme;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    #[test]
    fn test_control_bar_shows_progress_label() {
        let backend = TestBackend::new(120, 2);
        let mut terminal = Terminal::new(backend).unwrap();
        let mut bar = ControlBar {
            ayah_position: 3,
            ayah_count: 7,
            progress: 2.0 / 6.0,
            mode: ProgressMode::Page,
            palette: Palette::for_theme(Theme::Night),
        };
        terminal
            .draw(|f| {
                bar.render(f, f.area());
            })
            .unwrap();
        let text = terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect::<String>();
        assert!(text.contains("Ayah 3 of 7 · 33% page"));
        assert!(text.contains("b bookmark"));
    }
}
