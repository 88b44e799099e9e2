use ratatui::Frame;
use ratatui::layout::{Constraint, Layout};
use ratatui::widgets::Block;

use crate::core::state::App;
use crate::tui::TuiState;
use crate::tui::component::Component;
use crate::tui::components::{AyahCard, ControlBar, TitleBar, Toast};
use crate::tui::palette::Palette;

pub fn draw_ui(frame: &mut Frame, app: &App, tui: &mut TuiState) {
    use Constraint::{Length, Min};

    let nav = &app.nav;
    let palette = Palette::for_theme(nav.settings().theme);
    let page = nav.page();
    let position = nav.position();

    frame.render_widget(Block::default().style(palette.base()), frame.area());

    let layout = Layout::vertical([Length(1), Min(3), Length(2)]);
    let [title_area, card_area, controls_area] = layout.areas(frame.area());

    let location = format!("{} of {}", page.juz_label(), nav.total_pages());
    TitleBar::new(
        page.surah_label(),
        location,
        app.status_message.clone(),
        palette,
    )
    .render(frame, title_area);

    tui.card.follow(position);
    AyahCard {
        page,
        ayah_index: position.ayah_index,
        settings: nav.settings(),
        bookmarked: nav.is_bookmarked(),
        palette,
        state: &mut tui.card,
    }
    .render(frame, card_area);

    ControlBar {
        ayah_position: position.ayah_index + 1,
        ayah_count: page.ayah_count(),
        progress: nav.progress(),
        mode: nav.progress_mode(),
        palette,
    }
    .render(frame, controls_area);

    if let Some(notification) = app.notice.current() {
        Toast {
            notification,
            palette,
        }
        .render(frame, card_area);
    }

    if let Some(prompt) = tui.jump_prompt.as_mut() {
        prompt.render(frame, card_area);
    }
}
