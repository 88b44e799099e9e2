//! Colours for each reading theme.

use ratatui::style::{Color, Modifier, Style};

use crate::core::model::Theme;
use crate::core::notice::Tone;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub fg: Color,
    pub bg: Color,
    pub accent: Color,
    pub dim: Color,
    pub error: Color,
}

impl Palette {
    pub fn for_theme(theme: Theme) -> Self {
        match theme {
            Theme::Day => Self {
                fg: Color::Black,
                bg: Color::White,
                accent: Color::Blue,
                dim: Color::Gray,
                error: Color::Red,
            },
            Theme::Night => Self {
                fg: Color::White,
                bg: Color::Black,
                accent: Color::Yellow,
                dim: Color::DarkGray,
                error: Color::LightRed,
            },
        }
    }

    pub fn base(&self) -> Style {
        Style::default().fg(self.fg).bg(self.bg)
    }

    pub fn accent(&self) -> Style {
        self.base().fg(self.accent).add_modifier(Modifier::BOLD)
    }

    pub fn dim(&self) -> Style {
        self.base().fg(self.dim)
    }

    pub fn tone(&self, tone: Tone) -> Style {
        match tone {
            Tone::Info => self.accent(),
            Tone::Error => self.base().fg(self.error).add_modifier(Modifier::BOLD),
        }
    }
}
