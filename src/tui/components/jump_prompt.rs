//! # JumpPrompt Component
//!
//! Popup opened with `g`. Collects a page number and emits it on Enter.
//! Esc, or Enter on an empty prompt, cancels. Range checking is left to
//! the navigation core, which clamps.

use ratatui::Frame;
use ratatui::layout::{Constraint, Flex, Layout, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Clear, Paragraph};

use crate::tui::component::{Component, EventHandler};
use crate::tui::event::TuiEvent;
use crate::tui::palette::Palette;

/// Longest accepted input; more digits than any page count needs.
const MAX_DIGITS: usize = 6;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JumpEvent {
    Submit(i64),
    Cancel,
}

pub struct JumpPrompt {
    pub input: String,
    /// Shown as the upper bound in the prompt
    pub total_pages: u32,
    pub palette: Palette,
}

impl JumpPrompt {
    pub fn new(total_pages: u32, palette: Palette) -> Self {
        Self {
            input: String::new(),
            total_pages,
            palette,
        }
    }
}

impl EventHandler for JumpPrompt {
    type Event = JumpEvent;

    fn handle_event(&mut self, event: &TuiEvent) -> Option<Self::Event> {
        match event {
            TuiEvent::InputChar(c) if c.is_ascii_digit() => {
                if self.input.len() < MAX_DIGITS {
                    self.input.push(*c);
                }
                None
            }
            TuiEvent::Backspace => {
                self.input.pop();
                None
            }
            TuiEvent::Submit => Some(match self.input.parse::<i64>() {
                Ok(page) => JumpEvent::Submit(page),
                Err(_) => JumpEvent::Cancel,
            }),
            TuiEvent::Escape => Some(JumpEvent::Cancel),
            _ => None,
        }
    }
}

impl Component for JumpPrompt {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let [row] = Layout::vertical([Constraint::Length(3)])
            .flex(Flex::Center)
            .areas(area);
        let [popup] = Layout::horizontal([Constraint::Length(32)])
            .flex(Flex::Center)
            .areas(row);

        let line = Line::from(vec![
            Span::styled(format!("Page (1-{}): ", self.total_pages), self.palette.dim()),
            Span::styled(format!("{}_", self.input), self.palette.accent()),
        ]);
        frame.render_widget(Clear, popup);
        frame.render_widget(
            Paragraph::new(line).style(self.palette.base()).block(
                Block::bordered()
                    .title(" Go to page ")
                    .border_style(self.palette.accent()),
            ),
            popup,
        );
    }
}
