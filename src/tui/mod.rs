//! # TUI Adapter
//!
//! The ratatui-specific layer. Handles terminal I/O, renders the UI,
//! and translates keyboard events into core::Action values.
//!
//! This is the only module that knows about ratatui and crossterm.
//!
//! ## Event Loop
//!
//! ```text
//! keys ──► key_action() ──► update() ──► Effect::Fetch ──► tokio::spawn(fetch_page)
//!                              ▲                                   │
//!                              └──── Action::PageFetched ◄─ mpsc ──┘
//! ```
//!
//! The loop itself is synchronous. Page fetches run as tokio tasks and
//! report back over a channel, so the reader stays responsive while a page
//! loads.
//!
//! ## Redraw Strategy
//!
//! - **Busy** (page loading or toast showing): polls every ~100ms so the
//!   toast expires on time and the loaded page appears promptly.
//! - **Idle**: sleeps up to 500ms and only redraws on events.

mod component;
mod components;
mod event;
mod palette;
mod ui;

use log::{debug, info, warn};
use std::io::stdout;
use std::sync::{Arc, mpsc};
use std::time::{Duration, Instant};

use crossterm::event::{DisableMouseCapture, EnableMouseCapture};
use crossterm::execute;

use crate::clipboard;
use crate::core::action::{Action, Effect, update};
use crate::core::model::{SettingName, Theme};
use crate::core::navigation::{FetchTicket, NavCommand, NavigationState};
use crate::core::state::App;
use crate::store::{PageStore, StoreError};
use crate::tui::component::EventHandler;
use crate::tui::components::{AyahCardState, JumpEvent, JumpPrompt};
use crate::tui::event::{TuiEvent, poll_event_immediate, poll_event_timeout};
use crate::tui::palette::Palette;

/// Upper bound on a single page fetch, on top of the store's own timeout.
const FETCH_TIMEOUT: Duration = Duration::from_secs(30);

/// TUI-specific presentation state (not part of core business logic)
pub struct TuiState {
    pub card: AyahCardState,
    /// Jump prompt overlay (None = hidden)
    pub jump_prompt: Option<JumpPrompt>,
}

impl Default for TuiState {
    fn default() -> Self {
        Self::new()
    }
}

impl TuiState {
    pub fn new() -> Self {
        Self {
            card: AyahCardState::new(),
            jump_prompt: None,
        }
    }

    pub fn open_jump_prompt(&mut self, total_pages: u32, theme: Theme) {
        self.jump_prompt = Some(JumpPrompt::new(total_pages, Palette::for_theme(theme)));
    }
}

struct TerminalModeGuard;

impl TerminalModeGuard {
    fn new() -> std::io::Result<Self> {
        execute!(stdout(), EnableMouseCapture)?;
        info!("Terminal modes enabled (mouse capture for scrolling)");
        Ok(Self)
    }
}

impl Drop for TerminalModeGuard {
    fn drop(&mut self) {
        let _ = execute!(stdout(), DisableMouseCapture);
    }
}

/// Maps a key outside the jump prompt to a core action.
fn key_action(event: &TuiEvent) -> Option<Action> {
    let action = match event {
        TuiEvent::Left | TuiEvent::InputChar('h') => Action::Navigate(NavCommand::StepBackward),
        TuiEvent::Right | TuiEvent::InputChar('l') => Action::Navigate(NavCommand::StepForward),
        TuiEvent::InputChar('R') => Action::Navigate(NavCommand::Reset),
        TuiEvent::InputChar('b') => Action::ToggleBookmark,
        TuiEvent::InputChar('a') => Action::ToggleSetting(SettingName::Arabic),
        TuiEvent::InputChar('t') => Action::ToggleSetting(SettingName::Transliteration),
        TuiEvent::InputChar('d') => Action::ToggleSetting(SettingName::Theme),
        TuiEvent::InputChar('c') => Action::CopyAyah,
        TuiEvent::InputChar('s') => Action::ShareAyah,
        TuiEvent::InputChar('q') | TuiEvent::Escape | TuiEvent::ForceQuit => Action::Quit,
        _ => return None,
    };
    Some(action)
}

pub fn run(nav: NavigationState) -> std::io::Result<()> {
    let store = nav.store();
    let mut app = App::new(nav);
    let mut tui = TuiState::new();

    let mut terminal = ratatui::init();
    let _terminal_mode_guard = TerminalModeGuard::new();

    // Channel for actions from background tasks
    let (tx, rx) = mpsc::channel();
    let mut needs_redraw = true; // Force first frame

    loop {
        if app.notice.expire(Instant::now()) {
            needs_redraw = true;
        }

        if needs_redraw {
            terminal.draw(|f| ui::draw_ui(f, &app, &mut tui))?;
            needs_redraw = false;
        }

        let busy = app.is_loading() || app.notice.is_active();
        let timeout = if busy {
            Duration::from_millis(100)
        } else {
            Duration::from_millis(500)
        };
        let first_event = poll_event_timeout(timeout);

        // Process first event + drain ALL pending events before next draw
        if first_event.is_some() {
            needs_redraw = true;
        }
        for event in first_event
            .into_iter()
            .chain(std::iter::from_fn(poll_event_immediate))
        {
            let action = match event {
                TuiEvent::Resize => continue,
                TuiEvent::ForceQuit => Some(Action::Quit),
                // When the jump prompt is open, route all events to it
                _ if tui.jump_prompt.is_some() => {
                    let Some(prompt) = tui.jump_prompt.as_mut() else {
                        continue;
                    };
                    match prompt.handle_event(&event) {
                        Some(JumpEvent::Submit(page)) => {
                            tui.jump_prompt = None;
                            Some(Action::Navigate(NavCommand::JumpTo(page)))
                        }
                        Some(JumpEvent::Cancel) => {
                            tui.jump_prompt = None;
                            None
                        }
                        None => None,
                    }
                }
                TuiEvent::InputChar('g') => {
                    tui.open_jump_prompt(app.nav.total_pages(), app.nav.settings().theme);
                    None
                }
                TuiEvent::ScrollUp
                | TuiEvent::ScrollDown
                | TuiEvent::ScrollPageUp
                | TuiEvent::ScrollPageDown => {
                    tui.card.handle_event(&event);
                    None
                }
                _ => key_action(&event),
            };

            if let Some(action) = action {
                debug!("Key action: {:?}", action);
                let effect = update(&mut app, action);
                perform(effect, &mut app, &store, &tx);
            }
        }

        // Handle background task actions (fetched pages)
        while let Ok(action) = rx.try_recv() {
            needs_redraw = true;
            let effect = update(&mut app, action);
            perform(effect, &mut app, &store, &tx);
        }

        if app.should_quit {
            break;
        }
    }

    info!("Leaving reader at {}", app.nav.position());
    ratatui::restore();
    Ok(())
}

/// Carries out an effect returned by `update`.
fn perform(effect: Effect, app: &mut App, store: &Arc<dyn PageStore>, tx: &mpsc::Sender<Action>) {
    match effect {
        Effect::None | Effect::Quit => {}
        Effect::Fetch(ticket) => spawn_fetch(Arc::clone(store), ticket, tx.clone()),
        Effect::Copy(text) => {
            let result = clipboard::copy_to_clipboard(&text).map_err(|e| e.to_string());
            update(app, Action::ClipboardDone { shared: false, result });
        }
        Effect::Share(text) => {
            let result = clipboard::share(&text)
                .map(|_| ())
                .map_err(|e| e.to_string());
            update(app, Action::ClipboardDone { shared: true, result });
        }
    }
}

fn spawn_fetch(store: Arc<dyn PageStore>, ticket: FetchTicket, tx: mpsc::Sender<Action>) {
    let page_number = ticket.page_number();
    info!("Spawning fetch for page {} from {}", page_number, store.name());
    tokio::spawn(async move {
        let result = match tokio::time::timeout(FETCH_TIMEOUT, store.fetch_page(page_number)).await
        {
            Ok(result) => result,
            Err(_) => {
                warn!("Fetch for page {} timed out after {:?}", page_number, FETCH_TIMEOUT);
                Err(StoreError::Network(format!(
                    "timed out after {}s",
                    FETCH_TIMEOUT.as_secs()
                )))
            }
        };
        if tx.send(Action::PageFetched { ticket, result }).is_err() {
            warn!("Failed to send page {}: receiver dropped", page_number);
        }
    });
}
