//! # Actions
//!
//! Everything that can happen in the reader becomes an `Action`.
//! User presses →? That's `Action::Navigate(NavCommand::StepForward)`.
//! A page arrives? That's `Action::PageFetched { .. }`.
//!
//! `update()` applies the action to the state and returns an `Effect`
//! describing any I/O the adapter must perform. No network or clipboard
//! access happens here.
//!
//! ```text
//! State + Action  →  update()  →  New State + Effect
//! ```

use log::{debug, warn};

use crate::clipboard::ayah_copy_text;
use crate::core::model::{Page, SettingName};
use crate::core::navigation::{Begin, FetchTicket, NavCommand, NavError, Outcome};
use crate::core::state::App;
use crate::store::StoreError;

#[derive(Debug)]
pub enum Action {
    Navigate(NavCommand),
    PageFetched {
        ticket: FetchTicket,
        result: Result<Option<Page>, StoreError>,
    },
    ToggleBookmark,
    ToggleSetting(SettingName),
    CopyAyah,
    ShareAyah,
    /// Result of a clipboard effect, reported back by the adapter.
    ClipboardDone {
        shared: bool,
        result: Result<(), String>,
    },
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    None,
    /// Fetch this page and send back `Action::PageFetched`.
    Fetch(FetchTicket),
    /// Put this text on the clipboard.
    Copy(String),
    /// Share this text (falls back to the clipboard).
    Share(String),
    Quit,
}

pub fn update(app: &mut App, action: Action) -> Effect {
    let effect = match action {
        Action::Navigate(command) => match app.nav.begin(command) {
            Begin::Applied(outcome) => {
                apply_outcome(app, Ok(outcome));
                Effect::None
            }
            Begin::Fetch(ticket) => {
                app.status_message = format!("Loading page {}…", ticket.page_number());
                Effect::Fetch(ticket)
            }
            Begin::Busy => {
                if let Some(page) = app.nav.pending_page() {
                    app.status_message = format!("Still loading page {}…", page);
                }
                Effect::None
            }
        },

        Action::PageFetched { ticket, result } => {
            let outcome = app.nav.complete(ticket, result);
            if ticket.is_reset() && matches!(outcome, Ok(Outcome::Moved)) {
                app.status_message.clear();
                app.notice.info("Session reset");
            } else {
                apply_outcome(app, outcome);
            }
            Effect::None
        }

        Action::ToggleBookmark => {
            let added = app.nav.toggle_bookmark();
            app.notice
                .info(if added { "Bookmarked" } else { "Bookmark removed" });
            Effect::None
        }

        Action::ToggleSetting(name) => {
            app.nav.toggle_setting(name);
            let settings = app.nav.settings();
            app.status_message = match name {
                SettingName::Arabic => format!("Arabic {}", on_off(settings.show_arabic)),
                SettingName::Transliteration => {
                    format!("Transliteration {}", on_off(settings.show_transliteration))
                }
                SettingName::Theme => format!("Theme: {}", settings.theme.label()),
            };
            Effect::None
        }

        Action::CopyAyah => Effect::Copy(current_copy_text(app)),
        Action::ShareAyah => Effect::Share(current_copy_text(app)),

        Action::ClipboardDone { shared, result } => {
            match result {
                Ok(()) if shared => app.notice.info("Copied ayah to share"),
                Ok(()) => app.notice.info("Copied ayah to clipboard"),
                Err(e) => {
                    warn!("Clipboard failed: {}", e);
                    app.notice.error(format!("Copy failed: {}", e));
                }
            }
            Effect::None
        }

        Action::Quit => {
            app.should_quit = true;
            Effect::Quit
        }
    };

    if let Some(e) = app.nav.take_persist_error() {
        app.notice.error(format!("Could not save session: {}", e));
    }
    effect
}

fn apply_outcome(app: &mut App, outcome: Result<Outcome, NavError>) {
    debug!("Navigation outcome: {:?}", outcome);
    match outcome {
        Ok(Outcome::Moved) | Ok(Outcome::Unchanged) => app.status_message.clear(),
        Ok(Outcome::Missing { page_number }) => {
            app.status_message.clear();
            app.notice.info(format!("Page {} is not available", page_number));
        }
        Ok(Outcome::Dropped) | Ok(Outcome::Stale) => {}
        Err(e) => {
            app.status_message.clear();
            app.notice.error(e.to_string());
        }
    }
}

fn on_off(flag: bool) -> &'static str {
    if flag { "on" } else { "off" }
}

fn current_copy_text(app: &App) -> String {
    ayah_copy_text(app.nav.page(), app.nav.current_ayah(), app.nav.settings())
}
