//! # Application State
//!
//! Core business state for the reader. This module contains domain logic
//! only, no TUI-specific types. Presentation state lives in the `tui` module.
//!
//! ```text
//! App
//! ├── nav: NavigationState          // position, page, bookmarks, settings
//! ├── status_message: String        // status bar text
//! ├── notice: NoticeSlot            // transient toast
//! └── should_quit: bool
//! ```
//!
//! State changes only happen through `update(state, action)` in action.rs.

use crate::core::navigation::NavigationState;
use crate::core::notice::NoticeSlot;

pub struct App {
    pub nav: NavigationState,
    pub status_message: String,
    pub notice: NoticeSlot,
    pub should_quit: bool,
}

impl App {
    pub fn new(nav: NavigationState) -> Self {
        Self {
            nav,
            status_message: String::new(),
            notice: NoticeSlot::new(),
            should_quit: false,
        }
    }

    /// True while a page fetch is in flight.
    pub fn is_loading(&self) -> bool {
        self.nav.pending_page().is_some()
    }
}
