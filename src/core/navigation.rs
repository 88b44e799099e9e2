//! # Navigation State
//!
//! The reading position inside the page → ayah hierarchy, kept consistent
//! with the page store and with the persisted snapshot.
//!
//! ```text
//!            begin(cmd)
//!   ┌──────────────┴───────────────┐
//!   ▼                              ▼
//! Applied(outcome)           Fetch(ticket) ──► PageStore::fetch_page
//! (local move, saved)                                 │
//!                                                     ▼
//!                               complete(ticket, result) ──► Outcome / NavError
//! ```
//!
//! Only one fetch may be in flight. Commands that arrive meanwhile are
//! dropped (`Begin::Busy`), and completions for any ticket other than the
//! in-flight one are ignored (`Outcome::Stale`).
//!
//! Every completed change to the position, the bookmarks or the settings
//! is written through to [`SessionPersistence`] before returning. A failed
//! write is kept for the caller (`take_persist_error`) and never undoes the
//! in-memory change.

use std::fmt;
use std::sync::Arc;

use log::{debug, info, warn};

use crate::core::model::{Ayah, Page, Position, Session, SettingName, Settings, Snapshot};
use crate::core::persist::{PersistError, SessionPersistence};
use crate::core::progress::{self, ProgressMode};
use crate::store::{PageStore, StoreError};

/// Page count used when the store cannot report one.
pub const FALLBACK_PAGE_COUNT: u32 = 604;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavCommand {
    StepForward,
    StepBackward,
    /// 1-based page number; any value is clamped into range.
    JumpTo(i64),
    /// Defaults, no bookmarks, page 1.
    Reset,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Landing {
    FirstAyah,
    LastAyah,
    Reset,
}

/// A page request handed out by [`NavigationState::begin`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchTicket {
    seq: u64,
    page_number: u32,
    landing: Landing,
}

impl FetchTicket {
    pub fn page_number(&self) -> u32 {
        self.page_number
    }

    /// True for the page-1 fetch that finishes a reset.
    pub fn is_reset(&self) -> bool {
        self.landing == Landing::Reset
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Begin {
    /// Handled locally; nothing to fetch.
    Applied(Outcome),
    /// Load this page, then call `complete`.
    Fetch(FetchTicket),
    /// Another fetch is in flight; the command was dropped.
    Busy,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The new position was applied and saved.
    Moved,
    /// Already at the boundary.
    Unchanged,
    /// The store has no such page; state unchanged.
    Missing { page_number: u32 },
    /// Dropped while another fetch was in flight.
    Dropped,
    /// Completion for a ticket that is no longer current.
    Stale,
}

#[derive(Debug)]
pub enum NavError {
    /// The store could not be reached or answered badly. State unchanged.
    Store(StoreError),
    /// Not even page 1 exists; there is nothing to read.
    NoPages,
}

impl fmt::Display for NavError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NavError::Store(e) => write!(f, "could not load page: {e}"),
            NavError::NoPages => write!(f, "the page store has no pages"),
        }
    }
}

impl std::error::Error for NavError {}

impl From<StoreError> for NavError {
    fn from(e: StoreError) -> Self {
        NavError::Store(e)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct NavOptions {
    pub progress_mode: ProgressMode,
    pub fallback_page_count: u32,
}

impl Default for NavOptions {
    fn default() -> Self {
        Self {
            progress_mode: ProgressMode::default(),
            fallback_page_count: FALLBACK_PAGE_COUNT,
        }
    }
}

pub struct NavigationState {
    store: Arc<dyn PageStore>,
    persistence: SessionPersistence,
    settings: Settings,
    session: Session,
    page: Page,
    total_pages: u32,
    progress_mode: ProgressMode,
    ayah_counts: Option<Vec<usize>>,
    in_flight: Option<FetchTicket>,
    next_seq: u64,
    persist_error: Option<PersistError>,
}

impl NavigationState {
    /// Restores the saved snapshot and loads its page.
    ///
    /// A missing or out-of-range saved position restarts at page 1, ayah 1.
    /// Fails only when the store is unreachable for the starting page or
    /// has no page 1.
    pub async fn open(
        store: Arc<dyn PageStore>,
        persistence: SessionPersistence,
        options: NavOptions,
    ) -> Result<Self, NavError> {
        let snapshot = persistence.load().unwrap_or_default();

        let total_pages = match store.fetch_page_count().await {
            Ok(count) if count > 0 => count,
            Ok(_) => {
                warn!(
                    "Store {} reported zero pages, using {}",
                    store.name(),
                    options.fallback_page_count
                );
                options.fallback_page_count
            }
            Err(e) => {
                warn!(
                    "Page count unavailable ({}), using {}",
                    e, options.fallback_page_count
                );
                options.fallback_page_count
            }
        }
        .max(1);

        let ayah_counts = match options.progress_mode {
            ProgressMode::Page => None,
            ProgressMode::Corpus => match store.ayah_counts().await {
                Ok(counts) => counts,
                Err(e) => {
                    warn!("Ayah counts unavailable: {}", e);
                    None
                }
            },
        };
        let progress_mode = match (options.progress_mode, &ayah_counts) {
            (ProgressMode::Corpus, None) => {
                warn!("Store {} cannot report corpus progress, using page progress", store.name());
                ProgressMode::Page
            }
            (mode, _) => mode,
        };

        let restored = snapshot.session.position();
        let (page, position) = load_start(store.as_ref(), restored, total_pages).await?;
        info!(
            "Opened at {} (page {} of {}, store {})",
            position,
            page.page_number,
            total_pages,
            store.name()
        );

        let mut session = snapshot.session;
        session.set_position(position);

        let mut state = Self {
            store,
            persistence,
            settings: snapshot.settings,
            session,
            page,
            total_pages,
            progress_mode,
            ayah_counts,
            in_flight: None,
            next_seq: 0,
            persist_error: None,
        };
        state.commit();
        Ok(state)
    }

    // ------------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------------

    pub fn store(&self) -> Arc<dyn PageStore> {
        Arc::clone(&self.store)
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn position(&self) -> Position {
        self.session.position()
    }

    pub fn page(&self) -> &Page {
        &self.page
    }

    pub fn current_ayah(&self) -> &Ayah {
        &self.page.ayat[self.session.ayah_index]
    }

    pub fn total_pages(&self) -> u32 {
        self.total_pages
    }

    pub fn progress_mode(&self) -> ProgressMode {
        self.progress_mode
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            settings: self.settings,
            session: self.session.clone(),
        }
    }

    pub fn is_bookmarked(&self) -> bool {
        self.session.bookmarks.contains(&self.session.position())
    }

    pub fn at_start(&self) -> bool {
        self.session.position() == Position::START
    }

    pub fn at_end(&self) -> bool {
        self.session.page_index + 1 >= self.total_pages as usize
            && self.session.ayah_index >= self.page.last_ayah_index()
    }

    /// The page currently being fetched, if any.
    pub fn pending_page(&self) -> Option<u32> {
        self.in_flight.map(|t| t.page_number)
    }

    /// Last persistence failure since the previous call.
    pub fn take_persist_error(&mut self) -> Option<PersistError> {
        self.persist_error.take()
    }

    /// Reading progress in `[0, 1]` for the configured mode.
    pub fn progress(&self) -> f64 {
        match (self.progress_mode, &self.ayah_counts) {
            (ProgressMode::Corpus, Some(counts)) => progress::across_corpus(
                self.session.page_index,
                self.session.ayah_index,
                counts,
            ),
            _ => progress::within_page(self.session.ayah_index, self.page.ayah_count()),
        }
    }

    // ------------------------------------------------------------------------
    // Two-phase navigation
    // ------------------------------------------------------------------------

    /// Starts a navigation command. Local moves are applied and saved here.
    pub fn begin(&mut self, command: NavCommand) -> Begin {
        if let Some(ticket) = self.in_flight {
            debug!(
                "Dropping {:?}: page {} still loading",
                command, ticket.page_number
            );
            return Begin::Busy;
        }

        let pos = self.session.position();
        match command {
            NavCommand::StepForward => {
                if pos.ayah_index < self.page.last_ayah_index() {
                    self.move_to(Position::new(pos.page_index, pos.ayah_index + 1));
                    Begin::Applied(Outcome::Moved)
                } else if pos.page_index + 1 < self.total_pages as usize {
                    self.request(pos.page_index as u32 + 2, Landing::FirstAyah)
                } else {
                    Begin::Applied(Outcome::Unchanged)
                }
            }
            NavCommand::StepBackward => {
                if pos.ayah_index > 0 {
                    self.move_to(Position::new(pos.page_index, pos.ayah_index - 1));
                    Begin::Applied(Outcome::Moved)
                } else if pos.page_index > 0 {
                    // page_index is the 1-based number of the previous page
                    self.request(pos.page_index as u32, Landing::LastAyah)
                } else {
                    Begin::Applied(Outcome::Unchanged)
                }
            }
            NavCommand::JumpTo(target) => {
                let page_number = target.clamp(1, self.total_pages as i64) as u32;
                self.request(page_number, Landing::FirstAyah)
            }
            NavCommand::Reset => {
                info!("Resetting session");
                if let Err(e) = self.persistence.clear() {
                    warn!("Failed to clear saved session: {}", e);
                    self.persist_error = Some(e);
                }
                self.settings = Settings::default();
                self.session.bookmarks.clear();
                self.request(1, Landing::Reset)
            }
        }
    }

    /// Finishes a fetch started by `begin`.
    ///
    /// A missing page or a store error leaves the position untouched.
    pub fn complete(
        &mut self,
        ticket: FetchTicket,
        fetched: Result<Option<Page>, StoreError>,
    ) -> Result<Outcome, NavError> {
        if self.in_flight != Some(ticket) {
            debug!("Ignoring stale completion for page {}", ticket.page_number);
            return Ok(Outcome::Stale);
        }
        self.in_flight = None;

        let page = match fetched {
            Ok(Some(page)) if !page.ayat.is_empty() => page,
            Ok(_) => {
                info!("Page {} is not available", ticket.page_number);
                self.finish_abandoned(ticket);
                return Ok(Outcome::Missing {
                    page_number: ticket.page_number,
                });
            }
            Err(e) => {
                warn!("Fetching page {} failed: {}", ticket.page_number, e);
                self.finish_abandoned(ticket);
                return Err(NavError::Store(e));
            }
        };

        let ayah_index = match ticket.landing {
            Landing::FirstAyah | Landing::Reset => 0,
            Landing::LastAyah => page.last_ayah_index(),
        };
        let position = Position::new(ticket.page_number as usize - 1, ayah_index);
        self.page = page;
        self.move_to(position);
        Ok(Outcome::Moved)
    }

    /// Runs a command to completion, fetching through the injected store.
    pub async fn execute(&mut self, command: NavCommand) -> Result<Outcome, NavError> {
        match self.begin(command) {
            Begin::Applied(outcome) => Ok(outcome),
            Begin::Busy => Ok(Outcome::Dropped),
            Begin::Fetch(ticket) => {
                let store = Arc::clone(&self.store);
                let fetched = store.fetch_page(ticket.page_number).await;
                self.complete(ticket, fetched)
            }
        }
    }

    pub async fn step_forward(&mut self) -> Result<Outcome, NavError> {
        self.execute(NavCommand::StepForward).await
    }

    pub async fn step_backward(&mut self) -> Result<Outcome, NavError> {
        self.execute(NavCommand::StepBackward).await
    }

    pub async fn jump_to_page(&mut self, page_number: i64) -> Result<Outcome, NavError> {
        self.execute(NavCommand::JumpTo(page_number)).await
    }

    pub async fn reset(&mut self) -> Result<Outcome, NavError> {
        self.execute(NavCommand::Reset).await
    }

    // ------------------------------------------------------------------------
    // Local mutations
    // ------------------------------------------------------------------------

    /// Adds or removes the current position. Returns true if now bookmarked.
    pub fn toggle_bookmark(&mut self) -> bool {
        let pos = self.session.position();
        let added = if self.session.bookmarks.remove(&pos) {
            false
        } else {
            self.session.bookmarks.insert(pos);
            true
        };
        debug!("Bookmark {} at {}", if added { "added" } else { "removed" }, pos);
        self.commit();
        added
    }

    pub fn toggle_setting(&mut self, name: SettingName) {
        self.settings.toggle(name);
        debug!("Settings now {:?}", self.settings);
        self.commit();
    }

    // ------------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------------

    fn request(&mut self, page_number: u32, landing: Landing) -> Begin {
        self.next_seq += 1;
        let ticket = FetchTicket {
            seq: self.next_seq,
            page_number,
            landing,
        };
        debug!("Requesting page {} ({:?})", page_number, landing);
        self.in_flight = Some(ticket);
        Begin::Fetch(ticket)
    }

    fn move_to(&mut self, position: Position) {
        self.session.set_position(position);
        self.commit();
    }

    /// A reset already changed settings and bookmarks, so those still get saved.
    fn finish_abandoned(&mut self, ticket: FetchTicket) {
        if ticket.landing == Landing::Reset {
            self.commit();
        }
    }

    fn commit(&mut self) {
        if let Err(e) = self.persistence.save(&self.snapshot()) {
            warn!("Failed to save session: {}", e);
            self.persist_error = Some(e);
        }
    }
}

/// Picks the starting page: the saved one if it is still valid, else page 1.
async fn load_start(
    store: &dyn PageStore,
    restored: Position,
    total_pages: u32,
) -> Result<(Page, Position), NavError> {
    if restored.page_index < total_pages as usize {
        match store.fetch_page(restored.page_index as u32 + 1).await? {
            Some(page) if restored.ayah_index < page.ayah_count() => {
                return Ok((page, restored));
            }
            Some(page) if restored.page_index == 0 && !page.ayat.is_empty() => {
                info!("Saved ayah {} is out of range, restarting", restored);
                return Ok((page, Position::START));
            }
            Some(_) => info!("Saved position {} is out of range, restarting", restored),
            None => warn!("Saved page {} no longer exists", restored.page_index + 1),
        }
    } else {
        info!(
            "Saved page index {} is beyond {} pages, restarting",
            restored.page_index, total_pages
        );
    }

    match store.fetch_page(1).await? {
        Some(page) if !page.ayat.is_empty() => Ok((page, Position::START)),
        _ => Err(NavError::NoPages),
    }
}
