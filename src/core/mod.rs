//! # Core Application Logic
//!
//! The reader's business logic. It knows nothing about any specific UI
//! technology.
//!
//! ```text
//!                    ┌─────────────────────────┐
//!                    │         CORE            │
//!                    │  (this module)          │
//!                    │                         │
//!                    │  • Navigation (state)   │
//!                    │  • Action (events)      │
//!                    │  • update() (reducer)   │
//!                    │  • Persistence          │
//!                    └───────────┬─────────────┘
//!                                │
//!            ┌───────────────────┴───────────────────┐
//!            ▼                                       ▼
//!     ┌────────────┐                          ┌────────────┐
//!     │    TUI     │                          │ PageStore  │
//!     │  Adapter   │                          │ (remote or │
//!     │ (ratatui)  │                          │   demo)    │
//!     └────────────┘                          └────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`model`]: Page, Ayah, Settings, Position and the persisted Snapshot
//! - [`navigation`]: `NavigationState`, the page/ayah state machine
//! - [`persist`]: session persistence over a key-value store
//! - [`progress`]: named progress formulas
//! - [`state`]: The `App` struct, all application state in one place
//! - [`action`]: The `Action` enum and the `update()` reducer
//! - [`notice`]: the transient notification slot
//! - [`config`]: `~/.mushaf/config.toml` loading and resolution

pub mod action;
pub mod config;
pub mod model;
pub mod navigation;
pub mod notice;
pub mod persist;
pub mod progress;
pub mod state;
