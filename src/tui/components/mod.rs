//! # TUI Components
//!
//! ## Component Architecture
//!
//! ### Stateless Components (Props-Based Rendering)
//!
//! Display components that receive all data as struct fields:
//! - `TitleBar`: surah, juz/page location and status message
//! - `ControlBar`: progress gauge and key hints
//! - `Toast`: the current notification
//!
//! ### Stateful Components (Event-Driven)
//!
//! - `AyahCard` / `AyahCardState`: the current ayah, scrollable
//! - `JumpPrompt`: page-number entry, emits `JumpEvent`
//!
//! Each component file holds its state types, event types, rendering and
//! tests together.
//!
//! ```text
//! components/
//! ├── mod.rs           (this file)
//! ├── title_bar.rs
//! ├── ayah_card.rs
//! ├── controls.rs
//! ├── toast.rs
//! └── jump_prompt.rs
//! ```

mod ayah_card;
mod controls;
mod jump_prompt;
mod title_bar;
mod toast;

pub use ayah_card::{AyahCard, AyahCardState};
pub use controls::ControlBar;
pub use jump_prompt::{JumpEvent, JumpPrompt};
pub use title_bar::TitleBar;
pub use toast::Toast;
