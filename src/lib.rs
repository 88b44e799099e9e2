//! Mushaf library exports: the reading core, page stores, the bulk importer
//! and the terminal UI.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

pub mod clipboard;
pub mod core;
pub mod import;
pub mod store;
pub mod tui;

#[cfg(test)]
pub mod test_support;

/// Where pages come from.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PageSource {
    /// The HTTP page store.
    #[default]
    Remote,
    /// The built-in two-page dataset, no network needed.
    Demo,
}
