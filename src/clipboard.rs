//! Best-effort clipboard access and the text we put on it.
//!
//! Copying pipes the text into the platform's clipboard tool:
//! - macOS: `pbcopy`
//! - Linux: `xclip`, then `xsel`
//! - Windows: `clip`
//!
//! A terminal has no share sheet, so sharing always falls back to copying.

use std::fmt;
use std::io::{self, Write};
use std::process::{Command, Stdio};

use log::{debug, info};

use crate::core::model::{Ayah, Page, Settings};

#[derive(Debug)]
pub enum ClipboardError {
    /// No clipboard tool is known for this platform.
    Unsupported,
    /// None of the candidate tools could be started.
    Spawn { tool: &'static str, source: io::Error },
    Write { tool: &'static str, source: io::Error },
    /// The tool ran but reported failure.
    Failed { tool: &'static str },
}

impl fmt::Display for ClipboardError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClipboardError::Unsupported => write!(f, "clipboard not supported on this platform"),
            ClipboardError::Spawn { tool, source } => {
                write!(f, "failed to start {tool}: {source}")
            }
            ClipboardError::Write { tool, source } => {
                write!(f, "failed to write to {tool}: {source}")
            }
            ClipboardError::Failed { tool } => write!(f, "{tool} exited with error"),
        }
    }
}

impl std::error::Error for ClipboardError {}

/// What `share` ended up doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShareOutcome {
    Copied,
}

/// `"Surah 1 • Al-Fatihah — Ayah 2"`
pub fn ayah_reference(page: &Page, ayah: &Ayah) -> String {
    format!("{} — Ayah {}", page.surah_label(), ayah.ayah_number)
}

/// The reference, the English text, then whichever of Arabic and
/// transliteration are switched on, separated by blank lines.
pub fn ayah_copy_text(page: &Page, ayah: &Ayah, settings: &Settings) -> String {
    let mut parts = vec![ayah_reference(page, ayah), ayah.english.clone()];
    if settings.show_arabic {
        parts.push(ayah.arabic.clone());
    }
    if settings.show_transliteration {
        parts.push(ayah.transliteration.clone());
    }
    parts.retain(|p| !p.trim().is_empty());
    parts.join("\n\n")
}

/// Candidate tools in order of preference: (program, args).
#[cfg(target_os = "macos")]
const CANDIDATES: &[(&str, &[&str])] = &[("pbcopy", &[])];

#[cfg(target_os = "linux")]
const CANDIDATES: &[(&str, &[&str])] = &[
    ("xclip", &["-selection", "clipboard"]),
    ("xsel", &["--clipboard", "--input"]),
];

#[cfg(target_os = "windows")]
const CANDIDATES: &[(&str, &[&str])] = &[("clip", &[])];

#[cfg(not(any(target_os = "macos", target_os = "linux", target_os = "windows")))]
const CANDIDATES: &[(&str, &[&str])] = &[];

fn pipe_to(tool: &'static str, args: &[&str], text: &str) -> Result<(), ClipboardError> {
    let mut child = Command::new(tool)
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .map_err(|source| ClipboardError::Spawn { tool, source })?;

    // stdin is dropped at the end of the match so the tool sees EOF
    let written = match child.stdin.take() {
        Some(mut stdin) => stdin.write_all(text.as_bytes()),
        None => Ok(()),
    };
    if let Err(source) = written {
        let _ = child.kill();
        let _ = child.wait();
        return Err(ClipboardError::Write { tool, source });
    }

    let status = child
        .wait()
        .map_err(|source| ClipboardError::Write { tool, source })?;
    if status.success() {
        Ok(())
    } else {
        Err(ClipboardError::Failed { tool })
    }
}

/// Copies text to the system clipboard, trying each known tool in turn.
pub fn copy_to_clipboard(text: &str) -> Result<(), ClipboardError> {
    let mut last_error = ClipboardError::Unsupported;
    for &(tool, args) in CANDIDATES {
        match pipe_to(tool, args, text) {
            Ok(()) => {
                info!("Copied {} bytes with {}", text.len(), tool);
                return Ok(());
            }
            // only a missing tool moves on to the next candidate
            Err(e @ ClipboardError::Spawn { .. }) => {
                debug!("{}", e);
                last_error = e;
            }
            Err(e) => return Err(e),
        }
    }
    Err(last_error)
}

pub fn share(text: &str) -> Result<ShareOutcome, ClipboardError> {
    debug!("No share target in a terminal, copying instead");
    copy_to_clipboard(text).map(|()| ShareOutcome::Copied)
}
