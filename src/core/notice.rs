//! Transient notification slot.
//!
//! Holds at most one message. Posting replaces whatever is showing; the UI
//! loop calls `expire` each tick to drop it once its time is up.

use std::time::{Duration, Instant};

/// How long a notification stays visible.
pub const NOTICE_TTL: Duration = Duration::from_millis(1600);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Info,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub message: String,
    pub tone: Tone,
    pub expires_at: Instant,
}

#[derive(Debug, Default)]
pub struct NoticeSlot {
    current: Option<Notification>,
}

impl NoticeSlot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn post(&mut self, message: impl Into<String>, tone: Tone, now: Instant) {
        self.current = Some(Notification {
            message: message.into(),
            tone,
            expires_at: now + NOTICE_TTL,
        });
    }

    pub fn info(&mut self, message: impl Into<String>) {
        self.post(message, Tone::Info, Instant::now());
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.post(message, Tone::Error, Instant::now());
    }

    /// Drops the notification if it has expired. Returns true if one was dropped.
    pub fn expire(&mut self, now: Instant) -> bool {
        match &self.current {
            Some(n) if now >= n.expires_at => {
                self.current = None;
                true
            }
            _ => false,
        }
    }

    pub fn current(&self) -> Option<&Notification> {
        self.current.as_ref()
    }

    pub fn is_active(&self) -> bool {
        self.current.is_some()
    }
}
