//! Transient, auto-dismissing notifications.
//!
//! Notifications stack; each one expires on its own three seconds after it
//! was shown.

use log::{info, warn};

pub const NOTIFICATION_TTL_MS: i64 = 3_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Info,
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub kind: NotificationKind,
    pub message: String,
    pub shown_at_ms: i64,
}

impl Notification {
    pub fn expires_at_ms(&self) -> i64 {
        self.shown_at_ms + NOTIFICATION_TTL_MS
    }

    pub fn is_visible(&self, now_ms: i64) -> bool {
        now_ms < self.expires_at_ms()
    }
}

/// Fire-and-forget message surface.
#[derive(Debug, Default, Clone)]
pub struct NotificationCenter {
    items: Vec<Notification>,
}

impl NotificationCenter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, kind: NotificationKind, message: impl Into<String>, now_ms: i64) {
        let message = message.into();
        match kind {
            NotificationKind::Error => {
                warn!("event=notify module=notify status=error message={message}")
            }
            NotificationKind::Info | NotificationKind::Success => {
                info!("event=notify module=notify status=ok message={message}")
            }
        }
        self.items.push(Notification {
            kind,
            message,
            shown_at_ms: now_ms,
        });
    }

    pub fn info(&mut self, message: impl Into<String>, now_ms: i64) {
        self.push(NotificationKind::Info, message, now_ms);
    }

    pub fn success(&mut self, message: impl Into<String>, now_ms: i64) {
        self.push(NotificationKind::Success, message, now_ms);
    }

    pub fn error(&mut self, message: impl Into<String>, now_ms: i64) {
        self.push(NotificationKind::Error, message, now_ms);
    }

    /// Notifications still on screen at `now_ms`, oldest first.
    pub fn visible(&self, now_ms: i64) -> Vec<&Notification> {
        self.items
            .iter()
            .filter(|item| item.is_visible(now_ms))
            .collect()
    }

    /// Drops expired notifications.
    pub fn prune(&mut self, now_ms: i64) {
        self.items.retain(|item| item.is_visible(now_ms));
    }

    /// Drains every notification regardless of expiry, for one-shot callers.
    pub fn drain(&mut self) -> Vec<Notification> {
        std::mem::take(&mut self.items)
    }

    pub fn last(&self) -> Option<&Notification> {
        self.items.last()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
