//! User-facing notifications.

use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{info, warn};

/// Sink for user-facing success and error messages.
pub trait Notifier: Send + Sync {
    fn display_success_notification(&self, message: &str);

    fn display_error_notification(&self, message: &str);
}

/// Notifier that routes messages into the tracing pipeline.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn display_success_notification(&self, message: &str) {
        info!(notification = "success", "{message}");
    }

    fn display_error_notification(&self, message: &str) {
        warn!(notification = "error", "{message}");
    }
}

/// Kind of a recorded notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Success,
    Error,
}

/// A notification captured by [`RecordingNotifier`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub kind: NotificationKind,
    pub message: String,
}

impl Notification {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: NotificationKind::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: NotificationKind::Error,
            message: message.into(),
        }
    }
}

/// Notifier that keeps every message in order. Clones share the log.
#[derive(Debug, Clone, Default)]
pub struct RecordingNotifier {
    log: Arc<Mutex<Vec<Notification>>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Notifications shown so far, oldest first.
    pub fn notifications(&self) -> Vec<Notification> {
        self.log.lock().clone()
    }

    pub fn last(&self) -> Option<Notification> {
        self.log.lock().last().cloned()
    }
}

impl Notifier for RecordingNotifier {
    fn display_success_notification(&self, message: &str) {
        self.log.lock().push(Notification::success(message));
    }

    fn display_error_notification(&self, message: &str) {
        self.log.lock().push(Notification::error(message));
    }
}
