//! Notification side-channel.
//!
//! Every settled sync operation emits exactly one notification. Delivery is
//! fire-and-forget; the channel only remembers the most recent emission.

use std::sync::Mutex;
use tokio::sync::watch;

/// Notification severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Success,
    Info,
    Warning,
    Error,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Success => write!(f, "success"),
            Severity::Info => write!(f, "info"),
            Severity::Warning => write!(f, "warning"),
            Severity::Error => write!(f, "error"),
        }
    }
}

/// A transient message for the UI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub message: String,
    pub severity: Severity,
}

impl Notification {
    pub fn new<S: Into<String>>(message: S, severity: Severity) -> Self {
        Self {
            message: message.into(),
            severity,
        }
    }

    pub fn success<S: Into<String>>(message: S) -> Self {
        Self::new(message, Severity::Success)
    }

    pub fn error<S: Into<String>>(message: S) -> Self {
        Self::new(message, Severity::Error)
    }
}

/// Receiver of notifications.
pub trait Notifier: Send + Sync {
    fn emit(&self, notification: Notification);
}

/// Latest-wins channel backed by `tokio::sync::watch`.
#[derive(Debug)]
pub struct NotificationChannel {
    sender: watch::Sender<Option<Notification>>,
}

impl NotificationChannel {
    pub fn new() -> Self {
        let (sender, _) = watch::channel(None);
        Self { sender }
    }

    /// Subscribe to future emissions.
    pub fn subscribe(&self) -> watch::Receiver<Option<Notification>> {
        self.sender.subscribe()
    }

    /// The most recent notification, if any.
    pub fn latest(&self) -> Option<Notification> {
        self.sender.borrow().clone()
    }

    /// Clear the banner.
    pub fn dismiss(&self) {
        self.sender.send_replace(None);
    }
}

impl Default for NotificationChannel {
    fn default() -> Self {
        Self::new()
    }
}

impl Notifier for NotificationChannel {
    fn emit(&self, notification: Notification) {
        tracing::debug!("notify [{}] {}", notification.severity, notification.message);
        // send_replace never fails, even with no receivers.
        self.sender.send_replace(Some(notification));
    }
}

/// Notifier that only writes to the log.
#[derive(Debug, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn emit(&self, notification: Notification) {
        match notification.severity {
            Severity::Error => tracing::error!("{}", notification.message),
            Severity::Warning => tracing::warn!("{}", notification.message),
            _ => tracing::info!("{}", notification.message),
        }
    }
}

/// Notifier that keeps every emission, for inspection in tests.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    emitted: Mutex<Vec<Notification>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn emitted(&self) -> Vec<Notification> {
        self.emitted
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    pub fn count(&self) -> usize {
        self.emitted.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn last(&self) -> Option<Notification> {
        self.emitted
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .last()
            .cloned()
    }
}

impl Notifier for RecordingNotifier {
    fn emit(&self, notification: Notification) {
        self.emitted
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(notification);
    }
}
