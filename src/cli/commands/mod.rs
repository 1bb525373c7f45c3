//! CLI command implementations.

pub mod announcements;
pub mod content;
pub mod profiles;
pub mod session;
pub mod views;

use crate::core::notification::{NotificationChannel, Severity};
use crate::core::persistence::FileStorage;
use crate::core::sync::SyncEngine;
use crate::models::config::Config;
use crate::services::HttpRemote;
use crate::{Error, Result};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::{Arc, Mutex};

/// Everything a command needs: configuration, the engine and its banner.
pub struct Context {
    pub config: Config,
    pub engine: SyncEngine,
    channel: Arc<NotificationChannel>,
    /// Error messages already printed as banners.
    shown_errors: Mutex<Vec<String>>,
}

impl Context {
    /// Build the engine over the HTTP remote and the on-disk cache, then restore snapshots.
    pub fn open(config: Config) -> Result<Self> {
        let remote = HttpRemote::new(config.api.clone())?;
        let channel = Arc::new(NotificationChannel::new());
        let engine = SyncEngine::new(
            Arc::new(remote),
            Box::new(FileStorage::new(&config.cache_dir)),
            channel.clone(),
        );
        engine.init();
        Ok(Self {
            config,
            engine,
            channel,
            shown_errors: Mutex::new(Vec::new()),
        })
    }

    pub fn account(&self) -> Result<&str> {
        self.config
            .account_id
            .as_deref()
            .ok_or(Error::AccountNotConfigured)
    }

    /// Print and dismiss the latest notification.
    pub fn show_notification(&self) {
        let Some(notification) = self.channel.latest() else {
            return;
        };
        let tag = match notification.severity {
            Severity::Success => "[OK]".green(),
            Severity::Info => "[INFO]".cyan(),
            Severity::Warning => "[WARN]".yellow(),
            Severity::Error => "[ERROR]".red(),
        };
        println!("{} {}", tag, notification.message);
        if notification.severity == Severity::Error {
            self.shown_errors
                .lock()
                .unwrap_or_else(|e| e.into_inner())
                .push(notification.message.clone());
        }
        self.channel.dismiss();

        if self.engine.is_degraded() {
            println!(
                "{} cache could not be saved to {}",
                "[WARN]".yellow(),
                self.config.cache_dir.display()
            );
        }
    }
}

impl Context {
    /// Print a failed operation's message unless its banner already did.
    pub fn report_failure(&self, error: &Error) {
        let shown = self.shown_errors.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(message) = unreported_message(error, &shown) {
            eprintln!("{} {}", "[ERROR]".red(), message);
        }
    }
}

/// A sync failure whose banner was overwritten by a later notification.
pub(crate) fn unreported_message<'a>(error: &'a Error, shown: &[String]) -> Option<&'a str> {
    match error.sync_message() {
        Some(message) if !shown.iter().any(|s| s == message) => Some(message),
        _ => None,
    }
}

/// Steady-ticking spinner for a remote call.
pub(crate) fn spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message(message.to_string());
    pb.enable_steady_tick(std::time::Duration::from_millis(100));
    pb
}

/// Run a future under a spinner, then show the resulting notification.
pub(crate) async fn with_spinner<T, F>(ctx: &Context, message: &str, future: F) -> Result<T>
where
    F: std::future::Future<Output = Result<T>>,
{
    let pb = spinner(message);
    let result = future.await;
    pb.finish_and_clear();
    ctx.show_notification();
    result
}

/// Shorten long text for table cells.
pub(crate) fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        text.to_string()
    } else {
        let cut: String = text.chars().take(width.saturating_sub(3)).collect();
        format!("{}...", cut)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::core::sync::Operation;

    fn shows_failure() -> Error {
        Error::Sync {
            operation: Operation::FetchShows,
            message: "Get Shows Failed".to_string(),
        }
    }

    #[test]
    fn test_failure_already_on_banner_is_not_repeated() {
        let err = shows_failure();
        let shown = vec!["Get Shows Failed".to_string(), "Get Movies Failed".to_string()];
        assert_eq!(unreported_message(&err, &shown), None);
    }

    #[test]
    fn test_overwritten_failure_is_reported() {
        let err = shows_failure();
        assert_eq!(unreported_message(&err, &[]), Some("Get Shows Failed"));
        assert_eq!(
            unreported_message(&err, &["Get Movies Failed".to_string()]),
            Some("Get Shows Failed")
        );
    }

    #[test]
    fn test_non_sync_errors_are_left_to_main() {
        assert_eq!(unreported_message(&Error::NoActiveProfile, &[]), None);
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("Severance", 20), "Severance");
        assert_eq!(truncate("The Lord of the Rings", 10), "The Lor...");
    }
}
