//! Server-side account notifications.

use crate::core::store::Entity;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An announcement the server posts to an account until it is dismissed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountNotification {
    pub notification_id: u64,
    pub message: String,
    #[serde(default)]
    pub start_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub end_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub dismissed: bool,
}

impl Entity for AccountNotification {
    type Id = u64;

    fn id(&self) -> u64 {
        self.notification_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decodes_without_dates() {
        let notification: AccountNotification =
            serde_json::from_str(r#"{"notification_id":3,"message":"Maintenance tonight"}"#).unwrap();
        assert_eq!(notification.id(), 3);
        assert!(notification.start_date.is_none());
        assert!(!notification.dismissed);
    }

    #[test]
    fn test_decodes_rfc3339_window() {
        let notification: AccountNotification = serde_json::from_str(
            r#"{"notification_id":4,"message":"New release","start_date":"2025-03-01T00:00:00Z","end_date":"2025-03-08T00:00:00Z"}"#,
        )
        .unwrap();
        assert!(notification.start_date < notification.end_date);
    }
}
