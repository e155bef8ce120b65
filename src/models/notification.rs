//! Notification Model
//!
//! Expiry alerts generated for medical records. Entries are created only by
//! the expiry notifier and mutated only by marking them seen.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::medical_record::AlertStatus;

/// Days-to-expiration that trigger an alert
pub const THRESHOLD_DAYS: [i64; 3] = [7, 1, 0];

/// Check whether a day difference is one of the alert thresholds
pub fn is_threshold_day(days: i64) -> bool {
    THRESHOLD_DAYS.contains(&days)
}

/// Stored expiry alert
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationEntry {
    pub id: i64,
    pub user_id: String,

    /// Medical record the alert refers to
    pub record_id: i64,

    pub message: String,

    /// Calendar date the alert was raised on
    pub alert_date: NaiveDate,

    /// Threshold (7, 1 or 0 days) that produced the alert
    pub threshold_days: i64,

    pub seen: bool,
}

/// Identity of an alert for idempotent generation
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NotificationKey {
    pub record_id: i64,
    pub user_id: String,
    pub threshold_days: i64,
    pub alert_date: NaiveDate,
}

/// Alert to be inserted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewNotification {
    pub key: NotificationKey,
    pub message: String,
}

/// Notification as shown in the user's alert feed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedItem {
    pub id: i64,
    pub record_id: i64,
    pub message: String,
    pub alert_date: NaiveDate,
    pub seen: bool,

    /// Alert status of the referenced record
    pub record_alert: AlertStatus,
}

impl FeedItem {
    /// Whether this alert belongs in the feed on the given day
    pub fn is_pending_on(&self, today: NaiveDate) -> bool {
        self.alert_date <= today && self.record_alert == AlertStatus::Active && !self.seen
    }
}
