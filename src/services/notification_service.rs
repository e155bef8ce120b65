//! Notification Service
//!
//! The user's expiry alert feed. Alerts are only ever created by the expiry
//! notifier; the single mutation offered here is marking them seen.

use std::sync::Arc;

use chrono_tz::Tz;
use tracing::{debug, instrument};

use crate::database::DatabaseManager;
use crate::error::AppResult;
use crate::models::notification::FeedItem;
use crate::services::time_provider::TimeProvider;

#[derive(Clone)]
pub struct NotificationService {
    database_manager: Arc<DatabaseManager>,
    time_provider: Arc<dyn TimeProvider>,
    timezone: Tz,
}

impl std::fmt::Debug for NotificationService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NotificationService")
            .field("timezone", &self.timezone)
            .finish_non_exhaustive()
    }
}

impl NotificationService {
    pub fn new(
        database_manager: Arc<DatabaseManager>,
        time_provider: Arc<dyn TimeProvider>,
        timezone: Tz,
    ) -> Self {
        Self {
            database_manager,
            time_provider,
            timezone,
        }
    }

    /// Unseen alerts of active records raised up to today, oldest first
    #[instrument(skip(self))]
    pub async fn feed(&self, user_id: &str) -> AppResult<Vec<FeedItem>> {
        let today = self.time_provider.today_in(self.timezone);
        let items = self
            .database_manager
            .pending_notifications(user_id, today)
            .await?;
        debug!(user_id = %user_id, %today, count = items.len(), "Notification feed loaded");
        Ok(items)
    }

    /// Mark alerts as seen; returns how many changed
    #[instrument(skip(self))]
    pub async fn mark_seen(&self, user_id: &str, ids: &[i64]) -> AppResult<u64> {
        self.database_manager
            .mark_notifications_seen(user_id, ids)
            .await
    }
}
