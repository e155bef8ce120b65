//! Notification queries

use std::str::FromStr;

use chrono::{NaiveDate, Utc};
use sqlx::{query, query_as, QueryBuilder, Sqlite};
use tracing::instrument;

use super::DatabaseManager;
use crate::error::{AppError, AppResult};
use crate::models::medical_record::AlertStatus;
use crate::models::notification::{FeedItem, NewNotification, NotificationEntry};

#[derive(Debug, sqlx::FromRow)]
struct NotificationRow {
    id: i64,
    user_id: String,
    record_id: i64,
    message: String,
    alert_date: NaiveDate,
    threshold_days: i64,
    seen: bool,
}

impl From<NotificationRow> for NotificationEntry {
    fn from(row: NotificationRow) -> Self {
        NotificationEntry {
            id: row.id,
            user_id: row.user_id,
            record_id: row.record_id,
            message: row.message,
            alert_date: row.alert_date,
            threshold_days: row.threshold_days,
            seen: row.seen,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct FeedRow {
    id: i64,
    record_id: i64,
    message: String,
    alert_date: NaiveDate,
    seen: bool,
    record_alert: String,
}

impl From<FeedRow> for FeedItem {
    fn from(row: FeedRow) -> Self {
        FeedItem {
            id: row.id,
            record_id: row.record_id,
            message: row.message,
            alert_date: row.alert_date,
            seen: row.seen,
            record_alert: AlertStatus::from_str(&row.record_alert).unwrap_or_default(),
        }
    }
}

impl DatabaseManager {
    /// Existing alert for the same record and user that shares either the
    /// threshold and alert date or the exact message
    #[instrument(skip(self, notification), level = "debug")]
    pub async fn find_notification(&self, notification: &NewNotification) -> AppResult<Option<NotificationEntry>> {
        let key = &notification.key;
        let row = query_as::<_, NotificationRow>(
            r#"
            SELECT id, user_id, record_id, message, alert_date, threshold_days, seen
            FROM notifications
            WHERE record_id = ? AND user_id = ?
              AND ((threshold_days = ? AND alert_date = ?) OR message = ?)
            ORDER BY id ASC
            LIMIT 1
            "#,
        )
        .bind(key.record_id)
        .bind(&key.user_id)
        .bind(key.threshold_days)
        .bind(key.alert_date)
        .bind(&notification.message)
        .fetch_optional(&self.pool)
        .await
        .map_err(AppError::Query)?;

        Ok(row.map(NotificationEntry::from))
    }

    /// Insert an unseen alert. Returns false when an alert with the same key
    /// or the same message already exists for the record.
    #[instrument(skip(self, notification), level = "debug")]
    pub async fn insert_notification(&self, notification: &NewNotification) -> AppResult<bool> {
        let key = &notification.key;
        let result = query(
            r#"
            INSERT INTO notifications
                (user_id, record_id, message, alert_date, threshold_days, seen, created_at)
            VALUES (?, ?, ?, ?, ?, FALSE, ?)
            ON CONFLICT DO NOTHING
            "#,
        )
        .bind(&key.user_id)
        .bind(key.record_id)
        .bind(&notification.message)
        .bind(key.alert_date)
        .bind(key.threshold_days)
        .bind(Utc::now().timestamp())
        .execute(&self.pool)
        .await
        .map_err(AppError::write)?;

        Ok(result.rows_affected() > 0)
    }

    /// Unseen alerts of active records raised on or before `today`, oldest first
    #[instrument(skip(self), level = "debug")]
    pub async fn pending_notifications(&self, user_id: &str, today: NaiveDate) -> AppResult<Vec<FeedItem>> {
        let rows = query_as::<_, FeedRow>(
            r#"
            SELECT n.id, n.record_id, n.message, n.alert_date, n.seen, r.alert AS record_alert
            FROM notifications n
            JOIN medical_records r ON r.id = n.record_id
            WHERE n.user_id = ?
              AND n.alert_date <= ?
              AND n.seen = FALSE
              AND r.alert = 'Activo'
            ORDER BY n.alert_date ASC, n.id ASC
            "#,
        )
        .bind(user_id)
        .bind(today)
        .fetch_all(&self.pool)
        .await
        .map_err(AppError::Query)?;

        Ok(rows.into_iter().map(FeedItem::from).collect())
    }

    /// All alerts stored for a record
    #[instrument(skip(self), level = "debug")]
    pub async fn notifications_for_record(&self, user_id: &str, record_id: i64) -> AppResult<Vec<NotificationEntry>> {
        let rows = query_as::<_, NotificationRow>(
            r#"
            SELECT id, user_id, record_id, message, alert_date, threshold_days, seen
            FROM notifications
            WHERE user_id = ? AND record_id = ?
            ORDER BY alert_date ASC, id ASC
            "#,
        )
        .bind(user_id)
        .bind(record_id)
        .fetch_all(&self.pool)
        .await
        .map_err(AppError::Query)?;

        Ok(rows.into_iter().map(NotificationEntry::from).collect())
    }

    /// Flag the given alerts of a user as seen. Ids of other users are left untouched.
    #[instrument(skip(self), level = "debug")]
    pub async fn mark_notifications_seen(&self, user_id: &str, ids: &[i64]) -> AppResult<u64> {
        if ids.is_empty() {
            return Ok(0);
        }

        let mut builder: QueryBuilder<Sqlite> =
            QueryBuilder::new("UPDATE notifications SET seen = TRUE WHERE user_id = ");
        builder.push_bind(user_id);
        builder.push(" AND id IN (");
        let mut separated = builder.separated(", ");
        for id in ids {
            separated.push_bind(*id);
        }
        separated.push_unseparated(")");

        let result = builder
            .build()
            .execute(&self.pool)
            .await
            .map_err(AppError::write)?;

        Ok(result.rows_affected())
    }
}
