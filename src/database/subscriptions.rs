//! Subscription queries

use std::str::FromStr;

use chrono::Utc;
use sqlx::{query, query_as};
use tracing::instrument;

use super::DatabaseManager;
use crate::error::{AppError, AppResult};
use crate::models::subscription::{Subscription, SubscriptionStatus};

#[derive(Debug, sqlx::FromRow)]
struct SubscriptionRow {
    id: i64,
    user_id: String,
    membership_code: String,
    status: String,
    provider: String,
    external_id: String,
    created_at: i64,
}

impl TryFrom<SubscriptionRow> for Subscription {
    type Error = AppError;

    fn try_from(row: SubscriptionRow) -> Result<Self, Self::Error> {
        let status = SubscriptionStatus::from_str(&row.status).map_err(|_| {
            AppError::Query(sqlx::Error::Decode(
                format!("unknown subscription status '{}'", row.status).into(),
            ))
        })?;

        Ok(Subscription {
            id: row.id,
            user_id: row.user_id,
            membership_code: row.membership_code,
            status,
            provider: row.provider,
            external_id: row.external_id,
            created_at: row.created_at,
        })
    }
}

impl DatabaseManager {
    /// Record a new pending subscription
    #[instrument(skip(self), level = "debug")]
    pub async fn insert_subscription(
        &self,
        user_id: &str,
        membership_code: &str,
        provider: &str,
        external_id: &str,
    ) -> AppResult<Subscription> {
        let created_at = Utc::now().timestamp();
        let status = SubscriptionStatus::Pending;

        let result = query(
            r#"
            INSERT INTO subscriptions
                (user_id, membership_code, status, provider, external_id, created_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(user_id)
        .bind(membership_code)
        .bind(status.to_string())
        .bind(provider)
        .bind(external_id)
        .bind(created_at)
        .execute(&self.pool)
        .await
        .map_err(AppError::write)?;

        Ok(Subscription {
            id: result.last_insert_rowid(),
            user_id: user_id.to_string(),
            membership_code: membership_code.to_string(),
            status,
            provider: provider.to_string(),
            external_id: external_id.to_string(),
            created_at,
        })
    }

    /// A subscription, only if it belongs to the given user
    #[instrument(skip(self), level = "debug")]
    pub async fn subscription(&self, user_id: &str, id: i64) -> AppResult<Option<Subscription>> {
        let row = query_as::<_, SubscriptionRow>(
            r#"
            SELECT id, user_id, membership_code, status, provider, external_id, created_at
            FROM subscriptions
            WHERE id = ? AND user_id = ?
            "#,
        )
        .bind(id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(AppError::Query)?;

        row.map(Subscription::try_from).transpose()
    }

    #[instrument(skip(self), level = "debug")]
    pub async fn set_subscription_status(&self, id: i64, status: SubscriptionStatus) -> AppResult<()> {
        query("UPDATE subscriptions SET status = ? WHERE id = ?")
            .bind(status.to_string())
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(AppError::write)?;

        Ok(())
    }
}
