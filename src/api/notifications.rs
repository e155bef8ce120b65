//! Notification feed endpoints

use std::sync::Arc;

use axum::{
    extract::State,
    response::Json,
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::api::auth::CurrentUser;
use crate::error::AppResult;
use crate::models::notification::FeedItem;
use crate::services::notification_service::NotificationService;

#[derive(Debug, Deserialize)]
pub struct MarkSeenRequest {
    pub ids: Vec<i64>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MarkSeenResponse {
    pub updated: u64,
}

pub async fn feed(
    State(notification_service): State<Arc<NotificationService>>,
    user: CurrentUser,
) -> AppResult<Json<Vec<FeedItem>>> {
    debug!("GET /api/notifications");
    Ok(Json(notification_service.feed(user.id()).await?))
}

pub async fn mark_seen(
    State(notification_service): State<Arc<NotificationService>>,
    user: CurrentUser,
    Json(request): Json<MarkSeenRequest>,
) -> AppResult<Json<MarkSeenResponse>> {
    debug!("POST /api/notifications/seen - {} ids", request.ids.len());
    let updated = notification_service
        .mark_seen(user.id(), &request.ids)
        .await?;
    Ok(Json(MarkSeenResponse { updated }))
}

/// Create notifications API router
pub fn create_router() -> Router<Arc<NotificationService>> {
    Router::new()
        .route("/api/notifications", get(feed))
        .route("/api/notifications/seen", post(mark_seen))
}
