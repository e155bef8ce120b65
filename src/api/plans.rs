//! Plans and checkout endpoints

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    response::Json,
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use tracing::{debug, info};

use crate::api::auth::CurrentUser;
use crate::error::AppResult;
use crate::models::membership::MembershipTier;
use crate::models::subscription::Subscription;
use crate::services::membership_service::MembershipService;

/// Checkout request body
#[derive(Debug, Deserialize)]
pub struct CheckoutRequest {
    pub membership_code: String,
}

/// List plans on sale
pub async fn list_plans(
    State(membership_service): State<Arc<MembershipService>>,
) -> AppResult<Json<Vec<MembershipTier>>> {
    debug!("GET /api/plans");
    Ok(Json(membership_service.active_plans().await?))
}

/// Start a checkout for a plan
pub async fn start_checkout(
    State(membership_service): State<Arc<MembershipService>>,
    user: CurrentUser,
    Json(request): Json<CheckoutRequest>,
) -> AppResult<Json<Subscription>> {
    debug!("POST /api/checkout - plan {}", request.membership_code);
    let subscription = membership_service
        .start_checkout(user.id(), &request.membership_code)
        .await?;
    info!(subscription_id = subscription.id, "Checkout started");
    Ok(Json(subscription))
}

/// Confirm a pending checkout
pub async fn confirm_checkout(
    State(membership_service): State<Arc<MembershipService>>,
    user: CurrentUser,
    Path(subscription_id): Path<i64>,
) -> AppResult<Json<Subscription>> {
    debug!("POST /api/checkout/{}/confirm", subscription_id);
    Ok(Json(
        membership_service
            .confirm_checkout(user.id(), subscription_id)
            .await?,
    ))
}

/// Create plans API router
pub fn create_router() -> Router<Arc<MembershipService>> {
    Router::new()
        .route("/api/plans", get(list_plans))
        .route("/api/checkout", post(start_checkout))
        .route("/api/checkout/:subscription_id/confirm", post(confirm_checkout))
}
