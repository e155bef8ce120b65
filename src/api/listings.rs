//! Vet directory and event endpoints

use std::sync::Arc;

use axum::{extract::State, response::Json, routing::get, Router};
use tracing::debug;

use crate::error::AppResult;
use crate::models::event::Event;
use crate::models::vet::Vet;
use crate::services::listing_service::ListingService;

/// 24-hour clinics
pub async fn list_vets(
    State(listing_service): State<Arc<ListingService>>,
) -> AppResult<Json<Vec<Vet>>> {
    debug!("GET /api/vets");
    Ok(Json(listing_service.vets().await?))
}

/// Upcoming events with their venues
pub async fn list_events(
    State(listing_service): State<Arc<ListingService>>,
) -> AppResult<Json<Vec<Event>>> {
    debug!("GET /api/events");
    Ok(Json(listing_service.events().await?))
}

/// Create listings API router
pub fn create_router() -> Router<Arc<ListingService>> {
    Router::new()
        .route("/api/vets", get(list_vets))
        .route("/api/events", get(list_events))
}
