//! Pet endpoints

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
    routing::get,
    Router,
};
use tracing::debug;

use crate::api::auth::CurrentUser;
use crate::error::AppResult;
use crate::models::pet::{NewPet, Pet};
use crate::services::pet_service::PetService;
use crate::services::quota::QuotaDecision;

/// Pets of the caller
pub async fn list_pets(
    State(pet_service): State<Arc<PetService>>,
    user: CurrentUser,
) -> AppResult<Json<Vec<Pet>>> {
    debug!("GET /api/pets");
    Ok(Json(pet_service.list_pets(user.id()).await?))
}

/// Register a pet. Answers 409 with an upgrade path when the plan is full.
pub async fn create_pet(
    State(pet_service): State<Arc<PetService>>,
    user: CurrentUser,
    Json(new_pet): Json<NewPet>,
) -> AppResult<(StatusCode, Json<Pet>)> {
    debug!("POST /api/pets");
    let pet = pet_service.create_pet(user.id(), new_pet).await?;
    Ok((StatusCode::CREATED, Json(pet)))
}

pub async fn get_pet(
    State(pet_service): State<Arc<PetService>>,
    user: CurrentUser,
    Path(pet_id): Path<i64>,
) -> AppResult<Json<Pet>> {
    debug!("GET /api/pets/{}", pet_id);
    Ok(Json(pet_service.get_pet(user.id(), pet_id).await?))
}

/// Pet quota of the caller
pub async fn pet_quota(
    State(pet_service): State<Arc<PetService>>,
    user: CurrentUser,
) -> AppResult<Json<QuotaDecision>> {
    debug!("GET /api/quota");
    Ok(Json(pet_service.pet_quota(user.id()).await?))
}

/// Create pets API router
pub fn create_router() -> Router<Arc<PetService>> {
    Router::new()
        .route("/api/pets", get(list_pets).post(create_pet))
        .route("/api/pets/:pet_id", get(get_pet))
        .route("/api/quota", get(pet_quota))
}
