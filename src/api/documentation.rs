//! Documentation endpoints
//!
//! Loading a pet's documentation also raises the expiry alerts due today.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
    routing::{get, put},
    Router,
};
use tracing::debug;

use crate::api::auth::CurrentUser;
use crate::error::AppResult;
use crate::models::medical_record::{MedicalRecord, RecordDraft};
use crate::services::documentation_service::{
    DocumentationOptions, DocumentationService, DocumentationView,
};

pub async fn load_documentation(
    State(documentation_service): State<Arc<DocumentationService>>,
    user: CurrentUser,
    Path(pet_id): Path<i64>,
) -> AppResult<Json<DocumentationView>> {
    debug!("GET /api/pets/{}/documentation", pet_id);
    Ok(Json(documentation_service.load_for_pet(user.id(), pet_id).await?))
}

pub async fn create_record(
    State(documentation_service): State<Arc<DocumentationService>>,
    user: CurrentUser,
    Path(pet_id): Path<i64>,
    Json(draft): Json<RecordDraft>,
) -> AppResult<(StatusCode, Json<MedicalRecord>)> {
    debug!("POST /api/pets/{}/documentation", pet_id);
    let record = documentation_service
        .create_record(user.id(), pet_id, draft)
        .await?;
    Ok((StatusCode::CREATED, Json(record)))
}

pub async fn documentation_options(
    State(documentation_service): State<Arc<DocumentationService>>,
    user: CurrentUser,
    Path(pet_id): Path<i64>,
) -> AppResult<Json<DocumentationOptions>> {
    debug!("GET /api/pets/{}/documentation/options", pet_id);
    Ok(Json(
        documentation_service
            .vaccine_options(user.id(), pet_id)
            .await?,
    ))
}

pub async fn update_record(
    State(documentation_service): State<Arc<DocumentationService>>,
    user: CurrentUser,
    Path(record_id): Path<i64>,
    Json(draft): Json<RecordDraft>,
) -> AppResult<Json<MedicalRecord>> {
    debug!("PUT /api/documentation/{}", record_id);
    Ok(Json(
        documentation_service
            .update_record(user.id(), record_id, draft)
            .await?,
    ))
}

pub async fn delete_record(
    State(documentation_service): State<Arc<DocumentationService>>,
    user: CurrentUser,
    Path(record_id): Path<i64>,
) -> AppResult<StatusCode> {
    debug!("DELETE /api/documentation/{}", record_id);
    documentation_service
        .delete_record(user.id(), record_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Create documentation API router
pub fn create_router() -> Router<Arc<DocumentationService>> {
    Router::new()
        .route(
            "/api/pets/:pet_id/documentation",
            get(load_documentation).post(create_record),
        )
        .route(
            "/api/pets/:pet_id/documentation/options",
            get(documentation_options),
        )
        .route(
            "/api/documentation/:record_id",
            put(update_record).delete(delete_record),
        )
}
