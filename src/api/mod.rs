//! API module for the pet care backend
//!
//! REST endpoints and router assembly. Each endpoint module owns a router
//! over the one service it calls; they are merged here.

pub mod auth;
pub mod documentation;
pub mod listings;
pub mod notifications;
pub mod pets;
pub mod plans;

use std::sync::Arc;

use axum::{
    http::{header, HeaderName, HeaderValue, Method},
    response::Json,
    routing::get,
    Router,
};
use chrono_tz::Tz;
use serde_json::{json, Value};
use tower::ServiceBuilder;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::warn;

use crate::database::DatabaseManager;
use crate::services::{
    DocumentationService, ExpiryNotifier, ListingService, MembershipService, NotificationService,
    PetService, QuotaService, TimeProvider,
};

pub use auth::{CurrentUser, USER_ID_HEADER};

/// Services shared by the HTTP handlers
#[derive(Debug, Clone)]
pub struct AppServices {
    pub pets: Arc<PetService>,
    pub documentation: Arc<DocumentationService>,
    pub notifications: Arc<NotificationService>,
    pub memberships: Arc<MembershipService>,
    pub listings: Arc<ListingService>,
}

impl AppServices {
    /// Wire every service over one store, one clock and the calendar timezone
    pub fn new(
        database_manager: Arc<DatabaseManager>,
        time_provider: Arc<dyn TimeProvider>,
        timezone: Tz,
    ) -> Self {
        let quota = QuotaService::new(database_manager.clone());
        let notifier = ExpiryNotifier::new(database_manager.clone());

        Self {
            pets: Arc::new(PetService::new(database_manager.clone(), quota.clone())),
            documentation: Arc::new(DocumentationService::new(
                database_manager.clone(),
                quota,
                notifier,
                time_provider.clone(),
                timezone,
            )),
            notifications: Arc::new(NotificationService::new(
                database_manager.clone(),
                time_provider,
                timezone,
            )),
            memberships: Arc::new(MembershipService::new(database_manager.clone())),
            listings: Arc::new(ListingService::new(database_manager)),
        }
    }
}

async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// Build the CORS layer; an empty origin list allows any origin
pub fn cors_layer(origins: &[String]) -> CorsLayer {
    let allow_origin = if origins.is_empty() {
        AllowOrigin::from(Any)
    } else {
        let parsed: Vec<HeaderValue> = origins
            .iter()
            .filter_map(|origin| match HeaderValue::from_str(origin) {
                Ok(value) => Some(value),
                Err(_) => {
                    warn!("Ignoring invalid CORS origin: {}", origin);
                    None
                }
            })
            .collect();
        AllowOrigin::list(parsed)
    };

    CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            HeaderName::from_static(USER_ID_HEADER),
        ])
        .allow_origin(allow_origin)
}

/// Assemble the full application router
pub fn create_app(services: AppServices, cors_origins: &[String]) -> Router {
    Router::new()
        .route("/api/health", get(health_check))
        .merge(plans::create_router().with_state(services.memberships))
        .merge(pets::create_router().with_state(services.pets))
        .merge(documentation::create_router().with_state(services.documentation))
        .merge(notifications::create_router().with_state(services.notifications))
        .merge(listings::create_router().with_state(services.listings))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors_layer(cors_origins)),
        )
}
