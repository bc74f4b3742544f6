//! Route verification for contractor site inspections.
//!
//! An official places start and end markers for a project; the service asks
//! a routing provider for the road between them and scatters inspection
//! points along it. A contractor then has to stand within the geofence of
//! each point before the camera unlocks for that point's photo.

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

pub mod config;
pub mod handlers;
pub mod libraries;
pub mod models;
pub mod services;

use handlers::{
    check_location, create_verification, delete_verification, get_verification, health,
    upload_photo,
};
use services::verification::VerificationService;

/// HTTP surface of the verification service
pub fn build_router(service: Arc<VerificationService>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/health", get(health))
        .route("/api/verifications", post(create_verification))
        .route(
            "/api/verifications/:id",
            get(get_verification).delete(delete_verification),
        )
        .route("/api/verifications/:id/check", post(check_location))
        .route("/api/verifications/:id/upload", post(upload_photo))
        .with_state(service)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}
