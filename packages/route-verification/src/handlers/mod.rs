pub mod verification;

use axum::{response::IntoResponse, Json};

pub use verification::{
    check_location, create_verification, delete_verification, get_verification, upload_photo,
};

pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "route-verification",
        "version": env!("CARGO_PKG_VERSION")
    }))
}
