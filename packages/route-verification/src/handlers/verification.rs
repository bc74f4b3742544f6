use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use base64::{engine::general_purpose::STANDARD, Engine};
use std::sync::Arc;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::{
    libraries::capture_gate::GateError,
    models::{
        CheckLocationResponse, CreateVerificationRequest, ErrorResponse, UploadPhotoRequest,
        UploadPhotoResponse, VerificationSnapshot,
    },
    services::{
        geolocation::PositionReport,
        upload::UploadError,
        verification::{VerificationError, VerificationService},
    },
};

impl IntoResponse for VerificationError {
    fn into_response(self) -> Response {
        let status = match &self {
            VerificationError::InvalidCoordinates => StatusCode::BAD_REQUEST,
            VerificationError::NotFound(_) => StatusCode::NOT_FOUND,
            VerificationError::Gate(GateError::Locked) => StatusCode::CONFLICT,
            VerificationError::Gate(GateError::UnknownPoint(_)) => StatusCode::CONFLICT,
            VerificationError::Upload(UploadError::EmptyFile) => StatusCode::BAD_REQUEST,
            VerificationError::Upload(_) => StatusCode::BAD_GATEWAY,
        };

        (
            status,
            Json(ErrorResponse {
                error: self.to_string(),
            }),
        )
            .into_response()
    }
}

/// Fetch the road between two markers and generate inspection points
pub async fn create_verification(
    State(service): State<Arc<VerificationService>>,
    Json(request): Json<CreateVerificationRequest>,
) -> Result<(StatusCode, Json<VerificationSnapshot>), VerificationError> {
    let session = service.create_session(request.start, request.end).await?;
    Ok((StatusCode::CREATED, Json(VerificationSnapshot::from(&session))))
}

pub async fn get_verification(
    State(service): State<Arc<VerificationService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<VerificationSnapshot>, VerificationError> {
    let session = service
        .get(&id)
        .await
        .ok_or(VerificationError::NotFound(id))?;
    Ok(Json(VerificationSnapshot::from(&session)))
}

pub async fn delete_verification(
    State(service): State<Arc<VerificationService>>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, VerificationError> {
    if service.remove(&id).await {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(VerificationError::NotFound(id))
    }
}

/// Run the geofence check for a position reported by the device
pub async fn check_location(
    State(service): State<Arc<VerificationService>>,
    Path(id): Path<Uuid>,
    Json(report): Json<PositionReport>,
) -> Result<Json<CheckLocationResponse>, VerificationError> {
    let (outcome, unlocked) = service.check_location(&id, &report).await?;
    debug!("Check for {} -> {}", id, outcome.status_message());
    Ok(Json(CheckLocationResponse::new(outcome, unlocked)))
}

/// Store the photo for the currently unlocked point
pub async fn upload_photo(
    State(service): State<Arc<VerificationService>>,
    Path(id): Path<Uuid>,
    Json(request): Json<UploadPhotoRequest>,
) -> Response {
    let bytes = match STANDARD.decode(request.data_base64.as_bytes()) {
        Ok(bytes) => bytes,
        Err(e) => {
            warn!("Rejected upload for {}: bad base64 ({})", id, e);
            return (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse {
                    error: "Photo data is not valid base64".to_string(),
                }),
            )
                .into_response();
        }
    };

    match service
        .upload(&id, request.file_name, request.content_type, bytes)
        .await
    {
        Ok(receipt) => Json(UploadPhotoResponse::from(receipt)).into_response(),
        Err(e) => e.into_response(),
    }
}
