use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::location::{GeoPoint, InspectionPoint};
use crate::libraries::capture_gate::CheckOutcome;
use crate::services::verification::{UploadReceipt, VerificationSession};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateVerificationRequest {
    pub start: GeoPoint,
    pub end: GeoPoint,
}

/// Everything the map needs to draw a session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerificationSnapshot {
    pub id: Uuid,
    pub start: GeoPoint,
    pub end: GeoPoint,
    // [lat, lng] pairs for the polyline
    pub path: Vec<[f64; 2]>,
    pub points: Vec<InspectionPoint>,
    pub radius_m: f64,
    pub camera_unlocked: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unlocked_point: Option<u32>,
    pub verified_count: usize,
    pub complete: bool,
    pub created_at: DateTime<Utc>,
}

impl From<&VerificationSession> for VerificationSnapshot {
    fn from(session: &VerificationSession) -> Self {
        Self {
            id: session.id,
            start: session.start,
            end: session.end,
            path: session.path.to_lat_lng_pairs(),
            points: session.gate.points().to_vec(),
            radius_m: session.gate.radius_m(),
            camera_unlocked: session.gate.is_unlocked(),
            unlocked_point: session.gate.unlocked_point(),
            verified_count: session.gate.verified_count(),
            complete: session.gate.is_complete(),
            created_at: session.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckLocationResponse {
    pub outcome: CheckOutcome,
    pub status: String,
    pub camera_unlocked: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unlocked_point: Option<u32>,
}

impl CheckLocationResponse {
    pub fn new(outcome: CheckOutcome, unlocked_point: Option<u32>) -> Self {
        Self {
            status: outcome.status_message(),
            camera_unlocked: unlocked_point.is_some(),
            unlocked_point,
            outcome,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadPhotoRequest {
    pub file_name: String,
    #[serde(default = "default_content_type")]
    pub content_type: String,
    pub data_base64: String,
}

fn default_content_type() -> String {
    "image/jpeg".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadPhotoResponse {
    pub verified_point: u32,
    pub verified_count: usize,
    pub complete: bool,
    pub status: String,
}

impl From<UploadReceipt> for UploadPhotoResponse {
    fn from(receipt: UploadReceipt) -> Self {
        let status = if receipt.complete {
            "Photo saved. All inspection points verified.".to_string()
        } else {
            "Photo saved. Move to next point.".to_string()
        };
        Self {
            verified_point: receipt.point_id,
            verified_count: receipt.verified_count,
            complete: receipt.complete,
            status,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}
