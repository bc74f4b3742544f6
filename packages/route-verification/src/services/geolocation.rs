use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::models::GeoPoint;

/// Why a one-shot position request produced no position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
#[serde(rename_all = "snake_case")]
pub enum LocationError {
    #[error("Location error: please enable GPS and allow location access.")]
    PermissionDenied,

    #[error("Geolocation is not supported on this device.")]
    Unsupported,

    #[error("Location request timed out. Please try again.")]
    Timeout,

    #[error("Location unavailable. Please try again.")]
    Unavailable,
}

/// One-shot source of the device's current position
#[async_trait]
pub trait LocationProvider: Send + Sync {
    async fn current_position(&self) -> Result<GeoPoint, LocationError>;
}

/// Position (or failure) as reported by the client device
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PositionReport {
    Position {
        lat: f64,
        lng: f64,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        accuracy: Option<f64>,
    },
    Failed {
        error: LocationError,
    },
}

impl PositionReport {
    pub fn at(point: GeoPoint) -> Self {
        PositionReport::Position {
            lat: point.lat,
            lng: point.lng,
            accuracy: None,
        }
    }

    pub fn failed(error: LocationError) -> Self {
        PositionReport::Failed { error }
    }
}

#[async_trait]
impl LocationProvider for PositionReport {
    async fn current_position(&self) -> Result<GeoPoint, LocationError> {
        match self {
            PositionReport::Position { lat, lng, .. } => {
                let point = GeoPoint::new(*lat, *lng);
                if point.is_valid() {
                    Ok(point)
                } else {
                    Err(LocationError::Unavailable)
                }
            }
            PositionReport::Failed { error } => Err(*error),
        }
    }
}

/// Provider that always answers with the same position
#[derive(Debug, Clone, Copy)]
pub struct FixedLocation(pub GeoPoint);

#[async_trait]
impl LocationProvider for FixedLocation {
    async fn current_position(&self) -> Result<GeoPoint, LocationError> {
        Ok(self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_position_report() {
        let report: PositionReport =
            serde_json::from_str(r#"{"lat": 12.97, "lng": 77.59, "accuracy": 8.0}"#).unwrap();
        assert_eq!(
            report,
            PositionReport::Position {
                lat: 12.97,
                lng: 77.59,
                accuracy: Some(8.0)
            }
        );

        let report: PositionReport =
            serde_json::from_str(r#"{"error": "permission_denied"}"#).unwrap();
        assert_eq!(report, PositionReport::failed(LocationError::PermissionDenied));
    }

    #[tokio::test]
    async fn test_report_as_provider() {
        let point = GeoPoint::new(12.97, 77.59);
        assert_eq!(PositionReport::at(point).current_position().await, Ok(point));

        assert_eq!(
            PositionReport::failed(LocationError::Unsupported)
                .current_position()
                .await,
            Err(LocationError::Unsupported)
        );
    }

    #[tokio::test]
    async fn test_out_of_range_report_is_unavailable() {
        let report = PositionReport::at(GeoPoint::new(123.0, 77.59));
        assert_eq!(
            report.current_position().await,
            Err(LocationError::Unavailable)
        );
    }

    #[tokio::test]
    async fn test_fixed_location() {
        let point = GeoPoint::new(1.0, 2.0);
        assert_eq!(FixedLocation(point).current_position().await, Ok(point));
    }
}
