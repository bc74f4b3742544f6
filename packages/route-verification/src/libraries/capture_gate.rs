use serde::{Deserialize, Serialize};

use crate::models::{GeoPoint, InspectionPoint};
use crate::services::geolocation::LocationError;

/// Radius around an inspection point inside which capture unlocks (meters)
pub const DEFAULT_RADIUS_METERS: f64 = 50.0;

/// Result of a single location check against the inspection points
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CheckOutcome {
    /// Nearest pending point in range; capture is now bound to it
    Unlocked { point_id: u32, distance_m: f64 },
    /// Only verified points are in range
    AlreadyVerified { point_id: u32, distance_m: f64 },
    /// Nothing within the radius
    TooFar { radius_m: f64 },
    /// The device could not produce a position for this check
    LocationUnavailable { error: LocationError },
}

impl CheckOutcome {
    /// Short status line shown next to the "Check my location" button
    pub fn status_message(&self) -> String {
        match self {
            CheckOutcome::Unlocked {
                point_id,
                distance_m,
            } => format!(
                "Near point #{} ({}m away). Camera unlocked.",
                point_id + 1,
                distance_m.round()
            ),
            CheckOutcome::AlreadyVerified { point_id, .. } => format!(
                "You are at point #{}, but it is already verified. Move to the next one.",
                point_id + 1
            ),
            CheckOutcome::TooFar { radius_m } => format!(
                "Not near any pending inspection point (must be within {}m).",
                radius_m.round()
            ),
            CheckOutcome::LocationUnavailable { error } => error.to_string(),
        }
    }

    pub fn is_unlocked(&self) -> bool {
        matches!(self, CheckOutcome::Unlocked { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GateError {
    #[error("Camera is locked. Check your location near a pending point first.")]
    Locked,

    #[error("Inspection point #{0} does not exist on this route.")]
    UnknownPoint(u32),
}

/// Geofence state machine guarding photo capture.
///
/// At most one point is unlocked at a time. Completing a capture marks the
/// point verified and locks the gate again, so every photo needs a fresh
/// location check.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaptureGate {
    points: Vec<InspectionPoint>,
    radius_m: f64,
    unlocked: Option<u32>,
}

impl CaptureGate {
    pub fn new(points: Vec<InspectionPoint>) -> Self {
        Self::with_radius(points, DEFAULT_RADIUS_METERS)
    }

    pub fn with_radius(points: Vec<InspectionPoint>, radius_m: f64) -> Self {
        Self {
            points,
            radius_m,
            unlocked: None,
        }
    }

    pub fn points(&self) -> &[InspectionPoint] {
        &self.points
    }

    pub fn radius_m(&self) -> f64 {
        self.radius_m
    }

    /// Point id the camera is currently bound to
    pub fn unlocked_point(&self) -> Option<u32> {
        self.unlocked
    }

    pub fn is_unlocked(&self) -> bool {
        self.unlocked.is_some()
    }

    /// True once every point has photo proof. An empty gate is never complete.
    pub fn is_complete(&self) -> bool {
        !self.points.is_empty() && self.points.iter().all(|p| p.verified)
    }

    pub fn verified_count(&self) -> usize {
        self.points.iter().filter(|p| p.verified).count()
    }

    /// Compare a live position against every point and update the lock.
    pub fn check_location(&mut self, position: &GeoPoint) -> CheckOutcome {
        let mut in_range: Vec<(&InspectionPoint, f64)> = self
            .points
            .iter()
            .map(|p| (p, position.distance_to(&p.position())))
            .filter(|(_, distance)| *distance <= self.radius_m)
            .collect();
        in_range.sort_by(|a, b| a.1.total_cmp(&b.1));

        let actionable = in_range.iter().find(|(p, _)| !p.verified);
        let outcome = match actionable {
            Some((point, distance)) => CheckOutcome::Unlocked {
                point_id: point.id,
                distance_m: *distance,
            },
            None => match in_range.first() {
                Some((point, distance)) => CheckOutcome::AlreadyVerified {
                    point_id: point.id,
                    distance_m: *distance,
                },
                None => CheckOutcome::TooFar {
                    radius_m: self.radius_m,
                },
            },
        };

        self.unlocked = match &outcome {
            CheckOutcome::Unlocked { point_id, .. } => Some(*point_id),
            _ => None,
        };

        outcome
    }

    /// Record a failed position request. The lock state is left as it was.
    pub fn location_failed(&self, error: LocationError) -> CheckOutcome {
        CheckOutcome::LocationUnavailable { error }
    }

    /// Mark the unlocked point verified after its photo was stored.
    pub fn complete_capture(&mut self) -> Result<u32, GateError> {
        let point_id = self.unlocked.ok_or(GateError::Locked)?;
        let point = self
            .points
            .iter_mut()
            .find(|p| p.id == point_id)
            .ok_or(GateError::UnknownPoint(point_id))?;

        point.verified = true;
        self.unlocked = None;
        Ok(point_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Points ~220m apart along a meridian, so their 50m fences never overlap
    fn gate() -> CaptureGate {
        CaptureGate::new(vec![
            InspectionPoint::new(0, GeoPoint::new(12.970, 77.590)),
            InspectionPoint::new(1, GeoPoint::new(12.972, 77.590)),
            InspectionPoint::new(2, GeoPoint::new(12.974, 77.590)),
            InspectionPoint::new(3, GeoPoint::new(12.976, 77.590)),
        ])
    }

    #[test]
    fn test_unlocks_nearest_pending_point() {
        let mut gate = gate();
        // ~11m north of point 1
        let outcome = gate.check_location(&GeoPoint::new(12.9721, 77.590));

        match outcome {
            CheckOutcome::Unlocked {
                point_id,
                distance_m,
            } => {
                assert_eq!(point_id, 1);
                assert!(distance_m < 15.0);
            }
            other => panic!("expected unlock, got {:?}", other),
        }
        assert_eq!(gate.unlocked_point(), Some(1));
    }

    #[test]
    fn test_too_far_keeps_camera_locked() {
        let mut gate = gate();
        let outcome = gate.check_location(&GeoPoint::new(12.990, 77.590));

        assert_eq!(outcome, CheckOutcome::TooFar { radius_m: 50.0 });
        assert!(!gate.is_unlocked());
        assert_eq!(
            outcome.status_message(),
            "Not near any pending inspection point (must be within 50m)."
        );
    }

    #[test]
    fn test_boundary_is_inclusive() {
        let target = GeoPoint::new(12.970, 77.590);
        let just_inside = GeoPoint::new(12.97044, 77.590); // ~48.9m
        let just_outside = GeoPoint::new(12.97046, 77.590); // ~51.1m
        let mut gate = CaptureGate::new(vec![InspectionPoint::new(0, target)]);

        assert!(target.distance_to(&just_inside) <= 50.0);
        assert!(gate.check_location(&just_inside).is_unlocked());

        assert!(target.distance_to(&just_outside) > 50.0);
        assert!(!gate.check_location(&just_outside).is_unlocked());
    }

    #[test]
    fn test_completed_point_is_never_actionable_again() {
        let mut gate = gate();
        let at_point = GeoPoint::new(12.972, 77.590);

        assert!(gate.check_location(&at_point).is_unlocked());
        assert_eq!(gate.complete_capture(), Ok(1));
        assert!(!gate.is_unlocked());
        assert!(gate.points()[1].verified);

        let outcome = gate.check_location(&at_point);
        assert!(matches!(
            outcome,
            CheckOutcome::AlreadyVerified { point_id: 1, .. }
        ));
        assert!(!gate.is_unlocked());
        assert_eq!(
            outcome.status_message(),
            "You are at point #2, but it is already verified. Move to the next one."
        );
    }

    #[test]
    fn test_pending_point_wins_over_closer_verified_point() {
        let mut gate = CaptureGate::new(vec![
            InspectionPoint::new(0, GeoPoint::new(12.9700, 77.590)),
            InspectionPoint::new(1, GeoPoint::new(12.9702, 77.590)),
        ]);
        let standing = GeoPoint::new(12.97001, 77.590);

        assert!(matches!(
            gate.check_location(&standing),
            CheckOutcome::Unlocked { point_id: 0, .. }
        ));
        gate.complete_capture().unwrap();

        // Point 0 is closer but done; point 1 (~21m) is still in range
        assert!(matches!(
            gate.check_location(&standing),
            CheckOutcome::Unlocked { point_id: 1, .. }
        ));
    }

    #[test]
    fn test_only_one_point_unlocked_at_a_time() {
        let mut gate = gate();

        gate.check_location(&GeoPoint::new(12.970, 77.590));
        assert_eq!(gate.unlocked_point(), Some(0));

        gate.check_location(&GeoPoint::new(12.974, 77.590));
        assert_eq!(gate.unlocked_point(), Some(2));

        gate.check_location(&GeoPoint::new(13.5, 77.590));
        assert_eq!(gate.unlocked_point(), None);
    }

    #[test]
    fn test_capture_requires_unlock() {
        let mut gate = gate();
        assert_eq!(gate.complete_capture(), Err(GateError::Locked));

        gate.check_location(&GeoPoint::new(12.970, 77.590));
        gate.complete_capture().unwrap();
        // Locked again until the next check
        assert_eq!(gate.complete_capture(), Err(GateError::Locked));
    }

    #[test]
    fn test_location_failure_leaves_lock_untouched() {
        let mut gate = gate();
        gate.check_location(&GeoPoint::new(12.970, 77.590));

        let outcome = gate.location_failed(LocationError::PermissionDenied);
        assert!(!outcome.is_unlocked());
        assert_eq!(gate.unlocked_point(), Some(0));
        assert_eq!(
            outcome.status_message(),
            LocationError::PermissionDenied.to_string()
        );
    }

    #[test]
    fn test_completion_tracking() {
        let mut gate = gate();
        assert!(!gate.is_complete());
        assert!(!CaptureGate::new(Vec::new()).is_complete());

        for lat in [12.970, 12.972, 12.974, 12.976] {
            assert!(gate.check_location(&GeoPoint::new(lat, 77.590)).is_unlocked());
            gate.complete_capture().unwrap();
        }

        assert_eq!(gate.verified_count(), 4);
        assert!(gate.is_complete());
    }

    #[test]
    fn test_unlocked_status_message() {
        let outcome = CheckOutcome::Unlocked {
            point_id: 2,
            distance_m: 12.4,
        };
        assert_eq!(
            outcome.status_message(),
            "Near point #3 (12m away). Camera unlocked."
        );
    }
}
