use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};
use uuid::Uuid;

use crate::libraries::capture_gate::{CaptureGate, CheckOutcome, GateError, DEFAULT_RADIUS_METERS};
use crate::libraries::route_sampling::{
    sample_inspection_points, RoutePath, DEFAULT_INSPECTION_POINTS,
};
use crate::models::GeoPoint;
use crate::services::geolocation::LocationProvider;
use crate::services::location::coarse_cell;
use crate::services::routing::RoutingProvider;
use crate::services::upload::{CapturedImage, UploadError, UploadSink};

#[derive(Debug, thiserror::Error)]
pub enum VerificationError {
    #[error("Invalid coordinates provided.")]
    InvalidCoordinates,

    #[error("Verification session {0} not found")]
    NotFound(Uuid),

    #[error(transparent)]
    Gate(#[from] GateError),

    #[error("Photo upload failed: {0}")]
    Upload(#[from] UploadError),
}

/// Tunables for point generation and the geofence
#[derive(Debug, Clone, Copy)]
pub struct VerificationSettings {
    pub inspection_points: usize,
    pub radius_m: f64,
}

impl Default for VerificationSettings {
    fn default() -> Self {
        Self {
            inspection_points: DEFAULT_INSPECTION_POINTS,
            radius_m: DEFAULT_RADIUS_METERS,
        }
    }
}

/// Route plus its inspection points, alive until the client tears it down
#[derive(Debug, Clone)]
pub struct VerificationSession {
    pub id: Uuid,
    pub start: GeoPoint,
    pub end: GeoPoint,
    pub path: RoutePath,
    pub gate: CaptureGate,
    pub created_at: DateTime<Utc>,
}

/// Outcome of a stored photo
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UploadReceipt {
    pub point_id: u32,
    pub verified_count: usize,
    pub complete: bool,
}

/// Map entry: creation time stays readable without locking the session
struct SessionSlot {
    created_at: DateTime<Utc>,
    session: Arc<Mutex<VerificationSession>>,
}

/// Service owning every live verification session.
///
/// The map lock is only held to look up or insert an entry. Work on a
/// session, including awaiting the upload sink, holds that session's own
/// mutex, so one slow session never stalls the others.
pub struct VerificationService {
    sessions: Arc<RwLock<HashMap<Uuid, SessionSlot>>>,
    routing: Arc<dyn RoutingProvider>,
    uploads: Arc<dyn UploadSink>,
    settings: VerificationSettings,
}

impl VerificationService {
    pub fn new(
        routing: Arc<dyn RoutingProvider>,
        uploads: Arc<dyn UploadSink>,
        settings: VerificationSettings,
    ) -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            routing,
            uploads,
            settings,
        }
    }

    /// Fetch the road between `start` and `end` and sample inspection points.
    ///
    /// Routing failures do not fail the call: the session is created with an
    /// empty path and no points.
    pub async fn create_session(
        &self,
        start: GeoPoint,
        end: GeoPoint,
    ) -> Result<VerificationSession, VerificationError> {
        if !start.is_valid() || !end.is_valid() {
            return Err(VerificationError::InvalidCoordinates);
        }

        let path = match self.routing.driving_route(start, end).await {
            Ok(Some(path)) => path,
            Ok(None) => {
                tracing::warn!("No route between {:?} and {:?}", start, end);
                RoutePath::default()
            }
            Err(e) => {
                tracing::warn!("Routing provider error: {}", e);
                RoutePath::default()
            }
        };

        let points = sample_inspection_points(
            &path,
            self.settings.inspection_points,
            &mut rand::thread_rng(),
        );

        let session = VerificationSession {
            id: Uuid::new_v4(),
            start,
            end,
            gate: CaptureGate::with_radius(points, self.settings.radius_m),
            path,
            created_at: Utc::now(),
        };

        tracing::info!(
            "Created verification session {} ({} vertices, {} points)",
            session.id,
            session.path.coordinates.len(),
            session.gate.points().len()
        );

        let slot = SessionSlot {
            created_at: session.created_at,
            session: Arc::new(Mutex::new(session.clone())),
        };
        self.sessions.write().await.insert(session.id, slot);
        Ok(session)
    }

    /// Handle on one session; the map lock is released before returning
    async fn session(
        &self,
        id: &Uuid,
    ) -> Result<Arc<Mutex<VerificationSession>>, VerificationError> {
        self.sessions
            .read()
            .await
            .get(id)
            .map(|slot| slot.session.clone())
            .ok_or(VerificationError::NotFound(*id))
    }

    pub async fn get(&self, id: &Uuid) -> Option<VerificationSession> {
        let session = self.session(id).await.ok()?;
        let snapshot = session.lock().await.clone();
        Some(snapshot)
    }

    /// Discard a session; its points are not persisted anywhere
    pub async fn remove(&self, id: &Uuid) -> bool {
        let removed = self.sessions.write().await.remove(id).is_some();
        if removed {
            tracing::debug!("Discarded verification session {}", id);
        }
        removed
    }

    /// Drop sessions created more than `max_age` ago. Returns how many went.
    pub async fn sweep_expired(&self, max_age: chrono::Duration) -> usize {
        let cutoff = Utc::now() - max_age;
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, slot| slot.created_at > cutoff);
        let swept = before - sessions.len();
        if swept > 0 {
            tracing::info!("Swept {} abandoned verification sessions", swept);
        }
        swept
    }

    /// Ask the provider for a position once and run the geofence check.
    pub async fn check_location(
        &self,
        id: &Uuid,
        provider: &dyn LocationProvider,
    ) -> Result<(CheckOutcome, Option<u32>), VerificationError> {
        let position = provider.current_position().await;

        let session = self.session(id).await?;
        let mut session = session.lock().await;

        let outcome = match position {
            Ok(position) => {
                let outcome = session.gate.check_location(&position);
                tracing::debug!(
                    "Location check for {} near {}: {:?}",
                    id,
                    coarse_cell(&position),
                    outcome
                );
                outcome
            }
            Err(e) => {
                tracing::warn!("Location unavailable for {}: {:?}", id, e);
                session.gate.location_failed(e)
            }
        };

        Ok((outcome, session.gate.unlocked_point()))
    }

    /// Hand a photo for the unlocked point to the upload sink.
    ///
    /// The point is marked verified only when the sink accepted the file; a
    /// failed upload leaves the camera unlocked for a retry.
    pub async fn upload(
        &self,
        id: &Uuid,
        file_name: String,
        content_type: String,
        bytes: Vec<u8>,
    ) -> Result<UploadReceipt, VerificationError> {
        let session = self.session(id).await?;
        let mut session = session.lock().await;

        let point_id = session.gate.unlocked_point().ok_or(GateError::Locked)?;
        let capture = CapturedImage::new(point_id, file_name, content_type, bytes);
        self.uploads.store(capture).await?;

        let point_id = session.gate.complete_capture()?;
        tracing::info!(
            "Point #{} of session {} verified ({}/{})",
            point_id + 1,
            id,
            session.gate.verified_count(),
            session.gate.points().len()
        );

        Ok(UploadReceipt {
            point_id,
            verified_count: session.gate.verified_count(),
            complete: session.gate.is_complete(),
        })
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }
}
