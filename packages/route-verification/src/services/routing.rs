use async_trait::async_trait;
use serde::Deserialize;
use std::error::Error;
use std::time::Duration;

use crate::libraries::route_sampling::RoutePath;
use crate::models::GeoPoint;

#[derive(Debug, thiserror::Error)]
pub enum RoutingError {
    #[error("Failed to build HTTP client: {0}")]
    Client(String),

    #[error("Routing request failed: {0}")]
    Request(String),

    #[error("Routing provider returned HTTP {0}")]
    Status(u16),

    #[error("Failed to parse routing response: {0}")]
    Parse(String),
}

/// Source of road geometry between two coordinates
#[async_trait]
pub trait RoutingProvider: Send + Sync {
    /// Driving path from `start` to `end`; `Ok(None)` when no route exists
    async fn driving_route(
        &self,
        start: GeoPoint,
        end: GeoPoint,
    ) -> Result<Option<RoutePath>, RoutingError>;
}

/// OSRM route response structure (only the parts we read)
#[derive(Debug, Deserialize)]
struct OsrmResponse {
    #[serde(default)]
    routes: Vec<OsrmRoute>,
}

#[derive(Debug, Deserialize)]
struct OsrmRoute {
    geometry: OsrmGeometry,
}

/// GeoJSON LineString, coordinates as [lng, lat]
#[derive(Debug, Deserialize)]
struct OsrmGeometry {
    coordinates: Vec<[f64; 2]>,
}

/// Parse an OSRM `route` body with `geometries=geojson`
pub fn parse_osrm_response(body: &str) -> Result<Option<RoutePath>, RoutingError> {
    let data: OsrmResponse =
        serde_json::from_str(body).map_err(|e| RoutingError::Parse(e.to_string()))?;

    Ok(data.routes.into_iter().next().map(|route| {
        RoutePath::new(
            route
                .geometry
                .coordinates
                .into_iter()
                .map(|[lng, lat]| GeoPoint::new(lat, lng))
                .collect(),
        )
    }))
}

/// Client for an OSRM-compatible routing server
pub struct OsrmClient {
    client: reqwest::Client,
    base_url: String,
}

impl OsrmClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, RoutingError> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("route-verification/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()
            .map_err(|e| RoutingError::Client(e.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn route_url(&self, start: GeoPoint, end: GeoPoint) -> String {
        format!(
            "{}/route/v1/driving/{},{};{},{}?overview=full&geometries=geojson",
            self.base_url, start.lng, start.lat, end.lng, end.lat
        )
    }
}

#[async_trait]
impl RoutingProvider for OsrmClient {
    async fn driving_route(
        &self,
        start: GeoPoint,
        end: GeoPoint,
    ) -> Result<Option<RoutePath>, RoutingError> {
        let url = self.route_url(start, end);
        tracing::debug!("Requesting driving route: {}", url);

        let response = self.client.get(&url).send().await.map_err(|e| {
            // Keep the whole error chain, reqwest hides the useful part in sources
            let mut error_msg = e.to_string();
            let mut source = e.source();
            while let Some(err) = source {
                error_msg.push_str(&format!("\n  Caused by: {}", err));
                source = err.source();
            }
            RoutingError::Request(error_msg)
        })?;

        if !response.status().is_success() {
            return Err(RoutingError::Status(response.status().as_u16()));
        }

        let body = response
            .text()
            .await
            .map_err(|e| RoutingError::Request(e.to_string()))?;

        let path = parse_osrm_response(&body)?;
        match &path {
            Some(p) => tracing::debug!("Route received with {} vertices", p.coordinates.len()),
            None => tracing::debug!("Routing provider found no route"),
        }
        Ok(path)
    }
}

/// Provider answering every request with the same geometry
#[derive(Debug, Clone, Default)]
pub struct FixedRoute(pub Option<RoutePath>);

#[async_trait]
impl RoutingProvider for FixedRoute {
    async fn driving_route(
        &self,
        _start: GeoPoint,
        _end: GeoPoint,
    ) -> Result<Option<RoutePath>, RoutingError> {
        Ok(self.0.clone())
    }
}

/// Provider whose every request fails, for exercising degraded paths
#[derive(Debug, Clone, Default)]
pub struct UnreachableRoute;

#[async_trait]
impl RoutingProvider for UnreachableRoute {
    async fn driving_route(
        &self,
        _start: GeoPoint,
        _end: GeoPoint,
    ) -> Result<Option<RoutePath>, RoutingError> {
        Err(RoutingError::Request("connection refused".to_string()))
    }
}
