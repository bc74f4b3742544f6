use geo::Point;
use serde::{Deserialize, Serialize};

/// A WGS84 coordinate as the map widget exchanges it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

impl GeoPoint {
    /// Create a new point
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Validate that coordinates are within valid GPS ranges
    pub fn is_valid(&self) -> bool {
        self.lat.is_finite()
            && self.lng.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lng)
    }

    /// Great-circle distance to another point in meters
    pub fn distance_to(&self, other: &GeoPoint) -> f64 {
        crate::services::location::calculate_distance(self, other)
    }

    /// Check if this point is within `max_distance` meters of another
    pub fn is_within_range(&self, other: &GeoPoint, max_distance: f64) -> bool {
        self.distance_to(other) <= max_distance
    }
}

// geo works in (x = lng, y = lat)
impl From<GeoPoint> for Point<f64> {
    fn from(p: GeoPoint) -> Self {
        Point::new(p.lng, p.lat)
    }
}

impl From<Point<f64>> for GeoPoint {
    fn from(p: Point<f64>) -> Self {
        Self::new(p.y(), p.x())
    }
}

/// A sampled waypoint the contractor has to visit and photograph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InspectionPoint {
    pub id: u32,
    pub lat: f64,
    pub lng: f64,
    pub verified: bool,
}

impl InspectionPoint {
    pub fn new(id: u32, position: GeoPoint) -> Self {
        Self {
            id,
            lat: position.lat,
            lng: position.lng,
            verified: false,
        }
    }

    pub fn position(&self) -> GeoPoint {
        GeoPoint::new(self.lat, self.lng)
    }

    /// 1-based number shown to users
    pub fn label(&self) -> u32 {
        self.id + 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point_validation() {
        assert!(GeoPoint::new(12.97, 77.59).is_valid());
        assert!(GeoPoint::new(-90.0, 180.0).is_valid());
        assert!(GeoPoint::new(90.0, -180.0).is_valid());

        assert!(!GeoPoint::new(91.0, 0.0).is_valid());
        assert!(!GeoPoint::new(0.0, 181.0).is_valid());
        assert!(!GeoPoint::new(-91.0, 0.0).is_valid());
        assert!(!GeoPoint::new(0.0, -181.0).is_valid());
        assert!(!GeoPoint::new(f64::NAN, 0.0).is_valid());
    }

    #[test]
    fn test_geo_point_conversion_keeps_axis_order() {
        let p = GeoPoint::new(12.97, 77.59);
        let geo_point: Point<f64> = p.into();
        assert_eq!(geo_point.x(), 77.59);
        assert_eq!(geo_point.y(), 12.97);
        assert_eq!(GeoPoint::from(geo_point), p);
    }

    #[test]
    fn test_distance_and_range_checking() {
        let here = GeoPoint::new(12.9716, 77.5946);
        let nearby = GeoPoint::new(12.9717, 77.5946);

        let distance = here.distance_to(&nearby);
        assert!(distance < 20.0); // ~11 meters

        assert!(here.is_within_range(&nearby, 50.0));
        assert!(!here.is_within_range(&nearby, 5.0));
    }

    #[test]
    fn test_inspection_point_label_is_one_based() {
        let point = InspectionPoint::new(0, GeoPoint::new(1.0, 2.0));
        assert_eq!(point.label(), 1);
        assert!(!point.verified);
        assert_eq!(point.position(), GeoPoint::new(1.0, 2.0));
    }
}
