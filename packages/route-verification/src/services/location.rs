use geo::{HaversineDistance, Point};
use geohash::{encode, Coord};

use crate::models::GeoPoint;

/// Calculate distance between two points in meters using Haversine formula
pub fn calculate_distance(point1: &GeoPoint, point2: &GeoPoint) -> f64 {
    let p1: Point<f64> = (*point1).into();
    let p2: Point<f64> = (*point2).into();

    p1.haversine_distance(&p2)
}

/// Coarse (~150m) cell for log lines, so raw device positions stay out of logs
pub fn coarse_cell(point: &GeoPoint) -> String {
    encode(
        Coord {
            x: point.lng,
            y: point.lat,
        },
        7,
    )
    .unwrap_or_else(|_| "invalid".to_string())
}
