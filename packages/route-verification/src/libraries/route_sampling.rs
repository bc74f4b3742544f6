use geo::{HaversineIntermediate, HaversineLength, LineString, Point};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::models::{GeoPoint, InspectionPoint};

/// Number of inspection points generated per route
pub const DEFAULT_INSPECTION_POINTS: usize = 4;

/// Road geometry returned by the routing provider, in travel order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RoutePath {
    pub coordinates: Vec<GeoPoint>,
}

impl RoutePath {
    pub fn new(coordinates: Vec<GeoPoint>) -> Self {
        Self { coordinates }
    }

    /// A path needs at least one segment to be walked
    pub fn is_usable(&self) -> bool {
        self.coordinates.len() >= 2
    }

    pub fn is_empty(&self) -> bool {
        self.coordinates.is_empty()
    }

    /// Great-circle length of the whole path in meters
    pub fn length_meters(&self) -> f64 {
        let line: LineString<f64> = self
            .coordinates
            .iter()
            .map(|p| Point::from(*p))
            .collect::<Vec<_>>()
            .into();
        line.haversine_length()
    }

    /// Point lying `distance_m` meters along the path.
    ///
    /// Distances below zero pin to the first vertex, distances past the end
    /// pin to the last one. Returns `None` for an empty path.
    pub fn point_along(&self, distance_m: f64) -> Option<GeoPoint> {
        let first = *self.coordinates.first()?;
        if distance_m <= 0.0 {
            return Some(first);
        }

        let mut travelled = 0.0;
        for pair in self.coordinates.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            let segment = a.distance_to(&b);
            if segment > 0.0 && travelled + segment >= distance_m {
                let fraction = (distance_m - travelled) / segment;
                let point = Point::from(a).haversine_intermediate(&Point::from(b), fraction);
                return Some(point.into());
            }
            travelled += segment;
        }

        self.coordinates.last().copied()
    }

    /// Path as `[lat, lng]` pairs, the order map polylines expect
    pub fn to_lat_lng_pairs(&self) -> Vec<[f64; 2]> {
        self.coordinates.iter().map(|p| [p.lat, p.lng]).collect()
    }
}

/// Draw `count` inspection points at independent uniformly random distances
/// along the path. Points may cluster; that is accepted.
pub fn sample_inspection_points<R: Rng>(
    path: &RoutePath,
    count: usize,
    rng: &mut R,
) -> Vec<InspectionPoint> {
    if !path.is_usable() {
        return Vec::new();
    }

    let length = path.length_meters();

    (0..count)
        .filter_map(|i| {
            let distance = rng.gen::<f64>() * length;
            path.point_along(distance)
                .map(|position| InspectionPoint::new(i as u32, position))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::{EuclideanDistance, Line};
    use rand::{rngs::StdRng, SeedableRng};

    fn two_point_path() -> RoutePath {
        RoutePath::new(vec![GeoPoint::new(12.97, 77.59), GeoPoint::new(12.98, 77.60)])
    }

    fn bent_path() -> RoutePath {
        RoutePath::new(vec![
            GeoPoint::new(12.970, 77.590),
            GeoPoint::new(12.975, 77.590),
            GeoPoint::new(12.975, 77.600),
        ])
    }

    fn distance_to_path_degrees(path: &RoutePath, point: &GeoPoint) -> f64 {
        path.coordinates
            .windows(2)
            .map(|pair| {
                let line = Line::new(Point::from(pair[0]), Point::from(pair[1]));
                Point::from(*point).euclidean_distance(&line)
            })
            .fold(f64::INFINITY, f64::min)
    }

    #[test]
    fn test_length_matches_segment_sum() {
        let path = bent_path();
        let expected = path.coordinates[0].distance_to(&path.coordinates[1])
            + path.coordinates[1].distance_to(&path.coordinates[2]);
        assert!((path.length_meters() - expected).abs() < 1e-6);
    }

    #[test]
    fn test_point_along_endpoints() {
        let path = bent_path();
        assert_eq!(path.point_along(-5.0), Some(path.coordinates[0]));
        assert_eq!(path.point_along(0.0), Some(path.coordinates[0]));
        assert_eq!(
            path.point_along(path.length_meters() + 100.0),
            Some(path.coordinates[2])
        );
        assert_eq!(RoutePath::default().point_along(10.0), None);
    }

    #[test]
    fn test_point_along_crosses_vertices() {
        let path = bent_path();
        let first_leg = path.coordinates[0].distance_to(&path.coordinates[1]);

        let corner = path.point_along(first_leg).unwrap();
        assert!(corner.distance_to(&path.coordinates[1]) < 0.01);

        // Past the corner we must be travelling east along the second leg
        let beyond = path.point_along(first_leg + 200.0).unwrap();
        assert!((beyond.lat - 12.975).abs() < 1e-5);
        assert!(beyond.lng > 77.590);
        assert!((path.coordinates[1].distance_to(&beyond) - 200.0).abs() < 0.5);
    }

    #[test]
    fn test_samples_four_points_on_the_line() {
        let path = two_point_path();
        let mut rng = StdRng::seed_from_u64(7);

        let points = sample_inspection_points(&path, DEFAULT_INSPECTION_POINTS, &mut rng);

        assert_eq!(points.len(), 4);
        for (i, point) in points.iter().enumerate() {
            assert_eq!(point.id, i as u32);
            assert!(!point.verified);
            assert!(distance_to_path_degrees(&path, &point.position()) < 1e-6);
        }
    }

    #[test]
    fn test_samples_on_bent_path_stay_on_geometry() {
        let path = bent_path();
        let mut rng = StdRng::seed_from_u64(42);

        for _ in 0..25 {
            for point in sample_inspection_points(&path, 4, &mut rng) {
                assert!(distance_to_path_degrees(&path, &point.position()) < 1e-6);
            }
        }
    }

    #[test]
    fn test_unusable_path_yields_no_points() {
        let mut rng = StdRng::seed_from_u64(1);
        assert!(sample_inspection_points(&RoutePath::default(), 4, &mut rng).is_empty());

        let single = RoutePath::new(vec![GeoPoint::new(12.97, 77.59)]);
        assert!(sample_inspection_points(&single, 4, &mut rng).is_empty());
    }

    #[test]
    fn test_zero_length_path_repeats_vertex() {
        let spot = GeoPoint::new(12.97, 77.59);
        let path = RoutePath::new(vec![spot, spot]);
        let mut rng = StdRng::seed_from_u64(3);

        let points = sample_inspection_points(&path, 4, &mut rng);
        assert_eq!(points.len(), 4);
        assert!(points.iter().all(|p| p.position() == spot));
    }

    #[test]
    fn test_lat_lng_pairs_for_polyline() {
        let pairs = two_point_path().to_lat_lng_pairs();
        assert_eq!(pairs, vec![[12.97, 77.59], [12.98, 77.60]]);
    }
}
