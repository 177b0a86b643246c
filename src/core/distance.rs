use geo::EuclideanDistance;

use crate::models::GeoPoint;

/// Below this corridor length the transporter is treated as stationary
const DEGENERATE_EPSILON: f64 = 1e-12;

/// Planar (Euclidean) distance between two points, in degrees
///
/// This is an approximation that holds at sub-continental scale; it is not a
/// great-circle distance.
#[inline]
pub fn planar_distance(a: GeoPoint, b: GeoPoint) -> f64 {
    geo::Point::from(a).euclidean_distance(&geo::Point::from(b))
}

/// Perpendicular distance from `p` to the infinite line through `a` and `b`
///
/// When `a` and `b` coincide the line is undefined and the direct distance
/// from `a` to `p` is returned instead.
///
/// # Arguments
/// * `a` - Corridor start (transporter's current position)
/// * `b` - Corridor end (transporter's home base)
/// * `p` - Point being measured (pickup or dropoff)
pub fn cross_track_deviation(a: GeoPoint, b: GeoPoint, p: GeoPoint) -> f64 {
    let norm_ab = planar_distance(a, b);
    if norm_ab <= DEGENERATE_EPSILON {
        return planar_distance(a, p);
    }

    let ab = geo::Coord::from(b) - geo::Coord::from(a);
    let ap = geo::Coord::from(p) - geo::Coord::from(a);
    let cross = ab.x * ap.y - ab.y * ap.x;

    cross.abs() / norm_ab
}

/// Total pull of a pickup→dropoff leg away from the corridor `a`→`b`
#[inline]
pub fn corridor_deviation(a: GeoPoint, b: GeoPoint, pickup: GeoPoint, dropoff: GeoPoint) -> f64 {
    cross_track_deviation(a, b, pickup) + cross_track_deviation(a, b, dropoff)
}
