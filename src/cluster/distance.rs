use std::f64::consts::PI;

use super::point::Point;

/// Coefficient to translate from degrees to radians
pub const DEGREE_RAD: f64 = PI / 180.0;

/// Earth radius in miles, as used by the pickup proximity filter
pub const EARTH_R_MILES: f64 = 3959.0;

/// Returns squared Euclidean distance between two points in degree space
///
/// Cluster radii stay in degrees; the small extents involved make this
/// an acceptable stand-in for a metric distance.
pub fn euclidean_sq(p1: &Point, p2: &Point) -> f64 {
    let dx = p1.0[0] - p2.0[0];
    let dy = p1.0[1] - p2.0[1];
    dx * dx + dy * dy
}

/// Euclidean distance in degree space
pub fn euclidean(p1: &Point, p2: &Point) -> f64 {
    euclidean_sq(p1, p2).sqrt()
}

/// Great-circle distance in miles using the spherical law of cosines
///
/// The cosine term is clamped so rounding on identical points can't push
/// `acos` out of its domain.
pub fn great_circle_miles(p1: &Point, p2: &Point) -> f64 {
    let lat1 = p1.latitude() * DEGREE_RAD;
    let lat2 = p2.latitude() * DEGREE_RAD;
    let dlon = (p2.longitude() - p1.longitude()) * DEGREE_RAD;

    let cos_angle = lat1.cos() * lat2.cos() * dlon.cos() + lat1.sin() * lat2.sin();
    EARTH_R_MILES * cos_angle.clamp(-1.0, 1.0).acos()
}
