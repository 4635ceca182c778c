//! Point and cluster types shared by the clustering code

/// Point represents a coordinate pair in degrees
///
/// The point is stored as [longitude, latitude] where:
/// - `[0]` is longitude
/// - `[1]` is latitude
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point(pub [f64; 2]);

/// PointList is a collection of Points
pub type PointList = Vec<Point>;

/// Cluster is one density-connected group found by a DBSCAN pass
#[derive(Debug, Clone)]
pub struct Cluster {
    /// Cluster label, in discovery order
    pub c: usize,
    /// Indices of points belonging to this cluster
    pub points: Vec<usize>,
}

impl Point {
    pub fn new(longitude: f64, latitude: f64) -> Self {
        Point([longitude, latitude])
    }

    pub fn longitude(&self) -> f64 {
        self.0[0]
    }

    pub fn latitude(&self) -> f64 {
        self.0[1]
    }

    /// Both coordinates are finite numbers
    pub fn is_finite(&self) -> bool {
        self.0[0].is_finite() && self.0[1].is_finite()
    }

    /// Returns squared Euclidean distance in degree space
    pub fn sq_dist(&self, b: &Point) -> f64 {
        super::distance::euclidean_sq(self, b)
    }
}

impl Cluster {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Copies the member coordinates out of the clustered point list
    pub fn members(&self, points: &[Point]) -> PointList {
        self.points.iter().map(|&i| points[i]).collect()
    }
}
