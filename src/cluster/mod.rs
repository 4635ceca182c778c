//! Package cluster implements DBSCAN on (lon, lat) using a K-D Tree, plus the
//! adaptive epsilon search that ranks dropoff destinations
pub mod dbscan;
pub mod distance;
pub mod kdtree;
pub mod point;
pub mod search;

#[cfg(test)]
mod point_test;
#[cfg(test)]
mod search_test;

pub use dbscan::db_scan;
pub use distance::{euclidean, great_circle_miles};
pub use point::{Cluster, Point, PointList};
pub use search::{CentroidResult, SearchConfig, top_clusters};
