//! Adaptive epsilon search over repeated DBSCAN passes
//!
//! The neighbourhood radius starts wide and shrinks step by step until no
//! single cluster holds more than `max_share` of the points. The surviving
//! clusters are ranked by size and summarised as centroid plus radius.

use super::db_scan;
use super::{Cluster, Point};
use crate::error::AnalysisError;
use crate::geometry::{centroid, distances_to};

/// Tuning knobs for the epsilon search
#[derive(Debug, Clone, PartialEq)]
pub struct SearchConfig {
    /// First neighbourhood radius tried, in degrees
    pub eps_start: f64,
    /// Amount the radius shrinks after each pass that is still too coarse
    pub eps_step: f64,
    /// Largest share of all points a single cluster may hold
    pub max_share: f64,
    /// The search gives up once eps would drop below this
    pub min_eps: f64,
    /// Upper bound on DBSCAN passes
    pub max_iterations: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        SearchConfig {
            eps_start: 0.005,
            eps_step: 0.0005,
            max_share: 0.15,
            min_eps: 1e-9,
            max_iterations: 100,
        }
    }
}

impl SearchConfig {
    pub fn validate(&self) -> Result<(), AnalysisError> {
        if !(self.eps_start > 0.0) {
            return Err(AnalysisError::InvalidConfig(format!(
                "eps_start must be positive, got {}",
                self.eps_start
            )));
        }
        if !(self.eps_step > 0.0) {
            return Err(AnalysisError::InvalidConfig(format!(
                "eps_step must be positive, got {}",
                self.eps_step
            )));
        }
        if !(self.max_share > 0.0 && self.max_share <= 1.0) {
            return Err(AnalysisError::InvalidConfig(format!(
                "max_share must be in (0, 1], got {}",
                self.max_share
            )));
        }
        if !(self.min_eps >= 0.0) {
            return Err(AnalysisError::InvalidConfig(format!(
                "min_eps must not be negative, got {}",
                self.min_eps
            )));
        }
        if self.max_iterations == 0 {
            return Err(AnalysisError::InvalidConfig(
                "max_iterations must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Largest cluster size accepted for `total` points
    pub fn threshold(&self, total: usize) -> usize {
        (total as f64 * self.max_share).floor() as usize
    }

    /// Radius used by pass `iteration`, computed from the start value so
    /// rounding does not accumulate
    pub fn eps_at(&self, iteration: usize) -> f64 {
        self.eps_start - iteration as f64 * self.eps_step
    }
}

/// Summary of one ranked cluster
#[derive(Debug, Clone, PartialEq)]
pub struct CentroidResult {
    pub longitude: f64,
    pub latitude: f64,
    /// Largest member distance from the centroid, in degrees
    pub radius: f64,
    /// Number of points in the cluster
    pub members: usize,
}

/// Outcome of a converged search
#[derive(Debug, Clone)]
pub struct Partition {
    /// Radius at which the largest cluster first fit under the threshold
    pub eps: f64,
    /// Number of DBSCAN passes run
    pub iterations: usize,
    /// All clusters at `eps`, largest first
    pub clusters: Vec<Cluster>,
}

/// Shrinks eps until the largest cluster is at most `threshold(points.len())`
///
/// # Errors
///
/// * `EmptyInput` if there are no points
/// * `InvalidCoordinate` if a point is not finite
/// * `ClusteringDidNotConverge` if eps falls below `min_eps` or the
///   iteration cap is reached first
pub fn partition(points: &[Point], config: &SearchConfig) -> Result<Partition, AnalysisError> {
    config.validate()?;
    if points.is_empty() {
        return Err(AnalysisError::EmptyInput {
            what: "dropoff points",
        });
    }
    if let Some(index) = points.iter().position(|p| !p.is_finite()) {
        return Err(AnalysisError::InvalidCoordinate { index });
    }

    let threshold = config.threshold(points.len());
    let mut last_eps = config.eps_start;
    let mut largest = points.len();

    for iteration in 0..config.max_iterations {
        let eps = config.eps_at(iteration);
        if eps < config.min_eps {
            return Err(AnalysisError::ClusteringDidNotConverge {
                iterations: iteration,
                last_eps,
                largest,
                threshold,
            });
        }

        let (mut clusters, noise) = db_scan(points, eps, 1);
        debug_assert!(noise.is_empty());
        debug_assert!(!clusters.iter().any(Cluster::is_empty));

        // equal sizes keep label order
        clusters.sort_by(|a, b| b.len().cmp(&a.len()).then(a.c.cmp(&b.c)));
        largest = clusters.first().map_or(0, Cluster::len);
        last_eps = eps;
        log::debug!(
            "eps={eps:.5}: {} clusters, largest {largest} (limit {threshold})",
            clusters.len()
        );

        if largest <= threshold {
            return Ok(Partition {
                eps,
                iterations: iteration + 1,
                clusters,
            });
        }
    }

    Err(AnalysisError::ClusteringDidNotConverge {
        iterations: config.max_iterations,
        last_eps,
        largest,
        threshold,
    })
}

/// Returns up to `k` of the largest clusters as centroid, radius and size
///
/// Fewer than `k` results come back when fewer clusters exist.
pub fn top_clusters(
    points: &[Point],
    k: usize,
    config: &SearchConfig,
) -> Result<Vec<CentroidResult>, AnalysisError> {
    if k == 0 {
        return Err(AnalysisError::InvalidConfig(
            "number of clusters must be at least 1".to_string(),
        ));
    }

    let partition = partition(points, config)?;
    log::info!(
        "Converged at eps={:.5} after {} passes with {} clusters",
        partition.eps,
        partition.iterations,
        partition.clusters.len()
    );

    partition
        .clusters
        .iter()
        .take(k)
        .map(|cluster| summarize(&cluster.members(points)))
        .collect()
}

fn summarize(members: &[Point]) -> Result<CentroidResult, AnalysisError> {
    let center = centroid(members)?;
    let radius = distances_to(members, &center)
        .into_iter()
        .fold(0.0, f64::max);

    Ok(CentroidResult {
        longitude: center.longitude(),
        latitude: center.latitude(),
        radius,
        members: members.len(),
    })
}
