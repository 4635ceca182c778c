use super::kdtree::KDTree;
use super::point::{Cluster, Point};
use bitvec::prelude::*;

// Each unvisited point seeds a cluster when its eps-neighbourhood holds at
// least `min_points` points; the cluster then grows through every member
// whose own neighbourhood is dense enough. With `min_points == 1` every point
// is a core point and the clusters are the connected components of the
// "within eps" graph.

/// Clusters incoming points using DBSCAN algorithm
///
/// # Arguments
///
/// * `points` - List of points to cluster
/// * `eps` - Neighbourhood radius in degrees, inclusive
/// * `min_points` - Minimum number of points in eps-neighbourhood (density threshold)
///
/// # Returns
///
/// A tuple `(clusters, noise)` where:
/// - `clusters` is a vector of found clusters, labelled in discovery order
/// - `noise` is a vector of point indices that are outliers (not in any cluster)
pub fn db_scan(points: &[Point], eps: f64, min_points: usize) -> (Vec<Cluster>, Vec<usize>) {
    let mut visited = bitvec![0; points.len()];
    let mut members = bitvec![0; points.len()];
    let mut queued = bitvec![0; points.len()];
    let mut clusters = Vec::new();
    let mut noise = Vec::new();
    let kd_tree = KDTree::new(points);
    let mut scratch = Vec::new();
    log::trace!(
        "DBSCAN over {} points, eps={eps}, kd-tree height {}",
        points.len(),
        kd_tree.height()
    );

    for i in 0..points.len() {
        if visited[i] {
            continue;
        }
        visited.set(i, true);

        scratch = kd_tree.in_range(&points[i], eps, scratch);
        if scratch.len() < min_points {
            noise.push(i);
            continue;
        }

        let mut cluster = Cluster {
            c: clusters.len(),
            points: vec![i],
        };
        members.set(i, true);

        queued.fill(false);
        let mut frontier = scratch.clone();
        for &j in &frontier {
            queued.set(j, true);
        }

        // frontier grows while we walk it
        let mut j = 0;
        while j < frontier.len() {
            let k = frontier[j];
            if !visited[k] {
                visited.set(k, true);
                scratch = kd_tree.in_range(&points[k], eps, scratch);
                if scratch.len() >= min_points {
                    for &p in &scratch {
                        if !queued[p] {
                            frontier.push(p);
                            queued.set(p, true);
                        }
                    }
                }
            }

            if !members[k] {
                cluster.points.push(k);
                members.set(k, true);
            }
            j += 1;
        }
        clusters.push(cluster);
    }

    // border points claimed by a later cluster can't appear as noise
    noise.retain(|&i| !members[i]);

    (clusters, noise)
}

/// Simple O(N) way to find points in neighbourhood
///
/// Equivalent to `KDTree::in_range`; kept as the reference the tree is tested against.
#[allow(dead_code)]
pub fn region_query(points: &[Point], p: &Point, eps: f64) -> Vec<usize> {
    points
        .iter()
        .enumerate()
        .filter(|(_, point)| point.sq_dist(p) <= eps * eps)
        .map(|(i, _)| i)
        .collect()
}
