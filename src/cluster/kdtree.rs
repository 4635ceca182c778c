//! Two-dimensional K-D tree over a borrowed point list
//!
//! Nodes live in a flat arena and hold only indices into the points slice,
//! so one tree can serve every region query of a DBSCAN pass.

use super::point::Point;

/// KD-Tree for radius queries in degree space
pub struct KDTree<'a> {
    points: &'a [Point],
    nodes: Vec<KDTreeNode>,
    root: Option<usize>,
}

/// A node in the K-D tree
struct KDTreeNode {
    /// Index of the point associated with this node
    point_id: usize,
    split: usize,
    left: Option<usize>,
    right: Option<usize>,
}

impl<'a> KDTree<'a> {
    /// Builds a balanced tree by splitting on the median of alternating axes
    pub fn new(points: &'a [Point]) -> Self {
        let mut tree = KDTree {
            points,
            nodes: Vec::with_capacity(points.len()),
            root: None,
        };
        let mut ids: Vec<usize> = (0..points.len()).collect();
        tree.root = tree.build(&mut ids, 0);
        tree
    }

    fn build(&mut self, ids: &mut [usize], depth: usize) -> Option<usize> {
        if ids.is_empty() {
            return None;
        }

        let split = depth % 2;
        let mid = ids.len() / 2;
        let points = self.points;
        ids.select_nth_unstable_by(mid, |&a, &b| points[a].0[split].total_cmp(&points[b].0[split]));

        let point_id = ids[mid];
        let (lower, upper) = ids.split_at_mut(mid);
        let left = self.build(lower, depth + 1);
        let right = self.build(&mut upper[1..], depth + 1);

        self.nodes.push(KDTreeNode {
            point_id,
            split,
            left,
            right,
        });
        Some(self.nodes.len() - 1)
    }

    /// Finds all points within `dist` of `pt`, boundary included
    ///
    /// To avoid allocation, the `found` vector can be pre-allocated and
    /// re-used across calls; it is cleared first.
    pub fn in_range(&self, pt: &Point, dist: f64, mut found: Vec<usize>) -> Vec<usize> {
        found.clear();
        if dist < 0.0 {
            return found;
        }
        self.in_range_recursive(self.root, pt, dist, &mut found);
        found
    }

    fn in_range_recursive(&self, node: Option<usize>, pt: &Point, r: f64, found: &mut Vec<usize>) {
        let Some(node) = node.map(|n| &self.nodes[n]) else {
            return;
        };

        let here = &self.points[node.point_id];
        let diff = pt.0[node.split] - here.0[node.split];
        let (this_side, other_side) = if diff < 0.0 {
            (node.left, node.right)
        } else {
            (node.right, node.left)
        };

        self.in_range_recursive(this_side, pt, r, found);
        if here.sq_dist(pt) <= r * r {
            found.push(node.point_id);
        }
        if diff.abs() <= r {
            self.in_range_recursive(other_side, pt, r, found);
        }
    }

    /// Returns the height of the K-D tree
    pub fn height(&self) -> usize {
        self.height_of(self.root)
    }

    fn height_of(&self, node: Option<usize>) -> usize {
        node.map_or(0, |n| {
            let node = &self.nodes[n];
            self.height_of(node.left).max(self.height_of(node.right)) + 1
        })
    }
}
