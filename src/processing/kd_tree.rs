use kiddo::KdTree;
use kiddo::SquaredEuclidean;

/// 2D KD-tree over mark target positions for nearest-mark hover lookup.
pub struct HoverTree {
    tree: KdTree<f64, 2>,
}

impl HoverTree {
    /// Build from plot-space positions. The item stored for each point is its
    /// index in `points`. Non-finite points are skipped.
    ///
    /// Returns `None` when there is nothing to hover.
    pub fn build(points: &[[f64; 2]]) -> Option<Self> {
        let mut tree: KdTree<f64, 2> = KdTree::new();

        for (i, p) in points.iter().enumerate() {
            if p[0].is_finite() && p[1].is_finite() {
                tree.add(p, i as u64);
            }
        }

        if tree.size() == 0 {
            return None;
        }
        Some(Self { tree })
    }

    /// Find the nearest point to `(qx, qy)`.
    /// Returns `(index, distance)` where distance is Euclidean.
    pub fn nearest(&self, qx: f64, qy: f64) -> (usize, f64) {
        let result = self.tree.nearest_one::<SquaredEuclidean>(&[qx, qy]);
        (result.item as usize, result.distance.sqrt())
    }

    /// Nearest point no farther than `max_dist`.
    pub fn nearest_within(&self, qx: f64, qy: f64, max_dist: f64) -> Option<usize> {
        let (idx, dist) = self.nearest(qx, qy);
        (dist <= max_dist).then_some(idx)
    }
}

impl std::fmt::Debug for HoverTree {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HoverTree")
            .field("size", &self.tree.size())
            .finish()
    }
}
