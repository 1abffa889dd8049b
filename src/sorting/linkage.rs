//! Average-linkage hierarchical clustering.
//!
//! Builds a dendrogram from a square distance matrix with UPGMA merges and
//! derives the two things the sorters need from it: the leaf order of the
//! tree and flat clusters cut either at a distance threshold or at a maximum
//! cluster count.
//!
//! Node numbering follows the usual convention: leaves are `0..n`, the node
//! created by merge `i` is `n + i`, and each merge lists its smaller child
//! first. Ties between equally close pairs go to the pair with the lowest
//! indices, so results are deterministic.

use nalgebra::DMatrix;

/// One merge step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Merge {
    /// Smaller child node id
    pub left: usize,
    /// Larger child node id
    pub right: usize,
    /// Average distance between the merged clusters
    pub distance: f64,
    /// Number of leaves under the new node
    pub size: usize,
}

/// A binary cluster tree over `n` observations.
#[derive(Debug, Clone, PartialEq)]
pub struct Dendrogram {
    leaves: usize,
    merges: Vec<Merge>,
}

/// Cluster the rows of a square distance matrix with average linkage.
///
/// Non-finite or negative distances are treated as the largest finite
/// distance in the matrix so they never merge early.
pub fn average_linkage(distances: &DMatrix<f64>) -> Dendrogram {
    let n = distances.nrows().min(distances.ncols());
    if n < 2 {
        return Dendrogram {
            leaves: n,
            merges: Vec::new(),
        };
    }

    let ceiling = distances
        .iter()
        .copied()
        .filter(|d| d.is_finite() && *d >= 0.0)
        .fold(0.0_f64, f64::max);
    let mut d = DMatrix::from_fn(n, n, |i, j| {
        let value = distances[(i, j)];
        if value.is_finite() && value >= 0.0 {
            value
        } else {
            ceiling
        }
    });

    let mut active = vec![true; n];
    let mut sizes = vec![1usize; n];
    let mut node_ids: Vec<usize> = (0..n).collect();
    let mut merges = Vec::with_capacity(n - 1);

    for step in 0..n - 1 {
        let mut best: Option<(usize, usize, f64)> = None;
        for i in 0..n {
            if !active[i] {
                continue;
            }
            for j in (i + 1)..n {
                if !active[j] {
                    continue;
                }
                let dist = d[(i, j)];
                if best.map_or(true, |(_, _, b)| dist < b) {
                    best = Some((i, j, dist));
                }
            }
        }
        let Some((i, j, dist)) = best else {
            break;
        };

        let (size_i, size_j) = (sizes[i], sizes[j]);
        let total = size_i + size_j;
        for k in 0..n {
            if active[k] && k != i && k != j {
                let merged =
                    (size_i as f64 * d[(i, k)] + size_j as f64 * d[(j, k)]) / total as f64;
                d[(i, k)] = merged;
                d[(k, i)] = merged;
            }
        }

        let (a, b) = (node_ids[i], node_ids[j]);
        merges.push(Merge {
            left: a.min(b),
            right: a.max(b),
            distance: dist,
            size: total,
        });

        sizes[i] = total;
        active[j] = false;
        node_ids[i] = n + step;
    }

    Dendrogram { leaves: n, merges }
}

impl Dendrogram {
    /// Number of observations.
    pub fn len(&self) -> usize {
        self.leaves
    }

    /// Whether the tree has no observations.
    pub fn is_empty(&self) -> bool {
        self.leaves == 0
    }

    /// Merge steps in the order they happened.
    pub fn merges(&self) -> &[Merge] {
        &self.merges
    }

    /// Observations in dendrogram leaf order (left subtree first).
    pub fn leaves(&self) -> Vec<usize> {
        let n = self.leaves;
        let Some(root_merge) = self.merges.len().checked_sub(1) else {
            return (0..n).collect();
        };

        let mut order = Vec::with_capacity(n);
        let mut stack = vec![n + root_merge];
        while let Some(node) = stack.pop() {
            if node < n {
                order.push(node);
            } else {
                let merge = &self.merges[node - n];
                stack.push(merge.right);
                stack.push(merge.left);
            }
        }
        order
    }

    /// Flat clusters containing only merges at or below `threshold`.
    pub fn clusters_by_distance(&self, threshold: f64) -> Vec<Vec<usize>> {
        let applied = self
            .merges
            .iter()
            .take_while(|m| m.distance <= threshold)
            .count();
        self.flat_clusters(applied)
    }

    /// At most `max_clusters` flat clusters (at least one).
    pub fn clusters_by_count(&self, max_clusters: usize) -> Vec<Vec<usize>> {
        let target = max_clusters.max(1);
        let applied = self.leaves.saturating_sub(target).min(self.merges.len());
        self.flat_clusters(applied)
    }

    /// Clusters after applying the first `applied` merges.
    ///
    /// Clusters come out in order of their first leaf in dendrogram leaf
    /// order, and members keep that order.
    fn flat_clusters(&self, applied: usize) -> Vec<Vec<usize>> {
        let n = self.leaves;
        let mut parent: Vec<usize> = (0..n + self.merges.len()).collect();

        fn find(parent: &mut [usize], mut x: usize) -> usize {
            while parent[x] != x {
                parent[x] = parent[parent[x]];
                x = parent[x];
            }
            x
        }

        for (step, merge) in self.merges.iter().take(applied).enumerate() {
            let node = n + step;
            let l = find(&mut parent, merge.left);
            let r = find(&mut parent, merge.right);
            parent[l] = node;
            parent[r] = node;
        }

        let mut clusters: Vec<(usize, Vec<usize>)> = Vec::new();
        for leaf in self.leaves() {
            let root = find(&mut parent, leaf);
            match clusters.iter_mut().find(|(r, _)| *r == root) {
                Some((_, members)) => members.push(leaf),
                None => clusters.push((root, vec![leaf])),
            }
        }
        clusters.into_iter().map(|(_, members)| members).collect()
    }
}
