//! Similarity matrices and orderings over them.

use std::fmt;
use std::str::FromStr;

use nalgebra::{DMatrix, DVector, SymmetricEigen};

use crate::error::Error;
use crate::sorting::linkage::average_linkage;

/// Upper bound on PCA components.
pub const MAX_COMPONENTS: usize = 50;

/// Self-similarity of a product with no usable image.
const MISSING_SELF_SIMILARITY: f64 = 0.5;

/// Diagonal shift applied before building the Laplacian.
const SPECTRAL_REGULARIZATION: f64 = 0.01;

/// Eigenvalues below this are treated as zero variance.
const EIGEN_EPSILON: f64 = 1e-10;

/// How an ordering is derived from the similarity matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortMethod {
    /// Dendrogram leaf order of average-linkage clustering
    #[default]
    Hierarchical,
    /// Fiedler vector of the graph Laplacian
    Spectral,
    /// Nearest-neighbour chain from the most central item
    Greedy,
}

impl SortMethod {
    /// Name as accepted by `FromStr`.
    pub fn as_str(&self) -> &'static str {
        match self {
            SortMethod::Hierarchical => "hierarchical",
            SortMethod::Spectral => "spectral",
            SortMethod::Greedy => "greedy",
        }
    }
}

impl fmt::Display for SortMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortMethod {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "hierarchical" | "clustering" => Ok(SortMethod::Hierarchical),
            "spectral" => Ok(SortMethod::Spectral),
            "greedy" | "tsp" => Ok(SortMethod::Greedy),
            _ => Err(Error::UnknownSortMethod(s.to_string())),
        }
    }
}

/// Build a similarity matrix from per-product features.
///
/// Products with features are standardised column-wise, projected onto at
/// most [`MAX_COMPONENTS`] principal components, and compared by Euclidean
/// distance: `1 - d / max_d`. Products without features get self-similarity
/// 0.5 and similarity 0 to everything else. With no features at all the
/// result is the identity.
pub fn similarity_matrix(features: &[Option<DVector<f64>>]) -> DMatrix<f64> {
    let n = features.len();
    let valid: Vec<usize> = (0..n)
        .filter(|&i| {
            features[i]
                .as_ref()
                .map_or(false, |f| !f.is_empty() && f.iter().all(|v| v.is_finite()))
        })
        .collect();

    if valid.is_empty() {
        return DMatrix::identity(n, n);
    }

    let dim = valid
        .iter()
        .filter_map(|&i| features[i].as_ref().map(|f| f.len()))
        .min()
        .unwrap_or(0);
    let data = DMatrix::from_fn(valid.len(), dim, |r, c| {
        features[valid[r]].as_ref().map_or(0.0, |f| f[c])
    });

    let projected = project(&standardize(data));
    let m = valid.len();
    let mut distances = DMatrix::<f64>::zeros(m, m);
    for i in 0..m {
        for j in (i + 1)..m {
            let d = (projected.row(i) - projected.row(j)).norm();
            distances[(i, j)] = d;
            distances[(j, i)] = d;
        }
    }
    let max_distance = distances.max();

    let mut similarity = DMatrix::<f64>::zeros(n, n);
    for i in 0..n {
        similarity[(i, i)] = MISSING_SELF_SIMILARITY;
    }
    for (a, &i) in valid.iter().enumerate() {
        for (b, &j) in valid.iter().enumerate() {
            similarity[(i, j)] = if max_distance > 0.0 {
                1.0 - distances[(a, b)] / max_distance
            } else {
                1.0
            };
        }
    }
    similarity
}

/// Zero-mean, unit-variance columns. Constant columns become zero.
fn standardize(mut data: DMatrix<f64>) -> DMatrix<f64> {
    let rows = data.nrows() as f64;
    for mut column in data.column_iter_mut() {
        let mean = column.sum() / rows;
        let var = column.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / rows;
        let std = if var > 0.0 { var.sqrt() } else { 1.0 };
        for v in column.iter_mut() {
            *v = (*v - mean) / std;
        }
    }
    data
}

/// Principal component scores via the Gram matrix.
///
/// For `m` rows the Gram matrix is `m × m`, so this stays cheap however long
/// the feature vectors are.
fn project(data: &DMatrix<f64>) -> DMatrix<f64> {
    let m = data.nrows();
    let k = MAX_COMPONENTS
        .min(m.saturating_sub(1))
        .min(data.ncols());
    if k == 0 {
        return DMatrix::zeros(m, 1);
    }

    let gram = data * data.transpose();
    let eigen = SymmetricEigen::new(gram);

    let mut order: Vec<usize> = (0..m).collect();
    order.sort_by(|&a, &b| {
        eigen.eigenvalues[b]
            .total_cmp(&eigen.eigenvalues[a])
            .then(a.cmp(&b))
    });

    DMatrix::from_fn(m, k, |r, c| {
        let idx = order[c];
        let lambda = eigen.eigenvalues[idx];
        if lambda > EIGEN_EPSILON {
            eigen.eigenvectors[(r, idx)] * lambda.sqrt()
        } else {
            0.0
        }
    })
}

/// Order items by the chosen method. Returns indices.
///
/// A matrix with non-finite entries, or a failed decomposition, gives the
/// identity order.
pub fn order(similarity: &DMatrix<f64>, method: SortMethod) -> Vec<usize> {
    let n = similarity.nrows();
    if n < 2 {
        return (0..n).collect();
    }
    if similarity.iter().any(|v| !v.is_finite()) {
        log::warn!("Similarity matrix has non-finite entries, keeping input order");
        return (0..n).collect();
    }

    match method {
        SortMethod::Hierarchical => average_linkage(&to_distances(similarity)).leaves(),
        SortMethod::Spectral => spectral_order(similarity),
        SortMethod::Greedy => greedy_order(similarity),
    }
}

/// `1 - S`, clipped at zero, with a zero diagonal.
pub fn to_distances(similarity: &DMatrix<f64>) -> DMatrix<f64> {
    let n = similarity.nrows();
    DMatrix::from_fn(n, n, |i, j| {
        if i == j {
            0.0
        } else {
            (1.0 - similarity[(i, j)]).max(0.0)
        }
    })
}

fn spectral_order(similarity: &DMatrix<f64>) -> Vec<usize> {
    let n = similarity.nrows();
    let weights = similarity + DMatrix::identity(n, n) * SPECTRAL_REGULARIZATION;
    let degrees: Vec<f64> = weights.row_iter().map(|r| r.sum()).collect();
    let laplacian = DMatrix::from_fn(n, n, |i, j| {
        if i == j {
            degrees[i] - weights[(i, j)]
        } else {
            -weights[(i, j)]
        }
    });

    let eigen = SymmetricEigen::new(laplacian);
    if eigen.eigenvalues.iter().any(|v| !v.is_finite()) {
        log::warn!("Laplacian decomposition failed, keeping input order");
        return (0..n).collect();
    }

    let mut by_value: Vec<usize> = (0..n).collect();
    by_value.sort_by(|&a, &b| {
        eigen.eigenvalues[a]
            .total_cmp(&eigen.eigenvalues[b])
            .then(a.cmp(&b))
    });
    let fiedler_idx = by_value[1];
    let mut fiedler: Vec<f64> = eigen.eigenvectors.column(fiedler_idx).iter().copied().collect();

    // Eigenvectors are defined up to sign; pin it so the order is stable.
    if let Some(first) = fiedler.iter().copied().find(|v| v.abs() > EIGEN_EPSILON) {
        if first < 0.0 {
            fiedler.iter_mut().for_each(|v| *v = -*v);
        }
    }

    let mut result: Vec<usize> = (0..n).collect();
    result.sort_by(|&a, &b| fiedler[a].total_cmp(&fiedler[b]).then(a.cmp(&b)));
    result
}

fn greedy_order(similarity: &DMatrix<f64>) -> Vec<usize> {
    let n = similarity.nrows();
    let mean = |i: usize| similarity.row(i).sum() / n as f64;

    let mut current = 0;
    for i in 1..n {
        if mean(i) > mean(current) {
            current = i;
        }
    }

    let mut visited = vec![false; n];
    let mut result = Vec::with_capacity(n);
    visited[current] = true;
    result.push(current);

    while result.len() < n {
        let mut next: Option<usize> = None;
        for j in 0..n {
            if visited[j] {
                continue;
            }
            if next.map_or(true, |b| similarity[(current, j)] > similarity[(current, b)]) {
                next = Some(j);
            }
        }
        let Some(j) = next else { break };
        visited[j] = true;
        result.push(j);
        current = j;
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Two tight pairs, far apart: {0, 2} and {1, 3}.
    fn paired() -> DMatrix<f64> {
        DMatrix::from_row_slice(
            4,
            4,
            &[
                1.0, 0.1, 0.9, 0.0, //
                0.1, 1.0, 0.0, 0.9, //
                0.9, 0.0, 1.0, 0.1, //
                0.0, 0.9, 0.1, 1.0,
            ],
        )
    }

    fn adjacent(order: &[usize], a: usize, b: usize) -> bool {
        let pa = order.iter().position(|&x| x == a).unwrap();
        let pb = order.iter().position(|&x| x == b).unwrap();
        pa.abs_diff(pb) == 1
    }

    fn assert_permutation(order: &[usize], n: usize) {
        let mut sorted = order.to_vec();
        sorted.sort();
        assert_eq!(sorted, (0..n).collect::<Vec<_>>());
    }

    #[test]
    fn test_methods_keep_pairs_together() {
        for method in [SortMethod::Hierarchical, SortMethod::Spectral, SortMethod::Greedy] {
            let result = order(&paired(), method);
            assert_permutation(&result, 4);
            assert!(adjacent(&result, 0, 2), "{method}: {result:?}");
            assert!(adjacent(&result, 1, 3), "{method}: {result:?}");
        }
    }

    #[test]
    fn test_orders_are_deterministic() {
        for method in [SortMethod::Hierarchical, SortMethod::Spectral, SortMethod::Greedy] {
            assert_eq!(order(&paired(), method), order(&paired(), method));
        }
    }

    #[test]
    fn test_greedy_ties_take_lowest_index() {
        let uniform = DMatrix::from_element(3, 3, 0.5);
        assert_eq!(order(&uniform, SortMethod::Greedy), vec![0, 1, 2]);
    }

    #[test]
    fn test_non_finite_gives_identity() {
        let mut s = paired();
        s[(0, 1)] = f64::NAN;
        assert_eq!(order(&s, SortMethod::Spectral), vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_small_inputs() {
        assert!(order(&DMatrix::zeros(0, 0), SortMethod::Greedy).is_empty());
        assert_eq!(order(&DMatrix::identity(1, 1), SortMethod::Spectral), vec![0]);
    }

    #[test]
    fn test_similarity_matrix_missing_features() {
        let f = |v: &[f64]| Some(DVector::from_row_slice(v));
        let features = vec![f(&[0.0, 0.0]), None, f(&[1.0, 1.0]), f(&[0.1, 0.0])];
        let s = similarity_matrix(&features);
        assert_eq!(s[(1, 1)], 0.5);
        assert_eq!(s[(1, 0)], 0.0);
        assert_eq!(s[(0, 0)], 1.0);
        assert!(s[(0, 3)] > s[(0, 2)]);
        assert!((s[(0, 2)] - s[(2, 0)]).abs() < 1e-12);
        assert!(s.iter().all(|v| (0.0..=1.0).contains(v)));
    }

    #[test]
    fn test_similarity_matrix_no_features() {
        let s = similarity_matrix(&[None, None]);
        assert_eq!(s, DMatrix::identity(2, 2));
    }

    #[test]
    fn test_sort_method_from_str() {
        assert_eq!("Spectral".parse::<SortMethod>().unwrap(), SortMethod::Spectral);
        assert_eq!("tsp".parse::<SortMethod>().unwrap(), SortMethod::Greedy);
        assert!("zigzag".parse::<SortMethod>().is_err());
        assert_eq!(SortMethod::default().to_string(), "hierarchical");
    }
}
