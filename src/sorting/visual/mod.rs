//! Visual similarity product sorting.
//!
//! Orders products so that ones whose images look alike end up next to each
//! other on the sheet. Images are reduced to feature vectors
//! ([`features`]), compared pairwise ([`similarity`]), and the resulting
//! matrix is turned into an order by one of the [`SortMethod`]s.
//!
//! Products without an image, or whose image cannot be decoded, are kept:
//! they get no features and sort by their similarity to nothing.

pub mod features;
pub mod similarity;

use nalgebra::{DMatrix, DVector};

pub use self::similarity::SortMethod;

use super::linkage::average_linkage;
use super::{flatten_groups, ProductSorter, SimilarityGroup};
use crate::product::ProductSet;

/// Largest cluster count chosen by [`GroupingCriterion::Auto`].
const AUTO_MAX_CLUSTERS: usize = 5;

/// How flat groups are cut from the cluster tree.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GroupingCriterion {
    /// At most this many groups
    MaxClusters(usize),
    /// Merge only clusters closer than this distance (`1 - similarity`)
    DistanceThreshold(f64),
    /// `max(1, min(5, n / 3))` groups
    Auto,
}

impl Default for GroupingCriterion {
    fn default() -> Self {
        GroupingCriterion::Auto
    }
}

/// Sorts products by image similarity.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VisualSimilaritySorter {
    method: SortMethod,
}

impl VisualSimilaritySorter {
    /// Create a sorter using `method`.
    pub fn new(method: SortMethod) -> Self {
        Self { method }
    }

    /// Configured method.
    pub fn method(&self) -> SortMethod {
        self.method
    }

    /// Feature vectors in product order; `None` where no image is usable.
    pub fn features(&self, products: &ProductSet) -> Vec<Option<DVector<f64>>> {
        products
            .iter()
            .map(|(id, product)| {
                let path = product.image_path()?;
                match features::extract_from_path(path) {
                    Ok(f) => Some(f),
                    Err(e) => {
                        log::warn!(
                            "Could not read image for {} ({}): {}",
                            id,
                            path.display(),
                            e
                        );
                        None
                    },
                }
            })
            .collect()
    }

    /// Pairwise similarity of the products' images.
    pub fn similarity(&self, products: &ProductSet) -> DMatrix<f64> {
        similarity::similarity_matrix(&self.features(products))
    }

    /// Order products with an explicit method.
    pub fn sort_with(&self, products: &ProductSet, method: SortMethod) -> Vec<String> {
        let matrix = self.similarity(products);
        let ids: Vec<&String> = products.keys().collect();
        let result: Vec<String> = similarity::order(&matrix, method)
            .into_iter()
            .map(|i| ids[i].clone())
            .collect();
        log::debug!("Visual sort ({}) of {} products", method, result.len());
        result
    }

    /// Cut products into groups of similar images, in dendrogram order.
    pub fn group(&self, products: &ProductSet, criterion: GroupingCriterion) -> Vec<SimilarityGroup> {
        let ids: Vec<&String> = products.keys().collect();
        let n = ids.len();
        if n == 0 {
            return Vec::new();
        }

        let matrix = self.similarity(products);
        if matrix.iter().any(|v| !v.is_finite()) {
            log::warn!("Similarity matrix has non-finite entries, using one group");
            return vec![SimilarityGroup::new(
                "cluster_0",
                ids.into_iter().cloned().collect(),
            )];
        }

        let tree = average_linkage(&similarity::to_distances(&matrix));
        let clusters = match criterion {
            GroupingCriterion::MaxClusters(k) => tree.clusters_by_count(k),
            GroupingCriterion::DistanceThreshold(t) => tree.clusters_by_distance(t),
            GroupingCriterion::Auto => tree.clusters_by_count((n / 3).clamp(1, AUTO_MAX_CLUSTERS)),
        };

        clusters
            .into_iter()
            .enumerate()
            .map(|(i, members)| {
                SimilarityGroup::new(
                    format!("cluster_{}", i),
                    members.into_iter().map(|m| ids[m].clone()).collect(),
                )
            })
            .collect()
    }

    /// Groups flattened into one order.
    pub fn sort_grouped(&self, products: &ProductSet, criterion: GroupingCriterion) -> Vec<String> {
        flatten_groups(self.group(products, criterion))
    }
}

impl ProductSorter for VisualSimilaritySorter {
    fn name(&self) -> &str {
        "visual"
    }

    fn sort(&self, products: &ProductSet) -> Vec<String> {
        self.sort_with(products, self.method)
    }
}
