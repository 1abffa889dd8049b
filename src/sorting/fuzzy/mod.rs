//! Fuzzy text-based product sorting.
//!
//! Groups products that describe the same kind of hardware and orders each
//! group by size, so that a sheet of labels reads like a catalog page. Two
//! strategies share one front-end:
//!
//! - [`FuzzyStrategy::Catalog`]: keyword categories ranked in catalog order,
//!   then material, head profile and normalised dimensions
//! - [`FuzzyStrategy::Clustered`]: keyword categories split further by TF-IDF
//!   text similarity, each cluster ordered by sizes found in the text
//!
//! # Example
//!
//! ```
//! use label_oxide::product::{ProductInfo, ProductRecord, ProductSet};
//! use label_oxide::sorting::{FuzzyProductSorter, ProductSorter};
//!
//! let mut products = ProductSet::new();
//! for (id, family) in [("C", "Hex nut"), ("B", "M8x50 socket screw"), ("A", "M3x10 socket screw")] {
//!     products.insert(id.to_string(), ProductRecord::new(ProductInfo::new().with_family(family)));
//! }
//!
//! let order = FuzzyProductSorter::catalog().sort(&products);
//! assert_eq!(order, vec!["A", "B", "C"]);
//! ```

pub mod catalog;
pub mod dimensions;
pub mod tfidf;

use std::cmp::Ordering;

use indexmap::IndexMap;
use nalgebra::DMatrix;

use self::catalog::CatalogKey;
use self::dimensions::PatternDimensions;
use self::tfidf::{TfIdf, DEFAULT_MAX_FEATURES};
use super::linkage::average_linkage;
use super::{flatten_groups, ProductSorter, SimilarityGroup};
use crate::product::{ProductRecord, ProductSet};

/// Default similarity above which products share a cluster.
pub const DEFAULT_SIMILARITY_THRESHOLD: f64 = 0.3;

/// Categories with at most this many members are never split.
const MIN_CLUSTER_INPUT: usize = 2;

/// How products are grouped.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FuzzyStrategy {
    /// Catalog category table with material/profile/size ordering
    Catalog,
    /// TF-IDF clustering within keyword categories
    Clustered {
        /// Cosine similarity needed to share a cluster, in `[0, 1]`
        similarity_threshold: f64,
    },
}

impl Default for FuzzyStrategy {
    fn default() -> Self {
        FuzzyStrategy::Catalog
    }
}

/// Groups and orders products by their descriptions.
#[derive(Debug, Clone, PartialEq)]
pub struct FuzzyProductSorter {
    strategy: FuzzyStrategy,
    max_features: usize,
}

impl Default for FuzzyProductSorter {
    fn default() -> Self {
        Self::new(FuzzyStrategy::default())
    }
}

impl FuzzyProductSorter {
    /// Create a sorter with the given strategy.
    pub fn new(strategy: FuzzyStrategy) -> Self {
        Self {
            strategy,
            max_features: DEFAULT_MAX_FEATURES,
        }
    }

    /// Catalog-order sorter.
    pub fn catalog() -> Self {
        Self::new(FuzzyStrategy::Catalog)
    }

    /// Clustering sorter. The threshold is clamped to `[0, 1]`.
    pub fn clustered(similarity_threshold: f64) -> Self {
        let threshold = if similarity_threshold.is_finite() {
            similarity_threshold.clamp(0.0, 1.0)
        } else {
            DEFAULT_SIMILARITY_THRESHOLD
        };
        Self::new(FuzzyStrategy::Clustered {
            similarity_threshold: threshold,
        })
    }

    /// Set the TF-IDF vocabulary cap.
    pub fn with_max_features(mut self, max_features: usize) -> Self {
        self.max_features = max_features.max(1);
        self
    }

    /// Active strategy.
    pub fn strategy(&self) -> FuzzyStrategy {
        self.strategy
    }

    /// Group products; groups and their members are in final order.
    pub fn group(&self, products: &ProductSet) -> Vec<SimilarityGroup> {
        let groups = match self.strategy {
            FuzzyStrategy::Catalog => catalog_groups(products),
            FuzzyStrategy::Clustered {
                similarity_threshold,
            } => self.clustered_groups(products, similarity_threshold),
        };
        log::debug!(
            "Fuzzy grouping: {} products in {} groups",
            products.len(),
            groups.len()
        );
        groups
    }

    fn clustered_groups(&self, products: &ProductSet, threshold: f64) -> Vec<SimilarityGroup> {
        let mut by_category: IndexMap<&'static str, Vec<&str>> = IndexMap::new();
        for (id, product) in products {
            by_category
                .entry(catalog::product_category(product))
                .or_default()
                .push(id.as_str());
        }

        let mut groups: Vec<SimilarityGroup> = Vec::new();
        for (category, ids) in by_category {
            for mut members in self.split_category(category, &ids, products, threshold) {
                members.sort_by(|a, b| compare_by_pattern(a, b, products));
                groups.push(SimilarityGroup::new(
                    category,
                    members.into_iter().map(str::to_string).collect(),
                ));
            }
        }

        groups.sort_by_cached_key(|group| {
            let first = group.ids.first().cloned().unwrap_or_default();
            let text = products
                .get(&first)
                .map(|p| cluster_text(&first, p).to_lowercase())
                .unwrap_or_default();
            (text, first)
        });
        groups
    }

    /// Split one category into text clusters.
    fn split_category<'a>(
        &self,
        category: &str,
        ids: &[&'a str],
        products: &ProductSet,
        threshold: f64,
    ) -> Vec<Vec<&'a str>> {
        if ids.len() <= MIN_CLUSTER_INPUT {
            return vec![ids.to_vec()];
        }

        let documents: Vec<String> = ids
            .iter()
            .map(|id| {
                products
                    .get(*id)
                    .map(|p| cluster_text(id, p))
                    .unwrap_or_else(|| id.to_string())
            })
            .collect();

        let Some(model) = TfIdf::fit(&documents, self.max_features) else {
            log::debug!(
                "No usable terms in category '{}', keeping {} products together",
                category,
                ids.len()
            );
            return vec![ids.to_vec()];
        };

        let similarity = model.cosine_similarity();
        let n = ids.len();
        let distances = DMatrix::from_fn(n, n, |i, j| {
            if i == j {
                0.0
            } else {
                (1.0 - similarity[(i, j)]).clamp(0.0, 2.0)
            }
        });
        if distances.iter().any(|d| !d.is_finite()) {
            log::warn!(
                "Degenerate similarity in category '{}', keeping {} products together",
                category,
                n
            );
            return vec![ids.to_vec()];
        }

        average_linkage(&distances)
            .clusters_by_distance(1.0 - threshold)
            .into_iter()
            .map(|cluster| cluster.into_iter().map(|i| ids[i]).collect())
            .collect()
    }
}

impl ProductSorter for FuzzyProductSorter {
    fn name(&self) -> &str {
        match self.strategy {
            FuzzyStrategy::Catalog => "fuzzy",
            FuzzyStrategy::Clustered { .. } => "fuzzy-clustered",
        }
    }

    fn sort(&self, products: &ProductSet) -> Vec<String> {
        flatten_groups(self.group(products))
    }
}

/// Catalog order, grouped into runs of the same major category.
fn catalog_groups(products: &ProductSet) -> Vec<SimilarityGroup> {
    let mut keys: Vec<CatalogKey> = products
        .iter()
        .map(|(id, product)| CatalogKey::new(id, product))
        .collect();
    keys.sort();

    let mut groups: Vec<SimilarityGroup> = Vec::new();
    for key in keys {
        match groups.last_mut() {
            Some(group) if group.label == key.category => group.ids.push(key.id),
            _ => groups.push(SimilarityGroup::new(key.category, vec![key.id])),
        }
    }
    groups
}

/// Text clustered on: `"family detail"`, whichever is present, or the id.
fn cluster_text(id: &str, product: &ProductRecord) -> String {
    match (product.info.family(), product.info.detail()) {
        ("", "") => id.to_string(),
        (family, "") => family.to_string(),
        ("", detail) => detail.to_string(),
        (family, detail) => format!("{} {}", family, detail),
    }
}

fn compare_by_pattern(a: &str, b: &str, products: &ProductSet) -> Ordering {
    let key = |id: &str| {
        products
            .get(id)
            .map(|p| PatternDimensions::extract(p).sort_key())
            .unwrap_or_default()
    };
    let (ka, kb) = (key(a), key(b));
    ka.iter()
        .zip(kb.iter())
        .map(|(x, y)| x.total_cmp(y))
        .find(|o| o.is_ne())
        .unwrap_or(Ordering::Equal)
        .then_with(|| a.cmp(b))
}
