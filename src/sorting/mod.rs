//! Product ordering.
//!
//! Every sorter takes the whole product batch and returns the product ids in
//! a new order. The result is always a permutation of the input ids and is
//! the same for the same input.
//!
//! - [`FuzzyProductSorter`]: groups by description, orders by parsed size
//! - [`VisualSimilaritySorter`]: orders by image similarity
//! - [`TextFieldSorter`]: plain alphabetical order on one text field
//!
//! [`SortSelection`] parses a sorter choice from a string such as
//! `"fuzzy"`, `"visual:spectral"` or `"text:product_id"`.

pub mod fuzzy;
pub mod linkage;
pub mod visual;

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::error::Error;
use crate::product::{ProductRecord, ProductSet};

pub use fuzzy::{FuzzyProductSorter, FuzzyStrategy};
pub use visual::{GroupingCriterion, SortMethod, VisualSimilaritySorter};

/// Reorders a product batch.
pub trait ProductSorter: Send + Sync {
    /// Short name, as accepted by [`SortSelection`].
    fn name(&self) -> &str;

    /// Product ids in their new order.
    fn sort(&self, products: &ProductSet) -> Vec<String>;
}

/// A run of related products.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SimilarityGroup {
    /// What the members have in common (a category or cluster name)
    pub label: String,
    /// Member ids, in order
    pub ids: Vec<String>,
}

impl SimilarityGroup {
    /// Create a group.
    pub fn new(label: impl Into<String>, ids: Vec<String>) -> Self {
        Self {
            label: label.into(),
            ids,
        }
    }

    /// Number of members.
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Whether the group has no members.
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

/// Concatenate groups into one order.
pub fn flatten_groups(groups: Vec<SimilarityGroup>) -> Vec<String> {
    groups.into_iter().flat_map(|g| g.ids).collect()
}

/// Overview of one group, for reports.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupSummary {
    /// Position of the group
    pub group_id: usize,
    /// Group label
    pub label: String,
    /// Member count
    pub size: usize,
    /// Family description of the first member
    pub family: String,
    /// Member ids
    pub products: Vec<String>,
    /// Dimensions line of each member
    pub dimensions: Vec<String>,
}

/// Summarise groups against the batch they came from.
pub fn summarize_groups(groups: &[SimilarityGroup], products: &ProductSet) -> Vec<GroupSummary> {
    groups
        .iter()
        .enumerate()
        .map(|(group_id, group)| {
            let member = |id: &String| products.get(id);
            GroupSummary {
                group_id,
                label: group.label.clone(),
                size: group.len(),
                family: group
                    .ids
                    .first()
                    .and_then(member)
                    .map(|p| p.info.family().to_string())
                    .unwrap_or_default(),
                products: group.ids.clone(),
                dimensions: group
                    .ids
                    .iter()
                    .map(|id| member(id).map(ProductRecord::dimensions_text).unwrap_or_default())
                    .collect(),
            }
        })
        .collect()
}

/// Rebuild a batch in the given order.
///
/// Ids not in `products` are ignored, and products missing from `order`
/// are appended in their original order, so nothing is ever lost.
pub fn apply_order(products: &ProductSet, order: &[String]) -> ProductSet {
    let mut sorted = ProductSet::with_capacity(products.len());
    for id in order {
        if let Some(product) = products.get(id) {
            sorted.entry(id.clone()).or_insert_with(|| product.clone());
        }
    }
    let missing = products.len() - sorted.len();
    if missing > 0 {
        log::warn!("{} products missing from sort order, appending", missing);
        for (id, product) in products {
            sorted.entry(id.clone()).or_insert_with(|| product.clone());
        }
    }
    sorted
}

/// Field used by [`TextFieldSorter`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextSortField {
    /// `"family - detail"` description
    #[default]
    Description,
    /// Product id
    ProductId,
    /// Family description
    Family,
    /// Detail description
    Detail,
}

impl TextSortField {
    /// Name as accepted by `FromStr`.
    pub fn as_str(&self) -> &'static str {
        match self {
            TextSortField::Description => "description",
            TextSortField::ProductId => "product_id",
            TextSortField::Family => "family",
            TextSortField::Detail => "detail",
        }
    }
}

impl FromStr for TextSortField {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "description" => Ok(TextSortField::Description),
            "product_id" | "id" => Ok(TextSortField::ProductId),
            "family" => Ok(TextSortField::Family),
            "detail" => Ok(TextSortField::Detail),
            _ => Err(Error::UnknownSortMethod(format!("text:{}", s))),
        }
    }
}

/// Case-insensitive alphabetical sort on one field. Ties keep input order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TextFieldSorter {
    field: TextSortField,
}

impl TextFieldSorter {
    /// Create a sorter on `field`.
    pub fn new(field: TextSortField) -> Self {
        Self { field }
    }

    fn key(&self, id: &str, product: &ProductRecord) -> String {
        match self.field {
            TextSortField::Description => product.description_text(),
            TextSortField::ProductId => id.to_string(),
            TextSortField::Family => product.info.family().to_string(),
            TextSortField::Detail => product.info.detail().to_string(),
        }
        .to_lowercase()
    }
}

impl ProductSorter for TextFieldSorter {
    fn name(&self) -> &str {
        "text"
    }

    fn sort(&self, products: &ProductSet) -> Vec<String> {
        let mut keyed: Vec<(String, &String)> = products
            .iter()
            .map(|(id, product)| (self.key(id, product), id))
            .collect();
        keyed.sort_by(|a, b| a.0.cmp(&b.0));
        keyed.into_iter().map(|(_, id)| id.clone()).collect()
    }
}

/// A sorter choice parsed from text.
///
/// ```
/// use label_oxide::sorting::{SortMethod, SortSelection, TextSortField};
///
/// assert_eq!("fuzzy".parse::<SortSelection>().unwrap(), SortSelection::Fuzzy);
/// assert_eq!(
///     "visual:greedy".parse::<SortSelection>().unwrap(),
///     SortSelection::Visual(SortMethod::Greedy)
/// );
/// assert_eq!(
///     "text:family".parse::<SortSelection>().unwrap(),
///     SortSelection::Text(TextSortField::Family)
/// );
/// assert!("random".parse::<SortSelection>().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SortSelection {
    /// Catalog-order fuzzy sort
    Fuzzy,
    /// TF-IDF clustered fuzzy sort
    FuzzyClustered,
    /// Visual similarity sort
    Visual(SortMethod),
    /// Alphabetical sort
    Text(TextSortField),
}

impl SortSelection {
    /// Build the sorter.
    pub fn into_sorter(self) -> Box<dyn ProductSorter> {
        match self {
            SortSelection::Fuzzy => Box::new(FuzzyProductSorter::catalog()),
            SortSelection::FuzzyClustered => Box::new(FuzzyProductSorter::clustered(
                fuzzy::DEFAULT_SIMILARITY_THRESHOLD,
            )),
            SortSelection::Visual(method) => Box::new(VisualSimilaritySorter::new(method)),
            SortSelection::Text(field) => Box::new(TextFieldSorter::new(field)),
        }
    }
}

impl fmt::Display for SortSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortSelection::Fuzzy => f.write_str("fuzzy"),
            SortSelection::FuzzyClustered => f.write_str("fuzzy-clustered"),
            SortSelection::Visual(method) => write!(f, "visual:{}", method),
            SortSelection::Text(field) => write!(f, "text:{}", field.as_str()),
        }
    }
}

impl FromStr for SortSelection {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let (kind, arg) = match trimmed.split_once(':') {
            Some((kind, arg)) => (kind, Some(arg)),
            None => (trimmed, None),
        };
        match (kind.to_ascii_lowercase().as_str(), arg) {
            ("fuzzy", None) => Ok(SortSelection::Fuzzy),
            ("fuzzy-clustered" | "fuzzy_clustered", None) => Ok(SortSelection::FuzzyClustered),
            ("visual", None) => Ok(SortSelection::Visual(SortMethod::default())),
            ("visual", Some(method)) => Ok(SortSelection::Visual(method.parse()?)),
            ("text", None) => Ok(SortSelection::Text(TextSortField::default())),
            ("text", Some(field)) => Ok(SortSelection::Text(field.parse()?)),
            _ => Err(Error::UnknownSortMethod(trimmed.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::product::ProductInfo;

    fn batch() -> ProductSet {
        [("3", "washer"), ("1", "Bolt"), ("2", "anchor")]
            .into_iter()
            .map(|(id, family)| {
                (
                    id.to_string(),
                    ProductRecord::new(ProductInfo::new().with_family(family)),
                )
            })
            .collect()
    }

    #[test]
    fn test_text_sorter_case_insensitive() {
        let order = TextFieldSorter::new(TextSortField::Family).sort(&batch());
        assert_eq!(order, vec!["2", "1", "3"]);
        let by_id = TextFieldSorter::new(TextSortField::ProductId).sort(&batch());
        assert_eq!(by_id, vec!["1", "2", "3"]);
    }

    #[test]
    fn test_text_sorter_stable_on_ties() {
        let products: ProductSet = ["b", "a", "c"]
            .into_iter()
            .map(|id| (id.to_string(), ProductRecord::default()))
            .collect();
        let order = TextFieldSorter::new(TextSortField::Detail).sort(&products);
        assert_eq!(order, vec!["b", "a", "c"]);
    }

    #[test]
    fn test_apply_order_keeps_everything() {
        let products = batch();
        let sorted = apply_order(
            &products,
            &["2".to_string(), "ghost".to_string(), "2".to_string()],
        );
        let ids: Vec<&String> = sorted.keys().collect();
        assert_eq!(ids, vec!["2", "3", "1"]);
    }

    #[test]
    fn test_selection_round_trip_names() {
        for text in ["fuzzy", "fuzzy-clustered", "visual:spectral", "text:product_id"] {
            let selection: SortSelection = text.parse().unwrap();
            assert_eq!(selection.to_string(), text);
        }
        assert_eq!(
            "visual".parse::<SortSelection>().unwrap(),
            SortSelection::Visual(SortMethod::Hierarchical)
        );
        assert!("text:colour".parse::<SortSelection>().is_err());
        assert!("fuzzy:extra".parse::<SortSelection>().is_err());
    }

    #[test]
    fn test_selection_builds_named_sorter() {
        assert_eq!(SortSelection::Fuzzy.into_sorter().name(), "fuzzy");
        assert_eq!(SortSelection::FuzzyClustered.into_sorter().name(), "fuzzy-clustered");
        assert_eq!(SortSelection::Visual(SortMethod::Greedy).into_sorter().name(), "visual");
        assert_eq!(SortSelection::Text(TextSortField::Family).into_sorter().name(), "text");
    }

    #[test]
    fn test_summarize_groups() {
        let products = batch();
        let groups = FuzzyProductSorter::catalog().group(&products);
        let summary = summarize_groups(&groups, &products);
        assert_eq!(summary.len(), groups.len());
        assert_eq!(summary.iter().map(|s| s.size).sum::<usize>(), 3);
        assert_eq!(summary[0].group_id, 0);
        assert_eq!(summary[0].family, "Bolt");
    }
}
