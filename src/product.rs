//! Product records.
//!
//! Records mirror the catalog API's product JSON (`FamilyDescription`,
//! `DetailDescription`, `Specifications`, ...). Every field is optional and
//! `null` reads the same as absent, so a sparse or malformed record never
//! stops a batch.

use std::io::Read;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// A batch of products keyed by product id, in input order.
pub type ProductSet = IndexMap<String, ProductRecord>;

/// Specification attributes shown in the dimensions block, with their label
/// prefixes.
const DIMENSION_ATTRIBUTES: [(&str, &str); 8] = [
    ("Length", "L: "),
    ("Thread Size", ""),
    ("Thread Pitch", ""),
    ("Head Diameter", "HD: "),
    ("Width", "W: "),
    ("Height", "H: "),
    ("Diameter", "D: "),
    ("Size", "Size: "),
];

/// At most this many dimensions are shown on a label.
const MAX_LABEL_DIMENSIONS: usize = 3;

/// One `{Attribute, Values}` entry of a product's specifications.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Specification {
    /// Attribute name, e.g. "Thread Size"
    #[serde(default)]
    pub attribute: Option<String>,
    /// Attribute values; the first is the one displayed
    #[serde(default)]
    pub values: Option<Vec<String>>,
}

impl Specification {
    /// Create a single-valued specification.
    pub fn new(attribute: &str, value: &str) -> Self {
        Self {
            attribute: Some(attribute.to_string()),
            values: Some(vec![value.to_string()]),
        }
    }

    /// Attribute name, empty if absent.
    pub fn attribute(&self) -> &str {
        self.attribute.as_deref().unwrap_or("")
    }

    /// First non-blank value.
    pub fn first_value(&self) -> Option<&str> {
        self.values
            .as_deref()
            .and_then(|values| values.first())
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
    }
}

/// Catalog data for one product.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ProductInfo {
    /// Product family, e.g. "Alloy Steel Socket Head Screw"
    #[serde(default)]
    pub family_description: Option<String>,
    /// Variant detail, e.g. "M3 x 0.5 mm Thread, 10 mm Long"
    #[serde(default)]
    pub detail_description: Option<String>,
    /// Structured attributes
    #[serde(default)]
    pub specifications: Option<Vec<Specification>>,
    /// Catalog part number
    #[serde(default)]
    pub part_number: Option<String>,
    /// Catalog category
    #[serde(default)]
    pub product_category: Option<String>,
    /// Availability status
    #[serde(default)]
    pub product_status: Option<String>,
}

impl ProductInfo {
    /// Create empty product info.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the family description.
    pub fn with_family(mut self, family: &str) -> Self {
        self.family_description = Some(family.to_string());
        self
    }

    /// Set the detail description.
    pub fn with_detail(mut self, detail: &str) -> Self {
        self.detail_description = Some(detail.to_string());
        self
    }

    /// Set the part number.
    pub fn with_part_number(mut self, part_number: &str) -> Self {
        self.part_number = Some(part_number.to_string());
        self
    }

    /// Set the catalog category.
    pub fn with_category(mut self, category: &str) -> Self {
        self.product_category = Some(category.to_string());
        self
    }

    /// Append a single-valued specification.
    pub fn with_spec(mut self, attribute: &str, value: &str) -> Self {
        self.specifications
            .get_or_insert_with(Vec::new)
            .push(Specification::new(attribute, value));
        self
    }

    /// Family description, trimmed; empty if absent.
    pub fn family(&self) -> &str {
        self.family_description.as_deref().unwrap_or("").trim()
    }

    /// Detail description, trimmed; empty if absent.
    pub fn detail(&self) -> &str {
        self.detail_description.as_deref().unwrap_or("").trim()
    }

    /// Part number; empty if absent.
    pub fn part_number(&self) -> &str {
        self.part_number.as_deref().unwrap_or("").trim()
    }

    /// Catalog category; empty if absent.
    pub fn category(&self) -> &str {
        self.product_category.as_deref().unwrap_or("").trim()
    }

    /// Specifications; empty if absent.
    pub fn specifications(&self) -> &[Specification] {
        self.specifications.as_deref().unwrap_or(&[])
    }

    /// First value of the first specification named `attribute`.
    pub fn spec_value(&self, attribute: &str) -> Option<&str> {
        self.specifications()
            .iter()
            .filter(|spec| spec.attribute() == attribute)
            .find_map(|spec| spec.first_value())
    }
}

/// A product: catalog info plus locally resolved assets.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductRecord {
    /// Catalog data
    #[serde(default)]
    pub info: ProductInfo,
    /// Product image on disk, if downloaded
    #[serde(default)]
    pub image_path: Option<PathBuf>,
    /// CAD file on disk, if downloaded
    #[serde(default)]
    pub cad_path: Option<PathBuf>,
}

impl ProductRecord {
    /// Wrap catalog info without assets.
    pub fn new(info: ProductInfo) -> Self {
        Self {
            info,
            image_path: None,
            cad_path: None,
        }
    }

    /// Attach an image path.
    pub fn with_image(mut self, path: impl Into<PathBuf>) -> Self {
        self.image_path = Some(path.into());
        self
    }

    /// Image path, if any.
    pub fn image_path(&self) -> Option<&Path> {
        self.image_path.as_deref()
    }

    /// Description line: `"family - detail"`, or whichever part is present.
    ///
    /// Empty when both are missing; the layout engine substitutes its
    /// placeholder.
    pub fn description_text(&self) -> String {
        match (self.info.family(), self.info.detail()) {
            ("", "") => String::new(),
            (family, "") => family.to_string(),
            ("", detail) => detail.to_string(),
            (family, detail) => format!("{} - {}", family, detail),
        }
    }

    /// Dimensions line built from the specifications.
    ///
    /// Dimensional attributes are taken in specification order, prefixed
    /// (`L: `, `W: `, `HD: `, ...; thread size and pitch unprefixed), capped at
    /// three and joined with `" | "`. Empty when there are none.
    ///
    /// # Examples
    ///
    /// ```
    /// use label_oxide::product::{ProductInfo, ProductRecord};
    ///
    /// let product = ProductRecord::new(
    ///     ProductInfo::new()
    ///         .with_spec("Thread Size", "M3")
    ///         .with_spec("Material", "Steel")
    ///         .with_spec("Length", "10 mm"),
    /// );
    /// assert_eq!(product.dimensions_text(), "M3 | L: 10 mm");
    /// ```
    pub fn dimensions_text(&self) -> String {
        let parts: Vec<String> = self
            .info
            .specifications()
            .iter()
            .filter_map(|spec| {
                let (_, prefix) = DIMENSION_ATTRIBUTES
                    .iter()
                    .find(|(name, _)| *name == spec.attribute())?;
                let value = spec.first_value()?;
                Some(format!("{}{}", prefix, value))
            })
            .take(MAX_LABEL_DIMENSIONS)
            .collect();
        parts.join(" | ")
    }
}

/// Read a product batch from JSON: an object mapping product id to record.
pub fn read_products<R: Read>(reader: R) -> Result<ProductSet> {
    Ok(serde_json::from_reader(reader)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_description_text_variants() {
        let both = ProductRecord::new(
            ProductInfo::new()
                .with_family("Hex Nut")
                .with_detail("Zinc-Plated, 1/4\"-20"),
        );
        assert_eq!(both.description_text(), "Hex Nut - Zinc-Plated, 1/4\"-20");

        let family = ProductRecord::new(ProductInfo::new().with_family("Hex Nut"));
        assert_eq!(family.description_text(), "Hex Nut");

        let detail = ProductRecord::new(ProductInfo::new().with_detail("  1/4\"-20 "));
        assert_eq!(detail.description_text(), "1/4\"-20");

        assert_eq!(ProductRecord::default().description_text(), "");
    }

    #[test]
    fn test_dimensions_text_prefixes_and_cap() {
        let product = ProductRecord::new(
            ProductInfo::new()
                .with_spec("Diameter", "1/4\"")
                .with_spec("Head Diameter", "0.38\"")
                .with_spec("Width", "3 mm")
                .with_spec("Height", "5 mm"),
        );
        assert_eq!(product.dimensions_text(), "D: 1/4\" | HD: 0.38\" | W: 3 mm");
    }

    #[test]
    fn test_dimensions_text_skips_blank_values() {
        let mut info = ProductInfo::new().with_spec("Length", "  ");
        info.specifications.get_or_insert_with(Vec::new).push(Specification {
            attribute: Some("Size".to_string()),
            values: None,
        });
        let product = ProductRecord::new(info.with_spec("Thread Pitch", "1.25 mm"));
        assert_eq!(product.dimensions_text(), "1.25 mm");
        assert_eq!(ProductRecord::default().dimensions_text(), "");
    }

    #[test]
    fn test_deserialize_api_shape() {
        let json = r#"{
            "91290A115": {
                "info": {
                    "FamilyDescription": "Alloy Steel Socket Head Screw",
                    "DetailDescription": null,
                    "Specifications": [
                        {"Attribute": "Thread Size", "Values": ["M3"]},
                        {"Attribute": "Length", "Values": null}
                    ],
                    "PartNumber": "91290A115",
                    "UnknownField": 42
                },
                "image_path": "/tmp/91290A115.png"
            },
            "94895A031": {}
        }"#;
        let products = read_products(json.as_bytes()).unwrap();
        assert_eq!(products.len(), 2);
        let ids: Vec<&String> = products.keys().collect();
        assert_eq!(ids, vec!["91290A115", "94895A031"]);

        let screw = &products["91290A115"];
        assert_eq!(screw.info.detail(), "");
        assert_eq!(screw.info.spec_value("Thread Size"), Some("M3"));
        assert_eq!(screw.info.spec_value("Length"), None);
        assert_eq!(screw.image_path(), Some(Path::new("/tmp/91290A115.png")));

        let empty = &products["94895A031"];
        assert_eq!(empty.info.specifications().len(), 0);
        assert!(empty.image_path().is_none());
    }

    #[test]
    fn test_null_specifications() {
        let info: ProductInfo = serde_json::from_str(r#"{"Specifications": null}"#).unwrap();
        assert!(info.specifications().is_empty());
        assert_eq!(info.spec_value("Length"), None);
    }
}
