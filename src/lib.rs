// Allow some clippy lints that are too pedantic for this project
#![allow(clippy::too_many_arguments)]
#![allow(clippy::needless_range_loop)]
#![allow(clippy::enum_variant_names)]
#![allow(clippy::doc_overindented_list_items)]
// Allow unused for tests
#![cfg_attr(test, allow(dead_code))]
#![cfg_attr(test, allow(unused_variables))]

//! # Label Oxide
//!
//! Dynamic layout for small printed product labels.
//!
//! ## Core Features
//!
//! ### Layout
//! - **Measured Font Fitting**: binary search for the largest font size whose
//!   wrapped text fits the label, measured against real font metrics
//! - **Text Hierarchy**: description, dimensions and product id blocks with the
//!   id never larger than the rest
//! - **Hard Margins**: nothing is placed outside the printable area; text that
//!   cannot fit at the minimum size is truncated with an ellipsis
//! - **Typed Plans**: [`LayoutPlan`] carries every block, line and box, ready
//!   for any renderer and serializable to JSON
//!
//! ### Sorting
//! - **Fuzzy Catalog Order**: products grouped by category, material and
//!   parsed thread/length sizes
//! - **Clustered Order**: TF-IDF similarity clusters within each category
//! - **Visual Order**: image feature vectors, PCA, and hierarchical,
//!   spectral or greedy ordering
//!
//! ### Rendering
//! - **Surface Trait**: draw plans onto any top-left or bottom-left surface
//! - **Image Fitting**: aspect-preserving placement with oversize images
//!   downsampled before embedding
//!
//! ## Quick Start
//!
//! ```
//! use label_oxide::{FontMetrics, LabelDimensions, LabelLayoutEngine};
//!
//! let engine = LabelLayoutEngine::new(LabelDimensions::new(1.5, 0.5));
//! let plan = engine.calculate_layout(
//!     &FontMetrics::new(),
//!     "Alloy Steel Socket Head Screw",
//!     Some("M3 x 0.5 mm Thread, 10 mm Long"),
//!     "91290A115",
//! )?;
//!
//! assert_eq!(plan.block_count(), 3);
//! assert!(plan.base_font_size >= 4.0);
//! # Ok::<(), label_oxide::Error>(())
//! ```
//!
//! Batches go through [`LabelPlanner`], which sorts and lays out every
//! product and keeps going when one of them fails.

#![warn(missing_docs)]

// Error handling
pub mod error;

// Units and geometry
pub mod geometry;
pub mod units;

// Configuration
pub mod config;

// Fonts and measurement
pub mod fonts;
pub mod metrics;

// Layout
pub mod layout;

// Products and sorting
pub mod product;
pub mod sorting;

// Rendering
pub mod render;

// Batch driver
pub mod planner;

// Re-exports
pub use config::{LabelConfig, LayoutConfig};
pub use error::{Error, Result};
pub use geometry::{Point, Rect};
pub use layout::{BlockKind, LabelDimensions, LabelLayoutEngine, LayoutPlan, TextBlock};
pub use metrics::{FontMetrics, TextBBox, TextMetrics};
pub use planner::{LabelOutcome, LabelPlanner};
pub use product::{read_products, ProductInfo, ProductRecord, ProductSet};
pub use render::{DrawingSurface, LabelRenderer, Origin, ProductImage, RecordingSurface};
pub use sorting::{
    FuzzyProductSorter, ProductSorter, SortMethod, SortSelection, TextFieldSorter,
    VisualSimilaritySorter,
};

// Version info
/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
