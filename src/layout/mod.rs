//! Label layout.
//!
//! This module computes where text and the product image go on a label:
//!
//! - [`LabelDimensions`]: label geometry (image slot, text column, margins)
//! - [`LabelLayoutEngine`]: binary-search font fitting against measured text
//! - [`LayoutPlan`]: the typed result handed to a renderer
//! - [`wrap`]: measured greedy word wrap and ellipsis truncation

pub mod dimensions;
pub mod engine;
pub mod plan;
pub mod wrap;

// Re-export main types
pub use dimensions::LabelDimensions;
pub use engine::LabelLayoutEngine;
pub use plan::{BlockKind, LayoutPlan, TextBlock};
pub use wrap::{truncate_with_ellipsis, wrap_text};
