//! Layout plan types.
//!
//! A [`LayoutPlan`] is the engine's output: which text blocks are present,
//! their font sizes, line breaks and vertical positions, plus the image box.
//! Block positions are in points measured from the top of the text column
//! (just below the top margin); renderers translate to their own origin.

use serde::Serialize;

use crate::error::Result;
use crate::geometry::Rect;
use crate::layout::LabelDimensions;
use crate::metrics::MultilineBBox;

/// The three kinds of text block, in stacking order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockKind {
    /// Family and detail description
    Description,
    /// Key dimensions from the specifications
    Dimensions,
    /// Prefixed product identifier
    ProductId,
}

impl BlockKind {
    /// Stable lowercase name.
    pub fn as_str(&self) -> &'static str {
        match self {
            BlockKind::Description => "description",
            BlockKind::Dimensions => "dimensions",
            BlockKind::ProductId => "product_id",
        }
    }
}

/// One laid-out text block.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextBlock {
    /// Which block this is
    pub kind: BlockKind,
    /// Unwrapped text
    pub content: String,
    /// Font the block is set in
    pub font_name: String,
    /// Font size in points
    pub font_size: f32,
    /// Whether the font is bold
    pub is_bold: bool,
    /// Wrapped (and possibly truncated) lines
    pub lines: Vec<String>,
    /// Measured box of `lines`
    pub bbox: MultilineBBox,
    /// Top of the block, in points from the top of the text column
    pub y_position: f32,
    /// Whether lines were dropped or shortened to fit
    pub truncated: bool,
}

impl TextBlock {
    /// Height of the block in points.
    pub fn total_height(&self) -> f32 {
        self.bbox.height
    }

    /// Bottom edge of the block, in points from the top of the text column.
    pub fn bottom(&self) -> f32 {
        self.y_position + self.bbox.height
    }
}

/// The complete layout of one label.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LayoutPlan {
    /// Description block
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<TextBlock>,
    /// Dimensions block, absent when the product has no dimension text
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dimensions: Option<TextBlock>,
    /// Product id block
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product_id: Option<TextBlock>,
    /// Image box, in inches from the label's top-left corner
    pub image_area: Rect,
    /// Geometry the plan was computed for
    pub dimensions_used: LabelDimensions,
    /// Font size chosen by the fitter (points)
    pub base_font_size: f32,
    /// Line spacing factor used for multi-line blocks
    pub line_spacing: f32,
    /// Whether any block was truncated or dropped
    pub truncated: bool,
}

impl LayoutPlan {
    /// Present blocks, top to bottom.
    pub fn blocks(&self) -> impl Iterator<Item = &TextBlock> {
        [&self.description, &self.dimensions, &self.product_id]
            .into_iter()
            .flatten()
    }

    /// The block of the given kind, if present.
    pub fn block(&self, kind: BlockKind) -> Option<&TextBlock> {
        match kind {
            BlockKind::Description => self.description.as_ref(),
            BlockKind::Dimensions => self.dimensions.as_ref(),
            BlockKind::ProductId => self.product_id.as_ref(),
        }
    }

    /// Number of present blocks.
    pub fn block_count(&self) -> usize {
        self.blocks().count()
    }

    /// Distance from the top of the first block to the bottom of the last.
    pub fn content_height(&self) -> f32 {
        let mut blocks = self.blocks();
        let Some(first) = blocks.next() else {
            return 0.0;
        };
        let last = blocks.last().unwrap_or(first);
        last.bottom() - first.y_position
    }

    /// Serialize the plan as pretty-printed JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
