//! Label rendering.
//!
//! Turns a [`LayoutPlan`] into drawing calls on a [`DrawingSurface`]. The
//! plan is in top-down label coordinates; the renderer converts to points,
//! places text baselines, fits the product image into its slot and flips
//! coordinates for bottom-left surfaces.

pub mod product_image;
pub mod surface;

pub use self::product_image::ProductImage;
pub use self::surface::{DrawCommand, DrawingSurface, Origin, RecordingSurface};

use serde::Serialize;

use crate::error::Result;
use crate::geometry::Rect;
use crate::layout::{LayoutPlan, TextBlock};
use crate::units::POINTS_PER_INCH;

/// Fraction of the image slot an image may fill.
pub const IMAGE_SAFETY_FACTOR: f32 = 0.95;

/// Slack allowed when checking a line against the bottom margin, points.
const BOTTOM_TOLERANCE: f32 = 0.01;

/// What a render call drew.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RenderStats {
    /// Text lines drawn
    pub lines_drawn: usize,
    /// Text lines dropped for crossing the bottom margin
    pub lines_skipped: usize,
    /// Whether an image (not a placeholder) was drawn
    pub image_drawn: bool,
}

/// Draws layout plans.
#[derive(Debug, Clone, Copy, Default)]
pub struct LabelRenderer;

impl LabelRenderer {
    /// Create a renderer.
    pub fn new() -> Self {
        Self
    }

    /// Draw `plan` onto `surface`, with `image` in the image slot or a
    /// placeholder when there is none.
    pub fn render(
        &self,
        plan: &LayoutPlan,
        image: Option<&ProductImage>,
        surface: &mut dyn DrawingSurface,
    ) -> Result<RenderStats> {
        let mut stats = RenderStats::default();
        let page_height = surface.page_size().1;
        let origin = surface.origin();
        let to_surface_rect = |rect: Rect| match origin {
            Origin::TopLeft => rect,
            Origin::BottomLeft => Rect::new(
                rect.x,
                page_height - rect.bottom(),
                rect.width,
                rect.height,
            ),
        };

        let area = plan.image_area.scaled(POINTS_PER_INCH);
        match image {
            Some(img) => {
                let (w, h) = img.dimensions();
                let fitted = area.fit_aspect(w as f32, h as f32, IMAGE_SAFETY_FACTOR);
                surface.draw_image(to_surface_rect(fitted), img, true)?;
                stats.image_drawn = true;
            },
            None => surface.draw_placeholder(to_surface_rect(area))?,
        }

        for block in plan.blocks() {
            self.render_block(plan, block, surface, &mut stats)?;
        }
        Ok(stats)
    }

    fn render_block(
        &self,
        plan: &LayoutPlan,
        block: &TextBlock,
        surface: &mut dyn DrawingSurface,
        stats: &mut RenderStats,
    ) -> Result<()> {
        let dims = &plan.dimensions_used;
        let margin = dims.margin_pts();
        let bottom_limit = dims.height_pts() - margin + BOTTOM_TOLERANCE;
        let x = dims.text_start_x_pts();
        let page_height = surface.page_size().1;
        let step = block.font_size * plan.line_spacing;

        let Some(first) = block.bbox.lines.first() else {
            return Ok(());
        };
        let mut baseline = margin + block.y_position + first.ascent;

        for (i, line) in block.lines.iter().enumerate() {
            let descent = block.bbox.lines.get(i).map_or(first.descent, |b| b.descent);
            if baseline - descent > bottom_limit {
                log::warn!(
                    "Skipping {} line '{}': crosses the bottom margin",
                    block.kind.as_str(),
                    line
                );
                stats.lines_skipped += 1;
            } else {
                let y = match surface.origin() {
                    Origin::TopLeft => baseline,
                    Origin::BottomLeft => page_height - baseline,
                };
                surface.draw_text(x, y, line, &block.font_name, block.font_size)?;
                stats.lines_drawn += 1;
            }
            baseline += step;
        }
        Ok(())
    }
}
