//! Drawing surfaces.
//!
//! A surface is whatever ends up holding the label: a PDF page, a raster
//! canvas, or the [`RecordingSurface`] used in tests. Coordinates are points.

use serde::Serialize;

use super::product_image::ProductImage;
use crate::error::Result;
use crate::geometry::Rect;

/// Where a surface puts `(0, 0)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Origin {
    /// y grows downward (raster images)
    TopLeft,
    /// y grows upward (PDF)
    BottomLeft,
}

/// Target the renderer draws onto.
pub trait DrawingSurface {
    /// Coordinate origin.
    fn origin(&self) -> Origin;

    /// Width and height in points.
    fn page_size(&self) -> (f32, f32);

    /// Draw one line of text with its baseline at `y`.
    fn draw_text(&mut self, x: f32, y: f32, text: &str, font: &str, size: f32) -> Result<()>;

    /// Draw an image into `rect` (bottom-left corner for [`Origin::BottomLeft`]).
    fn draw_image(&mut self, rect: Rect, image: &ProductImage, preserve_aspect: bool) -> Result<()>;

    /// Mark the image slot of a product without an image.
    fn draw_placeholder(&mut self, rect: Rect) -> Result<()>;
}

/// A recorded drawing operation.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum DrawCommand {
    /// A line of text
    Text {
        /// Left edge
        x: f32,
        /// Baseline
        y: f32,
        /// Content
        text: String,
        /// Font name
        font: String,
        /// Font size, points
        size: f32,
    },
    /// An image
    Image {
        /// Placement
        rect: Rect,
        /// Source width, pixels
        width_px: u32,
        /// Source height, pixels
        height_px: u32,
        /// Whether the aspect ratio is kept
        preserve_aspect: bool,
    },
    /// An image placeholder
    Placeholder {
        /// Placement
        rect: Rect,
    },
}

/// Surface that records every call.
#[derive(Debug, Clone, Serialize)]
pub struct RecordingSurface {
    origin: Origin,
    width: f32,
    height: f32,
    commands: Vec<DrawCommand>,
}

impl RecordingSurface {
    /// Create a surface of `width × height` points.
    pub fn new(width: f32, height: f32, origin: Origin) -> Self {
        Self {
            origin,
            width,
            height,
            commands: Vec::new(),
        }
    }

    /// Recorded commands, in call order.
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Recorded text lines.
    pub fn text_commands(&self) -> impl Iterator<Item = &DrawCommand> {
        self.commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::Text { .. }))
    }

    /// Drop recorded commands.
    pub fn clear(&mut self) {
        self.commands.clear();
    }
}

impl DrawingSurface for RecordingSurface {
    fn origin(&self) -> Origin {
        self.origin
    }

    fn page_size(&self) -> (f32, f32) {
        (self.width, self.height)
    }

    fn draw_text(&mut self, x: f32, y: f32, text: &str, font: &str, size: f32) -> Result<()> {
        self.commands.push(DrawCommand::Text {
            x,
            y,
            text: text.to_string(),
            font: font.to_string(),
            size,
        });
        Ok(())
    }

    fn draw_image(&mut self, rect: Rect, image: &ProductImage, preserve_aspect: bool) -> Result<()> {
        let (width_px, height_px) = image.dimensions();
        self.commands.push(DrawCommand::Image {
            rect,
            width_px,
            height_px,
            preserve_aspect,
        });
        Ok(())
    }

    fn draw_placeholder(&mut self, rect: Rect) -> Result<()> {
        self.commands.push(DrawCommand::Placeholder { rect });
        Ok(())
    }
}
