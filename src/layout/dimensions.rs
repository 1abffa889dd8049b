//! Label geometry.
//!
//! A label is split into an image slot on the left and a text column on the
//! right. All values here are in inches unless the method name says points.
//!
//! ```text
//!  margin                          margin
//!  |<-------- width ------------------->|
//!  +------------------------------------+
//!  |  +--------+  +-------------------+ |
//!  |  | image  |  | text column       | |  available_height
//!  |  +--------+  +-------------------+ |
//!  +------------------------------------+
//!  |<- image_width ->|<- text_width --->|
//! ```
//!
//! Margins are a hard constraint: the text column starts one margin after the
//! image slot and stops one margin before the right edge, and no text is
//! placed in the top or bottom margin bands.

use serde::Serialize;

use crate::error::Result;
use crate::geometry::Rect;
use crate::units::{inches_to_points, parse_dimension, validate_dimensions};

/// Geometry of one label.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LabelDimensions {
    /// Label width in inches
    pub width_in: f32,
    /// Label height in inches
    pub height_in: f32,
    /// Margin in inches, `min(0.05, 5% of width, 5% of height)`
    pub margin_in: f32,
    /// Fraction of the width reserved for the image
    pub image_ratio: f32,
}

impl LabelDimensions {
    /// Share of the label width given to the image by default.
    pub const DEFAULT_IMAGE_RATIO: f32 = 0.25;

    /// Upper bound on the margin, in inches.
    pub const MAX_MARGIN_IN: f32 = 0.05;

    /// Create label geometry with the default image ratio.
    ///
    /// # Examples
    ///
    /// ```
    /// use label_oxide::layout::LabelDimensions;
    ///
    /// let dims = LabelDimensions::new(1.5, 0.5);
    /// assert_eq!(dims.image_width(), 0.375);
    /// assert!((dims.margin_in - 0.025).abs() < 1e-6);
    /// assert!((dims.text_start_x() - 0.4).abs() < 1e-6);
    /// ```
    pub fn new(width_in: f32, height_in: f32) -> Self {
        Self::with_image_ratio(width_in, height_in, Self::DEFAULT_IMAGE_RATIO)
    }

    /// Create label geometry with a custom image ratio.
    ///
    /// Ratios outside `[0, 0.9]` are clamped; a non-finite ratio uses the
    /// default.
    pub fn with_image_ratio(width_in: f32, height_in: f32, image_ratio: f32) -> Self {
        let image_ratio = if image_ratio.is_finite() {
            image_ratio.clamp(0.0, 0.9)
        } else {
            Self::DEFAULT_IMAGE_RATIO
        };
        let margin_in = Self::MAX_MARGIN_IN
            .min(width_in * 0.05)
            .min(height_in * 0.05);
        Self {
            width_in,
            height_in,
            margin_in,
            image_ratio,
        }
    }

    /// Create label geometry after checking the size is printable.
    pub fn validated(width_in: f32, height_in: f32) -> Result<Self> {
        validate_dimensions(width_in, height_in)?;
        Ok(Self::new(width_in, height_in))
    }

    /// Parse and validate dimension strings such as `"2in"` and `"25mm"`.
    pub fn parse(width: &str, height: &str) -> Result<Self> {
        Self::validated(parse_dimension(width)?, parse_dimension(height)?)
    }

    /// Width of the image slot.
    pub fn image_width(&self) -> f32 {
        self.width_in * self.image_ratio
    }

    /// Width from the text start to the right edge of the label.
    pub fn text_width(&self) -> f32 {
        self.width_in - self.image_width() - self.margin_in
    }

    /// Width text may occupy: [`text_width`](Self::text_width) less the right margin.
    pub fn text_column_width(&self) -> f32 {
        self.text_width() - self.margin_in
    }

    /// Height between the top and bottom margins.
    pub fn available_height(&self) -> f32 {
        self.height_in - 2.0 * self.margin_in
    }

    /// Left edge of the text column.
    pub fn text_start_x(&self) -> f32 {
        self.image_width() + self.margin_in
    }

    /// Box the product image is fitted into.
    pub fn image_area(&self) -> Rect {
        Rect::new(
            self.margin_in,
            self.margin_in,
            self.image_width() - 2.0 * self.margin_in,
            self.available_height(),
        )
    }

    /// Box text may occupy.
    pub fn text_area(&self) -> Rect {
        Rect::new(
            self.text_start_x(),
            self.margin_in,
            self.text_column_width(),
            self.available_height(),
        )
    }

    /// Label width in points.
    pub fn width_pts(&self) -> f32 {
        inches_to_points(self.width_in)
    }

    /// Label height in points.
    pub fn height_pts(&self) -> f32 {
        inches_to_points(self.height_in)
    }

    /// Margin in points.
    pub fn margin_pts(&self) -> f32 {
        inches_to_points(self.margin_in)
    }

    /// Text column width in points.
    pub fn text_column_width_pts(&self) -> f32 {
        inches_to_points(self.text_column_width())
    }

    /// Available height in points.
    pub fn available_height_pts(&self) -> f32 {
        inches_to_points(self.available_height())
    }

    /// Text start in points.
    pub fn text_start_x_pts(&self) -> f32 {
        inches_to_points(self.text_start_x())
    }
}
