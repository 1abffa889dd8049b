//! Geometric primitives for label regions.
//!
//! Rectangles use a top-left origin with y growing downward, the same
//! convention as the layout plan. Renderers that draw bottom-up translate at
//! the surface boundary.

use serde::Serialize;

/// A 2D point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Point {
    /// X coordinate
    pub x: f32,
    /// Y coordinate
    pub y: f32,
}

impl Point {
    /// Create a new point.
    ///
    /// # Examples
    ///
    /// ```
    /// use label_oxide::geometry::Point;
    ///
    /// let point = Point::new(10.0, 20.0);
    /// assert_eq!(point.x, 10.0);
    /// assert_eq!(point.y, 20.0);
    /// ```
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// An axis-aligned rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Rect {
    /// X coordinate of top-left corner
    pub x: f32,
    /// Y coordinate of top-left corner
    pub y: f32,
    /// Width of rectangle
    pub width: f32,
    /// Height of rectangle
    pub height: f32,
}

impl Rect {
    /// Create a new rectangle from position and dimensions.
    ///
    /// # Examples
    ///
    /// ```
    /// use label_oxide::geometry::Rect;
    ///
    /// let rect = Rect::new(0.0, 0.0, 100.0, 50.0);
    /// assert_eq!(rect.width, 100.0);
    /// assert_eq!(rect.height, 50.0);
    /// ```
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Get the right edge x-coordinate.
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    /// Get the bottom edge y-coordinate.
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// Get the center point of the rectangle.
    ///
    /// # Examples
    ///
    /// ```
    /// use label_oxide::geometry::Rect;
    ///
    /// let rect = Rect::new(0.0, 0.0, 100.0, 50.0);
    /// let center = rect.center();
    /// assert_eq!(center.x, 50.0);
    /// assert_eq!(center.y, 25.0);
    /// ```
    pub fn center(&self) -> Point {
        Point {
            x: self.x + self.width / 2.0,
            y: self.y + self.height / 2.0,
        }
    }

    /// Multiply every coordinate by `factor` (e.g. inches to points).
    pub fn scaled(&self, factor: f32) -> Rect {
        Rect::new(
            self.x * factor,
            self.y * factor,
            self.width * factor,
            self.height * factor,
        )
    }

    /// Check whether `other` lies entirely inside this rectangle.
    ///
    /// A small tolerance absorbs floating point noise from unit conversion.
    pub fn contains_rect(&self, other: &Rect) -> bool {
        const EPS: f32 = 1e-3;
        other.x >= self.x - EPS
            && other.y >= self.y - EPS
            && other.right() <= self.right() + EPS
            && other.bottom() <= self.bottom() + EPS
    }

    /// Largest rectangle with the given aspect ratio that fits inside this one,
    /// scaled by `safety` and centred.
    ///
    /// The content is never enlarged beyond the box: `safety` is clamped to
    /// `(0, 1]`.
    ///
    /// # Examples
    ///
    /// ```
    /// use label_oxide::geometry::Rect;
    ///
    /// let area = Rect::new(0.0, 0.0, 100.0, 50.0);
    /// let fitted = area.fit_aspect(200.0, 200.0, 1.0);
    /// assert_eq!(fitted.width, 50.0);
    /// assert_eq!(fitted.x, 25.0);
    /// ```
    pub fn fit_aspect(&self, content_width: f32, content_height: f32, safety: f32) -> Rect {
        if content_width <= 0.0 || content_height <= 0.0 || self.width <= 0.0 || self.height <= 0.0
        {
            return Rect::new(self.center().x, self.center().y, 0.0, 0.0);
        }
        let safety = if safety > 0.0 { safety.min(1.0) } else { 1.0 };
        let scale = (self.width / content_width).min(self.height / content_height) * safety;
        let width = content_width * scale;
        let height = content_height * scale;
        Rect::new(
            self.x + (self.width - width) / 2.0,
            self.y + (self.height - height) / 2.0,
            width,
            height,
        )
    }
}
