//! Text measurement.
//!
//! The layout engine never guesses text sizes: every width and height comes
//! from a [`TextMetrics`] oracle. [`FontMetrics`] is the standard oracle,
//! backed by a [`FontRegistry`]. Tests and renderers with their own font
//! stack can plug in a different implementation.
//!
//! # Multi-line boxes
//!
//! A block of `n` lines is as tall as its first line's glyph box
//! (`ascent - descent`) plus `font_size * line_spacing` for each further
//! line. Its width is the widest line.

use serde::Serialize;

use crate::error::{Error, Result};
use crate::fonts::{FontRegistry, LoadedFont};

/// Bounding box of a single line of text, in points.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct TextBBox {
    /// Advance width
    pub width: f32,
    /// `ascent - descent`
    pub height: f32,
    /// Distance from baseline to the top of the face
    pub ascent: f32,
    /// Distance from baseline to the bottom of the face (negative)
    pub descent: f32,
}

/// Bounding box of a multi-line block, in points.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct MultilineBBox {
    /// Widest line
    pub width: f32,
    /// Total block height
    pub height: f32,
    /// Per-line boxes, top to bottom
    pub lines: Vec<TextBBox>,
}

impl MultilineBBox {
    /// Stack per-line boxes into a block box.
    pub fn from_lines(lines: Vec<TextBBox>, font_size: f32, line_spacing: f32) -> Self {
        let Some(first) = lines.first() else {
            return Self::default();
        };
        let width = lines.iter().map(|l| l.width).fold(0.0_f32, f32::max);
        let height = first.height + (lines.len() - 1) as f32 * font_size * line_spacing;
        Self {
            width,
            height,
            lines,
        }
    }
}

/// A text measurement oracle.
pub trait TextMetrics {
    /// Measure one line of text.
    ///
    /// Fails only when the backend cannot measure a character; the error names
    /// the string and the font.
    fn measure(&self, text: &str, font_name: &str, font_size: f32) -> Result<TextBBox>;

    /// Measure a block of lines. An empty slice gives an empty box.
    fn measure_multiline(
        &self,
        lines: &[String],
        font_name: &str,
        font_size: f32,
        line_spacing: f32,
    ) -> Result<MultilineBBox> {
        let boxes = lines
            .iter()
            .map(|line| self.measure(line, font_name, font_size))
            .collect::<Result<Vec<_>>>()?;
        Ok(MultilineBBox::from_lines(boxes, font_size, line_spacing))
    }
}

/// Measurement against the fonts of a [`FontRegistry`].
///
/// Unknown font names are measured with the registry's fallback face.
#[derive(Debug, Clone, Default)]
pub struct FontMetrics {
    registry: FontRegistry,
}

impl FontMetrics {
    /// Measure with the standard fonts only.
    pub fn new() -> Self {
        Self::default()
    }

    /// Measure with the fonts of `registry`.
    pub fn with_registry(registry: FontRegistry) -> Self {
        Self { registry }
    }

    /// The underlying registry.
    pub fn registry(&self) -> &FontRegistry {
        &self.registry
    }

    /// Resolve a font name, as measurement does.
    pub fn load_font(&self, font_name: &str) -> LoadedFont {
        self.registry.load_font(font_name)
    }
}

impl TextMetrics for FontMetrics {
    fn measure(&self, text: &str, font_name: &str, font_size: f32) -> Result<TextBBox> {
        let loaded = self.registry.load_font(font_name);
        let face = loaded.face();

        let mut units = 0.0_f32;
        for ch in text.chars() {
            let advance = face.advance(ch).ok_or_else(|| Error::UnmeasurableGlyph {
                text: text.to_string(),
                font: face.name().to_string(),
                ch,
            })?;
            units += advance;
        }

        let ascent = face.ascender() / 1000.0 * font_size;
        let descent = face.descender() / 1000.0 * font_size;
        Ok(TextBBox {
            width: units * font_size / 1000.0,
            height: ascent - descent,
            ascent,
            descent,
        })
    }
}
