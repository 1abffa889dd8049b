//! TrueType/OpenType faces for text measurement.
//!
//! This module wraps the `ttf-parser` crate to pull out what the layout
//! engine needs from a font file: per-character advance widths and the
//! vertical metrics. Everything is normalised to 1/1000 em so embedded faces
//! measure the same way as the standard fonts.
//!
//! The parsed face does not keep the font bytes alive; only the metric tables
//! are retained.

use std::collections::HashMap;
use std::path::Path;

use ttf_parser::Face;

/// Error types for TrueType font parsing.
#[derive(Debug, thiserror::Error)]
pub enum TrueTypeError {
    /// Failed to parse font file
    #[error("Failed to parse font file: {0}")]
    ParseError(String),

    /// Font file is empty or invalid
    #[error("Font file is empty or invalid")]
    EmptyFont,

    /// Required table is missing
    #[error("Required font table is missing: {0}")]
    MissingTable(String),

    /// IO error during font operations
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Result type for TrueType operations.
pub type TrueTypeResult<T> = Result<T, TrueTypeError>;

/// Metric tables extracted from a TrueType/OpenType font.
#[derive(Debug, Clone)]
pub struct TrueTypeFace {
    name: String,
    ascender: f32,
    descender: f32,
    bold: bool,
    widths: HashMap<char, f32>,
}

impl TrueTypeFace {
    /// Parse a font from raw TTF/OTF bytes and register it under `name`.
    pub fn parse(name: &str, data: &[u8]) -> TrueTypeResult<Self> {
        if data.is_empty() {
            return Err(TrueTypeError::EmptyFont);
        }

        let face = Face::parse(data, 0).map_err(|e| TrueTypeError::ParseError(e.to_string()))?;

        let units_per_em = face.units_per_em();
        if units_per_em == 0 {
            return Err(TrueTypeError::MissingTable("head".to_string()));
        }
        let scale = 1000.0 / units_per_em as f32;

        let mut widths = HashMap::new();
        let mut missing_hmtx = true;
        for codepoint in 0x20..=0xFFFF_u32 {
            let Some(ch) = char::from_u32(codepoint) else {
                continue;
            };
            let Some(glyph) = face.glyph_index(ch) else {
                continue;
            };
            if let Some(advance) = face.glyph_hor_advance(glyph) {
                missing_hmtx = false;
                widths.insert(ch, advance as f32 * scale);
            }
        }
        if missing_hmtx {
            return Err(TrueTypeError::MissingTable("hmtx".to_string()));
        }

        log::debug!(
            "Parsed TrueType face '{}': {} glyph widths, {} units/em",
            name,
            widths.len(),
            units_per_em
        );

        Ok(Self {
            name: name.to_string(),
            ascender: face.ascender() as f32 * scale,
            descender: face.descender() as f32 * scale,
            bold: face.is_bold(),
            widths,
        })
    }

    /// Read and parse a font file.
    pub fn from_file(name: &str, path: impl AsRef<Path>) -> TrueTypeResult<Self> {
        let data = std::fs::read(path)?;
        Self::parse(name, &data)
    }

    /// Name the face was registered under.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Ascender in 1/1000 em.
    pub fn ascender(&self) -> f32 {
        self.ascender
    }

    /// Descender in 1/1000 em (negative).
    pub fn descender(&self) -> f32 {
        self.descender
    }

    /// Whether the font's OS/2 table marks it bold.
    pub fn is_bold(&self) -> bool {
        self.bold
    }

    /// Advance width of `ch` in 1/1000 em, if the font maps it.
    pub fn advance(&self, ch: char) -> Option<f32> {
        self.widths.get(&ch).copied()
    }
}
