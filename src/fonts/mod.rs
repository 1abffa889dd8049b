//! Font resolution for text measurement.
//!
//! The [`FontRegistry`] knows the standard PDF fonts out of the box and can
//! be extended with TrueType/OpenType faces. Resolution never fails: a name
//! the registry does not know resolves to a deterministic fallback
//! (Helvetica-Bold for names containing "Bold", Helvetica otherwise), and the
//! caller is told via [`LoadedFont::Fallback`].

pub mod standard;
pub mod truetype;

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use crate::error::Result;
pub use standard::{standard_font, StandardFamily, StandardFont};
pub use truetype::{TrueTypeError, TrueTypeFace};

/// A measurable font face.
#[derive(Debug, Clone)]
pub enum FontFace {
    /// One of the built-in standard fonts
    Standard(&'static StandardFont),
    /// A parsed TrueType/OpenType face
    TrueType(Arc<TrueTypeFace>),
}

impl FontFace {
    /// Name of the face.
    pub fn name(&self) -> &str {
        match self {
            FontFace::Standard(font) => font.name,
            FontFace::TrueType(face) => face.name(),
        }
    }

    /// Ascender in 1/1000 em.
    pub fn ascender(&self) -> f32 {
        match self {
            FontFace::Standard(font) => font.ascender as f32,
            FontFace::TrueType(face) => face.ascender(),
        }
    }

    /// Descender in 1/1000 em (negative).
    pub fn descender(&self) -> f32 {
        match self {
            FontFace::Standard(font) => font.descender as f32,
            FontFace::TrueType(face) => face.descender(),
        }
    }

    /// Whether the face is bold.
    pub fn is_bold(&self) -> bool {
        match self {
            FontFace::Standard(font) => font.bold,
            FontFace::TrueType(face) => face.is_bold(),
        }
    }

    /// Advance width of `ch` in 1/1000 em, or `None` if the face has no glyph.
    pub fn advance(&self, ch: char) -> Option<f32> {
        match self {
            FontFace::Standard(font) => font.advance(ch),
            FontFace::TrueType(face) => face.advance(ch),
        }
    }
}

/// Outcome of resolving a font name.
#[derive(Debug, Clone)]
pub enum LoadedFont {
    /// The requested face was found
    Exact(FontFace),
    /// The requested face is unknown; `face` is used instead
    Fallback {
        /// The name that was asked for
        requested: String,
        /// The substitute face
        face: FontFace,
    },
}

impl LoadedFont {
    /// The face to measure with.
    pub fn face(&self) -> &FontFace {
        match self {
            LoadedFont::Exact(face) => face,
            LoadedFont::Fallback { face, .. } => face,
        }
    }

    /// Whether a substitute face was chosen.
    pub fn is_fallback(&self) -> bool {
        matches!(self, LoadedFont::Fallback { .. })
    }
}

/// Registry of the fonts available for measurement.
#[derive(Debug, Clone, Default)]
pub struct FontRegistry {
    embedded: HashMap<String, Arc<TrueTypeFace>>,
}

impl FontRegistry {
    /// Create a registry holding only the standard fonts.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse TrueType/OpenType bytes and register the face under `name`.
    ///
    /// A registered face shadows a standard font of the same name.
    pub fn register_truetype(&mut self, name: &str, data: &[u8]) -> Result<()> {
        let face = TrueTypeFace::parse(name, data)?;
        self.register_face(face);
        Ok(())
    }

    /// Read a font file and register it under `name`.
    pub fn register_truetype_file(&mut self, name: &str, path: impl AsRef<Path>) -> Result<()> {
        let face = TrueTypeFace::from_file(name, path)?;
        self.register_face(face);
        Ok(())
    }

    /// Register an already parsed face.
    pub fn register_face(&mut self, face: TrueTypeFace) {
        log::debug!("Registered font '{}'", face.name());
        self.embedded.insert(face.name().to_string(), Arc::new(face));
    }

    /// Whether `name` resolves without fallback.
    pub fn contains(&self, name: &str) -> bool {
        self.embedded.contains_key(name) || standard_font(name).is_some()
    }

    /// Resolve a font name.
    ///
    /// # Examples
    ///
    /// ```
    /// use label_oxide::fonts::FontRegistry;
    ///
    /// let registry = FontRegistry::new();
    /// assert!(!registry.load_font("Helvetica").is_fallback());
    ///
    /// let loaded = registry.load_font("Arial-Bold");
    /// assert!(loaded.is_fallback());
    /// assert_eq!(loaded.face().name(), "Helvetica-Bold");
    /// ```
    pub fn load_font(&self, name: &str) -> LoadedFont {
        if let Some(face) = self.embedded.get(name) {
            return LoadedFont::Exact(FontFace::TrueType(Arc::clone(face)));
        }
        if let Some(font) = standard_font(name) {
            return LoadedFont::Exact(FontFace::Standard(font));
        }

        let bold = name.to_lowercase().contains("bold");
        let face = FontFace::Standard(standard::fallback_font(bold));
        log::debug!("Font '{}' not available, using {}", name, face.name());
        LoadedFont::Fallback {
            requested: name.to_string(),
            face,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_fonts_resolve_exactly() {
        let registry = FontRegistry::new();
        for name in ["Helvetica", "Helvetica-Bold", "Times-Roman", "Courier"] {
            let loaded = registry.load_font(name);
            assert!(!loaded.is_fallback(), "{} should resolve", name);
            assert_eq!(loaded.face().name(), name);
        }
    }

    #[test]
    fn test_fallback_is_deterministic() {
        let registry = FontRegistry::new();
        let regular = registry.load_font("DejaVuSans");
        let bold = registry.load_font("DejaVuSans-Bold");
        assert_eq!(regular.face().name(), "Helvetica");
        assert_eq!(bold.face().name(), "Helvetica-Bold");
        match bold {
            LoadedFont::Fallback { requested, .. } => assert_eq!(requested, "DejaVuSans-Bold"),
            LoadedFont::Exact(_) => panic!("expected fallback"),
        }
    }

    #[test]
    fn test_register_invalid_font_fails() {
        let mut registry = FontRegistry::new();
        let err = registry.register_truetype("Broken", b"nope").unwrap_err();
        assert!(matches!(err, crate::error::Error::Font(_)));
        assert!(!registry.contains("Broken"));
    }

    #[test]
    fn test_face_metrics() {
        let face = FontRegistry::new().load_font("Helvetica").face().clone();
        assert_eq!(face.ascender(), 718.0);
        assert_eq!(face.descender(), -207.0);
        assert!(!face.is_bold());
        assert_eq!(face.advance('a'), Some(556.0));
    }
}
