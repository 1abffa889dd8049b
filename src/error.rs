//! Error types for the label library.
//!
//! This module defines the errors that can surface from label layout, font
//! measurement, product sorting and rendering.
//!
//! Most malformed input is recovered locally (missing product fields read as
//! empty, unfittable text is truncated, failed clustering falls back to a
//! trivial order). The variants here cover the cases a caller has to handle.

/// Result type alias for label library operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur during label processing.
#[derive(Debug, thiserror::Error)]
#[allow(clippy::enum_variant_names)]
pub enum Error {
    /// A label dimension string could not be parsed
    #[error("Invalid dimension '{value}': {reason}")]
    InvalidDimension {
        /// The rejected input
        value: String,
        /// Why it was rejected
        reason: String,
    },

    /// A label dimension is outside the printable range
    #[error("Dimension out of range: {0}")]
    DimensionOutOfRange(String),

    /// The metrics backend has no advance width for a character
    #[error("Cannot measure '{text}' in font {font}: no glyph for {ch:?} (U+{code:04X})", code = char_code(.ch))]
    UnmeasurableGlyph {
        /// The string being measured
        text: String,
        /// Font the string was measured in
        font: String,
        /// The first character without a glyph
        ch: char,
    },

    /// Font loading or parsing error
    #[error("Font error: {0}")]
    Font(String),

    /// Image decoding error
    #[error("Image error: {0}")]
    Image(String),

    /// Unknown product sort method name
    #[error("Unknown sort method: {0}")]
    UnknownSortMethod(String),

    /// Drawing surface error
    #[error("Render error: {0}")]
    Render(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

fn char_code(ch: &char) -> u32 {
    u32::from(*ch)
}

impl From<image::ImageError> for Error {
    fn from(err: image::ImageError) -> Self {
        Error::Image(err.to_string())
    }
}

impl From<crate::fonts::truetype::TrueTypeError> for Error {
    fn from(err: crate::fonts::truetype::TrueTypeError) -> Self {
        Error::Font(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_dimension_display() {
        let err = Error::InvalidDimension {
            value: "abc".to_string(),
            reason: "not a number".to_string(),
        };
        let msg = format!("{}", err);
        assert!(msg.contains("abc"));
        assert!(msg.contains("not a number"));
    }

    #[test]
    fn test_unmeasurable_glyph_names_string_and_font() {
        let err = Error::UnmeasurableGlyph {
            text: "M3 \u{2603}".to_string(),
            font: "Helvetica".to_string(),
            ch: '\u{2603}',
        };
        let msg = format!("{}", err);
        assert!(msg.contains("M3"));
        assert!(msg.contains("Helvetica"));
        assert!(msg.contains("U+2603"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "missing.png");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
        assert!(format!("{}", err).contains("missing.png"));
    }

    #[test]
    fn test_json_error_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let err: Error = json_err.into();
        assert!(matches!(err, Error::Json(_)));
    }

    #[test]
    fn test_error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Error>();
    }
}
