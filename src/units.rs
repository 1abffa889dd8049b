//! Label dimension units.
//!
//! Label sizes arrive as free-form strings ("1.5in", "38mm", "108pt", "2").
//! Everything is normalised to inches, the unit the layout engine works in.

use crate::error::{Error, Result};
use lazy_static::lazy_static;
use regex::Regex;

/// PostScript points per inch.
pub const POINTS_PER_INCH: f32 = 72.0;

/// Screen pixels per inch assumed for `px` values.
pub const PIXELS_PER_INCH: f32 = 96.0;

/// Smallest printable label edge, in inches.
pub const MIN_DIMENSION_IN: f32 = 0.25;

/// Largest printable label edge, in inches.
pub const MAX_DIMENSION_IN: f32 = 12.0;

lazy_static! {
    static ref RE_DIMENSION: Regex =
        Regex::new(r#"^([+-]?(?:\d+\.?\d*|\.\d+))\s*([a-z"]*)$"#).unwrap();
}

/// Convert inches to points.
pub fn inches_to_points(inches: f32) -> f32 {
    inches * POINTS_PER_INCH
}

/// Convert points to inches.
pub fn points_to_inches(points: f32) -> f32 {
    points / POINTS_PER_INCH
}

/// Parse a dimension string into inches.
///
/// A bare number is taken as inches. Recognised suffixes are `in`, `inch`,
/// `inches`, `"`, `mm`, `cm`, `m`, `pt` and `px` (96 dpi).
///
/// # Examples
///
/// ```
/// use label_oxide::units::parse_dimension;
///
/// assert_eq!(parse_dimension("1.5in").unwrap(), 1.5);
/// assert_eq!(parse_dimension("72pt").unwrap(), 1.0);
/// assert!((parse_dimension("25.4mm").unwrap() - 1.0).abs() < 1e-6);
/// ```
pub fn parse_dimension(value: &str) -> Result<f32> {
    let normalized = value.trim().to_lowercase();
    if normalized.is_empty() {
        return Err(Error::InvalidDimension {
            value: value.to_string(),
            reason: "empty value".to_string(),
        });
    }

    let caps = RE_DIMENSION
        .captures(&normalized)
        .ok_or_else(|| Error::InvalidDimension {
            value: value.to_string(),
            reason: "expected a number with an optional unit".to_string(),
        })?;

    let number: f32 = caps[1].parse().map_err(|_| Error::InvalidDimension {
        value: value.to_string(),
        reason: "not a number".to_string(),
    })?;

    let inches = match &caps[2] {
        "" | "in" | "inch" | "inches" | "\"" => number,
        "mm" => number / 25.4,
        "cm" => number / 2.54,
        "m" => number / 0.0254,
        "pt" => number / POINTS_PER_INCH,
        "px" => number / PIXELS_PER_INCH,
        unit => {
            return Err(Error::InvalidDimension {
                value: value.to_string(),
                reason: format!("unknown unit '{}'", unit),
            })
        },
    };

    if !inches.is_finite() || inches <= 0.0 {
        return Err(Error::InvalidDimension {
            value: value.to_string(),
            reason: "dimension must be positive".to_string(),
        });
    }

    Ok(inches)
}

/// Check that a label size is printable.
///
/// Each edge must lie within [`MIN_DIMENSION_IN`, `MAX_DIMENSION_IN`].
/// An aspect ratio wider than 4:1 (or taller than 1:4) is accepted but logged.
pub fn validate_dimensions(width_in: f32, height_in: f32) -> Result<()> {
    for (name, value) in [("width", width_in), ("height", height_in)] {
        if !value.is_finite() || value <= 0.0 {
            return Err(Error::DimensionOutOfRange(format!(
                "{} must be positive, got {}",
                name, value
            )));
        }
        if value < MIN_DIMENSION_IN {
            return Err(Error::DimensionOutOfRange(format!(
                "{} {} is below the minimum of {}",
                name,
                format_dimension(value),
                format_dimension(MIN_DIMENSION_IN)
            )));
        }
        if value > MAX_DIMENSION_IN {
            return Err(Error::DimensionOutOfRange(format!(
                "{} {} exceeds the maximum of {}",
                name,
                format_dimension(value),
                format_dimension(MAX_DIMENSION_IN)
            )));
        }
    }

    let aspect = width_in / height_in;
    if !(0.25..=4.0).contains(&aspect) {
        log::warn!(
            "Unusual label aspect ratio {:.2} ({} x {})",
            aspect,
            format_dimension(width_in),
            format_dimension(height_in)
        );
    }

    Ok(())
}

/// Format inches for display, e.g. `1.50in`.
pub fn format_dimension(inches: f32) -> String {
    format!("{:.2}in", inches)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-4
    }

    #[test]
    fn test_bare_number_is_inches() {
        assert!(close(parse_dimension("1.5").unwrap(), 1.5));
        assert!(close(parse_dimension(".5").unwrap(), 0.5));
        assert!(close(parse_dimension("  2 ").unwrap(), 2.0));
    }

    #[test]
    fn test_unit_suffixes() {
        assert!(close(parse_dimension("1.5in").unwrap(), 1.5));
        assert!(close(parse_dimension("1.5 IN").unwrap(), 1.5));
        assert!(close(parse_dimension("2\"").unwrap(), 2.0));
        assert!(close(parse_dimension("3 inches").unwrap(), 3.0));
        assert!(close(parse_dimension("50.8mm").unwrap(), 2.0));
        assert!(close(parse_dimension("2.54cm").unwrap(), 1.0));
        assert!(close(parse_dimension("36pt").unwrap(), 0.5));
        assert!(close(parse_dimension("96px").unwrap(), 1.0));
    }

    #[test]
    fn test_rejects_garbage() {
        assert!(matches!(
            parse_dimension(""),
            Err(Error::InvalidDimension { .. })
        ));
        assert!(matches!(
            parse_dimension("wide"),
            Err(Error::InvalidDimension { .. })
        ));
        assert!(matches!(
            parse_dimension("3furlongs"),
            Err(Error::InvalidDimension { .. })
        ));
        assert!(matches!(
            parse_dimension("-1in"),
            Err(Error::InvalidDimension { .. })
        ));
        assert!(matches!(
            parse_dimension("0"),
            Err(Error::InvalidDimension { .. })
        ));
    }

    #[test]
    fn test_validate_range() {
        assert!(validate_dimensions(1.5, 0.5).is_ok());
        assert!(validate_dimensions(0.25, 0.25).is_ok());
        assert!(validate_dimensions(12.0, 12.0).is_ok());
        assert!(matches!(
            validate_dimensions(0.2, 1.0),
            Err(Error::DimensionOutOfRange(_))
        ));
        assert!(matches!(
            validate_dimensions(1.0, 12.5),
            Err(Error::DimensionOutOfRange(_))
        ));
        assert!(validate_dimensions(f32::NAN, 1.0).is_err());
    }

    #[test]
    fn test_unusual_aspect_ratio_is_only_a_warning() {
        assert!(validate_dimensions(6.0, 0.5).is_ok());
    }

    #[test]
    fn test_point_conversions() {
        assert_eq!(inches_to_points(1.5), 108.0);
        assert_eq!(points_to_inches(36.0), 0.5);
        assert_eq!(format_dimension(1.5), "1.50in");
    }
}
