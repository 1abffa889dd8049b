//! Configuration for label generation.
//!
//! [`LabelConfig`] is built once, usually at process start, and passed
//! explicitly to whatever needs it. Nothing inside the layout engine or the
//! sorters reads the environment.
//!
//! # Environment
//!
//! [`LabelConfig::from_env`] recognises:
//!
//! - `MCMASTER_LABEL_WIDTH`: label width, any unit [`parse_dimension`] accepts
//! - `MCMASTER_LABEL_HEIGHT`: label height
//! - `MCMASTER_IMAGE_RATIO`: share of the label width given to the image (0..1)
//!
//! Unparseable values keep the default and are logged.

use crate::layout::LabelDimensions;
use crate::units::parse_dimension;

/// Environment variable holding the label width.
pub const ENV_LABEL_WIDTH: &str = "MCMASTER_LABEL_WIDTH";
/// Environment variable holding the label height.
pub const ENV_LABEL_HEIGHT: &str = "MCMASTER_LABEL_HEIGHT";
/// Environment variable holding the image width ratio.
pub const ENV_IMAGE_RATIO: &str = "MCMASTER_IMAGE_RATIO";

/// Where a configuration value came from.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ConfigSource {
    /// Built-in default
    #[default]
    Default,
    /// Set explicitly through a builder method
    Explicit,
    /// Read from the named environment variable
    Environment(String),
}

/// Tunables of the layout engine.
///
/// The defaults reproduce the standard label look: Helvetica-Bold
/// description, Helvetica body, 1.15 line spacing and a 0.3 em gap between
/// blocks.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutConfig {
    /// Smallest font size the fitter will use (points)
    pub min_font_size: u32,
    /// Largest font size the fitter will try (points)
    pub max_font_size: u32,
    /// Baseline-to-baseline distance as a multiple of the font size
    pub line_spacing: f32,
    /// Vertical gap between blocks as a multiple of the base font size
    pub block_gap_ratio: f32,
    /// Per-line height allowance used when truncating at the minimum size
    pub truncation_line_factor: f32,
    /// Vertical space reserved per block when bounding the font search
    pub block_density: f32,
    /// Product id font size relative to the base size, at most 1.0
    pub id_font_scale: f32,
    /// Marker appended to truncated lines
    pub ellipsis: String,
    /// Font for the description block
    pub description_font: String,
    /// Font for the dimensions and product id blocks
    pub body_font: String,
    /// Prefix placed before the product id
    pub id_prefix: String,
    /// Description used when a product has no family or detail text
    pub placeholder_description: String,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl LayoutConfig {
    /// Create a layout configuration with defaults.
    pub fn new() -> Self {
        Self {
            min_font_size: 4,
            max_font_size: 72,
            line_spacing: 1.15,
            block_gap_ratio: 0.3,
            truncation_line_factor: 1.2,
            block_density: 1.5,
            id_font_scale: 1.0,
            ellipsis: "...".to_string(),
            description_font: "Helvetica-Bold".to_string(),
            body_font: "Helvetica".to_string(),
            id_prefix: "#".to_string(),
            placeholder_description: "McMaster-Carr Part".to_string(),
        }
    }

    /// Set the font size search range.
    ///
    /// The bounds are reordered if given backwards and the minimum is kept at
    /// one point or more.
    pub fn with_font_range(mut self, min: u32, max: u32) -> Self {
        let (lo, hi) = if min <= max { (min, max) } else { (max, min) };
        self.min_font_size = lo.max(1);
        self.max_font_size = hi.max(self.min_font_size);
        self
    }

    /// Set the line spacing factor.
    pub fn with_line_spacing(mut self, spacing: f32) -> Self {
        if spacing.is_finite() && spacing > 0.0 {
            self.line_spacing = spacing;
        }
        self
    }

    /// Scale the product id font relative to the base size.
    ///
    /// Clamped to `(0, 1]` so the id never outgrows the description.
    pub fn with_id_font_scale(mut self, scale: f32) -> Self {
        if scale.is_finite() && scale > 0.0 {
            self.id_font_scale = scale.min(1.0);
        }
        self
    }

    /// Use different fonts for the description and body blocks.
    pub fn with_fonts(mut self, description: &str, body: &str) -> Self {
        self.description_font = description.to_string();
        self.body_font = body.to_string();
        self
    }

    /// Set the truncation marker.
    pub fn with_ellipsis(mut self, ellipsis: &str) -> Self {
        self.ellipsis = ellipsis.to_string();
        self
    }

    /// Set the description used for products without text.
    pub fn with_placeholder_description(mut self, placeholder: &str) -> Self {
        self.placeholder_description = placeholder.to_string();
        self
    }
}

/// Label generation configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct LabelConfig {
    /// Label width in inches
    pub label_width_in: f32,
    /// Label height in inches
    pub label_height_in: f32,
    /// Fraction of the label width reserved for the product image
    pub image_ratio: f32,
    /// Layout engine tunables
    pub layout: LayoutConfig,
    /// Origin of `label_width_in`
    pub width_source: ConfigSource,
    /// Origin of `label_height_in`
    pub height_source: ConfigSource,
    /// Origin of `image_ratio`
    pub image_ratio_source: ConfigSource,
}

impl Default for LabelConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl LabelConfig {
    /// Create configuration with defaults (1.5in x 0.5in, image gets 25%).
    pub fn new() -> Self {
        Self {
            label_width_in: 1.5,
            label_height_in: 0.5,
            image_ratio: LabelDimensions::DEFAULT_IMAGE_RATIO,
            layout: LayoutConfig::new(),
            width_source: ConfigSource::Default,
            height_source: ConfigSource::Default,
            image_ratio_source: ConfigSource::Default,
        }
    }

    /// Read overrides from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read overrides through `lookup`, which maps a variable name to its value.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::new();

        if let Some(raw) = lookup(ENV_LABEL_WIDTH) {
            match parse_dimension(&raw) {
                Ok(width) => {
                    log::debug!("{} = {} in", ENV_LABEL_WIDTH, width);
                    config.label_width_in = width;
                    config.width_source = ConfigSource::Environment(ENV_LABEL_WIDTH.to_string());
                },
                Err(e) => log::warn!("Ignoring {}: {}", ENV_LABEL_WIDTH, e),
            }
        }

        if let Some(raw) = lookup(ENV_LABEL_HEIGHT) {
            match parse_dimension(&raw) {
                Ok(height) => {
                    log::debug!("{} = {} in", ENV_LABEL_HEIGHT, height);
                    config.label_height_in = height;
                    config.height_source = ConfigSource::Environment(ENV_LABEL_HEIGHT.to_string());
                },
                Err(e) => log::warn!("Ignoring {}: {}", ENV_LABEL_HEIGHT, e),
            }
        }

        if let Some(raw) = lookup(ENV_IMAGE_RATIO) {
            match raw.trim().parse::<f32>() {
                Ok(ratio) if ratio > 0.0 && ratio < 1.0 => {
                    config.image_ratio = ratio;
                    config.image_ratio_source =
                        ConfigSource::Environment(ENV_IMAGE_RATIO.to_string());
                },
                _ => log::warn!("Ignoring {}: '{}' is not a ratio in (0, 1)", ENV_IMAGE_RATIO, raw),
            }
        }

        config
    }

    /// Set the label size in inches.
    pub fn with_size(mut self, width_in: f32, height_in: f32) -> Self {
        self.label_width_in = width_in;
        self.label_height_in = height_in;
        self.width_source = ConfigSource::Explicit;
        self.height_source = ConfigSource::Explicit;
        self
    }

    /// Set the image width ratio.
    pub fn with_image_ratio(mut self, ratio: f32) -> Self {
        self.image_ratio = ratio;
        self.image_ratio_source = ConfigSource::Explicit;
        self
    }

    /// Replace the layout tunables.
    pub fn with_layout(mut self, layout: LayoutConfig) -> Self {
        self.layout = layout;
        self
    }

    /// Label geometry described by this configuration.
    pub fn dimensions(&self) -> LabelDimensions {
        LabelDimensions::with_image_ratio(self.label_width_in, self.label_height_in, self.image_ratio)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = LabelConfig::default();
        assert_eq!(config.label_width_in, 1.5);
        assert_eq!(config.label_height_in, 0.5);
        assert_eq!(config.image_ratio, 0.25);
        assert_eq!(config.width_source, ConfigSource::Default);
        assert_eq!(config.layout.min_font_size, 4);
        assert_eq!(config.layout.max_font_size, 72);
        assert_eq!(config.layout.description_font, "Helvetica-Bold");
    }

    #[test]
    fn test_from_lookup_overrides() {
        let config = LabelConfig::from_lookup(lookup_from(&[
            (ENV_LABEL_WIDTH, "2in"),
            (ENV_LABEL_HEIGHT, "25.4mm"),
            (ENV_IMAGE_RATIO, "0.3"),
        ]));
        assert_eq!(config.label_width_in, 2.0);
        assert!((config.label_height_in - 1.0).abs() < 1e-5);
        assert_eq!(config.image_ratio, 0.3);
        assert_eq!(
            config.width_source,
            ConfigSource::Environment(ENV_LABEL_WIDTH.to_string())
        );
    }

    #[test]
    fn test_invalid_values_keep_defaults() {
        let config = LabelConfig::from_lookup(lookup_from(&[
            (ENV_LABEL_WIDTH, "very wide"),
            (ENV_IMAGE_RATIO, "1.5"),
        ]));
        assert_eq!(config.label_width_in, 1.5);
        assert_eq!(config.width_source, ConfigSource::Default);
        assert_eq!(config.image_ratio, 0.25);
        assert_eq!(config.image_ratio_source, ConfigSource::Default);
    }

    #[test]
    fn test_builders() {
        let config = LabelConfig::new()
            .with_size(2.0, 1.0)
            .with_layout(LayoutConfig::new().with_id_font_scale(0.8));
        assert_eq!(config.width_source, ConfigSource::Explicit);
        assert_eq!(config.layout.id_font_scale, 0.8);

        let dims = config.dimensions();
        assert_eq!(dims.width_in, 2.0);
        assert_eq!(dims.height_in, 1.0);
    }

    #[test]
    fn test_id_scale_is_clamped() {
        let layout = LayoutConfig::new().with_id_font_scale(1.7);
        assert_eq!(layout.id_font_scale, 1.0);
        let layout = LayoutConfig::new().with_id_font_scale(-2.0);
        assert_eq!(layout.id_font_scale, 1.0);
    }

    #[test]
    fn test_font_range_reordered() {
        let layout = LayoutConfig::new().with_font_range(20, 6);
        assert_eq!(layout.min_font_size, 6);
        assert_eq!(layout.max_font_size, 20);
    }
}
