//! Product images prepared for drawing.

use std::path::{Path, PathBuf};

use image::imageops::FilterType;
use image::{DynamicImage, Rgb, RgbImage};

use crate::error::Result;
use crate::geometry::Rect;
use crate::units::POINTS_PER_INCH;

/// Print resolution images are sized for.
pub const PRINT_DPI: f32 = 300.0;

/// Images larger than this multiple of their print size are downscaled.
const OVERSIZE_FACTOR: f32 = 3.0;

/// Downscaled images keep this multiple of their print size.
const TARGET_FACTOR: f32 = 2.0;

/// An opaque RGB image ready to be placed on a label.
#[derive(Debug, Clone)]
pub struct ProductImage {
    source: Option<PathBuf>,
    pixels: RgbImage,
}

impl ProductImage {
    /// Decode an image file.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let decoded = image::open(path)?;
        let mut image = Self::from_image(&decoded);
        image.source = Some(path.to_path_buf());
        Ok(image)
    }

    /// Decode an image file and shrink it for a box given in points.
    pub fn open_for_box(path: impl AsRef<Path>, area: &Rect) -> Result<Self> {
        Ok(Self::open(path)?.fitted_to(area))
    }

    /// Wrap a decoded image, flattening any transparency onto white.
    pub fn from_image(image: &DynamicImage) -> Self {
        let pixels = if image.color().has_alpha() {
            let rgba = image.to_rgba8();
            RgbImage::from_fn(rgba.width(), rgba.height(), |x, y| {
                let [r, g, b, a] = rgba.get_pixel(x, y).0;
                let alpha = a as f32 / 255.0;
                let blend = |c: u8| (c as f32 * alpha + 255.0 * (1.0 - alpha)).round() as u8;
                Rgb([blend(r), blend(g), blend(b)])
            })
        } else {
            image.to_rgb8()
        };
        Self {
            source: None,
            pixels,
        }
    }

    /// Downscale when the image is over three times its print size in `area`
    /// (points) at 300 dpi.
    pub fn fitted_to(self, area: &Rect) -> Self {
        let max_w = (area.width / POINTS_PER_INCH * PRINT_DPI * OVERSIZE_FACTOR).ceil();
        let max_h = (area.height / POINTS_PER_INCH * PRINT_DPI * OVERSIZE_FACTOR).ceil();
        let (w, h) = self.dimensions();
        if max_w < 1.0 || max_h < 1.0 || (w as f32 <= max_w && h as f32 <= max_h) {
            return self;
        }

        let target_w = ((max_w * TARGET_FACTOR / OVERSIZE_FACTOR) as u32).max(1);
        let target_h = ((max_h * TARGET_FACTOR / OVERSIZE_FACTOR) as u32).max(1);
        log::debug!("Downscaling {}x{} image to fit {}x{}", w, h, target_w, target_h);
        let resized = DynamicImage::ImageRgb8(self.pixels).resize(target_w, target_h, FilterType::Lanczos3);
        Self {
            source: self.source,
            pixels: resized.to_rgb8(),
        }
    }

    /// Pixel width and height.
    pub fn dimensions(&self) -> (u32, u32) {
        self.pixels.dimensions()
    }

    /// File the image was read from, if any.
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    /// RGB pixels.
    pub fn pixels(&self) -> &RgbImage {
        &self.pixels
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};

    #[test]
    fn test_alpha_flattened_onto_white() {
        let mut rgba = RgbaImage::new(2, 1);
        rgba.put_pixel(0, 0, Rgba([0, 0, 0, 0]));
        rgba.put_pixel(1, 0, Rgba([0, 0, 0, 255]));
        let image = ProductImage::from_image(&DynamicImage::ImageRgba8(rgba));
        assert_eq!(image.pixels().get_pixel(0, 0).0, [255, 255, 255]);
        assert_eq!(image.pixels().get_pixel(1, 0).0, [0, 0, 0]);
    }

    #[test]
    fn test_oversized_image_downscaled() {
        // 0.2in box at 300dpi x3 allows 180px
        let area = Rect::new(0.0, 0.0, 14.4, 14.4);
        let big = ProductImage::from_image(&DynamicImage::new_rgb8(1000, 500));
        let fitted = big.fitted_to(&area);
        let (w, h) = fitted.dimensions();
        assert!(w <= 180 && h <= 180, "{w}x{h}");
        assert_eq!(w, 2 * h);

        let small = ProductImage::from_image(&DynamicImage::new_rgb8(50, 50));
        assert_eq!(small.fitted_to(&area).dimensions(), (50, 50));
    }

    #[test]
    fn test_open_missing_file() {
        assert!(ProductImage::open("/nonexistent/product.png").is_err());
    }
}
