//! Image feature vectors.
//!
//! Every image is reduced to a 64×64 grayscale thumbnail, from which five
//! descriptors are concatenated:
//!
//! | part | length |
//! |------|--------|
//! | normalised pixels | 4096 |
//! | Canny edge map (thresholds 50/150) | 4096 |
//! | intensity histogram | 32 |
//! | log-scaled Hu moments | 7 |
//! | 8×8 block variances | 64 |

use std::path::Path;

use image::imageops::FilterType;
use image::{DynamicImage, GrayImage};
use nalgebra::DVector;

use crate::error::Result;

/// Thumbnail side, pixels.
pub const THUMBNAIL_SIZE: u32 = 64;

/// Canny hysteresis thresholds.
const CANNY_LOW: f32 = 50.0;
const CANNY_HIGH: f32 = 150.0;

/// Histogram bins.
const HISTOGRAM_BINS: usize = 32;

/// Blocks per side for the variance grid.
const BLOCK_GRID: u32 = 8;

/// Number of Hu invariants.
const HU_MOMENTS: usize = 7;

/// Length of a feature vector.
pub const FEATURE_LEN: usize = (THUMBNAIL_SIZE * THUMBNAIL_SIZE * 2) as usize
    + HISTOGRAM_BINS
    + HU_MOMENTS
    + (BLOCK_GRID * BLOCK_GRID) as usize;

/// Feature vector for an image file.
pub fn extract_from_path(path: &Path) -> Result<DVector<f64>> {
    let image = image::open(path)?;
    Ok(extract(&image))
}

/// Feature vector for a decoded image.
pub fn extract(image: &DynamicImage) -> DVector<f64> {
    let gray = image
        .resize_exact(THUMBNAIL_SIZE, THUMBNAIL_SIZE, FilterType::Triangle)
        .to_luma8();

    let mut features = Vec::with_capacity(FEATURE_LEN);
    features.extend(gray.pixels().map(|p| p.0[0] as f64 / 255.0));

    let edges = imageproc::edges::canny(&gray, CANNY_LOW, CANNY_HIGH);
    features.extend(edges.pixels().map(|p| p.0[0] as f64 / 255.0));

    features.extend(histogram(&gray));
    features.extend(hu_moments(&gray));
    features.extend(block_variances(&gray));

    DVector::from_vec(features)
}

/// Normalised intensity histogram.
fn histogram(gray: &GrayImage) -> [f64; HISTOGRAM_BINS] {
    let mut bins = [0.0; HISTOGRAM_BINS];
    let bin_width = 256 / HISTOGRAM_BINS;
    for p in gray.pixels() {
        bins[p.0[0] as usize / bin_width] += 1.0;
    }
    let total = (gray.width() * gray.height()).max(1) as f64;
    for b in &mut bins {
        *b /= total;
    }
    bins
}

/// Hu moment invariants, log-scaled as `-sign(h) * log10(|h|)`.
fn hu_moments(gray: &GrayImage) -> [f64; HU_MOMENTS] {
    let raw = |p: i32, q: i32| -> f64 {
        gray.enumerate_pixels()
            .map(|(x, y, px)| (x as f64).powi(p) * (y as f64).powi(q) * px.0[0] as f64)
            .sum()
    };

    let m00 = raw(0, 0);
    if m00 <= 0.0 {
        return [0.0; HU_MOMENTS];
    }
    let cx = raw(1, 0) / m00;
    let cy = raw(0, 1) / m00;

    let central = |p: i32, q: i32| -> f64 {
        gray.enumerate_pixels()
            .map(|(x, y, px)| (x as f64 - cx).powi(p) * (y as f64 - cy).powi(q) * px.0[0] as f64)
            .sum()
    };
    // Scale-normalised central moment
    let eta = |p: i32, q: i32| central(p, q) / m00.powf(1.0 + (p + q) as f64 / 2.0);

    let (n20, n02, n11) = (eta(2, 0), eta(0, 2), eta(1, 1));
    let (n30, n03, n21, n12) = (eta(3, 0), eta(0, 3), eta(2, 1), eta(1, 2));

    let a = n30 + n12;
    let b = n21 + n03;
    let hu = [
        n20 + n02,
        (n20 - n02).powi(2) + 4.0 * n11.powi(2),
        (n30 - 3.0 * n12).powi(2) + (3.0 * n21 - n03).powi(2),
        a.powi(2) + b.powi(2),
        (n30 - 3.0 * n12) * a * (a.powi(2) - 3.0 * b.powi(2))
            + (3.0 * n21 - n03) * b * (3.0 * a.powi(2) - b.powi(2)),
        (n20 - n02) * (a.powi(2) - b.powi(2)) + 4.0 * n11 * a * b,
        (3.0 * n21 - n03) * a * (a.powi(2) - 3.0 * b.powi(2))
            - (n30 - 3.0 * n12) * b * (3.0 * a.powi(2) - b.powi(2)),
    ];

    hu.map(|h| {
        if h == 0.0 || !h.is_finite() {
            0.0
        } else {
            -h.signum() * h.abs().log10()
        }
    })
}

/// Intensity variance of each cell in an 8×8 grid, pixels scaled to `[0, 1]`.
fn block_variances(gray: &GrayImage) -> Vec<f64> {
    let cell_w = (gray.width() / BLOCK_GRID).max(1);
    let cell_h = (gray.height() / BLOCK_GRID).max(1);
    let mut out = Vec::with_capacity((BLOCK_GRID * BLOCK_GRID) as usize);

    for by in 0..BLOCK_GRID {
        for bx in 0..BLOCK_GRID {
            let values: Vec<f64> = (by * cell_h..((by + 1) * cell_h).min(gray.height()))
                .flat_map(|y| {
                    (bx * cell_w..((bx + 1) * cell_w).min(gray.width()))
                        .map(move |x| gray.get_pixel(x, y).0[0] as f64 / 255.0)
                })
                .collect();
            if values.is_empty() {
                out.push(0.0);
                continue;
            }
            let mean = values.iter().sum::<f64>() / values.len() as f64;
            let var = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / values.len() as f64;
            out.push(var);
        }
    }
    out
}
