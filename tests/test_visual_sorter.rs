//! Integration tests for visual similarity sorting, on generated PNGs.

use std::path::Path;

use image::{Rgb, RgbImage};
use label_oxide::product::{ProductInfo, ProductRecord, ProductSet};
use label_oxide::sorting::visual::features::{self, FEATURE_LEN};
use label_oxide::sorting::{GroupingCriterion, ProductSorter, SortMethod, VisualSimilaritySorter};
use tempfile::TempDir;

fn gradient() -> RgbImage {
    RgbImage::from_fn(96, 96, |x, _| {
        let v = (x * 255 / 95) as u8;
        Rgb([v, v, v])
    })
}

fn checkerboard() -> RgbImage {
    RgbImage::from_fn(96, 96, |x, y| {
        if (x / 12 + y / 12) % 2 == 0 {
            Rgb([0, 0, 0])
        } else {
            Rgb([255, 255, 255])
        }
    })
}

fn disc() -> RgbImage {
    RgbImage::from_fn(96, 96, |x, y| {
        let (dx, dy) = (x as i32 - 48, y as i32 - 48);
        if dx * dx + dy * dy < 30 * 30 {
            Rgb([40, 40, 200])
        } else {
            Rgb([255, 255, 255])
        }
    })
}

fn save(dir: &Path, name: &str, image: &RgbImage) -> std::path::PathBuf {
    let path = dir.join(format!("{}.png", name));
    image.save(&path).unwrap();
    path
}

/// Three pairs of identical images, interleaved.
fn paired_batch(dir: &TempDir) -> ProductSet {
    let images = [("grad", gradient()), ("check", checkerboard()), ("disc", disc())];
    let mut products = ProductSet::new();
    for copy in ["1", "2"] {
        for (name, image) in &images {
            let id = format!("{}{}", name, copy);
            let path = save(dir.path(), &id, image);
            products.insert(id, ProductRecord::new(ProductInfo::new()).with_image(path));
        }
    }
    products
}

fn assert_pairs_adjacent(order: &[String]) {
    for name in ["grad", "check", "disc"] {
        let a = order.iter().position(|x| *x == format!("{}1", name)).unwrap();
        let b = order.iter().position(|x| *x == format!("{}2", name)).unwrap();
        assert_eq!(a.abs_diff(b), 1, "{} copies apart in {:?}", name, order);
    }
}

fn sorted(mut ids: Vec<String>) -> Vec<String> {
    ids.sort();
    ids
}

#[test]
fn test_feature_vector_length() {
    let image = image::DynamicImage::ImageRgb8(checkerboard());
    let features = features::extract(&image);
    assert_eq!(features.len(), FEATURE_LEN);
    assert!(features.iter().all(|v| v.is_finite()));
}

#[test]
fn test_identical_images_end_up_adjacent() {
    let dir = TempDir::new().unwrap();
    let products = paired_batch(&dir);
    for method in [SortMethod::Hierarchical, SortMethod::Greedy] {
        let order = VisualSimilaritySorter::new(method).sort(&products);
        assert_pairs_adjacent(&order);
    }
}

#[test]
fn test_every_method_returns_a_permutation() {
    let dir = TempDir::new().unwrap();
    let mut products = paired_batch(&dir);
    products.insert("no-image".to_string(), ProductRecord::new(ProductInfo::new()));
    products.insert(
        "broken".to_string(),
        ProductRecord::new(ProductInfo::new()).with_image(dir.path().join("missing.png")),
    );
    let expected = sorted(products.keys().cloned().collect());

    for method in [SortMethod::Hierarchical, SortMethod::Spectral, SortMethod::Greedy] {
        let sorter = VisualSimilaritySorter::new(method);
        let order = sorter.sort(&products);
        assert_eq!(sorted(order.clone()), expected);
        assert_eq!(order, sorter.sort(&products));
    }
}

#[test]
fn test_similarity_matrix_shape() {
    let dir = TempDir::new().unwrap();
    let products = paired_batch(&dir);
    let matrix = VisualSimilaritySorter::default().similarity(&products);
    assert_eq!(matrix.shape(), (6, 6));
    for i in 0..6 {
        assert!((matrix[(i, i)] - 1.0).abs() < 1e-9);
        for j in 0..6 {
            assert!((matrix[(i, j)] - matrix[(j, i)]).abs() < 1e-9);
            assert!(matrix[(i, j)] >= -1e-9 && matrix[(i, j)] <= 1.0 + 1e-9);
        }
    }
    // grad1 and grad2 are products 0 and 3
    assert!(matrix[(0, 3)] > 0.99);
}

#[test]
fn test_groups_follow_image_pairs() {
    let dir = TempDir::new().unwrap();
    let products = paired_batch(&dir);
    let groups = VisualSimilaritySorter::default().group(&products, GroupingCriterion::MaxClusters(3));
    assert_eq!(groups.len(), 3);
    for group in &groups {
        assert_eq!(group.ids.len(), 2);
        assert_eq!(group.ids[0][..group.ids[0].len() - 1], group.ids[1][..group.ids[1].len() - 1]);
    }
    assert_eq!(groups[0].label, "cluster_0");
}
