//! Integration tests for measuring text with registered TrueType faces.

use label_oxide::fonts::{FontFace, FontRegistry, LoadedFont};
use label_oxide::{Error, FontMetrics, TextMetrics};

const DEMO_FONT: &str = "tests/fixtures/demo.ttf";

fn registry() -> FontRegistry {
    let mut registry = FontRegistry::new();
    registry.register_truetype_file("Demo", DEMO_FONT).unwrap();
    registry
}

fn approx(a: f32, b: f32) -> bool {
    (a - b).abs() < 1e-3
}

#[test]
fn test_registered_face_resolves_exactly() {
    let registry = registry();
    assert!(registry.contains("Demo"));
    match registry.load_font("Demo") {
        LoadedFont::Exact(FontFace::TrueType(face)) => {
            assert_eq!(face.name(), "Demo");
            assert_eq!(face.advance('A'), Some(540.0));
            assert_eq!(face.ascender(), 1024.0);
        },
        other => panic!("expected embedded face, got {:?}", other),
    }
}

#[test]
fn test_registered_face_shadows_standard_font() {
    let mut registry = FontRegistry::new();
    let data = std::fs::read(DEMO_FONT).unwrap();
    registry.register_truetype("Helvetica", &data).unwrap();
    assert!(matches!(
        registry.load_font("Helvetica"),
        LoadedFont::Exact(FontFace::TrueType(_))
    ));
}

#[test]
fn test_metrics_measure_through_registered_face() {
    let metrics = FontMetrics::with_registry(registry());
    let bbox = metrics.measure("AA", "Demo", 10.0).unwrap();
    assert!(approx(bbox.width, 2.0 * 540.0 * 10.0 / 1000.0));
    assert!(approx(bbox.ascent, 10.24));
    assert!(approx(bbox.descent, -4.0));
    assert!(approx(bbox.height, 14.24));
}

#[test]
fn test_unmapped_character_is_unmeasurable() {
    let metrics = FontMetrics::with_registry(registry());
    match metrics.measure("A B", "Demo", 10.0) {
        Err(Error::UnmeasurableGlyph { font, ch, .. }) => {
            assert_eq!(font, "Demo");
            assert_eq!(ch, ' ');
        },
        other => panic!("expected UnmeasurableGlyph, got {:?}", other),
    }
}
