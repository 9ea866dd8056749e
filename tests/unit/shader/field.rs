use super::*;
use crate::shader::fragment::{IdentityFragment, default_fragment, fragment_fn};

fn size(w: u32, h: u32) -> TextureSize {
    TextureSize::new(w, h).unwrap()
}

#[test]
fn identity_field_is_all_zero() {
    let probe = PointerProbe::default();
    let field = evaluate_field(&IdentityFragment, size(100, 50), &probe, false).unwrap();
    assert_eq!(field.vectors().len(), 100 * 50);
    assert!(field.vectors().iter().all(|v| *v == Vec2::ZERO));
    assert_eq!(field.max_magnitude(), 0.0);
    assert_eq!(field.scale_factor(), 0.0);
    assert!(!field.pointer_read());
}

#[test]
fn identity_field_is_exactly_zero_at_odd_sizes() {
    // (x / w) * w != x in f64 for pairs such as 15/22 and 7/25.
    let probe = PointerProbe::default();
    for (w, h) in [(22, 25), (23, 26), (97, 3)] {
        let field = evaluate_field(&IdentityFragment, size(w, h), &probe, false).unwrap();
        assert_eq!(field.max_magnitude(), 0.0, "{w}x{h}");
    }
}

#[test]
fn constant_shift_reports_pixel_units() {
    let probe = PointerProbe::default();
    let shift = fragment_fn(|uv, _p| Point::new(uv.x + 0.1, uv.y - 0.25));
    let field = evaluate_field(&shift, size(20, 8), &probe, false).unwrap();
    let v = field.get(3, 5).unwrap();
    assert!((v.x - 2.0).abs() < 1e-9);
    assert!((v.y + 2.0).abs() < 1e-9);
    assert!((field.max_magnitude() - 2.0).abs() < 1e-9);
    assert!((field.scale_factor() - 1.0).abs() < 1e-9);
    assert_eq!(field.get(20, 0), None);
}

#[test]
fn center_pixel_of_default_lens_has_no_displacement() {
    let probe = PointerProbe::default();
    let field = evaluate_field(&default_fragment, size(10, 10), &probe, false).unwrap();
    let v = field.get(5, 5).unwrap();
    assert!(v.x.abs() < 1e-9 && v.y.abs() < 1e-9);
    assert!(field.max_magnitude() > 0.0);
}

#[test]
fn parallel_matches_sequential() {
    let probe = PointerProbe::new(Point::new(0.7, 0.2));
    let follow = fragment_fn(|uv, p| {
        Point::new(uv.x + (p.x() - 0.5) * uv.y, uv.y + (p.y() - 0.5) * uv.x)
    });
    let a = evaluate_field(&follow, size(33, 17), &probe, false).unwrap();
    let b = evaluate_field(&follow, size(33, 17), &probe, true).unwrap();
    assert_eq!(a.vectors(), b.vectors());
    assert_eq!(a.max_magnitude(), b.max_magnitude());
    assert!(a.pointer_read() && b.pointer_read());
}

#[test]
fn pointer_read_is_reset_per_evaluation() {
    let probe = PointerProbe::default();
    let reads = fragment_fn(|uv, p| Point::new(uv.x + p.x() * 0.0, uv.y));
    assert!(evaluate_field(&reads, size(4, 4), &probe, false).unwrap().pointer_read());
    assert!(!evaluate_field(&IdentityFragment, size(4, 4), &probe, false).unwrap().pointer_read());
}

#[test]
fn non_finite_output_is_an_error() {
    let probe = PointerProbe::default();
    let bad = fragment_fn(|uv, _p| Point::new(uv.x / 0.0, uv.y));
    let err = evaluate_field(&bad, size(4, 4), &probe, false).unwrap_err();
    assert!(matches!(err, GlassError::Evaluation(_)));
}

#[test]
fn zero_grid_is_rejected() {
    let probe = PointerProbe::default();
    let grid = TextureSize {
        width: 0,
        height: 3,
    };
    assert!(evaluate_field(&IdentityFragment, grid, &probe, false).is_err());
}
