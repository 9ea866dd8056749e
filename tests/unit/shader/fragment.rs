use super::*;
use crate::shader::pointer::PointerProbe;

#[test]
fn default_fragment_is_identity_at_center() {
    let probe = PointerProbe::default();
    let pos = default_fragment(Point::new(0.5, 0.5), &probe.begin());
    assert!((pos.x - 0.5).abs() < 1e-12);
    assert!((pos.y - 0.5).abs() < 1e-12);
}

#[test]
fn default_fragment_keeps_lens_interior() {
    let probe = PointerProbe::default();
    let uv = Point::new(0.6, 0.55);
    assert_eq!(LensShape::DEFAULT.pull(0.1, 0.05), 1.0);
    let pos = default_fragment(uv, &probe.begin());
    assert!((pos.x - uv.x).abs() < 1e-12);
    assert!((pos.y - uv.y).abs() < 1e-12);
}

#[test]
fn default_fragment_pulls_rim_toward_center() {
    let probe = PointerProbe::default();
    let pos = default_fragment(Point::new(0.0, 0.0), &probe.begin());
    assert!(pos.x > 0.0 && pos.x < 0.5);
    assert!(pos.y > 0.0 && pos.y < 0.5);
}

#[test]
fn pull_vanishes_far_outside() {
    assert_eq!(LensShape::DEFAULT.pull(2.0, 2.0), 0.0);
    let a = LensShape::DEFAULT.pull(0.4, 0.4);
    let b = LensShape::DEFAULT.pull(0.6, 0.6);
    assert!(a > b);
}

#[test]
fn default_fragment_never_reads_pointer() {
    let probe = PointerProbe::new(Point::new(0.3, 0.3));
    let ptr = probe.begin();
    for i in 0..10 {
        let t = f64::from(i) / 10.0;
        default_fragment(Point::new(t, 1.0 - t), &ptr);
    }
    assert!(!probe.was_read());
}

#[test]
fn lens_fragment_with_default_shape_matches_default() {
    let probe = PointerProbe::default();
    let lens = lens_fragment(LensShape::DEFAULT);
    let uv = Point::new(0.2, 0.7);
    assert_eq!(
        lens.sample(uv, &probe.begin()),
        default_fragment(uv, &probe.begin())
    );
}

#[test]
fn closures_are_fragments() {
    let follow = fragment_fn(|uv, p| Point::new(uv.x + p.x() * 0.1, uv.y));
    let probe = PointerProbe::new(Point::new(1.0, 0.0));
    let pos = follow.sample(Point::new(0.5, 0.5), &probe.begin());
    assert!((pos.x - 0.6).abs() < 1e-12);
    assert!(probe.was_read());
}

#[test]
fn identity_returns_uv() {
    let probe = PointerProbe::default();
    let uv = Point::new(0.125, 0.875);
    assert_eq!(IdentityFragment.sample(uv, &probe.begin()), uv);
}
