use super::*;

#[test]
fn new_rejects_zero_dims() {
    assert!(TextureSize::new(0, 4).is_err());
    assert!(TextureSize::new(4, 0).is_err());
    assert_eq!(
        TextureSize::new(3, 2).unwrap(),
        TextureSize {
            width: 3,
            height: 2
        }
    );
}

#[test]
fn from_surface_truncates_and_detects_unmeasured() {
    assert_eq!(TextureSize::from_surface(Size::ZERO, 1.0), None);
    assert_eq!(TextureSize::from_surface(Size::new(0.5, 30.0), 1.0), None);
    assert_eq!(
        TextureSize::from_surface(Size::new(100.7, 50.2), 1.0),
        Some(TextureSize {
            width: 100,
            height: 50
        })
    );
    assert_eq!(
        TextureSize::from_surface(Size::new(100.0, 50.0), 0.5),
        Some(TextureSize {
            width: 50,
            height: 25
        })
    );
    assert_eq!(TextureSize::from_surface(Size::new(f64::NAN, 5.0), 1.0), None);
}

#[test]
fn rgba_len_matches_dims() {
    let s = TextureSize::new(5, 3).unwrap();
    assert_eq!(s.pixel_count(), 15);
    assert_eq!(s.rgba_len(), Some(60));
}
