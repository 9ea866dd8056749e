use super::*;
use crate::filter::graph::FilterGraph;
use crate::foundation::core::Size;

#[test]
fn chain_puts_reference_before_post_processing() {
    let g = FilterGraph::new("lg-x", Size::new(10.0, 10.0)).unwrap();
    let css = backdrop_filter(Some(g.handle()), &PostFx::default());
    assert_eq!(css, "url(#lg-x_filter) blur(16px) saturate(1.2)");
}

#[test]
fn chain_without_handle_renders_plain() {
    let css = backdrop_filter(
        None,
        &PostFx {
            blur_px: 4.0,
            saturate: 1.0,
        },
    );
    assert_eq!(css, "blur(4px) saturate(1)");
}

#[test]
fn neutral_post_is_identity() {
    let size = TextureSize::new(3, 2).unwrap();
    let src: Vec<u8> = (0..24).map(|i| (i * 10) as u8).collect();
    let out = apply_post(
        &src,
        size,
        &PostFx {
            blur_px: 0.0,
            saturate: 1.0,
        },
    )
    .unwrap();
    assert_eq!(out, src);
}

#[test]
fn blur_keeps_constant_image() {
    let size = TextureSize::new(5, 4).unwrap();
    let src = [40u8, 80, 120, 255].repeat(20);
    let out = apply_post(
        &src,
        size,
        &PostFx {
            blur_px: 2.0,
            saturate: 1.0,
        },
    )
    .unwrap();
    assert_eq!(out, src);
}

#[test]
fn blur_spreads_a_single_pixel() {
    let size = TextureSize::new(7, 7).unwrap();
    let mut src = vec![0u8; 7 * 7 * 4];
    let c = (3 * 7 + 3) * 4;
    src[c..c + 4].copy_from_slice(&[255, 255, 255, 255]);
    let out = apply_post(
        &src,
        size,
        &PostFx {
            blur_px: 1.0,
            saturate: 1.0,
        },
    )
    .unwrap();
    assert!(out[c + 3] < 255);
    assert!(out.chunks_exact(4).filter(|p| p[3] > 0).count() > 1);
}

#[test]
fn saturate_zero_is_grayscale_and_keeps_gray() {
    let size = TextureSize::new(2, 1).unwrap();
    let src = [200u8, 40, 10, 255, 90, 90, 90, 255];
    let out = apply_post(
        &src,
        size,
        &PostFx {
            blur_px: 0.0,
            saturate: 0.0,
        },
    )
    .unwrap();
    assert_eq!(out[0], out[1]);
    assert_eq!(out[1], out[2]);
    assert_eq!(&out[4..8], &[90, 90, 90, 255]);
}

#[test]
fn rejects_bad_params() {
    let size = TextureSize::new(1, 1).unwrap();
    let src = [0u8; 4];
    let bad_blur = PostFx {
        blur_px: -1.0,
        saturate: 1.0,
    };
    assert!(apply_post(&src, size, &bad_blur).is_err());
    assert!(apply_post(&[0u8; 3], size, &PostFx::default()).is_err());
}
