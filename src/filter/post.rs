use crate::filter::graph::FilterHandle;
use crate::foundation::core::TextureSize;
use crate::foundation::error::{GlassError, GlassResult};

/// Post-processing applied by the consumer after the displacement filter.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PostFx {
    /// Gaussian blur standard deviation in surface pixels.
    pub blur_px: f64,
    /// Saturation multiplier; `1.0` is unchanged.
    pub saturate: f64,
}

impl Default for PostFx {
    fn default() -> Self {
        Self {
            blur_px: 16.0,
            saturate: 1.2,
        }
    }
}

/// Consumer filter chain: displacement reference first, then blur and saturate.
///
/// Without a handle (surface not measured yet, or detached) the chain omits the reference and
/// the surface renders without distortion.
pub fn backdrop_filter(handle: Option<&FilterHandle>, post: &PostFx) -> String {
    let tail = format!("blur({}px) saturate({})", post.blur_px, post.saturate);
    match handle {
        Some(h) => format!("{} {tail}", h.css_url()),
        None => tail,
    }
}

/// Render blur then saturate over straight RGBA8 on the CPU.
pub fn apply_post(src: &[u8], size: TextureSize, post: &PostFx) -> GlassResult<Vec<u8>> {
    let expected_len = size
        .rgba_len()
        .ok_or_else(|| GlassError::validation("post buffer size overflow"))?;
    if src.len() != expected_len {
        return Err(GlassError::validation(
            "apply_post expects src matching width*height*4",
        ));
    }
    if !post.blur_px.is_finite() || post.blur_px < 0.0 {
        return Err(GlassError::validation("blur must be finite and >= 0"));
    }
    if !post.saturate.is_finite() || post.saturate < 0.0 {
        return Err(GlassError::validation("saturate must be finite and >= 0"));
    }

    let mut px: Vec<f32> = src.iter().map(|&b| f32::from(b)).collect();
    if post.blur_px > 0.0 {
        let kernel = gaussian_kernel(post.blur_px);
        px = blur_axis(&px, size, &kernel, Axis::X);
        px = blur_axis(&px, size, &kernel, Axis::Y);
    }
    if post.saturate != 1.0 {
        saturate_in_place(&mut px, post.saturate as f32);
    }
    Ok(px
        .into_iter()
        .map(|v| v.round().clamp(0.0, 255.0) as u8)
        .collect())
}

#[derive(Clone, Copy)]
enum Axis {
    X,
    Y,
}

fn gaussian_kernel(sigma: f64) -> Vec<f32> {
    let radius = (sigma * 3.0).ceil().max(1.0) as i32;
    let denom = 2.0 * sigma * sigma;
    let weights: Vec<f64> = (-radius..=radius)
        .map(|i| (-f64::from(i * i) / denom).exp())
        .collect();
    let sum: f64 = weights.iter().sum();
    weights.into_iter().map(|w| (w / sum) as f32).collect()
}

// Edge pixels are repeated outside the image.
fn blur_axis(src: &[f32], size: TextureSize, kernel: &[f32], axis: Axis) -> Vec<f32> {
    let (w, h) = (size.width as i64, size.height as i64);
    let radius = (kernel.len() / 2) as i64;
    let mut out = vec![0.0f32; src.len()];

    for y in 0..h {
        for x in 0..w {
            let mut acc = [0.0f32; 4];
            for (k, &wt) in kernel.iter().enumerate() {
                let o = k as i64 - radius;
                let (sx, sy) = match axis {
                    Axis::X => ((x + o).clamp(0, w - 1), y),
                    Axis::Y => (x, (y + o).clamp(0, h - 1)),
                };
                let si = ((sy * w + sx) * 4) as usize;
                for c in 0..4 {
                    acc[c] += src[si + c] * wt;
                }
            }
            let di = ((y * w + x) * 4) as usize;
            out[di..di + 4].copy_from_slice(&acc);
        }
    }
    out
}

// Luminance-preserving saturation matrix (Rec. 709 weights).
fn saturate_in_place(px: &mut [f32], s: f32) {
    for p in px.chunks_exact_mut(4) {
        let (r, g, b) = (p[0], p[1], p[2]);
        p[0] = (0.213 + 0.787 * s) * r + (0.715 - 0.715 * s) * g + (0.072 - 0.072 * s) * b;
        p[1] = (0.213 - 0.213 * s) * r + (0.715 + 0.285 * s) * g + (0.072 - 0.072 * s) * b;
        p[2] = (0.213 - 0.213 * s) * r + (0.715 - 0.715 * s) * g + (0.072 + 0.928 * s) * b;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/filter/post.rs"]
mod tests;
