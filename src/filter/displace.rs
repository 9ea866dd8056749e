use crate::foundation::core::TextureSize;
use crate::foundation::error::{GlassError, GlassResult};
use crate::shader::texture::{DisplacementTexture, decode_channel};

/// Run the displacement stage on the CPU.
///
/// `src` is straight RGBA8 of `size` surface pixels; `scale` is the published scale in surface
/// pixels. Each output pixel reads the texture at the matching relative position (so textures
/// rendered at a different resolution still line up), offsets its own coordinate by the decoded
/// R/G displacement and copies the nearest source pixel. Samples outside the source are
/// transparent.
pub fn apply_displacement(
    src: &[u8],
    size: TextureSize,
    texture: &DisplacementTexture,
    scale: f64,
) -> GlassResult<Vec<u8>> {
    let expected_len = size
        .rgba_len()
        .ok_or_else(|| GlassError::validation("displacement buffer size overflow"))?;
    if src.len() != expected_len {
        return Err(GlassError::validation(
            "apply_displacement expects src matching width*height*4",
        ));
    }
    if !scale.is_finite() {
        return Err(GlassError::validation("displacement scale must be finite"));
    }

    let (w, h) = (size.width as usize, size.height as usize);
    let (tw, th) = (texture.width() as usize, texture.height() as usize);
    let map = texture.rgba();
    let mut out = vec![0u8; expected_len];

    for y in 0..h {
        let ty = (y * th / h).min(th - 1);
        for x in 0..w {
            let tx = (x * tw / w).min(tw - 1);
            let ti = (ty * tw + tx) * 4;
            let ox = decode_channel(map[ti], scale);
            let oy = decode_channel(map[ti + 1], scale);

            let sx = (x as f64 + ox).round();
            let sy = (y as f64 + oy).round();
            if sx < 0.0 || sy < 0.0 || sx >= w as f64 || sy >= h as f64 {
                continue;
            }
            let si = (sy as usize * w + sx as usize) * 4;
            let di = (y * w + x) * 4;
            out[di..di + 4].copy_from_slice(&src[si..si + 4]);
        }
    }
    Ok(out)
}

#[cfg(test)]
#[path = "../../tests/unit/filter/displace.rs"]
mod tests;
