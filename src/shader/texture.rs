use crate::foundation::core::{TextureSize, Vec2};
use crate::foundation::error::{GlassError, GlassResult};
use crate::foundation::math::unit_to_u8;
use crate::shader::field::DisplacementField;
use base64::Engine as _;

/// Channel value that decodes to zero displacement.
pub const NEUTRAL_CHANNEL: u8 = 128;

/// Immutable 8-bit RGBA rendition of a [`DisplacementField`].
///
/// R carries `dx`, G carries `dy`, B is always 0 and A always 255. Channels are normalized over
/// `[-max_magnitude, max_magnitude]`, so a channel decodes as
/// `(c / 255 - 0.5) * filter_scale()` with at most half a quantization step of error.
#[derive(Clone, Debug, PartialEq)]
pub struct DisplacementTexture {
    size: TextureSize,
    rgba: Vec<u8>,
    scale_factor: f64,
}

impl DisplacementTexture {
    /// Texture dimensions.
    pub fn size(&self) -> TextureSize {
        self.size
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.size.width
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.size.height
    }

    /// Straight RGBA8 bytes, tightly packed, row-major.
    pub fn rgba(&self) -> &[u8] {
        &self.rgba
    }

    /// Half of the field's largest component magnitude.
    pub fn scale_factor(&self) -> f64 {
        self.scale_factor
    }

    /// Scale for the displacement-map stage, in texture pixels.
    ///
    /// Equal to twice the field's largest component magnitude. Zero for a degenerate field.
    pub fn filter_scale(&self) -> f64 {
        self.scale_factor * 4.0
    }

    /// Decode the displacement stored at pixel `(x, y)`.
    pub fn decode(&self, x: u32, y: u32) -> Option<Vec2> {
        if x >= self.size.width || y >= self.size.height {
            return None;
        }
        let i = (y as usize * self.size.width as usize + x as usize) * 4;
        Some(Vec2::new(
            decode_channel(self.rgba[i], self.filter_scale()),
            decode_channel(self.rgba[i + 1], self.filter_scale()),
        ))
    }

    /// Encode as PNG.
    pub fn to_png(&self) -> GlassResult<Vec<u8>> {
        let img = image::RgbaImage::from_raw(self.size.width, self.size.height, self.rgba.clone())
            .ok_or_else(|| GlassError::encode("texture buffer does not match its size"))?;
        let mut out = std::io::Cursor::new(Vec::new());
        img.write_to(&mut out, image::ImageFormat::Png)
            .map_err(|e| GlassError::encode(format!("png: {e}")))?;
        Ok(out.into_inner())
    }

    /// Encode as a `data:image/png;base64,...` URL suitable for an image-source filter node.
    pub fn to_data_url(&self) -> GlassResult<String> {
        let png = self.to_png()?;
        Ok(format!(
            "data:image/png;base64,{}",
            base64::engine::general_purpose::STANDARD.encode(png)
        ))
    }
}

/// Quantize `field` into an RGBA texture.
///
/// A field without any displacement encodes every pixel as [`NEUTRAL_CHANNEL`] with a zero scale;
/// no division takes place.
pub fn encode_texture(field: &DisplacementField) -> GlassResult<DisplacementTexture> {
    let size = field.size();
    let len = size
        .rgba_len()
        .ok_or_else(|| GlassError::validation("texture size overflow"))?;
    if field.vectors().len() != size.pixel_count() {
        return Err(GlassError::validation(
            "displacement field does not match its size",
        ));
    }

    let range = field.max_magnitude() * 2.0;
    let mut rgba = Vec::with_capacity(len);
    for v in field.vectors() {
        rgba.extend_from_slice(&[encode_channel(v.x, range), encode_channel(v.y, range), 0, 255]);
    }

    Ok(DisplacementTexture {
        size,
        rgba,
        scale_factor: field.scale_factor(),
    })
}

fn encode_channel(d: f64, range: f64) -> u8 {
    if range <= 0.0 {
        return NEUTRAL_CHANNEL;
    }
    unit_to_u8(d / range + 0.5)
}

/// Inverse of the channel quantization for a given filter scale.
pub fn decode_channel(c: u8, filter_scale: f64) -> f64 {
    (f64::from(c) / 255.0 - 0.5) * filter_scale
}

#[cfg(test)]
#[path = "../../tests/unit/shader/texture.rs"]
mod tests;
