use crate::foundation::error::{GlassError, GlassResult};

pub use kurbo::{Point, Rect, Size, Vec2};

/// Pixel dimensions of a displacement texture.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct TextureSize {
    /// Width in texture pixels.
    pub width: u32,
    /// Height in texture pixels.
    pub height: u32,
}

impl TextureSize {
    /// Create a validated size with both dimensions non-zero.
    pub fn new(width: u32, height: u32) -> GlassResult<Self> {
        if width == 0 || height == 0 {
            return Err(GlassError::validation(format!(
                "texture size must be non-zero, got {width}x{height}"
            )));
        }
        Ok(Self { width, height })
    }

    /// Texture size for a measured surface at `resolution` texture pixels per surface pixel.
    ///
    /// Fractional pixels are truncated. Returns `None` while either side rounds down to zero,
    /// which is how an unmeasured surface is detected.
    pub fn from_surface(surface: Size, resolution: f64) -> Option<Self> {
        let w = surface.width * resolution;
        let h = surface.height * resolution;
        if !w.is_finite() || !h.is_finite() || w < 1.0 || h < 1.0 {
            return None;
        }
        Some(Self {
            width: w.min(f64::from(u32::MAX)) as u32,
            height: h.min(f64::from(u32::MAX)) as u32,
        })
    }

    /// Number of pixels in the grid.
    pub fn pixel_count(self) -> usize {
        (self.width as usize).saturating_mul(self.height as usize)
    }

    /// Tightly packed RGBA8 byte length, or `None` on overflow.
    pub fn rgba_len(self) -> Option<usize> {
        (self.width as usize)
            .checked_mul(self.height as usize)
            .and_then(|v| v.checked_mul(4))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
