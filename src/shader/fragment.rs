use crate::foundation::core::Point;
use crate::foundation::math::{rounded_rect_sdf, smoothstep};
use crate::shader::pointer::ObservedPointer;

/// Programmable shape of the distortion.
///
/// `sample` maps a normalized surface coordinate `uv` in `[0, 1]^2` to the normalized coordinate
/// the output pixel should be sampled from. Implementations must be pure: the same `uv` and
/// pointer must always produce the same result. Reading `pointer` is what makes pointer
/// movement trigger a recompute.
pub trait FragmentFn: Send + Sync {
    /// Displaced coordinate for `uv`.
    fn sample(&self, uv: Point, pointer: &ObservedPointer<'_>) -> Point;
}

impl<F> FragmentFn for F
where
    F: Fn(Point, &ObservedPointer<'_>) -> Point + Send + Sync,
{
    fn sample(&self, uv: Point, pointer: &ObservedPointer<'_>) -> Point {
        self(uv, pointer)
    }
}

/// Pin a closure to the [`FragmentFn`] signature.
///
/// Closures stored in a `let` before use do not always infer a signature that is generic over
/// the pointer borrow; passing them through here does.
pub fn fragment_fn<F>(f: F) -> F
where
    F: Fn(Point, &ObservedPointer<'_>) -> Point + Send + Sync,
{
    f
}

/// Rounded-rectangle lens parameters, in normalized units around the surface center.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct LensShape {
    /// Half extent of the rectangle along x.
    pub half_width: f64,
    /// Half extent of the rectangle along y.
    pub half_height: f64,
    /// Corner radius.
    pub radius: f64,
    /// Distance subtracted from the SDF before the falloff.
    pub edge_offset: f64,
    /// SDF distance at which the lens has no effect left.
    pub falloff: f64,
}

impl LensShape {
    /// Shape used by [`default_fragment`].
    pub const DEFAULT: Self = Self {
        half_width: 0.3,
        half_height: 0.2,
        radius: 0.6,
        edge_offset: 0.15,
        falloff: 0.8,
    };

    /// Pull factor at `(ix, iy)` relative to the center: `1` inside the lens (coordinate kept),
    /// falling to `0` (collapsed onto the center) once the SDF exceeds `edge_offset + falloff`.
    pub fn pull(&self, ix: f64, iy: f64) -> f64 {
        let d = rounded_rect_sdf(ix, iy, self.half_width, self.half_height, self.radius);
        let displacement = smoothstep(self.falloff, 0.0, d - self.edge_offset);
        smoothstep(0.0, 1.0, displacement)
    }

    fn sample(&self, uv: Point) -> Point {
        let ix = uv.x - 0.5;
        let iy = uv.y - 0.5;
        let k = self.pull(ix, iy);
        Point::new(ix * k + 0.5, iy * k + 0.5)
    }
}

impl Default for LensShape {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Fragment built from a [`LensShape`]. Ignores the pointer.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct LensFragment {
    /// Lens geometry.
    pub shape: LensShape,
}

impl FragmentFn for LensFragment {
    fn sample(&self, uv: Point, _pointer: &ObservedPointer<'_>) -> Point {
        self.shape.sample(uv)
    }
}

/// Build a lens fragment for `shape`.
pub fn lens_fragment(shape: LensShape) -> LensFragment {
    LensFragment { shape }
}

/// Built-in refraction bulge.
///
/// The lens interior samples itself unchanged; outside it the sample point is pulled toward the
/// center, increasingly so with distance, which magnifies the content near the rim.
///
/// Never reads `pointer`, so pointer movement never recomputes it.
pub fn default_fragment(uv: Point, _pointer: &ObservedPointer<'_>) -> Point {
    LensShape::DEFAULT.sample(uv)
}

/// `pos = uv`; produces an all-zero displacement field.
#[derive(Clone, Copy, Debug, Default)]
pub struct IdentityFragment;

impl FragmentFn for IdentityFragment {
    fn sample(&self, uv: Point, _pointer: &ObservedPointer<'_>) -> Point {
        uv
    }
}

#[cfg(test)]
#[path = "../../tests/unit/shader/fragment.rs"]
mod tests;
