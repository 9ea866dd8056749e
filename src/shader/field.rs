use crate::foundation::core::{Point, TextureSize, Vec2};
use crate::foundation::error::{GlassError, GlassResult};
use crate::shader::fragment::FragmentFn;
use crate::shader::pointer::{ObservedPointer, PointerProbe};
use rayon::prelude::*;

/// Raw signed displacement per texture pixel, in texture pixel units.
///
/// Row-major; `vectors()[y * width + x]` is the offset from pixel `(x, y)` to the position the
/// fragment function asked to sample.
#[derive(Clone, Debug)]
pub struct DisplacementField {
    size: TextureSize,
    vectors: Vec<Vec2>,
    max_magnitude: f64,
    pointer_read: bool,
}

impl DisplacementField {
    /// Grid dimensions.
    pub fn size(&self) -> TextureSize {
        self.size
    }

    /// All displacement vectors, row-major.
    pub fn vectors(&self) -> &[Vec2] {
        &self.vectors
    }

    /// Displacement at pixel `(x, y)`, or `None` outside the grid.
    pub fn get(&self, x: u32, y: u32) -> Option<Vec2> {
        if x >= self.size.width || y >= self.size.height {
            return None;
        }
        self.vectors
            .get(y as usize * self.size.width as usize + x as usize)
            .copied()
    }

    /// Largest `max(|dx|, |dy|)` over the grid.
    pub fn max_magnitude(&self) -> f64 {
        self.max_magnitude
    }

    /// Half of [`DisplacementField::max_magnitude`].
    pub fn scale_factor(&self) -> f64 {
        self.max_magnitude * 0.5
    }

    /// Whether the fragment function consulted the pointer during this evaluation.
    pub fn pointer_read(&self) -> bool {
        self.pointer_read
    }
}

/// Sample `fragment` at every pixel of a `size` grid.
///
/// The probe's read flag is reset first and reflects this evaluation afterwards. `parallel`
/// splits rows across the rayon pool; results are identical to the sequential path because each
/// pixel is computed independently.
#[tracing::instrument(level = "debug", skip(fragment, probe), fields(w = size.width, h = size.height))]
pub fn evaluate_field<F>(
    fragment: &F,
    size: TextureSize,
    probe: &PointerProbe,
    parallel: bool,
) -> GlassResult<DisplacementField>
where
    F: FragmentFn + ?Sized,
{
    if size.width == 0 || size.height == 0 {
        return Err(GlassError::validation(
            "evaluate_field requires a non-zero grid",
        ));
    }
    if size.rgba_len().is_none() {
        return Err(GlassError::validation("displacement grid size overflow"));
    }

    let width = size.width as usize;
    let mut vectors = vec![Vec2::ZERO; size.pixel_count()];
    let pointer = probe.begin();

    let max_magnitude = if parallel {
        vectors
            .par_chunks_mut(width)
            .enumerate()
            .map(|(y, row)| eval_row(fragment, size, y as u32, &pointer, row))
            .collect::<GlassResult<Vec<f64>>>()?
            .into_iter()
            .fold(0.0, f64::max)
    } else {
        let mut max = 0.0f64;
        for (y, row) in vectors.chunks_mut(width).enumerate() {
            max = max.max(eval_row(fragment, size, y as u32, &pointer, row)?);
        }
        max
    };

    let pointer_read = probe.was_read();
    tracing::trace!(max_magnitude, pointer_read, "field evaluated");
    Ok(DisplacementField {
        size,
        vectors,
        max_magnitude,
        pointer_read,
    })
}

fn eval_row<F>(
    fragment: &F,
    size: TextureSize,
    y: u32,
    pointer: &ObservedPointer<'_>,
    row: &mut [Vec2],
) -> GlassResult<f64>
where
    F: FragmentFn + ?Sized,
{
    let w = f64::from(size.width);
    let h = f64::from(size.height);
    let fy = f64::from(y);

    let v = fy / h;
    let mut max = 0.0f64;
    for (x, out) in row.iter_mut().enumerate() {
        let u = x as f64 / w;
        let pos = fragment.sample(Point::new(u, v), pointer);
        if !pos.x.is_finite() || !pos.y.is_finite() {
            return Err(GlassError::evaluation(format!(
                "fragment returned non-finite position at pixel ({x}, {y})"
            )));
        }
        // Offset taken in uv space first so `pos == uv` is exactly zero at any grid size.
        let d = Vec2::new((pos.x - u) * w, (pos.y - v) * h);
        max = max.max(d.x.abs()).max(d.y.abs());
        *out = d;
    }
    Ok(max)
}

#[cfg(test)]
#[path = "../../tests/unit/shader/field.rs"]
mod tests;
