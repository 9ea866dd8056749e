/// Cubic Hermite step between edges `a` and `b`.
///
/// `a > b` is allowed and produces a falling step. Equal edges degrade to a hard step at `a`.
pub fn smoothstep(a: f64, b: f64, t: f64) -> f64 {
    if a == b {
        return if t < a { 0.0 } else { 1.0 };
    }
    let t = ((t - a) / (b - a)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

/// Euclidean length of `(x, y)`.
pub fn length(x: f64, y: f64) -> f64 {
    x.hypot(y)
}

/// Linear interpolation from `a` to `b`.
pub fn mix(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

/// Signed distance from `(x, y)` to a rounded rectangle centered at the origin.
///
/// Negative inside, positive outside.
pub fn rounded_rect_sdf(x: f64, y: f64, half_width: f64, half_height: f64, radius: f64) -> f64 {
    let qx = x.abs() - half_width + radius;
    let qy = y.abs() - half_height + radius;
    qx.max(qy).min(0.0) + length(qx.max(0.0), qy.max(0.0)) - radius
}

/// Map `v` in `[0, 1]` to a byte, rounding to nearest and saturating outside the range.
pub(crate) fn unit_to_u8(v: f64) -> u8 {
    if v.is_nan() {
        return 0;
    }
    (v * 255.0).round().clamp(0.0, 255.0) as u8
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/math.rs"]
mod tests;
