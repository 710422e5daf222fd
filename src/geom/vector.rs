//! 2D vector operations
//!
//! `Vector2` is glam's `DVec2`; arithmetic (add, subtract, scale) comes from its
//! operators. The functions here add the operations whose degenerate cases need a
//! defined policy: anything that needs a direction returns `GeometryError` for the
//! zero vector instead of producing NaN.

use crate::error::GeometryError;
use crate::normalize_angle;

/// Immutable-by-convention 2D vector (f64 components)
pub type Vector2 = glam::DVec2;

/// Squared magnitude below which a vector is treated as having no direction
pub const ZERO_EPSILON_SQ: f64 = 1e-24;

/// Euclidean norm
#[inline]
pub fn magnitude(v: Vector2) -> f64 {
    v.length()
}

/// Dot product
#[inline]
pub fn dot_product(a: Vector2, b: Vector2) -> f64 {
    a.x * b.x + a.y * b.y
}

/// 2D cross product (z of the 3D cross product)
#[inline]
pub fn cross_product(a: Vector2, b: Vector2) -> f64 {
    a.x * b.y - a.y * b.x
}

/// Whether `v` is too short to have a direction
#[inline]
pub fn is_zero(v: Vector2) -> bool {
    !(v.length_squared() > ZERO_EPSILON_SQ)
}

/// Unit vector in the direction of `v`
pub fn normalize(v: Vector2) -> Result<Vector2, GeometryError> {
    if is_zero(v) || !v.is_finite() {
        return Err(GeometryError::DegenerateGeometry("zero vector"));
    }
    Ok(v / v.length())
}

/// Signed angle from `a` to `b` in (-π, π]
///
/// Positive values turn from +x toward +y, which is clockwise on a y-down canvas.
/// Callers normalize into [0, 2π) when they need a one-sided range.
pub fn angle_between(a: Vector2, b: Vector2) -> Result<f64, GeometryError> {
    if is_zero(a) || is_zero(b) {
        return Err(GeometryError::DegenerateGeometry("zero vector"));
    }
    Ok(cross_product(a, b).atan2(dot_product(a, b)))
}

/// Direction of `v` in [0, 2π)
pub fn heading(v: Vector2) -> Result<f64, GeometryError> {
    if is_zero(v) {
        return Err(GeometryError::DegenerateGeometry("zero vector"));
    }
    Ok(normalize_angle(v.y.atan2(v.x)))
}

/// Specular reflection: v' = v - 2(v·n̂)n̂
///
/// The normal is normalized here, so a scaled normal still gives a correct
/// reflection.
pub fn reflect(velocity: Vector2, normal: Vector2) -> Result<Vector2, GeometryError> {
    let n = normalize(normal)?;
    Ok(velocity - 2.0 * dot_product(velocity, n) * n)
}

/// Rescale `v` to `length`, keeping its direction
pub fn with_magnitude(v: Vector2, length: f64) -> Result<Vector2, GeometryError> {
    Ok(normalize(v)? * length)
}

/// Clamp the magnitude of `v` to at most `max` (zero vectors pass through)
pub fn limit(v: Vector2, max: f64) -> Vector2 {
    let len_sq = v.length_squared();
    if len_sq > max * max && len_sq > 0.0 {
        v * (max / len_sq.sqrt())
    } else {
        v
    }
}
