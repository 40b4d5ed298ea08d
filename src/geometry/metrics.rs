//! Triangle and tetrahedron metrics used by the surface algorithms.
//!
//! All functions guard degenerate inputs: near-zero areas and lengths return
//! errors or harmless sentinels instead of propagating NaNs.

use crate::geometry::vector::{cross, dot, norm, normalize, sub, EPS};
use crate::mesh_error::MeshCascError;

/// Area of the triangle `(a, b, c)`.
pub fn triangle_area(a: [f64; 3], b: [f64; 3], c: [f64; 3]) -> f64 {
    0.5 * norm(cross(sub(b, a), sub(c, a)))
}

/// Unit normal of the triangle `(a, b, c)` under that winding.
pub fn triangle_normal(
    a: [f64; 3],
    b: [f64; 3],
    c: [f64; 3],
) -> Result<[f64; 3], MeshCascError> {
    normalize(cross(sub(b, a), sub(c, a)))
        .ok_or_else(|| MeshCascError::InvalidGeometry("degenerate triangle".into()))
}

/// Interior angle at `apex` of the triangle `(apex, p, q)`, in radians.
/// Degenerate corners report 0.
pub fn corner_angle(apex: [f64; 3], p: [f64; 3], q: [f64; 3]) -> f64 {
    let u = sub(p, apex);
    let v = sub(q, apex);
    let nu = norm(u);
    let nv = norm(v);
    if nu < EPS || nv < EPS {
        return 0.0;
    }
    (dot(u, v) / (nu * nv)).clamp(-1.0, 1.0).acos()
}

/// Minimum interior angle of the triangle `(a, b, c)`, in radians.
pub fn min_angle(a: [f64; 3], b: [f64; 3], c: [f64; 3]) -> f64 {
    corner_angle(a, b, c)
        .min(corner_angle(b, c, a))
        .min(corner_angle(c, a, b))
}

/// Cotangent of the angle at `apex` of the triangle `(apex, p, q)`.
/// Degenerate corners report 0.
pub fn corner_cotangent(apex: [f64; 3], p: [f64; 3], q: [f64; 3]) -> f64 {
    let u = sub(p, apex);
    let v = sub(q, apex);
    let cross_norm = norm(cross(u, v));
    if cross_norm < EPS {
        return 0.0;
    }
    dot(u, v) / cross_norm
}

/// Signed volume of the tetrahedron spanned by the origin and `(a, b, c)`,
/// positive when `(a, b, c)` winds counter-clockwise seen from outside.
pub fn signed_tet_volume(a: [f64; 3], b: [f64; 3], c: [f64; 3]) -> f64 {
    dot(a, cross(b, c)) / 6.0
}

/// True when the triangle is too thin to carry geometry.
pub fn is_degenerate(a: [f64; 3], b: [f64; 3], c: [f64; 3]) -> bool {
    triangle_area(a, b, c) < EPS
}
