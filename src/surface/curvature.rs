//! Discrete curvature estimators over vertex 1-rings.
//!
//! Mean curvature uses the cotangent-weighted Laplace-Beltrami magnitude;
//! Gaussian curvature uses the angle deficit. Both normalize by a third of
//! the 1-ring area. Boundary vertices and degenerate rings report 0, so the
//! estimators stay total over any mesh state.

use crate::geometry::metrics::{corner_angle, corner_cotangent, triangle_area};
use crate::geometry::vector::{add, norm, scale, sub, EPS};
use crate::mesh_error::MeshCascError;
use crate::topology::handle::SimplexHandle;

use super::SurfaceMesh;

/// Magnitude of the cotangent-weighted mean curvature normal at `vertex`.
///
/// For an interior vertex with 1-ring loop `u_0..u_{k-1}`, each rim neighbor
/// `u_i` is weighted by the cotangents of the two angles opposite the edge
/// `v-u_i`, and the weighted edge sum is divided by four times the vertex
/// area (ring area over 3). Returns 0 for boundary vertices and rings with
/// vanishing area.
pub fn mean_curvature(mesh: &SurfaceMesh, vertex: SimplexHandle) -> Result<f64, MeshCascError> {
    let Some(ring) = mesh.link_loop(vertex)? else {
        return Ok(0.0);
    };
    let p = mesh.position(vertex)?;
    let k = ring.len();
    let rim: Vec<[f64; 3]> = ring
        .iter()
        .map(|&id| mesh.position_of(id))
        .collect::<Result<_, _>>()?;

    let mut area = 0.0;
    for i in 0..k {
        area += triangle_area(p, rim[i], rim[(i + 1) % k]);
    }
    if area < EPS {
        return Ok(0.0);
    }

    let mut laplace = [0.0; 3];
    for i in 0..k {
        let prev = rim[(i + k - 1) % k];
        let next = rim[(i + 1) % k];
        // Opposite angles sit at the two rim vertices flanking u_i.
        let w = corner_cotangent(prev, p, rim[i]) + corner_cotangent(next, p, rim[i]);
        laplace = add(laplace, scale(sub(p, rim[i]), w));
    }

    let vertex_area = area / 3.0;
    Ok(norm(laplace) / (4.0 * vertex_area))
}

/// Angle-deficit Gaussian curvature at `vertex`: `(2 pi - sum of incident
/// corner angles) / vertex area`. Returns 0 for boundary vertices and rings
/// with vanishing area.
pub fn gaussian_curvature(mesh: &SurfaceMesh, vertex: SimplexHandle) -> Result<f64, MeshCascError> {
    let Some(ring) = mesh.link_loop(vertex)? else {
        return Ok(0.0);
    };
    let p = mesh.position(vertex)?;
    let k = ring.len();
    let rim: Vec<[f64; 3]> = ring
        .iter()
        .map(|&id| mesh.position_of(id))
        .collect::<Result<_, _>>()?;

    let mut area = 0.0;
    let mut angle_sum = 0.0;
    for i in 0..k {
        let a = rim[i];
        let b = rim[(i + 1) % k];
        area += triangle_area(p, a, b);
        angle_sum += corner_angle(p, a, b);
    }
    if area < EPS {
        return Ok(0.0);
    }
    Ok((2.0 * std::f64::consts::PI - angle_sum) / (area / 3.0))
}
