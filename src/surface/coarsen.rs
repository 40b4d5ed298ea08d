//! Mesh decimation: scored vertex removal with ear-clip retriangulation.
//!
//! [`coarse`] scores every interior vertex, removes the high scorers in
//! priority order, and retriangulates each resulting polygonal hole. A
//! removal whose retriangulation cannot be completed without breaking
//! manifoldness is skipped outright, so the complex never passes through an
//! invalid state. [`coarse_flat`] and [`coarse_dense`] are the fixed-weight
//! variants iterated a given number of times.

use log::debug;

use crate::geometry::metrics::{is_degenerate, min_angle};
use crate::geometry::vector::{add, distance, dot};
use crate::mesh_error::MeshCascError;
use crate::topology::handle::SimplexHandle;
use crate::topology::orientation::OrientationStatus;

use super::curvature::mean_curvature;
use super::data::Face;
use super::{sorted3, SurfaceMesh};

/// One coarsening sweep. Every interior manifold vertex gets the score
/// `dense_weight * c + flat_rate * (1 - c)`, where `c` is the mean-curvature
/// magnitude scaled by the local mean edge length and clamped to [0, 1].
/// Vertices scoring above `rate` are removed in descending score order, each
/// hole retriangulated by ear clipping. Returns the number of vertices
/// removed.
///
/// Boundary and near-boundary vertices are never touched, and a candidate is
/// skipped whenever its removal would produce a duplicate face or a
/// non-manifold edge.
pub fn coarse(
    mesh: &mut SurfaceMesh,
    rate: f64,
    flat_rate: f64,
    dense_weight: f64,
) -> Result<usize, MeshCascError> {
    let mut candidates: Vec<(SimplexHandle, f64)> = Vec::new();
    for v in mesh.complex().handles_snapshot(0) {
        if mesh.near_boundary(v)? {
            continue;
        }
        let Some(ring) = mesh.link_loop(v)? else {
            continue;
        };
        let p = mesh.position(v)?;
        let mut local_len = 0.0;
        for &id in &ring {
            local_len += distance(p, mesh.position_of(id)?);
        }
        local_len /= ring.len() as f64;
        let c = (mean_curvature(mesh, v)?.abs() * local_len).clamp(0.0, 1.0);
        let score = dense_weight * c + flat_rate * (1.0 - c);
        if score > rate {
            candidates.push((v, score));
        }
    }
    candidates.sort_by(|a, b| b.1.total_cmp(&a.1));
    debug!(
        "coarsening: {} candidates above rate {rate}",
        candidates.len()
    );

    let mut removed = 0usize;
    for (v, _) in candidates {
        // Earlier removals may have deleted this vertex or reshaped its ring.
        if !mesh.complex().contains(v) || mesh.near_boundary(v)? {
            continue;
        }
        if decimate(mesh, v)? {
            removed += 1;
        }
    }
    debug!("coarsening removed {removed} vertices");
    Ok(removed)
}

/// `numiter` sweeps tuned for flat regions (`flat_rate` 0.5, no density
/// term). Returns the total vertices removed.
pub fn coarse_flat(
    mesh: &mut SurfaceMesh,
    rate: f64,
    numiter: usize,
) -> Result<usize, MeshCascError> {
    let mut total = 0;
    for _ in 0..numiter {
        total += coarse(mesh, rate, 0.5, 0.0)?;
    }
    Ok(total)
}

/// `numiter` sweeps tuned for densely sampled regions (`dense_weight` 10,
/// no flatness term). Returns the total vertices removed.
pub fn coarse_dense(
    mesh: &mut SurfaceMesh,
    rate: f64,
    numiter: usize,
) -> Result<usize, MeshCascError> {
    let mut total = 0;
    for _ in 0..numiter {
        total += coarse(mesh, rate, 0.0, 10.0)?;
    }
    Ok(total)
}

/// Removes `vertex` and retriangulates the hole its star leaves behind.
/// Returns whether the removal went through; an unfillable hole leaves the
/// mesh untouched.
fn decimate(mesh: &mut SurfaceMesh, vertex: SimplexHandle) -> Result<bool, MeshCascError> {
    let Some(ring) = mesh.link_loop(vertex)? else {
        return Ok(false);
    };
    let Some(plan) = plan_retriangulation(mesh, &ring)? else {
        debug!("coarsening skipped a vertex with an unfillable ring");
        return Ok(false);
    };

    // Orientation signs for the replacement faces come from the faces being
    // removed, so a checked mesh stays consistent.
    let avg_oriented = if mesh.orientation_status() == OrientationStatus::Uninitialized {
        None
    } else {
        let mut acc = [0.0; 3];
        for f in mesh.complex().star(vertex) {
            if f.level() == 2 {
                // Degenerate star faces contribute no direction.
                if let Ok(n) = mesh.oriented_normal(f) {
                    acc = add(acc, n);
                }
            }
        }
        Some(acc)
    };

    mesh.remove(vertex);
    for key in plan {
        let f = mesh.insert_face(key, Face::default())?;
        // Once the vertex is gone only the sign can degrade, never the
        // complex; an unreadable normal leaves the face unsigned.
        let sign = match avg_oriented {
            Some(avg) => match mesh.base_normal(f) {
                Ok(n) if dot(n, avg) >= 0.0 => 1,
                Ok(_) => -1,
                Err(_) => 0,
            },
            None => 0,
        };
        mesh.face_mut(f)?.orientation = sign;
    }
    Ok(true)
}

/// Ear-clips the hole bounded by `ring` (cyclic vertex loop) into triangles,
/// validating the result against the rest of the mesh. Returns `None` when
/// no safe triangulation exists.
pub(crate) fn plan_retriangulation(
    mesh: &SurfaceMesh,
    ring: &[u64],
) -> Result<Option<Vec<[u64; 3]>>, MeshCascError> {
    let mut loop_ids: Vec<u64> = ring.to_vec();
    let mut positions: hashbrown::HashMap<u64, [f64; 3]> = hashbrown::HashMap::new();
    for &id in ring {
        positions.insert(id, mesh.position_of(id)?);
    }

    // A triangular ring may already be spanned by an existing face (the
    // vertex caps a tetrahedral bump); then removing the star is the whole
    // retriangulation and no new face goes in.
    if loop_ids.len() == 3 {
        let key = sorted3(loop_ids[0], loop_ids[1], loop_ids[2]);
        if mesh.get_face(key).is_some() {
            return Ok(Some(Vec::new()));
        }
        if is_degenerate(
            positions[&loop_ids[0]],
            positions[&loop_ids[1]],
            positions[&loop_ids[2]],
        ) {
            return Ok(None);
        }
        return Ok(Some(vec![key]));
    }

    let mut plan = Vec::with_capacity(loop_ids.len() - 2);
    let mut chords: Vec<[u64; 2]> = Vec::new();
    while loop_ids.len() > 3 {
        // Clip the ear with the best minimum corner angle.
        let k = loop_ids.len();
        let mut best: Option<(usize, f64)> = None;
        for i in 0..k {
            let a = positions[&loop_ids[(i + k - 1) % k]];
            let b = positions[&loop_ids[i]];
            let c = positions[&loop_ids[(i + 1) % k]];
            if is_degenerate(a, b, c) {
                continue;
            }
            let q = min_angle(a, b, c);
            if best.map_or(true, |(_, bq)| q > bq) {
                best = Some((i, q));
            }
        }
        let Some((i, _)) = best else {
            // Every remaining ear is degenerate.
            return Ok(None);
        };
        let prev = loop_ids[(i + k - 1) % k];
        let ear = loop_ids[i];
        let next = loop_ids[(i + 1) % k];
        plan.push(sorted3(prev, ear, next));
        chords.push([prev.min(next), prev.max(next)]);
        loop_ids.remove(i);
    }
    // The closing triangle is forced, not chosen, so it gets its own
    // degeneracy check; a collinear final triple sinks the whole plan.
    if is_degenerate(
        positions[&loop_ids[0]],
        positions[&loop_ids[1]],
        positions[&loop_ids[2]],
    ) {
        return Ok(None);
    }
    plan.push(sorted3(loop_ids[0], loop_ids[1], loop_ids[2]));

    // Chord edges must be new: an existing edge already carries cofaces, and
    // two more would make it non-manifold. Planned faces must be new for the
    // same reason.
    for chord in &chords {
        if mesh.get_edge(*chord).is_some() {
            return Ok(None);
        }
    }
    for key in &plan {
        if mesh.get_face(*key).is_some() {
            return Ok(None);
        }
    }
    Ok(Some(plan))
}
