//! Surface conditioning by vertex relocation and edge flipping.
//!
//! [`smooth`] alternates cotangent-weighted Laplacian relocation of interior
//! vertices with angle-improving edge flips, stopping early once a pass makes
//! no flips and moves no vertex farther than a small tolerance.
//! [`normal_smooth`] instead averages face normals across edges and nudges
//! vertices to fit the smoothed field, which rounds off faceting without
//! changing connectivity.

use log::{debug, info, warn};

use crate::geometry::metrics::{corner_cotangent, is_degenerate, min_angle, triangle_normal};
use crate::geometry::vector::{add, distance, dot, norm, scale, sub, EPS};
use crate::mesh_error::MeshCascError;
use crate::topology::handle::SimplexHandle;
use crate::topology::orientation::OrientationStatus;

use super::data::Edge;
use super::{sorted3, SurfaceMesh};

/// Cosine of the dihedral threshold past which an edge counts as a ridge.
/// 60 degrees between consistently wound face normals.
const RIDGE_COS: f64 = 0.5;

/// Convergence tolerance on the largest vertex displacement in a pass.
const DISPLACEMENT_TOL: f64 = 1e-8;

/// Runs up to `max_iter` conditioning passes. Each pass relocates interior
/// vertices to the cotangent-weighted centroid of their 1-ring, then flips
/// interior edges whose flip strictly raises the local minimum angle.
///
/// Vertices on or next to the surface boundary never move. With
/// `preserve_ridges`, vertices touching a ridge edge (dihedral over 60
/// degrees) also stay put and ridge edges are never flipped. `verbose`
/// raises per-pass reporting from debug to info level.
pub fn smooth(
    mesh: &mut SurfaceMesh,
    max_iter: usize,
    preserve_ridges: bool,
    verbose: bool,
) -> Result<(), MeshCascError> {
    for pass in 0..max_iter {
        let moved = relocate_pass(mesh, preserve_ridges)?;
        let flips = flip_pass(mesh, preserve_ridges)?;
        if verbose {
            info!("smoothing pass {pass}: max displacement {moved:.3e}, {flips} edge flips");
        } else {
            debug!("smoothing pass {pass}: max displacement {moved:.3e}, {flips} edge flips");
        }
        if flips == 0 && moved < DISPLACEMENT_TOL {
            break;
        }
    }
    Ok(())
}

/// One vertex-relocation sweep; returns the largest displacement.
fn relocate_pass(mesh: &mut SurfaceMesh, preserve_ridges: bool) -> Result<f64, MeshCascError> {
    let mut max_moved = 0.0f64;
    for v in mesh.complex().handles_snapshot(0) {
        if mesh.near_boundary(v)? {
            continue;
        }
        // Non-manifold vertices have no closed fan and stay put.
        let Some(ring) = mesh.link_loop(v)? else {
            continue;
        };
        if preserve_ridges && touches_ridge(mesh, v)? {
            continue;
        }
        let p = mesh.position(v)?;
        let k = ring.len();
        let rim: Vec<[f64; 3]> = ring
            .iter()
            .map(|&id| mesh.position_of(id))
            .collect::<Result<_, _>>()?;

        let mut weights = Vec::with_capacity(k);
        for i in 0..k {
            let prev = rim[(i + k - 1) % k];
            let next = rim[(i + 1) % k];
            weights.push(corner_cotangent(prev, p, rim[i]) + corner_cotangent(next, p, rim[i]));
        }
        // Obtuse rings turn cotangents negative; a clamped average would then
        // collapse onto the few positive-weight neighbors and drag the vertex
        // tangentially. Fall back to the uniform 1-ring average instead.
        if weights.iter().any(|&w| w <= 0.0) {
            weights.iter_mut().for_each(|w| *w = 1.0);
        }
        let total: f64 = weights.iter().sum();
        if total <= EPS {
            continue;
        }
        let mut weighted = [0.0; 3];
        for i in 0..k {
            weighted = add(weighted, scale(rim[i], weights[i]));
        }
        let target = scale(weighted, 1.0 / total);
        if relocation_folds_ring(&rim, p, target) {
            continue;
        }
        max_moved = max_moved.max(distance(p, target));
        mesh.set_position(v, target)?;
    }
    Ok(max_moved)
}

/// Rejects a move that inverts any 1-ring triangle relative to its current
/// winding.
fn relocation_folds_ring(rim: &[[f64; 3]], old: [f64; 3], new: [f64; 3]) -> bool {
    let k = rim.len();
    for i in 0..k {
        let a = rim[i];
        let b = rim[(i + 1) % k];
        let before = crate::geometry::vector::cross(sub(a, old), sub(b, old));
        let after = crate::geometry::vector::cross(sub(a, new), sub(b, new));
        if norm(before) > EPS && dot(before, after) <= 0.0 {
            return true;
        }
    }
    false
}

/// One edge-flip sweep; returns the number of flips performed.
fn flip_pass(mesh: &mut SurfaceMesh, preserve_ridges: bool) -> Result<usize, MeshCascError> {
    let mut flips = 0usize;
    for e in mesh.complex().handles_snapshot(1) {
        if !mesh.complex().contains(e) {
            // Removed by an earlier flip in this sweep.
            continue;
        }
        if try_flip(mesh, e, preserve_ridges)? {
            flips += 1;
        }
    }
    Ok(flips)
}

/// Flips the interior edge behind `handle` when the flipped diagonal strictly
/// raises the minimum corner angle of the two triangles and keeps them
/// unfolded. Returns whether a flip happened.
fn try_flip(
    mesh: &mut SurfaceMesh,
    handle: SimplexHandle,
    preserve_ridges: bool,
) -> Result<bool, MeshCascError> {
    let name = mesh.complex().name(handle)?;
    let (a, b) = (name[0].get(), name[1].get());
    let cofaces: Vec<SimplexHandle> = mesh.complex().coboundary(handle)?.to_vec();
    if cofaces.len() != 2 {
        return Ok(false);
    }
    let mut opposite = [0u64; 2];
    for (i, &f) in cofaces.iter().enumerate() {
        let other = mesh
            .complex()
            .name(f)?
            .iter()
            .map(|v| v.get())
            .find(|&v| v != a && v != b);
        match other {
            Some(v) => opposite[i] = v,
            None => return Ok(false),
        }
    }
    let [c, d] = opposite;
    if c == d || mesh.get_edge([c.min(d), c.max(d)]).is_some() {
        return Ok(false);
    }

    let pa = mesh.position_of(a)?;
    let pb = mesh.position_of(b)?;
    let pc = mesh.position_of(c)?;
    let pd = mesh.position_of(d)?;

    if preserve_ridges && edge_dihedral_cos(pa, pb, pc, pd) < RIDGE_COS {
        return Ok(false);
    }
    if is_degenerate(pa, pc, pd) || is_degenerate(pb, pc, pd) {
        return Ok(false);
    }

    let before = min_angle(pa, pb, pc).min(min_angle(pa, pb, pd));
    let after = min_angle(pa, pc, pd).min(min_angle(pb, pc, pd));
    if after <= before {
        return Ok(false);
    }
    // A flip across a non-convex quad would fold; the new pair, wound
    // consistently around the new diagonal, must face the same way as the
    // old pair.
    let old_avg = add(triangle_normal(pa, pb, pc)?, triangle_normal(pb, pa, pd)?);
    let n1 = dot(triangle_normal(pa, pc, pd)?, old_avg);
    let n2 = dot(triangle_normal(pb, pd, pc)?, old_avg);
    if n1.abs() < EPS || n2.abs() < EPS || n1 * n2 <= 0.0 {
        return Ok(false);
    }

    let face_data = mesh.face(cofaces[0]).copied()?;
    // Re-derive orientation signs from the faces being replaced so a checked
    // mesh stays consistently oriented across the flip.
    let avg_oriented = if mesh.orientation_status() == OrientationStatus::Uninitialized {
        None
    } else {
        Some(add(
            mesh.oriented_normal(cofaces[0])?,
            mesh.oriented_normal(cofaces[1])?,
        ))
    };
    mesh.remove(handle);
    mesh.insert_edge([c.min(d), c.max(d)], Edge::default())?;
    let new_faces = [
        mesh.insert_face(sorted3(a, c, d), face_data)?,
        mesh.insert_face(sorted3(b, c, d), face_data)?,
    ];
    for f in new_faces {
        let sign = match avg_oriented {
            Some(avg) => {
                if dot(mesh.base_normal(f)?, avg) >= 0.0 {
                    1
                } else {
                    -1
                }
            }
            None => 0,
        };
        mesh.face_mut(f)?.orientation = sign;
    }
    Ok(true)
}

/// Cosine of the dihedral angle across edge a-b, with the two triangles
/// wound consistently around the shared edge.
fn edge_dihedral_cos(pa: [f64; 3], pb: [f64; 3], pc: [f64; 3], pd: [f64; 3]) -> f64 {
    match (triangle_normal(pa, pb, pc), triangle_normal(pb, pa, pd)) {
        (Ok(n1), Ok(n2)) => dot(n1, n2),
        // Degenerate faces read as flat so they never block a flip.
        _ => 1.0,
    }
}

/// Whether any edge incident to `vertex` is a ridge.
fn touches_ridge(mesh: &SurfaceMesh, vertex: SimplexHandle) -> Result<bool, MeshCascError> {
    for &e in mesh.complex().coboundary(vertex)? {
        let cofaces = mesh.complex().coboundary(e)?;
        if cofaces.len() != 2 {
            continue;
        }
        let name = mesh.complex().name(e)?;
        let (a, b) = (name[0].get(), name[1].get());
        let mut opp = Vec::with_capacity(2);
        for &f in cofaces {
            if let Some(v) = mesh
                .complex()
                .name(f)?
                .iter()
                .map(|v| v.get())
                .find(|&v| v != a && v != b)
            {
                opp.push(v);
            }
        }
        if opp.len() != 2 {
            continue;
        }
        let cos = edge_dihedral_cos(
            mesh.position_of(a)?,
            mesh.position_of(b)?,
            mesh.position_of(opp[0])?,
            mesh.position_of(opp[1])?,
        );
        if cos < RIDGE_COS {
            return Ok(true);
        }
    }
    Ok(false)
}

/// One pass of normal smoothing: every face normal is blended with the
/// normals of its edge neighbors, then each interior vertex is nudged so its
/// incident faces better fit the smoothed field. Connectivity is untouched.
pub fn normal_smooth(mesh: &mut SurfaceMesh) -> Result<(), MeshCascError> {
    let faces = mesh.complex().handles_snapshot(2);
    let mut smoothed: hashbrown::HashMap<SimplexHandle, [f64; 3]> =
        hashbrown::HashMap::with_capacity(faces.len());
    for &f in &faces {
        let own = match mesh.base_normal(f) {
            Ok(n) => n,
            Err(_) => {
                warn!("normal smoothing skipped a degenerate face");
                continue;
            }
        };
        let mut acc = own;
        for &e in mesh.complex().boundary(f)? {
            for &g in mesh.complex().coboundary(e)? {
                if g == f {
                    continue;
                }
                if let Ok(n) = mesh.base_normal(g) {
                    // Align neighbor normals before averaging so opposite
                    // sorted windings do not cancel.
                    acc = add(acc, if dot(n, own) < 0.0 { scale(n, -1.0) } else { n });
                }
            }
        }
        if norm(acc) > EPS {
            smoothed.insert(f, scale(acc, 1.0 / norm(acc)));
        }
    }

    for v in mesh.complex().handles_snapshot(0) {
        if mesh.near_boundary(v)? || mesh.link_loop(v)?.is_none() {
            continue;
        }
        let p = mesh.position(v)?;
        let mut shift = [0.0; 3];
        let mut count = 0usize;
        for f in mesh.complex().star(v) {
            if f.level() != 2 {
                continue;
            }
            let Some(&n) = smoothed.get(&f) else { continue };
            let (_, corners) = mesh.face_corners(f)?;
            let centroid = scale(
                add(add(corners[0], corners[1]), corners[2]),
                1.0 / 3.0,
            );
            // Project the vertex onto the plane through the face centroid
            // with the smoothed normal.
            shift = add(shift, scale(n, dot(n, sub(centroid, p))));
            count += 1;
        }
        if count > 0 {
            mesh.set_position(v, add(p, scale(shift, 1.0 / count as f64)))?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::data::{Face, Vertex};

    /// 7x7 planar grid with the deep-interior vertices jittered in z. The
    /// jittered vertices sit two rows in, clear of the near-boundary band
    /// smoothing refuses to touch.
    fn noisy_grid() -> SurfaceMesh {
        let mut mesh = SurfaceMesh::new();
        let id = |r: u64, c: u64| r * 7 + c + 1;
        for r in 0..7u64 {
            for c in 0..7u64 {
                let deep = (2..5).contains(&r) && (2..5).contains(&c);
                let z = if deep {
                    0.2 * ((r * 7 + c) as f64).sin()
                } else {
                    0.0
                };
                mesh.insert_vertex(id(r, c), Vertex::new(c as f64, r as f64, z))
                    .unwrap();
            }
        }
        for r in 0..6u64 {
            for c in 0..6u64 {
                mesh.insert_face(sorted3(id(r, c), id(r, c + 1), id(r + 1, c)), Face::default())
                    .unwrap();
                mesh.insert_face(
                    sorted3(id(r, c + 1), id(r + 1, c), id(r + 1, c + 1)),
                    Face::default(),
                )
                .unwrap();
            }
        }
        mesh
    }

    fn max_interior_height(mesh: &SurfaceMesh) -> f64 {
        mesh.vertex_ids()
            .map(|v| mesh.vertex(v).unwrap().position[2].abs())
            .fold(0.0, f64::max)
    }

    fn worst_min_angle(mesh: &SurfaceMesh) -> f64 {
        mesh.face_ids()
            .map(|f| {
                let (_, [a, b, c]) = mesh.face_corners(f).unwrap();
                min_angle(a, b, c)
            })
            .fold(f64::INFINITY, f64::min)
    }

    #[test]
    fn smoothing_flattens_noisy_grid() {
        let mut mesh = noisy_grid();
        let before = max_interior_height(&mesh);
        assert!(before > 0.1);
        smooth(&mut mesh, 6, false, false).unwrap();
        assert!(max_interior_height(&mesh) < before * 0.5);
    }

    #[test]
    fn smoothing_keeps_angles_reasonable() {
        let mut mesh = noisy_grid();
        smooth(&mut mesh, 6, false, false).unwrap();
        // A relaxed near-planar grid has no sliver triangles.
        assert!(worst_min_angle(&mesh) > 0.3);
    }

    #[test]
    fn boundary_vertices_never_move() {
        let mut mesh = noisy_grid();
        let corner = mesh.get_vertex(1).unwrap();
        let before = mesh.position(corner).unwrap();
        smooth(&mut mesh, 6, false, false).unwrap();
        assert_eq!(mesh.position(corner).unwrap(), before);
    }

    #[test]
    fn flip_improves_skinny_pair() {
        // Two skinny triangles across the long diagonal 1-2 of a flat quad;
        // the flip to 3-4 improves the minimum angle.
        let mut mesh = SurfaceMesh::new();
        mesh.insert_vertex(1, Vertex::new(0.0, 0.0, 0.0)).unwrap();
        mesh.insert_vertex(2, Vertex::new(4.0, 0.0, 0.0)).unwrap();
        mesh.insert_vertex(3, Vertex::new(2.0, 0.5, 0.0)).unwrap();
        mesh.insert_vertex(4, Vertex::new(2.0, -0.5, 0.0)).unwrap();
        mesh.insert_face([1, 2, 3], Face::default()).unwrap();
        mesh.insert_face([1, 2, 4], Face::default()).unwrap();
        let before = worst_min_angle(&mesh);
        let e = mesh.get_edge([1, 2]).unwrap();
        assert!(try_flip(&mut mesh, e, false).unwrap());
        assert!(mesh.get_edge([1, 2]).is_none());
        assert!(mesh.get_edge([3, 4]).is_some());
        assert_eq!(mesh.num_faces(), 2);
        assert!(worst_min_angle(&mesh) > before);
    }

    #[test]
    fn ridge_edge_is_not_flipped_when_preserved() {
        // Sharp tent over edge 1-2.
        let mut mesh = SurfaceMesh::new();
        mesh.insert_vertex(1, Vertex::new(0.0, 0.0, 0.0)).unwrap();
        mesh.insert_vertex(2, Vertex::new(4.0, 0.0, 0.0)).unwrap();
        mesh.insert_vertex(3, Vertex::new(2.0, 0.5, 2.0)).unwrap();
        mesh.insert_vertex(4, Vertex::new(2.0, -0.5, 2.0)).unwrap();
        mesh.insert_face([1, 2, 3], Face::default()).unwrap();
        mesh.insert_face([1, 2, 4], Face::default()).unwrap();
        let e = mesh.get_edge([1, 2]).unwrap();
        assert!(!try_flip(&mut mesh, e, true).unwrap());
        assert!(mesh.get_edge([1, 2]).is_some());
    }

    #[test]
    fn normal_smooth_rounds_a_spike() {
        let mut mesh = noisy_grid();
        let before = max_interior_height(&mesh);
        normal_smooth(&mut mesh).unwrap();
        assert!(max_interior_height(&mesh) < before);
    }
}
