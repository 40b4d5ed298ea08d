//! Whole-mesh geometric queries and in-place affine transforms.
//!
//! [`volume`] decomposes the enclosed volume into signed tetrahedra spanned
//! by each oriented face and the origin (divergence theorem), so it demands
//! a meaningful orientation state up front. [`correct_normals`] builds on it
//! to make a closed mesh face outward.

use log::warn;

use crate::geometry::metrics::signed_tet_volume;
use crate::geometry::vector::{add, distance, scale as vscale};
use crate::mesh_error::MeshCascError;
use crate::topology::orientation::OrientationStatus;

use super::SurfaceMesh;

/// Signed enclosed volume of the mesh.
///
/// Fails with [`NotInitialized`](MeshCascError::NotInitialized) before
/// orientation init and with
/// [`InconsistentOrientation`](MeshCascError::InconsistentOrientation) when
/// the last check found a conflict. An initialized-but-unchecked mesh is
/// computed with a warning, since its signs may not agree globally.
pub fn volume(mesh: &SurfaceMesh) -> Result<f64, MeshCascError> {
    match mesh.orientation_status() {
        OrientationStatus::Uninitialized => return Err(MeshCascError::NotInitialized),
        OrientationStatus::Inconsistent => return Err(MeshCascError::InconsistentOrientation),
        OrientationStatus::Initialized => {
            warn!("computing volume from unchecked orientation signs");
        }
        OrientationStatus::Consistent => {}
    }
    let mut total = 0.0;
    for f in mesh.face_ids() {
        let (_, [a, b, c]) = mesh.face_corners(f)?;
        total += f64::from(mesh.face(f)?.orientation) * signed_tet_volume(a, b, c);
    }
    Ok(total)
}

/// Vertex centroid and the radius of the bounding sphere around it.
/// An empty mesh reports the origin with radius 0.
pub fn center_and_radius(mesh: &SurfaceMesh) -> Result<([f64; 3], f64), MeshCascError> {
    let n = mesh.num_vertices();
    if n == 0 {
        return Ok(([0.0; 3], 0.0));
    }
    let mut center = [0.0; 3];
    for v in mesh.vertex_ids() {
        center = add(center, mesh.position(v)?);
    }
    center = vscale(center, 1.0 / n as f64);
    let mut radius = 0.0f64;
    for v in mesh.vertex_ids() {
        radius = radius.max(distance(center, mesh.position(v)?));
    }
    Ok((center, radius))
}

/// Translates every vertex by `offset` in place.
pub fn translate(mesh: &mut SurfaceMesh, offset: [f64; 3]) -> Result<(), MeshCascError> {
    for v in mesh.complex().handles_snapshot(0) {
        let p = mesh.position(v)?;
        mesh.set_position(v, add(p, offset))?;
    }
    Ok(())
}

/// Scales every vertex coordinate by `factor` about the origin in place.
pub fn scale(mesh: &mut SurfaceMesh, factor: f64) -> Result<(), MeshCascError> {
    for v in mesh.complex().handles_snapshot(0) {
        let p = mesh.position(v)?;
        mesh.set_position(v, vscale(p, factor))?;
    }
    Ok(())
}

/// Negates every face's orientation sign. The lifecycle state is untouched:
/// a globally negated consistent assignment is still consistent.
pub fn flip_normals(mesh: &mut SurfaceMesh) -> Result<(), MeshCascError> {
    for f in mesh.complex().handles_snapshot(2) {
        let face = mesh.face_mut(f)?;
        face.orientation = -face.orientation;
    }
    Ok(())
}

/// Makes a closed mesh face outward: computes orientation if none is
/// assigned, then flips every sign when the signed volume comes out
/// negative.
pub fn correct_normals(mesh: &mut SurfaceMesh) -> Result<(), MeshCascError> {
    if mesh.orientation_status() == OrientationStatus::Uninitialized {
        mesh.compute_orientation()?;
    }
    if volume(mesh)? < 0.0 {
        flip_normals(mesh)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::data::{Face, Vertex};
    use crate::surface::sorted3;
    use crate::surface::SurfaceMesh;

    /// Unit cube surface: 8 vertices, 12 triangles.
    fn unit_cube() -> SurfaceMesh {
        let mut mesh = SurfaceMesh::new();
        for i in 0..8u64 {
            let p = [
                (i & 1) as f64,
                ((i >> 1) & 1) as f64,
                ((i >> 2) & 1) as f64,
            ];
            mesh.insert_vertex(i + 1, Vertex::at(p)).unwrap();
        }
        // Each quad face split along a diagonal; ids are bit patterns + 1.
        let quads = [
            [1, 2, 4, 3], // z = 0
            [5, 6, 8, 7], // z = 1
            [1, 2, 6, 5], // y = 0
            [3, 4, 8, 7], // y = 1
            [1, 3, 7, 5], // x = 0
            [2, 4, 8, 6], // x = 1
        ];
        for [a, b, c, d] in quads {
            mesh.insert_face(sorted3(a, b, c), Face::default()).unwrap();
            mesh.insert_face(sorted3(a, c, d), Face::default()).unwrap();
        }
        mesh
    }

    #[test]
    fn cube_volume_is_one_after_correction() {
        let mut mesh = unit_cube();
        correct_normals(&mut mesh).unwrap();
        assert!((volume(&mesh).unwrap() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn volume_requires_orientation() {
        let mesh = unit_cube();
        assert_eq!(volume(&mesh), Err(MeshCascError::NotInitialized));
    }

    #[test]
    fn volume_rejects_inconsistent_mesh() {
        let mut mesh = unit_cube();
        // A fin glued onto an existing edge makes it non-manifold.
        mesh.insert_vertex(9, Vertex::new(0.5, -1.0, 0.5)).unwrap();
        mesh.insert_face([1, 2, 9], Face::default()).unwrap();
        assert_eq!(
            mesh.compute_orientation().unwrap(),
            OrientationStatus::Inconsistent
        );
        assert_eq!(volume(&mesh), Err(MeshCascError::InconsistentOrientation));
    }

    #[test]
    fn flip_negates_volume() {
        let mut mesh = unit_cube();
        correct_normals(&mut mesh).unwrap();
        flip_normals(&mut mesh).unwrap();
        assert!((volume(&mesh).unwrap() + 1.0).abs() < 1e-12);
    }

    #[test]
    fn translate_preserves_volume_and_moves_center() {
        let mut mesh = unit_cube();
        correct_normals(&mut mesh).unwrap();
        translate(&mut mesh, [10.0, -3.0, 2.5]).unwrap();
        assert!((volume(&mesh).unwrap() - 1.0).abs() < 1e-9);
        let (center, radius) = center_and_radius(&mesh).unwrap();
        assert!((center[0] - 10.5).abs() < 1e-12);
        assert!((center[1] + 2.5).abs() < 1e-12);
        assert!((center[2] - 3.0).abs() < 1e-12);
        assert!((radius - (0.75f64).sqrt()).abs() < 1e-12);
    }

    #[test]
    fn scale_cubes_the_volume() {
        let mut mesh = unit_cube();
        correct_normals(&mut mesh).unwrap();
        scale(&mut mesh, 2.0).unwrap();
        assert!((volume(&mesh).unwrap() - 8.0).abs() < 1e-9);
    }
}
