//! Boundary-loop detection and hole filling.
//!
//! A hole is a closed chain of boundary edges (edges bordered by exactly one
//! face). [`fill_holes`] chains those edges into loops, ear-clips each loop
//! into new faces, and refreshes the orientation signs when the mesh had
//! been oriented. Loops crossing a non-manifold boundary vertex, and loops
//! no valid triangulation exists for, are reported and left open.

use log::{debug, warn};

use crate::mesh_error::MeshCascError;
use crate::topology::orientation::OrientationStatus;

use super::coarsen::plan_retriangulation;
use super::data::Face;
use super::SurfaceMesh;

/// Fills every closed boundary loop with new faces. Returns the number of
/// holes filled.
///
/// After at least one fill on a previously oriented mesh, orientation is
/// recomputed from scratch so the new faces carry meaningful signs.
pub fn fill_holes(mesh: &mut SurfaceMesh) -> Result<usize, MeshCascError> {
    let loops = boundary_loops(mesh)?;
    if loops.is_empty() {
        return Ok(0);
    }
    debug!("hole filling found {} boundary loops", loops.len());

    let mut filled = 0usize;
    for ring in &loops {
        let Some(plan) = plan_retriangulation(mesh, ring)? else {
            warn!(
                "skipped a {}-vertex boundary loop with no valid triangulation",
                ring.len()
            );
            continue;
        };
        for key in plan {
            mesh.insert_face(key, Face::default())?;
        }
        filled += 1;
    }

    if filled > 0 && mesh.orientation_status() != OrientationStatus::Uninitialized {
        mesh.compute_orientation()?;
    }
    Ok(filled)
}

/// Chains boundary edges into closed vertex loops. Boundary vertices with
/// more than two boundary edges are non-manifold; their loops cannot be
/// chained unambiguously and are dropped with a warning.
fn boundary_loops(mesh: &SurfaceMesh) -> Result<Vec<Vec<u64>>, MeshCascError> {
    // Vertex id -> boundary neighbors along boundary edges.
    let mut adjacency: hashbrown::HashMap<u64, Vec<u64>> = hashbrown::HashMap::new();
    for e in mesh.edge_ids() {
        if mesh.complex().coboundary(e)?.len() != 1 {
            continue;
        }
        let name = mesh.complex().name(e)?;
        let (a, b) = (name[0].get(), name[1].get());
        adjacency.entry(a).or_default().push(b);
        adjacency.entry(b).or_default().push(a);
    }

    let mut skip: hashbrown::HashSet<u64> = hashbrown::HashSet::new();
    for (&v, neighbors) in &adjacency {
        if neighbors.len() != 2 {
            warn!("non-manifold boundary vertex {v} ({} boundary edges)", neighbors.len());
            skip.insert(v);
        }
    }

    let mut loops = Vec::new();
    let mut visited: hashbrown::HashSet<u64> = hashbrown::HashSet::new();
    let mut starts: Vec<u64> = adjacency.keys().copied().collect();
    starts.sort_unstable();
    for start in starts {
        if visited.contains(&start) || skip.contains(&start) {
            continue;
        }
        let mut ring = vec![start];
        visited.insert(start);
        let mut prev = start;
        let mut current = adjacency[&start][0];
        let mut closed = false;
        loop {
            if current == start {
                closed = true;
                break;
            }
            if skip.contains(&current) || visited.contains(&current) {
                break;
            }
            visited.insert(current);
            ring.push(current);
            let Some(next) = adjacency[&current].iter().copied().find(|&n| n != prev) else {
                break;
            };
            prev = current;
            current = next;
        }
        if closed && ring.len() >= 3 {
            loops.push(ring);
        } else if !closed {
            // Mark the walked chain so a later start does not retrace it.
            warn!("dropped an open boundary chain of {} vertices", ring.len());
        }
    }
    Ok(loops)
}
