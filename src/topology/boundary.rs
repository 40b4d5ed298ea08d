//! Boundary classification predicates.
//!
//! These helpers classify simplices as on or near the open boundary of the
//! complex, based on coface counts of the (D-1)-simplices: a (D-1)-simplex
//! interior to a manifold is covered by exactly two top simplices, so fewer
//! than two marks the boundary. Lower-dimensional simplices inherit the flag
//! from the (D-1)-simplices in their star, top simplices from their facets.
//!
//! Smoothing and coarsening use [`near_boundary`] to exclude open-boundary
//! regions from aggressive edits.

use crate::mesh_error::MeshCascError;
use crate::topology::complex::SimplicialComplex;
use crate::topology::handle::SimplexHandle;

/// True if the simplex behind `handle` lies on the boundary of the complex.
///
/// - A (D-1)-simplex is on-boundary iff it has fewer than two cofaces.
/// - A top simplex is on-boundary iff one of its facets is.
/// - Anything lower is on-boundary iff its star contains an on-boundary
///   (D-1)-simplex.
pub fn on_boundary<T, G>(
    complex: &SimplicialComplex<T, G>,
    handle: SimplexHandle,
) -> Result<bool, MeshCascError> {
    if !complex.contains(handle) {
        return Err(MeshCascError::StaleHandle {
            level: handle.level(),
            slot: handle.slot(),
        });
    }
    let dim = complex.dim();
    if dim == 0 {
        return Ok(false);
    }
    let boundary_set = complex.boundary_set();
    let level = handle.level();
    if level == dim - 1 {
        Ok(boundary_set.contains(&handle))
    } else if level == dim {
        Ok(complex
            .boundary(handle)?
            .iter()
            .any(|f| boundary_set.contains(f)))
    } else {
        Ok(complex
            .star(handle)
            .into_iter()
            .any(|s| s.level() == dim - 1 && boundary_set.contains(&s)))
    }
}

/// True if the simplex, or anything in the closed 1-ring of its vertices,
/// is on-boundary.
pub fn near_boundary<T, G>(
    complex: &SimplicialComplex<T, G>,
    handle: SimplexHandle,
) -> Result<bool, MeshCascError> {
    if on_boundary(complex, handle)? {
        return Ok(true);
    }
    let dim = complex.dim();
    if dim == 0 {
        return Ok(false);
    }
    let boundary_set = complex.boundary_set();
    // The closed 1-ring: the simplex's own vertices plus every vertex they
    // share an edge with. Rim simplices need not contain any own vertex, so
    // the scan has to reach ring vertex stars too.
    let own: Vec<u64> = complex.name(handle)?.iter().map(|v| v.get()).collect();
    let mut ring: hashbrown::HashSet<u64> = own.iter().copied().collect();
    for &raw in &own {
        let Some(v) = complex.get_raw(&[raw]) else {
            continue;
        };
        for &e in complex.coboundary(v)? {
            for u in complex.name(e)? {
                ring.insert(u.get());
            }
        }
    }
    for raw in ring {
        let Some(v) = complex.get_raw(&[raw]) else {
            continue;
        };
        if complex
            .star(v)
            .into_iter()
            .any(|s| s.level() == dim - 1 && boundary_set.contains(&s))
        {
            return Ok(true);
        }
    }
    Ok(false)
}
