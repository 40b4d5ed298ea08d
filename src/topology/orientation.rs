//! Orientation engine: assigns and validates a consistent combinatorial
//! orientation sign over top-dimensional simplices.
//!
//! A top simplex with sorted name `(v_0, …, v_D)` and sign `s` induces the
//! orientation `s · (-1)^i` on the facet omitting sorted position `i`. Two
//! top simplices sharing a facet are consistently oriented exactly when they
//! induce *opposite* signs on it — the combinatorial form of "adjacent
//! triangles traverse their shared edge in opposite directions".
//!
//! [`check_orientation`] breadth-first propagates that condition across the
//! facet-adjacency graph of top simplices, flipping unvisited neighbors into
//! compliance and recording a conflict (non-orientable surface or
//! non-manifold facet) as [`OrientationStatus::Inconsistent`] rather than a
//! fatal error.

use std::collections::{HashSet, VecDeque};

use log::{debug, warn};

use crate::mesh_error::MeshCascError;
use crate::topology::complex::{LevelPayload, SimplicialComplex};
use crate::topology::handle::SimplexHandle;

/// Lifecycle of the whole-complex orientation state.
#[derive(
    Copy, Clone, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize,
)]
pub enum OrientationStatus {
    /// No signs assigned; every top simplex carries sign 0.
    #[default]
    Uninitialized,
    /// Signs assigned (+1 everywhere) but not yet checked.
    Initialized,
    /// Checked: every facet-adjacent pair induces opposite signs on its
    /// shared facet.
    Consistent,
    /// Checked: a sign conflict or a facet with three or more cofaces was
    /// found. Signed quantities are meaningless in this state.
    Inconsistent,
}

/// Payload access to the orientation sign of a top simplex.
///
/// Non-top payloads return 0 and ignore writes; the engine only touches the
/// top level.
pub trait Oriented {
    /// Current sign, in {0, +1, -1}.
    fn sign(&self) -> i8;
    /// Overwrite the sign.
    fn set_sign(&mut self, sign: i8);
}

/// Global-payload access to the stored [`OrientationStatus`].
pub trait OrientationHost {
    fn orientation_status(&self) -> OrientationStatus;
    fn set_orientation_status(&mut self, status: OrientationStatus);
}

/// Assigns sign +1 to every top simplex and transitions to `Initialized`.
///
/// Fails with [`AlreadyInitialized`](MeshCascError::AlreadyInitialized) when
/// signs were already assigned; call [`clear_orientation`] first.
pub fn init_orientation<T, G>(complex: &mut SimplicialComplex<T, G>) -> Result<(), MeshCascError>
where
    T: LevelPayload + Oriented,
    G: OrientationHost,
{
    if complex.global().orientation_status() != OrientationStatus::Uninitialized {
        return Err(MeshCascError::AlreadyInitialized);
    }
    let dim = complex.dim();
    for h in complex.handles_snapshot(dim) {
        complex.data_mut(h)?.set_sign(1);
    }
    complex
        .global_mut()
        .set_orientation_status(OrientationStatus::Initialized);
    Ok(())
}

/// Resets every sign to 0 and the status to `Uninitialized`.
pub fn clear_orientation<T, G>(complex: &mut SimplicialComplex<T, G>) -> Result<(), MeshCascError>
where
    T: LevelPayload + Oriented,
    G: OrientationHost,
{
    let dim = complex.dim();
    for h in complex.handles_snapshot(dim) {
        complex.data_mut(h)?.set_sign(0);
    }
    complex
        .global_mut()
        .set_orientation_status(OrientationStatus::Uninitialized);
    Ok(())
}

/// Propagates orientation consistency across every connected component and
/// records the verdict in the global payload.
///
/// Requires [`init_orientation`] to have run
/// ([`NotInitialized`](MeshCascError::NotInitialized) otherwise). A conflict
/// is not fatal: the complex is flagged [`OrientationStatus::Inconsistent`]
/// and the flag returned.
pub fn check_orientation<T, G>(
    complex: &mut SimplicialComplex<T, G>,
) -> Result<OrientationStatus, MeshCascError>
where
    T: LevelPayload + Oriented,
    G: OrientationHost,
{
    if complex.global().orientation_status() == OrientationStatus::Uninitialized {
        return Err(MeshCascError::NotInitialized);
    }
    let dim = complex.dim();
    let mut visited: HashSet<SimplexHandle> = HashSet::new();
    let mut consistent = true;

    for seed in complex.handles_snapshot(dim) {
        if visited.contains(&seed) {
            continue;
        }
        visited.insert(seed);
        let mut queue = VecDeque::from([seed]);
        while let Some(f) = queue.pop_front() {
            let sign_f = complex.data(f)?.sign();
            let facets: Vec<SimplexHandle> = complex.boundary(f)?.to_vec();
            for facet in facets {
                let cofaces: Vec<SimplexHandle> = complex.coboundary(facet)?.to_vec();
                if cofaces.len() > 2 {
                    warn!(
                        "facet {:?} has {} cofaces; non-manifold configuration",
                        complex.key(facet)?,
                        cofaces.len()
                    );
                    consistent = false;
                    continue;
                }
                for g in cofaces {
                    if g == f {
                        continue;
                    }
                    let induced_f = sign_f * induced_parity(complex, f, facet)?;
                    // g must induce the opposite sign on the shared facet.
                    let required = -induced_f * induced_parity(complex, g, facet)?;
                    if visited.insert(g) {
                        complex.data_mut(g)?.set_sign(required);
                        queue.push_back(g);
                    } else if complex.data(g)?.sign() != required {
                        debug!(
                            "orientation conflict between {:?} and {:?} across {:?}",
                            complex.key(f)?,
                            complex.key(g)?,
                            complex.key(facet)?
                        );
                        consistent = false;
                    }
                }
            }
        }
    }

    let status = if consistent {
        OrientationStatus::Consistent
    } else {
        warn!("complex flagged inconsistent: non-orientable or non-manifold");
        OrientationStatus::Inconsistent
    };
    complex.global_mut().set_orientation_status(status);
    Ok(status)
}

/// `clear_orientation` + `init_orientation` + `check_orientation` in one
/// call, usable from any starting state.
pub fn compute_orientation<T, G>(
    complex: &mut SimplicialComplex<T, G>,
) -> Result<OrientationStatus, MeshCascError>
where
    T: LevelPayload + Oriented,
    G: OrientationHost,
{
    clear_orientation(complex)?;
    init_orientation(complex)?;
    check_orientation(complex)
}

/// `(-1)^i` where `i` is the sorted position of the vertex `top` has and
/// `facet` lacks.
fn induced_parity<T, G>(
    complex: &SimplicialComplex<T, G>,
    top: SimplexHandle,
    facet: SimplexHandle,
) -> Result<i8, MeshCascError> {
    let top_key = complex.key(top)?;
    let facet_key = complex.key(facet)?;
    let omitted = top_key.omitted_position(facet_key).ok_or_else(|| {
        MeshCascError::InvalidGeometry(format!("{facet_key:?} is not a facet of {top_key:?}"))
    })?;
    Ok(if omitted % 2 == 0 { 1 } else { -1 })
}
