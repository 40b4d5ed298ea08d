//! `SimplexHandle`: a stable, O(1)-dereferenceable simplex reference.
//!
//! Handles index into the per-level slot arenas of a
//! [`SimplicialComplex`](crate::topology::complex::SimplicialComplex). Each
//! slot carries a generation counter that is bumped whenever the slot is
//! freed, so a handle held across a cascading removal dereferences to a
//! detectable [`StaleHandle`](crate::mesh_error::MeshCascError::StaleHandle)
//! error instead of dangling.

use std::fmt;

/// Reference to a stored simplex: dimension, arena slot, and the slot
/// generation observed at creation time.
///
/// A handle is live exactly as long as its referent has not been removed,
/// either directly or as part of the star of a removed face.
#[derive(
    Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize,
)]
pub struct SimplexHandle {
    level: u8,
    slot: u32,
    generation: u32,
}

impl SimplexHandle {
    #[inline]
    pub(crate) fn new(level: usize, slot: u32, generation: u32) -> Self {
        debug_assert!(level <= u8::MAX as usize);
        SimplexHandle {
            level: level as u8,
            slot,
            generation,
        }
    }

    /// Dimension of the referenced simplex.
    #[inline]
    pub fn level(self) -> usize {
        self.level as usize
    }

    #[inline]
    pub(crate) fn slot(self) -> u32 {
        self.slot
    }

    #[inline]
    pub(crate) fn generation(self) -> u32 {
        self.generation
    }
}

impl fmt::Debug for SimplexHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("SimplexHandle")
            .field(&self.level)
            .field(&self.slot)
            .field(&self.generation)
            .finish()
    }
}

#[cfg(test)]
mod layout_tests {
    use super::*;
    use static_assertions::assert_eq_size;

    // level + slot + generation pack into 12 bytes; handles are passed by
    // value everywhere, so keep this small.
    assert_eq_size!(SimplexHandle, [u32; 3]);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accessors() {
        let h = SimplexHandle::new(2, 7, 3);
        assert_eq!(h.level(), 2);
        assert_eq!(h.slot(), 7);
        assert_eq!(h.generation(), 3);
    }

    #[test]
    fn ordering_and_hash() {
        use std::collections::HashSet;
        let a = SimplexHandle::new(0, 1, 1);
        let b = SimplexHandle::new(1, 0, 1);
        assert!(a < b);
        let mut set = HashSet::new();
        set.insert(a);
        set.insert(b);
        set.insert(a);
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn generations_distinguish_reused_slots() {
        let old = SimplexHandle::new(1, 4, 1);
        let reused = SimplexHandle::new(1, 4, 2);
        assert_ne!(old, reused);
    }
}
