//! `VertexId` and `SimplexKey`: strong identities for simplices.
//!
//! Every simplex in a complex is identified by its *name*: the sorted,
//! duplicate-free tuple of the vertex identifiers it spans. A vertex is named
//! by one identifier, an edge by two, a triangle by three, and so on; the
//! length of the name fixes the dimension of the simplex (`len - 1`).
//!
//! This module provides:
//! - A transparent [`VertexId`] newtype around `NonZeroU64`, reserving 0 as an
//!   invalid/sentinel value.
//! - [`SimplexKey`], the canonicalized name used as the lookup key inside each
//!   dimension of the complex.

use std::{fmt, num::NonZeroU64};

use crate::mesh_error::MeshCascError;

/// Identifier of a single vertex within a complex.
///
/// # Memory layout
/// This type is `repr(transparent)`, meaning it has the same ABI and alignment
/// as its single field (`NonZeroU64`) and can cross FFI exactly like a `u64`.
#[derive(
    Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize,
)]
#[repr(transparent)]
pub struct VertexId(NonZeroU64);

impl VertexId {
    /// Creates a new `VertexId` from a raw `u64` value.
    ///
    /// Returns [`MeshCascError::InvalidVertexId`] if `raw == 0`; 0 is reserved
    /// as an invalid or sentinel value.
    ///
    /// # Example
    /// ```rust
    /// # use mesh_casc::topology::key::VertexId;
    /// let v = VertexId::new(1).unwrap();
    /// assert_eq!(v.get(), 1);
    /// assert!(VertexId::new(0).is_err());
    /// ```
    #[inline]
    pub fn new(raw: u64) -> Result<Self, MeshCascError> {
        NonZeroU64::new(raw)
            .map(VertexId)
            .ok_or(MeshCascError::InvalidVertexId)
    }

    /// Returns the inner `u64` value of this `VertexId`.
    #[inline]
    pub const fn get(self) -> u64 {
        self.0.get()
    }
}

impl fmt::Debug for VertexId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("VertexId").field(&self.get()).finish()
    }
}

impl fmt::Display for VertexId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.get())
    }
}

/// Canonicalized simplex name: the sorted, duplicate-free vertex tuple.
///
/// Two keys compare equal exactly when they name the same simplex, regardless
/// of the vertex order they were built from.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
pub struct SimplexKey(Box<[VertexId]>);

impl SimplexKey {
    /// Builds a key from raw vertex identifiers, sorting and validating them.
    ///
    /// Fails with [`MeshCascError::EmptyKey`] on no vertices,
    /// [`MeshCascError::InvalidVertexId`] on a zero identifier, and
    /// [`MeshCascError::DuplicateVertexInKey`] on a repeated one.
    ///
    /// # Example
    /// ```rust
    /// # use mesh_casc::topology::key::SimplexKey;
    /// let k = SimplexKey::new(&[3, 1, 2]).unwrap();
    /// assert_eq!(k.level(), 2);
    /// assert_eq!(k.raw(), vec![1, 2, 3]);
    /// assert!(SimplexKey::new(&[1, 1]).is_err());
    /// assert!(SimplexKey::new(&[]).is_err());
    /// ```
    pub fn new(raw: &[u64]) -> Result<Self, MeshCascError> {
        if raw.is_empty() {
            return Err(MeshCascError::EmptyKey);
        }
        let mut verts = Vec::with_capacity(raw.len());
        for &r in raw {
            verts.push(VertexId::new(r)?);
        }
        verts.sort_unstable();
        for pair in verts.windows(2) {
            if pair[0] == pair[1] {
                return Err(MeshCascError::DuplicateVertexInKey(pair[0].get()));
            }
        }
        Ok(SimplexKey(verts.into_boxed_slice()))
    }

    /// Builds a key from vertices already known to be sorted and distinct.
    ///
    /// Used internally when enumerating facets of an already-valid key, where
    /// any ordered subset is itself sorted and distinct.
    pub(crate) fn from_sorted(verts: Vec<VertexId>) -> Self {
        debug_assert!(!verts.is_empty());
        debug_assert!(verts.windows(2).all(|w| w[0] < w[1]));
        SimplexKey(verts.into_boxed_slice())
    }

    /// Dimension of the simplex this key names (`len - 1`).
    #[inline]
    pub fn level(&self) -> usize {
        self.0.len() - 1
    }

    /// The sorted vertex identifiers.
    #[inline]
    pub fn vertices(&self) -> &[VertexId] {
        &self.0
    }

    /// The sorted identifiers as plain integers.
    pub fn raw(&self) -> Vec<u64> {
        self.0.iter().map(|v| v.get()).collect()
    }

    /// True if `v` is one of the spanning vertices.
    #[inline]
    pub fn contains(&self, v: VertexId) -> bool {
        self.0.binary_search(&v).is_ok()
    }

    /// The `level + 1` facets of this key, in increasing omitted-position
    /// order: facet `i` omits the vertex at sorted position `i`.
    pub fn facets(&self) -> impl Iterator<Item = SimplexKey> + '_ {
        (0..self.0.len()).map(move |omit| {
            let verts = self
                .0
                .iter()
                .enumerate()
                .filter_map(|(j, &v)| (j != omit).then_some(v))
                .collect();
            SimplexKey::from_sorted(verts)
        })
    }

    /// Sorted position of the vertex this key has and `facet` lacks.
    ///
    /// Returns `None` when `facet` is not a facet of this key. The position
    /// parity drives induced-orientation computations.
    pub fn omitted_position(&self, facet: &SimplexKey) -> Option<usize> {
        if facet.0.len() + 1 != self.0.len() {
            return None;
        }
        let mut omitted = None;
        let mut j = 0;
        for (i, &v) in self.0.iter().enumerate() {
            if j < facet.0.len() && facet.0[j] == v {
                j += 1;
            } else if omitted.is_none() {
                omitted = Some(i);
            } else {
                return None;
            }
        }
        (j == facet.0.len()).then_some(omitted).flatten()
    }
}

impl fmt::Debug for SimplexKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.0.iter().map(|v| v.get())).finish()
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_vertex_rejected() {
        assert_eq!(VertexId::new(0), Err(MeshCascError::InvalidVertexId));
        assert_eq!(
            SimplexKey::new(&[1, 0]),
            Err(MeshCascError::InvalidVertexId)
        );
    }

    #[test]
    fn key_canonicalizes_order() {
        let a = SimplexKey::new(&[3, 1, 2]).unwrap();
        let b = SimplexKey::new(&[2, 3, 1]).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.raw(), vec![1, 2, 3]);
        assert_eq!(a.level(), 2);
    }

    #[test]
    fn duplicate_vertex_rejected() {
        assert_eq!(
            SimplexKey::new(&[2, 1, 2]),
            Err(MeshCascError::DuplicateVertexInKey(2))
        );
    }

    #[test]
    fn empty_key_rejected() {
        // An empty key would make level() underflow; it must never exist.
        assert_eq!(SimplexKey::new(&[]), Err(MeshCascError::EmptyKey));
    }

    #[test]
    fn facets_omit_each_position() {
        let k = SimplexKey::new(&[1, 2, 3]).unwrap();
        let facets: Vec<Vec<u64>> = k.facets().map(|f| f.raw()).collect();
        assert_eq!(facets, vec![vec![2, 3], vec![1, 3], vec![1, 2]]);
    }

    #[test]
    fn omitted_position_parity_source() {
        let k = SimplexKey::new(&[1, 2, 3]).unwrap();
        let e13 = SimplexKey::new(&[1, 3]).unwrap();
        assert_eq!(k.omitted_position(&e13), Some(1));
        let not_facet = SimplexKey::new(&[4, 5]).unwrap();
        assert_eq!(k.omitted_position(&not_facet), None);
        let wrong_arity = SimplexKey::new(&[1]).unwrap();
        assert_eq!(k.omitted_position(&wrong_arity), None);
    }

    #[test]
    fn display_and_debug() {
        let v = VertexId::new(7).unwrap();
        assert_eq!(format!("{v}"), "7");
        assert_eq!(format!("{v:?}"), "VertexId(7)");
    }
}

#[cfg(test)]
mod serde_tests {
    use super::*;

    #[test]
    fn json_roundtrip() {
        let k = SimplexKey::new(&[5, 2, 9]).unwrap();
        let s = serde_json::to_string(&k).unwrap();
        let k2: SimplexKey = serde_json::from_str(&s).unwrap();
        assert_eq!(k2, k);
    }

    #[test]
    fn bincode_roundtrip() {
        let v = VertexId::new(456).unwrap();
        let bytes = bincode::serialize(&v).unwrap();
        let v2: VertexId = bincode::deserialize(&bytes).unwrap();
        assert_eq!(v2, v);
    }
}
