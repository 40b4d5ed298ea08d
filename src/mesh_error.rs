//! MeshCascError: unified error type for mesh-casc public APIs
//!
//! This error type is used throughout the mesh-casc library to provide robust,
//! non-panicking error handling for all public APIs.

use thiserror::Error;

/// Unified error type for mesh-casc operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MeshCascError {
    /// Attempted to construct a VertexId with a zero value (invalid).
    #[error("VertexId must be non-zero (0 is reserved as invalid/sentinel)")]
    InvalidVertexId,
    /// A vertex identifier named no live vertex.
    #[error("no vertex named {0} in the mesh")]
    UnknownVertex(u64),
    /// A simplex key contained repeated vertices.
    #[error("invalid simplex key: vertex {0} appears more than once")]
    DuplicateVertexInKey(u64),
    /// A simplex key was built from no vertices at all.
    #[error("invalid simplex key: a simplex has at least one vertex")]
    EmptyKey,
    /// A key or handle referred to a dimension the complex does not store.
    #[error("level {level} out of range: complex stores dimensions 0..={max}")]
    LevelOutOfRange { level: usize, max: usize },
    /// A handle outlived its referent (the simplex was removed, directly or by
    /// a cascading ancestor removal).
    #[error("stale handle: simplex at level {level}, slot {slot} has been removed")]
    StaleHandle { level: usize, slot: u32 },
    /// A handle referred to the wrong dimension for the requested payload.
    #[error("handle refers to a level-{got} simplex, expected level {expected}")]
    WrongLevel { expected: usize, got: usize },
    /// An orientation query ran before `init_orientation`.
    #[error("orientation has not been initialized; call init_orientation first")]
    NotInitialized,
    /// `init_orientation` ran twice without an intervening clear.
    #[error("orientation is already initialized; call clear_orientation first")]
    AlreadyInitialized,
    /// A signed quantity was requested from a mesh whose orientation check
    /// found a conflict (non-orientable surface or non-manifold defect).
    #[error("mesh orientation is inconsistent; signed quantities are meaningless")]
    InconsistentOrientation,
    /// Geometry inputs were degenerate or otherwise unusable.
    #[error("invalid geometry: {0}")]
    InvalidGeometry(String),
}
