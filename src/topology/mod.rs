//! Core abstract simplicial complex abstractions.
//!
//! This module provides the dimension-generic engine everything else builds
//! on:
//! - [`key`]: vertex identifiers and canonical simplex names
//! - [`handle`]: stable, generation-tagged simplex references
//! - [`complex`]: the Hasse-diagram arena store
//! - [`boundary`]: on/near-boundary predicates
//! - [`orientation`]: sign assignment and consistency checking
//!
//! Most users will interact with the typed surface wrapper in
//! [`crate::surface`] rather than driving the store directly.

pub mod boundary;
pub mod cache;
pub mod complex;
pub mod handle;
pub mod key;
pub mod orientation;

pub use cache::InvalidateCache;
pub use complex::{LevelPayload, SimplicialComplex};
pub use handle::SimplexHandle;
pub use key::{SimplexKey, VertexId};
pub use orientation::{OrientationHost, OrientationStatus, Oriented};
