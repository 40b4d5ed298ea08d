//! # mesh-casc
//!
//! mesh-casc is a Rust library for managing abstract simplicial complexes and
//! conditioning triangulated surface meshes. The core is a dimension-generic
//! Hasse-diagram store with stable generation-tagged handles; on top of it
//! sit an orientation engine, boundary classification, and the surface
//! toolkit: smoothing, coarsening, curvature estimation, hole filling, and
//! bulk geometric queries.
//!
//! ## Layers
//! - [`topology`]: the [`SimplicialComplex`](topology::complex::SimplicialComplex)
//!   store (closure-completing insert, cascading remove, star/closure
//!   traversals), handles and keys, the orientation engine, and boundary
//!   predicates.
//! - [`geometry`]: free-function vector and triangle math over `[f64; 3]`.
//! - [`surface`]: the typed [`SurfaceMesh`](surface::SurfaceMesh) wrapper and
//!   the conditioning algorithms.
//!
//! ## Usage
//! ```rust
//! use mesh_casc::prelude::*;
//!
//! let mut mesh = SurfaceMesh::new();
//! for (i, p) in [
//!     [0.0, 0.0, 0.0],
//!     [1.0, 0.0, 0.0],
//!     [0.0, 1.0, 0.0],
//!     [0.0, 0.0, 1.0],
//! ]
//! .into_iter()
//! .enumerate()
//! {
//!     mesh.insert_vertex(i as u64 + 1, Vertex::at(p)).unwrap();
//! }
//! for f in [[1, 2, 3], [1, 2, 4], [1, 3, 4], [2, 3, 4]] {
//!     mesh.insert_face(f, Face::default()).unwrap();
//! }
//! assert_eq!(
//!     mesh.compute_orientation().unwrap(),
//!     OrientationStatus::Consistent
//! );
//! mesh_casc::surface::transform::correct_normals(&mut mesh).unwrap();
//! assert!(mesh_casc::surface::transform::volume(&mesh).unwrap() > 0.0);
//! ```
//!
//! ## Determinism
//! The core is single-threaded and allocation-order independent: iteration
//! follows arena slot order, and the algorithms snapshot handle sets before
//! mutating. Randomized tests fix `SmallRng` seeds explicitly.

pub mod geometry;
pub mod mesh_error;
pub mod surface;
pub mod topology;

/// A convenient prelude to import the most-used traits & types:
pub mod prelude {
    pub use crate::mesh_error::MeshCascError;
    pub use crate::surface::coarsen::{coarse, coarse_dense, coarse_flat};
    pub use crate::surface::curvature::{gaussian_curvature, mean_curvature};
    pub use crate::surface::data::{Edge, Face, Global, SimplexData, Vertex};
    pub use crate::surface::holes::fill_holes;
    pub use crate::surface::smooth::{normal_smooth, smooth};
    pub use crate::surface::transform::{
        center_and_radius, correct_normals, flip_normals, scale, translate, volume,
    };
    pub use crate::surface::{FlatArrays, SurfaceMesh};
    pub use crate::topology::cache::InvalidateCache;
    pub use crate::topology::complex::{LevelPayload, SimplicialComplex};
    pub use crate::topology::handle::SimplexHandle;
    pub use crate::topology::key::{SimplexKey, VertexId};
    pub use crate::topology::orientation::{
        check_orientation, clear_orientation, compute_orientation, init_orientation, Oriented,
        OrientationHost, OrientationStatus,
    };
}
