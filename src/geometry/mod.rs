//! Geometry primitives: `[f64; 3]` vector helpers and triangle/tetrahedron
//! metrics with degenerate-input guards.

pub mod metrics;
pub mod vector;
