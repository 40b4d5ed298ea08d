//! Shared fixtures and invariant checkers for the integration suites.
#![allow(dead_code)]

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use mesh_casc::prelude::*;
use mesh_casc::surface::data::{Face, Vertex};

pub fn sorted3(a: u64, b: u64, c: u64) -> [u64; 3] {
    let mut k = [a, b, c];
    k.sort_unstable();
    k
}

/// Tetrahedron surface: 4 vertices, 6 edges, 4 faces, closed and manifold.
pub fn tetra() -> SurfaceMesh {
    let mut mesh = SurfaceMesh::new();
    let points = [
        [0.0, 0.0, 0.0],
        [1.0, 0.0, 0.0],
        [0.0, 1.0, 0.0],
        [0.0, 0.0, 1.0],
    ];
    for (i, p) in points.into_iter().enumerate() {
        mesh.insert_vertex(i as u64 + 1, Vertex::at(p)).unwrap();
    }
    for f in [[1, 2, 3], [1, 2, 4], [1, 3, 4], [2, 3, 4]] {
        mesh.insert_face(f, Face::default()).unwrap();
    }
    mesh
}

/// Open disk: a fan of `n` triangles around center vertex 1, rim 2..=n+1.
pub fn open_disk(n: u64) -> SurfaceMesh {
    assert!(n >= 3);
    let mut mesh = SurfaceMesh::new();
    mesh.insert_vertex(1, Vertex::new(0.0, 0.0, 0.0)).unwrap();
    for j in 0..n {
        let t = 2.0 * std::f64::consts::PI * j as f64 / n as f64;
        mesh.insert_vertex(2 + j, Vertex::new(t.cos(), t.sin(), 0.0))
            .unwrap();
    }
    for j in 0..n {
        mesh.insert_face(sorted3(1, 2 + j, 2 + (j + 1) % n), Face::default())
            .unwrap();
    }
    mesh
}

/// Closed UV sphere: `rings` latitude bands, `segs` vertices per ring, two
/// poles. Vertex 1 is the north pole, 2 the south pole.
pub fn uv_sphere(rings: usize, segs: usize, radius: f64) -> SurfaceMesh {
    assert!(rings >= 2 && segs >= 3);
    let mut mesh = SurfaceMesh::new();
    mesh.insert_vertex(1, Vertex::new(0.0, 0.0, radius)).unwrap();
    mesh.insert_vertex(2, Vertex::new(0.0, 0.0, -radius))
        .unwrap();
    let ring_id = |i: usize, j: usize| 3 + (i * segs + j % segs) as u64;
    for i in 0..rings - 1 {
        let theta = std::f64::consts::PI * (i + 1) as f64 / rings as f64;
        for j in 0..segs {
            let phi = 2.0 * std::f64::consts::PI * j as f64 / segs as f64;
            mesh.insert_vertex(
                ring_id(i, j),
                Vertex::new(
                    radius * theta.sin() * phi.cos(),
                    radius * theta.sin() * phi.sin(),
                    radius * theta.cos(),
                ),
            )
            .unwrap();
        }
    }
    for j in 0..segs {
        mesh.insert_face(sorted3(1, ring_id(0, j), ring_id(0, j + 1)), Face::default())
            .unwrap();
        mesh.insert_face(
            sorted3(2, ring_id(rings - 2, j), ring_id(rings - 2, j + 1)),
            Face::default(),
        )
        .unwrap();
    }
    for i in 0..rings - 2 {
        for j in 0..segs {
            mesh.insert_face(
                sorted3(ring_id(i, j), ring_id(i, j + 1), ring_id(i + 1, j)),
                Face::default(),
            )
            .unwrap();
            mesh.insert_face(
                sorted3(ring_id(i, j + 1), ring_id(i + 1, j), ring_id(i + 1, j + 1)),
                Face::default(),
            )
            .unwrap();
        }
    }
    mesh
}

/// UV sphere with radial jitter from a fixed-seed `SmallRng`.
pub fn noisy_sphere(seed: u64) -> SurfaceMesh {
    let mut mesh = uv_sphere(8, 12, 1.0);
    let mut rng = SmallRng::seed_from_u64(seed);
    for v in mesh.complex().handles_snapshot(0) {
        let p = mesh.position(v).unwrap();
        let f = 1.0 + rng.gen_range(-0.05..0.05);
        mesh.set_position(v, [p[0] * f, p[1] * f, p[2] * f]).unwrap();
    }
    mesh
}

/// Triangulated Mobius band with 5 segments: non-orientable, so orientation
/// checking must flag it inconsistent.
pub fn mobius_strip() -> SurfaceMesh {
    let mut mesh = SurfaceMesh::new();
    let n = 5u64;
    // Rails a_i = 2i+1, b_i = 2i+2, positions on the standard embedding.
    for i in 0..n {
        let u = 2.0 * std::f64::consts::PI * i as f64 / n as f64;
        for (w, id) in [(-0.5, 2 * i + 1), (0.5, 2 * i + 2)] {
            let r = 1.0 + w * (u / 2.0).cos();
            mesh.insert_vertex(
                id,
                Vertex::new(r * u.cos(), r * u.sin(), w * (u / 2.0).sin()),
            )
            .unwrap();
        }
    }
    let rail = |i: u64, side: u64| {
        if i < n {
            2 * i + 1 + side
        } else {
            // The seam glues with a half twist: rails swap.
            2 - side
        }
    };
    for i in 0..n {
        let (a0, b0) = (rail(i, 0), rail(i, 1));
        let (a1, b1) = (rail(i + 1, 0), rail(i + 1, 1));
        mesh.insert_face(sorted3(a0, b0, a1), Face::default()).unwrap();
        mesh.insert_face(sorted3(b0, a1, b1), Face::default()).unwrap();
    }
    mesh
}

/// Checks the structural invariants every live simplex must satisfy:
/// closure completeness and mutual boundary/coboundary links.
pub fn assert_complex_invariants(mesh: &SurfaceMesh) {
    let complex = mesh.complex();
    for level in 0..=2 {
        for h in complex.handles_snapshot(level) {
            let key = complex.key(h).unwrap();
            assert_eq!(key.level(), level);
            if level > 0 {
                let boundary = complex.boundary(h).unwrap();
                assert_eq!(boundary.len(), level + 1, "facet count at level {level}");
                for &b in boundary {
                    assert!(complex.contains(b), "dangling boundary link");
                    assert!(
                        complex.coboundary(b).unwrap().contains(&h),
                        "boundary link without matching coboundary link"
                    );
                }
                for facet in key.facets() {
                    assert!(complex.get(&facet).is_some(), "closure violated: missing facet");
                }
            }
            for &c in complex.coboundary(h).unwrap() {
                assert!(complex.contains(c), "dangling coboundary link");
                assert!(
                    complex.boundary(c).unwrap().contains(&h),
                    "coboundary link without matching boundary link"
                );
            }
        }
    }
}

/// Every edge of a valid surface borders one or two faces.
pub fn assert_manifold(mesh: &SurfaceMesh) {
    for e in mesh.edge_ids() {
        let cofaces = mesh.complex().coboundary(e).unwrap().len();
        assert!(
            (1..=2).contains(&cofaces),
            "edge with {cofaces} cofaces"
        );
    }
}
