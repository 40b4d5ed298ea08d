//! Structural invariants of the simplicial complex store under arbitrary
//! insert/remove sequences.

mod common;

use proptest::prelude::*;

use common::{assert_complex_invariants, sorted3, tetra};
use mesh_casc::prelude::*;
use mesh_casc::surface::data::{Face, Vertex};

#[test]
fn insert_materializes_the_closure() {
    let mesh = tetra();
    assert_eq!(mesh.num_vertices(), 4);
    assert_eq!(mesh.num_edges(), 6);
    assert_eq!(mesh.num_faces(), 4);
    assert_complex_invariants(&mesh);
}

#[test]
fn face_insert_from_nothing_builds_seven_simplices() {
    let mut mesh = SurfaceMesh::new();
    mesh.insert_face([1, 2, 3], Face::default()).unwrap();
    assert_eq!(mesh.num_vertices() + mesh.num_edges() + mesh.num_faces(), 7);
    assert_complex_invariants(&mesh);
}

#[test]
fn reinserting_a_face_overwrites_data_without_duplicating() {
    let mut mesh = tetra();
    let mut marked = Face::default();
    marked.marker = 7;
    mesh.insert_face([1, 2, 3], marked).unwrap();
    assert_eq!(mesh.num_faces(), 4);
    let f = mesh.get_face([1, 2, 3]).unwrap();
    assert_eq!(mesh.face(f).unwrap().marker, 7);
    assert_complex_invariants(&mesh);
}

#[test]
fn vertex_removal_cascades_through_the_star() {
    let mut mesh = tetra();
    let removed = mesh.remove_vertex(1);
    // Vertex 1 plus its three edges and three faces.
    assert_eq!(removed, 7);
    assert_eq!(mesh.num_vertices(), 3);
    assert_eq!(mesh.num_edges(), 3);
    assert_eq!(mesh.num_faces(), 1);
    assert_complex_invariants(&mesh);
}

#[test]
fn edge_removal_takes_its_cofaces_only() {
    let mut mesh = tetra();
    assert_eq!(mesh.remove_edge([1, 2]), 3);
    assert_eq!(mesh.num_vertices(), 4);
    assert_eq!(mesh.num_edges(), 5);
    assert_eq!(mesh.num_faces(), 2);
    assert_complex_invariants(&mesh);
}

#[test]
fn handles_go_stale_after_removal() {
    let mut mesh = tetra();
    let f = mesh.get_face([1, 2, 3]).unwrap();
    mesh.remove(f);
    assert!(!mesh.complex().contains(f));
    assert!(matches!(
        mesh.face(f),
        Err(MeshCascError::StaleHandle { .. })
    ));
    // Removing again is a no-op, not an error.
    assert_eq!(mesh.remove(f), 0);
}

#[test]
fn handle_does_not_resurrect_on_slot_reuse() {
    let mut mesh = tetra();
    let f = mesh.get_face([1, 2, 3]).unwrap();
    mesh.remove(f);
    // A new face may land in the recycled slot; the old handle must still
    // read as stale.
    mesh.insert_face([1, 2, 3], Face::default()).unwrap();
    assert!(!mesh.complex().contains(f));
    let fresh = mesh.get_face([1, 2, 3]).unwrap();
    assert!(mesh.complex().contains(fresh));
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Any interleaving of face inserts, face removals, and vertex removals
    /// leaves the store closed and mutually linked.
    #[test]
    fn random_edits_preserve_invariants(
        ops in prop::collection::vec((0u8..3, 1u64..9, 1u64..9, 1u64..9), 1..48)
    ) {
        let mut mesh = SurfaceMesh::new();
        for (op, a, b, c) in ops {
            match op {
                0 => {
                    if a != b && b != c && a != c {
                        mesh.insert_face(sorted3(a, b, c), Face::default()).unwrap();
                    }
                }
                1 => {
                    if a != b && b != c && a != c {
                        mesh.remove_face(sorted3(a, b, c));
                    }
                }
                _ => {
                    mesh.remove_vertex(a);
                }
            }
        }
        assert_complex_invariants(&mesh);
    }

    /// Removing everything that was inserted empties the store completely.
    #[test]
    fn full_teardown_leaves_nothing(
        faces in prop::collection::vec((1u64..9, 1u64..9, 1u64..9), 1..24)
    ) {
        let mut mesh = SurfaceMesh::new();
        for (a, b, c) in &faces {
            if a != b && b != c && a != c {
                mesh.insert_face(sorted3(*a, *b, *c), Face::default()).unwrap();
            }
        }
        for v in mesh.complex().handles_snapshot(0) {
            mesh.remove(v);
        }
        assert_eq!(mesh.num_vertices(), 0);
        assert_eq!(mesh.num_edges(), 0);
        assert_eq!(mesh.num_faces(), 0);
    }
}

#[test]
fn vertex_payloads_survive_face_insertion() {
    let mut mesh = SurfaceMesh::new();
    mesh.insert_vertex(1, Vertex::new(1.0, 2.0, 3.0)).unwrap();
    mesh.insert_face([1, 2, 3], Face::default()).unwrap();
    let v = mesh.get_vertex(1).unwrap();
    assert_eq!(mesh.vertex(v).unwrap().position, [1.0, 2.0, 3.0]);
}
