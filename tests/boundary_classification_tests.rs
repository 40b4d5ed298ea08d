//! Boundary classification over whole meshes: open disks have a rim, closed
//! surfaces have none.

mod common;

use common::{open_disk, tetra, uv_sphere};
use mesh_casc::prelude::*;

#[test]
fn disk_rim_edges_bound_and_spokes_do_not() {
    let mesh = open_disk(6);
    for j in 0..6u64 {
        let rim = mesh.get_edge([2 + j, 2 + (j + 1) % 6]).unwrap();
        assert!(mesh.on_boundary(rim).unwrap(), "rim edge {j}");
        let spoke = mesh.get_edge([1, 2 + j]).unwrap();
        assert!(!mesh.on_boundary(spoke).unwrap(), "spoke edge {j}");
    }
}

#[test]
fn disk_rim_vertices_bound_center_is_only_near() {
    let mesh = open_disk(6);
    for j in 0..6u64 {
        let v = mesh.get_vertex(2 + j).unwrap();
        assert!(mesh.on_boundary(v).unwrap());
    }
    let center = mesh.get_vertex(1).unwrap();
    assert!(!mesh.on_boundary(center).unwrap());
    assert!(mesh.near_boundary(center).unwrap());
}

#[test]
fn every_disk_face_touches_the_rim() {
    let mesh = open_disk(5);
    for f in mesh.complex().handles_snapshot(2) {
        assert!(mesh.on_boundary(f).unwrap());
    }
}

#[test]
fn closed_surfaces_have_no_boundary() {
    for mesh in [tetra(), uv_sphere(6, 8, 1.0)] {
        for level in 0..=2 {
            for h in mesh.complex().handles_snapshot(level) {
                assert!(!mesh.on_boundary(h).unwrap());
                assert!(!mesh.near_boundary(h).unwrap());
            }
        }
    }
}

#[test]
fn boundary_tracks_removal() {
    let mut mesh = tetra();
    let before = mesh.get_edge([1, 2]).unwrap();
    assert!(!mesh.on_boundary(before).unwrap());
    // Opening the surface turns the removed face's surviving edges into rim.
    mesh.remove_face([1, 2, 3]);
    let e = mesh.get_edge([1, 2]).unwrap();
    assert!(mesh.on_boundary(e).unwrap());
    let interior = mesh.get_edge([1, 4]).unwrap();
    assert!(!mesh.on_boundary(interior).unwrap());
    // But everything is near the fresh hole on so small a mesh.
    assert!(mesh.near_boundary(interior).unwrap());
}
