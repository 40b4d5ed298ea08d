//! Typed payloads carried by a surface mesh: vertex, edge, and face data,
//! the global (root) record, and the tagged union stored in the complex.

use crate::mesh_error::MeshCascError;
use crate::topology::complex::LevelPayload;
use crate::topology::orientation::{OrientationHost, OrientationStatus, Oriented};

/// Vertex payload: embedded 3D position plus a user marker and selection flag.
#[derive(Copy, Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Vertex {
    pub position: [f64; 3],
    pub marker: i32,
    pub selected: bool,
}

impl Vertex {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Vertex {
            position: [x, y, z],
            marker: 0,
            selected: false,
        }
    }

    pub fn at(position: [f64; 3]) -> Self {
        Vertex {
            position,
            marker: 0,
            selected: false,
        }
    }
}

impl Default for Vertex {
    fn default() -> Self {
        Vertex::new(0.0, 0.0, 0.0)
    }
}

/// Edge payload.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Edge {
    pub selected: bool,
}

/// Face payload: marker, selection flag, and orientation sign in {0, +1, -1}.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Face {
    pub marker: i32,
    pub selected: bool,
    pub orientation: i8,
}

/// Global (root) payload: whole-mesh metadata.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Global {
    pub marker: i32,
    pub orientation: OrientationStatus,
}

impl OrientationHost for Global {
    fn orientation_status(&self) -> OrientationStatus {
        self.orientation
    }
    fn set_orientation_status(&mut self, status: OrientationStatus) {
        self.orientation = status;
    }
}

/// Tagged union over the per-dimension payloads of a surface mesh.
#[derive(Copy, Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum SimplexData {
    Vertex(Vertex),
    Edge(Edge),
    Face(Face),
}

impl SimplexData {
    pub fn as_vertex(&self) -> Result<&Vertex, MeshCascError> {
        match self {
            SimplexData::Vertex(v) => Ok(v),
            other => Err(wrong_level(0, other)),
        }
    }

    pub fn as_vertex_mut(&mut self) -> Result<&mut Vertex, MeshCascError> {
        match self {
            SimplexData::Vertex(v) => Ok(v),
            other => Err(wrong_level(0, other)),
        }
    }

    pub fn as_edge(&self) -> Result<&Edge, MeshCascError> {
        match self {
            SimplexData::Edge(e) => Ok(e),
            other => Err(wrong_level(1, other)),
        }
    }

    pub fn as_edge_mut(&mut self) -> Result<&mut Edge, MeshCascError> {
        match self {
            SimplexData::Edge(e) => Ok(e),
            other => Err(wrong_level(1, other)),
        }
    }

    pub fn as_face(&self) -> Result<&Face, MeshCascError> {
        match self {
            SimplexData::Face(f) => Ok(f),
            other => Err(wrong_level(2, other)),
        }
    }

    pub fn as_face_mut(&mut self) -> Result<&mut Face, MeshCascError> {
        match self {
            SimplexData::Face(f) => Ok(f),
            other => Err(wrong_level(2, other)),
        }
    }

    fn level(&self) -> usize {
        match self {
            SimplexData::Vertex(_) => 0,
            SimplexData::Edge(_) => 1,
            SimplexData::Face(_) => 2,
        }
    }
}

fn wrong_level(expected: usize, data: &SimplexData) -> MeshCascError {
    MeshCascError::WrongLevel {
        expected,
        got: data.level(),
    }
}

impl LevelPayload for SimplexData {
    fn default_for_level(level: usize) -> Self {
        match level {
            0 => SimplexData::Vertex(Vertex::default()),
            1 => SimplexData::Edge(Edge::default()),
            _ => SimplexData::Face(Face::default()),
        }
    }
}

impl Oriented for SimplexData {
    fn sign(&self) -> i8 {
        match self {
            SimplexData::Face(f) => f.orientation,
            _ => 0,
        }
    }

    fn set_sign(&mut self, sign: i8) {
        if let SimplexData::Face(f) = self {
            f.orientation = sign;
        }
    }
}
