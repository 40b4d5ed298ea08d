//! Typed surface mesh: a 2-dimensional simplicial complex with vertex
//! coordinates, face orientation signs, and the conditioning algorithms
//! layered on top.
//!
//! [`SurfaceMesh`] wraps the generic
//! [`SimplicialComplex`](crate::topology::complex::SimplicialComplex) with the
//! per-dimension payloads from [`data`] and exposes the typed operations the
//! algorithm modules build on: insertion/removal by vertex keys, payload
//! accessors, 1-ring queries, and the flat-array export used by downstream
//! consumers.

pub mod coarsen;
pub mod curvature;
pub mod data;
pub mod holes;
pub mod smooth;
pub mod transform;

use itertools::Itertools;

use crate::geometry::metrics::triangle_normal;
use crate::geometry::vector::scale;
use crate::mesh_error::MeshCascError;
use crate::topology::boundary;
use crate::topology::complex::SimplicialComplex;
use crate::topology::handle::SimplexHandle;
use crate::topology::key::SimplexKey;
use crate::topology::orientation::{self, OrientationStatus};

use data::{Edge, Face, Global, SimplexData, Vertex};

/// A triangulated surface: vertices, edges, and faces with mutual
/// boundary/coboundary links and an orientation sign per face.
///
/// # Example
/// ```rust
/// use mesh_casc::surface::SurfaceMesh;
/// use mesh_casc::surface::data::{Face, Vertex};
///
/// let mut mesh = SurfaceMesh::new();
/// for (i, p) in [[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]]
///     .into_iter()
///     .enumerate()
/// {
///     mesh.insert_vertex(i as u64 + 1, Vertex::at(p)).unwrap();
/// }
/// mesh.insert_face([1, 2, 3], Face::default()).unwrap();
/// assert_eq!(mesh.num_vertices(), 3);
/// assert_eq!(mesh.num_edges(), 3);
/// assert_eq!(mesh.num_faces(), 1);
/// ```
#[derive(Clone, Debug)]
pub struct SurfaceMesh {
    complex: SimplicialComplex<SimplexData, Global>,
    next_vertex_id: u64,
}

pub(crate) fn sorted3(a: u64, b: u64, c: u64) -> [u64; 3] {
    let mut k = [a, b, c];
    k.sort_unstable();
    k
}

/// Vertex coordinates plus index-based edge and face connectivity, the bulk
/// export format for downstream consumers.
///
/// Face vertex order follows the stored orientation sign: forward for a
/// non-negative sign, reversed for a negative one, so consumers receive
/// consistently wound triangles.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FlatArrays {
    pub vertices: Vec<[f64; 3]>,
    pub edges: Vec<[usize; 2]>,
    pub faces: Vec<[usize; 3]>,
}

impl Default for SurfaceMesh {
    fn default() -> Self {
        Self::new()
    }
}

impl SurfaceMesh {
    /// Surface meshes are 2-dimensional complexes.
    pub const DIM: usize = 2;

    /// Creates an empty surface mesh.
    pub fn new() -> Self {
        SurfaceMesh {
            complex: SimplicialComplex::new(Self::DIM, Global::default()),
            next_vertex_id: 1,
        }
    }

    /// Read access to the underlying complex.
    #[inline]
    pub fn complex(&self) -> &SimplicialComplex<SimplexData, Global> {
        &self.complex
    }

    /// Global (root) metadata.
    #[inline]
    pub fn global(&self) -> &Global {
        self.complex.global()
    }

    /// Mutable global metadata.
    #[inline]
    pub fn global_mut(&mut self) -> &mut Global {
        self.complex.global_mut()
    }

    // ----------------------------------------------------------------------
    // Insert / remove
    // ----------------------------------------------------------------------

    /// Adds a vertex under a freshly allocated identifier.
    pub fn add_vertex(&mut self, data: Vertex) -> Result<SimplexHandle, MeshCascError> {
        let id = self.next_vertex_id;
        self.insert_vertex(id, data)
    }

    /// Inserts (or overwrites) the vertex named `id`.
    pub fn insert_vertex(&mut self, id: u64, data: Vertex) -> Result<SimplexHandle, MeshCascError> {
        let key = SimplexKey::new(&[id])?;
        self.note_ids(&key);
        self.complex.insert(key, SimplexData::Vertex(data))
    }

    /// Inserts (or overwrites) the edge spanning `key`, materializing missing
    /// endpoint vertices.
    pub fn insert_edge(
        &mut self,
        key: [u64; 2],
        data: Edge,
    ) -> Result<SimplexHandle, MeshCascError> {
        let key = SimplexKey::new(&key)?;
        self.note_ids(&key);
        self.complex.insert(key, SimplexData::Edge(data))
    }

    /// Inserts (or overwrites) the face spanning `key`, materializing missing
    /// boundary edges and vertices.
    pub fn insert_face(
        &mut self,
        key: [u64; 3],
        data: Face,
    ) -> Result<SimplexHandle, MeshCascError> {
        let key = SimplexKey::new(&key)?;
        self.note_ids(&key);
        self.complex.insert(key, SimplexData::Face(data))
    }

    fn note_ids(&mut self, key: &SimplexKey) {
        for v in key.vertices() {
            self.next_vertex_id = self.next_vertex_id.max(v.get() + 1);
        }
    }

    /// Removes the simplex behind `handle` and its star; returns the count
    /// removed (0 for a stale handle).
    pub fn remove(&mut self, handle: SimplexHandle) -> usize {
        self.complex.remove(handle)
    }

    /// Removes the vertex named `id` and its star.
    pub fn remove_vertex(&mut self, id: u64) -> usize {
        self.remove_raw(&[id])
    }

    /// Removes the edge spanning `key` and its star.
    pub fn remove_edge(&mut self, key: [u64; 2]) -> usize {
        self.remove_raw(&key)
    }

    /// Removes the face spanning `key`.
    pub fn remove_face(&mut self, key: [u64; 3]) -> usize {
        self.remove_raw(&key)
    }

    fn remove_raw(&mut self, raw: &[u64]) -> usize {
        match SimplexKey::new(raw) {
            Ok(key) => self.complex.remove_key(&key),
            Err(_) => 0,
        }
    }

    // ----------------------------------------------------------------------
    // Lookup / iteration
    // ----------------------------------------------------------------------

    pub fn get_vertex(&self, id: u64) -> Option<SimplexHandle> {
        self.complex.get_raw(&[id])
    }

    pub fn get_edge(&self, key: [u64; 2]) -> Option<SimplexHandle> {
        self.complex.get_raw(&key)
    }

    pub fn get_face(&self, key: [u64; 3]) -> Option<SimplexHandle> {
        self.complex.get_raw(&key)
    }

    pub fn num_vertices(&self) -> usize {
        self.complex.size(0)
    }

    pub fn num_edges(&self) -> usize {
        self.complex.size(1)
    }

    pub fn num_faces(&self) -> usize {
        self.complex.size(2)
    }

    /// Lazy iterator over vertex handles; restartable, borrows the mesh.
    pub fn vertex_ids(&self) -> impl Iterator<Item = SimplexHandle> + '_ {
        self.complex.handles(0)
    }

    /// Lazy iterator over edge handles.
    pub fn edge_ids(&self) -> impl Iterator<Item = SimplexHandle> + '_ {
        self.complex.handles(1)
    }

    /// Lazy iterator over face handles.
    pub fn face_ids(&self) -> impl Iterator<Item = SimplexHandle> + '_ {
        self.complex.handles(2)
    }

    // ----------------------------------------------------------------------
    // Typed payload access
    // ----------------------------------------------------------------------

    pub fn vertex(&self, handle: SimplexHandle) -> Result<&Vertex, MeshCascError> {
        self.complex.data(handle)?.as_vertex()
    }

    pub fn vertex_mut(&mut self, handle: SimplexHandle) -> Result<&mut Vertex, MeshCascError> {
        self.complex.data_mut(handle)?.as_vertex_mut()
    }

    pub fn edge(&self, handle: SimplexHandle) -> Result<&Edge, MeshCascError> {
        self.complex.data(handle)?.as_edge()
    }

    pub fn edge_mut(&mut self, handle: SimplexHandle) -> Result<&mut Edge, MeshCascError> {
        self.complex.data_mut(handle)?.as_edge_mut()
    }

    pub fn face(&self, handle: SimplexHandle) -> Result<&Face, MeshCascError> {
        self.complex.data(handle)?.as_face()
    }

    pub fn face_mut(&mut self, handle: SimplexHandle) -> Result<&mut Face, MeshCascError> {
        self.complex.data_mut(handle)?.as_face_mut()
    }

    pub fn position(&self, handle: SimplexHandle) -> Result<[f64; 3], MeshCascError> {
        Ok(self.vertex(handle)?.position)
    }

    pub fn set_position(
        &mut self,
        handle: SimplexHandle,
        position: [f64; 3],
    ) -> Result<(), MeshCascError> {
        self.vertex_mut(handle)?.position = position;
        Ok(())
    }

    /// Position of the vertex named `id`.
    pub fn position_of(&self, id: u64) -> Result<[f64; 3], MeshCascError> {
        let handle = self
            .get_vertex(id)
            .ok_or(MeshCascError::UnknownVertex(id))?;
        self.position(handle)
    }

    // ----------------------------------------------------------------------
    // Local queries used by the algorithms
    // ----------------------------------------------------------------------

    /// Sorted vertex identifiers and positions of a face's corners.
    pub fn face_corners(
        &self,
        face: SimplexHandle,
    ) -> Result<([u64; 3], [[f64; 3]; 3]), MeshCascError> {
        let name = self.complex.name(face)?;
        if name.len() != 3 {
            return Err(MeshCascError::WrongLevel {
                expected: 2,
                got: name.len() - 1,
            });
        }
        let ids = [name[0].get(), name[1].get(), name[2].get()];
        let mut positions = [[0.0; 3]; 3];
        for (i, &id) in ids.iter().enumerate() {
            positions[i] = self.position_of(id)?;
        }
        Ok((ids, positions))
    }

    /// Unit normal of the face under its sorted-name winding.
    pub fn base_normal(&self, face: SimplexHandle) -> Result<[f64; 3], MeshCascError> {
        let (_, [a, b, c]) = self.face_corners(face)?;
        triangle_normal(a, b, c)
    }

    /// Unit normal of the face adjusted by its orientation sign; a sign of 0
    /// is treated as forward.
    pub fn oriented_normal(&self, face: SimplexHandle) -> Result<[f64; 3], MeshCascError> {
        let n = self.base_normal(face)?;
        let sign = self.face(face)?.orientation;
        Ok(if sign < 0 { scale(n, -1.0) } else { n })
    }

    /// Identifiers of the 1-ring neighbors of the vertex behind `handle`.
    pub fn neighbor_ids(&self, vertex: SimplexHandle) -> Result<Vec<u64>, MeshCascError> {
        let id = self.complex.name(vertex)?[0];
        let mut out = Vec::new();
        for &e in self.complex.coboundary(vertex)? {
            let name = self.complex.name(e)?;
            if let Some(other) = name.iter().find(|&&v| v != id) {
                out.push(other.get());
            }
        }
        out.sort_unstable();
        Ok(out)
    }

    /// The link of an interior manifold vertex as a cyclically ordered vertex
    /// loop, or `None` when the 1-ring is not a single closed fan (boundary
    /// vertex, non-manifold edge, or disconnected link).
    pub fn link_loop(&self, vertex: SimplexHandle) -> Result<Option<Vec<u64>>, MeshCascError> {
        let id = self.complex.name(vertex)?[0].get();
        // Each incident face {v, x, y} contributes the link edge x-y.
        let mut adjacency: hashbrown::HashMap<u64, Vec<u64>> = hashbrown::HashMap::new();
        let mut faces = 0usize;
        for h in self.complex.star(vertex) {
            if h.level() != 2 {
                continue;
            }
            faces += 1;
            let others: Vec<u64> = self
                .complex
                .name(h)?
                .iter()
                .map(|v| v.get())
                .filter(|&v| v != id)
                .collect();
            let (x, y) = (others[0], others[1]);
            adjacency.entry(x).or_default().push(y);
            adjacency.entry(y).or_default().push(x);
        }
        if faces < 3 || adjacency.values().any(|n| n.len() != 2) {
            return Ok(None);
        }
        // Walk the cycle; it must visit every link vertex exactly once.
        let Some(&start) = adjacency.keys().min() else {
            return Ok(None);
        };
        let mut loop_ids = vec![start];
        let mut prev = start;
        let mut current = adjacency[&start][0];
        while current != start {
            loop_ids.push(current);
            if loop_ids.len() > adjacency.len() {
                return Ok(None);
            }
            let Some(next) = adjacency[&current].iter().copied().find(|&n| n != prev) else {
                return Ok(None);
            };
            prev = current;
            current = next;
        }
        if loop_ids.len() != adjacency.len() {
            return Ok(None);
        }
        Ok(Some(loop_ids))
    }

    // ----------------------------------------------------------------------
    // Boundary and orientation
    // ----------------------------------------------------------------------

    /// See [`crate::topology::boundary::on_boundary`].
    pub fn on_boundary(&self, handle: SimplexHandle) -> Result<bool, MeshCascError> {
        boundary::on_boundary(&self.complex, handle)
    }

    /// See [`crate::topology::boundary::near_boundary`].
    pub fn near_boundary(&self, handle: SimplexHandle) -> Result<bool, MeshCascError> {
        boundary::near_boundary(&self.complex, handle)
    }

    /// Current orientation lifecycle state.
    pub fn orientation_status(&self) -> OrientationStatus {
        self.global().orientation
    }

    /// See [`crate::topology::orientation::init_orientation`].
    pub fn init_orientation(&mut self) -> Result<(), MeshCascError> {
        orientation::init_orientation(&mut self.complex)
    }

    /// See [`crate::topology::orientation::check_orientation`].
    pub fn check_orientation(&mut self) -> Result<OrientationStatus, MeshCascError> {
        orientation::check_orientation(&mut self.complex)
    }

    /// See [`crate::topology::orientation::clear_orientation`].
    pub fn clear_orientation(&mut self) -> Result<(), MeshCascError> {
        orientation::clear_orientation(&mut self.complex)
    }

    /// See [`crate::topology::orientation::compute_orientation`].
    pub fn compute_orientation(&mut self) -> Result<OrientationStatus, MeshCascError> {
        orientation::compute_orientation(&mut self.complex)
    }

    // ----------------------------------------------------------------------
    // Bulk export
    // ----------------------------------------------------------------------

    /// Exports coordinates and index-based connectivity; see [`FlatArrays`].
    ///
    /// Vertex indices follow first-visit order over the vertex level; face
    /// corner order is permuted by the face's orientation sign.
    pub fn to_flat_arrays(&self) -> Result<FlatArrays, MeshCascError> {
        let mut sigma: hashbrown::HashMap<u64, usize> = hashbrown::HashMap::new();
        let mut vertices = Vec::with_capacity(self.num_vertices());
        for h in self.vertex_ids() {
            let id = self.complex.name(h)?[0].get();
            sigma.insert(id, vertices.len());
            vertices.push(self.vertex(h)?.position);
        }

        let mut edges = Vec::with_capacity(self.num_edges());
        for h in self.edge_ids() {
            let name = self.complex.name(h)?;
            edges.push([sigma[&name[0].get()], sigma[&name[1].get()]]);
        }

        let mut faces = Vec::with_capacity(self.num_faces());
        for h in self.face_ids() {
            let name = self.complex.name(h)?;
            let idx = [
                sigma[&name[0].get()],
                sigma[&name[1].get()],
                sigma[&name[2].get()],
            ];
            if self.face(h)?.orientation < 0 {
                faces.push([idx[2], idx[1], idx[0]]);
            } else {
                faces.push(idx);
            }
        }

        Ok(FlatArrays {
            vertices,
            edges,
            faces,
        })
    }

    /// Mean edge length over the whole mesh; 0 for an edgeless mesh.
    pub fn mean_edge_length(&self) -> Result<f64, MeshCascError> {
        let mut total = 0.0;
        let mut count = 0usize;
        for e in self.edge_ids() {
            let name = self.complex.name(e)?;
            let (a, b) = name
                .iter()
                .map(|v| v.get())
                .collect_tuple()
                .ok_or(MeshCascError::WrongLevel {
                    expected: 1,
                    got: name.len() - 1,
                })?;
            total += crate::geometry::vector::distance(self.position_of(a)?, self.position_of(b)?);
            count += 1;
        }
        Ok(if count == 0 { 0.0 } else { total / count as f64 })
    }
}
