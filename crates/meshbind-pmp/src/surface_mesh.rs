//! Polygon surface mesh.
//!
//! Faces are stored as vertex loops. Connectivity is tracked through the set
//! of directed halfedges, which is enough to reject faces that would make an
//! edge non-manifold and to report the element counts of the wrapped mesh.
//! Deletion only marks elements; [`SurfaceMesh::garbage_collection`] compacts
//! the storage and invalidates outstanding handles.

use log::trace;
use rustc_hash::FxHashMap;
use stable_vec::StableVec;

use meshbind_core::impl_native_object;

use crate::error::MeshError;
use crate::handle::{Face, IndexType, Vertex};
use crate::types::{BoundingBox, Point};

type HalfedgeKey = (IndexType, IndexType);

fn edge_key(a: IndexType, b: IndexType) -> HalfedgeKey {
    if a < b { (a, b) } else { (b, a) }
}

#[derive(Debug, Clone)]
pub struct SurfaceMesh {
    positions: StableVec<Point>,
    faces: StableVec<Vec<Vertex>>,
    // directed halfedge -> the face on its left
    halfedges: FxHashMap<HalfedgeKey, Face>,
    // undirected edge -> number of faces using it
    edges: FxHashMap<HalfedgeKey, u8>,
}

impl Default for SurfaceMesh {
    fn default() -> Self {
        Self {
            positions: StableVec::new(),
            faces: StableVec::new(),
            halfedges: FxHashMap::default(),
            edges: FxHashMap::default(),
        }
    }
}

impl SurfaceMesh {
    pub fn new() -> Self {
        Self::default()
    }

    // ==========================================================================
    // Topology
    // ==========================================================================

    pub fn add_vertex(&mut self, p: Point) -> Vertex {
        Vertex::from(self.positions.push(p))
    }

    pub fn add_triangle(&mut self, v0: Vertex, v1: Vertex, v2: Vertex) -> Result<Face, MeshError> {
        self.add_face(&[v0, v1, v2])
    }

    pub fn add_quad(
        &mut self,
        v0: Vertex,
        v1: Vertex,
        v2: Vertex,
        v3: Vertex,
    ) -> Result<Face, MeshError> {
        self.add_face(&[v0, v1, v2, v3])
    }

    /// Add a face given by a vertex loop.
    ///
    /// Fails when a vertex is unknown or deleted, when the loop has fewer
    /// than three distinct vertices, or when one of its halfedges is already
    /// used by another face.
    pub fn add_face(&mut self, vertices: &[Vertex]) -> Result<Face, MeshError> {
        for v in vertices {
            if !self.is_live_vertex(*v) {
                return Err(MeshError::InvalidVertex(v.idx()));
            }
        }

        let mut distinct: Vec<IndexType> = vertices.iter().map(Vertex::idx).collect();
        distinct.sort_unstable();
        distinct.dedup();
        if vertices.len() < 3 || distinct.len() != vertices.len() {
            return Err(MeshError::DegenerateFace(distinct.len()));
        }

        if let Some((a, b)) = (0..vertices.len())
            .map(|i| (vertices[i].idx(), vertices[(i + 1) % vertices.len()].idx()))
            .find(|h| self.halfedges.contains_key(h))
        {
            return Err(MeshError::ComplexEdge(a, b));
        }

        let f = Face::from(self.faces.push(vertices.to_vec()));
        self.link_face(f);
        trace!("added face {f:?} with {} vertices", vertices.len());
        Ok(f)
    }

    fn link_face(&mut self, f: Face) {
        let loop_vertices = &self.faces[f.index()];
        for i in 0..loop_vertices.len() {
            let a = loop_vertices[i].idx();
            let b = loop_vertices[(i + 1) % loop_vertices.len()].idx();
            self.halfedges.insert((a, b), f);
            *self.edges.entry(edge_key(a, b)).or_insert(0) += 1;
        }
    }

    fn is_live_vertex(&self, v: Vertex) -> bool {
        v.is_valid() && self.positions.get(v.index()).is_some()
    }

    fn is_live_face(&self, f: Face) -> bool {
        f.is_valid() && self.faces.get(f.index()).is_some()
    }

    // ==========================================================================
    // Counts and queries
    // ==========================================================================

    pub fn n_vertices(&self) -> usize {
        self.positions.num_elements()
    }

    pub fn n_faces(&self) -> usize {
        self.faces.num_elements()
    }

    pub fn n_edges(&self) -> usize {
        self.edges.len()
    }

    pub fn n_halfedges(&self) -> usize {
        2 * self.n_edges()
    }

    pub fn is_empty(&self) -> bool {
        self.n_vertices() == 0
    }

    pub fn is_triangle_mesh(&self) -> bool {
        self.faces.values().all(|f| f.len() == 3)
    }

    pub fn is_quad_mesh(&self) -> bool {
        self.faces.values().all(|f| f.len() == 4)
    }

    /// Live vertices in index order.
    pub fn vertices(&self) -> impl Iterator<Item = Vertex> + '_ {
        self.positions.indices().map(Vertex::from)
    }

    /// Live faces in index order.
    pub fn faces(&self) -> impl Iterator<Item = Face> + '_ {
        self.faces.indices().map(Face::from)
    }

    pub fn face_vertices(&self, f: Face) -> &[Vertex] {
        &self.faces[f.index()]
    }

    pub fn position(&self, v: Vertex) -> &Point {
        &self.positions[v.index()]
    }

    pub fn bounds(&self) -> BoundingBox {
        BoundingBox::from_points(self.positions.values())
    }

    // ==========================================================================
    // Deletion and memory management
    // ==========================================================================

    pub fn delete_face(&mut self, f: Face) {
        if !self.is_live_face(f) {
            return;
        }
        let Some(loop_vertices) = self.faces.remove(f.index()) else {
            return;
        };
        for i in 0..loop_vertices.len() {
            let a = loop_vertices[i].idx();
            let b = loop_vertices[(i + 1) % loop_vertices.len()].idx();
            self.halfedges.remove(&(a, b));
            let key = edge_key(a, b);
            if let Some(count) = self.edges.get_mut(&key) {
                *count -= 1;
                if *count == 0 {
                    self.edges.remove(&key);
                }
            }
        }
    }

    /// Delete a vertex together with its incident faces.
    pub fn delete_vertex(&mut self, v: Vertex) {
        if !self.is_live_vertex(v) {
            return;
        }
        let incident: Vec<Face> = self
            .faces()
            .filter(|&f| self.face_vertices(f).contains(&v))
            .collect();
        for f in incident {
            self.delete_face(f);
        }
        self.positions.remove(v.index());
    }

    pub fn has_garbage(&self) -> bool {
        self.positions.num_elements() != self.positions.next_push_index()
            || self.faces.num_elements() != self.faces.next_push_index()
    }

    /// Remove deleted elements and renumber the rest.
    pub fn garbage_collection(&mut self) {
        if !self.has_garbage() {
            return;
        }
        let removed = (
            self.positions.next_push_index() - self.positions.num_elements(),
            self.faces.next_push_index() - self.faces.num_elements(),
        );

        // compaction keeps the order of live elements
        let mut remap = vec![Vertex::default(); self.positions.next_push_index()];
        for (new, old) in self.positions.indices().enumerate() {
            remap[old] = Vertex::from(new);
        }
        self.positions.make_compact();
        self.faces.make_compact();
        for loop_vertices in self.faces.values_mut() {
            for v in loop_vertices.iter_mut() {
                *v = remap[v.index()];
            }
        }

        self.halfedges.clear();
        self.edges.clear();
        let faces: Vec<Face> = self.faces().collect();
        for f in faces {
            self.link_face(f);
        }
        trace!(
            "garbage collection removed {} vertices and {} faces",
            removed.0, removed.1
        );
    }

    pub fn clear(&mut self) {
        self.positions.clear();
        self.faces.clear();
        self.halfedges.clear();
        self.edges.clear();
    }

    pub fn reserve(&mut self, n_vertices: usize, n_edges: usize, n_faces: usize) {
        self.positions.reserve(n_vertices);
        self.faces.reserve(n_faces);
        self.halfedges.reserve(2 * n_edges);
        self.edges.reserve(n_edges);
    }
}

impl_native_object!(SurfaceMesh, "pmp::SurfaceMesh");

#[cfg(test)]
mod tests {
    use super::*;

    fn quad_as_triangles() -> SurfaceMesh {
        let mut mesh = SurfaceMesh::new();
        let v0 = mesh.add_vertex(Point::new(0.0, 0.0, 0.0));
        let v1 = mesh.add_vertex(Point::new(1.0, 0.0, 0.0));
        let v2 = mesh.add_vertex(Point::new(1.0, 1.0, 0.0));
        let v3 = mesh.add_vertex(Point::new(0.0, 1.0, 0.0));
        mesh.add_triangle(v0, v1, v2).unwrap();
        mesh.add_triangle(v0, v2, v3).unwrap();
        mesh
    }

    #[test]
    fn counts() {
        let mesh = quad_as_triangles();
        assert_eq!(mesh.n_vertices(), 4);
        assert_eq!(mesh.n_faces(), 2);
        assert_eq!(mesh.n_edges(), 5);
        assert_eq!(mesh.n_halfedges(), 10);
        assert!(mesh.is_triangle_mesh());
        assert!(!mesh.is_quad_mesh());
        assert!(!mesh.is_empty());
    }

    #[test]
    fn rejects_bad_faces() {
        let mut mesh = quad_as_triangles();
        let v: Vec<Vertex> = mesh.vertices().collect();

        assert!(matches!(
            mesh.add_triangle(v[0], v[1], v[1]),
            Err(MeshError::DegenerateFace(2))
        ));
        assert!(matches!(
            mesh.add_triangle(v[0], v[1], Vertex::new(9)),
            Err(MeshError::InvalidVertex(9))
        ));
        // same orientation as the first triangle
        assert!(matches!(
            mesh.add_triangle(v[0], v[1], v[3]),
            Err(MeshError::ComplexEdge(0, 1))
        ));
        assert_eq!(mesh.n_faces(), 2);
    }

    #[test]
    fn delete_and_collect() {
        let mut mesh = quad_as_triangles();
        mesh.delete_vertex(Vertex::new(1));
        assert_eq!(mesh.n_vertices(), 3);
        assert_eq!(mesh.n_faces(), 1);
        assert_eq!(mesh.n_edges(), 3);
        assert!(mesh.has_garbage());

        mesh.garbage_collection();
        assert!(!mesh.has_garbage());
        assert_eq!(mesh.n_vertices(), 3);
        let f = mesh.faces().next().unwrap();
        let loop_ids: Vec<IndexType> = mesh.face_vertices(f).iter().map(Vertex::idx).collect();
        assert_eq!(loop_ids, vec![0, 1, 2]);
        assert_eq!(*mesh.position(Vertex::new(1)), Point::new(1.0, 1.0, 0.0));
    }

    #[test]
    fn collection_after_face_deletion_only() {
        let mut mesh = quad_as_triangles();
        let first = mesh.faces().next().unwrap();
        mesh.delete_face(first);
        mesh.delete_face(first);
        assert_eq!(mesh.n_faces(), 1);
        assert_eq!(mesh.n_vertices(), 4);
        assert!(mesh.has_garbage());

        mesh.garbage_collection();
        assert!(!mesh.has_garbage());
        assert_eq!(mesh.faces().next(), Some(Face::new(0)));
        assert_eq!(mesh.n_edges(), 3);
        // the freed halfedges can be used again
        let v: Vec<Vertex> = mesh.vertices().collect();
        assert!(mesh.add_triangle(v[0], v[1], v[2]).is_ok());
    }

    #[test]
    fn clear_empties() {
        let mut mesh = quad_as_triangles();
        mesh.clear();
        assert!(mesh.is_empty());
        assert_eq!(mesh.n_edges(), 0);
        assert!(mesh.bounds().is_empty());
    }
}
