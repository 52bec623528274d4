//! Convenience entry points exposed next to the library's own functions.

use std::path::Path;

use crate::error::MeshError;
use crate::io;
use crate::surface_mesh::SurfaceMesh;

/// Deep copy of `src`.
pub fn copy_mesh(src: &SurfaceMesh) -> SurfaceMesh {
    src.clone()
}

/// Load the file at `path` into `mesh` in one step, replacing its contents.
pub fn load_mesh(mesh: &mut SurfaceMesh, path: &Path) -> Result<(), MeshError> {
    mesh.clear();
    io::read(mesh, path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Point;

    #[test]
    fn copy_is_independent() {
        let mut src = SurfaceMesh::new();
        let a = src.add_vertex(Point::new(0.0, 0.0, 0.0));
        let b = src.add_vertex(Point::new(1.0, 0.0, 0.0));
        let c = src.add_vertex(Point::new(0.0, 1.0, 0.0));
        src.add_triangle(a, b, c).unwrap();

        let mut copy = copy_mesh(&src);
        copy.clear();
        assert_eq!(src.n_faces(), 1);
        assert!(copy.is_empty());
    }

    #[test]
    fn load_replaces_contents() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tri.obj");
        std::fs::write(&path, "v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\n").unwrap();

        let mut mesh = SurfaceMesh::new();
        mesh.add_vertex(Point::new(5.0, 5.0, 5.0));
        load_mesh(&mut mesh, &path).unwrap();
        assert_eq!(mesh.n_vertices(), 3);
        assert_eq!(mesh.n_faces(), 1);
    }
}
