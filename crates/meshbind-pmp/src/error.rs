use std::path::PathBuf;

use thiserror::Error;

/// Errors raised by mesh construction and reading.
#[derive(Debug, Error)]
pub enum MeshError {
    /// A handle does not belong to this mesh.
    #[error("invalid vertex handle {0}")]
    InvalidVertex(u32),

    /// A face needs at least three distinct vertices.
    #[error("degenerate face with {0} distinct vertices")]
    DegenerateFace(usize),

    /// Adding the face would make an edge non-manifold.
    #[error("complex edge between vertices {0} and {1}")]
    ComplexEdge(u32, u32),

    #[error("unsupported file format: {0}")]
    UnsupportedFormat(PathBuf),

    #[error("{path}:{line}: {message}")]
    Parse {
        path: PathBuf,
        line: usize,
        message: String,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
