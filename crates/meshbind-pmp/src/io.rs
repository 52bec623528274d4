//! Reading meshes from Wavefront OBJ and OFF files.

use std::fmt;
use std::path::{Path, PathBuf};

use log::{debug, warn};

use crate::error::MeshError;
use crate::handle::Vertex;
use crate::surface_mesh::SurfaceMesh;
use crate::types::{Point, Scalar};

/// One of the readable file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    Obj,
    Off,
}

impl FileFormat {
    /// Guess the format from the (case-insensitive) file extension.
    pub fn from_extension(path: impl AsRef<Path>) -> Option<Self> {
        let ext = path.as_ref().extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "obj" => Some(FileFormat::Obj),
            "off" => Some(FileFormat::Off),
            _ => None,
        }
    }
}

impl fmt::Display for FileFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FileFormat::Obj => "OBJ",
            FileFormat::Off => "OFF",
        }
        .fmt(f)
    }
}

/// Replace the contents of `mesh` with the mesh stored at `path`.
pub fn read(mesh: &mut SurfaceMesh, path: &Path) -> Result<(), MeshError> {
    let format = FileFormat::from_extension(path)
        .ok_or_else(|| MeshError::UnsupportedFormat(path.to_path_buf()))?;
    let source = std::fs::read_to_string(path)?;

    mesh.clear();
    let mut reader = Reader {
        path: path.to_path_buf(),
        mesh,
    };
    match format {
        FileFormat::Obj => reader.obj(&source)?,
        FileFormat::Off => reader.off(&source)?,
    }
    debug!(
        "read {format} {}: {} vertices, {} faces",
        path.display(),
        reader.mesh.n_vertices(),
        reader.mesh.n_faces()
    );
    Ok(())
}

/// `OFF`, optionally prefixed by `C` (vertex colors) then `N` (normals).
/// Extra per-vertex columns are ignored when reading positions.
fn is_off_keyword(keyword: &str) -> bool {
    let rest = keyword.strip_prefix('C').unwrap_or(keyword);
    let rest = rest.strip_prefix('N').unwrap_or(rest);
    rest == "OFF"
}

struct Reader<'m> {
    path: PathBuf,
    mesh: &'m mut SurfaceMesh,
}

impl Reader<'_> {
    fn error(&self, line: usize, message: impl Into<String>) -> MeshError {
        MeshError::Parse {
            path: self.path.clone(),
            line,
            message: message.into(),
        }
    }

    fn scalar(&self, line: usize, token: Option<&str>) -> Result<Scalar, MeshError> {
        let token = token.ok_or_else(|| self.error(line, "missing coordinate"))?;
        token
            .parse()
            .map_err(|_| self.error(line, format!("invalid coordinate '{token}'")))
    }

    fn point<'a>(
        &self,
        line: usize,
        tokens: &mut impl Iterator<Item = &'a str>,
    ) -> Result<Point, MeshError> {
        Ok(Point::new(
            self.scalar(line, tokens.next())?,
            self.scalar(line, tokens.next())?,
            self.scalar(line, tokens.next())?,
        ))
    }

    /// Faces the mesh rejects are skipped, as the wrapped reader does.
    fn add_face(&mut self, line: usize, vertices: &[Vertex]) {
        if let Err(err) = self.mesh.add_face(vertices) {
            warn!("{}:{line}: skipping face: {err}", self.path.display());
        }
    }

    fn obj(&mut self, source: &str) -> Result<(), MeshError> {
        for (i, raw) in source.lines().enumerate() {
            let line = i + 1;
            let mut tokens = raw.split_whitespace();
            match tokens.next() {
                Some("v") => {
                    let p = self.point(line, &mut tokens)?;
                    self.mesh.add_vertex(p);
                }
                Some("f") => {
                    let n = self.mesh.n_vertices() as i64;
                    let vertices = tokens
                        .map(|t| self.obj_index(line, t, n))
                        .collect::<Result<Vec<_>, _>>()?;
                    self.add_face(line, &vertices);
                }
                // normals, texture coordinates, groups, materials, comments
                _ => {}
            }
        }
        Ok(())
    }

    /// `7`, `7/1`, `7//3` or `-1` (relative to the vertices read so far).
    fn obj_index(&self, line: usize, token: &str, n_vertices: i64) -> Result<Vertex, MeshError> {
        let head = token.split('/').next().unwrap_or(token);
        let idx: i64 = head
            .parse()
            .map_err(|_| self.error(line, format!("invalid face index '{token}'")))?;
        let resolved = match idx {
            0 => return Err(self.error(line, "face index 0")),
            i if i > 0 => i - 1,
            i => n_vertices + i,
        };
        if resolved < 0 || resolved >= n_vertices {
            return Err(self.error(line, format!("face index {idx} out of range")));
        }
        Ok(Vertex::from(resolved as usize))
    }

    fn off(&mut self, source: &str) -> Result<(), MeshError> {
        let mut lines = source
            .lines()
            .enumerate()
            .map(|(i, l)| (i + 1, l.split('#').next().unwrap_or("").trim()))
            .filter(|(_, l)| !l.is_empty());

        let (header_line, header) = lines.next().ok_or_else(|| self.error(1, "empty file"))?;
        let mut header_tokens = header.split_whitespace();
        if !header_tokens.next().is_some_and(is_off_keyword) {
            return Err(self.error(header_line, "missing OFF header"));
        }

        // counts may share the header line, `OFF 4 4 6`
        let rest: Vec<&str> = header_tokens.collect();
        let (line, counts) = if rest.is_empty() {
            let (line, record) = lines
                .next()
                .ok_or_else(|| self.error(header_line, "missing element counts"))?;
            (line, record.split_whitespace().collect::<Vec<_>>())
        } else {
            (header_line, rest)
        };
        let counts = counts
            .iter()
            .take(2)
            .map(|t| t.parse::<usize>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|_| self.error(line, "invalid element counts"))?;
        let [n_vertices, n_faces] = counts[..] else {
            return Err(self.error(line, "invalid element counts"));
        };
        self.mesh.reserve(n_vertices, 0, n_faces);

        for _ in 0..n_vertices {
            let (line, record) = lines
                .next()
                .ok_or_else(|| self.error(line, "unexpected end of vertex list"))?;
            let p = self.point(line, &mut record.split_whitespace())?;
            self.mesh.add_vertex(p);
        }

        for _ in 0..n_faces {
            let (line, record) = lines
                .next()
                .ok_or_else(|| self.error(line, "unexpected end of face list"))?;
            let mut tokens = record.split_whitespace();
            let valence: usize = tokens
                .next()
                .and_then(|t| t.parse().ok())
                .ok_or_else(|| self.error(line, "invalid face valence"))?;
            let vertices = tokens
                .take(valence)
                .map(|t| match t.parse::<usize>() {
                    Ok(idx) if idx < n_vertices => Ok(Vertex::from(idx)),
                    _ => Err(self.error(line, format!("invalid face index '{t}'"))),
                })
                .collect::<Result<Vec<_>, _>>()?;
            if vertices.len() != valence {
                return Err(self.error(line, "face record too short"));
            }
            self.add_face(line, &vertices);
        }
        Ok(())
    }
}
