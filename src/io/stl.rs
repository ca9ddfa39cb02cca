use super::IoError;
use crate::float_types::Real;
use crate::mesh::Mesh;
use core2::io::Cursor;
use nalgebra::Point3;
use std::path::Path;
use tracing::{debug, info};

/// Parse an STL document (binary or ASCII) into an indexed [`Mesh`].
///
/// Coincident corners are welded by `stl_io`; triangles that collapse onto a
/// repeated vertex are dropped.
pub fn from_stl(bytes: &[u8]) -> Result<Mesh, IoError> {
    let mut reader = std::io::Cursor::new(bytes);
    let stl = stl_io::read_stl(&mut reader)
        .map_err(|e| IoError::MalformedInput(format!("STL parse failed: {e}")))?;

    debug!(
        "STL contains {} vertices, {} triangles",
        stl.vertices.len(),
        stl.faces.len()
    );

    let mut mesh = Mesh::with_capacity(stl.vertices.len(), stl.faces.len());
    #[allow(clippy::unnecessary_cast)]
    {
        mesh.vertices.extend(
            stl.vertices
                .iter()
                .map(|v| Point3::new(v.0[0] as Real, v.0[1] as Real, v.0[2] as Real)),
        );
    }

    let mut degenerate = 0usize;
    for face in &stl.faces {
        let [a, b, c] = face.vertices;
        if a != b && b != c && a != c {
            mesh.faces.push([a, b, c]);
        } else {
            degenerate += 1;
        }
    }
    if degenerate > 0 {
        debug!("Dropped {} degenerate triangle(s)", degenerate);
    }

    Ok(mesh)
}

/// Read and parse an STL file.
pub fn load_stl(path: &Path) -> Result<Mesh, IoError> {
    let bytes = std::fs::read(path)?;
    let mesh = from_stl(&bytes)?;
    info!(
        "Loaded {:?}: {} vertices, {} faces",
        path,
        mesh.vertex_count(),
        mesh.face_count()
    );
    Ok(mesh)
}

/// Export to ASCII STL
/// Convert this Mesh to an **ASCII STL** string with the given `name`.
///
/// Facet normals are recomputed from the triangle corners.
pub fn to_stl_ascii(mesh: &Mesh, name: &str) -> String {
    let mut out = String::new();
    out.push_str(&format!("solid {name}\n"));

    for face in &mesh.faces {
        let n = mesh.face_normal(face);
        out.push_str(&format!(
            "  facet normal {:.6} {:.6} {:.6}\n",
            n.x, n.y, n.z
        ));
        out.push_str("    outer loop\n");
        for p in mesh.triangle(face) {
            out.push_str(&format!(
                "      vertex {:.6} {:.6} {:.6}\n",
                p.x, p.y, p.z
            ));
        }
        out.push_str("    endloop\n");
        out.push_str("  endfacet\n");
    }

    out.push_str(&format!("endsolid {name}\n"));
    out
}

/// Export to BINARY STL (returns `Vec<u8>`)
///
/// Binary STL has no room for a solid name; `_name` is accepted for symmetry
/// with [`to_stl_ascii`].
pub fn to_stl_binary(mesh: &Mesh, _name: &str) -> std::io::Result<Vec<u8>> {
    use stl_io::{Normal, Triangle, Vertex, write_stl};

    let mut triangles = Vec::<Triangle>::with_capacity(mesh.face_count());
    for face in &mesh.faces {
        let n = mesh.face_normal(face);
        #[allow(clippy::unnecessary_cast)]
        {
            triangles.push(Triangle {
                normal: Normal::new([n.x as f32, n.y as f32, n.z as f32]),
                vertices: mesh
                    .triangle(face)
                    .map(|p| Vertex::new([p.x as f32, p.y as f32, p.z as f32])),
            });
        }
    }

    let mut cursor = Cursor::new(Vec::new());
    write_stl(&mut cursor, triangles.iter())?;
    Ok(cursor.into_inner())
}

/// Write `mesh` as binary STL to `path`.
pub fn write_stl(mesh: &Mesh, path: &Path) -> Result<(), IoError> {
    let name = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("mesh");
    let bytes = to_stl_binary(mesh, name)?;
    std::fs::write(path, bytes)?;
    info!(
        "Wrote {:?}: {} vertices, {} faces",
        path,
        mesh.vertex_count(),
        mesh.face_count()
    );
    Ok(())
}

impl Mesh {
    pub fn from_stl(bytes: &[u8]) -> Result<Mesh, IoError> {
        self::from_stl(bytes)
    }
    pub fn load_stl(path: &Path) -> Result<Mesh, IoError> {
        self::load_stl(path)
    }
    pub fn to_stl_ascii(&self, name: &str) -> String {
        self::to_stl_ascii(self, name)
    }
    pub fn to_stl_binary(&self, name: &str) -> std::io::Result<Vec<u8>> {
        self::to_stl_binary(self, name)
    }
    pub fn write_stl(&self, path: &Path) -> Result<(), IoError> {
        self::write_stl(self, path)
    }
}
