//! `Mesh`: an indexed triangle mesh with vertex removal that keeps faces consistent.

use crate::bounds::Bounds;
use crate::float_types::{Real, parry3d::bounding_volume::Aabb};
use crate::plane::Plane;
use nalgebra::{Point3, Vector3};
use std::sync::OnceLock;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// A triangulated surface: vertex positions plus faces indexing into them.
#[derive(Clone, Debug, Default)]
pub struct Mesh {
    /// Vertex positions; faces refer to them by position in this list
    pub vertices: Vec<Point3<Real>>,

    /// Triangles as counter-clockwise vertex index triples
    pub faces: Vec<[usize; 3]>,

    /// Lazily calculated AABB that spans `vertices`.
    pub bounding_box: OnceLock<Aabb>,
}

impl Mesh {
    pub const fn new(vertices: Vec<Point3<Real>>, faces: Vec<[usize; 3]>) -> Self {
        Mesh {
            vertices,
            faces,
            bounding_box: OnceLock::new(),
        }
    }

    pub fn with_capacity(vertices: usize, faces: usize) -> Self {
        Self::new(Vec::with_capacity(vertices), Vec::with_capacity(faces))
    }

    /// Build a mesh from raw coordinate triples, e.g. for tests and synthetic scans.
    pub fn from_coords(coords: &[[Real; 3]], faces: Vec<[usize; 3]>) -> Self {
        Self::new(
            coords.iter().map(|&[x, y, z]| Point3::new(x, y, z)).collect(),
            faces,
        )
    }

    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    #[inline]
    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Axis-aligned bounding box of all vertices (cached after first call).
    ///
    /// An empty mesh reports a degenerate box at the origin.
    pub fn bounding_box(&self) -> Aabb {
        *self.bounding_box.get_or_init(|| {
            Bounds::from_points(&self.vertices)
                .map(Aabb::from)
                .unwrap_or_else(|| Aabb::new(Point3::origin(), Point3::origin()))
        })
    }

    /// Drop the cached bounding box after editing `vertices` directly.
    pub fn invalidate_bounding_box(&mut self) {
        self.bounding_box = OnceLock::new();
    }

    /// Bounds as `(xmin, xmax, ymin, ymax, zmin, zmax)`.
    pub fn bounds(&self) -> Bounds {
        Bounds::from(self.bounding_box())
    }

    /// Unweighted mean of the vertex positions, `None` for an empty mesh.
    pub fn center_of_mass(&self) -> Option<Point3<Real>> {
        if self.vertices.is_empty() {
            return None;
        }
        #[cfg(not(feature = "parallel"))]
        let sum: Vector3<Real> = self.vertices.iter().map(|p| p.coords).sum();
        #[cfg(feature = "parallel")]
        let sum: Vector3<Real> = self
            .vertices
            .par_iter()
            .map(|p| p.coords)
            .reduce(Vector3::zeros, |a, b| a + b);
        Some(Point3::from(sum / self.vertices.len() as Real))
    }

    /// Positions of a triangle's three corners.
    #[inline]
    pub fn triangle(&self, face: &[usize; 3]) -> [Point3<Real>; 3] {
        face.map(|i| self.vertices[i])
    }

    /// Unit facet normal by the right-hand rule; zero for degenerate triangles.
    pub fn face_normal(&self, face: &[usize; 3]) -> Vector3<Real> {
        let [a, b, c] = self.triangle(face);
        (b - a)
            .cross(&(c - a))
            .try_normalize(Real::EPSILON)
            .unwrap_or_else(Vector3::zeros)
    }

    /// **Vertex removal with face repair**
    ///
    /// Deletes every vertex `i` with `remove[i] == true`, deletes every face
    /// that referenced a deleted vertex, and re-indexes the surviving faces.
    /// Faces referencing a vertex index past the end are dropped as well.
    /// Surviving vertices keep their relative order.
    ///
    /// Returns the number of vertices removed.
    ///
    /// # Panics
    /// If `remove.len()` differs from the vertex count.
    pub fn remove_vertices(&mut self, remove: &[bool]) -> usize {
        assert_eq!(
            remove.len(),
            self.vertices.len(),
            "removal mask must cover every vertex"
        );

        let mut remap = vec![usize::MAX; self.vertices.len()];
        let mut kept = Vec::with_capacity(self.vertices.len());
        for (i, (&p, &drop)) in self.vertices.iter().zip(remove).enumerate() {
            if !drop {
                remap[i] = kept.len();
                kept.push(p);
            }
        }
        let removed = self.vertices.len() - kept.len();

        self.faces = self
            .faces
            .iter()
            .filter_map(|f| {
                let mapped = f.map(|i| remap.get(i).copied().unwrap_or(usize::MAX));
                mapped.iter().all(|&i| i != usize::MAX).then_some(mapped)
            })
            .collect();
        self.vertices = kept;
        self.invalidate_bounding_box();
        removed
    }

    /// Clone the mesh and remove the masked vertices from the clone.
    pub fn without_vertices(&self, remove: &[bool]) -> Mesh {
        let mut out = self.clone();
        out.remove_vertices(remove);
        out
    }

    /// Reflect (mirror) this mesh about `plane`.
    ///
    /// Face winding is reversed so the surface keeps facing outwards.
    pub fn mirror(&self, plane: &Plane) -> Mesh {
        let vertices = self.vertices.iter().map(|p| plane.reflect(p)).collect();
        let faces = self.faces.iter().map(|&[a, b, c]| [a, c, b]).collect();
        Mesh::new(vertices, faces)
    }
}
