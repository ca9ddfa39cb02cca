//! Jaw orientation normalization.
//!
//! Scanners export upper arches with the cusps pointing down. The pipeline
//! expects cusps up, so upper jaws are mirrored across the horizontal plane
//! through their bounding-box center before cleaning and mirrored back after.

use crate::mesh::Mesh;
use crate::plane::Plane;
use std::path::Path;

/// Which arch a scan shows, as far as its file name tells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JawKind {
    Upper,
    Lower,
    Unknown,
}

impl JawKind {
    /// Case-insensitive match on "upper", then "lower".
    pub fn from_file_name(name: &str) -> Self {
        let name = name.to_lowercase();
        if name.contains("upper") {
            JawKind::Upper
        } else if name.contains("lower") {
            JawKind::Lower
        } else {
            JawKind::Unknown
        }
    }

    /// Classify by the final path component only.
    pub fn from_path(path: &Path) -> Self {
        path.file_name()
            .and_then(|n| n.to_str())
            .map(Self::from_file_name)
            .unwrap_or(JawKind::Unknown)
    }
}

/// The transform that brought a scan into cusps-up orientation.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Orientation {
    mirror: Option<Plane>,
}

impl Orientation {
    pub const IDENTITY: Orientation = Orientation { mirror: None };

    /// Orient `mesh` for cleaning. Returns the oriented copy and the
    /// transform needed to undo it.
    pub fn for_jaw(kind: JawKind, mesh: &Mesh) -> (Mesh, Orientation) {
        match kind {
            JawKind::Upper => {
                let center = mesh.bounds().center();
                let orientation = Orientation {
                    mirror: Some(Plane::horizontal(center)),
                };
                (orientation.apply(mesh), orientation)
            }
            JawKind::Lower | JawKind::Unknown => (mesh.clone(), Orientation::IDENTITY),
        }
    }

    pub const fn is_mirrored(&self) -> bool {
        self.mirror.is_some()
    }

    pub fn apply(&self, mesh: &Mesh) -> Mesh {
        match &self.mirror {
            Some(plane) => mesh.mirror(plane),
            None => mesh.clone(),
        }
    }

    /// Bring a mesh produced in the oriented frame back to the scan's frame.
    pub fn restore(&self, mesh: &Mesh) -> Mesh {
        // a reflection is its own inverse
        self.apply(mesh)
    }
}
