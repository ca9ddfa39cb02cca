//! End-to-end cleaning of one scan: estimate → partition → cut.

use crate::bounds::Bounds;
use crate::config::CleaningParams;
use crate::cutter::ThresholdCutter;
use crate::errors::{CleanError, CleanResult};
use crate::float_types::Real;
use crate::grid::GridPartitioner;
use crate::mesh::Mesh;
use crate::occlusal::OcclusalPlaneEstimator;
use crate::plane::Plane;
use nalgebra::Point3;
use tracing::info;

#[cfg(feature = "stl-io")]
use crate::{
    errors::ProcessError,
    io::cleaned_file_path,
    orientation::{JawKind, Orientation},
};
#[cfg(feature = "stl-io")]
use std::path::{Path, PathBuf};

/// Per-run view of the mesh shared by every stage.
#[derive(Debug, Clone, Copy)]
pub struct PipelineContext<'a> {
    pub vertices: &'a [Point3<Real>],
    pub center_of_mass: Point3<Real>,
    pub bounds: Bounds,
}

impl<'a> PipelineContext<'a> {
    pub fn new(mesh: &'a Mesh) -> CleanResult<Self> {
        let center_of_mass = mesh.center_of_mass().ok_or(CleanError::EmptyMesh)?;
        Ok(Self {
            vertices: &mesh.vertices,
            center_of_mass,
            bounds: mesh.bounds(),
        })
    }
}

/// Outcome of [`SoftTissueRemover::clean`].
#[derive(Debug, Clone)]
pub struct CleanReport {
    /// The cleaned mesh, in the frame it was handed in
    pub mesh: Mesh,
    pub occlusal_plane: Plane,
    pub cusps: Vec<Point3<Real>>,
    pub cell_count: usize,
    pub non_empty_cells: usize,
    pub rejected_cells: usize,
    pub z_threshold: Real,
    pub coarse_flagged: usize,
    pub fine_flagged: usize,
    pub input_vertices: usize,
    pub removed_vertices: usize,
}

impl CleanReport {
    /// Share of the input vertices that were deleted, in `[0, 1]`.
    pub fn removed_fraction(&self) -> Real {
        if self.input_vertices == 0 {
            0.0
        } else {
            self.removed_vertices as Real / self.input_vertices as Real
        }
    }
}

/// A scan cleaned from disk.
#[cfg(feature = "stl-io")]
#[derive(Debug, Clone)]
pub struct CleanedFile {
    pub input: PathBuf,
    pub output: PathBuf,
    pub jaw: JawKind,
    /// Report with the mesh restored to the scan's original frame
    pub report: CleanReport,
}

/// **Soft tissue remover**
///
/// Validated parameters plus the three stages, reusable across meshes.
#[derive(Debug, Clone, Copy)]
pub struct SoftTissueRemover {
    params: CleaningParams,
    estimator: OcclusalPlaneEstimator,
    partitioner: GridPartitioner,
    cutter: ThresholdCutter,
}

impl SoftTissueRemover {
    pub fn new(params: CleaningParams) -> CleanResult<Self> {
        Ok(Self {
            params,
            estimator: OcclusalPlaneEstimator::new(),
            partitioner: params.partitioner()?,
            cutter: params.cutter()?,
        })
    }

    pub const fn params(&self) -> &CleaningParams {
        &self.params
    }

    /// Clean a mesh whose cusps point towards +Z.
    ///
    /// The input is not modified. Fails without a partial result when the mesh
    /// is empty or the occlusal plane cannot be estimated.
    pub fn clean(&self, mesh: &Mesh) -> CleanResult<CleanReport> {
        let ctx = PipelineContext::new(mesh)?;
        info!(
            "Cleaning mesh: {} vertices, {} faces",
            mesh.vertex_count(),
            mesh.face_count()
        );

        let estimate = self.estimator.estimate_detailed(mesh, &ctx.center_of_mass)?;
        info!(
            "Occlusal plane from {} cusps, tilt {:.2}°",
            estimate.cusps.len(),
            estimate.plane.angle_to(&nalgebra::Vector3::z()).to_degrees()
        );

        let partition = self
            .partitioner
            .partition(&ctx.bounds, &estimate.plane.normal, ctx.vertices)?;
        info!(
            "Grid of {} cells, {} populated",
            partition.cell_count(),
            partition.non_empty_cell_count()
        );

        let cut = self.cutter.cut(mesh, &partition);
        info!(
            "Removed {} of {} vertices ({} faces left)",
            cut.removed,
            mesh.vertex_count(),
            cut.mesh.face_count()
        );

        Ok(CleanReport {
            occlusal_plane: estimate.plane,
            cusps: estimate.cusps.iter().map(|&i| ctx.vertices[i]).collect(),
            cell_count: partition.cell_count(),
            non_empty_cells: partition.non_empty_cell_count(),
            rejected_cells: cut.rejected_cells.len(),
            z_threshold: cut.z_threshold,
            coarse_flagged: cut.coarse_flagged,
            fine_flagged: cut.fine_flagged,
            input_vertices: mesh.vertex_count(),
            removed_vertices: cut.removed,
            mesh: cut.mesh,
        })
    }

    /// Load an STL scan, orient it by its file name, clean it and write
    /// `<stem>_cleaned.<ext>` into `out_dir` (created if missing).
    #[cfg(feature = "stl-io")]
    pub fn clean_file(&self, input: &Path, out_dir: &Path) -> Result<CleanedFile, ProcessError> {
        let mesh = Mesh::load_stl(input)?;
        let jaw = JawKind::from_path(input);
        let (oriented, orientation) = Orientation::for_jaw(jaw, &mesh);
        info!("{:?}: {:?} jaw, mirrored: {}", input, jaw, orientation.is_mirrored());

        let mut report = self.clean(&oriented)?;
        report.mesh = orientation.restore(&report.mesh);

        std::fs::create_dir_all(out_dir).map_err(crate::io::IoError::from)?;
        let output = cleaned_file_path(input, out_dir)?;
        report.mesh.write_stl(&output)?;

        Ok(CleanedFile {
            input: input.to_path_buf(),
            output,
            jaw,
            report,
        })
    }
}

/// One-shot form of [`SoftTissueRemover::clean`].
pub fn remove_soft_tissue(mesh: &Mesh, params: CleaningParams) -> CleanResult<CleanReport> {
    SoftTissueRemover::new(params)?.clean(mesh)
}
