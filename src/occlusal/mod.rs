//! Occlusal plane estimation.
//!
//! The chewing surface of an arch is approximated by a plane through the
//! cusp tips. Cusps are sampled as the highest vertex of each quadrant of the
//! upper half of the scan, where the quadrants follow the arch's own
//! principal horizontal directions rather than the scanner's XY axes.

pub mod pca;
pub mod segment;

pub use pca::{PrincipalAxes, principal_axes};
pub use segment::{Segmentation, highest_vertex, split_by_planes};

use crate::errors::{CleanError, CleanResult};
use crate::float_types::Real;
use crate::mesh::Mesh;
use crate::plane::Plane;
use nalgebra::Point3;
use tracing::debug;

/// Cusp points needed for a well-posed plane fit.
pub const MIN_CUSP_POINTS: usize = 3;

/// Everything the estimator derived on the way to the plane.
#[derive(Debug, Clone)]
pub struct OcclusalEstimate {
    /// Best-fit occlusal plane (normal oriented towards +Z)
    pub plane: Plane,
    /// Principal horizontal axes of the retained upper half
    pub axes: PrincipalAxes,
    /// Vertex indices of each non-empty quadrant
    pub segments: Vec<Vec<usize>>,
    /// Index of the cusp (highest vertex) of each segment, in segment order
    pub cusps: Vec<usize>,
}

/// **Occlusal plane estimator**
///
/// 1. keep vertices on or above the horizontal plane through the center of mass
/// 2. PCA of their XY projection gives two horizontal axes
/// 3. split by the vertical plane through the center of mass normal to axis 1,
///    then split each non-empty half normal to axis 2
/// 4. the highest vertex of every segment is a cusp
/// 5. least-squares plane through the cusps
#[derive(Debug, Clone, Copy, Default)]
pub struct OcclusalPlaneEstimator;

impl OcclusalPlaneEstimator {
    pub const fn new() -> Self {
        Self
    }

    /// Estimate the occlusal plane of an orientation-normalized (cusps up) mesh.
    pub fn estimate(&self, mesh: &Mesh, center_of_mass: &Point3<Real>) -> CleanResult<Plane> {
        self.estimate_detailed(mesh, center_of_mass).map(|e| e.plane)
    }

    /// Like [`estimate`](Self::estimate), but also returns the axes, segments and cusps.
    pub fn estimate_detailed(
        &self,
        mesh: &Mesh,
        center_of_mass: &Point3<Real>,
    ) -> CleanResult<OcclusalEstimate> {
        let points = &mesh.vertices;

        let bisector = Plane::horizontal(*center_of_mass);
        let upper: Vec<usize> = (0..points.len())
            .filter(|&i| bisector.is_front(&points[i]))
            .collect();
        debug!(
            "Bisection at z = {:.3} kept {} of {} vertices",
            center_of_mass.z,
            upper.len(),
            points.len()
        );

        if upper.len() < MIN_CUSP_POINTS {
            return Err(CleanError::InsufficientData {
                cusp_points: upper.len(),
                segments: usize::from(!upper.is_empty()),
                reason: "too few vertices above the center of mass",
            });
        }

        let axes = principal_axes(upper.iter().map(|&i| &points[i])).ok_or(
            CleanError::InsufficientData {
                cusp_points: 0,
                segments: 0,
                reason: "covariance of the upper half is undefined",
            },
        )?;
        debug!(
            "Principal axes {:?} / {:?}, variances {:.4} / {:.4}",
            axes.axes[0], axes.axes[1], axes.variances[0], axes.variances[1]
        );

        let cutting_planes = axes.axes.map(|a| Plane::vertical(*center_of_mass, &a));
        let Segmentation { segments, pruned } = split_by_planes(points, upper, &cutting_planes);
        debug!("{} segment(s), {} empty half(s) pruned", segments.len(), pruned);

        let cusps: Vec<usize> = segments
            .iter()
            .filter_map(|s| highest_vertex(points, s))
            .collect();

        if segments.len() < 2 || cusps.len() < MIN_CUSP_POINTS {
            return Err(CleanError::InsufficientData {
                cusp_points: cusps.len(),
                segments: segments.len(),
                reason: "too few non-empty quadrants",
            });
        }

        let cusp_points: Vec<Point3<Real>> = cusps.iter().map(|&i| points[i]).collect();
        let plane = Plane::fit_points(&cusp_points).ok_or(CleanError::InsufficientData {
            cusp_points: cusps.len(),
            segments: segments.len(),
            reason: "cusp points are collinear",
        })?;

        debug!(
            "Occlusal plane through ({:.3}, {:.3}, {:.3}) with normal ({:.4}, {:.4}, {:.4})",
            plane.point.x, plane.point.y, plane.point.z, plane.normal.x, plane.normal.y, plane.normal.z
        );

        Ok(OcclusalEstimate {
            plane,
            axes,
            segments,
            cusps,
        })
    }
}
