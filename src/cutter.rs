//! Two-stage soft tissue removal against a grid partition.
//!
//! - **coarse**: whole cells whose cusp sits too far below the top of the
//!   scan hold no tooth and are dropped, together with empty cells
//! - **fine**: inside the remaining cells, points lower than the cell's
//!   inclusion threshold are gum margin and are dropped
//!
//! Both stages classify the same input mesh; the removal sets are then
//! combined according to a [`CombinePolicy`].

use crate::errors::{CleanError, CleanResult};
use crate::float_types::Real;
use crate::grid::{GridPartition, HeightRange};
use crate::mesh::Mesh;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// How the coarse and fine removal sets make up the cleaned mesh.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CombinePolicy {
    /// Remove every vertex flagged by either stage
    #[default]
    Union,
    /// Apply only the fine stage; the coarse stage is still computed and
    /// reported. Matches the historical output of the clinic scripts.
    InclusionOnly,
}

/// Per-vertex removal flags of both stages.
#[derive(Clone, Debug, PartialEq)]
pub struct Classification {
    pub z_threshold: Real,
    pub coarse: Vec<bool>,
    pub fine: Vec<bool>,
    /// Non-empty cells rejected by the coarse stage
    pub rejected_cells: Vec<usize>,
}

impl Classification {
    pub fn coarse_count(&self) -> usize {
        self.coarse.iter().filter(|&&f| f).count()
    }

    pub fn fine_count(&self) -> usize {
        self.fine.iter().filter(|&&f| f).count()
    }

    /// Final removal mask under `policy`.
    pub fn removal_mask(&self, policy: CombinePolicy) -> Vec<bool> {
        match policy {
            CombinePolicy::Union => self
                .coarse
                .iter()
                .zip(&self.fine)
                .map(|(&a, &b)| a || b)
                .collect(),
            CombinePolicy::InclusionOnly => self.fine.clone(),
        }
    }
}

#[derive(Clone, Debug)]
pub struct CutResult {
    /// The cleaned clone of the input mesh
    pub mesh: Mesh,
    pub z_threshold: Real,
    /// Vertices flagged by the coarse stage
    pub coarse_flagged: usize,
    /// Vertices flagged by the fine stage
    pub fine_flagged: usize,
    /// Vertices actually deleted
    pub removed: usize,
    pub rejected_cells: Vec<usize>,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ThresholdCutter {
    distance_threshold_ratio: Real,
    policy: CombinePolicy,
}

impl ThresholdCutter {
    /// `distance_threshold_ratio` must lie in `[0, 1]`.
    pub fn new(distance_threshold_ratio: Real, policy: CombinePolicy) -> CleanResult<Self> {
        if !(0.0..=1.0).contains(&distance_threshold_ratio) {
            return Err(CleanError::invalid(
                "distance_threshold_ratio",
                distance_threshold_ratio,
                "a ratio in [0, 1]",
            ));
        }
        Ok(Self {
            distance_threshold_ratio,
            policy,
        })
    }

    pub const fn distance_threshold_ratio(&self) -> Real {
        self.distance_threshold_ratio
    }

    pub const fn policy(&self) -> CombinePolicy {
        self.policy
    }

    /// `max - span * ratio`: cusps lower than this mark soft-tissue cells.
    ///
    /// Evaluated as a lerp so ratio 0 gives exactly `max` and ratio 1
    /// exactly `min`.
    #[inline]
    pub fn z_threshold(&self, range: &HeightRange) -> Real {
        let t = self.distance_threshold_ratio;
        (1.0 - t) * range.max + t * range.min
    }

    /// Flag every vertex of `mesh` for both stages.
    ///
    /// Vertices are located by position in the partition's grid, so any mesh
    /// lying in the partitioned footprint can be classified, not only the
    /// partitioned one. Vertices outside the footprint are never flagged.
    pub fn classify(&self, mesh: &Mesh, partition: &GridPartition) -> Classification {
        let z_threshold = self.z_threshold(&partition.height_range);

        let rejected_cells: Vec<usize> = partition
            .highest_points
            .iter()
            .filter(|(_, hp)| hp.height < z_threshold)
            .map(|(&c, _)| c)
            .collect();

        let mut coarse = vec![false; mesh.vertex_count()];
        let mut fine = vec![false; mesh.vertex_count()];
        for (i, p) in mesh.vertices.iter().enumerate() {
            let Some(cell) = partition.locate(p.x, p.y) else {
                continue;
            };
            let height = partition.height_of(p);

            coarse[i] = match partition.highest_points.get(&cell) {
                Some(hp) => hp.height < z_threshold,
                // no cusp at all: soft tissue
                None => true,
            };
            if let Some(&threshold) = partition.inclusion_thresholds.get(&cell) {
                fine[i] = height < threshold;
            }
        }

        Classification {
            z_threshold,
            coarse,
            fine,
            rejected_cells,
        }
    }

    /// Clone `mesh` and delete the flagged vertices (and their faces) from the clone.
    pub fn cut(&self, mesh: &Mesh, partition: &GridPartition) -> CutResult {
        let classification = self.classify(mesh, partition);
        let mask = classification.removal_mask(self.policy);

        let mut cleaned = mesh.clone();
        let removed = cleaned.remove_vertices(&mask);

        debug!(
            "z threshold {:.3}: coarse flagged {} ({} cells), fine flagged {}, removed {} of {}",
            classification.z_threshold,
            classification.coarse_count(),
            classification.rejected_cells.len(),
            classification.fine_count(),
            removed,
            mesh.vertex_count()
        );

        CutResult {
            mesh: cleaned,
            z_threshold: classification.z_threshold,
            coarse_flagged: classification.coarse_count(),
            fine_flagged: classification.fine_count(),
            removed,
            rejected_cells: classification.rejected_cells,
        }
    }
}

/// One-shot form of [`ThresholdCutter::cut`].
pub fn cut(
    mesh: &Mesh,
    partition: &GridPartition,
    distance_threshold_ratio: Real,
    policy: CombinePolicy,
) -> CleanResult<CutResult> {
    Ok(ThresholdCutter::new(distance_threshold_ratio, policy)?.cut(mesh, partition))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::partition;
    use nalgebra::Vector3;

    /// Two 10×10 cells side by side: a tall tooth on the left (cusp 10),
    /// a low gum patch on the right (top 2).
    fn tooth_and_gum() -> Mesh {
        Mesh::from_coords(
            &[
                [0.0, 0.0, 0.0],
                [5.0, 5.0, 10.0],
                [8.0, 2.0, 8.5],
                [2.0, 8.0, 4.0],
                [15.0, 5.0, 2.0],
                [19.0, 9.0, 1.0],
                [20.0, 10.0, 0.5],
            ],
            vec![[0, 1, 2], [1, 3, 0], [4, 5, 6], [2, 4, 1]],
        )
    }

    fn grid(mesh: &Mesh, inclusion: Real) -> GridPartition {
        partition(&mesh.bounds(), 10.0, &Vector3::z(), inclusion, &mesh.vertices).expect("grid")
    }

    #[test]
    fn ratio_must_be_a_fraction() {
        assert!(ThresholdCutter::new(-0.1, CombinePolicy::Union).is_err());
        assert!(ThresholdCutter::new(1.5, CombinePolicy::Union).is_err());
        assert!(ThresholdCutter::new(Real::NAN, CombinePolicy::Union).is_err());
        assert!(ThresholdCutter::new(0.0, CombinePolicy::Union).is_ok());
        assert!(ThresholdCutter::new(1.0, CombinePolicy::Union).is_ok());
    }

    #[test]
    fn union_removes_gum_cell_and_margin() {
        let mesh = tooth_and_gum();
        let g = grid(&mesh, 3.0);
        let cutter = ThresholdCutter::new(0.5, CombinePolicy::Union).expect("cutter");
        let c = cutter.classify(&mesh, &g);
        // span 10, ratio 0.5 => threshold 5; right cell cusp 2 < 5
        assert_eq!(c.z_threshold, 5.0);
        assert_eq!(c.rejected_cells, vec![1]);
        assert_eq!(c.coarse, vec![false, false, false, false, true, true, true]);
        // left threshold 7: 0 and 3 are gum margin; right threshold -1 keeps all
        assert_eq!(c.fine, vec![true, false, false, true, false, false, false]);

        let out = cutter.cut(&mesh, &g);
        assert_eq!(out.removed, 5);
        assert_eq!(out.mesh.vertex_count(), 2);
        assert_eq!(out.mesh.face_count(), 0);
        assert_eq!(mesh.vertex_count(), 7);
    }

    #[test]
    fn inclusion_only_ignores_the_coarse_stage() {
        let mesh = tooth_and_gum();
        let g = grid(&mesh, 3.0);
        let out = ThresholdCutter::new(0.5, CombinePolicy::InclusionOnly)
            .expect("cutter")
            .cut(&mesh, &g);
        assert_eq!(out.coarse_flagged, 3);
        assert_eq!(out.fine_flagged, 2);
        assert_eq!(out.removed, 2);
        // only faces free of vertices 0 and 3 survive
        assert_eq!(out.mesh.face_count(), 2);
    }

    #[test]
    fn second_pass_is_a_fixed_point() {
        let mesh = tooth_and_gum();
        let g = grid(&mesh, 3.0);
        let cutter = ThresholdCutter::new(0.5, CombinePolicy::Union).expect("cutter");
        let once = cutter.cut(&mesh, &g);
        let twice = cutter.cut(&once.mesh, &g);
        assert_eq!(twice.removed, 0);
        assert_eq!(twice.mesh.vertices, once.mesh.vertices);
    }
}
