//! Tunable parameters of a cleaning run.

use crate::cutter::{CombinePolicy, ThresholdCutter};
use crate::errors::CleanResult;
use crate::float_types::Real;
use crate::grid::GridPartitioner;
use crate::io::IoError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Parameters for soft tissue removal.
///
/// All lengths are in mesh units, which for intraoral scans means millimetres.
/// Missing fields in a JSON file fall back to [`CleaningParams::default`].
///
/// ```
/// use dentclean::config::CleaningParams;
///
/// let params = CleaningParams::default().cell_size(1.5);
/// assert!(params.validate().is_ok());
/// assert!(CleaningParams::default().cell_size(0.0).validate().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CleaningParams {
    /// Edge length of the square grid cells (> 0)
    pub cell_size: Real,

    /// Depth below a cell's cusp that still counts as tooth (≥ 0)
    pub inclusion_criterion: Real,

    /// Fraction of the height range below the top of the scan at which
    /// a cell cusp is considered soft tissue, in `[0, 1]`
    pub distance_threshold_ratio: Real,

    pub combine: CombinePolicy,
}

impl Default for CleaningParams {
    fn default() -> Self {
        Self {
            cell_size: 2.0,           // roughly one cusp per cell on a molar
            inclusion_criterion: 1.0, // 1mm below the cusp
            distance_threshold_ratio: 0.5,
            combine: CombinePolicy::Union,
        }
    }
}

impl CleaningParams {
    /// Small cells and a shallow inclusion band for high resolution scans.
    #[must_use]
    pub const fn fine() -> Self {
        Self {
            cell_size: 1.0,
            inclusion_criterion: 0.5,
            distance_threshold_ratio: 0.5,
            combine: CombinePolicy::Union,
        }
    }

    /// Large cells for decimated or noisy scans.
    #[must_use]
    pub const fn coarse() -> Self {
        Self {
            cell_size: 4.0,
            inclusion_criterion: 2.0,
            distance_threshold_ratio: 0.5,
            combine: CombinePolicy::Union,
        }
    }

    /// Fine-stage-only output, matching the clinic's historical exports.
    #[must_use]
    pub const fn inclusion_only() -> Self {
        Self {
            cell_size: 2.0,
            inclusion_criterion: 1.0,
            distance_threshold_ratio: 0.5,
            combine: CombinePolicy::InclusionOnly,
        }
    }

    /// Set the grid cell size.
    #[must_use]
    pub const fn cell_size(mut self, cell_size: Real) -> Self {
        self.cell_size = cell_size;
        self
    }

    /// Set the inclusion criterion.
    #[must_use]
    pub const fn inclusion_criterion(mut self, inclusion_criterion: Real) -> Self {
        self.inclusion_criterion = inclusion_criterion;
        self
    }

    /// Set the distance threshold ratio.
    #[must_use]
    pub const fn distance_threshold_ratio(mut self, ratio: Real) -> Self {
        self.distance_threshold_ratio = ratio;
        self
    }

    #[must_use]
    pub const fn combine(mut self, combine: CombinePolicy) -> Self {
        self.combine = combine;
        self
    }

    /// Reject out-of-range values with [`CleanError::InvalidConfiguration`](crate::errors::CleanError).
    pub fn validate(&self) -> CleanResult<()> {
        self.partitioner()?;
        self.cutter()?;
        Ok(())
    }

    pub fn partitioner(&self) -> CleanResult<GridPartitioner> {
        GridPartitioner::new(self.cell_size, self.inclusion_criterion)
    }

    pub fn cutter(&self) -> CleanResult<ThresholdCutter> {
        ThresholdCutter::new(self.distance_threshold_ratio, self.combine)
    }

    pub fn from_json_str(json: &str) -> Result<Self, IoError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_json_file(path: &Path) -> Result<Self, IoError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    pub fn to_json_string(&self) -> Result<String, IoError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
