//! Pipeline errors

use crate::float_types::Real;
use std::fmt::Display;

/// All the ways a single mesh-cleaning run can abort.
///
/// Empty grid cells are *not* an error: they are excluded from the cell
/// statistics and treated as soft tissue by the cutter.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CleanError {
    /// (InvalidConfiguration) A tunable parameter is outside its valid range
    InvalidConfiguration { parameter: &'static str, value: Real, expected: &'static str },
    /// (InsufficientData) The occlusal plane fit is underdetermined
    InsufficientData { cusp_points: usize, segments: usize, reason: &'static str },
    /// (EmptyMesh) The mesh has no vertices to work with
    EmptyMesh,
}

impl CleanError {
    pub(crate) const fn invalid(parameter: &'static str, value: Real, expected: &'static str) -> Self {
        CleanError::InvalidConfiguration { parameter, value, expected }
    }
}

impl Display for CleanError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CleanError::InvalidConfiguration { parameter, value, expected } => write!(
                f,
                "(InvalidConfiguration) `{}` = {} is invalid, expected {}",
                parameter, value, expected
            ),
            CleanError::InsufficientData { cusp_points, segments, reason } => write!(
                f,
                "(InsufficientData) cannot fit an occlusal plane from {} cusp point(s) in {} segment(s): {}",
                cusp_points, segments, reason
            ),
            CleanError::EmptyMesh => write!(f, "(EmptyMesh) the mesh has no vertices"),
        }
    }
}

/// Result alias for the core pipeline.
pub type CleanResult<T> = Result<T, CleanError>;

/// Failure of a whole file run: reading, cleaning or writing.
#[derive(Debug, thiserror::Error)]
pub enum ProcessError {
    #[error(transparent)]
    Clean(#[from] CleanError),

    #[error(transparent)]
    Io(#[from] crate::io::IoError),
}
