use std::path::{Path, PathBuf};

#[cfg(feature = "stl-io")]
mod stl;

#[cfg(feature = "stl-io")]
pub use stl::{from_stl, load_stl, to_stl_ascii, to_stl_binary, write_stl};

/// Suffix appended to the file stem of a cleaned scan.
pub const CLEANED_SUFFIX: &str = "_cleaned";

/// Generic I/O and format‑conversion errors.
///
/// STL reading and writing is behind the `stl-io` cargo feature; the other
/// variants come from configuration files and batch reports.
#[derive(Debug)]
pub enum IoError {
    StdIo(std::io::Error),

    MalformedInput(String),
    MalformedPath(String),

    /// Error bubbled up from `serde_json` while reading parameters.
    Json(serde_json::Error),

    /// Error bubbled up from the `csv` writer.
    Csv(csv::Error),
}

impl std::fmt::Display for IoError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        use IoError::*;

        match self {
            StdIo(error) => write!(f, "std::io::Error: {error}"),

            MalformedInput(msg) => write!(f, "Input is malformed: {msg}"),
            MalformedPath(msg) => write!(f, "The path is malformed: {msg}"),

            Json(error) => write!(f, "JSON error: {error}"),
            Csv(error) => write!(f, "CSV error: {error}"),
        }
    }
}

impl std::error::Error for IoError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            IoError::StdIo(error) => Some(error),
            IoError::Json(error) => Some(error),
            IoError::Csv(error) => Some(error),
            IoError::MalformedInput(_) | IoError::MalformedPath(_) => None,
        }
    }
}

impl From<std::io::Error> for IoError {
    fn from(value: std::io::Error) -> Self {
        Self::StdIo(value)
    }
}

impl From<serde_json::Error> for IoError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

impl From<csv::Error> for IoError {
    fn from(value: csv::Error) -> Self {
        Self::Csv(value)
    }
}

/// Output location of a cleaned scan: `<out_dir>/<stem>_cleaned.<ext>`.
///
/// The extension of `input` is kept as-is; a file without an extension gets
/// none.
pub fn cleaned_file_path(input: &Path, out_dir: &Path) -> Result<PathBuf, IoError> {
    let stem = input
        .file_stem()
        .and_then(|s| s.to_str())
        .filter(|s| !s.is_empty())
        .ok_or_else(|| IoError::MalformedPath(format!("no file name in {}", input.display())))?;

    let name = match input.extension().and_then(|e| e.to_str()) {
        Some(ext) => format!("{stem}{CLEANED_SUFFIX}.{ext}"),
        None => format!("{stem}{CLEANED_SUFFIX}"),
    };
    Ok(out_dir.join(name))
}
