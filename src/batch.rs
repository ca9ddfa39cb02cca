//! Folder batch processing and the timing report.

use crate::io::IoError;
use std::path::{Path, PathBuf};
use std::time::Duration;

#[cfg(feature = "stl-io")]
use crate::{config::CleaningParams, errors::ProcessError, pipeline::SoftTissueRemover};
#[cfg(feature = "stl-io")]
use std::time::Instant;
#[cfg(feature = "stl-io")]
use tracing::{info, warn};

#[cfg(all(feature = "stl-io", feature = "parallel"))]
use rayon::prelude::*;

/// Header of the timing report.
pub const REPORT_HEADER: [&str; 2] = ["File Name", "Execution Time (Seconds)"];

/// Report cell written for files that failed.
pub const FAILED_MARKER: &str = "ERROR";

#[derive(Debug, Clone, PartialEq)]
pub enum BatchOutcome {
    Cleaned {
        output: PathBuf,
        input_vertices: usize,
        removed_vertices: usize,
    },
    /// The file was skipped; the message is the rendered error
    Failed(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct BatchRecord {
    pub file_name: String,
    pub path: PathBuf,
    /// Wall-clock time of load, clean and write
    pub elapsed: Duration,
    pub outcome: BatchOutcome,
}

impl BatchRecord {
    pub fn is_success(&self) -> bool {
        matches!(self.outcome, BatchOutcome::Cleaned { .. })
    }

    /// The report's time column: seconds, or [`FAILED_MARKER`].
    pub fn time_cell(&self) -> String {
        match self.outcome {
            BatchOutcome::Cleaned { .. } => format!("{:.4}", self.elapsed.as_secs_f64()),
            BatchOutcome::Failed(_) => FAILED_MARKER.to_string(),
        }
    }
}

/// `.stl` files (any letter case) directly inside `dir`, sorted by name.
pub fn stl_files(dir: &Path) -> Result<Vec<PathBuf>, IoError> {
    if !dir.is_dir() {
        return Err(IoError::MalformedPath(format!("{} is not a directory", dir.display())));
    }
    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        let is_stl = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("stl"));
        if is_stl && path.is_file() {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// Clean every STL scan in `dir`, writing results into `out_dir`.
///
/// A failing file is recorded as [`BatchOutcome::Failed`] and the batch goes
/// on. Only invalid parameters and an unreadable folder fail the whole call.
#[cfg(feature = "stl-io")]
pub fn process_folder(
    dir: &Path,
    params: CleaningParams,
    out_dir: &Path,
) -> Result<Vec<BatchRecord>, ProcessError> {
    let remover = SoftTissueRemover::new(params)?;
    let files = stl_files(dir)?;
    info!("Processing {} STL file(s) from {:?}", files.len(), dir);

    #[cfg(not(feature = "parallel"))]
    let records = files
        .iter()
        .map(|path| process_file(&remover, path, out_dir))
        .collect();
    #[cfg(feature = "parallel")]
    let records = files
        .par_iter()
        .map(|path| process_file(&remover, path, out_dir))
        .collect();

    Ok(records)
}

#[cfg(feature = "stl-io")]
fn process_file(remover: &SoftTissueRemover, path: &Path, out_dir: &Path) -> BatchRecord {
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    let start = Instant::now();
    let result = remover.clean_file(path, out_dir);
    let elapsed = start.elapsed();

    let outcome = match result {
        Ok(cleaned) => {
            info!(
                "{} cleaned in {:.3}s ({} of {} vertices removed)",
                file_name,
                elapsed.as_secs_f64(),
                cleaned.report.removed_vertices,
                cleaned.report.input_vertices
            );
            BatchOutcome::Cleaned {
                output: cleaned.output,
                input_vertices: cleaned.report.input_vertices,
                removed_vertices: cleaned.report.removed_vertices,
            }
        }
        Err(e) => {
            warn!("{} failed: {}", file_name, e);
            BatchOutcome::Failed(e.to_string())
        }
    };

    BatchRecord {
        file_name,
        path: path.to_path_buf(),
        elapsed,
        outcome,
    }
}

/// Write the timing table to any writer.
pub fn write_csv<W: std::io::Write>(records: &[BatchRecord], writer: W) -> Result<(), IoError> {
    let mut csv = csv::Writer::from_writer(writer);
    csv.write_record(REPORT_HEADER)?;
    for record in records {
        csv.write_record([record.file_name.as_str(), record.time_cell().as_str()])?;
    }
    csv.flush()?;
    Ok(())
}

/// Write the timing table to `path`.
pub fn write_csv_report(records: &[BatchRecord], path: &Path) -> Result<(), IoError> {
    let file = std::fs::File::create(path)?;
    write_csv(records, std::io::BufWriter::new(file))
}
