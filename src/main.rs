//! `dentclean` command line: clean one scan or a folder of scans.

use anyhow::{Context, bail};
use clap::{Args, Parser, Subcommand, ValueEnum};
use dentclean::batch::{self, BatchOutcome};
use dentclean::config::CleaningParams;
use dentclean::cutter::CombinePolicy;
use dentclean::float_types::Real;
use dentclean::pipeline::SoftTissueRemover;
use std::path::{Path, PathBuf};
use tracing::{Level, info};
use tracing_subscriber::FmtSubscriber;

/// Remove soft tissue (gum) from dental arch STL scans
#[derive(Parser)]
#[command(name = "dentclean")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Soft tissue removal for dental arch scans", long_about = None)]
struct Cli {
    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Clean a single STL scan
    Clean {
        file: PathBuf,
        #[command(flatten)]
        params: ParamArgs,
        /// Output folder [default: ~/Dental_data_cleaned]
        #[arg(short, long)]
        out_dir: Option<PathBuf>,
    },
    /// Clean every STL scan in a folder and write a timing report
    Batch {
        dir: PathBuf,
        #[command(flatten)]
        params: ParamArgs,
        /// Output folder [default: ~/Dental_data_cleaned]
        #[arg(short, long)]
        out_dir: Option<PathBuf>,
        /// CSV report path [default: <OUT_DIR>/execution_times.csv]
        #[arg(short, long)]
        report: Option<PathBuf>,
    },
    /// Print the effective parameters as JSON
    Params {
        #[command(flatten)]
        params: ParamArgs,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Preset {
    Default,
    Fine,
    Coarse,
    InclusionOnly,
}

/// Parameter sources, later ones win: preset, JSON file, flags.
#[derive(Args)]
struct ParamArgs {
    #[arg(long, value_enum, default_value = "default")]
    preset: Preset,
    /// JSON parameter file
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Grid cell size in mm
    #[arg(long)]
    cell_size: Option<Real>,
    /// Inclusion criterion: depth below each cell's cusp kept as tooth, in mm
    #[arg(long)]
    inclusion: Option<Real>,
    /// Distance threshold ratio in [0, 1]
    #[arg(long)]
    ratio: Option<Real>,
    /// Only apply the inclusion threshold cut
    #[arg(long)]
    inclusion_only: bool,
}

impl ParamArgs {
    fn resolve(&self) -> anyhow::Result<CleaningParams> {
        let mut params = match &self.config {
            Some(path) => CleaningParams::from_json_file(path)
                .with_context(|| format!("reading parameters from {}", path.display()))?,
            None => match self.preset {
                Preset::Default => CleaningParams::default(),
                Preset::Fine => CleaningParams::fine(),
                Preset::Coarse => CleaningParams::coarse(),
                Preset::InclusionOnly => CleaningParams::inclusion_only(),
            },
        };
        if let Some(v) = self.cell_size {
            params = params.cell_size(v);
        }
        if let Some(v) = self.inclusion {
            params = params.inclusion_criterion(v);
        }
        if let Some(v) = self.ratio {
            params = params.distance_threshold_ratio(v);
        }
        if self.inclusion_only {
            params = params.combine(CombinePolicy::InclusionOnly);
        }
        params.validate()?;
        Ok(params)
    }
}

fn default_out_dir() -> PathBuf {
    std::env::var_os("HOME")
        .map(PathBuf::from)
        .unwrap_or_default()
        .join("Dental_data_cleaned")
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let level = match cli.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    match cli.command {
        Commands::Clean {
            file,
            params,
            out_dir,
        } => clean(&file, params.resolve()?, &out_dir.unwrap_or_else(default_out_dir)),
        Commands::Batch {
            dir,
            params,
            out_dir,
            report,
        } => {
            let out_dir = out_dir.unwrap_or_else(default_out_dir);
            let report = report.unwrap_or_else(|| out_dir.join("execution_times.csv"));
            run_batch(&dir, params.resolve()?, &out_dir, &report)
        }
        Commands::Params { params } => {
            println!("{}", params.resolve()?.to_json_string()?);
            Ok(())
        }
    }
}

fn clean(file: &Path, params: CleaningParams, out_dir: &Path) -> anyhow::Result<()> {
    let remover = SoftTissueRemover::new(params)?;
    let cleaned = remover
        .clean_file(file, out_dir)
        .with_context(|| format!("cleaning {}", file.display()))?;
    info!(
        "Saved {} ({:.1}% of vertices removed)",
        cleaned.output.display(),
        cleaned.report.removed_fraction() * 100.0
    );
    Ok(())
}

fn run_batch(dir: &Path, params: CleaningParams, out_dir: &Path, report: &Path) -> anyhow::Result<()> {
    let records = batch::process_folder(dir, params, out_dir)
        .with_context(|| format!("processing folder {}", dir.display()))?;
    if records.is_empty() {
        bail!("no .stl files found in {}", dir.display());
    }

    if let Some(parent) = report.parent() {
        std::fs::create_dir_all(parent)?;
    }
    batch::write_csv_report(&records, report)
        .with_context(|| format!("writing report {}", report.display()))?;

    let failed = records
        .iter()
        .filter(|r| matches!(r.outcome, BatchOutcome::Failed(_)))
        .count();
    info!(
        "{} file(s) cleaned, {} failed; report at {}",
        records.len() - failed,
        failed,
        report.display()
    );
    Ok(())
}
