//! **Soft tissue removal** for intraoral dental arch scans.
//!
//! A scan of a dental arch contains the teeth and the surrounding gum. This
//! crate strips the gum in three stages:
//!
//! 1. [occlusal] estimates the chewing plane from the cusp tips
//! 2. [grid] tiles the footprint into cells and finds each cell's cusp
//! 3. [cutter] drops cells that hold no tooth and points below each cusp's
//!    inclusion band
//!
//! [`pipeline::SoftTissueRemover`] runs the stages on one mesh or one file,
//! and [`batch`] cleans whole folders with a CSV timing report.
//!
//! # Features
//! #### Default
//! - **f64**: use f64 as Real
//! - [**stl-io**](https://en.wikipedia.org/wiki/STL_(file_format)): `.stl` import/export and the `dentclean` binary
//!
//! #### Optional
//! - **f32**: use f32 as Real, this conflicts with f64
//! - **parallel**: use rayon for per-vertex work and for batch folders

#![forbid(unsafe_code)]
#![deny(unused)]
#![warn(clippy::missing_const_for_fn, clippy::approx_constant, clippy::all)]

pub mod batch;
pub mod bounds;
pub mod config;
pub mod cutter;
pub mod errors;
pub mod float_types;
pub mod grid;
pub mod io;
pub mod mesh;
pub mod occlusal;
pub mod orientation;
pub mod pipeline;
pub mod plane;

#[cfg(any(all(feature = "f64", feature = "f32"), not(any(feature = "f64", feature = "f32"))))]
compile_error!("Either 'f64' or 'f32' feature must be specified, but not both");

pub use config::CleaningParams;
pub use cutter::{CombinePolicy, ThresholdCutter};
pub use errors::{CleanError, CleanResult, ProcessError};
pub use grid::{GridPartition, GridPartitioner};
pub use mesh::Mesh;
pub use occlusal::OcclusalPlaneEstimator;
pub use pipeline::{CleanReport, SoftTissueRemover};
pub use plane::Plane;
