//! # Simulator
//!
//! Writes synthetic wire burn runs, in the same layout as the acquisition tooling, so that the
//! post-processing can be exercised without a test rig.
//!
//! The shape of each run is described by a JSON file, see `configs/steel.json`.
mod noise;
mod simulation;

use chrono::Utc;
use clap::Parser;
use miette::IntoDiagnostic;
use rand::{SeedableRng, rngs::StdRng};
use simulation::Simulation;
use std::path::PathBuf;
use wire_burn_common::init_tracing;

/// [clap] derived struct to handle command line parameters.
#[derive(Debug, Parser)]
#[clap(author, version = wire_burn_common::version!(), about)]
struct Cli {
    /// Path to the JSON file describing the run.
    #[clap(long)]
    file: PathBuf,

    /// Directory in which the run directory is created.
    #[clap(long, env = "BURN_DATA_DIR", default_value = "../data")]
    data_dir: PathBuf,

    /// Name of the run directory, by default the current UTC time.
    #[clap(long)]
    name: Option<String>,

    /// Seed for the noise generator, for reproducible runs.
    #[clap(long)]
    seed: Option<u64>,
}

fn main() -> miette::Result<()> {
    let args = Cli::parse();
    init_tracing();

    let now = Utc::now();
    let simulation = Simulation::load(&args.file).into_diagnostic()?;
    let seed = args
        .seed
        .unwrap_or_else(|| now.timestamp_subsec_nanos() as u64);
    let run = simulation
        .generate(&mut StdRng::seed_from_u64(seed))
        .into_diagnostic()?;

    let name = args
        .name
        .unwrap_or_else(|| now.format("%Y%m%d%H%M%S").to_string());
    run.write(&args.data_dir.join(name)).into_diagnostic()
}
