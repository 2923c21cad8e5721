//! # Burn Catalog
//!
//! Cross-run views of the wire burn data directory:
//! * `list` prints every run with its processing state and wire material.
//! * `summary` plots the mean current of the curated runs against the carbon content of their wire.
//!
//! A run is curated by setting `"post2": true` by hand in its `post1/results.json`.
mod listing;
mod materials;
mod summary;

use clap::{Parser, Subcommand};
use listing::RunEntry;
use miette::IntoDiagnostic;
use std::path::PathBuf;
use summary::{SUMMARY_PLOT, curated_points, plot_summary};
use thiserror::Error;
use tracing::info;
use wire_burn_common::{RunDirError, RunDirectory, init_tracing};

#[derive(Debug, Error)]
pub(crate) enum CatalogError {
    #[error(transparent)]
    RunDir(#[from] RunDirError),
    #[error("No curated run with a known wire material")]
    NoCuratedRuns,
    #[error("Cannot draw {path}: {message}")]
    Plot { path: PathBuf, message: String },
}

/// [clap] derived struct to handle command line parameters.
#[derive(Debug, Parser)]
#[clap(author, version = wire_burn_common::version!(), about)]
struct Cli {
    /// Directory containing one sub-directory per run.
    #[clap(long, env = "BURN_DATA_DIR", default_value = "../data")]
    data_dir: PathBuf,

    #[command(subcommand)]
    mode: Mode,
}

#[derive(Debug, Subcommand)]
enum Mode {
    /// Prints one line per run: name, processed (1) and curated (2) flags, and wire material.
    List,
    /// Plots mean current against carbon content for the curated runs.
    Summary(SummaryParameters),
}

#[derive(Debug, Parser)]
struct SummaryParameters {
    /// Where to write the plot, by default next to the data directory.
    #[clap(long)]
    output: Option<PathBuf>,
}

fn main() -> miette::Result<()> {
    let args = Cli::parse();
    init_tracing();

    let runs = RunDirectory::list(&args.data_dir)
        .map_err(CatalogError::from)
        .into_diagnostic()?;
    match args.mode {
        Mode::List => {
            for run in &runs {
                println!("{}", RunEntry::inspect(run));
            }
        }
        Mode::Summary(SummaryParameters { output }) => {
            let output = output.unwrap_or_else(|| args.data_dir.join("..").join(SUMMARY_PLOT));
            let points = curated_points(&runs);
            plot_summary(&points, &output).into_diagnostic()?;
            info!("Plotted {} runs to {}", points.len(), output.display());
        }
    }
    Ok(())
}
