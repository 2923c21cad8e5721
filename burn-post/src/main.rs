//! # Burn Post
//!
//! The first post-processing stage of the wire burn tests:
//! * Reads the calibrated current (`burn.json`) and gas flow (`flow.json`) of each run directory.
//! * Finds the part of the current signal during which the wire is burning.
//! * Characterises that segment window by window, and as a whole.
//! * Writes `post1/results.json` and, unless disabled, the window and segment plots.
//!
//! With no positional arguments every run under the data directory is processed, and runs
//! which already have a result are skipped. Naming a run (by the end of its directory name)
//! processes just that run, replacing any previous result, and optionally fixes the start
//! and stop times of the burn by hand.
mod analysis;
mod flow;
mod parameters;
mod processing;
mod record;
mod render;

use crate::analysis::Real;
use clap::Parser;
use miette::IntoDiagnostic;
use parameters::{AnalysisSettings, ManualWindow};
use processing::{BatchSummary, RunOptions, RunOutcome, process_batch, process_run};
use render::{NoRender, PlotRenderer, RenderSink};
use std::path::PathBuf;
use tracing::info;
use wire_burn_common::{RunDirectory, init_tracing};

/// [clap] derived struct to handle command line parameters.
#[derive(Debug, Parser)]
#[clap(author, version = wire_burn_common::version!(), about)]
struct Cli {
    /// Directory containing one sub-directory per run.
    #[clap(long, env = "BURN_DATA_DIR", default_value = "../data")]
    data_dir: PathBuf,

    /// Process only the run whose directory name ends with this, replacing any previous result.
    run: Option<String>,

    /// Start of the burn, in seconds, overriding the threshold.
    #[clap(requires = "stop")]
    start: Option<Real>,

    /// End of the burn, in seconds, overriding the threshold.
    #[clap(requires = "start")]
    stop: Option<Real>,

    #[clap(flatten)]
    settings: AnalysisSettings,

    /// Replace existing results when processing every run.
    #[clap(long)]
    overwrite: bool,

    /// Skip writing the window and segment plots.
    #[clap(long)]
    no_render: bool,

    /// Process runs concurrently when processing every run.
    #[clap(long)]
    parallel: bool,
}

impl Cli {
    fn manual_window(&self) -> Option<ManualWindow> {
        Some(ManualWindow {
            start_s: self.start?,
            stop_s: self.stop?,
        })
    }
}

fn main() -> miette::Result<()> {
    let args = Cli::parse();
    init_tracing();

    let renderer: &(dyn RenderSink + Sync) = if args.no_render {
        &NoRender
    } else {
        &PlotRenderer
    };

    match &args.run {
        Some(suffix) => {
            let run = RunDirectory::find(&args.data_dir, suffix).into_diagnostic()?;
            let options = RunOptions {
                settings: args.settings.clone(),
                overwrite: true,
                manual_window: args.manual_window(),
            };
            match process_run(&run, &options, renderer).into_diagnostic()? {
                RunOutcome::Recorded(record) => info!(
                    "Recorded {} windows from index {} to {}",
                    record.window_n, record.start_index, record.stop_index
                ),
                RunOutcome::Skipped => info!("Skipped {}", run.name()),
            }
        }
        None => {
            let runs = RunDirectory::list(&args.data_dir).into_diagnostic()?;
            let options = RunOptions {
                settings: args.settings.clone(),
                overwrite: args.overwrite,
                manual_window: None,
            };
            let BatchSummary {
                recorded,
                skipped,
                failed,
            } = process_batch(&runs, &options, renderer, args.parallel);
            info!("Recorded {recorded}, skipped {skipped}, failed {failed}");
        }
    }
    Ok(())
}
