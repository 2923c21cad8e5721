//! Processes run directories, from the calibrated inputs to the written result.
use crate::{
    analysis::{AggregateStats, AnalysisError, Real, Segment, SegmentLocator, WindowStats},
    flow::FlowSummary,
    parameters::{AnalysisSettings, ManualWindow},
    record::{RunMetadata, build_record},
    render::{RenderSink, SegmentPlot},
};
use rayon::prelude::*;
use std::path::PathBuf;
use thiserror::Error;
use tracing::{info, instrument, warn};
use wire_burn_common::{
    CalibratedRun, ChannelSource, RecordError, ResultRecord, RunDirectory, SourceError,
};

/// How the stage identifies itself in progress messages.
pub(crate) const POST_LABEL: &str = "POST1";

pub(crate) const CURRENT_CHANNEL: &str = "Current";

#[derive(Debug, Error)]
pub(crate) enum RunError {
    #[error("Required file not found: {0}")]
    MissingInputFile(PathBuf),
    #[error(transparent)]
    Source(#[from] SourceError),
    #[error(transparent)]
    Analysis(#[from] AnalysisError),
    #[error("Mean oxygen flow is zero, so the fuel to oxygen ratio is undefined")]
    ZeroOxygenFlow,
    #[error(transparent)]
    Record(#[from] RecordError),
    #[error("Cannot access {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Controls how a single run is processed.
#[derive(Clone, Debug)]
pub(crate) struct RunOptions {
    pub(crate) settings: AnalysisSettings,
    /// Replace an existing result rather than skipping the run.
    pub(crate) overwrite: bool,
    /// Use these bounds instead of searching for the threshold crossings.
    pub(crate) manual_window: Option<ManualWindow>,
}

#[derive(Debug)]
pub(crate) enum RunOutcome {
    /// The run was analysed and its result written.
    Recorded(Box<ResultRecord>),
    /// The run already had a result, which was left untouched.
    Skipped,
}

/// Tally of a batch.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct BatchSummary {
    pub(crate) recorded: usize,
    pub(crate) skipped: usize,
    pub(crate) failed: usize,
}

impl BatchSummary {
    fn tally(mut self, result: &Result<RunOutcome, RunError>) -> Self {
        match result {
            Ok(RunOutcome::Recorded(_)) => self.recorded += 1,
            Ok(RunOutcome::Skipped) => self.skipped += 1,
            Err(_) => self.failed += 1,
        }
        self
    }

    fn merge(self, other: Self) -> Self {
        Self {
            recorded: self.recorded + other.recorded,
            skipped: self.skipped + other.skipped,
            failed: self.failed + other.failed,
        }
    }
}

/// The characterisation of a current channel.
#[derive(Clone, Debug)]
pub(crate) struct Analysis {
    pub(crate) segment: Segment,
    pub(crate) windows: Vec<WindowStats>,
    pub(crate) aggregate: AggregateStats,
}

/// Locates the active segment, then computes the statistics of each window and of the whole segment.
///
/// # Parameters
/// - channel: the calibrated current samples.
/// - sample_period: time between samples, in seconds.
/// - settings: threshold and window configuration.
/// - manual_window: optional user supplied bounds, which bypass the threshold.
#[instrument(skip_all, level = "debug", fields(num_samples = channel.len(), start_index, stop_index))]
pub(crate) fn analyse(
    channel: &[Real],
    sample_period: Real,
    settings: &AnalysisSettings,
    manual_window: Option<&ManualWindow>,
) -> Result<Analysis, AnalysisError> {
    let segment = SegmentLocator::new(settings.threshold_ua, settings.segment_policy).locate(
        channel,
        sample_period,
        manual_window,
    )?;
    let span = tracing::Span::current();
    span.record("start_index", segment.start_index());
    span.record("stop_index", segment.stop_index());

    let windows = segment
        .windows(
            channel,
            sample_period,
            settings.window_samples,
            settings.trailing_window,
        )
        .map(|window| WindowStats::from_window(&window))
        .collect::<Result<Vec<_>, _>>()?;
    let aggregate = AggregateStats::from_samples(segment.samples(channel))?;
    Ok(Analysis {
        segment,
        windows,
        aggregate,
    })
}

/// Processes one run directory, writing `post1/results.json` and the plots.
///
/// An existing result is replaced when `options.overwrite` is set, and the run is skipped otherwise.
#[instrument(skip_all, fields(run = run.name()), err(level = "warn"))]
pub(crate) fn process_run<R: RenderSink + ?Sized>(
    run: &RunDirectory,
    options: &RunOptions,
    renderer: &R,
) -> Result<RunOutcome, RunError> {
    for input in [run.burn_file(), run.flow_file()] {
        if !input.is_file() {
            return Err(RunError::MissingInputFile(input));
        }
    }

    let post_dir = run.post_dir();
    if post_dir.is_dir() {
        if !options.overwrite {
            info!("{POST_LABEL} [  IGNORING  ] {}", run.path().display());
            return Ok(RunOutcome::Skipped);
        }
        info!("{POST_LABEL} [REPROCESSING] {}", run.path().display());
        std::fs::remove_dir_all(&post_dir).map_err(|source| RunError::Io {
            path: post_dir.clone(),
            source,
        })?;
    } else {
        info!("{POST_LABEL} [ PROCESSING ] {}", run.path().display());
    }

    let burn = CalibratedRun::load(run.burn_file())?;
    let flow = CalibratedRun::load(run.flow_file())?;

    let flow = FlowSummary::from_source(&flow)?;
    let metadata = RunMetadata::from_source(&burn)?;

    let current = burn.channel(CURRENT_CHANNEL)?;
    let sample_period = burn.sample_period();
    let analysis = analyse(
        current,
        sample_period,
        &options.settings,
        options.manual_window.as_ref(),
    )?;

    let record = build_record(
        &options.settings,
        &flow,
        metadata,
        &analysis.segment,
        &analysis.aggregate,
    );
    let windows_dir = run.windows_dir();
    std::fs::create_dir_all(&windows_dir).map_err(|source| RunError::Io {
        path: windows_dir,
        source,
    })?;
    record.save(run.results_file())?;

    render(run, current, sample_period, &options.settings, &analysis, renderer);
    Ok(RunOutcome::Recorded(Box::new(record)))
}

/// Draws every window and the segment overview. Failures are logged and otherwise ignored.
fn render<R: RenderSink + ?Sized>(
    run: &RunDirectory,
    channel: &[Real],
    sample_period: Real,
    settings: &AnalysisSettings,
    analysis: &Analysis,
    renderer: &R,
) {
    let windows = analysis.segment.windows(
        channel,
        sample_period,
        settings.window_samples,
        settings.trailing_window,
    );
    for (window, stats) in windows.zip(&analysis.windows) {
        let path = run.window_plot(window.count);
        if let Err(e) = renderer.render_window(&path, &window, &stats.stats, sample_period) {
            warn!("{e}");
        }
    }

    let plot = SegmentPlot {
        channel,
        sample_period,
        segment: analysis.segment,
        window_samples: settings.window_samples.get(),
        windows: &analysis.windows,
        aggregate: &analysis.aggregate,
    };
    if let Err(e) = renderer.render_segment(&run.segment_plot(), &plot) {
        warn!("{e}");
    }
}

/// Processes every run, optionally in parallel. A failing run does not stop the others.
#[instrument(skip_all, fields(num_runs = runs.len(), parallel = parallel))]
pub(crate) fn process_batch<R: RenderSink + Sync + ?Sized>(
    runs: &[RunDirectory],
    options: &RunOptions,
    renderer: &R,
    parallel: bool,
) -> BatchSummary {
    if parallel {
        runs.par_iter()
            .map(|run| BatchSummary::default().tally(&process_run(run, options, renderer)))
            .reduce(BatchSummary::default, BatchSummary::merge)
    } else {
        runs.iter().fold(BatchSummary::default(), |summary, run| {
            summary.tally(&process_run(run, options, renderer))
        })
    }
}
