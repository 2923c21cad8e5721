//! Defines the parameters used by the segment locator and the window partitioner.
use crate::analysis::Real;
use clap::{Args, ValueEnum};
use std::num::NonZeroUsize;
use strum::Display;

/// Determines which samples above the threshold delimit the burn.
#[derive(Default, Clone, Copy, Debug, PartialEq, Eq, Display, ValueEnum)]
#[strum(serialize_all = "kebab-case")]
pub(crate) enum SegmentPolicy {
    /// From the first to the last sample above the threshold, including any dips below it in between.
    #[default]
    Span,
    /// The longest contiguous run of samples above the threshold.
    LongestRun,
}

/// Determines what happens to the samples left over after the last full window.
#[derive(Default, Clone, Copy, Debug, PartialEq, Eq, Display, ValueEnum)]
#[strum(serialize_all = "kebab-case")]
pub(crate) enum TrailingWindow {
    /// Only full windows are produced.
    #[default]
    Discard,
    /// A final window is produced from the remaining samples, clipped at the end of the channel.
    Keep,
}

/// Encapsulates the parameters which determine how a burn is characterised.
#[derive(Debug, Clone, Args)]
pub(crate) struct AnalysisSettings {
    /// Number of samples in each statistics window.
    #[clap(long, env = "BURN_WINDOW_SAMPLES", default_value = "1000")]
    pub(crate) window_samples: NonZeroUsize,

    /// Current, in uA, above which the wire is considered to be burning.
    #[clap(long, env = "BURN_THRESHOLD_UA", default_value = "20")]
    pub(crate) threshold_ua: Real,

    /// How the active segment is derived from the samples above the threshold.
    #[clap(long, value_enum, default_value = "span")]
    pub(crate) segment_policy: SegmentPolicy,

    /// Whether a partial window at the end of the segment is characterised.
    #[clap(long, value_enum, default_value = "discard")]
    pub(crate) trailing_window: TrailingWindow,
}

/// A user supplied active window, in seconds from the start of the acquisition.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct ManualWindow {
    pub(crate) start_s: Real,
    pub(crate) stop_s: Real,
}

#[cfg(test)]
impl AnalysisSettings {
    pub(crate) fn new(window_samples: usize, threshold_ua: Real) -> Self {
        Self {
            window_samples: NonZeroUsize::new(window_samples)
                .expect("test window size should be non-zero"),
            threshold_ua,
            segment_policy: SegmentPolicy::Span,
            trailing_window: TrailingWindow::Discard,
        }
    }
}
