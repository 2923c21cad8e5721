//! Locates the active part of a burn current trace and characterises it with windowed statistics.
//!
//! # Example
//!
//! ```rust
//!     let segment = SegmentLocator::new(threshold, SegmentPolicy::Span)
//!         .locate(current, sample_period, None)?;
//!     let windows = segment
//!         .windows(current, sample_period, window_samples, TrailingWindow::Discard)
//!         .map(|window| WindowStats::from_window(&window))
//!         .collect::<Result<Vec<_>, _>>()?;
//!     let aggregate = AggregateStats::from_samples(segment.samples(current))?;
//! ```
pub(crate) mod segment;
pub(crate) mod stats;
pub(crate) mod window;

pub(crate) use segment::{Segment, SegmentLocator};
pub(crate) use stats::{AggregateStats, Stats, WindowStats};
pub(crate) use window::Window;
pub(crate) use wire_burn_common::{Real, SampleIndex};

use thiserror::Error;

#[derive(Debug, Error)]
pub(crate) enum AnalysisError {
    #[error("!!!EMPTY!!! No sample exceeds the {threshold} uA threshold. Aborting.")]
    EmptySegment { threshold: Real },
    #[error("Cannot compute statistics of an empty window")]
    EmptyWindow,
    #[error("Invalid manual window from {start_s} s to {stop_s} s")]
    InvalidManualWindow { start_s: Real, stop_s: Real },
}
