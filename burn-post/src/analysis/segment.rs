//! Finds the inclusive range of samples during which the wire is burning.
use super::{AnalysisError, Real, SampleIndex, window::WindowIter};
use crate::parameters::{ManualWindow, SegmentPolicy, TrailingWindow};
use itertools::Itertools;
use std::{cmp::Reverse, num::NonZeroUsize};
use tracing::warn;

/// The active region of a channel, `start_index..=stop_index`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Segment {
    start_index: SampleIndex,
    stop_index: SampleIndex,
}

impl Segment {
    /// Creates a segment, provided `start_index <= stop_index`.
    pub(crate) fn new(start_index: SampleIndex, stop_index: SampleIndex) -> Option<Self> {
        (start_index <= stop_index).then_some(Self {
            start_index,
            stop_index,
        })
    }

    pub(crate) fn start_index(&self) -> SampleIndex {
        self.start_index
    }

    pub(crate) fn stop_index(&self) -> SampleIndex {
        self.stop_index
    }

    /// Number of sample periods between the first and last index.
    pub(crate) fn span(&self) -> usize {
        self.stop_index - self.start_index
    }

    /// Number of full windows which fit between the first and last index.
    pub(crate) fn window_count(&self, window_samples: NonZeroUsize) -> usize {
        self.span() / window_samples.get()
    }

    /// The samples from which the aggregate statistics are computed, i.e. `start_index..stop_index`.
    ///
    /// A segment of a single sample yields that sample. The range is clipped to the channel.
    pub(crate) fn samples<'a>(&self, channel: &'a [Real]) -> &'a [Real] {
        let end = if self.stop_index > self.start_index {
            self.stop_index
        } else {
            self.stop_index + 1
        };
        channel
            .get(self.start_index..end.min(channel.len()))
            .unwrap_or_default()
    }

    /// Partitions the segment into consecutive windows of `window_samples` samples.
    pub(crate) fn windows<'a>(
        &self,
        channel: &'a [Real],
        sample_period: Real,
        window_samples: NonZeroUsize,
        trailing: TrailingWindow,
    ) -> WindowIter<'a> {
        let count = match trailing {
            TrailingWindow::Discard => self.window_count(window_samples),
            TrailingWindow::Keep => self.span().div_ceil(window_samples.get()),
        };
        WindowIter::new(
            channel,
            sample_period,
            self.start_index,
            window_samples.get(),
            count,
        )
    }
}

/// Locates the active segment of a channel, either by threshold or from a manual window.
#[derive(Clone, Debug)]
pub(crate) struct SegmentLocator {
    threshold: Real,
    policy: SegmentPolicy,
}

impl SegmentLocator {
    pub(crate) fn new(threshold: Real, policy: SegmentPolicy) -> Self {
        Self { threshold, policy }
    }

    /// Returns the active segment of `channel`.
    ///
    /// If `manual_window` is given its bounds are converted to indices and the
    /// amplitude of the channel is not examined.
    /// # Parameters
    /// - channel: the calibrated samples.
    /// - sample_period: time between samples, in seconds.
    /// - manual_window: optional user supplied start and stop times.
    pub(crate) fn locate(
        &self,
        channel: &[Real],
        sample_period: Real,
        manual_window: Option<&ManualWindow>,
    ) -> Result<Segment, AnalysisError> {
        if let Some(window) = manual_window {
            return from_manual_window(window, sample_period, channel.len());
        }
        match self.policy {
            SegmentPolicy::Span => span_above(channel, self.threshold),
            SegmentPolicy::LongestRun => longest_run_above(channel, self.threshold),
        }
        .ok_or(AnalysisError::EmptySegment {
            threshold: self.threshold,
        })
    }
}

fn from_manual_window(
    window: &ManualWindow,
    sample_period: Real,
    num_samples: usize,
) -> Result<Segment, AnalysisError> {
    let ManualWindow { start_s, stop_s } = *window;
    let invalid = AnalysisError::InvalidManualWindow { start_s, stop_s };
    if !(start_s.is_finite() && stop_s.is_finite()) || start_s < 0.0 || start_s > stop_s {
        return Err(invalid);
    }
    let last_index = num_samples.saturating_sub(1);
    let to_index = |time_s: Real| {
        let index = (time_s / sample_period).round() as SampleIndex;
        if index > last_index {
            warn!("Manual time {time_s} s is beyond the last sample, clamping to index {last_index}");
            last_index
        } else {
            index
        }
    };
    Segment::new(to_index(start_s), to_index(stop_s)).ok_or(invalid)
}

/// From the first to the last sample strictly above `threshold`.
fn span_above(channel: &[Real], threshold: Real) -> Option<Segment> {
    let start_index = channel.iter().position(|&value| value > threshold)?;
    let stop_index = channel.iter().rposition(|&value| value > threshold)?;
    Segment::new(start_index, stop_index)
}

/// The longest contiguous run of samples strictly above `threshold`, the earliest winning ties.
fn longest_run_above(channel: &[Real], threshold: Real) -> Option<Segment> {
    let runs = channel
        .iter()
        .enumerate()
        .chunk_by(|(_, value)| **value > threshold);
    (&runs)
        .into_iter()
        .filter(|(above, _)| *above)
        .filter_map(|(_, mut run)| {
            let (start_index, _) = run.next()?;
            let stop_index = run.last().map_or(start_index, |(index, _)| index);
            Segment::new(start_index, stop_index)
        })
        .min_by_key(|segment| Reverse(segment.span()))
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 2000 samples, 100 on indices 100 to 499 inclusive, and 0 elsewhere.
    fn square_pulse() -> Vec<Real> {
        (0..2000)
            .map(|i| if (100..500).contains(&i) { 100.0 } else { 0.0 })
            .collect()
    }

    #[test]
    fn threshold_span() {
        let segment = SegmentLocator::new(20.0, SegmentPolicy::Span)
            .locate(&square_pulse(), 0.001, None)
            .expect("segment is found");
        assert_eq!(segment, Segment::new(100, 499).expect("valid segment"));
        assert_eq!(segment.span(), 399);
    }

    #[test]
    fn span_keeps_internal_dips() {
        let data = [0.0, 30.0, 35.0, 5.0, 2.0, 40.0, 1.0, 0.0];
        let segment = SegmentLocator::new(20.0, SegmentPolicy::Span)
            .locate(&data, 1.0, None)
            .expect("segment is found");
        assert_eq!((segment.start_index(), segment.stop_index()), (1, 5));
    }

    #[test]
    fn threshold_is_strict() {
        let data = [20.0, 20.0, 20.0];
        let result = SegmentLocator::new(20.0, SegmentPolicy::Span).locate(&data, 1.0, None);
        assert!(matches!(result, Err(AnalysisError::EmptySegment { .. })));
    }

    #[test]
    fn all_below_threshold() {
        let data = vec![3.0; 50];
        for policy in [SegmentPolicy::Span, SegmentPolicy::LongestRun] {
            let result = SegmentLocator::new(20.0, policy).locate(&data, 0.001, None);
            assert!(matches!(
                result,
                Err(AnalysisError::EmptySegment { threshold }) if threshold == 20.0
            ));
        }
    }

    #[test]
    fn single_crossing() {
        let data = [0.0, 0.0, 50.0, 0.0];
        let segment = SegmentLocator::new(20.0, SegmentPolicy::Span)
            .locate(&data, 1.0, None)
            .expect("segment is found");
        assert_eq!((segment.start_index(), segment.stop_index()), (2, 2));
        assert_eq!(segment.samples(&data), [50.0]);
    }

    #[test]
    fn bounds_lie_within_channel() {
        let data = [25.0, 0.0, 0.0, 0.0, 30.0];
        let segment = SegmentLocator::new(20.0, SegmentPolicy::Span)
            .locate(&data, 1.0, None)
            .expect("segment is found");
        assert!(segment.start_index() <= segment.stop_index());
        assert_eq!(segment.stop_index(), data.len() - 1);
    }

    #[test]
    fn longest_run() {
        let data = [
            0.0, 30.0, 30.0, 0.0, 30.0, 30.0, 30.0, 30.0, 0.0, 30.0, 30.0, 30.0, 0.0,
        ];
        let segment = SegmentLocator::new(20.0, SegmentPolicy::LongestRun)
            .locate(&data, 1.0, None)
            .expect("segment is found");
        assert_eq!((segment.start_index(), segment.stop_index()), (4, 7));
    }

    #[test]
    fn longest_run_prefers_earliest_on_tie() {
        let data = [30.0, 30.0, 0.0, 30.0, 30.0, 0.0];
        let segment = SegmentLocator::new(20.0, SegmentPolicy::LongestRun)
            .locate(&data, 1.0, None)
            .expect("segment is found");
        assert_eq!((segment.start_index(), segment.stop_index()), (0, 1));
    }

    #[test]
    fn manual_window_ignores_amplitude() {
        let data = vec![0.0; 2000];
        let manual = ManualWindow {
            start_s: 0.1,
            stop_s: 0.499,
        };
        let segment = SegmentLocator::new(20.0, SegmentPolicy::Span)
            .locate(&data, 0.001, Some(&manual))
            .expect("segment is found");
        assert_eq!((segment.start_index(), segment.stop_index()), (100, 499));
    }

    #[test]
    fn manual_window_is_clamped_to_channel() {
        let data = vec![0.0; 100];
        let manual = ManualWindow {
            start_s: 0.05,
            stop_s: 10.0,
        };
        let segment = SegmentLocator::new(20.0, SegmentPolicy::Span)
            .locate(&data, 0.001, Some(&manual))
            .expect("segment is found");
        assert_eq!((segment.start_index(), segment.stop_index()), (50, 99));
    }

    #[test]
    fn invalid_manual_windows() {
        let data = vec![0.0; 100];
        let locator = SegmentLocator::new(20.0, SegmentPolicy::Span);
        for (start_s, stop_s) in [(0.05, 0.01), (-0.01, 0.05), (0.0, Real::NAN)] {
            let result = locator.locate(&data, 0.001, Some(&ManualWindow { start_s, stop_s }));
            assert!(matches!(
                result,
                Err(AnalysisError::InvalidManualWindow { .. })
            ));
        }
    }

    #[test]
    fn window_count() {
        let segment = Segment::new(100, 499).expect("valid segment");
        let window_samples = NonZeroUsize::new(100).expect("non-zero");
        assert_eq!(segment.window_count(window_samples), 3);
        let window_samples = NonZeroUsize::new(1000).expect("non-zero");
        assert_eq!(segment.window_count(window_samples), 0);
    }

    #[test]
    fn aggregate_samples_exclude_stop_index() {
        let data = [0.0, 1.0, 2.0, 3.0, 4.0];
        let segment = Segment::new(1, 3).expect("valid segment");
        assert_eq!(segment.samples(&data), [1.0, 2.0]);
    }
}
