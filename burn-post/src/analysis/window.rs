//! Partitions a segment into consecutive, non-overlapping windows of samples.
use super::{Real, SampleIndex};
use std::iter::FusedIterator;

/// A contiguous run of samples within the active segment.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct Window<'a> {
    /// Zero-based position of the window within the segment.
    pub(crate) count: usize,
    /// Index of the window's first sample.
    pub(crate) start_index: SampleIndex,
    /// Time of the window's first sample, in seconds.
    pub(crate) time_s: Real,
    pub(crate) samples: &'a [Real],
}

impl Window<'_> {
    /// Times of each sample in the window, in seconds.
    pub(crate) fn times(&self, sample_period: Real) -> impl Iterator<Item = Real> + '_ {
        (self.start_index..)
            .take(self.samples.len())
            .map(move |index| index as Real * sample_period)
    }
}

/// Iterator over the windows of a segment.
#[derive(Clone)]
pub(crate) struct WindowIter<'a> {
    channel: &'a [Real],
    sample_period: Real,
    /// Index of the next window's first sample.
    next_index: SampleIndex,
    window_samples: usize,
    /// Number of windows already produced.
    produced: usize,
    /// Total number of windows to produce.
    limit: usize,
}

impl<'a> WindowIter<'a> {
    /// Creates a new iterator producing `limit` windows.
    ///
    /// # Parameters
    /// - channel: the samples being partitioned.
    /// - sample_period: time between samples, in seconds.
    /// - start_index: index of the first sample of the first window.
    /// - window_samples: number of samples in each window.
    /// - limit: number of windows to produce.
    pub(crate) fn new(
        channel: &'a [Real],
        sample_period: Real,
        start_index: SampleIndex,
        window_samples: usize,
        limit: usize,
    ) -> Self {
        Self {
            channel,
            sample_period,
            next_index: start_index,
            window_samples,
            produced: 0,
            limit,
        }
    }
}

impl<'a> Iterator for WindowIter<'a> {
    type Item = Window<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.produced >= self.limit {
            return None;
        }
        let rest = self.channel.get(self.next_index..)?;
        let samples = rest.get(..self.window_samples).unwrap_or(rest);
        let window = Window {
            count: self.produced,
            start_index: self.next_index,
            time_s: self.next_index as Real * self.sample_period,
            samples,
        };
        self.produced += 1;
        self.next_index += self.window_samples;
        Some(window)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.limit - self.produced;
        (0, Some(remaining))
    }
}

impl FusedIterator for WindowIter<'_> {}
