//! Descriptive statistics of windows of samples.
use super::{AnalysisError, Real, Window};

/// Descriptive statistics of a non-empty slice of samples.
///
/// The standard deviation is the population (divide by N) form.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct Stats {
    pub(crate) max: Real,
    pub(crate) min: Real,
    pub(crate) mean: Real,
    pub(crate) median: Real,
    pub(crate) std: Real,
    /// Root mean square, computed as `sqrt(std^2 + mean^2)`.
    pub(crate) rms: Real,
}

impl Stats {
    pub(crate) fn from_samples(samples: &[Real]) -> Result<Self, AnalysisError> {
        let mean = mean(samples).ok_or(AnalysisError::EmptyWindow)?;
        let max = samples.iter().copied().fold(Real::NEG_INFINITY, Real::max);
        let min = samples.iter().copied().fold(Real::INFINITY, Real::min);
        let variance = samples
            .iter()
            .map(|value| (value - mean).powi(2))
            .sum::<Real>()
            / samples.len() as Real;
        let std = variance.sqrt();
        Ok(Self {
            max,
            min,
            mean,
            median: median(samples).ok_or(AnalysisError::EmptyWindow)?,
            std,
            rms: std.hypot(mean),
        })
    }
}

/// Arithmetic mean, or `None` if `samples` is empty.
pub(crate) fn mean(samples: &[Real]) -> Option<Real> {
    (!samples.is_empty()).then(|| samples.iter().sum::<Real>() / samples.len() as Real)
}

/// Middle value, or the mean of the two middle values when the length is even.
fn median(samples: &[Real]) -> Option<Real> {
    let mut sorted = samples.to_vec();
    sorted.sort_by(Real::total_cmp);
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 1 {
        sorted.get(mid).copied()
    } else {
        Some((sorted.get(mid.checked_sub(1)?)? + sorted.get(mid)?) / 2.0)
    }
}

/// The statistics of one window, labelled with the time of its first sample.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct WindowStats {
    pub(crate) count: usize,
    pub(crate) time_s: Real,
    pub(crate) stats: Stats,
}

impl WindowStats {
    pub(crate) fn from_window(window: &Window<'_>) -> Result<Self, AnalysisError> {
        Ok(Self {
            count: window.count,
            time_s: window.time_s,
            stats: Stats::from_samples(window.samples)?,
        })
    }
}

/// The statistics of the whole active segment, as recorded in the result.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct AggregateStats {
    pub(crate) mean: Real,
    pub(crate) median: Real,
    pub(crate) std: Real,
    pub(crate) rms: Real,
}

impl AggregateStats {
    pub(crate) fn from_samples(samples: &[Real]) -> Result<Self, AnalysisError> {
        let Stats {
            mean,
            median,
            std,
            rms,
            ..
        } = Stats::from_samples(samples)?;
        Ok(Self {
            mean,
            median,
            std,
            rms,
        })
    }
}
