//! Draws the window and segment plots written alongside the result record.
use crate::analysis::{AggregateStats, Real, Segment, Stats, Window, WindowStats};
use plotters::prelude::*;
use std::{
    fmt::Display,
    ops::Range,
    path::{Path, PathBuf},
};
use thiserror::Error;

const PLOT_SIZE: (u32, u32) = (800, 600);

#[derive(Debug, Error)]
#[error("Cannot draw {path}: {message}")]
pub(crate) struct RenderError {
    path: PathBuf,
    message: String,
}

impl RenderError {
    pub(crate) fn new<M: Display>(path: &Path, message: M) -> Self {
        Self {
            path: path.to_owned(),
            message: message.to_string(),
        }
    }

    fn at<E: Display>(path: &Path) -> impl Fn(E) -> Self + '_ {
        move |e| Self::new(path, e)
    }
}

/// Everything needed to draw the overview of a run's active segment.
pub(crate) struct SegmentPlot<'a> {
    pub(crate) channel: &'a [Real],
    pub(crate) sample_period: Real,
    pub(crate) segment: Segment,
    pub(crate) window_samples: usize,
    pub(crate) windows: &'a [WindowStats],
    pub(crate) aggregate: &'a AggregateStats,
}

/// Receives the plots produced while a run is processed.
pub(crate) trait RenderSink {
    /// Draws a single window with its statistics.
    fn render_window(
        &self,
        path: &Path,
        window: &Window<'_>,
        stats: &Stats,
        sample_period: Real,
    ) -> Result<(), RenderError>;

    /// Draws the whole active segment with the window means.
    fn render_segment(&self, path: &Path, plot: &SegmentPlot<'_>) -> Result<(), RenderError>;
}

/// Discards every plot.
pub(crate) struct NoRender;

impl RenderSink for NoRender {
    fn render_window(
        &self,
        _: &Path,
        _: &Window<'_>,
        _: &Stats,
        _: Real,
    ) -> Result<(), RenderError> {
        Ok(())
    }

    fn render_segment(&self, _: &Path, _: &SegmentPlot<'_>) -> Result<(), RenderError> {
        Ok(())
    }
}

/// Writes each plot as a PNG image.
pub(crate) struct PlotRenderer;

impl RenderSink for PlotRenderer {
    fn render_window(
        &self,
        path: &Path,
        window: &Window<'_>,
        stats: &Stats,
        sample_period: Real,
    ) -> Result<(), RenderError> {
        let error = RenderError::at(path);
        let root = BitMapBackend::new(path, PLOT_SIZE).into_drawing_area();
        root.fill(&WHITE).map_err(&error)?;

        let t0 = window.time_s;
        let t1 = t0 + window.samples.len() as Real * sample_period;
        // Plots carry no text, the bitmap build has no font backend.
        let mut chart = ChartBuilder::on(&root)
            .margin(10)
            .build_cartesian_2d(non_degenerate(t0..t1), padded(stats.min..stats.max))
            .map_err(&error)?;
        chart.configure_mesh().draw().map_err(&error)?;

        chart
            .draw_series(LineSeries::new(
                window.times(sample_period).zip(window.samples.iter().copied()),
                BLUE,
            ))
            .map_err(&error)?;
        for (value, colour) in [
            (stats.max, BLACK),
            (stats.min, BLACK),
            (stats.mean, GREEN),
            (stats.median, RED),
            (stats.rms, CYAN),
        ] {
            chart
                .draw_series(LineSeries::new([(t0, value), (t1, value)], colour))
                .map_err(&error)?;
        }
        root.present().map_err(&error)
    }

    fn render_segment(&self, path: &Path, plot: &SegmentPlot<'_>) -> Result<(), RenderError> {
        let error = RenderError::at(path);
        let root = BitMapBackend::new(path, PLOT_SIZE).into_drawing_area();
        root.fill(&WHITE).map_err(&error)?;

        let SegmentPlot {
            channel,
            sample_period,
            segment,
            window_samples,
            windows,
            aggregate,
        } = *plot;
        let time = |index: usize| index as Real * sample_period;
        let start_s = time(segment.start_index());
        let stop_s = time(segment.stop_index());
        let active = channel
            .iter()
            .copied()
            .enumerate()
            .skip(segment.start_index())
            .take(segment.span() + 1);
        let (min, max) = active
            .clone()
            .fold((Real::INFINITY, Real::NEG_INFINITY), |(min, max), (_, v)| {
                (min.min(v), max.max(v))
            });

        let mut chart = ChartBuilder::on(&root)
            .margin(10)
            .build_cartesian_2d(non_degenerate(start_s..stop_s), padded(min..max))
            .map_err(&error)?;
        chart.configure_mesh().draw().map_err(&error)?;

        chart
            .draw_series(LineSeries::new(
                active.map(|(index, value)| (time(index), value)),
                BLUE,
            ))
            .map_err(&error)?;
        let window_duration = window_samples as Real * sample_period;
        let steps = windows.iter().flat_map(|window| {
            let end = (window.time_s + window_duration).min(stop_s);
            [(window.time_s, window.stats.mean), (end, window.stats.mean)]
        });
        chart
            .draw_series(LineSeries::new(steps, BLACK))
            .map_err(&error)?;
        chart
            .draw_series(LineSeries::new(
                [(start_s, aggregate.mean), (stop_s, aggregate.mean)],
                BLACK.stroke_width(2),
            ))
            .map_err(&error)?;
        root.present().map_err(&error)
    }
}

/// Widens a range by a tenth of its extent, or by one when it is empty.
fn padded(range: Range<Real>) -> Range<Real> {
    let pad = match range.end - range.start {
        extent if extent.is_finite() && extent > 0.0 => extent / 10.0,
        _ => 1.0,
    };
    let (start, end) = if range.start.is_finite() && range.end.is_finite() {
        (range.start, range.end)
    } else {
        (0.0, 0.0)
    };
    (start - pad)..(end + pad)
}

/// Ensures an axis range has a positive extent.
fn non_degenerate(range: Range<Real>) -> Range<Real> {
    if range.end > range.start {
        range
    } else {
        range.start..(range.start + 1.0)
    }
}
