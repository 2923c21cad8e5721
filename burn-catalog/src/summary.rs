//! Compares the mean burn current of curated runs against the carbon content of their wire.
use crate::{
    CatalogError,
    materials::{CarbonContent, Material},
};
use plotters::prelude::*;
use std::{ops::Range, path::Path, str::FromStr};
use tracing::{info, warn};
use wire_burn_common::{Real, RunDirectory};

/// Default file name of the summary plot, written next to the data directory.
pub(crate) const SUMMARY_PLOT: &str = "post2.png";

/// One curated run.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct SummaryPoint {
    pub(crate) run: String,
    pub(crate) material: Material,
    pub(crate) mean_ua: Real,
}

impl SummaryPoint {
    pub(crate) fn carbon(&self) -> CarbonContent {
        self.material.carbon()
    }
}

/// Collects the runs marked for inclusion whose material is known.
pub(crate) fn curated_points(runs: &[RunDirectory]) -> Vec<SummaryPoint> {
    runs.iter()
        .filter_map(|run| {
            let prior = run.prior_result();
            let record = prior.record().filter(|record| record.post2)?;
            match Material::from_str(&record.wire_material) {
                Ok(material) => {
                    info!("Including {}", run.name());
                    Some(SummaryPoint {
                        run: run.name().to_owned(),
                        material,
                        mean_ua: record.mean_ua,
                    })
                }
                Err(_) => {
                    warn!(
                        "Skipping {}: unknown material \"{}\"",
                        run.name(),
                        record.wire_material
                    );
                    None
                }
            }
        })
        .collect()
}

/// Plots mean current against nominal carbon content, with the carbon range as a horizontal error bar.
pub(crate) fn plot_summary(points: &[SummaryPoint], path: &Path) -> Result<(), CatalogError> {
    if points.is_empty() {
        return Err(CatalogError::NoCuratedRuns);
    }
    let error = |e: DrawingAreaErrorKind<_>| CatalogError::Plot {
        path: path.to_owned(),
        message: e.to_string(),
    };
    let root = BitMapBackend::new(path, (800, 600)).into_drawing_area();
    root.fill(&WHITE).map_err(error)?;

    let carbon = points.iter().map(SummaryPoint::carbon);
    let x_range = padded(
        carbon.clone().map(|c| c.min_pct).fold(Real::INFINITY, Real::min)
            ..carbon.map(|c| c.max_pct).fold(Real::NEG_INFINITY, Real::max),
    );
    let y_range = padded(
        points.iter().map(|p| p.mean_ua).fold(Real::INFINITY, Real::min)
            ..points
                .iter()
                .map(|p| p.mean_ua)
                .fold(Real::NEG_INFINITY, Real::max),
    );

    // No axis labels, the bitmap build has no font backend.
    let mut chart = ChartBuilder::on(&root)
        .margin(10)
        .build_cartesian_2d(x_range, y_range)
        .map_err(error)?;
    chart.configure_mesh().draw().map_err(error)?;

    chart
        .draw_series(points.iter().map(|point| {
            let carbon = point.carbon();
            PathElement::new(
                vec![
                    (carbon.min_pct, point.mean_ua),
                    (carbon.max_pct, point.mean_ua),
                ],
                BLACK,
            )
        }))
        .map_err(error)?;
    chart
        .draw_series(points.iter().map(|point| {
            Circle::new(
                (point.carbon().nominal_pct, point.mean_ua),
                4,
                BLUE.filled(),
            )
        }))
        .map_err(error)?;
    root.present().map_err(error)
}

/// Widens a range by a tenth of its extent, or by a small margin when it is empty.
fn padded(range: Range<Real>) -> Range<Real> {
    let extent = range.end - range.start;
    let pad = if extent > 0.0 {
        extent / 10.0
    } else {
        range.start.abs().max(1e-3) / 10.0
    };
    (range.start - pad)..(range.end + pad)
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_approx_eq::assert_approx_eq;
    use wire_burn_common::{MetaValue, ResultRecord};

    fn processed_run(data_dir: &Path, name: &str, material: &str, post2: bool) -> RunDirectory {
        let run = RunDirectory::new(data_dir.join(name));
        std::fs::create_dir_all(run.post_dir()).expect("create post directory");
        ResultRecord {
            window_samples: 1000,
            threshold_ua: 20.0,
            o2_scfh: 10.0,
            fg_scfh: 4.0,
            fto_ratio: 0.4,
            preheat_scfh: 14.0,
            wire_d_in: 0.0625,
            standoff_in: 0.5,
            cut_o2_psig: 30.0,
            wire_material: material.to_owned(),
            feed_ips: MetaValue::Number(0.5),
            start_index: 10,
            stop_index: 2010,
            window_n: 2,
            mean_ua: 42.0,
            median_ua: 42.0,
            std_ua: 1.0,
            rms_ua: 42.0,
            post2,
        }
        .save(run.results_file())
        .expect("save record");
        run
    }

    #[test]
    fn only_curated_known_materials() {
        let dir = tempfile::tempdir().expect("temporary directory");
        let runs = [
            processed_run(dir.path(), "a", "steel", true),
            processed_run(dir.path(), "b", "iron", false),
            processed_run(dir.path(), "c", "copper", true),
            RunDirectory::new(dir.path().join("d")),
        ];

        let points = curated_points(&runs);
        assert_eq!(
            points,
            [SummaryPoint {
                run: "a".to_owned(),
                material: Material::Steel,
                mean_ua: 42.0,
            }]
        );
        let carbon = points.first().map(SummaryPoint::carbon).expect("one point");
        assert_approx_eq!(carbon.nominal_pct, 0.07);
    }

    #[test]
    fn nothing_to_plot() {
        let dir = tempfile::tempdir().expect("temporary directory");
        let result = plot_summary(&[], &dir.path().join(SUMMARY_PLOT));
        assert!(matches!(result, Err(CatalogError::NoCuratedRuns)));
    }

    #[test]
    fn summary_is_plotted() {
        let dir = tempfile::tempdir().expect("temporary directory");
        let path = dir.path().join(SUMMARY_PLOT);
        let points = [
            SummaryPoint {
                run: "a".to_owned(),
                material: Material::Steel,
                mean_ua: 42.0,
            },
            SummaryPoint {
                run: "b".to_owned(),
                material: Material::Iron,
                mean_ua: 38.5,
            },
        ];
        plot_summary(&points, &path).expect("summary is drawn");
        assert!(path.is_file());
    }

    #[test]
    fn padding_of_a_single_value() {
        let range = padded(42.0..42.0);
        assert!(range.start < 42.0 && range.end > 42.0);
    }
}
