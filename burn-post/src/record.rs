//! Assembles the result record from the analysis, the flows, and the run metadata.
use crate::{
    analysis::{AggregateStats, Real, Segment},
    flow::FlowSummary,
    parameters::AnalysisSettings,
};
use wire_burn_common::{ChannelSource, MetaValue, ResultRecord, SourceError};

/// Metadata keys read from the burn acquisition.
pub(crate) const WIRE_DIAMETER_KEY: &str = "wire_d_in";
pub(crate) const STANDOFF_KEY: &str = "standoff_in";
pub(crate) const CUT_OXYGEN_KEY: &str = "cut_o2_psig";
pub(crate) const WIRE_MATERIAL_KEY: &str = "wire";
pub(crate) const FEED_KEY: &str = "feed_ips";

/// The test conditions echoed into the result record.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct RunMetadata {
    pub(crate) wire_d_in: Real,
    pub(crate) standoff_in: Real,
    pub(crate) cut_o2_psig: Real,
    pub(crate) wire_material: String,
    pub(crate) feed_ips: MetaValue,
}

impl RunMetadata {
    pub(crate) fn from_source<S: ChannelSource>(source: &S) -> Result<Self, SourceError> {
        Ok(Self {
            wire_d_in: source.meta_number(WIRE_DIAMETER_KEY)?,
            standoff_in: source.meta_number(STANDOFF_KEY)?,
            cut_o2_psig: source.meta_number(CUT_OXYGEN_KEY)?,
            wire_material: source.meta_text(WIRE_MATERIAL_KEY)?.to_owned(),
            feed_ips: source.required_meta(FEED_KEY)?.clone(),
        })
    }
}

/// Combines everything known about the run into its record.
pub(crate) fn build_record(
    settings: &AnalysisSettings,
    flow: &FlowSummary,
    metadata: RunMetadata,
    segment: &Segment,
    aggregate: &AggregateStats,
) -> ResultRecord {
    let RunMetadata {
        wire_d_in,
        standoff_in,
        cut_o2_psig,
        wire_material,
        feed_ips,
    } = metadata;
    ResultRecord {
        window_samples: settings.window_samples.get(),
        threshold_ua: settings.threshold_ua,
        o2_scfh: flow.o2_scfh,
        fg_scfh: flow.fg_scfh,
        fto_ratio: flow.fto_ratio(),
        preheat_scfh: flow.preheat_scfh(),
        wire_d_in,
        standoff_in,
        cut_o2_psig,
        wire_material,
        feed_ips,
        start_index: segment.start_index(),
        stop_index: segment.stop_index(),
        window_n: segment.window_count(settings.window_samples),
        mean_ua: aggregate.mean,
        median_ua: aggregate.median,
        std_ua: aggregate.std,
        rms_ua: aggregate.rms,
        post2: false,
    }
}
