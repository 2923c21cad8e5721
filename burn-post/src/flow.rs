//! Summarises the gas flows measured immediately before the burn.
use crate::{
    analysis::{Real, stats::mean},
    processing::RunError,
};
use wire_burn_common::{ChannelSource, SourceError};

pub(crate) const OXYGEN_CHANNEL: &str = "Oxygen";
pub(crate) const FUEL_GAS_CHANNEL: &str = "Fuel Gas";

/// Mean flows, in scfh, and the quantities derived from them.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct FlowSummary {
    pub(crate) o2_scfh: Real,
    pub(crate) fg_scfh: Real,
}

impl FlowSummary {
    pub(crate) fn from_source<S: ChannelSource>(source: &S) -> Result<Self, RunError> {
        let channel_mean = |name: &str| {
            let samples = source.channel(name)?;
            mean(samples).ok_or_else(|| SourceError::EmptyChannel(name.to_owned()))
        };
        let o2_scfh = channel_mean(OXYGEN_CHANNEL)?;
        let fg_scfh = channel_mean(FUEL_GAS_CHANNEL)?;
        if o2_scfh == 0.0 {
            return Err(RunError::ZeroOxygenFlow);
        }
        Ok(Self { o2_scfh, fg_scfh })
    }

    /// Fuel gas to oxygen ratio.
    pub(crate) fn fto_ratio(&self) -> Real {
        self.fg_scfh / self.o2_scfh
    }

    /// Total preheat flow.
    pub(crate) fn preheat_scfh(&self) -> Real {
        self.o2_scfh + self.fg_scfh
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_approx_eq::assert_approx_eq;
    use wire_burn_common::CalibratedRun;

    fn flow_run(oxygen: Vec<Real>, fuel_gas: Vec<Real>) -> CalibratedRun {
        CalibratedRun {
            sample_hz: 100.0,
            channels: [
                (OXYGEN_CHANNEL.to_owned(), oxygen),
                (FUEL_GAS_CHANNEL.to_owned(), fuel_gas),
            ]
            .into(),
            ..Default::default()
        }
    }

    #[test]
    fn derived_flows() {
        let flow = FlowSummary::from_source(&flow_run(vec![9.0, 11.0], vec![3.0, 5.0]))
            .expect("flows are valid");
        assert_approx_eq!(flow.o2_scfh, 10.0);
        assert_approx_eq!(flow.fg_scfh, 4.0);
        assert_approx_eq!(flow.fto_ratio(), 0.4);
        assert_approx_eq!(flow.preheat_scfh(), 14.0);
    }

    #[test]
    fn zero_oxygen() {
        let result = FlowSummary::from_source(&flow_run(vec![0.0, 0.0], vec![3.0]));
        assert!(matches!(result, Err(RunError::ZeroOxygenFlow)));
    }

    #[test]
    fn missing_channel() {
        let mut run = flow_run(vec![1.0], vec![1.0]);
        run.channels.remove(FUEL_GAS_CHANNEL);
        let result = FlowSummary::from_source(&run);
        assert!(matches!(
            result,
            Err(RunError::Source(SourceError::MissingChannel(name))) if name == FUEL_GAS_CHANNEL
        ));
    }
}
