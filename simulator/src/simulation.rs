use crate::noise::{Noise, NoiseAttributes};
use rand::Rng;
use serde::Deserialize;
use std::{
    collections::BTreeMap,
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
};
use thiserror::Error;
use tracing::{info, instrument};
use wire_burn_common::{
    CalibratedRun, MetaValue, Real, SourceError,
    run_dir::{BURN_FILE, FLOW_FILE},
};

const CURRENT_CHANNEL: &str = "Current";
const OXYGEN_CHANNEL: &str = "Oxygen";
const FUEL_GAS_CHANNEL: &str = "Fuel Gas";

#[derive(Debug, Error)]
pub(crate) enum SimulationError {
    #[error("Cannot access {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Invalid simulation {path}: {source}")]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("{0} should be positive and finite")]
    NotPositive(&'static str),
    #[error("Standard deviation {0} should not be negative")]
    NegativeDeviation(Real),
    #[error("Invalid Normal Distribution: {0}")]
    NormalDistribution(#[from] rand_distr::NormalError),
    #[error("Invalid Uniform Distribution: {0}")]
    UniformDistribution(#[from] rand_distr::uniform::Error),
    #[error(transparent)]
    Source(#[from] SourceError),
}

/// A closed interval of time, in seconds.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub(crate) struct Interval {
    pub(crate) min: Real,
    pub(crate) max: Real,
}

impl Interval {
    fn contains(&self, time: Real) -> bool {
        (self.min..=self.max).contains(&time)
    }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub(crate) struct CurrentTemplate {
    /// Mean current while the wire burns, in uA.
    pub(crate) level: Real,
    /// Added to the current while the wire burns.
    #[serde(default)]
    pub(crate) noise: Option<NoiseAttributes>,
    /// Added to the current outside the burn.
    #[serde(default)]
    pub(crate) background: Option<NoiseAttributes>,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub(crate) struct FlowTemplate {
    pub(crate) sample_rate: Real,
    pub(crate) samples: usize,
    /// Mean oxygen flow, in scfh.
    pub(crate) oxygen: Real,
    /// Mean fuel gas flow, in scfh.
    pub(crate) fuel_gas: Real,
    #[serde(default)]
    pub(crate) noise: Option<NoiseAttributes>,
}

///
/// This struct is created from the configuration JSON file.
///
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub(crate) struct Simulation {
    /// Samples per second of the burn acquisition.
    pub(crate) sample_rate: Real,
    /// Length of the burn acquisition, in seconds.
    pub(crate) duration: Real,
    /// When the wire is burning.
    pub(crate) burn: Interval,
    pub(crate) current: CurrentTemplate,
    pub(crate) flow: FlowTemplate,
    /// Copied into the burn acquisition.
    #[serde(default)]
    pub(crate) meta: BTreeMap<String, MetaValue>,
}

/// The two acquisitions of one synthetic run.
#[derive(Clone, Debug)]
pub(crate) struct SimulatedRun {
    pub(crate) burn: CalibratedRun,
    pub(crate) flow: CalibratedRun,
}

impl Simulation {
    pub(crate) fn load(path: &Path) -> Result<Self, SimulationError> {
        let file = File::open(path).map_err(|source| SimulationError::Io {
            path: path.to_owned(),
            source,
        })?;
        serde_json::from_reader(BufReader::new(file)).map_err(|source| SimulationError::Json {
            path: path.to_owned(),
            source,
        })
    }

    fn validate(&self) -> Result<(), SimulationError> {
        let positive = |value: Real| value.is_finite() && value > 0.0;
        if !positive(self.sample_rate) {
            return Err(SimulationError::NotPositive("sample-rate"));
        }
        if !positive(self.duration) {
            return Err(SimulationError::NotPositive("duration"));
        }
        if !positive(self.flow.sample_rate) {
            return Err(SimulationError::NotPositive("flow.sample-rate"));
        }
        if self.flow.samples == 0 {
            return Err(SimulationError::NotPositive("flow.samples"));
        }
        Ok(())
    }

    #[instrument(skip_all, level = "debug", err(level = "error"))]
    pub(crate) fn generate<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
    ) -> Result<SimulatedRun, SimulationError> {
        self.validate()?;
        let burn_noise = Noise::new(self.current.noise.as_ref())?;
        let background = Noise::new(self.current.background.as_ref())?;
        let flow_noise = Noise::new(self.flow.noise.as_ref())?;

        let num_samples = (self.duration * self.sample_rate).round().max(1.0) as usize;
        let current = (0..num_samples)
            .map(|index| {
                let time = index as Real / self.sample_rate;
                if self.burn.contains(time) {
                    self.current.level + burn_noise.sample(rng)
                } else {
                    background.sample(rng)
                }
            })
            .collect();
        let mut flow_channel = |mean: Real| {
            (0..self.flow.samples)
                .map(|_| mean + flow_noise.sample(rng))
                .collect::<Vec<_>>()
        };
        let oxygen = flow_channel(self.flow.oxygen);
        let fuel_gas = flow_channel(self.flow.fuel_gas);

        Ok(SimulatedRun {
            burn: CalibratedRun {
                sample_hz: self.sample_rate,
                meta: self.meta.clone(),
                channels: [(CURRENT_CHANNEL.to_owned(), current)].into(),
            },
            flow: CalibratedRun {
                sample_hz: self.flow.sample_rate,
                meta: BTreeMap::new(),
                channels: [
                    (OXYGEN_CHANNEL.to_owned(), oxygen),
                    (FUEL_GAS_CHANNEL.to_owned(), fuel_gas),
                ]
                .into(),
            },
        })
    }
}

impl SimulatedRun {
    /// Creates `run_dir` and writes both acquisitions into it.
    #[instrument(skip_all, fields(run_dir = %run_dir.display()), err(level = "error"))]
    pub(crate) fn write(&self, run_dir: &Path) -> Result<(), SimulationError> {
        std::fs::create_dir_all(run_dir).map_err(|source| SimulationError::Io {
            path: run_dir.to_owned(),
            source,
        })?;
        self.burn.save(run_dir.join(BURN_FILE))?;
        self.flow.save(run_dir.join(FLOW_FILE))?;
        info!("Wrote {}", run_dir.display());
        Ok(())
    }
}
