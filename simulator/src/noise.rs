use crate::simulation::SimulationError;
use rand::Rng;
use rand_distr::{Distribution, Normal, Uniform};
use serde::Deserialize;
use wire_burn_common::Real;

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "kebab-case", tag = "noise-type")]
pub(crate) enum NoiseAttributes {
    Uniform { min: Real, max: Real },
    Gaussian { mean: Real, sd: Real },
}

/// A noise distribution, checked and ready to sample.
#[derive(Clone, Debug)]
pub(crate) enum Noise {
    None,
    Uniform(Uniform<Real>),
    Gaussian(Normal<Real>),
}

impl Noise {
    pub(crate) fn new(attributes: Option<&NoiseAttributes>) -> Result<Self, SimulationError> {
        Ok(match attributes {
            None => Self::None,
            Some(NoiseAttributes::Uniform { min, max }) => {
                Self::Uniform(Uniform::new_inclusive(*min, *max)?)
            }
            Some(NoiseAttributes::Gaussian { sd, .. }) if *sd < 0.0 => {
                return Err(SimulationError::NegativeDeviation(*sd));
            }
            Some(NoiseAttributes::Gaussian { mean, sd }) => Self::Gaussian(Normal::new(*mean, *sd)?),
        })
    }

    pub(crate) fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Real {
        match self {
            Self::None => 0.0,
            Self::Uniform(distribution) => distribution.sample(rng),
            Self::Gaussian(distribution) => distribution.sample(rng),
        }
    }
}
