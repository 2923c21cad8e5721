//! Carbon content of the wire materials used in the burn tests.
use strum::{Display, EnumIter, EnumString};
use wire_burn_common::Real;

/// Carbon content of a material, in weight percent.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct CarbonContent {
    pub(crate) min_pct: Real,
    pub(crate) nominal_pct: Real,
    pub(crate) max_pct: Real,
}

/// A wire material, named as in the `wire` metadata of each run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Display, EnumString, EnumIter)]
#[strum(serialize_all = "lowercase")]
pub(crate) enum Material {
    Iron,
    Steel,
    Stainless,
}

impl Material {
    pub(crate) fn carbon(&self) -> CarbonContent {
        match self {
            Material::Iron => CarbonContent {
                min_pct: 0.0,
                nominal_pct: 0.0,
                max_pct: 0.005,
            },
            Material::Steel => CarbonContent {
                min_pct: 0.06,
                nominal_pct: 0.07,
                max_pct: 0.08,
            },
            Material::Stainless => CarbonContent {
                min_pct: 0.0,
                nominal_pct: 0.0,
                max_pct: 0.008,
            },
        }
    }
}
