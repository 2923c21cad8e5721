//! One line per run directory, showing how far it has been processed.
use std::fmt::{Display, Formatter};
use wire_burn_common::{CalibratedRun, ChannelSource, PriorResult, RunDirectory};

const UNKNOWN_MATERIAL: &str = "NONE";
const WIRE_MATERIAL_KEY: &str = "wire";

/// What the catalog knows about a single run.
#[derive(Debug)]
pub(crate) struct RunEntry {
    pub(crate) name: String,
    pub(crate) prior: PriorResult,
    pub(crate) material: String,
}

impl RunEntry {
    /// Inspects a run directory. Unreadable files are reported in the entry rather than as an error.
    pub(crate) fn inspect(run: &RunDirectory) -> Self {
        let prior = run.prior_result();
        let material = prior
            .record()
            .map(|record| record.wire_material.clone())
            .or_else(|| burn_material(run))
            .unwrap_or_else(|| UNKNOWN_MATERIAL.to_owned());
        Self {
            name: run.name().to_owned(),
            prior,
            material,
        }
    }

    fn processed_flag(&self) -> char {
        match self.prior {
            PriorResult::NotProcessed => ' ',
            PriorResult::Processed(_) => '1',
            PriorResult::Unreadable(_) => '!',
        }
    }

    fn curated_flag(&self) -> char {
        if self.prior.is_curated() { '2' } else { ' ' }
    }
}

impl Display for RunEntry {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{:<14} {}{} {}",
            self.name,
            self.processed_flag(),
            self.curated_flag(),
            self.material
        )
    }
}

/// The wire material recorded in the run's burn acquisition, if it can be read.
fn burn_material(run: &RunDirectory) -> Option<String> {
    let burn = CalibratedRun::load(run.burn_file()).ok()?;
    burn.meta_text(WIRE_MATERIAL_KEY).ok().map(ToOwned::to_owned)
}
