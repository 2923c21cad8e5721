//! The result record written once per processed run, and the ways of reading it back.
use crate::{Real, SampleIndex};
use serde::{Deserialize, Serialize};
use std::{
    fmt::{Display, Formatter},
    fs::File,
    io::{BufReader, BufWriter, Write},
    path::{Path, PathBuf},
};
use thiserror::Error;

/// A scalar metadata value, as recorded by the acquisition.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetaValue {
    Number(Real),
    Text(String),
}

impl Display for MetaValue {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            MetaValue::Number(value) => write!(f, "{value}"),
            MetaValue::Text(value) => write!(f, "\"{value}\""),
        }
    }
}

impl From<Real> for MetaValue {
    fn from(value: Real) -> Self {
        Self::Number(value)
    }
}

impl From<&str> for MetaValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

#[derive(Debug, Error)]
pub enum RecordError {
    #[error("Cannot access {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Malformed result {path}: {source}")]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// Summary of one processed burn test.
///
/// Field names are the keys of `results.json`, which downstream tools address by name.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ResultRecord {
    /// Number of samples in each statistics window.
    pub window_samples: usize,
    /// Current threshold used to find the start and end of the burn.
    pub threshold_ua: Real,

    /// Mean oxygen flow measured before the burn.
    pub o2_scfh: Real,
    /// Mean fuel gas flow measured before the burn.
    pub fg_scfh: Real,
    /// Fuel to oxygen ratio.
    pub fto_ratio: Real,
    /// Total preheat flow.
    pub preheat_scfh: Real,

    pub wire_d_in: Real,
    pub standoff_in: Real,
    pub cut_o2_psig: Real,
    pub wire_material: String,
    pub feed_ips: MetaValue,

    pub start_index: SampleIndex,
    pub stop_index: SampleIndex,
    /// Number of full windows between `start_index` and `stop_index`.
    pub window_n: usize,

    pub mean_ua: Real,
    pub median_ua: Real,
    pub std_ua: Real,
    pub rms_ua: Real,

    /// Set by hand to include the run in cross-run summaries.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub post2: bool,
}

impl ResultRecord {
    /// Reads a record from a `results.json` file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, RecordError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| RecordError::Io {
            path: path.to_owned(),
            source,
        })?;
        serde_json::from_reader(BufReader::new(file)).map_err(|source| RecordError::Json {
            path: path.to_owned(),
            source,
        })
    }

    /// Writes the record as indented JSON, replacing any existing file.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), RecordError> {
        let path = path.as_ref();
        let io_error = |source| RecordError::Io {
            path: path.to_owned(),
            source,
        };
        let mut writer = BufWriter::new(File::create(path).map_err(io_error)?);
        serde_json::to_writer_pretty(&mut writer, self).map_err(|source| RecordError::Json {
            path: path.to_owned(),
            source,
        })?;
        writer.write_all(b"\n").map_err(io_error)?;
        writer.flush().map_err(io_error)
    }
}

/// What is known about a run's previous processing.
#[derive(Debug)]
pub enum PriorResult {
    /// The run has no result directory.
    NotProcessed,
    /// The run was processed and its record could be read.
    Processed(Box<ResultRecord>),
    /// A result directory exists but its record could not be read.
    Unreadable(RecordError),
}

impl PriorResult {
    /// Inspects `post_dir`, the run's result directory, and the record inside it.
    pub fn read(post_dir: &Path, results_file: &Path) -> Self {
        if !post_dir.is_dir() {
            return Self::NotProcessed;
        }
        match ResultRecord::load(results_file) {
            Ok(record) => Self::Processed(Box::new(record)),
            Err(e) => Self::Unreadable(e),
        }
    }

    /// Returns the record, if it could be read.
    pub fn record(&self) -> Option<&ResultRecord> {
        match self {
            Self::Processed(record) => Some(record),
            _ => None,
        }
    }

    /// True when the run was processed and marked for inclusion in summaries.
    pub fn is_curated(&self) -> bool {
        self.record().is_some_and(|record| record.post2)
    }
}
