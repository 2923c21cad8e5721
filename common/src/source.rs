//! The calibrated channel source, i.e. the read-only view of one acquisition that the analysis consumes.
//!
//! Turning raw acquisition voltages into physical units happens upstream of this crate.
//! A [CalibratedRun] is the already-calibrated result of that step, stored as JSON.
use crate::{MetaValue, Real};
use serde::{Deserialize, Serialize};
use std::{
    collections::BTreeMap,
    fs::File,
    io::{BufReader, BufWriter},
    path::{Path, PathBuf},
};
use thiserror::Error;
use tracing::instrument;

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("Cannot open {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Cannot parse {path}: {source}")]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("Invalid sample rate {0} Hz")]
    InvalidSampleRate(Real),
    #[error("Channel \"{0}\" contains no samples")]
    EmptyChannel(String),
    #[error("Channel \"{0}\" not found")]
    MissingChannel(String),
    #[error("Metadata \"{0}\" not found")]
    MissingMetadata(String),
    #[error("Metadata \"{key}\" should be {expected}, found {found}")]
    InvalidMetadata {
        key: String,
        expected: &'static str,
        found: MetaValue,
    },
}

/// Read-only access to the channels and metadata of a single run.
pub trait ChannelSource {
    /// Returns the samples of the named channel.
    fn channel(&self, name: &str) -> Result<&[Real], SourceError>;

    /// Returns the sampling frequency in Hz.
    fn sample_hz(&self) -> Real;

    /// Returns the named metadata value, if present.
    fn meta(&self, key: &str) -> Option<&MetaValue>;

    /// The sample period in seconds.
    fn sample_period(&self) -> Real {
        1.0 / self.sample_hz()
    }

    /// Returns the named metadata value, or [SourceError::MissingMetadata].
    fn required_meta(&self, key: &str) -> Result<&MetaValue, SourceError> {
        self.meta(key)
            .ok_or_else(|| SourceError::MissingMetadata(key.to_owned()))
    }

    /// Returns the named metadata value which must be numeric.
    fn meta_number(&self, key: &str) -> Result<Real, SourceError> {
        match self.required_meta(key)? {
            MetaValue::Number(value) => Ok(*value),
            other => Err(SourceError::InvalidMetadata {
                key: key.to_owned(),
                expected: "a number",
                found: other.clone(),
            }),
        }
    }

    /// Returns the named metadata value which must be text.
    fn meta_text(&self, key: &str) -> Result<&str, SourceError> {
        match self.required_meta(key)? {
            MetaValue::Text(value) => Ok(value),
            other => Err(SourceError::InvalidMetadata {
                key: key.to_owned(),
                expected: "text",
                found: other.clone(),
            }),
        }
    }
}

/// One acquisition, after calibration, as stored in `burn.json` and `flow.json`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CalibratedRun {
    /// Sampling frequency in Hz, shared by every channel.
    pub sample_hz: Real,
    /// Run metadata, constant over the acquisition.
    #[serde(default)]
    pub meta: BTreeMap<String, MetaValue>,
    /// Calibrated samples, keyed by channel label.
    pub channels: BTreeMap<String, Vec<Real>>,
}

impl CalibratedRun {
    /// Reads and validates a run from a JSON file.
    #[instrument(skip_all, level = "debug", fields(path = %path.as_ref().display()), err(level = "warn"))]
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, SourceError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| SourceError::Io {
            path: path.to_owned(),
            source,
        })?;
        let run: Self =
            serde_json::from_reader(BufReader::new(file)).map_err(|source| SourceError::Json {
                path: path.to_owned(),
                source,
            })?;
        run.validate()?;
        Ok(run)
    }

    /// Writes the run as JSON.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), SourceError> {
        let path = path.as_ref();
        let file = File::create(path).map_err(|source| SourceError::Io {
            path: path.to_owned(),
            source,
        })?;
        serde_json::to_writer(BufWriter::new(file), self).map_err(|source| SourceError::Json {
            path: path.to_owned(),
            source,
        })
    }

    /// Checks the channel invariants: a positive sample rate and no empty channels.
    pub fn validate(&self) -> Result<(), SourceError> {
        if !(self.sample_hz.is_finite() && self.sample_hz > 0.0) {
            return Err(SourceError::InvalidSampleRate(self.sample_hz));
        }
        if let Some((name, _)) = self.channels.iter().find(|(_, samples)| samples.is_empty()) {
            return Err(SourceError::EmptyChannel(name.clone()));
        }
        Ok(())
    }
}

impl ChannelSource for CalibratedRun {
    fn channel(&self, name: &str) -> Result<&[Real], SourceError> {
        self.channels
            .get(name)
            .map(Vec::as_slice)
            .ok_or_else(|| SourceError::MissingChannel(name.to_owned()))
    }

    fn sample_hz(&self) -> Real {
        self.sample_hz
    }

    fn meta(&self, key: &str) -> Option<&MetaValue> {
        self.meta.get(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run() -> CalibratedRun {
        CalibratedRun {
            sample_hz: 500.0,
            meta: BTreeMap::from([
                ("wire".to_owned(), MetaValue::Text("steel".to_owned())),
                ("wire_d_in".to_owned(), MetaValue::Number(0.0625)),
            ]),
            channels: BTreeMap::from([("Current".to_owned(), vec![1.0, 2.0, 3.0])]),
        }
    }

    #[test]
    fn sample_period_is_reciprocal_of_rate() {
        assert_eq!(run().sample_period(), 0.002);
    }

    #[test]
    fn typed_metadata_access() {
        let run = run();
        assert_eq!(run.meta_number("wire_d_in").ok(), Some(0.0625));
        assert_eq!(run.meta_text("wire").ok(), Some("steel"));
        assert!(matches!(
            run.meta_number("wire"),
            Err(SourceError::InvalidMetadata { .. })
        ));
        assert!(matches!(
            run.meta_text("standoff_in"),
            Err(SourceError::MissingMetadata(key)) if key == "standoff_in"
        ));
    }

    #[test]
    fn missing_channel() {
        assert!(matches!(
            run().channel("Oxygen"),
            Err(SourceError::MissingChannel(name)) if name == "Oxygen"
        ));
    }

    #[test]
    fn validation_rejects_bad_runs() {
        let mut bad_rate = run();
        bad_rate.sample_hz = 0.0;
        assert!(matches!(
            bad_rate.validate(),
            Err(SourceError::InvalidSampleRate(_))
        ));

        let mut empty = run();
        empty.channels.insert("Voltage".to_owned(), Vec::new());
        assert!(matches!(
            empty.validate(),
            Err(SourceError::EmptyChannel(name)) if name == "Voltage"
        ));
    }

    #[test]
    fn load_from_json_file() {
        let dir = tempfile::tempdir().expect("temporary directory");
        let path = dir.path().join("burn.json");
        std::fs::write(
            &path,
            r#"{
                "sample_hz": 1000,
                "meta": { "wire": "iron", "feed_ips": "0.5 ramp" },
                "channels": { "Current": [0.0, 25.0, 0.0] }
            }"#,
        )
        .expect("write source");
        let run = CalibratedRun::load(&path).expect("source loads");
        assert_eq!(run.sample_hz(), 1000.0);
        assert_eq!(run.meta_text("feed_ips").ok(), Some("0.5 ramp"));
        assert_eq!(run.channel("Current").ok(), Some([0.0, 25.0, 0.0].as_slice()));
    }

    #[test]
    fn load_rejects_invalid_run() {
        let dir = tempfile::tempdir().expect("temporary directory");
        let path = dir.path().join("flow.json");
        std::fs::write(&path, r#"{ "sample_hz": -1, "channels": {} }"#).expect("write source");
        assert!(matches!(
            CalibratedRun::load(&path),
            Err(SourceError::InvalidSampleRate(_))
        ));
        assert!(matches!(
            CalibratedRun::load(dir.path().join("missing.json")),
            Err(SourceError::Io { .. })
        ));
    }
}
