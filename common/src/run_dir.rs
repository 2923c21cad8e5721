//! Layout of a run directory, and lookup of run directories under the data directory.
//!
//! ```text
//! <data-dir>/<run>/burn.json              calibrated burn acquisition
//! <data-dir>/<run>/flow.json              calibrated flow acquisition
//! <data-dir>/<run>/post1/results.json     result record
//! <data-dir>/<run>/post1/current.png      whole-segment plot
//! <data-dir>/<run>/post1/windows/<n>.png  per-window plots
//! ```
use crate::{POST_NAME, PriorResult};
use std::{
    fs,
    path::{Path, PathBuf},
};
use thiserror::Error;

pub const BURN_FILE: &str = "burn.json";
pub const FLOW_FILE: &str = "flow.json";
pub const RESULTS_FILE: &str = "results.json";
pub const WINDOWS_DIR: &str = "windows";
pub const SEGMENT_PLOT: &str = "current.png";

#[derive(Debug, Error)]
pub enum RunDirError {
    #[error("Cannot read data directory {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to find a data directory ending with: \"{0}\"")]
    NoRunMatch(String),
    #[error("Found multiple data directories ending with: \"{suffix}\": {matches:?}")]
    AmbiguousRunMatch {
        suffix: String,
        matches: Vec<String>,
    },
}

/// A single test's directory, named by its acquisition time stamp.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct RunDirectory {
    name: String,
    path: PathBuf,
}

impl RunDirectory {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        let path = path.into();
        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.to_string_lossy().into_owned());
        Self { name, path }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn burn_file(&self) -> PathBuf {
        self.path.join(BURN_FILE)
    }

    pub fn flow_file(&self) -> PathBuf {
        self.path.join(FLOW_FILE)
    }

    pub fn post_dir(&self) -> PathBuf {
        self.path.join(POST_NAME)
    }

    pub fn results_file(&self) -> PathBuf {
        self.post_dir().join(RESULTS_FILE)
    }

    pub fn windows_dir(&self) -> PathBuf {
        self.post_dir().join(WINDOWS_DIR)
    }

    pub fn segment_plot(&self) -> PathBuf {
        self.post_dir().join(SEGMENT_PLOT)
    }

    pub fn window_plot(&self, count: usize) -> PathBuf {
        self.windows_dir().join(format!("{count}.png"))
    }

    /// Reads back whatever a previous processing of this run left behind.
    pub fn prior_result(&self) -> PriorResult {
        PriorResult::read(&self.post_dir(), &self.results_file())
    }

    /// Lists every run directory under `data_dir`, sorted by name.
    ///
    /// Plain files in `data_dir` are ignored.
    pub fn list(data_dir: &Path) -> Result<Vec<Self>, RunDirError> {
        let io_error = |source| RunDirError::Io {
            path: data_dir.to_owned(),
            source,
        };
        let mut runs = Vec::new();
        for entry in fs::read_dir(data_dir).map_err(io_error)? {
            let path = entry.map_err(io_error)?.path();
            if path.is_dir() {
                runs.push(Self::new(path));
            }
        }
        runs.sort();
        Ok(runs)
    }

    /// Finds the unique run directory whose name ends with `suffix`.
    pub fn find(data_dir: &Path, suffix: &str) -> Result<Self, RunDirError> {
        let mut matches = Self::list(data_dir)?
            .into_iter()
            .filter(|run| run.name.ends_with(suffix))
            .collect::<Vec<_>>();
        match matches.len() {
            0 => Err(RunDirError::NoRunMatch(suffix.to_owned())),
            1 => matches
                .pop()
                .ok_or_else(|| RunDirError::NoRunMatch(suffix.to_owned())),
            _ => Err(RunDirError::AmbiguousRunMatch {
                suffix: suffix.to_owned(),
                matches: matches.into_iter().map(|run| run.name).collect(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn data_dir() -> tempfile::TempDir {
        let dir = tempfile::tempdir().expect("temporary directory");
        for name in ["20240301101500", "20240301113000", "20240302090000"] {
            fs::create_dir(dir.path().join(name)).expect("create run directory");
        }
        fs::write(dir.path().join("notes1500"), "not a run").expect("write file");
        dir
    }

    #[test]
    fn list_is_sorted_and_skips_files() {
        let dir = data_dir();
        let names = RunDirectory::list(dir.path())
            .expect("data directory lists")
            .into_iter()
            .map(|run| run.name().to_owned())
            .collect::<Vec<_>>();
        assert_eq!(
            names,
            vec!["20240301101500", "20240301113000", "20240302090000"]
        );
    }

    #[test]
    fn unique_suffix_resolves() {
        let dir = data_dir();
        let run = RunDirectory::find(dir.path(), "090000").expect("run is found");
        assert_eq!(run.name(), "20240302090000");
        assert_eq!(run.path(), dir.path().join("20240302090000"));
    }

    #[test]
    fn suffix_matching_ignores_plain_files() {
        let dir = data_dir();
        let run = RunDirectory::find(dir.path(), "1500").expect("run is found");
        assert_eq!(run.name(), "20240301101500");
    }

    #[test]
    fn missing_and_ambiguous_suffixes() {
        let dir = data_dir();
        assert!(matches!(
            RunDirectory::find(dir.path(), "999"),
            Err(RunDirError::NoRunMatch(suffix)) if suffix == "999"
        ));
        assert!(matches!(
            RunDirectory::find(dir.path(), "00"),
            Err(RunDirError::AmbiguousRunMatch { matches, .. }) if matches.len() == 3
        ));
    }

    #[test]
    fn output_layout() {
        let run = RunDirectory::new("/data/20240301101500");
        assert_eq!(run.burn_file(), Path::new("/data/20240301101500/burn.json"));
        assert_eq!(
            run.results_file(),
            Path::new("/data/20240301101500/post1/results.json")
        );
        assert_eq!(
            run.window_plot(7),
            Path::new("/data/20240301101500/post1/windows/7.png")
        );
        assert_eq!(
            run.segment_plot(),
            Path::new("/data/20240301101500/post1/current.png")
        );
    }

    #[test]
    fn unprocessed_run_has_no_prior_result() {
        let dir = data_dir();
        let run = RunDirectory::new(dir.path().join("20240301101500"));
        assert!(matches!(run.prior_result(), PriorResult::NotProcessed));
    }
}
