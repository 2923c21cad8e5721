//! Types and helpers shared by the wire burn post-processing tools.
//!
//! * [source] defines the calibrated channel source consumed by the analysis.
//! * [record] defines the per-run result record and how prior results are read back.
//! * [run_dir] describes the on-disk layout of a run directory and how runs are found.
pub mod record;
pub mod run_dir;
pub mod source;

pub use record::{MetaValue, PriorResult, RecordError, ResultRecord};
pub use run_dir::{RunDirError, RunDirectory};
pub use source::{CalibratedRun, ChannelSource, SourceError};

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// A calibrated sample value, in the physical units of its channel.
pub type Real = f64;

/// Index of a sample within a channel.
pub type SampleIndex = usize;

/// Name under which the first post-processing stage identifies itself, and the
/// name of the directory it writes into.
pub const POST_NAME: &str = "post1";

/// Builds the version string reported by each component's `--version` flag.
#[macro_export]
macro_rules! version {
    () => {
        $crate::const_format::concatcp!(
            env!("CARGO_PKG_VERSION"),
            " (",
            $crate::git_version::git_version!(args = ["--always", "--dirty"], fallback = "unknown"),
            ")"
        )
    };
}

#[doc(hidden)]
pub use const_format;
#[doc(hidden)]
pub use git_version;

/// Installs the global tracing subscriber.
///
/// The filter is read from `RUST_LOG`; when it is unset or invalid `info` is used.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false))
        .init();
}
