use crate::sweep::{Axis, Grid};
use chrono::{Datelike, Local, Timelike};
use serde::{Deserialize, Serialize};
use std::{fs, path::Path, path::PathBuf};
use thiserror::Error;
use tracing::{error, warn};

/// step between consecutive threads-per-host values
pub const THREADS_STEP: i64 = 5;
/// step between consecutive transaction rates
pub const RATE_STEP: i64 = 100;
/// step between consecutive command log timeouts
pub const TIMEOUT_STEP: i64 = 10;

pub const DEFAULT_RUNNER: &str = "ant hstore-benchmark";

#[derive(Error, Debug)]
pub enum ConfigErrors {
    #[error("Failed to read config file {path:?}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Config file is invalid")]
    Parse(#[from] serde_yaml::Error),
    #[error("Config failed preflight checks")]
    Preflight,
}

#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct SweepConfig {
    // benchmark project handed to the runner
    #[serde(default = "default_project")]
    pub project: String,
    #[serde(default = "default_output_path")]
    pub output: PathBuf,
    // stop the innermost loop once throughput and latency settled
    #[serde(default)]
    pub stop: bool,
    // command the overrides are appended to
    #[serde(default = "default_runner")]
    pub runner: String,

    #[serde(default = "default_threads")]
    pub tmin: i64,
    #[serde(default = "default_threads")]
    pub tmax: i64,
    #[serde(default = "default_rate")]
    pub rmin: i64,
    #[serde(default = "default_rate")]
    pub rmax: i64,
    #[serde(default = "default_timeout")]
    pub lmin: i64,
    #[serde(default = "default_timeout")]
    pub lmax: i64,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            project: default_project(),
            output: default_output_path(),
            stop: false,
            runner: default_runner(),
            tmin: default_threads(),
            tmax: default_threads(),
            rmin: default_rate(),
            rmax: default_rate(),
            lmin: default_timeout(),
            lmax: default_timeout(),
        }
    }
}

impl SweepConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigErrors> {
        let text = fs::read_to_string(path).map_err(|source| ConfigErrors::Read {
            path: path.to_path_buf(),
            source,
        })?;

        Self::from_yaml(&text)
    }

    pub fn from_yaml(text: &str) -> Result<Self, ConfigErrors> {
        Ok(serde_yaml::from_str(text)?)
    }

    pub fn grid(&self) -> Grid {
        Grid {
            threads: Axis::new(self.tmin, self.tmax, THREADS_STEP),
            rate: Axis::new(self.rmin, self.rmax, RATE_STEP),
            timeout: Axis::new(self.lmin, self.lmax, TIMEOUT_STEP),
        }
    }

    /// Report every problem at once instead of piece-by-piece. Returns whether an error was
    /// found, warnings alone do not stop the sweep.
    pub fn preflight_checks(&self) -> bool {
        let mut contains_error = false;

        if self.runner.trim().is_empty() {
            error!("runner must not be empty, there is nothing to invoke");
            contains_error = true;
        }

        if self.project.trim().is_empty() {
            warn!("project is empty, the runner will fall back to its own default");
        }

        for (name, min, max) in [
            ("threads per host", self.tmin, self.tmax),
            ("transaction rate", self.rmin, self.rmax),
            ("log timeout", self.lmin, self.lmax),
        ] {
            if min > max {
                warn!("Minimum {name} ({min}) exceeds maximum ({max}), no benchmark will run");
            }
        }

        contains_error
    }
}

fn default_project() -> String {
    String::from("tpcc")
}

fn default_runner() -> String {
    String::from(DEFAULT_RUNNER)
}

fn default_threads() -> i64 {
    10
}

fn default_rate() -> i64 {
    1000
}

fn default_timeout() -> i64 {
    10
}

/// `experiment<year>_<month>_<day>_<hour>_<minute>_<second>.txt`, local time, unpadded
pub fn default_output_path() -> PathBuf {
    let now = Local::now();

    PathBuf::from(format!(
        "experiment{}_{}_{}_{}_{}_{}.txt",
        now.year(),
        now.month(),
        now.day(),
        now.hour(),
        now.minute(),
        now.second()
    ))
}
