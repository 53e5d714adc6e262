pub mod local;

pub use local::LocalExecutor;

use crate::{ingest::RunOutput, sweep::GridPoint};
use std::fmt;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExecutorError {
    #[error("Failed to spawn benchmark runner `{command}`")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Benchmark runner `{command}` was terminated by a signal")]
    Terminated { command: String },
}

/// Command line for one benchmark run: the runner verb followed by `-Dkey=value` overrides.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Invocation {
    pub verb: String,
    pub overrides: Vec<(String, String)>,
}

impl Invocation {
    /// invocation of the benchmark harness for a single grid point
    pub fn benchmark(verb: &str, project: &str, point: &GridPoint) -> Self {
        let overrides = [
            ("project", project.to_owned()),
            ("client.output_results_json", "true".to_owned()),
            ("client.blocking", "true".to_owned()),
            ("client.threads_per_host", point.threads.to_string()),
            ("client.txnrate", point.rate.to_string()),
            ("site.commandlog_timeout", point.timeout.to_string()),
        ]
        .into_iter()
        .map(|(key, value)| (key.to_owned(), value))
        .collect();

        Self {
            verb: verb.to_owned(),
            overrides,
        }
    }

    pub fn command_line(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.verb)?;

        for (key, value) in self.overrides.iter() {
            write!(f, " -D{key}={value}")?;
        }

        Ok(())
    }
}

/// Runs benchmark invocations to completion, one at a time.
pub trait Executor {
    fn execute(&mut self, invocation: &Invocation) -> Result<RunOutput, ExecutorError>;
}

impl<E: Executor + ?Sized> Executor for &mut E {
    fn execute(&mut self, invocation: &Invocation) -> Result<RunOutput, ExecutorError> {
        (**self).execute(invocation)
    }
}
