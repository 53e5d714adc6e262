use super::{Executor, ExecutorError, Invocation};
use crate::ingest::RunOutput;
use std::{process::Command, time::Instant};
use tracing::{debug, trace, warn};

/// Executor that runs the benchmark through the local shell and blocks until it exits
#[derive(Debug, Clone)]
pub struct LocalExecutor {
    shell: String,
}

impl Default for LocalExecutor {
    fn default() -> Self {
        Self {
            shell: String::from("sh"),
        }
    }
}

impl LocalExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_shell(shell: impl Into<String>) -> Self {
        Self {
            shell: shell.into(),
        }
    }
}

impl Executor for LocalExecutor {
    fn execute(&mut self, invocation: &Invocation) -> Result<RunOutput, ExecutorError> {
        let command = invocation.command_line();
        let start = Instant::now();

        let output = Command::new(&self.shell)
            .arg("-c")
            .arg(&command)
            .output()
            .map_err(|source| ExecutorError::Spawn {
                command: command.clone(),
                source,
            })?;

        let elapsed = start.elapsed();
        let status = output
            .status
            .code()
            .ok_or_else(|| ExecutorError::Terminated {
                command: command.clone(),
            })?;

        debug!(
            "Finished in {} ms | status: {status} | {} bytes of output",
            elapsed.as_millis(),
            output.stdout.len() + output.stderr.len()
        );

        let run = RunOutput {
            runtime: elapsed.as_nanos(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            status,
        };
        trace!("Output: {}", run.stdout);

        if !run.success() {
            warn!("Benchmark runner exited with status {status}, attempting to extract anyway");
        }

        Ok(run)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn invocation(verb: &str) -> Invocation {
        Invocation {
            verb: verb.to_owned(),
            overrides: Vec::new(),
        }
    }

    #[test]
    fn captures_stdout_and_stderr() {
        let output = LocalExecutor::new()
            .execute(&invocation("echo out; echo err 1>&2"))
            .unwrap();

        assert!(output.success());
        assert_eq!(output.combined(), "out\nerr\n");
    }

    #[test]
    fn non_zero_exit_is_not_an_error() {
        let output = LocalExecutor::new()
            .execute(&invocation("echo partial; exit 3"))
            .unwrap();

        assert_eq!(output.status, 3);
        assert_eq!(output.stdout, "partial\n");
    }

    #[test]
    fn overrides_reach_the_command() {
        let mut invocation = invocation("echo");
        invocation
            .overrides
            .push(("client.txnrate".to_owned(), "1000".to_owned()));

        let output = LocalExecutor::new().execute(&invocation).unwrap();

        assert_eq!(output.stdout, "-Dclient.txnrate=1000\n");
    }

    #[test]
    fn missing_shell_fails_to_spawn() {
        let result = LocalExecutor::with_shell("/nonexistent/shell").execute(&invocation("true"));

        assert!(matches!(result, Err(ExecutorError::Spawn { .. })));
    }
}
