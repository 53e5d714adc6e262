pub mod grid;


pub use grid::{Axis, Grid, GridIter, GridPoint};

use crate::{
    config::SweepConfig,
    executors::{Executor, ExecutorError, Invocation},
    ingest::{extract, IngestorError, MetricRecord},
    sink::{ResultSink, SinkError},
    stats::coefficient_of_variation,
};
use std::io::Write;
use thiserror::Error;
use tracing::{debug, info, instrument};

/// number of most recent runs the stopping rule looks at
pub const STOP_WINDOW: usize = 5;
/// coefficient of variation below which a metric counts as settled
pub const STOP_THRESHOLD: f64 = 0.03;

#[derive(Error, Debug)]
pub enum SweepError {
    #[error("Benchmark run failed")]
    Executor(#[from] ExecutorError),
    #[error("Failed to extract metrics from benchmark output")]
    Ingest(#[from] IngestorError),
    #[error("Failed to store results")]
    Sink(#[from] SinkError),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SweepSummary {
    pub runs: usize,
    pub early_stops: usize,
}

/// Whether throughput and latency both settled over the last [`STOP_WINDOW`] records.
///
/// Fewer records than the window never converge. A zero mean gives a non-finite coefficient,
/// which never passes the threshold.
pub fn has_converged(history: &[MetricRecord]) -> Result<bool, IngestorError> {
    if history.len() < STOP_WINDOW {
        return Ok(false);
    }

    let window = &history[history.len() - STOP_WINDOW..];
    let throughput = window
        .iter()
        .map(MetricRecord::throughput)
        .collect::<Result<Vec<_>, _>>()?;
    let latency = window
        .iter()
        .map(MetricRecord::latency)
        .collect::<Result<Vec<_>, _>>()?;

    let settled = |values: &[f64]| {
        coefficient_of_variation(values).map_or(false, |variation| variation < STOP_THRESHOLD)
    };

    Ok(settled(&throughput) && settled(&latency))
}

/// Drives the benchmark over the whole grid, strictly one run at a time.
pub struct Sweep<E: Executor, W: Write> {
    grid: Grid,
    project: String,
    runner: String,
    stop: bool,
    executor: E,
    sink: ResultSink<W>,
    history: Vec<MetricRecord>,
}

impl<E: Executor, W: Write> Sweep<E, W> {
    pub fn new(config: &SweepConfig, executor: E, sink: ResultSink<W>) -> Self {
        Self {
            grid: config.grid(),
            project: config.project.clone(),
            runner: config.runner.clone(),
            stop: config.stop,
            executor,
            sink,
            history: Vec::new(),
        }
    }

    /// Run every grid point, skipping the remaining log timeouts of a (threads, rate) pair once
    /// the stopping rule fires. The first failure aborts the sweep; rows written up to that
    /// point stay in the sink.
    pub fn run(&mut self) -> Result<SweepSummary, SweepError> {
        let mut summary = SweepSummary::default();
        let mut points = self.grid.iter();

        info!("Sweeping {} configurations", self.grid.len());

        while let Some(point) = points.next() {
            self.run_point(&point)?;
            summary.runs += 1;
            info!("Done with run {}", summary.runs);

            if self.stop && has_converged(&self.history)? {
                info!(
                    threads = point.threads,
                    rate = point.rate,
                    "Throughput and latency settled, skipping remaining log timeouts"
                );
                summary.early_stops += 1;
                points.skip_innermost();
            }
        }

        Ok(summary)
    }

    #[instrument(skip(self), level = "debug")]
    fn run_point(&mut self, point: &GridPoint) -> Result<(), SweepError> {
        let invocation = Invocation::benchmark(&self.runner, &self.project, point);

        println!("running benchmark with following configuration:");
        println!("{invocation}");

        let output = self.executor.execute(&invocation)?;
        let record = extract(&output.combined())?;
        debug!("Extracted {record}");

        println!(" {}", record.summary());

        self.sink.append(point, &record)?;
        self.history.push(record);

        Ok(())
    }

    pub fn history(&self) -> &[MetricRecord] {
        &self.history
    }

    pub fn into_parts(self) -> (E, ResultSink<W>) {
        (self.executor, self.sink)
    }
}
