use clap::{ArgAction, Parser};
use hstore_sweep_runner::{
    config::{ConfigErrors, SweepConfig},
    executors::LocalExecutor,
    sink::ResultSink,
    sweep::Sweep,
};
use std::{error::Error, path::PathBuf, process::ExitCode};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// Sweep H-Store benchmark parameters and collect the reported metrics into a table.
#[derive(Parser, Debug)]
#[command(name = "hstore-sweep", version)]
struct Args {
    /// YAML file with sweep settings, command line flags take precedence over it.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Benchmark name [default: tpcc].
    #[arg(short, long)]
    project: Option<String>,

    /// Result file [default: experiment<timestamp>.txt].
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Stop a log timeout series once throughput and latency have settled.
    #[arg(long)]
    stop: bool,

    /// Command the benchmark overrides are appended to [default: ant hstore-benchmark].
    #[arg(long)]
    runner: Option<String>,

    /// Minimum threads per host [default: 10].
    #[arg(long, allow_negative_numbers = true)]
    tmin: Option<i64>,

    /// Maximum threads per host [default: 10].
    #[arg(long, allow_negative_numbers = true)]
    tmax: Option<i64>,

    /// Minimum transaction rate [default: 1000].
    #[arg(long, allow_negative_numbers = true)]
    rmin: Option<i64>,

    /// Maximum transaction rate [default: 1000].
    #[arg(long, allow_negative_numbers = true)]
    rmax: Option<i64>,

    /// Minimum command log timeout [default: 10].
    #[arg(long, allow_negative_numbers = true)]
    lmin: Option<i64>,

    /// Maximum command log timeout [default: 10].
    #[arg(long, allow_negative_numbers = true)]
    lmax: Option<i64>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

impl Args {
    /// config file (if any) with command line overrides applied, checked before use
    fn resolve(&self) -> Result<SweepConfig, ConfigErrors> {
        let mut config = match self.config {
            Some(ref path) => SweepConfig::load(path)?,
            None => SweepConfig::default(),
        };

        if let Some(ref project) = self.project {
            config.project = project.clone();
        }
        if let Some(ref output) = self.output {
            config.output = output.clone();
        }
        if let Some(ref runner) = self.runner {
            config.runner = runner.clone();
        }
        config.stop |= self.stop;

        for (value, target) in [
            (self.tmin, &mut config.tmin),
            (self.tmax, &mut config.tmax),
            (self.rmin, &mut config.rmin),
            (self.rmax, &mut config.rmax),
            (self.lmin, &mut config.lmin),
            (self.lmax, &mut config.lmax),
        ] {
            if let Some(value) = value {
                *target = value;
            }
        }

        if config.preflight_checks() {
            Err(ConfigErrors::Preflight)
        } else {
            Ok(config)
        }
    }

    fn default_level(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }
}

fn log_error(context: &str, error: &dyn Error) {
    let mut message = error.to_string();
    let mut source = error.source();

    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }

    error!("{context}: {message}");
}

fn main() -> ExitCode {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(args.default_level())),
        )
        .init();

    let config = match args.resolve() {
        Ok(config) => config,
        Err(error) => {
            log_error("Invalid configuration", &error);
            return ExitCode::from(2);
        }
    };

    println!(
        "{} {} {} {} {} {} {} {} {}",
        config.project,
        config.output.display(),
        config.stop,
        config.tmin,
        config.tmax,
        config.rmin,
        config.rmax,
        config.lmin,
        config.lmax
    );

    let sink = match ResultSink::create(&config.output) {
        Ok(sink) => sink,
        Err(error) => {
            log_error("Failed to open result file", &error);
            return ExitCode::FAILURE;
        }
    };

    match Sweep::new(&config, LocalExecutor::new(), sink).run() {
        Ok(summary) => {
            info!(
                runs = summary.runs,
                early_stops = summary.early_stops,
                "Done with processing, results in {}",
                config.output.display()
            );
            ExitCode::SUCCESS
        }
        Err(error) => {
            log_error("Sweep aborted", &error);
            ExitCode::FAILURE
        }
    }
}
