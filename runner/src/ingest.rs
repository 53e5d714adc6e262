pub mod report;


pub use report::{extract, MetricField, MetricRecord, METRIC_FIELDS};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum IngestorError {
    #[error("Runner output contains no <json> report region")]
    MissingReport,
    #[error("Report is missing field {key}")]
    MissingField { key: &'static str },
    #[error("Field {key} is not numeric: {value:?}")]
    NotNumeric { key: &'static str, value: String },
}

#[derive(Debug, Clone, Default)]
/// container for information extracted from running the benchmark
/// supposed to be interpreted by the report extractor
pub struct RunOutput {
    pub runtime: u128,
    pub stdout: String,
    pub stderr: String,
    pub status: i32,
}

impl RunOutput {
    pub fn new() -> Self {
        Self::default()
    }

    /// stdout followed by stderr, the single text blob handed to `extract`
    pub fn combined(&self) -> String {
        let mut text = String::with_capacity(self.stdout.len() + self.stderr.len());
        text.push_str(&self.stdout);
        text.push_str(&self.stderr);
        text
    }

    pub fn success(&self) -> bool {
        self.status == 0
    }
}
