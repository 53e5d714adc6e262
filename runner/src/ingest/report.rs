use super::IngestorError;
use itertools::Itertools;
use once_cell::sync::Lazy;
use regex::{Regex, RegexBuilder};
use std::fmt;
use tracing::{debug, trace};

/// prefix the build tool puts in front of every line forwarded from the benchmark client
pub const LOG_PREFIX: &str = "  [java] ";

/// number of leading fields shown in the live monitoring line
pub const SUMMARY_FIELDS: usize = 7;

/// One named metric of the benchmark report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MetricField {
    pub name: &'static str,
    /// key as it appears inside the report region
    pub key: &'static str,
    /// column label used in the result file header
    pub column: &'static str,
}

impl MetricField {
    const fn new(name: &'static str, key: &'static str, column: &'static str) -> Self {
        Self { name, key, column }
    }
}

/// Extraction schema, in record and column order.
pub const METRIC_FIELDS: [MetricField; 11] = [
    MetricField::new("throughput", "TXNPERMILLI", "THROUGHPUT(txn/s)"),
    MetricField::new("average-latency", "TOTALAVGLATENCY", "AVGLATENCY(ms)"),
    MetricField::new("total-transaction-count", "TXNTOTALCOUNT", "TotalTXN"),
    MetricField::new(
        "distributed-transaction-count",
        "DTXNTOTALCOUNT",
        "Distributed",
    ),
    MetricField::new(
        "speculative-execution-count",
        "SPECEXECTOTALCOUNT",
        "SpecExec",
    ),
    MetricField::new("min-throughput", "TXNMINPERSECOND", "THMIN"),
    MetricField::new("max-throughput", "TXNMAXPERSECOND", "THMAX"),
    MetricField::new("throughput-stddev", "STDDEVTXNPERSECOND", "THSTDDEV"),
    MetricField::new("min-latency", "TOTALMINLATENCY", "LAMIN"),
    MetricField::new("max-latency", "TOTALMAXLATENCY", "LAMAX"),
    MetricField::new("latency-stddev", "TOTALSTDEVLATENCY", "LASTDDEV"),
];

pub const FIELD_COUNT: usize = METRIC_FIELDS.len();

const THROUGHPUT: usize = 0;
const LATENCY: usize = 1;

static REPORT_REGION: Lazy<Regex> = Lazy::new(|| {
    RegexBuilder::new("<json>(.*?)</json>")
        .case_insensitive(true)
        .dot_matches_new_line(true)
        .build()
        .expect("report region pattern is valid")
});

// one pattern per schema entry, same order as METRIC_FIELDS
static FIELD_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    METRIC_FIELDS
        .iter()
        .map(|field| {
            RegexBuilder::new(&format!("{}: (.*?),", regex::escape(field.key)))
                .case_insensitive(true)
                .build()
                .expect("metric field pattern is valid")
        })
        .collect()
});

/// Metrics of a single benchmark run, values kept verbatim as found in the report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricRecord {
    values: [String; FIELD_COUNT],
}

impl MetricRecord {
    pub fn new(values: [String; FIELD_COUNT]) -> Self {
        Self { values }
    }

    pub fn values(&self) -> &[String] {
        &self.values
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        METRIC_FIELDS
            .iter()
            .position(|field| field.name == name)
            .map(|index| self.values[index].as_str())
    }

    pub fn throughput(&self) -> Result<f64, IngestorError> {
        self.numeric(THROUGHPUT)
    }

    pub fn latency(&self) -> Result<f64, IngestorError> {
        self.numeric(LATENCY)
    }

    /// condensed line of the core fields for live monitoring
    pub fn summary(&self) -> String {
        self.values[..SUMMARY_FIELDS].iter().join(" ")
    }

    fn numeric(&self, index: usize) -> Result<f64, IngestorError> {
        let value = &self.values[index];

        value
            .trim()
            .parse::<f64>()
            .map_err(|_| IngestorError::NotNumeric {
                key: METRIC_FIELDS[index].key,
                value: value.clone(),
            })
    }
}

impl fmt::Display for MetricRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.values.iter().join(" "))
    }
}

/// Extract the metric record from raw runner output.
///
/// The first `<json>` region is located (case-insensitive, across lines) after stripping the
/// build tool's log prefix, collapsed into a single line without quotes and then searched for
/// `KEY: value,` for every entry of [`METRIC_FIELDS`]. The first match of each key wins.
pub fn extract(raw: &str) -> Result<MetricRecord, IngestorError> {
    let cleaned = raw.replace(LOG_PREFIX, " ");

    let region = REPORT_REGION
        .captures(&cleaned)
        .and_then(|captures| captures.get(1))
        .ok_or(IngestorError::MissingReport)?;

    let collapsed: String = region
        .as_str()
        .chars()
        .filter(|c| !matches!(c, '\n' | '\r' | '"'))
        .collect();

    debug!(length = collapsed.len(), "Located report region");
    trace!("Collapsed report: {collapsed}");

    let mut values: [String; FIELD_COUNT] = Default::default();

    for ((slot, field), pattern) in values
        .iter_mut()
        .zip(METRIC_FIELDS.iter())
        .zip(FIELD_PATTERNS.iter())
    {
        *slot = pattern
            .captures(&collapsed)
            .and_then(|captures| captures.get(1))
            .map(|value| value.as_str().to_owned())
            .ok_or(IngestorError::MissingField { key: field.key })?;
    }

    Ok(MetricRecord::new(values))
}
