//! shared fixtures for unit tests

use crate::ingest::{MetricRecord, METRIC_FIELDS};

/// report body as emitted by the benchmark client, one `"KEY": value,` pair per line
pub fn report_body(values: &[&str; 11]) -> String {
    METRIC_FIELDS
        .iter()
        .zip(values.iter())
        .map(|(field, value)| format!("  \"{}\": {value},\n", field.key))
        .collect()
}

/// full runner output with ant noise around the report region
pub fn runner_output(values: &[&str; 11]) -> String {
    format!(
        "Buildfile: build.xml\n\nhstore-benchmark:\n  [java] Starting client\n  [java] <json>\n{}  [java] \"END\": 0\n  [java] </json>\n\nBUILD SUCCESSFUL\n",
        report_body(values)
            .lines()
            .map(|line| format!("  [java] {line}\n"))
            .collect::<String>()
    )
}

pub const SAMPLE: [&str; 11] = [
    "12.5", "3.75", "25000", "1200", "340", "11000", "14000", "800.5", "0.9", "45.2", "2.1",
];

/// record with the given throughput and latency, remaining fields from `SAMPLE`
pub fn record(throughput: &str, latency: &str) -> MetricRecord {
    let mut values: [String; 11] = SAMPLE.map(String::from);
    values[0] = throughput.to_owned();
    values[1] = latency.to_owned();

    MetricRecord::new(values)
}
