use crate::{
    ingest::{MetricRecord, METRIC_FIELDS},
    sweep::GridPoint,
};
use itertools::Itertools;
use std::{
    fs::File,
    io::{BufWriter, Write},
    path::{Path, PathBuf},
};
use thiserror::Error;
use tracing::debug;

/// columns for the three sweep parameters, followed by the metric columns
pub const PARAMETER_COLUMNS: [&str; 3] = [
    "client.threads_per_host",
    "client.txnrate",
    "site.commandlog_timeout",
];

#[derive(Error, Debug)]
pub enum SinkError {
    #[error("Failed to create result file {path:?}")]
    Create {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to write result row")]
    Write(#[from] std::io::Error),
}

/// space separated header line, without newline
pub fn header() -> String {
    PARAMETER_COLUMNS
        .iter()
        .copied()
        .chain(METRIC_FIELDS.iter().map(|field| field.column))
        .join(" ")
}

/// Append-only result table. The header is written on creation and every row is flushed
/// as soon as it is appended.
#[derive(Debug)]
pub struct ResultSink<W: Write> {
    writer: W,
    rows: usize,
}

impl ResultSink<BufWriter<File>> {
    /// create or truncate `path`
    pub fn create(path: &Path) -> Result<Self, SinkError> {
        let file = File::create(path).map_err(|source| SinkError::Create {
            path: path.to_path_buf(),
            source,
        })?;

        debug!(path = ?path, "Created result file");

        Self::new(BufWriter::new(file))
    }
}

impl<W: Write> ResultSink<W> {
    pub fn new(mut writer: W) -> Result<Self, SinkError> {
        writeln!(writer, "{}", header())?;
        writer.flush()?;

        Ok(Self { writer, rows: 0 })
    }

    pub fn append(&mut self, point: &GridPoint, record: &MetricRecord) -> Result<(), SinkError> {
        writeln!(self.writer, "{point} {record}")?;
        self.writer.flush()?;
        self.rows += 1;

        Ok(())
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::record;

    #[test]
    fn header_has_fourteen_columns() {
        assert_eq!(
            header(),
            "client.threads_per_host client.txnrate site.commandlog_timeout THROUGHPUT(txn/s) \
             AVGLATENCY(ms) TotalTXN Distributed SpecExec THMIN THMAX THSTDDEV LAMIN LAMAX LASTDDEV"
        );
        assert_eq!(header().split(' ').count(), 14);
    }

    #[test]
    fn rows_follow_header_order() {
        let mut sink = ResultSink::new(Vec::new()).unwrap();
        let point = GridPoint {
            threads: 10,
            rate: 1000,
            timeout: 10,
        };

        sink.append(&point, &record("12.5", "3.75")).unwrap();
        assert_eq!(sink.rows(), 1);

        let text = String::from_utf8(sink.into_inner()).unwrap();
        let lines = text.lines().collect::<Vec<_>>();

        assert_eq!(lines.len(), 2);
        assert_eq!(
            lines[1],
            "10 1000 10 12.5 3.75 25000 1200 340 11000 14000 800.5 0.9 45.2 2.1"
        );
        assert!(text.ends_with('\n'));
    }

    #[test]
    fn create_truncates_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("results.txt");
        std::fs::write(&path, "stale\nstale\n").unwrap();

        let sink = ResultSink::create(&path).unwrap();
        drop(sink);

        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            format!("{}\n", header())
        );
    }

    #[test]
    fn create_in_missing_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("results.txt");

        assert!(matches!(
            ResultSink::create(&path),
            Err(SinkError::Create { .. })
        ));
    }
}
