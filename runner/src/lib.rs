pub mod config;
pub mod executors;
pub mod ingest;
pub mod sink;
pub mod stats;
pub mod sweep;

#[cfg(test)]
mod testing;
