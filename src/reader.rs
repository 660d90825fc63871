// src/reader.rs

use crate::aggregate::{Aggregator, MetricsMap};
use crate::error::ReadError;
use crate::parsers::LogRecord;
use crate::rules::PathTransformingRule;
use std::collections::HashSet;
use std::io::BufRead;
use tracing::{debug, instrument, warn};

/// Turns a decompressed access log file into a [`MetricsMap`].
#[derive(Debug, Clone, Default)]
pub struct MetricsReader {
    path_transforming_rules: Vec<PathTransformingRule>,
    target_paths: HashSet<String>,
}

impl MetricsReader {
    pub fn new(
        path_transforming_rules: Vec<PathTransformingRule>,
        target_paths: impl IntoIterator<Item = String>,
    ) -> Self {
        Self {
            path_transforming_rules,
            target_paths: target_paths.into_iter().collect(),
        }
    }

    /// Reads the whole file. The first line that fails to parse aborts the
    /// read, and nothing aggregated so far is returned.
    #[instrument(skip_all)]
    pub fn read<R: BufRead>(&self, reader: R) -> Result<MetricsMap, ReadError> {
        let mut aggregator = Aggregator::new(&self.target_paths);

        let mut num_lines = 0;
        for (index, line) in reader.lines().enumerate() {
            let line = line?;
            num_lines += 1;

            let record = match LogRecord::parse(&line, &self.path_transforming_rules) {
                Ok(record) => record,
                Err(error) => {
                    warn!(line_number = index + 1, %error, "Failed to parse ALB log record: {line}");
                    return Err(ReadError::line(index + 1, error));
                }
            };

            aggregator.add(&record);
        }

        debug!(
            num_lines,
            accepted = aggregator.accepted(),
            dropped = aggregator.dropped(),
            "Finished reading log file"
        );

        let metrics = aggregator.finish();
        debug!(num_metrics = metrics.len(), "Aggregated metrics");

        Ok(metrics)
    }
}
