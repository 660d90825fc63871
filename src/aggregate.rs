// src/aggregate.rs

use crate::parsers::LogRecord;
use crate::status::status_code_group;
use crate::time::Timestamp;
use derive_more::Deref;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::fmt::{self, Debug};

/// Records with equal identities are aggregated into the same [`Metric`].
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MetricIdentity {
    pub elb: String,
    pub target_group_arn: String,
    pub method: String,
    pub path: String,
    pub elb_status_code: String,
    pub target_status_code: String,
}

impl MetricIdentity {
    pub fn from_record(record: &LogRecord) -> Self {
        Self {
            elb: record.elb.clone(),
            target_group_arn: record.target_group_arn.clone(),
            method: record.request_method.clone(),
            path: record.request_path.clone(),
            elb_status_code: record.elb_status_code.clone(),
            target_status_code: record.target_status_code.clone(),
        }
    }
}

/// Per-second request counts and target processing times of one identity.
#[derive(Debug, Clone, PartialEq)]
pub struct Metric {
    pub identity: MetricIdentity,
    pub request_counts: BTreeMap<Timestamp, u64>,
    /// Samples of each second, in the order their lines were read.
    pub target_processing_times: BTreeMap<Timestamp, Vec<f64>>,
}

impl Metric {
    pub fn new(identity: MetricIdentity) -> Self {
        Self {
            identity,
            request_counts: BTreeMap::new(),
            target_processing_times: BTreeMap::new(),
        }
    }

    /// Counts one request at `timestamp` and keeps its target processing time.
    pub fn add(&mut self, timestamp: Timestamp, target_processing_time: f64) {
        *self.request_counts.entry(timestamp).or_default() += 1;
        self.target_processing_times
            .entry(timestamp)
            .or_default()
            .push(target_processing_time);
    }

    pub fn target_status_code_group(&self) -> &'static str {
        status_code_group(&self.identity.target_status_code)
    }

    pub fn total_requests(&self) -> u64 {
        self.request_counts.values().sum()
    }
}

/// The finished result of aggregating one log file.
#[derive(Clone, Default, Deref)]
pub struct MetricsMap(HashMap<MetricIdentity, Metric>);

impl MetricsMap {
    /// Returns the total number of requests across all metrics.
    pub fn total_requests(&self) -> u64 {
        self.0.values().map(Metric::total_requests).sum()
    }
}

impl Debug for MetricsMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut metrics = self.0.values().collect::<Vec<_>>();
        metrics.sort_by(|a, b| a.identity.cmp(&b.identity));

        f.write_str("MetricsMap {\n")?;
        for metric in metrics {
            let id = &metric.identity;
            writeln!(
                f,
                "    {} {} {} {} {} {}",
                id.elb, id.target_group_arn, id.method, id.path, id.elb_status_code, id.target_status_code
            )?;
            for (timestamp, count) in &metric.request_counts {
                let samples = metric
                    .target_processing_times
                    .get(timestamp)
                    .map(Vec::as_slice)
                    .unwrap_or_default();
                writeln!(f, "        {timestamp} .. {count} {samples:?}")?;
            }
        }
        f.write_str("}")?;

        Ok(())
    }
}

/// Accumulates records whose resolved path is in the allow-list.
///
/// The aggregator owns the in-progress map; [`Aggregator::finish`] hands it
/// over as a [`MetricsMap`] and no further records can be added.
#[derive(Debug)]
pub struct Aggregator<'a> {
    target_paths: &'a HashSet<String>,
    metrics: HashMap<MetricIdentity, Metric>,
    accepted: usize,
    dropped: usize,
}

impl<'a> Aggregator<'a> {
    pub fn new(target_paths: &'a HashSet<String>) -> Self {
        Self {
            target_paths,
            metrics: HashMap::new(),
            accepted: 0,
            dropped: 0,
        }
    }

    /// Adds a record. Returns `false` if it was dropped because its path is
    /// not allow-listed.
    pub fn add(&mut self, record: &LogRecord) -> bool {
        if !self.target_paths.contains(&record.request_path) {
            self.dropped += 1;
            return false;
        }

        let identity = MetricIdentity::from_record(record);
        self.metrics
            .entry(identity)
            .or_insert_with_key(|identity| Metric::new(identity.clone()))
            .add(record.timestamp(), record.target_processing_time);

        self.accepted += 1;
        true
    }

    pub fn accepted(&self) -> usize {
        self.accepted
    }

    pub fn dropped(&self) -> usize {
        self.dropped
    }

    pub fn finish(self) -> MetricsMap {
        MetricsMap(self.metrics)
    }
}
