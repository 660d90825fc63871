// src/export.rs

use crate::aggregate::{Metric, MetricsMap};
use crate::config::Config;
use crate::error::ExportError;
use serde::Serialize;
use tracing::{debug, instrument};

const COUNT_INTERVAL_SECS: u32 = 60;

/// A request count time series, one point per second.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CountSeries {
    pub metric: String,
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub interval: u32,
    pub unit: &'static str,
    pub points: Vec<CountPoint>,
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CountPoint {
    pub timestamp: i64,
    pub value: f64,
}

/// A target processing time distribution. Each point carries every sample
/// of one second.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DistributionSeries {
    pub metric: String,
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub points: Vec<(i64, Vec<f64>)>,
    pub tags: Vec<String>,
}

/// Everything built from one log file, ready to be submitted.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Payload {
    pub series: Vec<CountSeries>,
    pub distributions: Vec<DistributionSeries>,
}

#[derive(Debug, Clone, Default)]
pub struct Exporter {
    request_count_metric_name: String,
    target_processing_time_metric_name: String,
    custom_tags: Vec<(String, String)>,
}

impl Exporter {
    pub fn new(
        request_count_metric_name: impl Into<String>,
        target_processing_time_metric_name: impl Into<String>,
    ) -> Self {
        Self {
            request_count_metric_name: request_count_metric_name.into(),
            target_processing_time_metric_name: target_processing_time_metric_name.into(),
            custom_tags: Vec::new(),
        }
    }

    /// Resolves the configured custom tags from the environment. Unset
    /// variables produce an empty tag value.
    pub fn from_config(config: &Config) -> Self {
        let exporter = Self::new(
            &config.request_count_metric_name,
            &config.target_processing_time_metric_name,
        );

        config.custom_tags.iter().fold(exporter, |exporter, tag| {
            let value = std::env::var(&tag.env_key).unwrap_or_default();
            exporter.with_custom_tag(&tag.name, value)
        })
    }

    pub fn with_custom_tag(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.custom_tags.push((name.into(), value.into()));
        self
    }

    /// Builds the series of all metrics. `object_key` is the key of the log
    /// file in its bucket and provides the `ip_address` tag.
    #[instrument(skip(self, metrics))]
    pub fn build(&self, metrics: &MetricsMap, object_key: &str) -> Result<Payload, ExportError> {
        let ip_address = load_balancer_ip_address(object_key)?;

        let mut metrics = metrics.values().collect::<Vec<_>>();
        metrics.sort_by(|a, b| a.identity.cmp(&b.identity));

        let mut payload = Payload::default();
        for metric in metrics {
            if let Some(series) = self.request_count_series(metric, ip_address) {
                payload.series.push(series);
            }
            payload
                .distributions
                .push(self.target_processing_time_series(metric));
        }

        debug!(
            num_series = payload.series.len(),
            num_distributions = payload.distributions.len(),
            "Built metric series"
        );

        Ok(payload)
    }

    /// `None` when no request count metric name is configured.
    pub fn request_count_series(&self, metric: &Metric, ip_address: &str) -> Option<CountSeries> {
        if self.request_count_metric_name.is_empty() {
            return None;
        }

        let points = metric
            .request_counts
            .iter()
            .map(|(timestamp, count)| CountPoint {
                timestamp: timestamp.as_secs(),
                value: *count as f64,
            })
            .collect();

        let mut tags = self.identity_tags(metric);
        tags.push(format!("ip_address:{ip_address}"));
        tags.extend(self.custom_tags());

        Some(CountSeries {
            metric: self.request_count_metric_name.clone(),
            kind: "count",
            interval: COUNT_INTERVAL_SECS,
            unit: "request",
            points,
            tags,
        })
    }

    pub fn target_processing_time_series(&self, metric: &Metric) -> DistributionSeries {
        let points = metric
            .target_processing_times
            .iter()
            .map(|(timestamp, samples)| (timestamp.as_secs(), samples.clone()))
            .collect();

        let mut tags = self.identity_tags(metric);
        tags.push(format!(
            "target_status_code_group:{}",
            metric.target_status_code_group()
        ));
        tags.extend(self.custom_tags());

        DistributionSeries {
            metric: self.target_processing_time_metric_name.clone(),
            kind: "distribution",
            points,
            tags,
        }
    }

    fn identity_tags(&self, metric: &Metric) -> Vec<String> {
        let id = &metric.identity;
        vec![
            format!("elb:{}", id.elb),
            format!("target_group_arn:{}", id.target_group_arn),
            format!("path:{}", id.path),
            format!("method:{}", id.method),
            format!("elb_status_code:{}", id.elb_status_code),
            format!("target_status_code:{}", id.target_status_code),
        ]
    }

    fn custom_tags(&self) -> impl Iterator<Item = String> + '_ {
        self.custom_tags
            .iter()
            .map(|(name, value)| format!("{name}:{value}"))
    }
}

/// Extracts the load balancer IP address from the key of an access log
/// object, e.g. `.../123456789012_elasticloadbalancing_us-east-2_app.my-loadbalancer.1234567890abcdef_20140215T2340Z_172.160.001.192_20sg8hgm.log.gz`.
pub fn load_balancer_ip_address(object_key: &str) -> Result<&str, ExportError> {
    let file_name = object_key.rsplit('/').next().unwrap_or(object_key);
    file_name
        .split('_')
        .nth(5)
        .ok_or_else(|| ExportError::MalformedObjectKey {
            key: object_key.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::MetricIdentity;
    use crate::reader::MetricsReader;
    use crate::test_utils::*;
    use crate::time::Timestamp;
    use claims::{assert_err, assert_ok, assert_some};
    use insta::assert_snapshot;
    use serde_json::json;
    use std::io::Cursor;

    const OBJECT_KEY: &str = "s3://my-bucket/prefix/AWSLogs/123456789012/elasticloadbalancing/us-east-2/2016/05/01/123456789012_elasticloadbalancing_us-east-2_net.app.my-loadbalancer.1234567890abcdef_20140215T2340Z_172.160.001.192_20sg8hgm.log.gz";

    fn metric() -> Metric {
        let mut metric = Metric::new(MetricIdentity {
            elb: "app/my-loadbalancer/50dc6c495c0c9188".to_string(),
            target_group_arn: "tg".to_string(),
            method: "GET".to_string(),
            path: "/".to_string(),
            elb_status_code: "200".to_string(),
            target_status_code: "200".to_string(),
        });
        metric.add(Timestamp(1), 1.0);
        metric.add(Timestamp(1), 2.0);
        metric.add(Timestamp(2), 3.0);
        metric.add(Timestamp(2), 4.0);
        metric
    }

    #[test]
    fn test_load_balancer_ip_address() {
        assert_eq!(
            assert_ok!(load_balancer_ip_address(OBJECT_KEY)),
            "172.160.001.192"
        );

        let with_underscore = OBJECT_KEY.replace("/prefix/", "/pre_fix/");
        assert_eq!(
            assert_ok!(load_balancer_ip_address(&with_underscore)),
            "172.160.001.192"
        );

        let without_prefix = OBJECT_KEY.replace("/prefix/", "/");
        assert_eq!(
            assert_ok!(load_balancer_ip_address(&without_prefix)),
            "172.160.001.192"
        );
    }

    #[test]
    fn test_load_balancer_ip_address_malformed() {
        let error = assert_err!(load_balancer_ip_address("logs/pre_fix/access.log.gz"));
        assert_snapshot!(error, @r#"cannot derive load balancer ip address from object key "logs/pre_fix/access.log.gz""#);
    }

    #[test]
    fn test_target_processing_time_series() {
        let exporter = Exporter::new("", "target_processing_time").with_custom_tag("env", "prod");
        let series = exporter.target_processing_time_series(&metric());

        assert_eq!(
            assert_ok!(serde_json::to_value(&series)),
            json!({
                "metric": "target_processing_time",
                "type": "distribution",
                "points": [[1, [1.0, 2.0]], [2, [3.0, 4.0]]],
                "tags": [
                    "elb:app/my-loadbalancer/50dc6c495c0c9188",
                    "target_group_arn:tg",
                    "path:/",
                    "method:GET",
                    "elb_status_code:200",
                    "target_status_code:200",
                    "target_status_code_group:2xx",
                    "env:prod",
                ],
            })
        );
    }

    #[test]
    fn test_request_count_series() {
        let exporter = Exporter::new("request_count", "target_processing_time");
        let series = assert_some!(exporter.request_count_series(&metric(), "10.0.0.1"));

        assert_eq!(
            assert_ok!(serde_json::to_value(&series)),
            json!({
                "metric": "request_count",
                "type": "count",
                "interval": 60,
                "unit": "request",
                "points": [
                    {"timestamp": 1, "value": 2.0},
                    {"timestamp": 2, "value": 2.0},
                ],
                "tags": [
                    "elb:app/my-loadbalancer/50dc6c495c0c9188",
                    "target_group_arn:tg",
                    "path:/",
                    "method:GET",
                    "elb_status_code:200",
                    "target_status_code:200",
                    "ip_address:10.0.0.1",
                ],
            })
        );
    }

    #[test]
    fn test_build() {
        let _guard = enable_tracing_output();

        let reader = MetricsReader::new(vec![], ["/".to_string()]);
        let input = format!("{HTTPS_ENTRY}\n{COULD_NOT_DISPATCH_ENTRY}\n");
        let metrics = assert_ok!(reader.read(Cursor::new(input)));

        let exporter = Exporter::new("request_count", "target_processing_time");
        let payload = assert_ok!(exporter.build(&metrics, OBJECT_KEY));

        assert_eq!(payload.series.len(), 2);
        assert_eq!(payload.distributions.len(), 2);

        // Sorted by identity, so the record without target group comes first.
        let dispatch_failure = &payload.distributions[0];
        assert_eq!(dispatch_failure.points, vec![(1655079960, vec![-1.0])]);
        assert!(dispatch_failure
            .tags
            .contains(&"target_status_code_group:-".to_string()));

        let success = &payload.distributions[1];
        assert_eq!(success.points, vec![(1530570180, vec![0.048])]);
        assert!(payload.series[1]
            .tags
            .contains(&"ip_address:172.160.001.192".to_string()));
    }

    #[test]
    fn test_build_without_count_metric() {
        let reader = MetricsReader::new(vec![], ["/".to_string()]);
        let metrics = assert_ok!(reader.read(Cursor::new(HTTPS_ENTRY)));

        let exporter = Exporter::new("", "target_processing_time");
        let payload = assert_ok!(exporter.build(&metrics, OBJECT_KEY));
        assert!(payload.series.is_empty());
        assert_eq!(payload.distributions.len(), 1);
    }

    #[test]
    fn test_from_config() {
        let config = assert_ok!(Config::from_yaml_str(
            r#"
request_count_metrics_name: request_count
target_processing_time_metrics_name: target_processing_time
custom_tags:
  - name: team
    env_key: ALB_LOG_METRICS_TEST_UNSET_VARIABLE
"#
        ));
        let exporter = Exporter::from_config(&config);

        let series = exporter.target_processing_time_series(&metric());
        assert_eq!(series.tags.last().map(String::as_str), Some("team:"));
    }
}
