// File: src/parsers/mod.rs

pub mod alb;
pub mod request;

use crate::error::ParseError;
use crate::rules::{transform_path, PathTransformingRule};
use crate::time::Timestamp;
use chrono::{DateTime, Utc};
use serde::Serialize;

pub use request::{parse_request_line, RequestLine};

/// One entry of an Application Load Balancer access log.
///
/// Non-numeric fields keep the `-` sentinel verbatim. The byte counters and
/// `matched_rule_priority` turn `-` into `0`. Processing times are stored as
/// logged, so `-1` ("could not dispatch") is kept as `-1.0`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LogRecord {
    pub r#type: String,
    pub time: DateTime<Utc>,
    pub elb: String,
    pub client_port: String,
    pub target_port: String,
    pub request_processing_time: f64,
    pub target_processing_time: f64,
    pub response_processing_time: f64,
    pub elb_status_code: String,
    pub target_status_code: String,
    pub received_bytes: u64,
    pub sent_bytes: u64,
    pub request: String,
    pub user_agent: String,
    pub ssl_cipher: String,
    pub ssl_protocol: String,
    pub target_group_arn: String,
    pub trace_id: String,
    pub domain_name: String,
    pub chosen_cert_arn: String,
    pub matched_rule_priority: i64,
    pub request_creation_time: String,
    pub actions_executed: String,
    pub redirect_url: String,
    pub error_reason: String,
    pub target_port_list: String,
    pub target_status_code_list: String,
    pub classification: String,
    pub classification_reason: String,

    // Derived from `request`.
    pub request_method: String,
    /// The request path after applying the path transforming rules. Empty
    /// when the load balancer did not receive a valid request.
    pub request_path: String,
}

impl LogRecord {
    /// Parses a log line and resolves its request method and path.
    pub fn parse(line: &str, rules: &[PathTransformingRule]) -> Result<Self, ParseError> {
        let mut record = alb::parse_alb_line(line)?;

        let request = parse_request_line(&record.request)?;
        let method = request.method.to_string();
        let path = if request.has_path() {
            transform_path(request.path, rules).to_string()
        } else {
            String::new()
        };

        record.request_method = method;
        record.request_path = path;
        Ok(record)
    }

    /// The record's time truncated to the second.
    pub fn timestamp(&self) -> Timestamp {
        Timestamp::from_datetime(&self.time)
    }
}
