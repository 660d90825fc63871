// File: src/parsers/alb.rs
//
// see <https://docs.aws.amazon.com/elasticloadbalancing/latest/application/load-balancer-access-logs.html#access-log-entry-format>

use crate::error::ParseError;
use crate::parsers::LogRecord;
use crate::time::parse_log_time;
use regex::{Captures, Regex};
use std::str::FromStr;
use std::sync::OnceLock;

/// Field names of an access log entry, in log order. `true` marks fields
/// that are enclosed in double quotes and may therefore contain spaces.
const FIELDS: [(&str, bool); 29] = [
    ("type", false),
    ("time", false),
    ("elb", false),
    ("client_port", false),
    ("target_port", false),
    ("request_processing_time", false),
    ("target_processing_time", false),
    ("response_processing_time", false),
    ("elb_status_code", false),
    ("target_status_code", false),
    ("received_bytes", false),
    ("sent_bytes", false),
    ("request", true),
    ("user_agent", true),
    ("ssl_cipher", false),
    ("ssl_protocol", false),
    ("target_group_arn", false),
    ("trace_id", true),
    ("domain_name", true),
    ("chosen_cert_arn", true),
    ("matched_rule_priority", false),
    ("request_creation_time", false),
    ("actions_executed", true),
    ("redirect_url", true),
    ("error_reason", true),
    ("target_port_list", true),
    ("target_status_code_list", true),
    ("classification", true),
    ("classification_reason", true),
];

const SENTINEL: &str = "-";

fn line_regex() -> &'static Regex {
    static LINE_REGEX: OnceLock<Regex> = OnceLock::new();

    LINE_REGEX.get_or_init(|| {
        let fields = FIELDS
            .iter()
            .map(|(name, quoted)| {
                if *quoted {
                    // Quoted values may contain backslash-escaped quotes.
                    format!(r#""(?P<{name}>(?:[^"\\]|\\.)*)""#)
                } else {
                    format!(r"(?P<{name}>\S+)")
                }
            })
            .collect::<Vec<_>>()
            .join(r"\s");

        // Newer log versions append fields at the end of the line; those are ignored.
        Regex::new(&format!(r"^{fields}(?:\s.*)?$")).expect("Invalid ALB log regex")
    })
}

/// Tokenizes one access log line. The derived request method and path are
/// left empty; see [`LogRecord::parse`] for the complete record.
pub(crate) fn parse_alb_line(line: &str) -> Result<LogRecord, ParseError> {
    let caps = line_regex().captures(line).ok_or(ParseError::NoMatch)?;

    let raw_time = field(&caps, "time");
    let time = parse_log_time(raw_time).ok_or_else(|| ParseError::BadTimestamp {
        value: raw_time.to_string(),
    })?;

    Ok(LogRecord {
        r#type: owned(&caps, "type"),
        time,
        elb: owned(&caps, "elb"),
        client_port: owned(&caps, "client_port"),
        target_port: owned(&caps, "target_port"),
        request_processing_time: number(&caps, "request_processing_time")?,
        target_processing_time: number(&caps, "target_processing_time")?,
        response_processing_time: number(&caps, "response_processing_time")?,
        elb_status_code: owned(&caps, "elb_status_code"),
        target_status_code: owned(&caps, "target_status_code"),
        received_bytes: number_or_zero(&caps, "received_bytes")?,
        sent_bytes: number_or_zero(&caps, "sent_bytes")?,
        request: owned(&caps, "request"),
        user_agent: owned(&caps, "user_agent"),
        ssl_cipher: owned(&caps, "ssl_cipher"),
        ssl_protocol: owned(&caps, "ssl_protocol"),
        target_group_arn: owned(&caps, "target_group_arn"),
        trace_id: owned(&caps, "trace_id"),
        domain_name: owned(&caps, "domain_name"),
        chosen_cert_arn: owned(&caps, "chosen_cert_arn"),
        matched_rule_priority: number_or_zero(&caps, "matched_rule_priority")?,
        request_creation_time: owned(&caps, "request_creation_time"),
        actions_executed: owned(&caps, "actions_executed"),
        redirect_url: owned(&caps, "redirect_url"),
        error_reason: owned(&caps, "error_reason"),
        target_port_list: owned(&caps, "target_port_list"),
        target_status_code_list: owned(&caps, "target_status_code_list"),
        classification: owned(&caps, "classification"),
        classification_reason: owned(&caps, "classification_reason"),
        request_method: String::new(),
        request_path: String::new(),
    })
}

// --- Helpers ---

#[inline(always)]
fn field<'a>(caps: &Captures<'a>, name: &str) -> &'a str {
    // Every group in the line regex is mandatory.
    caps.name(name).map_or("", |m| m.as_str())
}

#[inline(always)]
fn owned(caps: &Captures<'_>, name: &str) -> String {
    field(caps, name).to_string()
}

fn number<T: FromStr>(caps: &Captures<'_>, name: &'static str) -> Result<T, ParseError> {
    let value = field(caps, name);
    value.parse().map_err(|_| ParseError::BadNumber {
        field: name,
        value: value.to_string(),
    })
}

/// Like [`number`], but the `-` sentinel counts as zero.
fn number_or_zero<T>(caps: &Captures<'_>, name: &'static str) -> Result<T, ParseError>
where
    T: FromStr + Default,
{
    if field(caps, name) == SENTINEL {
        return Ok(T::default());
    }
    number(caps, name)
}
