//! Turns Application Load Balancer access logs into per-second request
//! counts and target processing time distributions.

pub mod aggregate;
pub mod config;
pub mod error;
pub mod export;
pub mod parsers;
pub mod reader;
pub mod rules;
pub mod status;
pub mod time;
#[cfg(test)]
mod test_utils;
#[cfg(feature = "wasm")]
pub mod wasm;

// Re-export for easy access
pub use aggregate::{Aggregator, Metric, MetricIdentity, MetricsMap};
pub use config::{Config, CustomTag};
pub use error::{ConfigError, ExportError, ParseError, ReadError, RuleError};
pub use export::{Exporter, Payload};
pub use parsers::LogRecord;
pub use reader::MetricsReader;
pub use rules::PathTransformingRule;
pub use status::status_code_group;
pub use time::Timestamp;
