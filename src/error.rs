use thiserror::Error;

/// Failure to turn one access log line into a [`LogRecord`](crate::LogRecord).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("line does not match the ALB access log format")]
    NoMatch,

    #[error("invalid number in field `{field}`: {value:?}")]
    BadNumber { field: &'static str, value: String },

    #[error("invalid timestamp: {value:?}")]
    BadTimestamp { value: String },

    #[error("malformed request field: {request:?}")]
    MalformedRequest { request: String },
}

/// Failure while aggregating a whole log file. Any of these aborts the file.
#[derive(Debug, Error)]
pub enum ReadError {
    #[error("failed to read log file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse line {line}: {source}")]
    Line {
        line: usize,
        #[source]
        source: ParseError,
    },
}

impl ReadError {
    pub fn line(line: usize, source: ParseError) -> Self {
        Self::Line { line, source }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    InvalidRegex(#[from] RuleError),
}

#[derive(Debug, Error)]
pub enum RuleError {
    #[error("invalid path transforming regexp {pattern:?}: {source}")]
    InvalidRegex {
        pattern: String,
        #[source]
        source: regex::Error,
    },
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ExportError {
    #[error("cannot derive load balancer ip address from object key {key:?}")]
    MalformedObjectKey { key: String },
}
