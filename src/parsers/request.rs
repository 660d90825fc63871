// File: src/parsers/request.rs

use crate::error::ParseError;
use regex::Regex;
use std::sync::OnceLock;

/// The `request` field of an access log entry, split into its parts.
///
/// The field is shaped like `GET https://www.example.com:443/path?query HTTP/1.1`.
/// When the load balancer could not read a valid request the path is logged
/// as `-`, which is exposed here as an empty `path`. The version of such a
/// request is `-` with a trailing space, or missing entirely.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestLine<'a> {
    pub method: &'a str,
    pub protocol: &'a str,
    pub host: &'a str,
    pub port: Option<&'a str>,
    pub path: &'a str,
    pub query: Option<&'a str>,
    pub version: &'a str,
}

impl RequestLine<'_> {
    /// `false` when the request carried no usable path.
    pub fn has_path(&self) -> bool {
        !self.path.is_empty()
    }
}

fn request_regex() -> &'static Regex {
    static REQUEST_REGEX: OnceLock<Regex> = OnceLock::new();

    REQUEST_REGEX.get_or_init(|| {
        Regex::new(
            r"(?x)
            ^
            (?P<method>\S+)
            \x20
            (?P<protocol>[^:\s]+)://
            (?P<host>\[[^\]\s]*\]|[^:/\s]*)
            (?::(?P<port>\d+))?
            (?P<path>-|/[^?\s]*)
            (?:\?(?P<query>\S*))?
            \x20
            (?P<version>\S*)
            \x20?
            $",
        )
        .expect("Invalid request regex")
    })
}

/// Splits the `request` field into method, host, port, path, query and version.
pub fn parse_request_line(request: &str) -> Result<RequestLine<'_>, ParseError> {
    let caps = request_regex()
        .captures(request)
        .ok_or_else(|| ParseError::MalformedRequest {
            request: request.to_string(),
        })?;

    // Groups without `?` always participate in a match.
    let group = |name: &str| caps.name(name).map_or("", |m| m.as_str());

    let path = match group("path") {
        "-" => "",
        path => path,
    };

    Ok(RequestLine {
        method: group("method"),
        protocol: group("protocol"),
        host: group("host"),
        port: caps.name("port").map(|m| m.as_str()),
        path,
        query: caps.name("query").map(|m| m.as_str()),
        version: group("version"),
    })
}
