use crate::parsers::LogRecord;
use wasm_bindgen::prelude::*;

// Helps the JavaScript frontend understand the result easily.
// We derive Serialize so we can return it as a JSON string.
#[derive(serde::Serialize)]
struct WasmResult {
    record: Option<LogRecord>, // The parsed access log entry
    error: Option<String>,     // Why the line could not be parsed
}

/// Parses a single access log line without any path transforming rules.
#[wasm_bindgen]
pub fn parse_alb_line(log_line: &str) -> String {
    let result = match LogRecord::parse(log_line, &[]) {
        Ok(record) => WasmResult {
            record: Some(record),
            error: None,
        },
        Err(e) => WasmResult {
            record: None,
            error: Some(format!("Parse Error: {}", e)),
        },
    };
    serde_json::to_string(&result).unwrap_or_default()
}
