// src/status.rs

/// Groups a target status code into its class (`2xx`, `4xx`, ...).
///
/// The target status code is `-` when the target did not send a response,
/// which maps to `-` like any other unexpected value.
pub fn status_code_group(status_code: &str) -> &'static str {
    match status_code.as_bytes().first() {
        Some(b'1') => "1xx",
        Some(b'2') => "2xx",
        Some(b'3') => "3xx",
        Some(b'4') => "4xx",
        Some(b'5') => "5xx",
        _ => "-",
    }
}
