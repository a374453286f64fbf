// Core data structures for the urlpoll daemon

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Lowest status code classified as UP
pub const UP_RANGE_START: u16 = 200;

/// Highest status code classified as UP (226 IM Used)
pub const UP_RANGE_END: u16 = 226;

/// Status code recorded when no response was received at all
pub const NO_RESPONSE_STATUS: u16 = 0;

/// Availability classification of a probed URL
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Status {
    Up,
    Down,
}

impl Status {
    /// Classify an HTTP status code: UP iff it lies in `[200, 226]`
    pub fn from_code(code: u16) -> Self {
        if (UP_RANGE_START..=UP_RANGE_END).contains(&code) {
            Self::Up
        } else {
            Self::Down
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Up => "UP",
            Self::Down => "DOWN",
        }
    }

    pub fn is_up(&self) -> bool {
        matches!(self, Self::Up)
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of a single probe
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    /// HTTP status code, [`NO_RESPONSE_STATUS`] when the transport failed
    pub status_code: u16,
    pub status: Status,
    /// Transport or body-read failure text
    pub error: Option<String>,
}

impl Outcome {
    /// Outcome for a response whose body was read without error
    pub fn from_status(status_code: u16) -> Self {
        Self {
            status_code,
            status: Status::from_code(status_code),
            error: None,
        }
    }

    /// Outcome for a response whose body could not be read
    pub fn with_body_error(status_code: u16, error: impl Into<String>) -> Self {
        Self {
            status_code,
            status: Status::from_code(status_code),
            error: Some(error.into()),
        }
    }

    /// Outcome for a request that never produced a response
    pub fn transport_failure(error: impl Into<String>) -> Self {
        Self {
            status_code: NO_RESPONSE_STATUS,
            status: Status::Down,
            error: Some(error.into()),
        }
    }
}

/// One immutable probe record
///
/// Renders as
/// `HTTP Status Code: <code> :: Status: <UP|DOWN> :: Timestamp UTC: <ts> :: URL: <url>`
/// with a trailing ` :: Error: <message>` when the probe carried an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogRecord {
    outcome: Outcome,
    url: String,
    timestamp: DateTime<Utc>,
}

impl LogRecord {
    /// Create a record stamped with the current time
    pub fn new(url: impl Into<String>, outcome: Outcome) -> Self {
        Self::at(url, outcome, Utc::now())
    }

    /// Create a record with an explicit timestamp
    pub fn at(url: impl Into<String>, outcome: Outcome, timestamp: DateTime<Utc>) -> Self {
        Self {
            outcome,
            url: url.into(),
            timestamp,
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn outcome(&self) -> &Outcome {
        &self.outcome
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }
}

/// Render a UTC timestamp with the fraction trimmed of trailing zeros
///
/// Whole seconds carry no fraction at all: `2024-01-15 09:30:00.12 +0000 UTC`
/// but `2024-01-15 09:30:00 +0000 UTC`.
pub fn format_timestamp(timestamp: &DateTime<Utc>) -> String {
    let mut out = timestamp.format("%Y-%m-%d %H:%M:%S").to_string();

    // Leap seconds are reported as nanos >= 1e9
    let nanos = timestamp.timestamp_subsec_nanos() % 1_000_000_000;
    if nanos > 0 {
        let fraction = format!("{nanos:09}");
        out.push('.');
        out.push_str(fraction.trim_end_matches('0'));
    }

    out.push_str(" +0000 UTC");
    out
}

impl fmt::Display for LogRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "HTTP Status Code: {} :: Status: {} :: Timestamp UTC: {} :: URL: {}",
            self.outcome.status_code,
            self.outcome.status,
            format_timestamp(&self.timestamp),
            self.url
        )?;
        if let Some(error) = &self.outcome.error {
            write!(f, " :: Error: {error}")?;
        }
        Ok(())
    }
}

/// On-disk log document: `{"logs": [...]}`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogStructure {
    pub logs: Vec<String>,
}

impl LogStructure {
    /// Serialize with a four-space indent
    pub fn to_json_pretty(&self) -> serde_json::Result<Vec<u8>> {
        let mut buf = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
        self.serialize(&mut ser)?;
        Ok(buf)
    }

    pub fn from_json(bytes: &[u8]) -> serde_json::Result<Self> {
        serde_json::from_slice(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn fixed_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 15, 9, 30, 0).unwrap()
    }

    #[test]
    fn test_status_boundaries() {
        assert_eq!(Status::from_code(199), Status::Down);
        assert_eq!(Status::from_code(200), Status::Up);
        assert_eq!(Status::from_code(204), Status::Up);
        assert_eq!(Status::from_code(226), Status::Up);
        assert_eq!(Status::from_code(227), Status::Down);
        assert_eq!(Status::from_code(301), Status::Down);
        assert_eq!(Status::from_code(0), Status::Down);
    }

    #[test]
    fn test_record_format_without_error() {
        let record = LogRecord::at("http://a.test", Outcome::from_status(200), fixed_time());
        assert_eq!(
            record.to_string(),
            "HTTP Status Code: 200 :: Status: UP :: Timestamp UTC: 2024-01-15 09:30:00 +0000 UTC :: URL: http://a.test"
        );
    }

    #[test]
    fn test_timestamp_fraction_trims_trailing_zeros() {
        let base = fixed_time();
        let at = |nanos: i64| base + chrono::Duration::nanoseconds(nanos);

        assert_eq!(format_timestamp(&base), "2024-01-15 09:30:00 +0000 UTC");
        assert_eq!(
            format_timestamp(&at(120_000_000)),
            "2024-01-15 09:30:00.12 +0000 UTC"
        );
        assert_eq!(
            format_timestamp(&at(123_456_700)),
            "2024-01-15 09:30:00.1234567 +0000 UTC"
        );
        assert_eq!(
            format_timestamp(&at(1)),
            "2024-01-15 09:30:00.000000001 +0000 UTC"
        );
    }

    #[test]
    fn test_record_format_with_error() {
        let record = LogRecord::at(
            "http://down.test",
            Outcome::transport_failure("dns error"),
            fixed_time(),
        );
        let line = record.to_string();
        assert!(line.starts_with("HTTP Status Code: 0 :: Status: DOWN"));
        assert!(line.ends_with(":: URL: http://down.test :: Error: dns error"));
    }

    #[test]
    fn test_body_error_keeps_classification() {
        let outcome = Outcome::with_body_error(200, "unexpected eof");
        assert_eq!(outcome.status, Status::Up);
        assert_eq!(outcome.error.as_deref(), Some("unexpected eof"));
    }

    #[test]
    fn test_log_structure_round_trip() {
        let structure = LogStructure {
            logs: vec!["first".to_string(), "second".to_string()],
        };
        let bytes = structure.to_json_pretty().unwrap();
        let text = String::from_utf8(bytes.clone()).unwrap();
        assert!(text.contains("\n    \"logs\""));

        let parsed = LogStructure::from_json(&bytes).unwrap();
        assert_eq!(parsed, structure);
    }

    #[test]
    fn test_empty_log_structure_serializes_empty_array() {
        let bytes = LogStructure::default().to_json_pretty().unwrap();
        let value: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(value["logs"], serde_json::json!([]));
    }
}
