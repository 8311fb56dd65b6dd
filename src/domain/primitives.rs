//! Field-level primitives shared by all records: dates, timestamps, required text.

use chrono::{NaiveDate, NaiveDateTime, Utc};
use serde_json::{Map, Value};
use thiserror::Error;

/// Primitive-valued mapping of a record's fields, used for transport.
pub type Representation = Map<String, Value>;

/// Calendar date format accepted on input and produced on output.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Timestamp format used for `created_at` (ISO-8601, UTC, no offset).
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.6f";

/// A required field was missing or malformed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid field `{field}`: {reason}")]
pub struct ValidationError {
    pub field: &'static str,
    pub reason: String,
}

impl ValidationError {
    pub fn new(field: &'static str, reason: impl Into<String>) -> Self {
        ValidationError {
            field,
            reason: reason.into(),
        }
    }
}

/// Reject blank values for a required text field.
pub fn require_text(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new(field, "must not be empty"));
    }
    Ok(())
}

/// Parse a strict, zero-padded `YYYY-MM-DD` date.
///
/// chrono accepts unpadded months and days, so the parsed value is formatted
/// back and compared with the input.
pub fn parse_date(field: &'static str, value: &str) -> Result<NaiveDate, ValidationError> {
    let date = NaiveDate::parse_from_str(value, DATE_FORMAT)
        .map_err(|_| ValidationError::new(field, format!("`{}` is not a YYYY-MM-DD date", value)))?;
    if format_date(&date) != value {
        return Err(ValidationError::new(
            field,
            format!("`{}` is not a YYYY-MM-DD date", value),
        ));
    }
    Ok(date)
}

pub fn format_date(date: &NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

pub fn format_timestamp(ts: &NaiveDateTime) -> String {
    ts.format(TIMESTAMP_FORMAT).to_string()
}

pub fn parse_timestamp(value: &str) -> Result<NaiveDateTime, chrono::ParseError> {
    NaiveDateTime::parse_from_str(value, TIMESTAMP_FORMAT)
}

/// Current UTC time truncated to the stored precision.
pub fn now_timestamp() -> NaiveDateTime {
    let now = Utc::now().naive_utc();
    // Round-trip through the storage format so in-memory values equal stored ones.
    parse_timestamp(&format_timestamp(&now)).unwrap_or(now)
}
