//! Tracked homework records and notification formatting.

use crate::{HomeworkStatus, RecordError};
use chrono::{DateTime, Utc};
use serde_json::Value;

/// Key holding the homework name in a raw record.
pub const NAME_KEY: &str = "homework_name";
/// Key holding the review status in a raw record.
pub const STATUS_KEY: &str = "status";
/// Optional key holding the RFC 3339 time of the last status change.
pub const UPDATED_KEY: &str = "date_updated";

/// Validated snapshot of one homework entry returned by the status API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackedRecord {
    pub name: String,
    pub status: HomeworkStatus,
    pub updated_at: Option<DateTime<Utc>>,
}

impl TrackedRecord {
    /// Validate a raw JSON record.
    ///
    /// Both `homework_name` and `status` must be present as strings and the
    /// status must be one of the known values. `date_updated` is optional and
    /// ignored when it does not parse.
    pub fn from_raw(raw: &Value) -> Result<Self, RecordError> {
        let name = required_field(raw, NAME_KEY)?;
        let status_value = required_value(raw, STATUS_KEY)?;

        let status = status_value
            .as_str()
            .and_then(HomeworkStatus::from_api)
            .ok_or_else(|| {
                let shown = match status_value.as_str() {
                    Some(s) => s.to_string(),
                    None => status_value.to_string(),
                };
                RecordError::UnknownStatus(shown)
            })?;

        let updated_at = raw
            .get(UPDATED_KEY)
            .and_then(Value::as_str)
            .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
            .map(|dt| dt.with_timezone(&Utc));

        Ok(Self {
            name: name.to_string(),
            status,
            updated_at,
        })
    }

    /// Message text announcing this record's status.
    pub fn notification(&self) -> String {
        format!(
            "Изменился статус проверки работы \"{}\". {}",
            self.name,
            self.status.verdict()
        )
    }
}

/// Build the chat message for a raw record.
pub fn build_notification(raw: &Value) -> Result<String, RecordError> {
    TrackedRecord::from_raw(raw).map(|record| record.notification())
}

fn required_value<'a>(raw: &'a Value, key: &'static str) -> Result<&'a Value, RecordError> {
    match raw.get(key) {
        Some(value) if !value.is_null() => Ok(value),
        _ => Err(RecordError::MissingField {
            key,
            record: raw.to_string(),
        }),
    }
}

fn required_field<'a>(raw: &'a Value, key: &'static str) -> Result<&'a str, RecordError> {
    required_value(raw, key)?
        .as_str()
        .ok_or_else(|| RecordError::MissingField {
            key,
            record: raw.to_string(),
        })
}
