//! Error kinds shared across the workspace and record validation errors.

use thiserror::Error;

/// Coarse classification of a failure, used by the poll loop to decide how
/// to recover.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Startup cannot continue.
    Fatal,
    /// The request never produced an HTTP response.
    Transport,
    /// Non-200 status or a body that is not JSON.
    Protocol,
    /// JSON of the wrong shape.
    Schema,
    /// The message sink rejected a message.
    Delivery,
}

/// Errors raised while turning a raw record into a notification.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecordError {
    #[error("Отсутствует ключ {key} работы: {record}")]
    MissingField { key: &'static str, record: String },

    #[error("Непредвиденный статус работы: {0}")]
    UnknownStatus(String),
}

impl RecordError {
    pub fn kind(&self) -> ErrorKind {
        ErrorKind::Schema
    }
}
