//! Error types for status API operations.

use homework_core::ErrorKind;
use thiserror::Error;

/// Errors that can occur while fetching or validating a status response.
///
/// The `Display` text is what ends up in the chat, so it must not contain
/// anything that changes between two identical failures.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Некорректный адрес эндпоинта {0}")]
    InvalidEndpoint(String),

    #[error("Не удалось создать HTTP-клиент: {0}")]
    ClientBuild(String),

    #[error("Сбой запроса эндпоинта {endpoint} - {reason}")]
    Request { endpoint: String, reason: String },

    #[error("Эндпоинт {endpoint} недоступен. Код ответа API: {status}")]
    UnexpectedStatus { endpoint: String, status: u16 },

    #[error("Ошибка в формате JSON.")]
    InvalidJson,

    #[error("Не удалось получить работы из ответа API.")]
    MissingHomeworks,

    #[error("Неверный формат ответа списка заданий API.")]
    InvalidHomeworks,
}

impl From<url::ParseError> for ApiError {
    fn from(err: url::ParseError) -> Self {
        ApiError::InvalidEndpoint(err.to_string())
    }
}

impl ApiError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ApiError::InvalidEndpoint(_) | ApiError::ClientBuild(_) => ErrorKind::Fatal,
            ApiError::Request { .. } => ErrorKind::Transport,
            ApiError::UnexpectedStatus { .. } | ApiError::InvalidJson => ErrorKind::Protocol,
            ApiError::MissingHomeworks | ApiError::InvalidHomeworks => ErrorKind::Schema,
        }
    }
}

/// Result type for status API operations.
pub type ApiResult<T> = Result<T, ApiError>;
