//! Application configuration loaded from the environment.

use homework_api::DEFAULT_ENDPOINT;
use homework_core::ErrorKind;
use std::time::Duration;
use thiserror::Error;

pub const PRACTICUM_TOKEN: &str = "PRACTICUM_TOKEN";
pub const TELEGRAM_TOKEN: &str = "TELEGRAM_TOKEN";
pub const TELEGRAM_CHAT_ID: &str = "TELEGRAM_CHAT_ID";
pub const HOMEWORK_ENDPOINT: &str = "HOMEWORK_ENDPOINT";
pub const RETRY_TIME: &str = "RETRY_TIME";
pub const LOG_LEVEL: &str = "LOG_LEVEL";

/// Poll interval when `RETRY_TIME` is not set.
pub const DEFAULT_RETRY_TIME: Duration = Duration::from_secs(600);
pub const DEFAULT_LOG_LEVEL: &str = "debug";

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Отсутствуют обязательные переменные окружения: {}", .0.join(", "))]
    MissingCredentials(Vec<&'static str>),
    #[error("Некорректное значение переменной окружения {name}: {value}")]
    InvalidValue { name: &'static str, value: String },
}

impl ConfigError {
    pub fn kind(&self) -> ErrorKind {
        ErrorKind::Fatal
    }
}

/// The three secrets the bot cannot run without.
#[derive(Clone, Default)]
pub struct Credentials {
    pub practicum_token: Option<String>,
    pub telegram_token: Option<String>,
    pub telegram_chat_id: Option<String>,
}

impl Credentials {
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            practicum_token: lookup(PRACTICUM_TOKEN),
            telegram_token: lookup(TELEGRAM_TOKEN),
            telegram_chat_id: lookup(TELEGRAM_CHAT_ID),
        }
    }

    /// Names of the variables that are unset or empty.
    pub fn missing(&self) -> Vec<&'static str> {
        [
            (PRACTICUM_TOKEN, &self.practicum_token),
            (TELEGRAM_TOKEN, &self.telegram_token),
            (TELEGRAM_CHAT_ID, &self.telegram_chat_id),
        ]
        .into_iter()
        .filter(|(_, value)| value.as_deref().map_or(true, str::is_empty))
        .map(|(name, _)| name)
        .collect()
    }

    /// Returns true only when all three values are present and non-empty.
    pub fn check(&self) -> bool {
        self.missing().is_empty()
    }
}

/// Runtime settings.
#[derive(Clone)]
pub struct Settings {
    pub practicum_token: String,
    pub telegram_token: String,
    pub telegram_chat_id: String,
    pub endpoint: String,
    pub retry_time: Duration,
}

impl Settings {
    /// Load settings from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let credentials = Credentials::from_lookup(&lookup);
        if !credentials.check() {
            return Err(ConfigError::MissingCredentials(credentials.missing()));
        }

        let endpoint = lookup(HOMEWORK_ENDPOINT)
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_ENDPOINT.to_string());

        let retry_time = match lookup(RETRY_TIME) {
            None => DEFAULT_RETRY_TIME,
            Some(value) => match value.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => Duration::from_secs(secs),
                _ => {
                    return Err(ConfigError::InvalidValue {
                        name: RETRY_TIME,
                        value,
                    })
                }
            },
        };

        Ok(Self {
            practicum_token: credentials.practicum_token.unwrap_or_default(),
            telegram_token: credentials.telegram_token.unwrap_or_default(),
            telegram_chat_id: credentials.telegram_chat_id.unwrap_or_default(),
            endpoint,
            retry_time,
        })
    }
}

impl std::fmt::Debug for Settings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Settings")
            .field("endpoint", &self.endpoint)
            .field("retry_time", &self.retry_time)
            .finish_non_exhaustive()
    }
}

/// Log filter directive from `LOG_LEVEL`, falling back to `debug`.
pub fn log_level_from_env() -> String {
    std::env::var(LOG_LEVEL)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string())
}
