//! Message sink seam.

use async_trait::async_trait;
use homework_core::ErrorKind;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;
use thiserror::Error;

/// Errors that can occur while delivering a message.
#[derive(Error, Debug)]
pub enum DeliveryError {
    #[error("Бот не смог отправить сообщение: {0}")]
    Telegram(#[from] teloxide::RequestError),
    #[error("Некорректный идентификатор чата: {0}")]
    InvalidChatId(String),
    #[error("Бот не смог отправить сообщение: {0}")]
    Rejected(String),
}

impl DeliveryError {
    pub fn kind(&self) -> ErrorKind {
        ErrorKind::Delivery
    }
}

/// Trait for messaging backends.
#[async_trait]
pub trait MessageSink: Send + Sync {
    /// Send `text` to `chat_id`.
    async fn send(&self, chat_id: &str, text: &str) -> Result<(), DeliveryError>;
}

/// Mock sink for testing. Records every delivered message.
#[derive(Debug, Default)]
pub struct MockMessageSink {
    sent: Mutex<Vec<(String, String)>>,
    should_fail: AtomicBool,
    attempts: Mutex<usize>,
}

impl MockMessageSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every following send fail (or succeed again).
    pub fn set_failing(&self, fail: bool) {
        self.should_fail.store(fail, Ordering::SeqCst);
    }

    /// Successfully delivered `(chat_id, text)` pairs, oldest first.
    pub fn sent(&self) -> Vec<(String, String)> {
        self.sent.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// Delivered texts only.
    pub fn texts(&self) -> Vec<String> {
        self.sent().into_iter().map(|(_, text)| text).collect()
    }

    /// Number of send calls, including failed ones.
    pub fn attempts(&self) -> usize {
        *self.attempts.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[async_trait]
impl MessageSink for MockMessageSink {
    async fn send(&self, chat_id: &str, text: &str) -> Result<(), DeliveryError> {
        *self.attempts.lock().unwrap_or_else(|e| e.into_inner()) += 1;

        if self.should_fail.load(Ordering::SeqCst) {
            return Err(DeliveryError::Rejected("Mock failure".to_string()));
        }

        self.sent
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push((chat_id.to_string(), text.to_string()));
        Ok(())
    }
}
