//! Notification delivery and failure deduplication.

use crate::config::AlertConfig;
use crate::sink::MessageSink;
use std::fmt::Display;
use std::sync::Arc;
use tracing::{debug, error, info};

/// Render an error the way it is reported to the chat.
pub fn failure_message(err: &dyn Display) -> String {
    format!("Сбой в работе программы: {}", err)
}

/// Sends notifications to the configured chat.
///
/// Keeps the last failure text that was reported so that a persistent outage
/// produces one chat message until the failure text changes.
pub struct Notifier {
    sink: Arc<dyn MessageSink>,
    config: AlertConfig,
    last_error: Option<String>,
}

impl Notifier {
    /// Create a new notifier.
    pub fn new(sink: Arc<dyn MessageSink>, config: AlertConfig) -> Self {
        Self {
            sink,
            config,
            last_error: None,
        }
    }

    pub fn config(&self) -> &AlertConfig {
        &self.config
    }

    /// Text of the last failure reported to the chat.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Send a message. Delivery failures are logged and reported as `false`.
    pub async fn notify(&self, text: &str) -> bool {
        match self.sink.send(&self.config.chat_id, text).await {
            Ok(()) => {
                info!("Bot sent message: {}", text);
                true
            }
            Err(e) => {
                error!(
                    chat_id = %self.config.masked_chat_id(),
                    kind = ?e.kind(),
                    error = %e,
                    "Bot failed to send message: {}",
                    text
                );
                false
            }
        }
    }

    /// Log a failure and send it to the chat unless it repeats the last one.
    ///
    /// Returns true when the failure was new and a send was attempted. The
    /// failure is remembered even if the send itself fails.
    pub async fn report_failure(&mut self, err: &dyn Display) -> bool {
        let message = failure_message(err);
        error!("{}", message);

        if self.last_error.as_deref() == Some(message.as_str()) {
            debug!("Suppressing repeated failure notification");
            return false;
        }

        self.notify(&message).await;
        self.last_error = Some(message);
        true
    }
}
