//! Alert configuration types.

/// Where notifications are delivered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlertConfig {
    /// Telegram chat ID (numeric) or `@channel` username
    pub chat_id: String,
}

impl AlertConfig {
    /// Create a new config for a chat.
    pub fn new(chat_id: impl Into<String>) -> Self {
        Self {
            chat_id: chat_id.into(),
        }
    }

    /// Chat id shortened for log output.
    pub fn masked_chat_id(&self) -> String {
        let prefix: String = self.chat_id.chars().take(6).collect();
        if prefix.len() < self.chat_id.len() {
            format!("{}…", prefix)
        } else {
            prefix
        }
    }
}
