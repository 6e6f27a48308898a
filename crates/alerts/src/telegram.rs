//! Telegram message sink.

use crate::sink::{DeliveryError, MessageSink};
use async_trait::async_trait;
use teloxide::prelude::*;
use teloxide::types::Recipient;

/// Telegram bot wrapper. Only sends messages; updates are never polled.
pub struct TelegramBot {
    bot: Bot,
}

impl TelegramBot {
    /// Create a new bot with the given token.
    pub fn new(token: &str) -> Self {
        Self {
            bot: Bot::new(token),
        }
    }
}

#[async_trait]
impl MessageSink for TelegramBot {
    async fn send(&self, chat_id: &str, text: &str) -> Result<(), DeliveryError> {
        let recipient = parse_recipient(chat_id)?;
        self.bot.send_message(recipient, text).await?;
        Ok(())
    }
}

/// Parse a numeric chat id or an `@channel` username.
pub fn parse_recipient(chat_id: &str) -> Result<Recipient, DeliveryError> {
    let chat_id = chat_id.trim();
    if let Ok(id) = chat_id.parse::<i64>() {
        return Ok(Recipient::Id(ChatId(id)));
    }
    if chat_id.len() > 1 && chat_id.starts_with('@') {
        return Ok(Recipient::ChannelUsername(chat_id.to_string()));
    }
    Err(DeliveryError::InvalidChatId(chat_id.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_numeric_chat_id() {
        assert_eq!(
            parse_recipient("11111111").unwrap(),
            Recipient::Id(ChatId(11111111))
        );
        assert_eq!(
            parse_recipient(" -100123 ").unwrap(),
            Recipient::Id(ChatId(-100123))
        );
    }

    #[test]
    fn test_parse_channel_username() {
        assert_eq!(
            parse_recipient("@homework_updates").unwrap(),
            Recipient::ChannelUsername("@homework_updates".to_string())
        );
    }

    #[test]
    fn test_parse_invalid_chat_id() {
        assert!(matches!(
            parse_recipient("chat"),
            Err(DeliveryError::InvalidChatId(_))
        ));
        assert!(matches!(
            parse_recipient("@"),
            Err(DeliveryError::InvalidChatId(_))
        ));
    }

    #[tokio::test]
    async fn test_send_rejects_bad_chat_before_network() {
        let bot = TelegramBot::new("1111111111:AAAAAAAAAAAAAAAAAAAAAAAAAAA-AAAAAAA");
        let err = bot.send("not-a-chat", "hello").await.unwrap_err();
        assert!(matches!(err, DeliveryError::InvalidChatId(_)));
    }
}
