//! Telegram delivery for homework status notifications.
//!
//! This crate provides:
//! - The `MessageSink` seam and its teloxide implementation
//! - The `Notifier`, which delivers messages and deduplicates failure reports

pub mod config;
pub mod notifier;
pub mod sink;
pub mod telegram;

pub use config::AlertConfig;
pub use notifier::{failure_message, Notifier};
pub use sink::{DeliveryError, MessageSink, MockMessageSink};
pub use telegram::TelegramBot;
