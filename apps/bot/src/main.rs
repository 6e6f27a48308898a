//! Homework Status Bot
//!
//! Polls the homework status API and forwards status changes to a Telegram chat.

mod config;
mod poller;

use config::Settings;
use homework_alerts::{AlertConfig, Notifier, TelegramBot};
use homework_api::{PracticumClient, PracticumClientConfig};
use poller::{Poller, PollerConfig};
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new(config::DEFAULT_LOG_LEVEL));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .init();
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    init_logging(&config::log_level_from_env());

    let settings = match Settings::from_env() {
        Ok(settings) => settings,
        Err(e) => {
            error!(kind = ?e.kind(), "{}", e);
            return ExitCode::FAILURE;
        }
    };

    let client_config = PracticumClientConfig {
        endpoint: settings.endpoint.clone(),
        ..Default::default()
    };
    let api = match PracticumClient::new(client_config, settings.practicum_token.clone()) {
        Ok(api) => api,
        Err(e) => {
            error!(kind = ?e.kind(), "{}", e);
            return ExitCode::FAILURE;
        }
    };

    let bot = TelegramBot::new(&settings.telegram_token);
    let notifier = Notifier::new(
        Arc::new(bot),
        AlertConfig::new(settings.telegram_chat_id.clone()),
    );

    info!("Homework status bot starting...");
    info!("  Endpoint: {}", settings.endpoint);
    info!("  Poll interval: {}s", settings.retry_time.as_secs());

    let poller = Poller::new(
        Arc::new(api),
        notifier,
        PollerConfig {
            interval: settings.retry_time,
        },
    );
    poller.run().await;

    ExitCode::SUCCESS
}
