//! The poll loop: fetch statuses, notify about changes, sleep, repeat.

use homework_alerts::Notifier;
use homework_api::{current_date, extract_tracked_records, ApiResult, StatusApi};
use homework_core::{build_notification, ErrorKind};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

fn unix_now() -> i64 {
    chrono::Utc::now().timestamp()
}

/// Configuration for the poll loop.
#[derive(Debug, Clone)]
pub struct PollerConfig {
    /// Delay between the end of one cycle and the start of the next.
    pub interval: Duration,
}

impl Default for PollerConfig {
    fn default() -> Self {
        Self {
            interval: crate::config::DEFAULT_RETRY_TIME,
        }
    }
}

/// What happened during one cycle.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CycleReport {
    /// Records returned by the API.
    pub records: usize,
    /// Status notifications delivered.
    pub sent: usize,
    /// Records dropped as malformed.
    pub skipped: usize,
    /// Kind of the first failure, if any.
    pub failure: Option<ErrorKind>,
}

/// Single-owner poll loop over one status API and one chat.
pub struct Poller {
    api: Arc<dyn StatusApi>,
    notifier: Notifier,
    config: PollerConfig,
    cursor: i64,
}

impl Poller {
    /// Create a poller whose cursor starts at the current time.
    pub fn new(api: Arc<dyn StatusApi>, notifier: Notifier, config: PollerConfig) -> Self {
        Self {
            api,
            notifier,
            config,
            cursor: unix_now(),
        }
    }

    /// Start from an explicit cursor instead of the current time.
    #[cfg(test)]
    pub fn with_cursor(mut self, cursor: i64) -> Self {
        self.cursor = cursor;
        self
    }

    /// Lower bound (Unix seconds) for the next fetch.
    pub fn cursor(&self) -> i64 {
        self.cursor
    }

    pub fn notifier(&self) -> &Notifier {
        &self.notifier
    }

    /// Run forever. Only process termination stops the loop.
    pub async fn run(mut self) {
        info!(
            endpoint = %self.api.endpoint(),
            interval_secs = self.config.interval.as_secs(),
            chat = %self.notifier().config().masked_chat_id(),
            "Starting poll loop"
        );

        loop {
            let report = self.run_cycle().await;
            debug!(
                records = report.records,
                sent = report.sent,
                skipped = report.skipped,
                failure = ?report.failure,
                cursor = self.cursor(),
                "Cycle finished"
            );

            tokio::time::sleep(self.config.interval).await;
        }
    }

    /// Perform one fetch-validate-notify cycle.
    ///
    /// Failures of the request or of the response envelope abort the cycle and
    /// leave the cursor untouched. A malformed record is skipped on its own and
    /// the rest of the batch is still delivered.
    pub async fn run_cycle(&mut self) -> CycleReport {
        let mut report = CycleReport::default();

        let records = match self.fetch_records().await {
            Ok(records) => records,
            Err(e) => {
                report.failure = Some(e.kind());
                self.notifier.report_failure(&e).await;
                return report;
            }
        };

        self.cursor = unix_now();
        report.records = records.len();

        if records.is_empty() {
            debug!("No new homework statuses in API response");
        }

        for raw in &records {
            match build_notification(raw) {
                Ok(text) => {
                    if self.notifier.notify(&text).await {
                        report.sent += 1;
                    }
                }
                Err(e) => {
                    warn!("Skipping homework record: {}", e);
                    report.skipped += 1;
                    report.failure.get_or_insert(e.kind());
                    self.notifier.report_failure(&e).await;
                }
            }
        }

        info!("Request to status API completed");
        report
    }

    async fn fetch_records(&self) -> ApiResult<Vec<Value>> {
        let body = self.api.fetch_statuses(self.cursor).await?;
        if let Some(server_time) = current_date(&body) {
            debug!(server_time, cursor = self.cursor, "Status API responded");
        }
        extract_tracked_records(body)
    }
}
