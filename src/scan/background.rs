//! One background scan cycle: scan enabled channels, advance watermarks,
//! then auto-import or notify.
//!
//! Unlike foreground scans, channel errors here are logged and swallowed so
//! a flaky transport never interrupts the periodic loop. Storage and
//! settings errors still propagate to the caller.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use anyhow::{Context, Result};
use serde::Serialize;

use crate::clock::{Clock, SystemClock};
use crate::config::SettingsSource;
use crate::models::{Channel, ExtractedFields};
use crate::storage::Storage;

use super::{Importer, ScanOrchestrator, ScanOutcome};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Info,
    Success,
}

/// Receives user-facing messages from background cycles.
pub trait Notifier: Send + Sync {
    fn notify(&self, level: NoticeLevel, message: &str);
}

#[derive(Debug, Clone, Default)]
pub struct NoopNotifier;

impl Notifier for NoopNotifier {
    fn notify(&self, _level: NoticeLevel, _message: &str) {}
}

/// Emits notices as `info!` events.
#[derive(Debug, Clone, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, level: NoticeLevel, message: &str) {
        tracing::info!(level = ?level, "{message}");
    }
}

/// What happened to one channel in a cycle.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ChannelResult {
    Scanned { found: usize },
    /// The orchestrator was busy with another scan.
    Busy,
    Failed { error: String },
}

#[derive(Debug, Clone, Serialize)]
pub struct CycleReport {
    pub channels: Vec<(Channel, ChannelResult)>,
    pub found: usize,
    pub imported: usize,
    pub skipped_duplicates: usize,
    /// The notice sent, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum CycleOutcome {
    Completed(CycleReport),
    /// A cycle was already running.
    Skipped,
}

/// Clears the cycle flag however the cycle ends.
struct CycleGuard<'a>(&'a AtomicBool);

impl Drop for CycleGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

pub struct BackgroundScanner {
    orchestrator: Arc<ScanOrchestrator>,
    storage: Arc<dyn Storage>,
    settings: Arc<dyn SettingsSource>,
    notifier: Arc<dyn Notifier>,
    importer: Importer,
    clock: Arc<dyn Clock>,
    running: AtomicBool,
}

impl BackgroundScanner {
    pub fn new(
        orchestrator: Arc<ScanOrchestrator>,
        storage: Arc<dyn Storage>,
        settings: Arc<dyn SettingsSource>,
    ) -> Self {
        Self {
            orchestrator,
            storage,
            settings,
            notifier: Arc::new(NoopNotifier),
            importer: Importer::new(),
            clock: Arc::new(SystemClock),
            running: AtomicBool::new(false),
        }
    }

    pub fn with_notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = notifier;
        self
    }

    pub fn with_importer(mut self, importer: Importer) -> Self {
        self.importer = importer;
        self
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Run one cycle. Returns [`CycleOutcome::Skipped`] if one is in flight.
    pub async fn perform_scan(&self) -> Result<CycleOutcome> {
        if self
            .running
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            tracing::debug!("background scan already running, skipping");
            return Ok(CycleOutcome::Skipped);
        }
        let _guard = CycleGuard(&self.running);

        let settings = self
            .settings
            .scan_settings()
            .context("Failed to read scan settings")?;
        let mut state = self
            .storage
            .load_state()
            .await
            .context("Failed to load scan state")?;

        let mut found: Vec<ExtractedFields> = Vec::new();
        let mut channels = Vec::new();

        for channel in Channel::ALL {
            if !settings.channel_enabled(channel) {
                continue;
            }
            let since = state.watermark(channel);
            let result = match self.orchestrator.scan(channel, since).await {
                Ok(ScanOutcome::Completed(report)) => {
                    state.advance(channel, self.clock.now_millis());
                    let count = report.results.len();
                    found.extend(report.results);
                    ChannelResult::Scanned { found: count }
                }
                Ok(ScanOutcome::Skipped) => ChannelResult::Busy,
                Err(err) => {
                    tracing::error!(channel = %channel, error = %err, "background scan failed");
                    ChannelResult::Failed {
                        error: err.to_string(),
                    }
                }
            };
            channels.push((channel, result));
        }

        state.last_scan_time = Some(self.clock.now_millis());
        self.storage
            .save_state(&state)
            .await
            .context("Failed to save scan state")?;

        let mut report = CycleReport {
            channels,
            found: found.len(),
            imported: 0,
            skipped_duplicates: 0,
            notice: None,
        };

        if found.is_empty() {
            return Ok(CycleOutcome::Completed(report));
        }

        if settings.auto_import_enabled {
            let mut records = self
                .storage
                .load_records()
                .await
                .context("Failed to load refund records")?;
            let outcome = self.importer.auto_import(&found, &records);
            report.imported = outcome.created.len();
            report.skipped_duplicates = outcome.skipped;

            if !outcome.created.is_empty() {
                records.extend(outcome.created);
                self.storage
                    .save_records(&records)
                    .await
                    .context("Failed to save imported refunds")?;
                let notice = format!("Automatically imported {} new refund(s)", report.imported);
                self.notifier.notify(NoticeLevel::Success, &notice);
                report.notice = Some(notice);
            }
        } else {
            let notice = format!(
                "Found {} new refund(s). Check Settings to import.",
                report.found
            );
            self.notifier.notify(NoticeLevel::Info, &notice);
            report.notice = Some(notice);
        }

        tracing::info!(
            found = report.found,
            imported = report.imported,
            skipped = report.skipped_duplicates,
            "background scan cycle complete"
        );
        Ok(CycleOutcome::Completed(report))
    }
}
