//! Runs one fetch-filter-extract pass over a channel.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use serde::Serialize;

use crate::clock::{Clock, SystemClock};
use crate::extract::extract_message;
use crate::models::{Channel, ExtractedFields};
use crate::source::{
    BatchOrigin, FetchOptions, MessageSource, MockSource, SourceError, MAX_SCAN_MESSAGES,
};

/// Result of a scan that actually ran.
#[derive(Debug, Clone, Serialize)]
pub struct ScanReport {
    pub channel: Channel,
    pub origin: BatchOrigin,
    /// Messages returned by the source, at most [`MAX_SCAN_MESSAGES`].
    pub examined: usize,
    /// Messages dropped because they predate `since`.
    pub filtered_out: usize,
    /// Meaningful extractions, in source order.
    pub results: Vec<ExtractedFields>,
}

#[derive(Debug, Clone)]
pub enum ScanOutcome {
    Completed(ScanReport),
    /// Another scan was already in flight; nothing was done.
    Skipped,
}

impl ScanOutcome {
    pub fn report(&self) -> Option<&ScanReport> {
        match self {
            ScanOutcome::Completed(report) => Some(report),
            ScanOutcome::Skipped => None,
        }
    }

    pub fn into_results(self) -> Vec<ExtractedFields> {
        match self {
            ScanOutcome::Completed(report) => report.results,
            ScanOutcome::Skipped => Vec::new(),
        }
    }

    pub fn is_skipped(&self) -> bool {
        matches!(self, ScanOutcome::Skipped)
    }
}

/// Clears the in-flight flag on every exit path.
struct InFlight<'a>(&'a AtomicBool);

impl<'a> InFlight<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(flag))
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Coordinates message sources and extraction.
///
/// At most one scan runs at a time per orchestrator, across all channels. A
/// call that arrives while a scan is running returns [`ScanOutcome::Skipped`]
/// instead of queueing.
pub struct ScanOrchestrator {
    sources: HashMap<Channel, Arc<dyn MessageSource>>,
    clock: Arc<dyn Clock>,
    in_flight: AtomicBool,
}

impl ScanOrchestrator {
    pub fn new() -> Self {
        Self {
            sources: HashMap::new(),
            clock: Arc::new(SystemClock),
            in_flight: AtomicBool::new(false),
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_source(mut self, source: Arc<dyn MessageSource>) -> Self {
        self.sources.insert(source.channel(), source);
        self
    }

    pub fn is_scanning(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    fn source_for(&self, channel: Channel) -> Arc<dyn MessageSource> {
        match self.sources.get(&channel) {
            Some(source) => Arc::clone(source),
            None => Arc::new(MockSource::new(channel).with_clock(Arc::clone(&self.clock))),
        }
    }

    /// Scan `channel` for refund messages received at or after `since`.
    ///
    /// `since` is epoch milliseconds; `None` reads everything the source
    /// returns. Source errors propagate; extraction itself never fails.
    pub async fn scan(
        &self,
        channel: Channel,
        since: Option<i64>,
    ) -> Result<ScanOutcome, SourceError> {
        let Some(_guard) = InFlight::acquire(&self.in_flight) else {
            tracing::debug!(channel = %channel, "scan already in progress, skipping");
            return Ok(ScanOutcome::Skipped);
        };

        let source = self.source_for(channel);
        let mut batch = source.fetch(&FetchOptions::for_scan(since)).await?;
        // Transports treat `max_count` as a hint, and email joins several accounts.
        if batch.messages.len() > MAX_SCAN_MESSAGES {
            tracing::debug!(
                channel = %channel,
                fetched = batch.messages.len(),
                limit = MAX_SCAN_MESSAGES,
                "truncating oversized batch"
            );
            batch.messages.truncate(MAX_SCAN_MESSAGES);
        }

        let examined = batch.messages.len();
        let fresh: Vec<_> = batch
            .messages
            .iter()
            .filter(|message| since.map_or(true, |since| message.timestamp >= since))
            .collect();
        let filtered_out = examined - fresh.len();

        let results: Vec<ExtractedFields> = fresh
            .into_iter()
            .map(extract_message)
            .filter(ExtractedFields::is_meaningful)
            .collect();

        tracing::info!(
            channel = %channel,
            origin = ?batch.origin,
            examined,
            filtered_out,
            found = results.len(),
            "scan complete"
        );

        Ok(ScanOutcome::Completed(ScanReport {
            channel,
            origin: batch.origin,
            examined,
            filtered_out,
            results,
        }))
    }
}

impl Default for ScanOrchestrator {
    fn default() -> Self {
        Self::new()
    }
}
