#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use refundbook::models::{Channel, RawMessage, SmsMessage};
use refundbook::source::{
    FetchOptions, MessageBatch, MessageSource, SmsTransport, SourceError,
};
use tokio::sync::Notify;

pub const DAY_MS: i64 = 24 * 60 * 60 * 1000;
/// 2026-03-01T00:00:00Z
pub const NOW_MS: i64 = 1_772_323_200_000;

/// SMS transport serving a fixed inbox, or a fixed error.
#[derive(Debug, Clone, Default)]
pub struct MockSmsTransport {
    pub messages: Vec<SmsMessage>,
    pub error: Option<String>,
}

impl MockSmsTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_message(mut self, address: &str, body: &str, date: i64) -> Self {
        self.messages.push(SmsMessage::new(address, body, date));
        self
    }

    pub fn failing(mut self, error: impl Into<String>) -> Self {
        self.error = Some(error.into());
        self
    }
}

#[async_trait]
impl SmsTransport for MockSmsTransport {
    fn is_available(&self) -> bool {
        true
    }

    async fn list_sms(&self, _options: &FetchOptions) -> Result<Vec<SmsMessage>, SourceError> {
        match &self.error {
            Some(error) => Err(SourceError::PermissionDenied(error.clone())),
            None => Ok(self.messages.clone()),
        }
    }
}

/// Source that parks inside `fetch` until released.
///
/// `started` fires once the fetch is in flight, so a test can race a second
/// scan against it deterministically.
pub struct BlockingSource {
    channel: Channel,
    messages: Vec<RawMessage>,
    pub started: Arc<Notify>,
    pub release: Arc<Notify>,
    pub fetches: AtomicUsize,
}

impl BlockingSource {
    pub fn new(channel: Channel, messages: Vec<RawMessage>) -> Self {
        Self {
            channel,
            messages,
            started: Arc::new(Notify::new()),
            release: Arc::new(Notify::new()),
            fetches: AtomicUsize::new(0),
        }
    }

    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl MessageSource for BlockingSource {
    fn channel(&self) -> Channel {
        self.channel
    }

    async fn fetch(&self, _options: &FetchOptions) -> Result<MessageBatch, SourceError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        self.started.notify_one();
        self.release.notified().await;
        Ok(MessageBatch::transport(self.messages.clone()))
    }
}

/// Source whose every fetch fails with a connection error.
pub struct FailingSource {
    pub channel: Channel,
}

#[async_trait]
impl MessageSource for FailingSource {
    fn channel(&self) -> Channel {
        self.channel
    }

    async fn fetch(&self, _options: &FetchOptions) -> Result<MessageBatch, SourceError> {
        Err(SourceError::Connection(format!("{} transport down", self.channel)))
    }
}

pub fn sms(address: &str, body: &str, date: i64) -> RawMessage {
    SmsMessage::new(address, body, date).into()
}
