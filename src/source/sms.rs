use std::sync::Arc;

use crate::clock::{Clock, SystemClock};
use crate::models::{Channel, RawMessage, SmsMessage};

use super::{sample_sms, FetchOptions, MessageBatch, MessageSource, SourceError};

/// Access to a device's SMS inbox.
#[async_trait::async_trait]
pub trait SmsTransport: Send + Sync {
    /// False when no native message store exists (e.g. outside the mobile shell).
    fn is_available(&self) -> bool;

    async fn list_sms(&self, options: &FetchOptions) -> Result<Vec<SmsMessage>, SourceError>;
}

/// Transport for platforms without an SMS store. Scans fall back to samples.
#[derive(Debug, Clone, Default)]
pub struct UnavailableSmsTransport;

#[async_trait::async_trait]
impl SmsTransport for UnavailableSmsTransport {
    fn is_available(&self) -> bool {
        false
    }

    async fn list_sms(&self, _options: &FetchOptions) -> Result<Vec<SmsMessage>, SourceError> {
        Err(SourceError::Unsupported(
            "no SMS store on this platform".to_string(),
        ))
    }
}

/// Native SMS source with sample-data fallback.
pub struct SmsSource<T: SmsTransport> {
    transport: T,
    clock: Arc<dyn Clock>,
}

impl<T: SmsTransport> SmsSource<T> {
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            clock: Arc::new(SystemClock),
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }
}

#[async_trait::async_trait]
impl<T: SmsTransport> MessageSource for SmsSource<T> {
    fn channel(&self) -> Channel {
        Channel::Sms
    }

    async fn fetch(&self, options: &FetchOptions) -> Result<MessageBatch, SourceError> {
        if !self.transport.is_available() {
            tracing::debug!("SMS store unavailable, using sample messages");
            return Ok(MessageBatch::fallback(sample_sms(self.clock.as_ref())));
        }

        let messages = self.transport.list_sms(options).await?;
        Ok(MessageBatch::transport(
            messages.into_iter().map(RawMessage::from).collect(),
        ))
    }
}
