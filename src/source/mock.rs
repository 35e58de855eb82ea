use std::sync::Arc;

use crate::clock::{Clock, SystemClock};
use crate::models::{Channel, EmailMessage, RawMessage, SmsMessage};

use super::{FetchOptions, MessageBatch, MessageSource, SourceError};

const DAY_MS: i64 = 24 * 60 * 60 * 1000;

/// The built-in SMS samples, dated one to three days before `clock.now()`.
pub fn sample_sms(clock: &dyn Clock) -> Vec<RawMessage> {
    let now = clock.now_millis();
    [
        SmsMessage::new(
            "+1234567890",
            "Your refund for Order #ORD-123456 has been approved. Amount: $150.00 will be processed within 5-7 business days.",
            now - DAY_MS,
        ),
        SmsMessage::new(
            "+1987654321",
            "Refund request ORD-789012 for ₹5000 rejected due to policy violation. Contact support for details.",
            now - 2 * DAY_MS,
        ),
        SmsMessage::new(
            "+1555555555",
            "Refund of $75.50 for order #ORD-345678 has been paid to your account.",
            now - 3 * DAY_MS,
        ),
    ]
    .into_iter()
    .map(RawMessage::from)
    .collect()
}

/// The built-in email samples, dated one and two days before `clock.now()`.
pub fn sample_emails(clock: &dyn Clock) -> Vec<RawMessage> {
    let now = clock.now_millis();
    [
        EmailMessage::new(
            "Refund Approved - Order ORD-123456",
            "Dear Customer, Your refund request for Order #ORD-123456 has been approved. Amount: $150.00 will be processed within 5-7 business days. Thank you for your patience.",
            "support@example.com",
            now - DAY_MS,
        ),
        EmailMessage::new(
            "Refund Update - Order ORD-789012",
            "We regret to inform you that your refund request for ₹5000 has been rejected due to policy violation. Please contact our support team for more details.",
            "refunds@example.com",
            now - 2 * DAY_MS,
        ),
    ]
    .into_iter()
    .map(RawMessage::from)
    .collect()
}

/// Source that always serves the built-in samples for its channel.
///
/// Used when no real source is registered for a channel, and in demos.
pub struct MockSource {
    channel: Channel,
    clock: Arc<dyn Clock>,
}

impl MockSource {
    pub fn new(channel: Channel) -> Self {
        Self {
            channel,
            clock: Arc::new(SystemClock),
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }
}

#[async_trait::async_trait]
impl MessageSource for MockSource {
    fn channel(&self) -> Channel {
        self.channel
    }

    async fn fetch(&self, _options: &FetchOptions) -> Result<MessageBatch, SourceError> {
        let messages = match self.channel {
            Channel::Sms => sample_sms(self.clock.as_ref()),
            Channel::Email => sample_emails(self.clock.as_ref()),
        };
        Ok(MessageBatch::fallback(messages))
    }
}
