//! Message sources: where a scan gets its raw messages from.
//!
//! The orchestrator only sees [`MessageSource`]; which concrete source backs
//! a channel (a native SMS store, connected email accounts, or built-in
//! sample data) is decided once by whoever builds the orchestrator.

mod email;
mod file;
mod mock;
mod sms;

pub use email::{AccountRegistry, EmailSource, EmailTransport, StaticAccountRegistry};
pub use file::{MailExportDir, SmsExportFile};
pub use mock::{sample_emails, sample_sms, MockSource};
pub use sms::{SmsSource, SmsTransport, UnavailableSmsTransport};

use crate::models::{Channel, RawMessage};

/// Upper bound on messages pulled per scan.
pub const MAX_SCAN_MESSAGES: usize = 500;

/// Hints passed down to transports.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FetchOptions {
    pub max_count: Option<usize>,
    /// Epoch milliseconds; transports may skip older messages.
    pub start_date: Option<i64>,
}

impl FetchOptions {
    pub fn for_scan(since: Option<i64>) -> Self {
        Self {
            max_count: Some(MAX_SCAN_MESSAGES),
            start_date: since,
        }
    }

    /// Apply the hints to an already-fetched list.
    pub(crate) fn apply<T>(&self, items: Vec<T>, timestamp: impl Fn(&T) -> i64) -> Vec<T> {
        let limit = self.max_count.unwrap_or(usize::MAX);
        items
            .into_iter()
            .filter(|item| self.start_date.map_or(true, |start| timestamp(item) >= start))
            .take(limit)
            .collect()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("permission denied: {0}")]
    PermissionDenied(String),

    #[error("not supported on this platform: {0}")]
    Unsupported(String),

    #[error("connection failed: {0}")]
    Connection(String),

    #[error("account registry unavailable: {0}")]
    Registry(String),

    #[error("failed to read messages from {path}: {message}")]
    Io { path: String, message: String },
}

/// Whether a batch came from a real transport or from built-in sample data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BatchOrigin {
    Transport,
    Fallback,
}

#[derive(Debug, Clone)]
pub struct MessageBatch {
    pub messages: Vec<RawMessage>,
    pub origin: BatchOrigin,
}

impl MessageBatch {
    pub fn transport(messages: Vec<RawMessage>) -> Self {
        Self {
            messages,
            origin: BatchOrigin::Transport,
        }
    }

    pub fn fallback(messages: Vec<RawMessage>) -> Self {
        Self {
            messages,
            origin: BatchOrigin::Fallback,
        }
    }

    pub fn is_fallback(&self) -> bool {
        self.origin == BatchOrigin::Fallback
    }
}

/// A provider of raw messages for one channel.
#[async_trait::async_trait]
pub trait MessageSource: Send + Sync {
    fn channel(&self) -> Channel;

    async fn fetch(&self, options: &FetchOptions) -> Result<MessageBatch, SourceError>;
}
