use std::sync::Arc;

use crate::clock::{Clock, SystemClock};
use crate::models::{Channel, EmailAccount, EmailMessage, RawMessage};

use super::{sample_emails, FetchOptions, MessageBatch, MessageSource, SourceError};

/// Lists the email accounts a scan should read from.
#[async_trait::async_trait]
pub trait AccountRegistry: Send + Sync {
    async fn list_active_accounts(&self) -> Result<Vec<EmailAccount>, SourceError>;
}

/// Fetches messages for one connected account.
#[async_trait::async_trait]
pub trait EmailTransport: Send + Sync {
    async fn list_emails(
        &self,
        account: &EmailAccount,
        options: &FetchOptions,
    ) -> Result<Vec<EmailMessage>, SourceError>;
}

/// In-memory registry, for tests and fixed setups.
#[derive(Debug, Clone, Default)]
pub struct StaticAccountRegistry {
    accounts: Vec<EmailAccount>,
}

impl StaticAccountRegistry {
    pub fn new(accounts: Vec<EmailAccount>) -> Self {
        Self { accounts }
    }
}

#[async_trait::async_trait]
impl AccountRegistry for StaticAccountRegistry {
    async fn list_active_accounts(&self) -> Result<Vec<EmailAccount>, SourceError> {
        Ok(self
            .accounts
            .iter()
            .filter(|account| account.is_active)
            .cloned()
            .collect())
    }
}

/// Email source over every active account.
///
/// Falls back to sample messages when there is nothing to read: no active
/// accounts, or accounts that returned no messages. A failing account is
/// logged and skipped; the scan only fails when every account failed.
pub struct EmailSource {
    registry: Arc<dyn AccountRegistry>,
    transport: Arc<dyn EmailTransport>,
    clock: Arc<dyn Clock>,
}

impl EmailSource {
    pub fn new(registry: Arc<dyn AccountRegistry>, transport: Arc<dyn EmailTransport>) -> Self {
        Self {
            registry,
            transport,
            clock: Arc::new(SystemClock),
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    fn fallback(&self) -> MessageBatch {
        MessageBatch::fallback(sample_emails(self.clock.as_ref()))
    }
}

#[async_trait::async_trait]
impl MessageSource for EmailSource {
    fn channel(&self) -> Channel {
        Channel::Email
    }

    async fn fetch(&self, options: &FetchOptions) -> Result<MessageBatch, SourceError> {
        let accounts = self.registry.list_active_accounts().await?;
        if accounts.is_empty() {
            tracing::debug!("no active email accounts, using sample messages");
            return Ok(self.fallback());
        }

        let mut messages: Vec<RawMessage> = Vec::new();
        let mut first_error: Option<SourceError> = None;
        let mut succeeded = 0usize;

        for account in &accounts {
            match self.transport.list_emails(account, options).await {
                Ok(emails) => {
                    succeeded += 1;
                    tracing::debug!(
                        account = %account.id,
                        count = emails.len(),
                        "fetched email messages"
                    );
                    messages.extend(emails.into_iter().map(RawMessage::from));
                }
                Err(err) => {
                    tracing::warn!(
                        account = %account.id,
                        email = %account.email,
                        error = %err,
                        "failed to fetch email account, skipping"
                    );
                    first_error.get_or_insert(err);
                }
            }
        }

        if succeeded == 0 {
            if let Some(err) = first_error {
                return Err(err);
            }
        }

        if messages.is_empty() {
            tracing::debug!("email accounts returned no messages, using sample messages");
            return Ok(self.fallback());
        }

        Ok(MessageBatch::transport(messages))
    }
}
