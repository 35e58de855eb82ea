//! File-backed transports for messages exported from a phone or mail client.

use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;

use crate::models::{EmailAccount, EmailMessage, SmsMessage};

use super::{EmailTransport, FetchOptions, SmsTransport, SourceError};

async fn read_json_array<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>, SourceError> {
    let io_error = |message: String| SourceError::Io {
        path: path.display().to_string(),
        message,
    };
    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| io_error(e.to_string()))?;
    serde_json::from_str(&content).map_err(|e| io_error(e.to_string()))
}

/// A JSON array of [`SmsMessage`] exported from a device.
#[derive(Debug, Clone)]
pub struct SmsExportFile {
    path: PathBuf,
}

impl SmsExportFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait::async_trait]
impl SmsTransport for SmsExportFile {
    fn is_available(&self) -> bool {
        self.path.exists()
    }

    async fn list_sms(&self, options: &FetchOptions) -> Result<Vec<SmsMessage>, SourceError> {
        let messages: Vec<SmsMessage> = read_json_array(&self.path).await?;
        Ok(options.apply(messages, |m| m.date))
    }
}

/// One JSON array of [`EmailMessage`] per account, at `<dir>/<account-id>.json`.
#[derive(Debug, Clone)]
pub struct MailExportDir {
    dir: PathBuf,
}

impl MailExportDir {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn account_file(&self, account: &EmailAccount) -> PathBuf {
        self.dir.join(format!("{}.json", account.id))
    }
}

#[async_trait::async_trait]
impl EmailTransport for MailExportDir {
    async fn list_emails(
        &self,
        account: &EmailAccount,
        options: &FetchOptions,
    ) -> Result<Vec<EmailMessage>, SourceError> {
        if !account.id.is_file_stem_safe() {
            return Err(SourceError::Connection(format!(
                "account id {:?} cannot name an export file",
                account.id.as_str()
            )));
        }
        let path = self.account_file(account);
        if !path.exists() {
            return Err(SourceError::Connection(format!(
                "no mail export for account {} at {}",
                account.id,
                path.display()
            )));
        }
        let messages: Vec<EmailMessage> = read_json_array(&path).await?;
        Ok(options.apply(messages, |m| m.date))
    }
}
