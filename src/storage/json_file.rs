use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tokio::fs;

use super::Storage;
use crate::models::{EmailAccount, RefundRecord, ScanState};
use crate::source::{AccountRegistry, SourceError};

/// JSON file-based storage implementation.
///
/// Directory structure:
/// ```text
/// data/
///   refunds.json          # array of refund records
///   scan_state.json       # background scanner watermarks
///   email_accounts.json   # connected email accounts
///   mail/
///     {account-id}.json   # exported messages, read by MailExportDir
/// ```
/// Missing files read as empty.
pub struct JsonFileStorage {
    base_path: PathBuf,
}

impl JsonFileStorage {
    pub fn new(base_path: impl AsRef<Path>) -> Self {
        Self {
            base_path: base_path.as_ref().to_path_buf(),
        }
    }

    fn records_file(&self) -> PathBuf {
        self.base_path.join("refunds.json")
    }

    fn state_file(&self) -> PathBuf {
        self.base_path.join("scan_state.json")
    }

    fn accounts_file(&self) -> PathBuf {
        self.base_path.join("email_accounts.json")
    }

    async fn ensure_dir(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .await
                .context("Failed to create directory")?;
        }
        Ok(())
    }

    async fn read_json<T: for<'de> serde::Deserialize<'de>>(&self, path: &Path) -> Result<Option<T>> {
        match fs::read_to_string(path).await {
            Ok(content) => {
                let value = serde_json::from_str(&content)
                    .with_context(|| format!("Failed to parse JSON from {:?}", path))?;
                Ok(Some(value))
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e).with_context(|| format!("Failed to read {:?}", path)),
        }
    }

    /// Write through a sibling temp file so readers never see a partial list.
    async fn write_json<T: serde::Serialize + ?Sized>(&self, path: &Path, value: &T) -> Result<()> {
        self.ensure_dir(path).await?;
        let content = serde_json::to_string_pretty(value).context("Failed to serialize JSON")?;
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, content)
            .await
            .with_context(|| format!("Failed to write {:?}", tmp))?;
        fs::rename(&tmp, path)
            .await
            .with_context(|| format!("Failed to replace {:?}", path))?;
        Ok(())
    }

    pub async fn load_accounts(&self) -> Result<Vec<EmailAccount>> {
        Ok(self
            .read_json(&self.accounts_file())
            .await?
            .unwrap_or_default())
    }

    pub async fn save_accounts(&self, accounts: &[EmailAccount]) -> Result<()> {
        self.write_json(&self.accounts_file(), accounts).await
    }
}

#[async_trait::async_trait]
impl Storage for JsonFileStorage {
    async fn load_records(&self) -> Result<Vec<RefundRecord>> {
        Ok(self
            .read_json(&self.records_file())
            .await?
            .unwrap_or_default())
    }

    async fn save_records(&self, records: &[RefundRecord]) -> Result<()> {
        self.write_json(&self.records_file(), records).await
    }

    async fn load_state(&self) -> Result<ScanState> {
        Ok(self
            .read_json(&self.state_file())
            .await?
            .unwrap_or_default())
    }

    async fn save_state(&self, state: &ScanState) -> Result<()> {
        self.write_json(&self.state_file(), state).await
    }
}

#[async_trait::async_trait]
impl AccountRegistry for JsonFileStorage {
    async fn list_active_accounts(&self) -> Result<Vec<EmailAccount>, SourceError> {
        let accounts = self
            .load_accounts()
            .await
            .map_err(|e| SourceError::Registry(format!("{e:#}")))?;
        Ok(accounts.into_iter().filter(|a| a.is_active).collect())
    }
}
