//! In-memory storage implementation for testing.

use std::sync::atomic::{AtomicBool, Ordering};

use anyhow::Result;
use tokio::sync::Mutex;

use crate::models::{EmailAccount, RefundRecord, ScanState};
use crate::source::{AccountRegistry, SourceError};

use super::Storage;

/// In-memory storage for testing purposes.
pub struct MemoryStorage {
    records: Mutex<Vec<RefundRecord>>,
    state: Mutex<ScanState>,
    accounts: Mutex<Vec<EmailAccount>>,
    fail_saves: AtomicBool,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self {
            records: Mutex::new(Vec::new()),
            state: Mutex::new(ScanState::default()),
            accounts: Mutex::new(Vec::new()),
            fail_saves: AtomicBool::new(false),
        }
    }

    pub async fn add_account(&self, account: EmailAccount) {
        self.accounts.lock().await.push(account);
    }

    /// Make every subsequent save fail, to exercise error paths.
    pub fn fail_saves(&self, fail: bool) {
        self.fail_saves.store(fail, Ordering::SeqCst);
    }

    fn check_writable(&self) -> Result<()> {
        if self.fail_saves.load(Ordering::SeqCst) {
            anyhow::bail!("memory storage is read-only");
        }
        Ok(())
    }
}

impl Default for MemoryStorage {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl Storage for MemoryStorage {
    async fn load_records(&self) -> Result<Vec<RefundRecord>> {
        Ok(self.records.lock().await.clone())
    }

    async fn save_records(&self, records: &[RefundRecord]) -> Result<()> {
        self.check_writable()?;
        *self.records.lock().await = records.to_vec();
        Ok(())
    }

    async fn load_state(&self) -> Result<ScanState> {
        Ok(self.state.lock().await.clone())
    }

    async fn save_state(&self, state: &ScanState) -> Result<()> {
        self.check_writable()?;
        *self.state.lock().await = state.clone();
        Ok(())
    }
}

#[async_trait::async_trait]
impl AccountRegistry for MemoryStorage {
    async fn list_active_accounts(&self) -> Result<Vec<EmailAccount>, SourceError> {
        let accounts = self.accounts.lock().await;
        Ok(accounts.iter().filter(|a| a.is_active).cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use crate::models::{EmailProvider, SequentialIdGenerator};

    #[tokio::test]
    async fn test_records_roundtrip() -> Result<()> {
        let storage = MemoryStorage::new();
        let ids = SequentialIdGenerator::new("r");
        let record = RefundRecord::new_with_generator(&ids, &FixedClock::from_millis(0), "ORD-1");

        storage.save_records(std::slice::from_ref(&record)).await?;
        assert_eq!(storage.load_records().await?, vec![record]);
        Ok(())
    }

    #[tokio::test]
    async fn test_fail_saves() -> Result<()> {
        let storage = MemoryStorage::new();
        storage.fail_saves(true);
        assert!(storage.save_state(&ScanState::default()).await.is_err());
        assert!(storage.save_records(&[]).await.is_err());

        storage.fail_saves(false);
        storage.save_state(&ScanState::default()).await?;
        Ok(())
    }

    #[tokio::test]
    async fn test_registry_lists_active_only() -> Result<()> {
        let storage = MemoryStorage::new();
        storage
            .add_account(EmailAccount::new("a".into(), EmailProvider::Gmail, "a@mail.test"))
            .await;
        storage
            .add_account(
                EmailAccount::new("b".into(), EmailProvider::Yahoo, "b@mail.test").inactive(),
            )
            .await;

        let active = storage.list_active_accounts().await?;
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].id.as_str(), "a");
        Ok(())
    }
}
