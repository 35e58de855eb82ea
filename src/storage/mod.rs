mod json_file;
mod memory;

pub use json_file::JsonFileStorage;
pub use memory::MemoryStorage;

use anyhow::Result;

use crate::models::{RefundRecord, ScanState};

/// Storage trait for persisting refunds and scanner bookkeeping.
///
/// Records are read and written as a whole list; callers merge before saving.
#[async_trait::async_trait]
pub trait Storage: Send + Sync {
    // Refund records
    async fn load_records(&self) -> Result<Vec<RefundRecord>>;
    async fn save_records(&self, records: &[RefundRecord]) -> Result<()>;

    // Background scan state
    async fn load_state(&self) -> Result<ScanState>;
    async fn save_state(&self, state: &ScanState) -> Result<()>;
}
