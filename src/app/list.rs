use anyhow::Result;

use crate::models::RefundStatus;
use crate::storage::Storage;

/// Stored records, newest first. Deleted records are hidden unless asked for.
pub async fn list_records(
    storage: &dyn Storage,
    status: Option<RefundStatus>,
    include_deleted: bool,
) -> Result<serde_json::Value> {
    let mut records = storage.load_records().await?;
    records.retain(|record| match status {
        Some(status) => record.status == status,
        None => include_deleted || record.status != RefundStatus::Deleted,
    });
    records.sort_by(|a, b| b.created_at.cmp(&a.created_at));

    Ok(serde_json::json!({
        "count": records.len(),
        "records": records,
    }))
}
