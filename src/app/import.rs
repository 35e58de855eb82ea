use anyhow::{Context, Result};

use crate::models::Channel;
use crate::scan::{BackgroundScanner, Importer, ScanOrchestrator};
use crate::storage::Storage;

/// Scan a channel and store every result as a new record.
///
/// This is the manual path: no deduplication against stored records.
pub async fn import_channel(
    storage: &dyn Storage,
    orchestrator: &ScanOrchestrator,
    importer: &Importer,
    channel: Channel,
    since: Option<i64>,
) -> Result<serde_json::Value> {
    let outcome = orchestrator.scan(channel, since).await?;
    if outcome.is_skipped() {
        return Ok(serde_json::json!({
            "success": false,
            "skipped": true,
            "reason": "scan already in progress",
        }));
    }

    let created = importer.import_all(&outcome.into_results());
    if !created.is_empty() {
        let mut records = storage
            .load_records()
            .await
            .context("Failed to load refund records")?;
        records.extend(created.iter().cloned());
        storage
            .save_records(&records)
            .await
            .context("Failed to save imported refunds")?;
    }

    Ok(serde_json::json!({
        "success": true,
        "channel": channel,
        "imported": created.len(),
        "records": created,
    }))
}

/// Run a single background cycle.
pub async fn auto_scan(scanner: &BackgroundScanner) -> Result<serde_json::Value> {
    let outcome = scanner.perform_scan().await?;
    Ok(serde_json::to_value(outcome)?)
}
