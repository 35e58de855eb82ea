use anyhow::Result;

use crate::extract::extract;
use crate::models::Channel;
use crate::scan::{ScanOrchestrator, ScanOutcome};

pub fn extract_text(channel: Channel, sender: &str, text: &str) -> serde_json::Value {
    let fields = extract(channel, text, sender);
    serde_json::json!({
        "meaningful": fields.is_meaningful(),
        "fields": fields,
    })
}

/// Foreground scan. Source errors are returned to the caller.
pub async fn scan_channel(
    orchestrator: &ScanOrchestrator,
    channel: Channel,
    since: Option<i64>,
) -> Result<serde_json::Value> {
    match orchestrator.scan(channel, since).await? {
        ScanOutcome::Completed(report) => Ok(serde_json::json!({
            "success": true,
            "report": report,
        })),
        ScanOutcome::Skipped => Ok(serde_json::json!({
            "success": false,
            "skipped": true,
            "reason": "scan already in progress",
        })),
    }
}
