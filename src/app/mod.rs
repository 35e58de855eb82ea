mod config;
mod import;
mod list;
mod scan;

use std::sync::Arc;

use crate::clock::Clock;
use crate::config::ResolvedConfig;
use crate::scan::ScanOrchestrator;
use crate::source::{
    EmailSource, MailExportDir, MessageSource, SmsExportFile, SmsSource, UnavailableSmsTransport,
};
use crate::storage::JsonFileStorage;

pub use config::config_output;
pub use import::{auto_scan, import_channel};
pub use list::list_records;
pub use scan::{extract_text, scan_channel};

/// Wire the configured transports into an orchestrator.
///
/// SMS reads the configured export file, or falls back to samples when none
/// is set. Email reads accounts from `storage` and messages from the data
/// directory's `mail/` folder.
pub fn build_orchestrator(
    config: &ResolvedConfig,
    storage: Arc<JsonFileStorage>,
    clock: Arc<dyn Clock>,
) -> ScanOrchestrator {
    let sms: Arc<dyn MessageSource> = match &config.scan.sms_export {
        Some(path) => {
            Arc::new(SmsSource::new(SmsExportFile::new(path)).with_clock(Arc::clone(&clock)))
        }
        None => Arc::new(SmsSource::new(UnavailableSmsTransport).with_clock(Arc::clone(&clock))),
    };
    let email = EmailSource::new(
        storage,
        Arc::new(MailExportDir::new(config.mail_export_dir())),
    )
    .with_clock(Arc::clone(&clock));

    ScanOrchestrator::new()
        .with_clock(clock)
        .with_source(sms)
        .with_source(Arc::new(email))
}
