//! Scanning: fetch messages, extract refunds, and turn them into records.

mod background;
mod import;
mod orchestrator;

pub use background::{
    BackgroundScanner, ChannelResult, CycleOutcome, CycleReport, NoopNotifier, NoticeLevel,
    Notifier, TracingNotifier,
};
pub use import::{ImportOutcome, Importer, AUTO_IMPORTED_TAG, BACKGROUND_SCAN_TAG};
pub use orchestrator::{ScanOrchestrator, ScanOutcome, ScanReport};
