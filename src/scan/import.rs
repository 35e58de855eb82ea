//! Turns extraction results into refund records.

use std::collections::HashSet;
use std::sync::Arc;

use rand::Rng;

use crate::clock::{Clock, SystemClock};
use crate::models::{ExtractedFields, IdGenerator, RefundRecord, UuidIdGenerator};

pub const AUTO_IMPORTED_TAG: &str = "auto-imported";
pub const BACKGROUND_SCAN_TAG: &str = "background-scan";

const UNKNOWN_CUSTOMER: &str = "Unknown";
const BASE36: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Which path created a record. Only affects default texts and tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ImportPath {
    Manual,
    Background,
}

impl ImportPath {
    fn default_reason(self) -> &'static str {
        match self {
            ImportPath::Manual => "Auto-imported from message",
            ImportPath::Background => "Auto-imported",
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ImportOutcome {
    pub created: Vec<RefundRecord>,
    /// Candidates dropped because their order id was already known.
    pub skipped: usize,
}

pub struct Importer {
    ids: Arc<dyn IdGenerator>,
    clock: Arc<dyn Clock>,
}

impl Importer {
    pub fn new() -> Self {
        Self::new_with_generator(Arc::new(UuidIdGenerator), Arc::new(SystemClock))
    }

    pub fn new_with_generator(ids: Arc<dyn IdGenerator>, clock: Arc<dyn Clock>) -> Self {
        Self { ids, clock }
    }

    /// `AUTO-<epoch millis>-<6 base36 chars>`, for candidates with no order id.
    fn synthetic_order_id(&self) -> String {
        let mut rng = rand::thread_rng();
        let suffix: String = (0..6)
            .map(|_| BASE36[rng.gen_range(0..BASE36.len())] as char)
            .collect();
        format!("AUTO-{}-{}", self.clock.now_millis(), suffix)
    }

    fn build(&self, fields: &ExtractedFields, path: ImportPath) -> RefundRecord {
        let order_id = match fields.dedup_key() {
            Some(order_id) => order_id.to_string(),
            None => self.synthetic_order_id(),
        };

        let mut record = RefundRecord::new_with_generator(
            self.ids.as_ref(),
            self.clock.as_ref(),
            order_id,
        )
        .with_amount(
            fields.amount.unwrap_or(0.0),
            fields.currency.unwrap_or_default(),
        )
        .with_status(fields.status.unwrap_or_default())
        .with_tag(AUTO_IMPORTED_TAG)
        .with_tag(fields.channel.as_str());

        record.customer_name = fields
            .customer_name
            .clone()
            .unwrap_or_else(|| UNKNOWN_CUSTOMER.to_string());
        record.contact_phone = fields.phone.clone().unwrap_or_default();
        record.email = fields.email.clone().unwrap_or_default();
        record.reason = fields
            .reason
            .clone()
            .unwrap_or_else(|| path.default_reason().to_string());

        match path {
            ImportPath::Manual => {
                record.notes = Some(format!(
                    "Imported from {}",
                    fields.channel.as_str().to_uppercase()
                ));
            }
            ImportPath::Background => {
                record.tags.push(BACKGROUND_SCAN_TAG.to_string());
                record.notes = Some("Automatically imported from background scan".to_string());
            }
        }

        record
    }

    /// Build a record from one extraction, as a manual import would.
    pub fn to_record(&self, fields: &ExtractedFields) -> RefundRecord {
        self.build(fields, ImportPath::Manual)
    }

    /// Manual import: one record per candidate, no deduplication.
    pub fn import_all(&self, candidates: &[ExtractedFields]) -> Vec<RefundRecord> {
        candidates.iter().map(|fields| self.to_record(fields)).collect()
    }

    /// Background import, skipping candidates whose order id is already
    /// present in `existing` or was created earlier in this pass.
    ///
    /// Candidates without an order id are always imported, so re-running
    /// over the same messages duplicates them.
    pub fn auto_import(
        &self,
        candidates: &[ExtractedFields],
        existing: &[RefundRecord],
    ) -> ImportOutcome {
        let mut known: HashSet<String> = existing.iter().map(|r| r.order_id.clone()).collect();
        let mut outcome = ImportOutcome::default();

        for fields in candidates {
            if let Some(order_id) = fields.dedup_key() {
                if !known.insert(order_id.to_string()) {
                    tracing::debug!(order_id, "refund already recorded, skipping");
                    outcome.skipped += 1;
                    continue;
                }
            }
            outcome.created.push(self.build(fields, ImportPath::Background));
        }

        outcome
    }
}

impl Default for Importer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use crate::models::{Channel, Currency, RefundStatus, SequentialIdGenerator};

    fn importer() -> Importer {
        Importer::new_with_generator(
            Arc::new(SequentialIdGenerator::new("refund")),
            Arc::new(FixedClock::from_millis(1_700_000_000_000)),
        )
    }

    fn with_order(order_id: &str) -> ExtractedFields {
        let mut fields = ExtractedFields::empty(Channel::Sms);
        fields.order_id = Some(order_id.to_string());
        fields
    }

    #[test]
    fn manual_defaults() {
        let mut fields = ExtractedFields::empty(Channel::Sms);
        fields.amount = Some(12.5);
        fields.currency = Some(Currency::Gbp);

        let record = importer().to_record(&fields);
        assert_eq!(record.id.as_str(), "refund-1");
        assert!(record.order_id.starts_with("AUTO-1700000000000-"));
        let suffix = record.order_id.rsplit('-').next().unwrap();
        assert_eq!(suffix.len(), 6);
        assert!(suffix.bytes().all(|b| BASE36.contains(&b)));
        assert_eq!(record.customer_name, "Unknown");
        assert_eq!(record.contact_phone, "");
        assert_eq!(record.email, "");
        assert_eq!(record.amount, 12.5);
        assert_eq!(record.currency, Currency::Gbp);
        assert_eq!(record.status, RefundStatus::Pending);
        assert_eq!(record.reason, "Auto-imported from message");
        assert_eq!(record.tags, vec!["auto-imported", "sms"]);
        assert_eq!(record.notes.as_deref(), Some("Imported from SMS"));
    }

    #[test]
    fn extracted_values_win_over_defaults() {
        let mut fields = ExtractedFields::empty(Channel::Email);
        fields.order_id = Some("ORD-9".to_string());
        fields.status = Some(RefundStatus::Paid);
        fields.reason = Some("Damaged".to_string());
        fields.customer_name = Some("Acme".to_string());
        fields.email = Some("help@acme.test".to_string());

        let record = importer().to_record(&fields);
        assert_eq!(record.order_id, "ORD-9");
        assert_eq!(record.status, RefundStatus::Paid);
        assert_eq!(record.reason, "Damaged");
        assert_eq!(record.customer_name, "Acme");
        assert_eq!(record.email, "help@acme.test");
        assert_eq!(record.amount, 0.0);
        assert_eq!(record.currency, Currency::Usd);
        assert_eq!(record.tags, vec!["auto-imported", "email"]);
    }

    #[test]
    fn import_all_keeps_duplicates() {
        let records = importer().import_all(&[with_order("ORD-1"), with_order("ORD-1")]);
        assert_eq!(records.len(), 2);
        assert_ne!(records[0].id, records[1].id);
    }

    #[test]
    fn auto_import_dedups_against_existing_and_same_pass() {
        let importer = importer();
        let existing = importer.import_all(&[with_order("ORD-1")]);

        let outcome = importer.auto_import(
            &[with_order("ORD-1"), with_order("ORD-2"), with_order("ORD-2")],
            &existing,
        );
        assert_eq!(outcome.skipped, 2);
        assert_eq!(outcome.created.len(), 1);
        let created = &outcome.created[0];
        assert_eq!(created.order_id, "ORD-2");
        assert_eq!(created.reason, "Auto-imported");
        assert!(created.has_tag(BACKGROUND_SCAN_TAG));
        assert_eq!(
            created.notes.as_deref(),
            Some("Automatically imported from background scan")
        );
    }

    #[test]
    fn empty_order_id_is_not_a_dedup_key() {
        let outcome = importer().auto_import(&[with_order(""), with_order("")], &[]);
        assert_eq!(outcome.created.len(), 2);
        assert!(outcome.created[0].order_id.starts_with("AUTO-"));
    }
}
