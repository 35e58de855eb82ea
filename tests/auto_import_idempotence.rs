use std::sync::Arc;

use refundbook::clock::FixedClock;
use refundbook::extract::extract;
use refundbook::models::{Channel, ExtractedFields, SequentialIdGenerator};
use refundbook::scan::{Importer, AUTO_IMPORTED_TAG, BACKGROUND_SCAN_TAG};

mod support;
use support::NOW_MS;

fn importer() -> Importer {
    Importer::new_with_generator(
        Arc::new(SequentialIdGenerator::new("refund")),
        Arc::new(FixedClock::from_millis(NOW_MS)),
    )
}

fn candidates() -> Vec<ExtractedFields> {
    vec![
        extract(
            Channel::Sms,
            "Your refund for Order #ORD-123456 has been approved. Amount: $150.00",
            "+1234567890",
        ),
        extract(
            Channel::Sms,
            "Refund request ORD-789012 for ₹5000 rejected due to policy violation",
            "+1987654321",
        ),
        // No order id: only an amount.
        extract(Channel::Sms, "refund 200 credited", "+1555555555"),
    ]
}

#[test]
fn second_run_adds_nothing_for_order_bearing_candidates() {
    let importer = importer();
    let candidates = candidates();

    let first = importer.auto_import(&candidates, &[]);
    assert_eq!(first.created.len(), 3);
    assert_eq!(first.skipped, 0);
    for record in &first.created {
        assert!(record.has_tag(AUTO_IMPORTED_TAG));
        assert!(record.has_tag("sms"));
        assert!(record.has_tag(BACKGROUND_SCAN_TAG));
    }

    let second = importer.auto_import(&candidates, &first.created);
    assert_eq!(second.skipped, 2);

    // The order-less candidate has nothing to dedup on and is imported again.
    assert_eq!(second.created.len(), 1);
    let repeat = &second.created[0];
    assert!(repeat.order_id.starts_with("AUTO-"));
    assert_eq!(repeat.amount, 200.0);
}

#[test]
fn duplicates_within_one_batch_collapse() {
    let importer = importer();
    let mut batch = candidates();
    batch.extend(candidates());

    let outcome = importer.auto_import(&batch, &[]);
    // Two order-bearing originals, two order-less copies.
    assert_eq!(outcome.created.len(), 4);
    assert_eq!(outcome.skipped, 2);

    let mut order_ids: Vec<_> = outcome
        .created
        .iter()
        .filter(|r| !r.order_id.starts_with("AUTO-"))
        .map(|r| r.order_id.as_str())
        .collect();
    order_ids.sort();
    assert_eq!(order_ids, vec!["ORD-123456", "ORD-789012"]);
}

#[test]
fn manual_import_never_dedups() {
    let importer = importer();
    let records = importer.import_all(&candidates());
    let again = importer.import_all(&candidates());
    assert_eq!(records.len() + again.len(), 6);
    assert!(records.iter().all(|r| !r.has_tag(BACKGROUND_SCAN_TAG)));
}
