use crate::models::RefundStatus;

pub type StatusTable = &'static [(RefundStatus, &'static [&'static str])];

pub const SMS_STATUS: StatusTable = &[
    (RefundStatus::Approved, &["approved"]),
    (RefundStatus::Rejected, &["rejected", "denied"]),
    (RefundStatus::Paid, &["paid", "processed"]),
    (RefundStatus::Pending, &["pending", "processing"]),
];

pub const EMAIL_STATUS: StatusTable = &[
    (RefundStatus::Approved, &["approved"]),
    (RefundStatus::Rejected, &["rejected", "denied"]),
    (RefundStatus::Paid, &["paid", "processed", "completed"]),
    (RefundStatus::Pending, &["pending", "processing", "under review"]),
];

pub const SMS_REASONS: &[&str] = &[
    "defect",
    "damaged",
    "wrong",
    "missing",
    "late",
    "cancelled",
    "quality",
    "size",
    "color",
    "not as described",
    "changed mind",
];

pub const EMAIL_REASONS: &[&str] = &[
    "defect",
    "damaged",
    "wrong",
    "missing",
    "late",
    "cancelled",
    "quality",
    "size",
    "color",
    "not as described",
    "changed mind",
    "return",
];

/// `lowered` must already be lower-cased.
pub fn find_status(table: StatusTable, lowered: &str) -> Option<RefundStatus> {
    table
        .iter()
        .find(|(_, needles)| needles.iter().any(|needle| lowered.contains(needle)))
        .map(|(status, _)| *status)
}

/// `lowered` must already be lower-cased.
pub fn find_reason(keywords: &[&str], lowered: &str) -> Option<String> {
    keywords
        .iter()
        .find(|keyword| lowered.contains(*keyword))
        .map(|keyword| title_case(keyword))
}

/// Upper-cases the first letter of every word, on both channels.
fn title_case(phrase: &str) -> String {
    phrase
        .split(' ')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}
