use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::clock::Clock;

use super::{Currency, Id, IdGenerator};

/// Lifecycle of a tracked refund claim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum RefundStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
    Paid,
    /// Soft-deleted by the user; never produced by extraction.
    Deleted,
}

impl RefundStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RefundStatus::Pending => "PENDING",
            RefundStatus::Approved => "APPROVED",
            RefundStatus::Rejected => "REJECTED",
            RefundStatus::Paid => "PAID",
            RefundStatus::Deleted => "DELETED",
        }
    }
}

impl std::fmt::Display for RefundStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for RefundStatus {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "PENDING" => Ok(RefundStatus::Pending),
            "APPROVED" => Ok(RefundStatus::Approved),
            "REJECTED" => Ok(RefundStatus::Rejected),
            "PAID" => Ok(RefundStatus::Paid),
            "DELETED" => Ok(RefundStatus::Deleted),
            other => anyhow::bail!("Unknown refund status: {other}"),
        }
    }
}

/// A persisted refund claim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RefundRecord {
    pub id: Id,
    pub order_id: String,
    pub customer_name: String,
    pub contact_phone: String,
    pub email: String,
    pub amount: f64,
    pub currency: Currency,
    pub reason: String,
    pub status: RefundStatus,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl RefundRecord {
    pub fn new_with_generator(
        ids: &dyn IdGenerator,
        clock: &dyn Clock,
        order_id: impl Into<String>,
    ) -> Self {
        let now = clock.now();
        Self {
            id: ids.new_id(),
            order_id: order_id.into(),
            customer_name: String::new(),
            contact_phone: String::new(),
            email: String::new(),
            amount: 0.0,
            currency: Currency::default(),
            reason: String::new(),
            status: RefundStatus::Pending,
            tags: Vec::new(),
            notes: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_amount(mut self, amount: f64, currency: Currency) -> Self {
        self.amount = amount;
        self.currency = currency;
        self
    }

    pub fn with_status(mut self, status: RefundStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
        self
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use crate::models::SequentialIdGenerator;
    use chrono::TimeZone;

    #[test]
    fn new_with_generator_is_deterministic() {
        let ids = SequentialIdGenerator::new("refund");
        let clock = FixedClock::new(Utc.with_ymd_and_hms(2026, 2, 5, 12, 0, 0).unwrap());

        let record = RefundRecord::new_with_generator(&ids, &clock, "ORD-1")
            .with_amount(12.5, Currency::Eur)
            .with_tag("sms");

        assert_eq!(record.id.as_str(), "refund-1");
        assert_eq!(record.created_at, clock.now());
        assert_eq!(record.updated_at, clock.now());
        assert_eq!(record.status, RefundStatus::Pending);
        assert!(record.has_tag("sms"));
    }

    #[test]
    fn status_uses_uppercase_wire_names() {
        let json = serde_json::to_string(&RefundStatus::Approved).unwrap();
        assert_eq!(json, "\"APPROVED\"");
        assert_eq!("paid".parse::<RefundStatus>().unwrap(), RefundStatus::Paid);
        assert!("refunded".parse::<RefundStatus>().is_err());
    }
}
