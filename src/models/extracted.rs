use serde::{Deserialize, Serialize};

use super::{Channel, Currency, RefundStatus};

/// Best-effort structured data pulled out of one message.
///
/// Every field is optional: `None` means "not found", never an error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractedFields {
    /// Channel the message arrived on.
    pub channel: Channel,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<f64>,
    /// Always `Some` when `amount` is.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<Currency>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<RefundStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_name: Option<String>,
}

impl ExtractedFields {
    pub fn empty(channel: Channel) -> Self {
        Self {
            channel,
            order_id: None,
            amount: None,
            currency: None,
            status: None,
            reason: None,
            phone: None,
            email: None,
            customer_name: None,
        }
    }

    /// Worth importing: at least an order id or an amount was found.
    pub fn is_meaningful(&self) -> bool {
        self.order_id.is_some() || self.amount.is_some()
    }

    /// The order id, if present and non-empty. Dedup only applies to these.
    pub fn dedup_key(&self) -> Option<&str> {
        self.order_id.as_deref().filter(|id| !id.is_empty())
    }
}
