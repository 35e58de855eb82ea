//! Heuristic refund extraction from SMS and email text.
//!
//! Extraction is a pure function of the message text and sender. Every field
//! category (order id, amount, status, reason) is resolved by walking a fixed,
//! ordered list of patterns or keywords and stopping at the first hit. The
//! order is part of the behavior: reordering changes results on ambiguous
//! messages.
//!
//! SMS and email use slightly different tables (email additionally accepts
//! `order number: ...`, `completed`, `under review` and `return`). Each
//! channel's tables are bundled in an [`ExtractionProfile`].

mod contact;
mod currency;
mod keywords;
mod patterns;

pub use contact::{parse_email_sender, EmailContact};
pub use currency::{resolve_currency, FALLBACK_CURRENCY};
pub use patterns::{find_amount, find_order_id, parse_amount, AmountRule, OrderRule};

use crate::models::{Channel, ExtractedFields, RawMessage};

use keywords::StatusTable;

/// The ordered rule and keyword tables for one channel.
#[derive(Debug, Clone, Copy)]
pub struct ExtractionProfile {
    pub channel: Channel,
    pub order_rules: &'static [OrderRule],
    status_table: StatusTable,
    reason_keywords: &'static [&'static str],
}

impl ExtractionProfile {
    pub const SMS: ExtractionProfile = ExtractionProfile {
        channel: Channel::Sms,
        order_rules: &[
            OrderRule::Keyword,
            OrderRule::OrdPrefix,
            OrderRule::HashDigits,
        ],
        status_table: keywords::SMS_STATUS,
        reason_keywords: keywords::SMS_REASONS,
    };

    pub const EMAIL: ExtractionProfile = ExtractionProfile {
        channel: Channel::Email,
        order_rules: &[
            OrderRule::Keyword,
            OrderRule::OrdPrefix,
            OrderRule::HashDigits,
            OrderRule::OrderNumber,
        ],
        status_table: keywords::EMAIL_STATUS,
        reason_keywords: keywords::EMAIL_REASONS,
    };

    pub fn for_channel(channel: Channel) -> &'static ExtractionProfile {
        match channel {
            Channel::Sms => &Self::SMS,
            Channel::Email => &Self::EMAIL,
        }
    }

    pub fn extract(&self, text: &str, sender: &str) -> ExtractedFields {
        let lowered = text.to_lowercase();
        let mut fields = ExtractedFields::empty(self.channel);

        fields.order_id = find_order_id(self.order_rules, text);

        if let Some(amount) = find_amount(text) {
            fields.amount = Some(amount);
            fields.currency = Some(resolve_currency(text));
        }

        fields.status = keywords::find_status(self.status_table, &lowered);
        fields.reason = keywords::find_reason(self.reason_keywords, &lowered);

        match self.channel {
            Channel::Sms => {
                fields.phone = Some(sender.to_string());
            }
            Channel::Email => {
                let contact = parse_email_sender(sender);
                fields.customer_name = contact.customer_name;
                fields.email = contact.email;
            }
        }

        fields
    }
}

/// Extract refund fields from `text` using the channel's tables.
///
/// Never fails: a message with nothing recognizable yields a result whose
/// extracted fields are all `None` (SMS still records the sender as phone).
pub fn extract(channel: Channel, text: &str, sender: &str) -> ExtractedFields {
    ExtractionProfile::for_channel(channel).extract(text, sender)
}

pub fn extract_message(message: &RawMessage) -> ExtractedFields {
    extract(message.channel, &message.text, &message.sender)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Currency, RefundStatus};

    #[test]
    fn approved_dollar_refund() {
        let fields = extract(
            Channel::Sms,
            "Your refund for Order #ORD-123456 has been approved. Amount: $150.00",
            "+1234567890",
        );
        assert_eq!(fields.order_id.as_deref(), Some("ORD-123456"));
        assert_eq!(fields.amount, Some(150.00));
        assert_eq!(fields.currency, Some(Currency::Usd));
        assert_eq!(fields.status, Some(RefundStatus::Approved));
        assert_eq!(fields.phone.as_deref(), Some("+1234567890"));
        assert!(fields.is_meaningful());
    }

    #[test]
    fn rejected_rupee_refund_has_no_reason() {
        let fields = extract(
            Channel::Sms,
            "Refund request ORD-789012 for ₹5000 rejected due to policy violation",
            "+1987654321",
        );
        assert_eq!(fields.order_id.as_deref(), Some("ORD-789012"));
        assert_eq!(fields.amount, Some(5000.0));
        assert_eq!(fields.currency, Some(Currency::Inr));
        assert_eq!(fields.status, Some(RefundStatus::Rejected));
        assert_eq!(fields.reason, None);
    }

    #[test]
    fn amount_without_currency_cue_defaults_to_usd() {
        let fields = extract(Channel::Sms, "refund 200", "+1");
        assert_eq!(fields.amount, Some(200.0));
        assert_eq!(fields.currency, Some(Currency::Usd));
        assert_eq!(fields.order_id, None);
    }

    #[test]
    fn nothing_matches_on_degenerate_input() {
        for text in ["", "   \t\n ", "zzz qqq !!! ???", "#12 $ € £ ₹", "ORD-"] {
            for channel in Channel::ALL {
                let fields = extract(channel, text, "");
                assert_eq!(fields.order_id, None, "order id for {text:?}");
                assert_eq!(fields.amount, None, "amount for {text:?}");
                assert_eq!(fields.currency, None, "currency for {text:?}");
                assert_eq!(fields.status, None);
                assert_eq!(fields.reason, None);
                assert_eq!(fields.email, None);
                assert_eq!(fields.customer_name, None);
                assert!(!fields.is_meaningful());
            }
        }
    }

    #[test]
    fn currency_only_present_with_amount() {
        let fields = extract(Channel::Email, "Refund in INR approved", "a@b.test");
        assert_eq!(fields.amount, None);
        assert_eq!(fields.currency, None);
        assert_eq!(fields.status, Some(RefundStatus::Approved));
        assert!(!fields.is_meaningful());
    }

    #[test]
    fn email_contacts_and_email_only_keywords() {
        let message: RawMessage = crate::models::EmailMessage::new(
            "Return processed - Order number: 55-A",
            "Your refund is completed. 1,250.75 EUR credited.",
            "Shop Returns <returns@shop.test>",
            0,
        )
        .into();

        let fields = extract_message(&message);
        // The keyword rule claims "Order number" before the email-only rule.
        assert_eq!(fields.order_id.as_deref(), Some("NUMBER"));
        assert_eq!(fields.amount, Some(1250.75));
        assert_eq!(fields.currency, Some(Currency::Eur));
        assert_eq!(fields.status, Some(RefundStatus::Paid));
        assert_eq!(fields.reason.as_deref(), Some("Return"));
        assert_eq!(fields.customer_name.as_deref(), Some("Shop Returns"));
        assert_eq!(fields.email.as_deref(), Some("returns@shop.test"));
        assert_eq!(fields.phone, None);
    }

    #[test]
    fn sms_ignores_email_only_keywords() {
        let fields = extract(
            Channel::Sms,
            "Your return for order #ORD-1 is completed, refund under review",
            "+1",
        );
        assert_eq!(fields.status, None);
        assert_eq!(fields.reason, None);
        assert_eq!(fields.order_id.as_deref(), Some("ORD-1"));
    }

    #[test]
    fn order_id_case_is_normalized() {
        let fields = extract(Channel::Sms, "order ab12-cd", "+1");
        assert_eq!(fields.order_id.as_deref(), Some("AB12-CD"));
    }
}
