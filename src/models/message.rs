use serde::{Deserialize, Serialize};

use super::Channel;

/// An SMS as returned by a native message store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SmsMessage {
    pub address: String,
    pub body: String,
    /// Received time, epoch milliseconds.
    pub date: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_sent: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub read: Option<bool>,
}

impl SmsMessage {
    pub fn new(address: impl Into<String>, body: impl Into<String>, date: i64) -> Self {
        Self {
            address: address.into(),
            body: body.into(),
            date,
            date_sent: None,
            read: None,
        }
    }
}

/// An email as returned by a connected account reader.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmailMessage {
    pub subject: String,
    pub body: String,
    pub from: String,
    /// Sent time, epoch milliseconds.
    pub date: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to: Option<String>,
}

impl EmailMessage {
    pub fn new(
        subject: impl Into<String>,
        body: impl Into<String>,
        from: impl Into<String>,
        date: i64,
    ) -> Self {
        Self {
            subject: subject.into(),
            body: body.into(),
            from: from.into(),
            date,
            to: None,
        }
    }
}

/// Transport-neutral message: the only input extraction sees.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawMessage {
    pub channel: Channel,
    /// Phone number for SMS, `Name <addr>` or bare address for email.
    pub sender: String,
    pub text: String,
    /// Epoch milliseconds.
    pub timestamp: i64,
}

impl From<SmsMessage> for RawMessage {
    fn from(sms: SmsMessage) -> Self {
        Self {
            channel: Channel::Sms,
            sender: sms.address,
            text: sms.body,
            timestamp: sms.date,
        }
    }
}

impl From<EmailMessage> for RawMessage {
    fn from(email: EmailMessage) -> Self {
        Self {
            channel: Channel::Email,
            sender: email.from,
            text: format!("{} {}", email.subject, email.body),
            timestamp: email.date,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_subject_and_body_are_joined() {
        let raw: RawMessage =
            EmailMessage::new("Refund Approved", "Amount: $5", "a@b.com", 7).into();
        assert_eq!(raw.channel, Channel::Email);
        assert_eq!(raw.text, "Refund Approved Amount: $5");
        assert_eq!(raw.sender, "a@b.com");
        assert_eq!(raw.timestamp, 7);
    }

    #[test]
    fn sms_export_tolerates_missing_optional_fields() {
        let sms: SmsMessage =
            serde_json::from_str(r#"{"address":"+1555","body":"hi","date":42}"#).unwrap();
        let raw = RawMessage::from(sms);
        assert_eq!(raw.channel, Channel::Sms);
        assert_eq!(raw.sender, "+1555");
        assert_eq!(raw.timestamp, 42);
    }
}
