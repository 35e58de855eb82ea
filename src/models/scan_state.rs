use serde::{Deserialize, Serialize};

use super::Channel;

/// Persisted bookkeeping for the background scanner.
///
/// Watermarks are epoch milliseconds. A channel without one has never been
/// scanned successfully and its next scan reads everything.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanState {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_sms_scan: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_email_scan: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_scan_time: Option<i64>,
}

impl ScanState {
    pub fn watermark(&self, channel: Channel) -> Option<i64> {
        match channel {
            Channel::Sms => self.last_sms_scan,
            Channel::Email => self.last_email_scan,
        }
    }

    pub fn advance(&mut self, channel: Channel, at: i64) {
        match channel {
            Channel::Sms => self.last_sms_scan = Some(at),
            Channel::Email => self.last_email_scan = Some(at),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn watermarks_are_per_channel() {
        let mut state = ScanState::default();
        assert_eq!(state.watermark(Channel::Sms), None);

        state.advance(Channel::Email, 42);
        assert_eq!(state.watermark(Channel::Email), Some(42));
        assert_eq!(state.watermark(Channel::Sms), None);
    }

    #[test]
    fn empty_state_serializes_to_empty_object() {
        assert_eq!(serde_json::to_string(&ScanState::default()).unwrap(), "{}");
        let state: ScanState = serde_json::from_str(r#"{"last_sms_scan":7}"#).unwrap();
        assert_eq!(state.last_sms_scan, Some(7));
    }
}
