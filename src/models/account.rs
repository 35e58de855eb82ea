use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Id;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmailProvider {
    Gmail,
    Yahoo,
    Outlook,
    Icloud,
    Protonmail,
    Aol,
    Zoho,
    Imap,
    Pop3,
}

/// A connected, already-authenticated mailbox.
///
/// Connecting accounts (OAuth, IMAP/POP3 login) happens elsewhere; scans only
/// consume these descriptors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmailAccount {
    pub id: Id,
    pub provider: EmailProvider,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    pub connected_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_sync_at: Option<DateTime<Utc>>,
    pub is_active: bool,
}

impl EmailAccount {
    pub fn new(id: Id, provider: EmailProvider, email: impl Into<String>) -> Self {
        Self {
            id,
            provider,
            email: email.into(),
            display_name: None,
            connected_at: DateTime::<Utc>::default(),
            last_sync_at: None,
            is_active: true,
        }
    }

    pub fn inactive(mut self) -> Self {
        self.is_active = false;
        self
    }
}
