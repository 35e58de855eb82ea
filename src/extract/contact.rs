use std::sync::LazyLock;

use regex::Regex;

static RE_DISPLAY_ADDRESS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"^\s*"?([^"<]*)"?\s*<([^<>]+)>"#).expect("display address regex")
});

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EmailContact {
    pub customer_name: Option<String>,
    pub email: Option<String>,
}

/// Split an email `From` value into display name and address.
pub fn parse_email_sender(sender: &str) -> EmailContact {
    if let Some(caps) = RE_DISPLAY_ADDRESS.captures(sender) {
        let customer_name = caps
            .get(1)
            .map(|m| m.as_str().trim())
            .filter(|name| !name.is_empty())
            .map(str::to_string);
        let email = caps
            .get(2)
            .map(|m| m.as_str().trim())
            .filter(|addr| !addr.is_empty())
            .map(str::to_string);
        return EmailContact {
            customer_name,
            email,
        };
    }

    if sender.contains('@') {
        return EmailContact {
            customer_name: None,
            email: Some(sender.to_string()),
        };
    }

    EmailContact::default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_name_and_address() {
        let contact = parse_email_sender("Acme Support <help@acme.test>");
        assert_eq!(contact.customer_name.as_deref(), Some("Acme Support"));
        assert_eq!(contact.email.as_deref(), Some("help@acme.test"));
    }

    #[test]
    fn quoted_display_name() {
        let contact = parse_email_sender("\"Shop, Inc.\" <orders@shop.test>");
        assert_eq!(contact.customer_name.as_deref(), Some("Shop, Inc."));
        assert_eq!(contact.email.as_deref(), Some("orders@shop.test"));
    }

    #[test]
    fn trailing_text_after_address_is_ignored() {
        let contact = parse_email_sender("Shop <a@b.test> (via list)");
        assert_eq!(contact.customer_name.as_deref(), Some("Shop"));
        assert_eq!(contact.email.as_deref(), Some("a@b.test"));
    }

    #[test]
    fn bare_address_is_kept_verbatim() {
        let contact = parse_email_sender("support@example.com");
        assert_eq!(contact.customer_name, None);
        assert_eq!(contact.email.as_deref(), Some("support@example.com"));
    }

    #[test]
    fn angle_address_without_name() {
        let contact = parse_email_sender("<noreply@store.test>");
        assert_eq!(contact.customer_name, None);
        assert_eq!(contact.email.as_deref(), Some("noreply@store.test"));
    }

    #[test]
    fn unrecognized_sender() {
        assert_eq!(parse_email_sender("Store Alerts"), EmailContact::default());
        assert_eq!(parse_email_sender(""), EmailContact::default());
    }
}
