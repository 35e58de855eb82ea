//! Ordered order-id and amount rules.
//!
//! Rules are tried in the order a profile lists them and the first rule that
//! matches anywhere in the text wins, even when a later rule would produce a
//! longer or "better" capture.

use std::sync::LazyLock;

use regex::Regex;

// Digits are spelled `[0-9]` rather than `\d`: `\d` is Unicode-aware in the
// regex crate and would capture numerals `f64::from_str` cannot parse.

static RE_ORDER_KEYWORD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:order|ord)[\s#:]*([a-z0-9][a-z0-9-]*)").expect("order keyword regex")
});

static RE_ORD_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(ord-[0-9]+)").expect("ord- prefix regex"));

static RE_HASH_DIGITS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"#([0-9]{6,})").expect("hash digits regex"));

static RE_ORDER_NUMBER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)order\s+number[:\s]+([a-z0-9-]+)").expect("order number regex")
});

static RE_AMOUNT_AFTER_CUE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:refund|amount|rs\.?|₹|\$|€|£)\s*([0-9][0-9,]*\.?[0-9]*)")
        .expect("amount after cue regex")
});

static RE_AMOUNT_BEFORE_CODE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)([0-9][0-9,]*\.?[0-9]*)\s*(?:usd|inr|eur|gbp|rs)")
        .expect("amount before code regex")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderRule {
    /// `order`/`ord` anywhere, even inside a word, then optional `#`, `:` or
    /// whitespace, then a token starting with a letter or digit.
    Keyword,
    /// A bare `ORD-<digits>` code, captured whole.
    OrdPrefix,
    /// `#` followed by at least six digits.
    HashDigits,
    /// `order number: <token>`.
    OrderNumber,
}

impl OrderRule {
    fn regex(&self) -> &'static Regex {
        match self {
            OrderRule::Keyword => &RE_ORDER_KEYWORD,
            OrderRule::OrdPrefix => &RE_ORD_PREFIX,
            OrderRule::HashDigits => &RE_HASH_DIGITS,
            OrderRule::OrderNumber => &RE_ORDER_NUMBER,
        }
    }

    pub fn capture<'t>(&self, text: &'t str) -> Option<&'t str> {
        self.regex()
            .captures(text)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AmountRule {
    /// Cue word or symbol, then the number (`Amount $150`, `₹5000`, `Rs. 99`).
    AfterCue,
    /// Number, then a currency code (`200 USD`, `5,000 INR`).
    BeforeCode,
}

impl AmountRule {
    pub const ORDERED: [AmountRule; 2] = [AmountRule::AfterCue, AmountRule::BeforeCode];

    fn regex(&self) -> &'static Regex {
        match self {
            AmountRule::AfterCue => &RE_AMOUNT_AFTER_CUE,
            AmountRule::BeforeCode => &RE_AMOUNT_BEFORE_CODE,
        }
    }

    pub fn capture<'t>(&self, text: &'t str) -> Option<&'t str> {
        self.regex()
            .captures(text)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str())
    }
}

/// First order-id match in rule order, upper-cased.
pub fn find_order_id(rules: &[OrderRule], text: &str) -> Option<String> {
    rules
        .iter()
        .find_map(|rule| rule.capture(text))
        .map(str::to_uppercase)
}

/// First amount match in rule order.
pub fn find_amount(text: &str) -> Option<f64> {
    AmountRule::ORDERED
        .iter()
        .find_map(|rule| rule.capture(text))
        .and_then(parse_amount)
}

/// Parse `1,234.50`-style literals. Thousands commas are dropped.
pub fn parse_amount(literal: &str) -> Option<f64> {
    let cleaned = literal.replace(',', "");
    let cleaned = cleaned.trim_end_matches('.');
    cleaned
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite() && *value >= 0.0)
}
