use crate::models::Currency;

/// Currency assumed when the text carries no recognizable cue.
pub const FALLBACK_CURRENCY: Currency = Currency::Usd;

const CUES: [(Currency, char, &[&str]); 4] = [
    (Currency::Inr, '₹', &["inr", "rs"]),
    (Currency::Usd, '$', &["usd"]),
    (Currency::Eur, '€', &["eur"]),
    (Currency::Gbp, '£', &["gbp"]),
];

/// Infer the currency of an amount from cues anywhere in the message.
///
/// The whole text is inspected, not just the matched amount, and the first
/// currency in priority order with any cue present wins. Keyword cues are
/// plain substrings, so `rs` inside an ordinary word also reads as rupees.
pub fn resolve_currency(text: &str) -> Currency {
    let lowered = text.to_lowercase();
    CUES.iter()
        .find(|(_, symbol, keywords)| {
            text.contains(*symbol) || keywords.iter().any(|kw| lowered.contains(kw))
        })
        .map(|(currency, _, _)| *currency)
        .unwrap_or(FALLBACK_CURRENCY)
}
