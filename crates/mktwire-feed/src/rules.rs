//! Per-feed-kind field catalogs.
//!
//! Vendor field names and the canonical keys they normalize to. The
//! normalizer machinery is generic; this module is the reference
//! vendor's rule data.

use mktwire_core::FeedKind;

/// Market fields carrying integral quantities.
pub const MARKET_INT_FIELDS: &[&str] = &["VOLUME", "PX_VOLUME", "BID_SIZE", "ASK_SIZE"];

/// Market fields carrying prices.
pub const MARKET_FLOAT_FIELDS: &[&str] = &[
    "LAST_PRICE",
    "BID",
    "ASK",
    "HIGH",
    "LOW",
    "OPEN",
    "TRADE_UPDATE",
    "LAST_TRADE",
];

/// Flat news text fields: (vendor name, canonical key).
pub const NEWS_TEXT_FIELDS: &[(&str, &str)] =
    &[("HEADLINE", "headline"), ("STORY_TEXT", "story"), ("TIME", "time")];

/// Social numeric fields: (vendor name, canonical key).
pub const SOCIAL_FLOAT_FIELDS: &[(&str, &str)] = &[
    ("PRICE", "price"),
    ("SENTIMENT_SCORE", "sentiment_score"),
    ("VELOCITY", "velocity"),
];

/// Social text fields: (vendor name, canonical key).
pub const SOCIAL_TEXT_FIELDS: &[(&str, &str)] = &[("TEXT", "text")];

/// Default vendor field list to request when a subscription does not
/// name its own.
pub fn default_fields(kind: FeedKind) -> Vec<String> {
    match kind {
        FeedKind::Market => MARKET_FLOAT_FIELDS
            .iter()
            .chain(MARKET_INT_FIELDS)
            .map(|s| s.to_string())
            .collect(),
        FeedKind::News => NEWS_TEXT_FIELDS.iter().map(|(v, _)| v.to_string()).collect(),
        FeedKind::Social => SOCIAL_FLOAT_FIELDS
            .iter()
            .chain(SOCIAL_TEXT_FIELDS)
            .map(|(v, _)| v.to_string())
            .collect(),
        FeedKind::Raw => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_fields_market() {
        let fields = default_fields(FeedKind::Market);
        assert!(fields.contains(&"LAST_PRICE".to_string()));
        assert!(fields.contains(&"VOLUME".to_string()));
        assert_eq!(
            fields.len(),
            MARKET_FLOAT_FIELDS.len() + MARKET_INT_FIELDS.len()
        );
    }

    #[test]
    fn test_default_fields_news() {
        assert_eq!(default_fields(FeedKind::News), vec!["HEADLINE", "STORY_TEXT", "TIME"]);
    }

    #[test]
    fn test_default_fields_raw_empty() {
        assert!(default_fields(FeedKind::Raw).is_empty());
    }

    #[test]
    fn test_int_and_float_sets_disjoint() {
        for name in MARKET_INT_FIELDS {
            assert!(!MARKET_FLOAT_FIELDS.contains(name), "{name} in both sets");
        }
    }
}
