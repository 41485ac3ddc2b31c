//! Payload normalization.
//!
//! Turns raw vendor messages into normalized records, one rule set per
//! feed kind. Every vendor field is optional: presence is checked per
//! field, conversion failures omit that field only, and a message that
//! yields no fields at all is discarded rather than persisted.

use crate::error::{FeedError, FeedResult};
use crate::rules::{
    MARKET_FLOAT_FIELDS, MARKET_INT_FIELDS, NEWS_TEXT_FIELDS, SOCIAL_FLOAT_FIELDS,
    SOCIAL_TEXT_FIELDS,
};
use mktwire_core::{CaptureStamp, FeedKind, NormalizedRecord, Subscription};
use mktwire_session::RawMessage;
use serde_json::{Map, Value};
use tracing::{debug, warn};

/// Normalizes raw messages according to their subscription's feed kind.
#[derive(Debug)]
pub struct PayloadNormalizer;

impl PayloadNormalizer {
    pub fn new() -> Self {
        Self
    }

    /// Normalize one data message.
    ///
    /// Returns `Ok(None)` when nothing could be extracted; such
    /// messages are dropped. Structurally broken payloads (element
    /// tree is not a mapping) are errors for the caller to log.
    pub fn normalize(
        &self,
        subscription: &Subscription,
        message: &RawMessage,
        timestamp: CaptureStamp,
    ) -> FeedResult<Option<NormalizedRecord>> {
        let mut record = NormalizedRecord::new(
            subscription.security(),
            subscription.feed_kind,
            timestamp,
        );

        match subscription.feed_kind {
            FeedKind::Market => {
                let obj = Self::require_elements(message, subscription)?;
                self.extract_market(&mut record, obj);
            }
            FeedKind::News => {
                let obj = Self::require_elements(message, subscription)?;
                self.extract_news(&mut record, obj);
            }
            FeedKind::Social => {
                let obj = Self::require_elements(message, subscription)?;
                self.extract_social(&mut record, obj);
            }
            FeedKind::Raw => {
                record.insert("payload", message.elements.to_string());
            }
        }

        if record.is_empty() {
            debug!(
                security = %record.security,
                message_type = %message.message_type,
                "No canonical fields extracted, discarding message"
            );
            return Ok(None);
        }
        Ok(Some(record))
    }

    fn require_elements<'a>(
        message: &'a RawMessage,
        subscription: &Subscription,
    ) -> FeedResult<&'a Map<String, Value>> {
        message.elements.as_object().ok_or_else(|| {
            FeedError::ParseError(format!(
                "{} payload for token {} is not an element tree",
                subscription.feed_kind, subscription.token
            ))
        })
    }

    /// Market ticks: known numeric names, integers and floats kept
    /// distinct, canonical keys are the lowercased vendor names.
    fn extract_market(&self, record: &mut NormalizedRecord, elements: &Map<String, Value>) {
        for name in MARKET_INT_FIELDS {
            if let Some(value) = elements.get(*name) {
                match Self::extract_int(value) {
                    Some(v) => record.insert(name.to_ascii_lowercase(), v),
                    None => Self::warn_omitted(record, name, value),
                }
            }
        }
        for name in MARKET_FLOAT_FIELDS {
            if let Some(value) = elements.get(*name) {
                match Self::extract_float(value) {
                    Some(v) => record.insert(name.to_ascii_lowercase(), v),
                    None => Self::warn_omitted(record, name, value),
                }
            }
        }
    }

    /// News: flat text fields plus nested analytics, every container in
    /// the chain optional.
    fn extract_news(&self, record: &mut NormalizedRecord, elements: &Map<String, Value>) {
        for (name, key) in NEWS_TEXT_FIELDS {
            if let Some(value) = elements.get(*name) {
                match Self::extract_str(value) {
                    Some(v) => record.insert(*key, v),
                    None => Self::warn_omitted(record, name, value),
                }
            }
        }

        let metadata = elements
            .get("StoryAnalytics")
            .and_then(|v| v.get("Metadata"));
        if record.get("headline").is_none() {
            if let Some(headline) = metadata
                .and_then(|v| v.get("Headline"))
                .and_then(Value::as_str)
            {
                record.insert("headline", headline);
            }
        }
        if let Some(arrival) = metadata
            .and_then(|v| v.get("TimeOfArrival"))
            .and_then(Value::as_str)
        {
            record.insert("time_of_arrival", arrival);
        }

        let score = elements
            .get("StoryAnalytics")
            .and_then(|v| v.get("StructuredScoreList"))
            .and_then(|v| v.get("StructuredScore"));
        if let Some(confidence) = score
            .and_then(|v| v.get("Confidence"))
            .and_then(Self::extract_float)
        {
            record.insert("confidence", confidence);
        }
        if let Some(entity) = score.and_then(|v| v.get("EntityId")).and_then(Value::as_str) {
            record.insert("entity_id", entity);
        }
    }

    /// Social/sentiment: any combination of numeric and text fields.
    fn extract_social(&self, record: &mut NormalizedRecord, elements: &Map<String, Value>) {
        for (name, key) in SOCIAL_FLOAT_FIELDS {
            if let Some(value) = elements.get(*name) {
                match Self::extract_float(value) {
                    Some(v) => record.insert(*key, v),
                    None => Self::warn_omitted(record, name, value),
                }
            }
        }
        for (name, key) in SOCIAL_TEXT_FIELDS {
            if let Some(value) = elements.get(*name) {
                match Self::extract_str(value) {
                    Some(v) => record.insert(*key, v),
                    None => Self::warn_omitted(record, name, value),
                }
            }
        }
    }

    fn warn_omitted(record: &NormalizedRecord, field: &str, value: &Value) {
        warn!(
            security = %record.security,
            field,
            value = %value,
            "Field conversion failed, omitted"
        );
    }

    fn extract_float(value: &Value) -> Option<f64> {
        if let Some(f) = value.as_f64() {
            return Some(f);
        }
        value.as_str().and_then(|s| s.trim().parse().ok())
    }

    /// Integral extraction. Accepts whole-valued floats and numeric
    /// strings; anything with a fractional part fails.
    fn extract_int(value: &Value) -> Option<i64> {
        if let Some(i) = value.as_i64() {
            return Some(i);
        }
        if let Some(f) = value.as_f64() {
            if f.fract() == 0.0 && (i64::MIN as f64..=i64::MAX as f64).contains(&f) {
                return Some(f as i64);
            }
            return None;
        }
        value.as_str().and_then(|s| {
            let s = s.trim();
            s.parse::<i64>().ok().or_else(|| {
                s.parse::<f64>()
                    .ok()
                    .filter(|f| f.fract() == 0.0)
                    .map(|f| f as i64)
            })
        })
    }

    fn extract_str(value: &Value) -> Option<String> {
        value.as_str().map(|s| s.to_string())
    }
}

impl Default for PayloadNormalizer {
    fn default() -> Self {
        Self::new()
    }
}
