//! Subscription descriptors and correlation tokens.

use crate::error::{CoreError, Result};
use crate::feed::FeedKind;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque identifier chosen at subscribe time.
///
/// The vendor returns it unchanged on every event for that subscription;
/// it is the sole routing key from event to subscription.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CorrelationToken(String);

impl CorrelationToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for CorrelationToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for CorrelationToken {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for CorrelationToken {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// One named subscription: what to listen to and how to interpret it.
///
/// Immutable after registration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subscription {
    /// Routing key, unique across the registry.
    pub token: CorrelationToken,
    /// Vendor topic string, optionally prefixed with `//ns/svc`.
    pub topic: String,
    /// Ordered vendor field names requested for this topic.
    #[serde(default)]
    pub fields: Vec<String>,
    /// Normalization rule set and storage area selector.
    pub feed_kind: FeedKind,
}

impl Subscription {
    pub fn new(
        token: impl Into<CorrelationToken>,
        topic: impl Into<String>,
        fields: Vec<String>,
        feed_kind: FeedKind,
    ) -> Self {
        Self {
            token: token.into(),
            topic: topic.into(),
            fields,
            feed_kind,
        }
    }

    /// Reject descriptors that cannot be routed or subscribed.
    pub fn validate(&self) -> Result<()> {
        if self.token.is_empty() {
            return Err(CoreError::InvalidSubscription(format!(
                "empty correlation token for topic {:?}",
                self.topic
            )));
        }
        if self.topic.is_empty() {
            return Err(CoreError::InvalidSubscription(format!(
                "empty topic for token {}",
                self.token
            )));
        }
        Ok(())
    }

    /// Vendor service this subscription requires.
    ///
    /// Topics of the form `//ns/svc/rest...` carry their own service;
    /// otherwise the feed kind's default applies.
    pub fn service(&self) -> &str {
        if let Some(rest) = self.topic.strip_prefix("//") {
            // `ns/svc` is everything before the second '/' of the remainder.
            let mut slashes = rest.char_indices().filter(|(_, c)| *c == '/');
            if slashes.next().is_some() {
                if let Some((idx, _)) = slashes.next() {
                    return &self.topic[..2 + idx];
                }
                return &self.topic;
            }
        }
        self.feed_kind.service()
    }

    /// Security name used for persisted documents.
    ///
    /// The last path segment of the topic, so `//blp/mktdata/ticker/AAPL US
    /// Equity` and plain `AAPL US Equity` both map to `AAPL US Equity`.
    pub fn security(&self) -> &str {
        match self.topic.rsplit('/').next() {
            Some(last) if !last.is_empty() => last,
            _ => &self.topic,
        }
    }
}
