//! Raw events as delivered by the transport.
//!
//! An event carries a numeric tag identifying its delivery category and a
//! batch of messages. Message payloads are opaque element trees; nothing
//! in them is guaranteed to be present.

use mktwire_core::CorrelationToken;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Numeric category tag attached to every transport event.
///
/// The constants cover the tags the reference vendor emits; anything
/// else still constructs and is classified downstream as OTHER.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EventTag(u32);

impl EventTag {
    pub const ADMIN: EventTag = EventTag(1);
    pub const SESSION_STATUS: EventTag = EventTag(2);
    pub const SUBSCRIPTION_STATUS: EventTag = EventTag(3);
    pub const SUBSCRIPTION_DATA: EventTag = EventTag(8);
    pub const SERVICE_STATUS: EventTag = EventTag(9);
    pub const TIMEOUT: EventTag = EventTag(10);

    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    pub fn raw(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for EventTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::ADMIN => write!(f, "ADMIN"),
            Self::SESSION_STATUS => write!(f, "SESSION_STATUS"),
            Self::SUBSCRIPTION_STATUS => write!(f, "SUBSCRIPTION_STATUS"),
            Self::SUBSCRIPTION_DATA => write!(f, "SUBSCRIPTION_DATA"),
            Self::SERVICE_STATUS => write!(f, "SERVICE_STATUS"),
            Self::TIMEOUT => write!(f, "TIMEOUT"),
            Self(raw) => write!(f, "UNKNOWN({raw})"),
        }
    }
}

/// Lifecycle category of a status or admin message, keyed on the vendor
/// message type name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    SessionStarted,
    SessionTerminated,
    ServiceOpened,
    SubscriptionStarted,
    SubscriptionFailure,
    SubscriptionTerminated,
    SlowConsumerWarning,
    SlowConsumerWarningCleared,
    DataLoss,
    Other,
}

impl StatusKind {
    /// Map a vendor message type name to its lifecycle category.
    pub fn of(message_type: &str) -> Self {
        match message_type {
            "SessionStarted" => Self::SessionStarted,
            "SessionTerminated" => Self::SessionTerminated,
            "ServiceOpened" => Self::ServiceOpened,
            "SubscriptionStarted" => Self::SubscriptionStarted,
            "SubscriptionFailure" => Self::SubscriptionFailure,
            "SubscriptionTerminated" => Self::SubscriptionTerminated,
            "SlowConsumerWarning" => Self::SlowConsumerWarning,
            "SlowConsumerWarningCleared" => Self::SlowConsumerWarningCleared,
            "DataLoss" => Self::DataLoss,
            _ => Self::Other,
        }
    }
}

/// One message inside a transport event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawMessage {
    /// Vendor message type name (e.g. "MarketDataEvents").
    pub message_type: String,
    /// Routing key back to the owning subscription. May be empty for
    /// session-level messages that carry no correlation.
    #[serde(default)]
    pub token: CorrelationToken,
    /// Opaque element tree; every access is presence-checked.
    #[serde(default)]
    pub elements: Value,
}

impl RawMessage {
    pub fn new(
        message_type: impl Into<String>,
        token: impl Into<CorrelationToken>,
        elements: Value,
    ) -> Self {
        Self {
            message_type: message_type.into(),
            token: token.into(),
            elements,
        }
    }

    /// Lifecycle category of this message.
    pub fn status_kind(&self) -> StatusKind {
        StatusKind::of(&self.message_type)
    }

    /// Whether this message ends the session, regardless of which event
    /// category delivered it.
    pub fn is_session_terminated(&self) -> bool {
        self.status_kind() == StatusKind::SessionTerminated
    }
}

/// One batch of messages delivered by the transport.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawEvent {
    pub tag: EventTag,
    pub messages: Vec<RawMessage>,
}

impl RawEvent {
    pub fn new(tag: EventTag, messages: Vec<RawMessage>) -> Self {
        Self { tag, messages }
    }

    /// Data batch.
    pub fn data(messages: Vec<RawMessage>) -> Self {
        Self::new(EventTag::SUBSCRIPTION_DATA, messages)
    }

    /// Subscription status batch.
    pub fn status(messages: Vec<RawMessage>) -> Self {
        Self::new(EventTag::SUBSCRIPTION_STATUS, messages)
    }

    /// Session-level admin batch.
    pub fn session_status(messages: Vec<RawMessage>) -> Self {
        Self::new(EventTag::SESSION_STATUS, messages)
    }
}
