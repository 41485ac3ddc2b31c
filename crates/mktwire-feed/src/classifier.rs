//! Event classification.
//!
//! Routes whole transport events into processing buckets based on the
//! event tag alone; message contents are never inspected here.

use mktwire_session::EventTag;
use std::fmt;
use tracing::debug;

/// Processing bucket for a transport event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// Subscription payloads to normalize and persist.
    Data,
    /// Per-subscription lifecycle notices.
    Status,
    /// Session/service/admin traffic and anything unrecognized.
    Other,
}

impl EventKind {
    /// Lowercase label for metrics and log fields.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Data => "data",
            Self::Status => "status",
            Self::Other => "other",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Data => write!(f, "DATA"),
            Self::Status => write!(f, "STATUS"),
            Self::Other => write!(f, "OTHER"),
        }
    }
}

/// Classify a transport event tag.
///
/// Total over all tags: unrecognized values land in OTHER with a debug
/// log, never a panic.
pub fn classify(tag: EventTag) -> EventKind {
    match tag {
        EventTag::SUBSCRIPTION_DATA => EventKind::Data,
        EventTag::SUBSCRIPTION_STATUS => EventKind::Status,
        EventTag::SESSION_STATUS
        | EventTag::SERVICE_STATUS
        | EventTag::ADMIN
        | EventTag::TIMEOUT => EventKind::Other,
        other => {
            debug!(tag = %other, "Unrecognized event tag, classifying as OTHER");
            EventKind::Other
        }
    }
}
