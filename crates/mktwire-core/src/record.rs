//! Normalized records, the unit of persistence.

use crate::feed::FeedKind;
use crate::field::FieldValue;
use crate::stamp::CaptureStamp;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One normalized message, ready to persist.
///
/// `fields` maps canonical keys to scalars; the BTreeMap keeps key order
/// stable in the serialized document. A record with no fields is never
/// persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedRecord {
    /// Security or story identifier the record belongs to.
    pub security: String,
    /// Gateway-assigned capture time.
    pub timestamp: CaptureStamp,
    /// Which rule set produced this record.
    pub feed_kind: FeedKind,
    /// Canonical key to extracted value.
    pub fields: BTreeMap<String, FieldValue>,
}

impl NormalizedRecord {
    pub fn new(security: impl Into<String>, feed_kind: FeedKind, timestamp: CaptureStamp) -> Self {
        Self {
            security: security.into(),
            timestamp,
            feed_kind,
            fields: BTreeMap::new(),
        }
    }

    /// Insert an extracted field under its canonical key.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<FieldValue>) {
        self.fields.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&FieldValue> {
        self.fields.get(key)
    }

    /// True when no field was extracted; such records are discarded.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn field_count(&self) -> usize {
        self.fields.len()
    }
}
