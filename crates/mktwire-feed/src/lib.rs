//! Event classification and payload normalization for mktwire.
//!
//! Two stages between the transport and the sink:
//! - `classify`: event tag to processing bucket (DATA/STATUS/OTHER)
//! - `PayloadNormalizer`: raw message to normalized record, one rule
//!   set per feed kind, every vendor field optional
//!
//! `rules` holds the reference vendor's field catalog; `preview` bounds
//! free text for log output without touching persisted data.

pub mod classifier;
pub mod error;
pub mod normalizer;
pub mod preview;
pub mod rules;

pub use classifier::{classify, EventKind};
pub use error::{FeedError, FeedResult};
pub use normalizer::PayloadNormalizer;
pub use preview::{preview, DEFAULT_PREVIEW_CHARS};
pub use rules::default_fields;
