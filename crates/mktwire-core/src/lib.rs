//! Core domain types for the mktwire feed gateway.
//!
//! This crate provides fundamental types used throughout the gateway:
//! - `FeedKind`: Feed category (market, news, social, raw)
//! - `CorrelationToken`, `Subscription`: Routing key and descriptor
//! - `FieldValue`, `NormalizedRecord`: Extracted payloads
//! - `CaptureStamp`, `CaptureClock`: Strictly increasing capture times

pub mod error;
pub mod feed;
pub mod field;
pub mod record;
pub mod stamp;
pub mod subscription;

pub use error::{CoreError, Result};
pub use feed::FeedKind;
pub use field::FieldValue;
pub use record::NormalizedRecord;
pub use stamp::{CaptureClock, CaptureStamp};
pub use subscription::{CorrelationToken, Subscription};
