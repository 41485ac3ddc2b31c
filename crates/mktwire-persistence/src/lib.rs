//! Document persistence for normalized feed records.
//!
//! Writes each normalized record as a standalone JSON document under a
//! per-feed-kind directory, with collision-safe file naming.

pub mod error;
pub mod sink;

pub use error::{PersistenceError, PersistenceResult};
pub use sink::DocumentSink;
