//! Transport session port for the mktwire gateway.
//!
//! Models the vendor session as an opaque component behind a trait:
//! - `TransportSession`: connect / open_service / subscribe / stop
//! - `RawEvent`, `RawMessage`, `EventTag`: the delivered batches
//! - `StatusKind`: lifecycle categories keyed on message type names
//! - `ScriptedTransport`: in-memory implementation for tests and dry runs
//!
//! Events cross from the transport's delivery context into the gateway
//! over a bounded channel returned by `connect`.

pub mod error;
pub mod event;
pub mod options;
pub mod port;
pub mod scripted;

pub use error::{SessionError, SessionResult};
pub use event::{EventTag, RawEvent, RawMessage, StatusKind};
pub use options::SessionOptions;
pub use port::TransportSession;
pub use scripted::{ScriptedTransport, TransportProbe};
