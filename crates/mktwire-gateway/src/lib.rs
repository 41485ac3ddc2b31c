//! Subscription event-dispatch gateway.
//!
//! Wires the pipeline together: configuration, the session lifecycle
//! state machine, and the dispatch loop from transport events to
//! persisted documents.

pub mod config;
pub mod error;
pub mod gateway;
pub mod replay;
pub mod state;

pub use config::GatewayConfig;
pub use error::{GatewayError, GatewayResult};
pub use gateway::FeedGateway;
pub use state::SessionState;
