//! Transport Session Port - Vendor Connection Interface
//!
//! Defines the trait for the vendor session object. Implementors wrap
//! the real vendor library; tests use the in-memory scripted transport.

use crate::error::SessionResult;
use crate::event::RawEvent;
use async_trait::async_trait;
use mktwire_core::Subscription;
use tokio::sync::mpsc;

/// Trait for vendor transport sessions.
///
/// The gateway drives the session through its lifecycle: connect, open
/// the services its subscriptions require, subscribe, then drain the
/// event channel until it closes or shutdown is requested. The port
/// keeps the dispatch core independent of any vendor library.
#[async_trait]
pub trait TransportSession: Send + Sync + 'static {
    /// Establish the session.
    ///
    /// Returns the bounded channel on which the transport delivers
    /// event batches. The channel closes when the transport dies;
    /// capacity follows the configured max event queue size.
    async fn connect(&mut self) -> SessionResult<mpsc::Receiver<RawEvent>>;

    /// Open one logical service by name (e.g. `//blp/mktdata`).
    ///
    /// Must be called after `connect` and before `subscribe` for every
    /// service the subscriptions require.
    async fn open_service(&mut self, name: &str) -> SessionResult<()>;

    /// Enqueue the whole subscription batch.
    ///
    /// Fire-and-forget: per-subscription results arrive asynchronously
    /// as status events on the event channel.
    async fn subscribe(&mut self, subscriptions: &[Subscription]) -> SessionResult<()>;

    /// Tear the session down.
    ///
    /// Idempotent; called on every exit path once `connect` succeeded.
    async fn stop(&mut self);
}
