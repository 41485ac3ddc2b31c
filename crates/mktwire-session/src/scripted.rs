//! In-memory transport driven by a prepared event script.
//!
//! Used by integration tests and local dry runs. Events are delivered
//! in script order after `subscribe`; the channel closes when the
//! script is exhausted unless the transport is held open.

use crate::error::{SessionError, SessionResult};
use crate::event::RawEvent;
use crate::options::SessionOptions;
use crate::port::TransportSession;
use async_trait::async_trait;
use mktwire_core::{CorrelationToken, Subscription};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::debug;

/// Shared view of what the transport observed, readable after the
/// transport itself has been handed off.
#[derive(Debug, Clone, Default)]
pub struct TransportProbe {
    inner: Arc<ProbeInner>,
}

#[derive(Debug, Default)]
struct ProbeInner {
    connected: AtomicBool,
    stopped: AtomicBool,
    opened_services: Mutex<Vec<String>>,
    subscribed_tokens: Mutex<Vec<CorrelationToken>>,
}

impl TransportProbe {
    pub fn connected(&self) -> bool {
        self.inner.connected.load(Ordering::SeqCst)
    }

    pub fn stopped(&self) -> bool {
        self.inner.stopped.load(Ordering::SeqCst)
    }

    pub fn opened_services(&self) -> Vec<String> {
        self.inner.opened_services.lock().clone()
    }

    pub fn subscribed_tokens(&self) -> Vec<CorrelationToken> {
        self.inner.subscribed_tokens.lock().clone()
    }
}

/// Scripted in-memory transport session.
#[derive(Debug)]
pub struct ScriptedTransport {
    options: SessionOptions,
    script: Vec<RawEvent>,
    refuse_connect: bool,
    refuse_subscribe: bool,
    failing_services: Vec<String>,
    keep_channel_open: bool,
    events_tx: Option<mpsc::Sender<RawEvent>>,
    held_tx: Option<mpsc::Sender<RawEvent>>,
    probe: TransportProbe,
}

impl ScriptedTransport {
    /// Transport that will deliver `script` in order once subscribed.
    pub fn new(script: Vec<RawEvent>) -> Self {
        Self {
            options: SessionOptions::default(),
            script,
            refuse_connect: false,
            refuse_subscribe: false,
            failing_services: Vec::new(),
            keep_channel_open: false,
            events_tx: None,
            held_tx: None,
            probe: TransportProbe::default(),
        }
    }

    pub fn with_options(mut self, options: SessionOptions) -> Self {
        self.options = options;
        self
    }

    /// Make `connect` fail.
    pub fn refuse_connect(mut self) -> Self {
        self.refuse_connect = true;
        self
    }

    /// Make `open_service` fail for the named service.
    pub fn fail_service(mut self, name: impl Into<String>) -> Self {
        self.failing_services.push(name.into());
        self
    }

    /// Make `subscribe` fail.
    pub fn refuse_subscribe(mut self) -> Self {
        self.refuse_subscribe = true;
        self
    }

    /// Keep the event channel open after the script is exhausted, so the
    /// consumer only exits via shutdown.
    pub fn hold_open(mut self) -> Self {
        self.keep_channel_open = true;
        self
    }

    /// Observation handle for assertions after handing the transport off.
    pub fn probe(&self) -> TransportProbe {
        self.probe.clone()
    }
}

#[async_trait]
impl TransportSession for ScriptedTransport {
    async fn connect(&mut self) -> SessionResult<mpsc::Receiver<RawEvent>> {
        if self.refuse_connect {
            return Err(SessionError::ConnectFailed(format!(
                "{}:{} refused",
                self.options.host, self.options.port
            )));
        }
        let capacity = self.options.max_event_queue_size.max(1);
        let (tx, rx) = mpsc::channel(capacity);
        if self.keep_channel_open {
            self.held_tx = Some(tx.clone());
        }
        self.events_tx = Some(tx);
        self.probe.inner.connected.store(true, Ordering::SeqCst);
        debug!(
            host = %self.options.host,
            port = self.options.port,
            "Scripted transport connected"
        );
        Ok(rx)
    }

    async fn open_service(&mut self, name: &str) -> SessionResult<()> {
        if self.events_tx.is_none() {
            return Err(SessionError::NotConnected(
                "open_service before connect".to_string(),
            ));
        }
        if self.failing_services.iter().any(|s| s == name) {
            return Err(SessionError::ServiceFailed {
                name: name.to_string(),
                reason: "scripted failure".to_string(),
            });
        }
        self.probe
            .inner
            .opened_services
            .lock()
            .push(name.to_string());
        Ok(())
    }

    async fn subscribe(&mut self, subscriptions: &[Subscription]) -> SessionResult<()> {
        if self.refuse_subscribe {
            return Err(SessionError::SubscribeFailed(
                "scripted failure".to_string(),
            ));
        }
        let tx = self.events_tx.take().ok_or_else(|| {
            SessionError::NotConnected("subscribe before connect".to_string())
        })?;
        self.probe
            .inner
            .subscribed_tokens
            .lock()
            .extend(subscriptions.iter().map(|s| s.token.clone()));

        let script = std::mem::take(&mut self.script);
        tokio::spawn(async move {
            for event in script {
                if tx.send(event).await.is_err() {
                    debug!("Scripted event receiver dropped");
                    break;
                }
            }
        });
        Ok(())
    }

    async fn stop(&mut self) {
        self.probe.inner.stopped.store(true, Ordering::SeqCst);
        self.events_tx = None;
        self.held_tx = None;
    }
}
