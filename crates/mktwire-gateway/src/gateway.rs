//! Gateway orchestration.
//!
//! Drives the transport through its lifecycle and dispatches every
//! received event: DATA batches are normalized and persisted, STATUS
//! batches update subscription health, everything else is advisory.
//! Only session-level termination or an external shutdown ends the
//! dispatch loop; per-message failures are logged and skipped.

use crate::config::GatewayConfig;
use crate::error::{GatewayError, GatewayResult};
use crate::state::SessionState;
use mktwire_core::{CaptureClock, FieldValue, NormalizedRecord, Subscription};
use mktwire_feed::{classify, preview, EventKind, PayloadNormalizer, DEFAULT_PREVIEW_CHARS};
use mktwire_persistence::DocumentSink;
use mktwire_registry::SubscriptionRegistry;
use mktwire_session::{RawEvent, RawMessage, StatusKind, TransportSession};
use mktwire_telemetry::{ActivityReporter, Metrics};
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

/// Feed gateway: registry, normalizer, sink, and the dispatch loop
/// around one transport session.
#[derive(Debug)]
pub struct FeedGateway<T> {
    config: GatewayConfig,
    transport: T,
    registry: SubscriptionRegistry,
    normalizer: PayloadNormalizer,
    sink: DocumentSink,
    clock: CaptureClock,
    reporter: ActivityReporter,
    state: SessionState,
    shutdown: CancellationToken,
}

impl<T: TransportSession> FeedGateway<T> {
    /// Create a gateway and register every configured subscription.
    ///
    /// Duplicate correlation tokens and an unwritable storage root are
    /// startup failures.
    pub fn new(config: GatewayConfig, transport: T) -> GatewayResult<Self> {
        let mut registry = SubscriptionRegistry::new();
        for sub in &config.subscriptions {
            registry.register(sub.clone())?;
        }
        let sink = DocumentSink::new(config.storage.root.clone())?;

        Ok(Self {
            config,
            transport,
            registry,
            normalizer: PayloadNormalizer::new(),
            sink,
            clock: CaptureClock::new(),
            reporter: ActivityReporter::new(),
            state: SessionState::Init,
            shutdown: CancellationToken::new(),
        })
    }

    /// Current lifecycle state.
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Handle for requesting shutdown from another task.
    pub fn shutdown_handle(&self) -> CancellationToken {
        self.shutdown.clone()
    }

    /// Run the session to completion.
    ///
    /// Connects, opens every service the subscriptions require,
    /// subscribes, then drains the event channel until the vendor
    /// terminates the session, the channel closes, or shutdown is
    /// requested. Startup failures leave the gateway in `Failed` and
    /// return the error.
    pub async fn run(&mut self) -> GatewayResult<()> {
        self.transition(SessionState::Connecting);
        let mut events = match self.transport.connect().await {
            Ok(rx) => rx,
            Err(e) => {
                error!(error = %e, "Session connect failed");
                self.transition(SessionState::Failed);
                return Err(e.into());
            }
        };
        Metrics::connected();

        for service in self.registry.required_services() {
            if let Err(e) = self.transport.open_service(&service).await {
                error!(service = %service, error = %e, "Service open failed");
                self.transport.stop().await;
                Metrics::disconnected();
                self.transition(SessionState::Failed);
                return Err(e.into());
            }
            info!(service = %service, "Service opened");
        }
        self.transition(SessionState::ServicesOpen);

        let subscriptions: Vec<Subscription> = self.registry.all().cloned().collect();
        if let Err(e) = self.transport.subscribe(&subscriptions).await {
            error!(error = %e, "Subscribe failed");
            self.transport.stop().await;
            Metrics::disconnected();
            self.transition(SessionState::Failed);
            return Err(e.into());
        }
        self.transition(SessionState::Subscribed);

        info!(
            subscriptions = self.registry.len(),
            storage = %self.sink.root().display(),
            "Entering dispatch loop"
        );
        self.transition(SessionState::Running);

        let stats_period = Duration::from_secs(self.config.stats.interval_secs.max(1));
        let mut stats_interval = tokio::time::interval(stats_period);
        let shutdown = self.shutdown.clone();

        loop {
            tokio::select! {
                maybe_event = events.recv() => {
                    match maybe_event {
                        Some(event) => {
                            self.handle_event(event);
                            if self.state == SessionState::Stopping {
                                break;
                            }
                        }
                        None => {
                            info!("Event channel closed by transport");
                            self.begin_stopping("event channel closed");
                            break;
                        }
                    }
                }
                _ = stats_interval.tick() => {
                    self.reporter.output_summary();
                }
                _ = shutdown.cancelled() => {
                    self.begin_stopping("shutdown requested");
                    break;
                }
                _ = tokio::signal::ctrl_c() => {
                    self.begin_stopping("interrupt signal");
                    break;
                }
            }
        }

        self.reporter.output_summary();
        self.transport.stop().await;
        Metrics::disconnected();
        self.transition(SessionState::Terminated);
        info!("Session terminated");
        Ok(())
    }

    /// Dispatch one transport event to its bucket.
    fn handle_event(&mut self, event: RawEvent) {
        let kind = classify(event.tag);
        Metrics::event_received(kind.label());

        match kind {
            EventKind::Data => {
                for message in &event.messages {
                    // Termination forces a stop no matter which bucket
                    // the vendor delivered it under.
                    if message.is_session_terminated() {
                        warn!("Session terminated by vendor");
                        self.begin_stopping("vendor terminated session");
                        return;
                    }
                    if let Err(e) = self.handle_data_message(message) {
                        warn!(
                            message_type = %message.message_type,
                            token = %message.token,
                            error = %e,
                            "Data message dropped"
                        );
                    }
                }
            }
            EventKind::Status | EventKind::Other => {
                for message in &event.messages {
                    self.handle_status_message(message);
                }
            }
        }
    }

    /// Normalize and persist one data message.
    fn handle_data_message(&mut self, message: &RawMessage) -> GatewayResult<()> {
        let Some(subscription) = self.registry.resolve(&message.token) else {
            warn!(
                token = %message.token,
                message_type = %message.message_type,
                "No subscription for correlation token, dropping message"
            );
            Metrics::unknown_token();
            return Ok(());
        };

        let timestamp = self.clock.next();
        let record = match self.normalizer.normalize(subscription, message, timestamp) {
            Ok(Some(record)) => record,
            Ok(None) => return Ok(()),
            Err(e) => {
                Metrics::normalize_error(subscription.feed_kind.dir_name());
                return Err(GatewayError::Feed(e));
            }
        };
        Metrics::record_normalized(record.feed_kind.dir_name());

        match self.sink.persist(&record) {
            Ok(path) => {
                Metrics::record_persisted(record.feed_kind.dir_name());
                info!(
                    security = %record.security,
                    feed_kind = %record.feed_kind,
                    fields = record.field_count(),
                    path = %path.display(),
                    preview = %record_preview(&record).unwrap_or_default(),
                    "Document persisted"
                );
            }
            Err(e) => {
                Metrics::persistence_error(record.feed_kind.dir_name());
                error!(
                    security = %record.security,
                    feed_kind = %record.feed_kind,
                    error = %e,
                    "Failed to persist document"
                );
            }
        }
        Ok(())
    }

    /// React to one status or admin message.
    fn handle_status_message(&mut self, message: &RawMessage) {
        match message.status_kind() {
            StatusKind::SessionStarted => {
                info!("Session started");
            }
            StatusKind::SessionTerminated => {
                warn!("Session terminated by vendor");
            }
            StatusKind::ServiceOpened => {
                debug!(details = %message.elements, "Service opened notice");
            }
            StatusKind::SubscriptionStarted => {
                info!(token = %message.token, "Subscription started");
            }
            StatusKind::SubscriptionFailure => {
                warn!(
                    token = %message.token,
                    details = %message.elements,
                    "Subscription failure"
                );
                Metrics::subscription_failure(message.token.as_str());
            }
            StatusKind::SubscriptionTerminated => {
                warn!(token = %message.token, "Subscription terminated");
            }
            StatusKind::SlowConsumerWarning => {
                warn!("Slow consumer warning, event queue saturating");
                Metrics::slow_consumer_warning();
            }
            StatusKind::SlowConsumerWarningCleared => {
                info!("Slow consumer warning cleared");
                Metrics::slow_consumer_cleared();
            }
            StatusKind::DataLoss => {
                warn!(
                    token = %message.token,
                    details = %message.elements,
                    "Data loss reported for subscription"
                );
                Metrics::data_loss(message.token.as_str());
            }
            StatusKind::Other => {
                debug!(message_type = %message.message_type, "Unhandled status message");
            }
        }

        if message.is_session_terminated() {
            self.begin_stopping("vendor terminated session");
        }
    }

    /// Enter `Stopping` once; later calls are no-ops.
    fn begin_stopping(&mut self, reason: &str) {
        if self.state == SessionState::Stopping {
            return;
        }
        info!(reason = %reason, "Stopping session");
        self.transition(SessionState::Stopping);
    }

    fn transition(&mut self, next: SessionState) {
        if self.state == next {
            return;
        }
        info!(from = %self.state, to = %next, "State transition");
        self.state = next;
        Metrics::session_state_set(next.as_str());
    }
}

/// Truncated free-text glimpse of a record for the console, if it
/// carries any.
fn record_preview(record: &NormalizedRecord) -> Option<String> {
    for key in ["headline", "story", "text", "payload"] {
        if let Some(text) = record.get(key).and_then(FieldValue::as_str) {
            return Some(preview(text, DEFAULT_PREVIEW_CHARS));
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use mktwire_core::{CaptureStamp, FeedKind};
    use mktwire_session::ScriptedTransport;
    use tempfile::TempDir;

    fn test_config(root: &TempDir) -> GatewayConfig {
        let mut config = GatewayConfig::default();
        config.storage.root = root.path().to_string_lossy().into_owned();
        config.subscriptions = vec![Subscription::new(
            "ibm-equity",
            "IBM US Equity",
            vec!["LAST_PRICE".to_string()],
            FeedKind::Market,
        )];
        config
    }

    #[test]
    fn test_new_registers_subscriptions() {
        let root = TempDir::new().unwrap();
        let gateway =
            FeedGateway::new(test_config(&root), ScriptedTransport::new(vec![])).unwrap();
        assert_eq!(gateway.state(), SessionState::Init);
        assert_eq!(gateway.registry.len(), 1);
    }

    #[test]
    fn test_new_rejects_duplicate_tokens() {
        let root = TempDir::new().unwrap();
        let mut config = test_config(&root);
        let duplicate = config.subscriptions[0].clone();
        config.subscriptions.push(duplicate);
        let err = FeedGateway::new(config, ScriptedTransport::new(vec![])).unwrap_err();
        assert!(matches!(err, GatewayError::Registry(_)));
    }

    #[test]
    fn test_begin_stopping_is_idempotent() {
        let root = TempDir::new().unwrap();
        let mut gateway =
            FeedGateway::new(test_config(&root), ScriptedTransport::new(vec![])).unwrap();
        gateway.begin_stopping("first");
        assert_eq!(gateway.state(), SessionState::Stopping);
        gateway.begin_stopping("second");
        assert_eq!(gateway.state(), SessionState::Stopping);
    }

    #[test]
    fn test_record_preview_picks_free_text() {
        let mut record =
            NormalizedRecord::new("news/eco", FeedKind::News, CaptureStamp::from_micros(0));
        record.insert("headline", "Rates unchanged");
        assert_eq!(record_preview(&record).as_deref(), Some("Rates unchanged"));

        let long = "x".repeat(300);
        let mut story = NormalizedRecord::new("news/eco", FeedKind::News, CaptureStamp::from_micros(0));
        story.insert("story", long.as_str());
        let shown = record_preview(&story).unwrap();
        assert_eq!(shown.chars().count(), DEFAULT_PREVIEW_CHARS + 3);
        assert!(shown.ends_with("..."));
    }

    #[test]
    fn test_record_preview_absent_for_numeric_records() {
        let mut record =
            NormalizedRecord::new("IBM US Equity", FeedKind::Market, CaptureStamp::from_micros(0));
        record.insert("last_price", 188.5);
        assert_eq!(record_preview(&record), None);
    }
}
