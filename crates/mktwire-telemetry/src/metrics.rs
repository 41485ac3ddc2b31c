//! Prometheus metrics for the feed gateway.
//!
//! Covers:
//! - Session lifecycle state
//! - Event and record throughput per feed kind
//! - Normalization and persistence failures
//! - Flow control advisories (slow consumer, data loss)
//!
//! # Panics
//!
//! Metric registration uses `unwrap()` intentionally. If registration fails,
//! it indicates a fatal configuration error (e.g., duplicate metric names)
//! that should cause an immediate crash at startup rather than silent failure.
//! These panics only occur during static initialization, never at runtime.

use once_cell::sync::Lazy;
use prometheus::{
    register_counter, register_counter_vec, register_gauge, register_gauge_vec, Counter,
    CounterVec, Gauge, GaugeVec, TextEncoder,
};

use crate::error::{TelemetryError, TelemetryResult};

/// Vendor session connection state (1 = connected, 0 = disconnected).
pub static SESSION_CONNECTED: Lazy<Gauge> = Lazy::new(|| {
    register_gauge!(
        "mktwire_session_connected",
        "Vendor session connection state (1=connected)"
    )
    .unwrap()
});

/// Gateway lifecycle current state.
/// Labels: state (init/connecting/services_open/subscribed/running/stopping/terminated/failed)
pub static SESSION_STATE: Lazy<GaugeVec> = Lazy::new(|| {
    register_gauge_vec!(
        "mktwire_session_state",
        "Gateway lifecycle current state (1=active, 0=inactive)",
        &["state"]
    )
    .unwrap()
});

/// Total events received from the vendor session.
/// Labels: kind (data/status/other)
pub static EVENTS_TOTAL: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!(
        "mktwire_events_total",
        "Total events received from the vendor session",
        &["kind"]
    )
    .unwrap()
});

/// Total records successfully normalized.
pub static RECORDS_NORMALIZED_TOTAL: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!(
        "mktwire_records_normalized_total",
        "Total records successfully normalized",
        &["feed_kind"]
    )
    .unwrap()
});

/// Total records persisted as documents.
pub static RECORDS_PERSISTED_TOTAL: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!(
        "mktwire_records_persisted_total",
        "Total records persisted as documents",
        &["feed_kind"]
    )
    .unwrap()
});

/// Total messages that failed normalization.
pub static NORMALIZE_ERRORS_TOTAL: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!(
        "mktwire_normalize_errors_total",
        "Total messages that failed normalization",
        &["feed_kind"]
    )
    .unwrap()
});

/// Total records that failed to persist.
pub static PERSISTENCE_ERRORS_TOTAL: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!(
        "mktwire_persistence_errors_total",
        "Total records that failed to persist",
        &["feed_kind"]
    )
    .unwrap()
});

/// Total data messages dropped because no subscription matched their token.
pub static UNKNOWN_TOKEN_TOTAL: Lazy<Counter> = Lazy::new(|| {
    register_counter!(
        "mktwire_unknown_token_total",
        "Total data messages dropped because no subscription matched their token"
    )
    .unwrap()
});

// =============================================================================
// Flow control and subscription health
// =============================================================================

/// Total subscription failures reported by the vendor.
pub static SUBSCRIPTION_FAILURES_TOTAL: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!(
        "mktwire_subscription_failures_total",
        "Total subscription failures reported by the vendor",
        &["token"]
    )
    .unwrap()
});

/// Total data-loss advisories per subscription.
pub static DATA_LOSS_TOTAL: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!(
        "mktwire_data_loss_total",
        "Total data-loss advisories per subscription",
        &["token"]
    )
    .unwrap()
});

/// Total slow-consumer advisories.
/// Labels: state (warning/cleared)
pub static SLOW_CONSUMER_TOTAL: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!(
        "mktwire_slow_consumer_total",
        "Total slow-consumer advisories",
        &["state"]
    )
    .unwrap()
});

/// Metrics facade for easy access.
pub struct Metrics;

impl Metrics {
    /// Record vendor session connected.
    pub fn connected() {
        SESSION_CONNECTED.set(1.0);
    }

    /// Record vendor session disconnected.
    pub fn disconnected() {
        SESSION_CONNECTED.set(0.0);
    }

    /// Set gateway lifecycle state.
    /// Only the active state should be set to 1, all others to 0.
    pub fn session_state_set(state: &str) {
        for s in &[
            "init",
            "connecting",
            "services_open",
            "subscribed",
            "running",
            "stopping",
            "terminated",
            "failed",
        ] {
            SESSION_STATE.with_label_values(&[s]).set(0.0);
        }
        SESSION_STATE.with_label_values(&[state]).set(1.0);
    }

    /// Record an event received from the session.
    pub fn event_received(kind: &str) {
        EVENTS_TOTAL.with_label_values(&[kind]).inc();
    }

    /// Record a successfully normalized record.
    pub fn record_normalized(feed_kind: &str) {
        RECORDS_NORMALIZED_TOTAL
            .with_label_values(&[feed_kind])
            .inc();
    }

    /// Record a persisted document.
    pub fn record_persisted(feed_kind: &str) {
        RECORDS_PERSISTED_TOTAL
            .with_label_values(&[feed_kind])
            .inc();
    }

    /// Record a normalization failure.
    pub fn normalize_error(feed_kind: &str) {
        NORMALIZE_ERRORS_TOTAL
            .with_label_values(&[feed_kind])
            .inc();
    }

    /// Record a persistence failure.
    pub fn persistence_error(feed_kind: &str) {
        PERSISTENCE_ERRORS_TOTAL
            .with_label_values(&[feed_kind])
            .inc();
    }

    /// Record a data message dropped for lack of a matching subscription.
    pub fn unknown_token() {
        UNKNOWN_TOKEN_TOTAL.inc();
    }

    /// Record a subscription failure.
    pub fn subscription_failure(token: &str) {
        SUBSCRIPTION_FAILURES_TOTAL
            .with_label_values(&[token])
            .inc();
    }

    /// Record a data-loss advisory.
    pub fn data_loss(token: &str) {
        DATA_LOSS_TOTAL.with_label_values(&[token]).inc();
    }

    /// Record a slow-consumer warning.
    pub fn slow_consumer_warning() {
        SLOW_CONSUMER_TOTAL.with_label_values(&["warning"]).inc();
    }

    /// Record a slow-consumer warning clearing.
    pub fn slow_consumer_cleared() {
        SLOW_CONSUMER_TOTAL.with_label_values(&["cleared"]).inc();
    }
}

/// Render all registered metrics in Prometheus text exposition format.
pub fn render_metrics() -> TelemetryResult<String> {
    let encoder = TextEncoder::new();
    let families = prometheus::gather();
    encoder
        .encode_to_string(&families)
        .map_err(|e| TelemetryError::Metrics(e.to_string()))
}
