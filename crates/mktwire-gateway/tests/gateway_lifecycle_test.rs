//! Gateway lifecycle integration tests.
//!
//! Drives the full gateway against the scripted transport:
//! - Startup ordering (connect, open services, subscribe)
//! - Fatal startup failures
//! - Termination paths and stop idempotency

use mktwire_core::{FeedKind, Subscription};
use mktwire_gateway::{FeedGateway, GatewayConfig, GatewayError, SessionState};
use mktwire_session::{RawEvent, RawMessage, ScriptedTransport};
use serde_json::json;
use std::time::Duration;
use tempfile::TempDir;
use tokio::time::timeout;

fn config_with(root: &TempDir, subscriptions: Vec<Subscription>) -> GatewayConfig {
    let mut config = GatewayConfig::default();
    config.storage.root = root.path().to_string_lossy().into_owned();
    config.subscriptions = subscriptions;
    config
}

fn market_sub(token: &str, topic: &str) -> Subscription {
    Subscription::new(
        token,
        topic,
        vec!["LAST_PRICE".to_string()],
        FeedKind::Market,
    )
}

fn terminator() -> RawEvent {
    RawEvent::session_status(vec![RawMessage::new("SessionTerminated", "", json!({}))])
}

/// A clean script walks the gateway through every lifecycle stage and
/// releases the transport at the end.
#[tokio::test]
async fn test_clean_run_walks_full_lifecycle() {
    let root = TempDir::new().unwrap();
    let script = vec![
        RawEvent::session_status(vec![RawMessage::new("SessionStarted", "", json!({}))]),
        RawEvent::status(vec![RawMessage::new("SubscriptionStarted", "aapl", json!({}))]),
        terminator(),
    ];
    let transport = ScriptedTransport::new(script);
    let probe = transport.probe();
    let config = config_with(&root, vec![market_sub("aapl", "AAPL US Equity")]);
    let mut gateway = FeedGateway::new(config, transport).unwrap();

    timeout(Duration::from_secs(5), gateway.run())
        .await
        .unwrap()
        .unwrap();

    assert_eq!(gateway.state(), SessionState::Terminated);
    assert!(probe.connected());
    assert!(probe.stopped());
    assert_eq!(probe.opened_services(), vec!["//blp/mktdata"]);
    let tokens = probe.subscribed_tokens();
    assert_eq!(tokens.len(), 1);
    assert_eq!(tokens[0].as_str(), "aapl");
}

/// Connect refusal fails the run before any service is opened.
#[tokio::test]
async fn test_connect_failure_fails_the_run() {
    let root = TempDir::new().unwrap();
    let transport = ScriptedTransport::new(vec![]).refuse_connect();
    let probe = transport.probe();
    let config = config_with(&root, vec![market_sub("aapl", "AAPL US Equity")]);
    let mut gateway = FeedGateway::new(config, transport).unwrap();

    let err = timeout(Duration::from_secs(5), gateway.run())
        .await
        .unwrap()
        .unwrap_err();

    assert!(matches!(err, GatewayError::Session(_)));
    assert_eq!(gateway.state(), SessionState::Failed);
    assert!(!probe.connected());
    assert!(probe.opened_services().is_empty());
}

/// A required service that cannot open is fatal, and the connected
/// transport is still released.
#[tokio::test]
async fn test_service_failure_fails_and_releases_transport() {
    let root = TempDir::new().unwrap();
    let transport = ScriptedTransport::new(vec![]).fail_service("//blp/mktdata");
    let probe = transport.probe();
    let config = config_with(&root, vec![market_sub("aapl", "AAPL US Equity")]);
    let mut gateway = FeedGateway::new(config, transport).unwrap();

    let err = timeout(Duration::from_secs(5), gateway.run())
        .await
        .unwrap()
        .unwrap_err();

    assert!(matches!(err, GatewayError::Session(_)));
    assert_eq!(gateway.state(), SessionState::Failed);
    assert!(probe.stopped());
}

/// A rejected subscription batch is fatal, and the connected transport
/// is still released.
#[tokio::test]
async fn test_subscribe_failure_fails_and_releases_transport() {
    let root = TempDir::new().unwrap();
    let transport = ScriptedTransport::new(vec![]).refuse_subscribe();
    let probe = transport.probe();
    let config = config_with(&root, vec![market_sub("aapl", "AAPL US Equity")]);
    let mut gateway = FeedGateway::new(config, transport).unwrap();

    let err = timeout(Duration::from_secs(5), gateway.run())
        .await
        .unwrap()
        .unwrap_err();

    assert!(matches!(err, GatewayError::Session(_)));
    assert_eq!(gateway.state(), SessionState::Failed);
    assert_eq!(probe.opened_services(), vec!["//blp/mktdata"]);
    assert!(probe.stopped());
}

/// When the transport closes the channel without a termination message
/// the gateway still shuts down cleanly.
#[tokio::test]
async fn test_script_exhaustion_terminates_cleanly() {
    let root = TempDir::new().unwrap();
    let script = vec![RawEvent::data(vec![RawMessage::new(
        "MarketDataEvents",
        "aapl",
        json!({"LAST_PRICE": 189.5}),
    )])];
    let transport = ScriptedTransport::new(script);
    let probe = transport.probe();
    let config = config_with(&root, vec![market_sub("aapl", "AAPL US Equity")]);
    let mut gateway = FeedGateway::new(config, transport).unwrap();

    timeout(Duration::from_secs(5), gateway.run())
        .await
        .unwrap()
        .unwrap();

    assert_eq!(gateway.state(), SessionState::Terminated);
    assert!(probe.stopped());
}

/// Repeated termination messages stop the session exactly once, and
/// nothing after the stop is processed.
#[tokio::test]
async fn test_vendor_termination_is_idempotent() {
    let root = TempDir::new().unwrap();
    let script = vec![
        RawEvent::session_status(vec![
            RawMessage::new("SessionTerminated", "", json!({})),
            RawMessage::new("SessionTerminated", "", json!({})),
        ]),
        RawEvent::data(vec![RawMessage::new(
            "MarketDataEvents",
            "aapl",
            json!({"LAST_PRICE": 189.5}),
        )]),
    ];
    let transport = ScriptedTransport::new(script);
    let config = config_with(&root, vec![market_sub("aapl", "AAPL US Equity")]);
    let mut gateway = FeedGateway::new(config, transport).unwrap();

    timeout(Duration::from_secs(5), gateway.run())
        .await
        .unwrap()
        .unwrap();

    assert_eq!(gateway.state(), SessionState::Terminated);
    let market_dir = root.path().join("market");
    assert_eq!(std::fs::read_dir(&market_dir).unwrap().count(), 0);
}

/// A termination message smuggled inside a data batch still stops the
/// session, and nothing after it in the batch is processed.
#[tokio::test]
async fn test_termination_in_data_batch_stops_session() {
    let root = TempDir::new().unwrap();
    let script = vec![RawEvent::data(vec![
        RawMessage::new("SessionTerminated", "", json!({})),
        RawMessage::new("MarketDataEvents", "aapl", json!({"LAST_PRICE": 189.5})),
    ])];
    let transport = ScriptedTransport::new(script);
    let probe = transport.probe();
    let config = config_with(&root, vec![market_sub("aapl", "AAPL US Equity")]);
    let mut gateway = FeedGateway::new(config, transport).unwrap();

    timeout(Duration::from_secs(5), gateway.run())
        .await
        .unwrap()
        .unwrap();

    assert_eq!(gateway.state(), SessionState::Terminated);
    assert!(probe.stopped());
    assert_eq!(std::fs::read_dir(root.path().join("market")).unwrap().count(), 0);
}

/// An external shutdown request stops a session whose channel would
/// otherwise stay open forever.
#[tokio::test]
async fn test_shutdown_handle_stops_held_open_session() {
    let root = TempDir::new().unwrap();
    let transport = ScriptedTransport::new(vec![]).hold_open();
    let probe = transport.probe();
    let config = config_with(&root, vec![market_sub("aapl", "AAPL US Equity")]);
    let mut gateway = FeedGateway::new(config, transport).unwrap();
    let shutdown = gateway.shutdown_handle();

    let handle = tokio::spawn(async move {
        let result = gateway.run().await;
        (gateway, result)
    });

    tokio::time::sleep(Duration::from_millis(100)).await;
    shutdown.cancel();

    let (gateway, result) = timeout(Duration::from_secs(2), handle)
        .await
        .expect("gateway should stop after shutdown")
        .unwrap();
    result.unwrap();
    assert_eq!(gateway.state(), SessionState::Terminated);
    assert!(probe.stopped());
}

/// Each distinct service is opened once, in first-use order, across
/// mixed-feed subscription sets.
#[tokio::test]
async fn test_services_deduplicated_across_subscriptions() {
    let root = TempDir::new().unwrap();
    let subs = vec![
        market_sub("aapl", "AAPL US Equity"),
        Subscription::new("eco-news", "news/eco", vec![], FeedKind::News),
        Subscription::new("vibes", "social/feed", vec![], FeedKind::Social),
    ];
    let transport = ScriptedTransport::new(vec![terminator()]);
    let probe = transport.probe();
    let mut gateway = FeedGateway::new(config_with(&root, subs), transport).unwrap();

    timeout(Duration::from_secs(5), gateway.run())
        .await
        .unwrap()
        .unwrap();

    assert_eq!(
        probe.opened_services(),
        vec!["//blp/mktdata", "//blp/mktnews-content"]
    );
    assert_eq!(probe.subscribed_tokens().len(), 3);
}
