//! mktwire feed gateway - entry point.
//!
//! Loads configuration, builds the transport, and runs the dispatch
//! loop until the session ends. Deployment builds wire the vendor
//! library behind `TransportSession`; this build drives the pipeline
//! from a replay script.

use anyhow::Result;
use clap::Parser;
use mktwire_session::ScriptedTransport;
use tracing::info;

/// Subscription event-dispatch gateway for vendor market data feeds.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Configuration file path (can also be set via MKTWIRE_CONFIG env var)
    #[arg(short, long)]
    config: Option<String>,

    /// Replay script path (can also be set via MKTWIRE_REPLAY env var)
    #[arg(short, long)]
    replay: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    mktwire_telemetry::init_logging()?;

    info!("Starting mktwire gateway v{}", env!("CARGO_PKG_VERSION"));

    // Determine config path: CLI arg > MKTWIRE_CONFIG env var > default
    let config_path = args
        .config
        .or_else(|| std::env::var("MKTWIRE_CONFIG").ok())
        .unwrap_or_else(|| "config/default.toml".to_string());

    info!(config_path = %config_path, "Loading configuration");

    let config = mktwire_gateway::GatewayConfig::from_file(&config_path)?;
    info!(
        host = %config.connection.host,
        port = config.connection.port,
        subscriptions = config.subscriptions.len(),
        storage = %config.storage.root,
        "Configuration loaded"
    );

    let replay_path = args
        .replay
        .or_else(|| std::env::var("MKTWIRE_REPLAY").ok())
        .ok_or_else(|| {
            anyhow::anyhow!("No vendor transport in this build; provide --replay <script.json>")
        })?;

    let script = mktwire_gateway::replay::load_script(&replay_path)?;
    let transport = ScriptedTransport::new(script).with_options(config.session_options());

    let mut gateway = mktwire_gateway::FeedGateway::new(config, transport)?;
    gateway.run().await?;

    Ok(())
}
