//! Gateway configuration.

use crate::error::{GatewayError, GatewayResult};
use mktwire_core::Subscription;
use mktwire_feed::default_fields;
use mktwire_session::SessionOptions;
use serde::{Deserialize, Serialize};

/// Vendor connection settings, passed to the transport at connect time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConnectionSection {
    /// Vendor endpoint host.
    #[serde(default = "default_host")]
    pub host: String,
    /// Vendor endpoint port.
    #[serde(default = "default_port")]
    pub port: u16,
    /// Bound on the transport's event channel. When the consumer falls
    /// behind, the vendor raises slow-consumer advisories instead of
    /// growing without limit.
    #[serde(default = "default_max_event_queue_size")]
    pub max_event_queue_size: usize,
}

fn default_host() -> String {
    "localhost".to_string()
}

fn default_port() -> u16 {
    8194
}

fn default_max_event_queue_size() -> usize {
    10_000
}

impl Default for ConnectionSection {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            max_event_queue_size: default_max_event_queue_size(),
        }
    }
}

impl From<ConnectionSection> for SessionOptions {
    fn from(section: ConnectionSection) -> Self {
        SessionOptions {
            host: section.host,
            port: section.port,
            max_event_queue_size: section.max_event_queue_size,
        }
    }
}

/// Document storage settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageSection {
    /// Root directory for persisted documents. One subdirectory per
    /// feed kind is created underneath.
    #[serde(default = "default_storage_root")]
    pub root: String,
}

fn default_storage_root() -> String {
    "./data/feeds".to_string()
}

impl Default for StorageSection {
    fn default() -> Self {
        Self {
            root: default_storage_root(),
        }
    }
}

/// Periodic activity summary settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatsSection {
    /// Seconds between activity summaries in the log.
    #[serde(default = "default_stats_interval_secs")]
    pub interval_secs: u64,
}

fn default_stats_interval_secs() -> u64 {
    60
}

impl Default for StatsSection {
    fn default() -> Self {
        Self {
            interval_secs: default_stats_interval_secs(),
        }
    }
}

/// Top-level gateway configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GatewayConfig {
    /// Vendor connection settings.
    #[serde(default)]
    pub connection: ConnectionSection,
    /// Document storage settings.
    #[serde(default)]
    pub storage: StorageSection,
    /// Activity summary settings.
    #[serde(default)]
    pub stats: StatsSection,
    /// Subscriptions to establish at startup.
    #[serde(default)]
    pub subscriptions: Vec<Subscription>,
}

impl GatewayConfig {
    /// Load from a specific file.
    ///
    /// Subscriptions that omit their field list get the default field
    /// set for their feed kind.
    pub fn from_file(path: &str) -> GatewayResult<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| GatewayError::Config(format!("Failed to read config: {e}")))?;

        let mut config: Self = toml::from_str(&content)
            .map_err(|e| GatewayError::Config(format!("Failed to parse config: {e}")))?;

        config.fill_default_fields();
        config.validate()?;
        Ok(config)
    }

    /// Apply per-feed-kind default field sets where none were given.
    pub fn fill_default_fields(&mut self) {
        for sub in &mut self.subscriptions {
            if sub.fields.is_empty() {
                sub.fields = default_fields(sub.feed_kind);
            }
        }
    }

    /// Reject configurations the gateway cannot start with.
    pub fn validate(&self) -> GatewayResult<()> {
        if self.subscriptions.is_empty() {
            return Err(GatewayError::Config(
                "No subscriptions configured".to_string(),
            ));
        }
        for sub in &self.subscriptions {
            sub.validate()
                .map_err(|e| GatewayError::Config(e.to_string()))?;
        }
        Ok(())
    }

    /// Transport options derived from the connection section.
    pub fn session_options(&self) -> SessionOptions {
        self.connection.clone().into()
    }
}
