//! Gateway lifecycle states.

use std::fmt;

/// Lifecycle of one gateway run.
///
/// Forward-only: `Terminated` and `Failed` are terminal. `Stopping` is
/// entered at most once, from whichever signal arrives first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Constructed, nothing connected yet.
    Init,
    /// Transport connect in flight.
    Connecting,
    /// All required services opened.
    ServicesOpen,
    /// Subscription batch handed to the transport.
    Subscribed,
    /// Dispatch loop draining the event channel.
    Running,
    /// Teardown begun; no further records are produced.
    Stopping,
    /// Clean shutdown completed.
    Terminated,
    /// Startup failed; the run is abandoned.
    Failed,
}

impl SessionState {
    /// Snake-case label for metrics and log fields.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Init => "init",
            Self::Connecting => "connecting",
            Self::ServicesOpen => "services_open",
            Self::Subscribed => "subscribed",
            Self::Running => "running",
            Self::Stopping => "stopping",
            Self::Terminated => "terminated",
            Self::Failed => "failed",
        }
    }

    /// Whether the run has ended, cleanly or not.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Terminated | Self::Failed)
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
