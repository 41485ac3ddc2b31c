//! Session connection options.

/// Options handed to the transport at connect time.
#[derive(Debug, Clone)]
pub struct SessionOptions {
    /// Vendor endpoint host.
    pub host: String,
    /// Vendor endpoint port.
    pub port: u16,
    /// Bound on the transport's internal delivery queue. Also the
    /// capacity of the event channel handed back by `connect`.
    pub max_event_queue_size: usize,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 8194,
            max_event_queue_size: 10_000,
        }
    }
}
