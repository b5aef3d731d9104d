//! Transfer configuration.

use std::time::Duration;

use kaizen_core::Settings;

/// Default read size of a transfer worker.
pub const DEFAULT_CHUNK_SIZE: usize = 32 * 1024;

/// Default capacity of the status bus.
pub const DEFAULT_BUS_CAPACITY: usize = 100;

/// Tuning knobs for transfer workers and the status bus.
///
/// There is no overall request timeout. A stalled read ends only when the
/// session is cancelled or superseded.
///
/// # Example
///
/// ```
/// use kaizen_download::TransferConfig;
/// use std::time::Duration;
///
/// let config = TransferConfig::new()
///     .with_chunk_size(64 * 1024)
///     .with_progress_interval(Duration::from_millis(250));
/// assert_eq!(config.chunk_size(), 64 * 1024);
/// ```
#[derive(Debug, Clone)]
pub struct TransferConfig {
    chunk_size: usize,
    progress_interval: Duration,
    bus_capacity: usize,
    connect_timeout: Duration,
    user_agent: String,
}

impl Default for TransferConfig {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            progress_interval: Duration::from_millis(100),
            bus_capacity: DEFAULT_BUS_CAPACITY,
            connect_timeout: Duration::from_secs(15),
            user_agent: concat!("kaizen/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl TransferConfig {
    /// Create a new configuration with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Derive the configuration from user settings.
    #[must_use]
    pub fn from_settings(settings: &Settings) -> Self {
        Self::new()
            .with_chunk_size(settings.effective_chunk_size())
            .with_progress_interval(Duration::from_millis(
                settings.effective_progress_interval_ms(),
            ))
    }

    /// Set the read size. Zero is bumped to one byte.
    #[must_use]
    pub fn with_chunk_size(mut self, bytes: usize) -> Self {
        self.chunk_size = bytes.max(1);
        self
    }

    /// Set the minimum interval between progress reports.
    #[must_use]
    pub const fn with_progress_interval(mut self, interval: Duration) -> Self {
        self.progress_interval = interval;
        self
    }

    /// Set the status bus capacity. Zero is bumped to one entry.
    #[must_use]
    pub fn with_bus_capacity(mut self, capacity: usize) -> Self {
        self.bus_capacity = capacity.max(1);
        self
    }

    /// Set the TCP connect timeout.
    #[must_use]
    pub const fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Set the user agent string for HTTP requests.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Read size of a worker.
    pub const fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    /// Minimum interval between progress reports.
    pub const fn progress_interval(&self) -> Duration {
        self.progress_interval
    }

    /// Status bus capacity.
    pub const fn bus_capacity(&self) -> usize {
        self.bus_capacity
    }

    /// TCP connect timeout.
    pub const fn connect_timeout(&self) -> Duration {
        self.connect_timeout
    }

    /// User agent sent with every request.
    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }
}
