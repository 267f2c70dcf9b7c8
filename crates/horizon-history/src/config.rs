//! Configuration for history monitors.

use crate::monitor::HistoryMonitor;

/// Default monitor name used in log output.
pub const DEFAULT_MONITOR_NAME: &str = "history";

/// Configuration for a [`HistoryMonitor`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryConfig {
    /// Name recorded in log output to tell monitors apart.
    pub name: String,
    /// Maximum number of entries kept; the oldest are evicted first.
    /// `None` keeps everything.
    pub max_entries: Option<usize>,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            name: DEFAULT_MONITOR_NAME.to_string(),
            max_entries: None,
        }
    }
}

impl HistoryConfig {
    /// Create a new configuration with the given monitor name.
    pub fn with_name(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }
}

/// Builder for creating HistoryMonitors with custom configuration.
///
/// # Example
///
/// ```
/// use horizon_history::HistoryMonitor;
///
/// let monitor = HistoryMonitor::builder()
///     .name("main-window")
///     .max_entries(50)
///     .build();
///
/// assert_eq!(monitor.config().max_entries, Some(50));
/// ```
#[derive(Debug, Default)]
pub struct HistoryMonitorBuilder {
    config: HistoryConfig,
}

impl HistoryMonitorBuilder {
    /// Create a new HistoryMonitorBuilder with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the monitor name.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.config.name = name.into();
        self
    }

    /// Limit the number of retained entries.
    pub fn max_entries(mut self, max_entries: usize) -> Self {
        self.config.max_entries = Some(max_entries);
        self
    }

    /// Build the monitor.
    pub fn build(self) -> HistoryMonitor {
        HistoryMonitor::with_config(self.config)
    }
}
