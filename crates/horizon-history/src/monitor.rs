//! The history monitor component.
//!
//! [`HistoryMonitor`] owns a [`HistoryLog`], its [`HistoryObservers`] and the
//! [`HistoryNavigator`] joining them. It is the surface the rest of the
//! framework talks to:
//!
//! - application code records states with [`add_history`](HistoryMonitor::add_history)
//! - the request dispatcher forwards browser back/forward targets to
//!   [`navigate_to`](HistoryMonitor::navigate_to)
//! - the renderer polls [`drain_pending`](HistoryMonitor::drain_pending) for
//!   entries it still has to push to the client
//!
//! # Example
//!
//! ```
//! use horizon_history::{HistoryEntry, HistoryMonitor};
//!
//! let monitor = HistoryMonitor::new();
//! for hash in ["h1", "h2", "h3"] {
//!     monitor.add_history(HistoryEntry::new(hash)).unwrap();
//! }
//!
//! // The renderer picks up the new entries once
//! assert_eq!(monitor.drain_pending().len(), 3);
//!
//! // The user pressed "back" twice in the browser
//! let outcome = monitor.navigate_to("h1");
//! assert_eq!(outcome.navigation().map(|n| n.steps), Some(2));
//! assert_eq!(monitor.current_index(), Some(0));
//! ```

use std::fmt;
use std::sync::Arc;

use horizon_history_core::{history_debug, history_trace, history_warn};

use crate::config::{HistoryConfig, HistoryMonitorBuilder};
use crate::entry::{HistoryState, SharedHistoryState};
use crate::error::Result;
use crate::log::HistoryLog;
use crate::navigator::{HistoryNavigator, Navigation, NavigationOutcome};
use crate::observers::{HistoryListener, HistoryObservers, ListenerId};

/// A component tracking navigable application states.
pub struct HistoryMonitor {
    config: HistoryConfig,
    log: Arc<HistoryLog>,
    navigator: HistoryNavigator,
}

impl Default for HistoryMonitor {
    fn default() -> Self {
        Self::new()
    }
}

impl HistoryMonitor {
    /// Create a monitor with the default configuration.
    pub fn new() -> Self {
        Self::with_config(HistoryConfig::default())
    }

    /// Create a monitor with the given configuration.
    pub fn with_config(config: HistoryConfig) -> Self {
        let log = Arc::new(HistoryLog::with_max_entries(config.max_entries));
        let observers = Arc::new(HistoryObservers::new());
        let navigator = HistoryNavigator::new(log.clone(), observers);
        history_debug!(name = %config.name, max_entries = ?config.max_entries, "history monitor created");
        Self {
            config,
            log,
            navigator,
        }
    }

    /// Start building a monitor.
    pub fn builder() -> HistoryMonitorBuilder {
        HistoryMonitorBuilder::new()
    }

    /// The monitor configuration.
    pub fn config(&self) -> &HistoryConfig {
        &self.config
    }

    /// The underlying log.
    pub fn log(&self) -> &HistoryLog {
        &self.log
    }

    /// The navigation observers.
    pub fn observers(&self) -> &HistoryObservers {
        self.navigator.observers()
    }

    /// Record a new application state.
    ///
    /// See [`HistoryLog::add`] for cursor and error behavior.
    pub fn add_history(&self, entry: impl Into<SharedHistoryState>) -> Result<()> {
        let entry = entry.into();
        let result = self.log.add(entry.clone());
        if let Err(error) = &result {
            history_warn!(name = %self.config.name, hash = entry.hash(), %error, "history entry rejected");
        }
        result
    }

    /// Forget every recorded state.
    pub fn clear_history(&self) {
        history_debug!(name = %self.config.name, "clearing history");
        self.log.clear();
    }

    /// Forget every state recorded after the one with `hash`.
    ///
    /// Returns the number of entries removed. See [`HistoryLog::clear_in_front_of`].
    pub fn clear_history_in_front_of(&self, hash: &str) -> Result<usize> {
        self.log.clear_in_front_of(hash)
    }

    /// Move to the state with `hash`, replaying every state in between.
    pub fn navigate_to(&self, hash: &str) -> NavigationOutcome {
        self.navigator.navigate_to(hash)
    }

    /// Step one state backward.
    pub fn back(&self) -> Option<Navigation> {
        self.navigator.back()
    }

    /// Step one state forward.
    pub fn forward(&self) -> Option<Navigation> {
        self.navigator.forward()
    }

    /// Whether [`back`](Self::back) would move.
    pub fn can_go_back(&self) -> bool {
        self.navigator.can_go_back()
    }

    /// Whether [`forward`](Self::forward) would move.
    pub fn can_go_forward(&self) -> bool {
        self.navigator.can_go_forward()
    }

    /// Take the states the renderer has not transmitted yet.
    pub fn drain_pending(&self) -> Vec<SharedHistoryState> {
        let pending = self.log.drain_pending();
        if !pending.is_empty() {
            history_trace!(name = %self.config.name, count = pending.len(), "handing pending history to renderer");
        }
        pending
    }

    /// Whether states are waiting to be drained.
    pub fn has_pending(&self) -> bool {
        self.log.has_pending()
    }

    /// Register a listener for navigation events.
    pub fn add_listener(&self, listener: Arc<dyn HistoryListener>) -> ListenerId {
        self.observers().add_listener(listener)
    }

    /// Unregister a listener.
    pub fn remove_listener(&self, id: ListenerId) -> bool {
        self.observers().remove_listener(id)
    }

    /// The cursor position.
    pub fn current_index(&self) -> Option<usize> {
        self.log.current_index()
    }

    /// The state under the cursor.
    pub fn current_entry(&self) -> Option<SharedHistoryState> {
        self.log.current_entry()
    }

    /// Snapshot of all recorded states, oldest first.
    pub fn entries(&self) -> Vec<SharedHistoryState> {
        self.log.entries()
    }

    /// Whether a state with `hash` is recorded.
    pub fn contains(&self, hash: &str) -> bool {
        self.log.contains(hash)
    }

    /// Number of recorded states.
    pub fn len(&self) -> usize {
        self.log.len()
    }

    /// Whether no states are recorded.
    pub fn is_empty(&self) -> bool {
        self.log.is_empty()
    }
}

impl fmt::Debug for HistoryMonitor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HistoryMonitor")
            .field("config", &self.config)
            .field("log", &self.log)
            .field("listeners", &self.observers().listener_count())
            .finish()
    }
}

static_assertions::assert_impl_all!(HistoryMonitor: Send, Sync);
