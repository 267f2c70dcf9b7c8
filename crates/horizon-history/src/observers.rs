//! Navigation observers.
//!
//! [`HistoryObservers`] is the multicast sink the navigator reports to. Each
//! event kind is a [`Signal`] that closures can connect to directly; types
//! that want all events at once implement [`HistoryListener`] and register
//! through [`HistoryObservers::add_listener`].
//!
//! Notifications are synchronous: every observer has seen an entry before
//! the navigator moves on to the next entry in the path.

use std::sync::Arc;

use horizon_history_core::{ConnectionId, Signal, SignalEmitter};
use parking_lot::Mutex;
use slotmap::{new_key_type, SlotMap};

use crate::entry::SharedHistoryState;
use crate::error::ReplayError;
use crate::navigator::{Direction, Navigation};

new_key_type! {
    /// Identifies a listener registered with [`HistoryObservers::add_listener`].
    pub struct ListenerId;
}

/// A replay callback that returned an error during navigation.
#[derive(Debug, Clone)]
pub struct ReplayFailure {
    /// The entry whose callback failed.
    pub entry: SharedHistoryState,
    /// Which callback failed.
    pub direction: Direction,
    /// The reported error.
    pub error: Arc<ReplayError>,
}

/// Receives history navigation events.
///
/// All methods default to doing nothing, so implementors only override the
/// events they care about.
pub trait HistoryListener: Send + Sync {
    /// An entry was crossed while moving backward.
    fn on_undo(&self, _entry: &SharedHistoryState) {}

    /// An entry was crossed while moving forward.
    fn on_redo(&self, _entry: &SharedHistoryState) {}

    /// A navigation target did not resolve to any entry.
    fn on_no_history_available(&self, _requested: &str) {}

    /// An entry's replay callback failed.
    fn on_replay_failed(&self, _failure: &ReplayFailure) {}
}

/// Connections made on behalf of one listener.
struct ListenerConnections {
    undone: ConnectionId,
    redone: ConnectionId,
    no_history_available: ConnectionId,
    replay_failed: ConnectionId,
}

/// The set of signals a history navigator reports through.
pub struct HistoryObservers {
    /// Emitted once per entry crossed while moving backward.
    pub undone: Signal<SharedHistoryState>,
    /// Emitted once per entry crossed while moving forward.
    pub redone: Signal<SharedHistoryState>,
    /// Emitted with the requested hash when it matches no entry.
    pub no_history_available: Signal<String>,
    /// Emitted when an entry's replay callback returns an error.
    pub replay_failed: Signal<ReplayFailure>,
    /// Emitted once after a navigation that crossed at least one entry.
    pub navigated: Signal<Navigation>,
    listeners: Mutex<SlotMap<ListenerId, ListenerConnections>>,
}

impl Default for HistoryObservers {
    fn default() -> Self {
        Self::new()
    }
}

impl HistoryObservers {
    /// Create an observer set with no connections.
    pub fn new() -> Self {
        Self {
            undone: Signal::new(),
            redone: Signal::new(),
            no_history_available: Signal::new(),
            replay_failed: Signal::new(),
            navigated: Signal::new(),
            listeners: Mutex::new(SlotMap::with_key()),
        }
    }

    /// Register a listener for every event kind.
    pub fn add_listener(&self, listener: Arc<dyn HistoryListener>) -> ListenerId {
        let undone = {
            let listener = listener.clone();
            self.undone.connect(move |entry| listener.on_undo(entry))
        };
        let redone = {
            let listener = listener.clone();
            self.redone.connect(move |entry| listener.on_redo(entry))
        };
        let no_history_available = {
            let listener = listener.clone();
            self.no_history_available
                .connect(move |requested| listener.on_no_history_available(requested))
        };
        let replay_failed = self
            .replay_failed
            .connect(move |failure| listener.on_replay_failed(failure));

        self.listeners.lock().insert(ListenerConnections {
            undone,
            redone,
            no_history_available,
            replay_failed,
        })
    }

    /// Unregister a listener.
    ///
    /// Returns `false` if the ID is unknown or was already removed.
    pub fn remove_listener(&self, id: ListenerId) -> bool {
        let Some(connections) = self.listeners.lock().remove(id) else {
            return false;
        };
        self.undone.disconnect(connections.undone);
        self.redone.disconnect(connections.redone);
        self.no_history_available
            .disconnect(connections.no_history_available);
        self.replay_failed.disconnect(connections.replay_failed);
        true
    }

    /// Number of registered listeners.
    pub fn listener_count(&self) -> usize {
        self.listeners.lock().len()
    }

    /// Suppress or resume every notification.
    pub fn set_blocked(&self, blocked: bool) {
        for signal in self.signals() {
            signal.set_blocked(blocked);
        }
    }

    /// Whether notifications are suppressed.
    pub fn is_blocked(&self) -> bool {
        self.signals().iter().all(|signal| signal.is_blocked())
    }

    /// Drop every listener and every closure connection.
    pub fn disconnect_all(&self) {
        self.listeners.lock().clear();
        for signal in self.signals() {
            signal.disconnect_all();
        }
    }

    fn signals(&self) -> [&dyn SignalEmitter; 5] {
        [
            &self.undone,
            &self.redone,
            &self.no_history_available,
            &self.replay_failed,
            &self.navigated,
        ]
    }
}

static_assertions::assert_impl_all!(HistoryObservers: Send, Sync);
