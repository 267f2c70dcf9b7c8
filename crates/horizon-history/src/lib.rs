//! Undo/redo history for Horizon components.
//!
//! This crate tracks the navigable states of an application so the browser's
//! back and forward buttons can move between them:
//!
//! - **Entries**: Opaque states identified by a unique hash, optionally
//!   carrying undo/redo callbacks ([`HistoryEntry`], [`HistoryState`])
//! - **Log**: The ordered record with a current-position cursor and a queue
//!   of entries the renderer has not transmitted yet ([`HistoryLog`])
//! - **Navigator**: Moves the cursor to a requested hash and replays every
//!   entry in between ([`HistoryNavigator`])
//! - **Observers**: Synchronous notification of undo, redo and unknown
//!   targets ([`HistoryObservers`], [`HistoryListener`])
//! - **Monitor**: The component owning all of the above ([`HistoryMonitor`])
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use horizon_history::{HistoryEntry, HistoryListener, HistoryMonitor, SharedHistoryState};
//! use parking_lot::Mutex;
//!
//! #[derive(Default)]
//! struct UndoLog(Mutex<Vec<String>>);
//!
//! impl HistoryListener for UndoLog {
//!     fn on_undo(&self, entry: &SharedHistoryState) {
//!         self.0.lock().push(entry.hash().to_string());
//!     }
//! }
//!
//! let monitor = HistoryMonitor::new();
//! let undo_log = Arc::new(UndoLog::default());
//! monitor.add_listener(undo_log.clone());
//!
//! for hash in ["h1", "h2", "h3", "h4", "h5"] {
//!     monitor.add_history(HistoryEntry::new(hash)).unwrap();
//! }
//!
//! monitor.navigate_to("h2");
//!
//! assert_eq!(monitor.current_index(), Some(1));
//! assert_eq!(*undo_log.0.lock(), vec!["h5", "h4", "h3"]);
//! ```

mod config;
mod entry;
mod error;
mod log;
mod monitor;
mod navigator;
mod observers;

pub use config::{HistoryConfig, HistoryMonitorBuilder, DEFAULT_MONITOR_NAME};
pub use entry::{HistoryEntry, HistoryState, Replayable, SharedHistoryState};
pub use error::{HistoryError, ReplayError, Result};
pub use log::{HistoryChange, HistoryLog};
pub use monitor::HistoryMonitor;
pub use navigator::{Direction, HistoryNavigator, Navigation, NavigationOutcome};
pub use observers::{HistoryListener, HistoryObservers, ListenerId, ReplayFailure};

// Re-export the signal types used in this crate's public fields
pub use horizon_history_core::{ConnectionGuard, ConnectionId, Signal};
