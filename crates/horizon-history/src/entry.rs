//! History entries.
//!
//! A history entry is an opaque record of one navigable application state,
//! identified by a caller-supplied hash. Entries may optionally be
//! [`Replayable`], in which case the navigator calls their undo/redo hooks
//! when the user moves across them.
//!
//! Applications either implement [`HistoryState`] on their own types or use
//! the closure-based [`HistoryEntry`]:
//!
//! ```
//! use horizon_history::{HistoryEntry, HistoryState};
//!
//! let entry = HistoryEntry::new("tab=settings")
//!     .with_label("Open settings tab")
//!     .with_undo(|| {
//!         println!("back to previous tab");
//!         Ok(())
//!     });
//!
//! assert_eq!(entry.hash(), "tab=settings");
//! assert!(entry.replayable().is_some());
//! ```

use std::fmt;
use std::sync::Arc;

use crate::error::{HistoryError, ReplayError, Result};

/// Undo/redo capability of a history entry.
pub trait Replayable: Send + Sync {
    /// Reverse the state change this entry represents.
    fn undo(&self) -> std::result::Result<(), ReplayError>;

    /// Reapply the state change this entry represents.
    fn redo(&self) -> std::result::Result<(), ReplayError>;
}

/// One navigable point in application state.
///
/// The hash must not change once the entry has been added to a log.
pub trait HistoryState: fmt::Debug + Send + Sync {
    /// The unique identifier of this state.
    fn hash(&self) -> &str;

    /// The replay capability, if this entry supports undo/redo.
    fn replayable(&self) -> Option<&dyn Replayable> {
        None
    }
}

/// Shared handle to a history entry, as stored in the log.
pub type SharedHistoryState = Arc<dyn HistoryState>;

type ReplayFn = Box<dyn Fn() -> std::result::Result<(), ReplayError> + Send + Sync>;

/// A history entry backed by optional undo/redo closures.
///
/// The entry is replayable if either closure is set; a missing direction
/// replays as a no-op.
pub struct HistoryEntry {
    hash: String,
    label: Option<String>,
    undo: Option<ReplayFn>,
    redo: Option<ReplayFn>,
}

impl HistoryEntry {
    /// Create an entry with the given hash and no replay behavior.
    pub fn new(hash: impl Into<String>) -> Self {
        Self {
            hash: hash.into(),
            label: None,
            undo: None,
            redo: None,
        }
    }

    /// Set a human-readable label.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Set the undo callback.
    pub fn with_undo<F>(mut self, undo: F) -> Self
    where
        F: Fn() -> std::result::Result<(), ReplayError> + Send + Sync + 'static,
    {
        self.undo = Some(Box::new(undo));
        self
    }

    /// Set the redo callback.
    pub fn with_redo<F>(mut self, redo: F) -> Self
    where
        F: Fn() -> std::result::Result<(), ReplayError> + Send + Sync + 'static,
    {
        self.redo = Some(Box::new(redo));
        self
    }

    /// The label, if one was set.
    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    /// Wrap this entry in a shared handle.
    pub fn into_shared(self) -> SharedHistoryState {
        Arc::new(self)
    }
}

impl HistoryState for HistoryEntry {
    fn hash(&self) -> &str {
        &self.hash
    }

    fn replayable(&self) -> Option<&dyn Replayable> {
        if self.undo.is_some() || self.redo.is_some() {
            Some(self)
        } else {
            None
        }
    }
}

impl Replayable for HistoryEntry {
    fn undo(&self) -> std::result::Result<(), ReplayError> {
        self.undo.as_ref().map_or(Ok(()), |undo| undo())
    }

    fn redo(&self) -> std::result::Result<(), ReplayError> {
        self.redo.as_ref().map_or(Ok(()), |redo| redo())
    }
}

impl fmt::Debug for HistoryEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HistoryEntry")
            .field("hash", &self.hash)
            .field("label", &self.label)
            .field("has_undo", &self.undo.is_some())
            .field("has_redo", &self.redo.is_some())
            .finish()
    }
}

impl From<HistoryEntry> for SharedHistoryState {
    fn from(entry: HistoryEntry) -> Self {
        Arc::new(entry)
    }
}

/// Reject hashes that cannot identify an entry.
pub(crate) fn validate_hash(hash: &str) -> Result<()> {
    if hash.trim().is_empty() {
        Err(HistoryError::InvalidHistory)
    } else {
        Ok(())
    }
}
