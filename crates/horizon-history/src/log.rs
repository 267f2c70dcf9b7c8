//! The ordered history log.
//!
//! [`HistoryLog`] is an append-only, chronologically ordered list of
//! [`HistoryState`](crate::HistoryState) entries with a cursor marking the
//! entry the user is currently at, plus a queue of entries the renderer has
//! not picked up yet.
//!
//! All state lives behind a single mutex: adding, clearing, truncating,
//! draining and moving the cursor are each one critical section. Change
//! notifications are emitted after the lock is released, so slots connected
//! to [`HistoryLog::changed`] may query the log freely.

use std::cmp::Ordering;
use std::fmt;

use horizon_history_core::logging::targets;
use horizon_history_core::Signal;
use parking_lot::Mutex;

use crate::entry::{validate_hash, HistoryState, SharedHistoryState};
use crate::error::{HistoryError, Result};

/// Describes a mutation of the log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HistoryChange {
    /// An entry was appended.
    Added { hash: String },
    /// All entries were removed.
    Cleared,
    /// Entries after `retained` were removed.
    Truncated { retained: String, removed: usize },
    /// The oldest entries were dropped to respect the capacity limit.
    Evicted { count: usize },
}

/// The lock-protected state of a [`HistoryLog`].
#[derive(Default)]
pub(crate) struct LogState {
    /// Entries in insertion order.
    entries: Vec<SharedHistoryState>,
    /// Cursor; `None` means no current entry.
    current: Option<usize>,
    /// Entries added since the last drain.
    pending: Vec<SharedHistoryState>,
    /// Bumped on every cursor move made by a navigation.
    generation: u64,
}

impl LogState {
    pub(crate) fn current(&self) -> Option<usize> {
        self.current
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    /// Most recent match wins.
    pub(crate) fn index_of(&self, hash: &str) -> Option<usize> {
        self.entries.iter().rposition(|entry| entry.hash() == hash)
    }

    fn path(&self, from: Option<usize>, to: Option<usize>) -> Vec<SharedHistoryState> {
        let Some(last) = self.entries.len().checked_sub(1) else {
            return Vec::new();
        };

        match to.cmp(&from) {
            Ordering::Equal => Vec::new(),
            // Undo: the departed entry down to, but excluding, the target
            Ordering::Less => {
                let low = to.map_or(0, |t| t + 1);
                let high = from.map_or(0, |f| f.min(last));
                if low > high {
                    return Vec::new();
                }
                self.entries[low..=high].iter().rev().cloned().collect()
            }
            // Redo: just after the departed entry up to and including the target
            Ordering::Greater => {
                let low = from.map_or(0, |f| f + 1);
                let high = to.map_or(0, |t| t.min(last));
                if low > high {
                    return Vec::new();
                }
                self.entries[low..=high].to_vec()
            }
        }
    }

    fn forget_pending(&mut self, removed: &[SharedHistoryState]) {
        self.pending
            .retain(|pending| !removed.iter().any(|entry| entry.hash() == pending.hash()));
    }
}

/// Result of moving the cursor: where it was, where it is, and the entries
/// crossed on the way, in replay order.
pub(crate) struct Seek {
    pub(crate) from: Option<usize>,
    pub(crate) to: usize,
    pub(crate) path: Vec<SharedHistoryState>,
    /// Navigation generation this move started.
    pub(crate) generation: u64,
}

/// An ordered, thread-safe history log with a current-position cursor.
///
/// # Example
///
/// ```
/// use horizon_history::{HistoryEntry, HistoryLog};
///
/// let log = HistoryLog::new();
/// log.add(HistoryEntry::new("a")).unwrap();
/// log.add(HistoryEntry::new("b")).unwrap();
///
/// assert_eq!(log.current_index(), Some(1));
/// assert_eq!(log.index_of("a"), Some(0));
/// assert_eq!(log.drain_pending().len(), 2);
/// assert!(log.drain_pending().is_empty());
/// ```
pub struct HistoryLog {
    state: Mutex<LogState>,
    /// Maximum number of retained entries; `None` for unlimited.
    max_entries: Option<usize>,
    /// Emitted after every successful mutation.
    pub changed: Signal<HistoryChange>,
}

impl Default for HistoryLog {
    fn default() -> Self {
        Self::new()
    }
}

impl HistoryLog {
    /// Create an empty, unbounded log.
    pub fn new() -> Self {
        Self::with_max_entries(None)
    }

    /// Create an empty log that keeps at most `max_entries` entries.
    ///
    /// A limit of zero is raised to one so the entry just added is always kept.
    pub fn with_max_entries(max_entries: Option<usize>) -> Self {
        Self {
            state: Mutex::new(LogState::default()),
            max_entries: max_entries.map(|max| max.max(1)),
            changed: Signal::new(),
        }
    }

    /// The capacity limit, if any.
    pub fn max_entries(&self) -> Option<usize> {
        self.max_entries
    }

    /// Append an entry.
    ///
    /// The cursor follows the new entry only if it was at the previous last
    /// entry (or the log was empty); a user who navigated backward stays
    /// where they are.
    ///
    /// # Errors
    ///
    /// - [`HistoryError::InvalidHistory`] if the hash is empty or only whitespace
    /// - [`HistoryError::DuplicateHistory`] if the hash is already in the log
    pub fn add(&self, entry: impl Into<SharedHistoryState>) -> Result<()> {
        let entry = entry.into();
        validate_hash(entry.hash())?;
        let hash = entry.hash().to_owned();

        let evicted = {
            let mut state = self.state.lock();
            if state.index_of(&hash).is_some() {
                return Err(HistoryError::duplicate(hash));
            }

            let caught_up = state.current == state.entries.len().checked_sub(1);
            state.entries.push(entry.clone());
            state.pending.push(entry);
            if caught_up {
                state.current = Some(state.entries.len() - 1);
            }
            self.enforce_limit(&mut state)
        };

        tracing::debug!(target: targets::LOG, hash = %hash, evicted, "history entry added");
        self.changed.emit(HistoryChange::Added { hash });
        if evicted > 0 {
            self.changed.emit(HistoryChange::Evicted { count: evicted });
        }
        Ok(())
    }

    fn enforce_limit(&self, state: &mut LogState) -> usize {
        let Some(max) = self.max_entries else {
            return 0;
        };
        let excess = state.entries.len().saturating_sub(max);
        if excess == 0 {
            return 0;
        }

        let evicted: Vec<_> = state.entries.drain(..excess).collect();
        state.forget_pending(&evicted);
        // A cursor on an evicted entry no longer points anywhere
        state.current = state.current.and_then(|current| current.checked_sub(excess));
        excess
    }

    /// Remove every entry and reset the cursor.
    pub fn clear(&self) {
        {
            let mut state = self.state.lock();
            state.entries.clear();
            state.pending.clear();
            state.current = None;
        }

        tracing::debug!(target: targets::LOG, "history cleared");
        self.changed.emit(HistoryChange::Cleared);
    }

    /// Remove every entry added after the one with `hash`.
    ///
    /// Removed entries are also dropped from the pending queue, and a cursor
    /// beyond the retained range is pulled back onto `hash`. Returns the
    /// number of entries removed.
    ///
    /// # Errors
    ///
    /// - [`HistoryError::InvalidHistory`] if the hash is empty or only whitespace
    /// - [`HistoryError::UnknownHistory`] if no entry has this hash
    pub fn clear_in_front_of(&self, hash: &str) -> Result<usize> {
        validate_hash(hash)?;

        let removed = {
            let mut state = self.state.lock();
            let index = state
                .index_of(hash)
                .ok_or_else(|| HistoryError::unknown(hash))?;

            let removed = state.entries.split_off(index + 1);
            state.forget_pending(&removed);
            if state.current > Some(index) {
                state.current = Some(index);
            }
            removed.len()
        };

        if removed > 0 {
            tracing::debug!(target: targets::LOG, hash, removed, "history truncated");
            self.changed.emit(HistoryChange::Truncated {
                retained: hash.to_owned(),
                removed,
            });
        }
        Ok(removed)
    }

    /// Take every entry added since the previous drain, in insertion order.
    pub fn drain_pending(&self) -> Vec<SharedHistoryState> {
        let drained = std::mem::take(&mut self.state.lock().pending);
        tracing::trace!(target: targets::LOG, count = drained.len(), "pending entries drained");
        drained
    }

    /// Whether entries are waiting to be drained.
    pub fn has_pending(&self) -> bool {
        !self.state.lock().pending.is_empty()
    }

    /// Index of the entry with `hash`, searching from the most recent entry.
    pub fn index_of(&self, hash: &str) -> Option<usize> {
        self.state.lock().index_of(hash)
    }

    /// Whether an entry with `hash` is in the log.
    pub fn contains(&self, hash: &str) -> bool {
        self.index_of(hash).is_some()
    }

    /// The entries crossed when moving the cursor from `from` to `to`.
    ///
    /// `None` stands for the position before the first entry.
    ///
    /// - `to < from`: entries `from` down to `to + 1`, descending (undo path)
    /// - `to > from`: entries `from + 1` up to `to`, ascending (redo path)
    /// - `to == from`: empty
    pub fn entries_between(
        &self,
        from: Option<usize>,
        to: Option<usize>,
    ) -> Vec<SharedHistoryState> {
        self.state.lock().path(from, to)
    }

    /// The cursor position.
    pub fn current_index(&self) -> Option<usize> {
        self.state.lock().current
    }

    /// The entry under the cursor.
    pub fn current_entry(&self) -> Option<SharedHistoryState> {
        let state = self.state.lock();
        state.current.and_then(|index| state.entries.get(index).cloned())
    }

    /// The entry at `index`.
    pub fn get(&self, index: usize) -> Option<SharedHistoryState> {
        self.state.lock().entries.get(index).cloned()
    }

    /// Snapshot of all entries in chronological order.
    pub fn entries(&self) -> Vec<SharedHistoryState> {
        self.state.lock().entries.clone()
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.state.lock().entries.len()
    }

    /// Whether the log has no entries.
    pub fn is_empty(&self) -> bool {
        self.state.lock().entries.is_empty()
    }

    /// Resolve a target and move the cursor onto it in one critical section.
    ///
    /// Returns `None`, leaving the cursor untouched, if `resolve` finds no
    /// target.
    pub(crate) fn seek<F>(&self, resolve: F) -> Option<Seek>
    where
        F: FnOnce(&LogState) -> Option<usize>,
    {
        let mut state = self.state.lock();
        let to = resolve(&state)?;
        let from = state.current;
        state.current = Some(to);
        state.generation = state.generation.wrapping_add(1);
        let path = state.path(from, Some(to));
        Some(Seek {
            from,
            to,
            path,
            generation: state.generation,
        })
    }

    /// Generation of the most recent navigation.
    pub(crate) fn generation(&self) -> u64 {
        self.state.lock().generation
    }
}

impl fmt::Debug for HistoryLog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.lock();
        f.debug_struct("HistoryLog")
            .field("len", &state.entries.len())
            .field("current", &state.current)
            .field("pending", &state.pending.len())
            .field("max_entries", &self.max_entries)
            .finish()
    }
}

static_assertions::assert_impl_all!(HistoryLog: Send, Sync);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::HistoryEntry;
    use std::sync::Arc;

    fn log_with(hashes: &[&str]) -> HistoryLog {
        let log = HistoryLog::new();
        for hash in hashes {
            log.add(HistoryEntry::new(*hash)).unwrap();
        }
        log
    }

    fn hashes(entries: &[SharedHistoryState]) -> Vec<String> {
        entries.iter().map(|e| e.hash().to_owned()).collect()
    }

    #[test]
    fn test_new_log_is_empty() {
        let log = HistoryLog::new();
        assert!(log.is_empty());
        assert_eq!(log.current_index(), None);
        assert!(log.current_entry().is_none());
        assert!(!log.has_pending());
    }

    #[test]
    fn test_add_auto_advances_when_caught_up() {
        let log = log_with(&["a", "b", "c"]);
        assert_eq!(log.len(), 3);
        assert_eq!(log.current_index(), Some(2));
        assert_eq!(log.current_entry().unwrap().hash(), "c");
    }

    #[test]
    fn test_add_keeps_cursor_after_navigating_back() {
        let log = log_with(&["a", "b", "c"]);
        log.seek(|state| state.index_of("a")).unwrap();

        log.add(HistoryEntry::new("d")).unwrap();

        assert_eq!(log.current_index(), Some(0));
        assert_eq!(log.len(), 4);
    }

    #[test]
    fn test_add_rejects_duplicate_without_mutation() {
        let log = log_with(&["a", "b"]);
        log.drain_pending();

        let err = log.add(HistoryEntry::new("a")).unwrap_err();

        assert_eq!(err, HistoryError::duplicate("a"));
        assert_eq!(log.len(), 2);
        assert_eq!(log.current_index(), Some(1));
        assert!(!log.has_pending());
    }

    #[test]
    fn test_add_rejects_empty_hash() {
        let log = HistoryLog::new();
        assert_eq!(log.add(HistoryEntry::new("")), Err(HistoryError::InvalidHistory));
        assert_eq!(log.add(HistoryEntry::new(" \t\n")), Err(HistoryError::InvalidHistory));
        assert!(log.is_empty());
    }

    #[test]
    fn test_index_of() {
        let log = log_with(&["a", "b", "c"]);
        assert_eq!(log.index_of("a"), Some(0));
        assert_eq!(log.index_of("c"), Some(2));
        assert_eq!(log.index_of("zzz"), None);
        assert!(log.contains("b"));
    }

    #[test]
    fn test_drain_pending() {
        let log = log_with(&["a", "b"]);
        assert_eq!(hashes(&log.drain_pending()), vec!["a", "b"]);
        assert!(log.drain_pending().is_empty());

        log.add(HistoryEntry::new("c")).unwrap();
        assert_eq!(hashes(&log.drain_pending()), vec!["c"]);
    }

    #[test]
    fn test_clear() {
        let log = log_with(&["a", "b"]);
        log.clear();
        assert_eq!(log.index_of("a"), None);
        assert_eq!(log.current_index(), None);
        assert!(log.drain_pending().is_empty());

        // A cleared log auto-advances again
        log.add(HistoryEntry::new("a")).unwrap();
        assert_eq!(log.current_index(), Some(0));
    }

    #[test]
    fn test_clear_in_front_of() {
        let log = log_with(&["a", "b", "c", "d"]);

        let removed = log.clear_in_front_of("b").unwrap();

        assert_eq!(removed, 2);
        assert_eq!(log.len(), 2);
        assert_eq!(log.current_index(), Some(1));
        assert_eq!(log.index_of("c"), None);
        assert_eq!(hashes(&log.drain_pending()), vec!["a", "b"]);
    }

    #[test]
    fn test_clear_in_front_of_keeps_cursor_inside_range() {
        let log = log_with(&["a", "b", "c"]);
        log.seek(|state| state.index_of("a")).unwrap();

        log.clear_in_front_of("b").unwrap();

        assert_eq!(log.current_index(), Some(0));
    }

    #[test]
    fn test_clear_in_front_of_unknown_hash() {
        let log = log_with(&["a", "b"]);

        assert_eq!(log.clear_in_front_of("x"), Err(HistoryError::unknown("x")));
        assert_eq!(log.clear_in_front_of(""), Err(HistoryError::InvalidHistory));
        assert_eq!(log.len(), 2);
    }

    #[test]
    fn test_clear_in_front_of_last_is_noop() {
        let log = log_with(&["a", "b"]);
        let changes = Arc::new(Mutex::new(Vec::new()));
        let changes_clone = changes.clone();
        log.changed.connect(move |change| changes_clone.lock().push(change.clone()));

        assert_eq!(log.clear_in_front_of("b"), Ok(0));
        assert!(changes.lock().is_empty());
    }

    #[test]
    fn test_entries_between() {
        let log = log_with(&["a", "b", "c", "d"]);

        assert_eq!(hashes(&log.entries_between(Some(3), Some(1))), vec!["d", "c"]);
        assert_eq!(hashes(&log.entries_between(Some(1), Some(3))), vec!["c", "d"]);
        assert!(log.entries_between(Some(2), Some(2)).is_empty());
        assert_eq!(hashes(&log.entries_between(None, Some(1))), vec!["a", "b"]);
        assert_eq!(hashes(&log.entries_between(Some(1), None)), vec!["b", "a"]);
    }

    #[test]
    fn test_entries_between_out_of_range() {
        let log = log_with(&["a", "b"]);
        assert!(log.entries_between(Some(5), Some(7)).is_empty());
        assert_eq!(hashes(&log.entries_between(Some(9), Some(0))), vec!["b"]);
        assert!(HistoryLog::new().entries_between(None, Some(0)).is_empty());
    }

    #[test]
    fn test_seek_unknown_leaves_cursor() {
        let log = log_with(&["a", "b"]);
        let generation = log.generation();
        assert!(log.seek(|state| state.index_of("x")).is_none());
        assert_eq!(log.current_index(), Some(1));
        assert_eq!(log.generation(), generation);
    }

    #[test]
    fn test_seek_bumps_generation() {
        let log = log_with(&["a", "b"]);
        let first = log.seek(|state| state.index_of("a")).unwrap();
        let second = log.seek(|state| state.index_of("a")).unwrap();
        assert_ne!(first.generation, second.generation);
        assert_eq!(log.generation(), second.generation);
    }

    #[test]
    fn test_max_entries_evicts_oldest() {
        let log = HistoryLog::with_max_entries(Some(3));
        for hash in ["a", "b", "c"] {
            log.add(HistoryEntry::new(hash)).unwrap();
        }
        log.drain_pending();
        log.add(HistoryEntry::new("d")).unwrap();
        log.add(HistoryEntry::new("e")).unwrap();

        assert_eq!(hashes(&log.entries()), vec!["c", "d", "e"]);
        assert_eq!(log.current_index(), Some(2));
        assert_eq!(hashes(&log.drain_pending()), vec!["d", "e"]);
    }

    #[test]
    fn test_max_entries_evicts_pending_and_cursor() {
        let log = HistoryLog::with_max_entries(Some(2));
        log.add(HistoryEntry::new("a")).unwrap();
        log.add(HistoryEntry::new("b")).unwrap();
        log.seek(|state| state.index_of("a")).unwrap();

        log.add(HistoryEntry::new("c")).unwrap();

        assert_eq!(hashes(&log.entries()), vec!["b", "c"]);
        assert_eq!(log.current_index(), None);
        assert_eq!(hashes(&log.drain_pending()), vec!["b", "c"]);
    }

    #[test]
    fn test_zero_limit_is_raised_to_one() {
        let log = HistoryLog::with_max_entries(Some(0));
        assert_eq!(log.max_entries(), Some(1));
        log.add(HistoryEntry::new("a")).unwrap();
        log.add(HistoryEntry::new("b")).unwrap();
        assert_eq!(hashes(&log.entries()), vec!["b"]);
        assert_eq!(log.current_index(), Some(0));
    }

    #[test]
    fn test_changed_signal() {
        let log = HistoryLog::with_max_entries(Some(2));
        let changes = Arc::new(Mutex::new(Vec::new()));
        let changes_clone = changes.clone();
        log.changed.connect(move |change| changes_clone.lock().push(change.clone()));

        log.add(HistoryEntry::new("a")).unwrap();
        log.add(HistoryEntry::new("b")).unwrap();
        log.add(HistoryEntry::new("c")).unwrap();
        log.clear_in_front_of("b").unwrap();
        log.clear();

        assert_eq!(
            *changes.lock(),
            vec![
                HistoryChange::Added { hash: "a".into() },
                HistoryChange::Added { hash: "b".into() },
                HistoryChange::Added { hash: "c".into() },
                HistoryChange::Evicted { count: 1 },
                HistoryChange::Truncated { retained: "b".into(), removed: 1 },
                HistoryChange::Cleared,
            ]
        );
    }

    #[test]
    fn test_changed_slot_can_query_log() {
        let log = Arc::new(HistoryLog::new());
        let seen = Arc::new(Mutex::new(Vec::new()));

        let log_clone = Arc::downgrade(&log);
        let seen_clone = seen.clone();
        log.changed.connect(move |_| {
            if let Some(log) = log_clone.upgrade() {
                seen_clone.lock().push(log.len());
            }
        });

        log.add(HistoryEntry::new("a")).unwrap();
        log.add(HistoryEntry::new("b")).unwrap();

        assert_eq!(*seen.lock(), vec![1, 2]);
    }

    #[test]
    fn test_debug_output() {
        let log = log_with(&["a"]);
        let debug = format!("{log:?}");
        assert!(debug.contains("len: 1"));
        assert!(debug.contains("current: Some(0)"));
    }
}
