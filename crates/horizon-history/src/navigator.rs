//! Moving the history cursor.
//!
//! [`HistoryNavigator`] resolves a navigation target against a
//! [`HistoryLog`], moves the cursor there, then walks every entry crossed on
//! the way: each replayable entry has its undo or redo callback invoked and
//! the observers are told about the entry before the next one is touched.
//!
//! Given entries `[A, B, C, D]` with the cursor on `D`, navigating to `B`
//! undoes `D` then `C`; navigating back to `D` redoes `C` then `D`. The
//! target entry itself is never undone.
//!
//! The cursor already points at the target while callbacks run. Failed
//! callbacks are reported through
//! [`HistoryObservers::replay_failed`] and do not stop the walk.
//!
//! Navigations are serialized: a second thread calling
//! [`navigate_to`](HistoryNavigator::navigate_to) waits until the first one
//! has finished replaying. A callback that navigates again on the same thread
//! runs its nested navigation immediately; the outer walk then stops without
//! replaying its remaining entries and is reported as
//! [`superseded`](Navigation::superseded).

use std::sync::Arc;

use horizon_history_core::logging::{span_names, targets};
use horizon_history_core::PerfSpan;
use parking_lot::ReentrantMutex;

use crate::entry::HistoryState;
use crate::log::{HistoryLog, Seek};
use crate::observers::{HistoryObservers, ReplayFailure};

/// Direction of a cursor move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Moving to an older entry; crossed entries are undone.
    Undo,
    /// Moving to a newer entry; crossed entries are redone.
    Redo,
}

/// The result of a cursor move.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Navigation {
    /// Cursor position before the move.
    pub from: Option<usize>,
    /// Cursor position after the move.
    pub to: usize,
    /// Undo when `to` is before `from`, redo otherwise.
    pub direction: Direction,
    /// Number of entries walked; fewer than crossed if superseded.
    pub steps: usize,
    /// Number of crossed entries whose replay callback failed.
    pub failed: usize,
    /// A nested navigation moved the cursor before this walk finished.
    pub superseded: bool,
}

impl Navigation {
    /// Whether this was a forward move.
    pub fn is_redo(&self) -> bool {
        self.direction == Direction::Redo
    }

    /// Whether the cursor stayed where it was.
    pub fn is_empty(&self) -> bool {
        self.steps == 0
    }
}

/// Outcome of [`HistoryNavigator::navigate_to`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationOutcome {
    /// The target was found and the cursor moved onto it.
    Moved(Navigation),
    /// No entry has the requested hash; the cursor did not move.
    NoHistory { requested: String },
}

impl NavigationOutcome {
    /// The navigation, if the cursor moved.
    pub fn navigation(&self) -> Option<&Navigation> {
        match self {
            Self::Moved(navigation) => Some(navigation),
            Self::NoHistory { .. } => None,
        }
    }

    /// Whether the target was unknown.
    pub fn is_no_history(&self) -> bool {
        matches!(self, Self::NoHistory { .. })
    }
}

/// Resolves navigation targets and replays the entries between them.
pub struct HistoryNavigator {
    log: Arc<HistoryLog>,
    observers: Arc<HistoryObservers>,
    /// Held for the whole of a navigation.
    gate: ReentrantMutex<()>,
}

impl HistoryNavigator {
    /// Create a navigator over `log` reporting to `observers`.
    pub fn new(log: Arc<HistoryLog>, observers: Arc<HistoryObservers>) -> Self {
        Self {
            log,
            observers,
            gate: ReentrantMutex::new(()),
        }
    }

    /// The log this navigator moves through.
    pub fn log(&self) -> &Arc<HistoryLog> {
        &self.log
    }

    /// The observers this navigator reports to.
    pub fn observers(&self) -> &Arc<HistoryObservers> {
        &self.observers
    }

    /// Move the cursor to the entry with `hash`.
    ///
    /// An unknown hash is not an error: the cursor stays put and
    /// [`HistoryObservers::no_history_available`] fires once. Moving to the
    /// entry the cursor is already on replays nothing and notifies nobody.
    #[tracing::instrument(skip(self), target = "horizon_history::navigator", level = "debug")]
    pub fn navigate_to(&self, hash: &str) -> NavigationOutcome {
        let _gate = self.gate.lock();

        match self.log.seek(|state| state.index_of(hash)) {
            Some(seek) => NavigationOutcome::Moved(self.replay(seek)),
            None => {
                tracing::debug!(target: targets::NAVIGATOR, hash, "no history available");
                self.observers.no_history_available.emit(hash.to_owned());
                NavigationOutcome::NoHistory {
                    requested: hash.to_owned(),
                }
            }
        }
    }

    /// Undo the entry under the cursor, moving to the one before it.
    ///
    /// Returns `None` if the cursor is on the first entry or nowhere.
    pub fn back(&self) -> Option<Navigation> {
        let _gate = self.gate.lock();
        let seek = self
            .log
            .seek(|state| state.current().and_then(|current| current.checked_sub(1)))?;
        Some(self.replay(seek))
    }

    /// Redo the entry after the cursor, moving onto it.
    ///
    /// Returns `None` if the cursor is on the last entry.
    pub fn forward(&self) -> Option<Navigation> {
        let _gate = self.gate.lock();
        let seek = self.log.seek(|state| {
            let next = state.current().map_or(0, |current| current + 1);
            (next < state.len()).then_some(next)
        })?;
        Some(self.replay(seek))
    }

    /// Whether [`back`](Self::back) would move.
    pub fn can_go_back(&self) -> bool {
        self.log.current_index().is_some_and(|current| current > 0)
    }

    /// Whether [`forward`](Self::forward) would move.
    pub fn can_go_forward(&self) -> bool {
        let next = self.log.current_index().map_or(0, |current| current + 1);
        next < self.log.len()
    }

    fn replay(&self, seek: Seek) -> Navigation {
        let Seek {
            from,
            to,
            path,
            generation,
        } = seek;
        // A zero-length move counts as redo
        let direction = if from.is_some_and(|from| to < from) {
            Direction::Undo
        } else {
            Direction::Redo
        };

        let _perf = PerfSpan::new(span_names::REPLAY);
        let mut failed = 0;
        let mut steps = 0;
        let mut superseded = false;
        for entry in &path {
            // The cursor no longer belongs to this walk
            if self.log.generation() != generation {
                superseded = true;
                break;
            }
            steps += 1;

            if let Some(replay) = entry.replayable() {
                let result = match direction {
                    Direction::Undo => replay.undo(),
                    Direction::Redo => replay.redo(),
                };
                if let Err(error) = result {
                    failed += 1;
                    tracing::warn!(
                        target: targets::NAVIGATOR,
                        hash = entry.hash(),
                        ?direction,
                        %error,
                        "history replay failed"
                    );
                    self.observers.replay_failed.emit(ReplayFailure {
                        entry: entry.clone(),
                        direction,
                        error: Arc::new(error),
                    });
                }
            }

            match direction {
                Direction::Undo => self.observers.undone.emit(entry.clone()),
                Direction::Redo => self.observers.redone.emit(entry.clone()),
            }
        }

        let navigation = Navigation {
            from,
            to,
            direction,
            steps,
            failed,
            superseded,
        };
        tracing::debug!(
            target: targets::NAVIGATOR,
            ?from,
            to,
            ?direction,
            steps,
            failed,
            superseded,
            "history navigated"
        );
        if !navigation.is_empty() && !superseded {
            self.observers.navigated.emit(navigation.clone());
        }
        navigation
    }
}

static_assertions::assert_impl_all!(HistoryNavigator: Send, Sync);
