//! Error types for the history component.

/// Result type alias for history operations.
pub type Result<T> = std::result::Result<T, HistoryError>;

/// Errors raised synchronously by history log mutations.
///
/// Every operation that returns one of these leaves the log exactly as it
/// was before the call. A navigation target that cannot be resolved is not
/// an error; it is reported through
/// [`HistoryObservers::no_history_available`](crate::HistoryObservers::no_history_available).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HistoryError {
    /// The entry has an empty hash.
    #[error("History entry has no hash")]
    InvalidHistory,

    /// Another entry in the log already uses this hash.
    #[error("A history entry with hash '{hash}' already exists")]
    DuplicateHistory { hash: String },

    /// No entry in the log has this hash.
    #[error("No history entry with hash '{hash}'")]
    UnknownHistory { hash: String },
}

impl HistoryError {
    /// Create a duplicate-hash error.
    pub fn duplicate(hash: impl Into<String>) -> Self {
        Self::DuplicateHistory { hash: hash.into() }
    }

    /// Create an unknown-hash error.
    pub fn unknown(hash: impl Into<String>) -> Self {
        Self::UnknownHistory { hash: hash.into() }
    }
}

/// Failure reported by an entry's undo or redo callback.
#[derive(Debug, thiserror::Error)]
#[error("{message}")]
pub struct ReplayError {
    message: String,
    #[source]
    source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl ReplayError {
    /// Create a replay error with a message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            source: None,
        }
    }

    /// Create a replay error wrapping an underlying cause.
    pub fn with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// The error message.
    pub fn message(&self) -> &str {
        &self.message
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_error_messages() {
        assert_eq!(HistoryError::InvalidHistory.to_string(), "History entry has no hash");
        assert_eq!(
            HistoryError::duplicate("h1").to_string(),
            "A history entry with hash 'h1' already exists"
        );
        assert_eq!(
            HistoryError::unknown("h9").to_string(),
            "No history entry with hash 'h9'"
        );
    }

    #[test]
    fn test_replay_error_source() {
        let plain = ReplayError::new("widget gone");
        assert_eq!(plain.message(), "widget gone");
        assert!(plain.source().is_none());

        let io = std::io::Error::other("disk");
        let wrapped = ReplayError::with_source("could not restore", io);
        assert_eq!(wrapped.to_string(), "could not restore");
        assert_eq!(wrapped.source().map(|e| e.to_string()).as_deref(), Some("disk"));
    }
}
