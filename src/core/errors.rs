//! Error types for the console engines.

use thiserror::Error;

use super::ids::{Generation, RecordId, TurnId};

/// Errors that can occur in the console core.
#[derive(Debug, Error)]
pub enum ConsoleError {
    /// HTTP request failed before a response was obtained.
    #[error("HTTP request failed: {0}")]
    HttpRequest(#[from] reqwest::Error),

    /// The backend answered with a non-success status.
    #[error("backend returned status {status}: {message}")]
    BackendStatus {
        /// HTTP status code.
        status: u16,
        /// Message extracted from the error body, possibly empty.
        message: String,
    },

    /// URL parsing error.
    #[error("invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// JSON parsing error.
    #[error("JSON parsing error: {0}")]
    JsonParse(#[from] serde_json::Error),

    /// Configuration error.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// A settlement targeted a superseded resource generation.
    #[error("stale settlement for generation {stamped}, resource is at {current}")]
    StaleGeneration {
        /// Generation the operation was stamped with.
        stamped: Generation,
        /// Generation the resource has moved to.
        current: Generation,
    },

    /// A resolution targeted a turn that no longer exists.
    #[error("unknown turn {0}")]
    UnknownTurn(TurnId),

    /// A second resolution targeted an already-resolved turn.
    #[error("turn {0} is already resolved")]
    AlreadyResolved(TurnId),

    /// An edit targeted an edit-buffer row that no longer exists.
    #[error("unknown contact row {0}")]
    UnknownRow(RecordId),

    /// An edit targeted a display position with no row behind it.
    #[error("no contact row at index {0}")]
    UnknownRowIndex(usize),
}

impl ConsoleError {
    /// Whether this error is a transport failure: the call never produced a
    /// usable response. Transport failures are always recovered locally.
    #[must_use]
    pub const fn is_transport(&self) -> bool {
        matches!(
            self,
            Self::HttpRequest(_) | Self::BackendStatus { .. } | Self::JsonParse(_)
        )
    }

    /// Whether this error means the settlement arrived for state that has
    /// since been superseded and must be discarded rather than applied.
    #[must_use]
    pub const fn is_stale(&self) -> bool {
        matches!(
            self,
            Self::StaleGeneration { .. } | Self::UnknownTurn(_) | Self::AlreadyResolved(_)
        )
    }
}

/// Convenience result alias for console operations.
pub type ConsoleResult<T> = Result<T, ConsoleError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transport_predicate() {
        let err = ConsoleError::BackendStatus {
            status: 500,
            message: "agent crashed".to_string(),
        };
        assert!(err.is_transport());
        assert!(!err.is_stale());
    }

    #[test]
    fn test_stale_predicate() {
        let err = ConsoleError::StaleGeneration {
            stamped: Generation::initial(),
            current: Generation::initial().next(),
        };
        assert!(err.is_stale());
        assert!(!err.is_transport());
    }

    #[test]
    fn test_status_display() {
        let err = ConsoleError::BackendStatus {
            status: 502,
            message: "bad gateway".to_string(),
        };
        assert_eq!(err.to_string(), "backend returned status 502: bad gateway");
    }
}
