//! Move log error types.

use derive_more::{Display, Error};
use tracing::instrument;

/// Failure talking to the move log, with location tracking.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
#[display("Move log error: {} at {}:{}", message, file, line)]
pub struct ClientError {
    /// Error message (server-provided where available).
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ClientError {
    /// Creates a new client error with caller location tracking.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(message: impl Into<String>) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message: message.into(),
            line: loc.line(),
            file: loc.file(),
        }
    }
}

impl From<reqwest::Error> for ClientError {
    #[track_caller]
    fn from(err: reqwest::Error) -> Self {
        Self::new(format!("HTTP error: {}", err))
    }
}

impl From<serde_json::Error> for ClientError {
    #[track_caller]
    fn from(err: serde_json::Error) -> Self {
        Self::new(format!("Invalid JSON: {}", err))
    }
}
