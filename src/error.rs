//! Error types for the dietitian client.

use std::fmt;

use thiserror::Error;

/// Transport-level error raised by the API layer.
#[derive(Error, Debug)]
pub enum Error {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Invalid base URL.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// The service answered with a non-success status.
    #[error("API error ({status}): {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Response body, or a placeholder when it could not be read.
        message: String,
    },

    /// The task carrying a request panicked or was cancelled.
    #[error("request task failed: {0}")]
    Task(String),

    /// The service accepted the session but returned no identifier for it.
    #[error("service returned an empty session id")]
    EmptySessionId,
}

/// Result type alias for API operations.
pub type Result<T> = std::result::Result<T, Error>;

/// The user-triggered operation a failure belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    StartSession,
    SendMessage,
    ClearSession,
}

impl Operation {
    /// Short text shown in the error display area.
    #[must_use]
    pub fn user_message(self) -> &'static str {
        match self {
            Self::StartSession => "Failed to start session.",
            Self::SendMessage => "Failed to send message.",
            Self::ClearSession => "Failed to clear session.",
        }
    }

    /// Stable identifier used in log events.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::StartSession => "start_session",
            Self::SendMessage => "send_message",
            Self::ClearSession => "clear_session",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A remote operation failed.
///
/// Network errors and service-reported failures are not distinguished here;
/// the underlying [`Error`] is kept as the source for diagnostics only.
#[derive(Error, Debug)]
#[error("{}", .operation.user_message())]
pub struct RemoteFailure {
    pub operation: Operation,
    #[source]
    pub source: Error,
}

impl RemoteFailure {
    pub(crate) fn new(operation: Operation, source: Error) -> Self {
        Self { operation, source }
    }
}
