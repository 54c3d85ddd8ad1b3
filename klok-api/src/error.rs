//! Error types for the klok-api crate.
//!
//! Session tokens never appear in error messages. HTTP error bodies are kept
//! verbatim because the remote service reports its reasons there.

/// Transport message fragment that means the service closed the stream after
/// accepting the request.
const STREAM_ABORT_MARKER: &str = "stream has been aborted";

/// Errors that can occur while talking to the remote API.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The request could not be sent, or the response body could not be read.
    ///
    /// The message carries the full source chain of the underlying error.
    #[error("transport error: {0}")]
    Transport(String),

    /// The service answered with a success status, then the connection broke
    /// before the response body was complete.
    #[error("stream aborted: {0}")]
    StreamAborted(String),

    /// The service answered with a non-success status.
    #[error("HTTP {status}: {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Raw response body (may be empty).
        body: String,
    },

    /// The response body was not the expected JSON shape.
    #[error("decode error: {0}")]
    Decode(String),

    /// Invalid client configuration (base URL, header values).
    #[error("config error: {0}")]
    Config(String),
}

impl ApiError {
    /// Returns `true` when the service accepted the request and then dropped
    /// the response stream.
    ///
    /// The chat endpoint may drop the connection after it has accepted a
    /// message, so callers treat this as a delivered send. A connection that
    /// closes before any status line arrives is a plain transport failure.
    #[must_use]
    pub fn is_stream_aborted(&self) -> bool {
        match self {
            Self::StreamAborted(_) => true,
            Self::Transport(message) => message
                .to_ascii_lowercase()
                .contains(STREAM_ABORT_MARKER),
            _ => false,
        }
    }

    /// Best description of what went wrong for log output: the remote
    /// payload for status errors, the message otherwise.
    #[must_use]
    pub fn detail(&self) -> String {
        match self {
            Self::Status { status, body } if body.trim().is_empty() => format!("HTTP {status}"),
            Self::Status { body, .. } => body.clone(),
            other => other.to_string(),
        }
    }

    /// Build a [`ApiError::Transport`] from a reqwest error, flattening the
    /// source chain into the message.
    pub(crate) fn transport(err: &reqwest::Error) -> Self {
        Self::Transport(error_chain(err))
    }

    /// Build a [`ApiError::StreamAborted`] from a body read that failed after
    /// a success status.
    pub(crate) fn stream_aborted(err: &reqwest::Error) -> Self {
        Self::StreamAborted(error_chain(err))
    }
}

/// Join an error and all of its sources with `": "`.
fn error_chain(err: &dyn std::error::Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(inner) = source {
        let text = inner.to_string();
        if !message.contains(&text) {
            message.push_str(": ");
            message.push_str(&text);
        }
        source = inner.source();
    }
    message
}

/// Convenience type alias for klok-api results.
pub type Result<T> = std::result::Result<T, ApiError>;
