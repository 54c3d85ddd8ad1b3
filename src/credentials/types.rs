//! Core types for account credentials.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// One remote-service session.
///
/// Immutable once loaded. The custom [`Debug`] redacts the token so an
/// account can be logged without leaking it.
#[derive(Clone, PartialEq, Eq)]
pub struct Account {
    /// Session token sent as `x-session-token`.
    pub token: String,
    /// Secondary id sent as `ai_id` with chat messages, when present.
    pub ai_id: Option<String>,
}

impl Account {
    /// Account identified by a bare session token.
    pub fn from_token(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            ai_id: None,
        }
    }
}

impl fmt::Debug for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Account")
            .field("token", &"[REDACTED]")
            .field("ai_id", &self.ai_id)
            .finish()
    }
}

/// Layout of the credential file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CredentialFormat {
    /// JSON when the first non-blank character is `[`, lines otherwise.
    #[default]
    Auto,
    /// One bare token per line.
    Lines,
    /// JSON array of `{ "token": ..., "ai_id": ... }` objects.
    Json,
}

impl std::str::FromStr for CredentialFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "auto" => Ok(Self::Auto),
            "lines" | "txt" | "text" => Ok(Self::Lines),
            "json" => Ok(Self::Json),
            other => Err(format!(
                "unknown credential format `{other}` (expected auto, lines or json)"
            )),
        }
    }
}

/// Errors that make the credential source unusable. All of them are fatal.
#[derive(Debug, thiserror::Error)]
pub enum CredentialError {
    /// The credential file does not exist.
    #[error("credential file not found: {}", .0.display())]
    NotFound(PathBuf),

    /// The credential file could not be read.
    #[error("cannot read credential file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The source contained no accounts.
    #[error("credential file contains no accounts")]
    Empty,

    /// The JSON form could not be parsed.
    #[error("malformed credential file: {0}")]
    Malformed(String),

    /// A JSON entry lacks a required field.
    #[error("account entry {index} is missing `{field}`")]
    MissingField {
        /// 1-based entry position.
        index: usize,
        field: &'static str,
    },

    /// A token cannot be sent as a header value.
    #[error("account entry {index} has an unusable token")]
    InvalidToken {
        /// 1-based entry position.
        index: usize,
    },
}
