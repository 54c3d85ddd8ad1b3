//! Error types for klok-bot.

use crate::credentials::CredentialError;

/// Top-level error type for startup and configuration.
///
/// Nothing in here is produced while workers run: per-call failures are
/// logged by the gateway and never propagated.
#[derive(Debug, thiserror::Error)]
pub enum BotError {
    /// Configuration file or value error.
    #[error("config error: {0}")]
    Config(String),

    /// Account credential loading or validation error.
    #[error("credentials error: {0}")]
    Credentials(#[from] CredentialError),

    /// Remote API client construction error.
    #[error("API error: {0}")]
    Api(#[from] klok_api::ApiError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience result type.
pub type Result<T> = std::result::Result<T, BotError>;
