//! API connection settings with the values the web front end uses.
//!
//! [`ApiConfig`] controls where requests go, which browser-like headers are
//! sent, and the fixed identifiers embedded in thread and chat bodies.

use crate::error::ApiError;
use serde::{Deserialize, Serialize};

/// Default API base URL, including the version segment.
pub const DEFAULT_BASE_URL: &str = "https://api1-pp.klokapp.ai/v1";

/// Dataset the web front end attaches to new threads.
pub const DEFAULT_DATASET_ID: &str = "34a725bc-3374-4042-9c37-c2076a8e4c2b";

/// Model requested for chat messages.
pub const DEFAULT_MODEL: &str = "llama-3.3-70b-instruct";

/// Connection and request-shape settings shared by every account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Base URL the endpoint paths are appended to.
    pub base_url: String,
    /// `origin` header value.
    pub origin: String,
    /// `referer` header value.
    pub referer: String,
    /// `user-agent` header value.
    pub user_agent: String,
    /// Dataset id sent when creating a thread.
    pub dataset_id: String,
    /// Model name sent with chat messages.
    pub model: String,
    /// Language tag sent with chat messages.
    pub language: String,
    /// Placeholder title for new threads and chat messages.
    pub thread_title: String,
    /// Overall per-request timeout. `None` keeps the HTTP client default
    /// (no timeout).
    pub timeout_seconds: Option<u64>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_owned(),
            origin: "https://klokapp.ai".to_owned(),
            referer: "https://klokapp.ai/".to_owned(),
            user_agent: "Mozilla/5.0".to_owned(),
            dataset_id: DEFAULT_DATASET_ID.to_owned(),
            model: DEFAULT_MODEL.to_owned(),
            language: "english".to_owned(),
            thread_title: "New Chat".to_owned(),
            timeout_seconds: None,
        }
    }
}

impl ApiConfig {
    /// Validates this configuration, returning an error if any field is invalid.
    ///
    /// Checks:
    /// - `base_url` must parse as an absolute `http`/`https` URL
    /// - `dataset_id`, `model` and `thread_title` must not be empty
    /// - `timeout_seconds`, when set, must be greater than 0
    pub fn validate(&self) -> Result<(), ApiError> {
        let parsed = url::Url::parse(&self.base_url)
            .map_err(|e| ApiError::Config(format!("invalid base_url `{}`: {e}", self.base_url)))?;
        if parsed.scheme() != "http" && parsed.scheme() != "https" {
            return Err(ApiError::Config(format!(
                "base_url must use http or https, got `{}`",
                parsed.scheme()
            )));
        }
        if self.dataset_id.trim().is_empty() {
            return Err(ApiError::Config("dataset_id must not be empty".into()));
        }
        if self.model.trim().is_empty() {
            return Err(ApiError::Config("model must not be empty".into()));
        }
        if self.thread_title.trim().is_empty() {
            return Err(ApiError::Config("thread_title must not be empty".into()));
        }
        if self.timeout_seconds == Some(0) {
            return Err(ApiError::Config(
                "timeout_seconds must be greater than 0 when set".into(),
            ));
        }
        Ok(())
    }

    /// Full URL for an endpoint path such as `/points`.
    #[must_use]
    pub fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}
