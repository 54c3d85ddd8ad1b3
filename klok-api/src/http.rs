//! Per-account HTTP client with the browser-like headers the API expects.
//!
//! Every request carries the session token, a browser `user-agent`,
//! `accept: */*` and the front end's `origin`/`referer`, so the headers are
//! installed once as client defaults.

use crate::config::ApiConfig;
use crate::error::ApiError;
use reqwest::header::{ACCEPT, HeaderMap, HeaderName, HeaderValue, ORIGIN, REFERER, USER_AGENT};
use std::time::Duration;

/// Header carrying the account's session token.
pub const SESSION_TOKEN_HEADER: &str = "x-session-token";

/// Build a [`reqwest::Client`] authenticated as one account.
///
/// The client has:
/// - `x-session-token` set to `token` (marked sensitive)
/// - `user-agent`, `accept`, `origin` and `referer` from `config`
/// - an overall timeout only when `config.timeout_seconds` is set
///
/// # Errors
///
/// Returns [`ApiError::Config`] if a header value is not valid or the client
/// cannot be constructed.
pub fn build_client(config: &ApiConfig, token: &str) -> Result<reqwest::Client, ApiError> {
    let headers = default_headers(config, token)?;

    let mut builder = reqwest::Client::builder().default_headers(headers);
    if let Some(secs) = config.timeout_seconds {
        builder = builder.timeout(Duration::from_secs(secs));
    }

    builder
        .build()
        .map_err(|e| ApiError::Config(format!("failed to build HTTP client: {e}")))
}

fn default_headers(config: &ApiConfig, token: &str) -> Result<HeaderMap, ApiError> {
    let mut token_value = HeaderValue::from_str(token.trim())
        .map_err(|_| ApiError::Config("session token is not a valid header value".into()))?;
    token_value.set_sensitive(true);

    let mut headers = HeaderMap::new();
    headers.insert(HeaderName::from_static(SESSION_TOKEN_HEADER), token_value);
    headers.insert(USER_AGENT, header_value("user_agent", &config.user_agent)?);
    headers.insert(ACCEPT, HeaderValue::from_static("*/*"));
    headers.insert(ORIGIN, header_value("origin", &config.origin)?);
    headers.insert(REFERER, header_value("referer", &config.referer)?);
    Ok(headers)
}

fn header_value(field: &str, value: &str) -> Result<HeaderValue, ApiError> {
    HeaderValue::from_str(value)
        .map_err(|_| ApiError::Config(format!("{field} is not a valid header value")))
}
