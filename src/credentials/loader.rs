//! Credential file loading and validation.
//!
//! Two layouts are accepted:
//!
//! - a newline-delimited list of bare session tokens (blank lines ignored)
//! - a JSON array of objects with `token` and `ai_id` fields
//!
//! Both must yield at least one account, and every token must be usable as
//! an HTTP header value. Any violation is fatal to startup.

use crate::config::AccountsConfig;
use crate::credentials::types::{Account, CredentialError, CredentialFormat};
use serde::Deserialize;
use std::path::Path;

/// Raw JSON entry; fields are optional here so missing ones can be reported
/// by position instead of as a serde error.
#[derive(Deserialize)]
struct RawEntry {
    #[serde(default)]
    token: Option<String>,
    #[serde(default)]
    ai_id: Option<String>,
}

/// Read and validate the accounts described by `config`.
///
/// # Errors
///
/// Returns [`CredentialError`] if the file is missing, unreadable, empty or
/// malformed.
pub fn load_accounts(config: &AccountsConfig) -> Result<Vec<Account>, CredentialError> {
    load_accounts_from_path(&config.path, config.format)
}

/// Read and validate accounts from `path` in the given `format`.
///
/// # Errors
///
/// See [`load_accounts`].
pub fn load_accounts_from_path(
    path: &Path,
    format: CredentialFormat,
) -> Result<Vec<Account>, CredentialError> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(CredentialError::NotFound(path.to_path_buf()));
        }
        Err(source) => {
            return Err(CredentialError::Io {
                path: path.to_path_buf(),
                source,
            });
        }
    };
    parse_accounts(&content, format)
}

/// Parse credential file contents.
///
/// # Errors
///
/// Returns [`CredentialError::Empty`] when no account is present, and
/// [`CredentialError::Malformed`], [`CredentialError::MissingField`] or
/// [`CredentialError::InvalidToken`] for bad entries.
pub fn parse_accounts(
    content: &str,
    format: CredentialFormat,
) -> Result<Vec<Account>, CredentialError> {
    let accounts = match resolve_format(content, format) {
        CredentialFormat::Json => parse_json(content)?,
        CredentialFormat::Lines | CredentialFormat::Auto => parse_lines(content),
    };

    if accounts.is_empty() {
        return Err(CredentialError::Empty);
    }

    for (i, account) in accounts.iter().enumerate() {
        if !token_is_usable(&account.token) {
            return Err(CredentialError::InvalidToken { index: i + 1 });
        }
    }

    Ok(accounts)
}

fn resolve_format(content: &str, format: CredentialFormat) -> CredentialFormat {
    match format {
        CredentialFormat::Auto if content.trim_start().starts_with('[') => CredentialFormat::Json,
        CredentialFormat::Auto => CredentialFormat::Lines,
        explicit => explicit,
    }
}

fn parse_lines(content: &str) -> Vec<Account> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(Account::from_token)
        .collect()
}

fn parse_json(content: &str) -> Result<Vec<Account>, CredentialError> {
    let entries: Vec<RawEntry> =
        serde_json::from_str(content).map_err(|e| CredentialError::Malformed(e.to_string()))?;

    entries
        .into_iter()
        .enumerate()
        .map(|(i, entry)| {
            let index = i + 1;
            let token = non_blank(entry.token).ok_or(CredentialError::MissingField {
                index,
                field: "token",
            })?;
            let ai_id = non_blank(entry.ai_id).ok_or(CredentialError::MissingField {
                index,
                field: "ai_id",
            })?;
            Ok(Account {
                token,
                ai_id: Some(ai_id),
            })
        })
        .collect()
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_owned())
        .filter(|v| !v.is_empty())
}

/// A token is usable when it is non-empty visible ASCII without spaces.
fn token_is_usable(token: &str) -> bool {
    !token.is_empty() && token.bytes().all(|b| b.is_ascii_graphic())
}
