//! Configuration types for the bot.

use crate::credentials::CredentialFormat;
use crate::phrases::DEFAULT_PHRASES;
use klok_api::ApiConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Top-level configuration, loaded from TOML.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BotConfig {
    /// Remote API connection settings.
    pub api: ApiConfig,
    /// Per-account worker loop settings.
    pub worker: WorkerConfig,
    /// Where account credentials are read from.
    pub accounts: AccountsConfig,
    /// Log output settings.
    pub logging: LoggingConfig,
}

/// Account worker settings shared by every account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkerConfig {
    /// Seconds between ticks.
    pub interval_secs: u64,
    /// First message of every thread the bot creates.
    pub seed_message: String,
    /// Phrases a tick picks from at random.
    pub phrases: Vec<String>,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            interval_secs: 60,
            seed_message: "Start a new conversation".to_owned(),
            phrases: DEFAULT_PHRASES.iter().map(|p| (*p).to_owned()).collect(),
        }
    }
}

/// Credential source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AccountsConfig {
    /// Path to the credential file. Relative paths resolve against the
    /// working directory.
    pub path: PathBuf,
    /// File format; `auto` picks JSON when the file starts with `[`.
    pub format: CredentialFormat,
}

impl Default for AccountsConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("tokens.txt"),
            format: CredentialFormat::Auto,
        }
    }
}

/// Log output settings. Console logging is always on.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Directory for daily rolling log files (None = console only).
    pub directory: Option<PathBuf>,
}

impl BotConfig {
    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> crate::error::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| crate::error::BotError::Config(e.to_string()))
    }

    /// Load `path` when given, otherwise the default path if it exists,
    /// otherwise built-in defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if an existing file cannot be read or parsed.
    pub fn load(path: Option<&Path>) -> crate::error::Result<Self> {
        if let Some(path) = path {
            return Self::from_file(path);
        }
        let default_path = Self::default_config_path();
        if default_path.is_file() {
            return Self::from_file(&default_path);
        }
        Ok(Self::default())
    }

    /// Returns the default config file path: `<config dir>/klok-bot/config.toml`.
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("/tmp/klok-bot-config"))
            .join("klok-bot")
            .join("config.toml")
    }

    /// Reject values the worker loop cannot run with.
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::BotError::Config`] describing the first problem found.
    pub fn validate(&self) -> crate::error::Result<()> {
        self.api
            .validate()
            .map_err(|e| crate::error::BotError::Config(e.to_string()))?;
        if self.worker.interval_secs == 0 {
            return Err(crate::error::BotError::Config(
                "worker.interval_secs must be greater than 0".to_owned(),
            ));
        }
        if self.worker.seed_message.trim().is_empty() {
            return Err(crate::error::BotError::Config(
                "worker.seed_message must not be empty".to_owned(),
            ));
        }
        if !self.worker.phrases.iter().any(|p| !p.trim().is_empty()) {
            return Err(crate::error::BotError::Config(
                "worker.phrases must contain at least one non-empty phrase".to_owned(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]

    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = BotConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.worker.interval_secs, 60);
        assert_eq!(config.worker.phrases.len(), DEFAULT_PHRASES.len());
        assert_eq!(config.accounts.path, PathBuf::from("tokens.txt"));
        assert_eq!(config.accounts.format, CredentialFormat::Auto);
        assert!(config.logging.directory.is_none());
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let config: BotConfig = toml::from_str(
            r#"
            [worker]
            interval_secs = 90

            [accounts]
            path = "accounts.json"
            format = "json"
            "#,
        )
        .expect("parse");
        assert_eq!(config.worker.interval_secs, 90);
        assert_eq!(config.worker.seed_message, "Start a new conversation");
        assert_eq!(config.accounts.format, CredentialFormat::Json);
        assert_eq!(config.api, ApiConfig::default());
    }

    #[test]
    fn api_section_overrides_base_url_and_timeout() {
        let config: BotConfig = toml::from_str(
            r#"
            [api]
            base_url = "http://127.0.0.1:8080/v1"
            timeout_seconds = 45
            "#,
        )
        .expect("parse");
        assert_eq!(config.api.base_url, "http://127.0.0.1:8080/v1");
        assert_eq!(config.api.timeout_seconds, Some(45));
        assert_eq!(config.api.model, klok_api::config::DEFAULT_MODEL);
    }

    #[test]
    fn zero_interval_rejected() {
        let mut config = BotConfig::default();
        config.worker.interval_secs = 0;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("interval_secs"));
    }

    #[test]
    fn blank_phrases_rejected() {
        let mut config = BotConfig::default();
        config.worker.phrases = vec!["   ".to_owned()];
        assert!(config.validate().is_err());
    }

    #[test]
    fn invalid_api_config_rejected() {
        let mut config = BotConfig::default();
        config.api.base_url = "::".to_owned();
        assert!(config.validate().is_err());
    }

    #[test]
    fn from_file_nonexistent_returns_error() {
        let result = BotConfig::from_file(Path::new("/nonexistent/path/config.toml"));
        assert!(result.is_err());
    }

    #[test]
    fn from_file_invalid_toml_returns_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("bad.toml");
        std::fs::write(&path, "this is not valid toml {{{").expect("write");

        let result = BotConfig::from_file(&path);
        assert!(matches!(result, Err(crate::error::BotError::Config(_))));
    }

    #[test]
    fn load_with_explicit_path_reads_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[worker]\ninterval_secs = 5\n").expect("write");

        let config = BotConfig::load(Some(&path)).expect("load");
        assert_eq!(config.worker.interval_secs, 5);
    }

    #[test]
    fn default_config_path_ends_with_config_toml() {
        let path = BotConfig::default_config_path();
        let path_str = path.to_string_lossy();
        assert!(path_str.ends_with("config.toml"));
        assert!(path_str.contains("klok-bot"));
    }

    #[test]
    fn config_round_trips_through_toml() {
        let config = BotConfig::default();
        let text = toml::to_string_pretty(&config).expect("serialize");
        let parsed: BotConfig = toml::from_str(&text).expect("parse");
        assert_eq!(parsed, config);
    }
}
