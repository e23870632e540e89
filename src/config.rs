//! Configuration management for the local code agent.
//!
//! Configuration can be set via environment variables:
//! - `LLM_BASE_URL` - Optional. OpenAI-compatible endpoint. Defaults to `http://localhost:1234/v1`.
//! - `LLM_MODEL` - Optional. Model identifier. Defaults to `llama3`.
//! - `LLM_API_KEY` - Optional. Bearer key; local servers usually ignore it. Defaults to `dummy`.
//! - `LLM_TIMEOUT_SECS` - Optional. Timeout for one chat completion. Defaults to `300`.
//! - `HOST` - Optional. Server host. Defaults to `0.0.0.0`.
//! - `PORT` - Optional. Server port. Defaults to `8000`.
//! - `COMMAND_TIMEOUT_SECS` - Optional. Timeout for `run_command`. Defaults to `300`.
//! - `SEARCH_TIMEOUT_SECS` - Optional. Timeout for each search fetch. Defaults to `12`.
//! - `SEARCH_INSECURE_TLS_RETRY` - Optional. Retry a search fetch once without
//!   certificate verification after a TLS failure. Defaults to `false`.
//!
//! Before any of these are read, [`load_env_file`] loads the dotenv file named
//! by `ENV_FILE` (defaults to `../secrets/.env`). Variables already present in
//! the process environment are not overridden, and a missing file is ignored.

use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;

use crate::search::SearchEndpoints;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}: {1}")]
    InvalidValue(String, String),
}

/// LLM endpoint configuration.
#[derive(Debug, Clone)]
pub struct LlmConfig {
    /// Base URL of the OpenAI-compatible API (without `/chat/completions`)
    pub base_url: String,

    /// Model identifier sent with every request
    pub model: String,

    /// Bearer key
    pub api_key: String,

    /// Timeout for one completion request
    pub timeout: Duration,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:1234/v1".to_string(),
            model: "llama3".to_string(),
            api_key: "dummy".to_string(),
            timeout: Duration::from_secs(300),
        }
    }
}

/// Web search configuration.
#[derive(Debug, Clone)]
pub struct SearchConfig {
    /// Timeout applied to each fetch
    pub timeout: Duration,

    /// Retry once without certificate verification after a TLS failure
    pub insecure_tls_retry: bool,

    /// Instant-answer and scrape endpoints
    pub endpoints: SearchEndpoints,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(12),
            insecure_tls_retry: false,
            endpoints: SearchEndpoints::default(),
        }
    }
}

/// Agent configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// LLM relay settings
    pub llm: LlmConfig,

    /// Server host
    pub host: String,

    /// Server port
    pub port: u16,

    /// Timeout for shell commands run by the `run_command` tool
    pub command_timeout: Duration,

    /// Web search settings
    pub search: SearchConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            llm: LlmConfig::default(),
            host: "0.0.0.0".to_string(),
            port: 8000,
            command_timeout: Duration::from_secs(300),
            search: SearchConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if a numeric or boolean variable
    /// cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let llm = LlmConfig {
            base_url: env_or("LLM_BASE_URL", defaults.llm.base_url),
            model: env_or("LLM_MODEL", defaults.llm.model),
            api_key: env_or("LLM_API_KEY", defaults.llm.api_key),
            timeout: env_secs("LLM_TIMEOUT_SECS")?.unwrap_or(defaults.llm.timeout),
        };

        let host = env_or("HOST", defaults.host);
        let port = env_parse::<u16>("PORT")?.unwrap_or(defaults.port);
        let command_timeout =
            env_secs("COMMAND_TIMEOUT_SECS")?.unwrap_or(defaults.command_timeout);

        let insecure_tls_retry = std::env::var("SEARCH_INSECURE_TLS_RETRY")
            .ok()
            .map(|v| {
                parse_bool(&v)
                    .map_err(|e| ConfigError::InvalidValue("SEARCH_INSECURE_TLS_RETRY".to_string(), e))
            })
            .transpose()?
            .unwrap_or(false);

        let search = SearchConfig {
            timeout: env_secs("SEARCH_TIMEOUT_SECS")?.unwrap_or(defaults.search.timeout),
            insecure_tls_retry,
            endpoints: defaults.search.endpoints,
        };

        if insecure_tls_retry {
            tracing::warn!("SEARCH_INSECURE_TLS_RETRY is enabled: search fetches may skip certificate checks");
        }

        Ok(Self {
            llm,
            host,
            port,
            command_timeout,
            search,
        })
    }

    /// Create a config pointing at a specific LLM endpoint (useful for testing).
    pub fn new(llm_base_url: String, llm_model: String) -> Self {
        let defaults = Self::default();
        Self {
            llm: LlmConfig {
                base_url: llm_base_url,
                model: llm_model,
                ..defaults.llm
            },
            ..defaults
        }
    }
}

/// Dotenv file read at startup when `ENV_FILE` is unset.
pub const DEFAULT_ENV_FILE: &str = "../secrets/.env";

/// Load the dotenv file named by `ENV_FILE`, or [`DEFAULT_ENV_FILE`].
///
/// Returns the path that was loaded, or `None` when there was no file. A file
/// that cannot be parsed is logged and skipped.
pub fn load_env_file() -> Option<PathBuf> {
    let path = std::env::var("ENV_FILE")
        .ok()
        .filter(|v| !v.trim().is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_ENV_FILE));
    load_env_file_from(&path)
}

fn load_env_file_from(path: &Path) -> Option<PathBuf> {
    match dotenvy::from_path(path) {
        Ok(()) => Some(path.to_path_buf()),
        Err(e) if e.not_found() => None,
        Err(e) => {
            tracing::warn!("Failed to load env file {}: {}", path.display(), e);
            None
        }
    }
}

fn env_or(key: &str, default: String) -> String {
    std::env::var(key)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or(default)
}

fn env_parse<T>(key: &str) -> Result<Option<T>, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    std::env::var(key)
        .ok()
        .map(|v| {
            v.trim()
                .parse::<T>()
                .map_err(|e| ConfigError::InvalidValue(key.to_string(), format!("{}", e)))
        })
        .transpose()
}

fn env_secs(key: &str) -> Result<Option<Duration>, ConfigError> {
    Ok(env_parse::<u64>(key)?.map(Duration::from_secs))
}

fn parse_bool(value: &str) -> Result<bool, String> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "t" | "yes" | "y" | "on" => Ok(true),
        "0" | "false" | "f" | "no" | "n" | "off" => Ok(false),
        other => Err(format!("expected boolean-like value, got: {}", other)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_bool_accepts_common_spellings() {
        for yes in ["1", "true", "YES", " on "] {
            assert_eq!(parse_bool(yes), Ok(true));
        }
        for no in ["0", "False", "n", "off"] {
            assert_eq!(parse_bool(no), Ok(false));
        }
        assert!(parse_bool("maybe").is_err());
    }

    #[test]
    fn defaults_match_documented_values() {
        let config = Config::new("http://127.0.0.1:9999/v1".to_string(), "tiny".to_string());
        assert_eq!(config.llm.base_url, "http://127.0.0.1:9999/v1");
        assert_eq!(config.llm.model, "tiny");
        assert_eq!(config.llm.api_key, "dummy");
        assert_eq!(config.port, 8000);
        assert_eq!(config.search.timeout, Duration::from_secs(12));
        assert!(!config.search.insecure_tls_retry);
        assert_eq!(
            config.search.endpoints.instant_answer_url,
            "https://api.duckduckgo.com/"
        );
    }

    #[test]
    fn invalid_numbers_are_reported_with_their_key() {
        std::env::set_var("LCA_TEST_BAD_PORT", "eighty");
        let err = env_parse::<u16>("LCA_TEST_BAD_PORT").unwrap_err();
        std::env::remove_var("LCA_TEST_BAD_PORT");
        assert!(err.to_string().contains("LCA_TEST_BAD_PORT"));
    }

    #[test]
    fn env_file_fills_unset_variables_only() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".env");
        std::fs::write(
            &path,
            "LCA_TEST_DOTENV_MODEL=from-file\nLCA_TEST_DOTENV_KEEP=from-file\n",
        )
        .unwrap();
        std::env::set_var("LCA_TEST_DOTENV_KEEP", "from-process");

        assert_eq!(load_env_file_from(&path), Some(path.clone()));
        assert_eq!(std::env::var("LCA_TEST_DOTENV_MODEL").unwrap(), "from-file");
        assert_eq!(std::env::var("LCA_TEST_DOTENV_KEEP").unwrap(), "from-process");

        std::env::remove_var("LCA_TEST_DOTENV_MODEL");
        std::env::remove_var("LCA_TEST_DOTENV_KEEP");
    }

    #[test]
    fn missing_env_file_is_ignored() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(load_env_file_from(&dir.path().join("absent.env")), None);
    }
}
