//! CLI configuration with TOML file support.

use std::path::{Path, PathBuf};
use std::time::Duration;

use boarding_types::{ApiEndpoint, Itinerary, Language};
use boarding_utils::LogFormat;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid config: {0}")]
    Parse(String),
}

/// Configuration of the `boarding` binary.
///
/// Loaded from a TOML file via [`AppConfig::from_toml_file`]; every field has a
/// default so an empty file is valid.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Base URL of the backend API (`…/start`, `…/result`, `…/tickets`).
    #[serde(default = "default_api_endpoint")]
    pub api_endpoint: String,

    /// Display language: "en" or "nl".
    #[serde(default = "default_language")]
    pub language: String,

    /// Where the pending ticket is kept between `buy` and `verify`.
    #[serde(default = "default_store_path")]
    pub store_path: PathBuf,

    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,

    /// Time the user has to finish a session.
    #[serde(default = "default_session_timeout_secs")]
    pub session_timeout_secs: u64,

    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Follow the session status on the pointer URL and fetch the result once;
    /// when false, poll the result endpoint instead.
    #[serde(default = "default_follow_status")]
    pub follow_status: bool,

    /// Log level filter: "trace", "debug", "info", "warn", "error".
    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default)]
    pub log_format: LogFormat,

    /// Flight printed on every boarding pass.
    #[serde(default)]
    pub itinerary: Itinerary,
}

/// Values given on the command line or through the environment.
#[derive(Clone, Debug, Default)]
pub struct Overrides {
    pub api_endpoint: Option<String>,
    pub language: Option<String>,
    pub store_path: Option<PathBuf>,
    pub log_level: Option<String>,
    pub log_format: Option<LogFormat>,
}

// ── Serde default helpers ──────────────────────────────────────────────

fn default_api_endpoint() -> String {
    "http://localhost:8080/api".to_string()
}

fn default_language() -> String {
    Language::default().as_str().to_string()
}

fn default_store_path() -> PathBuf {
    PathBuf::from("./boarding_data/ticket.json")
}

fn default_poll_interval_ms() -> u64 {
    1000
}

fn default_session_timeout_secs() -> u64 {
    300
}

fn default_request_timeout_secs() -> u64 {
    10
}

fn default_follow_status() -> bool {
    true
}

fn default_log_level() -> String {
    "info".to_string()
}

// ── Impl ───────────────────────────────────────────────────────────────

impl AppConfig {
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Command-line and environment values win over the file.
    pub fn apply(&mut self, overrides: Overrides) {
        if let Some(endpoint) = overrides.api_endpoint {
            self.api_endpoint = endpoint;
        }
        if let Some(language) = overrides.language {
            self.language = language;
        }
        if let Some(path) = overrides.store_path {
            self.store_path = path;
        }
        if let Some(level) = overrides.log_level {
            self.log_level = level;
        }
        if let Some(format) = overrides.log_format {
            self.log_format = format;
        }
    }

    pub fn endpoint(&self) -> ApiEndpoint {
        ApiEndpoint::resolve(Some(&self.api_endpoint))
    }

    pub fn language(&self) -> Language {
        Language::normalize(Some(&self.language))
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn session_timeout(&self) -> Duration {
        Duration::from_secs(self.session_timeout_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_endpoint: default_api_endpoint(),
            language: default_language(),
            store_path: default_store_path(),
            poll_interval_ms: default_poll_interval_ms(),
            session_timeout_secs: default_session_timeout_secs(),
            request_timeout_secs: default_request_timeout_secs(),
            follow_status: default_follow_status(),
            log_level: default_log_level(),
            log_format: LogFormat::default(),
            itinerary: Itinerary::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_round_trips_through_toml() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        let parsed = AppConfig::from_toml_str(&toml_str).expect("should parse");
        assert_eq!(parsed, config);
    }

    #[test]
    fn minimal_toml_uses_defaults() {
        let config = AppConfig::from_toml_str("").expect("empty toml should use defaults");
        assert_eq!(config.api_endpoint, "http://localhost:8080/api");
        assert_eq!(config.language(), Language::En);
        assert_eq!(config.poll_interval(), Duration::from_secs(1));
        assert_eq!(config.session_timeout(), Duration::from_secs(300));
        assert!(config.follow_status);
        assert_eq!(config.itinerary, Itinerary::demo());
    }

    #[test]
    fn partial_toml_overrides() {
        let toml = r#"
            api_endpoint = "https://checkin.example/api/"
            language = "NL"
            log_format = "json"
            follow_status = false

            [itinerary]
            flight = "KL1234"
            from = "AMS"
            to = "LHR"
            seat = "3C"
            date = "2026-1-2"
            time = "08:10"
            gate = "D4"
        "#;
        let config = AppConfig::from_toml_str(toml).expect("should parse");
        assert_eq!(config.endpoint().as_str(), "https://checkin.example/api");
        assert_eq!(config.language(), Language::Nl);
        assert_eq!(config.log_format, LogFormat::Json);
        assert!(!config.follow_status);
        assert_eq!(config.itinerary.flight, "KL1234");
        assert_eq!(config.log_level, "info"); // default
    }

    #[test]
    fn invalid_toml_is_a_parse_error() {
        let err = AppConfig::from_toml_str("poll_interval_ms = \"soon\"").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn missing_file_is_a_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = AppConfig::from_toml_file(&dir.path().join("absent.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }

    #[test]
    fn overrides_win_over_file_values() {
        let mut config = AppConfig::from_toml_str("language = \"nl\"\nlog_level = \"debug\"").unwrap();
        config.apply(Overrides {
            language: Some("en".into()),
            store_path: Some(PathBuf::from("/tmp/ticket.json")),
            ..Overrides::default()
        });
        assert_eq!(config.language(), Language::En);
        assert_eq!(config.store_path, PathBuf::from("/tmp/ticket.json"));
        assert_eq!(config.log_level, "debug");
    }
}
