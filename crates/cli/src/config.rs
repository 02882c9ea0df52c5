//! Configuration loading from quickstart.toml and the environment.

use runtime::chat::{DEFAULT_MAX_OUTPUT_TOKENS, DEFAULT_MODEL};
use serde::Deserialize;
use std::path::{Path, PathBuf};

pub const CONFIG_FILE: &str = "quickstart.toml";
pub const API_KEY_VAR: &str = "ANTHROPIC_API_KEY";
pub const BASE_URL_VAR: &str = "ANTHROPIC_BASE_URL";
pub const MODEL_VAR: &str = "QUICKSTART_MODEL";

/// Top-level configuration.
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    /// Backend configuration.
    #[serde(default)]
    pub backend: BackendConfig,
}

/// Backend provider configuration.
#[derive(Debug, Deserialize)]
pub struct BackendConfig {
    /// Model to use.
    #[serde(default = "default_model")]
    pub model: String,

    /// Maximum output tokens per model turn.
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Anthropic API key. The environment takes precedence.
    pub api_key: Option<String>,

    /// API origin override.
    pub base_url: Option<String>,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            model: default_model(),
            max_tokens: default_max_tokens(),
            api_key: None,
            base_url: None,
        }
    }
}

fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}

fn default_max_tokens() -> u32 {
    DEFAULT_MAX_OUTPUT_TOKENS
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&content)
    }

    /// Parse configuration from TOML string.
    pub fn parse(toml: &str) -> Result<Self, ConfigError> {
        toml::from_str(toml).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Load the configuration in effect.
    ///
    /// An explicit path must exist. Otherwise `quickstart.toml` in the
    /// working directory is used, then the user config directory, then
    /// defaults.
    pub fn discover(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = explicit {
            return Self::load(path);
        }

        let candidates = std::iter::once(PathBuf::from(CONFIG_FILE))
            .chain(config_dir().map(|dir| dir.join("config.toml")));
        for path in candidates {
            if path.is_file() {
                tracing::debug!(path = %path.display(), "loading config");
                return Self::load(&path);
            }
        }
        Ok(Self::default())
    }

    /// Apply environment overrides through `lookup`.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let non_empty = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        if let Some(key) = non_empty(API_KEY_VAR) {
            self.backend.api_key = Some(key);
        }
        if let Some(url) = non_empty(BASE_URL_VAR) {
            self.backend.base_url = Some(url);
        }
        if let Some(model) = non_empty(MODEL_VAR) {
            self.backend.model = model;
        }
    }

    /// The API key to pass through to the backend.
    pub fn api_key(&self) -> Result<&str, ConfigError> {
        self.backend
            .api_key
            .as_deref()
            .filter(|key| !key.trim().is_empty())
            .ok_or(ConfigError::MissingApiKey)
    }
}

fn config_dir() -> Option<PathBuf> {
    #[cfg(target_os = "windows")]
    {
        std::env::var_os("APPDATA").map(|h| PathBuf::from(h).join("quickstart"))
    }
    #[cfg(not(target_os = "windows"))]
    {
        std::env::var_os("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .or_else(|| std::env::var_os("HOME").map(|h| PathBuf::from(h).join(".config")))
            .map(|p| p.join("quickstart"))
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(String),

    #[error("API key not configured: set ANTHROPIC_API_KEY or backend.api_key in quickstart.toml")]
    MissingApiKey,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn empty_config_uses_defaults() {
        let config = Config::parse("").unwrap();
        assert_eq!(config.backend.model, "claude-3-5-sonnet-20241022");
        assert_eq!(config.backend.max_tokens, 1000);
        assert!(config.backend.api_key.is_none());
    }

    #[test]
    fn parses_backend_section() {
        let config = Config::parse(
            r#"
            [backend]
            model = "claude-sonnet-4-20250514"
            max_tokens = 2048
            api_key = "sk-ant-api03-test"
            "#,
        )
        .unwrap();
        assert_eq!(config.backend.model, "claude-sonnet-4-20250514");
        assert_eq!(config.backend.max_tokens, 2048);
        assert_eq!(config.api_key().unwrap(), "sk-ant-api03-test");
    }

    #[test]
    fn invalid_toml_is_a_parse_error() {
        let err = Config::parse("[backend\nmodel = 1").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn environment_overrides_file() {
        let mut config = Config::parse("[backend]\napi_key = \"from-file\"").unwrap();
        config.apply_env(env(&[
            (API_KEY_VAR, "from-env"),
            (MODEL_VAR, "claude-3-5-haiku-20241022"),
        ]));
        assert_eq!(config.api_key().unwrap(), "from-env");
        assert_eq!(config.backend.model, "claude-3-5-haiku-20241022");
    }

    #[test]
    fn blank_environment_values_are_ignored() {
        let mut config = Config::parse("[backend]\napi_key = \"from-file\"").unwrap();
        config.apply_env(env(&[(API_KEY_VAR, "  ")]));
        assert_eq!(config.api_key().unwrap(), "from-file");
    }

    #[test]
    fn missing_api_key() {
        let mut config = Config::default();
        config.apply_env(env(&[]));
        assert!(matches!(config.api_key(), Err(ConfigError::MissingApiKey)));
    }

    #[test]
    fn explicit_path_is_loaded() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("custom.toml");
        std::fs::write(&path, "[backend]\nbase_url = \"http://localhost:8080\"").unwrap();

        let config = Config::discover(Some(&path)).unwrap();
        assert_eq!(config.backend.base_url.as_deref(), Some("http://localhost:8080"));
    }

    #[test]
    fn explicit_missing_path_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = Config::discover(Some(&dir.path().join("absent.toml"))).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
