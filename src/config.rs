//! Client configuration: which binaries to run and which extra variables
//! (tokens and similar) to hand them.
//!
//! Stored as JSON. Every field has a default, so an empty object or a missing
//! file both yield a usable config.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Errors loading a config or tokens file.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ClientConfig {
    /// Program used for plain git operations, resolved through `PATH`.
    pub git_program: String,
    /// Path (or bare name) of the hub executable.
    pub hub_path: PathBuf,
    /// Extra variables for every subprocess, e.g. `GITHUB_TOKEN`.
    pub env: HashMap<String, String>,
    /// Adds `GIT_TERMINAL_PROMPT=0` and `LC_ALL=C` unless `env` sets them.
    pub non_interactive: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            git_program: "git".to_string(),
            hub_path: PathBuf::from("hub"),
            env: HashMap::new(),
            non_interactive: true,
        }
    }
}

impl ClientConfig {
    /// Reads a JSON config file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&contents).map_err(|source| ConfigError::Json {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Loads `config.json` from the platform config directory, falling back
    /// to defaults when there is no such file.
    pub fn load_default() -> Result<Self, ConfigError> {
        match default_config_path() {
            Some(path) if path.exists() => {
                log::debug!("loading client config from {:?}", path);
                Self::load(&path)
            }
            _ => Ok(Self::default()),
        }
    }

    /// Reads a flat JSON object of environment variables (a `tokens.json`)
    /// into a default config.
    pub fn from_tokens_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let env: HashMap<String, String> =
            serde_json::from_str(&contents).map_err(|source| ConfigError::Json {
                path: path.to_path_buf(),
                source,
            })?;
        Ok(Self {
            env,
            ..Self::default()
        })
    }

    pub fn with_hub_path(mut self, hub_path: impl Into<PathBuf>) -> Self {
        self.hub_path = hub_path.into();
        self
    }

    /// The caller-side environment overrides, before `HOME`/`PATH` are applied.
    pub fn overrides(&self) -> HashMap<String, String> {
        let mut env = self.env.clone();
        if self.non_interactive {
            env.entry("GIT_TERMINAL_PROMPT".to_string())
                .or_insert_with(|| "0".to_string());
            env.entry("LC_ALL".to_string())
                .or_insert_with(|| "C".to_string());
        }
        env
    }
}

/// `<config dir>/hubgit/config.json`, or `None` when no home directory can be
/// determined.
pub fn default_config_path() -> Option<PathBuf> {
    directories::ProjectDirs::from("com", "hubgit", "hubgit")
        .map(|p| p.config_dir().join("config.json"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_default_config() {
        let config = ClientConfig::default();
        assert_eq!(config.git_program, "git");
        assert_eq!(config.hub_path, PathBuf::from("hub"));
        assert!(config.env.is_empty());
        assert!(config.non_interactive);
    }

    #[test]
    fn test_overrides_add_non_interactive_vars() {
        let overrides = ClientConfig::default().overrides();
        assert_eq!(overrides.get("GIT_TERMINAL_PROMPT").map(String::as_str), Some("0"));
        assert_eq!(overrides.get("LC_ALL").map(String::as_str), Some("C"));
    }

    #[test]
    fn test_explicit_env_wins_over_non_interactive_defaults() {
        let mut config = ClientConfig::default();
        config.env.insert("LC_ALL".to_string(), "en_US.UTF-8".to_string());
        let overrides = config.overrides();
        assert_eq!(overrides.get("LC_ALL").map(String::as_str), Some("en_US.UTF-8"));
    }

    #[test]
    fn test_interactive_config_passes_env_through() {
        let mut config = ClientConfig::default();
        config.non_interactive = false;
        config.env.insert("GITHUB_TOKEN".to_string(), "abc".to_string());
        assert_eq!(config.overrides(), config.env);
    }

    #[test]
    fn test_load_partial_json_uses_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(
            &path,
            r#"{ "hubPath": "/opt/hub/bin/hub", "env": { "GITHUB_TOKEN": "ghp_x" } }"#,
        )
        .unwrap();

        let config = ClientConfig::load(&path).unwrap();
        assert_eq!(config.hub_path, PathBuf::from("/opt/hub/bin/hub"));
        assert_eq!(config.git_program, "git");
        assert_eq!(config.env.get("GITHUB_TOKEN").map(String::as_str), Some("ghp_x"));
        assert!(config.non_interactive);
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let dir = tempdir().unwrap();
        let err = ClientConfig::load(&dir.path().join("nope.json")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn test_load_invalid_json_is_json_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{ not json").unwrap();
        let err = ClientConfig::load(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Json { .. }));
        assert!(err.to_string().contains("config.json"));
    }

    #[test]
    fn test_from_tokens_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("tokens.json");
        std::fs::write(&path, r#"{ "GITHUB_TOKEN": "ghp_abc", "GITHUB_USER": "octo" }"#).unwrap();

        let config = ClientConfig::from_tokens_file(&path).unwrap();
        assert_eq!(config.env.len(), 2);
        assert_eq!(config.env.get("GITHUB_USER").map(String::as_str), Some("octo"));
        assert_eq!(config.hub_path, PathBuf::from("hub"));
    }

    #[test]
    fn test_tokens_file_must_be_flat_strings() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("tokens.json");
        std::fs::write(&path, r#"{ "GITHUB_TOKEN": 42 }"#).unwrap();
        assert!(ClientConfig::from_tokens_file(&path).is_err());
    }

    #[test]
    fn test_round_trip_through_json() {
        let config = ClientConfig::default().with_hub_path("/usr/local/bin/hub");
        let json = serde_json::to_string(&config).unwrap();
        assert!(json.contains("\"hubPath\""));
        let back: ClientConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, config);
    }
}
