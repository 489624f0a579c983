//! Trip planner configuration types and loading

use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::domain::FormOptions;

/// Project-local config file name
const LOCAL_CONFIG: &str = ".tripplanner.yml";

/// Main configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Log level (TRACE, DEBUG, INFO, WARN, ERROR)
    #[serde(rename = "log-level", skip_serializing_if = "Option::is_none")]
    pub log_level: Option<String>,

    /// Planning service endpoints
    pub service: ServiceConfig,

    /// Form interpretation
    pub form: FormConfig,

    /// Chat behaviour
    pub chat: ChatConfig,
}

impl Config {
    /// Load configuration from the first readable file in the fallback chain
    ///
    /// An explicit path must load. Otherwise `.tripplanner.yml` in the working
    /// directory, then the user config file, then built-in defaults; a broken
    /// file is logged and skipped.
    pub fn load(config_path: Option<&PathBuf>) -> Result<Self> {
        if let Some(path) = config_path {
            return Self::load_from_file(path).context(format!("Failed to load config from {}", path.display()));
        }

        for path in search_paths().iter().filter(|p| p.exists()) {
            match Self::load_from_file(path) {
                Ok(config) => return Ok(config),
                Err(e) => tracing::warn!("Failed to load config from {}: {:#}", path.display(), e),
            }
        }

        tracing::info!("No config file found, using defaults");
        Ok(Self::default())
    }

    /// Read only the log level, before logging is initialized
    ///
    /// Errors are swallowed: a broken config file is reported later by `load`.
    pub fn load_log_level(config_path: Option<&PathBuf>) -> Option<String> {
        let candidates = match config_path {
            Some(path) => vec![path.clone()],
            None => search_paths(),
        };

        candidates
            .iter()
            .find(|p| p.exists())
            .and_then(|p| fs::read_to_string(p).ok())
            .and_then(|content| serde_yaml::from_str::<Config>(&content).ok())
            .and_then(|config| config.log_level)
    }

    fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path).context("Failed to read config file")?;

        let config: Self = serde_yaml::from_str(&content).context("Failed to parse config file")?;

        tracing::info!("Loaded config from: {}", path.as_ref().display());
        Ok(config)
    }

    /// Render the effective configuration as YAML
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).context("Failed to serialize config")
    }
}

/// Config files tried when no explicit path is given, in priority order
fn search_paths() -> Vec<PathBuf> {
    let mut paths = vec![PathBuf::from(LOCAL_CONFIG)];
    paths.extend(dirs::config_dir().map(|dir| dir.join("tripplanner").join("tripplanner.yml")));
    paths
}

/// Planning service configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    /// Base URL of the planning service
    #[serde(rename = "base-url")]
    pub base_url: String,

    /// Path of the plan generation endpoint
    #[serde(rename = "plan-path")]
    pub plan_path: String,

    /// Path of the follow-up chat endpoint
    #[serde(rename = "chat-path")]
    pub chat_path: String,

    /// Request timeout in milliseconds (0 disables the timeout)
    #[serde(rename = "timeout-ms")]
    pub timeout_ms: u64,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
            plan_path: "/plan-trip".to_string(),
            chat_path: "/chat".to_string(),
            timeout_ms: 300_000,
        }
    }
}

/// Form interpretation
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FormConfig {
    /// Drop empty tokens from the comma-separated interests field
    #[serde(rename = "drop-empty-interests")]
    pub drop_empty_interests: bool,
}

impl FormConfig {
    pub fn options(&self) -> FormOptions {
        FormOptions {
            drop_empty_interests: self.drop_empty_interests,
        }
    }
}

/// Chat behaviour
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatConfig {
    /// Assistant turn appended when a question could not be answered
    #[serde(rename = "fallback-message")]
    pub fallback_message: String,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            fallback_message: crate::session::DEFAULT_FALLBACK_REPLY.to_string(),
        }
    }
}
