//! Run configuration.
//!
//! Loaded once from a TOML file (optional), then overlaid with environment
//! variables. The resulting `AuditConfig` is an immutable value handed to the
//! clients and invokers that need it; nothing reads configuration globally.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

use crate::pipeline::llm::{ModelConfig, RetryPolicy};

/// Application-level constants
pub const APP_NAME: &str = "syllabus-audit";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Config file looked up in the working directory when `--config` is absent.
pub const CONFIG_FILE_NAME: &str = "syllabus-audit.toml";

pub const ENV_ACCESS_TOKEN: &str = "SYLLABUS_AUDIT_ACCESS_TOKEN";
pub const ENV_API_URL: &str = "SYLLABUS_AUDIT_API_URL";
pub const ENV_MODEL: &str = "SYLLABUS_AUDIT_MODEL";

/// Result file name used when a whole folder is audited.
pub const FOLDER_RESULTS_FILE: &str = "all_results.csv";

/// Log filter used when `RUST_LOG` is not set.
pub fn default_log_filter() -> &'static str {
    "syllabus_audit_lib=info,syllabus_audit=info"
}

/// Log filter used with `--verbose`.
pub fn verbose_log_filter() -> &'static str {
    "syllabus_audit_lib=debug,syllabus_audit=debug"
}

/// Fallback config location under the platform config dir,
/// e.g. `~/.config/syllabus-audit/config.toml`.
pub fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(APP_NAME).join("config.toml"))
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Cannot read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config file {path}: {source}")]
    Toml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Retry settings as written in the config file (milliseconds).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RetrySettings {
    pub attempts: u32,
    pub success_delay_ms: u64,
    pub failure_delay_ms: u64,
}

impl Default for RetrySettings {
    fn default() -> Self {
        Self {
            attempts: 3,
            success_delay_ms: 0,
            failure_delay_ms: 1000,
        }
    }
}

impl RetrySettings {
    pub fn policy(&self) -> RetryPolicy {
        RetryPolicy {
            attempts: self.attempts.max(1),
            success_delay: Duration::from_millis(self.success_delay_ms),
            failure_delay: Duration::from_millis(self.failure_delay_ms),
        }
    }
}

/// Locations of the reference tables and the default output directory.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PathSettings {
    pub course_table: PathBuf,
    pub statement_table: PathBuf,
    pub output_dir: PathBuf,
}

impl Default for PathSettings {
    fn default() -> Self {
        Self {
            course_table: PathBuf::from("Map/courses.csv"),
            statement_table: PathBuf::from("Map/gold_statements.csv"),
            output_dir: PathBuf::from("Output"),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AuditConfig {
    pub llm: ModelConfig,
    pub retry: RetrySettings,
    pub paths: PathSettings,
}

impl AuditConfig {
    /// Load configuration.
    ///
    /// An explicit path must exist. Without one, `syllabus-audit.toml` in the
    /// working directory is tried, then the user config file; if neither
    /// exists the defaults are used. Environment overrides apply last.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match explicit {
            Some(path) => Self::from_file(path)?,
            None => {
                let candidates = std::iter::once(PathBuf::from(CONFIG_FILE_NAME))
                    .chain(user_config_path());
                let mut found = None;
                for candidate in candidates {
                    if candidate.is_file() {
                        found = Some(Self::from_file(&candidate)?);
                        break;
                    }
                }
                found.unwrap_or_else(|| {
                    tracing::debug!("No config file found, using defaults");
                    Self::default()
                })
            }
        };

        config.apply_env_overrides(|key| std::env::var(key).ok());
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml(&contents).map_err(|source| ConfigError::Toml {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::debug!(path = %path.display(), "Loaded config file");
        Ok(config)
    }

    pub fn from_toml(contents: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(contents)
    }

    /// Overlay values from the environment. `lookup` is injected so tests
    /// don't touch the process environment.
    pub fn apply_env_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(token) = non_empty(ENV_ACCESS_TOKEN) {
            self.llm.access_token = Some(token);
        }
        if let Some(url) = non_empty(ENV_API_URL) {
            self.llm.api_url = url;
        }
        if let Some(model) = non_empty(ENV_MODEL) {
            self.llm.name = model;
        }
    }
}
