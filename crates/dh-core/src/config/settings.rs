//! deckhand configuration file

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use super::serde_utils::duration_secs;
use crate::error::ConfigError;

/// Contents of `config.toml`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DeckhandConfig {
    /// Project used when none is given on the command line
    pub default_project: Option<String>,

    /// Where project, service and environment data comes from
    pub catalog: CatalogConfig,

    /// Terminal output settings
    pub output: OutputConfig,
}

impl DeckhandConfig {
    /// Check settings that serde cannot
    pub fn validate(&self) -> Result<(), ConfigError> {
        match self.catalog.backend {
            CatalogBackend::Manifest => {
                if self.catalog.manifest_path.is_none() {
                    return Err(ConfigError::MissingField("catalog.manifest_path".into()));
                }
            }
            CatalogBackend::Http => {
                let endpoint = self
                    .catalog
                    .endpoint
                    .as_deref()
                    .ok_or_else(|| ConfigError::MissingField("catalog.endpoint".into()))?;
                if !(endpoint.starts_with("http://") || endpoint.starts_with("https://")) {
                    return Err(ConfigError::Invalid(format!(
                        "catalog.endpoint must be an http(s) URL, got {}",
                        endpoint
                    )));
                }
            }
        }
        if self.catalog.timeout.is_zero() {
            return Err(ConfigError::Invalid("catalog.timeout must be at least 1 second".into()));
        }
        Ok(())
    }
}

/// Which catalog implementation to use
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CatalogBackend {
    /// A local TOML manifest, re-read on every call
    #[default]
    Manifest,
    /// A remote catalog service over HTTP
    Http,
}

/// Catalog connection settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    pub backend: CatalogBackend,

    /// Manifest file for the `manifest` backend
    pub manifest_path: Option<PathBuf>,

    /// Base URL for the `http` backend
    pub endpoint: Option<String>,

    /// Per-request timeout for the `http` backend
    #[serde(with = "duration_secs")]
    pub timeout: Duration,

    /// Name of the environment variable holding a bearer token
    pub token_env: Option<String>,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            backend: CatalogBackend::Manifest,
            manifest_path: Some(super::default_config_dir().join("catalog.toml")),
            endpoint: None,
            timeout: Duration::from_secs(10),
            token_env: None,
        }
    }
}

impl CatalogConfig {
    /// Read the bearer token from the configured environment variable
    pub fn token(&self) -> Option<String> {
        self.token_env
            .as_deref()
            .and_then(|var| std::env::var(var).ok())
            .filter(|t| !t.is_empty())
    }
}

/// Output settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub color: ColorMode,
}

/// When to emit ANSI colors
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorMode {
    /// Color only when writing to a terminal
    #[default]
    Auto,
    Always,
    Never,
}

impl ColorMode {
    /// Interpret the value of the `COLOR` environment variable
    ///
    /// `"true"` forces color and `"false"` disables it (case-insensitive).
    /// Anything else, or an unset variable, expresses no preference.
    pub fn from_env_value(value: Option<&str>) -> Option<ColorMode> {
        match value.map(str::to_ascii_lowercase).as_deref() {
            Some("true") => Some(ColorMode::Always),
            Some("false") => Some(ColorMode::Never),
            _ => None,
        }
    }

    /// Whether color should be used given the terminal state
    pub fn enabled(self, is_tty: bool) -> bool {
        match self {
            ColorMode::Auto => is_tty,
            ColorMode::Always => true,
            ColorMode::Never => false,
        }
    }
}
