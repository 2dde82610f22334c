//! Configuration types and loading.
//!
//! Sources, lowest priority first:
//!
//! 1. built-in defaults
//! 2. the YAML file passed to [`load_config`], if any
//! 3. environment variables prefixed `SCANFMT_`, with `__` between nested
//!    keys (`SCANFMT_LOAD__STRICT_SUB_FIELDS=true`)

use std::path::Path;

use figment::Figment;
use figment::providers::{Env, Format, Serialized, Yaml};
use scan_fieldset::LoadOptions;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

/// Prefix of environment variables that override the file.
pub const ENV_PREFIX: &str = "SCANFMT_";

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors that can occur during configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read or written.
    #[error("failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    /// The configuration could not be written as YAML.
    #[error("failed to serialize config: {0}")]
    ParseError(#[from] serde_yaml::Error),

    /// The merged sources did not form a valid configuration.
    #[error("invalid configuration: {0}")]
    ExtractError(#[from] figment::Error),
}

/// A specialized `Result` type for configuration operations.
pub type Result<T> = std::result::Result<T, ConfigError>;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Logging settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// `tracing` filter directive, e.g. `scan_fieldset=debug`. When unset,
    /// logging is only enabled by `--verbose`.
    pub filter: Option<String>,
}

/// Contents of `scanfmt.yaml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    /// Options for loading formulas into field sets.
    pub load: LoadOptions,
    pub log: LogConfig,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Load configuration from `path` (if given) and the environment.
///
/// An empty file counts as no file.
///
/// # Errors
///
/// Returns [`ConfigError::ReadError`] if `path` cannot be read and
/// [`ConfigError::ExtractError`] if the merged values are invalid.
pub fn load_config(path: Option<&Path>) -> Result<ScanConfig> {
    let mut figment = Figment::from(Serialized::defaults(ScanConfig::default()));

    if let Some(path) = path {
        let content = std::fs::read_to_string(path)?;
        if !content.trim().is_empty() {
            figment = figment.merge(Yaml::string(&content));
        }
        debug!(path = %path.display(), "read config file");
    }

    let config: ScanConfig = figment
        .merge(Env::prefixed(ENV_PREFIX).split("__"))
        .extract()?;
    debug!(?config, "configuration loaded");
    Ok(config)
}

/// Save configuration as YAML to `path`, creating parent directories.
///
/// # Errors
///
/// Returns [`ConfigError::ReadError`] on I/O failure or
/// [`ConfigError::ParseError`] if serialization fails.
pub fn save_config(path: &Path, config: &ScanConfig) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let yaml = serde_yaml::to_string(config)?;
    std::fs::write(path, yaml)?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
