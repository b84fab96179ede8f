//! Configuration loader for the validate-code hook
//!
//! Reads `config.yaml` from the hook directory (or an explicit path) and
//! turns it into a [`HookConfig`]. Validator order in the file is preserved,
//! since the first matching validator wins.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::debug;

use super::{ConfigValidator, HookConfig, Settings, ValidatorDescriptor};
use crate::error::{HookError, Result};

/// Contents of `config_example.yaml`, written by `validate-code init`
pub const EXAMPLE_CONFIG: &str = include_str!("../../config_example.yaml");

/// One entry of the `validators` mapping, before the key is attached
#[derive(Debug, Deserialize)]
struct ValidatorEntry {
    #[serde(alias = "check_bat")]
    check_executable: PathBuf,
    #[serde(default)]
    http_port: Option<u16>,
    extensions: Vec<String>,
    #[serde(default)]
    exclude_paths: Vec<String>,
}

/// Configuration loader for the hook
pub struct ConfigLoader;

impl ConfigLoader {
    /// File name of the live configuration inside the hook directory
    pub const FILE_NAME: &'static str = "config.yaml";

    /// File name of the shipped example configuration
    pub const EXAMPLE_FILE_NAME: &'static str = "config_example.yaml";

    /// Default configuration path for a hook directory
    pub fn default_path(hook_dir: &Path) -> PathBuf {
        hook_dir.join(Self::FILE_NAME)
    }

    /// Load the configuration from a specific file path
    ///
    /// # Errors
    ///
    /// Returns [`HookError::ConfigMissing`] if the file doesn't exist, and an
    /// error if it cannot be read or is not a valid configuration.
    pub fn load_from_path(path: &Path) -> Result<HookConfig> {
        if !path.exists() {
            return Err(HookError::ConfigMissing {
                path: path.to_path_buf(),
            });
        }

        let content = fs::read_to_string(path)?;
        let config = Self::parse_yaml(&content)?;

        debug!(
            path = %path.display(),
            validators = config.validators.len(),
            "Loaded validator configuration"
        );

        Ok(config)
    }

    /// Parse YAML configuration content
    ///
    /// Expected YAML format:
    /// ```yaml
    /// validators:
    ///   php:
    ///     check_executable: /opt/php-lsp/check.sh
    ///     http_port: 19850
    ///     extensions: [".php"]
    ///     exclude_paths: ["hooks"]
    /// settings:
    ///   fallback_timeout_secs: 10
    /// ```
    pub fn parse_yaml(content: &str) -> Result<HookConfig> {
        let value: serde_yaml::Value = serde_yaml::from_str(content)
            .map_err(|e| HookError::InvalidConfiguration(format!("Invalid YAML: {}", e)))?;

        let entries = value
            .get("validators")
            .and_then(|v| v.as_mapping())
            .ok_or_else(|| {
                HookError::InvalidConfiguration("Missing 'validators' mapping".to_string())
            })?;

        // serde_yaml mappings keep insertion order
        let mut validators = Vec::with_capacity(entries.len());
        for (key, entry) in entries {
            let language = key.as_str().ok_or_else(|| {
                HookError::InvalidConfiguration(format!(
                    "Validator keys must be strings, found {:?}",
                    key
                ))
            })?;

            let entry: ValidatorEntry = serde_yaml::from_value(entry.clone()).map_err(|e| {
                HookError::InvalidConfiguration(format!(
                    "Failed to parse validator '{}': {}",
                    language, e
                ))
            })?;

            let descriptor = ValidatorDescriptor {
                language: language.to_string(),
                check_executable: entry.check_executable,
                http_port: entry.http_port,
                extensions: entry.extensions,
                exclude_paths: entry.exclude_paths,
            };
            ConfigValidator::validate_descriptor(&descriptor)?;
            validators.push(descriptor);
        }

        let settings = match value.get("settings") {
            None | Some(serde_yaml::Value::Null) => Settings::default(),
            Some(raw) => serde_yaml::from_value(raw.clone()).map_err(|e| {
                HookError::InvalidConfiguration(format!("Failed to parse settings: {}", e))
            })?,
        };

        Ok(HookConfig {
            validators,
            settings,
        })
    }
}
