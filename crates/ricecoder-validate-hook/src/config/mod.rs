//! Validator configuration
//!
//! The configuration is a static YAML file next to the hook binary. It maps a
//! language key to the external tool that checks files of that language, and
//! carries a few optional runtime settings (timeouts, log location).
//!
//! The configuration is loaded once per invocation into a [`HookConfig`] and
//! then handed to the registry, runner and logger. Nothing reads it globally.

pub mod loader;
pub mod validator;

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

pub use loader::{ConfigLoader, EXAMPLE_CONFIG};
pub use validator::ConfigValidator;

/// Static description of one external validator
///
/// Binds a language key and a set of file extensions to the tool that checks
/// them, plus the optional HTTP port of a long-running diagnostics server for
/// the same tool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidatorDescriptor {
    /// Language key from the configuration (e.g. "php")
    pub language: String,

    /// Path to the check script invoked by the subprocess channel
    pub check_executable: PathBuf,

    /// Port of the local HTTP diagnostics endpoint, if any
    pub http_port: Option<u16>,

    /// File suffixes handled by this validator (e.g. ".php")
    pub extensions: Vec<String>,

    /// Directory names whose files are never validated
    pub exclude_paths: Vec<String>,
}

/// Optional runtime settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Request timeout for the HTTP channel, in seconds
    #[serde(default = "default_http_timeout_secs")]
    pub http_timeout_secs: u64,

    /// Value passed to the check script as `--timeout`, in seconds
    #[serde(default = "default_fallback_timeout_secs")]
    pub fallback_timeout_secs: u64,

    /// Log files older than this many days are deleted
    #[serde(default = "default_log_retention_days")]
    pub log_retention_days: u32,

    /// Log directory; relative paths are resolved against the hook directory
    #[serde(default = "default_log_dir")]
    pub log_dir: PathBuf,

    /// Maximum log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            http_timeout_secs: default_http_timeout_secs(),
            fallback_timeout_secs: default_fallback_timeout_secs(),
            log_retention_days: default_log_retention_days(),
            log_dir: default_log_dir(),
            log_level: default_log_level(),
        }
    }
}

impl Settings {
    /// HTTP channel request timeout
    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }

    /// Log level as a tracing level, falling back to INFO for unknown names
    pub fn tracing_level(&self) -> tracing::Level {
        match self.log_level.to_lowercase().as_str() {
            "trace" => tracing::Level::TRACE,
            "debug" => tracing::Level::DEBUG,
            "warn" => tracing::Level::WARN,
            "error" => tracing::Level::ERROR,
            _ => tracing::Level::INFO,
        }
    }
}

// Default value functions for serde
fn default_http_timeout_secs() -> u64 {
    30
}

fn default_fallback_timeout_secs() -> u64 {
    10
}

fn default_log_retention_days() -> u32 {
    5
}

fn default_log_dir() -> PathBuf {
    PathBuf::from("logs")
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Complete configuration for one hook invocation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HookConfig {
    /// Validators in declaration order
    pub validators: Vec<ValidatorDescriptor>,

    /// Runtime settings
    pub settings: Settings,
}
