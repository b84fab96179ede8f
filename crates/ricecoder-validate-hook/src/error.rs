//! Error types for the validate-code hook
//!
//! Only configuration loading and event decoding can fail. Validator channel
//! failures are never errors: the HTTP channel degrades to the subprocess
//! channel and subprocess failures are folded into the validation result.
//!
//! # Examples
//!
//! ```ignore
//! match ConfigLoader::load_from_path(&path) {
//!     Ok(config) => run(config),
//!     Err(HookError::ConfigMissing { path }) => block_with_setup_hint(&path),
//!     Err(e) => block_with(e.to_string()),
//! }
//! ```

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while preparing a validation run
#[derive(Debug, Error)]
pub enum HookError {
    /// The validator configuration file does not exist
    ///
    /// The binary reports this to the host as a block message that tells the
    /// user how to create the file from `config_example.yaml`.
    #[error("Validator config not found: {}", path.display())]
    ConfigMissing {
        /// Path that was expected to hold the configuration
        path: PathBuf,
    },

    /// Invalid validator configuration
    ///
    /// Common causes:
    /// - A validator without extensions
    /// - An empty `check_executable`
    /// - An `http_port` of zero
    #[error("Invalid validator configuration: {0}")]
    InvalidConfiguration(String),

    /// The host event on stdin could not be decoded
    #[error("Invalid hook event: {0}")]
    InvalidEvent(String),

    /// The HTTP client for the diagnostics endpoint could not be built
    #[error("Failed to build HTTP client: {0}")]
    HttpClient(String),

    /// YAML error
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_yaml::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// IO error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Result type for hook operations
pub type Result<T> = std::result::Result<T, HookError>;
