//! Validator execution
//!
//! A validator is reached over one of two channels:
//!
//! 1. **HTTP**: a long-running diagnostics server on `127.0.0.1:<port>`,
//!    tried first when the descriptor has a port.
//! 2. **Process**: the descriptor's check script, run when there is no port
//!    or the HTTP channel asked for a fallback.
//!
//! The fallback is an explicit branch on [`HttpOutcome`]. Exactly one channel
//! produces the [`ValidationResult`]; results are never merged, and
//! [`ValidatorRunner::execute`] cannot fail.

pub mod http;
pub mod process;

use std::fmt;
use std::path::PathBuf;

use tracing::{info, warn};

pub use http::{normalize_output, DiagnosticsClient, HttpChannel, HttpOutcome};
pub use process::{CheckScriptRunner, ProcessChannel};

use crate::config::{Settings, ValidatorDescriptor};
use crate::error::Result;

/// Channel that produced a validation result
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
    /// HTTP diagnostics endpoint
    Http,
    /// Check script subprocess
    Process,
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Channel::Http => write!(f, "http"),
            Channel::Process => write!(f, "process"),
        }
    }
}

/// One file to validate
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationRequest {
    /// Path of the edited file, as reported by the host
    pub file_path: String,

    /// Project root passed to the validator
    pub project_dir: PathBuf,
}

impl ValidationRequest {
    /// Create a new request
    pub fn new(file_path: impl Into<String>, project_dir: impl Into<PathBuf>) -> Self {
        Self {
            file_path: file_path.into(),
            project_dir: project_dir.into(),
        }
    }
}

/// Output of exactly one channel
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationResult {
    /// Validator output, in check-script marker format
    pub output: String,

    /// Process exit code, or 1/0 derived from the HTTP flags
    pub exit_code: i32,

    /// Channel that produced this result
    pub channel: Channel,
}

/// Runs validators over the HTTP channel with subprocess fallback
pub struct ValidatorRunner {
    http: Box<dyn HttpChannel>,
    process: Box<dyn ProcessChannel>,
}

impl ValidatorRunner {
    /// Create a runner from explicit channels
    pub fn new(http: Box<dyn HttpChannel>, process: Box<dyn ProcessChannel>) -> Self {
        Self { http, process }
    }

    /// Create a runner with the production channels configured from settings
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        Ok(Self::new(
            Box::new(DiagnosticsClient::new(settings.http_timeout())?),
            Box::new(CheckScriptRunner::new(settings.fallback_timeout_secs)),
        ))
    }

    /// Validate one file with the given validator
    pub async fn execute(
        &self,
        descriptor: &ValidatorDescriptor,
        request: &ValidationRequest,
    ) -> ValidationResult {
        if let Some(port) = descriptor.http_port {
            match self.http.fetch(port, request).await {
                HttpOutcome::Completed(result) => {
                    info!(
                        language = %descriptor.language,
                        exit_code = result.exit_code,
                        "Validated via HTTP endpoint"
                    );
                    return result;
                }
                HttpOutcome::FallbackNeeded(reason) => {
                    warn!(
                        port = port,
                        reason = %reason,
                        "HTTP endpoint failed, falling back to check script with timeout"
                    );
                }
            }
        }

        let result = self
            .process
            .run(&descriptor.check_executable, request)
            .await;

        info!(
            language = %descriptor.language,
            exit_code = result.exit_code,
            "Validated via check script"
        );

        result
    }
}
