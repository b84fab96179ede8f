//! HTTP diagnostics channel
//!
//! Talks to a validator's diagnostics server:
//!
//! ```text
//! POST http://127.0.0.1:<port>/diagnostics
//! {"project_path": "...", "file_path": "...", "min_severity": "warning"}
//!
//! 200 {"output": "...", "has_errors": true, "has_warnings": false}
//! ```
//!
//! Every failure (connection refused, timeout, non-2xx, a body that is not a
//! JSON object) becomes [`HttpOutcome::FallbackNeeded`]. This channel never
//! returns an error.

use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use tracing::{debug, info};

use super::{Channel, ValidationRequest, ValidationResult};
use crate::error::{HookError, Result};

/// Host the diagnostics servers listen on
pub const DIAGNOSTICS_HOST: &str = "127.0.0.1";

/// Severity threshold requested from the server
const MIN_SEVERITY: &str = "warning";

/// Result of one attempt on the HTTP channel
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HttpOutcome {
    /// The server answered with a usable diagnostics object
    Completed(ValidationResult),
    /// The subprocess channel must be used; carries the reason for the log
    FallbackNeeded(String),
}

/// Mockable HTTP channel
#[async_trait]
pub trait HttpChannel: Send + Sync {
    /// Ask the diagnostics server on `port` to validate the request's file
    async fn fetch(&self, port: u16, request: &ValidationRequest) -> HttpOutcome;
}

#[derive(Debug, Serialize)]
struct DiagnosticsRequest<'a> {
    project_path: String,
    file_path: &'a str,
    min_severity: &'static str,
}

/// Production HTTP channel backed by reqwest
pub struct DiagnosticsClient {
    inner: reqwest::Client,
    host: String,
}

impl DiagnosticsClient {
    /// Create a client whose requests time out after `timeout`
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying reqwest client cannot be built.
    pub fn new(timeout: Duration) -> Result<Self> {
        let inner = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| HookError::HttpClient(e.to_string()))?;

        Ok(Self {
            inner,
            host: DIAGNOSTICS_HOST.to_string(),
        })
    }

    /// Diagnostics endpoint URL for a port
    pub fn endpoint(&self, port: u16) -> String {
        format!("http://{}:{}/diagnostics", self.host, port)
    }
}

#[async_trait]
impl HttpChannel for DiagnosticsClient {
    async fn fetch(&self, port: u16, request: &ValidationRequest) -> HttpOutcome {
        let url = self.endpoint(port);
        let payload = DiagnosticsRequest {
            project_path: request.project_dir.to_string_lossy().into_owned(),
            file_path: &request.file_path,
            min_severity: MIN_SEVERITY,
        };

        info!(url = %url, "Trying HTTP endpoint");

        let response = match self.inner.post(url.as_str()).json(&payload).send().await {
            Ok(response) => response,
            Err(e) => {
                return HttpOutcome::FallbackNeeded(format!(
                    "HTTP request failed (diagnostics server not running?): {}",
                    e
                ))
            }
        };

        let status = response.status();
        if !status.is_success() {
            return HttpOutcome::FallbackNeeded(format!("HTTP status {}", status));
        }

        let body = match response.text().await {
            Ok(body) => body,
            Err(e) => {
                return HttpOutcome::FallbackNeeded(format!("Failed to read HTTP response: {}", e))
            }
        };

        interpret_response(&body)
    }
}

/// Turn a diagnostics response body into an outcome
pub(crate) fn interpret_response(body: &str) -> HttpOutcome {
    let value: serde_json::Value = match serde_json::from_str(body) {
        Ok(value) => value,
        Err(_) => return HttpOutcome::FallbackNeeded("HTTP response not valid JSON".to_string()),
    };

    let Some(data) = value.as_object() else {
        return HttpOutcome::FallbackNeeded("HTTP response is not a JSON object".to_string());
    };

    let flag = |name: &str| data.get(name).and_then(|v| v.as_bool()).unwrap_or(false);
    let has_errors = flag("has_errors");
    let has_warnings = flag("has_warnings");

    info!(
        has_errors = has_errors,
        has_warnings = has_warnings,
        "HTTP response received"
    );

    let output = data.get("output").and_then(|v| v.as_str()).unwrap_or("");
    let normalized = normalize_output(output);
    debug!(output = %normalized, "Normalized HTTP output");

    HttpOutcome::Completed(ValidationResult {
        output: normalized,
        exit_code: if has_errors || has_warnings { 1 } else { 0 },
        channel: Channel::Http,
    })
}

/// Rewrite the endpoint's `[error]` / `[warning]` tags into the markers the
/// check scripts print, so parsing is identical for both channels
pub fn normalize_output(output: &str) -> String {
    output
        .replace("[error]", "Error [")
        .replace("[warning]", "Warning [")
}
