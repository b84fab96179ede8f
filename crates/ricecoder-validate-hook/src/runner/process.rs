//! Check script channel
//!
//! Runs `<check_executable> <file_path> <project_dir> --timeout <N>`. The
//! arguments go straight into argv, so paths with spaces need no quoting.
//! Stdout and stderr share one pipe, like `2>&1` in a shell, so the captured
//! text interleaves them in the order the script wrote.
//!
//! The `--timeout` value is advisory: the script is expected to honour it,
//! and this process does not kill a script that overruns.

use std::io::{self, Read};
use std::path::Path;
use std::process::{ExitStatus, Stdio};

use async_trait::async_trait;
use tokio::process::Command;
use tracing::{info, warn};

use super::{Channel, ValidationRequest, ValidationResult};

/// Exit code reported when the check script could not be started
///
/// Matches what a POSIX shell reports for a missing command.
pub const LAUNCH_FAILURE_EXIT_CODE: i32 = 127;

/// Mockable subprocess channel
#[async_trait]
pub trait ProcessChannel: Send + Sync {
    /// Run the check script for the request's file
    ///
    /// Always produces a result; launch failures are reported in the output.
    async fn run(&self, executable: &Path, request: &ValidationRequest) -> ValidationResult;
}

/// Production subprocess channel
#[derive(Debug, Clone)]
pub struct CheckScriptRunner {
    timeout_secs: u64,
}

impl CheckScriptRunner {
    /// Create a runner that passes `--timeout <timeout_secs>` to scripts
    pub fn new(timeout_secs: u64) -> Self {
        Self { timeout_secs }
    }

    /// Arguments passed to the check script
    pub fn arguments(&self, request: &ValidationRequest) -> Vec<String> {
        vec![
            request.file_path.clone(),
            request.project_dir.to_string_lossy().into_owned(),
            "--timeout".to_string(),
            self.timeout_secs.to_string(),
        ]
    }

    /// Shell-style rendering of the invocation, for the log
    pub fn command_line(&self, executable: &Path, request: &ValidationRequest) -> String {
        format!(
            "\"{}\" \"{}\" \"{}\" --timeout {}",
            executable.display(),
            request.file_path,
            request.project_dir.display(),
            self.timeout_secs
        )
    }
}

#[async_trait]
impl ProcessChannel for CheckScriptRunner {
    async fn run(&self, executable: &Path, request: &ValidationRequest) -> ValidationResult {
        info!(command = %self.command_line(executable, request), "Running command");

        let result = match self.run_combined(executable, request).await {
            Ok((output, status)) => ValidationResult {
                output: trim_lines(&String::from_utf8_lossy(&output)),
                // Killed by a signal
                exit_code: status.code().unwrap_or(-1),
                channel: Channel::Process,
            },
            Err(e) => {
                warn!(
                    executable = %executable.display(),
                    error = %e,
                    "Failed to launch check script"
                );
                ValidationResult {
                    output: format!("Failed to run '{}': {}", executable.display(), e),
                    exit_code: LAUNCH_FAILURE_EXIT_CODE,
                    channel: Channel::Process,
                }
            }
        };

        info!(exit_code = result.exit_code, "Return code");
        info!("Output: {}", result.output);

        result
    }
}

impl CheckScriptRunner {
    /// Run the script with stdout and stderr sharing one pipe, so the
    /// captured text keeps the order in which the script wrote it
    async fn run_combined(
        &self,
        executable: &Path,
        request: &ValidationRequest,
    ) -> io::Result<(Vec<u8>, ExitStatus)> {
        let (mut reader, writer) = io::pipe()?;
        let stderr_writer = writer.try_clone()?;

        let mut command = Command::new(executable);
        command
            .args(self.arguments(request))
            .stdin(Stdio::null())
            .stdout(writer)
            .stderr(stderr_writer);
        let mut child = command.spawn()?;

        // The command holds the parent's copies of the write end; the pipe
        // only reaches EOF once they are closed
        drop(command);

        let output = tokio::task::spawn_blocking(move || {
            let mut output = Vec::new();
            reader.read_to_end(&mut output).map(|_| output)
        })
        .await
        .map_err(|e| io::Error::new(io::ErrorKind::Other, e))??;

        let status = child.wait().await?;
        Ok((output, status))
    }
}

/// Drop trailing whitespace on each line and any trailing newline
fn trim_lines(output: &str) -> String {
    output
        .lines()
        .map(str::trim_end)
        .collect::<Vec<_>>()
        .join("\n")
}
