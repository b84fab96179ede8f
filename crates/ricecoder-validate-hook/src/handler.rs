//! Hook handler
//!
//! Turns one host event into one [`Decision`]:
//!
//! 1. Non post-tool-use events and tools other than `Edit`/`Write` are allowed.
//! 2. The registry picks a validator for the file; none means allow.
//! 3. The project directory comes from `CLAUDE_PROJECT_DIR`, or is the parent
//!    of the hook directory.
//! 4. The runner validates the file; the parser decides whether the output
//!    reports diagnostics, and if so the edit is blocked with them.
//!
//! The handler is the only place internal state becomes a decision. Nothing
//! below it can fail for a validation event.

use std::path::{Path, PathBuf};

use tracing::info;

use crate::decision::Decision;
use crate::event::HookEvent;
use crate::parser::{DiagnosticParser, MarkerDiagnosticParser};
use crate::registry::ValidatorRegistry;
use crate::runner::{ValidationRequest, ValidatorRunner};

/// Environment variable overriding the project root
pub const PROJECT_DIR_ENV: &str = "CLAUDE_PROJECT_DIR";

/// Resolve the project directory
///
/// A non-empty override wins. Otherwise the hook is assumed to live in
/// `<project>/hooks/`, so the project is the hook directory's parent.
pub fn resolve_project_dir(env_override: Option<&str>, hook_dir: &Path) -> PathBuf {
    match env_override.filter(|value| !value.is_empty()) {
        Some(dir) => PathBuf::from(dir),
        None => hook_dir
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| hook_dir.to_path_buf()),
    }
}

/// Orchestrates registry, runner and parser for one event
pub struct HookHandler {
    registry: ValidatorRegistry,
    runner: ValidatorRunner,
    parser: Box<dyn DiagnosticParser>,
    hook_dir: PathBuf,
    project_dir_override: Option<String>,
}

impl HookHandler {
    /// Create a handler using the marker-based diagnostic parser
    pub fn new(registry: ValidatorRegistry, runner: ValidatorRunner, hook_dir: PathBuf) -> Self {
        Self {
            registry,
            runner,
            parser: Box::new(MarkerDiagnosticParser::new()),
            hook_dir,
            project_dir_override: None,
        }
    }

    /// Replace the diagnostic parser
    pub fn with_parser(mut self, parser: Box<dyn DiagnosticParser>) -> Self {
        self.parser = parser;
        self
    }

    /// Set the project directory override (the value of `CLAUDE_PROJECT_DIR`)
    pub fn with_project_dir_override(mut self, project_dir: Option<String>) -> Self {
        self.project_dir_override = project_dir;
        self
    }

    /// Project directory passed to validators
    pub fn project_dir(&self) -> PathBuf {
        resolve_project_dir(self.project_dir_override.as_deref(), &self.hook_dir)
    }

    /// Decide on one host event
    pub async fn handle(&self, event: &HookEvent) -> Decision {
        info!("Tool: {}", event.tool_name);

        if !event.is_post_tool_use() {
            info!(
                hook_event = event.hook_event_name.as_deref().unwrap_or(""),
                "Not a PostToolUse event, skipping"
            );
            return Decision::Allow;
        }

        if !event.is_file_edit() {
            info!("Tool not Edit/Write, skipping");
            return Decision::Allow;
        }

        self.validate_file(event.file_path()).await
    }

    /// Validate one file and decide
    pub async fn validate_file(&self, file_path: &str) -> Decision {
        info!("FilePath: {}", file_path);

        let Some(validator) = self.registry.select(file_path) else {
            info!("No validator found for file, skipping");
            return Decision::Allow;
        };

        let project_dir = self.project_dir();
        info!("Project dir: {}", project_dir.display());

        let request = ValidationRequest::new(file_path, project_dir);
        let result = self.runner.execute(validator, &request).await;

        if self.parser.has_errors(&result.output) {
            let diagnostics = self.parser.extract_diagnostics(&result.output);
            info!(channel = %result.channel, "Found errors, blocking with diagnostics");
            return Decision::block_with_diagnostics(&diagnostics);
        }

        info!("No errors found");
        Decision::Allow
    }
}
