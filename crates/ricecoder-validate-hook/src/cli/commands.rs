//! Command execution
//!
//! [`execute`] runs one command and returns the text for stdout. It never
//! prints and never decides the exit status; the binary does both, always
//! exiting successfully once a decision has been produced.

use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use super::{config_error_reason, Commands};
use crate::config::{ConfigLoader, HookConfig, EXAMPLE_CONFIG};
use crate::decision::Decision;
use crate::error::Result;
use crate::event::HookEvent;
use crate::handler::HookHandler;
use crate::logging;
use crate::registry::ValidatorRegistry;
use crate::runner::ValidatorRunner;

/// Process-level inputs of one invocation
#[derive(Debug, Clone)]
pub struct Invocation {
    /// Directory the hook is installed in
    pub hook_dir: PathBuf,

    /// Configuration file
    pub config_path: PathBuf,

    /// Value of `CLAUDE_PROJECT_DIR`, if set
    pub project_dir_env: Option<String>,

    /// Install the file logger once the configuration is loaded
    pub install_logging: bool,
}

/// Run a command and return what should be written to stdout
///
/// # Errors
///
/// Returns an error only for `init` failures and payload serialization.
/// Configuration problems in hook mode become a block payload.
pub async fn execute(
    command: &Commands,
    invocation: &Invocation,
    input: impl Read,
) -> Result<Option<String>> {
    match command {
        Commands::Init { force } => init_config(&invocation.config_path, *force).map(Some),
        Commands::Run => run_hook(invocation, input).await,
        Commands::Check { file, project_dir } => {
            let project_dir = project_dir
                .clone()
                .or_else(|| invocation.project_dir_env.clone());
            let handler = match prepare(invocation, project_dir) {
                Ok(handler) => handler,
                Err(decision) => return decision.to_payload(),
            };

            let decision = handler.validate_file(file).await;
            Ok(Some(
                decision.to_payload()?.unwrap_or_else(|| "OK".to_string()),
            ))
        }
    }
}

/// Hook mode: one event from `input`, one decision out
async fn run_hook(invocation: &Invocation, input: impl Read) -> Result<Option<String>> {
    let event = HookEvent::from_reader(input);

    // Other hook types never need the configuration
    if let Ok(event) = &event {
        if !event.is_post_tool_use() {
            return Ok(None);
        }
    }

    let handler = match prepare(invocation, invocation.project_dir_env.clone()) {
        Ok(handler) => handler,
        Err(decision) => return decision.to_payload(),
    };

    let decision = match event {
        Ok(event) => handler.handle(&event).await,
        Err(e) => {
            warn!(error = %e, "Could not decode hook event, allowing edit");
            Decision::Allow
        }
    };

    if let Some(payload) = decision.to_payload()? {
        info!("JSON output: {}", payload);
        return Ok(Some(payload));
    }

    Ok(None)
}

/// Load the configuration, install logging and build the handler
///
/// A configuration that cannot be used is returned as the block decision
/// the host should see.
fn prepare(
    invocation: &Invocation,
    project_dir_override: Option<String>,
) -> std::result::Result<HookHandler, Decision> {
    let config = ConfigLoader::load_from_path(&invocation.config_path).map_err(|e| {
        Decision::Block {
            reason: config_error_reason(&e, &invocation.config_path),
        }
    })?;

    if invocation.install_logging {
        // Logging is best effort; the decision must still be emitted
        if let Err(e) = logging::init_logging(&config.settings, &invocation.hook_dir) {
            eprintln!("validate-code: file logging disabled: {}", e);
        }
    }

    build_handler(config, &invocation.hook_dir)
        .map(|handler| handler.with_project_dir_override(project_dir_override))
        .map_err(|e| Decision::Block {
            reason: config_error_reason(&e, &invocation.config_path),
        })
}

/// Build a handler with the production channels
///
/// # Errors
///
/// Returns an error if the HTTP client cannot be built.
pub fn build_handler(config: HookConfig, hook_dir: &Path) -> Result<HookHandler> {
    let runner = ValidatorRunner::from_settings(&config.settings)?;
    let registry = ValidatorRegistry::new(config.validators);
    Ok(HookHandler::new(registry, runner, hook_dir.to_path_buf()))
}

/// Write the example configuration
///
/// # Errors
///
/// Returns an error if the file cannot be written.
pub fn init_config(config_path: &Path, force: bool) -> Result<String> {
    if config_path.exists() && !force {
        return Ok(format!(
            "Configuration already exists at {} (use --force to overwrite)",
            config_path.display()
        ));
    }

    if let Some(parent) = config_path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(config_path, EXAMPLE_CONFIG)?;

    Ok(format!(
        "Wrote example configuration to {}; edit the validator paths before use",
        config_path.display()
    ))
}
